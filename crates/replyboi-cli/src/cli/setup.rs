use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "replyboi", bin_name = "replyboi", version)]
#[command(about = "Count your daily replies against a goal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (record, badge, mirrors)
    #[arg(long, global = true, env = "REPLYBOI_DATA", value_name = "DIR")]
    pub data: Option<PathBuf>,

    /// Config file [default: <config dir>/replyboi.toml]
    #[arg(long, global = true, env = "REPLYBOI_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show today's count, goal and streak
    #[command(alias = "s", display_order = 1)]
    Status {
        /// Print the raw GET_DATA payload
        #[arg(long)]
        json: bool,
    },
    /// Record one sent reply
    #[command(alias = "r", display_order = 2)]
    Reply,
    /// Offer an observed count; adopted only if higher
    #[command(display_order = 3)]
    Sync {
        #[arg(allow_negative_numbers = true)]
        count: i64,
    },
    /// Set the daily goal (1-999)
    #[command(display_order = 4)]
    Goal {
        #[arg(allow_negative_numbers = true)]
        goal: i64,
    },
    /// Zero today's count
    #[command(display_order = 5)]
    Reset,
    /// Run the rollover check now
    #[command(display_order = 6)]
    Check,
    /// List archived days, newest first
    #[command(alias = "h", display_order = 7)]
    History,
    /// Dispatch one raw JSON protocol message
    #[command(display_order = 10)]
    Send {
        /// e.g. '{"type":"REPLY_SENT"}'
        message: String,
    },
    /// Answer JSON protocol messages on stdin, one per line
    #[command(display_order = 11)]
    Serve,
    /// Act as a dependent context holding a mirror of the count
    #[command(subcommand, display_order = 12)]
    Mirror(MirrorCommands),
    /// Show the resolved configuration
    #[command(display_order = 20)]
    Config {
        /// Print a commented TOML template instead
        #[arg(long)]
        template: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum MirrorCommands {
    /// Create the mirror if needed and mark it loaded
    Attach { name: String },
    /// Mark the mirror unloaded; resets will be written to it directly
    Detach { name: String },
    /// Count a reply locally, report it, then sync the local count
    Reply { name: String },
    /// Show the mirror's local count
    Show { name: String },
}
