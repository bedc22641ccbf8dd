//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Sets up logging
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Load config, pick the clock, build the `ReplyContext`
//! 3. **API Dispatch**: Call the matching `ReplyApi` method
//! 4. **Output Formatting**: Turn `CmdResult` into terminal output

use super::render::{print_broadcast, print_history, print_messages, print_status};
use super::serve::serve;
use super::setup::{Cli, Commands, MirrorCommands};
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use clap::Parser;
use replyboi::clock::{Clock, FixedClock, SystemClock};
use replyboi::commands::CmdResult;
use replyboi::config::{default_config_path, ReplyboiConfig};
use replyboi::init::{initialize, resolve_data_dir, ReplyContext};
use replyboi::notify::fs_mirror::FsMirror;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// RFC 3339 instant that replaces the system clock for one invocation.
pub const NOW_ENV: &str = "REPLYBOI_NOW";

/// The clock the CLI hands to the library: the wall clock, or a pinned
/// instant from [`NOW_ENV`].
#[derive(Debug, Clone)]
pub enum CliClock {
    System(SystemClock),
    Pinned(FixedClock),
}

impl CliClock {
    pub fn from_env() -> Result<Self> {
        match std::env::var(NOW_ENV) {
            Ok(raw) if !raw.trim().is_empty() => FixedClock::parse(raw.trim())
                .map(CliClock::Pinned)
                .with_context(|| format!("{} is not an RFC 3339 timestamp: {}", NOW_ENV, raw)),
            _ => Ok(CliClock::System(SystemClock)),
        }
    }
}

impl Clock for CliClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self {
            CliClock::System(clock) => clock.now(),
            CliClock::Pinned(clock) => clock.now(),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second init (as in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.clone().or_else(default_config_path);
    let config = ReplyboiConfig::load(config_path.as_deref())?;

    if let Some(Commands::Config { template }) = &cli.command {
        return handle_config(&config, config_path, cli.data.clone(), *template);
    }

    let clock = CliClock::from_env()?;
    let ctx = initialize(config, cli.data.clone(), clock.clone())?;

    match cli.command {
        Some(Commands::Status { json }) => handle_status(&ctx, json),
        Some(Commands::Reply) => handle_result(ctx.api.record_reply()?),
        Some(Commands::Sync { count }) => handle_result(ctx.api.sync_count(count)?),
        Some(Commands::Goal { goal }) => handle_result(ctx.api.set_goal(goal)?),
        Some(Commands::Reset) => handle_result(ctx.api.reset_count()?),
        Some(Commands::Check) => handle_check(&ctx),
        Some(Commands::History) => handle_history(&ctx),
        Some(Commands::Send { message }) => handle_send(&ctx, &message),
        Some(Commands::Serve) => serve(&ctx.api, clock),
        Some(Commands::Mirror(cmd)) => handle_mirror(&ctx, cmd),
        Some(Commands::Config { .. }) => Ok(()),
        None => handle_status(&ctx, false),
    }
}

fn handle_result(result: CmdResult) -> Result<()> {
    print_messages(&result.messages);
    if let Some(report) = &result.broadcast {
        print_broadcast(report);
    }
    Ok(())
}

fn handle_status(ctx: &ReplyContext, json: bool) -> Result<()> {
    let result = ctx.api.get_data()?;
    let view = result.view();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }
    print_messages(&result.messages);
    print_status(&view, ctx.api.rollover_hour());
    Ok(())
}

fn handle_check(ctx: &ReplyContext) -> Result<()> {
    let result = ctx.api.check_rollover()?;
    if result.messages.is_empty() {
        if let Some(day) = result.state.current_day {
            println!("Still {}, nothing to roll over.", day);
        }
    }
    handle_result(result)
}

fn handle_history(ctx: &ReplyContext) -> Result<()> {
    let result = ctx.api.get_data()?;
    print_messages(&result.messages);
    print_history(&result.view());
    Ok(())
}

fn handle_send(ctx: &ReplyContext, message: &str) -> Result<()> {
    let response = ctx.api.handle_raw(message);
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

fn handle_mirror(ctx: &ReplyContext, cmd: MirrorCommands) -> Result<()> {
    let mirrors_dir = &ctx.paths.mirrors_dir;
    match cmd {
        MirrorCommands::Attach { name } => {
            FsMirror::new(mirrors_dir, &name)?.attach()?;
            println!("Mirror {} attached", name);
        }
        MirrorCommands::Detach { name } => {
            FsMirror::new(mirrors_dir, &name)?.detach()?;
            println!("Mirror {} detached", name);
        }
        MirrorCommands::Reply { name } => {
            let mirror = FsMirror::new(mirrors_dir, &name)?;
            if !mirror.exists() {
                anyhow::bail!("mirror {} is not attached", name);
            }
            // A rollover's reset must reach the inbox before the mirror drains it.
            let recorded = ctx.api.record_reply()?;
            let local = mirror
                .record_local_reply()
                .with_context(|| format!("mirror {} is not attached", name))?;
            let synced = ctx.api.sync_count(i64::from(local))?;
            print_messages(&recorded.messages);
            if let Some(report) = &recorded.broadcast {
                print_broadcast(report);
            }
            println!(
                "Mirror {} at {}, counter at {}",
                name, local, synced.state.today_count
            );
        }
        MirrorCommands::Show { name } => {
            let mirror = FsMirror::new(mirrors_dir, &name)?;
            if !mirror.exists() {
                anyhow::bail!("mirror {} does not exist", name);
            }
            let state = if mirror.is_loaded() { "loaded" } else { "not loaded" };
            println!("{}: {} ({})", name, mirror.count()?, state);
        }
    }
    Ok(())
}

fn handle_config(
    config: &ReplyboiConfig,
    config_path: Option<PathBuf>,
    data_override: Option<PathBuf>,
    template: bool,
) -> Result<()> {
    if template {
        print!("{}", ReplyboiConfig::template());
        return Ok(());
    }
    let data_dir = resolve_data_dir(data_override, config)?;
    match config_path {
        Some(path) => println!("config_file   = {}", path.display()),
        None => println!("config_file   = (none)"),
    }
    println!("rollover_hour = {}", config.rollover_hour);
    println!("data_dir      = {}", data_dir.display());
    Ok(())
}
