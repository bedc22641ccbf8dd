//! # CLI Behavior
//!
//! This is **one possible UI client** for replyboi, not the application
//! itself. It is the only place that knows about terminal I/O, exit codes and
//! output formatting.
//!
//! ### Naked Execution (`replyboi`)
//!
//! Running `replyboi` with no arguments shows today's status. Checking the
//! count is most of the usage, so it is the path of least resistance.
//!
//! ### Clock Pinning
//!
//! `REPLYBOI_NOW=2024-01-02T05:00:00+01:00` pins the clock for one
//! invocation. Scripts and tests use it to step across day boundaries.
//!
//! ### Acting as a Dependent
//!
//! `replyboi mirror reply <name>` plays the part of a dependent context: it
//! counts locally, reports the reply, then pushes its local count with
//! `SYNC_COUNT`.
//!
//! ## Module Structure
//!
//! - `commands`: Dispatch and per-command handlers
//! - `render`: Output formatting
//! - `serve`: Line protocol over stdin/stdout with the rollover timer
//! - `setup`: Argument parsing via clap
//! - `styles`: Terminal styles

mod commands;
mod render;
mod serve;
pub mod setup;
mod styles;

pub use commands::run;
