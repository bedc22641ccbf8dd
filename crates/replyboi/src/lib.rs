//! # Replyboi Architecture
//!
//! Replyboi counts the replies you send each day, shows the running count as a
//! badge, tracks a daily goal and keeps thirty days of history. A day ends at
//! a configurable local hour (4am by default), not at midnight.
//!
//! It is a library first. The `replyboi` binary is one client; anything that
//! can speak the JSON [`protocol`] is another.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (replyboi-cli crate)                                   │
//! │  - Parses arguments, prints, owns the tokio runtime         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Locks the store, computes today, renders the badge       │
//! │  - Dispatches protocol requests                             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Rollover first, then one transition, then persist        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Model (model.rs) and Storage (store/)                      │
//! │  - Pure state transitions on CounterState                   │
//! │  - StateStore trait: FsStore (production), MemStore (tests) │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Time
//!
//! Nothing below the API reads a clock. The API asks its [`clock::Clock`] for
//! now, turns that into a [`model::DayKey`] with [`day_key::day_key_of`], and
//! passes the key down. Tests pin the clock with [`clock::FixedClock`].
//!
//! ## Dependents
//!
//! Other contexts may keep their own copy of today's count. They are
//! reconciled two ways: they push their count up with `SYNC_COUNT` (max wins),
//! and the owner pushes `RESET_LOCAL` down through the [`notify::Notifier`]
//! whenever the count is zeroed.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per operation
//! - [`model`]: `CounterState`, `DayKey`, `HistoryEntry` and their transitions
//! - [`day_key`]: Mapping instants to counter days
//! - [`clock`]: Injected time source
//! - [`scheduler`]: Fires the rollover check at the day boundary
//! - [`store`]: Storage abstraction, file and memory backends, locking
//! - [`notify`]: Reset broadcast to dependent mirrors
//! - [`render`]: Badge projection
//! - [`protocol`]: JSON messages
//! - [`display`]: Views with labels for UIs
//! - [`config`]: Configuration loading
//! - [`init`]: Wiring a filesystem-backed context
//! - [`error`]: Error types

pub mod api;
pub mod clock;
pub mod commands;
pub mod config;
pub mod day_key;
pub mod display;
pub mod error;
pub mod init;
pub mod model;
pub mod notify;
pub mod protocol;
pub mod render;
pub mod scheduler;
pub mod store;
