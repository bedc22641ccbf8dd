//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every counter operation, whichever UI drives it.
//!
//! ## Role and Responsibilities
//!
//! For each operation the facade:
//! - **Locks** the store for the whole read-modify-write
//! - **Computes today** from the injected [`Clock`] and the rollover hour
//! - **Dispatches** to the command function
//! - **Renders** the badge when the command wrote something
//!
//! Render failures are logged and swallowed: by then the state is durable.
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Printing**: Returns [`CmdResult`], never strings for a terminal
//!
//! ## Protocol Dispatch
//!
//! [`ReplyApi::handle`] maps a [`Request`] to its operation and folds the
//! outcome into a [`Response`]. Errors never escape it; they become
//! `{"success": false, "error": ...}`.
//!
//! ## Generic Over StateStore
//!
//! - Production: `ReplyApi<FsStore>`
//! - Testing: `ReplyApi<MemStore>`

use crate::clock::{Clock, SystemClock};
use crate::commands::{self, CmdResult};
use crate::day_key::day_key_of;
use crate::error::Result;
use crate::model::DayKey;
use crate::notify::Notifier;
use crate::protocol::{Request, Response};
use crate::render::{NullRenderer, Renderer};
use crate::store::StateStore;
use chrono::{DateTime, FixedOffset};
use tracing::{debug, warn};

pub struct ReplyApi<S: StateStore> {
    store: S,
    clock: Box<dyn Clock>,
    rollover_hour: u8,
    renderer: Box<dyn Renderer>,
    notifier: Notifier,
}

impl<S: StateStore> ReplyApi<S> {
    pub fn new(store: S, rollover_hour: u8) -> Self {
        Self {
            store,
            clock: Box::new(SystemClock),
            rollover_hour,
            renderer: Box::new(NullRenderer),
            notifier: Notifier::new(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn rollover_hour(&self) -> u8 {
        self.rollover_hour
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    pub fn today(&self) -> DayKey {
        day_key_of(&self.clock.now(), self.rollover_hour)
    }

    pub fn check_rollover(&self) -> Result<CmdResult> {
        self.locked(commands::rollover::run)
    }

    pub fn record_reply(&self) -> Result<CmdResult> {
        self.locked(commands::record::run)
    }

    pub fn sync_count(&self, observed: i64) -> Result<CmdResult> {
        self.locked(|store, today, notifier| {
            commands::sync::run(store, today, notifier, observed)
        })
    }

    pub fn set_goal(&self, goal: i64) -> Result<CmdResult> {
        self.locked(|store, today, notifier| commands::goal::run(store, today, notifier, goal))
    }

    pub fn reset_count(&self) -> Result<CmdResult> {
        self.locked(commands::reset::run)
    }

    pub fn get_data(&self) -> Result<CmdResult> {
        self.locked(commands::data::run)
    }

    /// Answer one protocol request.
    pub fn handle(&self, request: &Request) -> Response {
        debug!(?request, "handling request");
        let outcome = match request {
            Request::ReplySent => self.record_reply().map(|_| Response::ok()),
            Request::SyncCount { count } => self.sync_count(*count).map(|_| Response::ok()),
            Request::GetData => self.get_data().map(|r| Response::Data(r.view())),
            Request::SetGoal { goal } => self.set_goal(*goal).map(|_| Response::ok()),
            Request::ResetCount => self.reset_count().map(|_| Response::ok()),
        };
        outcome.unwrap_or_else(|e| {
            warn!(error = %e, "request failed");
            Response::failed(e.to_string())
        })
    }

    /// Parse and answer one raw JSON message.
    pub fn handle_raw(&self, raw: &str) -> Response {
        match Request::parse(raw) {
            Ok(request) => self.handle(&request),
            Err(e) => {
                debug!(error = %e, "unparseable message");
                Response::failed(format!("invalid message: {}", e))
            }
        }
    }

    fn locked<F>(&self, op: F) -> Result<CmdResult>
    where
        F: FnOnce(&S, DayKey, &Notifier) -> Result<CmdResult>,
    {
        let _guard = self.store.lock()?;
        let result = op(&self.store, self.today(), &self.notifier)?;
        if result.persisted {
            if let Err(e) = self.renderer.render(result.badge()) {
                warn!(error = %e, "failed to render badge");
            }
        }
        Ok(result)
    }
}
