//! # Command Layer
//!
//! Each counter operation lives in its own submodule as a plain function over
//! a [`StateStore`], today's [`DayKey`] and the reset [`Notifier`]. Commands
//! never look at a clock, never render and never take locks; the API facade
//! does all three around them.
//!
//! ## Rollover First
//!
//! Every command starts with [`rollover::run`], so the count it reads or
//! changes always belongs to today. That makes the scheduler a convenience:
//! a missed tick is healed by the next command.
//!
//! ## Structured Returns
//!
//! Commands return [`CmdResult`]: the state after the operation, what the
//! rollover check did, whether anything was written, the broadcast report if a
//! reset went out, and messages for the UI to show.
//!
//! ## Command Modules
//!
//! - [`rollover`]: Archive a finished day and start today
//! - [`record`]: Count one reply
//! - [`sync`]: Reconcile a dependent mirror's count (max wins)
//! - [`goal`]: Change the daily goal
//! - [`reset`]: Manually zero today's count
//! - [`data`]: Read the record

use crate::display::DataView;
use crate::error::Result;
use crate::model::{CounterState, Rollover};
use crate::notify::BroadcastReport;
use crate::render::Badge;
use crate::store::StateStore;
use serde::Serialize;

pub mod data;
pub mod goal;
pub mod record;
pub mod reset;
pub mod rollover;
pub mod sync;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug)]
pub struct CmdResult {
    pub state: CounterState,
    pub rollover: Rollover,
    /// The record did not exist and was created by this call.
    pub created: bool,
    /// Something was written to the store.
    pub persisted: bool,
    pub broadcast: Option<BroadcastReport>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn new(state: CounterState, rollover: Rollover) -> Self {
        Self {
            state,
            rollover,
            created: false,
            persisted: false,
            broadcast: None,
            messages: Vec::new(),
        }
    }

    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    /// Save `state` and make it the result's state. On failure nothing changes.
    pub(crate) fn commit<S: StateStore>(&mut self, store: &S, state: CounterState) -> Result<()> {
        store.save(&state)?;
        self.state = state;
        self.persisted = true;
        Ok(())
    }

    pub fn badge(&self) -> Badge {
        Badge::new(self.state.today_count, self.state.goal)
    }

    pub fn view(&self) -> DataView {
        DataView::from_state(&self.state)
    }
}
