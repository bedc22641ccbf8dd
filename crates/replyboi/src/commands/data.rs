use crate::commands::{rollover, CmdResult};
use crate::error::Result;
use crate::model::DayKey;
use crate::notify::Notifier;
use crate::store::StateStore;

/// Read the record for display. Runs the rollover check first so a stale
/// count from yesterday is never shown as today's.
pub fn run<S: StateStore>(store: &S, today: DayKey, notifier: &Notifier) -> Result<CmdResult> {
    rollover::run(store, today, notifier)
}
