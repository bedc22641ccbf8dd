//! Reconcile a dependent mirror's count with the authoritative one.
//!
//! Max wins: both sides count the same stream of replies, so a lower observed
//! value only means the observer is stale. The count never goes down here.
//!
//! Known limitation: a mirror that slept through a whole rollover and was never
//! reset can report yesterday's total, and it will be adopted as today's.

use crate::commands::{rollover, CmdMessage, CmdResult};
use crate::error::{ReplyError, Result};
use crate::model::DayKey;
use crate::notify::Notifier;
use crate::store::StateStore;
use tracing::info;

pub fn run<S: StateStore>(
    store: &S,
    today: DayKey,
    notifier: &Notifier,
    observed: i64,
) -> Result<CmdResult> {
    // A negative observation can never win, so it is just a no-op.
    let observed = if observed < 0 {
        0
    } else {
        u32::try_from(observed).map_err(|_| ReplyError::InvalidCount(observed))?
    };

    let mut result = rollover::run(store, today, notifier)?;
    let previous = result.state.today_count;
    let (state, adopted) = result.state.clone().adopt_count(observed);

    if adopted {
        result.commit(store, state)?;
        info!(previous, adopted = observed, "adopted higher count from mirror");
        result.add_message(CmdMessage::info(format!(
            "Count synced: {} -> {}",
            previous, observed
        )));
    } else {
        result.add_message(CmdMessage::info(format!(
            "Count unchanged at {}",
            previous
        )));
    }
    Ok(result)
}
