use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{CounterState, DayKey, Rollover};
use crate::notify::Notifier;
use crate::store::StateStore;
use tracing::{info, warn};

/// Bring the record up to `today`, creating it on first use.
///
/// Idempotent: a second call with the same `today` changes nothing and
/// writes nothing.
pub fn run<S: StateStore>(store: &S, today: DayKey, notifier: &Notifier) -> Result<CmdResult> {
    let (state, created) = match store.load()? {
        Some(state) => (state, false),
        None => {
            let state = CounterState::new(today);
            store.save(&state)?;
            info!(day = %today, "created counter record");
            (state, true)
        }
    };

    let (state, rollover) = state.roll_over(today);
    let mut result = CmdResult::new(state, Rollover::Current);
    result.created = created;
    result.persisted = created;

    match &rollover {
        Rollover::Current => {}
        Rollover::Advanced { from, archived } => {
            let state = result.state.clone();
            result.commit(store, state)?;
            match archived {
                Some(entry) => {
                    info!(from = %entry.day, to = %today, count = entry.count, goal = entry.goal, "rolled over");
                    result.add_message(CmdMessage::info(format!(
                        "New day {}: archived {} with {}/{}",
                        today, entry.day, entry.count, entry.goal
                    )));
                }
                None => {
                    info!(to = %today, had_day = from.is_some(), "adopted day for record without one");
                }
            }
            result.broadcast = Some(notifier.broadcast_reset());
        }
        Rollover::ClockBehind { stored } => {
            warn!(stored = %stored, today = %today, "clock is behind the stored day, leaving record as is");
            result.add_message(CmdMessage::warning(format!(
                "Clock reads {} but the counter is already on {}",
                today, stored
            )));
        }
    }
    result.rollover = rollover;

    Ok(result)
}
