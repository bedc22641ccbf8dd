use crate::commands::{rollover, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::DayKey;
use crate::notify::Notifier;
use crate::store::StateStore;
use tracing::info;

/// Manual reset of today's count. Unlike a rollover, the day key and history
/// are left alone. Dependents are told to zero their mirrors.
pub fn run<S: StateStore>(store: &S, today: DayKey, notifier: &Notifier) -> Result<CmdResult> {
    let mut result = rollover::run(store, today, notifier)?;
    let previous = result.state.today_count;

    let state = result.state.clone().reset_count();
    result.commit(store, state)?;
    info!(previous, "count reset");

    result.broadcast = Some(notifier.broadcast_reset());
    result.add_message(CmdMessage::success("Count reset"));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CounterState;
    use crate::notify::mem_mirror::MemMirror;
    use crate::notify::DeliveryOutcome;
    use crate::store::mem_backend::MemStore;

    fn day(d: u32) -> DayKey {
        DayKey::from_ymd(2024, 1, d).unwrap()
    }

    #[test]
    fn test_zeroes_count_keeps_day_and_history() {
        let mut state = CounterState::new(day(1));
        state.today_count = 5;
        let (mut state, _) = state.roll_over(day(2));
        state.today_count = 9;
        let store = MemStore::with_state(&state);

        let result = run(&store, day(2), &Notifier::new()).unwrap();

        let stored = store.snapshot().unwrap();
        assert_eq!(stored.today_count, 0);
        assert_eq!(stored.current_day, state.current_day);
        assert_eq!(stored.history, state.history);
        assert_eq!(result.state, stored);
    }

    #[test]
    fn test_broadcasts_reset_to_dependents() {
        let store = MemStore::new();
        let loaded = MemMirror::new("loaded");
        loaded.set_count(4);
        let dormant = MemMirror::new("dormant");
        dormant.set_count(4);
        dormant.set_loaded(false);
        let notifier = Notifier::new()
            .with_target(loaded.clone())
            .with_target(dormant.clone());

        let result = run(&store, day(1), &notifier).unwrap();

        let report = result.broadcast.unwrap();
        assert_eq!(report.outcome_for("loaded"), Some(DeliveryOutcome::Delivered));
        assert_eq!(report.outcome_for("dormant"), Some(DeliveryOutcome::FellBack));
        assert_eq!(loaded.count(), 0);
        assert_eq!(dormant.count(), 0);
    }

    #[test]
    fn test_unreachable_dependents_do_not_fail_reset() {
        let mut state = CounterState::new(day(1));
        state.today_count = 6;
        let store = MemStore::with_state(&state);
        let gone = MemMirror::new("gone");
        gone.set_count(6);
        gone.set_loaded(false);
        gone.set_writable(false);

        let result = run(&store, day(1), &Notifier::new().with_target(gone.clone())).unwrap();

        assert_eq!(result.state.today_count, 0);
        assert_eq!(store.snapshot().unwrap().today_count, 0);
        assert_eq!(gone.count(), 6);
    }

    #[test]
    fn test_failed_save_skips_broadcast() {
        let mut state = CounterState::new(day(1));
        state.today_count = 6;
        let store = MemStore::with_state(&state);
        store.set_simulate_write_error(true);
        let tab = MemMirror::new("tab");
        tab.set_count(6);

        assert!(run(&store, day(1), &Notifier::new().with_target(tab.clone())).is_err());
        assert_eq!(tab.count(), 6);
        assert_eq!(store.snapshot().unwrap().today_count, 6);
    }
}
