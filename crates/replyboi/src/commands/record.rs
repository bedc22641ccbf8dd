use crate::commands::{rollover, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::DayKey;
use crate::notify::Notifier;
use crate::store::StateStore;
use tracing::debug;

pub fn run<S: StateStore>(store: &S, today: DayKey, notifier: &Notifier) -> Result<CmdResult> {
    let mut result = rollover::run(store, today, notifier)?;
    let was_met = result.state.goal_met();

    let state = result.state.clone().record_reply();
    result.commit(store, state)?;
    debug!(today = result.state.today_count, "reply recorded");

    result.add_message(CmdMessage::success(format!(
        "Reply recorded: {}/{}",
        result.state.today_count, result.state.goal
    )));
    if !was_met && result.state.goal_met() {
        result.add_message(CmdMessage::success("Daily goal reached!"));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CounterState;
    use crate::store::mem_backend::MemStore;

    fn day(d: u32) -> DayKey {
        DayKey::from_ymd(2024, 1, d).unwrap()
    }

    #[test]
    fn test_counts_every_call() {
        let store = MemStore::new();
        let notifier = Notifier::new();

        for expected in 1..=5 {
            let result = run(&store, day(1), &notifier).unwrap();
            assert_eq!(result.state.today_count, expected);
        }
        assert_eq!(store.snapshot().unwrap().today_count, 5);
    }

    #[test]
    fn test_rolls_over_before_counting() {
        let mut state = CounterState::new(day(1));
        state.today_count = 11;
        let store = MemStore::with_state(&state);

        let result = run(&store, day(2), &Notifier::new()).unwrap();

        assert!(result.rollover.advanced());
        assert_eq!(result.state.today_count, 1);
        assert_eq!(result.state.history[0].count, 11);
    }

    #[test]
    fn test_announces_goal_once() {
        let mut state = CounterState::new(day(1)).with_goal(2);
        state.today_count = 1;
        let store = MemStore::with_state(&state);
        let notifier = Notifier::new();

        let reached = run(&store, day(1), &notifier).unwrap();
        assert!(reached
            .messages
            .iter()
            .any(|m| m.content == "Daily goal reached!"));

        let past = run(&store, day(1), &notifier).unwrap();
        assert!(!past.messages.iter().any(|m| m.content == "Daily goal reached!"));
    }

    #[test]
    fn test_write_failure_keeps_count() {
        let mut state = CounterState::new(day(1));
        state.today_count = 4;
        let store = MemStore::with_state(&state);
        store.set_simulate_write_error(true);

        assert!(run(&store, day(1), &Notifier::new()).is_err());
        assert_eq!(store.snapshot().unwrap().today_count, 4);
    }

    #[test]
    fn test_read_failure_is_reported() {
        let store = MemStore::new();
        store.set_simulate_read_error(true);
        assert!(run(&store, day(1), &Notifier::new()).is_err());
        assert!(store.raw().is_none());
    }
}
