use crate::commands::{rollover, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{validate_goal, DayKey};
use crate::notify::Notifier;
use crate::store::StateStore;

/// Change the daily goal. Out-of-range goals are rejected before the store is
/// read.
pub fn run<S: StateStore>(
    store: &S,
    today: DayKey,
    notifier: &Notifier,
    goal: i64,
) -> Result<CmdResult> {
    let goal = validate_goal(goal)?;

    let mut result = rollover::run(store, today, notifier)?;
    let state = result.state.clone().with_goal(goal);
    result.commit(store, state)?;
    result.add_message(CmdMessage::success(format!("Daily goal set to {}", goal)));
    Ok(result)
}
