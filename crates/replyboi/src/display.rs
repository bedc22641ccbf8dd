//! Read-only projections of [`CounterState`] for clients.
//!
//! Labels such as `Mon, Jan 1` are derived on every read and never stored.

use crate::model::{CounterState, DayKey, HistoryEntry};
use serde::{Deserialize, Serialize};

pub fn format_day_label(day: &DayKey) -> String {
    day.date().format("%a, %b %-d").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryView {
    pub date: DayKey,
    pub count: u32,
    pub goal: u32,
    pub label: String,
    pub met_goal: bool,
}

impl From<&HistoryEntry> for HistoryView {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            date: entry.day,
            count: entry.count,
            goal: entry.goal,
            label: format_day_label(&entry.day),
            met_goal: entry.met_goal(),
        }
    }
}

/// The `GET_DATA` payload: the full record plus labelled history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataView {
    pub today: u32,
    pub date: Option<DayKey>,
    pub goal: u32,
    pub history: Vec<HistoryView>,
}

impl DataView {
    pub fn from_state(state: &CounterState) -> Self {
        Self {
            today: state.today_count,
            date: state.current_day,
            goal: state.goal,
            history: state.history.iter().map(HistoryView::from).collect(),
        }
    }

    pub fn goal_met(&self) -> bool {
        self.today >= self.goal
    }

    /// Consecutive archived days, newest first, that met their goal.
    pub fn streak(&self) -> usize {
        self.history.iter().take_while(|h| h.met_goal).count()
    }
}
