//! # Counter State
//!
//! The whole installation is described by one [`CounterState`] record. Every
//! transition in this module is pure: it takes the state by value and hands a
//! new one back, so the command layer decides when (and whether) to persist.
//!
//! ## Persisted Shape
//!
//! ```text
//! {
//!   "today": 7,
//!   "date": "2024-01-01",
//!   "history": [{ "date": "2023-12-31", "count": 12, "goal": 20 }],
//!   "goal": 20
//! }
//! ```
//!
//! Decoding is lenient where the record may have been written by an older
//! version: a missing or non-positive `goal` reads as [`DEFAULT_GOAL`], a
//! missing, null or negative `today` reads as zero, and a missing or empty
//! `date` reads as unset.

use crate::error::{ReplyError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_GOAL: u32 = 20;
pub const MIN_GOAL: u32 = 1;
pub const MAX_GOAL: u32 = 999;

/// Number of archived days kept in [`CounterState::history`].
pub const HISTORY_LIMIT: usize = 30;

/// Calendar day a count belongs to, as produced by [`crate::day_key::day_key_of`].
///
/// Ordering follows the calendar, which is what the monotonic-day check relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Self)
    }
}

/// One archived day. Never modified after rollover creates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "date")]
    pub day: DayKey,
    pub count: u32,
    #[serde(default = "default_goal", deserialize_with = "goal_or_default")]
    pub goal: u32,
}

impl HistoryEntry {
    pub fn met_goal(&self) -> bool {
        self.count >= self.goal
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    #[serde(rename = "today", default, deserialize_with = "count_or_zero")]
    pub today_count: u32,
    /// `None` only before the first rollover check of a fresh or migrated record.
    #[serde(rename = "date", default, deserialize_with = "day_or_unset")]
    pub current_day: Option<DayKey>,
    /// Most recent first, at most [`HISTORY_LIMIT`] entries.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default = "default_goal", deserialize_with = "goal_or_default")]
    pub goal: u32,
}

/// What a rollover check did to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rollover {
    /// The stored day is today; nothing changed.
    Current,
    /// The state moved to a new day. `archived` is the entry pushed onto
    /// history, absent when the previous day was unset.
    Advanced {
        from: Option<DayKey>,
        archived: Option<HistoryEntry>,
    },
    /// The stored day is later than today (the clock went backwards).
    /// Left untouched so the day never moves backwards.
    ClockBehind { stored: DayKey },
}

impl Rollover {
    pub fn advanced(&self) -> bool {
        matches!(self, Rollover::Advanced { .. })
    }
}

impl CounterState {
    /// A fresh record for a first install.
    pub fn new(day: DayKey) -> Self {
        Self {
            today_count: 0,
            current_day: Some(day),
            history: Vec::new(),
            goal: DEFAULT_GOAL,
        }
    }

    /// The older format stored nothing but the running count.
    pub fn from_legacy_count(count: u32) -> Self {
        Self {
            today_count: count,
            current_day: None,
            history: Vec::new(),
            goal: DEFAULT_GOAL,
        }
    }

    pub fn roll_over(mut self, today: DayKey) -> (Self, Rollover) {
        match self.current_day {
            Some(day) if day == today => (self, Rollover::Current),
            Some(day) if day > today => (self, Rollover::ClockBehind { stored: day }),
            previous => {
                let archived = previous.map(|day| HistoryEntry {
                    day,
                    count: self.today_count,
                    goal: self.goal,
                });
                if let Some(entry) = &archived {
                    self.history.insert(0, entry.clone());
                    self.history.truncate(HISTORY_LIMIT);
                }
                self.today_count = 0;
                self.current_day = Some(today);
                (
                    self,
                    Rollover::Advanced {
                        from: previous,
                        archived,
                    },
                )
            }
        }
    }

    pub fn record_reply(mut self) -> Self {
        self.today_count = self.today_count.saturating_add(1);
        self
    }

    /// Max-wins reconciliation. Returns whether `observed` was adopted.
    pub fn adopt_count(mut self, observed: u32) -> (Self, bool) {
        if observed > self.today_count {
            self.today_count = observed;
            (self, true)
        } else {
            (self, false)
        }
    }

    pub fn with_goal(mut self, goal: u32) -> Self {
        self.goal = goal;
        self
    }

    /// Manual reset: the day and the history stay as they are.
    pub fn reset_count(mut self) -> Self {
        self.today_count = 0;
        self
    }

    pub fn goal_met(&self) -> bool {
        self.today_count >= self.goal
    }
}

/// Checks a requested goal against the accepted range.
pub fn validate_goal(goal: i64) -> Result<u32> {
    u32::try_from(goal)
        .ok()
        .filter(|g| (MIN_GOAL..=MAX_GOAL).contains(g))
        .ok_or(ReplyError::InvalidGoal(goal))
}

fn default_goal() -> u32 {
    DEFAULT_GOAL
}

fn goal_or_default<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|goal| validate_goal(goal).ok())
        .unwrap_or(DEFAULT_GOAL))
}

fn count_or_zero<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.and_then(|count| u32::try_from(count).ok()).unwrap_or(0))
}

fn day_or_unset<'de, D>(deserializer: D) -> std::result::Result<Option<DayKey>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> DayKey {
        DayKey::from_ymd(2024, 1, d).unwrap()
    }

    #[test]
    fn test_new_state_defaults() {
        let state = CounterState::new(day(1));
        assert_eq!(state.today_count, 0);
        assert_eq!(state.current_day, Some(day(1)));
        assert!(state.history.is_empty());
        assert_eq!(state.goal, 20);
    }

    #[test]
    fn test_roll_over_same_day_is_noop() {
        let state = CounterState::new(day(1)).record_reply();
        let (rolled, outcome) = state.clone().roll_over(day(1));
        assert_eq!(outcome, Rollover::Current);
        assert_eq!(rolled, state);
    }

    #[test]
    fn test_roll_over_archives_previous_day() {
        let mut state = CounterState::new(day(1));
        state.today_count = 7;

        let (rolled, outcome) = state.roll_over(day(2));

        let expected = HistoryEntry {
            day: day(1),
            count: 7,
            goal: 20,
        };
        assert_eq!(
            outcome,
            Rollover::Advanced {
                from: Some(day(1)),
                archived: Some(expected.clone()),
            }
        );
        assert_eq!(rolled.history, vec![expected]);
        assert_eq!(rolled.today_count, 0);
        assert_eq!(rolled.current_day, Some(day(2)));
    }

    #[test]
    fn test_roll_over_from_unset_does_not_archive() {
        let state = CounterState::from_legacy_count(9);
        let (rolled, outcome) = state.roll_over(day(3));
        assert_eq!(
            outcome,
            Rollover::Advanced {
                from: None,
                archived: None
            }
        );
        assert!(rolled.history.is_empty());
        assert_eq!(rolled.today_count, 0);
        assert_eq!(rolled.current_day, Some(day(3)));
    }

    #[test]
    fn test_roll_over_is_idempotent() {
        let mut state = CounterState::new(day(1));
        state.today_count = 4;
        let (once, _) = state.roll_over(day(2));
        let (twice, outcome) = once.clone().roll_over(day(2));
        assert_eq!(outcome, Rollover::Current);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_roll_over_with_clock_behind_keeps_state() {
        let mut state = CounterState::new(day(5));
        state.today_count = 3;
        let (rolled, outcome) = state.clone().roll_over(day(4));
        assert_eq!(outcome, Rollover::ClockBehind { stored: day(5) });
        assert_eq!(rolled, state);
    }

    #[test]
    fn test_history_is_bounded_and_drops_oldest() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut state = CounterState::new(DayKey::new(start));

        for offset in 1..=40u32 {
            state.today_count = offset;
            let next = DayKey::new(start + chrono::Days::new(offset as u64));
            state = state.roll_over(next).0;
            assert!(state.history.len() <= HISTORY_LIMIT);
        }

        assert_eq!(state.history.len(), HISTORY_LIMIT);
        // Newest first: the last archived day had count 40.
        assert_eq!(state.history[0].count, 40);
        assert_eq!(state.history[HISTORY_LIMIT - 1].count, 11);
    }

    #[test]
    fn test_adopt_count_is_max_wins() {
        let mut state = CounterState::new(day(1));
        state.today_count = 5;

        let (state, adopted) = state.adopt_count(12);
        assert!(adopted);
        assert_eq!(state.today_count, 12);

        let (state, adopted) = state.adopt_count(3);
        assert!(!adopted);
        assert_eq!(state.today_count, 12);

        let (state, adopted) = state.adopt_count(12);
        assert!(!adopted);
        assert_eq!(state.today_count, 12);
    }

    #[test]
    fn test_reset_keeps_day_and_history() {
        let mut state = CounterState::new(day(1));
        state.today_count = 6;
        let (mut state, _) = state.roll_over(day(2));
        state.today_count = 9;

        let reset = state.clone().reset_count();
        assert_eq!(reset.today_count, 0);
        assert_eq!(reset.current_day, state.current_day);
        assert_eq!(reset.history, state.history);
    }

    #[test]
    fn test_validate_goal_bounds() {
        assert!(validate_goal(0).is_err());
        assert!(validate_goal(-5).is_err());
        assert!(validate_goal(1000).is_err());
        assert!(validate_goal(i64::MAX).is_err());
        assert_eq!(validate_goal(1).unwrap(), 1);
        assert_eq!(validate_goal(999).unwrap(), 999);
    }

    #[test]
    fn test_persisted_shape_uses_short_keys() {
        let mut state = CounterState::new(day(1));
        state.today_count = 7;
        let (state, _) = state.roll_over(day(2));

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["today"], 0);
        assert_eq!(value["date"], "2024-01-02");
        assert_eq!(value["goal"], 20);
        assert_eq!(value["history"][0]["date"], "2024-01-01");
        assert_eq!(value["history"][0]["count"], 7);
        assert_eq!(value["history"][0]["goal"], 20);
    }

    #[test]
    fn test_decode_fills_missing_goal_and_history() {
        let state: CounterState = serde_json::from_str(r#"{"today": 4, "date": "2024-01-01"}"#)
            .unwrap();
        assert_eq!(state.goal, DEFAULT_GOAL);
        assert!(state.history.is_empty());
        assert_eq!(state.today_count, 4);
    }

    #[test]
    fn test_decode_replaces_invalid_goal() {
        let state: CounterState =
            serde_json::from_str(r#"{"today": 1, "date": "2024-01-01", "goal": 0}"#).unwrap();
        assert_eq!(state.goal, DEFAULT_GOAL);

        let state: CounterState =
            serde_json::from_str(r#"{"today": 1, "date": "2024-01-01", "goal": null}"#).unwrap();
        assert_eq!(state.goal, DEFAULT_GOAL);
    }

    #[test]
    fn test_decode_null_or_negative_today_is_zero() {
        let state: CounterState =
            serde_json::from_str(r#"{"today": null, "date": "2024-01-01", "goal": 12}"#).unwrap();
        assert_eq!(state.today_count, 0);
        assert_eq!(state.goal, 12);

        let state: CounterState =
            serde_json::from_str(r#"{"today": -3, "date": "2024-01-01"}"#).unwrap();
        assert_eq!(state.today_count, 0);
    }

    #[test]
    fn test_decode_empty_date_is_unset() {
        let state: CounterState = serde_json::from_str(r#"{"today": 2, "date": ""}"#).unwrap();
        assert_eq!(state.current_day, None);
    }

    #[test]
    fn test_day_key_round_trips_through_display() {
        let key: DayKey = "2024-02-29".parse().unwrap();
        assert_eq!(key.to_string(), "2024-02-29");
        assert!("2024-02-30".parse::<DayKey>().is_err());
    }
}
