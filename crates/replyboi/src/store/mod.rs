//! # Storage Layer
//!
//! The counter keeps exactly one record, stored under the fixed key
//! [`STORAGE_KEY`]. The [`StateStore`] trait is the whole persistence surface
//! the state machine sees: load the record, save the record, and hold an
//! exclusive lock across a read-modify-write.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsStore`]: Production storage
//!   - Record in `<data_dir>/replyCount.json`, written atomically (tmp + rename)
//!   - Advisory lock on `<data_dir>/replyCount.lock` so concurrent processes
//!     cannot lose an increment
//!
//! - [`mem_backend::MemStore`]: In-memory storage for testing
//!   - Holds raw JSON per key, so decoding is exercised the same way
//!   - Can simulate read and write failures
//!
//! ## Record Format
//!
//! Current records are the JSON object described in [`crate::model`]. Older
//! installs stored a bare integer (just the count); [`decode_record`] accepts
//! both and migrates the latter to a record with an unset day.
//!
//! ## Failure Model
//!
//! Stores are fail-stop per call. Nothing here retries: the next reply event or
//! scheduler tick will simply try again.

use crate::error::Result;
use crate::model::CounterState;
use serde::Deserialize;

pub mod fs_backend;
pub mod lock;
pub mod mem_backend;

pub use lock::StoreLock;

/// The one key the counter record lives under.
pub const STORAGE_KEY: &str = "replyCount";

pub trait StateStore {
    /// Load the record. `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> Result<Option<CounterState>>;

    /// Replace the record. MUST be atomic: a failed save leaves the previous
    /// record intact.
    fn save(&self, state: &CounterState) -> Result<()>;

    /// Hold exclusive access until the returned guard drops.
    ///
    /// Callers take this once per operation; implementations need not be
    /// reentrant.
    fn lock(&self) -> Result<StoreLock> {
        Ok(StoreLock::unlocked())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRecord {
    Legacy(u32),
    Current(CounterState),
}

/// Decode a stored record, migrating the legacy bare-count format.
pub fn decode_record(raw: &str) -> Result<CounterState> {
    let record: StoredRecord = serde_json::from_str(raw)?;
    Ok(match record {
        StoredRecord::Legacy(count) => CounterState::from_legacy_count(count),
        StoredRecord::Current(state) => state,
    })
}

pub fn encode_record(state: &CounterState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DayKey, DEFAULT_GOAL};

    #[test]
    fn test_decode_legacy_count() {
        let state = decode_record("12").unwrap();
        assert_eq!(state.today_count, 12);
        assert_eq!(state.current_day, None);
        assert_eq!(state.goal, DEFAULT_GOAL);
    }

    #[test]
    fn test_decode_current_record() {
        let state = decode_record(
            r#"{"today": 3, "date": "2024-01-05", "goal": 15,
                "history": [{"date": "2024-01-04", "count": 18, "goal": 15}]}"#,
        )
        .unwrap();
        assert_eq!(state.today_count, 3);
        assert_eq!(state.current_day, DayKey::from_ymd(2024, 1, 5));
        assert_eq!(state.goal, 15);
        assert_eq!(state.history.len(), 1);
        assert!(state.history[0].met_goal());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_record("not json").is_err());
        assert!(decode_record(r#""a string""#).is_err());
    }

    #[test]
    fn test_encode_then_decode_preserves_state() {
        let state = CounterState::new(DayKey::from_ymd(2024, 6, 1).unwrap()).record_reply();
        let decoded = decode_record(&encode_record(&state).unwrap()).unwrap();
        assert_eq!(decoded, state);
    }
}
