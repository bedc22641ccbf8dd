use super::{decode_record, encode_record, StateStore, STORAGE_KEY};
use crate::error::{ReplyError, Result};
use crate::model::CounterState;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory key-value store for testing.
///
/// Uses `RefCell` for interior mutability since the counter is single-threaded,
/// which lets the `StateStore` trait use `&self` for all methods.
#[derive(Default)]
pub struct MemStore {
    records: RefCell<HashMap<String, String>>,
    simulate_read_error: Cell<bool>,
    simulate_write_error: Cell<bool>,
    saves: Cell<usize>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `state`.
    pub fn with_state(state: &CounterState) -> Self {
        let store = Self::new();
        store.put_raw(&encode_record(state).unwrap_or_default());
        store
    }

    /// Seed the record with raw JSON, e.g. a legacy bare count.
    pub fn put_raw(&self, raw: &str) {
        self.records
            .borrow_mut()
            .insert(STORAGE_KEY.to_string(), raw.to_string());
    }

    pub fn raw(&self) -> Option<String> {
        self.records.borrow().get(STORAGE_KEY).cloned()
    }

    /// The record as currently stored, bypassing simulated failures.
    pub fn snapshot(&self) -> Option<CounterState> {
        self.raw().and_then(|raw| decode_record(&raw).ok())
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.set(simulate);
    }

    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }
}

impl StateStore for MemStore {
    fn load(&self) -> Result<Option<CounterState>> {
        if self.simulate_read_error.get() {
            return Err(ReplyError::Store("Simulated read error".to_string()));
        }
        self.raw().map(|raw| decode_record(&raw)).transpose()
    }

    fn save(&self, state: &CounterState) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(ReplyError::Store("Simulated write error".to_string()));
        }
        let raw = encode_record(state)?;
        self.put_raw(&raw);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
