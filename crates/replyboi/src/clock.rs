use chrono::{DateTime, FixedOffset, Local, TimeDelta};
use std::cell::Cell;
use std::rc::Rc;

/// Source of "now" for the counter.
///
/// The offset travels with the instant, so day keys depend only on the value
/// returned here and never on the process's time zone.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep a handle after boxing
/// one into the API.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Rc<Cell<DateTime<FixedOffset>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    /// Parse an RFC 3339 timestamp such as `2024-01-02T05:00:00+01:00`.
    pub fn parse(rfc3339: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(rfc3339).ok().map(Self::new)
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: TimeDelta) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now.get()
    }
}
