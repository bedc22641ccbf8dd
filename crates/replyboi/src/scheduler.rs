//! # Rollover Scheduler
//!
//! Rollover happens lazily on every operation, so the scheduler only exists to
//! make the badge flip to `0` at the boundary even when nobody is replying.
//!
//! The scheduler derives a [`RolloverSchedule`] (the next boundary plus a 24h
//! period) and hands it to an [`Alarm`], the host's timer facility. When the
//! alarm goes off the host calls [`RolloverScheduler::on_fire`].
//!
//! Fixed 24h periods drift by an hour across DST changes. That is tolerated:
//! [`RolloverScheduler::start`] re-derives the schedule from scratch, and any
//! operation in between heals a late tick anyway.

use crate::api::ReplyApi;
use crate::commands::CmdResult;
use crate::day_key::next_rollover_after;
use crate::error::Result;
use crate::store::StateStore;
use chrono::{DateTime, FixedOffset, TimeDelta};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolloverSchedule {
    pub first_fire: DateTime<FixedOffset>,
    pub period: TimeDelta,
}

impl RolloverSchedule {
    pub fn derive(now: &DateTime<FixedOffset>, rollover_hour: u8) -> Self {
        Self {
            first_fire: next_rollover_after(now, rollover_hour),
            period: TimeDelta::hours(24),
        }
    }

    /// Wait from `now` until the first fire. Zero if it already passed.
    pub fn delay_from(&self, now: &DateTime<FixedOffset>) -> std::time::Duration {
        (self.first_fire - *now).to_std().unwrap_or_default()
    }
}

/// Host timer. Arming again replaces whatever was armed before.
pub trait Alarm {
    fn arm(&mut self, schedule: RolloverSchedule) -> Result<()>;
}

/// Remembers every schedule it was armed with.
#[derive(Debug, Default)]
pub struct RecordingAlarm {
    pub armed: Vec<RolloverSchedule>,
}

impl Alarm for RecordingAlarm {
    fn arm(&mut self, schedule: RolloverSchedule) -> Result<()> {
        self.armed.push(schedule);
        Ok(())
    }
}

pub struct RolloverScheduler<A: Alarm> {
    alarm: A,
    schedule: Option<RolloverSchedule>,
}

impl<A: Alarm> RolloverScheduler<A> {
    pub fn new(alarm: A) -> Self {
        Self {
            alarm,
            schedule: None,
        }
    }

    pub fn alarm_mut(&mut self) -> &mut A {
        &mut self.alarm
    }

    pub fn schedule(&self) -> Option<RolloverSchedule> {
        self.schedule
    }

    /// Arm the alarm for the next boundary, then catch up on any rollover that
    /// was missed while nothing was running.
    ///
    /// A failure to arm is logged; the catch-up check still runs.
    pub fn start<S: StateStore>(&mut self, api: &ReplyApi<S>) -> Result<CmdResult> {
        let schedule = RolloverSchedule::derive(&api.now(), api.rollover_hour());
        match self.alarm.arm(schedule) {
            Ok(()) => {
                debug!(first_fire = %schedule.first_fire, "rollover alarm armed");
                self.schedule = Some(schedule);
            }
            Err(e) => warn!(error = %e, "failed to arm rollover alarm"),
        }
        api.check_rollover()
    }

    pub fn on_fire<S: StateStore>(&self, api: &ReplyApi<S>) -> Result<CmdResult> {
        debug!("rollover alarm fired");
        api.check_rollover()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::ReplyError;
    use crate::model::{CounterState, DayKey};
    use crate::store::mem_backend::MemStore;

    struct BrokenAlarm;

    impl Alarm for BrokenAlarm {
        fn arm(&mut self, _schedule: RolloverSchedule) -> Result<()> {
            Err(ReplyError::Api("no timers here".to_string()))
        }
    }

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    #[test]
    fn test_derive_before_and_after_boundary() {
        let before = RolloverSchedule::derive(&at("2024-01-02T03:30:00+02:00"), 4);
        assert_eq!(before.first_fire, at("2024-01-02T04:00:00+02:00"));
        assert_eq!(before.period, TimeDelta::hours(24));

        let after = RolloverSchedule::derive(&at("2024-01-02T04:00:00+02:00"), 4);
        assert_eq!(after.first_fire, at("2024-01-03T04:00:00+02:00"));
    }

    #[test]
    fn test_delay_from() {
        let now = at("2024-01-02T03:30:00+00:00");
        let schedule = RolloverSchedule::derive(&now, 4);
        assert_eq!(schedule.delay_from(&now).as_secs(), 30 * 60);
        assert_eq!(
            schedule.delay_from(&at("2024-01-02T05:00:00+00:00")),
            std::time::Duration::ZERO
        );
    }

    #[test]
    fn test_start_arms_and_catches_up() {
        let day1 = DayKey::from_ymd(2024, 1, 1).unwrap();
        let mut state = CounterState::new(day1);
        state.today_count = 6;
        let api = ReplyApi::new(MemStore::with_state(&state), 4)
            .with_clock(FixedClock::parse("2024-01-03T09:00:00+00:00").unwrap());
        let mut scheduler = RolloverScheduler::new(RecordingAlarm::default());

        let result = scheduler.start(&api).unwrap();

        assert!(result.rollover.advanced());
        assert_eq!(result.state.history[0].count, 6);
        assert_eq!(scheduler.alarm_mut().armed.len(), 1);
        assert_eq!(
            scheduler.schedule().unwrap().first_fire,
            at("2024-01-04T04:00:00+00:00")
        );
    }

    #[test]
    fn test_restart_replaces_schedule() {
        let clock = FixedClock::parse("2024-01-01T09:00:00+00:00").unwrap();
        let api = ReplyApi::new(MemStore::new(), 4).with_clock(clock.clone());
        let mut scheduler = RolloverScheduler::new(RecordingAlarm::default());

        scheduler.start(&api).unwrap();
        clock.advance(TimeDelta::days(3));
        scheduler.start(&api).unwrap();

        assert_eq!(scheduler.alarm_mut().armed.len(), 2);
        assert_eq!(
            scheduler.schedule().unwrap().first_fire,
            at("2024-01-05T04:00:00+00:00")
        );
    }

    #[test]
    fn test_on_fire_rolls_over_once() {
        let clock = FixedClock::parse("2024-01-01T09:00:00+00:00").unwrap();
        let api = ReplyApi::new(MemStore::new(), 4).with_clock(clock.clone());
        let mut scheduler = RolloverScheduler::new(RecordingAlarm::default());
        scheduler.start(&api).unwrap();
        api.record_reply().unwrap();

        clock.set(at("2024-01-02T04:00:00+00:00"));
        assert!(scheduler.on_fire(&api).unwrap().rollover.advanced());
        assert!(!scheduler.on_fire(&api).unwrap().rollover.advanced());
    }

    #[test]
    fn test_arm_failure_still_checks_rollover() {
        let api = ReplyApi::new(MemStore::new(), 4)
            .with_clock(FixedClock::parse("2024-01-01T09:00:00+00:00").unwrap());
        let mut scheduler = RolloverScheduler::new(BrokenAlarm);

        let result = scheduler.start(&api).unwrap();

        assert!(result.created);
        assert!(scheduler.schedule().is_none());
    }
}
