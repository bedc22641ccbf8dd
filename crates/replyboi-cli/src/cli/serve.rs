//! # Serve Mode
//!
//! Reads JSON protocol messages from stdin, one per line, and answers each on
//! stdout with one JSON line. The rollover scheduler runs alongside, backed by
//! a tokio interval.
//!
//! Messages and timer ticks are handled on one task through `select!`, so two
//! operations never interleave and no lock beyond the store's is needed.

use super::commands::CliClock;
use anyhow::{Context, Result};
use replyboi::api::ReplyApi;
use replyboi::clock::Clock;
use replyboi::error::ReplyError;
use replyboi::scheduler::{Alarm, RolloverSchedule, RolloverScheduler};
use replyboi::store::StateStore;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// [`Alarm`] backed by `tokio::time::interval_at`. Ticks missed while the
/// process was busy or suspended are delayed, not fired in a burst.
pub struct IntervalAlarm {
    clock: CliClock,
    interval: Option<Interval>,
}

impl IntervalAlarm {
    pub fn new(clock: CliClock) -> Self {
        Self {
            clock,
            interval: None,
        }
    }

    /// Resolves at the next armed tick. Never resolves while unarmed.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Alarm for IntervalAlarm {
    fn arm(&mut self, schedule: RolloverSchedule) -> replyboi::error::Result<()> {
        let period = schedule
            .period
            .to_std()
            .map_err(|e| ReplyError::Api(format!("bad rollover period: {}", e)))?;
        let start = Instant::now() + schedule.delay_from(&self.clock.now());
        let mut interval = tokio::time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
        Ok(())
    }
}

pub fn serve<S: StateStore>(api: &ReplyApi<S>, clock: CliClock) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    runtime.block_on(serve_loop(api, clock))
}

async fn serve_loop<S: StateStore>(api: &ReplyApi<S>, clock: CliClock) -> Result<()> {
    let mut scheduler = RolloverScheduler::new(IntervalAlarm::new(clock));
    if let Err(e) = scheduler.start(api) {
        warn!(error = %e, "startup rollover check failed");
    }
    if let Some(schedule) = scheduler.schedule() {
        info!(first_fire = %schedule.first_fire, "serving");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    debug!("stdin closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let response = api.handle_raw(&line);
                let mut out = serde_json::to_string(&response)?;
                out.push('\n');
                stdout.write_all(out.as_bytes()).await?;
                stdout.flush().await?;
            }
            _ = scheduler.alarm_mut().tick() => {
                match scheduler.on_fire(api) {
                    Ok(result) if result.rollover.advanced() => {
                        info!(day = %api.today(), "rolled over on schedule");
                    }
                    Ok(_) => debug!("scheduled check found nothing to do"),
                    Err(e) => warn!(error = %e, "scheduled rollover check failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("interrupted");
                break;
            }
        }
    }
    Ok(())
}
