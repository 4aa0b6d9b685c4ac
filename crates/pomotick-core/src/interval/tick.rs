//! Tick engine.
//!
//! Advances a running interval one second at a time until it expires, is
//! cancelled, or is found paused. The repository is the source of truth: the
//! interval is re-read on every wakeup, so a pause written by another actor
//! is honored at the next tick.
//!
//! ## Usage
//!
//! ```ignore
//! let cancel = CancellationToken::new();
//! let mut callbacks = Callbacks::new(
//!     |i| println!("started {}", i.id),
//!     |i| println!("{:?} elapsed", i.actual_duration),
//!     |i| println!("finished {}", i.id),
//! );
//! tick(interval.id, &config, &mut callbacks, &cancel).await?;
//! ```

use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::config::IntervalConfig;
use super::model::{Interval, IntervalState};
use crate::error::RepositoryError;

/// Length of one tick.
pub const TICK: Duration = Duration::from_secs(1);

/// A hook invoked with a snapshot of the interval.
pub type Callback<'a> = Box<dyn FnMut(&Interval) + Send + 'a>;

/// The three hooks the tick loop calls.
///
/// `start` runs once before the first tick, `periodic` after every persisted
/// tick, and `end` only when the interval expires naturally. Hooks run inline
/// between wakeups and should return quickly.
pub struct Callbacks<'a> {
    start: Callback<'a>,
    periodic: Callback<'a>,
    end: Callback<'a>,
}

impl<'a> Callbacks<'a> {
    pub fn new(
        start: impl FnMut(&Interval) + Send + 'a,
        periodic: impl FnMut(&Interval) + Send + 'a,
        end: impl FnMut(&Interval) + Send + 'a,
    ) -> Self {
        Self {
            start: Box::new(start),
            periodic: Box::new(periodic),
            end: Box::new(end),
        }
    }

    /// Hooks that do nothing.
    pub fn noop() -> Self {
        Self::new(|_| {}, |_| {}, |_| {})
    }
}

/// Run the tick loop for interval `id`.
///
/// Returns `Ok(())` when the interval expires (`Done`), is cancelled through
/// `cancel` (`Cancelled`), or is observed `Paused`. Any repository failure
/// stops the loop and is returned without retrying.
///
/// The expiry deadline is computed once, from the remaining time at entry.
pub async fn tick(
    id: i64,
    config: &IntervalConfig,
    callbacks: &mut Callbacks<'_>,
    cancel: &CancellationToken,
) -> Result<(), RepositoryError> {
    let result = run(id, config, callbacks, cancel).await;
    if let Err(e) = &result {
        warn!(id, error = %e, "tick loop stopped");
    }
    result
}

async fn run(
    id: i64,
    config: &IntervalConfig,
    callbacks: &mut Callbacks<'_>,
    cancel: &CancellationToken,
) -> Result<(), RepositoryError> {
    let repo = config.repo();

    let interval = repo.by_id(id)?;
    if interval.state == IntervalState::Paused {
        debug!(id, "interval is paused, nothing to tick");
        return Ok(());
    }

    // Both deadlines hang off one instant so the last tick and the expiry
    // coincide exactly. Late ticks burst to catch up, and never more ticks
    // than fit in the remaining time are counted.
    let now = Instant::now();
    let remaining = interval.remaining();
    let mut ticks_left = remaining.as_secs();
    let expire = tokio::time::sleep_until(now + remaining);
    tokio::pin!(expire);
    let mut ticker = tokio::time::interval_at(now + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

    (callbacks.start)(&interval);

    // Polled in a fixed order so pending ticks land before expiry.
    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                let mut interval = repo.by_id(id)?;
                interval.state = IntervalState::Cancelled;
                repo.update(interval.clone())?;
                info!(id, actual_secs = interval.actual_duration.as_secs(), "interval cancelled");
                return Ok(());
            }
            _ = ticker.tick(), if ticks_left > 0 => {
                ticks_left -= 1;
                let mut interval = repo.by_id(id)?;
                if interval.state == IntervalState::Paused {
                    info!(id, actual_secs = interval.actual_duration.as_secs(), "interval paused");
                    return Ok(());
                }
                interval.actual_duration += TICK;
                repo.update(interval.clone())?;
                debug!(id, actual_secs = interval.actual_duration.as_secs(), "tick");
                (callbacks.periodic)(&interval);
            }
            _ = &mut expire => {
                let mut interval = repo.by_id(id)?;
                interval.state = IntervalState::Done;
                (callbacks.end)(&interval);
                repo.update(interval)?;
                info!(id, "interval done");
                return Ok(());
            }
        }
    }
}
