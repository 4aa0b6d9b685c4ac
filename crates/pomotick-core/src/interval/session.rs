//! Public entry points: fetch the interval to work on, start or resume it,
//! and pause it.

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::config::IntervalConfig;
use super::factory::new_interval;
use super::model::{Interval, IntervalState};
use super::tick::{tick, Callbacks};
use crate::error::RepositoryError;

/// The interval the caller should work on.
///
/// An unfinished latest interval (not started, running or paused) is
/// returned as is, so repeated calls never create duplicates. Otherwise the
/// next interval in the rotation is created.
pub fn get_interval(config: &IntervalConfig) -> Result<Interval, RepositoryError> {
    match config.repo().last() {
        Ok(last) if !last.state.is_terminal() => Ok(last),
        Ok(_) | Err(RepositoryError::NoIntervals) => new_interval(config),
        Err(e) => Err(e),
    }
}

/// Start or resume `interval` and tick it until it ends.
///
/// The stored state decides what happens:
/// - `Running`: another loop owns it, returns `Ok(())` immediately.
/// - `NotStarted` or `Paused`: marked `Running`, then ticked.
/// - `Done` or `Cancelled`: [`RepositoryError::IntervalCompleted`].
pub async fn start(
    interval: &Interval,
    config: &IntervalConfig,
    callbacks: &mut Callbacks<'_>,
    cancel: &CancellationToken,
) -> Result<(), RepositoryError> {
    let mut current = config.repo().by_id(interval.id)?;
    match current.state {
        IntervalState::Running => Ok(()),
        IntervalState::NotStarted | IntervalState::Paused => {
            current.state = IntervalState::Running;
            config.repo().update(current.clone())?;
            info!(
                id = current.id,
                category = %current.category,
                remaining_secs = current.remaining().as_secs(),
                "interval started"
            );
            tick(current.id, config, callbacks, cancel).await
        }
        IntervalState::Done | IntervalState::Cancelled => Err(RepositoryError::IntervalCompleted),
    }
}

/// Pause a running interval.
///
/// A tick loop running on the same interval notices at its next tick and
/// returns. Only `Running` intervals can be paused.
pub fn pause(interval: &Interval, config: &IntervalConfig) -> Result<(), RepositoryError> {
    let mut current = config.repo().by_id(interval.id)?;
    if current.state != IntervalState::Running {
        return Err(RepositoryError::IntervalNotRunning);
    }
    current.state = IntervalState::Paused;
    config.repo().update(current)?;
    info!(id = interval.id, "interval paused");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Category;
    use crate::storage::{InMemoryRepository, IntervalRepository};
    use std::sync::Arc;
    use std::time::Duration;

    fn config(repo: Arc<InMemoryRepository>) -> IntervalConfig {
        IntervalConfig::new(
            repo,
            Duration::from_secs(3),
            Duration::from_secs(2),
            Duration::from_secs(4),
        )
    }

    #[test]
    fn empty_repository_creates_default_pomodoro() {
        let cfg = IntervalConfig::with_defaults(Arc::new(InMemoryRepository::new()));
        let i = get_interval(&cfg).unwrap();
        assert_eq!(i.category, Category::Pomodoro);
        assert_eq!(i.planned_duration, Duration::from_secs(25 * 60));
        assert_eq!(i.actual_duration, Duration::ZERO);
        assert_eq!(i.state, IntervalState::NotStarted);
    }

    #[test]
    fn unfinished_interval_is_returned_again() {
        let repo = Arc::new(InMemoryRepository::new());
        let cfg = config(repo.clone());

        let first = get_interval(&cfg).unwrap();
        let mut running = first.clone();
        running.state = IntervalState::Running;
        repo.update(running).unwrap();

        for _ in 0..5 {
            assert_eq!(get_interval(&cfg).unwrap().id, first.id);
        }
        assert_eq!(repo.last().unwrap().id, first.id);
    }

    #[test]
    fn finished_interval_rolls_over_to_next_category() {
        let repo = Arc::new(InMemoryRepository::new());
        let cfg = config(repo.clone());

        let mut first = get_interval(&cfg).unwrap();
        first.state = IntervalState::Done;
        repo.update(first.clone()).unwrap();

        let second = get_interval(&cfg).unwrap();
        assert_ne!(second.id, first.id);
        assert_eq!(second.category, Category::ShortBreak);
        assert_eq!(second.planned_duration, Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn start_runs_interval_to_done() {
        let repo = Arc::new(InMemoryRepository::new());
        let cfg = config(repo.clone());

        let i = get_interval(&cfg).unwrap();
        start(&i, &cfg, &mut Callbacks::noop(), &CancellationToken::new())
            .await
            .unwrap();

        let stored = repo.by_id(i.id).unwrap();
        assert_eq!(stored.state, IntervalState::Done);
        assert_eq!(stored.actual_duration, Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn start_refuses_finished_interval() {
        let repo = Arc::new(InMemoryRepository::new());
        let cfg = config(repo.clone());

        let mut i = get_interval(&cfg).unwrap();
        i.state = IntervalState::Cancelled;
        repo.update(i.clone()).unwrap();

        let err = start(&i, &cfg, &mut Callbacks::noop(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err, RepositoryError::IntervalCompleted);
    }

    #[tokio::test(start_paused = true)]
    async fn start_on_running_interval_is_a_no_op() {
        let repo = Arc::new(InMemoryRepository::new());
        let cfg = config(repo.clone());

        let mut i = get_interval(&cfg).unwrap();
        i.state = IntervalState::Running;
        repo.update(i.clone()).unwrap();

        start(&i, &cfg, &mut Callbacks::noop(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(repo.by_id(i.id).unwrap().actual_duration, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_then_resume_completes() {
        let repo = Arc::new(InMemoryRepository::new());
        let cfg = config(repo.clone());
        let i = get_interval(&cfg).unwrap();

        let mut callbacks = Callbacks::new(
            |_| {},
            |snapshot| pause(snapshot, &cfg).unwrap(),
            |_| {},
        );
        start(&i, &cfg, &mut callbacks, &CancellationToken::new())
            .await
            .unwrap();
        drop(callbacks);

        let paused = get_interval(&cfg).unwrap();
        assert_eq!(paused.id, i.id);
        assert_eq!(paused.state, IntervalState::Paused);
        assert_eq!(paused.actual_duration, Duration::from_secs(1));

        start(&paused, &cfg, &mut Callbacks::noop(), &CancellationToken::new())
            .await
            .unwrap();
        let done = repo.by_id(i.id).unwrap();
        assert_eq!(done.state, IntervalState::Done);
        assert_eq!(done.actual_duration, Duration::from_secs(3));
    }

    #[test]
    fn pause_requires_running() {
        let cfg = config(Arc::new(InMemoryRepository::new()));
        let i = get_interval(&cfg).unwrap();
        assert_eq!(pause(&i, &cfg).unwrap_err(), RepositoryError::IntervalNotRunning);
    }
}
