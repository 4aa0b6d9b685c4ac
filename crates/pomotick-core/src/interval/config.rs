use std::sync::Arc;
use std::time::Duration;

use super::model::Category;
use crate::storage::IntervalRepository;

pub const DEFAULT_POMODORO: Duration = Duration::from_secs(25 * 60);
pub const DEFAULT_SHORT_BREAK: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_LONG_BREAK: Duration = Duration::from_secs(15 * 60);

/// Process-wide interval settings plus the repository every operation goes
/// through. Immutable once built; share it by reference or behind an `Arc`.
#[derive(Clone)]
pub struct IntervalConfig {
    repo: Arc<dyn IntervalRepository>,
    pub pomodoro_duration: Duration,
    pub short_break_duration: Duration,
    pub long_break_duration: Duration,
}

impl IntervalConfig {
    /// Zero durations fall back to 25/5/15 minutes.
    pub fn new(
        repo: Arc<dyn IntervalRepository>,
        pomodoro: Duration,
        short_break: Duration,
        long_break: Duration,
    ) -> Self {
        Self {
            repo,
            pomodoro_duration: or_default(pomodoro, DEFAULT_POMODORO),
            short_break_duration: or_default(short_break, DEFAULT_SHORT_BREAK),
            long_break_duration: or_default(long_break, DEFAULT_LONG_BREAK),
        }
    }

    /// Config with the default 25/5/15 minute durations.
    pub fn with_defaults(repo: Arc<dyn IntervalRepository>) -> Self {
        Self::new(repo, Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    pub fn repo(&self) -> &dyn IntervalRepository {
        self.repo.as_ref()
    }

    pub fn duration_for(&self, category: Category) -> Duration {
        match category {
            Category::Pomodoro => self.pomodoro_duration,
            Category::ShortBreak => self.short_break_duration,
            Category::LongBreak => self.long_break_duration,
        }
    }
}

impl std::fmt::Debug for IntervalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalConfig")
            .field("pomodoro_duration", &self.pomodoro_duration)
            .field("short_break_duration", &self.short_break_duration)
            .field("long_break_duration", &self.long_break_duration)
            .finish_non_exhaustive()
    }
}

fn or_default(value: Duration, default: Duration) -> Duration {
    if value.is_zero() {
        default
    } else {
        value
    }
}
