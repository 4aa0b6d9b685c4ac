use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RepositoryError;

/// The kind of time block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pomodoro => "Pomodoro",
            Category::ShortBreak => "ShortBreak",
            Category::LongBreak => "LongBreak",
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, Category::ShortBreak | Category::LongBreak)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pomodoro" => Ok(Category::Pomodoro),
            "ShortBreak" => Ok(Category::ShortBreak),
            "LongBreak" => Ok(Category::LongBreak),
            other => Err(RepositoryError::Storage(format!("unknown category: {other}"))),
        }
    }
}

/// Lifecycle state of an interval.
///
/// ```text
/// NotStarted -> Running -> (Paused | Done | Cancelled)
/// Paused -> Running            (through `start`)
/// ```
///
/// `Done` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalState {
    NotStarted,
    Running,
    Paused,
    Done,
    Cancelled,
}

impl IntervalState {
    /// Stable integer code used by persistent stores.
    pub fn code(&self) -> i64 {
        match self {
            IntervalState::NotStarted => 0,
            IntervalState::Running => 1,
            IntervalState::Paused => 2,
            IntervalState::Done => 3,
            IntervalState::Cancelled => 4,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(IntervalState::NotStarted),
            1 => Some(IntervalState::Running),
            2 => Some(IntervalState::Paused),
            3 => Some(IntervalState::Done),
            4 => Some(IntervalState::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, IntervalState::Done | IntervalState::Cancelled)
    }
}

/// One timed block of focus or break.
///
/// `id` is assigned by the repository on creation. `actual_duration` only
/// grows, one second per tick, and never exceeds `planned_duration`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub id: i64,
    pub start_time: DateTime<Utc>,
    #[serde(rename = "planned_duration_ms", with = "duration_ms")]
    pub planned_duration: Duration,
    #[serde(rename = "actual_duration_ms", with = "duration_ms")]
    pub actual_duration: Duration,
    pub category: Category,
    pub state: IntervalState,
}

impl Interval {
    /// A fresh, not yet persisted interval (`id` is 0 until created).
    pub fn new(category: Category, planned_duration: Duration) -> Self {
        Self {
            id: 0,
            start_time: Utc::now(),
            planned_duration,
            actual_duration: Duration::ZERO,
            category,
            state: IntervalState::NotStarted,
        }
    }

    /// Time left before expiry.
    pub fn remaining(&self) -> Duration {
        self.planned_duration.saturating_sub(self.actual_duration)
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
