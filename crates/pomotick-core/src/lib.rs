//! # pomotick Core Library
//!
//! Tracks a sequence of timed focus and break blocks ("intervals") in the
//! Pomodoro style: pomodoros alternate with short breaks, and a long break
//! replaces every fourth break.
//!
//! ## Architecture
//!
//! - **Category selector**: decides the kind of the next interval from history
//! - **Interval factory**: creates and persists the next interval
//! - **Tick engine**: cancellable one-second loop that advances a running
//!   interval and reports progress through callbacks
//! - **Session accessor**: returns the unfinished interval or creates a new one
//! - **Storage**: the [`IntervalRepository`] trait with in-memory and SQLite
//!   backends, plus the TOML [`Config`] file
//!
//! ## Example
//!
//! ```ignore
//! let repo = Arc::new(InMemoryRepository::new());
//! let config = IntervalConfig::with_defaults(repo);
//! let interval = get_interval(&config)?;
//! start(&interval, &config, &mut Callbacks::noop(), &CancellationToken::new()).await?;
//! ```

pub mod error;
pub mod interval;
pub mod storage;

pub use error::{ConfigError, CoreError, RepositoryError};
pub use interval::{
    get_interval, new_interval, next_category, pause, start, tick, Callbacks, Category, Interval,
    IntervalConfig, IntervalState,
};
pub use storage::{open_repository, Config, InMemoryRepository, IntervalRepository, SqliteRepository};
