mod config;
pub mod database;
pub mod memory;

pub use config::{Config, IntervalsConfig, StorageBackend, StorageConfig};
pub use database::SqliteRepository;
pub use memory::InMemoryRepository;

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{ConfigError, RepositoryError, Result};
use crate::interval::Interval;

/// Store of interval records.
///
/// Every lifecycle operation reads and writes through this trait; it is the
/// single source of truth for interval state.
pub trait IntervalRepository: Send + Sync {
    /// Store a new interval and return its freshly assigned ID. The `id`
    /// field of the argument is ignored.
    fn create(&self, interval: Interval) -> Result<i64, RepositoryError>;

    /// Overwrite the interval with `interval.id`.
    /// Fails with [`RepositoryError::InvalidId`] if there is none.
    fn update(&self, interval: Interval) -> Result<(), RepositoryError>;

    /// Fails with [`RepositoryError::InvalidId`] if absent.
    fn by_id(&self, id: i64) -> Result<Interval, RepositoryError>;

    /// Most recently created interval.
    /// Fails with [`RepositoryError::NoIntervals`] on an empty store.
    fn last(&self) -> Result<Interval, RepositoryError>;

    /// Up to `n` most recent break intervals, newest first.
    fn breaks(&self, n: usize) -> Result<Vec<Interval>, RepositoryError>;
}

/// Returns `~/.config/pomotick[-dev]/` based on POMOTICK_ENV.
///
/// Set POMOTICK_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMOTICK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomotick-dev")
    } else {
        base_dir.join("pomotick")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}

/// Open the repository backend selected in `config`.
pub fn open_repository(config: &Config) -> Result<Arc<dyn IntervalRepository>> {
    match config.storage.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemoryRepository::new())),
        StorageBackend::Sqlite => {
            let path = data_dir()?.join(&config.storage.database_file);
            Ok(Arc::new(SqliteRepository::open(path)?))
        }
    }
}
