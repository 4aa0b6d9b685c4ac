use tracing::info;

use super::category::next_category;
use super::config::IntervalConfig;
use super::model::Interval;
use crate::error::RepositoryError;

/// Create and persist the next interval in the rotation.
///
/// The planned duration comes from the configured length of the selected
/// category. Creation is attempted once; a repository failure is returned
/// as is.
pub fn new_interval(config: &IntervalConfig) -> Result<Interval, RepositoryError> {
    let category = next_category(config.repo())?;
    let mut interval = Interval::new(category, config.duration_for(category));
    interval.id = config.repo().create(interval.clone())?;

    info!(
        id = interval.id,
        category = %interval.category,
        planned_secs = interval.planned_duration.as_secs(),
        "created interval"
    );
    Ok(interval)
}
