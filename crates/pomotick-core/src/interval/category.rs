//! Category rotation.
//!
//! A break is always followed by a pomodoro. After a pomodoro comes a short
//! break, unless the last three breaks were all short, in which case it is
//! time for a long one.

use super::model::Category;
use crate::error::RepositoryError;
use crate::storage::IntervalRepository;

/// Number of recent breaks inspected when deciding on a long break.
pub const BREAKS_BEFORE_LONG_BREAK: usize = 3;

/// Category the next interval should have, given the stored history.
///
/// An empty history starts with a pomodoro. Any other repository failure is
/// returned unchanged.
pub fn next_category(repo: &dyn IntervalRepository) -> Result<Category, RepositoryError> {
    let last = match repo.last() {
        Ok(interval) => interval,
        Err(RepositoryError::NoIntervals) => return Ok(Category::Pomodoro),
        Err(e) => return Err(e),
    };

    if last.category.is_break() {
        return Ok(Category::Pomodoro);
    }

    let recent_breaks = repo.breaks(BREAKS_BEFORE_LONG_BREAK)?;
    if recent_breaks.len() < BREAKS_BEFORE_LONG_BREAK {
        return Ok(Category::ShortBreak);
    }

    if recent_breaks
        .iter()
        .any(|i| i.category == Category::LongBreak)
    {
        return Ok(Category::ShortBreak);
    }

    Ok(Category::LongBreak)
}
