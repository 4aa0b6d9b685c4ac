//! Volatile repository backed by a vector. IDs are positions plus one.

use std::sync::{Mutex, MutexGuard};

use super::IntervalRepository;
use crate::error::RepositoryError;
use crate::interval::Interval;

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    intervals: Mutex<Vec<Interval>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Interval>>, RepositoryError> {
        self.intervals
            .lock()
            .map_err(|_| RepositoryError::Storage("interval store lock poisoned".into()))
    }
}

fn index_of(id: i64, len: usize) -> Result<usize, RepositoryError> {
    usize::try_from(id)
        .ok()
        .filter(|&i| i >= 1 && i <= len)
        .map(|i| i - 1)
        .ok_or(RepositoryError::InvalidId(id))
}

impl IntervalRepository for InMemoryRepository {
    fn create(&self, mut interval: Interval) -> Result<i64, RepositoryError> {
        let mut intervals = self.lock()?;
        interval.id = intervals.len() as i64 + 1;
        let id = interval.id;
        intervals.push(interval);
        Ok(id)
    }

    fn update(&self, interval: Interval) -> Result<(), RepositoryError> {
        let mut intervals = self.lock()?;
        let idx = index_of(interval.id, intervals.len())?;
        intervals[idx] = interval;
        Ok(())
    }

    fn by_id(&self, id: i64) -> Result<Interval, RepositoryError> {
        let intervals = self.lock()?;
        let idx = index_of(id, intervals.len())?;
        Ok(intervals[idx].clone())
    }

    fn last(&self) -> Result<Interval, RepositoryError> {
        self.lock()?
            .last()
            .cloned()
            .ok_or(RepositoryError::NoIntervals)
    }

    fn breaks(&self, n: usize) -> Result<Vec<Interval>, RepositoryError> {
        Ok(self
            .lock()?
            .iter()
            .rev()
            .filter(|i| i.category.is_break())
            .take(n)
            .cloned()
            .collect())
    }
}
