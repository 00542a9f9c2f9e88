//! Reference-table access.
//!
//! Pipeline: Provider fetch → (empty/error → demo fallback) → Session cache → Interpolation

mod cache;
mod demo;
mod interpolate;

pub use cache::*;
pub use demo::*;
pub use interpolate::*;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::models::{Measure, ReferenceDataPoint, Sex};

/// Reference provider errors.
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Database error: {0}")]
    Database(#[from] crate::db::DbError),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

pub type ReferenceResult<T> = Result<T, ReferenceError>;

/// Source of reference curves.
///
/// Implementations return the rows of one `(measure, sex)` curve ordered by
/// `age_days` ascending. An empty vector means the curve is not available.
pub trait ReferenceProvider {
    fn fetch_curve(&self, measure: Measure, sex: Sex) -> ReferenceResult<Vec<ReferenceDataPoint>>;
}

impl<P: ReferenceProvider> ReferenceProvider for Mutex<P> {
    fn fetch_curve(&self, measure: Measure, sex: Sex) -> ReferenceResult<Vec<ReferenceDataPoint>> {
        let provider = self
            .lock()
            .map_err(|e| ReferenceError::LockPoisoned(e.to_string()))?;
        provider.fetch_curve(measure, sex)
    }
}

impl<P: ReferenceProvider + ?Sized> ReferenceProvider for Arc<P> {
    fn fetch_curve(&self, measure: Measure, sex: Sex) -> ReferenceResult<Vec<ReferenceDataPoint>> {
        (**self).fetch_curve(measure, sex)
    }
}

/// Provider backed by curves held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    curves: HashMap<(Measure, Sex), Vec<ReferenceDataPoint>>,
}

impl InMemoryProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider preloaded with the demonstration dataset.
    pub fn demo() -> Self {
        let mut provider = Self::new();
        for (measure, sex, points) in demo_dataset() {
            provider.insert(measure, sex, points);
        }
        provider
    }

    /// Add or replace a curve. Rows are kept ordered by age.
    pub fn insert(&mut self, measure: Measure, sex: Sex, mut points: Vec<ReferenceDataPoint>) {
        points.sort_by_key(|p| p.age_days);
        self.curves.insert((measure, sex), points);
    }

    /// Builder form of [`InMemoryProvider::insert`].
    pub fn with_curve(mut self, measure: Measure, sex: Sex, points: Vec<ReferenceDataPoint>) -> Self {
        self.insert(measure, sex, points);
        self
    }
}

impl ReferenceProvider for InMemoryProvider {
    fn fetch_curve(&self, measure: Measure, sex: Sex) -> ReferenceResult<Vec<ReferenceDataPoint>> {
        Ok(self.curves.get(&(measure, sex)).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_sorts_rows() {
        let provider = InMemoryProvider::new().with_curve(
            Measure::Weight,
            Sex::Feminino,
            vec![
                ReferenceDataPoint::who(365, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]),
                ReferenceDataPoint::who(0, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]),
            ],
        );

        let rows = provider.fetch_curve(Measure::Weight, Sex::Feminino).unwrap();
        assert_eq!(rows[0].age_days, 0);
        assert_eq!(rows[1].age_days, 365);
    }

    #[test]
    fn test_in_memory_missing_curve_is_empty() {
        let provider = InMemoryProvider::new();
        assert!(provider
            .fetch_curve(Measure::Height, Sex::Masculino)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_mutex_provider_delegates() {
        let provider = Mutex::new(InMemoryProvider::demo());
        let rows = provider.fetch_curve(Measure::Weight, Sex::Masculino).unwrap();
        assert!(!rows.is_empty());
    }
}
