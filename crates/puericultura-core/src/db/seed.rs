//! Seeding of the demonstration reference tables.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Database, DbResult};
use crate::models::{Measure, ReferenceDataPoint, Sex};
use crate::reference::demo_dataset;

/// Outcome of a seeding run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedReport {
    /// Curves processed
    pub curves: usize,
    /// Rows inserted
    pub inserted: usize,
    /// Rows already present
    pub skipped: usize,
}

impl Database {
    /// Seed the given curves. Rows that already exist are skipped.
    pub fn seed_curves(
        &self,
        curves: &[(Measure, Sex, Vec<ReferenceDataPoint>)],
    ) -> DbResult<SeedReport> {
        let mut report = SeedReport::default();

        for (measure, sex, points) in curves {
            let inserted = self.insert_reference_points(*measure, *sex, points)?;
            let skipped = points.len() - inserted;
            if skipped > 0 {
                info!(%measure, %sex, skipped, "reference rows already present");
            }
            info!(%measure, %sex, inserted, "seeded reference curve");

            report.curves += 1;
            report.inserted += inserted;
            report.skipped += skipped;
        }

        Ok(report)
    }

    /// Seed the built-in demonstration dataset.
    pub fn seed_demo_data(&self) -> DbResult<SeedReport> {
        self.seed_curves(&demo_dataset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_demo_data() {
        let db = Database::open_in_memory().unwrap();
        let report = db.seed_demo_data().unwrap();

        assert_eq!(report.curves, 9);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.inserted, db.count_reference_rows().unwrap());
        assert_eq!(db.count_curve_rows(Measure::PretermWeight, Sex::Feminino).unwrap(), 5);
    }

    #[test]
    fn test_seed_twice_skips_existing() {
        let db = Database::open_in_memory().unwrap();
        let first = db.seed_demo_data().unwrap();
        let second = db.seed_demo_data().unwrap();

        assert_eq!(second.inserted, 0);
        assert_eq!(second.skipped, first.inserted);
    }
}
