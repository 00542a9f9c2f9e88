//! Reference curve database operations.

use rusqlite::{params, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Measure, ReferenceDataPoint, Sex};
use crate::reference::{ReferenceProvider, ReferenceResult};

/// Table holding the rows of a measure.
fn table_for(measure: Measure) -> &'static str {
    if measure.is_preterm() {
        "intergrowth_curves"
    } else {
        "reference_curves"
    }
}

impl Database {
    /// Insert curve rows, skipping ages that already exist.
    ///
    /// Returns the number of rows actually inserted.
    pub fn insert_reference_points(
        &self,
        measure: Measure,
        sex: Sex,
        points: &[ReferenceDataPoint],
    ) -> DbResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut inserted = 0;

        if measure.is_preterm() {
            let mut stmt = tx.prepare(
                r#"
                INSERT OR IGNORE INTO intergrowth_curves (
                    sex, measure, age_days,
                    z_neg_3, z_neg_2, z_neg_1, z_0, z_pos_1, z_pos_2, z_pos_3
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )?;
            for p in points {
                inserted += stmt.execute(params![
                    sex.as_str(),
                    measure.base_name(),
                    p.age_days,
                    p.z_neg_3,
                    p.z_neg_2,
                    p.z_neg_1,
                    p.z_0,
                    p.z_pos_1,
                    p.z_pos_2,
                    p.z_pos_3,
                ])?;
            }
        } else {
            let mut stmt = tx.prepare(
                r#"
                INSERT OR IGNORE INTO reference_curves (
                    sex, measure, age_days,
                    z_neg_4, z_neg_3, z_neg_2, z_neg_1, z_0, z_pos_1, z_pos_2, z_pos_3, z_pos_4
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
            )?;
            for p in points {
                let (z_neg_4, z_pos_4) = match (p.z_neg_4, p.z_pos_4) {
                    (Some(lo), Some(hi)) => (lo, hi),
                    _ => {
                        return Err(DbError::Constraint(format!(
                            "{} row at day {} is missing the ±4 boundaries",
                            measure, p.age_days
                        )))
                    }
                };
                inserted += stmt.execute(params![
                    sex.as_str(),
                    measure.base_name(),
                    p.age_days,
                    z_neg_4,
                    p.z_neg_3,
                    p.z_neg_2,
                    p.z_neg_1,
                    p.z_0,
                    p.z_pos_1,
                    p.z_pos_2,
                    p.z_pos_3,
                    z_pos_4,
                ])?;
            }
        }

        tx.commit()?;
        Ok(inserted)
    }

    /// Get the rows of a curve ordered by age.
    pub fn get_reference_points(
        &self,
        measure: Measure,
        sex: Sex,
    ) -> DbResult<Vec<ReferenceDataPoint>> {
        let sql = if measure.is_preterm() {
            r#"
            SELECT age_days, NULL, z_neg_3, z_neg_2, z_neg_1, z_0, z_pos_1, z_pos_2, z_pos_3, NULL
            FROM intergrowth_curves
            WHERE sex = ? AND measure = ?
            ORDER BY age_days ASC
            "#
        } else {
            r#"
            SELECT age_days, z_neg_4, z_neg_3, z_neg_2, z_neg_1, z_0, z_pos_1, z_pos_2, z_pos_3, z_pos_4
            FROM reference_curves
            WHERE sex = ? AND measure = ?
            ORDER BY age_days ASC
            "#
        };

        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params![sex.as_str(), measure.base_name()], point_from_row)?;

        let mut points = Vec::new();
        for row in rows {
            points.push(row?);
        }
        Ok(points)
    }

    /// Number of rows stored for a curve.
    pub fn count_curve_rows(&self, measure: Measure, sex: Sex) -> DbResult<usize> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE sex = ? AND measure = ?",
            table_for(measure)
        );
        let count: i64 = self.conn.query_row(
            &sql,
            params![sex.as_str(), measure.base_name()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Total rows across both reference tables.
    pub fn count_reference_rows(&self) -> DbResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT (SELECT COUNT(*) FROM reference_curves) + (SELECT COUNT(*) FROM intergrowth_curves)",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Delete every row of a curve.
    pub fn delete_curve(&self, measure: Measure, sex: Sex) -> DbResult<usize> {
        let sql = format!(
            "DELETE FROM {} WHERE sex = ? AND measure = ?",
            table_for(measure)
        );
        Ok(self
            .conn
            .execute(&sql, params![sex.as_str(), measure.base_name()])?)
    }
}

fn point_from_row(row: &Row<'_>) -> rusqlite::Result<ReferenceDataPoint> {
    Ok(ReferenceDataPoint {
        age_days: row.get(0)?,
        z_neg_4: row.get(1)?,
        z_neg_3: row.get(2)?,
        z_neg_2: row.get(3)?,
        z_neg_1: row.get(4)?,
        z_0: row.get(5)?,
        z_pos_1: row.get(6)?,
        z_pos_2: row.get(7)?,
        z_pos_3: row.get(8)?,
        z_pos_4: row.get(9)?,
    })
}

impl ReferenceProvider for Database {
    fn fetch_curve(&self, measure: Measure, sex: Sex) -> ReferenceResult<Vec<ReferenceDataPoint>> {
        Ok(self.get_reference_points(measure, sex)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn who_rows() -> Vec<ReferenceDataPoint> {
        vec![
            ReferenceDataPoint::who(365, [63.7, 66.3, 68.9, 71.4, 74.0, 76.6, 79.2, 81.7, 84.3]),
            ReferenceDataPoint::who(0, [41.8, 43.6, 45.4, 47.3, 49.1, 51.0, 52.9, 54.7, 56.6]),
        ]
    }

    #[test]
    fn test_insert_and_get_ordered() {
        let db = setup_db();

        let inserted = db
            .insert_reference_points(Measure::Height, Sex::Feminino, &who_rows())
            .unwrap();
        assert_eq!(inserted, 2);

        let points = db.get_reference_points(Measure::Height, Sex::Feminino).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].age_days, 0);
        assert_eq!(points[0].z_0, 49.1);
        assert_eq!(points[1].z_pos_4, Some(84.3));
    }

    #[test]
    fn test_curves_are_keyed_by_sex_and_measure() {
        let db = setup_db();
        db.insert_reference_points(Measure::Height, Sex::Feminino, &who_rows())
            .unwrap();

        assert!(db
            .get_reference_points(Measure::Height, Sex::Masculino)
            .unwrap()
            .is_empty());
        assert!(db
            .get_reference_points(Measure::Cephalic, Sex::Feminino)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_duplicates_skipped() {
        let db = setup_db();
        db.insert_reference_points(Measure::Height, Sex::Feminino, &who_rows())
            .unwrap();
        let inserted = db
            .insert_reference_points(Measure::Height, Sex::Feminino, &who_rows())
            .unwrap();

        assert_eq!(inserted, 0);
        assert_eq!(db.count_curve_rows(Measure::Height, Sex::Feminino).unwrap(), 2);
    }

    #[test]
    fn test_who_rows_require_outer_bands() {
        let db = setup_db();
        let row = ReferenceDataPoint::intergrowth(0, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);

        let result = db.insert_reference_points(Measure::Weight, Sex::Feminino, &[row]);
        assert!(matches!(result, Err(DbError::Constraint(_))));
        assert_eq!(db.count_reference_rows().unwrap(), 0);
    }

    #[test]
    fn test_intergrowth_round_trip_keeps_outer_bands_absent() {
        let db = setup_db();
        let row = ReferenceDataPoint::intergrowth(168, [340.0, 410.0, 500.0, 600.0, 730.0, 890.0, 1070.0]);
        db.insert_reference_points(Measure::PretermWeight, Sex::Feminino, &[row.clone()])
            .unwrap();

        let points = db.get_reference_points(Measure::PretermWeight, Sex::Feminino).unwrap();
        assert_eq!(points, vec![row]);

        // Preterm rows never leak into the WHO curve of the same base measure
        assert!(db
            .get_reference_points(Measure::Weight, Sex::Feminino)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_delete_curve() {
        let db = setup_db();
        db.insert_reference_points(Measure::Height, Sex::Feminino, &who_rows())
            .unwrap();

        assert_eq!(db.delete_curve(Measure::Height, Sex::Feminino).unwrap(), 2);
        assert_eq!(db.count_reference_rows().unwrap(), 0);
    }

    #[test]
    fn test_provider_impl() {
        let db = setup_db();
        db.insert_reference_points(Measure::Height, Sex::Feminino, &who_rows())
            .unwrap();

        let rows = db.fetch_curve(Measure::Height, Sex::Feminino).unwrap();
        assert_eq!(rows.len(), 2);
    }
}
