//! Linear interpolation over reference tables.

use crate::models::ReferenceDataPoint;

/// Reference row at an exact age.
///
/// - Empty table → `None`
/// - Outside the table → first/last row verbatim (no extrapolation)
/// - Exact hit → that row verbatim
/// - Otherwise every boundary is interpolated between the bracketing rows
///
/// Optional boundaries (INTERGROWTH ±4) missing on one side take the other
/// side's value, so the band runs flat instead of through a hole.
pub fn interpolate(table: &[ReferenceDataPoint], age_days: i64) -> Option<ReferenceDataPoint> {
    let first = table.first()?;
    let last = table.last()?;

    if age_days <= first.age_days {
        return Some(first.clone());
    }
    if age_days >= last.age_days {
        return Some(last.clone());
    }

    // First row strictly after the age; the row before it brackets from below.
    let upper_idx = table.partition_point(|p| p.age_days <= age_days);
    let lower = &table[upper_idx - 1];
    let upper = &table[upper_idx];

    if lower.age_days == age_days || lower.age_days == upper.age_days {
        return Some(lower.clone());
    }

    let ratio = (age_days - lower.age_days) as f64 / (upper.age_days - lower.age_days) as f64;
    let lerp = |a: f64, b: f64| a + (b - a) * ratio;
    let lerp_opt = |a: Option<f64>, b: Option<f64>| match (a, b) {
        (Some(a), Some(b)) => Some(lerp(a, b)),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    };

    Some(ReferenceDataPoint {
        age_days,
        z_neg_4: lerp_opt(lower.z_neg_4, upper.z_neg_4),
        z_neg_3: lerp(lower.z_neg_3, upper.z_neg_3),
        z_neg_2: lerp(lower.z_neg_2, upper.z_neg_2),
        z_neg_1: lerp(lower.z_neg_1, upper.z_neg_1),
        z_0: lerp(lower.z_0, upper.z_0),
        z_pos_1: lerp(lower.z_pos_1, upper.z_pos_1),
        z_pos_2: lerp(lower.z_pos_2, upper.z_pos_2),
        z_pos_3: lerp(lower.z_pos_3, upper.z_pos_3),
        z_pos_4: lerp_opt(lower.z_pos_4, upper.z_pos_4),
    })
}
