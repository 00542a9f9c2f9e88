//! Built-in demonstration reference data.
//!
//! A handful of rows per curve, used when the provider has nothing to offer
//! and for seeding empty databases. Not a substitute for the full WHO and
//! INTERGROWTH-21 tables.

use crate::models::{Measure, ReferenceDataPoint, Sex};

/// Scale applied to the female weight rows to derive the male demo rows.
const MALE_WEIGHT_FACTOR: f64 = 1.05;

fn who_rows(rows: &[(i64, [f64; 9])]) -> Vec<ReferenceDataPoint> {
    rows.iter()
        .map(|(age, values)| ReferenceDataPoint::who(*age, *values))
        .collect()
}

fn weight_female() -> Vec<ReferenceDataPoint> {
    // grams
    who_rows(&[
        (0, [1671.0, 2033.0, 2395.0, 2794.0, 3232.0, 3711.0, 4230.0, 4793.0, 5356.0]),
        // Synthetic: the day 0 row shifted by 1000 g, to give the first month a bracket
        (30, [2671.0, 3033.0, 3395.0, 3794.0, 4232.0, 4711.0, 5230.0, 5793.0, 6356.0]),
        (365, [4000.0, 5000.0, 6000.0, 7000.0, 8000.0, 9000.0, 10200.0, 11500.0, 12900.0]),
    ])
}

fn weight_male() -> Vec<ReferenceDataPoint> {
    weight_female()
        .iter()
        .map(|p| p.map_values(|v| (v * MALE_WEIGHT_FACTOR).round()))
        .collect()
}

fn height(sex: Sex) -> Vec<ReferenceDataPoint> {
    match sex {
        Sex::Feminino => who_rows(&[
            (0, [41.8, 43.6, 45.4, 47.3, 49.1, 51.0, 52.9, 54.7, 56.6]),
            (365, [63.7, 66.3, 68.9, 71.4, 74.0, 76.6, 79.2, 81.7, 84.3]),
        ]),
        Sex::Masculino => who_rows(&[
            (0, [42.3, 44.2, 46.1, 48.0, 49.9, 51.8, 53.7, 55.6, 57.5]),
            (365, [66.2, 68.6, 71.0, 73.4, 75.7, 78.1, 80.5, 82.9, 85.3]),
        ]),
    }
}

fn cephalic(sex: Sex) -> Vec<ReferenceDataPoint> {
    match sex {
        Sex::Feminino => who_rows(&[
            (0, [29.1, 30.3, 31.5, 32.7, 33.9, 35.1, 36.2, 37.4, 38.6]),
            (365, [40.0, 41.2, 42.4, 43.7, 44.9, 46.1, 47.4, 48.6, 49.8]),
        ]),
        Sex::Masculino => who_rows(&[
            (0, [29.5, 30.7, 31.9, 33.2, 34.5, 35.7, 37.0, 38.3, 39.5]),
            (365, [41.4, 42.6, 43.8, 45.0, 46.1, 47.3, 48.5, 49.7, 50.9]),
        ]),
    }
}

fn bmi(sex: Sex) -> Vec<ReferenceDataPoint> {
    match sex {
        Sex::Feminino => who_rows(&[
            (0, [9.2, 10.1, 11.1, 12.2, 13.3, 14.6, 16.1, 17.7, 19.6]),
            (365, [12.0, 12.9, 13.9, 15.1, 16.4, 17.9, 19.6, 21.6, 23.9]),
        ]),
        Sex::Masculino => who_rows(&[
            (0, [9.3, 10.2, 11.1, 12.2, 13.4, 14.8, 16.3, 18.1, 20.1]),
            (365, [12.5, 13.4, 14.4, 15.6, 16.8, 18.2, 19.8, 21.6, 23.7]),
        ]),
    }
}

fn preterm_weight_female() -> Vec<ReferenceDataPoint> {
    // 24+0 to 24+4 weeks post-conceptual age, grams
    [
        (168, [340.0, 410.0, 500.0, 600.0, 730.0, 890.0, 1070.0]),
        (169, [340.0, 420.0, 510.0, 610.0, 740.0, 900.0, 1100.0]),
        (170, [350.0, 430.0, 520.0, 630.0, 760.0, 920.0, 1120.0]),
        (171, [360.0, 430.0, 530.0, 640.0, 770.0, 940.0, 1140.0]),
        (172, [360.0, 440.0, 540.0, 650.0, 790.0, 960.0, 1160.0]),
    ]
    .iter()
    .map(|(age, values)| ReferenceDataPoint::intergrowth(*age, *values))
    .collect()
}

/// Demonstration rows for one curve. Empty when no demo data exists.
pub fn demo_curve(measure: Measure, sex: Sex) -> Vec<ReferenceDataPoint> {
    match (measure, sex) {
        (Measure::Weight, Sex::Feminino) => weight_female(),
        (Measure::Weight, Sex::Masculino) => weight_male(),
        (Measure::Height, _) => height(sex),
        (Measure::Cephalic, _) => cephalic(sex),
        (Measure::Bmi, _) => bmi(sex),
        (Measure::PretermWeight, Sex::Feminino) => preterm_weight_female(),
        _ => Vec::new(),
    }
}

/// Every non-empty demonstration curve.
pub fn demo_dataset() -> Vec<(Measure, Sex, Vec<ReferenceDataPoint>)> {
    let mut dataset = Vec::new();
    for measure in Measure::ALL {
        for sex in [Sex::Feminino, Sex::Masculino] {
            let points = demo_curve(measure, sex);
            if !points.is_empty() {
                dataset.push((measure, sex, points));
            }
        }
    }
    dataset
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_ordered(points: &[ReferenceDataPoint]) -> bool {
        points.windows(2).all(|w| w[0].age_days < w[1].age_days)
            && points.iter().all(|p| {
                p.z_neg_3 < p.z_neg_2
                    && p.z_neg_2 < p.z_neg_1
                    && p.z_neg_1 < p.z_0
                    && p.z_0 < p.z_pos_1
                    && p.z_pos_1 < p.z_pos_2
                    && p.z_pos_2 < p.z_pos_3
            })
    }

    #[test]
    fn test_demo_curves_are_ordered() {
        for (measure, sex, points) in demo_dataset() {
            assert!(is_ordered(&points), "{} {} is not ordered", measure, sex);
        }
    }

    #[test]
    fn test_male_weight_is_scaled() {
        let boys = demo_curve(Measure::Weight, Sex::Masculino);
        assert_eq!(boys[0].z_0, 3394.0);
        assert_eq!(boys[0].z_pos_4, Some(5624.0));
    }

    #[test]
    fn test_intergrowth_has_no_outer_bands() {
        let rows = demo_curve(Measure::PretermWeight, Sex::Feminino);
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|p| p.z_neg_4.is_none() && p.z_pos_4.is_none()));
    }

    #[test]
    fn test_no_demo_for_male_preterm() {
        assert!(demo_curve(Measure::PretermWeight, Sex::Masculino).is_empty());
        assert!(demo_curve(Measure::PretermHeight, Sex::Feminino).is_empty());
    }

    #[test]
    fn test_dataset_size() {
        // weight/height/cephalic/bmi for both sexes + female preterm weight
        assert_eq!(demo_dataset().len(), 9);
    }
}
