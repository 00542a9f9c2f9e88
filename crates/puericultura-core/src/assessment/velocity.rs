//! Growth velocity between two visits.
//!
//! Handles:
//! - Weight gain in g/day against age-banded expectations
//! - Length growth in cm/month against age-banded expectations
//! - Head circumference growth in cm/month (informational)

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::format_decimal;
use crate::age::{age_in_days, DAYS_PER_MONTH};
use crate::models::{present, VisitMeasurement};

/// How a rate compares with its expected range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrowthInterpretation {
    BelowExpected,
    Adequate,
    AboveExpected,
}

impl GrowthInterpretation {
    pub fn label(&self) -> &'static str {
        match self {
            GrowthInterpretation::BelowExpected => "Abaixo do esperado",
            GrowthInterpretation::Adequate => "Adequado",
            GrowthInterpretation::AboveExpected => "Acima do esperado",
        }
    }
}

/// Inclusive expected range of a rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedRange {
    pub min: f64,
    pub max: f64,
}

impl ExpectedRange {
    const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn interpret(&self, rate: f64) -> GrowthInterpretation {
        if rate < self.min {
            GrowthInterpretation::BelowExpected
        } else if rate > self.max {
            GrowthInterpretation::AboveExpected
        } else {
            GrowthInterpretation::Adequate
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VelocityUnit {
    GramsPerDay,
    CmPerMonth,
}

impl VelocityUnit {
    pub fn suffix(&self) -> &'static str {
        match self {
            VelocityUnit::GramsPerDay => "g/dia",
            VelocityUnit::CmPerMonth => "cm/mês",
        }
    }
}

/// Result of a velocity evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VelocityOutcome {
    /// A value or date is missing
    Missing,
    /// The current visit is not after the previous one
    DateError,
    /// Rate checked against an expected range
    Classified {
        rate: f64,
        unit: VelocityUnit,
        interpretation: GrowthInterpretation,
    },
    /// Rate reported alongside its expected range
    Informational {
        rate: f64,
        unit: VelocityUnit,
        expected: ExpectedRange,
    },
}

impl VelocityOutcome {
    pub fn rate(&self) -> Option<f64> {
        match self {
            VelocityOutcome::Classified { rate, .. } | VelocityOutcome::Informational { rate, .. } => {
                Some(*rate)
            }
            _ => None,
        }
    }

    pub fn interpretation(&self) -> Option<GrowthInterpretation> {
        match self {
            VelocityOutcome::Classified { interpretation, .. } => Some(*interpretation),
            _ => None,
        }
    }

    pub fn is_date_error(&self) -> bool {
        matches!(self, VelocityOutcome::DateError)
    }
}

impl fmt::Display for VelocityOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VelocityOutcome::Missing => Ok(()),
            VelocityOutcome::DateError => f.write_str("Erro data"),
            VelocityOutcome::Classified {
                rate,
                unit,
                interpretation,
            } => write!(
                f,
                "{} {} ({})",
                format_decimal(*rate, 1),
                unit.suffix(),
                interpretation.label()
            ),
            VelocityOutcome::Informational {
                rate,
                unit,
                expected,
            } => write!(
                f,
                "{} {} (esperado: {} a {} {})",
                format_decimal(*rate, 1),
                unit.suffix(),
                format_decimal(expected.min, 1),
                format_decimal(expected.max, 1),
                unit.suffix()
            ),
        }
    }
}

/// Expected daily weight gain (g/day). `None` after the first year.
pub fn weight_gain_range(age_days: i64) -> Option<ExpectedRange> {
    match age_days {
        ..=90 => Some(ExpectedRange::new(20.0, 30.0)),
        91..=180 => Some(ExpectedRange::new(15.0, 25.0)),
        181..=270 => Some(ExpectedRange::new(10.0, 20.0)),
        271..=365 => Some(ExpectedRange::new(5.0, 15.0)),
        _ => None,
    }
}

/// Expected monthly length growth (cm/month). `None` after the first year.
pub fn height_growth_range(age_days: i64) -> Option<ExpectedRange> {
    match age_days {
        ..=182 => Some(ExpectedRange::new(2.0, 3.0)),
        183..=365 => Some(ExpectedRange::new(1.0, 2.0)),
        _ => None,
    }
}

/// Expected monthly head circumference growth (cm/month).
pub fn cephalic_growth_range(age_days: i64) -> ExpectedRange {
    match age_days {
        ..=90 => ExpectedRange::new(1.5, 2.0),
        91..=180 => ExpectedRange::new(0.5, 1.0),
        181..=365 => ExpectedRange::new(0.3, 0.5),
        _ => ExpectedRange::new(0.1, 0.3),
    }
}

/// Change and interval between two dated values.
struct Delta {
    change: f64,
    interval_days: i64,
    age_days: i64,
}

fn delta(
    birth_date: Option<NaiveDate>,
    prev_date: Option<NaiveDate>,
    prev_value: Option<f64>,
    curr_date: Option<NaiveDate>,
    curr_value: Option<f64>,
) -> Result<Delta, VelocityOutcome> {
    let (Some(prev_date), Some(prev), Some(curr_date), Some(curr)) =
        (prev_date, present(prev_value), curr_date, present(curr_value))
    else {
        return Err(VelocityOutcome::Missing);
    };

    let interval_days = (curr_date - prev_date).num_days();
    if interval_days <= 0 {
        return Err(VelocityOutcome::DateError);
    }

    Ok(Delta {
        change: curr - prev,
        interval_days,
        age_days: age_in_days(birth_date, Some(curr_date)),
    })
}

/// Daily weight gain between two visits (grams).
pub fn evaluate_weight_gain(
    birth_date: Option<NaiveDate>,
    prev_date: Option<NaiveDate>,
    prev_weight_g: Option<f64>,
    curr_date: Option<NaiveDate>,
    curr_weight_g: Option<f64>,
) -> VelocityOutcome {
    let d = match delta(birth_date, prev_date, prev_weight_g, curr_date, curr_weight_g) {
        Ok(d) => d,
        Err(outcome) => return outcome,
    };

    let rate = d.change / d.interval_days as f64;
    let interpretation = weight_gain_range(d.age_days)
        .map(|range| range.interpret(rate))
        .unwrap_or(GrowthInterpretation::Adequate);

    VelocityOutcome::Classified {
        rate,
        unit: VelocityUnit::GramsPerDay,
        interpretation,
    }
}

/// Monthly length growth between two visits (cm).
pub fn evaluate_height_growth(
    birth_date: Option<NaiveDate>,
    prev_date: Option<NaiveDate>,
    prev_height_cm: Option<f64>,
    curr_date: Option<NaiveDate>,
    curr_height_cm: Option<f64>,
) -> VelocityOutcome {
    let d = match delta(birth_date, prev_date, prev_height_cm, curr_date, curr_height_cm) {
        Ok(d) => d,
        Err(outcome) => return outcome,
    };

    let rate = d.change / d.interval_days as f64 * DAYS_PER_MONTH;
    let interpretation = height_growth_range(d.age_days)
        .map(|range| range.interpret(rate))
        .unwrap_or(GrowthInterpretation::Adequate);

    VelocityOutcome::Classified {
        rate,
        unit: VelocityUnit::CmPerMonth,
        interpretation,
    }
}

/// Monthly head circumference growth between two visits (cm).
pub fn evaluate_cephalic_growth(
    birth_date: Option<NaiveDate>,
    prev_date: Option<NaiveDate>,
    prev_cephalic_cm: Option<f64>,
    curr_date: Option<NaiveDate>,
    curr_cephalic_cm: Option<f64>,
) -> VelocityOutcome {
    let d = match delta(birth_date, prev_date, prev_cephalic_cm, curr_date, curr_cephalic_cm) {
        Ok(d) => d,
        Err(outcome) => return outcome,
    };

    VelocityOutcome::Informational {
        rate: d.change / d.interval_days as f64 * DAYS_PER_MONTH,
        unit: VelocityUnit::CmPerMonth,
        expected: cephalic_growth_range(d.age_days),
    }
}

/// Velocities of all three measures between two visits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthVelocity {
    pub weight: VelocityOutcome,
    pub height: VelocityOutcome,
    pub cephalic: VelocityOutcome,
}

impl GrowthVelocity {
    pub fn between(
        birth_date: Option<NaiveDate>,
        prev: &VisitMeasurement,
        curr: &VisitMeasurement,
    ) -> Self {
        Self {
            weight: evaluate_weight_gain(birth_date, prev.date, prev.weight_g, curr.date, curr.weight_g),
            height: evaluate_height_growth(birth_date, prev.date, prev.height_cm, curr.date, curr.height_cm),
            cephalic: evaluate_cephalic_growth(
                birth_date,
                prev.date,
                prev.cephalic_cm,
                curr.date,
                curr.cephalic_cm,
            ),
        }
    }
}
