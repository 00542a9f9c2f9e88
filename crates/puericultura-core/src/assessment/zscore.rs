//! Z-band classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{Chart, DataSource, Measure, ReferenceDataPoint};

/// One of the eight half-open bands between the reference boundaries,
/// ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZBand {
    /// (-inf, z-3)
    BelowMinus3,
    /// [z-3, z-2)
    Minus3ToMinus2,
    /// [z-2, z-1)
    Minus2ToMinus1,
    /// [z-1, z0)
    Minus1ToZero,
    /// [z0, z+1)
    ZeroToPlus1,
    /// [z+1, z+2)
    Plus1ToPlus2,
    /// [z+2, z+3)
    Plus2ToPlus3,
    /// [z+3, +inf)
    AbovePlus3,
}

impl ZBand {
    pub const ALL: [ZBand; 8] = [
        ZBand::BelowMinus3,
        ZBand::Minus3ToMinus2,
        ZBand::Minus2ToMinus1,
        ZBand::Minus1ToZero,
        ZBand::ZeroToPlus1,
        ZBand::Plus1ToPlus2,
        ZBand::Plus2ToPlus3,
        ZBand::AbovePlus3,
    ];

    /// Band containing `value`. Callers screen out NaN beforehand.
    pub fn classify(value: f64, reference: &ReferenceDataPoint) -> Self {
        if value < reference.z_neg_3 {
            ZBand::BelowMinus3
        } else if value < reference.z_neg_2 {
            ZBand::Minus3ToMinus2
        } else if value < reference.z_neg_1 {
            ZBand::Minus2ToMinus1
        } else if value < reference.z_0 {
            ZBand::Minus1ToZero
        } else if value < reference.z_pos_1 {
            ZBand::ZeroToPlus1
        } else if value < reference.z_pos_2 {
            ZBand::Plus1ToPlus2
        } else if value < reference.z_pos_3 {
            ZBand::Plus2ToPlus3
        } else {
            ZBand::AbovePlus3
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            ZBand::BelowMinus3 => "< -3 (Muito Baixo)",
            ZBand::Minus3ToMinus2 => "Entre -3 e -2",
            ZBand::Minus2ToMinus1 => "Entre -2 e -1",
            ZBand::Minus1ToZero => "Entre -1 e 0",
            ZBand::ZeroToPlus1 => "Entre 0 e +1",
            ZBand::Plus1ToPlus2 => "Entre +1 e +2",
            ZBand::Plus2ToPlus3 => "Entre +2 e +3",
            ZBand::AbovePlus3 => "> +3",
        }
    }

    /// Stable code, independent of the display locale.
    pub fn code(&self) -> &'static str {
        match self {
            ZBand::BelowMinus3 => "below_minus_3",
            ZBand::Minus3ToMinus2 => "minus_3_to_minus_2",
            ZBand::Minus2ToMinus1 => "minus_2_to_minus_1",
            ZBand::Minus1ToZero => "minus_1_to_zero",
            ZBand::ZeroToPlus1 => "zero_to_plus_1",
            ZBand::Plus1ToPlus2 => "plus_1_to_plus_2",
            ZBand::Plus2ToPlus3 => "plus_2_to_plus_3",
            ZBand::AbovePlus3 => "above_plus_3",
        }
    }
}

impl fmt::Display for ZBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ZBand {
    type Err = String;

    /// Accepts a display label or a code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ZBand::ALL
            .iter()
            .copied()
            .find(|band| band.label() == s || band.code() == s)
            .ok_or_else(|| format!("not a Z band: {}", s))
    }
}

/// A classified measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZScore {
    pub band: ZBand,
    /// Curve used
    pub measure: Measure,
    pub chart: Chart,
    /// Age the curve was read at (chronological, corrected or post-conceptual)
    pub age_days: i64,
    pub source: DataSource,
}

/// Result of a Z-score evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ZScoreOutcome {
    /// Missing value or date
    NotEvaluated,
    /// No curve exists for this indicator at this age (BMI in the preterm window)
    NotApplicable,
    /// Curve empty after fetch and fallback
    NoReference,
    Classified(ZScore),
}

impl ZScoreOutcome {
    pub fn band(&self) -> Option<ZBand> {
        match self {
            ZScoreOutcome::Classified(z) => Some(z.band),
            _ => None,
        }
    }

    pub fn source(&self) -> Option<DataSource> {
        match self {
            ZScoreOutcome::Classified(z) => Some(z.source),
            _ => None,
        }
    }

    /// Display label; empty when not evaluated.
    pub fn label(&self) -> &'static str {
        match self {
            ZScoreOutcome::NotEvaluated => "",
            ZScoreOutcome::NotApplicable => "Não se aplica",
            ZScoreOutcome::NoReference => "N/A",
            ZScoreOutcome::Classified(z) => z.band.label(),
        }
    }
}

impl fmt::Display for ZScoreOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
