//! Growth reference models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::patient::Sex;

/// Key of a reference curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Weight,
    Height,
    Cephalic,
    Bmi,
    PretermWeight,
    PretermHeight,
    PretermCephalic,
}

impl Measure {
    pub const ALL: [Measure; 7] = [
        Measure::Weight,
        Measure::Height,
        Measure::Cephalic,
        Measure::Bmi,
        Measure::PretermWeight,
        Measure::PretermHeight,
        Measure::PretermCephalic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Measure::Weight => "weight",
            Measure::Height => "height",
            Measure::Cephalic => "cephalic",
            Measure::Bmi => "bmi",
            Measure::PretermWeight => "preterm_weight",
            Measure::PretermHeight => "preterm_height",
            Measure::PretermCephalic => "preterm_cephalic",
        }
    }

    /// INTERGROWTH-21 curve (valid up to 40 weeks post-conceptual age).
    pub fn is_preterm(&self) -> bool {
        matches!(
            self,
            Measure::PretermWeight | Measure::PretermHeight | Measure::PretermCephalic
        )
    }

    /// Measure name without the chart prefix, as stored per table.
    pub fn base_name(&self) -> &'static str {
        match self {
            Measure::Weight | Measure::PretermWeight => "weight",
            Measure::Height | Measure::PretermHeight => "height",
            Measure::Cephalic | Measure::PretermCephalic => "cephalic",
            Measure::Bmi => "bmi",
        }
    }

    pub fn chart(&self) -> Chart {
        if self.is_preterm() {
            Chart::Intergrowth
        } else {
            Chart::Who
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Measure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Measure::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown measure: {}", s))
    }
}

/// Anthropometric indicator assessed for a patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Weight,
    Height,
    Cephalic,
    Bmi,
}

impl Indicator {
    pub const ALL: [Indicator; 4] = [
        Indicator::Weight,
        Indicator::Height,
        Indicator::Cephalic,
        Indicator::Bmi,
    ];

    /// WHO curve for this indicator.
    pub fn who_measure(&self) -> Measure {
        match self {
            Indicator::Weight => Measure::Weight,
            Indicator::Height => Measure::Height,
            Indicator::Cephalic => Measure::Cephalic,
            Indicator::Bmi => Measure::Bmi,
        }
    }

    /// INTERGROWTH-21 curve. BMI has none.
    pub fn preterm_measure(&self) -> Option<Measure> {
        match self {
            Indicator::Weight => Some(Measure::PretermWeight),
            Indicator::Height => Some(Measure::PretermHeight),
            Indicator::Cephalic => Some(Measure::PretermCephalic),
            Indicator::Bmi => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.who_measure().as_str()
    }
}

impl FromStr for Indicator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Indicator::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown indicator: {}", s))
    }
}

/// Growth standard a curve belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Chart {
    /// WHO child growth standards (term infants)
    Who,
    /// INTERGROWTH-21 preterm standard
    Intergrowth,
}

impl Chart {
    pub fn as_str(&self) -> &'static str {
        match self {
            Chart::Who => "who",
            Chart::Intergrowth => "intergrowth",
        }
    }
}

/// Where a curve came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Returned by the reference provider
    Live,
    /// Built-in demonstration data
    Fallback,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Live => "live",
            DataSource::Fallback => "fallback",
        }
    }
}

/// Z-band boundaries at a given age.
///
/// `z_neg_4`/`z_pos_4` are absent in INTERGROWTH-21 tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceDataPoint {
    pub age_days: i64,
    pub z_neg_4: Option<f64>,
    pub z_neg_3: f64,
    pub z_neg_2: f64,
    pub z_neg_1: f64,
    pub z_0: f64,
    pub z_pos_1: f64,
    pub z_pos_2: f64,
    pub z_pos_3: f64,
    pub z_pos_4: Option<f64>,
}

impl ReferenceDataPoint {
    /// Row with all nine boundaries, ordered from -4 to +4.
    pub fn who(age_days: i64, values: [f64; 9]) -> Self {
        Self {
            age_days,
            z_neg_4: Some(values[0]),
            z_neg_3: values[1],
            z_neg_2: values[2],
            z_neg_1: values[3],
            z_0: values[4],
            z_pos_1: values[5],
            z_pos_2: values[6],
            z_pos_3: values[7],
            z_pos_4: Some(values[8]),
        }
    }

    /// Row without the ±4 boundaries, ordered from -3 to +3.
    pub fn intergrowth(age_days: i64, values: [f64; 7]) -> Self {
        Self {
            age_days,
            z_neg_4: None,
            z_neg_3: values[0],
            z_neg_2: values[1],
            z_neg_1: values[2],
            z_0: values[3],
            z_pos_1: values[4],
            z_pos_2: values[5],
            z_pos_3: values[6],
            z_pos_4: None,
        }
    }

    /// Apply `f` to every boundary value.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            age_days: self.age_days,
            z_neg_4: self.z_neg_4.map(&f),
            z_neg_3: f(self.z_neg_3),
            z_neg_2: f(self.z_neg_2),
            z_neg_1: f(self.z_neg_1),
            z_0: f(self.z_0),
            z_pos_1: f(self.z_pos_1),
            z_pos_2: f(self.z_pos_2),
            z_pos_3: f(self.z_pos_3),
            z_pos_4: self.z_pos_4.map(&f),
        }
    }
}

/// A full reference curve with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceCurve {
    pub measure: Measure,
    pub sex: Sex,
    pub points: Vec<ReferenceDataPoint>,
    pub source: DataSource,
}

impl ReferenceCurve {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// SHA-256 of the curve's canonical JSON (points only, hex-encoded).
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(&(self.measure, self.sex, &self.points))?;
        Ok(hex::encode(Sha256::digest(json.as_bytes())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_round_trip_names() {
        for measure in Measure::ALL {
            assert_eq!(measure.as_str().parse::<Measure>().unwrap(), measure);
        }
        assert!("height_for_age".parse::<Measure>().is_err());
    }

    #[test]
    fn test_indicator_curves() {
        assert_eq!(Indicator::Weight.preterm_measure(), Some(Measure::PretermWeight));
        assert_eq!(Indicator::Bmi.preterm_measure(), None);
        assert_eq!(Measure::PretermCephalic.base_name(), "cephalic");
        assert_eq!(Measure::PretermCephalic.chart(), Chart::Intergrowth);
        assert_eq!(Measure::Bmi.chart(), Chart::Who);
    }

    #[test]
    fn test_fingerprint_stable_and_source_independent() {
        let points = vec![ReferenceDataPoint::intergrowth(
            168,
            [340.0, 410.0, 500.0, 600.0, 730.0, 890.0, 1070.0],
        )];
        let live = ReferenceCurve {
            measure: Measure::PretermWeight,
            sex: Sex::Feminino,
            points: points.clone(),
            source: DataSource::Live,
        };
        let fallback = ReferenceCurve {
            source: DataSource::Fallback,
            ..live.clone()
        };

        let hash = live.fingerprint().unwrap();
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, fallback.fingerprint().unwrap());

        let other = ReferenceCurve {
            sex: Sex::Masculino,
            ..live
        };
        assert_ne!(hash, other.fingerprint().unwrap());
    }
}
