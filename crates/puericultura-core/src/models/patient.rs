//! Patient and visit models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Biological sex as used by the growth references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Masculino,
    Feminino,
}

impl Sex {
    /// Name stored in reference tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Masculino => "Masculino",
            Sex::Feminino => "Feminino",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "masculino" | "m" => Ok(Sex::Masculino),
            "feminino" | "f" => Ok(Sex::Feminino),
            other => Err(format!("unknown sex: {}", other)),
        }
    }
}

/// Largest valid number of extra gestational days.
pub const MAX_GESTATIONAL_DAYS: u32 = 6;

/// Patient data supplied once per assessment. Never mutated by the core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientProfile {
    /// Date of birth
    pub birth_date: Option<NaiveDate>,
    /// Sex
    pub sex: Sex,
    /// Born before 37 weeks
    pub is_premature: bool,
    /// Completed gestational weeks at birth
    pub gestational_age_weeks: Option<u32>,
    /// Extra gestational days (0-6)
    pub gestational_age_days: Option<u32>,
}

impl PatientProfile {
    /// Create a term patient profile.
    pub fn new(birth_date: NaiveDate, sex: Sex) -> Self {
        Self {
            birth_date: Some(birth_date),
            sex,
            is_premature: false,
            gestational_age_weeks: None,
            gestational_age_days: None,
        }
    }

    /// Create a preterm patient profile. Values are stored as given; see [`Self::validate`].
    pub fn preterm(birth_date: NaiveDate, sex: Sex, weeks: u32, days: u32) -> Self {
        Self {
            birth_date: Some(birth_date),
            sex,
            is_premature: true,
            gestational_age_weeks: Some(weeks),
            gestational_age_days: Some(days),
        }
    }

    /// Reject extra gestational days outside 0-6.
    pub fn validate(&self) -> Result<(), String> {
        match self.gestational_age_days {
            Some(days) if days > MAX_GESTATIONAL_DAYS => Err(format!(
                "gestational_age_days must be between 0 and {}, got {}",
                MAX_GESTATIONAL_DAYS, days
            )),
            _ => Ok(()),
        }
    }

    /// Premature with a usable gestational age.
    pub fn has_gestational_age(&self) -> bool {
        self.is_premature && self.gestational_age_weeks.unwrap_or(0) > 0
    }
}

/// Measurements taken at a single visit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VisitMeasurement {
    /// Visit date
    pub date: Option<NaiveDate>,
    /// Weight in grams
    pub weight_g: Option<f64>,
    /// Length/height in cm
    pub height_cm: Option<f64>,
    /// Head circumference in cm
    pub cephalic_cm: Option<f64>,
}

impl VisitMeasurement {
    /// Create a visit with all three measurements.
    pub fn new(date: NaiveDate, weight_g: f64, height_cm: f64, cephalic_cm: f64) -> Self {
        Self {
            date: Some(date),
            weight_g: Some(weight_g),
            height_cm: Some(height_cm),
            cephalic_cm: Some(cephalic_cm),
        }
    }

    /// Body mass index in kg/m². `None` unless weight and height are both non-zero.
    pub fn bmi(&self) -> Option<f64> {
        let weight = present(self.weight_g)?;
        let height = present(self.height_cm)?;
        let meters = height / 100.0;
        Some((weight / 1000.0) / (meters * meters))
    }
}

/// A measurement counts as present when it is a finite, non-zero number.
pub fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi() {
        let visit = VisitMeasurement {
            date: None,
            weight_g: Some(10_000.0),
            height_cm: Some(100.0),
            cephalic_cm: None,
        };
        assert!((visit.bmi().unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_bmi_requires_both() {
        let mut visit = VisitMeasurement::default();
        visit.weight_g = Some(3500.0);
        assert_eq!(visit.bmi(), None);

        visit.height_cm = Some(0.0);
        assert_eq!(visit.bmi(), None);

        visit.height_cm = Some(f64::NAN);
        assert_eq!(visit.bmi(), None);
    }

    #[test]
    fn test_sex_parse() {
        assert_eq!("Feminino".parse::<Sex>().unwrap(), Sex::Feminino);
        assert_eq!("masculino".parse::<Sex>().unwrap(), Sex::Masculino);
        assert!("x".parse::<Sex>().is_err());
    }

    #[test]
    fn test_gestational_age_flag() {
        let birth = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(!PatientProfile::new(birth, Sex::Feminino).has_gestational_age());
        assert!(PatientProfile::preterm(birth, Sex::Feminino, 30, 2).has_gestational_age());

        let mut profile = PatientProfile::preterm(birth, Sex::Feminino, 30, 2);
        profile.gestational_age_weeks = Some(0);
        assert!(!profile.has_gestational_age());
    }

    #[test]
    fn test_gestational_days_kept_and_validated() {
        let birth = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let profile = PatientProfile::preterm(birth, Sex::Masculino, 34, 6);
        assert_eq!(profile.gestational_age_days, Some(6));
        assert!(profile.validate().is_ok());

        let profile = PatientProfile::preterm(birth, Sex::Masculino, 34, 9);
        assert_eq!(profile.gestational_age_days, Some(9));
        assert!(profile.validate().is_err());

        assert!(PatientProfile::new(birth, Sex::Masculino).validate().is_ok());
    }
}
