//! Age arithmetic.
//!
//! Handles:
//! - Chronological age in whole days
//! - Post-conceptual age (gestation at birth + chronological age)
//! - Corrected age for preterm infants
//! - Human-readable age strings

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Average month length in days used for every month conversion.
pub const DAYS_PER_MONTH: f64 = 30.44;

/// Term reference: 40 weeks of gestation.
pub const TERM_GESTATION_DAYS: i64 = 280;

/// Gestational age from which no correction is applied.
pub const TERM_WEEKS: u32 = 37;

/// Marker returned by [`format_age`] for negative ages.
pub const INVALID_AGE: &str = "Idade inválida";

/// Whole days between birth and `on`. Zero when either date is absent.
pub fn age_in_days(birth_date: Option<NaiveDate>, on: Option<NaiveDate>) -> i64 {
    match (birth_date, on) {
        (Some(birth), Some(on)) => (on - birth).num_days(),
        _ => 0,
    }
}

/// Format a day count as days, months+days or years+months.
pub fn format_age(days: i64) -> String {
    if days < 0 {
        return INVALID_AGE.to_string();
    }
    if days < 30 {
        return format!("{} dias", days);
    }

    let days = days as f64;
    let months = (days / DAYS_PER_MONTH).floor() as i64;
    let remaining_days = (days % DAYS_PER_MONTH).floor() as i64;

    if months >= 12 {
        format!("{} anos e {} meses", months / 12, months % 12)
    } else {
        format!("{} meses e {} dias", months, remaining_days)
    }
}

/// Gestation at birth in days, `None` when weeks are absent or zero.
pub fn gestation_days(weeks: Option<u32>, days: Option<u32>) -> Option<i64> {
    match weeks {
        Some(w) if w > 0 => Some(w as i64 * 7 + days.unwrap_or(0) as i64),
        _ => None,
    }
}

/// Post-conceptual age in days. Zero when gestational weeks are absent.
pub fn post_conceptual_age_days(
    birth_date: Option<NaiveDate>,
    on: Option<NaiveDate>,
    gest_weeks: Option<u32>,
    gest_days: Option<u32>,
) -> i64 {
    match gestation_days(gest_weeks, gest_days) {
        Some(gestation) => gestation + age_in_days(birth_date, on),
        None => 0,
    }
}

/// Age corrected for prematurity, clamped at zero.
///
/// Term infants (>= 37 weeks) and unknown gestations get the plain
/// chronological age.
pub fn corrected_age_days(
    birth_date: Option<NaiveDate>,
    on: Option<NaiveDate>,
    gest_weeks: Option<u32>,
    gest_days: Option<u32>,
) -> i64 {
    let chronological = age_in_days(birth_date, on);

    let gestation = match gestation_days(gest_weeks, gest_days) {
        Some(g) if gest_weeks.unwrap_or(0) < TERM_WEEKS => g,
        _ => return chronological,
    };

    (chronological - (TERM_GESTATION_DAYS - gestation)).max(0)
}

/// Preterm birth categories by completed gestational weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrematurityClass {
    /// <= 27 weeks
    ExtremelyPreterm,
    /// 28-31 weeks
    VeryPreterm,
    /// 32-33 weeks
    ModeratePreterm,
    /// 34-36 weeks
    LatePreterm,
}

impl PrematurityClass {
    /// Classify a gestational age. Term (>= 37) or absent gives `None`.
    pub fn from_gestational_weeks(weeks: Option<u32>) -> Option<Self> {
        match weeks? {
            0 => None,
            1..=27 => Some(Self::ExtremelyPreterm),
            28..=31 => Some(Self::VeryPreterm),
            32..=33 => Some(Self::ModeratePreterm),
            34..=36 => Some(Self::LatePreterm),
            _ => None,
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExtremelyPreterm => "Prematuro extremo",
            Self::VeryPreterm => "Muito prematuro",
            Self::ModeratePreterm => "Prematuro moderado",
            Self::LatePreterm => "Prematuro tardio",
        }
    }

    /// Stable code, independent of the display locale.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ExtremelyPreterm => "extremely_preterm",
            Self::VeryPreterm => "very_preterm",
            Self::ModeratePreterm => "moderate_preterm",
            Self::LatePreterm => "late_preterm",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> Option<NaiveDate> {
        Some(NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap())
    }

    #[test]
    fn test_age_in_days() {
        assert_eq!(age_in_days(date("2024-01-01"), date("2024-01-01")), 0);
        assert_eq!(age_in_days(date("2024-01-01"), date("2024-01-15")), 14);
        // Leap year
        assert_eq!(age_in_days(date("2024-01-01"), date("2025-01-01")), 366);
        assert_eq!(age_in_days(date("2024-01-10"), date("2024-01-01")), -9);
    }

    #[test]
    fn test_age_in_days_missing_date() {
        assert_eq!(age_in_days(None, date("2024-01-01")), 0);
        assert_eq!(age_in_days(date("2024-01-01"), None), 0);
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(0), "0 dias");
        assert_eq!(format_age(29), "29 dias");
        // 30 / 30.44 < 1
        assert_eq!(format_age(30), "0 meses e 30 dias");
        assert_eq!(format_age(100), "3 meses e 8 dias");
        assert_eq!(format_age(366), "1 anos e 0 meses");
        assert_eq!(format_age(800), "2 anos e 2 meses");
    }

    #[test]
    fn test_format_age_negative() {
        assert_eq!(format_age(-1), INVALID_AGE);
    }

    #[test]
    fn test_post_conceptual_age() {
        // 30+2 weeks = 212 days, plus 10 days of life
        assert_eq!(
            post_conceptual_age_days(date("2024-01-01"), date("2024-01-11"), Some(30), Some(2)),
            222
        );
        assert_eq!(
            post_conceptual_age_days(date("2024-01-01"), date("2024-01-11"), None, Some(2)),
            0
        );
        assert_eq!(
            post_conceptual_age_days(date("2024-01-01"), date("2024-01-11"), Some(0), Some(2)),
            0
        );
    }

    #[test]
    fn test_corrected_age_term_is_chronological() {
        let birth = date("2024-01-01");
        let on = date("2024-03-01");
        assert_eq!(corrected_age_days(birth, on, Some(37), Some(0)), age_in_days(birth, on));
        assert_eq!(corrected_age_days(birth, on, Some(40), Some(3)), age_in_days(birth, on));
        assert_eq!(corrected_age_days(birth, on, None, None), age_in_days(birth, on));
    }

    #[test]
    fn test_corrected_age_preterm() {
        // 32+0 weeks: deficit 56 days. 100 days old -> 44 corrected.
        let birth = date("2024-01-01");
        let on = birth.map(|b| b + chrono::Duration::days(100));
        assert_eq!(corrected_age_days(birth, on, Some(32), Some(0)), 44);
    }

    #[test]
    fn test_corrected_age_clamped() {
        let birth = date("2024-01-01");
        let on = date("2024-01-11");
        assert_eq!(corrected_age_days(birth, on, Some(28), Some(0)), 0);
    }

    #[test]
    fn test_prematurity_classification() {
        use PrematurityClass::*;
        assert_eq!(PrematurityClass::from_gestational_weeks(Some(24)), Some(ExtremelyPreterm));
        assert_eq!(PrematurityClass::from_gestational_weeks(Some(27)), Some(ExtremelyPreterm));
        assert_eq!(PrematurityClass::from_gestational_weeks(Some(28)), Some(VeryPreterm));
        assert_eq!(PrematurityClass::from_gestational_weeks(Some(31)), Some(VeryPreterm));
        assert_eq!(PrematurityClass::from_gestational_weeks(Some(32)), Some(ModeratePreterm));
        assert_eq!(PrematurityClass::from_gestational_weeks(Some(33)), Some(ModeratePreterm));
        assert_eq!(PrematurityClass::from_gestational_weeks(Some(34)), Some(LatePreterm));
        assert_eq!(PrematurityClass::from_gestational_weeks(Some(36)), Some(LatePreterm));
        assert_eq!(PrematurityClass::from_gestational_weeks(Some(37)), None);
        assert_eq!(PrematurityClass::from_gestational_weeks(None), None);
    }
}
