//! Anthropometric assessment.
//!
//! Pipeline: Age selection → Curve lookup (cached) → Interpolation → Z band → Diagnoses

mod diagnosis;
mod summary;
mod velocity;
mod zscore;

pub use diagnosis::*;
pub use velocity::*;
pub use zscore::*;

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::age::{age_in_days, corrected_age_days, format_age, post_conceptual_age_days, TERM_GESTATION_DAYS};
use crate::config::CoreConfig;
use crate::models::{
    present, Indicator, Measure, PatientProfile, ReferenceCurve, Sex, VisitMeasurement,
};
use crate::reference::{interpolate, ReferenceCache, ReferenceProvider};

/// Format with a fixed number of decimals and a decimal comma.
pub fn format_decimal(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value).replace('.', ",")
}

/// Format with up to two decimals, trailing zeros dropped, decimal comma.
pub fn format_number(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    match trimmed {
        "-0" => "0".to_string(),
        other => other.replace('.', ","),
    }
}

/// Format a date as dd/mm/yyyy.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Every indicator of one visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitAssessment {
    pub date: Option<NaiveDate>,
    /// Chronological age in days
    pub age_days: i64,
    /// Chronological age as text
    pub age_text: String,
    /// Corrected age, for premature patients
    pub corrected_age_days: Option<i64>,
    /// Derived BMI (kg/m²)
    pub bmi: Option<f64>,
    pub weight: ZScoreOutcome,
    pub height: ZScoreOutcome,
    pub cephalic: ZScoreOutcome,
    pub bmi_z: ZScoreOutcome,
    pub bmi_diagnosis: Option<BmiDiagnosis>,
    pub cephalic_diagnosis: Option<CephalicDiagnosis>,
}

impl VisitAssessment {
    /// Serialize for export.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Evaluates measurements against reference curves.
///
/// Owns the session cache. `Send + Sync` whenever the provider is, so one
/// service can be shared across threads.
pub struct AssessmentService<P> {
    provider: P,
    cache: ReferenceCache,
    config: CoreConfig,
}

impl<P: ReferenceProvider> AssessmentService<P> {
    /// Create a service with the default configuration.
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, CoreConfig::default())
    }

    pub fn with_config(provider: P, config: CoreConfig) -> Self {
        Self {
            provider,
            cache: ReferenceCache::new(),
            config,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn cache(&self) -> &ReferenceCache {
        &self.cache
    }

    /// Curve for `(measure, sex)`, through the cache.
    pub fn curve(&self, measure: Measure, sex: Sex) -> Arc<ReferenceCurve> {
        self.cache
            .get_or_fetch(&self.provider, &self.config, measure, sex)
    }

    /// Classify one measurement.
    pub fn evaluate_z_score(
        &self,
        profile: &PatientProfile,
        indicator: Indicator,
        on: Option<NaiveDate>,
        value: Option<f64>,
    ) -> ZScoreOutcome {
        let (Some(value), Some(_), Some(_)) = (present(value), profile.birth_date, on) else {
            return ZScoreOutcome::NotEvaluated;
        };

        let (measure, age_days) = match self.select_curve(profile, indicator, on) {
            Some(selection) => selection,
            None => return ZScoreOutcome::NotApplicable,
        };

        let curve = self.curve(measure, profile.sex);
        let Some(reference) = interpolate(&curve.points, age_days) else {
            debug!(%measure, sex = %profile.sex, "no reference data");
            return ZScoreOutcome::NoReference;
        };

        ZScoreOutcome::Classified(ZScore {
            band: ZBand::classify(value, &reference),
            measure,
            chart: measure.chart(),
            age_days,
            source: curve.source,
        })
    }

    /// Curve and age to read it at. `None` when the indicator has no curve
    /// for this patient at this age.
    fn select_curve(
        &self,
        profile: &PatientProfile,
        indicator: Indicator,
        on: Option<NaiveDate>,
    ) -> Option<(Measure, i64)> {
        let birth = profile.birth_date;
        let weeks = profile.gestational_age_weeks;
        let days = profile.gestational_age_days;

        if profile.has_gestational_age() {
            let pca = post_conceptual_age_days(birth, on, weeks, days);
            if pca > 0 && pca <= TERM_GESTATION_DAYS {
                return indicator.preterm_measure().map(|measure| (measure, pca));
            }
        }

        if profile.is_premature {
            return Some((indicator.who_measure(), corrected_age_days(birth, on, weeks, days)));
        }

        Some((indicator.who_measure(), age_in_days(birth, on)))
    }

    /// Assess every indicator of a visit.
    pub fn assess_visit(&self, profile: &PatientProfile, visit: &VisitMeasurement) -> VisitAssessment {
        let age_days = age_in_days(profile.birth_date, visit.date);
        let bmi = visit.bmi();

        let weight = self.evaluate_z_score(profile, Indicator::Weight, visit.date, visit.weight_g);
        let height = self.evaluate_z_score(profile, Indicator::Height, visit.date, visit.height_cm);
        let cephalic =
            self.evaluate_z_score(profile, Indicator::Cephalic, visit.date, visit.cephalic_cm);
        let bmi_z = self.evaluate_z_score(profile, Indicator::Bmi, visit.date, bmi);

        VisitAssessment {
            date: visit.date,
            age_days,
            age_text: format_age(age_days),
            corrected_age_days: profile.is_premature.then(|| {
                corrected_age_days(
                    profile.birth_date,
                    visit.date,
                    profile.gestational_age_weeks,
                    profile.gestational_age_days,
                )
            }),
            bmi,
            bmi_diagnosis: bmi_z.band().map(BmiDiagnosis::from_band),
            cephalic_diagnosis: cephalic.band().map(CephalicDiagnosis::from_band),
            weight,
            height,
            cephalic,
            bmi_z,
        }
    }
}
