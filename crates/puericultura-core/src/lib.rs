//! Puericultura Core Library
//!
//! Pediatric growth assessment and vaccination schedule engine.
//!
//! # Architecture
//!
//! ```text
//! Patient profile + visit(s)
//!            │
//!            ▼
//!      Age selection ──────────────┐
//!  (chronological / corrected /    │
//!   post-conceptual)               │
//!            │                     │
//!            ▼                     │
//!   Reference provider             │
//!   (SQLite / in-memory)           │
//!            │ empty or error      │
//!            ├──────► Demo fallback│
//!            ▼                     │
//!     Session cache                │
//!            │                     │
//!            ▼                     ▼
//!      Interpolation        Velocity evaluators
//!            │                     │
//!            ▼                     │
//!         Z band ─► Diagnoses      │
//!            │                     │
//!            └──────────┬──────────┘
//!                       ▼
//!                 Clinical summary
//! ```
//!
//! The vaccination engine only depends on age arithmetic.
//!
//! # Modules
//!
//! - [`age`]: Age arithmetic and prematurity classification
//! - [`models`]: Domain types (PatientProfile, VisitMeasurement, ReferenceDataPoint, VaccineRule, etc.)
//! - [`reference`]: Provider trait, demo data, session cache, interpolation
//! - [`db`]: SQLite reference tables
//! - [`assessment`]: Z bands, diagnoses, growth velocity, summary
//! - [`vaccine`]: Vaccination calendar and status engine
//! - [`config`]: Startup configuration

pub mod age;
pub mod assessment;
pub mod config;
pub mod db;
pub mod models;
pub mod reference;
pub mod vaccine;

// Re-export commonly used types
pub use assessment::{AssessmentService, VisitAssessment, ZBand, ZScoreOutcome};
pub use config::CoreConfig;
pub use db::Database;
pub use models::{
    DataSource, Indicator, Measure, PatientProfile, ReferenceDataPoint, Sex, VaccineRule,
    VaccineState, VaccineStatus, VisitMeasurement,
};
pub use reference::{InMemoryProvider, ReferenceProvider};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use assessment::VelocityOutcome;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PuericulturaError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Reference error: {0}")]
    ReferenceError(String),
}

impl From<db::DbError> for PuericulturaError {
    fn from(e: db::DbError) -> Self {
        PuericulturaError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for PuericulturaError {
    fn from(e: serde_json::Error) -> Self {
        PuericulturaError::SerializationError(e.to_string())
    }
}

impl From<reference::ReferenceError> for PuericulturaError {
    fn from(e: reference::ReferenceError) -> Self {
        PuericulturaError::ReferenceError(e.to_string())
    }
}

impl From<config::ConfigError> for PuericulturaError {
    fn from(e: config::ConfigError) -> Self {
        PuericulturaError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for PuericulturaError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        PuericulturaError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

/// Parse an FFI date. Empty means absent.
fn parse_date(value: &str) -> Result<Option<NaiveDate>, PuericulturaError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| PuericulturaError::InvalidInput(format!("invalid date '{}': {}", value, e)))
}

fn require_date(value: &str, field: &str) -> Result<NaiveDate, PuericulturaError> {
    parse_date(value)?.ok_or_else(|| PuericulturaError::InvalidInput(format!("{} is required", field)))
}

fn parse_field<T: std::str::FromStr<Err = String>>(value: &str) -> Result<T, PuericulturaError> {
    value.parse().map_err(PuericulturaError::InvalidInput)
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a reference database at the given path.
#[uniffi::export]
pub fn open_reference_database(path: String) -> Result<Arc<PuericulturaCore>, PuericulturaError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(PuericulturaCore::new(db, CoreConfig::default())))
}

/// Open a reference database with an explicit configuration.
#[uniffi::export]
pub fn open_reference_database_with_config(
    path: String,
    config: FfiCoreConfig,
) -> Result<Arc<PuericulturaCore>, PuericulturaError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(PuericulturaCore::new(db, config.into())))
}

/// Create an in-memory reference database (for testing).
#[uniffi::export]
pub fn open_reference_database_in_memory() -> Result<Arc<PuericulturaCore>, PuericulturaError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(PuericulturaCore::new(db, CoreConfig::default())))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe assessment service for FFI.
#[derive(uniffi::Object)]
pub struct PuericulturaCore {
    service: AssessmentService<Mutex<Database>>,
}

impl PuericulturaCore {
    pub fn new(db: Database, config: CoreConfig) -> Self {
        Self {
            service: AssessmentService::with_config(Mutex::new(db), config),
        }
    }

    pub fn service(&self) -> &AssessmentService<Mutex<Database>> {
        &self.service
    }
}

#[uniffi::export]
impl PuericulturaCore {
    // =========================================================================
    // Assessment Operations
    // =========================================================================

    /// Classify one measurement.
    pub fn evaluate_z_score(
        &self,
        profile: FfiPatientProfile,
        indicator: String,
        date: String,
        value: Option<f64>,
    ) -> Result<FfiZScore, PuericulturaError> {
        let profile = PatientProfile::try_from(profile)?;
        let indicator: Indicator = parse_field(&indicator)?;
        let outcome = self
            .service
            .evaluate_z_score(&profile, indicator, parse_date(&date)?, value);
        Ok(outcome.into())
    }

    /// Assess every indicator of a visit.
    pub fn assess_visit(
        &self,
        profile: FfiPatientProfile,
        visit: FfiVisitMeasurement,
    ) -> Result<FfiVisitAssessment, PuericulturaError> {
        let profile = PatientProfile::try_from(profile)?;
        let visit = VisitMeasurement::try_from(visit)?;
        Ok(self.service.assess_visit(&profile, &visit).into())
    }

    /// Assess a visit and export it as JSON.
    pub fn assess_visit_json(
        &self,
        profile: FfiPatientProfile,
        visit: FfiVisitMeasurement,
    ) -> Result<String, PuericulturaError> {
        let profile = PatientProfile::try_from(profile)?;
        let visit = VisitMeasurement::try_from(visit)?;
        Ok(self.service.assess_visit(&profile, &visit).to_json()?)
    }

    /// Render the anthropometric summary.
    pub fn generate_summary(
        &self,
        profile: FfiPatientProfile,
        previous: FfiVisitMeasurement,
        current: FfiVisitMeasurement,
        is_first_consultation: bool,
    ) -> Result<String, PuericulturaError> {
        let profile = PatientProfile::try_from(profile)?;
        let previous = VisitMeasurement::try_from(previous)?;
        let current = VisitMeasurement::try_from(current)?;
        Ok(self
            .service
            .generate_summary(&profile, &previous, &current, is_first_consultation))
    }

    // =========================================================================
    // Reference Data Operations
    // =========================================================================

    /// Seed the demonstration reference tables.
    pub fn seed_demo_data(&self) -> Result<FfiSeedReport, PuericulturaError> {
        let db = self.service.provider().lock()?;
        Ok(db.seed_demo_data()?.into())
    }

    /// Provenance of the curve used for `(measure, sex)`.
    pub fn curve_source(
        &self,
        measure: String,
        sex: String,
    ) -> Result<FfiCurveSource, PuericulturaError> {
        let measure: Measure = parse_field(&measure)?;
        let sex: Sex = parse_field(&sex)?;
        let curve = self.service.curve(measure, sex);

        Ok(FfiCurveSource {
            measure: curve.measure.as_str().to_string(),
            sex: curve.sex.as_str().to_string(),
            source: curve.source.as_str().to_string(),
            rows: curve.points.len() as u32,
            fingerprint: curve.fingerprint()?,
        })
    }
}

// =========================================================================
// Stateless Operations
// =========================================================================

/// Whole days between two `YYYY-MM-DD` dates. Zero when either is empty.
#[uniffi::export]
pub fn age_in_days(birth_date: String, on: String) -> Result<i64, PuericulturaError> {
    Ok(age::age_in_days(parse_date(&birth_date)?, parse_date(&on)?))
}

/// Human-readable age.
#[uniffi::export]
pub fn format_age(days: i64) -> String {
    age::format_age(days)
}

/// Daily weight gain between two visits.
#[uniffi::export]
pub fn evaluate_weight_gain(
    birth_date: String,
    prev_date: String,
    prev_weight_g: Option<f64>,
    curr_date: String,
    curr_weight_g: Option<f64>,
) -> Result<FfiVelocity, PuericulturaError> {
    Ok(assessment::evaluate_weight_gain(
        parse_date(&birth_date)?,
        parse_date(&prev_date)?,
        prev_weight_g,
        parse_date(&curr_date)?,
        curr_weight_g,
    )
    .into())
}

/// Monthly length growth between two visits.
#[uniffi::export]
pub fn evaluate_height_growth(
    birth_date: String,
    prev_date: String,
    prev_height_cm: Option<f64>,
    curr_date: String,
    curr_height_cm: Option<f64>,
) -> Result<FfiVelocity, PuericulturaError> {
    Ok(assessment::evaluate_height_growth(
        parse_date(&birth_date)?,
        parse_date(&prev_date)?,
        prev_height_cm,
        parse_date(&curr_date)?,
        curr_height_cm,
    )
    .into())
}

/// Monthly head circumference growth between two visits.
#[uniffi::export]
pub fn evaluate_cephalic_growth(
    birth_date: String,
    prev_date: String,
    prev_cephalic_cm: Option<f64>,
    curr_date: String,
    curr_cephalic_cm: Option<f64>,
) -> Result<FfiVelocity, PuericulturaError> {
    Ok(assessment::evaluate_cephalic_growth(
        parse_date(&birth_date)?,
        parse_date(&prev_date)?,
        prev_cephalic_cm,
        parse_date(&curr_date)?,
        curr_cephalic_cm,
    )
    .into())
}

/// BMI diagnosis for a Z band label. Empty when the label is not a band.
#[uniffi::export]
pub fn bmi_diagnosis(z_label: String) -> String {
    assessment::bmi_diagnosis_for_label(&z_label)
}

/// Head circumference diagnosis for a Z band label. Empty when the label is not a band.
#[uniffi::export]
pub fn cephalic_diagnosis(z_label: String) -> String {
    assessment::cephalic_diagnosis_for_label(&z_label)
}

/// Prematurity class label. Empty for term or unknown gestations.
#[uniffi::export]
pub fn prematurity_classification(gestational_age_weeks: Option<u32>) -> String {
    age::PrematurityClass::from_gestational_weeks(gestational_age_weeks)
        .map(|class| class.label().to_string())
        .unwrap_or_default()
}

/// Status of one dose on a reference date.
#[uniffi::export]
pub fn vaccine_status(
    rule_id: String,
    birth_date: String,
    reference_date: String,
) -> Result<FfiVaccineStatus, PuericulturaError> {
    let birth = require_date(&birth_date, "birth_date")?;
    let reference = require_date(&reference_date, "reference_date")?;
    Ok(vaccine::vaccine_status(&rule_id, birth, reference).into())
}

/// Status of every dose in the calendar.
#[uniffi::export]
pub fn vaccine_schedule(
    birth_date: String,
    reference_date: String,
) -> Result<Vec<FfiVaccineStatus>, PuericulturaError> {
    let birth = require_date(&birth_date, "birth_date")?;
    let reference = require_date(&reference_date, "reference_date")?;
    Ok(vaccine::vaccine_schedule(birth, reference)
        .into_iter()
        .map(|s| s.into())
        .collect())
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe configuration.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCoreConfig {
    pub fallback_enabled: bool,
    pub cache_fallback: bool,
}

impl From<FfiCoreConfig> for CoreConfig {
    fn from(config: FfiCoreConfig) -> Self {
        CoreConfig::new(config.fallback_enabled, config.cache_fallback)
    }
}

/// FFI-safe patient profile. Dates are `YYYY-MM-DD`; empty means absent.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientProfile {
    pub birth_date: String,
    pub sex: String,
    pub is_premature: bool,
    pub gestational_age_weeks: Option<u32>,
    pub gestational_age_days: Option<u32>,
}

impl TryFrom<FfiPatientProfile> for PatientProfile {
    type Error = PuericulturaError;

    fn try_from(profile: FfiPatientProfile) -> Result<Self, Self::Error> {
        let profile = PatientProfile {
            birth_date: parse_date(&profile.birth_date)?,
            sex: parse_field(&profile.sex)?,
            is_premature: profile.is_premature,
            gestational_age_weeks: profile.gestational_age_weeks,
            gestational_age_days: profile.gestational_age_days,
        };
        profile.validate().map_err(PuericulturaError::InvalidInput)?;
        Ok(profile)
    }
}

/// FFI-safe visit.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisitMeasurement {
    pub date: String,
    pub weight_g: Option<f64>,
    pub height_cm: Option<f64>,
    pub cephalic_cm: Option<f64>,
}

impl TryFrom<FfiVisitMeasurement> for VisitMeasurement {
    type Error = PuericulturaError;

    fn try_from(visit: FfiVisitMeasurement) -> Result<Self, Self::Error> {
        Ok(VisitMeasurement {
            date: parse_date(&visit.date)?,
            weight_g: visit.weight_g,
            height_cm: visit.height_cm,
            cephalic_cm: visit.cephalic_cm,
        })
    }
}

/// FFI-safe Z-score outcome.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiZScore {
    /// Display label ("" when not evaluated, "N/A", "Não se aplica" or a band label)
    pub label: String,
    /// Stable band code when classified
    pub band: Option<String>,
    pub measure: Option<String>,
    pub chart: Option<String>,
    pub age_days: Option<i64>,
    pub source: Option<String>,
}

impl From<ZScoreOutcome> for FfiZScore {
    fn from(outcome: ZScoreOutcome) -> Self {
        let label = outcome.label().to_string();
        match outcome {
            ZScoreOutcome::Classified(z) => Self {
                label,
                band: Some(z.band.code().to_string()),
                measure: Some(z.measure.as_str().to_string()),
                chart: Some(z.chart.as_str().to_string()),
                age_days: Some(z.age_days),
                source: Some(z.source.as_str().to_string()),
            },
            _ => Self {
                label,
                band: None,
                measure: None,
                chart: None,
                age_days: None,
                source: None,
            },
        }
    }
}

/// FFI-safe visit assessment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisitAssessment {
    pub age_days: i64,
    pub age_text: String,
    pub corrected_age_days: Option<i64>,
    pub bmi: Option<f64>,
    pub weight: FfiZScore,
    pub height: FfiZScore,
    pub cephalic: FfiZScore,
    pub bmi_z: FfiZScore,
    pub bmi_diagnosis: String,
    pub cephalic_diagnosis: String,
}

impl From<VisitAssessment> for FfiVisitAssessment {
    fn from(a: VisitAssessment) -> Self {
        Self {
            age_days: a.age_days,
            age_text: a.age_text,
            corrected_age_days: a.corrected_age_days,
            bmi: a.bmi,
            weight: a.weight.into(),
            height: a.height.into(),
            cephalic: a.cephalic.into(),
            bmi_z: a.bmi_z.into(),
            bmi_diagnosis: a.bmi_diagnosis.map(|d| d.label().to_string()).unwrap_or_default(),
            cephalic_diagnosis: a
                .cephalic_diagnosis
                .map(|d| d.label().to_string())
                .unwrap_or_default(),
        }
    }
}

/// FFI-safe velocity result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVelocity {
    /// Display text ("" when missing, "Erro data" on a bad interval)
    pub text: String,
    pub rate: Option<f64>,
    pub interpretation: Option<String>,
    pub date_error: bool,
}

impl From<VelocityOutcome> for FfiVelocity {
    fn from(outcome: VelocityOutcome) -> Self {
        Self {
            text: outcome.to_string(),
            rate: outcome.rate(),
            interpretation: outcome.interpretation().map(|i| i.label().to_string()),
            date_error: outcome.is_date_error(),
        }
    }
}

/// FFI-safe vaccine status.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVaccineStatus {
    pub rule_id: String,
    pub name: String,
    pub dose_label: String,
    pub description: String,
    pub status: String,
    pub days_diff: i64,
    pub message: String,
}

impl From<VaccineStatus> for FfiVaccineStatus {
    fn from(status: VaccineStatus) -> Self {
        let message = status.message();
        Self {
            rule_id: status.rule.id,
            name: status.rule.name,
            dose_label: status.rule.dose_label,
            description: status.rule.description,
            status: status.status.label().to_string(),
            days_diff: status.days_diff,
            message,
        }
    }
}

/// FFI-safe seeding report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSeedReport {
    pub curves: u32,
    pub inserted: u32,
    pub skipped: u32,
}

impl From<db::SeedReport> for FfiSeedReport {
    fn from(report: db::SeedReport) -> Self {
        Self {
            curves: report.curves as u32,
            inserted: report.inserted as u32,
            skipped: report.skipped as u32,
        }
    }
}

/// FFI-safe curve provenance.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCurveSource {
    pub measure: String,
    pub sex: String,
    pub source: String,
    pub rows: u32,
    pub fingerprint: String,
}
