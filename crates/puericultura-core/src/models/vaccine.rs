//! Vaccination calendar models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// When a dose inside its age window counts as late.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatePolicy {
    /// Late once more than 30 days past the target age
    TargetGrace,
    /// Late only after the maximum age
    WindowOnly,
    /// Birth dose, late after the given number of days of life
    BirthDoseWithin(u32),
}

/// Grace period after the target age for [`LatePolicy::TargetGrace`].
pub const TARGET_GRACE_DAYS: f64 = 30.0;

/// A dose in the vaccination calendar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VaccineRule {
    /// Stable identifier (e.g., "penta_1")
    pub id: String,
    /// Vaccine name
    pub name: String,
    /// Dose label (e.g., "1ª Dose", "Reforço")
    pub dose_label: String,
    /// Ideal age in days
    pub target_age_days: f64,
    /// Earliest valid age in days
    pub min_age_days: f64,
    /// Latest age in days before the dose is late
    pub max_age_days: f64,
    /// Scheduled moment (e.g., "2 meses")
    pub description: String,
    /// Late-dose rule
    pub late_policy: LatePolicy,
}

impl VaccineRule {
    /// Create a rule with the default late policy.
    pub fn new(
        id: &str,
        name: &str,
        dose_label: &str,
        target_age_days: f64,
        min_age_days: f64,
        max_age_days: f64,
        description: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            dose_label: dose_label.to_string(),
            target_age_days,
            min_age_days,
            max_age_days,
            description: description.to_string(),
            late_policy: LatePolicy::TargetGrace,
        }
    }

    /// Override the late policy.
    pub fn with_late_policy(mut self, policy: LatePolicy) -> Self {
        self.late_policy = policy;
        self
    }

    /// Placeholder returned for unknown rule ids.
    pub fn unknown(id: &str) -> Self {
        Self::new(id, "Desconhecida", "?", 0.0, 0.0, 0.0, "")
    }
}

/// Status of a dose on a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VaccineState {
    /// Past the window or the administrative deadline
    Atrasado,
    /// Inside the window
    AplicarAgora,
    /// Too early
    Aguardar,
    /// Too early, but the window opens within 30 days
    ProximaAplicacao,
}

impl VaccineState {
    pub fn label(&self) -> &'static str {
        match self {
            VaccineState::Atrasado => "Atrasado",
            VaccineState::AplicarAgora => "Aplicar agora",
            VaccineState::Aguardar => "Aguardar",
            VaccineState::ProximaAplicacao => "Próxima aplicação",
        }
    }

    /// `ProximaAplicacao` is a display refinement of `Aguardar`.
    pub fn is_waiting(&self) -> bool {
        matches!(self, VaccineState::Aguardar | VaccineState::ProximaAplicacao)
    }
}

impl fmt::Display for VaccineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Computed status of one dose. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VaccineStatus {
    pub rule: VaccineRule,
    pub status: VaccineState,
    /// Days until the window opens (waiting), days overdue (late), 0 when due
    pub days_diff: i64,
}

impl VaccineStatus {
    /// Short human message for the status.
    pub fn message(&self) -> String {
        match self.status {
            VaccineState::AplicarAgora => "No prazo ideal".to_string(),
            VaccineState::Aguardar | VaccineState::ProximaAplicacao => {
                if self.days_diff < 30 {
                    format!("Faltam {} dias", self.days_diff)
                } else {
                    let months = (self.days_diff as f64 / crate::age::DAYS_PER_MONTH).floor();
                    format!("Faltam ~{} meses", months as i64)
                }
            }
            VaccineState::Atrasado => {
                if self.days_diff < 60 {
                    format!("Atrasada há {} dias", self.days_diff)
                } else {
                    let months = (self.days_diff as f64 / crate::age::DAYS_PER_MONTH).floor();
                    format!("Atrasada há ~{} meses", months as i64)
                }
            }
        }
    }
}
