//! Dose status state machine.

use chrono::NaiveDate;
use tracing::debug;

use super::calendar::{find_rule, vaccine_calendar};
use crate::age::age_in_days;
use crate::models::{LatePolicy, VaccineRule, VaccineState, VaccineStatus, TARGET_GRACE_DAYS};

/// Remaining wait at or below which a waiting dose is reported as upcoming.
pub const UPCOMING_WINDOW_DAYS: i64 = 30;

fn whole_days(days: f64) -> i64 {
    days.ceil() as i64
}

/// Status of `rule` for a child `age_days` old.
pub fn evaluate_rule(rule: &VaccineRule, age_days: i64) -> VaccineStatus {
    let age = age_days as f64;

    let (status, days_diff) = match rule.late_policy {
        LatePolicy::BirthDoseWithin(deadline) if age > deadline as f64 => {
            (VaccineState::Atrasado, whole_days(age - deadline as f64))
        }
        _ if age < rule.min_age_days => {
            let wait = whole_days(rule.min_age_days - age);
            if wait <= UPCOMING_WINDOW_DAYS {
                (VaccineState::ProximaAplicacao, wait)
            } else {
                (VaccineState::Aguardar, wait)
            }
        }
        _ if age > rule.max_age_days => {
            (VaccineState::Atrasado, whole_days(age - rule.max_age_days))
        }
        LatePolicy::TargetGrace if age > rule.target_age_days + TARGET_GRACE_DAYS => (
            VaccineState::Atrasado,
            whole_days(age - rule.target_age_days - TARGET_GRACE_DAYS),
        ),
        _ => (VaccineState::AplicarAgora, 0),
    };

    VaccineStatus {
        rule: rule.clone(),
        status,
        days_diff,
    }
}

/// Status of the dose `rule_id` on `reference`.
///
/// Unknown ids yield a placeholder rule with status `Aguardar`.
pub fn vaccine_status(rule_id: &str, birth_date: NaiveDate, reference: NaiveDate) -> VaccineStatus {
    match find_rule(rule_id) {
        Some(rule) => evaluate_rule(rule, age_in_days(Some(birth_date), Some(reference))),
        None => {
            debug!(rule_id, "unknown vaccine rule");
            VaccineStatus {
                rule: VaccineRule::unknown(rule_id),
                status: VaccineState::Aguardar,
                days_diff: 0,
            }
        }
    }
}

/// Status of every dose in the calendar, in calendar order.
pub fn vaccine_schedule(birth_date: NaiveDate, reference: NaiveDate) -> Vec<VaccineStatus> {
    let age_days = age_in_days(Some(birth_date), Some(reference));
    vaccine_calendar()
        .iter()
        .map(|rule| evaluate_rule(rule, age_days))
        .collect()
}
