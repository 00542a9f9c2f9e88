//! Brazilian national vaccination calendar.

use std::sync::OnceLock;

use crate::age::DAYS_PER_MONTH;
use crate::models::{LatePolicy, VaccineRule};

const M: f64 = DAYS_PER_MONTH;
const Y: f64 = 365.25;

/// Last day of childhood, in days of life.
pub const MAX_AGE_CHILDHOOD: f64 = 5.0 * Y - 1.0;

/// Days of life after which the hepatitis B birth dose is late.
pub const HEPB_BIRTH_DEADLINE_DAYS: u32 = 3;

/// Open-ended window for doses without an upper age.
const NO_MAX_AGE: f64 = 9999.0;

fn build_calendar() -> Vec<VaccineRule> {
    vec![
        // Birth
        VaccineRule::new("bcg", "BCG", "Dose única", 0.0, 0.0, MAX_AGE_CHILDHOOD, "Ao nascer")
            .with_late_policy(LatePolicy::WindowOnly),
        VaccineRule::new("hepb_birth", "Hepatite B", "Ao nascer", 0.0, 0.0, 30.0, "Ao nascer")
            .with_late_policy(LatePolicy::BirthDoseWithin(HEPB_BIRTH_DEADLINE_DAYS)),
        // 2 months
        VaccineRule::new("penta_1", "Penta (DTP+Hib+HB)", "1ª Dose", 2.0 * M, 45.0, 3.0 * M, "2 meses"),
        VaccineRule::new("vip_1", "VIP", "1ª Dose", 2.0 * M, 45.0, 3.0 * M, "2 meses"),
        VaccineRule::new("pneumo_1", "Pneumocócica 10V", "1ª Dose", 2.0 * M, 45.0, 3.0 * M, "2 meses"),
        VaccineRule::new("rota_1", "Rotavírus", "1ª Dose", 2.0 * M, 45.0, 3.0 * M + 15.0, "2 meses")
            .with_late_policy(LatePolicy::WindowOnly),
        // 3 months
        VaccineRule::new("menc_1", "Meningocócica C", "1ª Dose", 3.0 * M, 75.0, 4.0 * M, "3 meses"),
        // 4 months
        VaccineRule::new("penta_2", "Penta (DTP+Hib+HB)", "2ª Dose", 4.0 * M, 105.0, 5.0 * M, "4 meses"),
        VaccineRule::new("vip_2", "VIP", "2ª Dose", 4.0 * M, 105.0, 5.0 * M, "4 meses"),
        VaccineRule::new("pneumo_2", "Pneumocócica 10V", "2ª Dose", 4.0 * M, 105.0, 5.0 * M, "4 meses"),
        VaccineRule::new("rota_2", "Rotavírus", "2ª Dose", 4.0 * M, 105.0, 7.0 * M + 29.0, "4 meses")
            .with_late_policy(LatePolicy::WindowOnly),
        // 5 months
        VaccineRule::new("menc_2", "Meningocócica C", "2ª Dose", 5.0 * M, 135.0, 6.0 * M, "5 meses"),
        // 6 months
        VaccineRule::new("penta_3", "Penta (DTP+Hib+HB)", "3ª Dose", 6.0 * M, 165.0, 7.0 * M, "6 meses"),
        VaccineRule::new("vip_3", "VIP", "3ª Dose", 6.0 * M, 165.0, 7.0 * M, "6 meses"),
        VaccineRule::new("covid_1", "Covid-19", "1ª Dose", 6.0 * M, 180.0, NO_MAX_AGE, "6 meses"),
        VaccineRule::new("influenza_1", "Influenza trivalente", "1ª Dose", 6.0 * M, 150.0, 12.0 * M, "6 meses"),
        // 7 months
        VaccineRule::new("covid_2", "Covid-19", "2ª Dose", 7.0 * M, 210.0, NO_MAX_AGE, "7 meses"),
        VaccineRule::new("influenza_2", "Influenza trivalente", "2ª Dose", 7.0 * M, 180.0, 12.0 * M, "7 meses"),
        // 9 months
        VaccineRule::new("febre_amarela_1", "Febre Amarela", "Dose", 9.0 * M, 255.0, 12.0 * M, "9 meses"),
        VaccineRule::new("covid_3", "Covid-19", "3ª Dose", 9.0 * M, 270.0, NO_MAX_AGE, "9 meses"),
        // 12 months
        VaccineRule::new("pneumo_ref", "Pneumocócica 10V", "Reforço", 12.0 * M, 365.0, 15.0 * M, "12 meses"),
        VaccineRule::new("menc_ref", "Meningocócica C", "Reforço", 12.0 * M, 365.0, 15.0 * M, "12 meses"),
        VaccineRule::new("triplice_1", "Tríplice Viral", "1ª Dose", 12.0 * M, 365.0, 15.0 * M, "12 meses"),
        // 15 months
        VaccineRule::new("dtp_ref1", "DTP", "1º Reforço", 15.0 * M, 440.0, 18.0 * M, "15 meses"),
        VaccineRule::new("vop_ref1", "VOP", "1º Reforço", 15.0 * M, 440.0, 18.0 * M, "15 meses"),
        VaccineRule::new("hepa_1", "Hepatite A", "Uma dose", 15.0 * M, 440.0, 24.0 * M, "15 meses"),
        VaccineRule::new("tetra_1", "Tetraviral", "Uma dose", 15.0 * M, 440.0, 24.0 * M, "15 meses"),
        // 4 years
        VaccineRule::new("dtp_ref2", "DTP", "2º Reforço", 4.0 * Y, 4.0 * Y - 30.0, 7.0 * Y, "4 anos"),
        VaccineRule::new("vop_ref2", "VOP", "2º Reforço", 4.0 * Y, 4.0 * Y - 30.0, 7.0 * Y, "4 anos"),
        VaccineRule::new("fa_ref", "Febre Amarela", "Dose de reforço", 4.0 * Y, 4.0 * Y - 30.0, 7.0 * Y, "4 anos"),
        VaccineRule::new("varicela_2", "Varicela", "Uma dose", 4.0 * Y, 4.0 * Y - 30.0, 7.0 * Y, "4 anos"),
        // 5 years
        VaccineRule::new("pneumo_23", "Pneumocócica 23V", "Uma dose", 5.0 * Y, 5.0 * Y - 30.0, 6.0 * Y, "5 anos")
            .with_late_policy(LatePolicy::WindowOnly),
        // 9-14 years
        VaccineRule::new("hpv_1", "HPV", "Dose", 9.0 * Y, 9.0 * Y, 15.0 * Y, "9 a 14 anos")
            .with_late_policy(LatePolicy::WindowOnly),
        VaccineRule::new("hpv_2", "HPV", "Dose", 9.5 * Y, 9.0 * Y, 15.0 * Y, "9 a 14 anos")
            .with_late_policy(LatePolicy::WindowOnly),
    ]
}

/// The full calendar, built once per process.
pub fn vaccine_calendar() -> &'static [VaccineRule] {
    static CALENDAR: OnceLock<Vec<VaccineRule>> = OnceLock::new();
    CALENDAR.get_or_init(build_calendar)
}

/// Look up a rule by id.
pub fn find_rule(id: &str) -> Option<&'static VaccineRule> {
    vaccine_calendar().iter().find(|rule| rule.id == id)
}
