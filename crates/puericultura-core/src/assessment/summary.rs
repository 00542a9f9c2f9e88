//! Plain-text clinical summary of one or two visits.

use super::{
    evaluate_cephalic_growth, evaluate_height_growth, evaluate_weight_gain, format_date,
    format_decimal, format_number, AssessmentService, VelocityOutcome, ZScoreOutcome,
};
use crate::models::{present, Indicator, PatientProfile, VisitMeasurement};
use crate::reference::ReferenceProvider;

const HEADER: &str = "Dados Antropométricos:";
const MISSING: &str = "-";
const NOT_AVAILABLE: &str = "N/A";

/// One measure as printed in the summary.
struct SummaryLine {
    label: &'static str,
    unit: &'static str,
    indicator: Indicator,
}

const WEIGHT: SummaryLine = SummaryLine {
    label: "Peso",
    unit: "g",
    indicator: Indicator::Weight,
};
const HEIGHT: SummaryLine = SummaryLine {
    label: "Altura",
    unit: "cm",
    indicator: Indicator::Height,
};
const CEPHALIC: SummaryLine = SummaryLine {
    label: "C. Cefálico",
    unit: "cm",
    indicator: Indicator::Cephalic,
};
const BMI: SummaryLine = SummaryLine {
    label: "IMC",
    unit: "",
    indicator: Indicator::Bmi,
};

fn value_of(visit: &VisitMeasurement, indicator: Indicator) -> Option<f64> {
    match indicator {
        Indicator::Weight => visit.weight_g,
        Indicator::Height => visit.height_cm,
        Indicator::Cephalic => visit.cephalic_cm,
        Indicator::Bmi => visit.bmi(),
    }
}

fn format_value(value: Option<f64>, line: &SummaryLine) -> String {
    match (present(value), line.indicator) {
        (None, _) => MISSING.to_string(),
        (Some(bmi), Indicator::Bmi) => format_decimal(bmi, 2),
        (Some(v), _) => format!("{}{}", format_number(v), line.unit),
    }
}

fn z_text(outcome: &ZScoreOutcome) -> &'static str {
    match outcome {
        ZScoreOutcome::NotEvaluated => NOT_AVAILABLE,
        other => other.label(),
    }
}

fn format_delta(prev: Option<f64>, curr: Option<f64>, unit: &str) -> Option<String> {
    let delta = present(curr)? - present(prev)?;
    let sign = if delta > 0.0 { "+" } else { "" };
    Some(format!("{}{}{}", sign, format_number(delta), unit))
}

impl<P: ReferenceProvider> AssessmentService<P> {
    /// Render the anthropometric summary.
    ///
    /// With `is_first_consultation` only the current visit is printed.
    pub fn generate_summary(
        &self,
        profile: &PatientProfile,
        prev: &VisitMeasurement,
        curr: &VisitMeasurement,
        is_first_consultation: bool,
    ) -> String {
        let curr_date = curr
            .date
            .map(format_date)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let mut lines = vec![HEADER.to_string()];

        if is_first_consultation {
            lines.push(format!("Atual: {}", curr_date));
            for line in [&WEIGHT, &HEIGHT, &CEPHALIC, &BMI] {
                lines.push(self.current_only_line(profile, curr, line));
            }
            return lines.join("\n");
        }

        let prev_date = prev
            .date
            .map(format_date)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        lines.push(format!("Última consulta (UC): {}", prev_date));
        lines.push(format!("Atual: {}", curr_date));

        let birth = profile.birth_date;
        let weight_gain =
            evaluate_weight_gain(birth, prev.date, prev.weight_g, curr.date, curr.weight_g);
        let height_growth =
            evaluate_height_growth(birth, prev.date, prev.height_cm, curr.date, curr.height_cm);
        let cephalic_growth = evaluate_cephalic_growth(
            birth,
            prev.date,
            prev.cephalic_cm,
            curr.date,
            curr.cephalic_cm,
        );

        lines.push(self.comparison_line(profile, prev, curr, &WEIGHT, Some(&weight_gain)));
        lines.push(self.comparison_line(profile, prev, curr, &HEIGHT, Some(&height_growth)));
        lines.push(self.comparison_line(profile, prev, curr, &CEPHALIC, Some(&cephalic_growth)));
        lines.push(self.comparison_line(profile, prev, curr, &BMI, None));

        lines.join("\n")
    }

    fn z_label(&self, profile: &PatientProfile, visit: &VisitMeasurement, line: &SummaryLine) -> &'static str {
        let outcome =
            self.evaluate_z_score(profile, line.indicator, visit.date, value_of(visit, line.indicator));
        z_text(&outcome)
    }

    fn current_only_line(
        &self,
        profile: &PatientProfile,
        curr: &VisitMeasurement,
        line: &SummaryLine,
    ) -> String {
        format!(
            "{}: {} (Z: {})",
            line.label,
            format_value(value_of(curr, line.indicator), line),
            self.z_label(profile, curr, line)
        )
    }

    fn comparison_line(
        &self,
        profile: &PatientProfile,
        prev: &VisitMeasurement,
        curr: &VisitMeasurement,
        line: &SummaryLine,
        velocity: Option<&VelocityOutcome>,
    ) -> String {
        let prev_value = value_of(prev, line.indicator);
        let curr_value = value_of(curr, line.indicator);

        let mut text = format!(
            "{}: UC: {} (Z: {}). Atual: {} (Z: {})",
            line.label,
            format_value(prev_value, line),
            self.z_label(profile, prev, line),
            format_value(curr_value, line),
            self.z_label(profile, curr, line),
        );

        if let Some(velocity) = velocity {
            let delta = format_delta(prev_value, curr_value, line.unit)
                .unwrap_or_else(|| MISSING.to_string());
            match velocity {
                VelocityOutcome::Missing => text.push_str(&format!(". {}", delta)),
                other => text.push_str(&format!(". {} ({})", delta, other)),
            }
        }

        text
    }
}
