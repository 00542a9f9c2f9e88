//! Diagnoses derived from Z bands.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::zscore::ZBand;

/// Nutritional status from BMI-for-age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BmiDiagnosis {
    SevereWasting,
    Wasting,
    Eutrophic,
    OverweightRisk,
    Overweight,
    Obesity,
}

impl BmiDiagnosis {
    pub fn from_band(band: ZBand) -> Self {
        match band {
            ZBand::BelowMinus3 => BmiDiagnosis::SevereWasting,
            ZBand::Minus3ToMinus2 => BmiDiagnosis::Wasting,
            ZBand::Minus2ToMinus1 | ZBand::Minus1ToZero | ZBand::ZeroToPlus1 => {
                BmiDiagnosis::Eutrophic
            }
            ZBand::Plus1ToPlus2 => BmiDiagnosis::OverweightRisk,
            ZBand::Plus2ToPlus3 => BmiDiagnosis::Overweight,
            ZBand::AbovePlus3 => BmiDiagnosis::Obesity,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiDiagnosis::SevereWasting => "Magreza acentuada",
            BmiDiagnosis::Wasting => "Magreza",
            BmiDiagnosis::Eutrophic => "Eutrofia",
            BmiDiagnosis::OverweightRisk => "Risco de sobrepeso",
            BmiDiagnosis::Overweight => "Sobrepeso",
            BmiDiagnosis::Obesity => "Obesidade",
        }
    }
}

impl fmt::Display for BmiDiagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Head circumference status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CephalicDiagnosis {
    Microcephaly,
    Normocephaly,
    Macrocephaly,
}

impl CephalicDiagnosis {
    pub fn from_band(band: ZBand) -> Self {
        if band >= ZBand::Plus2ToPlus3 {
            CephalicDiagnosis::Macrocephaly
        } else if band <= ZBand::Minus3ToMinus2 {
            CephalicDiagnosis::Microcephaly
        } else {
            CephalicDiagnosis::Normocephaly
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CephalicDiagnosis::Microcephaly => "Microcefalia",
            CephalicDiagnosis::Normocephaly => "Normocefalia",
            CephalicDiagnosis::Macrocephaly => "Macrocefalia",
        }
    }
}

impl fmt::Display for CephalicDiagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// BMI diagnosis for a band label or code. Empty when the label is not a band.
pub fn bmi_diagnosis_for_label(label: &str) -> String {
    label
        .parse::<ZBand>()
        .map(|band| BmiDiagnosis::from_band(band).label().to_string())
        .unwrap_or_default()
}

/// Cephalic diagnosis for a band label or code. Empty when the label is not a band.
pub fn cephalic_diagnosis_for_label(label: &str) -> String {
    label
        .parse::<ZBand>()
        .map(|band| CephalicDiagnosis::from_band(band).label().to_string())
        .unwrap_or_default()
}
