use serde::{Deserialize, Serialize};

use super::answers::CanonicalAnswerMap;
use super::catalog::QuestionId;
use super::exposure::ExposureProfile;

/// Clinical gates deciding whether screening is indicated.
///
/// Unset answers count as "no" in every combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalFlags {
    pub red_flags: bool,
    pub environmental_risk: bool,
    pub family_history: bool,
    pub requires_screening: bool,
}

impl ClinicalFlags {
    pub fn derive(answers: &CanonicalAnswerMap, exposure: &ExposureProfile) -> Self {
        let red_flags = answers.is_true(QuestionId::Hemoptysis)
            || answers.is_true(QuestionId::ChronicCough)
            || answers.is_true(QuestionId::WeightLoss);
        let environmental_risk = answers.is_true(QuestionId::RadonExposure)
            || answers.is_true(QuestionId::Contaminacion);
        let family_history = answers.is_true(QuestionId::FamilyHistory);

        let requires_screening = exposure.tabaquismo_meets_criteria
            || exposure.biomasa_meets_criteria
            || red_flags
            || environmental_risk
            || family_history;

        Self {
            red_flags,
            environmental_risk,
            family_history,
            requires_screening,
        }
    }
}
