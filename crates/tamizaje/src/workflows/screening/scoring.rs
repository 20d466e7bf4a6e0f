use serde::{Deserialize, Serialize};

use super::answers::CanonicalAnswerMap;
use super::catalog::QuestionCatalog;
use super::exposure::ExposureProfile;

/// Totals at or above this value ask the respondent to leave contact details.
pub const CONTACT_THRESHOLD: u32 = 3;

/// Three-level categorical risk derived from the point total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_points(total_points: u32) -> Self {
        match total_points {
            0..=2 => RiskLevel::Low,
            3..=5 => RiskLevel::Moderate,
            _ => RiskLevel::High,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            RiskLevel::Low => "No parece haber signos de alarma inmediatos, pero mantener vigilancia si hay exposición crónica a tabaco o contaminantes.",
            RiskLevel::Moderate => "Considerar consulta médica para evaluación clínica y radiografía de tórax.",
            RiskLevel::High => "Es prioritario contactar a un médico para estudios diagnósticos (TAC, espirometría, marcadores).",
        }
    }
}

/// Client-facing preview of the respondent's risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub total_points: u32,
    pub risk_level: RiskLevel,
    pub recommendation: String,
    pub requires_contact: bool,
}

/// Stateless scorer over the shared question catalog.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    catalog: &'static QuestionCatalog,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(QuestionCatalog::standard())
    }
}

impl ScoringEngine {
    pub fn new(catalog: &'static QuestionCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'static QuestionCatalog {
        self.catalog
    }

    /// Sum of the weights of affirmatively answered questions.
    pub fn base_points(&self, answers: &CanonicalAnswerMap) -> u32 {
        self.catalog
            .all()
            .iter()
            .filter(|question| answers.is_true(question.id))
            .map(|question| question.points)
            .sum()
    }

    pub fn score(&self, answers: &CanonicalAnswerMap, exposure: &ExposureProfile) -> RiskAssessment {
        let total_points = self.base_points(answers) + exposure.bonus_points();
        let risk_level = RiskLevel::from_points(total_points);

        RiskAssessment {
            total_points,
            risk_level,
            recommendation: risk_level.recommendation().to_string(),
            requires_contact: total_points >= CONTACT_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::screening::answers::TriState;
    use crate::workflows::screening::catalog::QuestionId;
    use crate::workflows::screening::exposure::ExposureInputs;

    #[test]
    fn classification_is_a_monotonic_step_function() {
        let expected = [
            (0, RiskLevel::Low),
            (2, RiskLevel::Low),
            (3, RiskLevel::Moderate),
            (5, RiskLevel::Moderate),
            (6, RiskLevel::High),
            (40, RiskLevel::High),
        ];
        for (points, level) in expected {
            assert_eq!(RiskLevel::from_points(points), level, "{points} points");
        }

        let mut previous = RiskLevel::Low;
        for points in 0..=30 {
            let level = RiskLevel::from_points(points);
            assert!(level >= previous);
            previous = level;
        }
    }

    #[test]
    fn recommendations_differ_per_level() {
        let low = RiskLevel::Low.recommendation();
        let moderate = RiskLevel::Moderate.recommendation();
        let high = RiskLevel::High.recommendation();
        assert_ne!(low, moderate);
        assert_ne!(moderate, high);
        assert!(high.contains("TAC"));
    }

    #[test]
    fn base_points_only_count_true_answers() {
        let engine = ScoringEngine::default();
        let answers: CanonicalAnswerMap = [
            (QuestionId::FamilyHistory, TriState::True),
            (QuestionId::WeightLoss, TriState::True),
            (QuestionId::Hemoptysis, TriState::False),
            (QuestionId::RadonExposure, TriState::Unset),
        ]
        .into_iter()
        .collect();

        assert_eq!(engine.base_points(&answers), 3);
    }

    #[test]
    fn exposure_bonus_is_added_to_the_total() {
        let engine = ScoringEngine::default();
        let answers: CanonicalAnswerMap = [(QuestionId::Tabaquismo, TriState::True)]
            .into_iter()
            .collect();
        let exposure = ExposureProfile::compute(
            &answers,
            ExposureInputs {
                cigs_per_day: 20.0,
                smoking_years: 10.0,
                ..ExposureInputs::default()
            },
        );

        let assessment = engine.score(&answers, &exposure);

        assert_eq!(assessment.total_points, 4);
        assert_eq!(assessment.risk_level, RiskLevel::Moderate);
        assert!(assessment.requires_contact);
    }

    #[test]
    fn assessment_uses_camel_case_wire_names() {
        let engine = ScoringEngine::default();
        let answers = CanonicalAnswerMap::default();
        let exposure = ExposureProfile::compute(&answers, ExposureInputs::default());
        let encoded = serde_json::to_value(engine.score(&answers, &exposure)).expect("serializes");

        assert_eq!(encoded["totalPoints"], 0);
        assert_eq!(encoded["riskLevel"], "low");
        assert_eq!(encoded["requiresContact"], false);
    }
}
