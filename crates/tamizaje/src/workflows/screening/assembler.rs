//! Composes reconciliation, exposure, scoring and clinical flags into the two
//! result shapes callers consume: the client preview and the authoritative record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::answers::{CanonicalAnswerMap, KeyReconciler, RawAnswers, TriState};
use super::catalog::{Question, QuestionId};
use super::exposure::{ExposureInputs, ExposureProfile};
use super::flags::ClinicalFlags;
use super::scoring::{RiskAssessment, ScoringEngine};

/// Key under which the server's own assessment is stored next to the client preview.
pub const SERVER_ASSESSMENT_KEY: &str = "serverAssessment";

/// Exposure sub-fields attached to the tobacco and biomass questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDetails {
    pub smoking_years: Option<f64>,
    pub cigs_per_day: Option<f64>,
    pub biomass_years: Option<f64>,
    pub biomass_hours_per_day: Option<f64>,
}

/// One answered question as produced by the questionnaire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEntry {
    pub question_id: String,
    pub answer: bool,
    #[serde(default, alias = "detail", skip_serializing_if = "Option::is_none")]
    pub details: Option<AnswerDetails>,
}

impl AnswerEntry {
    pub fn yes_no(id: QuestionId, answer: bool) -> Self {
        Self {
            question_id: id.as_str().to_string(),
            answer,
            details: None,
        }
    }

    pub fn with_details(mut self, details: AnswerDetails) -> Self {
        self.details = Some(details);
        self
    }
}

/// Server-only fields computed on top of the preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalFindings {
    /// Base points without exposure bonuses.
    pub score_yes_no: u32,
    pub pack_years: f64,
    pub exposure_index: f64,
    pub tabaquismo_by_pack_years: bool,
    pub tabaquismo_by_years: bool,
    pub tabaquismo_meets_criteria: bool,
    pub biomasa_meets_criteria: bool,
    pub requires_screening: bool,
    pub red_flags: bool,
    pub environmental_risk: bool,
    pub family_history: bool,
}

/// Authoritative result: the preview fields plus the clinical findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    #[serde(flatten)]
    pub assessment: RiskAssessment,
    #[serde(flatten)]
    pub findings: ClinicalFindings,
}

/// Everything the service needs to persist one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningEvaluation {
    pub answers: CanonicalAnswerMap,
    pub exposure: ExposureProfile,
    pub result: ScreeningResult,
}

/// A catalog question together with the reconciled answer it received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionSnapshot {
    #[serde(flatten)]
    pub question: Question,
    pub answer: TriState,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadAssembler {
    reconciler: KeyReconciler,
    engine: ScoringEngine,
}

impl PayloadAssembler {
    pub fn new(engine: ScoringEngine) -> Self {
        Self {
            reconciler: KeyReconciler,
            engine,
        }
    }

    /// Client preview over form entries keyed by canonical ids.
    ///
    /// Entries with unknown ids are ignored and the first entry per id wins.
    pub fn preview(&self, entries: &[AnswerEntry]) -> RiskAssessment {
        let (answers, inputs) = canonical_from_entries(entries);
        let exposure = ExposureProfile::compute(&answers, inputs);
        self.engine.score(&answers, &exposure)
    }

    /// Reconcile a raw answer bag and compute every derived field.
    pub fn evaluate(&self, raw: &RawAnswers) -> ScreeningEvaluation {
        let answers = self.reconciler.reconcile(raw);
        let inputs = ExposureInputs::from_raw(raw);
        self.evaluate_canonical(answers, inputs)
    }

    pub fn evaluate_canonical(
        &self,
        answers: CanonicalAnswerMap,
        inputs: ExposureInputs,
    ) -> ScreeningEvaluation {
        let exposure = ExposureProfile::compute(&answers, inputs);
        let assessment = self.engine.score(&answers, &exposure);
        let flags = ClinicalFlags::derive(&answers, &exposure);

        let findings = ClinicalFindings {
            score_yes_no: self.engine.base_points(&answers),
            pack_years: exposure.pack_years,
            exposure_index: exposure.biomass_index,
            tabaquismo_by_pack_years: exposure.tabaquismo_by_pack_years,
            tabaquismo_by_years: exposure.tabaquismo_by_years,
            tabaquismo_meets_criteria: exposure.tabaquismo_meets_criteria,
            biomasa_meets_criteria: exposure.biomasa_meets_criteria,
            requires_screening: flags.requires_screening,
            red_flags: flags.red_flags,
            environmental_risk: flags.environmental_risk,
            family_history: flags.family_history,
        };

        ScreeningEvaluation {
            answers,
            exposure,
            result: ScreeningResult {
                assessment,
                findings,
            },
        }
    }

    pub fn question_snapshot(&self, answers: &CanonicalAnswerMap) -> Vec<QuestionSnapshot> {
        self.engine
            .catalog()
            .all()
            .iter()
            .map(|question| QuestionSnapshot {
                question: question.clone(),
                answer: answers.get(question.id),
            })
            .collect()
    }

    /// The submitted bag, extended with the reconciled `yesNo` map and a weighted
    /// question snapshot so the score can be recomputed later.
    pub fn stored_respuestas(
        &self,
        raw: &RawAnswers,
        answers: &CanonicalAnswerMap,
    ) -> serde_json::Result<Value> {
        let mut fields = raw.fields().clone();
        fields.insert("yesNo".to_string(), serde_json::to_value(answers)?);
        fields.insert(
            "questions".to_string(),
            serde_json::to_value(self.question_snapshot(answers))?,
        );
        Ok(Value::Object(fields))
    }

    /// The client's `resultados` kept verbatim with the server findings merged over
    /// it. The server's own preview is nested so the client's `requiresContact`
    /// and point total survive untouched.
    pub fn stored_resultados(
        &self,
        client_results: Option<&Value>,
        result: &ScreeningResult,
    ) -> serde_json::Result<Value> {
        let mut fields = match client_results {
            Some(Value::Object(fields)) => fields.clone(),
            _ => Map::new(),
        };

        if let Value::Object(findings) = serde_json::to_value(&result.findings)? {
            fields.extend(findings);
        }
        fields.insert(
            SERVER_ASSESSMENT_KEY.to_string(),
            serde_json::to_value(&result.assessment)?,
        );

        Ok(Value::Object(fields))
    }
}

/// Canonical answers and exposure inputs from form entries.
pub fn canonical_from_entries(entries: &[AnswerEntry]) -> (CanonicalAnswerMap, ExposureInputs) {
    let first = |id: QuestionId| {
        entries
            .iter()
            .find(|entry| entry.question_id == id.as_str())
    };

    let answers = QuestionId::ALL
        .into_iter()
        .map(|id| {
            let answer = first(id)
                .map(|entry| TriState::from(entry.answer))
                .unwrap_or_default();
            (id, answer)
        })
        .collect();

    let tobacco = first(QuestionId::Tabaquismo)
        .and_then(|entry| entry.details)
        .unwrap_or_default();
    let biomass = first(QuestionId::Biomasa)
        .and_then(|entry| entry.details)
        .unwrap_or_default();

    let inputs = ExposureInputs {
        cigs_per_day: tobacco.cigs_per_day.unwrap_or(0.0),
        smoking_years: tobacco.smoking_years.unwrap_or(0.0),
        biomass_years: biomass.biomass_years.unwrap_or(0.0),
        biomass_hours_per_day: biomass.biomass_hours_per_day.unwrap_or(0.0),
    };

    (answers, inputs)
}
