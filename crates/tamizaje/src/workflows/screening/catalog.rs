//! The question bank shared by the client preview and the authoritative scorer.

use serde::{Deserialize, Serialize};

/// Canonical identifier of a catalog question.
///
/// Declaration order matches catalog order, so ordered maps keyed by
/// `QuestionId` iterate in the order the questionnaire presents them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuestionId {
    #[serde(rename = "family-history")]
    FamilyHistory,
    #[serde(rename = "chronic-cough")]
    ChronicCough,
    #[serde(rename = "hemoptysis")]
    Hemoptysis,
    #[serde(rename = "weight-loss")]
    WeightLoss,
    #[serde(rename = "contaminacion")]
    Contaminacion,
    #[serde(rename = "radon-exposure")]
    RadonExposure,
    #[serde(rename = "tabaquismo")]
    Tabaquismo,
    #[serde(rename = "biomasa")]
    Biomasa,
}

impl QuestionId {
    pub const ALL: [QuestionId; 8] = [
        QuestionId::FamilyHistory,
        QuestionId::ChronicCough,
        QuestionId::Hemoptysis,
        QuestionId::WeightLoss,
        QuestionId::Contaminacion,
        QuestionId::RadonExposure,
        QuestionId::Tabaquismo,
        QuestionId::Biomasa,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionId::FamilyHistory => "family-history",
            QuestionId::ChronicCough => "chronic-cough",
            QuestionId::Hemoptysis => "hemoptysis",
            QuestionId::WeightLoss => "weight-loss",
            QuestionId::Contaminacion => "contaminacion",
            QuestionId::RadonExposure => "radon-exposure",
            QuestionId::Tabaquismo => "tabaquismo",
            QuestionId::Biomasa => "biomasa",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == raw)
    }

    /// Per-question column in the `screenings` table.
    pub fn column_name(self) -> &'static str {
        match self {
            QuestionId::FamilyHistory => "q_family_history",
            QuestionId::ChronicCough => "q_chronic_cough",
            QuestionId::Hemoptysis => "q_hemoptysis",
            QuestionId::WeightLoss => "q_weight_loss",
            QuestionId::Contaminacion => "q_contaminacion",
            QuestionId::RadonExposure => "q_radon_exposure",
            QuestionId::Tabaquismo => "q_tabaquismo",
            QuestionId::Biomasa => "q_biomasa",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "yes-no")]
    YesNo,
}

/// One yes/no question and the points it adds when answered affirmatively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(rename = "question")]
    pub prompt: &'static str,
    pub explanation: &'static str,
    pub points: u32,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
}

static QUESTIONS: [Question; 8] = [
    Question {
        id: QuestionId::FamilyHistory,
        prompt: "¿Tiene algún familiar directo con cáncer de pulmón?",
        explanation: "El antecedente familiar aumenta el riesgo por predisposición genética y exposición compartida.",
        points: 1,
        kind: QuestionKind::YesNo,
    },
    Question {
        id: QuestionId::ChronicCough,
        prompt: "¿Tiene tos por más de 3 meses?",
        explanation: "Tos crónica es un síntoma cardinal de enfermedad pulmonar (EPOC, cáncer, fibrosis).",
        points: 1,
        kind: QuestionKind::YesNo,
    },
    Question {
        id: QuestionId::Hemoptysis,
        prompt: "¿Tiene tos con sangre (hemoptisis)?",
        explanation: "Es un signo de alarma serio; requiere evaluación inmediata.",
        points: 6,
        kind: QuestionKind::YesNo,
    },
    Question {
        id: QuestionId::WeightLoss,
        prompt: "¿Tiene pérdida de peso inexplicable?",
        explanation: "La pérdida de peso sin causa aparente es un signo sistémico de cáncer avanzado.",
        points: 2,
        kind: QuestionKind::YesNo,
    },
    Question {
        id: QuestionId::Contaminacion,
        prompt: "¿La zona donde vive o trabaja se considera de alta contaminacion?",
        explanation: "La exposicion a altas concentraciones de contaminantes por tiempo prolongado incrementa el riesgo de cáncer pulmonar y EPOC.",
        points: 2,
        kind: QuestionKind::YesNo,
    },
    Question {
        id: QuestionId::RadonExposure,
        prompt: "¿Tiene exposición a gas radón?",
        explanation: "El radón es la segunda causa más común de cáncer de pulmón después del tabaco.",
        points: 2,
        kind: QuestionKind::YesNo,
    },
    Question {
        id: QuestionId::Tabaquismo,
        prompt: "¿Usted ha fumado o fuma?",
        explanation: "El tabaquismo es el principal factor de riesgo para cáncer de pulmón.",
        points: 2,
        kind: QuestionKind::YesNo,
    },
    Question {
        id: QuestionId::Biomasa,
        prompt: "¿Usted tiene o ha tenido exposición a humo de leña?",
        explanation: "La exposición a humo de biomasa incrementa el riesgo de cáncer pulmonar y EPOC.",
        points: 2,
        kind: QuestionKind::YesNo,
    },
];

static STANDARD: QuestionCatalog = QuestionCatalog {
    questions: &QUESTIONS,
};

/// Read-only, ordered question bank.
#[derive(Debug)]
pub struct QuestionCatalog {
    questions: &'static [Question],
}

impl QuestionCatalog {
    /// The process-wide catalog every scorer reads from.
    pub fn standard() -> &'static QuestionCatalog {
        &STANDARD
    }

    pub fn all(&self) -> &[Question] {
        self.questions
    }

    pub fn lookup(&self, id: &str) -> Option<&Question> {
        QuestionId::parse(id).and_then(|id| self.get(id))
    }

    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn points(&self, id: QuestionId) -> u32 {
        self.get(id).map(|question| question.points).unwrap_or(0)
    }
}
