//! Normalisation of loosely-typed answer payloads into canonical tri-state answers.
//!
//! Clients released over time used different field names for the same
//! question and encoded yes/no as booleans, numbers or localized strings. Every
//! request is reconciled exactly once here; downstream scoring only ever sees a
//! [`CanonicalAnswerMap`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::catalog::QuestionId;

const AFFIRMATIVE: [&str; 7] = ["true", "t", "1", "si", "sí", "yes", "y"];
const NEGATIVE: [&str; 5] = ["false", "f", "0", "no", "n"];

/// Legacy field names accepted for each question, highest priority first.
static LEGACY_ALIASES: [(QuestionId, &[&str]); 8] = [
    (
        QuestionId::FamilyHistory,
        &["familiarCaPulmon", "antecedenteFam", "antecedenteFamiliar"],
    ),
    (QuestionId::ChronicCough, &["tosTresMeses", "tosCronica"]),
    (QuestionId::Hemoptysis, &["tosConSangre", "hemoptisis"]),
    (
        QuestionId::WeightLoss,
        &["perdidaPesoInexplicable", "perdidaPeso"],
    ),
    (
        QuestionId::Contaminacion,
        &["contaminacion", "altaContaminacion", "contaminacionAlta"],
    ),
    (QuestionId::RadonExposure, &["expoRadon", "radon"]),
    (QuestionId::Tabaquismo, &["tabaquismo", "fumador", "fuma"]),
    (
        QuestionId::Biomasa,
        &["biomasa", "humoLenia", "exposicionBiomasa"],
    ),
];

pub fn legacy_aliases(id: QuestionId) -> &'static [&'static str] {
    LEGACY_ALIASES
        .iter()
        .find(|(candidate, _)| *candidate == id)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[])
}

/// Yes/no answer that may be missing or unintelligible.
///
/// Serialized as `true`, `false` or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum TriState {
    True,
    False,
    #[default]
    Unset,
}

impl TriState {
    pub fn is_true(self) -> bool {
        self == TriState::True
    }

    pub fn as_option(self) -> Option<bool> {
        match self {
            TriState::True => Some(true),
            TriState::False => Some(false),
            TriState::Unset => None,
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => TriState::True,
            Some(false) => TriState::False,
            None => TriState::Unset,
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        Some(value).into()
    }
}

impl From<TriState> for Option<bool> {
    fn from(value: TriState) -> Self {
        value.as_option()
    }
}

/// Interpret an arbitrary JSON value as a yes/no answer.
pub fn coerce_tristate(value: &Value) -> TriState {
    match value {
        Value::Bool(flag) => (*flag).into(),
        Value::Number(number) => number
            .as_f64()
            .map(|n| TriState::from(n != 0.0))
            .unwrap_or_default(),
        Value::String(raw) => {
            let normalized = raw.trim().to_lowercase();
            if AFFIRMATIVE.contains(&normalized.as_str()) {
                TriState::True
            } else if NEGATIVE.contains(&normalized.as_str()) {
                TriState::False
            } else {
                TriState::Unset
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => TriState::Unset,
    }
}

/// Interpret an optional JSON value as a finite number, defaulting to zero.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Field names of the numeric exposure sub-fields inside a raw answer bag.
pub mod exposure_keys {
    pub const SMOKING_YEARS: &str = "aniosFumando";
    pub const CIGS_PER_DAY: &str = "cigsPorDia";
    pub const BIOMASS_YEARS: &str = "aniosBiomasa";
    pub const BIOMASS_HOURS_PER_DAY: &str = "horasPorDiaBiomasa";
}

/// The `respuestas` object as submitted, keyed by whatever names the client used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawAnswers(Map<String, Value>);

impl RawAnswers {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Anything other than a JSON object is treated as an empty bag.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self(fields),
            _ => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn number(&self, key: &str) -> f64 {
        coerce_number(self.get(key))
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Value> for RawAnswers {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// Reconciled yes/no answers keyed by canonical question id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalAnswerMap(BTreeMap<QuestionId, TriState>);

impl CanonicalAnswerMap {
    pub fn get(&self, id: QuestionId) -> TriState {
        self.0.get(&id).copied().unwrap_or_default()
    }

    pub fn is_true(&self, id: QuestionId) -> bool {
        self.get(id).is_true()
    }

    pub fn set(&mut self, id: QuestionId, answer: TriState) {
        self.0.insert(id, answer);
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, TriState)> + '_ {
        self.0.iter().map(|(id, answer)| (*id, *answer))
    }
}

impl FromIterator<(QuestionId, TriState)> for CanonicalAnswerMap {
    fn from_iter<T: IntoIterator<Item = (QuestionId, TriState)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Resolves canonical answers from a raw bag using the legacy alias table.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyReconciler;

impl KeyReconciler {
    /// The first key present wins, even when its value coerces to unset.
    pub fn resolve(&self, raw: &RawAnswers, id: QuestionId) -> TriState {
        std::iter::once(id.as_str())
            .chain(legacy_aliases(id).iter().copied())
            .find_map(|key| raw.get(key))
            .map(coerce_tristate)
            .unwrap_or_default()
    }

    pub fn reconcile(&self, raw: &RawAnswers) -> CanonicalAnswerMap {
        QuestionId::ALL
            .into_iter()
            .map(|id| (id, self.resolve(raw, id)))
            .collect()
    }
}
