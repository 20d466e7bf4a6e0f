use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::answers::RawAnswers;
use super::error::ScreeningError;

/// Respondent identification block. Email is accepted but never stored with the
/// screening; it only travels through the contact opt-in.
///
/// Every field is optional and read leniently: numbers become their decimal text
/// and any other non-string value is dropped, so a badly typed field never
/// rejects the submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Identification {
    #[serde(deserialize_with = "lenient_text")]
    pub nombre: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub sexo: Option<String>,
    /// Newer clients send the birth date here as `YYYY-MM-DD`; older ones an age.
    #[serde(deserialize_with = "lenient_text")]
    pub edad: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub fecha_nacimiento: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub cp: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub telefono: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub medico: Option<String>,
}

impl Identification {
    /// `fechaNacimiento` when sent, otherwise `edad` if it holds a date.
    pub fn birth_date(&self) -> Option<String> {
        let explicit = normalize_birth_date(self.fecha_nacimiento.as_deref());
        explicit.or_else(|| {
            self.edad
                .as_deref()
                .map(str::trim)
                .filter(|raw| {
                    BIRTH_DATE_FORMATS
                        .iter()
                        .any(|format| NaiveDate::parse_from_str(raw, format).is_ok())
                })
                .and_then(|raw| normalize_birth_date(Some(raw)))
        })
    }
}

const BIRTH_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Parsed `POST /submit-screening` body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreeningSubmission {
    pub identification: Identification,
    pub answers: RawAnswers,
    /// Client-computed preview, stored verbatim.
    pub client_results: Option<Value>,
}

impl ScreeningSubmission {
    pub fn from_json(body: Value) -> Result<Self, ScreeningError> {
        let mut fields = match body {
            Value::Object(fields) => fields,
            Value::Null => return Ok(Self::default()),
            _ => {
                return Err(ScreeningError::InvalidInput(
                    "Cuerpo de la solicitud inválido".to_string(),
                ))
            }
        };

        let identification = match fields.remove("identificacion") {
            None | Some(Value::Null) => Identification::default(),
            Some(value @ Value::Object(_)) => serde_json::from_value(value)
                .map_err(|_| ScreeningError::InvalidInput("Identificación inválida".to_string()))?,
            Some(_) => {
                return Err(ScreeningError::InvalidInput(
                    "Identificación inválida".to_string(),
                ))
            }
        };

        let answers = fields
            .remove("respuestas")
            .map(RawAnswers::from_value)
            .unwrap_or_default();

        let client_results = fields.remove("resultados").filter(|value| !value.is_null());

        Ok(Self {
            identification,
            answers,
            client_results,
        })
    }
}

/// `DD/MM/YYYY` becomes `YYYY-MM-DD`; any other non-empty value is kept as sent.
pub fn normalize_birth_date(raw: Option<&str>) -> Option<String> {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;
    match NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        Ok(date) => Some(date.format("%Y-%m-%d").to_string()),
        Err(_) => Some(raw.to_string()),
    }
}
