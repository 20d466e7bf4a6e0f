use serde::Deserialize;
use serde_json::Value;

use super::error::ScreeningError;
use super::repository::{ContactRequestRow, RowId};

/// Parsed `POST /contact-optin` body. Fields stay loosely typed until
/// [`ContactOptIn::into_row`] validates them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactOptIn {
    pub respondent_id: Option<Value>,
    pub screening_id: Option<Value>,
    pub nombre: Option<Value>,
    pub telefono: Option<Value>,
    pub email: Option<Value>,
    pub consentimiento: Option<Value>,
    pub contexto: Option<Value>,
}

impl ContactOptIn {
    pub fn into_row(self) -> Result<ContactRequestRow, ScreeningError> {
        let email = match self.email {
            Some(Value::String(email)) if !email.is_empty() => email,
            _ => return Err(ScreeningError::InvalidInput("Email requerido".to_string())),
        };

        Ok(ContactRequestRow {
            respondent_id: row_id(self.respondent_id.as_ref()),
            screening_id: row_id(self.screening_id.as_ref()),
            nombre: self.nombre.filter(|value| !value.is_null()),
            telefono: self.telefono.filter(|value| !value.is_null()),
            email,
            consentimiento: consent_given(self.consentimiento.as_ref()),
            contexto: self.contexto.filter(|value| !value.is_null()),
        })
    }
}

fn row_id(value: Option<&Value>) -> Option<RowId> {
    match value? {
        Value::Number(number) => number.as_i64(),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    }
}

fn consent_given(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Some(Value::String(raw)) => !raw.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
