use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier assigned by the store to an inserted row.
pub type RowId = i64;

/// `respondents` row. Email is deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondentRow {
    pub sexo: Option<String>,
    pub fecha_nacimiento: Option<String>,
    pub cp: Option<String>,
    pub medico: Option<String>,
    pub nombre: Option<String>,
    pub telefono: Option<String>,
}

/// `screenings` row: JSON snapshots plus flat columns for querying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningRow {
    pub respondent_id: RowId,
    pub respuestas: Value,
    pub resultados: Value,
    pub pack_years: f64,
    pub exposicion_ib: f64,
    pub tabaquismo_cumple: bool,
    pub biomasa_cumple: bool,
    pub score_yesno: u32,
    /// One `q_*` column per catalog question; `None` when unanswered.
    #[serde(flatten)]
    pub question_columns: BTreeMap<String, Option<bool>>,
}

/// `contact_requests` row written by the opt-in flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRequestRow {
    pub respondent_id: Option<RowId>,
    pub screening_id: Option<RowId>,
    /// Stored as received; clients send these as text or numbers.
    pub nombre: Option<Value>,
    pub telefono: Option<Value>,
    pub email: String,
    pub consentimiento: bool,
    pub contexto: Option<Value>,
}

/// Insert-and-return-id persistence port. Writes are independent; callers get
/// no transaction spanning more than one insert.
#[async_trait]
pub trait ScreeningStore: Send + Sync {
    async fn insert_respondent(&self, row: RespondentRow) -> Result<RowId, StoreError>;
    async fn insert_screening(&self, row: ScreeningRow) -> Result<RowId, StoreError>;
    async fn insert_contact_request(&self, row: ContactRequestRow) -> Result<RowId, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Rejected(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("unexpected store response: {0}")]
    MalformedResponse(String),
}
