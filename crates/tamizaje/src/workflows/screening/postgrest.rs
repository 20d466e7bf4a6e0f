//! [`ScreeningStore`] backed by a PostgREST endpoint (Supabase `rest/v1`).

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::repository::{
    ContactRequestRow, RespondentRow, RowId, ScreeningRow, ScreeningStore, StoreError,
};
use crate::config::StoreConfig;

const CLIENT_INFO: &str = "tamizaje-api";

#[derive(Debug, Deserialize)]
struct InsertedRow {
    id: RowId,
}

#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    message: Option<String>,
}

#[derive(Clone)]
pub struct PostgrestStore {
    http_client: reqwest::Client,
    config: StoreConfig,
}

impl PostgrestStore {
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        Ok(Self {
            http_client,
            config,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}?select=id", self.config.url, table)
    }

    async fn insert<T: Serialize + Sync>(&self, table: &str, row: &T) -> Result<RowId, StoreError> {
        let key = self.config.service_key.expose_secret();
        let response = self
            .http_client
            .post(self.table_url(table))
            .header("apikey", key.as_str())
            .bearer_auth(key)
            .header("Prefer", "return=representation")
            .header("X-Client-Info", CLIENT_INFO)
            .json(row)
            .send()
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let message = rejection_message(&text)
                .unwrap_or_else(|| format!("{table} insert failed with status {status}"));
            tracing::error!(%table, %status, error = %message, "store rejected insert");
            return Err(StoreError::Rejected(message));
        }

        let rows: Vec<InsertedRow> = parse_json(response).await?;
        rows.into_iter()
            .next()
            .map(|row| row.id)
            .ok_or_else(|| StoreError::MalformedResponse(format!("{table} insert returned no rows")))
    }
}

async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, StoreError> {
    response
        .json()
        .await
        .map_err(|err| StoreError::MalformedResponse(err.to_string()))
}

fn rejection_message(body: &str) -> Option<String> {
    serde_json::from_str::<PostgrestErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
}

#[async_trait]
impl ScreeningStore for PostgrestStore {
    async fn insert_respondent(&self, row: RespondentRow) -> Result<RowId, StoreError> {
        self.insert("respondents", &row).await
    }

    async fn insert_screening(&self, row: ScreeningRow) -> Result<RowId, StoreError> {
        self.insert("screenings", &row).await
    }

    async fn insert_contact_request(&self, row: ContactRequestRow) -> Result<RowId, StoreError> {
        self.insert("contact_requests", &row).await
    }
}
