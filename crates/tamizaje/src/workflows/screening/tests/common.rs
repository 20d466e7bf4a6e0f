use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};

use crate::workflows::screening::repository::{
    ContactRequestRow, RespondentRow, RowId, ScreeningRow, ScreeningStore, StoreError,
};
use crate::workflows::screening::{screening_router, CorsPolicy, ScreeningService, ScreeningSubmission};

pub(super) fn legacy_submission_body() -> Value {
    json!({
        "identificacion": {
            "nombre": "María López",
            "sexo": "F",
            "fechaNacimiento": "07/11/1958",
            "cp": "06700",
            "telefono": "5512345678",
            "email": "maria@example.com",
            "medico": "Dr. Ruiz"
        },
        "respuestas": {
            "familiarCaPulmon": false,
            "tosTresMeses": false,
            "tosConSangre": true,
            "perdidaPesoInexplicable": false,
            "expoRadon": false,
            "contaminacionAlta": false,
            "fumaOFumo": true,
            "fumador": "sí",
            "aniosFumando": 12,
            "cigsPorDia": 10,
            "expBiomasa": false,
            "aniosBiomasa": 0,
            "horasPorDiaBiomasa": 0
        },
        "resultados": {
            "totalPoints": 8,
            "riskLevel": "high",
            "recommendation": "Es prioritario contactar a un médico.",
            "requiresContact": true
        }
    })
}

pub(super) fn legacy_submission() -> ScreeningSubmission {
    ScreeningSubmission::from_json(legacy_submission_body()).expect("fixture parses")
}

#[derive(Default)]
pub(super) struct MemoryStore {
    next_id: Mutex<RowId>,
    pub(super) respondents: Mutex<Vec<(RowId, RespondentRow)>>,
    pub(super) screenings: Mutex<Vec<(RowId, ScreeningRow)>>,
    pub(super) contacts: Mutex<Vec<(RowId, ContactRequestRow)>>,
}

impl MemoryStore {
    fn allocate(&self) -> RowId {
        let mut guard = self.next_id.lock().expect("id mutex poisoned");
        *guard += 1;
        *guard
    }

    pub(super) fn respondent_count(&self) -> usize {
        self.respondents.lock().expect("store mutex poisoned").len()
    }

    pub(super) fn screening_count(&self) -> usize {
        self.screenings.lock().expect("store mutex poisoned").len()
    }

    pub(super) fn last_screening(&self) -> Option<ScreeningRow> {
        self.screenings
            .lock()
            .expect("store mutex poisoned")
            .last()
            .map(|(_, row)| row.clone())
    }

    pub(super) fn last_respondent(&self) -> Option<RespondentRow> {
        self.respondents
            .lock()
            .expect("store mutex poisoned")
            .last()
            .map(|(_, row)| row.clone())
    }
}

#[async_trait]
impl ScreeningStore for MemoryStore {
    async fn insert_respondent(&self, row: RespondentRow) -> Result<RowId, StoreError> {
        let id = self.allocate();
        self.respondents
            .lock()
            .expect("store mutex poisoned")
            .push((id, row));
        Ok(id)
    }

    async fn insert_screening(&self, row: ScreeningRow) -> Result<RowId, StoreError> {
        let id = self.allocate();
        self.screenings
            .lock()
            .expect("store mutex poisoned")
            .push((id, row));
        Ok(id)
    }

    async fn insert_contact_request(&self, row: ContactRequestRow) -> Result<RowId, StoreError> {
        let id = self.allocate();
        self.contacts
            .lock()
            .expect("store mutex poisoned")
            .push((id, row));
        Ok(id)
    }
}

/// Accepts respondents but rejects every screening insert.
#[derive(Default)]
pub(super) struct ScreeningRejectingStore {
    pub(super) inner: MemoryStore,
}

#[async_trait]
impl ScreeningStore for ScreeningRejectingStore {
    async fn insert_respondent(&self, row: RespondentRow) -> Result<RowId, StoreError> {
        self.inner.insert_respondent(row).await
    }

    async fn insert_screening(&self, _row: ScreeningRow) -> Result<RowId, StoreError> {
        Err(StoreError::Rejected(
            "insert or update on table \"screenings\" violates foreign key constraint".to_string(),
        ))
    }

    async fn insert_contact_request(&self, row: ContactRequestRow) -> Result<RowId, StoreError> {
        self.inner.insert_contact_request(row).await
    }
}

pub(super) fn build_service() -> (ScreeningService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    (ScreeningService::new(store.clone()), store)
}

pub(super) fn router_with_service(service: ScreeningService<MemoryStore>) -> axum::Router {
    screening_router(
        Arc::new(service),
        CorsPolicy::new(vec![
            "http://localhost:4200".to_string(),
            "https://encuesta-omega.vercel.app".to_string(),
        ]),
    )
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
