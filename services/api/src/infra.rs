use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tamizaje::workflows::screening::{
    ContactRequestRow, RespondentRow, RowId, ScreeningRow, ScreeningStore, StoreError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct Tables {
    last_id: RowId,
    respondents: Vec<(RowId, RespondentRow)>,
    screenings: Vec<(RowId, ScreeningRow)>,
    contact_requests: Vec<(RowId, ContactRequestRow)>,
}

impl Tables {
    fn next_id(&mut self) -> RowId {
        self.last_id += 1;
        self.last_id
    }
}

/// Process-local store for `serve --in-memory`; rows are lost on shutdown.
#[derive(Default, Clone)]
pub(crate) struct InMemoryScreeningStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryScreeningStore {
    #[cfg(test)]
    pub(crate) fn screening_count(&self) -> usize {
        self.tables
            .lock()
            .expect("store mutex poisoned")
            .screenings
            .len()
    }
}

#[async_trait]
impl ScreeningStore for InMemoryScreeningStore {
    async fn insert_respondent(&self, row: RespondentRow) -> Result<RowId, StoreError> {
        let mut guard = self.tables.lock().expect("store mutex poisoned");
        let id = guard.next_id();
        guard.respondents.push((id, row));
        Ok(id)
    }

    async fn insert_screening(&self, row: ScreeningRow) -> Result<RowId, StoreError> {
        let mut guard = self.tables.lock().expect("store mutex poisoned");
        if !guard
            .respondents
            .iter()
            .any(|(id, _)| *id == row.respondent_id)
        {
            return Err(StoreError::Rejected(format!(
                "respondent {} does not exist",
                row.respondent_id
            )));
        }
        let id = guard.next_id();
        guard.screenings.push((id, row));
        Ok(id)
    }

    async fn insert_contact_request(&self, row: ContactRequestRow) -> Result<RowId, StoreError> {
        let mut guard = self.tables.lock().expect("store mutex poisoned");
        let id = guard.next_id();
        guard.contact_requests.push((id, row));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn screening_for(respondent_id: RowId) -> ScreeningRow {
        ScreeningRow {
            respondent_id,
            respuestas: json!({}),
            resultados: json!({}),
            pack_years: 0.0,
            exposicion_ib: 0.0,
            tabaquismo_cumple: false,
            biomasa_cumple: false,
            score_yesno: 0,
            question_columns: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn screenings_must_reference_a_respondent() {
        let store = InMemoryScreeningStore::default();

        let missing = store.insert_screening(screening_for(42)).await;
        assert!(matches!(missing, Err(StoreError::Rejected(_))));

        let respondent = store
            .insert_respondent(RespondentRow::default())
            .await
            .expect("respondent stored");
        let screening = store
            .insert_screening(screening_for(respondent))
            .await
            .expect("screening stored");
        assert!(screening > respondent);
        assert_eq!(store.screening_count(), 1);
    }
}
