use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::assembler::{PayloadAssembler, ScreeningEvaluation};
use super::catalog::QuestionId;
use super::contact::ContactOptIn;
use super::error::ScreeningError;
use super::repository::{RespondentRow, RowId, ScreeningRow, ScreeningStore};
use super::submission::{Identification, ScreeningSubmission};

/// Body of a successful `POST /submit-screening`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub ok: bool,
    pub respondent_id: RowId,
    pub screening_id: RowId,
    pub requires_screening: bool,
    pub score_yes_no: u32,
}

/// Body of a successful `POST /contact-optin`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptInReceipt {
    pub ok: bool,
    pub id: RowId,
}

/// Recomputes submissions authoritatively and persists them.
pub struct ScreeningService<S> {
    store: Option<Arc<S>>,
    assembler: PayloadAssembler,
}

impl<S> ScreeningService<S>
where
    S: ScreeningStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store: Some(store),
            assembler: PayloadAssembler::default(),
        }
    }

    /// A service without store credentials; every write reports a configuration error.
    pub fn unconfigured() -> Self {
        Self {
            store: None,
            assembler: PayloadAssembler::default(),
        }
    }

    pub fn assembler(&self) -> &PayloadAssembler {
        &self.assembler
    }

    fn store(&self) -> Result<&Arc<S>, ScreeningError> {
        self.store.as_ref().ok_or(ScreeningError::Configuration)
    }

    /// Score the submission and write the respondent, then the screening.
    ///
    /// The two inserts are not atomic: if the screening insert fails the
    /// respondent row stays behind without a screening.
    pub async fn submit(
        &self,
        submission: ScreeningSubmission,
    ) -> Result<SubmissionReceipt, ScreeningError> {
        let store = self.store()?;
        let ScreeningSubmission {
            identification,
            answers,
            client_results,
        } = submission;

        let evaluation = self.assembler.evaluate(&answers);
        let respuestas = self.assembler.stored_respuestas(&answers, &evaluation.answers)?;
        let resultados = self
            .assembler
            .stored_resultados(client_results.as_ref(), &evaluation.result)?;

        let respondent_id = store
            .insert_respondent(respondent_row(identification))
            .await?;

        let row = screening_row(respondent_id, &evaluation, respuestas, resultados);
        let screening_id = match store.insert_screening(row).await {
            Ok(id) => id,
            Err(err) => {
                warn!(
                    respondent_id,
                    error = %err,
                    "screening insert failed; respondent row left without screening"
                );
                return Err(err.into());
            }
        };

        let findings = &evaluation.result.findings;
        info!(
            respondent_id,
            screening_id,
            requires_screening = findings.requires_screening,
            score_yes_no = findings.score_yes_no,
            "screening stored"
        );

        Ok(SubmissionReceipt {
            ok: true,
            respondent_id,
            screening_id,
            requires_screening: findings.requires_screening,
            score_yes_no: findings.score_yes_no,
        })
    }

    pub async fn opt_in(&self, request: ContactOptIn) -> Result<OptInReceipt, ScreeningError> {
        let row = request.into_row()?;
        let store = self.store()?;
        let id = store.insert_contact_request(row).await?;
        info!(contact_request_id = id, "contact opt-in stored");
        Ok(OptInReceipt { ok: true, id })
    }
}

fn respondent_row(identification: Identification) -> RespondentRow {
    RespondentRow {
        fecha_nacimiento: identification.birth_date(),
        sexo: identification.sexo,
        cp: identification.cp,
        medico: identification.medico,
        nombre: identification.nombre,
        telefono: identification.telefono,
    }
}

fn screening_row(
    respondent_id: RowId,
    evaluation: &ScreeningEvaluation,
    respuestas: serde_json::Value,
    resultados: serde_json::Value,
) -> ScreeningRow {
    let findings = &evaluation.result.findings;
    ScreeningRow {
        respondent_id,
        respuestas,
        resultados,
        pack_years: findings.pack_years,
        exposicion_ib: findings.exposure_index,
        tabaquismo_cumple: findings.tabaquismo_meets_criteria,
        biomasa_cumple: findings.biomasa_meets_criteria,
        score_yesno: findings.score_yes_no,
        question_columns: QuestionId::ALL
            .into_iter()
            .map(|id| {
                (
                    id.column_name().to_string(),
                    evaluation.answers.get(id).as_option(),
                )
            })
            .collect(),
    }
}
