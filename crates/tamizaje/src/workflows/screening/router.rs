use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::de::DeserializeOwned;

use super::contact::ContactOptIn;
use super::cors::{cors_middleware, CorsPolicy};
use super::error::ScreeningError;
use super::repository::ScreeningStore;
use super::service::ScreeningService;
use super::submission::ScreeningSubmission;

/// Router builder exposing the submission and opt-in endpoints behind the CORS policy.
pub fn screening_router<S>(service: Arc<ScreeningService<S>>, cors: CorsPolicy) -> Router
where
    S: ScreeningStore + 'static,
{
    Router::new()
        .route(
            "/submit-screening",
            post(submit_handler::<S>).fallback(method_not_allowed),
        )
        .route(
            "/contact-optin",
            post(contact_handler::<S>).fallback(method_not_allowed),
        )
        .with_state(service)
        .layer(middleware::from_fn_with_state(Arc::new(cors), cors_middleware))
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ScreeningError> {
    serde_json::from_slice(body)
        .map_err(|err| ScreeningError::InvalidInput(format!("JSON inválido: {err}")))
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    body: Bytes,
) -> Response
where
    S: ScreeningStore + 'static,
{
    let submission = match parse_body(&body).and_then(ScreeningSubmission::from_json) {
        Ok(submission) => submission,
        Err(err) => return err.into_response(),
    };

    match service.submit(submission).await {
        Ok(receipt) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn contact_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    body: Bytes,
) -> Response
where
    S: ScreeningStore + 'static,
{
    let request: ContactOptIn = match parse_body(&body) {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };

    match service.opt_in(request).await {
        Ok(receipt) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn method_not_allowed() -> Response {
    ScreeningError::InvalidMethod.into_response()
}
