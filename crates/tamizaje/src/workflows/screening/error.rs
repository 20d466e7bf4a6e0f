use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::repository::StoreError;

/// Failures surfaced by the screening endpoints.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningError {
    #[error("Método no permitido")]
    InvalidMethod,
    #[error("{0}")]
    InvalidInput(String),
    #[error("Faltan variables de entorno del servidor")]
    Configuration,
    #[error(transparent)]
    Persistence(#[from] StoreError),
    #[error("Error inesperado: {0}")]
    Unexpected(String),
}

impl ScreeningError {
    pub fn status(&self) -> StatusCode {
        match self {
            ScreeningError::InvalidMethod => StatusCode::METHOD_NOT_ALLOWED,
            ScreeningError::InvalidInput(_) | ScreeningError::Persistence(_) => {
                StatusCode::BAD_REQUEST
            }
            ScreeningError::Configuration | ScreeningError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message returned to the caller; unexpected failures stay generic.
    pub fn public_message(&self) -> String {
        match self {
            ScreeningError::Unexpected(_) => "Error inesperado".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for ScreeningError {
    fn from(value: serde_json::Error) -> Self {
        Self::Unexpected(value.to_string())
    }
}

impl IntoResponse for ScreeningError {
    fn into_response(self) -> Response {
        if let ScreeningError::Unexpected(detail) = &self {
            tracing::error!(%detail, "screening request failed unexpectedly");
        }
        let body = Json(json!({ "error": self.public_message() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(
            ScreeningError::InvalidMethod.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ScreeningError::InvalidInput("Email requerido".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ScreeningError::Persistence(StoreError::Rejected("duplicate key".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ScreeningError::Configuration.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unexpected_details_are_not_exposed() {
        let err = ScreeningError::Unexpected("stack trace".into());
        assert_eq!(err.public_message(), "Error inesperado");
        assert_eq!(
            ScreeningError::Persistence(StoreError::Rejected("duplicate key".into()))
                .public_message(),
            "duplicate key"
        );
    }
}
