use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, ORIGIN, VARY,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::config::DEFAULT_ALLOWED_ORIGINS;

const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
const ALLOW_METHODS: &str = "POST, OPTIONS";
const MAX_AGE_SECS: &str = "86400";

/// Allow-list CORS: known origins are echoed back, anything else receives the
/// first allow-listed origin.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl CorsPolicy {
    pub fn new(allowed_origins: Vec<String>) -> Self {
        let allowed_origins = if allowed_origins.is_empty() {
            DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect()
        } else {
            allowed_origins
        };
        Self { allowed_origins }
    }

    pub fn allow_origin(&self, origin: Option<&str>) -> &str {
        origin
            .and_then(|origin| {
                self.allowed_origins
                    .iter()
                    .find(|allowed| allowed.as_str() == origin)
            })
            .or_else(|| self.allowed_origins.first())
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn apply(&self, origin: Option<&str>, headers: &mut HeaderMap) {
        if let Ok(value) = HeaderValue::from_str(self.allow_origin(origin)) {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE_SECS));
        headers.insert(VARY, HeaderValue::from_static("Origin"));
    }
}

/// Answers preflight requests directly and stamps CORS headers on every response.
pub async fn cors_middleware(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let mut response = if request.method() == Method::OPTIONS {
        (StatusCode::OK, "ok").into_response()
    } else {
        next.run(request).await
    };

    policy.apply(origin.as_deref(), response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CorsPolicy {
        CorsPolicy::new(vec![
            "http://localhost:4200".to_string(),
            "https://cuestionariotamizajeprod.com".to_string(),
        ])
    }

    #[test]
    fn echoes_allow_listed_origins() {
        assert_eq!(
            policy().allow_origin(Some("https://cuestionariotamizajeprod.com")),
            "https://cuestionariotamizajeprod.com"
        );
    }

    #[test]
    fn unknown_or_missing_origins_get_the_default() {
        assert_eq!(
            policy().allow_origin(Some("https://evil.example")),
            "http://localhost:4200"
        );
        assert_eq!(policy().allow_origin(None), "http://localhost:4200");
    }

    #[test]
    fn empty_allow_list_falls_back_to_builtin_origins() {
        let policy = CorsPolicy::default();
        assert_eq!(policy.allow_origin(None), DEFAULT_ALLOWED_ORIGINS[0]);
    }

    #[test]
    fn apply_sets_the_full_header_set() {
        let mut headers = HeaderMap::new();
        policy().apply(Some("http://localhost:4200"), &mut headers);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:4200");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(headers[ACCESS_CONTROL_MAX_AGE], "86400");
        assert_eq!(headers[VARY], "Origin");
    }
}
