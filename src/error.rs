use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Request-level failures, mapped to HTTP responses. Every variant renders a
/// JSON body with `ok: false` so browser callers can read the detail; CORS
/// headers are applied by the router layer outside the handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing required fields: {}", .missing.join(", "))]
    Validation {
        missing: Vec<String>,
        received: Vec<String>,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("server misconfigured: {0}")]
    Config(String),

    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("email provider rejected the request")]
    Provider {
        status: u16,
        detail: serde_json::Value,
    },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Config(_) | ApiError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Provider { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::Validation { missing, received } => json!({
                "ok": false,
                "error": self.to_string(),
                "missing": missing,
                "receivedKeys": received,
            }),
            ApiError::Provider { status, detail } => json!({
                "ok": false,
                "error": self.to_string(),
                "status": status,
                "details": detail,
            }),
            _ => json!({ "ok": false, "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_status_codes() {
        let validation = ApiError::Validation {
            missing: vec!["fullName".into()],
            received: vec![],
        };
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Config("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Transport("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let provider = ApiError::Provider {
            status: 422,
            detail: json!({}),
        };
        assert_eq!(provider.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn validation_message_names_the_fields() {
        let err = ApiError::Validation {
            missing: vec!["fullName".into(), "businessName".into()],
            received: vec!["email".into()],
        };
        assert_eq!(err.to_string(), "missing required fields: fullName, businessName");
    }
}
