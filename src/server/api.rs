use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{error, info, warn};
use serde_json::{json, Map, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::chat::ChatRequest;
use crate::models::lead::Lead;
use crate::models::received_keys;
use crate::relay::PredictionClient;
use crate::sinks::LeadNotifier;

/// Header carrying the shared-secret token for lead submissions.
pub const LEAD_TOKEN_HEADER: &str = "x-lead-token";

#[derive(Clone)]
pub struct AppState {
    pub relay: Option<Arc<PredictionClient>>,
    pub notifier: Arc<LeadNotifier>,
    pub lead_token: Option<String>,
    pub required_fields: Arc<Vec<String>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("relay", &self.relay)
            .field("notifier", &"..")
            .field("lead_token", &self.lead_token.as_ref().map(|_| "..."))
            .field("required_fields", &self.required_fields)
            .finish()
    }
}

pub fn router(state: AppState, allowed_origins: &str) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat", post(relay_chat_handler).options(chat_preflight_handler))
        .route("/api/lead", post(submit_lead_handler).options(lead_preflight_handler))
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

/// CORS applies to every response, including errors, so browser callers can
/// read failure bodies.
fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-api-key"),
            HeaderName::from_static(LEAD_TOKEN_HEADER),
        ])
        .max_age(Duration::from_secs(86400));

    if allowed_origins.trim() == "*" {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn chat_preflight_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn lead_preflight_handler() -> StatusCode {
    StatusCode::OK
}

async fn relay_chat_handler(State(state): State<AppState>, body: Bytes) -> Response {
    match relay_chat(&state, &body).await {
        Ok(resp) => resp,
        Err(e) => e.into_response(),
    }
}

async fn relay_chat(state: &AppState, body: &[u8]) -> Result<Response, ApiError> {
    // Fail fast on missing configuration, before reading the body.
    let relay = state
        .relay
        .as_ref()
        .ok_or_else(|| ApiError::Config("UPSTREAM_URL is not configured".into()))?;

    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {}", e)))?;

    let request = ChatRequest::from_payload(&payload).map_err(|missing| ApiError::Validation {
        missing: missing.iter().map(|s| s.to_string()).collect(),
        received: received_keys(&payload),
    })?;

    info!("Relaying chat request for conversation {}", request.conversation_id);

    let reply = relay.relay(&request).await.map_err(|e| {
        error!("Upstream chat call failed: {}", e);
        ApiError::Transport(e.to_string())
    })?;

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((
        status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response())
}

async fn submit_lead_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match submit_lead(&state, &headers, &body).await {
        Ok(resp) => resp,
        Err(e) => e.into_response(),
    }
}

async fn submit_lead(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Response, ApiError> {
    // Token gate runs before any processing of the body.
    if let Some(expected) = &state.lead_token {
        let presented = headers.get(LEAD_TOKEN_HEADER).and_then(|v| v.to_str().ok());
        if presented != Some(expected.as_str()) {
            warn!(
                "Lead submission rejected: {} token",
                if presented.is_none() { "missing" } else { "mismatched" }
            );
            return Err(ApiError::Unauthorized);
        }
    }

    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {}", e)))?;

    let lead = Lead::from_payload(&payload);
    let missing = lead.missing_fields(&state.required_fields);
    if !missing.is_empty() {
        return Err(ApiError::Validation {
            missing,
            received: received_keys(&payload),
        });
    }

    let lead_ref = Uuid::new_v4().to_string();
    info!(
        "Lead {} received: {}",
        lead_ref,
        if lead.business_name.is_empty() { &lead.full_name } else { &lead.business_name }
    );

    let report = state.notifier.notify(&lead, &lead_ref).await?;

    let mut body = Map::new();
    body.insert("ok".to_string(), json!(true));
    body.insert("id".to_string(), json!(report.id));
    body.insert("leadRef".to_string(), json!(lead_ref));
    for (name, status) in &report.secondary {
        body.insert(
            (*name).to_string(),
            serde_json::to_value(status).unwrap_or(Value::Null),
        );
    }

    Ok((StatusCode::OK, Json(Value::Object(body))).into_response())
}
