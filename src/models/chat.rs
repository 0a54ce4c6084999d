use serde::Serialize;
use serde_json::Value;

use super::resolve_field;

/// Inbound chat request after field resolution. The front end and the
/// conversational platform disagree on key names, so both spellings of the
/// identifier and the message are accepted.
#[derive(Clone, Debug)]
pub struct ChatRequest {
    pub conversation_id: String,
    pub message: String,
    pub override_config: Option<Value>,
    pub session_id: Option<String>,
}

/// Payload forwarded to the upstream prediction endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct PredictionPayload {
    pub question: String,
    #[serde(rename = "overrideConfig", skip_serializing_if = "Option::is_none")]
    pub override_config: Option<Value>,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    /// Builds a request from the raw JSON body. On failure returns the
    /// canonical names of the fields that could not be resolved.
    pub fn from_payload(payload: &Value) -> Result<Self, Vec<&'static str>> {
        let conversation_id = resolve_field(payload, &["conversationId", "chatflowId"]);
        let message = resolve_field(payload, &["message", "question"]);

        match (conversation_id, message) {
            (Some(conversation_id), Some(message)) => Ok(Self {
                conversation_id,
                message,
                override_config: payload.get("overrideConfig").cloned(),
                session_id: payload
                    .get("sessionId")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
            }),
            (conversation_id, message) => {
                let mut missing = Vec::new();
                if conversation_id.is_none() {
                    missing.push("conversationId");
                }
                if message.is_none() {
                    missing.push("message");
                }
                Err(missing)
            }
        }
    }

    pub fn to_prediction_payload(&self) -> PredictionPayload {
        PredictionPayload {
            question: self.message.clone(),
            override_config: self.override_config.clone(),
            session_id: self.session_id.clone(),
        }
    }
}
