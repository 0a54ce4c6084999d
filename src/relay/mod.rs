use log::info;
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::error::Error as StdError;
use url::Url;

use crate::models::chat::ChatRequest;

/// Delimiters of the structured block some chatflows embed in their reply
/// text for machine extraction. Stripped before the text reaches a human.
pub const MARKER_OPEN: &str = "<LEAD_JSON>";
pub const MARKER_CLOSE: &str = "</LEAD_JSON>";

const PREDICTION_ROUTE: &str = "/api/v1/prediction";

/// Upstream reply, forwarded to the caller with its original status code.
#[derive(Clone, Debug)]
pub struct RelayReply {
    pub status: u16,
    pub body: String,
}

/// Client for the upstream prediction endpoint. Built once from
/// configuration and shared across requests.
#[derive(Clone, Debug)]
pub struct PredictionClient {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl PredictionClient {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Url::parse(base_url)?;

        Ok(Self {
            http: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn prediction_url(&self, conversation_id: &str) -> String {
        format!("{}{}/{}", self.base_url, PREDICTION_ROUTE, conversation_id)
    }

    /// Issues the single outbound call and returns the upstream reply with
    /// marker blocks stripped from its `text` field. Transport failures
    /// propagate; upstream error statuses are forwarded, not retried.
    pub async fn relay(
        &self,
        request: &ChatRequest,
    ) -> Result<RelayReply, Box<dyn StdError + Send + Sync>> {
        let url = self.prediction_url(&request.conversation_id);
        info!("Forwarding chat request to {}", url);

        let mut req = self.http.post(&url).json(&request.to_prediction_payload());
        if let Some(key) = &self.api_key {
            // Some upstream deployments use Bearer, some use x-api-key.
            // Sending both is fine; the backend ignores the one it doesn't use.
            req = req
                .header("Authorization", format!("Bearer {}", key))
                .header("x-api-key", key.as_str());
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;

        Ok(RelayReply {
            status,
            body: strip_marker_body(&body),
        })
    }
}

/// Removes marker blocks from the `text` field of a JSON reply body. A body
/// that is not JSON, has no string `text` field, or carries no marker passes
/// through byte-for-byte.
pub fn strip_marker_body(body: &str) -> String {
    let mut value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return body.to_string(),
    };

    let stripped = match value.get("text").and_then(Value::as_str) {
        Some(text) if text.contains(MARKER_OPEN) => strip_marker(text),
        _ => return body.to_string(),
    };

    if let Some(obj) = value.as_object_mut() {
        obj.insert("text".to_string(), Value::String(stripped));
    }
    value.to_string()
}

/// Removes every `<LEAD_JSON>...</LEAD_JSON>` block from `text`. An opening
/// marker with no closing marker strips to the end of the text.
pub fn strip_marker(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(MARKER_OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + MARKER_OPEN.len()..];
        match after_open.find(MARKER_CLOSE) {
            Some(end) => rest = &after_open[end + MARKER_CLOSE.len()..],
            None => return out,
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prediction_url_joins_base_and_identifier() {
        let client = PredictionClient::new("https://x.test", None).expect("valid url");
        assert_eq!(client.prediction_url("abc"), "https://x.test/api/v1/prediction/abc");
    }

    #[test]
    fn prediction_url_drops_trailing_slash() {
        let client = PredictionClient::new("https://x.test/", None).expect("valid url");
        assert_eq!(client.prediction_url("abc"), "https://x.test/api/v1/prediction/abc");
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(PredictionClient::new("not a url", None).is_err());
    }

    #[test]
    fn strips_a_single_marker_block() {
        let text = "Hello<LEAD_JSON>{\"name\":\"Ada\"}</LEAD_JSON>";
        assert_eq!(strip_marker(text), "Hello");
    }

    #[test]
    fn strips_multiple_marker_blocks() {
        let text = "a<LEAD_JSON>1</LEAD_JSON>b<LEAD_JSON>2</LEAD_JSON>c";
        assert_eq!(strip_marker(text), "abc");
    }

    #[test]
    fn unterminated_marker_strips_to_end() {
        let text = "Hello<LEAD_JSON>{\"partial\":";
        assert_eq!(strip_marker(text), "Hello");
    }

    #[test]
    fn text_without_marker_is_unchanged() {
        assert_eq!(strip_marker("Hello there"), "Hello there");
    }

    #[test]
    fn body_with_marker_text_is_rewritten() {
        let body = json!({ "text": "Hello<LEAD_JSON>{}</LEAD_JSON>" }).to_string();
        let stripped: Value = serde_json::from_str(&strip_marker_body(&body)).expect("json");
        assert_eq!(stripped["text"], "Hello");
    }

    #[test]
    fn non_json_body_passes_through() {
        let body = "upstream exploded";
        assert_eq!(strip_marker_body(body), body);
    }

    #[test]
    fn json_without_text_field_passes_through() {
        let body = json!({ "answer": 42 }).to_string();
        assert_eq!(strip_marker_body(&body), body);
    }

    #[test]
    fn non_string_text_field_passes_through() {
        let body = json!({ "text": ["not", "a", "string"] }).to_string();
        assert_eq!(strip_marker_body(&body), body);
    }
}
