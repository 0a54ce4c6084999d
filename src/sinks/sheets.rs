use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client as HttpClient;
use serde_json::json;
use std::error::Error as StdError;

use super::NotificationSink;
use crate::models::lead::Lead;

/// Appends each lead to a spreadsheet through a logging webhook (e.g. an
/// Apps Script deployment). Receives the full canonical field set plus a
/// reference id and a receive timestamp.
pub struct SheetSink {
    http: HttpClient,
    webhook_url: String,
}

impl SheetSink {
    pub fn new(webhook_url: String) -> Self {
        Self {
            http: HttpClient::new(),
            webhook_url,
        }
    }
}

#[async_trait]
impl NotificationSink for SheetSink {
    fn name(&self) -> &'static str {
        "sheets"
    }

    async fn deliver(
        &self,
        lead: &Lead,
        lead_ref: &str,
    ) -> Result<u16, Box<dyn StdError + Send + Sync>> {
        let mut payload = serde_json::to_value(lead)?;
        if let Some(obj) = payload.as_object_mut() {
            obj.insert("leadRef".to_string(), json!(lead_ref));
            obj.insert("receivedAt".to_string(), json!(Utc::now().to_rfc3339()));
        }

        let resp = self.http.post(&self.webhook_url).json(&payload).send().await?;
        Ok(resp.status().as_u16())
    }
}
