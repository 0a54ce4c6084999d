use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::json;
use std::error::Error as StdError;

use super::NotificationSink;
use crate::models::lead::Lead;

/// Posts a short alert to a chat-ops incoming webhook. The payload is the
/// Slack-compatible `{"text": ...}` shape.
pub struct ChatOpsSink {
    http: HttpClient,
    webhook_url: String,
}

impl ChatOpsSink {
    pub fn new(webhook_url: String) -> Self {
        Self {
            http: HttpClient::new(),
            webhook_url,
        }
    }

    fn alert_text(lead: &Lead, lead_ref: &str) -> String {
        let mut text = format!("New lead: {}", lead.full_name);
        if !lead.business_name.is_empty() {
            text.push_str(&format!(" ({})", lead.business_name));
        }
        if !lead.phone_or_whatsapp.is_empty() || !lead.preferred_contact.is_empty() {
            text.push_str(&format!(
                "\nContact: {} via {}",
                lead.phone_or_whatsapp, lead.preferred_contact
            ));
        }
        text.push_str(&format!("\nRef: {}", lead_ref));
        text
    }
}

#[async_trait]
impl NotificationSink for ChatOpsSink {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn deliver(
        &self,
        lead: &Lead,
        lead_ref: &str,
    ) -> Result<u16, Box<dyn StdError + Send + Sync>> {
        let payload = json!({ "text": Self::alert_text(lead, lead_ref) });
        let resp = self.http.post(&self.webhook_url).json(&payload).send().await?;
        Ok(resp.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn alert_text_includes_name_business_and_ref() {
        let lead = Lead::from_payload(&json!({
            "fullName": "Ada Lovelace",
            "businessName": "Analytical Engines",
            "phone": "+44 20",
            "preferredContact": "whatsapp",
        }));
        let text = ChatOpsSink::alert_text(&lead, "ref-9");
        assert!(text.contains("Ada Lovelace"));
        assert!(text.contains("(Analytical Engines)"));
        assert!(text.contains("+44 20 via whatsapp"));
        assert!(text.ends_with("Ref: ref-9"));
    }

    #[test]
    fn alert_text_skips_empty_contact_line() {
        let lead = Lead::from_payload(&json!({ "fullName": "Ada" }));
        let text = ChatOpsSink::alert_text(&lead, "ref-9");
        assert!(!text.contains("Contact:"));
    }
}
