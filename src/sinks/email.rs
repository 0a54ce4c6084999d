use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::models::lead::Lead;

/// Settings for the email-delivery API (Resend-compatible: one POST with a
/// bearer key, `from`, `to`, `subject` and an `html` body).
#[derive(Clone, Debug)]
pub struct EmailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
    pub to: String,
}

/// Primary notification sink. Unlike the secondary sinks, a failure here
/// fails the whole submission.
pub struct EmailClient {
    http: HttpClient,
    config: EmailConfig,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: String,
    html: String,
}

/// Provider acknowledgement. The id is whatever the provider assigned, if
/// anything.
#[derive(Clone, Debug)]
pub struct EmailReceipt {
    pub id: Option<String>,
}

impl EmailClient {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            http: HttpClient::new(),
            config,
        }
    }

    pub async fn send(&self, lead: &Lead) -> Result<EmailReceipt, ApiError> {
        let request = SendRequest {
            from: &self.config.from,
            to: [self.config.to.as_str()],
            subject: subject_for(lead),
            html: render_html(lead),
        };

        let resp = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = resp.status().as_u16();
        let detail: Value = resp.json().await.unwrap_or_else(|_| json!({}));

        if !(200..300).contains(&status) {
            return Err(ApiError::Provider { status, detail });
        }

        let id = detail.get("id").and_then(Value::as_str).map(str::to_string);
        Ok(EmailReceipt { id })
    }
}

pub fn subject_for(lead: &Lead) -> String {
    let who = if !lead.business_name.is_empty() {
        lead.business_name.as_str()
    } else if !lead.full_name.is_empty() {
        lead.full_name.as_str()
    } else {
        "Website"
    };
    format!("New Lead — {}", who)
}

/// Escape HTML special characters. Submitted values go through here before
/// being embedded, so free-form text cannot corrupt the notification markup.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn render_html(lead: &Lead) -> String {
    let row = |label: &str, value: &str| format!("<p><b>{}:</b> {}</p>\n", label, escape_html(value));

    let mut html = String::from("<h2>New Lead</h2>\n");
    html.push_str(&row("Name", &lead.full_name));
    html.push_str(&row("Email", &lead.email));
    html.push_str(&row("Preferred contact", &lead.preferred_contact));
    html.push_str(&row("Phone/WhatsApp", &lead.phone_or_whatsapp));
    html.push_str(&row("Business", &lead.business_name));
    html.push_str(&row("Goal", &lead.goal));
    html.push_str(&row("Pain point", &lead.pain_point));
    html.push_str(&row("Tools", &lead.tools));
    html.push_str(&row("Monthly volume", &lead.monthly_volume));
    html.push_str(&row("Source", &lead.source_url));
    html
}
