pub mod chat_ops;
pub mod email;
pub mod sheets;

use async_trait::async_trait;
use log::{info, warn};
use serde::Serialize;
use std::error::Error as StdError;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::lead::Lead;
use self::email::EmailClient;

/// Outcome of one best-effort delivery attempt, embedded in the response
/// payload under the sink's name.
#[derive(Clone, Debug, Serialize)]
pub struct SinkStatus {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A best-effort notification destination. `deliver` returns the HTTP status
/// of the completed round-trip; transport failures propagate to the
/// dispatcher, which records them without aborting the request.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn deliver(
        &self,
        lead: &Lead,
        lead_ref: &str,
    ) -> Result<u16, Box<dyn StdError + Send + Sync>>;
}

/// Per-request delivery summary: the email provider's id plus one status per
/// configured secondary sink.
#[derive(Clone, Debug)]
pub struct NotifyReport {
    pub id: Option<String>,
    pub secondary: Vec<(&'static str, SinkStatus)>,
}

/// Dispatches a lead to the configured sinks. The email sink is the primary
/// path: its failure fails the request. Secondary sinks run afterwards,
/// strictly in order, each inside its own failure boundary.
pub struct LeadNotifier {
    email: Option<EmailClient>,
    secondary: Vec<Arc<dyn NotificationSink>>,
}

impl LeadNotifier {
    pub fn new(email: Option<EmailClient>, secondary: Vec<Arc<dyn NotificationSink>>) -> Self {
        Self { email, secondary }
    }

    pub async fn notify(&self, lead: &Lead, lead_ref: &str) -> Result<NotifyReport, ApiError> {
        let email = self.email.as_ref().ok_or_else(|| {
            ApiError::Config("missing email env vars (EMAIL_API_KEY, EMAIL_FROM, EMAIL_TO)".into())
        })?;

        let receipt = email.send(lead).await?;
        info!("Lead {} emailed, provider id: {:?}", lead_ref, receipt.id);

        let mut secondary = Vec::with_capacity(self.secondary.len());
        for sink in &self.secondary {
            let status = match sink.deliver(lead, lead_ref).await {
                Ok(code) if (200..300).contains(&code) => SinkStatus {
                    ok: true,
                    status: Some(code),
                    error: None,
                },
                Ok(code) => {
                    warn!("{} sink answered {} for lead {}", sink.name(), code, lead_ref);
                    SinkStatus {
                        ok: false,
                        status: Some(code),
                        error: Some(format!("webhook returned status {}", code)),
                    }
                }
                Err(e) => {
                    warn!("{} sink failed for lead {}: {}", sink.name(), lead_ref, e);
                    SinkStatus {
                        ok: false,
                        status: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            secondary.push((sink.name(), status));
        }

        Ok(NotifyReport {
            id: receipt.id,
            secondary,
        })
    }
}
