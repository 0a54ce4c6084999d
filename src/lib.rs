pub mod cli;
pub mod error;
pub mod models;
pub mod relay;
pub mod server;
pub mod sinks;

use std::error::Error;
use std::sync::Arc;

use log::{info, warn};

use cli::Args;
use relay::PredictionClient;
use server::api::AppState;
use server::Server;
use sinks::chat_ops::ChatOpsSink;
use sinks::email::{EmailClient, EmailConfig};
use sinks::sheets::SheetSink;
use sinks::{LeadNotifier, NotificationSink};

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Upstream URL: {}", args.upstream_url.as_deref().unwrap_or("(not set)"));
    info!(
        "Upstream API Key: {}",
        if args.upstream_api_key.is_some() { "(present)" } else { "(absent)" }
    );
    info!("Email API URL: {}", args.email_api_url);
    info!(
        "Lead Token Gate: {}",
        if args.lead_token.is_some() { "enabled" } else { "disabled" }
    );
    info!(
        "Sheet Webhook: {}",
        if args.sheet_webhook_url.is_some() { "configured" } else { "off" }
    );
    info!(
        "Chat Webhook: {}",
        if args.chat_webhook_url.is_some() { "configured" } else { "off" }
    );
    info!("Allowed Origins: {}", args.allowed_origins);
    info!("Required Lead Fields: {}", args.lead_required_fields);
    info!("-------------------------");

    let state = build_state(&args)?;
    let server = Server::new(args.server_addr.clone(), state, args);
    server.run().await
}

/// Constructs the shared request state from configuration. Missing optional
/// configuration leaves the matching dependency unset; the handlers report
/// that per-request instead of the process refusing to start.
pub fn build_state(args: &Args) -> Result<AppState, Box<dyn Error + Send + Sync>> {
    let relay = match &args.upstream_url {
        Some(url) => Some(Arc::new(PredictionClient::new(
            url,
            args.upstream_api_key.clone(),
        )?)),
        None => {
            warn!("UPSTREAM_URL not set, /api/chat will answer 500");
            None
        }
    };

    let email = match (&args.email_api_key, &args.email_from, &args.email_to) {
        (Some(api_key), Some(from), Some(to)) => Some(EmailClient::new(EmailConfig {
            api_url: args.email_api_url.clone(),
            api_key: api_key.clone(),
            from: from.clone(),
            to: to.clone(),
        })),
        _ => {
            warn!("Email env vars incomplete, /api/lead will answer 500");
            None
        }
    };

    let mut secondary: Vec<Arc<dyn NotificationSink>> = Vec::new();
    if let Some(url) = &args.sheet_webhook_url {
        secondary.push(Arc::new(SheetSink::new(url.clone())));
    }
    if let Some(url) = &args.chat_webhook_url {
        secondary.push(Arc::new(ChatOpsSink::new(url.clone())));
    }

    let required_fields: Vec<String> = args
        .lead_required_fields
        .split(',')
        .map(|field| field.trim().to_string())
        .filter(|field| !field.is_empty())
        .collect();
    for field in &required_fields {
        if !models::lead::is_canonical_field(field) {
            return Err(format!("unknown lead field in LEAD_REQUIRED_FIELDS: {}", field).into());
        }
    }

    Ok(AppState {
        relay,
        notifier: Arc::new(LeadNotifier::new(email, secondary)),
        lead_token: args.lead_token.clone(),
        required_fields: Arc::new(required_fields),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn build_state_rejects_unknown_required_field() {
        let args = Args::parse_from(["leadgate", "--lead-required-fields", "fullName,notAField"]);
        let err = build_state(&args).expect_err("unknown field must be rejected");
        assert!(err.to_string().contains("notAField"));
    }

    #[test]
    fn build_state_trims_the_required_field_list() {
        let args = Args::parse_from([
            "leadgate",
            "--lead-required-fields",
            " fullName , phoneOrWhatsapp ",
        ]);
        let state = build_state(&args).expect("valid fields");
        assert_eq!(
            *state.required_fields,
            vec!["fullName".to_string(), "phoneOrWhatsapp".to_string()]
        );
    }
}
