use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address and port for the gateway to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// Comma-separated list of origins allowed by CORS, or "*" for any origin.
    #[arg(long, env = "ALLOWED_ORIGINS", default_value = "*")]
    pub allowed_origins: String,

    // --- Chat Relay Args ---
    /// Base URL of the upstream chat backend (e.g., https://chat.example.com).
    /// Without it, /api/chat answers 500.
    #[arg(long, env = "UPSTREAM_URL")]
    pub upstream_url: Option<String>,

    /// Optional credential for the upstream chat backend. When present it is
    /// sent as both a Bearer token and an x-api-key header; when absent the
    /// call is made unauthenticated.
    #[arg(long, env = "UPSTREAM_API_KEY")]
    pub upstream_api_key: Option<String>,

    // --- Lead Notifier Args ---
    /// Endpoint of the email-delivery API.
    #[arg(long, env = "EMAIL_API_URL", default_value = "https://api.resend.com/emails")]
    pub email_api_url: String,

    /// API key for the email-delivery provider.
    #[arg(long, env = "EMAIL_API_KEY")]
    pub email_api_key: Option<String>,

    /// Sender address for lead notifications. Must be verified with the provider.
    #[arg(long, env = "EMAIL_FROM")]
    pub email_from: Option<String>,

    /// Recipient inbox for lead notifications.
    #[arg(long, env = "EMAIL_TO")]
    pub email_to: Option<String>,

    /// Shared-secret token that /api/lead callers must present in the
    /// x-lead-token header. Leave unset to disable the gate.
    #[arg(long, env = "LEAD_TOKEN")]
    pub lead_token: Option<String>,

    /// Webhook that appends each lead to a spreadsheet. Optional, best-effort.
    #[arg(long, env = "SHEET_WEBHOOK_URL")]
    pub sheet_webhook_url: Option<String>,

    /// Chat-ops incoming webhook for lead alerts. Optional, best-effort.
    #[arg(long, env = "CHAT_WEBHOOK_URL")]
    pub chat_webhook_url: Option<String>,

    /// Canonical lead fields that must be non-empty after normalization.
    #[arg(long, env = "LEAD_REQUIRED_FIELDS", default_value = "fullName,businessName")]
    pub lead_required_fields: String,

    // --- TLS Args ---
    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}
