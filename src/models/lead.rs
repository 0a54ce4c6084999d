use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use super::resolve_field;

/// Accepted source-key spellings per canonical field, in resolution order.
/// The contact form, the chat widget and the conversational platform all
/// submit slightly different key names for the same data.
pub const FIELD_ALIASES: &[(&str, &[&str])] = &[
    ("fullName", &["fullName", "full_name", "fullname", "name"]),
    (
        "businessName",
        &["businessName", "business_name", "business", "company", "companyName"],
    ),
    (
        "preferredContact",
        &["preferredContact", "preferred_contact", "contactMethod", "contact_method"],
    ),
    (
        "phoneOrWhatsapp",
        &["phoneOrWhatsapp", "phoneOrWhatsApp", "phone_or_whatsapp", "phone", "whatsapp", "phoneNumber"],
    ),
    ("email", &["email", "emailAddress", "email_address"]),
    ("goal", &["goal", "objective"]),
    ("painPoint", &["painPoint", "pain_point"]),
    ("tools", &["tools", "currentTools"]),
    ("monthlyVolume", &["monthlyVolume", "monthly_volume", "volume"]),
    ("sourceUrl", &["sourceUrl", "source_url", "source"]),
];

static ALIASES_BY_FIELD: Lazy<HashMap<&'static str, &'static [&'static str]>> =
    Lazy::new(|| FIELD_ALIASES.iter().copied().collect());

pub fn is_canonical_field(name: &str) -> bool {
    ALIASES_BY_FIELD.contains_key(name)
}

/// A captured contact-form submission, normalized to canonical fields.
/// Unresolved fields are empty strings.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub full_name: String,
    pub business_name: String,
    pub preferred_contact: String,
    pub phone_or_whatsapp: String,
    pub email: String,
    pub goal: String,
    pub pain_point: String,
    pub tools: String,
    pub monthly_volume: String,
    pub source_url: String,
}

impl Lead {
    pub fn from_payload(payload: &Value) -> Self {
        let field = |name: &str| -> String {
            ALIASES_BY_FIELD
                .get(name)
                .and_then(|aliases| resolve_field(payload, aliases))
                .unwrap_or_default()
        };

        Self {
            full_name: field("fullName"),
            business_name: field("businessName"),
            preferred_contact: field("preferredContact"),
            phone_or_whatsapp: field("phoneOrWhatsapp"),
            email: field("email"),
            goal: field("goal"),
            pain_point: field("painPoint"),
            tools: field("tools"),
            monthly_volume: field("monthlyVolume"),
            source_url: field("sourceUrl"),
        }
    }

    /// Value of a canonical field by its wire name.
    pub fn get(&self, canonical: &str) -> Option<&str> {
        match canonical {
            "fullName" => Some(&self.full_name),
            "businessName" => Some(&self.business_name),
            "preferredContact" => Some(&self.preferred_contact),
            "phoneOrWhatsapp" => Some(&self.phone_or_whatsapp),
            "email" => Some(&self.email),
            "goal" => Some(&self.goal),
            "painPoint" => Some(&self.pain_point),
            "tools" => Some(&self.tools),
            "monthlyVolume" => Some(&self.monthly_volume),
            "sourceUrl" => Some(&self.source_url),
            _ => None,
        }
    }

    /// Canonical fields from `required` that are still empty after
    /// normalization. An unknown name counts as missing rather than
    /// silently passing.
    pub fn missing_fields(&self, required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|name| self.get(name).map(str::is_empty).unwrap_or(true))
            .cloned()
            .collect()
    }
}
