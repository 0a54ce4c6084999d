pub mod chat;
pub mod lead;

use serde_json::Value;

/// Resolves a canonical field by checking an ordered list of accepted source
/// keys and taking the first non-empty trimmed value. Numbers are accepted
/// and stringified (phone numbers often arrive unquoted).
pub fn resolve_field(payload: &Value, aliases: &[&str]) -> Option<String> {
    let obj = payload.as_object()?;
    for key in aliases {
        let resolved = match obj.get(*key) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => continue,
        };
        if !resolved.is_empty() {
            return Some(resolved);
        }
    }
    None
}

/// Top-level keys actually present in a request body. Reported back to the
/// caller on validation failure so the front end can see what it sent.
pub fn received_keys(payload: &Value) -> Vec<String> {
    payload
        .as_object()
        .map(|obj| obj.keys().cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolve_takes_first_non_empty_alias() {
        let payload = json!({ "phone": "", "whatsapp": "  +49 151 000  " });
        let value = resolve_field(&payload, &["phoneOrWhatsapp", "phone", "whatsapp"]);
        assert_eq!(value, Some("+49 151 000".to_string()));
    }

    #[test]
    fn resolve_respects_alias_order() {
        let payload = json!({ "phone": "first", "whatsapp": "second" });
        let value = resolve_field(&payload, &["phone", "whatsapp"]);
        assert_eq!(value, Some("first".to_string()));
    }

    #[test]
    fn resolve_stringifies_numbers() {
        let payload = json!({ "phone": 4915100 });
        let value = resolve_field(&payload, &["phone"]);
        assert_eq!(value, Some("4915100".to_string()));
    }

    #[test]
    fn resolve_returns_none_for_non_objects() {
        assert_eq!(resolve_field(&json!("just a string"), &["phone"]), None);
        assert_eq!(resolve_field(&json!(null), &["phone"]), None);
    }

    #[test]
    fn received_keys_lists_payload_keys() {
        let payload = json!({ "name": "A", "company": "B" });
        let mut keys = received_keys(&payload);
        keys.sort();
        assert_eq!(keys, vec!["company", "name"]);
    }
}
