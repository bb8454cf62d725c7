//! Config redaction: produce safe-to-log config snapshots by masking secrets.

use serde_json::Value;

use crate::schema::DefectScanConfig;

/// Keys whose string values are masked.
static SENSITIVE_KEYS: &[&str] = &[
    "apiKey",
    "api_key",
    "token",
    "secret",
    "password",
];

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// Mask a secret, keeping a four-character hint (`AIza***`).
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() > 8 {
        format!("{}***", secret.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    }
}

/// Redact a JSON value, masking every sensitive field.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if is_sensitive_key(key) && !s.is_empty() => {
            Value::String(mask_secret(s))
        }
        Value::Array(arr) => {
            Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect())
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}

impl DefectScanConfig {
    /// Config snapshot with the API key masked.
    pub fn redacted(&self) -> Value {
        redact(&serde_json::to_value(self).unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_api_key() {
        let config = DefectScanConfig {
            api_key: Some("AIzaSyD-abcdefghijklmnop".into()),
            ..DefectScanConfig::default()
        };
        let redacted = config.redacted();
        assert_eq!(redacted["apiKey"], "AIza***");
        assert!(!redacted.to_string().contains("abcdefghijklmnop"));
    }

    #[test]
    fn short_secrets_fully_masked() {
        assert_eq!(mask_secret("abc"), "***");
    }

    #[test]
    fn passthrough_non_sensitive() {
        let v = json!({ "model": "gemini-2.0-flash", "apiKey": null });
        let redacted = redact(&v);
        assert_eq!(redacted["model"], "gemini-2.0-flash");
        assert!(redacted["apiKey"].is_null());
    }
}
