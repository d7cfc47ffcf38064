// src/types/response.rs
//! Error bodies returned by the analysis service

use serde_json::Value;

/// Extracts a human readable message from an error response body.
///
/// Handles `{"detail": "..."}`, validation-style `{"detail": [{"msg": ...}]}`,
/// `{"error": "..."}` and `{"message": "..."}`; anything else falls back to
/// the trimmed body text.
pub fn error_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no response body".to_string();
    }

    serde_json::from_str::<Value>(trimmed)
        .ok()
        .and_then(|value| structured_message(&value))
        .unwrap_or_else(|| trimmed.to_string())
}

/// Returns the message of an `error` key in an otherwise successful body.
pub fn embedded_error(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::String(message) => Some(message.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn structured_message(value: &Value) -> Option<String> {
    for key in ["detail", "error", "message"] {
        match value.get(key) {
            Some(Value::String(message)) => return Some(message.clone()),
            Some(Value::Array(items)) => {
                let messages: Vec<String> = items
                    .iter()
                    .map(|item| match item.get("msg") {
                        Some(Value::String(msg)) => msg.clone(),
                        _ => item.to_string(),
                    })
                    .collect();
                if !messages.is_empty() {
                    return Some(messages.join("; "));
                }
            }
            Some(Value::Object(inner)) => {
                if let Some(Value::String(message)) = inner.get("message") {
                    return Some(message.clone());
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_variants() {
        assert_eq!(error_message(r#"{"detail": "Not Found"}"#), "Not Found");
        assert_eq!(
            error_message(r#"{"detail": [{"loc": ["body", "file"], "msg": "field required"}]}"#),
            "field required"
        );
        assert_eq!(error_message(r#"{"error": "boom"}"#), "boom");
        assert_eq!(
            error_message(r#"{"error": {"code": "X", "message": "nested"}}"#),
            "nested"
        );
        assert_eq!(error_message("Internal Server Error\n"), "Internal Server Error");
        assert_eq!(error_message("   "), "no response body");
        assert_eq!(error_message(r#"{"status": "bad"}"#), r#"{"status": "bad"}"#);
    }

    #[test]
    fn test_embedded_error() {
        assert_eq!(
            embedded_error(&json!({"error": "Unsupported file type"})),
            Some("Unsupported file type".to_string())
        );
        assert_eq!(embedded_error(&json!({"error": null})), None);
        assert_eq!(embedded_error(&json!({"skills_detected": []})), None);
        assert_eq!(embedded_error(&json!([1, 2])), None);
    }
}
