//! Shared helpers for decoding loosely-shaped provider responses.
//!
//! Providers in this class disagree on field names and frequently
//! return partial or empty bodies mid-generation. These helpers encode
//! the two policies every integration shares:
//!
//! - result-location fields are tried in a fixed, per-provider priority
//!   order (first non-empty wins), never inferred at runtime;
//! - an empty or unrecognized state is `Pending`, not `Failed`.

use serde_json::Value;

/// Coarse task state extracted from a status payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawState {
    Pending,
    Succeeded,
    Failed,
}

/// States providers use to mean "still working".
const PENDING_STATES: &[&str] = &["pending", "queued", "processing", "running", "in_progress"];

/// States providers use to mean "done".
const SUCCEEDED_STATES: &[&str] = &["succeeded", "success", "completed", "done", "finished"];

/// States providers use to mean "gave up".
const FAILED_STATES: &[&str] = &["failed", "error", "cancelled", "rejected"];

/// Classify the `status`/`state` field of a status payload.
///
/// A missing field, empty string, or unrecognized value is `Pending`.
pub fn classify_state(payload: &Value) -> RawState {
    let state = payload
        .get("status")
        .or_else(|| payload.get("state"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_ascii_lowercase();

    if SUCCEEDED_STATES.contains(&state.as_str()) {
        RawState::Succeeded
    } else if FAILED_STATES.contains(&state.as_str()) {
        RawState::Failed
    } else {
        if !state.is_empty() && !PENDING_STATES.contains(&state.as_str()) {
            tracing::debug!(state = %state, "Unrecognized provider state treated as pending");
        }
        RawState::Pending
    }
}

/// First non-empty string value among `fields`, in order.
pub fn first_nonempty_str<'a>(payload: &'a Value, fields: &[&str]) -> Option<&'a str> {
    fields
        .iter()
        .filter_map(|field| payload.get(field).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

/// Collect result URLs from a payload.
///
/// Accepts either a single string in one of the priority `fields`, or
/// an array of strings / objects (with the same priority fields) under
/// a list field such as `outputs` or `images`.
pub fn collect_urls(payload: &Value, fields: &[&str], list_fields: &[&str]) -> Vec<String> {
    let mut urls = Vec::new();

    for list_field in list_fields {
        if let Some(items) = payload.get(list_field).and_then(Value::as_array) {
            for item in items {
                match item {
                    Value::String(s) if !s.is_empty() => urls.push(s.clone()),
                    Value::Object(_) => {
                        if let Some(url) = first_nonempty_str(item, fields) {
                            urls.push(url.to_string());
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    if urls.is_empty() {
        if let Some(url) = first_nonempty_str(payload, fields) {
            urls.push(url.to_string());
        }
    }

    urls
}

/// Error detail from a failed status payload, falling back to a
/// generic message when the provider gave none.
pub fn error_message(payload: &Value) -> String {
    first_nonempty_str(payload, &["error", "message", "detail"])
        .unwrap_or("provider reported failure without detail")
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_states_classified() {
        assert_eq!(classify_state(&json!({"status": "queued"})), RawState::Pending);
        assert_eq!(
            classify_state(&json!({"status": "SUCCEEDED"})),
            RawState::Succeeded
        );
        assert_eq!(classify_state(&json!({"state": "failed"})), RawState::Failed);
    }

    #[test]
    fn empty_or_unknown_state_is_pending() {
        assert_eq!(classify_state(&json!({})), RawState::Pending);
        assert_eq!(classify_state(&json!({"status": ""})), RawState::Pending);
        assert_eq!(
            classify_state(&json!({"status": "warming_up"})),
            RawState::Pending
        );
        assert_eq!(classify_state(&json!(null)), RawState::Pending);
    }

    #[test]
    fn field_priority_order_respected() {
        let payload = json!({"url": "https://b", "result": "https://a"});
        // "result" outranks "url" in this priority list.
        assert_eq!(
            first_nonempty_str(&payload, &["result", "url"]),
            Some("https://a")
        );
        // Empty values are skipped, not selected.
        let payload = json!({"result": "", "url": "https://b"});
        assert_eq!(
            first_nonempty_str(&payload, &["result", "url"]),
            Some("https://b")
        );
    }

    #[test]
    fn collect_urls_from_object_list() {
        let payload = json!({
            "outputs": [
                {"url": "https://one"},
                {"image_url": "https://two"},
                "https://three",
            ]
        });
        let urls = collect_urls(&payload, &["image_url", "url"], &["outputs"]);
        assert_eq!(urls, vec!["https://one", "https://two", "https://three"]);
    }

    #[test]
    fn collect_urls_falls_back_to_scalar_field() {
        let payload = json!({"video_url": "https://hosted/video.mp4"});
        let urls = collect_urls(&payload, &["video_url", "url"], &["outputs"]);
        assert_eq!(urls, vec!["https://hosted/video.mp4"]);
    }

    #[test]
    fn error_message_fallback() {
        assert_eq!(error_message(&json!({"error": "quota exceeded"})), "quota exceeded");
        assert_eq!(
            error_message(&json!({})),
            "provider reported failure without detail"
        );
    }
}
