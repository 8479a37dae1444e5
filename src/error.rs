//! Error taxonomy for API calls.
//!
//! Classified by how the caller must react:
//! - `Transport`: no response received — generic connectivity message.
//! - `Unauthorized`: handled globally by session teardown, never inline.
//! - `Validation`: per-field messages, surfaced in the originating form.
//! - `NotFound`: page-level "failed to load" state.
//! - `Server`: generic failure, retryable for idempotent reads only.
//!
//! All payloads are owned strings so the type is `Clone` — cached fetch
//! results are fanned out to every waiter on a key.

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Validation failed")]
    Validation {
        /// Per-field messages, keyed by field name.
        fields: BTreeMap<String, Vec<String>>,
        /// Whole-form message when the server sent one.
        detail: Option<String>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Partial shape of a structured error body from the backend.
///
/// Django REST conventions: `{"detail": "..."}` for whole-request errors,
/// `{"errors": {"field": ["msg"]}}` or a bare field map for validation.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ApiError {
    /// Map an HTTP status and response body to an error.
    ///
    /// Pure so the mapping is testable without a network. 2xx statuses are
    /// never passed here.
    pub fn from_response_parts(status: u16, body: &str) -> Self {
        if status == 401 {
            return ApiError::Unauthorized;
        }

        let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();

        if status == 404 {
            let message = parsed
                .as_ref()
                .and_then(|b| b.detail.clone())
                .unwrap_or_else(|| "Not found".to_string());
            return ApiError::NotFound(message);
        }

        // Throttling and request timeouts are server-side conditions a
        // retry can clear, not validation failures.
        if status == 429 || status == 408 {
            let message = parsed
                .and_then(|b| b.detail.or(b.error).or(b.message))
                .unwrap_or_else(|| truncate(body, 200));
            return ApiError::Server { status, message };
        }

        if (400..500).contains(&status) {
            // Validation bodies come in two shapes: {"errors": {field: [..]}}
            // and a bare {field: [..]} map.
            let fields = parsed
                .as_ref()
                .and_then(|b| b.errors.clone())
                .or_else(|| bare_field_map(body))
                .unwrap_or_default();
            let detail = parsed.as_ref().and_then(|b| {
                b.error.clone().or_else(|| b.detail.clone()).or_else(|| b.message.clone())
            });
            return ApiError::Validation { fields, detail };
        }

        let message = parsed
            .and_then(|b| b.detail.or(b.error).or(b.message))
            .unwrap_or_else(|| truncate(body, 200));
        ApiError::Server { status, message }
    }

    /// True when a retry could help. Applies to idempotent GETs only; the
    /// HTTP layer never retries mutations.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Server { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            _ => false,
        }
    }

    /// Display string for the user, by error class.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => "Network error - cannot reach server".to_string(),
            ApiError::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            ApiError::Validation { detail, fields } => detail.clone().unwrap_or_else(|| {
                if fields.is_empty() {
                    "Please check the submitted values.".to_string()
                } else {
                    "Some fields need attention.".to_string()
                }
            }),
            ApiError::NotFound(_) => "The requested record could not be found.".to_string(),
            ApiError::Server { .. } => "Something went wrong on the server. Try again.".to_string(),
            ApiError::Decode(_) => "Received an unexpected response from the server.".to_string(),
        }
    }

    /// Per-field validation messages, empty for non-validation errors.
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        match self {
            ApiError::Validation { fields, .. } => fields.clone(),
            _ => BTreeMap::new(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Try the bare `{"field": ["msg", ...]}` validation shape.
fn bare_field_map(body: &str) -> Option<BTreeMap<String, Vec<String>>> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let obj = value.as_object()?;
    let mut fields = BTreeMap::new();
    for (key, val) in obj {
        // Skip the envelope keys handled by ErrorBody.
        if matches!(key.as_str(), "detail" | "error" | "message" | "errors") {
            continue;
        }
        match val {
            serde_json::Value::Array(items) => {
                let msgs: Vec<String> = items
                    .iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect();
                if !msgs.is_empty() {
                    fields.insert(key.clone(), msgs);
                }
            }
            serde_json::Value::String(s) => {
                fields.insert(key.clone(), vec![s.clone()]);
            }
            _ => {}
        }
    }
    if fields.is_empty() {
        None
    } else {
        Some(fields)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_401_maps_to_unauthorized() {
        let err = ApiError::from_response_parts(401, r#"{"detail": "Invalid token."}"#);
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn status_404_carries_detail() {
        let err = ApiError::from_response_parts(404, r#"{"detail": "Not found."}"#);
        match err {
            ApiError::NotFound(msg) => assert_eq!(msg, "Not found."),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn validation_errors_envelope_shape() {
        let body = r#"{"errors": {"email": ["This field is required."], "name": ["Too long."]}}"#;
        let err = ApiError::from_response_parts(400, body);
        let fields = err.field_errors();
        assert_eq!(fields["email"], vec!["This field is required."]);
        assert_eq!(fields["name"], vec!["Too long."]);
    }

    #[test]
    fn validation_errors_bare_field_map() {
        let body = r#"{"email": ["Enter a valid email address."]}"#;
        let err = ApiError::from_response_parts(400, body);
        assert_eq!(
            err.field_errors()["email"],
            vec!["Enter a valid email address."]
        );
    }

    #[test]
    fn validation_detail_prefers_error_field() {
        let body = r#"{"error": "Invalid credentials", "detail": "secondary"}"#;
        let err = ApiError::from_response_parts(400, body);
        match err {
            ApiError::Validation { detail, .. } => {
                assert_eq!(detail.as_deref(), Some("Invalid credentials"))
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn server_errors_are_retryable_client_errors_are_not() {
        let server = ApiError::from_response_parts(503, "upstream down");
        assert!(server.is_retryable());

        let rate_limited = ApiError::from_response_parts(429, "slow down");
        assert!(rate_limited.is_retryable());

        let validation = ApiError::from_response_parts(400, r#"{"name": ["bad"]}"#);
        assert!(!validation.is_retryable());

        let missing = ApiError::from_response_parts(404, "{}");
        assert!(!missing.is_retryable());

        assert!(ApiError::Transport("timed out".into()).is_retryable());
        assert!(!ApiError::Unauthorized.is_retryable());
    }

    #[test]
    fn non_json_5xx_body_is_truncated_into_message() {
        let body = "x".repeat(500);
        let err = ApiError::from_response_parts(500, &body);
        match err {
            ApiError::Server { status, message } => {
                assert_eq!(status, 500);
                assert!(message.len() < 250);
            }
            other => panic!("expected Server, got {:?}", other),
        }
    }
}
