//! Error taxonomy of the dashboard.
//!
//! Every gateway call returns `Result<_, ApiError>`; action wrappers turn it
//! into `contracts::shared::ActionResult` before it reaches a component.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Failed to send request: {0}")]
    Network(String),

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Missing required fields: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Export timed out after {seconds} seconds. Too much data, try exporting fewer products")]
    ExportTimeout { seconds: u64 },

    #[error("Export failed: {0}")]
    Export(String),
}

impl ApiError {
    /// Builds an HTTP error from a non-2xx response body.
    ///
    /// Server-provided `message`, `error` or `detail` fields win; otherwise
    /// the message names `context` and the status code.
    pub fn http(status: u16, body: &str, context: &str) -> Self {
        let message = extract_server_message(body)
            .unwrap_or_else(|| format!("{}: HTTP {}", context, status));
        ApiError::Http { status, message }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::ExportTimeout { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(e: gloo_net::Error) -> Self {
        match e {
            gloo_net::Error::SerdeError(e) => ApiError::Parse(e.to_string()),
            other => ApiError::Network(other.to_string()),
        }
    }
}

/// Picks a human-readable message out of an error body.
pub fn extract_server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error", "detail"].iter().find_map(|key| {
        match value.get(*key)? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            serde_json::Value::Null | serde_json::Value::String(_) => None,
            // serializer errors arrive as objects keyed by field
            other => Some(other.to_string()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_precedence() {
        let body = r#"{"error": "second", "message": "first", "detail": "third"}"#;
        assert_eq!(extract_server_message(body).as_deref(), Some("first"));

        let body = r#"{"error": "Product with ID 9 not found"}"#;
        assert_eq!(
            extract_server_message(body).as_deref(),
            Some("Product with ID 9 not found")
        );

        let body = r#"{"message": "", "detail": "Authentication credentials were not provided."}"#;
        assert_eq!(
            extract_server_message(body).as_deref(),
            Some("Authentication credentials were not provided.")
        );
    }

    #[test]
    fn test_structured_message_is_serialized() {
        let body = r#"{"message": {"so_number": ["This field is required."]}}"#;
        let msg = extract_server_message(body).unwrap();
        assert!(msg.contains("so_number"));
    }

    #[test]
    fn test_generic_message_names_status() {
        let err = ApiError::http(502, "<html>Bad gateway</html>", "Failed to update status");
        assert_eq!(err.to_string(), "Failed to update status: HTTP 502");
        assert_eq!(err.status(), Some(502));
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_validation_and_timeout_display() {
        let err = ApiError::Validation(vec!["so_number".into(), "date".into()]);
        assert_eq!(err.to_string(), "Missing required fields: so_number, date");

        let err = ApiError::ExportTimeout { seconds: 120 };
        assert!(err.is_timeout());
        assert!(err.to_string().contains("120 seconds"));
    }
}
