use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Uniform outcome of a server-facing action.
///
/// Actions never hand errors to the UI; they report `success = false` and a
/// human-readable `message` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ActionResult<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    /// Converts a result, prefixing failures with `context`.
    pub fn from_result<E: Display>(
        result: Result<T, E>,
        success_message: impl Into<String>,
        context: &str,
    ) -> Self {
        match result {
            Ok(data) => Self::ok(success_message, data),
            Err(e) if context.is_empty() => Self::failed(e.to_string()),
            Err(e) => Self::failed(format!("{}: {}", context, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_result() {
        let ok: ActionResult<u32> = ActionResult::from_result(Ok::<_, String>(3), "done", "ignored");
        assert!(ok.success);
        assert_eq!(ok.data, Some(3));

        let err: ActionResult<u32> =
            ActionResult::from_result(Err("HTTP 500".to_string()), "done", "Failed to delete products");
        assert!(!err.success);
        assert_eq!(err.message, "Failed to delete products: HTTP 500");
        assert_eq!(err.data, None);
    }
}
