// File: src/error.rs
// Purpose: Configuration and transport error types

use thiserror::Error;

/// Errors that abort binding a form.
///
/// Validation failures are not errors; they are reported through
/// [`ValidationReport`](crate::ValidationReport).
#[derive(Debug, Error)]
pub enum H5FormError {
    #[error("H5Form: form plugin '{plugin}' is not loaded, form '{form}' was not initialized")]
    TransportMissing { form: String, plugin: String },

    #[error("H5Form: invalid form options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    #[error("H5Form: initialization of form '{form}' was dropped before it completed")]
    InitializationDropped { form: String },
}

/// Failure reported by a [`Transport`](crate::Transport) submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("form submission failed: {message}")]
pub struct TransportError {
    /// HTTP-like status, when the transport got that far.
    pub status: Option<u16>,
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_missing_message() {
        let err = H5FormError::TransportMissing {
            form: "signup".to_string(),
            plugin: "jquery-form-3.02.js".to_string(),
        };
        let text = err.to_string();
        assert!(text.starts_with("H5Form: "));
        assert!(text.contains("jquery-form-3.02.js"));
        assert!(text.contains("signup"));
    }

    #[test]
    fn test_transport_error_status() {
        let err = TransportError::with_status(500, "server error");
        assert_eq!(err.status, Some(500));
        assert_eq!(err.to_string(), "form submission failed: server error");
        assert_eq!(TransportError::new("offline").status, None);
    }
}
