use thiserror::Error;

/// Fallback shown when a failed upload carries no server detail.
pub const UPLOAD_FALLBACK: &str = "Failed to process file";
/// Fallback shown when a failed generation carries no server detail.
pub const GENERATION_FALLBACK: &str = "Generation failed";

#[derive(Debug, Error)]
pub enum RtlForgeError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid file: {0}")]
    InvalidFile(String),

    #[error("Request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    #[error("Server returned {status}{}", detail_suffix(.detail))]
    Server { status: u16, detail: Option<String> },

    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("No specification has been uploaded yet")]
    MissingSpecification,

    #[error("Generation already in progress")]
    GenerationInProgress,

    #[error("The specification changed during generation; generate again")]
    SpecificationChanged,

    #[error("Nothing to export: {0}")]
    NothingToExport(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RtlForgeError {
    /// Human-readable message for the UI.
    ///
    /// Server errors show the server-provided detail, or `fallback` when the
    /// body had none. Local errors are already phrased for the user.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            RtlForgeError::Server {
                detail: Some(detail),
                ..
            } => detail.clone(),
            RtlForgeError::Server { detail: None, .. }
            | RtlForgeError::Transport { .. }
            | RtlForgeError::Decode { .. } => fallback.to_string(),
            other => other.to_string(),
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_ref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}

impl From<RtlForgeError> for String {
    fn from(err: RtlForgeError) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_detail_is_user_message() {
        let err = RtlForgeError::Server {
            status: 400,
            detail: Some("Unsupported file type".to_string()),
        };
        assert_eq!(err.user_message(UPLOAD_FALLBACK), "Unsupported file type");
        assert_eq!(err.to_string(), "Server returned 400: Unsupported file type");
    }

    #[test]
    fn test_missing_detail_falls_back() {
        let err = RtlForgeError::Server {
            status: 500,
            detail: None,
        };
        assert_eq!(err.user_message(UPLOAD_FALLBACK), "Failed to process file");
        assert_eq!(err.to_string(), "Server returned 500");

        let err = RtlForgeError::Transport {
            endpoint: "upload-spec".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(err.user_message(UPLOAD_FALLBACK), "Failed to process file");
    }

    #[test]
    fn test_local_errors_keep_their_text() {
        let err = RtlForgeError::InvalidFile("unsupported extension '.exe'".to_string());
        assert_eq!(
            err.user_message(UPLOAD_FALLBACK),
            "Invalid file: unsupported extension '.exe'"
        );
        assert_eq!(
            RtlForgeError::GenerationInProgress.user_message(GENERATION_FALLBACK),
            "Generation already in progress"
        );
    }
}
