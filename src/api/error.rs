use thiserror::Error;

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Failure surface of the backend API: either the server answered with a
/// non-success status, or the request never completed.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// Text shown in the failure toast: the server's message when it sent
    /// one, otherwise a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
