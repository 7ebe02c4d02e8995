// SPDX-License-Identifier: GPL-3.0-only

/// Errors produced by the dexview core
#[derive(Debug, thiserror::Error)]
pub enum DexError {
    /// Malformed parameters, rejected before any network call
    #[error("Invalid parameters: {}", .0.join(", "))]
    InvalidInput(Vec<String>),

    /// The upstream answered, but not with something we can read
    #[error("Invalid server response: {0}")]
    InvalidPayload(String),

    #[error("HTTP error! status: {status} ({url})")]
    Status { status: u16, url: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("RON serialization error: {0}")]
    RonWrite(#[from] ron::Error),

    #[error("The request was cancelled")]
    Cancelled,
}

impl DexError {
    /// Shorthand for a single-message [`DexError::InvalidInput`]
    pub fn invalid(message: impl Into<String>) -> Self {
        DexError::InvalidInput(vec![message.into()])
    }

    /// True for the errors that are detected locally, without a network call
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, DexError::InvalidInput(_))
    }
}

pub type DexResult<T> = Result<T, DexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_lists_every_message() {
        let err = DexError::InvalidInput(vec!["first".into(), "second".into()]);
        assert_eq!(err.to_string(), "Invalid parameters: first, second");
        assert!(err.is_invalid_input());
    }

    #[test]
    fn status_error_is_not_invalid_input() {
        let err = DexError::Status {
            status: 404,
            url: "https://pokeapi.co/api/v2/pokemon/0".into(),
        };
        assert!(!err.is_invalid_input());
        assert!(err.to_string().contains("404"));
    }
}
