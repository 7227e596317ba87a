//! Failure reasons for a single retrieval step.
//!
//! Every boundary inside the retrieval pipeline returns one of these values
//! instead of panicking. The orchestrator only ever checks success or failure;
//! the variant exists for logging.

use thiserror::Error;

/// Why fetching or extracting a page did not produce article text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetrievalError {
    /// Timeout, refused connection, TLS failure, non-2xx status or an unusable URL.
    #[error("network failure: {0}")]
    Network(String),

    /// The body could not be read or a selector could not be compiled.
    #[error("parse failure: {0}")]
    Parse(String),

    /// The page parsed but held too little text to be an article.
    #[error("insufficient content: {chars} characters, need at least {floor}")]
    InsufficientContent { chars: usize, floor: usize },
}

impl RetrievalError {
    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            RetrievalError::Network("request timed out".to_string())
        } else if err.is_connect() {
            RetrievalError::Network(format!("connection failed: {err}"))
        } else if let Some(status) = err.status() {
            RetrievalError::Network(format!("HTTP {}", status.as_u16()))
        } else {
            RetrievalError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_content_message() {
        let err = RetrievalError::InsufficientContent { chars: 60, floor: 100 };
        assert_eq!(
            err.to_string(),
            "insufficient content: 60 characters, need at least 100"
        );
    }

    #[test]
    fn test_network_message() {
        let err = RetrievalError::Network("HTTP 404".to_string());
        assert_eq!(err.to_string(), "network failure: HTTP 404");
    }
}
