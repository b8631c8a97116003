//! Error types for hash cracking operations

use thiserror::Error;

/// Errors that can occur while submitting, searching or collecting results
#[derive(Debug, Error)]
pub enum CrackError {
    /// Bad submit input, rejected before any state is created
    #[error("Validation error: {0}")]
    Validation(String),

    /// Search space does not fit in a u64
    #[error("Search space overflow: alphabet of {alphabet_size} symbols up to length {max_length}")]
    Overflow { alphabet_size: usize, max_length: usize },

    /// Unknown request id
    #[error("Request not found: {0}")]
    NotFound(String),

    /// Rank outside the enumerable space
    #[error("Index {index} goes beyond the acceptable limits (total {total})")]
    IndexOutOfRange { index: u64, total: u64 },

    /// A share could not be delivered to a worker
    #[error("Dispatch to worker {worker} failed: {message}")]
    Dispatch { worker: String, message: String },

    /// A peer answered with an unexpected HTTP status
    #[error("Peer returned status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Channel error")]
    Channel,
}

impl CrackError {
    /// Check if this is an unknown-request error
    pub fn is_not_found(&self) -> bool {
        matches!(self, CrackError::NotFound(_))
    }

    /// Check if the caller supplied bad input
    pub fn is_client_error(&self) -> bool {
        matches!(self, CrackError::Validation(_) | CrackError::Overflow { .. })
    }
}

/// Result alias for hash cracking operations
pub type CrackResult<T> = Result<T, CrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        assert!(CrackError::NotFound("abc".to_string()).is_not_found());
        assert!(!CrackError::Validation("bad".to_string()).is_not_found());
        assert!(!CrackError::Channel.is_not_found());
    }

    #[test]
    fn test_is_client_error() {
        assert!(CrackError::Validation("maxLength must be positive".to_string()).is_client_error());
        assert!(
            CrackError::Overflow {
                alphabet_size: 36,
                max_length: 13
            }
            .is_client_error()
        );
        assert!(!CrackError::NotFound("x".to_string()).is_client_error());
        assert!(!CrackError::IndexOutOfRange { index: 6, total: 6 }.is_client_error());
    }

    #[test]
    fn test_display_messages() {
        let err = CrackError::IndexOutOfRange { index: 10, total: 6 };
        assert_eq!(err.to_string(), "Index 10 goes beyond the acceptable limits (total 6)");

        let err = CrackError::Dispatch {
            worker: "http://worker1:8081".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Dispatch to worker http://worker1:8081 failed: connection refused"
        );
    }
}
