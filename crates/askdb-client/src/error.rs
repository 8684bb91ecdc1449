//! Error types for backend communication.
//!
//! Every failure a caller can see is one of three kinds: the request never
//! produced a usable response (`Unreachable`, `Decode`), or the service
//! answered with an HTTP error status (`Status`). The conversation engine
//! picks its user-facing reaction off this classification.

use askdb_core::AskdbError;
use thiserror::Error;

/// Failure talking to the answering service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No HTTP response arrived: refused connection, DNS failure, reset,
    /// or timeout.
    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// The service answered with a non-success HTTP status. `message` holds
    /// the remote's own words where the body provided any.
    #[error("server returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// A response arrived but its body was not the JSON we expected. Treated
    /// like a transport failure downstream, since no usable reply exists.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ClientError {
    /// True when no response reached us at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ClientError::Unreachable(_))
    }

    /// True for HTTP 5xx answers.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ClientError::Status { status, .. } if *status >= 500)
    }

    /// True for HTTP 4xx answers.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ClientError::Status { status, .. } if (400..500).contains(status))
    }

    /// HTTP status code, when the service produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Unreachable(err.to_string())
        }
    }
}

impl From<ClientError> for AskdbError {
    fn from(err: ClientError) -> Self {
        AskdbError::Backend(err.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
