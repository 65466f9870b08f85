//! Error taxonomy of the service client.
//!
//! Every operation returns `Result<T, ClientError>`; nothing is retried and
//! every failure surfaces exactly once.

use sigil_core::{AdapterError, ValidationError};
use std::fmt;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Use case an error belongs to, for messages and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateTicket,
    ViewTicket,
    PostReply,
    DeleteTicket,
    FetchMetrics,
}

impl Operation {
    /// "viewing ticket", as used in "network error while viewing ticket".
    pub fn in_progress(self) -> &'static str {
        match self {
            Operation::CreateTicket => "creating ticket",
            Operation::ViewTicket => "viewing ticket",
            Operation::PostReply => "posting reply",
            Operation::DeleteTicket => "deleting ticket",
            Operation::FetchMetrics => "fetching API usage metrics",
        }
    }

    /// Message used when the service gave no reason of its own.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::CreateTicket => "Failed to create ticket",
            Operation::ViewTicket => "Failed to view ticket",
            Operation::PostReply => "Failed to post reply",
            Operation::DeleteTicket => "Failed to delete ticket",
            Operation::FetchMetrics => "Failed to fetch API usage metrics",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.in_progress())
    }
}

/// Client errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Rejected locally; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The service answered with a body that does not match the protocol.
    #[error("unexpected response from server")]
    MalformedResponse(#[from] AdapterError),

    /// The service answered with a non-success status.
    #[error("{message}")]
    Service {
        operation: Operation,
        status: u16,
        message: String,
    },

    /// No response was received.
    #[error("network error while {operation}")]
    Network {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    /// The configured service URL cannot be used.
    #[error("invalid service URL `{0}`")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed.
    #[error("failed to initialise HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl ClientError {
    /// HTTP status of a service error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the request never left the client.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::Validation(_) | ClientError::InvalidUrl(_) | ClientError::HttpClient(_)
        )
    }
}
