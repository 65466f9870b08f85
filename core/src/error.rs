//! Error types for sigil-core.
//!
//! # Error Categories
//!
//! - **Validation errors** ([`ValidationError`]): raised before a request is
//!   built. A request that fails validation never reaches the network.
//! - **Adapter errors** ([`AdapterError`]): a wire payload did not match the
//!   documented shape. Surfaced to users as a generic "unexpected response".

use crate::ticket::TicketType;

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Pre-flight validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// GROUP and BROADCAST tickets need an explicit view limit.
    #[error("max_views is required for ticket type {0}")]
    MissingMaxViews(TicketType),

    /// A Required view limit outside `[1, 1_000_000_000]`.
    #[error("max_views must be between 1 and 1000000000, got {0}")]
    MaxViewsOutOfRange(u32),

    /// A Fixed-policy ticket carrying a view limit other than the fixed one.
    #[error("ticket type {ticket_type} requires max_views = {expected}")]
    MaxViewsMismatch {
        ticket_type: TicketType,
        expected: u32,
        found: Option<u32>,
    },

    /// `allow_replies` disagrees with the ticket type.
    #[error("ticket type {ticket_type} requires allow_replies = {expected}")]
    RepliesPolicyMismatch {
        ticket_type: TicketType,
        expected: bool,
    },

    /// Passkey list length outside `[1, 10]`.
    #[error("between 1 and 10 passkeys are required, got {count}")]
    PasskeyCountOutOfRange { count: usize },

    /// A passkey that is blank after trimming. `position` is 1-based.
    #[error("passkey {position} is empty")]
    EmptyPasskey { position: usize },

    /// Ticket ID is not a UUID.
    #[error("invalid ticket ID format, expected e.g. 105d1e8f-cec3-44d8-a262-9655d4feb307")]
    InvalidTicketIdFormat,
}

/// A wire payload that could not be mapped into the domain model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    /// A required field was absent or null.
    #[error("malformed response: missing field `{0}`")]
    MissingField(&'static str),

    /// A field was present but its value could not be interpreted.
    #[error("malformed response: field `{field}` {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// The conversation tree is nested deeper than the accepted limit.
    #[error("malformed response: conversation nested deeper than {limit} levels")]
    ConversationTooDeep { limit: usize },

    /// The body was not the expected JSON document at all.
    #[error("malformed response: {0}")]
    Undecodable(String),
}

impl AdapterError {
    pub(crate) fn invalid(field: &'static str, reason: impl ToString) -> Self {
        AdapterError::InvalidField {
            field,
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Undecodable(err.to_string())
    }
}
