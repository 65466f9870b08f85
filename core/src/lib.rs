//! Sigil Core - ticket policy and protocol adaptation for Sigil Scrolls.
//!
//! This library holds the parts of the client with real rules in them:
//! - Ticket policy: which view limits and reply settings a ticket type allows
//! - Protocol adapter: wire schema <-> typed domain model, including the
//!   recursive reply tree
//! - Usage metrics: totals, top endpoint, activity index and distributions
//!
//! # Constraints
//!
//! This library intentionally does NOT:
//! - Access the network
//! - Encrypt or decrypt anything (content arrives decrypted from the service)
//! - Enforce view limits or expiry (the service is authoritative)
//! - Log passkeys or message content
//!
//! # Example: Draft, Validate, Map
//!
//! ```
//! use sigil_core::{adapter, TicketDraft, TicketType};
//!
//! let mut draft = TicketDraft::new(TicketType::Group);
//! draft.message_content = "meet at dawn".into();
//! draft.passkeys = vec!["mellon".into()];
//!
//! // Switching to SECURE_SINGLE pins the view limit to 1.
//! draft.set_ticket_type(TicketType::SecureSingle);
//! let request = draft.to_request().unwrap();
//! assert_eq!(request.max_views, Some(1));
//!
//! let wire = adapter::to_wire_create_request(&request);
//! assert_eq!(wire.ticket_type.as_str(), "SECURE_SINGLE");
//! assert!(!wire.allow_replies);
//! ```

#![warn(clippy::all)]

pub mod adapter;
pub mod draft;
pub mod error;
pub mod format;
pub mod metrics;
pub mod model;
pub mod policy;
pub mod ticket;
pub mod wire;

// Re-export main types at crate root
pub use draft::TicketDraft;
pub use error::{AdapterError, ValidationError};
pub use metrics::{MetricsSummary, Share, TopEndpoint};
pub use model::*;
pub use policy::{
    clamp_max_views, derive_max_views, max_views_policy, parse_max_views, policy_for,
    prepare_for_submission, replies_allowed, validate_for_submission, validate_ticket_id,
    MaxViewsPolicy, TicketPolicy,
};
pub use ticket::{EncryptionAlgo, HttpMethod, TicketNumber, TicketStatus, TicketType};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
