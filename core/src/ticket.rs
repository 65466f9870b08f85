//! Closed enumerations shared by the wire schema and the domain model.
//!
//! Every enum serializes to the exact upper-case token the service uses
//! (`SECURE_SINGLE`, `AES_256`, `VIEW_LIMIT_REACHED`, ...). Parsing from a
//! raw string goes through [`FromStr`] so the adapter can report the
//! offending field when the service sends something unexpected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string is not a known token of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    /// Enumeration being parsed ("ticket type", "HTTP method", ...).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire token for this variant.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// Ticket type. Chosen once at creation; drives the ticket policy.
    TicketType, "ticket type" {
        /// Single recipient, five views.
        Single => "SINGLE",
        /// Single recipient, one view.
        SecureSingle => "SECURE_SINGLE",
        /// Open-ended threaded conversation.
        Thread => "THREAD",
        /// One-to-many announcement.
        Broadcast => "BROADCAST",
        /// Group conversation with replies.
        Group => "GROUP",
    }
}

wire_enum! {
    /// Encryption algorithm requested for a ticket. The service encrypts;
    /// the client only names the algorithm.
    EncryptionAlgo, "encryption algorithm" {
        Aes256 => "AES_256",
        ChaCha20 => "CHACHA20",
        Twofish => "TWOFISH",
    }
}

wire_enum! {
    /// Lifecycle status reported by the service.
    TicketStatus, "ticket status" {
        Open => "OPEN",
        Expired => "EXPIRED",
        Closed => "CLOSED",
        ViewLimitReached => "VIEW_LIMIT_REACHED",
        Revoked => "REVOKED",
    }
}

wire_enum! {
    /// HTTP method recorded in usage metrics.
    HttpMethod, "HTTP method" {
        Get => "GET",
        Post => "POST",
        Put => "PUT",
        Patch => "PATCH",
        Delete => "DELETE",
    }
}

impl TicketType {
    /// Prefix the service puts in front of ticket numbers of this type.
    pub fn ticket_prefix(self) -> &'static str {
        match self {
            TicketType::Single => "SGL-",
            TicketType::SecureSingle => "SSL-",
            TicketType::Thread => "THD-",
            TicketType::Broadcast => "BRC-",
            TicketType::Group => "GRP-",
        }
    }

    /// Human-readable label ("secure single").
    pub fn label(self) -> String {
        self.as_str().to_lowercase().replace('_', " ")
    }
}

impl TicketStatus {
    /// Human-readable label ("VIEW LIMIT REACHED").
    pub fn label(self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Whether the ticket can still be read.
    pub fn is_open(self) -> bool {
        self == TicketStatus::Open
    }
}

/// Human-facing ticket identifier, `<PREFIX>-<opaque>`.
///
/// The opaque part is never interpreted. Numbers with an unknown prefix are
/// kept as-is; the service is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketNumber(String);

impl TicketNumber {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ticket type encoded in the prefix, if recognised.
    pub fn ticket_type(&self) -> Option<TicketType> {
        TicketType::ALL
            .iter()
            .copied()
            .find(|t| self.0.starts_with(t.ticket_prefix()))
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TicketNumber {
    fn from(value: &str) -> Self {
        Self::new(value.trim())
    }
}

impl From<String> for TicketNumber {
    fn from(value: String) -> Self {
        Self::new(value.trim())
    }
}
