//! Domain model used throughout the client.
//!
//! These types are what callers work with. They are produced and consumed
//! by [`crate::adapter`]; nothing here knows about wire field names.
//! Serialization (used for `--json` output) follows the camelCase naming of
//! the domain model, not the snake_case of the wire.

use crate::ticket::{EncryptionAlgo, HttpMethod, TicketNumber, TicketStatus, TicketType};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Timestamp as used by the domain model.
pub type Timestamp = DateTime<Utc>;

/// Reply identifier (server-assigned, opaque).
pub type ReplyId = String;

/// Request to create a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCreationRequest {
    pub message_content: String,
    pub encryption_algo: EncryptionAlgo,
    /// Plaintext passkeys, in unlock order.
    pub passkeys: Vec<String>,
    pub salt: Option<String>,
    pub expires_at: Option<Timestamp>,
    pub open_from: Option<Timestamp>,
    pub open_until: Option<Timestamp>,
    pub ticket_type: TicketType,
    pub max_views: Option<u32>,
    pub allow_replies: bool,
}

/// Passkey echoed back once at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedPasskey {
    /// 1-based position in the unlock sequence.
    pub order: u32,
    /// Plaintext value; only ever present in the creation response.
    pub value: Option<String>,
    pub hash: Option<String>,
}

/// Ticket as returned by the service after creation. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCreationResponse {
    pub ticket_id: Uuid,
    pub ticket_number: TicketNumber,
    pub created_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub open_from: Option<Timestamp>,
    pub open_until: Option<Timestamp>,
    pub encryption_algo: EncryptionAlgo,
    pub salt: Option<String>,
    pub passkeys: Vec<IssuedPasskey>,
    pub ticket_type: TicketType,
    pub allow_replies: bool,
    pub ticket_status: TicketStatus,
    pub count_views: Option<u64>,
}

/// One passkey of a view or reply request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasskeyEntry {
    /// 1-based; must match the position used at creation.
    pub order: u32,
    pub value: String,
}

impl PasskeyEntry {
    /// Number raw passkeys 1..n, dropping blank entries and trimming the rest.
    pub fn sequence<I, S>(raw: I) -> Vec<PasskeyEntry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter()
            .filter_map(|s| {
                let trimmed = s.as_ref().trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .zip(1u32..)
            .map(|(value, order)| PasskeyEntry { order, value })
            .collect()
    }
}

/// Request to view a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedViewRequest {
    pub ticket_number: TicketNumber,
    pub passkeys: Vec<PasskeyEntry>,
}

impl UnifiedViewRequest {
    /// Build a view request from raw user input.
    pub fn from_raw_passkeys<I, S>(ticket_number: impl Into<TicketNumber>, passkeys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            ticket_number: ticket_number.into(),
            passkeys: PasskeyEntry::sequence(passkeys),
        }
    }
}

/// One reply in a ticket's conversation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationNode {
    pub reply_id: ReplyId,
    pub decrypted_content: String,
    pub created_at: Timestamp,
    pub replies: Vec<ConversationNode>,
}

impl ConversationNode {
    /// Depth of the subtree rooted here (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.replies.iter().map(|child| (child, level + 1)));
        }
        deepest
    }

    /// Total number of nodes in the subtree rooted here.
    pub fn count(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.replies.iter());
        }
        total
    }

    /// Depth-first search for a reply by id, in sibling order.
    pub fn find(&self, reply_id: &str) -> Option<&ConversationNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.reply_id == reply_id {
                return Some(node);
            }
            stack.extend(node.replies.iter().rev());
        }
        None
    }
}

/// Ticket as seen by a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewTicketResponse {
    pub ticket_number: TicketNumber,
    /// Absent when access was denied or the ticket expired.
    pub decrypted_content: Option<String>,
    pub open_from: Option<Timestamp>,
    pub open_until: Option<Timestamp>,
    pub max_views: Option<u64>,
    pub remaining_views: Option<u64>,
    pub ticket_status: TicketStatus,
    pub read_at: Option<Timestamp>,
    pub security_warning: Option<String>,
    pub conversation: Vec<ConversationNode>,
}

impl ViewTicketResponse {
    /// Locate a reply anywhere in the conversation.
    pub fn find_reply(&self, reply_id: &str) -> Option<&ConversationNode> {
        self.conversation.iter().find_map(|node| node.find(reply_id))
    }
}

/// Request to post a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostReplyRequest {
    pub ticket_number: TicketNumber,
    pub content: String,
    /// Anchor under an existing reply; `None` posts at top level.
    pub parent_reply_id: Option<ReplyId>,
    pub passkeys: Vec<PasskeyEntry>,
}

/// Result of posting a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostReplyResponse {
    pub reply_id: ReplyId,
    pub status: String,
}

/// Terminal state of a delete action. Not-found is a valid outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub success: bool,
    pub message: String,
}

/// Hit counter for one endpoint/method/ticket-type combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUsageMetric {
    pub api_endpoint: String,
    pub http_method: HttpMethod,
    pub ticket_type: TicketType,
    pub hit_count: u64,
}
