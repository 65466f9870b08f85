//! Wire schema of the Sigil Scrolls service.
//!
//! Field names are bit-exact with the service. Response types keep every
//! field optional and stringly typed so that [`crate::adapter`] decides what
//! is required and reports exactly which field is wrong.

use crate::ticket::{EncryptionAlgo, TicketType};
use serde::{Deserialize, Serialize};

/// Endpoint paths relative to the service base URL.
pub mod paths {
    pub const NEW_TICKET: &str = "/doors-of-durin/sigil-scrolls/new-ticket";
    pub const VIEW: &str = "/doors-of-durin/sigil-scrolls/view";
    pub const REPLIES: &str = "/doors-of-durin/sigil-scrolls/replies";
    /// Followed by `/{ticketId}`.
    pub const DELETE: &str = "/doors-of-durin/sigil-scrolls/delete";
    pub const API_USAGE_METRICS: &str = "/doors-of-durin/sigil-scrolls/api-usage-metrics";
}

// === Create ===

/// POST `new-ticket` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCreateRequest {
    pub message_content: String,
    pub encryption_algo: EncryptionAlgo,
    pub passkeys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_until: Option<String>,
    pub ticket_type: TicketType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_views: Option<u32>,
    pub allow_replies: bool,
}

/// Passkey entry of a creation response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireIssuedPasskey {
    #[serde(default)]
    pub passkey_hash: Option<String>,
    #[serde(default)]
    pub key_order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passkey: Option<String>,
}

/// `new-ticket` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCreateResponse {
    #[serde(default)]
    pub ticket_id: Option<String>,
    #[serde(default)]
    pub ticket_number: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub open_from: Option<String>,
    #[serde(default)]
    pub open_until: Option<String>,
    #[serde(default)]
    pub encryption_algo: Option<String>,
    #[serde(default)]
    pub salt: Option<String>,
    #[serde(default)]
    pub passkey: Option<Vec<WireIssuedPasskey>>,
    #[serde(default)]
    pub ticket_type: Option<String>,
    #[serde(default)]
    pub allow_replies: Option<bool>,
    #[serde(default)]
    pub ticket_status: Option<String>,
    #[serde(default)]
    pub count_views: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

// === View ===

/// Ordered passkey as sent on view and reply requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePasskey {
    pub order: u32,
    pub value: String,
}

/// POST `view` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireViewRequest {
    pub ticket_number: String,
    pub passkeys: Vec<WirePasskey>,
}

/// One node of the reply tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireConversationNode {
    #[serde(default)]
    pub reply_id: Option<String>,
    #[serde(default)]
    pub decrypted_content: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub replies: Option<Vec<WireConversationNode>>,
}

/// `view` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireViewResponse {
    #[serde(default)]
    pub ticket_number: Option<String>,
    #[serde(default)]
    pub decrypted_content: Option<String>,
    #[serde(default)]
    pub open_from: Option<String>,
    #[serde(default)]
    pub open_until: Option<String>,
    #[serde(default)]
    pub max_views: Option<u64>,
    #[serde(default)]
    pub remaining_views: Option<u64>,
    #[serde(default)]
    pub ticket_status: Option<String>,
    #[serde(default)]
    pub read_at: Option<String>,
    #[serde(default)]
    pub security_warning: Option<String>,
    #[serde(default)]
    pub conversation: Option<Vec<WireConversationNode>>,
}

// === Replies ===

/// POST `replies` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireReplyRequest {
    pub ticket_number: String,
    pub passkeys: Vec<WirePasskey>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_reply_id: Option<String>,
}

/// `replies` response.
///
/// The service returns the id of the newly created reply under
/// `parent_reply_id`. Kept as observed; renaming it here would break
/// compatibility with deployed services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireReplyResponse {
    #[serde(default)]
    pub parent_reply_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

// === Metrics ===

/// Element of the `api-usage-metrics` array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireApiUsageMetric {
    #[serde(default)]
    pub api_endpoint: Option<String>,
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub ticket_type: Option<String>,
    #[serde(default)]
    pub hit_count: Option<u64>,
}

// === Errors and deletion ===

/// Body of a non-2xx response, or of a delete confirmation.
///
/// Services answer with either `message` or `error`; both are read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl WireMessage {
    /// First non-blank of `message`, `error`.
    pub fn text(&self) -> Option<&str> {
        [self.message.as_deref(), self.error.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_omits_unset_optionals() {
        let req = WireCreateRequest {
            message_content: "hi".into(),
            encryption_algo: EncryptionAlgo::Aes256,
            passkeys: vec!["a".into()],
            salt: None,
            expires_at: None,
            open_from: None,
            open_until: None,
            ticket_type: TicketType::Thread,
            max_views: None,
            allow_replies: true,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "message_content": "hi",
                "encryption_algo": "AES_256",
                "passkeys": ["a"],
                "ticket_type": "THREAD",
                "allow_replies": true
            })
        );
    }

    #[test]
    fn responses_tolerate_nulls_and_absence() {
        let resp: WireViewResponse = serde_json::from_value(json!({
            "ticket_number": "THD-1",
            "decrypted_content": null,
            "ticket_status": "EXPIRED"
        }))
        .unwrap();
        assert_eq!(resp.decrypted_content, None);
        assert_eq!(resp.conversation, None);
    }

    #[test]
    fn message_prefers_message_then_error() {
        let body: WireMessage = serde_json::from_value(json!({"error": "bad passkey"})).unwrap();
        assert_eq!(body.text(), Some("bad passkey"));
        let body: WireMessage =
            serde_json::from_value(json!({"message": " ", "error": "fallback"})).unwrap();
        assert_eq!(body.text(), Some("fallback"));
        assert_eq!(WireMessage::default().text(), None);
    }
}
