//! Protocol adapter between the wire schema and the domain model.
//!
//! Requests map infallibly. Responses are checked field by field: a missing
//! required field, an unknown enum token, a bad UUID or an unparseable
//! timestamp yields an [`AdapterError`] naming the field instead of a
//! silently defaulted value.
//!
//! Timestamps are emitted as RFC 3339 in UTC. On input both RFC 3339 and
//! zone-less ISO-8601 (`2025-05-01T12:00:00.123`, read as UTC) are accepted.
//!
//! Conversation trees come from an untrusted peer and may be deep. Nothing
//! here recurses per level: view bodies are decoded with
//! [`decode_view_response`] and the tree is rebuilt with an explicit stack.

use crate::error::{AdapterError, Result};
use crate::model::*;
use crate::ticket::{TicketNumber, UnknownVariant};
use crate::wire::*;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::Deserialize;
use std::str::FromStr;
use uuid::Uuid;

/// Deepest conversation nesting accepted from the service.
pub const MAX_CONVERSATION_DEPTH: usize = 1000;

// === Field helpers ===

fn required<T>(field: &'static str, value: Option<T>) -> Result<T> {
    value.ok_or(AdapterError::MissingField(field))
}

fn parse_token<T>(field: &'static str, value: Option<String>) -> Result<T>
where
    T: FromStr<Err = UnknownVariant>,
{
    let raw = required(field, value)?;
    raw.parse().map_err(|e| AdapterError::invalid(field, e))
}

/// Render a timestamp the way requests carry it.
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse a service timestamp (RFC 3339, or ISO-8601 without zone as UTC).
pub fn parse_timestamp(field: &'static str, raw: &str) -> Result<Timestamp> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| AdapterError::invalid(field, format!("is not a timestamp: {e}")))
}

fn optional_timestamp(field: &'static str, value: Option<String>) -> Result<Option<Timestamp>> {
    value.map(|raw| parse_timestamp(field, &raw)).transpose()
}

fn required_timestamp(field: &'static str, value: Option<String>) -> Result<Timestamp> {
    parse_timestamp(field, &required(field, value)?)
}

fn wire_passkeys(passkeys: &[PasskeyEntry]) -> Vec<WirePasskey> {
    passkeys
        .iter()
        .map(|p| WirePasskey {
            order: p.order,
            value: p.value.clone(),
        })
        .collect()
}

// === Create ===

/// Scalars map one to one; passkeys stay raw strings in entry order.
pub fn to_wire_create_request(req: &TicketCreationRequest) -> WireCreateRequest {
    WireCreateRequest {
        message_content: req.message_content.clone(),
        encryption_algo: req.encryption_algo,
        passkeys: req.passkeys.clone(),
        salt: req.salt.clone(),
        expires_at: req.expires_at.as_ref().map(format_timestamp),
        open_from: req.open_from.as_ref().map(format_timestamp),
        open_until: req.open_until.as_ref().map(format_timestamp),
        ticket_type: req.ticket_type,
        max_views: req.max_views,
        allow_replies: req.allow_replies,
    }
}

pub fn from_wire_create_response(wire: WireCreateResponse) -> Result<TicketCreationResponse> {
    let raw_id = required("ticket_id", wire.ticket_id)?;
    let ticket_id = Uuid::parse_str(&raw_id)
        .map_err(|e| AdapterError::invalid("ticket_id", format!("is not a UUID: {e}")))?;

    let passkeys = wire
        .passkey
        .unwrap_or_default()
        .into_iter()
        .map(|p| {
            Ok(IssuedPasskey {
                order: required("passkey.key_order", p.key_order)?,
                value: p.passkey,
                hash: p.passkey_hash,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TicketCreationResponse {
        ticket_id,
        ticket_number: TicketNumber::new(required("ticket_number", wire.ticket_number)?),
        created_at: optional_timestamp("created_at", wire.created_at)?,
        expires_at: optional_timestamp("expires_at", wire.expires_at)?,
        open_from: optional_timestamp("open_from", wire.open_from)?,
        open_until: optional_timestamp("open_until", wire.open_until)?,
        encryption_algo: parse_token("encryption_algo", wire.encryption_algo)?,
        salt: wire.salt,
        passkeys,
        ticket_type: parse_token("ticket_type", wire.ticket_type)?,
        allow_replies: required("allow_replies", wire.allow_replies)?,
        ticket_status: parse_token("ticket_status", wire.ticket_status)?,
        count_views: wire.count_views,
    })
}

/// Inverse of [`from_wire_create_response`], for fixtures and mock services.
pub fn to_wire_create_response(resp: &TicketCreationResponse) -> WireCreateResponse {
    WireCreateResponse {
        ticket_id: Some(resp.ticket_id.to_string()),
        ticket_number: Some(resp.ticket_number.as_str().to_string()),
        expires_at: resp.expires_at.as_ref().map(format_timestamp),
        open_from: resp.open_from.as_ref().map(format_timestamp),
        open_until: resp.open_until.as_ref().map(format_timestamp),
        encryption_algo: Some(resp.encryption_algo.as_str().to_string()),
        salt: resp.salt.clone(),
        passkey: Some(
            resp.passkeys
                .iter()
                .map(|p| WireIssuedPasskey {
                    passkey_hash: p.hash.clone(),
                    key_order: Some(p.order),
                    passkey: p.value.clone(),
                })
                .collect(),
        ),
        ticket_type: Some(resp.ticket_type.as_str().to_string()),
        allow_replies: Some(resp.allow_replies),
        ticket_status: Some(resp.ticket_status.as_str().to_string()),
        count_views: resp.count_views,
        created_at: resp.created_at.as_ref().map(format_timestamp),
    }
}

// === View ===

/// Passkeys keep their input order; the service checks them positionally.
pub fn to_wire_view_request(req: &UnifiedViewRequest) -> WireViewRequest {
    WireViewRequest {
        ticket_number: req.ticket_number.as_str().to_string(),
        passkeys: wire_passkeys(&req.passkeys),
    }
}

pub fn from_wire_view_response(wire: WireViewResponse) -> Result<ViewTicketResponse> {
    Ok(ViewTicketResponse {
        ticket_number: TicketNumber::new(required("ticket_number", wire.ticket_number)?),
        decrypted_content: wire.decrypted_content,
        open_from: optional_timestamp("open_from", wire.open_from)?,
        open_until: optional_timestamp("open_until", wire.open_until)?,
        max_views: wire.max_views,
        remaining_views: wire.remaining_views,
        ticket_status: parse_token("ticket_status", wire.ticket_status)?,
        read_at: optional_timestamp("read_at", wire.read_at)?,
        security_warning: wire.security_warning,
        conversation: transform_conversation(wire.conversation.unwrap_or_default())?,
    })
}

/// Decode a raw `view` body.
///
/// serde_json's default recursion limit (128) would cap conversations at
/// about 62 levels, so the body is first checked against
/// [`MAX_CONVERSATION_DEPTH`] without recursing, then decoded with the limit
/// lifted and the stack grown on demand.
pub fn decode_view_response(body: &str) -> Result<ViewTicketResponse> {
    check_view_nesting(body)?;

    let mut json = serde_json::Deserializer::from_str(body);
    json.disable_recursion_limit();
    let wire = WireViewResponse::deserialize(serde_stacker::Deserializer::new(&mut json))?;
    json.end()?;

    from_wire_view_response(wire)
}

/// Reject bodies nested deeper than a conversation of
/// [`MAX_CONVERSATION_DEPTH`] levels.
///
/// Conversation level `n` sits at bracket depth `2n + 1` (the node object)
/// and `2n + 2` (its `replies` array).
fn check_view_nesting(body: &str) -> Result<()> {
    let limit = 2 * MAX_CONVERSATION_DEPTH + 2;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for byte in body.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > limit {
                    return Err(AdapterError::ConversationTooDeep {
                        limit: MAX_CONVERSATION_DEPTH,
                    });
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Node whose own fields are mapped but whose replies are still pending.
struct OpenNode {
    reply_id: ReplyId,
    decrypted_content: String,
    created_at: Timestamp,
}

/// One level of the rebuild: wire siblings still to map, and the ones done.
struct Level {
    parent: Option<OpenNode>,
    pending: std::vec::IntoIter<WireConversationNode>,
    built: Vec<ConversationNode>,
}

impl Level {
    fn new(parent: Option<OpenNode>, nodes: Vec<WireConversationNode>) -> Self {
        Self {
            parent,
            pending: nodes.into_iter(),
            built: Vec::new(),
        }
    }
}

/// Rebuild the reply tree, preserving sibling order.
///
/// Absent `replies` become an empty list. Trees nested deeper than
/// [`MAX_CONVERSATION_DEPTH`] are rejected. Iterative, so stack use does not
/// grow with depth.
pub fn transform_conversation(nodes: Vec<WireConversationNode>) -> Result<Vec<ConversationNode>> {
    let mut ancestors: Vec<Level> = Vec::new();
    let mut current = Level::new(None, nodes);

    loop {
        if let Some(node) = current.pending.next() {
            if ancestors.len() + 1 > MAX_CONVERSATION_DEPTH {
                return Err(AdapterError::ConversationTooDeep {
                    limit: MAX_CONVERSATION_DEPTH,
                });
            }
            let open = OpenNode {
                reply_id: required("conversation.reply_id", node.reply_id)?,
                decrypted_content: required("conversation.decrypted_content", node.decrypted_content)?,
                created_at: required_timestamp("conversation.created_at", node.created_at)?,
            };
            let children = Level::new(Some(open), node.replies.unwrap_or_default());
            ancestors.push(std::mem::replace(&mut current, children));
            continue;
        }

        // Level exhausted: close its node into the parent level.
        let Some(mut up) = ancestors.pop() else {
            return Ok(current.built);
        };
        if let Some(open) = current.parent {
            up.built.push(ConversationNode {
                reply_id: open.reply_id,
                decrypted_content: open.decrypted_content,
                created_at: open.created_at,
                replies: current.built,
            });
        }
        current = up;
    }
}

// === Replies ===

pub fn to_wire_reply_request(req: &PostReplyRequest) -> WireReplyRequest {
    WireReplyRequest {
        ticket_number: req.ticket_number.as_str().to_string(),
        passkeys: wire_passkeys(&req.passkeys),
        content: req.content.clone(),
        parent_reply_id: req.parent_reply_id.clone(),
    }
}

/// The new reply's id arrives under `parent_reply_id` (service quirk).
pub fn from_wire_reply_response(wire: WireReplyResponse) -> Result<PostReplyResponse> {
    Ok(PostReplyResponse {
        reply_id: required("parent_reply_id", wire.parent_reply_id)?,
        status: required("status", wire.status)?,
    })
}

// === Metrics ===

pub fn from_wire_usage_metrics(wire: Vec<WireApiUsageMetric>) -> Result<Vec<ApiUsageMetric>> {
    wire.into_iter()
        .map(|m| {
            Ok(ApiUsageMetric {
                api_endpoint: required("api_endpoint", m.api_endpoint)?,
                http_method: parse_token("http_method", m.http_method)?,
                ticket_type: parse_token("ticket_type", m.ticket_type)?,
                hit_count: required("hit_count", m.hit_count)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::{EncryptionAlgo, HttpMethod, TicketStatus, TicketType};
    use serde_json::json;

    fn ts(raw: &str) -> Timestamp {
        parse_timestamp("test", raw).unwrap()
    }

    fn wire_node(id: &str, replies: Option<Vec<WireConversationNode>>) -> WireConversationNode {
        WireConversationNode {
            reply_id: Some(id.to_string()),
            decrypted_content: Some(format!("content {id}")),
            created_at: Some("2025-05-01T12:00:00Z".to_string()),
            replies,
        }
    }

    fn sample_create_response() -> TicketCreationResponse {
        TicketCreationResponse {
            ticket_id: Uuid::parse_str("105d1e8f-cec3-44d8-a262-9655d4feb307").unwrap(),
            ticket_number: TicketNumber::new("GRP-0000019866759c777604d39a842fd0098db4"),
            created_at: Some(ts("2025-05-01T12:00:00Z")),
            expires_at: Some(ts("2025-05-08T12:00:00.250Z")),
            open_from: None,
            open_until: None,
            encryption_algo: EncryptionAlgo::ChaCha20,
            salt: Some("pepper".into()),
            passkeys: vec![
                IssuedPasskey { order: 1, value: Some("first".into()), hash: Some("h1".into()) },
                IssuedPasskey { order: 2, value: Some("second".into()), hash: None },
            ],
            ticket_type: TicketType::Group,
            allow_replies: true,
            ticket_status: TicketStatus::Open,
            count_views: Some(0),
        }
    }

    #[test]
    fn timestamps_accept_rfc3339_and_naive() {
        assert_eq!(ts("2025-05-01T14:00:00+02:00"), ts("2025-05-01T12:00:00Z"));
        assert_eq!(ts("2025-05-01T12:00:00"), ts("2025-05-01T12:00:00Z"));
        assert_eq!(ts("2025-05-01T12:00"), ts("2025-05-01T12:00:00Z"));
        assert_eq!(ts("2025-05-01T12:00:00.5"), ts("2025-05-01T12:00:00.500Z"));
        assert!(parse_timestamp("read_at", "yesterday").is_err());
    }

    #[test]
    fn create_request_is_identity_on_scalars() {
        let req = TicketCreationRequest {
            message_content: "hi".into(),
            encryption_algo: EncryptionAlgo::Twofish,
            passkeys: vec!["b".into(), "a".into()],
            salt: Some("s".into()),
            expires_at: Some(ts("2025-06-01T00:00:00Z")),
            open_from: None,
            open_until: None,
            ticket_type: TicketType::Broadcast,
            max_views: Some(42),
            allow_replies: false,
        };
        let value = serde_json::to_value(to_wire_create_request(&req)).unwrap();
        assert_eq!(
            value,
            json!({
                "message_content": "hi",
                "encryption_algo": "TWOFISH",
                "passkeys": ["b", "a"],
                "salt": "s",
                "expires_at": "2025-06-01T00:00:00Z",
                "ticket_type": "BROADCAST",
                "max_views": 42,
                "allow_replies": false
            })
        );
    }

    #[test]
    fn create_response_roundtrips() {
        let domain = sample_create_response();
        let back = from_wire_create_response(to_wire_create_response(&domain)).unwrap();
        assert_eq!(back, domain);
    }

    #[test]
    fn create_response_renames_and_keeps_optionals() {
        let wire: WireCreateResponse = serde_json::from_value(json!({
            "ticket_id": "105d1e8f-cec3-44d8-a262-9655d4feb307",
            "ticket_number": "SSL-abc",
            "encryption_algo": "AES_256",
            "salt": "xyz",
            "passkey": [{"passkey_hash": "h", "key_order": 1, "passkey": "open sesame"}],
            "ticket_type": "SECURE_SINGLE",
            "allow_replies": false,
            "ticket_status": "OPEN",
            "count_views": 0,
            "created_at": "2025-05-01T12:00:00"
        }))
        .unwrap();
        let resp = from_wire_create_response(wire).unwrap();
        assert_eq!(resp.ticket_id.to_string(), "105d1e8f-cec3-44d8-a262-9655d4feb307");
        assert_eq!(resp.ticket_number.as_str(), "SSL-abc");
        assert_eq!(resp.salt.as_deref(), Some("xyz"));
        assert_eq!(resp.passkeys[0].value.as_deref(), Some("open sesame"));
        assert_eq!(resp.count_views, Some(0));
        assert_eq!(resp.created_at, Some(ts("2025-05-01T12:00:00Z")));
    }

    #[test]
    fn create_response_missing_required_field() {
        let mut wire = to_wire_create_response(&sample_create_response());
        wire.ticket_status = None;
        assert_eq!(
            from_wire_create_response(wire),
            Err(AdapterError::MissingField("ticket_status"))
        );

        let mut wire = to_wire_create_response(&sample_create_response());
        wire.ticket_id = Some("not-a-uuid".into());
        assert!(matches!(
            from_wire_create_response(wire),
            Err(AdapterError::InvalidField { field: "ticket_id", .. })
        ));

        let mut wire = to_wire_create_response(&sample_create_response());
        wire.ticket_type = Some("PRIVATE".into());
        assert!(matches!(
            from_wire_create_response(wire),
            Err(AdapterError::InvalidField { field: "ticket_type", .. })
        ));
    }

    #[test]
    fn view_request_preserves_passkey_order() {
        let req = UnifiedViewRequest {
            ticket_number: TicketNumber::new("THD-1"),
            passkeys: vec![
                PasskeyEntry { order: 2, value: "second".into() },
                PasskeyEntry { order: 1, value: "first".into() },
            ],
        };
        let value = serde_json::to_value(to_wire_view_request(&req)).unwrap();
        assert_eq!(
            value,
            json!({
                "ticket_number": "THD-1",
                "passkeys": [
                    {"order": 2, "value": "second"},
                    {"order": 1, "value": "first"}
                ]
            })
        );
    }

    #[test]
    fn view_response_builds_two_level_tree() {
        let wire: WireViewResponse = serde_json::from_value(json!({
            "ticket_number": "GRP-1",
            "decrypted_content": "hello",
            "max_views": 10,
            "remaining_views": 9,
            "ticket_status": "OPEN",
            "read_at": "2025-05-01T12:05:00Z",
            "security_warning": null,
            "conversation": [{
                "reply_id": "r1",
                "decrypted_content": "hi",
                "created_at": "2025-05-01T12:01:00Z",
                "replies": [{
                    "reply_id": "r2",
                    "decrypted_content": "hey",
                    "created_at": "2025-05-01T12:02:00Z",
                    "replies": []
                }]
            }]
        }))
        .unwrap();
        let view = from_wire_view_response(wire).unwrap();
        assert_eq!(view.decrypted_content.as_deref(), Some("hello"));
        assert_eq!(view.remaining_views, Some(9));
        assert_eq!(view.conversation.len(), 1);
        let r1 = &view.conversation[0];
        assert_eq!(r1.reply_id, "r1");
        assert_eq!(r1.depth(), 2);
        assert_eq!(r1.replies[0].reply_id, "r2");
        assert!(r1.replies[0].replies.is_empty());
    }

    #[test]
    fn view_response_without_conversation() {
        let wire: WireViewResponse = serde_json::from_value(json!({
            "ticket_number": "SGL-1",
            "ticket_status": "VIEW_LIMIT_REACHED",
            "security_warning": "view limit reached"
        }))
        .unwrap();
        let view = from_wire_view_response(wire).unwrap();
        assert!(view.conversation.is_empty());
        assert!(view.decrypted_content.is_none());
        assert_eq!(view.ticket_status, TicketStatus::ViewLimitReached);
    }

    #[test]
    fn conversation_preserves_order_and_depth() {
        let tree = vec![
            wire_node("a", Some(vec![wire_node("a1", Some(vec![wire_node("a1x", None)]))])),
            wire_node("b", Some(vec![])),
            wire_node("c", None),
        ];
        let nodes = transform_conversation(tree).unwrap();
        let ids: Vec<&str> = nodes.iter().map(|n| n.reply_id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(nodes[0].depth(), 3);
        assert_eq!(nodes[0].replies[0].replies[0].reply_id, "a1x");
        assert!(nodes[1].replies.is_empty());
        assert!(nodes[2].replies.is_empty());
        assert!(transform_conversation(Vec::new()).unwrap().is_empty());
    }

    fn chain(depth: usize) -> Vec<WireConversationNode> {
        let mut level: Option<Vec<WireConversationNode>> = None;
        for i in (0..depth).rev() {
            level = Some(vec![wire_node(&format!("r{i}"), level)]);
        }
        level.unwrap_or_default()
    }

    #[test]
    fn conversation_depth_guard() {
        let nodes = transform_conversation(chain(MAX_CONVERSATION_DEPTH)).unwrap();
        assert_eq!(nodes[0].depth(), MAX_CONVERSATION_DEPTH);
        assert_eq!(nodes[0].count(), MAX_CONVERSATION_DEPTH);

        assert_eq!(
            transform_conversation(chain(MAX_CONVERSATION_DEPTH + 1)),
            Err(AdapterError::ConversationTooDeep { limit: MAX_CONVERSATION_DEPTH })
        );
    }

    /// Raw view body with a single chain of replies `depth` levels deep.
    fn chain_body(depth: usize) -> String {
        let mut body =
            String::from(r#"{"ticket_number":"THD-1","ticket_status":"OPEN","conversation":"#);
        for i in 1..=depth {
            body.push_str(&format!(
                r#"[{{"reply_id":"r{i}","decrypted_content":"level {i}","created_at":"2025-05-01T12:00:00","replies":"#
            ));
        }
        body.push_str("[]");
        for _ in 0..depth {
            body.push_str("}]");
        }
        body.push('}');
        body
    }

    #[test]
    fn deep_view_body_decodes_up_to_limit() {
        for depth in [100, MAX_CONVERSATION_DEPTH] {
            let view = decode_view_response(&chain_body(depth)).unwrap();
            assert_eq!(view.conversation[0].depth(), depth);
            let last = format!("r{depth}");
            assert!(view.find_reply(&last).is_some());
        }
        assert_eq!(
            decode_view_response(&chain_body(MAX_CONVERSATION_DEPTH + 1)),
            Err(AdapterError::ConversationTooDeep { limit: MAX_CONVERSATION_DEPTH })
        );
    }

    #[test]
    fn nesting_scan_ignores_brackets_in_strings() {
        let brackets = "[".repeat(5000);
        let body = format!(
            r#"{{"ticket_number":"THD-1","ticket_status":"OPEN","decrypted_content":"{brackets} \" {brackets}"}}"#
        );
        let view = decode_view_response(&body).unwrap();
        assert!(view.decrypted_content.unwrap().starts_with("[[["));
        assert!(matches!(
            decode_view_response("{\"ticket_number\": 1} trailing"),
            Err(AdapterError::Undecodable(_))
        ));
    }

    #[test]
    fn conversation_node_missing_id() {
        let mut node = wire_node("x", None);
        node.reply_id = None;
        assert_eq!(
            transform_conversation(vec![wire_node("ok", Some(vec![node]))]),
            Err(AdapterError::MissingField("conversation.reply_id"))
        );
    }

    #[test]
    fn reply_request_and_quirky_response() {
        let req = PostReplyRequest {
            ticket_number: TicketNumber::new("GRP-1"),
            content: "thanks".into(),
            parent_reply_id: None,
            passkeys: vec![PasskeyEntry { order: 1, value: "k".into() }],
        };
        let value = serde_json::to_value(to_wire_reply_request(&req)).unwrap();
        assert_eq!(
            value,
            json!({
                "ticket_number": "GRP-1",
                "passkeys": [{"order": 1, "value": "k"}],
                "content": "thanks"
            })
        );

        let wire: WireReplyResponse =
            serde_json::from_value(json!({"parent_reply_id": "new-reply", "status": "CREATED"}))
                .unwrap();
        let resp = from_wire_reply_response(wire).unwrap();
        assert_eq!(resp.reply_id, "new-reply");
        assert_eq!(resp.status, "CREATED");

        let wire: WireReplyResponse =
            serde_json::from_value(json!({"reply_id": "ignored", "status": "CREATED"})).unwrap();
        assert_eq!(
            from_wire_reply_response(wire),
            Err(AdapterError::MissingField("parent_reply_id"))
        );
    }

    #[test]
    fn usage_metrics_decode() {
        let wire: Vec<WireApiUsageMetric> = serde_json::from_value(json!([
            {"api_endpoint": "/view", "http_method": "POST", "ticket_type": "GROUP", "hit_count": 3}
        ]))
        .unwrap();
        let metrics = from_wire_usage_metrics(wire).unwrap();
        assert_eq!(metrics[0].http_method, HttpMethod::Post);
        assert_eq!(metrics[0].hit_count, 3);

        let wire = vec![WireApiUsageMetric {
            api_endpoint: Some("/view".into()),
            http_method: Some("TRACE".into()),
            ticket_type: Some("GROUP".into()),
            hit_count: Some(1),
        }];
        assert!(matches!(
            from_wire_usage_metrics(wire),
            Err(AdapterError::InvalidField { field: "http_method", .. })
        ));
    }
}
