//! Ticket service client.
//!
//! One HTTP call per use case. Requests are built with the protocol adapter,
//! responses decoded with it, and failures classified into [`ClientError`].
//!
//! The client contract:
//! - No retries; each failure surfaces once
//! - No local enforcement of view limits or expiry
//! - Passkeys and message content are never logged

use crate::config::Config;
use crate::error::{ClientError, Operation, Result};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use sigil_core::policy::validate_passkeys;
use sigil_core::wire::{
    paths, WireApiUsageMetric, WireCreateResponse, WireMessage, WireReplyResponse,
};
use sigil_core::{
    adapter, ApiUsageMetric, DeleteOutcome, PasskeyEntry, PostReplyRequest, PostReplyResponse,
    TicketCreationRequest, TicketCreationResponse, UnifiedViewRequest, ValidationError,
    ViewTicketResponse,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reported when the service answers a delete with 404.
pub const DELETE_NOT_FOUND_MESSAGE: &str =
    "Ticket not found. It may have already been deleted or never existed.";

/// Reported when a delete answers 2xx but not 200 and sends no message.
pub const DELETE_UNEXPECTED_MESSAGE: &str = "Unexpected response from server";

/// Client for the Sigil Scrolls service. Cheap to clone.
#[derive(Clone)]
pub struct TicketServiceClient {
    http: reqwest::Client,
    config: Arc<Config>,
}

impl TicketServiceClient {
    /// Build a client for the configured base URL.
    pub fn new(config: Config) -> Result<Self> {
        Url::parse(&config.api_url).map_err(|_| ClientError::InvalidUrl(config.api_url.clone()))?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("sigil-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::HttpClient)?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // === Create ===

    /// POST new-ticket.
    ///
    /// The request must already have passed
    /// [`sigil_core::validate_for_submission`]; it is not checked again.
    pub async fn create_ticket(
        &self,
        request: &TicketCreationRequest,
    ) -> Result<TicketCreationResponse> {
        let op = Operation::CreateTicket;
        let body = adapter::to_wire_create_request(request);

        info!(
            ticket_type = %request.ticket_type,
            encryption_algo = %request.encryption_algo,
            passkey_count = request.passkeys.len(),
            max_views = ?request.max_views,
            "Creating ticket"
        );

        let resp = self
            .dispatch(op, self.http.post(self.config.endpoint(paths::NEW_TICKET)).json(&body))
            .await?;
        let resp = ensure_success(op, resp).await?;
        let created = decode::<WireCreateResponse, _>(op, resp, adapter::from_wire_create_response)
            .await?;

        info!(
            ticket_id = %created.ticket_id,
            ticket_number = %created.ticket_number,
            status = %created.ticket_status,
            "Ticket created"
        );

        Ok(created)
    }

    // === View ===

    /// POST view. The outcome (denied, expired, limit reached) is whatever
    /// the service reports in `ticket_status` and `remaining_views`.
    pub async fn view_ticket(&self, request: &UnifiedViewRequest) -> Result<ViewTicketResponse> {
        let op = Operation::ViewTicket;
        check_passkeys(&request.passkeys)?;
        let body = adapter::to_wire_view_request(request);

        debug!(
            ticket_number = %request.ticket_number,
            passkey_count = request.passkeys.len(),
            "Viewing ticket"
        );

        let resp = self
            .dispatch(op, self.http.post(self.config.endpoint(paths::VIEW)).json(&body))
            .await?;
        let resp = ensure_success(op, resp).await?;
        // Conversation trees can nest far past serde_json's default limit
        let view = decode_body(op, resp, adapter::decode_view_response).await?;

        info!(
            ticket_number = %view.ticket_number,
            status = %view.ticket_status,
            remaining_views = ?view.remaining_views,
            replies = view.conversation.len(),
            "Ticket viewed"
        );

        Ok(view)
    }

    // === Replies ===

    /// POST replies. A `parent_reply_id` is passed through unchecked; the
    /// service decides whether it exists.
    pub async fn post_reply(&self, request: &PostReplyRequest) -> Result<PostReplyResponse> {
        let op = Operation::PostReply;
        check_passkeys(&request.passkeys)?;
        let body = adapter::to_wire_reply_request(request);

        debug!(
            ticket_number = %request.ticket_number,
            top_level = request.parent_reply_id.is_none(),
            "Posting reply"
        );

        let resp = self
            .dispatch(op, self.http.post(self.config.endpoint(paths::REPLIES)).json(&body))
            .await?;
        let resp = ensure_success(op, resp).await?;
        let reply =
            decode::<WireReplyResponse, _>(op, resp, adapter::from_wire_reply_response).await?;

        info!(reply_id = %reply.reply_id, status = %reply.status, "Reply posted");

        Ok(reply)
    }

    // === Delete ===

    /// DELETE delete/{ticketId}.
    ///
    /// A 404 is a normal outcome (`success: false`), since "already deleted"
    /// and "never existed" cannot be told apart. Only a 200 confirms the
    /// delete; any other 2xx is reported as `success: false`. Non-2xx
    /// failures are errors.
    ///
    /// An empty id is rejected locally. The format is otherwise left to the
    /// service.
    pub async fn delete_ticket(&self, ticket_id: &str) -> Result<DeleteOutcome> {
        let op = Operation::DeleteTicket;
        let ticket_id = ticket_id.trim();
        if ticket_id.is_empty() {
            return Err(ValidationError::InvalidTicketIdFormat.into());
        }

        let mut url = Url::parse(&self.config.endpoint(paths::DELETE))
            .map_err(|_| ClientError::InvalidUrl(self.config.api_url.clone()))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.config.api_url.clone()))?
            .push(ticket_id);

        let resp = self.dispatch(op, self.http.delete(url)).await?;

        if resp.status() == StatusCode::NOT_FOUND {
            info!("Delete target not found");
            return Ok(DeleteOutcome {
                success: false,
                message: DELETE_NOT_FOUND_MESSAGE.to_string(),
            });
        }

        let resp = ensure_success(op, resp).await?;
        let status = resp.status();
        // Confirmation body is informational; an empty or odd body still
        // means the delete went through.
        let body = resp.text().await.unwrap_or_default();
        let server_message = serde_json::from_str::<WireMessage>(&body)
            .ok()
            .and_then(|m| m.text().map(str::to_string));

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Unexpected delete status");
            return Ok(DeleteOutcome {
                success: false,
                message: server_message.unwrap_or_else(|| DELETE_UNEXPECTED_MESSAGE.to_string()),
            });
        }

        info!("Ticket deleted");

        Ok(DeleteOutcome {
            success: true,
            message: server_message
                .unwrap_or_else(|| format!("Ticket ID: {ticket_id} has been permanently deleted.")),
        })
    }

    // === Metrics ===

    /// GET api-usage-metrics.
    pub async fn fetch_api_usage_metrics(&self) -> Result<Vec<ApiUsageMetric>> {
        let op = Operation::FetchMetrics;
        let resp = self
            .dispatch(op, self.http.get(self.config.endpoint(paths::API_USAGE_METRICS)))
            .await?;
        let resp = ensure_success(op, resp).await?;
        let metrics =
            decode::<Vec<WireApiUsageMetric>, _>(op, resp, adapter::from_wire_usage_metrics)
                .await?;

        debug!(count = metrics.len(), "Fetched API usage metrics");

        Ok(metrics)
    }

    // === Plumbing ===

    /// Send a request; only transport failures are errors here.
    async fn dispatch(&self, op: Operation, request: RequestBuilder) -> Result<Response> {
        request.send().await.map_err(|source| {
            warn!(operation = %op, error = %source, timeout = source.is_timeout(), "Request failed");
            ClientError::Network {
                operation: op,
                source,
            }
        })
    }
}

/// View and reply need at least one passkey, none of them blank.
fn check_passkeys(passkeys: &[PasskeyEntry]) -> Result<()> {
    let values: Vec<&str> = passkeys.iter().map(|p| p.value.as_str()).collect();
    validate_passkeys(&values)?;
    Ok(())
}

/// Turn a non-2xx response into a service error carrying the server's
/// message when it sent one.
async fn ensure_success(op: Operation, resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<WireMessage>(&body)
        .ok()
        .and_then(|m| m.text().map(str::to_string))
        .unwrap_or_else(|| op.fallback_message().to_string());

    warn!(operation = %op, status = status.as_u16(), "Service returned an error");

    Err(ClientError::Service {
        operation: op,
        status: status.as_u16(),
        message,
    })
}

/// Read the body, decode the wire type and map it into the domain.
async fn decode<W, T>(
    op: Operation,
    resp: Response,
    map: impl FnOnce(W) -> sigil_core::error::Result<T>,
) -> Result<T>
where
    W: DeserializeOwned,
{
    decode_body(op, resp, |body| map(serde_json::from_str::<W>(body)?)).await
}

/// Read the body and hand it to `parse`.
///
/// The raw payload of anything that fails to parse is logged at debug level.
async fn decode_body<T>(
    op: Operation,
    resp: Response,
    parse: impl FnOnce(&str) -> sigil_core::error::Result<T>,
) -> Result<T> {
    let body = resp.text().await.map_err(|source| ClientError::Network {
        operation: op,
        source,
    })?;

    parse(&body).map_err(|err| {
        warn!(operation = %op, error = %err, "Malformed response");
        debug!(operation = %op, raw = %body, "Malformed response payload");
        ClientError::MalformedResponse(err)
    })
}
