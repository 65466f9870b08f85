//! # Sigil Client
//!
//! Async client for the Sigil Scrolls self-destructing ticket service.
//!
//! ## Design Principles
//!
//! - **Service is authoritative**: view limits, expiry and passkey checks
//!   happen server-side; the client only reports what the service says
//! - **Validate before sending**: ticket policy is checked locally so a bad
//!   request never reaches the network
//! - **One attempt**: no retries, every failure surfaces once
//! - **Minimal logging**: passkeys and message content are never logged
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────────┐
//! │  sigil CLI  │────▶│ TicketService│────▶│  Sigil Scrolls  │
//! └─────────────┘     │    Client    │     │     service     │
//!        │            └──────┬───────┘     └─────────────────┘
//!        │                   │
//!   TicketDraft        sigil-core adapter
//!   (policy)           (wire <-> domain)
//! ```
//!
//! ## API Overview
//!
//! | Endpoint | Method | Operation |
//! |----------|--------|-----------|
//! | `/doors-of-durin/sigil-scrolls/new-ticket` | POST | [`TicketServiceClient::create_ticket`] |
//! | `/doors-of-durin/sigil-scrolls/view` | POST | [`TicketServiceClient::view_ticket`] |
//! | `/doors-of-durin/sigil-scrolls/replies` | POST | [`TicketServiceClient::post_reply`] |
//! | `/doors-of-durin/sigil-scrolls/delete/{id}` | DELETE | [`TicketServiceClient::delete_ticket`] |
//! | `/doors-of-durin/sigil-scrolls/api-usage-metrics` | GET | [`TicketServiceClient::fetch_api_usage_metrics`] |

pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;

pub use client::TicketServiceClient;
pub use config::Config;
pub use dashboard::{Dashboard, DashboardState, Snapshot};
pub use error::{ClientError, Operation};
