//! Ticket creation form state.
//!
//! The policy-dependent fields (`max_views`, `allow_replies`) are always a
//! function of the current ticket type and what the user typed, never flags
//! toggled by hand. Changing the type re-derives `max_views` before anything
//! else is touched.

use crate::error::ValidationError;
use crate::model::{Timestamp, TicketCreationRequest};
use crate::policy::{
    derive_max_views, max_views_policy, parse_max_views, prepare_for_submission, replies_allowed,
    MaxViewsPolicy, DEFAULT_MAX_VIEWS, MAX_PASSKEYS, MIN_PASSKEYS,
};
use crate::ticket::{EncryptionAlgo, TicketType};

/// Editable creation form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    ticket_type: TicketType,
    max_views: Option<u32>,
    pub message_content: String,
    pub encryption_algo: EncryptionAlgo,
    pub passkeys: Vec<String>,
    pub salt: Option<String>,
    pub expires_at: Option<Timestamp>,
    pub open_from: Option<Timestamp>,
    pub open_until: Option<Timestamp>,
}

impl Default for TicketDraft {
    /// A GROUP ticket with ten views and two empty passkey slots.
    fn default() -> Self {
        Self {
            ticket_type: TicketType::Group,
            max_views: Some(DEFAULT_MAX_VIEWS),
            message_content: String::new(),
            encryption_algo: EncryptionAlgo::Aes256,
            passkeys: vec![String::new(), String::new()],
            salt: None,
            expires_at: None,
            open_from: None,
            open_until: None,
        }
    }
}

impl TicketDraft {
    /// Empty draft of the given type.
    pub fn new(ticket_type: TicketType) -> Self {
        Self::default().with_ticket_type(ticket_type)
    }

    pub fn ticket_type(&self) -> TicketType {
        self.ticket_type
    }

    pub fn max_views(&self) -> Option<u32> {
        self.max_views
    }

    pub fn allow_replies(&self) -> bool {
        replies_allowed(self.ticket_type)
    }

    /// Whether the view limit input is editable for the current type.
    pub fn max_views_editable(&self) -> bool {
        !matches!(max_views_policy(self.ticket_type), MaxViewsPolicy::Fixed(_))
    }

    /// Switch ticket type, re-deriving the view limit.
    pub fn with_ticket_type(mut self, ticket_type: TicketType) -> Self {
        self.set_ticket_type(ticket_type);
        self
    }

    pub fn set_ticket_type(&mut self, ticket_type: TicketType) {
        let previous = self.ticket_type;
        self.max_views = derive_max_views(ticket_type, self.max_views, Some(previous));
        self.ticket_type = ticket_type;
    }

    /// Apply raw view-limit input. Ignored while the type fixes the value.
    pub fn set_max_views_input(&mut self, input: &str) {
        if self.max_views_editable() {
            self.max_views = Some(parse_max_views(input));
        }
    }

    /// Clear the view limit. Only meaningful for THREAD tickets; Required
    /// types will then fail validation.
    pub fn clear_max_views(&mut self) {
        if self.max_views_editable() {
            self.max_views = None;
        }
    }

    /// Append an empty passkey slot, up to the maximum.
    pub fn add_passkey(&mut self) -> bool {
        if self.passkeys.len() >= MAX_PASSKEYS {
            return false;
        }
        self.passkeys.push(String::new());
        true
    }

    /// Remove a passkey slot, keeping at least one.
    pub fn remove_passkey(&mut self, index: usize) -> bool {
        if self.passkeys.len() <= MIN_PASSKEYS || index >= self.passkeys.len() {
            return false;
        }
        self.passkeys.remove(index);
        true
    }

    /// Build and validate the creation request.
    pub fn to_request(&self) -> Result<TicketCreationRequest, ValidationError> {
        prepare_for_submission(TicketCreationRequest {
            message_content: self.message_content.clone(),
            encryption_algo: self.encryption_algo,
            passkeys: self.passkeys.clone(),
            salt: self.salt.clone(),
            expires_at: self.expires_at,
            open_from: self.open_from,
            open_until: self.open_until,
            ticket_type: self.ticket_type,
            max_views: self.max_views,
            allow_replies: self.allow_replies(),
        })
    }
}
