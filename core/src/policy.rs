//! Ticket policy engine.
//!
//! Pure functions deriving reply permission and view-limit rules from a
//! [`TicketType`], and validating a creation request against them before it
//! is sent.
//!
//! | Type            | Replies | Max views                    |
//! |-----------------|---------|------------------------------|
//! | `SINGLE`        | no      | fixed at 5                   |
//! | `SECURE_SINGLE` | no      | fixed at 1                   |
//! | `THREAD`        | yes     | free                         |
//! | `BROADCAST`     | no      | required, 1..=1e9, default 10 |
//! | `GROUP`         | yes     | required, 1..=1e9, default 10 |

use crate::error::ValidationError;
use crate::model::TicketCreationRequest;
use crate::ticket::TicketType;
use uuid::Uuid;

/// Lower bound of a user-supplied view limit.
pub const MIN_MAX_VIEWS: u32 = 1;

/// Upper bound of a user-supplied view limit.
pub const MAX_MAX_VIEWS: u32 = 1_000_000_000;

/// View limit assumed for Required types when none was entered.
pub const DEFAULT_MAX_VIEWS: u32 = 10;

/// Fewest passkeys a ticket may carry.
pub const MIN_PASSKEYS: usize = 1;

/// Most passkeys a ticket may carry.
pub const MAX_PASSKEYS: usize = 10;

/// How a ticket type constrains `max_views`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxViewsPolicy {
    /// Always this value; user input is ignored.
    Fixed(u32),
    /// Must be set, within `[MIN_MAX_VIEWS, MAX_MAX_VIEWS]`.
    Required,
    /// Any value, or none.
    Free,
}

/// Policy derived from a ticket type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketPolicy {
    pub replies_allowed: bool,
    pub max_views: MaxViewsPolicy,
}

/// Replies are only accepted on GROUP and THREAD tickets.
pub fn replies_allowed(ticket_type: TicketType) -> bool {
    matches!(ticket_type, TicketType::Group | TicketType::Thread)
}

pub fn max_views_policy(ticket_type: TicketType) -> MaxViewsPolicy {
    match ticket_type {
        TicketType::Single => MaxViewsPolicy::Fixed(5),
        TicketType::SecureSingle => MaxViewsPolicy::Fixed(1),
        TicketType::Group | TicketType::Broadcast => MaxViewsPolicy::Required,
        TicketType::Thread => MaxViewsPolicy::Free,
    }
}

pub fn policy_for(ticket_type: TicketType) -> TicketPolicy {
    TicketPolicy {
        replies_allowed: replies_allowed(ticket_type),
        max_views: max_views_policy(ticket_type),
    }
}

/// Recompute the view limit after the ticket type changed.
///
/// Keyed on the new type only: Fixed types always reset, Required types keep
/// a valid current value (else fall back to [`DEFAULT_MAX_VIEWS`]), and
/// THREAD keeps whatever was there. `_previous` is accepted so callers can
/// pass the transition they observed, but never changes the result.
pub fn derive_max_views(
    ticket_type: TicketType,
    current: Option<u32>,
    _previous: Option<TicketType>,
) -> Option<u32> {
    match max_views_policy(ticket_type) {
        MaxViewsPolicy::Fixed(n) => Some(n),
        MaxViewsPolicy::Required => match current {
            Some(v) if v >= MIN_MAX_VIEWS => Some(v),
            _ => Some(DEFAULT_MAX_VIEWS),
        },
        MaxViewsPolicy::Free => current,
    }
}

/// Clamp a view limit into `[MIN_MAX_VIEWS, MAX_MAX_VIEWS]`.
pub fn clamp_max_views(value: i64) -> u32 {
    // Bounds fit in u32, so the cast after clamping is lossless.
    value.clamp(i64::from(MIN_MAX_VIEWS), i64::from(MAX_MAX_VIEWS)) as u32
}

/// Interpret raw view-limit input. Non-numeric input maps to 1.
pub fn parse_max_views(input: &str) -> u32 {
    let input = input.trim();
    if let Ok(value) = input.parse::<i64>() {
        return clamp_max_views(value);
    }
    match input.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            // Saturating float-to-int cast, then clamp.
            clamp_max_views(value.trunc() as i64)
        }
        _ => MIN_MAX_VIEWS,
    }
}

/// Check a creation request against the policy of its ticket type.
///
/// Checks run in this order: view limit, reply permission, passkey count,
/// blank passkeys. The first failure is returned.
pub fn validate_for_submission(request: &TicketCreationRequest) -> Result<(), ValidationError> {
    let ticket_type = request.ticket_type;

    match max_views_policy(ticket_type) {
        MaxViewsPolicy::Required => match request.max_views {
            None => return Err(ValidationError::MissingMaxViews(ticket_type)),
            Some(v) if !(MIN_MAX_VIEWS..=MAX_MAX_VIEWS).contains(&v) => {
                return Err(ValidationError::MaxViewsOutOfRange(v));
            }
            Some(_) => {}
        },
        MaxViewsPolicy::Fixed(expected) if request.max_views != Some(expected) => {
            return Err(ValidationError::MaxViewsMismatch {
                ticket_type,
                expected,
                found: request.max_views,
            });
        }
        MaxViewsPolicy::Fixed(_) | MaxViewsPolicy::Free => {}
    }

    let expected = replies_allowed(ticket_type);
    if request.allow_replies != expected {
        return Err(ValidationError::RepliesPolicyMismatch {
            ticket_type,
            expected,
        });
    }

    validate_passkeys(&request.passkeys)
}

/// Passkey count must be within `[MIN_PASSKEYS, MAX_PASSKEYS]` and no entry
/// may be blank.
pub fn validate_passkeys<S: AsRef<str>>(passkeys: &[S]) -> Result<(), ValidationError> {
    let count = passkeys.len();
    if !(MIN_PASSKEYS..=MAX_PASSKEYS).contains(&count) {
        return Err(ValidationError::PasskeyCountOutOfRange { count });
    }
    if let Some(index) = passkeys.iter().position(|p| p.as_ref().trim().is_empty()) {
        return Err(ValidationError::EmptyPasskey { position: index + 1 });
    }
    Ok(())
}

/// Force the policy-derived fields of a request, then validate it.
///
/// Fixed view limits and `allow_replies` are overwritten from the policy;
/// Required and Free view limits are left as entered.
pub fn prepare_for_submission(
    mut request: TicketCreationRequest,
) -> Result<TicketCreationRequest, ValidationError> {
    if let MaxViewsPolicy::Fixed(n) = max_views_policy(request.ticket_type) {
        request.max_views = Some(n);
    }
    request.allow_replies = replies_allowed(request.ticket_type);
    validate_for_submission(&request)?;
    Ok(request)
}

/// Validate a ticket ID (UUID) as typed by a user.
///
/// Surrounding whitespace is ignored and hex digits may be upper case; the
/// returned [`Uuid`] always renders lower case.
pub fn validate_ticket_id(input: &str) -> Result<Uuid, ValidationError> {
    let input = input.trim();
    let groups: Vec<&str> = input.split('-').collect();
    let shape_ok = groups.len() == 5
        && groups
            .iter()
            .zip([8usize, 4, 4, 4, 12])
            .all(|(g, len)| g.len() == len && g.chars().all(|c| c.is_ascii_hexdigit()));
    if !shape_ok {
        return Err(ValidationError::InvalidTicketIdFormat);
    }
    Uuid::parse_str(input).map_err(|_| ValidationError::InvalidTicketIdFormat)
}
