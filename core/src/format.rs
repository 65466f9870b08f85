//! Text helpers for presenting tickets.

use crate::model::Timestamp;

/// Timestamp as shown to users, or "Not specified".
pub fn format_date(ts: Option<&Timestamp>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Not specified".to_string())
}

/// Length of an access window as "3d 4h", or "N/A" when either end is open.
pub fn window_duration(start: Option<&Timestamp>, end: Option<&Timestamp>) -> String {
    match (start, end) {
        (Some(start), Some(end)) => {
            let hours = (*end - *start).num_hours();
            format!("{}d {}h", hours / 24, hours % 24)
        }
        _ => "N/A".to_string(),
    }
}

/// One-line description of when a ticket can be opened.
pub fn access_window_summary(
    expires_at: Option<&Timestamp>,
    open_from: Option<&Timestamp>,
    open_until: Option<&Timestamp>,
) -> String {
    match (open_from, open_until, expires_at) {
        (Some(_), Some(_), _) => format!(
            "Access Window: {} - {}",
            format_date(open_from),
            format_date(open_until)
        ),
        (_, _, Some(_)) => format!("Expires At: {}", format_date(expires_at)),
        _ => "No expiration set".to_string(),
    }
}
