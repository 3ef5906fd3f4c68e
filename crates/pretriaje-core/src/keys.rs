//! Object key conventions.
//!
//! Pure string functions. These define the on-disk layout used by the file
//! store: one JSON document per record, grouped by record kind.

use uuid::Uuid;

pub const SESSIONS_PREFIX: &str = "sessions/";
pub const REPORTS_PREFIX: &str = "reports/";

pub fn session(id: Uuid) -> String {
    format!("sessions/{id}.json")
}

pub fn report(id: Uuid) -> String {
    format!("reports/{id}.json")
}

/// Campaign ids are free-form slugs, so callers must check them with
/// [`is_valid_campaign_id`] before building a key.
pub fn campaign(id: &str) -> String {
    format!("campaigns/{id}.json")
}

/// Campaign ids may only contain ASCII letters, digits, `-` and `_`.
pub fn is_valid_campaign_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
