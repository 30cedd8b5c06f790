//! Status derivation for meetings.
//!
//! Rules, in order:
//! 1. snippet text mentioning "cancel" (any case) → [`Status::Cancelled`]
//! 2. start strictly before now → [`Status::Passed`]
//! 3. at least one link posted → [`Status::Confirmed`]
//! 4. otherwise → [`Status::Tentative`]
//!
//! Without snippet text a cancellation cannot be detected.

use crate::models::Status;
use chrono::NaiveDateTime;

/// Substring that marks a meeting as called off.
pub const CANCELLATION_KEYWORD: &str = "cancel";

/// Whether a snippet announces a cancellation.
pub fn is_cancelled(text: &str) -> bool {
    text.to_lowercase().contains(CANCELLATION_KEYWORD)
}

/// Derive the status of a meeting starting at `start`.
///
/// `now` must be expressed in the same (agency-local) clock as `start`.
pub fn derive_status(
    start: &NaiveDateTime,
    has_links: bool,
    text: Option<&str>,
    now: &NaiveDateTime,
) -> Status {
    if text.is_some_and(is_cancelled) {
        Status::Cancelled
    } else if start < now {
        Status::Passed
    } else if has_links {
        Status::Confirmed
    } else {
        Status::Tentative
    }
}
