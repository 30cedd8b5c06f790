//! Stable meeting identifiers.
//!
//! An id has the shape `{agency}/{YYYYmmddHHMM}/{identifier}/{title_slug}`,
//! e.g. `chi_ssa_1/201801161400/x/state_street_commission`. The same agency,
//! start and title always produce the same id, which is what downstream
//! stores upsert on. Two distinct meetings sharing all three collide and are
//! treated as one event.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder segment used when a spider supplies no identifier.
pub const DEFAULT_IDENTIFIER: &str = "x";

/// Shape every derived id must match.
pub static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.+/\d{12}/.+/.+$").expect("valid id pattern"));

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("valid slug pattern"));

/// Convert a title to its id slug.
///
/// Runs of anything other than ASCII letters and digits collapse to a single
/// underscore, the result is lowercased, and underscores are trimmed from
/// both ends. Applying it twice changes nothing.
///
/// # Examples
///
/// ```
/// use meeting_scrapers::identity::slugify;
///
/// assert_eq!(slugify("State Street Commission"), "state_street_commission");
/// assert_eq!(slugify("  Board -- Special Meeting! "), "board_special_meeting");
/// ```
pub fn slugify(title: &str) -> String {
    NON_ALPHANUMERIC
        .replace_all(title, "_")
        .to_lowercase()
        .trim_matches('_')
        .to_string()
}

/// Derive the id for a meeting.
///
/// `identifier` replaces the `x` segment when present and non-empty; any
/// `/` inside it becomes `-` so the id keeps exactly four segments before
/// the slug.
pub fn meeting_id(
    agency_slug: &str,
    start: &NaiveDateTime,
    title: &str,
    identifier: Option<&str>,
) -> String {
    let segment = identifier
        .filter(|value| !value.is_empty())
        .map(|value| value.replace('/', "-"))
        .unwrap_or_else(|| DEFAULT_IDENTIFIER.to_string());

    format!(
        "{}/{}/{}/{}",
        agency_slug,
        start.format("%Y%m%d%H%M"),
        segment,
        slugify(title)
    )
}
