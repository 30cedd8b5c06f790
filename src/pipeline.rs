//! Batch processing of scraped drafts.
//!
//! The pipeline has three steps:
//! 1. **Finalize**: derive `id` and `status` for every draft ([`finalize_all`])
//! 2. **Merge**: collapse records sharing an id ([`merge_duplicates`])
//! 3. **Validate**: see [`crate::validation`]
//!
//! Drafts that cannot be finalized are logged and counted, never fatal for
//! the rest of the batch.

use crate::models::{Agency, Meeting, ScrapedMeeting};
use crate::utils::{looks_truncated, truncate_for_log};
use chrono::NaiveDateTime;
use itertools::Itertools;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Result of finalizing a batch of drafts.
#[derive(Debug, Default)]
pub struct Finalized {
    /// Meetings that received an id and status.
    pub meetings: Vec<Meeting>,
    /// Drafts dropped because they could not be finalized.
    pub skipped: usize,
}

/// Finalize every draft against `agency`, skipping the ones that fail.
///
/// # Arguments
///
/// * `agency` - Agency whose slug prefixes every id
/// * `drafts` - Drafts as authored by a spider
/// * `now` - Agency-local time used for status derivation
///
/// # Returns
///
/// The finalized meetings, in draft order, and how many drafts were skipped.
#[instrument(level = "info", skip_all, fields(agency = %agency.slug, drafts = drafts.len()))]
pub fn finalize_all(agency: &Agency, drafts: Vec<ScrapedMeeting>, now: NaiveDateTime) -> Finalized {
    let mut finalized = Finalized::default();
    for (index, draft) in drafts.into_iter().enumerate() {
        match Meeting::from_scraped(agency, draft, now) {
            Ok(meeting) => finalized.meetings.push(meeting),
            Err(e) => {
                warn!(index, error = %e, "Skipping draft");
                finalized.skipped += 1;
            }
        }
    }
    info!(
        finalized = finalized.meetings.len(),
        skipped = finalized.skipped,
        "Finalized drafts"
    );
    finalized
}

/// Collapse meetings that share an id into the first one seen.
///
/// A shared id means the same logical event was listed more than once,
/// typically once per attached document. The merged record keeps the
/// earliest `start` (ids only resolve to the minute), unions links by href
/// in the order encountered, and takes the highest status by precedence
/// (cancelled over passed over confirmed over tentative). With the earliest
/// start kept, that status is the one deriving it again on the merged
/// record would give.
///
/// # Arguments
///
/// * `meetings` - Finalized meetings, in the order they were scraped
///
/// # Returns
///
/// One meeting per distinct id, in first-seen order.
pub fn merge_duplicates(meetings: Vec<Meeting>) -> Vec<Meeting> {
    let before = meetings.len();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<Meeting> = Vec::with_capacity(before);

    for meeting in meetings {
        match positions.get(&meeting.id).copied() {
            Some(position) => {
                let kept = &mut merged[position];
                kept.links = std::mem::take(&mut kept.links)
                    .into_iter()
                    .chain(meeting.links)
                    .unique_by(|link| link.href.clone())
                    .collect();
                kept.start = kept.start.min(meeting.start);
                kept.status = kept.status.max(meeting.status);
            }
            None => {
                positions.insert(meeting.id.clone(), merged.len());
                merged.push(meeting);
            }
        }
    }

    if merged.len() != before {
        debug!(before, after = merged.len(), "Merged duplicate meetings");
    }
    merged
}

async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, Box<dyn Error>> {
    let raw = fs::read_to_string(path).await?;
    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => {
            info!(path = %path.display(), count = items.len(), "Loaded items");
            Ok(items)
        }
        Err(e) if looks_truncated(&e) => {
            warn!(
                path = %path.display(),
                tail = %truncate_for_log(raw.get(raw.len().saturating_sub(80)..).unwrap_or(""), 80),
                "Input ends early"
            );
            Err(format!("{} looks truncated: {e}", path.display()).into())
        }
        Err(e) => Err(format!("{} is not a valid item list: {e}", path.display()).into()),
    }
}

/// Read a JSON array of drafts.
///
/// # Errors
///
/// Fails when the file cannot be read or is not a JSON array of drafts; the
/// message says so when the file looks cut off.
pub async fn load_drafts(path: &Path) -> Result<Vec<ScrapedMeeting>, Box<dyn Error>> {
    load_json(path).await
}

/// Read a JSON array of finalized meetings.
pub async fn load_meetings(path: &Path) -> Result<Vec<Meeting>, Box<dyn Error>> {
    load_json(path).await
}
