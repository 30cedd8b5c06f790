//! JSON output of finalized meetings.
//!
//! Each run writes one file per agency, stamped with the local time of the
//! run:
//! ```text
//! output_dir/
//! └── chi_ssa_1/
//!     ├── 20181012_1200.json
//!     └── 20181019_1200.json
//! ```
//!
//! Files hold a pretty-printed array of [`Meeting`] records. Consumers key
//! them by `id`.

use crate::models::Meeting;
use chrono::Local;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// File name for a run started at the current local time.
pub fn run_file_name() -> String {
    format!("{}.json", Local::now().format("%Y%m%d_%H%M"))
}

/// Write `meetings` under `{output_dir}/{agency_slug}/` using `file_name`.
///
/// # Returns
///
/// The path of the written file.
#[instrument(level = "info", skip(meetings), fields(count = meetings.len()))]
pub async fn write_meetings_as(
    meetings: &[Meeting],
    agency_slug: &str,
    output_dir: &Path,
    file_name: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(meetings)?;

    let agency_dir = output_dir.join(agency_slug);
    if let Err(e) = fs::create_dir_all(&agency_dir).await {
        error!(dir = %agency_dir.display(), error = %e, "Failed to create output dir");
        return Err(e.into());
    }

    let path = agency_dir.join(file_name);
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote meetings JSON");
    Ok(path)
}

/// Write `meetings` to `{output_dir}/{agency_slug}/{YYYYmmdd_HHMM}.json`.
pub async fn write_meetings(
    meetings: &[Meeting],
    agency_slug: &str,
    output_dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    write_meetings_as(meetings, agency_slug, output_dir, &run_file_name()).await
}
