//! # Meeting Scrapers
//!
//! Batch front end for the meeting core: turns a spider's scraped drafts into
//! finalized, deduplicated meetings, reports how complete they are, and
//! writes them as JSON per agency.
//!
//! ## Usage
//!
//! ```sh
//! meeting_scrapers process -i drafts.json -a chi_ssa_1 -o ./output
//! meeting_scrapers validate -i output/chi_ssa_1/20181012_1200.json
//! meeting_scrapers id -a chi_ssa_1 -s 2018-01-16T14:00:00 -t "State Street Commission"
//! ```
//!
//! ## Architecture
//!
//! `process` follows a pipeline:
//! 1. **Loading**: read drafts from JSON
//! 2. **Finalizing**: derive `id` and `status` in the agency's timezone
//! 3. **Merging**: collapse records sharing an id
//! 4. **Output**: log a validation summary and write the JSON file

use chrono::{Local, NaiveDateTime};
use clap::Parser;
use meeting_scrapers::config::{parse_timezone, Config};
use meeting_scrapers::identity::meeting_id;
use meeting_scrapers::outputs::json;
use meeting_scrapers::pipeline::{finalize_all, load_drafts, load_meetings, merge_duplicates};
use meeting_scrapers::utils::ensure_writable_dir;
use meeting_scrapers::validation::{validate_batch, ValidationSummary};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;

use cli::{Cli, Command};

const DEFAULT_OUTPUT_DIR: &str = "output";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match &args.config {
        Some(path) => {
            let config = Config::load(path)?;
            info!(path = %path.display(), agencies = config.agencies.len(), "Loaded configuration");
            config
        }
        None => Config::default(),
    };

    match args.command {
        Command::Process {
            input,
            agency,
            timezone,
            output_dir,
            now,
        } => {
            let output_dir = output_dir
                .or_else(|| config.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
            let timezone = timezone.as_deref().map(parse_timezone).transpose()?;
            process(&config, &input, &agency, timezone, &output_dir, now).await?;
        }
        Command::Validate {
            input,
            threshold,
            now,
        } => {
            let now = now.unwrap_or_else(|| Local::now().naive_local());
            let meetings = load_meetings(&input).await?;
            let summary = ValidationSummary::from_records(&validate_batch(&meetings, now));
            print!("{summary}");

            let failing = summary.failing_fields(threshold);
            if !failing.is_empty() {
                error!(?failing, threshold, "Validation below threshold");
                return Err(format!(
                    "fields below {:.0}%: {}",
                    threshold * 100.0,
                    failing.join(", ")
                )
                .into());
            }
            info!(total = summary.total, "Validation passed");
        }
        Command::Id {
            agency,
            start,
            title,
            identifier,
        } => {
            println!("{}", meeting_id(&agency, &start, &title, identifier.as_deref()));
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

#[instrument(level = "info", skip_all, fields(input = %input.display(), agency = %agency_slug))]
async fn process(
    config: &Config,
    input: &Path,
    agency_slug: &str,
    timezone: Option<chrono_tz::Tz>,
    output_dir: &Path,
    now: Option<NaiveDateTime>,
) -> Result<(), Box<dyn Error>> {
    // Early check: fail before doing any work if output can't be written
    if let Err(e) = ensure_writable_dir(output_dir).await {
        error!(
            path = %output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let agency = config.resolve_agency(agency_slug, timezone);
    let now = now.unwrap_or_else(|| agency.now());
    info!(agency = %agency.slug, timezone = %agency.timezone, %now, "Resolved agency");

    let drafts = load_drafts(input).await?;
    let finalized = finalize_all(&agency, drafts, now);
    if finalized.skipped > 0 {
        warn!(skipped = finalized.skipped, "Some drafts could not be finalized");
    }

    let meetings = merge_duplicates(finalized.meetings);

    let summary = ValidationSummary::from_records(&validate_batch(&meetings, now));
    for (field, rate) in &summary.rates {
        info!(field = *field, rate = %format!("{:.0}%", rate * 100.0), "Field pass rate");
    }

    let path = json::write_meetings(&meetings, &agency.slug, output_dir).await?;
    info!(path = %path.display(), count = meetings.len(), "Process complete");
    Ok(())
}
