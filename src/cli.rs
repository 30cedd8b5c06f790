//! Command-line interface definitions.
//!
//! Options that make sense across runs can also come from the environment
//! or from the YAML file given with `--config`.

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Finalize, validate and export scraped public meetings.
///
/// # Examples
///
/// ```sh
/// # Finalize a spider's drafts and write them under ./output/chi_ssa_1/
/// meeting_scrapers process -i drafts.json -a chi_ssa_1 -o ./output
///
/// # Check a finished export
/// meeting_scrapers validate -i output/chi_ssa_1/20181012_1200.json
///
/// # Print the id a meeting would get
/// meeting_scrapers id -a chi_ssa_1 -s 2018-01-16T14:00:00 -t "State Street Commission"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config listing agencies
    #[arg(short, long, global = true, env = "MEETING_SCRAPERS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assign ids and statuses to scraped drafts, merge duplicates and write JSON
    Process {
        /// JSON array of scraped meeting drafts
        #[arg(short, long)]
        input: PathBuf,

        /// Agency slug used as the id prefix
        #[arg(short, long)]
        agency: String,

        /// IANA timezone of the agency (overrides the config file)
        #[arg(long)]
        timezone: Option<String>,

        /// Output directory (falls back to the config file, then ./output)
        #[arg(short, long, env = "MEETING_SCRAPERS_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,

        /// Treat this agency-local time as "now" instead of the wall clock
        #[arg(long)]
        now: Option<NaiveDateTime>,
    },

    /// Report per-field pass rates for a JSON array of finalized meetings
    Validate {
        /// JSON array of meetings
        #[arg(short, long)]
        input: PathBuf,

        /// Minimum pass rate required for every field
        #[arg(long, default_value_t = meeting_scrapers::validation::PASS_THRESHOLD)]
        threshold: f64,

        /// Treat this time as "now" when skipping past meetings
        #[arg(long)]
        now: Option<NaiveDateTime>,
    },

    /// Print the id derived for one meeting
    Id {
        /// Agency slug
        #[arg(short, long)]
        agency: String,

        /// Start time, e.g. 2018-01-16T14:00:00
        #[arg(short, long)]
        start: NaiveDateTime,

        /// Meeting title
        #[arg(short, long)]
        title: String,

        /// Optional segment replacing the default `x`
        #[arg(long)]
        identifier: Option<String>,
    },
}
