//! # Meeting Scrapers
//!
//! Shared core for public-meeting spiders. Each agency spider is a small,
//! bespoke parser; what they share lives here:
//!
//! - a normalized [`Meeting`](models::Meeting) record
//! - a stable, human-traceable id (`chi_ssa_1/201801161400/x/state_street_commission`)
//! - status derivation (tentative, confirmed, cancelled, passed)
//! - parsing recipes reused by families of spiders
//! - a batch pipeline that finalizes, merges, validates and writes records
//!
//! ## Architecture
//!
//! 1. **Parsing**: a [`Spider`](spider::Spider) turns a page into drafts
//! 2. **Finalizing**: drafts receive an `id` and `status`
//! 3. **Merging**: records sharing an id collapse into one
//! 4. **Output**: validation summary and JSON files per agency

pub mod config;
pub mod crawl;
pub mod error;
pub mod identity;
pub mod models;
pub mod outputs;
pub mod parsing;
pub mod pipeline;
pub mod spider;
pub mod status;
pub mod utils;
pub mod validation;

pub use error::MeetingError;
pub use models::{Agency, Classification, Link, Location, Meeting, ScrapedMeeting, Status};
pub use spider::Spider;
