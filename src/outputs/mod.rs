//! Output writers for finalized meetings.
//!
//! # Submodules
//!
//! - [`json`]: writes one JSON array of meetings per agency and run

pub mod json;
