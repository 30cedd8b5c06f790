//! Error types for meeting finalization and page parsing.

/// Failures raised while turning a scraped page into [`Meeting`](crate::models::Meeting) records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeetingError {
    /// A draft reached finalization without a start timestamp.
    #[error("meeting {title:?} has no start time")]
    MissingStart {
        /// Title of the offending draft, for logs.
        title: String,
    },
    /// A string the spider relies on (usually a known address) is gone from
    /// the page, which means the agency changed its layout.
    #[error("page layout changed: {landmark:?} not found")]
    LayoutChanged {
        /// The landmark that could not be found.
        landmark: String,
    },
    /// A CSS selector failed to compile.
    #[error("invalid CSS selector: {0}")]
    Selector(String),
}
