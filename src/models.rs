//! Data models for scraped public meetings.
//!
//! This module defines the records that flow through every spider:
//! - [`ScrapedMeeting`]: the authored draft a spider produces from a page
//! - [`Meeting`]: the finalized record, carrying a derived `id` and `status`
//! - [`Agency`]: who published the meeting, and in which timezone
//! - Supporting types: [`Classification`], [`Status`], [`Location`], [`Link`]
//!
//! Timestamps are naive and agency-local; they serialize without an offset,
//! e.g. `2018-01-16T14:00:00`.

use crate::error::MeetingError;
use crate::identity::meeting_id;
use crate::status::derive_status;
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of body holding a meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "Advisory Committee")]
    AdvisoryCommittee,
    Board,
    #[serde(rename = "City Council")]
    CityCouncil,
    Commission,
    Committee,
    Forum,
    #[serde(rename = "Police Beat")]
    PoliceBeat,
    #[default]
    #[serde(rename = "Not classified")]
    NotClassified,
}

impl Classification {
    /// The label used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::AdvisoryCommittee => "Advisory Committee",
            Classification::Board => "Board",
            Classification::CityCouncil => "City Council",
            Classification::Commission => "Commission",
            Classification::Committee => "Committee",
            Classification::Forum => "Forum",
            Classification::PoliceBeat => "Police Beat",
            Classification::NotClassified => "Not classified",
        }
    }

    /// Guess a classification from a meeting title.
    ///
    /// More specific phrases are checked first, so "Advisory Committee"
    /// wins over "Committee" and "City Council" over a bare "Council".
    ///
    /// # Examples
    ///
    /// ```
    /// use meeting_scrapers::models::Classification;
    ///
    /// assert_eq!(Classification::from_title("Finance Committee"), Classification::Committee);
    /// assert_eq!(Classification::from_title("Open House"), Classification::NotClassified);
    /// ```
    pub fn from_title(title: &str) -> Self {
        let lowered = title.to_lowercase();
        if lowered.contains("advisory") {
            Classification::AdvisoryCommittee
        } else if lowered.contains("city council") {
            Classification::CityCouncil
        } else if lowered.contains("beat") {
            Classification::PoliceBeat
        } else if lowered.contains("committee") {
            Classification::Committee
        } else if lowered.contains("board") {
            Classification::Board
        } else if lowered.contains("commission") {
            Classification::Commission
        } else if lowered.contains("forum") || lowered.contains("hearing") {
            Classification::Forum
        } else {
            Classification::NotClassified
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle label derived for a meeting.
///
/// The variant order is merge precedence: when two records describe the
/// same meeting, the greater status wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Tentative,
    Confirmed,
    Passed,
    Cancelled,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Status::Tentative => "tentative",
            Status::Confirmed => "confirmed",
            Status::Passed => "passed",
            Status::Cancelled => "cancelled",
        };
        f.write_str(value)
    }
}

/// Where a meeting is held. Either half may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
}

/// A document attached to a meeting (agenda, minutes, notice).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub title: String,
    pub href: String,
}

impl Link {
    pub fn new(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
        }
    }
}

/// The publishing agency.
///
/// `slug` prefixes every meeting id; `timezone` decides what "now" means
/// when a meeting is classified as passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agency {
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
}

fn default_timezone() -> Tz {
    chrono_tz::America::Chicago
}

impl Agency {
    pub fn new(slug: impl Into<String>, name: impl Into<String>, timezone: Tz) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            timezone,
        }
    }

    /// Current wall-clock time in the agency's timezone, without offset.
    pub fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }
}

/// A meeting as authored by a spider, before identity and status exist.
///
/// `status_text` is the free-text snippet scanned for cancellations and
/// `identifier` optionally replaces the `x` segment of the id. Both are
/// consumed by [`Meeting::from_scraped`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedMeeting {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub classification: Classification,
    #[serde(default)]
    pub start: Option<NaiveDateTime>,
    #[serde(default)]
    pub end: Option<NaiveDateTime>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub time_notes: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

/// The canonical output record.
///
/// Inside a run, meetings come from [`Meeting::from_scraped`] and are then
/// combined by [`merge_duplicates`](crate::pipeline::merge_duplicates). The
/// only other source is deserializing a file those steps already wrote, as
/// [`load_meetings`](crate::pipeline::load_meetings) does. Fields are public
/// for reading; editing `start`, `title` or `links` by hand leaves `id` and
/// `status` stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub description: String,
    pub classification: Classification,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub all_day: bool,
    pub time_notes: String,
    pub location: Location,
    pub links: Vec<Link>,
    pub source: String,
    pub status: Status,
}

impl Meeting {
    /// Finalize a draft: derive its id and status.
    ///
    /// # Errors
    ///
    /// Returns [`MeetingError::MissingStart`] when the draft has no start.
    pub fn from_scraped(
        agency: &Agency,
        scraped: ScrapedMeeting,
        now: NaiveDateTime,
    ) -> Result<Self, MeetingError> {
        let start = scraped.start.ok_or_else(|| MeetingError::MissingStart {
            title: scraped.title.clone(),
        })?;

        let id = meeting_id(
            &agency.slug,
            &start,
            &scraped.title,
            scraped.identifier.as_deref(),
        );
        let status = derive_status(
            &start,
            !scraped.links.is_empty(),
            scraped.status_text.as_deref(),
            &now,
        );

        Ok(Self {
            id,
            title: scraped.title,
            description: scraped.description,
            classification: scraped.classification,
            start,
            end: scraped.end,
            all_day: scraped.all_day,
            time_notes: scraped.time_notes,
            location: scraped.location,
            links: scraped.links,
            source: scraped.source,
            status,
        })
    }
}
