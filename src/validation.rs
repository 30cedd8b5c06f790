//! Schema checks for finalized meetings.
//!
//! Every upcoming meeting gets a set of pass/fail flags, one per field
//! below. A batch passes when each field's pass rate reaches
//! [`PASS_THRESHOLD`].
//!
//! | Field | Rule |
//! |-------|------|
//! | `id` | non-empty and shaped like `agency/YYYYmmddHHMM/x/slug` |
//! | `title` | non-blank |
//! | `end` | absent, or not earlier than `start` |
//! | `location_address` | non-blank |
//! | `links` | every link has a title and an href |
//! | `source` | an absolute URL |
//!
//! Meetings dated before today are skipped.

use crate::identity::ID_PATTERN;
use crate::models::Meeting;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Minimum share of records that must pass each field check.
pub const PASS_THRESHOLD: f64 = 0.9;

/// Field names, in report order.
pub const FIELDS: [&str; 6] = ["id", "title", "end", "location_address", "links", "source"];

/// Pass/fail flags for one meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRecord {
    pub id: String,
    pub fields: BTreeMap<&'static str, bool>,
}

impl ValidationRecord {
    pub fn is_valid(&self) -> bool {
        self.fields.values().all(|ok| *ok)
    }

    /// Names of the checks this record failed.
    pub fn failures(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|(_, ok)| !**ok)
            .map(|(field, _)| *field)
            .collect()
    }
}

/// Check one meeting against every field rule.
///
/// # Returns
///
/// A record with one flag per entry of [`FIELDS`]: a well-formed `id`, a
/// non-blank `title`, an `end` no earlier than `start`, a location address,
/// titled links with an href, and an absolute `source` URL.
pub fn validate(meeting: &Meeting) -> ValidationRecord {
    let mut fields = BTreeMap::new();
    fields.insert("id", !meeting.id.is_empty() && ID_PATTERN.is_match(&meeting.id));
    fields.insert("title", !meeting.title.trim().is_empty());
    fields.insert("end", meeting.end.is_none_or(|end| end >= meeting.start));
    fields.insert("location_address", !meeting.location.address.trim().is_empty());
    fields.insert(
        "links",
        meeting
            .links
            .iter()
            .all(|link| !link.title.trim().is_empty() && !link.href.trim().is_empty()),
    );
    fields.insert("source", Url::parse(&meeting.source).is_ok());

    ValidationRecord {
        id: meeting.id.clone(),
        fields,
    }
}

/// Validate every meeting dated today or later, as of `now`.
///
/// # Arguments
///
/// * `meetings` - Finalized meetings for one agency
/// * `now` - Agency-local time; meetings dated before its day are skipped
///
/// # Returns
///
/// One record per upcoming meeting, in input order.
pub fn validate_batch(meetings: &[Meeting], now: NaiveDateTime) -> Vec<ValidationRecord> {
    let today = now.date();
    meetings
        .iter()
        .filter(|meeting| meeting.start.date() >= today)
        .map(validate)
        .collect()
}

/// Per-field pass rates over a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationSummary {
    pub total: usize,
    pub rates: BTreeMap<&'static str, f64>,
}

impl ValidationSummary {
    pub fn from_records(records: &[ValidationRecord]) -> Self {
        let total = records.len();
        let rates = FIELDS
            .iter()
            .map(|field| {
                let passed = records
                    .iter()
                    .filter(|record| record.fields.get(field).copied().unwrap_or(false))
                    .count();
                let rate = if total == 0 {
                    1.0
                } else {
                    passed as f64 / total as f64
                };
                (*field, rate)
            })
            .collect();
        Self { total, rates }
    }

    /// Whether every field reaches `threshold`.
    pub fn passes(&self, threshold: f64) -> bool {
        self.failing_fields(threshold).is_empty()
    }

    /// Fields whose pass rate is below `threshold`.
    pub fn failing_fields(&self, threshold: f64) -> Vec<&'static str> {
        self.rates
            .iter()
            .filter(|(_, rate)| **rate < threshold)
            .map(|(field, _)| *field)
            .collect()
    }
}

impl fmt::Display for ValidationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validating {} items", self.total)?;
        for field in FIELDS {
            let rate = self.rates.get(field).copied().unwrap_or(0.0);
            writeln!(f, "{field}: {:.0}%", rate * 100.0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Agency, Link, Location, ScrapedMeeting};
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 2, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn meeting(title: &str, start: NaiveDateTime) -> Meeting {
        let agency = Agency::new("cook_board", "Cook County Board", chrono_tz::America::Chicago);
        let draft = ScrapedMeeting {
            title: title.to_string(),
            start: Some(start),
            location: Location {
                name: "County Building".to_string(),
                address: "118 N Clark St, Chicago, IL 60602".to_string(),
            },
            links: vec![Link::new("Agenda", "https://www.cookcountyil.gov/agenda.pdf")],
            source: "https://www.cookcountyil.gov/board".to_string(),
            ..Default::default()
        };
        Meeting::from_scraped(&agency, draft, now()).unwrap()
    }

    #[test]
    fn test_validate_good_meeting() {
        let record = validate(&meeting("Board of Commissioners", now() + Duration::days(1)));
        assert!(record.is_valid(), "failures: {:?}", record.failures());
        assert_eq!(record.fields.len(), FIELDS.len());
    }

    #[test]
    fn test_validate_flags_bad_fields() {
        let mut bad = meeting("!!!", now() + Duration::days(1));
        bad.location.address = "  ".to_string();
        bad.end = Some(bad.start - Duration::hours(1));
        bad.source = "/relative/path".to_string();
        bad.links.push(Link::new("", "https://www.cookcountyil.gov/x.pdf"));

        let record = validate(&bad);
        assert_eq!(
            record.failures(),
            vec!["end", "id", "links", "location_address", "source"]
        );
    }

    #[test]
    fn test_validate_batch_skips_past_meetings() {
        let meetings = vec![
            meeting("Board of Commissioners", now() - Duration::days(2)),
            meeting("Finance Committee", now() + Duration::days(2)),
            meeting("Earlier Today", now() - Duration::hours(2)),
        ];
        let records = validate_batch(&meetings, now());
        assert_eq!(records.len(), 2);
        assert!(records[0].id.ends_with("finance_committee"));
        assert!(records[1].id.ends_with("earlier_today"));
    }

    #[test]
    fn test_summary_threshold_is_inclusive() {
        let mut meetings: Vec<Meeting> = (0..10)
            .map(|day| meeting("Board of Commissioners", now() + Duration::days(day + 1)))
            .collect();
        meetings[3].title = String::new();

        let summary = ValidationSummary::from_records(&validate_batch(&meetings, now()));
        assert_eq!(summary.total, 10);
        assert!((summary.rates["title"] - 0.9).abs() < f64::EPSILON);
        assert!(summary.passes(PASS_THRESHOLD));

        meetings[4].title = " ".to_string();
        let summary = ValidationSummary::from_records(&validate_batch(&meetings, now()));
        assert_eq!(summary.failing_fields(PASS_THRESHOLD), vec!["title"]);
    }

    #[test]
    fn test_summary_empty_batch_passes() {
        let summary = ValidationSummary::from_records(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.passes(PASS_THRESHOLD));
    }

    #[test]
    fn test_summary_display() {
        let records = vec![validate(&meeting("Board of Commissioners", now()))];
        let text = ValidationSummary::from_records(&records).to_string();
        assert!(text.starts_with("Validating 1 items"));
        assert!(text.contains("title: 100%"));
    }
}
