//! Parsing recipes shared across families of spiders.
//!
//! Agency sites rarely agree on markup, but the same handful of chores keeps
//! coming back: pulling "January 16, 2018" out of a sentence, reading
//! "2:30 p.m.", matching minutes posted on a separate list to the meeting
//! they belong to, and noticing when a page no longer looks the way a
//! spider expects. These helpers cover those chores so spiders compose them
//! instead of copying regexes around.

use crate::error::MeetingError;
use crate::models::Link;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::collections::BTreeMap;
use url::Url;

static MONTH_DAY_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Za-z]{3,9})\.? (\d{1,2}),? (\d{4})\b").expect("valid date pattern")
});

static MONTH_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Za-z]{3,10})\.? (\d{1,2})\b").expect("valid date pattern"));

static CLOCK_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*([ap])\.?\s?m\b\.?").expect("valid time pattern")
});

static NOON: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bnoon\b").expect("valid noon pattern"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Compile a CSS selector.
pub fn selector(css: &str) -> Result<Selector, MeetingError> {
    Selector::parse(css).map_err(|e| MeetingError::Selector(format!("{css}: {e:?}")))
}

/// All text beneath an element, with whitespace runs collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Trim and collapse internal whitespace to single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

fn month_date(month: &str, day: &str, year: i32) -> Option<NaiveDate> {
    // chrono's %B takes full names and three-letter abbreviations only
    let month = if month.eq_ignore_ascii_case("sept") { "Sep" } else { month };
    NaiveDate::parse_from_str(&format!("{month} {day} {year}"), "%B %d %Y").ok()
}

/// Find the first `Month D, YYYY` date in `text`.
///
/// Month names may be spelled out or abbreviated, with or without a
/// trailing period (`Jan.`, `Sept.`, `December`). Candidates that are not a
/// real month are skipped, so "Room 12, 2018" does not stop the search.
///
/// # Arguments
///
/// * `text` - Free text such as a list item or heading
///
/// # Returns
///
/// The first valid date found, or `None`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use meeting_scrapers::parsing::parse_month_day_year;
///
/// assert_eq!(
///     parse_month_day_year("Minutes: January 16, 2018 (PDF)"),
///     NaiveDate::from_ymd_opt(2018, 1, 16)
/// );
/// ```
pub fn parse_month_day_year(text: &str) -> Option<NaiveDate> {
    MONTH_DAY_YEAR.captures_iter(text).find_map(|caps| {
        let year = caps[3].parse().ok()?;
        month_date(&caps[1], &caps[2], year)
    })
}

/// Find the first `Month D` in `text` and pin it to `year`.
///
/// Used where a page groups meetings under a year heading and only lists
/// month and day per entry. The day must stand alone, so "March 2019" is
/// not read as March 20.
///
/// # Arguments
///
/// * `text` - Entry text such as `"Emergency Meeting - Aug 30"`
/// * `year` - Year taken from the surrounding heading
///
/// # Returns
///
/// The first valid date found, or `None`.
pub fn parse_month_day(text: &str, year: i32) -> Option<NaiveDate> {
    MONTH_DAY
        .captures_iter(text)
        .find_map(|caps| month_date(&caps[1], &caps[2], year))
}

/// Parse a clock time such as `2 pm`, `2:30 p.m.`, `10:00AM` or `noon`.
///
/// # Returns
///
/// The first clock time in `text`, falling back to 12:00 when the word
/// "noon" appears, or `None` when neither is present.
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    if let Some(caps) = CLOCK_TIME.captures(text) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps.get(2).map_or(Ok(0), |m| m.as_str().parse()).ok()?;
        if !(1..=12).contains(&hour) {
            return None;
        }
        let pm = caps[3].eq_ignore_ascii_case("p");
        let hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
        return NaiveTime::from_hms_opt(hour, minute, 0);
    }
    if NOON.is_match(text) {
        return NaiveTime::from_hms_opt(12, 0, 0);
    }
    None
}

/// Fail with [`MeetingError::LayoutChanged`] when `landmark` is missing.
///
/// Spiders that hard-code a location check that the address still appears
/// on the page; if it vanished, the hard-coded value is probably stale too.
pub fn require_landmark(page_text: &str, landmark: &str) -> Result<(), MeetingError> {
    if page_text.contains(landmark) {
        Ok(())
    } else {
        Err(MeetingError::LayoutChanged {
            landmark: landmark.to_string(),
        })
    }
}

/// Resolve `href` against the page it was found on.
pub fn absolute_url(base: &str, href: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    base.join(href.trim()).ok().map(|url| url.to_string())
}

/// Documents keyed by the start of the meeting they belong to.
///
/// Many agencies post agendas and minutes in a separate list from the
/// meeting calendar. Collect them here first, then hand each meeting the
/// links for its start time.
#[derive(Debug, Clone, Default)]
pub struct LinkIndex {
    links: BTreeMap<NaiveDateTime, Vec<Link>>,
}

impl LinkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a link to `start`; a repeated href for the same start is ignored.
    pub fn insert(&mut self, start: NaiveDateTime, link: Link) {
        let entry = self.links.entry(start).or_default();
        if !entry.iter().any(|existing| existing.href == link.href) {
            entry.push(link);
        }
    }

    /// Links recorded for `start`, in insertion order.
    pub fn links_for(&self, start: &NaiveDateTime) -> Vec<Link> {
        self.links.get(start).cloned().unwrap_or_default()
    }

    /// Every start that has at least one link, in chronological order.
    pub fn starts(&self) -> impl Iterator<Item = &NaiveDateTime> {
        self.links.keys()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_month_day_year() {
        assert_eq!(parse_month_day_year("January 16, 2018"), Some(date(2018, 1, 16)));
        assert_eq!(
            parse_month_day_year("Regular meeting on Sep. 4, 2018 at 2pm"),
            Some(date(2018, 9, 4))
        );
        assert_eq!(parse_month_day_year("Meeting: Dec 3 2019"), Some(date(2019, 12, 3)));
        assert_eq!(parse_month_day_year("no date here"), None);
    }

    #[test]
    fn test_parse_sept_abbreviation() {
        assert_eq!(parse_month_day_year("Sept. 4, 2018"), Some(date(2018, 9, 4)));
        assert_eq!(parse_month_day_year("SEPT 4, 2018"), Some(date(2018, 9, 4)));
        assert_eq!(
            parse_month_day_year("September 4, 2018"),
            Some(date(2018, 9, 4))
        );
        assert_eq!(parse_month_day("Sept 18", 2018), Some(date(2018, 9, 18)));
    }

    #[test]
    fn test_parse_month_day_year_skips_non_month_words() {
        assert_eq!(
            parse_month_day_year("Room 12, 2018 session held March 5, 2018"),
            Some(date(2018, 3, 5))
        );
    }

    #[test]
    fn test_parse_month_day() {
        assert_eq!(parse_month_day("February 7", 2019), Some(date(2019, 2, 7)));
        assert_eq!(parse_month_day("Emergency Meeting - Aug 30", 2018), Some(date(2018, 8, 30)));
        assert_eq!(parse_month_day("Agenda", 2018), None);
    }

    #[test]
    fn test_parse_month_day_ignores_month_year_headings() {
        assert_eq!(parse_month_day("Minutes - March 2019", 2019), None);
        assert_eq!(
            parse_month_day("March 2019 Minutes, posted March 5", 2019),
            Some(date(2019, 3, 5))
        );
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("2 pm"), NaiveTime::from_hms_opt(14, 0, 0));
        assert_eq!(parse_time("at 2:30 p.m."), NaiveTime::from_hms_opt(14, 30, 0));
        assert_eq!(parse_time("10:00AM"), NaiveTime::from_hms_opt(10, 0, 0));
        assert_eq!(parse_time("12:15 am"), NaiveTime::from_hms_opt(0, 15, 0));
        assert_eq!(parse_time("12 p.m."), NaiveTime::from_hms_opt(12, 0, 0));
        assert_eq!(parse_time("Noon"), NaiveTime::from_hms_opt(12, 0, 0));
        assert_eq!(parse_time("TBD"), None);
    }

    #[test]
    fn test_require_landmark() {
        assert!(require_landmark("Meet at 190 N. State St.", "190 N. State St.").is_ok());
        assert_eq!(
            require_landmark("Meet at City Hall", "190 N. State St."),
            Err(MeetingError::LayoutChanged {
                landmark: "190 N. State St.".to_string()
            })
        );
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            absolute_url("https://loopchicago.com/about/", "/assets/minutes.pdf").as_deref(),
            Some("https://loopchicago.com/assets/minutes.pdf")
        );
        assert_eq!(
            absolute_url("https://example.gov/a/b", "c.pdf").as_deref(),
            Some("https://example.gov/a/c.pdf")
        );
        assert_eq!(absolute_url("not a url", "c.pdf"), None);
    }

    #[test]
    fn test_element_text_collapses_whitespace() {
        let html = Html::parse_fragment("<li>  January 16,\n   2018 <a>Minutes</a></li>");
        let li = html.select(&selector("li").unwrap()).next().unwrap();
        assert_eq!(element_text(li), "January 16, 2018 Minutes");
    }

    #[test]
    fn test_selector_error() {
        assert!(matches!(selector("li[["), Err(MeetingError::Selector(_))));
    }

    #[test]
    fn test_link_index() {
        let start = date(2018, 3, 1).and_hms_opt(14, 0, 0).unwrap();
        let other = date(2018, 4, 1).and_hms_opt(14, 0, 0).unwrap();
        let mut index = LinkIndex::new();
        index.insert(start, Link::new("Agenda", "https://example.gov/agenda.pdf"));
        index.insert(start, Link::new("Minutes", "https://example.gov/minutes.pdf"));
        index.insert(start, Link::new("Agenda", "https://example.gov/agenda.pdf"));

        let links = index.links_for(&start);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].title, "Agenda");
        assert_eq!(links[1].title, "Minutes");
        assert!(index.links_for(&other).is_empty());
        assert_eq!(index.len(), 1);
        assert_eq!(index.starts().collect::<Vec<_>>(), vec![&start]);
    }
}
