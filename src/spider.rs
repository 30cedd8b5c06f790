//! The contract every agency spider implements.
//!
//! A spider knows three things: which [`Agency`] it scrapes, where that
//! agency publishes its calendar, and how to read one page of it into
//! [`ScrapedMeeting`] drafts. Identity and status are never authored by the
//! spider; [`Spider::meetings`] derives them uniformly for every agency.

use crate::error::MeetingError;
use crate::models::{Agency, Meeting, ScrapedMeeting};
use chrono::NaiveDateTime;
use scraper::Html;
use tracing::debug;

/// A site-specific scraping routine for one agency.
pub trait Spider {
    /// The agency this spider scrapes.
    fn agency(&self) -> &Agency;

    /// Pages to fetch and hand to [`Spider::parse`].
    fn start_urls(&self) -> Vec<String>;

    /// Extract meeting drafts from one fetched page.
    ///
    /// `source` is the URL the page came from; it belongs in each draft's
    /// `source` field.
    fn parse(&self, document: &Html, source: &str) -> Result<Vec<ScrapedMeeting>, MeetingError>;

    /// Parse raw HTML and finalize every draft it yields.
    ///
    /// Fails on the first draft that cannot be finalized, so a spider that
    /// stops finding start times is noticed rather than silently emptied.
    fn meetings(
        &self,
        html: &str,
        source: &str,
        now: NaiveDateTime,
    ) -> Result<Vec<Meeting>, MeetingError> {
        let document = Html::parse_document(html);
        let drafts = self.parse(&document, source)?;
        debug!(
            agency = %self.agency().slug,
            %source,
            drafts = drafts.len(),
            "Parsed page"
        );
        drafts
            .into_iter()
            .map(|draft| Meeting::from_scraped(self.agency(), draft, now))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classification, Link, Location, Status};
    use crate::parsing::{
        absolute_url, element_text, parse_month_day_year, require_landmark, selector,
    };
    use chrono::{NaiveDate, NaiveTime};

    const SOURCE: &str = "https://loopchicago.com/about-state-street-ssa1-2015/state-street-commission/";

    const PAGE: &str = r#"
        <html><body>
          <p>Meetings are held at ABC 7 Chicago, 190 N. State St.</p>
          <div class="layoutArea"><ul>
            <li><a href="/assets/2018-january-16-ssc-meeting-minutes.pdf">January 16, 2018</a></li>
            <li><a href="/assets/2018-march-20-ssc-meeting-minutes.pdf">March 20, 2018</a></li>
            <li><a href="/assets/2018-november-20-ssc-agenda.pdf">November 20, 2018</a></li>
            <li>December 18, 2018</li>
          </ul></div>
        </body></html>
    "#;

    /// A single-list spider in the style of the Loop SSA commission page.
    struct CommissionListSpider {
        agency: Agency,
    }

    impl CommissionListSpider {
        fn new() -> Self {
            Self {
                agency: Agency::new(
                    "chi_ssa_1",
                    "Chicago Special Service Area #1-2015",
                    chrono_tz::America::Chicago,
                ),
            }
        }

        fn location(document: &Html) -> Result<Location, MeetingError> {
            let page_text = document.root_element().text().collect::<String>();
            require_landmark(&page_text, "190 N. State St.")?;
            Ok(Location {
                name: "ABC 7 Chicago".to_string(),
                address: "190 N State St Chicago, IL 60601".to_string(),
            })
        }
    }

    impl Spider for CommissionListSpider {
        fn agency(&self) -> &Agency {
            &self.agency
        }

        fn start_urls(&self) -> Vec<String> {
            vec![SOURCE.to_string()]
        }

        fn parse(&self, document: &Html, source: &str) -> Result<Vec<ScrapedMeeting>, MeetingError> {
            let location = Self::location(document)?;
            let items = selector(".layoutArea li")?;
            let anchors = selector("a")?;

            let mut drafts = Vec::new();
            for item in document.select(&items) {
                let Some(date) = parse_month_day_year(&element_text(item)) else {
                    continue;
                };
                let links = item
                    .select(&anchors)
                    .filter_map(|a| a.value().attr("href"))
                    .filter_map(|href| absolute_url(source, href))
                    .map(|href| Link::new("Minutes", href))
                    .collect();
                drafts.push(ScrapedMeeting {
                    title: "State Street Commission".to_string(),
                    classification: Classification::Commission,
                    start: Some(date.and_time(NaiveTime::from_hms_opt(14, 0, 0).unwrap())),
                    location: location.clone(),
                    links,
                    source: source.to_string(),
                    ..Default::default()
                });
            }
            Ok(drafts)
        }
    }

    fn frozen_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 10, 12)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_meetings_ids_and_statuses() {
        let spider = CommissionListSpider::new();
        let meetings = spider.meetings(PAGE, SOURCE, frozen_now()).unwrap();

        assert_eq!(meetings.len(), 4);
        assert_eq!(meetings[0].id, "chi_ssa_1/201801161400/x/state_street_commission");
        assert_eq!(meetings[0].status, Status::Passed);
        assert_eq!(meetings[2].status, Status::Confirmed);
        assert_eq!(meetings[3].status, Status::Tentative);
    }

    #[test]
    fn test_meetings_links_are_absolute() {
        let spider = CommissionListSpider::new();
        let meetings = spider.meetings(PAGE, SOURCE, frozen_now()).unwrap();

        assert_eq!(
            meetings[0].links,
            vec![Link::new(
                "Minutes",
                "https://loopchicago.com/assets/2018-january-16-ssc-meeting-minutes.pdf"
            )]
        );
        assert!(meetings[3].links.is_empty());
        for meeting in &meetings {
            assert_eq!(meeting.source, SOURCE);
            assert_eq!(meeting.location.name, "ABC 7 Chicago");
            assert_eq!(meeting.classification, Classification::Commission);
        }
    }

    #[test]
    fn test_meetings_layout_changed() {
        let spider = CommissionListSpider::new();
        let moved = PAGE.replace("190 N. State St.", "121 N. LaSalle St.");
        let err = spider.meetings(&moved, SOURCE, frozen_now()).unwrap_err();
        assert!(matches!(err, MeetingError::LayoutChanged { .. }));
    }

    #[test]
    fn test_start_urls() {
        assert_eq!(CommissionListSpider::new().start_urls(), vec![SOURCE.to_string()]);
    }
}
