//! Fetch a spider's start pages and run its parser over them.
//!
//! One GET per start URL, in order. There is no throttling, robots.txt
//! handling or retrying here. A page that fails to fetch or parse is logged
//! and skipped.

use crate::models::Meeting;
use crate::spider::Spider;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

const USER_AGENT: &str = concat!("meeting_scrapers/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client used for page fetches.
pub fn build_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .build()
}

/// Download one page as text.
#[instrument(level = "info", skip(client))]
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, Box<dyn Error>> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        warn!(%status, "Non-success response");
        return Err(format!("GET {url} returned {status}").into());
    }
    let body = response.text().await?;
    debug!(bytes = body.len(), "Fetched page");
    Ok(body)
}

/// Fetch every start URL of `spider` and collect the finalized meetings.
#[instrument(level = "info", skip_all, fields(agency = %spider.agency().slug))]
pub async fn crawl<S: Spider>(spider: &S, client: &Client) -> Vec<Meeting> {
    let urls = spider.start_urls();
    let now = spider.agency().now();

    let pages: Vec<(String, String)> = stream::iter(urls)
        .then(|url: String| async move {
            match fetch_page(client, &url).await {
                Ok(body) => Some((url, body)),
                Err(e) => {
                    error!(error = %e, %url, "Fetch failed");
                    None
                }
            }
        })
        .filter_map(std::future::ready)
        .collect()
        .await;

    let mut meetings = Vec::new();
    for (url, body) in pages {
        match spider.meetings(&body, &url, now) {
            Ok(parsed) => {
                debug!(%url, count = parsed.len(), "Parsed meetings");
                meetings.extend(parsed);
            }
            Err(e) => error!(error = %e, %url, "Parse failed"),
        }
    }

    info!(count = meetings.len(), "Crawl finished");
    meetings
}
