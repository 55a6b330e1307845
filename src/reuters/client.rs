//! HTTP client for the Reuters content API.
//!
//! Each call fetches one page of up to [`PAGE_SIZE`] article records. The
//! `query` parameter the API expects is itself a JSON document; it is built
//! with `serde_json` so that user input always ends up inside a JSON string.
//!
//! # URL Pattern
//!
//! ```text
//! GET {base}/pf/api/v3/content/fetch/articles-by-search-v2
//!     ?query={"keyword":"oil","offset":20,"orderby":"display_date:desc","size":20,"website":"reuters"}
//!     &d=124&_website=reuters
//! ```

use super::{PAGE_SIZE, PageSource, page_offset};
use crate::error::{Error, Result};
use crate::models::{ArticlesResponse, Query, RawArticle};
use crate::utils::truncate_for_log;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Production origin of the content API.
pub const DEFAULT_BASE_URL: &str = "https://www.reuters.com";

const SEARCH_PATH: &str = "/pf/api/v3/content/fetch/articles-by-search-v2";
const SECTION_PATH: &str = "/pf/api/v3/content/fetch/articles-by-section-alias-or-id-v1";

/// Deployment id the API requires alongside every query.
const DEPLOYMENT: &str = "124";
const WEBSITE: &str = "reuters";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/102.0.0.0 Safari/537.36";
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Client for the two listing endpoints.
///
/// Cheap to clone; the inner `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct ReutersClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ReutersClient {
    /// Create a client against `base_url` with a per-request `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }
}

impl PageSource for ReutersClient {
    #[instrument(level = "info", skip(self), fields(offset = page_offset(page)))]
    async fn fetch_page(&self, query: &Query, page: u32) -> Result<Vec<RawArticle>> {
        let url = self.base_url.join(endpoint_path(query))?;
        let payload = query_payload(query, page);
        debug!(%url, %payload, "Requesting page");

        let t0 = Instant::now();
        let response = self
            .http
            .get(url.clone())
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .query(&[
                ("query", payload.as_str()),
                ("d", DEPLOYMENT),
                ("_website", WEBSITE),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), %url, "Upstream returned an error status");
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let articles = parse_articles(&body)?;
        info!(
            count = articles.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(articles)
    }
}

/// Endpoint path for a query mode.
pub fn endpoint_path(query: &Query) -> &'static str {
    match query {
        Query::Search { .. } | Query::LegacySearch { .. } => SEARCH_PATH,
        Query::Section { .. } => SECTION_PATH,
    }
}

/// The JSON document sent as the `query` parameter.
///
/// `serde_json` without `preserve_order` emits keys sorted, which is also the
/// order the site's own front end uses.
pub fn query_payload(query: &Query, page: u32) -> String {
    let offset = page_offset(page);
    match query {
        Query::Search { keyword } | Query::LegacySearch { keyword } => json!({
            "keyword": keyword,
            "offset": offset,
            "orderby": "display_date:desc",
            "size": PAGE_SIZE,
            "website": WEBSITE,
        }),
        Query::Section { section } => {
            let section_path = format!("/{section}/");
            json!({
                "arc-site": WEBSITE,
                "fetch_type": "sophi",
                "offset": offset,
                "section_id": section_path,
                "size": PAGE_SIZE,
                "uri": section_path,
                "website": WEBSITE,
            })
        }
    }
    .to_string()
}

/// Pull `result.articles` out of a response body.
pub fn parse_articles(body: &str) -> Result<Vec<RawArticle>> {
    let parsed: ArticlesResponse = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, body = %truncate_for_log(body, 300), "Undecodable upstream body");
        Error::Upstream(format!("undecodable response body: {e}"))
    })?;

    parsed
        .result
        .ok_or(Error::UpstreamShape { path: "result" })?
        .articles
        .ok_or(Error::UpstreamShape { path: "result.articles" })
}
