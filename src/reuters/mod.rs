//! Access to the Reuters content API.
//!
//! The site's own front end pages through two `pf/api/v3/content/fetch`
//! endpoints. This module talks to them and turns their records into
//! [`NormalizedArticle`](crate::models::NormalizedArticle)s.
//!
//! | Query mode | Endpoint | Payload |
//! |------------|----------|---------|
//! | keyword search | `articles-by-search-v2` | keyword, newest first |
//! | section listing | `articles-by-section-alias-or-id-v1` | section id path |
//!
//! # Submodules
//!
//! - [`client`]: one HTTP request per page of 20 records
//! - [`normalize`]: raw record to canonical article

use crate::error::Result;
use crate::models::{Query, RawArticle};
use std::future::Future;

pub mod client;
pub mod normalize;

/// Records per upstream page. Offsets advance in steps of this size.
pub const PAGE_SIZE: u32 = 20;

/// Origin prefixed to `canonical_url` when building article links.
pub const LINK_ORIGIN: &str = "https://www.reuters.com";

/// Anything that can hand back one page of raw article records.
///
/// [`client::ReutersClient`] is the production implementation; the pipeline
/// tests drive the aggregator with an in-memory source instead.
pub trait PageSource {
    /// Fetch page `page` (zero based) for `query`.
    fn fetch_page(
        &self,
        query: &Query,
        page: u32,
    ) -> impl Future<Output = Result<Vec<RawArticle>>> + Send;
}

/// Upstream offset of a zero-based page index.
pub fn page_offset(page: u32) -> u64 {
    u64::from(page) * u64::from(PAGE_SIZE)
}
