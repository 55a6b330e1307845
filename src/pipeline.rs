//! Multi-page fetch, normalize and merge.
//!
//! # Pipeline
//!
//! 1. Fetch pages `0..N` from a [`PageSource`] and normalize each page
//! 2. Concatenate the pages in page order
//! 3. Drop repeated ids, keeping the first occurrence
//! 4. Stable sort by `(date, time)`, newest first
//!
//! Steps 3 and 4 are skipped for the legacy keyword endpoint. Any failing
//! page fails the whole run; nothing partial is returned.
//!
//! Pages are fetched one after another unless `concurrency` is raised. Even
//! then results are merged in page order, so the output does not depend on
//! which request finishes first.

use crate::error::Result;
use crate::models::{NormalizedArticle, Query};
use crate::reuters::PageSource;
use crate::reuters::normalize::normalize_page;
use futures::stream::{self, StreamExt, TryStreamExt};
use itertools::Itertools;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Page counts above this are served but logged as suspicious; each page is
/// one upstream request.
pub const LARGE_PAGE_COUNT: u32 = 500;

pub fn is_large_page_count(pages: u32) -> bool {
    pages > LARGE_PAGE_COUNT
}

/// Fetch and merge `pages` pages for `query`.
///
/// `pages == 0` returns an empty list without touching the source.
#[instrument(level = "info", skip(source))]
pub async fn collect_pages<S>(
    source: &S,
    query: &Query,
    pages: u32,
    concurrency: usize,
) -> Result<Vec<NormalizedArticle>>
where
    S: PageSource + Sync,
{
    if pages == 0 {
        debug!("No pages requested");
        return Ok(Vec::new());
    }
    if is_large_page_count(pages) {
        warn!(pages, limit = LARGE_PAGE_COUNT, "Large page count requested");
    }

    let t0 = Instant::now();
    let per_page: Vec<Vec<NormalizedArticle>> = stream::iter(0..pages)
        .map(move |page| async move {
            let raws = source.fetch_page(query, page).await?;
            normalize_page(&raws, query)
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    let fetched: usize = per_page.iter().map(Vec::len).sum();
    let concatenated = per_page.into_iter().flatten().collect::<Vec<_>>();
    let articles = if query.dedupes_and_sorts() {
        dedupe_and_sort(concatenated)
    } else {
        concatenated
    };

    info!(
        fetched,
        kept = articles.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Collected pages"
    );
    Ok(articles)
}

/// First-wins dedupe by id, then a stable newest-first sort.
pub fn dedupe_and_sort(articles: Vec<NormalizedArticle>) -> Vec<NormalizedArticle> {
    let mut unique = articles
        .into_iter()
        .unique_by(|a| a.id.clone())
        .collect::<Vec<_>>();
    unique.sort_by(|a, b| (&b.date, &b.time).cmp(&(&a.date, &a.time)));
    unique
}
