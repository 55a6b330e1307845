//! HTTP handlers.
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | GET | `/` | none | service title and version |
//! | GET | `/list-sections` | none | known section names |
//! | POST | `/reuters-by-search/` | [`SearchRequest`] | [`ResultEnvelope`] |
//! | POST | `/reuters-by-section/` | [`SectionRequest`] | [`ResultEnvelope`] |
//! | POST | `/reuters/` | [`LegacySearchRequest`] | [`ResultEnvelope`], legacy shape |

use crate::models::{
    API_TITLE, ApiInfo, LegacySearchRequest, Query, ResultEnvelope, RootInfo, SECTIONS,
    SearchRequest, SectionList, SectionRequest, SectionsInfo, page_count,
};
use crate::pipeline::collect_pages;
use crate::server::{ApiError, AppState};
use axum::Json;
use axum::extract::State;
use std::sync::Arc;
use tracing::{error, info, instrument};

pub async fn root() -> Json<RootInfo> {
    Json(RootInfo {
        info: ApiInfo {
            title: API_TITLE.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    })
}

pub async fn list_sections() -> Json<SectionsInfo> {
    Json(SectionsInfo {
        info: SectionList {
            sections: SECTIONS.iter().map(|s| s.to_string()).collect(),
        },
    })
}

/// POST /reuters-by-search/ - keyword search, deduplicated, newest first.
#[instrument(level = "info", skip(state))]
pub async fn reuters_by_search(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<ResultEnvelope>, ApiError> {
    let query = Query::Search {
        keyword: request.search,
    };
    respond(&state, query, request.pages).await
}

/// POST /reuters-by-section/ - one section's listing, deduplicated, newest first.
#[instrument(level = "info", skip(state))]
pub async fn reuters_by_section(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SectionRequest>,
) -> Result<Json<ResultEnvelope>, ApiError> {
    let query = Query::Section {
        section: request.section,
    };
    respond(&state, query, request.pages).await
}

/// POST /reuters/ - the first-generation keyword endpoint.
///
/// Pages are concatenated as returned: no `link`, no dedupe, no sort.
#[instrument(level = "info", skip(state))]
pub async fn reuters_legacy(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LegacySearchRequest>,
) -> Result<Json<ResultEnvelope>, ApiError> {
    let query = Query::LegacySearch {
        keyword: request.search,
    };
    respond(&state, query, request.pages).await
}

async fn respond(
    state: &AppState,
    query: Query,
    pages: i64,
) -> Result<Json<ResultEnvelope>, ApiError> {
    let articles = collect_pages(&state.client, &query, page_count(pages), state.page_concurrency)
        .await
        .map_err(|e| {
            error!(
                error = %e,
                upstream = e.is_upstream(),
                normalization = e.is_normalization(),
                ?query,
                pages,
                "Request failed"
            );
            ApiError::from(e)
        })?;

    let envelope = ResultEnvelope::new(articles);
    info!(length = envelope.length, "Serving envelope");
    Ok(Json(envelope))
}
