//! Data models for raw Reuters articles and the served JSON documents.
//!
//! This module defines the core data structures used throughout the service:
//! - [`RawArticle`]: an article record as returned by the Reuters content API
//! - [`NormalizedArticle`]: the canonical shape served to clients
//! - [`ResultEnvelope`]: the `{length, data}` wrapper around a result list
//! - [`Query`]: which upstream listing a request pages through
//! - Request bodies and the static info documents for `/` and `/list-sections`

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Title reported by `GET /`.
pub const API_TITLE: &str = "ReutersAPI";

/// Sections advertised by `GET /list-sections`.
pub const SECTIONS: [&str; 2] = ["world", "business"];

/// An article record as found under `result.articles` in the upstream body.
///
/// Kept as the JSON object the API sent. Field presence and types are checked
/// by the normalizer, so a record with a missing or mistyped field fails as a
/// normalization error naming the field, not as an undecodable page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RawArticle(pub Value);

impl RawArticle {
    /// Value under `key`, `None` when absent or when the record is not an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }
}

impl From<Value> for RawArticle {
    fn from(value: Value) -> Self {
        RawArticle(value)
    }
}

/// Body shape of the content API: `{ "result": { "articles": [...] } }`.
#[derive(Debug, Deserialize)]
pub struct ArticlesResponse {
    pub result: Option<ArticlesResult>,
}

#[derive(Debug, Deserialize)]
pub struct ArticlesResult {
    pub articles: Option<Vec<RawArticle>>,
}

/// An article in the shape served to clients.
///
/// `date` and `time` are fixed width (`YYYY-MM-DD`, `HH:MM:SS`), so comparing
/// them as strings orders articles chronologically.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NormalizedArticle {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    /// Absolute article URL. Left out entirely by the legacy keyword endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// The outward `{length, data}` document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ResultEnvelope {
    pub length: usize,
    pub data: Vec<NormalizedArticle>,
}

impl ResultEnvelope {
    /// Wrap an ordered result list. `length` always mirrors `data.len()`.
    pub fn new(data: Vec<NormalizedArticle>) -> Self {
        Self {
            length: data.len(),
            data,
        }
    }
}

/// Which upstream listing to page through, and with what identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Free-text keyword search, newest first.
    Search { keyword: String },
    /// Listing of one site section, e.g. `world`.
    Section { section: String },
    /// The first-generation keyword endpoint: no links, no dedupe, no sort.
    LegacySearch { keyword: String },
}

impl Query {
    /// Whether normalized articles carry a `link` built from `canonical_url`.
    pub fn includes_link(&self) -> bool {
        !matches!(self, Query::LegacySearch { .. })
    }

    /// Whether the aggregated list is deduplicated by id and sorted newest first.
    pub fn dedupes_and_sorts(&self) -> bool {
        !matches!(self, Query::LegacySearch { .. })
    }
}

/// Body of `POST /reuters-by-search/`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub search: String,
    #[serde(default = "default_pages")]
    pub pages: i64,
}

/// Body of `POST /reuters-by-section/`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SectionRequest {
    #[serde(default = "default_section")]
    pub section: String,
    #[serde(default = "default_pages")]
    pub pages: i64,
}

/// Body of the legacy `POST /reuters/`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LegacySearchRequest {
    #[serde(default)]
    pub search: String,
    #[serde(default = "default_legacy_pages")]
    pub pages: i64,
}

fn default_pages() -> i64 {
    1
}

fn default_legacy_pages() -> i64 {
    10
}

fn default_section() -> String {
    "business".to_string()
}

/// Clamp a client supplied page count. Zero and negative values mean no pages.
pub fn page_count(pages: i64) -> u32 {
    u32::try_from(pages.max(0)).unwrap_or(u32::MAX)
}

/// `GET /` document.
#[derive(Debug, Serialize, Deserialize)]
pub struct RootInfo {
    pub info: ApiInfo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
}

/// `GET /list-sections` document.
#[derive(Debug, Serialize, Deserialize)]
pub struct SectionsInfo {
    pub info: SectionList,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SectionList {
    pub sections: Vec<String>,
}
