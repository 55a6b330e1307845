//! Error taxonomy for the fetch-and-normalize pipeline.
//!
//! Every failure inside the pipeline is one of two kinds:
//! - upstream ([`Error::is_upstream`]): the Reuters content API could not be
//!   reached, answered with a non-success status, or returned a body without
//!   `result.articles`.
//! - normalization ([`Error::is_normalization`]): an article came back
//!   without a required field, with a field of the wrong JSON type, or with a
//!   timestamp that cannot be parsed.
//!
//! Malformed inbound request bodies never reach this type; axum's `Json`
//! extractor rejects them at the boundary.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("upstream returned HTTP {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("upstream response is missing `{path}`")]
    UpstreamShape { path: &'static str },

    #[error("article {id}: missing required field `{field}`")]
    MissingField { id: String, field: &'static str },

    #[error("article {id}: field `{field}` should be {expected}, got {found}")]
    WrongType {
        id: String,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("article {id}: unparseable published_time {value:?}")]
    BadTimestamp { id: String, value: String },

    #[error("invalid upstream base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

impl Error {
    /// True for failures caused by the external service.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::Upstream(_) | Error::UpstreamStatus { .. } | Error::UpstreamShape { .. }
        )
    }

    /// True for failures caused by a record that could not be normalized.
    pub fn is_normalization(&self) -> bool {
        matches!(
            self,
            Error::MissingField { .. } | Error::WrongType { .. } | Error::BadTimestamp { .. }
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Upstream(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
