//! Raw article record to [`NormalizedArticle`].
//!
//! `published_time` is split into a fixed-width date and time in the offset
//! the timestamp was written in; it is not converted to UTC. Accepted forms,
//! tried in order:
//!
//! 1. RFC 3339 (`2022-12-01T10:00:00Z`, `2022-12-01T10:00:00.123+05:00`)
//! 2. RFC 2822 (`Thu, 01 Dec 2022 10:00:00 +0000`)
//! 3. ISO-8601 with a compact offset (`2022-12-01T10:00:00+0000`)
//! 4. Naive date-times (`2022-12-01T10:00:00`, `2022-12-01 10:00:00.5`)
//! 5. A bare date (`2022-12-01`), read as midnight

use super::LINK_ORIGIN;
use crate::error::{Error, Result};
use crate::models::{NormalizedArticle, Query, RawArticle};
use crate::utils::absolute_link;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

const UNKNOWN_ID: &str = "<unknown>";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Normalize one record for `query`.
///
/// `id`, `title`, `description` and `published_time` must be present and
/// `canonical_url` is required only when the query mode serves links. Each
/// must be a JSON string. A `null` title or description becomes an empty
/// string; `null` anywhere else counts as missing.
pub fn normalize(raw: &RawArticle, query: &Query) -> Result<NormalizedArticle> {
    if !raw.is_object() {
        return Err(Error::WrongType {
            id: UNKNOWN_ID.to_string(),
            field: "record",
            expected: "an object",
            found: json_type(&raw.0),
        });
    }

    let id = text_field(raw, UNKNOWN_ID, "id", Null::Missing)?;
    let title = text_field(raw, &id, "title", Null::Empty)?;
    let description = text_field(raw, &id, "description", Null::Empty)?;
    let published = text_field(raw, &id, "published_time", Null::Missing)?;

    let (date, time) = split_timestamp(&published).ok_or_else(|| Error::BadTimestamp {
        id: id.clone(),
        value: published.clone(),
    })?;

    let link = if query.includes_link() {
        let canonical = text_field(raw, &id, "canonical_url", Null::Missing)?;
        Some(absolute_link(LINK_ORIGIN, &canonical))
    } else {
        None
    };

    Ok(NormalizedArticle {
        id,
        title,
        description,
        date,
        time,
        link,
    })
}

/// How a present-but-null field is treated.
#[derive(Clone, Copy)]
enum Null {
    Missing,
    Empty,
}

fn text_field(raw: &RawArticle, id: &str, field: &'static str, null: Null) -> Result<String> {
    match (raw.get(field), null) {
        (Some(Value::String(s)), _) => Ok(s.clone()),
        (Some(Value::Null), Null::Empty) => Ok(String::new()),
        (None | Some(Value::Null), _) => Err(missing(id, field)),
        (Some(other), _) => Err(Error::WrongType {
            id: id.to_string(),
            field,
            expected: "a string",
            found: json_type(other),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Normalize a whole page; the first bad record fails the page.
pub fn normalize_page(raws: &[RawArticle], query: &Query) -> Result<Vec<NormalizedArticle>> {
    raws.iter().map(|raw| normalize(raw, query)).collect()
}

/// Parse a timestamp leniently and return `(YYYY-MM-DD, HH:MM:SS)`.
pub fn split_timestamp(value: &str) -> Option<(String, String)> {
    let value = value.trim();

    let with_offset = DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .ok()
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
        });
    if let Some(dt) = with_offset {
        return Some(split(dt.naive_local()));
    }

    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Some(split(naive));
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(split)
}

fn split(dt: NaiveDateTime) -> (String, String) {
    (
        dt.format(DATE_FORMAT).to_string(),
        dt.format(TIME_FORMAT).to_string(),
    )
}

fn missing(id: &str, field: &'static str) -> Error {
    Error::MissingField {
        id: id.to_string(),
        field,
    }
}
