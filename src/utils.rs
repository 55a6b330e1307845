//! Small string helpers shared by the client and the normalizer.

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (backing off to a char
/// boundary) with an ellipsis and byte count appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Build an absolute article link from the site origin and a `canonical_url`.
///
/// `canonical_url` is normally a root-relative path such as `/world/x`. A
/// single slash separates origin and path whether or not either side has one.
pub fn absolute_link(origin: &str, canonical_url: &str) -> String {
    format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        canonical_url.trim_start_matches('/')
    )
}
