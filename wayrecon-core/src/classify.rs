//! Method and parameter heuristics for archived URLs.
//!
//! The method is decided by an ordered rule table: the first rule whose
//! predicate matches wins. A URL with no state-changing hint is a GET; a
//! hinted URL is a PUT when it mentions an update, a DELETE when it mentions
//! removal, and a POST otherwise.

use crate::model::HttpMethod;

/// Longest query string considered for parameter extraction, in bytes
pub const MAX_QUERY_LEN: usize = 511;

/// URL substrings that suggest a non-GET request
const URL_HINTS: &[&str] = &[
    "login", "submit", "upload", "create", "update", "delete", "api", "json", "graphql",
];

/// Content-type substrings that suggest a non-GET request
const MIME_HINTS: &[&str] = &["json", "xml", "form"];

type MethodPredicate = fn(url: &str, mime: &str) -> bool;

/// Evaluated top to bottom; the last rule always matches.
const METHOD_RULES: &[(MethodPredicate, HttpMethod)] = &[
    (lacks_hint, HttpMethod::Get),
    (mentions_update, HttpMethod::Put),
    (mentions_removal, HttpMethod::Delete),
    (always, HttpMethod::Post),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub method: HttpMethod,
    pub parameters: Vec<String>,
}

/// Infer the method and query parameter names of `url`
pub fn classify(url: &str, mime_hint: &str) -> Classification {
    Classification {
        method: infer_method(url, mime_hint),
        parameters: extract_parameters(url),
    }
}

pub fn infer_method(url: &str, mime_hint: &str) -> HttpMethod {
    METHOD_RULES
        .iter()
        .find(|(matches, _)| matches(url, mime_hint))
        .map(|(_, method)| *method)
        .unwrap_or(HttpMethod::Get)
}

/// Parameter names from the query string, in order of appearance.
///
/// Values are dropped, duplicates are kept, and tokens without a name are
/// skipped. Query strings longer than [`MAX_QUERY_LEN`] are truncated.
pub fn extract_parameters(url: &str) -> Vec<String> {
    let Some((_, query)) = url.split_once('?') else {
        return Vec::new();
    };

    truncate_query(query)
        .split('&')
        .filter(|token| !token.is_empty())
        .map(|token| token.split_once('=').map_or(token, |(name, _)| name))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn truncate_query(query: &str) -> &str {
    if query.len() <= MAX_QUERY_LEN {
        return query;
    }
    let mut end = MAX_QUERY_LEN;
    while !query.is_char_boundary(end) {
        end -= 1;
    }
    &query[..end]
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn lacks_hint(url: &str, mime: &str) -> bool {
    !contains_any(url, URL_HINTS) && !contains_any(mime, MIME_HINTS)
}

fn mentions_update(url: &str, _mime: &str) -> bool {
    contains_any(url, &["update", "patch"])
}

fn mentions_removal(url: &str, _mime: &str) -> bool {
    contains_any(url, &["delete", "remove"])
}

fn always(_url: &str, _mime: &str) -> bool {
    true
}
