//! CDX server query construction.
//!
//! Every query asks for the same four fields and collapses on the index's
//! normalized URL key. The first page requests a resume key; later pages
//! pass the key returned by the previous page back to the server.

use crate::page::Cursor;
use url::Url;

/// Public Wayback Machine CDX endpoint
pub const DEFAULT_CDX_ENDPOINT: &str = "http://web.archive.org/cdx/search/cdx";

/// Fields requested from the index, in row order
pub const CDX_FIELDS: &str = "original,timestamp,statuscode,mimetype";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdxQuery {
    target: String,
    limit: u32,
    cursor: Option<Cursor>,
}

impl CdxQuery {
    /// Query for the first page of `target`
    pub fn new(target: impl Into<String>, limit: u32) -> Self {
        Self {
            target: target.into(),
            limit,
            cursor: None,
        }
    }

    pub fn with_cursor(mut self, cursor: Option<Cursor>) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Build the full request URL against `endpoint`
    pub fn to_url(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("url", &self.target)
                .append_pair("matchType", "domain")
                .append_pair("fl", CDX_FIELDS)
                .append_pair("collapse", "urlkey")
                .append_pair("output", "json")
                .append_pair("limit", &self.limit.to_string());

            match &self.cursor {
                Some(cursor) => pairs.append_pair("resumeKey", cursor.as_str()),
                None => pairs.append_pair("showResumeKey", "true"),
            };
        }
        url
    }
}
