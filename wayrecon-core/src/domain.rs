use crate::error::{ReconError, Result};
use std::fmt;
use std::str::FromStr;

/// RFC 1035 limit on a domain name
pub const MAX_DOMAIN_LEN: usize = 253;

/// Scheme prefixed to bare domains before querying
pub const DEFAULT_SCHEME: &str = "http://";

/// A validated domain to harvest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    domain: String,
    query_target: String,
}

impl Target {
    /// Validate `domain` and derive the value sent to the index.
    ///
    /// The length limit is measured in bytes. A domain without `://` gets
    /// [`DEFAULT_SCHEME`] prepended for the query only.
    pub fn parse(domain: &str) -> Result<Self> {
        if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
            return Err(ReconError::InvalidDomain(format!(
                "empty or too long ({} bytes, max {})",
                domain.len(),
                MAX_DOMAIN_LEN
            )));
        }

        let query_target = if domain.contains("://") {
            domain.to_string()
        } else {
            format!("{}{}", DEFAULT_SCHEME, domain)
        };

        Ok(Self {
            domain: domain.to_string(),
            query_target,
        })
    }

    /// The domain as given
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The domain with a scheme, as sent to the index
    pub fn query_target(&self) -> &str {
        &self.query_target
    }

    /// The domain reduced to characters safe in a file name
    pub fn file_stem(&self) -> String {
        let stem = self.domain.split_once("://").map_or(self.domain.as_str(), |(_, rest)| rest);
        stem.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl FromStr for Target {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.domain)
    }
}
