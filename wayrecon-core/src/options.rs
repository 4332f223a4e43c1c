use crate::domain::Target;
use crate::error::{ReconError, Result};
use crate::report::SortOrder;
use std::path::{Path, PathBuf};
use wayrecon_scanner::DEFAULT_CDX_ENDPOINT;
use wayrecon_scanner::client::DEFAULT_USER_AGENT;

pub const DEFAULT_OUTPUT: &str = "endpoints.json";
pub const DEFAULT_LIMIT: u32 = 100_000;
pub const MAX_LIMIT: u32 = 150_000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Placeholder in the output path replaced by the domain being processed
pub const DOMAIN_PLACEHOLDER: &str = "{domain}";

/// Options for configuring a recon run
#[derive(Debug, Clone)]
pub struct ReconOptions {
    /// Report path; may contain `{domain}`
    pub output: PathBuf,
    /// Page size requested from the index
    pub limit: u32,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Echo each query URL before sending it
    pub verbose: bool,
    pub sort_order: SortOrder,
    /// CDX server base URL
    pub endpoint: String,
    pub user_agent: String,
    /// Announce each valid domain before harvesting it (stdin or file input)
    pub batch: bool,
}

impl Default for ReconOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            limit: DEFAULT_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            verbose: false,
            sort_order: SortOrder::Ascending,
            endpoint: DEFAULT_CDX_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            batch: false,
        }
    }
}

impl ReconOptions {
    pub fn validate(&self) -> Result<()> {
        if self.limit < 1 || self.limit > MAX_LIMIT {
            return Err(ReconError::InvalidOption(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LIMIT, self.limit
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ReconError::InvalidOption(
                "timeout must be greater than 0 seconds".to_string(),
            ));
        }

        if self.output.as_os_str().is_empty() {
            return Err(ReconError::InvalidOption(
                "output path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Report path for `target`, with any `{domain}` placeholder filled in
    pub fn output_path_for(&self, target: &Target) -> PathBuf {
        let raw = self.output.to_string_lossy();
        if raw.contains(DOMAIN_PLACEHOLDER) {
            PathBuf::from(raw.replace(DOMAIN_PLACEHOLDER, &target.file_stem()))
        } else {
            self.output.clone()
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}
