//! Core library for wayrecon.
//!
//! Pulls a domain's archived URLs from the Wayback Machine CDX index,
//! deduplicates them, guesses each one's HTTP method and parameter names,
//! and writes a sorted JSON report.

pub mod classify;
pub mod dedup;
pub mod domain;
pub mod error;
pub mod harvest;
pub mod model;
pub mod options;
pub mod recon;
pub mod report;
pub mod store;

pub use classify::{Classification, classify};
pub use dedup::SeenSet;
pub use domain::Target;
pub use error::{ReconError, Result};
pub use harvest::{EndpointCallback, HarvestOutcome, HarvestState, Harvester, StopReason};
pub use model::{Endpoint, HttpMethod};
pub use options::ReconOptions;
pub use recon::{DomainOutcome, DomainReport, ReconProgressCallback, execute_recon, process_domain};
pub use report::{SortOrder, render, save_report};
pub use store::ResultStore;
