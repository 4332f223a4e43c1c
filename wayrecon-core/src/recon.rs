use crate::domain::Target;
use crate::error::Result;
use crate::harvest::{EndpointCallback, Harvester, QueryCallback, StopReason};
use crate::options::ReconOptions;
use crate::report::{render, save_report};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use wayrecon_scanner::{ArchiveTransport, CdxClient};

/// Callback for reporting recon progress
pub type ReconProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Summary of one processed domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainReport {
    pub domain: String,
    pub endpoints: usize,
    pub pages: usize,
    pub stop_reason: StopReason,
    pub output: PathBuf,
}

/// Result for one domain of a batch
#[derive(Debug)]
pub struct DomainOutcome {
    pub domain: String,
    pub result: Result<DomainReport>,
}

/// Build the HTTP transport described by `options`
pub fn build_client(options: &ReconOptions) -> Result<CdxClient> {
    let client = CdxClient::with_timeout(options.timeout_secs, &options.user_agent)?
        .with_endpoint(&options.endpoint)?;
    Ok(client)
}

/// Harvest one domain and write its report.
///
/// Pagination failures only shorten the harvest; the report is still
/// written with whatever was collected. Errors come from an invalid domain
/// or from writing the report.
pub async fn process_domain<T: ArchiveTransport>(
    transport: &T,
    domain: &str,
    options: &ReconOptions,
    progress_callback: Option<ReconProgressCallback>,
    endpoint_callback: Option<EndpointCallback>,
) -> Result<DomainReport> {
    let target = Target::parse(domain)?;

    if options.batch
        && let Some(ref callback) = progress_callback
    {
        callback(format!("\n=== Processing: {} ===", target));
    }

    let mut harvester = Harvester::new(transport, target.clone(), options.limit);
    if options.verbose
        && let Some(callback) = progress_callback
    {
        let query_callback: QueryCallback = callback;
        harvester = harvester.with_query_callback(query_callback);
    }
    if let Some(callback) = endpoint_callback {
        harvester = harvester.with_endpoint_callback(callback);
    }

    let outcome = harvester.run().await;
    let endpoints = outcome.store.len();
    let output = options.output_path_for(&target);

    let json = render(outcome.store, options.sort_order)?;
    if let Err(e) = save_report(&json, &output) {
        error!("Failed to write {} for {}: {}", output.display(), target, e);
        return Err(e);
    }
    info!("Wrote {} endpoints for {} to {}", endpoints, target, output.display());

    Ok(DomainReport {
        domain: target.domain().to_string(),
        endpoints,
        pages: outcome.pages,
        stop_reason: outcome.stop_reason,
        output,
    })
}

/// Process each domain in turn, one harvest at a time.
///
/// A failing domain never stops the batch; its error is returned in its
/// outcome. Only invalid options fail the whole call.
pub async fn execute_recon<T: ArchiveTransport>(
    transport: &T,
    domains: &[String],
    options: &ReconOptions,
    progress_callback: Option<ReconProgressCallback>,
    endpoint_callback: Option<EndpointCallback>,
) -> Result<Vec<DomainOutcome>> {
    options.validate()?;

    let mut outcomes = Vec::with_capacity(domains.len());
    for domain in domains {
        let result = process_domain(
            transport,
            domain,
            options,
            progress_callback.clone(),
            endpoint_callback.clone(),
        )
        .await;

        if let Err(ref e) = result {
            warn!("Failed to process {}: {}", domain, e);
        }

        outcomes.push(DomainOutcome {
            domain: domain.clone(),
            result,
        });
    }

    Ok(outcomes)
}
