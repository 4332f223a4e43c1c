use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::warn;
use url::Url;
use wayrecon_core::harvest::EndpointCallback;
use wayrecon_core::recon::{ReconProgressCallback, build_client};
use wayrecon_core::report::format_endpoint_line;
use wayrecon_core::{
    DomainReport, Endpoint, ReconError, ReconOptions, SortOrder, StopReason, process_domain,
};
use wayrecon_scanner::CdxClient;

/// Where the domains to process come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainSource {
    Single(String),
    Stdin,
    File(PathBuf),
}

/// Pick the domain source from the positional argument and `--domains-file`
pub fn domain_source(domain: Option<&str>, domains_file: Option<&PathBuf>) -> DomainSource {
    match (domains_file, domain) {
        (Some(path), _) => DomainSource::File(path.clone()),
        (None, None) | (None, Some("-")) => DomainSource::Stdin,
        (None, Some(domain)) => DomainSource::Single(domain.to_string()),
    }
}

/// Strip line terminators; blank lines yield None.
///
/// Other whitespace is kept, so it counts toward the domain length check.
pub fn parse_domain_line(line: &str) -> Option<String> {
    let domain = line.split(['\r', '\n']).next().unwrap_or_default();
    if domain.is_empty() {
        None
    } else {
        Some(domain.to_string())
    }
}

/// Reads newline-delimited domains one line at a time, so each domain can be
/// processed as soon as its line arrives
pub struct DomainReader<R> {
    reader: R,
    buf: Vec<u8>,
    line: usize,
}

impl<R: AsyncBufRead + Unpin> DomainReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line: 0,
        }
    }

    /// Next domain, or None at end of input.
    ///
    /// Blank lines are skipped. Lines that are not valid UTF-8 are skipped
    /// with a warning; only a failing read is an error.
    pub async fn next_domain(&mut self) -> Result<Option<String>> {
        loop {
            self.buf.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut self.buf)
                .await
                .context("Failed to read domain list")?;
            if read == 0 {
                return Ok(None);
            }
            self.line += 1;

            match String::from_utf8(std::mem::take(&mut self.buf)) {
                Ok(line) => {
                    if let Some(domain) = parse_domain_line(&line) {
                        return Ok(Some(domain));
                    }
                }
                Err(_) => warn!("Skipping line {}: not valid UTF-8", self.line),
            }
        }
    }
}

/// Read every domain from `reader`
pub async fn read_domains<R: AsyncBufRead + Unpin>(reader: R) -> Result<Vec<String>> {
    let mut reader = DomainReader::new(reader);
    let mut domains = Vec::new();
    while let Some(domain) = reader.next_domain().await? {
        domains.push(domain);
    }
    Ok(domains)
}

/// Load domains from a file, expanding a leading `~`
pub async fn load_domains_from_file(path: &Path) -> Result<Vec<String>> {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let file = File::open(&expanded)
        .await
        .with_context(|| format!("Failed to read domains file {}", path.display()))?;

    let domains = read_domains(BufReader::new(file)).await?;
    if domains.is_empty() {
        bail!("No domains found in {}", path.display());
    }
    Ok(domains)
}

/// Domain source named by the parsed arguments
pub fn source_from_matches(matches: &ArgMatches) -> DomainSource {
    domain_source(
        matches.get_one::<String>("DOMAIN").map(String::as_str),
        matches.get_one::<PathBuf>("domains-file"),
    )
}

/// Build recon options from parsed arguments
pub fn options_from_matches(matches: &ArgMatches) -> Result<ReconOptions> {
    let output = matches
        .get_one::<String>("output")
        .map(|o| PathBuf::from(shellexpand::tilde(o).into_owned()))
        .context("--output is required")?;
    let limit = *matches.get_one::<u32>("limit").context("--limit is required")?;
    let timeout_secs = *matches
        .get_one::<u64>("timeout")
        .context("--timeout is required")?;
    let sort_order: SortOrder = matches
        .get_one::<String>("sort")
        .map(String::as_str)
        .unwrap_or("asc")
        .parse()?;
    let endpoint = matches
        .get_one::<Url>("endpoint")
        .context("--endpoint is required")?
        .to_string();

    let options = ReconOptions {
        output,
        limit,
        timeout_secs,
        verbose: matches.get_flag("verbose"),
        sort_order,
        endpoint,
        batch: !matches!(source_from_matches(matches), DomainSource::Single(_)),
        ..Default::default()
    };
    options.validate()?;
    Ok(options)
}

pub async fn handle_recon(matches: &ArgMatches) -> Result<()> {
    let options = options_from_matches(matches)?;
    let source = source_from_matches(matches);
    if source == DomainSource::Stdin && io::stdin().is_terminal() {
        bail!("Domain is required (or use pipe input)");
    }

    let client = build_client(&options)?;
    let console = Console::new(options.verbose, matches.get_flag("quiet"))?;

    let result = match source {
        DomainSource::Single(domain) => run_single(&client, &domain, &options, &console).await,
        DomainSource::File(path) => match load_domains_from_file(&path).await {
            Ok(domains) => {
                for domain in domains {
                    run_batch_domain(&client, &domain, &options, &console).await;
                }
                Ok(())
            }
            Err(e) => Err(e),
        },
        DomainSource::Stdin => {
            let mut reader = DomainReader::new(BufReader::new(tokio::io::stdin()));
            let mut result = Ok(());
            loop {
                match reader.next_domain().await {
                    Ok(Some(domain)) => {
                        run_batch_domain(&client, &domain, &options, &console).await
                    }
                    Ok(None) => break,
                    Err(e) => {
                        result = Err(e);
                        break;
                    }
                }
            }
            result
        }
    };

    console.finish();
    result
}

async fn run_single(
    client: &CdxClient,
    domain: &str,
    options: &ReconOptions,
    console: &Console,
) -> Result<()> {
    let report = process_domain(
        client,
        domain,
        options,
        console.progress_callback(),
        Some(console.endpoint_callback()),
    )
    .await?;
    console.summarize(&report);
    Ok(())
}

/// A failing domain is reported and the batch moves on
async fn run_batch_domain(
    client: &CdxClient,
    domain: &str,
    options: &ReconOptions,
    console: &Console,
) {
    let result = process_domain(
        client,
        domain,
        options,
        console.progress_callback(),
        Some(console.endpoint_callback()),
    )
    .await;

    match result {
        Ok(report) => console.summarize(&report),
        Err(e) => console.failure(domain, &e),
    }
}

/// Terminal output for a recon run: spinner, live endpoint feed and summaries
struct Console {
    spinner: ProgressBar,
    discovered: Arc<AtomicUsize>,
    verbose: bool,
    quiet: bool,
}

impl Console {
    fn new(verbose: bool, quiet: bool) -> Result<Self> {
        // Live feed goes to stdout; the spinner draws on stderr and hides when it is not a terminal
        let spinner = if verbose || quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg}")
                    .context("Invalid spinner template")?,
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb.set_message("Querying the Wayback Machine...");
            pb
        };

        Ok(Self {
            spinner,
            discovered: Arc::new(AtomicUsize::new(0)),
            verbose,
            quiet,
        })
    }

    /// Banner and query echo; nothing under quiet
    fn progress_callback(&self) -> Option<ReconProgressCallback> {
        if self.quiet {
            return None;
        }

        let spinner = self.spinner.clone();
        Some(Arc::new(move |msg: String| {
            spinner.suspend(|| {
                println!("{}", msg);
                let _ = io::stdout().flush();
            });
        }))
    }

    fn endpoint_callback(&self) -> EndpointCallback {
        let spinner = self.spinner.clone();
        let discovered = self.discovered.clone();
        let quiet = self.quiet;
        Arc::new(move |endpoint: &Endpoint| {
            let count = discovered.fetch_add(1, Ordering::Relaxed) + 1;
            if quiet {
                return;
            }
            spinner.set_message(format!("{} endpoints discovered", count));
            spinner.suspend(|| println!("{}", format_endpoint_line(endpoint)));
        })
    }

    fn summarize(&self, report: &DomainReport) {
        self.spinner.suspend(|| {
            if let Some(note) = stop_note(report.stop_reason) {
                eprintln!(
                    "{} {}: {} ({} endpoints kept)",
                    "⚠".yellow().bold(),
                    report.domain,
                    note,
                    report.endpoints
                );
            }
            if !self.verbose && !self.quiet {
                println!(
                    "\nRecon complete for {}. JSON output saved to {}",
                    report.domain.bright_white(),
                    report.output.display().to_string().bright_white()
                );
            }
        });
    }

    fn failure(&self, domain: &str, error: &ReconError) {
        self.spinner
            .suspend(|| eprintln!("{} Failed to process {}: {}", "✗".red().bold(), domain, error));
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

fn stop_note(reason: StopReason) -> Option<&'static str> {
    match reason {
        StopReason::Exhausted | StopReason::EndOfData => None,
        StopReason::TransportFailed => Some("request failed, pagination stopped early"),
        StopReason::ParseFailed => Some("unreadable response, pagination stopped early"),
        StopReason::RepeatedCursor => Some("index repeated its resume key, pagination stopped"),
    }
}
