use clap::{arg, value_parser};
use std::path::PathBuf;
use url::Url;
use wayrecon_scanner::DEFAULT_CDX_ENDPOINT;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

const EXAMPLES: &str = "\
Examples:
  wayrecon example.com
  echo \"google.com\" | wayrecon
  cat domains.txt | wayrecon -o 'out/{domain}.json'
  wayrecon -s desc target.com

Output (endpoints.json):
  [
    {\"url\": \"https://example.com/login\", \"method\": \"POST\", \"parameters\": [\"username\", \"password\"]},
    ...
  ]";

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("wayrecon")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("wayrecon")
        .about(
            "Queries the Internet Archive CDX server for a domain's archived URLs and writes \
            the discovered endpoints as JSON.",
        )
        .styles(CLAP_STYLING)
        .after_help(EXAMPLES)
        .arg(
            arg!([DOMAIN])
                .required(false)
                .help("Target domain (e.g. example.com), or '-' to read domains from stdin"),
        )
        .arg(
            arg!(-H --"domains-file" <PATH>)
                .required(false)
                .help("Path to a newline-delimited file of domains")
                .value_parser(value_parser!(PathBuf))
                .conflicts_with("DOMAIN"),
        )
        .arg(
            arg!(-o --"output" <FILE>)
                .required(false)
                .help("Output JSON file; '{domain}' is replaced with each domain")
                .default_value("endpoints.json"),
        )
        .arg(
            arg!(-l --"limit" <N>)
                .required(false)
                .help("Max results per query (1-150000)")
                .value_parser(value_parser!(u32).range(1..=150_000))
                .default_value("100000"),
        )
        .arg(
            arg!(-t --"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(value_parser!(u64).range(1..))
                .default_value("60"),
        )
        .arg(arg!(-v --"verbose" "Show query URLs").required(false))
        .arg(
            arg!(-s --"sort" <ORDER>)
                .required(false)
                .help("Sort order by URL")
                .value_parser(["asc", "desc"])
                .default_value("asc"),
        )
        .arg(
            arg!(-q --"quiet" "Suppress per-endpoint and summary output")
                .required(false)
                .conflicts_with("verbose"),
        )
        .arg(
            arg!(--"endpoint" <URL>)
                .required(false)
                .help("CDX server to query")
                .value_parser(value_parser!(Url))
                .default_value(DEFAULT_CDX_ENDPOINT),
        )
}
