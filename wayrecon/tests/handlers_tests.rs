use std::io::Write;
use tokio::io::{AsyncWriteExt, BufReader};
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};
use wayrecon::commands::command_argument_builder;
use wayrecon::handlers::*;
use wayrecon_core::SortOrder;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

#[test]
fn test_parse_domain_line() {
    assert_eq!(parse_domain_line("example.com"), Some("example.com".to_string()));
    assert_eq!(parse_domain_line("example.com\r\n"), Some("example.com".to_string()));
    assert_eq!(parse_domain_line(""), None);
    assert_eq!(parse_domain_line("\r"), None);
}

#[test]
fn test_parse_domain_line_keeps_inner_whitespace() {
    assert_eq!(parse_domain_line(" example.com"), Some(" example.com".to_string()));
}

#[tokio::test]
async fn test_read_domains_skips_blank_lines() {
    let input = &b"a.com\n\nb.com\r\nhttps://c.com\n"[..];
    let domains = read_domains(input).await.unwrap();
    assert_eq!(domains, vec!["a.com", "b.com", "https://c.com"]);
}

#[tokio::test]
async fn test_read_domains_skips_invalid_utf8_lines() {
    let input = &b"good.com\n\xff\xfe.com\nother.com\n"[..];
    let domains = read_domains(input).await.unwrap();
    assert_eq!(domains, vec!["good.com", "other.com"]);
}

#[tokio::test]
async fn test_read_domains_without_trailing_newline() {
    let domains = read_domains(&b"a.com\nb.com"[..]).await.unwrap();
    assert_eq!(domains, vec!["a.com", "b.com"]);
}

#[tokio::test]
async fn test_domain_reader_yields_before_end_of_input() {
    let (mut writer, reader) = tokio::io::duplex(64);
    let mut domains = DomainReader::new(BufReader::new(reader));

    writer.write_all(b"first.com\n").await.unwrap();
    assert_eq!(domains.next_domain().await.unwrap(), Some("first.com".to_string()));

    writer.write_all(b"second.com\n").await.unwrap();
    drop(writer);
    assert_eq!(domains.next_domain().await.unwrap(), Some("second.com".to_string()));
    assert_eq!(domains.next_domain().await.unwrap(), None);
}

#[tokio::test]
async fn test_load_domains_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "example.com")?;
    writeln!(temp_file)?;
    temp_file.write_all(b"\xff\n")?;
    writeln!(temp_file, "test.org")?;

    let domains = load_domains_from_file(temp_file.path()).await?;
    assert_eq!(domains, vec!["example.com", "test.org"]);
    Ok(())
}

#[tokio::test]
async fn test_load_domains_from_empty_file_fails() {
    let temp_file = NamedTempFile::new().unwrap();
    assert!(load_domains_from_file(temp_file.path()).await.is_err());
}

#[tokio::test]
async fn test_load_domains_from_missing_file_fails() {
    let result = load_domains_from_file(&PathBuf::from("/nonexistent/domains.txt")).await;
    assert!(result.is_err());
}

#[test]
fn test_domain_source() {
    assert_eq!(
        domain_source(Some("example.com"), None),
        DomainSource::Single("example.com".to_string())
    );
    assert_eq!(domain_source(Some("-"), None), DomainSource::Stdin);
    assert_eq!(domain_source(None, None), DomainSource::Stdin);

    let file = PathBuf::from("domains.txt");
    assert_eq!(domain_source(None, Some(&file)), DomainSource::File(file.clone()));
}

#[test]
fn test_batch_follows_domain_source() {
    let single = command_argument_builder()
        .try_get_matches_from(["wayrecon", "example.com"])
        .unwrap();
    assert!(!options_from_matches(&single).unwrap().batch);

    let stdin = command_argument_builder()
        .try_get_matches_from(["wayrecon", "-"])
        .unwrap();
    assert_eq!(source_from_matches(&stdin), DomainSource::Stdin);
    assert!(options_from_matches(&stdin).unwrap().batch);

    let file = command_argument_builder()
        .try_get_matches_from(["wayrecon", "-H", "domains.txt"])
        .unwrap();
    assert!(options_from_matches(&file).unwrap().batch);
}

#[test]
fn test_options_from_matches_defaults() {
    let matches = command_argument_builder()
        .try_get_matches_from(["wayrecon", "example.com"])
        .unwrap();
    let options = options_from_matches(&matches).unwrap();

    assert_eq!(options.output, PathBuf::from("endpoints.json"));
    assert_eq!(options.limit, 100_000);
    assert_eq!(options.timeout_secs, 60);
    assert!(!options.verbose);
    assert_eq!(options.sort_order, SortOrder::Ascending);
    assert_eq!(options.endpoint, "http://web.archive.org/cdx/search/cdx");
}

#[test]
fn test_options_from_matches_flags() {
    let matches = command_argument_builder()
        .try_get_matches_from([
            "wayrecon", "-o", "out.json", "-l", "500", "-t", "10", "-v", "-s", "desc", "example.com",
        ])
        .unwrap();
    let options = options_from_matches(&matches).unwrap();

    assert_eq!(options.output, PathBuf::from("out.json"));
    assert_eq!(options.limit, 500);
    assert_eq!(options.timeout_secs, 10);
    assert!(options.verbose);
    assert_eq!(options.sort_order, SortOrder::Descending);
}

#[test]
fn test_limit_out_of_range_rejected() {
    let result = command_argument_builder().try_get_matches_from(["wayrecon", "-l", "0", "x.com"]);
    assert!(result.is_err());

    let result =
        command_argument_builder().try_get_matches_from(["wayrecon", "-l", "150001", "x.com"]);
    assert!(result.is_err());
}

#[test]
fn test_invalid_sort_rejected() {
    let result =
        command_argument_builder().try_get_matches_from(["wayrecon", "-s", "random", "x.com"]);
    assert!(result.is_err());
}

#[test]
fn test_verbose_and_quiet_conflict() {
    let result = command_argument_builder().try_get_matches_from(["wayrecon", "-v", "-q", "x.com"]);
    assert!(result.is_err());
}

#[tokio::test]
async fn test_handle_recon_single_domain_writes_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cdx"))
        .and(query_param("url", "http://example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[["original","timestamp","statuscode","mimetype"],
                ["https://example.com/login?username=a","20200101000000","200",""],
                [],
                ["null"]]"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.json");
    let endpoint = format!("{}/cdx", server.uri());
    let matches = command_argument_builder()
        .try_get_matches_from([
            "wayrecon",
            "-q",
            "-o",
            output.to_str().unwrap(),
            "--endpoint",
            endpoint.as_str(),
            "example.com",
        ])
        .unwrap();

    handle_recon(&matches).await.unwrap();

    let content = std::fs::read_to_string(&output).unwrap();
    let report: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0]["url"], "https://example.com/login?username=a");
    assert_eq!(report[0]["method"], "POST");
    assert_eq!(report[0]["parameters"][0], "username");
}

#[tokio::test]
async fn test_handle_recon_single_invalid_domain_fails() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.json");
    let long_domain = "a".repeat(300);
    let matches = command_argument_builder()
        .try_get_matches_from(["wayrecon", "-q", "-o", output.to_str().unwrap(), &long_domain])
        .unwrap();

    assert!(handle_recon(&matches).await.is_err());
    assert!(!output.exists());
}

#[tokio::test]
async fn test_handle_recon_batch_continues_past_bad_domain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cdx"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let domains_file = dir.path().join("domains.txt");
    std::fs::write(&domains_file, format!("{}\ngood.com\n", "a".repeat(300))).unwrap();
    let output = dir.path().join("{domain}.json");
    let endpoint = format!("{}/cdx", server.uri());

    let matches = command_argument_builder()
        .try_get_matches_from([
            "wayrecon",
            "-q",
            "-H",
            domains_file.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--endpoint",
            endpoint.as_str(),
        ])
        .unwrap();

    handle_recon(&matches).await.unwrap();

    let content = std::fs::read_to_string(dir.path().join("good.com.json")).unwrap();
    assert_eq!(content, "[]\n");
}
