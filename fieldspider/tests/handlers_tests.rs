use fieldspider::handlers::*;
use fieldspider::command_argument_builder;
use fieldspider_core::{ConcurrencyLevel, ConfigError};
use fieldspider_scanner::{OutputFormat, TlsPolicy};
use std::io::Write;
use tempfile::NamedTempFile;
use tracing_subscriber::filter::LevelFilter;

fn parse(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["fieldspider"];
    argv.extend_from_slice(args);
    command_argument_builder()
        .try_get_matches_from(argv)
        .unwrap()
}

#[test]
fn test_command_definition_is_valid() {
    command_argument_builder().debug_assert();
}

#[test]
fn test_defaults() {
    let matches = parse(&["-u", "http://www.example.com/"]);
    let options = crawl_options_from_matches(&matches).unwrap();

    assert_eq!(options.seeds.len(), 1);
    assert_eq!(options.concurrency, ConcurrencyLevel(3));
    assert_eq!(options.concurrency.worker_limit(), 20);
    assert_eq!(options.timeout_secs, 10);
    assert_eq!(options.format, OutputFormat::Text);
    assert_eq!(options.tls, TlsPolicy::AcceptInvalidCerts);
    assert!(!options.show_progress_bars);
}

#[test]
fn test_all_flags() {
    let matches = parse(&[
        "-u",
        "http://127.0.0.1,http://www.example.com/",
        "-c",
        "0",
        "-t",
        "3",
        "--format",
        "json",
        "--verify-tls",
        "-p",
    ]);
    let options = crawl_options_from_matches(&matches).unwrap();

    assert_eq!(options.seeds.len(), 2);
    assert_eq!(options.concurrency.worker_limit(), 1);
    assert_eq!(options.timeout_secs, 3);
    assert_eq!(options.format, OutputFormat::Json);
    assert_eq!(options.tls, TlsPolicy::Verify);
    assert!(options.show_progress_bars);
}

#[test]
fn test_timeout_out_of_range_is_rejected() {
    for timeout in ["0", "3601", "1844674407370955161"] {
        let result = command_argument_builder().try_get_matches_from([
            "fieldspider",
            "-u",
            "http://a.com/",
            "-t",
            timeout,
        ]);
        assert!(result.is_err(), "timeout {} should be rejected", timeout);
    }

    let matches = parse(&["-u", "http://a.com/", "-t", "3600"]);
    let options = crawl_options_from_matches(&matches).unwrap();
    assert_eq!(options.timeout_secs, 3600);
}

#[test]
fn test_unknown_concurrency_level_falls_back() {
    let matches = parse(&["-u", "http://a.com/", "-c", "9"]);
    let options = crawl_options_from_matches(&matches).unwrap();
    assert_eq!(options.concurrency.worker_limit(), 20);

    let matches = parse(&["-u", "http://a.com/", "-c", "-2"]);
    let options = crawl_options_from_matches(&matches).unwrap();
    assert_eq!(options.concurrency.worker_limit(), 20);
}

#[test]
fn test_url_file_seeds() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "http://127.0.0.1:8080/")?;
    writeln!(temp_file, "https://www.example.com/")?;

    let path = temp_file.path().to_string_lossy().to_string();
    let matches = parse(&["-f", &path]);
    let options = crawl_options_from_matches(&matches)?;

    assert_eq!(options.seeds.len(), 2);
    Ok(())
}

#[test]
fn test_missing_seeds_is_a_configuration_error() {
    let matches = parse(&[]);
    let result = crawl_options_from_matches(&matches);
    assert!(matches!(result, Err(ConfigError::NoSeeds)));
}

#[test]
fn test_invalid_seed_is_a_configuration_error() {
    let matches = parse(&["-u", "not a url"]);
    let result = crawl_options_from_matches(&matches);
    assert!(matches!(result, Err(ConfigError::InvalidSeed { .. })));
}

#[test]
fn test_verbosity_levels() {
    let matches = parse(&["-vv", "-u", "http://a.com/"]);
    assert_eq!(matches.get_count("verbose"), 2);

    assert_eq!(verbosity_level(0), LevelFilter::WARN);
    assert_eq!(verbosity_level(1), LevelFilter::INFO);
    assert_eq!(verbosity_level(2), LevelFilter::DEBUG);
    assert_eq!(verbosity_level(7), LevelFilter::DEBUG);
}

#[tokio::test]
async fn test_handle_crawl_rejects_missing_seeds_before_crawling() {
    let matches = parse(&[]);
    let err = handle_crawl(&matches).await.unwrap_err();
    assert!(err.downcast_ref::<ConfigError>().is_some());
}
