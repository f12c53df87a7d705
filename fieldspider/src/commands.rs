use crate::CLAP_STYLING;
use clap::{ArgAction, arg};

const EXAMPLES: &str = "\
Examples:
  fieldspider -u http://www.example.com/
  fieldspider -u https://127.0.0.1:8080/
  fieldspider -u http://127.0.0.1,http://www.example.com/
  fieldspider -f ~/urls.txt -c 5
  fieldspider -v -u http://www.example.com/example/
  fieldspider -vv -u 'http://www.example.com/example/page/1?id=2#heading'";

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("fieldspider")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("fieldspider")
        .about(
            "Crawl a whitelisted scope and report every <input> element found. The scheme and \
            host of each seed URL form the whitelist.",
        )
        .styles(CLAP_STYLING)
        .after_help(EXAMPLES)
        .arg(
            arg!(-u --"urls" <URLS>)
                .required(false)
                .help("URL or comma-separated list of URLs to crawl"),
        )
        .arg(
            arg!(-f --"url-file" <PATH>)
                .required(false)
                .help("Path to a newline-separated file of URLs to crawl")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            arg!(-c --"concurrency" <LEVEL>)
                .required(false)
                .help("Concurrency level 0-5 (1, 5, 10, 20, 50 or 100 pages at once)")
                .value_parser(clap::value_parser!(i64))
                .allow_negative_numbers(true)
                .default_value("3"),
        )
        .arg(
            arg!(-t --"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds (1-3600)")
                .value_parser(clap::value_parser!(u64).range(1..=3600))
                .default_value("10"),
        )
        .arg(
            arg!(--"format" <FORMAT>)
                .required(false)
                .help("Output format for discovered inputs")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            arg!(--"verify-tls")
                .required(false)
                .help("Validate TLS certificates (skipped by default for self-signed targets)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(-v --"verbose")
                .required(false)
                .help("Log discovered URLs; repeat (-vv) to also log page processing")
                .action(ArgAction::Count),
        )
        .arg(
            arg!(-p --"progress")
                .required(false)
                .help("Show a progress spinner on stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
}
