use colored::Colorize;
use fieldspider::{command_argument_builder, handle_crawl, init_tracing};
use fieldspider_core::{ConfigError, print_banner};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let mut cmd = command_argument_builder();
    let matches = cmd.clone().get_matches();

    if !matches.get_flag("quiet") {
        print_banner();
    }
    init_tracing(matches.get_count("verbose"));

    match handle_crawl(&matches).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            if e.downcast_ref::<ConfigError>().is_some() {
                eprintln!();
                eprintln!("{}", cmd.render_help());
            }
            ExitCode::from(1)
        }
    }
}
