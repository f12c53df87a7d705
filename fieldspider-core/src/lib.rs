pub mod crawl;
pub mod seeds;

use colored::Colorize;

pub use crawl::{
    ConcurrencyLevel, CrawlOptions, execute_crawl, execute_crawl_with_sink,
};
pub use seeds::{ConfigError, load_seeds, load_seeds_from_file, parse_seed, parse_seed_list};

/// Banner goes to stderr; stdout is reserved for input records.
pub fn print_banner() {
    eprintln!(
        "{} {}",
        "fieldspider".bright_green().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
    eprintln!("{}", "scoped crawler for <input> discovery".bright_black());
    eprintln!();
}
