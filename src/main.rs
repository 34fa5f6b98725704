use clap::Parser;
use tracing_subscriber::EnvFilter;

use sales_insight::chart;
use sales_insight::cli::{self, Cli};
use sales_insight::config::AppConfig;

fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            chart::error(&format!("Failed to load config: {e}"));
            std::process::exit(1);
        }
    };

    // The fmt subscriber's log bridge picks up the library's `log` records.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(e) = cli::execute(cli.command, &config) {
        chart::error(&format!("{e}"));
        std::process::exit(1);
    }
}
