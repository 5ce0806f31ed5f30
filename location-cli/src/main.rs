//! Binary crate for the `location` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Printing the rendered report as a two-column table

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod output;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.verbose);
    cmd.run().await
}

/// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "location_core=debug,location_cli=debug"
    } else {
        "warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_enables_debug_for_both_crates() {
        let filter = default_filter(true);
        assert!(filter.contains("location_core=debug"));
        assert!(filter.contains("location_cli=debug"));
        assert!(EnvFilter::try_new(filter).is_ok());
    }

    #[test]
    fn quiet_by_default() {
        assert_eq!(default_filter(false), "warn");
    }
}
