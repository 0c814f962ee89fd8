#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod context;
mod output;

/// Overrides `--quiet`/`--verbose` with a full filter directive.
const LOG_ENV: &str = "REDPIN_LOG";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("redpin: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    install_logging(default_directive(cli.quiet, cli.verbose))?;
    let flags = cli.global_flags();

    // Schemas are compiled in; printing them needs no store.
    if let cli::Commands::Schema(args) = &cli.command {
        return commands::schema::handle(args, &flags);
    }

    let config = context::load_config(flags.config.as_deref())?;
    let ctx = context::AppContext::init(config)
        .await
        .context("cannot open the redpin store")?;

    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

/// Verbose mode only raises the store and sync crates to debug.
fn default_directive(quiet: bool, verbose: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, true) => "warn,redpin_db=debug,redpin_cli=debug",
        (false, false) => "warn",
    }
}

fn install_logging(directive: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("cannot install log subscriber: {error}"))
}

#[cfg(test)]
mod tests {
    use super::default_directive;

    #[test]
    fn quiet_beats_verbose() {
        assert_eq!(default_directive(true, true), "error");
    }

    #[test]
    fn verbose_scopes_debug_to_redpin_crates() {
        let directive = default_directive(false, true);
        assert!(directive.starts_with("warn,"));
        assert!(directive.contains("redpin_db=debug"));
    }
}
