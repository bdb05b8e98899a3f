use anyhow::Context;
use clap::Parser;
use portsweep::cli::{Cli, Commands, ScanCommand};
use portsweep::config::AppSettings;
use portsweep::output;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so they never mix with json/csv results on stdout.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "portsweep=debug" } else { "warn" })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = match &cli.config {
        Some(path) => AppSettings::load_from(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => AppSettings::load().context("loading settings")?,
    };

    match &cli.command {
        Some(Commands::Scan(cmd)) => cmd.execute(&settings, cli.verbose, cli.quiet).await?,
        Some(Commands::History(cmd)) => cmd.execute(cli.quiet)?,
        None => {
            ScanCommand::for_target(cli.legacy_target.clone())
                .execute(&settings, cli.verbose, cli.quiet)
                .await?
        }
    }

    Ok(())
}
