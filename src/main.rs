//! rollplan - rolling update plan builder CLI.
//!
//! Loads a cluster description, resolves runtime configuration updates with
//! the offline rotator and prints the resulting plan.

mod config;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};

use config::{Args, Command, LogFormat};
use rollplan::description::ClusterDescription;
use rollplan::plan::Plan;
use rollplan::rollingupdate::{self, OfflineRotator};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    if let Err(e) = init_tracing(&args.log_level, args.log_format) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    debug!(
        "Starting rollplan v{} (commit: {}, build: {})",
        config::VERSION,
        config::COMMIT,
        config::BUILD_DATE
    );

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber. Logs go to stderr so stdout carries only the plan.
fn init_tracing(log_level: &str, log_format: LogFormat) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| anyhow::anyhow!("Failed to initialize log filter: {e}"))?;

    let subscriber = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    match log_format {
        LogFormat::Json => subscriber.json().with_target(true).init(),
        LogFormat::Text => subscriber.with_target(false).init(),
    }

    Ok(())
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Build {
            input,
            with_secrets,
            format,
        } => {
            let desc = ClusterDescription::load(&input)?;
            let plan = rollingupdate::plan_update(&desc, &OfflineRotator, with_secrets)
                .await
                .with_context(|| format!("Failed to plan update of {}", desc.cluster_name))?;
            print!("{}", output::render(&plan, format)?);
        }
        Command::Schema => {
            let schema = schemars::schema_for!(Plan);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }
    Ok(())
}
