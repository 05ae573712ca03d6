//! Catalog Reset binary.
//!
//! Drops every object in the pipeline schemas of a catalog and removes the
//! pipeline storage path. Safe to re-run after a partial failure.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_reset::cli::{Cli, Commands};
use catalog_reset::{ApiClient, Cleanup, CredentialEnv, CredentialResolver, ResetError};

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,catalog_reset=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    let resolver = CredentialResolver::from_env(&CredentialEnv::from_env()?);
    let api = match ApiClient::connect(&resolver, config.timeout) {
        Ok(api) => api,
        Err(e @ ResetError::Credentials(_)) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };
    let cleanup = Cleanup::new(&api, &config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let mut stdout = std::io::stdout();
        match cli.command {
            Commands::Clean(args) => {
                let report = cleanup.run(&args.storage_path, &mut stdout).await?;
                tracing::debug!(?report, "Cleanup report");
            }
            Commands::List => {
                cleanup.print_state(&mut stdout).await?;
            }
        }
        Ok::<(), anyhow::Error>(())
    })
}
