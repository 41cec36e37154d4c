//! `biopsy` command line.
//!
//! Subcommands:
//!   train  -- fit the classifier, print the evaluation and write the artifacts
//!   serve  -- load the artifacts and run the prediction web service

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use biopsy::config::load_or_default;
use biopsy::server::{self, AppState};
use biopsy::{training, Variant};
use clap::{Parser, Subcommand};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "biopsy", about = "Breast cancer classifier: trainer and prediction service")]
struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true, env = "BIOPSY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train, evaluate and persist the model.
    Train {
        /// Overrides the variant named in the config file.
        #[arg(long, value_enum)]
        variant: Option<Variant>,
    },

    /// Serve predictions over HTTP.
    Serve {
        #[arg(long, value_enum)]
        variant: Option<Variant>,

        /// Overrides `serve.listen_addr`.
        #[arg(long)]
        listen: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_or_default(cli.config.as_ref())?;

    match cli.command {
        Command::Train { variant } => {
            let variant = variant.unwrap_or(config.variant);
            let train_config = config.train_config(variant);
            info!(%variant, dataset = %train_config.dataset, "Starting training run");

            // dataset download uses a blocking HTTP client
            tokio::task::spawn_blocking(move || training::run(variant, &train_config))
                .await
                .context("training task panicked")?
                .with_context(|| format!("training the {variant} model failed"))?;
        }
        Command::Serve { variant, listen } => {
            let variant = variant.unwrap_or(config.variant);
            let listen_addr = listen.unwrap_or_else(|| config.serve.listen_addr.clone());

            let state = AppState::load(variant, &config.serve)
                .with_context(|| format!("loading {variant} artifacts failed"))?;
            server::serve(Arc::new(state), &listen_addr).await?;
        }
    }

    Ok(())
}
