use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use trellis::app::Trellis;
use trellis::cli::{Cli, Commands};
use trellis::commands;
use trellis_core::vault::Vault;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        // Init runs before vault detection: there is nothing to open yet.
        Commands::Init(args) => commands::handle_init(args).await,
        command => {
            let vault = get_vault(cli.vault.clone()).await;
            let app = Trellis::new(vault);

            match command {
                Commands::Open(args) => commands::handle_open(args, app).await,
                Commands::Relation(args) => commands::handle_relation(args, app).await,
                Commands::Info(args) => commands::handle_info(args, app).await,
                Commands::Init(_) => unreachable!("handled above"),
            }
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn get_vault(cli_vault_flag: Option<PathBuf>) -> Result<Arc<Vault>> {
    if let Some(vault_path) = cli_vault_flag {
        // Open the vault at the specified path
        return Vault::open(&vault_path).await.map_err(|e| {
            anyhow::anyhow!("Failed to open vault at {}: {}", vault_path.display(), e)
        });
    }

    // If no vault is specified, find it in the current directory or its parents
    let mut dir = std::env::current_dir()?;
    loop {
        match Vault::open(&dir).await {
            Ok(vault) => return Ok(vault),
            Err(e) => debug!("No vault at {}: {}", dir.display(), e),
        }

        let Some(parent) = dir.parent() else { break };
        dir = parent.to_path_buf();
    }

    Err(anyhow::anyhow!("No vault found in current directory or its parents"))
}
