mod watch;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sheetsync_catalog::SyncOrchestrator;
use sheetsync_core::{AppConfig, ProductId};

#[derive(Debug, Parser)]
#[command(name = "sheetsync")]
#[command(about = "Mirror a published product spreadsheet into a local catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sync once and print the catalog as JSON
    Sync {
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Sync once and print `name<TAB>price` lines
    Prices,
    /// Sync once and print a single product as JSON
    Show {
        /// Product id as it appears in the sheet
        id: String,
    },
    /// Resync on a fixed interval until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = sheetsync_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut orchestrator = build_orchestrator(&config)?;

    match cli.command {
        Commands::Sync { pretty } => {
            let catalog = orchestrator.sync().await;
            let json = if pretty {
                serde_json::to_string_pretty(&catalog)?
            } else {
                serde_json::to_string(&catalog)?
            };
            println!("{json}");
        }
        Commands::Prices => {
            let catalog = orchestrator.sync().await;
            for (name, price) in catalog.price_list() {
                println!("{name}\t{price}");
            }
        }
        Commands::Show { id } => {
            let catalog = orchestrator.sync().await;
            let product = catalog
                .find(&ProductId::from_cell(&id))
                .ok_or_else(|| anyhow::anyhow!("product '{id}' not found"))?;
            println!("{}", serde_json::to_string_pretty(product)?);
        }
        Commands::Watch => watch::run(orchestrator, &config).await?,
    }

    Ok(())
}

/// Builds the orchestrator, installing the seed catalog when one is configured.
fn build_orchestrator(config: &AppConfig) -> anyhow::Result<SyncOrchestrator> {
    let orchestrator = SyncOrchestrator::from_config(config)?;
    let Some(path) = &config.seed_path else {
        return Ok(orchestrator);
    };

    let seed = sheetsync_core::load_seed_catalog(path)?;
    tracing::info!(path = %path.display(), products = seed.len(), "loaded seed catalog");
    Ok(orchestrator.with_catalog(seed))
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn help_is_handled_by_clap() {
        let err = Cli::try_parse_from(["sheetsync", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn show_takes_product_id() {
        let cli = Cli::try_parse_from(["sheetsync", "show", "17"]).unwrap();
        assert!(matches!(cli.command, Commands::Show { ref id } if id == "17"));
    }

    #[test]
    fn sync_pretty_flag() {
        let cli = Cli::try_parse_from(["sheetsync", "sync", "--pretty"]).unwrap();
        assert!(matches!(cli.command, Commands::Sync { pretty: true }));
    }
}
