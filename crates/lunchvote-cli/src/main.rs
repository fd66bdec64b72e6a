mod check;
mod scrape;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lunchvote-cli")]
#[command(about = "Extracts today's lunch menus from venue websites")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract menus and print each one as a JSON line
    Scrape {
        /// Only this venue (statistics keyword)
        #[arg(long)]
        venue: Option<String>,
        /// Day to extract, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// List what would be fetched without fetching
        #[arg(long)]
        dry_run: bool,
    },
    /// List registered venues
    Venues,
    /// Check that the document converters are installed
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = lunchvote_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let (registry, config_errors) = scrape::load_registry(&config)?;

    match cli.command {
        Some(Commands::Scrape {
            venue,
            date,
            dry_run,
        }) => scrape::run_scrape(&config, &registry, venue.as_deref(), date, dry_run).await,
        Some(Commands::Venues) => {
            scrape::print_venues(&registry);
            Ok(())
        }
        Some(Commands::Check) => check::run_check(&config, &config_errors),
        None => {
            println!("lunchvote-cli: {} venues registered, try --help", registry.len());
            Ok(())
        }
    }
}
