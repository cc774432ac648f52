//! shelfcheck - Warehouse inventory lookup with live shop availability
//!
//! A CLI front for the shop scraping pipeline.

use anyhow::Result;
use clap::{Parser, Subcommand};
use shelfcheck::commands::{BatchCommand, LookupCommand};
use shelfcheck::config::{Config, OutputFormat};
use shelfcheck::shop::models::ProductQuery;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "shelfcheck",
    version,
    about = "Warehouse inventory lookup with live shop availability",
    long_about = "Checks product availability, image and detail-page URL against the shop's public search, with TLS fingerprint emulation for reliable scraping."
)]
struct Cli {
    /// Shop origin to query
    #[arg(long, global = true, env = "SHELF_BASE_URL")]
    base_url: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "SHELF_PROXY")]
    proxy: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one product by name and/or warehouse symbol
    #[command(alias = "l")]
    Lookup {
        /// Product name to search for
        name: Option<String>,

        /// Warehouse symbol, preferred over the name when both are given
        #[arg(short, long)]
        symbol: Option<String>,
    },

    /// Look up a list of warehouse symbols
    #[command(alias = "b")]
    Batch {
        /// Symbols to look up
        #[arg(required = true)]
        symbols: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    config.format = cli.format;

    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command {
        Commands::Lookup { name, symbol } => {
            let query = ProductQuery { name, symbol };
            let cmd = LookupCommand::new(config);
            let output = cmd.execute(&query).await?;
            println!("{}", output);
        }

        Commands::Batch { symbols } => {
            let cmd = BatchCommand::new(config);
            let output = cmd.execute(&symbols).await?;
            println!("{}", output);
        }
    }

    Ok(())
}
