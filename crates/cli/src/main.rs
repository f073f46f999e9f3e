//! Feria CLI - Dashboard snapshots and stock reports from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Dump the full aggregated dashboard snapshot as JSON
//! feria snapshot --pretty
//!
//! # Stock coverage, most urgent first
//! feria coverage
//!
//! # Reorder alerts only, searched and re-sorted
//! feria coverage --filter alert --search termo --sort velocity
//! ```
//!
//! # Commands
//!
//! - `snapshot` - Fetch the feed, aggregate, print the snapshot JSON
//! - `coverage` - Print the stock-coverage table
//!
//! Configuration comes from the same environment variables as the server
//! (`APPS_SCRIPT_URL`, `REVALIDATE_SECONDS`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(name = "feria")]
#[command(author, version, about = "Feria CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the feed and print the aggregated dashboard snapshot
    Snapshot {
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the stock-coverage table
    Coverage {
        /// Case-insensitive search over title and SKU
        #[arg(long)]
        search: Option<String>,

        /// Status bucket to show
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,

        /// Sort order
        #[arg(long, value_enum, default_value_t = SortArg::Coverage)]
        sort: SortArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    All,
    /// Reorder band: has stock, coverage under the alert threshold
    Alert,
    /// No units left
    Zero,
    /// At or above the alert threshold
    Ok,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    /// Days of coverage, ascending (most urgent first)
    Coverage,
    /// Current stock, descending
    Stock,
    /// Daily velocity, descending
    Velocity,
    /// Title, ascending
    Name,
}

#[tokio::main]
async fn main() {
    // Initialize tracing (stderr, so stdout stays clean for data output)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Snapshot { pretty } => commands::snapshot::run(pretty).await?,
        Commands::Coverage {
            search,
            filter,
            sort,
        } => {
            commands::coverage::run(search.as_deref().unwrap_or(""), filter.into(), sort.into())
                .await?;
        }
    }
    Ok(())
}

impl From<FilterArg> for feria_core::analytics::stock::StockStatusFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => Self::All,
            FilterArg::Alert => Self::Alert,
            FilterArg::Zero => Self::OutOfStock,
            FilterArg::Ok => Self::Ok,
        }
    }
}

impl From<SortArg> for feria_core::analytics::stock::StockSortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Coverage => Self::Coverage,
            SortArg::Stock => Self::Stock,
            SortArg::Velocity => Self::Velocity,
            SortArg::Name => Self::Name,
        }
    }
}
