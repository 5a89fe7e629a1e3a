use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::constants::{
    DEFAULT_QUOTE_CURRENCY, DEFAULT_VOLUME_SMA_WINDOW, MIN_CONSTITUENTS, TOP_N_FOR_TOTAL2,
};

#[derive(Parser)]
#[command(name = "halvix")]
#[command(about = "TOTAL2 altcoin index across Bitcoin halving cycles", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Calculate the TOTAL2 index from cached prices and save it
    Total2 {
        /// Number of coins in the daily basket
        #[arg(long, default_value_t = TOP_N_FOR_TOTAL2)]
        top_n: usize,

        /// Volume smoothing window in days
        #[arg(short, long, default_value_t = DEFAULT_VOLUME_SMA_WINDOW)]
        window: usize,

        /// Minimum basket size for a day to be published
        #[arg(long, default_value_t = MIN_CONSTITUENTS)]
        min_constituents: usize,

        /// Quote currency of the cached price series
        #[arg(short, long, default_value = DEFAULT_QUOTE_CURRENCY)]
        quote: String,

        /// First published date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Last published date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,

        /// Hide progress bars
        #[arg(long)]
        quiet: bool,
    },
    /// Show the basket on a given date
    Composition {
        /// Date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
    },
    /// Show when a coin was part of the basket
    CoinHistory {
        /// Coin id (e.g., eth)
        #[arg(short, long)]
        coin: String,
    },
    /// Run the eligibility filter over a coin list
    Filter {
        /// Coin list JSON (array or { "data": [...] })
        #[arg(short, long)]
        coins: PathBuf,

        /// Write excluded coins to this CSV file
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Base currency excluded from the index
        #[arg(short, long, default_value = DEFAULT_QUOTE_CURRENCY)]
        quote: String,

        /// Use the download rules (keeps the base currency)
        #[arg(long)]
        download: bool,
    },
    /// Import a saved CryptoCompare histoday response into the price cache
    Import {
        /// Coin id (e.g., eth)
        #[arg(short, long)]
        coin: String,

        /// Path to the histoday JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Quote currency of the response
        #[arg(short, long, default_value = DEFAULT_QUOTE_CURRENCY)]
        quote: String,
    },
    /// Show cached prices and saved results
    Status,
}

pub fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Total2 {
            top_n,
            window,
            min_constituents,
            quote,
            start,
            end,
            quiet,
        } => {
            commands::total2::run(commands::total2::Total2Options {
                top_n,
                window,
                min_constituents,
                quote,
                start,
                end,
                quiet,
            });
        }
        Commands::Composition { date } => {
            commands::composition::run(&date);
        }
        Commands::CoinHistory { coin } => {
            commands::coin_history::run(&coin);
        }
        Commands::Filter {
            coins,
            export,
            quote,
            download,
        } => {
            commands::filter::run(&coins, export.as_deref(), &quote, download);
        }
        Commands::Import { coin, file, quote } => {
            commands::import::run(&coin, &file, &quote);
        }
        Commands::Status => {
            commands::status::run();
        }
    }
}
