pub mod dashboard;
pub mod find;
pub mod grid_view;
pub mod import;
pub mod init;
pub mod results;
pub mod search;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "budgie", about = "Keep a ledger of card and bank transactions in the terminal.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the database.
    Init {
        /// Path for budgie data (default: ~/Documents/budgie)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Import transactions from a CSV file (date, description, debit, credit, total).
    Import {
        /// Path to the CSV file
        file: String,
    },
    /// Search stored transactions. Omitted criteria match everything.
    Find {
        /// Year, e.g. 2024
        #[arg(long)]
        year: Option<String>,
        /// Month number or three-letter name, e.g. 3 or Mar
        #[arg(long)]
        month: Option<String>,
        /// Day of the month
        #[arg(long)]
        day: Option<String>,
        /// Case-insensitive text contained in the description
        #[arg(long)]
        description: Option<String>,
        /// Exact debit amount
        #[arg(long)]
        debit: Option<String>,
        /// Exact credit amount
        #[arg(long)]
        credit: Option<String>,
    },
    /// Show current data directory and transaction count.
    Status,
}
