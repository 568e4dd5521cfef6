pub mod backup;
#[cfg(feature = "charts")]
pub mod chart;
pub mod export;
pub mod init;
pub mod menu;
pub mod report;
pub mod status;
pub mod transactions;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rusqlite::Connection;

use crate::db;
use crate::error::Result;
use crate::models::{parse_date, Category, Kind};
use crate::settings::{get_data_dir, load_settings};

/// Open the configured ledger, creating the data directory and schema on
/// first use.
pub(crate) fn open_ledger() -> Result<Connection> {
    let dir = get_data_dir();
    std::fs::create_dir_all(&dir)?;
    db::open(&dir.join(db::DB_FILE))
}

pub(crate) fn currency() -> String {
    load_settings().currency
}

#[derive(Parser)]
#[command(name = "penny", version, about = "Shared household ledger: who earned, who spent, and on what.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the database.
    Init {
        /// Path for penny data (default: ~/Documents/penny)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Default author for new transactions
        #[arg(long)]
        user: Option<String>,
    },
    /// Record a transaction.
    Add {
        /// Amount (always positive; direction comes from --kind)
        amount: f64,
        /// income or expense
        #[arg(long, default_value = "expense")]
        kind: Kind,
        /// shared or personal
        #[arg(long, default_value = "shared")]
        category: Category,
        /// Date: YYYY-MM-DD (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Free-text description
        #[arg(long, short = 'd', default_value = "")]
        description: String,
        /// Who earned or spent it (default: user from settings)
        #[arg(long)]
        author: Option<String>,
    },
    /// Change some fields of a transaction; others keep their value.
    Edit {
        /// Transaction ID
        id: i64,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        kind: Option<Kind>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long, short = 'd')]
        description: Option<String>,
        #[arg(long)]
        author: Option<String>,
    },
    /// Delete a transaction by ID.
    Delete {
        /// Transaction ID
        id: i64,
    },
    /// Show one transaction.
    Show {
        /// Transaction ID
        id: i64,
    },
    /// List transactions for a month (or all time) with a total row.
    List {
        /// Month filter: YYYY-MM (default: all time)
        #[arg(long)]
        month: Option<String>,
        /// Only income or only expense
        #[arg(long)]
        kind: Option<Kind>,
        /// Only this author
        #[arg(long)]
        author: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Summaries per author, category, or month.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Interactive terminal charts.
    #[cfg(feature = "charts")]
    Chart {
        #[command(subcommand)]
        command: ChartCommands,
    },
    /// Interactive menu (default when no command is given).
    Menu,
    /// Export transactions to CSV.
    Export {
        #[arg(long)]
        month: Option<String>,
        #[arg(long)]
        kind: Option<Kind>,
        #[arg(long)]
        author: Option<String>,
        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<String>,
    },
    /// Back up the database.
    Backup {
        /// Output path (default: <data_dir>/backups/penny-YYYYMMDD-HHMMSS.db)
        #[arg(long)]
        output: Option<String>,
    },
    /// Show current database and summary statistics.
    Status,
    /// Print shell completions.
    Completions {
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Income, expense and balance per author.
    Totals {
        /// Month filter: YYYY-MM (default: all time)
        #[arg(long)]
        month: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Expenses split into shared and personal.
    Categories {
        #[arg(long)]
        month: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Income per author with shares.
    Income {
        #[arg(long)]
        month: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Income and expense for each month of a year.
    Evolution {
        /// Year (default: current year)
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        json: bool,
    },
}

#[cfg(feature = "charts")]
#[derive(Subcommand)]
pub enum ChartCommands {
    /// Shared vs personal spending, and spending against income.
    Categories {
        #[arg(long)]
        month: Option<String>,
    },
    /// Income shares per author.
    Income {
        #[arg(long)]
        month: Option<String>,
    },
    /// Income and expense side by side for each author.
    Authors {
        #[arg(long)]
        month: Option<String>,
    },
    /// Monthly income and expense over a year.
    Evolution {
        #[arg(long)]
        year: Option<i32>,
    },
}
