mod aggregate;
#[cfg(feature = "charts")]
mod charts;
mod cli;
mod db;
mod error;
mod fmt;
mod models;
mod period;
mod reports;
mod settings;
mod store;
#[cfg(feature = "charts")]
mod tui;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "charts")]
use cli::ChartCommands;
use cli::{Cli, Commands, ReportCommands};
use models::TransactionPatch;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("penny=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Init { data_dir, user } => cli::init::run(data_dir, user),
        Commands::Add {
            amount,
            kind,
            category,
            date,
            description,
            author,
        } => cli::transactions::add(amount, kind, category, date, description, author),
        Commands::Edit {
            id,
            date,
            amount,
            kind,
            category,
            description,
            author,
        } => cli::transactions::edit(
            id,
            TransactionPatch {
                date,
                amount,
                kind,
                category,
                description,
                author,
            },
        ),
        Commands::Delete { id } => cli::transactions::delete(id),
        Commands::Show { id } => cli::transactions::show(id),
        Commands::List {
            month,
            kind,
            author,
            json,
        } => cli::report::list(month, kind, author, json),
        Commands::Report { command } => match command {
            ReportCommands::Totals { month, json } => cli::report::totals(month, json),
            ReportCommands::Categories { month, json } => cli::report::categories(month, json),
            ReportCommands::Income { month, json } => cli::report::income(month, json),
            ReportCommands::Evolution { year, json } => cli::report::evolution(year, json),
        },
        #[cfg(feature = "charts")]
        Commands::Chart { command } => match command {
            ChartCommands::Categories { month } => cli::chart::categories(month),
            ChartCommands::Income { month } => cli::chart::income(month),
            ChartCommands::Authors { month } => cli::chart::authors(month),
            ChartCommands::Evolution { year } => cli::chart::evolution(year),
        },
        Commands::Menu => cli::menu::run(),
        Commands::Export {
            month,
            kind,
            author,
            output,
        } => cli::export::run(month, kind, author, output),
        Commands::Backup { output } => cli::backup::run(output),
        Commands::Status => cli::status::run(),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "penny", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
