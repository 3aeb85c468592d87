mod cli;
mod db;
mod error;
mod fmt;
mod grid;
mod importer;
mod logging;
mod models;
mod settings;
mod store;
mod tui;

use clap::Parser;

use cli::{Cli, Commands};
use error::Result;
use logging::init_logging;
use models::EditableRow;
use settings::load_settings;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.command {
        Some(Commands::Init { data_dir }) => cli::init::resolve_settings(data_dir.clone()),
        _ => load_settings(),
    };

    // `status` only reads, so it must not create a data dir `init` never made.
    let read_only = matches!(cli.command, Some(Commands::Status));
    let _guard = if read_only && !settings.data_path().exists() {
        None
    } else {
        let (log_path, guard) = init_logging(&settings.data_path(), &settings.log_level)?;
        tracing::debug!(log = %log_path.display(), "logging started");
        Some(guard)
    };

    match cli.command {
        None => cli::dashboard::run(settings),
        Some(Commands::Init { .. }) => cli::init::run(&settings),
        Some(Commands::Import { file }) => cli::import::run(&settings, &file),
        Some(Commands::Find {
            year,
            month,
            day,
            description,
            debit,
            credit,
        }) => cli::find::run(
            &settings,
            EditableRow {
                year: year.unwrap_or_default(),
                month: month.unwrap_or_default(),
                day: day.unwrap_or_default(),
                description: description.unwrap_or_default(),
                debit: debit.unwrap_or_default(),
                credit: credit.unwrap_or_default(),
            },
        ),
        Some(Commands::Status) => cli::status::run(&settings),
    }
}
