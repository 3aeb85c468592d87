use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::db::open_data_dir;
use crate::error::Result;
use crate::fmt::amount_cell;
use crate::importer::{import_file, RowOutcome};
use crate::settings::Settings;

pub fn run(settings: &Settings, file: &str) -> Result<()> {
    let file_path = PathBuf::from(file);
    let conn = open_data_dir(&settings.data_path())?;

    let report = import_file(&conn, &file_path)?;

    let mut table = Table::new();
    table.set_header(vec!["Line", "Date", "Description", "Debit", "Credit", "Result"]);
    for row in &report.rows {
        let t = &row.transaction;
        let outcome = match row.outcome {
            RowOutcome::Inserted => "inserted".green(),
            RowOutcome::Duplicate => "duplicate".yellow(),
            RowOutcome::Invalid => "invalid".red(),
        };
        let date = if t.is_valid {
            format!("{:04}-{:02}-{:02}", t.year, t.month, t.day)
        } else {
            String::new()
        };
        table.add_row(vec![
            Cell::new(row.line),
            Cell::new(date),
            Cell::new(&t.description),
            Cell::new(amount_cell(t.debit)),
            Cell::new(amount_cell(t.credit)),
            Cell::new(outcome),
        ]);
    }
    println!("{table}");
    println!(
        "{} inserted, {} skipped (duplicates), {} invalid",
        report.inserted(),
        report.duplicates(),
        report.invalid()
    );
    Ok(())
}
