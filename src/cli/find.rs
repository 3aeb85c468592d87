use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::search::criteria_or_error;
use crate::db::open_data_dir;
use crate::error::Result;
use crate::fmt::{amount_cell, money};
use crate::models::EditableRow;
use crate::settings::Settings;
use crate::store::TransactionStore;

pub fn run(settings: &Settings, texts: EditableRow) -> Result<()> {
    let criteria = criteria_or_error(&texts)?;
    let conn = open_data_dir(&settings.data_path())?;
    let found = conn.find(&criteria)?;

    if found.is_empty() {
        println!("No transactions match {}.", criteria.describe());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Description", "Debit", "Credit"]);
    let mut debits = 0.0;
    let mut credits = 0.0;
    for t in &found {
        debits += t.debit;
        credits += t.credit;
        table.add_row(vec![
            Cell::new(t.id.unwrap_or_default()),
            Cell::new(format!("{:04}-{:02}-{:02}", t.year, t.month, t.day)),
            Cell::new(&t.description),
            Cell::new(amount_cell(t.debit)),
            Cell::new(amount_cell(t.credit)),
        ]);
    }
    table.add_row(vec![
        Cell::new(""),
        Cell::new(""),
        Cell::new("Total".bold()),
        Cell::new(money(debits).red()),
        Cell::new(money(credits).green()),
    ]);
    println!("{table}");
    println!("{} transaction(s) matching {}", found.len(), criteria.describe());
    Ok(())
}
