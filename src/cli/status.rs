use crate::db::get_connection;
use crate::error::Result;
use crate::settings::{settings_path, Settings};
use crate::store::TransactionStore;

pub fn run(settings: &Settings) -> Result<()> {
    let db_path = settings.db_path();

    println!("Settings:   {}", settings_path().display());
    println!("Data dir:   {}", settings.data_dir);
    println!("Database:   {}", db_path.display());
    println!("Page size:  {}", settings.page_size);

    if db_path.exists() {
        let conn = get_connection(&db_path)?;
        println!();
        println!("Transactions:  {}", conn.count()?);
    } else {
        println!();
        println!("Database not found. Run `budgie init` to set up.");
    }

    Ok(())
}
