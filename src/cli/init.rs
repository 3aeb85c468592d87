use crate::db::open_data_dir;
use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path, shellexpand_path, Settings};

/// Settings `init` will write: `--data-dir` wins, otherwise ask on first run.
pub fn resolve_settings(data_dir: Option<String>) -> Settings {
    let mut settings = load_settings();
    let defaults = Settings::default();

    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    } else if !settings_path().exists() && settings.data_dir == defaults.data_dir {
        // First run: prompt for data dir
        println!("Data directory [{}]: ", settings.data_dir);
        let mut input = String::new();
        std::io::stdin().read_line(&mut input).ok();
        let chosen = input.trim();
        if !chosen.is_empty() {
            settings.data_dir = shellexpand_path(chosen);
        }
    }
    settings
}

pub fn run(settings: &Settings) -> Result<()> {
    save_settings(settings)?;

    let resolved = settings.data_path();
    open_data_dir(&resolved)?;
    tracing::info!(data_dir = %resolved.display(), "initialized");

    println!("Initialized budgie at {}", resolved.display());
    Ok(())
}
