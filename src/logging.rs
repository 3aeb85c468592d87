use std::path::{Path, PathBuf};

use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{BudgieError, Result};

/// Name of a fresh log file, e.g. `budgie-2024-03-02-14-05-09.log`.
pub fn log_file_name() -> String {
    format!("budgie-{}.log", Local::now().format("%Y-%m-%d-%H-%M-%S"))
}

/// Route `tracing` output to `<data_dir>/logs/budgie-<timestamp>.log`.
///
/// `RUST_LOG` takes precedence over `level`. Keep the returned guard alive
/// until exit or buffered lines are lost.
pub fn init_logging(data_dir: &Path, level: &str) -> Result<(PathBuf, WorkerGuard)> {
    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir)?;

    let log_filename = log_file_name();
    let log_path = logs_dir.join(&log_filename);

    let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| BudgieError::Other(format!("Could not start logging: {e}")))?;

    Ok((log_path, guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name_shape() {
        let name = log_file_name();
        assert!(name.starts_with("budgie-"));
        assert!(name.ends_with(".log"));
        // budgie- + YYYY-MM-DD-HH-MM-SS + .log
        assert_eq!(name.len(), "budgie-".len() + 19 + ".log".len());
    }
}
