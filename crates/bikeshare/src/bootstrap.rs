use std::path::Path;

use bikeshare_core::models::City;
use bikeshare_core::settings::city_file_in;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a Python-style level name (`"WARNING"`, `"CRITICAL"`, ...) to a
/// tracing filter directive. Unknown names pass through lower-cased.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to stderr so that reports printed on stdout stay clean.
/// Falls back to `"warn"` if the level string is not a valid directive.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Data directory check ───────────────────────────────────────────────────────

/// Log which city files are available under `data_dir`.
///
/// Missing files are not fatal here: loading a city whose file is absent
/// reports a "file not found" error at the prompt instead. Returns the
/// cities whose files exist.
pub fn check_data_dir(data_dir: &Path) -> Vec<City> {
    if !data_dir.is_dir() {
        warn!("Data directory does not exist: {}", data_dir.display());
        return Vec::new();
    }

    City::ALL
        .into_iter()
        .filter(|&city| {
            let path = city_file_in(data_dir, city);
            let found = path.is_file();
            if found {
                debug!("Found data for {} at {}", city, path.display());
            } else {
                warn!("No data file for {}: {}", city, path.display());
            }
            found
        })
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
