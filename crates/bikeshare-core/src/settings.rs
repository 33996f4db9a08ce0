use clap::Parser;
use std::path::{Path, PathBuf};

use crate::models::City;

/// Rows shown per raw-data page unless overridden.
pub const DEFAULT_PAGE_SIZE: u16 = 5;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Explore US bike share data interactively
///
/// City, month and day are always chosen at the interactive prompts; the
/// options below only tune where data lives and how the session behaves.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bikeshare",
    about = "Explore US bike share data interactively",
    version
)]
pub struct Settings {
    /// Directory holding the per-city CSV files
    #[arg(long, env = "BIKESHARE_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Rows shown per page when viewing raw data (1-100)
    #[arg(
        long,
        env = "BIKESHARE_PAGE_SIZE",
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u16).range(1..=100)
    )]
    pub page_size: u16,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

}

/// Path of the CSV file for `city` inside `data_dir`.
pub fn city_file_in(data_dir: &Path, city: City) -> PathBuf {
    data_dir.join(city.file_name())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
