mod bootstrap;
mod shell;

use std::io::IsTerminal;

use anyhow::Result;
use bikeshare_core::settings::Settings;
use bikeshare_data::reader::TripLoader;
use shell::{Session, TerminalPrompter};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Bikeshare explorer v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data dir: {}, page size: {}",
        settings.data_dir.display(),
        settings.page_size
    );

    let available = bootstrap::check_data_dir(&settings.data_dir);
    tracing::debug!(
        "{} of {} city files available",
        available.len(),
        bikeshare_core::models::City::ALL.len()
    );

    let loader = TripLoader::new(settings.data_dir.clone());
    let mut session = Session::new(
        loader,
        usize::from(settings.page_size),
        TerminalPrompter,
        std::io::stdout(),
    )
    .with_spinner(std::io::stderr().is_terminal());

    session.run()
}
