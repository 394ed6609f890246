use color_eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

use crate::config;

/// Installs the global subscriber: env filter, log file in the data
/// directory, stdout, and span traces for `color_eyre` reports
pub fn init() -> Result<()> {
    let directory = config::get_data_dir();
    std::fs::create_dir_all(&directory)?;
    let log_path = directory.join(config::LOG_FILE.clone());
    let log_file = std::fs::File::create(log_path)?;

    let env_filter = EnvFilter::builder().with_default_directive(LevelFilter::INFO.into());
    // RUST_LOG wins over the project variable
    let env_filter = env_filter
        .try_from_env()
        .or_else(|_| env_filter.with_env_var(config::LOG_ENV.clone()).from_env())?;

    let file_subscriber = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::sync::Mutex::new(log_file))
        .with_target(false)
        .with_ansi(false);
    let stdout_subscriber = fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_subscriber)
        .with(stdout_subscriber)
        .with(ErrorLayer::default())
        .try_init()?;
    Ok(())
}
