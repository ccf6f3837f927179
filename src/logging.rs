use std::{
    error::Error,
    fs::{self, OpenOptions},
    path::Path,
    sync::Arc,
};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directives are read from this variable (e.g. `STUBSERVER_LOG=debug`).
pub const LOG_ENV: &str = "STUBSERVER_LOG";
pub const LOG_FILE_NAME: &str = "mock-server.log";

pub fn env_filter() -> EnvFilter {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(f) => f,
        Err(_) => EnvFilter::new("info"),
    }
}

/// Installs the global subscriber: human-readable console output, plus JSON
/// lines appended to `<log_dir>/mock-server.log` when a directory is given.
pub fn init(log_dir: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let file_layer = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(LOG_FILE_NAME))?;
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(Arc::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .try_init()?;
    Ok(())
}
