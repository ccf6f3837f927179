use std::{env, path::PathBuf};

use tracing::{info, warn};

pub const DEFAULT_ENDPOINTS_DIR: &str = "./endpoints";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_HOST: &str = "0.0.0.0";

pub fn default_port() -> u16 {
    8080
}

/// Runtime settings, sourced from the environment and then overridden by
/// command-line flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoints_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_dir: PathBuf,
    pub cors: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            endpoints_dir: PathBuf::from(DEFAULT_ENDPOINTS_DIR),
            host: DEFAULT_HOST.to_string(),
            port: default_port(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            cors: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Log directory alone, read before the subscriber exists.
    pub fn log_dir_from_env() -> PathBuf {
        env::var("LOG_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
    }

    /// Builds settings from an arbitrary variable lookup. Unset, empty or
    /// unparsable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Settings::default();

        match get("JSON_FOLDER_PATH") {
            Some(dir) => settings.endpoints_dir = PathBuf::from(dir),
            None => info!(
                default = DEFAULT_ENDPOINTS_DIR,
                "JSON_FOLDER_PATH not set, using default"
            ),
        }

        match get("PORT").map(|p| p.trim().parse::<u16>()) {
            Some(Ok(port)) => settings.port = port,
            Some(Err(e)) => warn!(error = %e, default = settings.port, "invalid PORT, using default"),
            None => info!(default = settings.port, "PORT not set, using default"),
        }

        if let Some(host) = get("HOST") {
            settings.host = host.trim().to_string();
        }

        if let Some(dir) = get("LOG_PATH") {
            settings.log_dir = PathBuf::from(dir);
        }

        if let Some(flag) = get("STUB_CORS") {
            settings.cors = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        settings
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
