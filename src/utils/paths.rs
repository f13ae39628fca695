use dirs::home_dir;
use std::{env, path::PathBuf};

pub const HOME_ENV: &str = "SAISIE_HOME";
const DEFAULT_DIR_NAME: &str = ".saisie";
const CONFIG_FILE: &str = "config.json";
const REFERENCE_FILE: &str = "reference.json";
const OUTBOX_DIR: &str = "outbox";

/// Returns the application data directory, defaulting to `~/.saisie`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn reference_file_in(base: &std::path::Path) -> PathBuf {
    base.join(REFERENCE_FILE)
}

pub fn outbox_dir_in(base: &std::path::Path) -> PathBuf {
    base.join(OUTBOX_DIR)
}
