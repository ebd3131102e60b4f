use std::{env, path::PathBuf};

use crate::{APP_USER_MODEL_ID, SETTINGS_DIR_ENV};

fn non_empty_env_path(key: &str) -> Option<PathBuf> {
    let value = env::var(key).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

fn platform_config_root() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        return non_empty_env_path("APPDATA")
            .or_else(|| home::home_dir().map(|home| home.join("AppData").join("Roaming")));
    }

    if cfg!(target_os = "macos") {
        return home::home_dir().map(|home| home.join("Library").join("Application Support"));
    }

    non_empty_env_path("XDG_CONFIG_HOME").or_else(|| home::home_dir().map(|home| home.join(".config")))
}

/// Directory holding the persisted settings store.
pub fn default_settings_dir() -> Option<PathBuf> {
    if let Some(dir) = non_empty_env_path(SETTINGS_DIR_ENV) {
        return Some(dir);
    }

    platform_config_root().map(|root| root.join(APP_USER_MODEL_ID))
}
