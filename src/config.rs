//! Resolves configuration file locations.
use std::{env, path::PathBuf};

const DEFAULT_CONFIG_DIR: &str = "config";
const CONFIG_DIR_VAR: &str = "SCENE_CONFIG_DIR";

/// Path of `file_name` inside the config directory (`SCENE_CONFIG_DIR` or `config/`).
pub fn config_path(file_name: &str) -> PathBuf {
    let dir = env::var(CONFIG_DIR_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_DIR.to_string());
    PathBuf::from(dir).join(file_name)
}
