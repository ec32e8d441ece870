//! Settings loading
//!
//! Looks for `.perfx/config.toml` in the working directory first, then
//! `<config_dir>/perf-explorer/config.toml`. Missing or malformed files
//! fall back to defaults.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use url::Url;

use perfx_core::prelude::*;

use super::types::Settings;

pub const PERFX_DIR: &str = ".perfx";
pub const CONFIG_FILENAME: &str = "config.toml";

/// Environment variable that overrides `[api] token`
pub const TOKEN_ENV: &str = "PERFX_API_TOKEN";

/// Load settings from `.perfx/config.toml`, falling back to the user config dir
pub fn load_settings(project_path: &Path) -> Settings {
    let local = project_path.join(PERFX_DIR).join(CONFIG_FILENAME);
    if local.exists() {
        return read_settings(&local);
    }

    match user_config_path() {
        Some(path) if path.exists() => read_settings(&path),
        _ => {
            debug!("No config file at {:?}, using defaults", local);
            Settings::default()
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("perf-explorer").join(CONFIG_FILENAME))
}

fn read_settings(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            Settings::default()
        }
    }
}

/// Resolve the API token; the environment wins over the config file
pub fn resolve_token(settings: &Settings) -> Option<String> {
    std::env::var(TOKEN_ENV)
        .ok()
        .filter(|token| !token.trim().is_empty())
        .or_else(|| settings.api.token.clone())
        .filter(|token| !token.trim().is_empty())
}

/// Parse and validate `[api] host`
pub fn api_host(settings: &Settings) -> Result<Url> {
    let url = Url::parse(&settings.api.host).map_err(|e| {
        Error::config_invalid(format!("api.host {:?}: {}", settings.api.host, e))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::config_invalid(format!(
            "api.host must be http(s), got {:?}",
            settings.api.host
        )));
    }
    Ok(url)
}
