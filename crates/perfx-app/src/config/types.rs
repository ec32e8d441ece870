//! Configuration types for Perf Explorer
//!
//! Defines:
//! - `Settings` - Global application settings (`.perfx/config.toml`)
//! - `ApiSettings`, `BehaviorSettings`, `UiSettings` - its sections

use serde::{Deserialize, Serialize};

/// Application settings (.perfx/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub behavior: BehaviorSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// Perf API connection settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiSettings {
    /// API host, e.g. `https://api.bencher.dev`
    #[serde(default = "default_api_host")]
    pub host: String,

    /// Bearer token for private projects (`PERFX_API_TOKEN` overrides)
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            token: None,
        }
    }
}

fn default_api_host() -> String {
    "https://api.bencher.dev".to_string()
}

/// Behavior settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BehaviorSettings {
    /// Quiet period before a typed search is committed
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Keep all five tab lists loaded; when false only the active tab is fetched
    #[serde(default = "default_true")]
    pub fetch_all_tabs: bool,
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            search_debounce_ms: default_search_debounce_ms(),
            fetch_all_tabs: true,
        }
    }
}

fn default_search_debounce_ms() -> u64 {
    250
}

fn default_true() -> bool {
    true
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiSettings {
    /// Lifetime of a regular notification
    #[serde(default = "default_notification_ms")]
    pub notification_ms: u64,

    /// Lifetime of the possible-truncation warning
    #[serde(default = "default_truncation_warning_ms")]
    pub truncation_warning_ms: u64,

    /// Console base used when composing a shareable browser URL
    #[serde(default = "default_console_url")]
    pub console_url: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            notification_ms: default_notification_ms(),
            truncation_warning_ms: default_truncation_warning_ms(),
            console_url: default_console_url(),
        }
    }
}

fn default_notification_ms() -> u64 {
    4_000
}

fn default_truncation_warning_ms() -> u64 {
    10_000
}

fn default_console_url() -> String {
    "https://bencher.dev".to_string()
}
