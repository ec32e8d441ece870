//! Configuration file parsing for Perf Explorer
//!
//! Supports:
//! - `.perfx/config.toml` - Project-local settings
//! - `<config_dir>/perf-explorer/config.toml` - User-level fallback

pub mod settings;
pub mod types;

pub use settings::{api_host, load_settings, resolve_token, CONFIG_FILENAME, PERFX_DIR, TOKEN_ENV};
pub use types::*;
