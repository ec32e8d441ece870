//! Perf Explorer - URL-synchronized explorer for benchmark perf data
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::error;

use perfx_app::config::load_settings;
use perfx_app::navigation::resolve_location;
use perfx_app::ParameterSet;

/// Perf Explorer - URL-synchronized explorer for benchmark perf data
#[derive(Parser, Debug)]
#[command(name = "perfx")]
#[command(about = "Explore benchmark perf data from a shareable URL", long_about = None)]
struct Args {
    /// Perf view URL, or `{project}?{query}` relative to the console
    #[arg(value_name = "LOCATION")]
    location: String,

    /// Print the canonical URL for a parameter set (full, query, embed, pinned) and exit
    #[arg(long, value_name = "SET", value_parser = parse_parameter_set)]
    print: Option<ParameterSet>,

    /// Exit once every initial fetch has settled instead of reading stdin
    #[arg(long)]
    once: bool,
}

fn parse_parameter_set(name: &str) -> std::result::Result<ParameterSet, String> {
    ParameterSet::from_name(name)
        .ok_or_else(|| format!("unknown parameter set {name:?} (full, query, embed, pinned)"))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let config_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let settings = load_settings(&config_dir);
    let location = resolve_location(&args.location, &settings.ui.console_url)?;

    if let Some(set) = args.print {
        println!("{}", perf_explorer::share_url(&location, &set));
        return Ok(());
    }

    // Logs go to file; stdout carries NDJSON
    perfx_core::logging::init()?;

    let result = perf_explorer::run_headless(location, settings, args.once).await;
    if let Err(ref e) = result {
        error!("Application error: {:?}", e);
    }
    Ok(result?)
}
