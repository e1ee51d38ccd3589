//! Main application entry point (server binary).
//!
//! This is a thin wrapper around the `ad_export` library that handles:
//! - Environment variable loading (.env file)
//! - Command-line argument parsing
//! - Logger initialization
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use ad_export::initialization::init_logger_with;
use ad_export::{run_server, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load DATABASE_* settings from .env, in the current directory or next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Err(e) = run_server(config).await {
        eprintln!("ad_export error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
