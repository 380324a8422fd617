//! CLI argument definitions for the dealbot application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dealbot - compare Amazon and Flipkart prices from a chat prompt.
#[derive(Parser, Debug)]
#[command(name = "dealbot", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the mock product search server.
    Serve {
        /// Address to bind.
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on.
        #[arg(short = 'p', long)]
        port: Option<u16>,
        /// JSON file holding the product catalog.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Start the interactive shopping assistant.
    Chat {
        /// Base URL of the search provider.
        #[arg(long = "provider-url")]
        provider_url: Option<String>,
        /// Data directory for the conversation database.
        #[arg(short = 'd', long = "data-dir")]
        data_dir: Option<PathBuf>,
    },
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > DEALBOT_CONFIG env var > ~/.dealbot/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("DEALBOT_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level. Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Resolve the server port.
///
/// Priority: --port flag > DEALBOT_PORT env var > config file value.
pub fn resolve_port(flag: Option<u16>, config_port: u16) -> u16 {
    if let Some(p) = flag {
        return p;
    }
    if let Ok(val) = std::env::var("DEALBOT_PORT") {
        if let Ok(p) = val.parse::<u16>() {
            return p;
        }
    }
    config_port
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".dealbot").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".dealbot").join("config.toml");
    }
    PathBuf::from("config.toml")
}
