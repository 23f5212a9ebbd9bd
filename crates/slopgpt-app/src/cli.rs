//! Command-line arguments.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use slopgpt_core::SlopConfig;

/// SlopGPT - conversational lead qualification for AI photo experiences.
#[derive(Parser, Debug)]
#[command(name = "slopgpt", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// API server port.
    #[arg(short = 'p', long = "port", global = true)]
    pub port: Option<u16>,

    /// API server bind address.
    #[arg(long = "host", global = true)]
    pub host: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API server (default).
    Serve,
    /// Chat with a running server from the terminal.
    Chat {
        /// Base URL of the SlopGPT server.
        #[arg(long, default_value = "http://127.0.0.1:3030")]
        url: String,
    },
    /// Write a default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl CliArgs {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }

    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > SLOPGPT_CONFIG env var > ~/.slopgpt/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        self.resolve_config_path_with(|key| std::env::var(key).ok())
    }

    fn resolve_config_path_with<F>(&self, lookup: F) -> PathBuf
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Some(p) = lookup("SLOPGPT_CONFIG").filter(|p| !p.trim().is_empty()) {
            return PathBuf::from(p);
        }
        default_config_path(lookup("HOME"))
    }

    /// Apply `--host` and `--port` on top of file and env values.
    pub fn apply_overrides(&self, config: &mut SlopConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
    }
}

fn default_config_path(home: Option<String>) -> PathBuf {
    match home {
        Some(home) => PathBuf::from(home).join(".slopgpt").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}
