//! Command-line interface for pubmail.
//!
//! # Available Commands
//!
//! - `render` - Render a directive tree against a context, resolving form links
//! - `check` - Run the synchronous rewrite only and report what a render would do
//!
//! # Global Options
//!
//! All commands support these global options:
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress all output except errors
//! - `--config` - Path to custom config file
//!
//! Logs are written to stderr; stdout only ever carries command output.
//!
//! # Example
//!
//! ```bash
//! # Render an email body
//! pubmail render --tree body.json --context context.json --pretty
//!
//! # See which form links a body contains without calling the form API
//! pubmail check --tree body.json --context context.json
//! ```

mod check;
mod common;
mod render;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runtime configuration for CLI execution.
///
/// Built from the global flags by [`Cli::build_config`]. Tests construct it
/// directly to run commands without touching process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Default log filter, used when `RUST_LOG` is unset.
    ///
    /// `"error"` under `--quiet`, `"debug"` under `--verbose`, `"info"` otherwise.
    pub log_level: String,

    /// Global configuration file overriding the default location.
    pub config_path: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            config_path: None,
        }
    }

    /// Install the stderr tracing subscriber.
    ///
    /// `RUST_LOG` takes precedence over the flag-derived level. Calling this more
    /// than once is harmless; only the first subscriber is kept.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_level.as_str()));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Main CLI structure for pubmail.
#[derive(Parser, Debug)]
#[command(
    name = "pubmail",
    about = "Render directive-annotated email bodies",
    version,
    long_about = "pubmail resolves :value, :assigneeName, :recipientName and :link directives \
                  in an mdast tree against a pub and recipient, minting form invite links \
                  where needed."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging.
    ///
    /// Logs every dispatched directive and every form link resolution.
    /// Equivalent to `RUST_LOG=debug`. Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to custom global configuration file.
    ///
    /// Overrides the default configuration file location
    /// (`~/.pubmail/config.toml`, or `PUBMAIL_CONFIG_PATH` when set).
    /// Unlike the default location, this file must exist.
    ///
    /// ```bash
    /// pubmail --config ./staging.toml render --tree body.json --context ctx.json
    /// ```
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a tree completely, including form invite links.
    ///
    /// See [`render::RenderCommand`] for options.
    Render(render::RenderCommand),

    /// Rewrite a tree without resolving form links and report the result.
    ///
    /// Makes no network calls. Exits non-zero if any directive fails.
    Check(check::CheckCommand),
}

impl Cli {
    /// Execute the CLI with configuration built from the parsed flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: log_level.to_string(),
            config_path: self.config.clone(),
        }
    }

    /// Execute the command with an injected configuration.
    ///
    /// Does not install a logging subscriber.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Render(cmd) => cmd.execute(config.config_path).await,
            Commands::Check(cmd) => cmd.execute().await,
        }
    }
}
