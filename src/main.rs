//! pubmail CLI entry point
//!
//! Parses arguments, installs logging, runs the command and prints errors with
//! context and suggestions.
//!
//! - `render` - Render a directive tree, resolving form invite links
//! - `check` - Rewrite a tree without network access and report the result

use anyhow::Result;
use clap::Parser;
use pubmail::cli;
use pubmail::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
