//! Render a directive tree.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

use super::common::load_inputs;
use crate::access::{FormAccess, HttpFormAccess, UnconfiguredFormAccess};
use crate::config::GlobalConfig;
use crate::renderer::DirectiveRenderer;
use crate::tree::Node;

/// Command to render a tree against a render context.
///
/// Runs both phases. Form links are resolved through the form API configured in
/// the `[forms]` section of the global configuration; without it, rendering a
/// tree that contains a form link fails.
///
/// # Examples
///
/// ```bash
/// pubmail render --tree body.json --context context.json
/// pubmail render --tree body.json --context context.json --output out.json --pretty
/// ```
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// mdast tree to render, as JSON
    #[arg(long, value_name = "FILE")]
    pub tree: PathBuf,

    /// Render context (recipient, pub, parent pub, community slug), as JSON
    #[arg(long, value_name = "FILE")]
    pub context: PathBuf,

    /// Write the rendered tree here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pretty-print the rendered tree
    #[arg(long)]
    pub pretty: bool,
}

impl RenderCommand {
    pub async fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        let config = GlobalConfig::load_with_optional(config_path).await?;
        let renderer = DirectiveRenderer::new(form_access(&config)?);

        let (tree, context) = load_inputs(&self.tree, &self.context).await?;
        let rendered = renderer.render(tree, &context).await?;
        let json = to_json(&rendered.tree, self.pretty)?;

        match self.output {
            Some(path) => {
                fs::write(&path, format!("{json}\n"))
                    .await
                    .with_context(|| format!("Failed to write rendered tree to {}", path.display()))?;
                debug!("Wrote rendered tree to {}", path.display());
            }
            None => println!("{json}"),
        }
        Ok(())
    }
}

/// Form access for `config`: HTTP when `[forms]` is configured.
pub(super) fn form_access(config: &GlobalConfig) -> Result<Arc<dyn FormAccess>> {
    match &config.forms {
        Some(forms) => Ok(Arc::new(HttpFormAccess::new(forms)?)),
        None => {
            debug!("No [forms] section configured; form links cannot be resolved");
            Ok(Arc::new(UnconfiguredFormAccess))
        }
    }
}

pub(super) fn to_json(tree: &Node, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(tree)
    } else {
        serde_json::to_string(tree)
    };
    json.context("Failed to serialize rendered tree")
}
