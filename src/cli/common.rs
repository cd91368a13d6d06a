//! Input loading shared by the commands.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs;

use crate::context::RenderContext;
use crate::tree::Node;

/// Read and deserialize a JSON file.
pub async fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {what} from {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {what} from {}", path.display()))
}

/// Load the tree and the render context a command operates on.
pub async fn load_inputs(tree: &Path, context: &Path) -> Result<(Node, RenderContext)> {
    let tree: Node = read_json(tree, "tree").await?;
    let context: RenderContext = read_json(context, "render context").await?;
    Ok((tree, context))
}
