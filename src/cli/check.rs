//! Check a directive tree without contacting the form API.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::common::load_inputs;
use crate::renderer::{Rewrite, rewrite};

/// Command to run the rewrite phase only.
///
/// Every directive is resolved against the context exactly as `render` would,
/// but form links are only listed. Useful for validating templates before they
/// are sent.
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// mdast tree to check, as JSON
    #[arg(long, value_name = "FILE")]
    pub tree: PathBuf,

    /// Render context, as JSON
    #[arg(long, value_name = "FILE")]
    pub context: PathBuf,
}

impl CheckCommand {
    pub async fn execute(self) -> Result<()> {
        let (mut tree, context) = load_inputs(&self.tree, &self.context).await?;
        let result = rewrite(&mut tree, &context)?;
        println!("{}", summary(&result));
        Ok(())
    }
}

pub(super) fn summary(result: &Rewrite) -> String {
    let mut lines = vec![format!(
        "{} {} directive{}",
        "✓".green(),
        result.directives,
        if result.directives == 1 { "" } else { "s" }
    )];

    if result.deferred.is_empty() {
        lines.push("No form links".to_string());
    } else {
        lines.push(format!("{} form link(s) to resolve:", result.deferred.len()));
        for link in &result.deferred {
            lines.push(format!("  {} at {:?}", link.form.bold(), link.path));
        }
    }
    lines.join("\n")
}
