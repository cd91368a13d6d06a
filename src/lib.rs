//! pubmail - directive-annotated email rendering
//!
//! Email bodies are authored as markdown with directives: `:value{field=...}`,
//! `:assigneeName`, `:recipientFirstName`, `:link{form=...}` and friends. Once
//! parsed into an mdast tree, pubmail resolves every directive against a
//! [`RenderContext`](context::RenderContext) (recipient, pub, optional parent pub)
//! and annotates the node with the element an HTML converter should emit.
//!
//! # Rendering Model
//!
//! Rendering happens in two phases:
//!
//! 1. A synchronous rewrite visits every directive in document order and
//!    annotates it in place. The first error aborts the render.
//! 2. `:link{form=...}` directives are resolved concurrently: the recipient is
//!    enrolled in the form and an invite link is minted for them. Any failure
//!    fails the whole render.
//!
//! # Directives
//!
//! | Directive | Renders |
//! |-----------|---------|
//! | `:value{field=slug rel=parent?}` | the pub's (or parent pub's) value for `slug` |
//! | `:assigneeName`, `:assigneeFirstName`, `:assigneeLastName` | the assignee's name |
//! | `:recipientName`, `:recipientFirstName`, `:recipientLastName` | the recipient's name |
//! | `:link{email=...}`, `{form=...}`, `{to=...}`, `{field=...}` | an anchor |
//!
//! # Core Modules
//!
//! - [`tree`] - mdast nodes and the hast annotation written onto them
//! - [`context`] - Render context types
//! - [`directives`] - Directive registry and visitors
//! - [`renderer`] - The two-phase renderer
//! - [`access`] - Form membership and invite link minting
//! - [`core`] - Error types and user-facing error presentation
//!
//! ## Supporting Modules
//!
//! - [`cli`] - Command-line interface
//! - [`config`] - Global configuration (`~/.pubmail/config.toml`)
//! - [`constants`] - Environment variable names and defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pubmail::access::UnconfiguredFormAccess;
//! use pubmail::context::RenderContext;
//! use pubmail::renderer::DirectiveRenderer;
//! use pubmail::tree::Node;
//!
//! # async fn example(context: RenderContext) -> anyhow::Result<()> {
//! let tree = Node::root(vec![Node::paragraph(vec![
//!     Node::text("Hi "),
//!     Node::text_directive("recipientFirstName", []),
//! ])]);
//!
//! let renderer = DirectiveRenderer::new(Arc::new(UnconfiguredFormAccess));
//! let rendered = renderer.render(tree, &context).await?;
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod cli;
pub mod config;
pub mod constants;
pub mod context;
pub mod core;
pub mod directives;
pub mod renderer;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
