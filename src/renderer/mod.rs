//! Two-phase directive rendering.
//!
//! A render runs in two strictly ordered phases:
//!
//! 1. **Rewrite** ([`rewrite`]): a single synchronous walk over the whole tree in
//!    document order. Every directive node is dispatched to its visitor and
//!    annotated in place. `:link{form=...}` nodes are recorded as
//!    [`DeferredLink`]s by their child-index path. The first error aborts the walk.
//! 2. **Deferred resolution** ([`DirectiveRenderer::resolve_deferred`]): entered
//!    only after phase 1 succeeded. One task per deferred link enrolls the
//!    recipient in the form and mints an invite link; all tasks are started at
//!    once and joined. Any failure fails the whole batch.
//!
//! When one task fails, the tasks still in flight are dropped where they stand
//! instead of being run to completion. A recipient may then be enrolled in a
//! form without the invite link being minted; enrollment is idempotent, so
//! rendering again completes it. Links minted before the failure are never sent.
//!
//! Phase-2 tasks never touch the tree. Each returns its URL and the renderer
//! writes every href once, after the join.
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
//! # async fn example(tree: Node, context: RenderContext) -> anyhow::Result<()> {
//! let renderer = DirectiveRenderer::new(Arc::new(UnconfiguredFormAccess));
//! let rendered = renderer.render(tree, &context).await?;
//! println!("{}", serde_json::to_string(&rendered.tree)?);
//! # Ok(())
//! # }
//! ```

use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info};

use crate::access::{AuthLinkEnricher, FormAccess};
use crate::context::RenderContext;
use crate::core::{DirectiveError, Result};
use crate::directives::{Resolution, dispatch};
use crate::tree::Node;


/// A link whose href is resolved in phase 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredLink {
    /// Child indices from the root to the link node.
    pub path: Vec<usize>,
    /// Slug of the form the link grants access to.
    pub form: String,
}

/// Result of phase 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rewrite {
    /// Number of directive nodes rendered.
    pub directives: usize,
    /// Form links awaiting phase 2, in document order.
    pub deferred: Vec<DeferredLink>,
}

/// Counts for a completed render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub directives: usize,
    pub deferred_links: usize,
}

/// A fully rendered tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub tree: Node,
    pub report: RenderReport,
}

/// Phase 1: annotate every directive in `tree` and collect deferred links.
///
/// On error the tree is left partially annotated and must be discarded.
pub fn rewrite(tree: &mut Node, context: &RenderContext) -> Result<Rewrite> {
    let mut rewrite = Rewrite::default();
    let mut path = Vec::new();
    rewrite_node(tree, context, &mut path, &mut rewrite)?;
    Ok(rewrite)
}

fn rewrite_node(
    node: &mut Node,
    context: &RenderContext,
    path: &mut Vec<usize>,
    rewrite: &mut Rewrite,
) -> Result<()> {
    if let Some(resolution) = dispatch(node, context)? {
        rewrite.directives += 1;
        if let Resolution::Deferred {
            form,
        } = resolution
        {
            debug!("Deferring link to form '{}' at {:?}", form, path);
            rewrite.deferred.push(DeferredLink {
                path: path.clone(),
                form,
            });
        }
    }

    if let Some(children) = node.children.as_mut() {
        for (index, child) in children.iter_mut().enumerate() {
            path.push(index);
            rewrite_node(child, context, path, rewrite)?;
            path.pop();
        }
    }
    Ok(())
}

/// Renders directive trees against a render context.
///
/// The renderer keeps no state between renders and can be shared freely.
#[derive(Debug, Clone)]
pub struct DirectiveRenderer {
    enricher: AuthLinkEnricher,
}

impl DirectiveRenderer {
    /// Create a renderer resolving form links through `access`.
    pub fn new(access: Arc<dyn FormAccess>) -> Self {
        Self {
            enricher: AuthLinkEnricher::new(access),
        }
    }

    /// Render `tree` completely: phase 1, then phase 2.
    ///
    /// The tree is only handed back on success, so a failed render never leaks a
    /// partially rendered body.
    pub async fn render(&self, mut tree: Node, context: &RenderContext) -> Result<Rendered> {
        let Rewrite {
            directives,
            deferred,
        } = rewrite(&mut tree, context)?;

        let deferred_links = self.resolve_deferred(&mut tree, &deferred, context).await?;

        info!("Rendered {} directives ({} form links)", directives, deferred_links);
        Ok(Rendered {
            tree,
            report: RenderReport {
                directives,
                deferred_links,
            },
        })
    }

    /// Phase 2: resolve every deferred link concurrently and write the hrefs back.
    ///
    /// A link without caller-provided children gets its invite URL as label.
    /// Returns the number of links resolved.
    pub async fn resolve_deferred(
        &self,
        tree: &mut Node,
        deferred: &[DeferredLink],
        context: &RenderContext,
    ) -> Result<usize> {
        if deferred.is_empty() {
            return Ok(0);
        }

        debug!("Resolving {} deferred form links", deferred.len());
        let urls =
            try_join_all(deferred.iter().map(|link| self.enricher.invite_link(&link.form, context)))
                .await?;

        for (link, url) in deferred.iter().zip(urls) {
            let node = tree.node_at_mut(&link.path).ok_or_else(|| {
                DirectiveError::invalid("link", format!("deferred link at {:?} is gone", link.path))
            })?;
            node.default_text(url.as_str());
            node.set_href(url);
        }
        Ok(deferred.len())
    }
}
