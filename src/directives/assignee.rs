//! Pub selection by `rel` and assignee lookup shared by several visitors.

use crate::context::{Assignee, RenderContext, Relation};
use crate::core::{DirectiveError, Result};
use crate::tree::Node;

use super::written_name;

/// The pub a directive addresses: the parent when `rel=parent`, otherwise the
/// pub itself. Any other `rel` value is ignored here; `:link{field}` is stricter
/// and checks it separately.
#[must_use]
pub fn relation_of(node: &Node) -> Relation {
    match node.attribute("rel") {
        Some("parent") => Relation::Parent,
        _ => Relation::Own,
    }
}

/// Resolve the assignee of the addressed pub.
///
/// Fails with [`DirectiveError::MissingContext`] when `rel=parent` is set but the
/// context has no parent pub, or when the addressed pub has no assignee.
pub fn resolve_assignee<'a>(node: &Node, context: &'a RenderContext) -> Result<&'a Assignee> {
    let directive = written_name(node);
    match relation_of(node) {
        Relation::Parent => {
            let parent = context
                .parent_pub
                .as_ref()
                .ok_or_else(|| DirectiveError::missing_context(directive, "a parent pub"))?;
            parent.assignee.as_ref().ok_or_else(|| {
                DirectiveError::missing_context(directive, "an assignee on the parent pub")
            })
        }
        Relation::Own => context
            .pub_record
            .assignee
            .as_ref()
            .ok_or_else(|| DirectiveError::missing_context(directive, "an assignee on the pub")),
    }
}
