//! Visitors that render text: field values and name parts.
//!
//! Every visitor here turns its node into a `span` whose only child is a text
//! node holding the resolved string.

use tracing::warn;

use crate::context::{RenderContext, display_value};
use crate::core::{DirectiveError, Result};
use crate::tree::{Emitted, Node};

use super::{Resolution, relation_of, resolve_assignee, written_name};

fn render_text(node: &mut Node, text: impl Into<String>) -> Result<Resolution> {
    node.set_emitted(Emitted::span(text))?;
    Ok(Resolution::Resolved)
}

/// `first last`, or just `first` when the last name is absent.
///
/// The platform's JavaScript renderer prints a missing last name as the text
/// `null` ("Ada null"). Dropping it here is deliberate; the `warn!` keeps the
/// incomplete profile visible.
fn full_name(directive: &str, first_name: &str, last_name: Option<&str>) -> String {
    match last_name {
        Some(last_name) => format!("{first_name} {last_name}"),
        None => {
            warn!(":{directive} rendered without a last name");
            first_name.to_string()
        }
    }
}

/// `:value{field=<slug>}`, optionally with `rel=parent`.
pub(super) fn visit_value(node: &mut Node, context: &RenderContext) -> Result<Resolution> {
    let directive = written_name(node);
    let field = node
        .attribute("field")
        .ok_or_else(|| DirectiveError::missing_attribute(directive, "field"))?;

    let record = context
        .pub_for(relation_of(node))
        .ok_or_else(|| DirectiveError::missing_context(directive, "a parent pub"))?;
    let value = record
        .value(field)
        .ok_or_else(|| DirectiveError::missing_value(directive, field))?;

    let text = display_value(value);
    render_text(node, text)
}

pub(super) fn visit_assignee_name(node: &mut Node, context: &RenderContext) -> Result<Resolution> {
    let assignee = resolve_assignee(node, context)?;
    let text = full_name(written_name(node), &assignee.first_name, assignee.last_name.as_deref());
    render_text(node, text)
}

pub(super) fn visit_assignee_first_name(
    node: &mut Node,
    context: &RenderContext,
) -> Result<Resolution> {
    let assignee = resolve_assignee(node, context)?;
    render_text(node, assignee.first_name.as_str())
}

pub(super) fn visit_assignee_last_name(
    node: &mut Node,
    context: &RenderContext,
) -> Result<Resolution> {
    let assignee = resolve_assignee(node, context)?;
    render_text(node, assignee.last_name.clone().unwrap_or_default())
}

pub(super) fn visit_recipient_name(node: &mut Node, context: &RenderContext) -> Result<Resolution> {
    let user = &context.recipient.user;
    let text = full_name(written_name(node), &user.first_name, user.last_name.as_deref());
    render_text(node, text)
}

pub(super) fn visit_recipient_first_name(
    node: &mut Node,
    context: &RenderContext,
) -> Result<Resolution> {
    render_text(node, context.recipient.user.first_name.as_str())
}

pub(super) fn visit_recipient_last_name(
    node: &mut Node,
    context: &RenderContext,
) -> Result<Resolution> {
    render_text(node, context.recipient.user.last_name.clone().unwrap_or_default())
}
