//! The `:link` directive.
//!
//! The href source is picked from the attributes in strict priority order, first
//! match wins: `email`, `form`, `to`, `field`. A node without any of the four is
//! invalid.
//!
//! ```text
//! :link{email=all@pubpub.org}      -> mailto:all@pubpub.org, label all@pubpub.org
//! :link{email=assignee}            -> mailto:<assignee email>
//! :link[Review it]{form=review}    -> href filled in after the walk (invite link)
//! :link{to=https://example.com}    -> https://example.com
//! :link{field=croccroc:url}        -> value of the field
//! ```

use crate::context::{Relation, RenderContext, display_value};
use crate::core::{DirectiveError, Result};
use crate::tree::{Emitted, Node};

use super::{Resolution, resolve_assignee, written_name};

/// Where a link's href comes from.
enum LinkTarget {
    Email(String),
    Form(String),
    Url(String),
}

/// Value of an attribute that must be present with a non-empty value, or `None`
/// when the key is absent.
fn required<'a>(node: &'a Node, key: &str) -> Result<Option<&'a str>> {
    match node.attribute(key) {
        None => Ok(None),
        Some("") => Err(DirectiveError::missing_attribute(written_name(node), key)),
        Some(value) => Ok(Some(value)),
    }
}

fn link_target(node: &Node, context: &RenderContext) -> Result<LinkTarget> {
    let directive = written_name(node);

    if let Some(email) = required(node, "email")? {
        let address = if email == "assignee" {
            resolve_assignee(node, context)?.email.clone()
        } else {
            email.to_string()
        };
        return Ok(LinkTarget::Email(address));
    }

    if let Some(form) = required(node, "form")? {
        return Ok(LinkTarget::Form(form.to_string()));
    }

    if let Some(to) = required(node, "to")? {
        return Ok(LinkTarget::Url(to.to_string()));
    }

    if let Some(field) = required(node, "field")? {
        let relation = match node.attribute("rel") {
            None => Relation::Own,
            Some("parent") => Relation::Parent,
            Some(other) => {
                return Err(DirectiveError::invalid(
                    directive,
                    format!("invalid value '{other}' for the \"rel\" attribute"),
                ));
            }
        };
        let record = context
            .pub_for(relation)
            .ok_or_else(|| DirectiveError::missing_context(directive, "a parent pub"))?;
        let value = record
            .value(field)
            .ok_or_else(|| DirectiveError::missing_value(directive, field))?;
        return Ok(LinkTarget::Url(display_value(value)));
    }

    Err(DirectiveError::invalid(
        directive,
        "link needs one of the email, form, to or field attributes",
    ))
}

/// Render a `:link` directive into an anchor.
///
/// Unlabelled links get a default label: the plain address for `email` links and
/// the href otherwise. `form` links are left with an empty href and no label;
/// both are filled in once the invite link is known.
pub(super) fn visit_link(node: &mut Node, context: &RenderContext) -> Result<Resolution> {
    let (href, resolution) = match link_target(node, context)? {
        LinkTarget::Email(address) => {
            node.default_text(address.as_str());
            (format!("mailto:{address}"), Resolution::Resolved)
        }
        LinkTarget::Form(form) => (String::new(), Resolution::Deferred { form }),
        LinkTarget::Url(href) => {
            node.default_text(href.as_str());
            (href, Resolution::Resolved)
        }
    };

    node.set_emitted(Emitted::anchor(href))?;
    Ok(resolution)
}
