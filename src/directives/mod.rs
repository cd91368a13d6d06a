//! The directive grammar and its visitors.
//!
//! Directives form a closed, whitelisted grammar. Every directive name maps to
//! exactly one [`Directive`] variant and every variant to one visitor function;
//! there is no runtime registration. Names are matched case-insensitively.
//!
//! # Grammar
//!
//! ```text
//! :value{field=<slug>} | :value{field=<slug> rel=parent}
//! :assigneeName | :assigneeFirstName | :assigneeLastName   (each optionally + rel=parent)
//! :recipientName | :recipientFirstName | :recipientLastName
//! :link{email=<address>} | :link{email=assignee}
//! :link{form=<collectionSlug>}
//! :link{to=<url>}
//! :link{field=<slug>} | :link{field=<slug> rel=parent}
//! ```
//!
//! Visitors run synchronously. A visitor either finishes the node
//! ([`Resolution::Resolved`]) or, for `:link{form=...}`, leaves the href empty and
//! asks the renderer to resolve it after the walk ([`Resolution::Deferred`]).

mod assignee;
mod link;
mod value;

use std::fmt;
use std::str::FromStr;

use crate::context::RenderContext;
use crate::core::{DirectiveError, Result};
use crate::tree::Node;

pub use assignee::{relation_of, resolve_assignee};

/// Outcome of visiting one directive node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The node is fully rendered.
    Resolved,
    /// The node is a link whose href needs membership enrollment and an invite
    /// link for `form`.
    Deferred {
        form: String,
    },
}

/// Signature shared by all directive visitors.
pub type Visitor = fn(&mut Node, &RenderContext) -> Result<Resolution>;

/// The registered directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    Value,
    AssigneeName,
    AssigneeFirstName,
    AssigneeLastName,
    RecipientName,
    RecipientFirstName,
    RecipientLastName,
    Link,
}

impl Directive {
    /// Every registered directive.
    pub const ALL: [Directive; 8] = [
        Directive::Value,
        Directive::AssigneeName,
        Directive::AssigneeFirstName,
        Directive::AssigneeLastName,
        Directive::RecipientName,
        Directive::RecipientFirstName,
        Directive::RecipientLastName,
        Directive::Link,
    ];

    /// Canonical spelling used in documentation and suggestions.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::AssigneeName => "assigneeName",
            Self::AssigneeFirstName => "assigneeFirstName",
            Self::AssigneeLastName => "assigneeLastName",
            Self::RecipientName => "recipientName",
            Self::RecipientFirstName => "recipientFirstName",
            Self::RecipientLastName => "recipientLastName",
            Self::Link => "link",
        }
    }

    /// Look up a directive by name, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name().eq_ignore_ascii_case(name))
    }

    /// The visitor that renders this directive.
    #[must_use]
    pub fn visitor(self) -> Visitor {
        match self {
            Self::Value => value::visit_value,
            Self::AssigneeName => value::visit_assignee_name,
            Self::AssigneeFirstName => value::visit_assignee_first_name,
            Self::AssigneeLastName => value::visit_assignee_last_name,
            Self::RecipientName => value::visit_recipient_name,
            Self::RecipientFirstName => value::visit_recipient_first_name,
            Self::RecipientLastName => value::visit_recipient_last_name,
            Self::Link => link::visit_link,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Directive {
    type Err = DirectiveError;

    fn from_str(name: &str) -> Result<Self> {
        Self::from_name(name)
            .ok_or_else(|| DirectiveError::invalid(name, "unrecognized directive"))
    }
}

/// Classify and render one node.
///
/// Returns `Ok(None)` for nodes that are not directives. Directive nodes are
/// dispatched to their visitor; an unregistered name fails with
/// [`DirectiveError::InvalidDirective`].
pub fn dispatch(node: &mut Node, context: &RenderContext) -> Result<Option<Resolution>> {
    if !node.is_directive() {
        return Ok(None);
    }

    let name = node.name.as_deref().unwrap_or_default();
    let directive: Directive = name.parse()?;
    tracing::debug!("Rendering :{} directive", directive);

    directive.visitor()(node, context).map(Some)
}

/// Directive name as written, for error messages.
fn written_name(node: &Node) -> &str {
    node.name.as_deref().unwrap_or_default()
}
