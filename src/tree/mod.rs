//! Markdown syntax tree as consumed from the upstream parser.
//!
//! Nodes use the mdast JSON shape (`type`, `name`, `attributes`, `children`,
//! `value`, `data`). Directive nodes are rewritten in place: a visitor writes the
//! element it renders to into [`NodeData`] using the `hName` / `hProperties` /
//! `hChildren` keys that mdast-to-hast serializers read. Keys this crate does not
//! model (positions, other plugins' data) are carried through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::{DirectiveError, Result};

/// The `type` tag of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Root,
    Paragraph,
    Text,
    /// `:::name` block directive
    ContainerDirective,
    /// `::name` directive on its own line
    LeafDirective,
    /// `:name` inline directive
    TextDirective,
    /// Any other mdast node type
    Other(String),
}

impl NodeKind {
    /// True for the three directive shapes.
    #[must_use]
    pub fn is_directive(&self) -> bool {
        matches!(self, Self::ContainerDirective | Self::LeafDirective | Self::TextDirective)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Root => "root",
            Self::Paragraph => "paragraph",
            Self::Text => "text",
            Self::ContainerDirective => "containerDirective",
            Self::LeafDirective => "leafDirective",
            Self::TextDirective => "textDirective",
            Self::Other(kind) => kind,
        }
    }
}

impl From<String> for NodeKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "root" => Self::Root,
            "paragraph" => Self::Paragraph,
            "text" => Self::Text,
            "containerDirective" => Self::ContainerDirective,
            "leafDirective" => Self::LeafDirective,
            "textDirective" => Self::TextDirective,
            _ => Self::Other(kind),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element a rendered directive turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmittedTag {
    Span,
    A,
}

/// Properties of the emitted element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedProperties {
    /// Link target. `Some("")` marks a link still waiting for deferred resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl EmittedProperties {
    fn is_empty(&self) -> bool {
        self.href.is_none() && self.extra.is_empty()
    }
}

/// The `data` slot of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(rename = "hName", default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<EmittedTag>,
    #[serde(rename = "hProperties", default, skip_serializing_if = "EmittedProperties::is_empty")]
    pub properties: EmittedProperties,
    /// Replacement children for the emitted element, overriding `children`.
    #[serde(rename = "hChildren", default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What a visitor renders a directive into.
#[derive(Debug, Clone, PartialEq)]
pub struct Emitted {
    pub tag: EmittedTag,
    pub href: Option<String>,
    pub children: Option<Vec<Node>>,
}

impl Emitted {
    /// A `span` whose only child is `text`.
    #[must_use]
    pub fn span(text: impl Into<String>) -> Self {
        Self {
            tag: EmittedTag::Span,
            href: None,
            children: Some(vec![Node::text(text)]),
        }
    }

    /// An `a` pointing at `href`, keeping the node's own children as its label.
    #[must_use]
    pub fn anchor(href: impl Into<String>) -> Self {
        Self {
            tag: EmittedTag::A,
            href: Some(href.into()),
            children: None,
        }
    }
}

/// A node of the syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Directive name as written; matched case-insensitively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
    /// Literal content of text-like nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    fn bare(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            attributes: None,
            children: None,
            value: None,
            data: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn root(children: Vec<Node>) -> Self {
        Self {
            children: Some(children),
            ..Self::bare(NodeKind::Root)
        }
    }

    #[must_use]
    pub fn paragraph(children: Vec<Node>) -> Self {
        Self {
            children: Some(children),
            ..Self::bare(NodeKind::Paragraph)
        }
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::bare(NodeKind::Text)
        }
    }

    /// An inline directive (`:name[children]{attributes}`).
    ///
    /// # Panics
    ///
    /// Panics if `kind` is not one of the directive shapes.
    #[must_use]
    pub fn directive<'a>(
        kind: NodeKind,
        name: &str,
        attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
        children: Vec<Node>,
    ) -> Self {
        assert!(kind.is_directive(), "{kind} is not a directive node type");
        Self {
            name: Some(name.to_string()),
            attributes: Some(
                attributes.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            ),
            children: Some(children),
            ..Self::bare(kind)
        }
    }

    /// Shorthand for a [`NodeKind::TextDirective`] with no label.
    #[must_use]
    pub fn text_directive<'a>(
        name: &str,
        attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self::directive(NodeKind::TextDirective, name, attributes, Vec::new())
    }

    #[must_use]
    pub fn is_directive(&self) -> bool {
        self.kind.is_directive()
    }

    /// Attribute value by key. `Some("")` means the key is present without a value.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.as_ref()?.get(key).map(String::as_str)
    }

    /// True when the node has no children of its own.
    #[must_use]
    pub fn has_no_children(&self) -> bool {
        self.children.as_ref().is_none_or(Vec::is_empty)
    }

    /// Append a text child, but only when the node has no children. Caller-provided
    /// children are never replaced.
    pub fn default_text(&mut self, text: impl Into<String>) {
        if self.has_no_children() {
            self.children.get_or_insert_with(Vec::new).push(Node::text(text));
        }
    }

    /// Concatenated text of this node and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = self.value.clone().unwrap_or_default();
        for child in self.children.iter().flatten() {
            out.push_str(&child.text_content());
        }
        out
    }

    /// The emitted element, if a visitor has rendered this node.
    #[must_use]
    pub fn emitted_tag(&self) -> Option<EmittedTag> {
        self.data.as_ref()?.tag
    }

    /// The emitted `href`, if any.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        self.data.as_ref()?.properties.href.as_deref()
    }

    /// Text of the element this node renders to: `hChildren` when present,
    /// otherwise the node's own children.
    #[must_use]
    pub fn rendered_text(&self) -> String {
        match self.data.as_ref().and_then(|data| data.children.as_ref()) {
            Some(children) => children.iter().map(Node::text_content).collect(),
            None => self.children.iter().flatten().map(Node::text_content).collect(),
        }
    }

    /// Record what this node renders to. A node is annotated at most once.
    pub fn set_emitted(&mut self, emitted: Emitted) -> Result<()> {
        let data = self.data.get_or_insert_with(NodeData::default);
        if data.tag.is_some() {
            return Err(DirectiveError::invalid(
                self.name.as_deref().unwrap_or_default(),
                "directive has already been rendered",
            ));
        }
        data.tag = Some(emitted.tag);
        if emitted.href.is_some() {
            data.properties.href = emitted.href;
        }
        data.children = emitted.children;
        Ok(())
    }

    /// Overwrite the emitted `href` of an already annotated link.
    pub(crate) fn set_href(&mut self, href: String) {
        self.data.get_or_insert_with(NodeData::default).properties.href = Some(href);
    }

    /// Descendant at a child-index path (empty path is `self`).
    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        match path.split_first() {
            None => Some(self),
            Some((index, rest)) => self.children.as_mut()?.get_mut(*index)?.node_at_mut(rest),
        }
    }

    /// Descendant at a child-index path (empty path is `self`).
    #[must_use]
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        match path.split_first() {
            None => Some(self),
            Some((index, rest)) => self.children.as_ref()?.get(*index)?.node_at(rest),
        }
    }

    /// All directive nodes in document order.
    #[must_use]
    pub fn directives(&self) -> Vec<&Node> {
        let mut found = Vec::new();
        self.collect_directives(&mut found);
        found
    }

    fn collect_directives<'a>(&'a self, found: &mut Vec<&'a Node>) {
        if self.is_directive() {
            found.push(self);
        }
        for child in self.children.iter().flatten() {
            child.collect_directives(found);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classifier() {
        assert!(NodeKind::ContainerDirective.is_directive());
        assert!(NodeKind::LeafDirective.is_directive());
        assert!(NodeKind::TextDirective.is_directive());
        assert!(!NodeKind::Text.is_directive());
        assert!(!NodeKind::Other("heading".to_string()).is_directive());
    }

    #[test]
    fn test_deserialize_mdast() {
        let tree: Node = serde_json::from_value(json!({
            "type": "root",
            "children": [{
                "type": "paragraph",
                "children": [
                    { "type": "text", "value": "Hi " },
                    {
                        "type": "textDirective",
                        "name": "recipientFirstName",
                        "attributes": {},
                        "children": [],
                        "position": { "start": { "line": 1, "column": 4 } }
                    }
                ]
            }, { "type": "heading", "depth": 2, "children": [] }]
        }))
        .unwrap();

        let directive = tree.node_at(&[0, 1]).unwrap();
        assert_eq!(directive.kind, NodeKind::TextDirective);
        assert_eq!(directive.name.as_deref(), Some("recipientFirstName"));
        assert!(directive.extra.contains_key("position"));

        let heading = tree.node_at(&[1]).unwrap();
        assert_eq!(heading.kind, NodeKind::Other("heading".to_string()));
        assert_eq!(heading.extra.get("depth"), Some(&json!(2)));
    }

    #[test]
    fn test_serialize_emitted_annotation() {
        let mut node = Node::text_directive("link", [("to", "https://example.com")]);
        node.set_emitted(Emitted::anchor("https://example.com")).unwrap();

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "textDirective");
        assert_eq!(value["data"]["hName"], "a");
        assert_eq!(value["data"]["hProperties"]["href"], "https://example.com");
        assert!(value["data"].get("hChildren").is_none());
    }

    #[test]
    fn test_existing_data_is_preserved() {
        let mut node: Node = serde_json::from_value(json!({
            "type": "textDirective",
            "name": "value",
            "attributes": { "field": "x:title" },
            "data": { "hProperties": { "className": "title" }, "custom": 1 }
        }))
        .unwrap();
        node.set_emitted(Emitted::span("Hello")).unwrap();

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["data"]["hName"], "span");
        assert_eq!(value["data"]["hProperties"]["className"], "title");
        assert_eq!(value["data"]["custom"], 1);
        assert_eq!(value["data"]["hChildren"][0]["value"], "Hello");
    }

    #[test]
    fn test_set_emitted_only_once() {
        let mut node = Node::text_directive("recipientName", []);
        node.set_emitted(Emitted::span("Ada")).unwrap();

        let err = node.set_emitted(Emitted::span("Again")).unwrap_err();
        assert!(matches!(err, DirectiveError::InvalidDirective { .. }));
        assert_eq!(node.rendered_text(), "Ada");
    }

    #[test]
    fn test_default_text_never_overwrites_children() {
        let mut labelled =
            Node::directive(NodeKind::TextDirective, "link", [], vec![Node::text("Click")]);
        labelled.default_text("https://example.com");
        assert_eq!(labelled.text_content(), "Click");

        let mut empty = Node::text_directive("link", []);
        empty.default_text("https://example.com");
        assert_eq!(empty.text_content(), "https://example.com");
    }

    #[test]
    fn test_directives_in_document_order() {
        let tree = Node::root(vec![
            Node::paragraph(vec![
                Node::text_directive("a", []),
                Node::directive(
                    NodeKind::TextDirective,
                    "b",
                    [],
                    vec![Node::text_directive("c", [])],
                ),
            ]),
            Node::directive(NodeKind::LeafDirective, "d", [], vec![]),
        ]);

        let names: Vec<_> =
            tree.directives().iter().map(|n| n.name.clone().unwrap_or_default()).collect();
        assert_eq!(names, ["a", "b", "c", "d"]);
    }
}
