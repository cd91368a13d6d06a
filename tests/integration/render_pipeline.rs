//! Full renders through the public API.

use pubmail::context::RenderContext;
use pubmail::core::{DirectiveError, UpstreamOperation};
use pubmail::renderer::{DirectiveRenderer, RenderReport};
use pubmail::test_utils::fixtures::{ContextBuilder, assignee};
use pubmail::test_utils::{RecordingFormAccess, init_test_logging};
use pubmail::tree::{EmittedTag, Node, NodeKind};
use serde_json::json;
use std::sync::Arc;

fn review_email() -> Node {
    Node::root(vec![
        Node::paragraph(vec![
            Node::text("Hi "),
            Node::text_directive("recipientFirstName", []),
            Node::text(", "),
            Node::text_directive("assigneeName", []),
            Node::text(" invited you to review "),
            Node::text_directive("value", [("field", "croccroc:title")]),
            Node::text("."),
        ]),
        Node::paragraph(vec![Node::directive(
            NodeKind::TextDirective,
            "link",
            [("form", "review")],
            vec![Node::text("Start your review")],
        )]),
        Node::paragraph(vec![
            Node::text("Questions? Write to "),
            Node::text_directive("link", [("email", "assignee")]),
            Node::text(" or see "),
            Node::text_directive("link", [("field", "croccroc:url")]),
        ]),
    ])
}

fn review_context() -> RenderContext {
    ContextBuilder::new()
        .assignee(assignee("Grace", Some("Hopper")))
        .build()
}

#[tokio::test]
async fn test_render_review_invitation() {
    init_test_logging(None);
    let context = review_context();
    let access = Arc::new(RecordingFormAccess::new());
    let renderer = DirectiveRenderer::new(access.clone());

    let rendered = renderer.render(review_email(), &context).await.unwrap();

    assert_eq!(
        rendered.report,
        RenderReport {
            directives: 6,
            deferred_links: 1
        }
    );

    let tree = &rendered.tree;
    assert_eq!(tree.node_at(&[0, 1]).unwrap().rendered_text(), "Ada");
    assert_eq!(tree.node_at(&[0, 3]).unwrap().rendered_text(), "Grace Hopper");
    assert_eq!(tree.node_at(&[0, 5]).unwrap().rendered_text(), "A Pub");

    let form_link = tree.node_at(&[1, 0]).unwrap();
    assert_eq!(form_link.emitted_tag(), Some(EmittedTag::A));
    assert_eq!(
        form_link.href(),
        Some(RecordingFormAccess::url_for("review", &context.recipient.user.id).as_str())
    );
    assert_eq!(form_link.rendered_text(), "Start your review");

    let mailto = tree.node_at(&[2, 1]).unwrap();
    assert_eq!(mailto.href(), Some("mailto:grace@example.com"));
    assert_eq!(mailto.rendered_text(), "grace@example.com");

    let field_link = tree.node_at(&[2, 3]).unwrap();
    assert_eq!(field_link.href(), Some("https://example.com/pub-1"));

    assert_eq!(
        access.memberships(),
        vec![(context.recipient.id.clone(), "review".to_string())]
    );
    assert_eq!(
        access.invites(),
        vec![(
            context.recipient.user.id.clone(),
            "review".to_string(),
            context.pub_record.id.clone()
        )]
    );
}

#[tokio::test]
async fn test_render_reads_parent_pub() {
    let context = ContextBuilder::new()
        .parent_values([("croccroc:title", json!("The Journal")), ("croccroc:volume", json!(7))])
        .parent_assignee(assignee("Alan", Some("Turing")))
        .build();
    let tree = Node::root(vec![Node::paragraph(vec![
        Node::text_directive("value", [("field", "croccroc:title"), ("rel", "parent")]),
        Node::text_directive("value", [("field", "croccroc:volume"), ("rel", "parent")]),
        Node::text_directive("assigneeFirstName", [("rel", "parent")]),
    ])]);

    let renderer = DirectiveRenderer::new(Arc::new(RecordingFormAccess::new()));
    let rendered = renderer.render(tree, &context).await.unwrap();

    let texts: Vec<String> =
        rendered.tree.directives().iter().map(|node| node.rendered_text()).collect();
    assert_eq!(texts, ["The Journal", "7", "Alan"]);
}

#[tokio::test]
async fn test_missing_assignee_aborts_before_form_calls() {
    let context = ContextBuilder::new().build();
    let access = Arc::new(RecordingFormAccess::new());
    let renderer = DirectiveRenderer::new(access.clone());

    let err = renderer.render(review_email(), &context).await.unwrap_err();

    assert!(matches!(err, DirectiveError::MissingContext { .. }));
    assert!(access.memberships().is_empty());
    assert!(access.invites().is_empty());
}

#[tokio::test]
async fn test_membership_failure_skips_minting() {
    let context = review_context();
    let access = Arc::new(RecordingFormAccess::new().failing_membership("review"));
    let renderer = DirectiveRenderer::new(access.clone());

    let err = renderer.render(review_email(), &context).await.unwrap_err();

    match err {
        DirectiveError::UpstreamFailure {
            operation,
            form,
            ..
        } => {
            assert_eq!(operation, UpstreamOperation::EnsureMembership);
            assert_eq!(form, "review");
        }
        other => panic!("expected an upstream failure, got {other:?}"),
    }
    assert!(access.invites().is_empty());
}

#[tokio::test]
async fn test_mint_failure_is_reported() {
    let context = review_context();
    let access = Arc::new(RecordingFormAccess::new().failing_mint("review"));
    let renderer = DirectiveRenderer::new(access);

    let err = renderer.render(review_email(), &context).await.unwrap_err();

    assert!(matches!(
        err,
        DirectiveError::UpstreamFailure {
            operation: UpstreamOperation::MintInviteLink,
            ..
        }
    ));
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn test_non_directive_nodes_are_untouched() {
    let context = review_context();
    let tree: Node = serde_json::from_value(json!({
        "type": "root",
        "children": [
            {
                "type": "heading",
                "depth": 1,
                "children": [{ "type": "text", "value": "Welcome" }],
                "position": { "start": { "line": 1, "column": 1 } }
            },
            {
                "type": "paragraph",
                "children": [{ "type": "textDirective", "name": "recipientLastName" }]
            }
        ]
    }))
    .unwrap();
    let original_heading = serde_json::to_value(tree.node_at(&[0]).unwrap()).unwrap();

    let renderer = DirectiveRenderer::new(Arc::new(RecordingFormAccess::new()));
    let rendered = renderer.render(tree, &context).await.unwrap();

    let heading = serde_json::to_value(rendered.tree.node_at(&[0]).unwrap()).unwrap();
    assert_eq!(heading, original_heading);
    assert_eq!(heading["depth"], 1);
    assert_eq!(rendered.tree.node_at(&[1, 0]).unwrap().rendered_text(), "Lovelace");
}
