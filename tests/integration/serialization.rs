//! JSON shapes of trees and contexts.

use pubmail::context::{RenderContext, display_value};
use pubmail::tree::{Node, NodeKind};
use serde_json::json;

#[test]
fn test_context_from_camel_case_json() {
    let context: RenderContext = serde_json::from_value(json!({
        "recipient": {
            "id": "member-1",
            "user": { "id": "user-1", "firstName": "Ada", "lastName": null, "email": "ada@x.io" }
        },
        "communitySlug": "croccroc",
        "pub": { "id": "pub-1", "values": { "croccroc:count": 3 } },
        "parentPub": { "id": "pub-0", "values": {} }
    }))
    .unwrap();

    assert_eq!(context.recipient.user.first_name, "Ada");
    assert_eq!(context.recipient.user.last_name, None);
    assert_eq!(context.community_slug, "croccroc");
    assert_eq!(context.pub_record.id.as_str(), "pub-1");
    assert!(context.pub_record.assignee.is_none());
    assert_eq!(
        context.pub_record.value("croccroc:count").map(display_value),
        Some("3".to_string())
    );
    assert_eq!(context.parent_pub.unwrap().id.as_str(), "pub-0");
}

#[test]
fn test_tree_keeps_unknown_node_types_and_fields() {
    let input = json!({
        "type": "root",
        "children": [
            { "type": "thematicBreak", "position": { "start": { "line": 3 } } },
            {
                "type": "containerDirective",
                "name": "value",
                "attributes": { "field": "croccroc:title" },
                "children": [],
                "data": { "custom": true }
            }
        ]
    });

    let tree: Node = serde_json::from_value(input.clone()).unwrap();
    assert_eq!(tree.node_at(&[0]).unwrap().kind, NodeKind::Other("thematicBreak".to_string()));
    assert_eq!(tree.node_at(&[1]).unwrap().kind, NodeKind::ContainerDirective);
    assert_eq!(tree.directives().len(), 1);

    assert_eq!(serde_json::to_value(&tree).unwrap(), input);
}
