//! Tests for the `pubmail` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn write(&self, name: &str, content: &Value) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, serde_json::to_string_pretty(content).unwrap()).unwrap();
        path
    }

    fn context(&self) -> PathBuf {
        self.write(
            "context.json",
            &json!({
                "recipient": {
                    "id": "member-1",
                    "user": { "id": "user-1", "firstName": "Ada", "lastName": "Lovelace", "email": "ada@x.io" }
                },
                "communitySlug": "croccroc",
                "pub": {
                    "id": "pub-1",
                    "values": { "croccroc:title": "Hello" },
                    "assignee": { "firstName": "Grace", "lastName": "Hopper", "email": "grace@example.com" }
                }
            }),
        )
    }

    /// A command isolated from the user's global configuration.
    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("pubmail").unwrap();
        cmd.env("PUBMAIL_CONFIG_PATH", self.dir.path().join("absent.toml"))
            .env_remove("PUBMAIL_API_TOKEN")
            .env_remove("RUST_LOG");
        cmd
    }
}

fn directive(name: &str, attributes: Value) -> Value {
    json!({ "type": "textDirective", "name": name, "attributes": attributes, "children": [] })
}

fn paragraph(children: Vec<Value>) -> Value {
    json!({ "type": "root", "children": [{ "type": "paragraph", "children": children }] })
}

#[test]
fn test_render_to_stdout() {
    let ws = Workspace::new();
    let tree = ws.write(
        "tree.json",
        &paragraph(vec![
            directive("recipientName", json!({})),
            json!({ "type": "text", "value": ", " }),
            directive("value", json!({ "field": "croccroc:title" })),
        ]),
    );
    let context = ws.context();

    let output = ws
        .command()
        .arg("render")
        .arg("--tree")
        .arg(&tree)
        .arg("--context")
        .arg(&context)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let rendered: Value = serde_json::from_slice(&output).unwrap();
    let children = &rendered["children"][0]["children"];
    assert_eq!(children[0]["data"]["hName"], "span");
    assert_eq!(children[0]["data"]["hChildren"][0]["value"], "Ada Lovelace");
    assert_eq!(children[2]["data"]["hChildren"][0]["value"], "Hello");
}

#[test]
fn test_render_to_output_file() {
    let ws = Workspace::new();
    let tree = ws.write(
        "tree.json",
        &paragraph(vec![directive("link", json!({ "email": "assignee" }))]),
    );
    let context = ws.context();
    let output = ws.dir.path().join("out.json");

    ws.command()
        .arg("render")
        .arg("--tree")
        .arg(&tree)
        .arg("--context")
        .arg(&context)
        .arg("--output")
        .arg(&output)
        .arg("--pretty")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let rendered: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let link = &rendered["children"][0]["children"][0];
    assert_eq!(link["data"]["hName"], "a");
    assert_eq!(link["data"]["hProperties"]["href"], "mailto:grace@example.com");
}

#[test]
fn test_render_unknown_directive_suggests_name() {
    let ws = Workspace::new();
    let tree = ws.write("tree.json", &paragraph(vec![directive("recipentName", json!({}))]));
    let context = ws.context();

    ws.command()
        .arg("render")
        .arg("--tree")
        .arg(&tree)
        .arg("--context")
        .arg(&context)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("recipentName"))
        .stderr(predicate::str::contains("Did you mean ':recipientName'?"));
}

#[test]
fn test_render_form_link_without_forms_config() {
    let ws = Workspace::new();
    let tree = ws.write("tree.json", &paragraph(vec![directive("link", json!({ "form": "review" }))]));
    let context = ws.context();

    ws.command()
        .arg("render")
        .arg("--tree")
        .arg(&tree)
        .arg("--context")
        .arg(&context)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to ensure form membership for form 'review'"))
        .stderr(predicate::str::contains("[forms]"));
}

#[test]
fn test_explicit_config_must_exist() {
    let ws = Workspace::new();
    let tree = ws.write("tree.json", &paragraph(vec![]));
    let context = ws.context();

    ws.command()
        .arg("--config")
        .arg(ws.dir.path().join("missing.toml"))
        .arg("render")
        .arg("--tree")
        .arg(&tree)
        .arg("--context")
        .arg(&context)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config"));
}

#[test]
fn test_check_lists_form_links() {
    let ws = Workspace::new();
    let tree = ws.write(
        "tree.json",
        &paragraph(vec![
            directive("assigneeFirstName", json!({})),
            directive("link", json!({ "form": "review" })),
        ]),
    );
    let context = ws.context();

    ws.command()
        .arg("check")
        .arg("--tree")
        .arg(&tree)
        .arg("--context")
        .arg(&context)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 directives"))
        .stdout(predicate::str::contains("review"))
        .stdout(predicate::str::contains("[0, 1]"));
}

#[test]
fn test_check_fails_on_missing_value() {
    let ws = Workspace::new();
    let tree = ws.write(
        "tree.json",
        &paragraph(vec![directive("value", json!({ "field": "croccroc:missing" }))]),
    );
    let context = ws.context();

    ws.command()
        .arg("check")
        .arg("--tree")
        .arg(&tree)
        .arg("--context")
        .arg(&context)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("croccroc:missing"));
}

#[test]
fn test_malformed_context_is_reported() {
    let ws = Workspace::new();
    let tree = ws.write("tree.json", &paragraph(vec![]));
    let context = ws.write("context.json", &json!({ "recipient": "nobody" }));

    ws.command()
        .arg("check")
        .arg("--tree")
        .arg(&tree)
        .arg("--context")
        .arg(&context)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse render context"));
}
