//! Helpers over raw n8n workflow documents.

use serde_json::{Map, Value};

use crate::api::SpecialNote;
use crate::revision::{append_entry, REVISION_NOTE_NAME};

pub const STICKY_NOTE_TYPE: &str = "n8n-nodes-base.stickyNote";

/// Normalizes a workflow into the shape n8n accepts on create/update.
///
/// Only `name`, `nodes`, `connections`, `settings` and `staticData` survive;
/// missing collections default to empty.
pub fn clean_workflow(workflow: &Value) -> Value {
    let field = |key: &str, default: Value| workflow.get(key).cloned().unwrap_or(default);

    let mut cleaned = Map::new();
    cleaned.insert("name".to_string(), field("name", Value::Null));
    cleaned.insert("nodes".to_string(), field("nodes", Value::Array(Vec::new())));
    cleaned.insert(
        "connections".to_string(),
        field("connections", Value::Object(Map::new())),
    );
    cleaned.insert(
        "settings".to_string(),
        field("settings", Value::Object(Map::new())),
    );
    cleaned.insert(
        "staticData".to_string(),
        field("staticData", Value::Object(Map::new())),
    );
    Value::Object(cleaned)
}

fn is_revision_note(node: &Value) -> bool {
    node.get("type").and_then(Value::as_str) == Some(STICKY_NOTE_TYPE)
        && node.get("name").and_then(Value::as_str) == Some(REVISION_NOTE_NAME)
}

fn nodes(workflow: &Value) -> impl Iterator<Item = &Value> {
    workflow
        .get("nodes")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// Revision notes of a workflow, plus the content of the last one found.
pub fn revision_notes(workflow: &Value) -> (Vec<SpecialNote>, Option<String>) {
    let mut notes = Vec::new();
    let mut content = None;

    for node in nodes(workflow).filter(|node| is_revision_note(node)) {
        let parameters = node
            .get("parameters")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        content = Some(
            parameters
                .get("content")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        );
        notes.push(SpecialNote {
            name: REVISION_NOTE_NAME.to_string(),
            parameters,
            position: node
                .get("position")
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
        });
    }

    (notes, content)
}

/// Appends `entry` to the first revision note of `workflow`.
///
/// Returns false when the workflow has no revision note; the document is
/// then left untouched.
pub fn stamp_revision_history(workflow: &mut Value, entry: &str) -> bool {
    let Some(node) = workflow
        .get_mut("nodes")
        .and_then(Value::as_array_mut)
        .and_then(|nodes| nodes.iter_mut().find(|node| is_revision_note(node)))
    else {
        return false;
    };

    let Some(node) = node.as_object_mut() else {
        return false;
    };
    let parameters = node
        .entry("parameters")
        .or_insert_with(|| Value::Object(Map::new()));
    if !parameters.is_object() {
        *parameters = Value::Object(Map::new());
    }

    let current = parameters.get("content").and_then(Value::as_str);
    let updated = append_entry(current, entry);
    parameters["content"] = Value::String(updated);
    true
}
