//! Wire models shared by the copier API endpoints.
//!
//! These types match the JSON bodies exchanged on `/api/*`, both when the
//! front-end consumes a remote backend and when the in-process backend
//! produces them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A selectable workflow as returned by `GET /api/workflows`.
///
/// n8n may send a null or missing id or name; both read as empty text.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorkflowSummary {
    #[serde(default, deserialize_with = "text_from_scalar")]
    pub id: String,
    #[serde(default, deserialize_with = "text_from_scalar")]
    pub name: String,
}

/// Response of `GET /api/workflow/{id}`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct WorkflowDetail {
    /// Workflow document as stored on the source instance.
    pub original: Value,
    /// Normalized document, the payload that gets copied.
    pub cleaned: Value,
}

/// A "Revision History" sticky note found on the destination workflow.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SpecialNote {
    pub name: String,
    #[serde(default)]
    pub parameters: Value,
    #[serde(default)]
    pub position: Value,
}

/// Response of `GET /api/check-destination/{id}`.
#[derive(Clone, Debug, PartialEq, Default, Deserialize, Serialize)]
pub struct DestinationStatus {
    pub exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_id_from_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub workflow_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_notes: Option<Vec<SpecialNote>>,
    #[serde(default)]
    pub current_revision_content: Option<String>,
}

impl DestinationStatus {
    pub fn missing(message: impl Into<String>) -> Self {
        Self {
            exists: false,
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn has_revision_notes(&self) -> bool {
        self.special_notes
            .as_ref()
            .map(|notes| !notes.is_empty())
            .unwrap_or(false)
    }
}

/// Body of `POST /api/copy-workflow`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CopyRequest {
    #[serde(default)]
    pub workflow: Option<Value>,
    #[serde(default)]
    pub workflow_id: Option<String>,
    #[serde(default)]
    pub is_update: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyAction {
    Created,
    Updated,
}

impl CopyAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyAction::Created => "created",
            CopyAction::Updated => "updated",
        }
    }

    /// Label shown to the operator on the result screen.
    pub fn label(&self) -> &'static str {
        match self {
            CopyAction::Created => "Created (POST)",
            CopyAction::Updated => "Updated (PUT)",
        }
    }
}

/// Response of `POST /api/copy-workflow`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CopyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub action: CopyAction,
    /// The destination's own representation of the written workflow.
    pub workflow: Value,
}

impl CopyResponse {
    pub fn workflow_name(&self) -> Option<String> {
        json_scalar(self.workflow.get("name"))
    }

    pub fn workflow_id(&self) -> Option<String> {
        json_scalar(self.workflow.get("id"))
    }
}

/// Renders a JSON scalar as text; n8n ids are sometimes numbers.
pub fn json_scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn text_from_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(json_scalar(Some(&value)).unwrap_or_default())
}

fn optional_id_from_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(json_scalar(Some(&value)))
}

/// Error body used by every non-success `/api/*` response.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}
