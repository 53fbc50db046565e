//! Request payloads and response envelopes of the editor endpoints.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use hue_oozie_core::WorkflowId;

use crate::error::ClientError;

/// Envelope `status` meaning success.
pub const STATUS_OK: i64 = 0;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of `POST /oozie/editor/workflow/add_node/`.
#[derive(Debug, Clone, PartialEq)]
pub struct AddNodeRequest {
    pub workflow: Value,
    /// The widget being added, in layout document form.
    pub node: Value,
    /// Extra properties collected by the "add action" dialog.
    pub properties: Value,
}

impl AddNodeRequest {
    /// Form fields; every value is sent as a JSON string.
    pub fn form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("workflow", self.workflow.to_string()),
            ("node", self.node.to_string()),
            ("properties", self.properties.to_string()),
        ]
    }
}

/// Body of the `save` and `gen_xml` endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub layout: Value,
    pub workflow: Value,
}

impl SaveRequest {
    pub fn form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("layout", self.layout.to_string()),
            ("workflow", self.workflow.to_string()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddNodeResponse {
    /// Canonical properties of the new node, still untyped.
    #[serde(default)]
    pub properties: Value,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SaveResponse {
    pub id: WorkflowId,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenXmlResponse {
    pub xml: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Parse a JSON envelope body.
///
/// A missing or non-zero `status` is a [`ClientError::Rejected`] carrying
/// the envelope `message`, or the raw body when there is no message.
pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    let decode = |source| ClientError::Decode {
        body: body.to_string(),
        source,
    };

    let value: Value = serde_json::from_str(body).map_err(decode)?;

    if value.get("status").and_then(Value::as_i64) != Some(STATUS_OK) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string());
        return Err(ClientError::Rejected { message });
    }

    serde_json::from_value(value).map_err(decode)
}
