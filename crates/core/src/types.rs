use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identity shared by a graph [`Node`](crate::workflow::Node) and the layout
/// [`Widget`](crate::layout::Widget) that renders it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random (v4) UUID in hyphenated form.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Read an id out of loosely typed JSON.
    ///
    /// Strings are taken as-is and numbers are stringified. `null`, empty
    /// strings and every other JSON type yield `None` so callers can
    /// substitute a generated id.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Server-assigned workflow id.
///
/// Hue returns it either as a JSON number or a string; both decode to the
/// same textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WorkflowId(String);

impl WorkflowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for WorkflowId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).ok_or_else(|| {
            serde::de::Error::custom(format!("expected a string or number id, got {value}"))
        })
    }
}

/// Editor display mode.
///
/// Both modes render the same layout and workflow; only the presentation
/// differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorMode {
    #[default]
    Editing,
    Viewing,
}

impl EditorMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Editing => Self::Viewing,
            Self::Viewing => Self::Editing,
        }
    }

    pub fn is_editing(self) -> bool {
        self == Self::Editing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generated_node_ids_are_uuids() {
        let a = NodeId::generate();
        let b = NodeId::generate();
        assert_ne!(a, b);
        assert!(uuid::Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn node_id_from_value_accepts_strings_and_numbers() {
        assert_eq!(NodeId::from_value(&json!("abc")), Some(NodeId::from("abc")));
        assert_eq!(NodeId::from_value(&json!(7)), Some(NodeId::from("7")));
    }

    #[test]
    fn node_id_from_value_rejects_null_and_empty() {
        assert!(NodeId::from_value(&json!(null)).is_none());
        assert!(NodeId::from_value(&json!("")).is_none());
        assert!(NodeId::from_value(&json!({"id": 1})).is_none());
    }

    #[test]
    fn workflow_id_deserializes_from_number_or_string() {
        let from_num: WorkflowId = serde_json::from_value(json!(42)).unwrap();
        let from_str: WorkflowId = serde_json::from_value(json!("42")).unwrap();
        assert_eq!(from_num, from_str);
        assert_eq!(from_num.to_string(), "42");
    }

    #[test]
    fn workflow_id_rejects_objects() {
        assert!(serde_json::from_value::<WorkflowId>(json!({})).is_err());
    }

    #[test]
    fn editor_mode_toggles_between_two_states() {
        let mode = EditorMode::default();
        assert!(mode.is_editing());
        assert_eq!(mode.toggled(), EditorMode::Viewing);
        assert_eq!(mode.toggled().toggled(), EditorMode::Editing);
    }
}
