//! Widget kinds and their typed property schemas.
//!
//! Every action widget carries a property bag whose shape depends on the
//! widget kind. [`ActionProperties::decode`] is the single place where raw
//! server JSON is checked against the schema for a kind; control nodes and
//! kinds the editor does not know about keep an untyped JSON object.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// Suffix the editor appends to kind names in `widgetType` fields.
pub const WIDGET_SUFFIX: &str = "-widget";

// ---------------------------------------------------------------------------
// Widget kinds
// ---------------------------------------------------------------------------

/// The kind of a widget or node, derived from its type string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Start,
    End,
    Kill,
    Hive,
    Pig,
    Java,
    MapReduce,
    /// Any type string the editor has no schema for, kept verbatim.
    Other(String),
}

impl WidgetKind {
    /// Parse a type string. Both `"hive-widget"` and `"hive"` are accepted.
    pub fn parse(raw: &str) -> Self {
        let name = raw.strip_suffix(WIDGET_SUFFIX).unwrap_or(raw);
        match name {
            "start" => Self::Start,
            "end" => Self::End,
            "kill" => Self::Kill,
            "hive" => Self::Hive,
            "pig" => Self::Pig,
            "java" => Self::Java,
            "mapreduce" => Self::MapReduce,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Canonical `widgetType` string, e.g. `"pig-widget"`.
    pub fn widget_type(&self) -> String {
        match self {
            Self::Other(raw) => raw.clone(),
            known => format!("{}{WIDGET_SUFFIX}", known.name()),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Kill => "kill",
            Self::Hive => "hive",
            Self::Pig => "pig",
            Self::Java => "java",
            Self::MapReduce => "mapreduce",
            Self::Other(raw) => raw,
        }
    }

    /// Whether this kind is an executable action (as opposed to a control node).
    pub fn is_action(&self) -> bool {
        matches!(self, Self::Hive | Self::Pig | Self::Java | Self::MapReduce)
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Shared schema pieces
// ---------------------------------------------------------------------------

/// A single list entry. Hue stores these as `{"value": "..."}` objects; bare
/// strings are accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawListEntry")]
pub struct ListEntry {
    pub value: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawListEntry {
    Bare(String),
    Object { value: String },
}

impl From<RawListEntry> for ListEntry {
    fn from(raw: RawListEntry) -> Self {
        match raw {
            RawListEntry::Bare(value) | RawListEntry::Object { value } => Self { value },
        }
    }
}

/// Filesystem preparation step executed before the action starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prepare {
    #[serde(rename = "type")]
    pub kind: PrepareKind,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrepareKind {
    Mkdir,
    Delete,
}

/// A Hadoop job configuration entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProperty {
    pub name: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Per-kind schemas
// ---------------------------------------------------------------------------

/// Properties of script-driven actions (Hive and Pig).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptProperties {
    pub script_path: String,
    pub parameters: Vec<ListEntry>,
    pub job_xml: String,
    pub files: Vec<ListEntry>,
    pub archives: Vec<ListEntry>,
    pub prepares: Vec<Prepare>,
    /// Fields without a schema, preserved for the round-trip to the server.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JavaProperties {
    pub jar_path: String,
    pub main_class: String,
    pub args: Vec<ListEntry>,
    pub java_opts: Vec<ListEntry>,
    pub job_xml: String,
    pub files: Vec<ListEntry>,
    pub archives: Vec<ListEntry>,
    pub prepares: Vec<Prepare>,
    pub capture_output: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapReduceProperties {
    pub jar_path: String,
    pub job_properties: Vec<JobProperty>,
    pub job_xml: String,
    pub files: Vec<ListEntry>,
    pub archives: Vec<ListEntry>,
    pub prepares: Vec<Prepare>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Tagged union
// ---------------------------------------------------------------------------

/// Property bag of a widget or node, keyed by its [`WidgetKind`].
///
/// Serializes to the flat JSON object the server expects; the kind itself is
/// carried by the sibling type field, so decoding needs it passed in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionProperties {
    Hive(ScriptProperties),
    Pig(ScriptProperties),
    Java(JavaProperties),
    MapReduce(MapReduceProperties),
    Generic(Map<String, Value>),
}

impl Default for ActionProperties {
    fn default() -> Self {
        Self::Generic(Map::new())
    }
}

impl ActionProperties {
    /// Empty properties of the right variant for `kind`.
    pub fn empty(kind: &WidgetKind) -> Self {
        match kind {
            WidgetKind::Hive => Self::Hive(ScriptProperties::default()),
            WidgetKind::Pig => Self::Pig(ScriptProperties::default()),
            WidgetKind::Java => Self::Java(JavaProperties::default()),
            WidgetKind::MapReduce => Self::MapReduce(MapReduceProperties::default()),
            _ => Self::Generic(Map::new()),
        }
    }

    /// Decode `value` against the schema of `kind`.
    ///
    /// `null` decodes to [`empty`](Self::empty). Anything other than an
    /// object, or an object whose typed fields have the wrong JSON type, is
    /// rejected.
    pub fn decode(kind: &WidgetKind, value: Value) -> Result<Self, CoreError> {
        let map = match value {
            Value::Null => return Ok(Self::empty(kind)),
            Value::Object(map) => map,
            other => {
                return Err(CoreError::Validation(format!(
                    "{kind} properties must be a JSON object, got {other}"
                )))
            }
        };

        let invalid = |source| CoreError::InvalidProperties {
            kind: kind.to_string(),
            source,
        };
        let value = Value::Object(map);

        Ok(match kind {
            WidgetKind::Hive => Self::Hive(serde_json::from_value(value).map_err(invalid)?),
            WidgetKind::Pig => Self::Pig(serde_json::from_value(value).map_err(invalid)?),
            WidgetKind::Java => Self::Java(serde_json::from_value(value).map_err(invalid)?),
            WidgetKind::MapReduce => {
                Self::MapReduce(serde_json::from_value(value).map_err(invalid)?)
            }
            _ => match value {
                Value::Object(map) => Self::Generic(map),
                _ => Self::Generic(Map::new()),
            },
        })
    }

    /// Like [`decode`](Self::decode) but never fails: input that does not
    /// match the schema is kept as an untyped object (or dropped if it is not
    /// an object at all).
    pub fn decode_lenient(kind: &WidgetKind, value: Value) -> Self {
        match Self::decode(kind, value.clone()) {
            Ok(properties) => properties,
            Err(e) => {
                tracing::warn!(kind = %kind, error = %e, "Keeping properties untyped");
                match value {
                    Value::Object(map) => Self::Generic(map),
                    _ => Self::Generic(Map::new()),
                }
            }
        }
    }

    /// Flat JSON object form, as sent to the server.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("ActionProperties is always serialisable")
    }

    pub fn is_typed(&self) -> bool {
        !matches!(self, Self::Generic(_))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
