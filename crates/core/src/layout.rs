//! Presentational layout tree: columns of rows of widgets.
//!
//! The layout is loaded from and saved back to the JSON layout document the
//! server stores next to the workflow. Loading is permissive: malformed
//! pieces produce partially populated widgets rather than errors.

use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;
use crate::properties::{ActionProperties, WidgetKind};
use crate::types::NodeId;

/// Width (in grid units) of a freshly created widget.
pub const DEFAULT_WIDGET_SIZE: u32 = 12;

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// A single configurable element placed in the layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Widget {
    pub size: u32,
    /// Id of the workflow node this widget renders.
    pub id: NodeId,
    pub name: String,
    #[serde(rename = "widgetType")]
    pub widget_type: String,
    pub properties: ActionProperties,
    pub offset: u32,
    /// Set on widgets built from a stored layout until they are rendered.
    #[serde(skip)]
    pub loading: bool,
    /// Set while the server has not yet confirmed the matching node.
    #[serde(skip)]
    pub pending: bool,
}

impl Widget {
    /// A bare widget of the given type, ready to be dragged into the layout.
    pub fn new(name: impl Into<String>, widget_type: impl Into<String>) -> Self {
        let widget_type = widget_type.into();
        let properties = ActionProperties::empty(&WidgetKind::parse(&widget_type));
        Self {
            size: DEFAULT_WIDGET_SIZE,
            id: NodeId::generate(),
            name: name.into(),
            widget_type,
            properties,
            offset: 0,
            loading: false,
            pending: false,
        }
    }

    /// Build a widget from one entry of a stored layout document.
    fn from_layout_json(json: &Value) -> Self {
        let widget_type = str_field(json, "widgetType");
        let kind = WidgetKind::parse(&widget_type);
        Self {
            size: u32_field(json, "size").unwrap_or(DEFAULT_WIDGET_SIZE),
            id: json
                .get("id")
                .and_then(NodeId::from_value)
                .unwrap_or_else(NodeId::generate),
            name: str_field(json, "name"),
            properties: ActionProperties::decode_lenient(
                &kind,
                json.get("properties").cloned().unwrap_or(Value::Null),
            ),
            widget_type,
            offset: u32_field(json, "offset").unwrap_or(0),
            loading: true,
            pending: false,
        }
    }

    pub fn kind(&self) -> WidgetKind {
        WidgetKind::parse(&self.widget_type)
    }

    /// Layout document form of this widget.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("Widget is always serialisable")
    }
}

// ---------------------------------------------------------------------------
// Rows, columns, layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Row {
    pub widgets: Vec<Widget>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub size: u32,
    pub rows: Vec<Row>,
}

/// Where a dropped widget lands: appended to `row` of `column`.
///
/// `row == rows.len()` opens a new row at the bottom of the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetPosition {
    pub column: usize,
    pub row: usize,
}

/// Ordered sequence of columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Layout {
    pub columns: Vec<Column>,
}

/// Build a layout from a stored layout document.
///
/// Expects `[{size, rows: [{widgets: [...]}]}]`; anything missing or of the
/// wrong shape is treated as empty.
pub fn load_layout(json: &Value) -> Layout {
    let columns = array(json)
        .iter()
        .map(|json_col| Column {
            size: u32_field(json_col, "size").unwrap_or(0),
            rows: array_field(json_col, "rows")
                .iter()
                .map(|json_row| Row {
                    widgets: array_field(json_row, "widgets")
                        .iter()
                        .map(Widget::from_layout_json)
                        .collect(),
                })
                .collect(),
        })
        .collect();

    Layout { columns }
}

impl Layout {
    /// First widget with `id`, scanning columns, rows and widgets in order.
    pub fn widget_by_id(&self, id: &NodeId) -> Option<&Widget> {
        self.widgets().find(|w| &w.id == id)
    }

    pub fn widget_by_id_mut(&mut self, id: &NodeId) -> Option<&mut Widget> {
        self.columns
            .iter_mut()
            .flat_map(|c| c.rows.iter_mut())
            .flat_map(|r| r.widgets.iter_mut())
            .find(|w| &w.id == id)
    }

    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.columns
            .iter()
            .flat_map(|c| c.rows.iter())
            .flat_map(|r| r.widgets.iter())
    }

    pub fn widget_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.widgets().map(|w| &w.id)
    }

    /// Place `widget` at `position`.
    pub fn insert_widget(
        &mut self,
        position: WidgetPosition,
        widget: Widget,
    ) -> Result<(), CoreError> {
        let column_count = self.columns.len();
        let column = self.columns.get_mut(position.column).ok_or_else(|| {
            CoreError::Validation(format!(
                "Column {} does not exist (layout has {column_count})",
                position.column
            ))
        })?;

        match position.row.cmp(&column.rows.len()) {
            std::cmp::Ordering::Less => column.rows[position.row].widgets.push(widget),
            std::cmp::Ordering::Equal => column.rows.push(Row {
                widgets: vec![widget],
            }),
            std::cmp::Ordering::Greater => {
                return Err(CoreError::Validation(format!(
                    "Row {} does not exist in column {} (column has {})",
                    position.row,
                    position.column,
                    column.rows.len()
                )))
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The layout document form, as stored by the server.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("Layout is always serialisable")
    }
}

// ---------------------------------------------------------------------------
// JSON helpers
// ---------------------------------------------------------------------------

fn array(json: &Value) -> &[Value] {
    json.as_array().map(Vec::as_slice).unwrap_or(&[])
}

fn array_field<'a>(json: &'a Value, key: &str) -> &'a [Value] {
    json.get(key).map(array).unwrap_or(&[])
}

fn str_field(json: &Value, key: &str) -> String {
    json.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn u32_field(json: &Value, key: &str) -> Option<u32> {
    json.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
