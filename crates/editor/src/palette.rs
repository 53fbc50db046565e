//! Actions offered for dragging into the layout.

use serde::{Deserialize, Serialize};

use hue_oozie_core::{Widget, WidgetKind};

/// One draggable action: display name plus widget type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    pub widget_type: String,
}

impl PaletteEntry {
    pub fn new(name: impl Into<String>, widget_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            widget_type: widget_type.into(),
        }
    }

    /// A fresh bare widget for this entry, with its own id.
    pub fn build_widget(&self) -> Widget {
        Widget::new(self.name.clone(), self.widget_type.clone())
    }
}

/// The standard Oozie actions.
pub fn default_palette() -> Vec<PaletteEntry> {
    vec![
        PaletteEntry::new("Hive Script", WidgetKind::Hive.widget_type()),
        PaletteEntry::new("Pig Script", WidgetKind::Pig.widget_type()),
        PaletteEntry::new("Java program", WidgetKind::Java.widget_type()),
        PaletteEntry::new("MapReduce job", WidgetKind::MapReduce.widget_type()),
    ]
}
