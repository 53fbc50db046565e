use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use hue_oozie_core::EditorMode;

/// Something the editor wants its host to know about.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum EditorEvent {
    /// An operation failed; carries the server message or raw response text.
    Error(String),
    /// An operation succeeded with a message worth showing.
    Info(String),
    /// The layout was rebuilt from the stored layout document.
    MagicLayout,
    /// The submission form for the current workflow, as returned by the server.
    ShowSubmitPopup(String),
    /// The editor switched between editing and viewing.
    ModeChanged(EditorMode),
    /// Generated workflow definition XML.
    WorkflowXml(String),
}

impl EditorEvent {
    /// Event name as used by the web console (`"error"`, `"showSubmitPopup"`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Error(_) => "error",
            Self::Info(_) => "info",
            Self::MagicLayout => "magicLayout",
            Self::ShowSubmitPopup(_) => "showSubmitPopup",
            Self::ModeChanged(_) => "modeChanged",
            Self::WorkflowXml(_) => "workflowXml",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// An [`EditorEvent`] stamped with the time it was emitted.
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    pub event: EditorEvent,
    pub timestamp: DateTime<Utc>,
}

impl EventEnvelope {
    pub fn new(event: EditorEvent) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
        }
    }
}

/// Receiving end of editor events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EditorEvent);
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn emit(&self, event: EditorEvent) {
        (**self).emit(event);
    }
}
