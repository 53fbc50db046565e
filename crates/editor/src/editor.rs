//! Workflow editor orchestration.
//!
//! [`WorkflowEditor`] owns the layout tree and the workflow graph of one
//! editor page. Local operations (`init`, `toggle_editing`, `magic_layout`)
//! never touch the network; `add_node`, `save`, `gen_xml` and
//! `show_submit_popup` make one round-trip each through the
//! [`EditorBackend`].
//!
//! Every failure is reported twice: as the returned [`EditorError`] and as an
//! [`EditorEvent::Error`] on the event sink. Failed operations leave the
//! layout and the workflow exactly as they were before the call.

use std::sync::Arc;

use serde_json::Value;

use hue_oozie_client::{AddNodeRequest, EditorBackend, SaveRequest};
use hue_oozie_core::location::WORKFLOW_PARAM;
use hue_oozie_core::{
    load_layout, ActionProperties, CoreError, EditorMode, Layout, Location, Node, NodeId, Widget,
    WidgetPosition, Workflow, WorkflowId,
};
use hue_oozie_events::{EditorEvent, EventSink};

use crate::error::EditorError;
use crate::palette::{default_palette, PaletteEntry};

/// The two JSON documents an editor page is opened with.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorDocuments {
    /// Stored layout: `[{size, rows: [{widgets: [...]}]}]`.
    pub layout: Value,
    /// Stored workflow: `{id, uuid, name, properties, nodes: [...]}`.
    pub workflow: Value,
}

pub struct WorkflowEditor<B> {
    backend: B,
    events: Arc<dyn EventSink>,
    location: Location,
    palette: Vec<PaletteEntry>,
    initial: EditorDocuments,
    layout: Layout,
    workflow: Workflow,
    mode: EditorMode,
    add_action_properties: Vec<Value>,
    inited: bool,
}

impl<B: EditorBackend> WorkflowEditor<B> {
    /// Create an editor for `documents`.
    ///
    /// Only the workflow metadata is read here; call [`init`](Self::init) to
    /// load the layout and the nodes.
    pub fn new(
        documents: EditorDocuments,
        backend: B,
        events: Arc<dyn EventSink>,
        location: Location,
    ) -> Self {
        let workflow = Workflow::from_json(&documents.workflow);
        Self {
            backend,
            events,
            location,
            palette: default_palette(),
            initial: documents,
            layout: Layout::default(),
            workflow,
            mode: EditorMode::default(),
            add_action_properties: Vec::new(),
            inited: false,
        }
    }

    pub fn with_palette(mut self, palette: Vec<PaletteEntry>) -> Self {
        self.palette = palette;
        self
    }

    // ---- local state ----

    /// Load the layout and the workflow nodes from the initial documents.
    ///
    /// Both structures are checked against each other before they are
    /// adopted: every widget must render an existing node, node ids must be
    /// unique and every edge must point at an existing node.
    pub fn init(&mut self) -> Result<(), EditorError> {
        let layout = load_layout(&self.initial.layout);
        let mut workflow = self.workflow.clone();
        workflow.load_nodes(&self.initial.workflow);

        let checked = workflow
            .validate()
            .and_then(|()| workflow.validate_layout(&layout));
        if let Err(e) = checked {
            return Err(self.fail(e.into()));
        }

        tracing::info!(
            columns = layout.columns.len(),
            nodes = workflow.nodes.len(),
            "Editor initialised"
        );
        self.layout = layout;
        self.workflow = workflow;
        self.inited = true;
        Ok(())
    }

    pub fn is_inited(&self) -> bool {
        self.inited
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Switch between editing and viewing.
    pub fn toggle_editing(&mut self) -> EditorMode {
        self.mode = self.mode.toggled();
        self.events.emit(EditorEvent::ModeChanged(self.mode));
        self.mode
    }

    /// Rebuild the layout from the initial layout document.
    pub fn magic_layout(&mut self) {
        self.layout = load_layout(&self.initial.layout);
        self.events.emit(EditorEvent::MagicLayout);
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn palette(&self) -> &[PaletteEntry] {
        &self.palette
    }

    /// A fresh draggable widget for the palette entry of `widget_type`.
    pub fn draggable(&self, widget_type: &str) -> Option<Widget> {
        self.palette
            .iter()
            .find(|entry| entry.widget_type == widget_type)
            .map(PaletteEntry::build_widget)
    }

    pub fn widget_by_id(&self, id: &NodeId) -> Option<&Widget> {
        self.layout.widget_by_id(id)
    }

    pub fn node_by_id(&self, id: &NodeId) -> Option<&Node> {
        self.workflow.node_by_id(id)
    }

    /// Properties from the "add action" dialog, sent with the next `add_node`.
    pub fn set_add_action_properties(&mut self, properties: Vec<Value>) {
        self.add_action_properties = properties;
    }

    pub fn add_action_properties(&self) -> &[Value] {
        &self.add_action_properties
    }

    // ---- server round-trips ----

    /// Drop `widget` into the layout at `position` and add its node to the
    /// workflow.
    ///
    /// The widget is shown as pending while the server builds the canonical
    /// node. On success it takes the server's properties and the node is
    /// spliced in before the end node. On failure the layout is restored to
    /// its state before the call and the workflow is not touched.
    pub async fn add_node(
        &mut self,
        mut widget: Widget,
        position: WidgetPosition,
    ) -> Result<NodeId, EditorError> {
        let id = widget.id.clone();
        let checked = self.ensure_inited().and_then(|()| {
            if widget.kind().is_action() {
                self.workflow.check_splice(&Node::from_widget(&widget))
            } else {
                Err(CoreError::Validation(format!(
                    "Only action widgets can be added, got '{}'",
                    widget.widget_type
                )))
            }
        });
        if let Err(e) = checked {
            return Err(self.fail(e.into()));
        }

        let snapshot = self.layout.clone();
        widget.pending = true;
        let request = AddNodeRequest {
            workflow: self.workflow.to_value(),
            node: widget.to_value(),
            properties: Value::Array(self.add_action_properties.clone()),
        };
        if let Err(e) = self.layout.insert_widget(position, widget) {
            return Err(self.fail(e.into()));
        }

        match self.confirm_node(&id, request).await {
            Ok(()) => {
                tracing::info!(node_id = %id, "Node added to workflow");
                Ok(id)
            }
            Err(e) => {
                self.layout = snapshot;
                Err(self.fail(e))
            }
        }
    }

    /// Second phase of `add_node`: adopt the server's answer.
    async fn confirm_node(
        &mut self,
        id: &NodeId,
        request: AddNodeRequest,
    ) -> Result<(), EditorError> {
        let response = self.backend.add_node(&request).await?;

        let widget = self
            .layout
            .widget_by_id(id)
            .ok_or_else(|| CoreError::NodeNotFound(id.clone()))?;
        let properties = ActionProperties::decode(&widget.kind(), response.properties)?;

        let mut node = Node::from_widget(widget);
        node.properties = properties.clone();
        self.workflow.splice_action(node)?;

        if let Some(widget) = self.layout.widget_by_id_mut(id) {
            widget.properties = properties;
            widget.pending = false;
        }
        Ok(())
    }

    /// Persist the layout and the workflow.
    ///
    /// Refused before [`init`](Self::init) has succeeded. On success the
    /// workflow adopts the server-assigned id and, unless the
    /// page was opened with a `workflow` query parameter, the page fragment
    /// is pointed at it.
    pub async fn save(&mut self) -> Result<WorkflowId, EditorError> {
        if let Err(e) = self.ensure_inited() {
            return Err(self.fail(e.into()));
        }
        let response = match self.backend.save(&self.save_request()).await {
            Ok(response) => response,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.workflow.id = Some(response.id.clone());
        self.events
            .emit(EditorEvent::Info(response.message.unwrap_or_default()));
        if !self.location.has_query_param(WORKFLOW_PARAM) {
            self.location.set_workflow_fragment(&response.id);
        }

        tracing::info!(workflow_id = %response.id, "Workflow saved");
        Ok(response.id)
    }

    /// Render the workflow as Oozie XML.
    pub async fn gen_xml(&self) -> Result<String, EditorError> {
        if let Err(e) = self.ensure_inited() {
            return Err(self.fail(e.into()));
        }
        match self.backend.gen_xml(&self.save_request()).await {
            Ok(response) => {
                self.events.emit(EditorEvent::WorkflowXml(response.xml.clone()));
                Ok(response.xml)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Fetch the submission form of the saved workflow.
    pub async fn show_submit_popup(&self) -> Result<String, EditorError> {
        let Some(id) = self.workflow.id.clone() else {
            return Err(self.fail(EditorError::Unsaved));
        };

        match self.backend.submit_form(&id).await {
            Ok(body) => {
                self.events.emit(EditorEvent::ShowSubmitPopup(body.clone()));
                Ok(body)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    // ---- private helpers ----

    /// Refuse to send documents that were never loaded.
    fn ensure_inited(&self) -> Result<(), CoreError> {
        if self.inited {
            Ok(())
        } else {
            Err(CoreError::Validation(
                "Editor is not initialised; call init first".to_string(),
            ))
        }
    }

    fn save_request(&self) -> SaveRequest {
        SaveRequest {
            layout: self.layout.to_value(),
            workflow: self.workflow.to_value(),
        }
    }

    /// Publish `err` on the error channel and hand it back.
    fn fail(&self, err: EditorError) -> EditorError {
        tracing::warn!(error = %err, "Editor operation failed");
        self.events.emit(EditorEvent::Error(err.user_message()));
        err
    }
}
