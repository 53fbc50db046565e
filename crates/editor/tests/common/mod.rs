#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::broadcast;

use hue_oozie_client::envelope::parse_envelope;
use hue_oozie_client::{
    AddNodeRequest, AddNodeResponse, ClientError, EditorBackend, GenXmlResponse, SaveRequest,
    SaveResponse,
};
use hue_oozie_core::{Location, WorkflowId};
use hue_oozie_editor::{EditorDocuments, WorkflowEditor};
use hue_oozie_events::{EditorEvent, EventBus, EventEnvelope};

pub const PAGE_URL: &str = "http://hue.example.com:8888/oozie/editor/workflow/new/";

/// A request the fake backend received.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    AddNode(AddNodeRequest),
    Save(SaveRequest),
    GenXml(SaveRequest),
    Submit(WorkflowId),
}

#[derive(Default)]
struct FakeState {
    add_node: Mutex<VecDeque<Result<AddNodeResponse, ClientError>>>,
    save: Mutex<VecDeque<Result<SaveResponse, ClientError>>>,
    gen_xml: Mutex<VecDeque<Result<GenXmlResponse, ClientError>>>,
    submit: Mutex<VecDeque<Result<String, ClientError>>>,
    requests: Mutex<Vec<Recorded>>,
}

/// In-memory editor backend answering from scripted response bodies.
///
/// Bodies go through the same envelope parser as the real client. An
/// operation with nothing scripted fails like an unreachable server.
#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<FakeState>,
}

impl FakeBackend {
    pub fn answer_add_node(&self, body: &str) {
        self.state.add_node.lock().unwrap().push_back(parse_envelope(body));
    }

    pub fn answer_save(&self, body: &str) {
        self.state.save.lock().unwrap().push_back(parse_envelope(body));
    }

    pub fn answer_gen_xml(&self, body: &str) {
        self.state.gen_xml.lock().unwrap().push_back(parse_envelope(body));
    }

    pub fn answer_submit(&self, body: &str) {
        self.state.submit.lock().unwrap().push_back(Ok(body.to_string()));
    }

    pub fn fail_add_node(&self, status: u16, body: &str) {
        self.state.add_node.lock().unwrap().push_back(Err(ClientError::Http {
            status,
            body: body.to_string(),
        }));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    fn record(&self, request: Recorded) {
        self.state.requests.lock().unwrap().push(request);
    }

    fn next<T>(queue: &Mutex<VecDeque<Result<T, ClientError>>>) -> Result<T, ClientError> {
        queue.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(ClientError::Http {
                status: 503,
                body: "no scripted response".to_string(),
            })
        })
    }
}

#[async_trait]
impl EditorBackend for FakeBackend {
    async fn add_node(&self, request: &AddNodeRequest) -> Result<AddNodeResponse, ClientError> {
        self.record(Recorded::AddNode(request.clone()));
        Self::next(&self.state.add_node)
    }

    async fn save(&self, request: &SaveRequest) -> Result<SaveResponse, ClientError> {
        self.record(Recorded::Save(request.clone()));
        Self::next(&self.state.save)
    }

    async fn gen_xml(&self, request: &SaveRequest) -> Result<GenXmlResponse, ClientError> {
        self.record(Recorded::GenXml(request.clone()));
        Self::next(&self.state.gen_xml)
    }

    async fn submit_form(&self, workflow_id: &WorkflowId) -> Result<String, ClientError> {
        self.record(Recorded::Submit(workflow_id.clone()));
        Self::next(&self.state.submit)
    }
}

/// Layout with a start and an end widget in a single column.
pub fn sample_layout() -> Value {
    json!([
        {
            "size": 12,
            "rows": [
                {"widgets": [{"size": 12, "id": "start", "name": "Start", "widgetType": "start-widget", "properties": {}, "offset": 0}]},
                {"widgets": [{"size": 12, "id": "end", "name": "End", "widgetType": "end-widget", "properties": {}, "offset": 0}]}
            ]
        }
    ])
}

/// Unsaved workflow: start -> end, with a kill node in between.
pub fn sample_workflow() -> Value {
    json!({
        "id": null,
        "uuid": "549e2697-97cd-f931-db36-8e7b8a2e6c2c",
        "name": "My Workflow",
        "properties": {"description": ""},
        "nodes": [
            {"id": "start", "name": "Start", "type": "start-widget", "properties": {}, "children": [{"to": "end"}]},
            {"id": "kill", "name": "Kill", "type": "kill-widget", "properties": {"message": "Action failed"}, "children": []},
            {"id": "end", "name": "End", "type": "end-widget", "properties": {}, "children": []}
        ]
    })
}

pub struct Harness {
    pub editor: WorkflowEditor<FakeBackend>,
    pub backend: FakeBackend,
    pub events: broadcast::Receiver<EventEnvelope>,
}

pub fn editor_at(page_url: &str, layout: Value, workflow: Value) -> Harness {
    let backend = FakeBackend::default();
    let bus = Arc::new(EventBus::default());
    let events = bus.subscribe();
    let editor = WorkflowEditor::new(
        EditorDocuments { layout, workflow },
        backend.clone(),
        bus,
        Location::parse(page_url).unwrap(),
    );
    Harness {
        editor,
        backend,
        events,
    }
}

/// An initialised editor over the sample documents.
pub fn inited_editor() -> Harness {
    let mut harness = editor_at(PAGE_URL, sample_layout(), sample_workflow());
    harness.editor.init().expect("sample documents are consistent");
    harness
}

/// Every event emitted so far.
pub fn drain(events: &mut broadcast::Receiver<EventEnvelope>) -> Vec<EditorEvent> {
    let mut out = Vec::new();
    while let Ok(envelope) = events.try_recv() {
        out.push(envelope.event);
    }
    out
}
