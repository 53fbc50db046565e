use async_trait::async_trait;

use hue_oozie_core::WorkflowId;

use crate::envelope::{AddNodeRequest, AddNodeResponse, GenXmlResponse, SaveRequest, SaveResponse};
use crate::error::ClientError;

/// Server side of the workflow editor.
///
/// [`HueClient`](crate::HueClient) talks to a real Hue server; tests plug in
/// an in-memory implementation.
#[async_trait]
pub trait EditorBackend: Send + Sync {
    /// Ask the server for the canonical form of a new action node.
    async fn add_node(&self, request: &AddNodeRequest) -> Result<AddNodeResponse, ClientError>;

    /// Persist the layout and workflow.
    async fn save(&self, request: &SaveRequest) -> Result<SaveResponse, ClientError>;

    /// Render the workflow as Oozie workflow XML.
    async fn gen_xml(&self, request: &SaveRequest) -> Result<GenXmlResponse, ClientError>;

    /// Fetch the submission form of a saved workflow, verbatim.
    async fn submit_form(&self, workflow_id: &WorkflowId) -> Result<String, ClientError>;
}
