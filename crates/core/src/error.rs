use crate::types::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid {kind} properties: {source}")]
    InvalidProperties {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}
