use hue_oozie_client::{ClientError, ErrorKind};
use hue_oozie_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Workflow must be saved before it can be submitted")]
    Unsaved,
}

impl EditorError {
    /// Text published on the error channel.
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(e) => e.user_message(),
            other => other.to_string(),
        }
    }

    /// Failure class of a server round-trip; `None` for local failures.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Client(e) => Some(e.kind()),
            Self::Core(_) | Self::Unsaved => None,
        }
    }
}
