/// Errors from the editor API layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-zero envelope `status`.
    #[error("Server rejected request: {message}")]
    Rejected {
        /// Server `message`, or the raw body when there is none.
        message: String,
    },

    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Hue returned a non-2xx status code.
    #[error("Hue API error ({status}): {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The client could not be built from its configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The response body was not the JSON the endpoint promises.
    #[error("Malformed response: {source}")]
    Decode {
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The two failure classes callers see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The server understood the request and refused it.
    ServerRejected,
    /// The request did not complete or the answer could not be read.
    TransportFailure,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Rejected { .. } => ErrorKind::ServerRejected,
            Self::Request(_)
            | Self::Http { .. }
            | Self::Decode { .. }
            | Self::InvalidConfig(_) => {
                ErrorKind::TransportFailure
            }
        }
    }

    /// Human-readable text for the error channel: the server message for
    /// rejections, the raw response text for transport failures.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message } => message.clone(),
            Self::Request(e) => e.to_string(),
            Self::InvalidConfig(message) => message.clone(),
            Self::Http { body, .. } | Self::Decode { body, .. } => body.clone(),
        }
    }
}
