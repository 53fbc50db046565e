//! HTTP client for the Hue Oozie workflow editor endpoints.
//!
//! Wraps the four editor endpoints (`add_node`, `save`, `gen_xml`,
//! `submit`) behind the [`EditorBackend`] trait, with [`HueClient`] as the
//! [`reqwest`] implementation. All JSON endpoints answer with the same
//! envelope: `status == 0` means success, anything else is a rejection
//! carrying `message`.

pub mod api;
pub mod backend;
pub mod config;
pub mod envelope;
pub mod error;

pub use api::HueClient;
pub use backend::EditorBackend;
pub use config::ClientConfig;
pub use envelope::{AddNodeRequest, AddNodeResponse, GenXmlResponse, SaveRequest, SaveResponse};
pub use error::{ClientError, ErrorKind};
