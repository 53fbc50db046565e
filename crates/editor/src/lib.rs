//! `hue-oozie-editor` library crate.
//!
//! [`WorkflowEditor`] owns the layout tree and the workflow graph of one
//! editor page and keeps them in step with the Hue server. The binary
//! entrypoint lives in `main.rs`.

pub mod config;
pub mod editor;
pub mod error;
pub mod palette;

pub use config::EditorConfig;
pub use editor::{EditorDocuments, WorkflowEditor};
pub use error::EditorError;
pub use palette::PaletteEntry;
