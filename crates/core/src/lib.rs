//! Data model for the Oozie workflow editor.
//!
//! Two structures make up an editor document:
//!
//! - [`layout::Layout`] -- the presentational Column/Row/Widget tree.
//! - [`workflow::Workflow`] -- the action graph of [`workflow::Node`]s and
//!   their child edges.
//!
//! They are correlated only by [`types::NodeId`]: every widget refers to the
//! graph node carrying the same id.

pub mod error;
pub mod layout;
pub mod location;
pub mod properties;
pub mod types;
pub mod workflow;

pub use error::CoreError;
pub use layout::{load_layout, Column, Layout, Row, Widget, WidgetPosition};
pub use location::Location;
pub use properties::{ActionProperties, WidgetKind};
pub use types::{EditorMode, NodeId, WorkflowId};
pub use workflow::{Edge, Node, Workflow};
