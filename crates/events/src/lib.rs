//! Editor event channel.
//!
//! The editor never talks to its host UI directly. It reports what happened
//! through an [`EventSink`] handed to it at construction:
//!
//! - [`EditorEvent`] -- the events the editor emits.
//! - [`EventSink`] -- the injectable receiving end.
//! - [`EventBus`] -- in-process fan-out sink backed by
//!   `tokio::sync::broadcast`.

pub mod bus;
pub mod event;

pub use bus::EventBus;
pub use event::{EditorEvent, EventEnvelope, EventSink};
