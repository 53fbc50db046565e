//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the default [`EventSink`]: the editor emits into it and
//! any number of UI components subscribe. It is designed to be shared via
//! `Arc<EventBus>`.

use tokio::sync::broadcast;

use crate::event::{EditorEvent, EventEnvelope, EventSink};

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// # Usage
///
/// ```rust
/// use hue_oozie_events::{EditorEvent, EventBus, EventSink};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.emit(EditorEvent::Info("Saved".into()));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed events are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventSink for EventBus {
    fn emit(&self, event: EditorEvent) {
        tracing::debug!(event = event.name(), "Emitting editor event");
        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.sender.send(EventEnvelope::new(event));
    }
}
