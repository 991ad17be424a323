//! Channel keeping the most recent event in a shared slot

use crate::core::{Channel, LogEvent, Result};
use parking_lot::RwLock;
use std::sync::Arc;

/// The last event written and its rendered line
#[derive(Debug, Clone)]
pub struct LastEvent {
    pub event: LogEvent,
    pub rendered: String,
}

/// Shared handle to the latest event; clones see the same slot
#[derive(Debug, Clone, Default)]
pub struct LastEventSlot {
    inner: Arc<RwLock<Option<LastEvent>>>,
}

impl LastEventSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<LastEvent> {
        self.inner.read().clone()
    }

    /// Rendered line of the latest event
    pub fn rendered(&self) -> Option<String> {
        self.inner.read().as_ref().map(|last| last.rendered.clone())
    }

    pub fn clear(&self) {
        *self.inner.write() = None;
    }

    fn store(&self, event: &LogEvent, rendered: &str) {
        *self.inner.write() = Some(LastEvent {
            event: event.clone(),
            rendered: rendered.to_string(),
        });
    }
}

pub struct LastEventChannel {
    slot: LastEventSlot,
}

impl LastEventChannel {
    pub fn new(slot: LastEventSlot) -> Self {
        Self { slot }
    }
}

impl Channel for LastEventChannel {
    fn write(&mut self, event: &LogEvent, rendered: &str) -> Result<()> {
        self.slot.store(event, rendered);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "last_event"
    }
}
