//! Channel broadcasting events to in-process subscribers
//!
//! Subscribers receive every event over an unbounded crossbeam channel.
//! A subscriber that dropped its receiver is removed on the next publish.

use crate::core::{Channel, LogEvent, LogLevel, Result};
use chrono::{DateTime, Local};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Event as delivered to subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetEvent {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logged_type: Option<String>,
    pub message: String,
    pub rendered: String,
}

#[derive(Debug, Clone, Default)]
pub struct NetEventHub {
    subscribers: Arc<Mutex<Vec<Sender<NetEvent>>>>,
}

impl NetEventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<NetEvent> {
        let (sender, receiver) = unbounded();
        self.subscribers.lock().push(sender);
        receiver
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Deliver to every live subscriber, returning how many received it
    pub fn publish(&self, event: NetEvent) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sender| sender.send(event.clone()).is_ok());
        subscribers.len()
    }
}

pub struct NetEventChannel {
    hub: NetEventHub,
}

impl NetEventChannel {
    pub fn new(hub: NetEventHub) -> Self {
        Self { hub }
    }
}

impl Channel for NetEventChannel {
    fn write(&mut self, event: &LogEvent, rendered: &str) -> Result<()> {
        self.hub.publish(NetEvent {
            timestamp: event.timestamp,
            level: event.level,
            logged_type: event.logged_type.clone(),
            message: event.message.clone(),
            rendered: rendered.to_string(),
        });
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "net_event"
    }
}
