//! Buffer of log entries recorded before a live logger exists
//!
//! Entries are kept in strict append order. A pending "send next to SMS"
//! request applies to exactly the next appended entry: reading the pending
//! flag, creating the entry and clearing the flag happen under one lock, so
//! concurrent appenders can never pick up each other's request.

use super::field_value::{FieldValue, LogArgs};
use super::log_entry::CallSite;
use super::log_level::LogLevel;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// One buffered log call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logged_type: Option<String>,
    pub level: LogLevel,
    pub template: String,
    pub call_site: CallSite,
    pub args: Vec<FieldValue>,
    pub send_to_sms: bool,
}

#[derive(Debug, Default)]
struct BufferState {
    entries: Vec<CachedEntry>,
    sms_pending: bool,
}

#[derive(Debug, Default)]
pub struct EntryBuffer {
    state: Mutex<BufferState>,
}

impl EntryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the next appended entry for SMS forwarding
    pub fn send_next_to_sms(&self) {
        self.state.lock().sms_pending = true;
    }

    /// Drop a pending SMS request without appending anything
    pub fn cancel_sms(&self) {
        self.state.lock().sms_pending = false;
    }

    pub fn sms_pending(&self) -> bool {
        self.state.lock().sms_pending
    }

    /// Append an entry with no logged type
    pub fn append(&self, level: LogLevel, template: impl Into<String>, call_site: CallSite, args: impl Into<LogArgs>) {
        self.push(None, level, template.into(), call_site, args.into());
    }

    /// Append an entry stamped with a logged type
    pub fn append_with_logged_type(
        &self,
        logged_type: impl Into<String>,
        level: LogLevel,
        template: impl Into<String>,
        call_site: CallSite,
        args: impl Into<LogArgs>,
    ) {
        self.push(Some(logged_type.into()), level, template.into(), call_site, args.into());
    }

    fn push(&self, logged_type: Option<String>, level: LogLevel, template: String, call_site: CallSite, args: LogArgs) {
        let mut state = self.state.lock();
        let send_to_sms = std::mem::take(&mut state.sms_pending);
        state.entries.push(CachedEntry {
            logged_type,
            level,
            template,
            call_site,
            args: args.into_vec(),
            send_to_sms,
        });
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Snapshot of the buffered entries in append order
    pub fn entries(&self) -> Vec<CachedEntry> {
        self.state.lock().entries.clone()
    }

    /// Remove every entry; a no-op on an empty buffer
    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }

    /// Move every entry out, leaving the buffer empty
    pub(crate) fn take_all(&self) -> Vec<CachedEntry> {
        std::mem::take(&mut self.state.lock().entries)
    }

    /// Put entries back ahead of anything appended since they were taken
    pub(crate) fn restore_front(&self, mut entries: Vec<CachedEntry>) {
        let mut state = self.state.lock();
        entries.append(&mut state.entries);
        state.entries = entries;
    }
}
