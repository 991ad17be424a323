//! Replay of buffered entries into a live logger

use super::entry_buffer::EntryBuffer;
use super::error::{LoggerError, Result};
use super::facade::LiveLogger;
use super::logger::panic_message;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Drains an [`EntryBuffer`] into a [`LiveLogger`]
pub struct ReplayEngine;

impl ReplayEngine {
    /// Write every buffered entry to `sink` in append order
    ///
    /// Each entry is written under its own logged-type context, and the SMS
    /// marker is raised for flagged entries and lowered again after every
    /// write. The sink's original context is restored afterwards, on success
    /// and on failure alike.
    ///
    /// On success the buffer is empty and the number of replayed entries is
    /// returned; replaying an empty buffer writes nothing. If entry `k`
    /// fails, entries before it stay written, entries `k..` are put back at
    /// the front of the buffer and `ReplayPartialFailure` carries `k`. A
    /// panicking write counts as a failure of that entry.
    pub fn replay(buffer: &EntryBuffer, sink: &dyn LiveLogger) -> Result<usize> {
        let entries = buffer.take_all();
        if entries.is_empty() {
            return Ok(0);
        }

        let original_type = sink.logged_type();
        let mut active_type = original_type.clone();
        let mut failure = None;

        for (index, entry) in entries.iter().enumerate() {
            if entry.logged_type != active_type {
                sink.set_logged_type(entry.logged_type.clone());
                active_type = entry.logged_type.clone();
            }

            sink.set_sms_forwarding(entry.send_to_sms);
            let written = catch_unwind(AssertUnwindSafe(|| {
                sink.write(entry.level, &entry.template, &entry.args, &entry.call_site)
            }))
            .unwrap_or_else(|panic_info| {
                Err(LoggerError::other(format!(
                    "sink panicked during replay: {}",
                    panic_message(panic_info.as_ref())
                )))
            });
            sink.set_sms_forwarding(false);

            if let Err(e) = written {
                failure = Some((index, e));
                break;
            }
        }

        if active_type != original_type {
            sink.set_logged_type(original_type);
        }

        match failure {
            None => Ok(entries.len()),
            Some((index, source)) => {
                let remainder = entries[index..].to_vec();
                let remaining = remainder.len();
                buffer.restore_front(remainder);
                Err(LoggerError::replay_failure(index, remaining, source))
            }
        }
    }
}
