//! Logging facade shared by the live logger and the pre-logger cache

use super::entry_buffer::EntryBuffer;
use super::error::Result;
use super::field_value::{FieldValue, LogArgs};
use super::log_entry::CallSite;
use super::log_level::LogLevel;
use super::replay::ReplayEngine;
use parking_lot::RwLock;

/// A logger that can receive single writes
///
/// Implementors expose a settable logged-type context and a marker that
/// forwards writes to SMS-capable channels while it is set.
pub trait LiveLogger: Send + Sync {
    /// Write one event through the logger's channels
    fn write(&self, level: LogLevel, template: &str, args: &[FieldValue], call_site: &CallSite) -> Result<()>;

    /// Currently active logged-type context
    fn logged_type(&self) -> Option<String>;

    fn set_logged_type(&self, logged_type: Option<String>);

    /// Forward writes to SMS channels while set
    fn set_sms_forwarding(&self, enabled: bool);

    /// Write and report failures on stderr instead of returning them
    fn log(&self, level: LogLevel, template: &str, args: &[FieldValue], call_site: &CallSite) {
        if let Err(e) = self.write(level, template, args, call_site) {
            eprintln!("[LOGGER ERROR] Write failed: {}", e);
        }
    }

    #[track_caller]
    fn verbose(&self, template: &str, args: impl Into<LogArgs>)
    where
        Self: Sized,
    {
        let args = args.into();
        self.log(LogLevel::Verbose, template, args.as_slice(), &CallSite::caller());
    }

    #[track_caller]
    fn debug(&self, template: &str, args: impl Into<LogArgs>)
    where
        Self: Sized,
    {
        let args = args.into();
        self.log(LogLevel::Debug, template, args.as_slice(), &CallSite::caller());
    }

    #[track_caller]
    fn information(&self, template: &str, args: impl Into<LogArgs>)
    where
        Self: Sized,
    {
        let args = args.into();
        self.log(LogLevel::Information, template, args.as_slice(), &CallSite::caller());
    }

    #[track_caller]
    fn warning(&self, template: &str, args: impl Into<LogArgs>)
    where
        Self: Sized,
    {
        let args = args.into();
        self.log(LogLevel::Warning, template, args.as_slice(), &CallSite::caller());
    }

    #[track_caller]
    fn error(&self, template: &str, args: impl Into<LogArgs>)
    where
        Self: Sized,
    {
        let args = args.into();
        self.log(LogLevel::Error, template, args.as_slice(), &CallSite::caller());
    }

    #[track_caller]
    fn fatal(&self, template: &str, args: impl Into<LogArgs>)
    where
        Self: Sized,
    {
        let args = args.into();
        self.log(LogLevel::Fatal, template, args.as_slice(), &CallSite::caller());
    }
}

/// Facade used before the live logger is available
///
/// Every write lands in an [`EntryBuffer`], stamped with the facade's current
/// logged-type context. Once the real logger is built, [`replay_into`]
/// drains the buffer into it.
///
/// [`replay_into`]: CachedLogger::replay_into
///
/// # Example
///
/// ```
/// use rust_channel_logger::prelude::*;
///
/// let cache = CachedLogger::new();
/// cache.set_logged_type(Some("Startup".to_string()));
/// cache.information("Loaded {0} plugins", (3,));
/// cache.set_sms_forwarding(true);
/// cache.fatal("Database unreachable", ());
///
/// assert_eq!(cache.buffer().len(), 2);
/// assert!(cache.buffer().entries()[1].send_to_sms);
/// ```
#[derive(Debug, Default)]
pub struct CachedLogger {
    buffer: EntryBuffer,
    logged_type: RwLock<Option<String>>,
}

impl CachedLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &EntryBuffer {
        &self.buffer
    }

    /// Replay every buffered entry into `sink`, returning how many were written
    pub fn replay_into(&self, sink: &dyn LiveLogger) -> Result<usize> {
        ReplayEngine::replay(&self.buffer, sink)
    }
}

impl LiveLogger for CachedLogger {
    fn write(&self, level: LogLevel, template: &str, args: &[FieldValue], call_site: &CallSite) -> Result<()> {
        match self.logged_type.read().clone() {
            Some(logged_type) => {
                self.buffer
                    .append_with_logged_type(logged_type, level, template, call_site.clone(), args)
            }
            None => self.buffer.append(level, template, call_site.clone(), args),
        }
        Ok(())
    }

    fn logged_type(&self) -> Option<String> {
        self.logged_type.read().clone()
    }

    fn set_logged_type(&self, logged_type: Option<String>) {
        *self.logged_type.write() = logged_type;
    }

    fn set_sms_forwarding(&self, enabled: bool) {
        if enabled {
            self.buffer.send_next_to_sms();
        } else {
            self.buffer.cancel_sms();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_logger_stamps_context() {
        let cache = CachedLogger::new();
        cache.information("untyped", ());
        cache.set_logged_type(Some("Worker".to_string()));
        cache.warning("typed {0}", ("x",));

        let entries = cache.buffer().entries();
        assert_eq!(entries[0].logged_type, None);
        assert_eq!(entries[1].logged_type.as_deref(), Some("Worker"));
        assert_eq!(entries[1].args, vec![FieldValue::from("x")]);
    }

    #[test]
    fn test_level_helpers_capture_caller() {
        let cache = CachedLogger::new();
        cache.error("boom", ());

        let entry = &cache.buffer().entries()[0];
        assert_eq!(entry.level, LogLevel::Error);
        assert!(entry.call_site.file.ends_with("facade.rs"));
        assert!(entry.call_site.line > 0);
    }

    #[test]
    fn test_sms_forwarding_marks_next_entry_only() {
        let cache = CachedLogger::new();
        cache.set_sms_forwarding(true);
        cache.fatal("page someone", ());
        cache.fatal("no page", ());

        let entries = cache.buffer().entries();
        assert!(entries[0].send_to_sms);
        assert!(!entries[1].send_to_sms);
    }

    #[test]
    fn test_sms_forwarding_can_be_withdrawn() {
        let cache = CachedLogger::new();
        cache.set_sms_forwarding(true);
        cache.set_sms_forwarding(false);
        cache.fatal("no page", ());
        assert!(!cache.buffer().entries()[0].send_to_sms);
    }
}
