//! Channel trait for log output destinations

use super::{error::Result, log_entry::LogEvent};

/// A live output target created from one configured channel
///
/// `rendered` is the event already formatted with the channel's enriched
/// output template.
pub trait Channel: Send + Sync {
    fn write(&mut self, event: &LogEvent, rendered: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
