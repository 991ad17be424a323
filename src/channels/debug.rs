//! Debug output channel
//!
//! Writes uncolored lines to stderr, or to any writer handed in, which is
//! where a debugger or test harness picks them up.

use crate::core::{Channel, LogEvent, LoggerError, Result};
use std::io::Write;

pub struct DebugChannel {
    writer: Box<dyn Write + Send + Sync>,
}

impl DebugChannel {
    pub fn new() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    pub fn with_writer<W: Write + Send + Sync + 'static>(writer: W) -> Self {
        Self {
            writer: Box::new(writer),
        }
    }
}

impl Default for DebugChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Channel for DebugChannel {
    fn write(&mut self, _event: &LogEvent, rendered: &str) -> Result<()> {
        let line = rendered.strip_suffix('\n').unwrap_or(rendered);
        writeln!(self.writer, "{}", line)
            .map_err(|e| LoggerError::channel_write("debug", e.to_string()))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "debug"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CallSite, LogLevel};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_one_line_per_event() {
        let buffer = SharedBuffer::default();
        let mut channel = DebugChannel::with_writer(buffer.clone());
        let event = LogEvent::new(LogLevel::Debug, "x", &[], &CallSite::default(), None, false);

        channel.write(&event, "first\n").unwrap();
        channel.write(&event, "second").unwrap();
        channel.flush().unwrap();

        let written = String::from_utf8(buffer.0.lock().clone()).unwrap();
        assert_eq!(written, "first\nsecond\n");
    }
}
