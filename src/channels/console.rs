//! Console channel

use crate::core::{Channel, ConsoleSettings, LogEvent, LogLevel, Result};
#[cfg(feature = "console")]
use colored::Colorize;

pub struct ConsoleChannel {
    use_colors: bool,
}

impl ConsoleChannel {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    pub fn from_settings(settings: &ConsoleSettings) -> Self {
        Self::with_colors(settings.use_colors)
    }

    fn paint(&self, level: LogLevel, line: &str) -> String {
        #[cfg(feature = "console")]
        if self.use_colors {
            return line.color(level.color_code()).to_string();
        }
        let _ = level;
        line.to_string()
    }
}

impl Default for ConsoleChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Channel for ConsoleChannel {
    fn write(&mut self, event: &LogEvent, rendered: &str) -> Result<()> {
        let line = rendered.strip_suffix('\n').unwrap_or(rendered);
        let output = self.paint(event.level, line);

        // Error and Fatal go to stderr, everything else to stdout
        match event.level {
            LogLevel::Error | LogLevel::Fatal => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CallSite;

    #[test]
    fn test_plain_output_is_unchanged() {
        let channel = ConsoleChannel::with_colors(false);
        assert_eq!(channel.paint(LogLevel::Error, "plain"), "plain");
    }

    #[test]
    fn test_write_succeeds() {
        let mut channel = ConsoleChannel::from_settings(&ConsoleSettings::default());
        let event = LogEvent::new(LogLevel::Information, "hello", &[], &CallSite::default(), None, false);
        assert!(channel.write(&event, "hello\n").is_ok());
        assert!(channel.flush().is_ok());
        assert_eq!(channel.name(), "console");
    }
}
