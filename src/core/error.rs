//! Error types for the logger system

use std::path::Path;

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Maximum number of characters of offending input kept in a parse error
const EXCERPT_LIMIT: usize = 120;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Configuration file does not exist
    #[error("Configuration file not found: '{path}'")]
    ConfigurationFileNotFound { path: String },

    /// Configuration text could not be parsed or lacks required structure
    #[error("Configuration parse error in {source_name}: {message} (near: {excerpt:?})")]
    ConfigurationParseError {
        source_name: String,
        message: String,
        excerpt: String,
    },

    /// Channel type registered without a usable construction path or id
    #[error("Invalid channel descriptor '{channel_id}': {reason}")]
    InvalidChannelDescriptor { channel_id: String, reason: String },

    /// A buffered entry failed to write during replay
    #[error("Replay failed at entry {index} ({remaining} entries left in buffer): {source}")]
    ReplayPartialFailure {
        index: usize,
        remaining: usize,
        #[source]
        source: Box<LoggerError>,
    },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A channel refused or failed a write
    #[error("Channel '{channel}' failed: {message}")]
    ChannelWrite { channel: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create a file-not-found error for a configuration path
    pub fn file_not_found(path: impl AsRef<Path>) -> Self {
        LoggerError::ConfigurationFileNotFound {
            path: path.as_ref().display().to_string(),
        }
    }

    /// Create a parse error, keeping a bounded excerpt of the offending text
    pub fn config_parse(
        source_name: impl Into<String>,
        message: impl Into<String>,
        excerpt: &str,
    ) -> Self {
        LoggerError::ConfigurationParseError {
            source_name: source_name.into(),
            message: message.into(),
            excerpt: truncate_excerpt(excerpt),
        }
    }

    /// Create a parse error from a serde error, pointing at the failing line
    pub fn from_json_error(source_name: impl Into<String>, text: &str, err: &serde_json::Error) -> Self {
        let excerpt = text
            .lines()
            .nth(err.line().saturating_sub(1))
            .unwrap_or(text);
        Self::config_parse(source_name, err.to_string(), excerpt)
    }

    /// Create an invalid descriptor error
    pub fn invalid_descriptor(channel_id: impl Into<String>, reason: impl Into<String>) -> Self {
        LoggerError::InvalidChannelDescriptor {
            channel_id: channel_id.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a sink error raised while replaying entry `index`
    pub fn replay_failure(index: usize, remaining: usize, source: LoggerError) -> Self {
        LoggerError::ReplayPartialFailure {
            index,
            remaining,
            source: Box::new(source),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a channel write error
    pub fn channel_write(channel: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::ChannelWrite {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

fn truncate_excerpt(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= EXCERPT_LIMIT {
        return trimmed.to_string();
    }
    let mut excerpt: String = trimmed.chars().take(EXCERPT_LIMIT).collect();
    excerpt.push_str("...");
    excerpt
}
