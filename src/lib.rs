//! # Rust Channel Logger
//!
//! Channel-configured logging with a buffer for events recorded before the
//! live logger exists.
//!
//! ## Features
//!
//! - **Channel Registry**: Console, debug, rolling file, SMS, last-event and
//!   net-event channels, looked up case-insensitively
//! - **Layered Parameters**: per-channel overrides resolved lazily against
//!   global defaults
//! - **JSON Configuration**: unknown channel types are skipped, malformed
//!   documents are reported with an excerpt
//! - **Replay**: entries cached at startup are written to the live logger in
//!   order, keeping their logged type and SMS flag

pub mod channels;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::channels::{LastEventSlot, NetEvent, NetEventHub, SmsMessage, SmsSender};
    pub use crate::core::{
        CachedEntry, CachedLogger, CallSite, Channel, ChannelConfig, ChannelKind,
        ChannelParameterSet, ChannelRegistry, ChannelSettings, ConfigurationBuilder, EntryBuffer,
        FieldValue, LiveLogger, LogArgs, LogEvent, LogLevel, Logger, LoggerBuilder,
        LoggerConfiguration, LoggerError, LoggerMetrics, ParameterField, ParameterOverride,
        ReplayEngine, ResolvedParameters, Result, SettingsType,
    };
}

pub use channels::{
    ConsoleChannel, DebugChannel, FileChannel, LastEventChannel, LastEventSlot, NetEvent,
    NetEventChannel, NetEventHub, SmsChannel, SmsMessage, SmsSender,
};
pub use crate::core::{
    build_from_file, build_from_text, CachedEntry, CachedLogger, CallSite, Channel, ChannelConfig,
    ChannelDescriptor, ChannelKind, ChannelParameterSet, ChannelRegistry, ChannelSettings,
    ConfigurationBuilder, EntryBuffer, FieldValue, LiveLogger, LogArgs, LogEvent, LogLevel, Logger,
    LoggerBuilder, LoggerConfiguration, LoggerError, LoggerMetrics, ParameterField,
    ParameterOverride, ReplayEngine, ResolvedChannel, ResolvedParameters, Result, SettingsType,
};
