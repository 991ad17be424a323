//! Core logger types and traits

pub mod builder;
pub mod channel;
pub mod channel_settings;
pub mod configuration;
pub mod descriptor;
pub mod entry_buffer;
pub mod error;
pub mod facade;
pub mod field_value;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod parameters;
pub mod registry;
pub mod replay;
pub mod template;

pub use builder::{build_from_file, build_from_text, ConfigurationBuilder};
pub use channel::Channel;
pub use channel_settings::{
    ChannelKind, ChannelSettings, ConsoleSettings, DebugSettings, FileSettings, LastEventSettings,
    NetEventSettings, RollingInterval, SmsSettings, Validator,
};
pub use configuration::{ChannelConfig, LoggerConfiguration, ResolvedChannel};
pub use descriptor::{ChannelDescriptor, SettingsFactory, SettingsType};
pub use entry_buffer::{CachedEntry, EntryBuffer};
pub use error::{LoggerError, Result};
pub use facade::{CachedLogger, LiveLogger};
pub use field_value::{FieldValue, LogArgs};
pub use log_entry::{CallSite, LogEvent};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use parameters::{ChannelParameterSet, ParameterField, ParameterOverride, ResolvedParameters};
pub use registry::ChannelRegistry;
pub use replay::ReplayEngine;
