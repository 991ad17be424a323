//! Build a [`LoggerConfiguration`] from JSON and code-specified defaults
//!
//! Configuration documents look like:
//!
//! ```json
//! {
//!   "Global": { "MinimumLevel": "Information", "IncludeSourcePath": true },
//!   "Channels": [
//!     { "Channel": "Console", "MinimumLevel": "Debug" },
//!     { "Channel": "File", "FileName": "app.log", "RollingInterval": "Day" }
//!   ]
//! }
//! ```
//!
//! Top-level and discriminator keys are matched case-insensitively. Channel
//! blocks whose discriminator is not registered are skipped; everything else
//! that is malformed is a `ConfigurationParseError`.

use super::channel_settings::ChannelSettings;
use super::configuration::{ChannelConfig, LoggerConfiguration};
use super::error::{LoggerError, Result};
use super::parameters::ChannelParameterSet;
use super::registry::{ChannelRegistry, RegistryReadGuard};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

const GLOBAL_KEY: &str = "global";
const CHANNELS_KEY: &str = "channels";
const DISCRIMINATOR_KEY: &str = "channel";
const TEXT_SOURCE: &str = "<text>";

/// Combines code-specified defaults with JSON configuration
///
/// # Example
///
/// ```
/// use rust_channel_logger::prelude::*;
///
/// let registry = ChannelRegistry::with_defaults();
/// let config = ConfigurationBuilder::new(&registry)
///     .global(ChannelParameterSet::new().with_override(ParameterOverride::MinimumLevel(LogLevel::Information)))
///     .build_from_text(r#"{ "Global": {}, "Channels": [ { "Channel": "Console" } ] }"#)
///     .unwrap();
///
/// assert!(config.is_channel_defined("console"));
/// assert_eq!(config.effective_minimum_level(), LogLevel::Information);
/// ```
pub struct ConfigurationBuilder<'r> {
    registry: &'r ChannelRegistry,
    global: ChannelParameterSet,
    channels: Vec<(String, ChannelSettings)>,
    section: Option<String>,
}

impl<'r> ConfigurationBuilder<'r> {
    pub fn new(registry: &'r ChannelRegistry) -> Self {
        Self {
            registry,
            global: ChannelParameterSet::default(),
            channels: Vec::new(),
            section: None,
        }
    }

    /// Code-specified global defaults; JSON global fields override them
    #[must_use = "builder methods return a new value"]
    pub fn global(mut self, global: ChannelParameterSet) -> Self {
        self.global = global;
        self
    }

    /// Add a channel from code; code channels come before JSON channels
    #[must_use = "builder methods return a new value"]
    pub fn channel(mut self, channel_id: impl Into<String>, settings: ChannelSettings) -> Self {
        self.channels.push((channel_id.into(), settings));
        self
    }

    /// Read the configuration from a nested section, e.g. `"Logging"` or `"App:Logging"`
    #[must_use = "builder methods return a new value"]
    pub fn section(mut self, path: impl Into<String>) -> Self {
        self.section = Some(path.into());
        self
    }

    /// Build from code-specified values only
    pub fn build(&self) -> LoggerConfiguration {
        let registry = self.registry.read();
        LoggerConfiguration::with_channels(self.global.clone(), self.code_channels(&registry))
    }

    /// Build from JSON text
    ///
    /// # Errors
    ///
    /// `ConfigurationParseError` for malformed JSON, a missing or non-object
    /// global section, a missing or non-array channels list, or a channel
    /// block that does not fit its settings type.
    pub fn build_from_text(&self, text: &str) -> Result<LoggerConfiguration> {
        self.build_from_source(TEXT_SOURCE, text)
    }

    /// Build from a JSON file
    ///
    /// # Errors
    ///
    /// `ConfigurationFileNotFound` when the path does not exist (nothing is
    /// read or parsed), plus every error of [`build_from_text`](Self::build_from_text).
    pub fn build_from_file(&self, path: impl AsRef<Path>) -> Result<LoggerConfiguration> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LoggerError::file_not_found(path));
        }

        let text = fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading configuration",
                format!("Failed to read '{}'", path.display()),
                e,
            )
        })?;

        self.build_from_source(&path.display().to_string(), &text)
    }

    fn build_from_source(&self, source_name: &str, text: &str) -> Result<LoggerConfiguration> {
        let document: Value =
            serde_json::from_str(text).map_err(|e| LoggerError::from_json_error(source_name, text, &e))?;

        let root = match &self.section {
            Some(path) => find_section(&document, path).ok_or_else(|| {
                LoggerError::config_parse(source_name, format!("section '{}' not found", path), text)
            })?,
            None => &document,
        };

        let root = root.as_object().ok_or_else(|| {
            LoggerError::config_parse(source_name, "configuration root is not a JSON object", text)
        })?;

        let global = match find_key(root, GLOBAL_KEY) {
            Some(value @ Value::Object(_)) => {
                serde_json::from_value::<ChannelParameterSet>(value.clone()).map_err(|e| {
                    LoggerError::config_parse(source_name, format!("invalid global section: {}", e), &value.to_string())
                })?
            }
            Some(other) => {
                return Err(LoggerError::config_parse(
                    source_name,
                    "'Global' must be an object",
                    &other.to_string(),
                ))
            }
            None => {
                return Err(LoggerError::config_parse(
                    source_name,
                    "missing 'Global' section",
                    text,
                ))
            }
        };

        let entries = match find_key(root, CHANNELS_KEY) {
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                return Err(LoggerError::config_parse(
                    source_name,
                    "'Channels' must be an array",
                    &other.to_string(),
                ))
            }
            None => {
                return Err(LoggerError::config_parse(
                    source_name,
                    "missing 'Channels' array",
                    text,
                ))
            }
        };

        let registry = self.registry.read();
        let mut channels = self.code_channels(&registry);
        for entry in entries {
            if let Some(channel) = parse_channel(source_name, entry, &registry)? {
                channels.push(channel);
            }
        }

        Ok(LoggerConfiguration::with_channels(
            global.merged_over(&self.global),
            channels,
        ))
    }

    fn code_channels(&self, registry: &RegistryReadGuard<'_>) -> Vec<ChannelConfig> {
        self.channels
            .iter()
            .map(|(channel_id, settings)| {
                let operational = match registry.get(channel_id) {
                    Some(descriptor) if descriptor.kind() == settings.kind() => descriptor.validate(settings),
                    _ => (settings.kind().default_validator())(settings),
                };
                ChannelConfig::new(channel_id.clone(), settings.clone(), operational)
            })
            .collect()
    }
}

/// Build a configuration from JSON text with no code-specified defaults
pub fn build_from_text(text: &str, registry: &ChannelRegistry) -> Result<LoggerConfiguration> {
    ConfigurationBuilder::new(registry).build_from_text(text)
}

/// Build a configuration from a JSON file with no code-specified defaults
pub fn build_from_file(path: impl AsRef<Path>, registry: &ChannelRegistry) -> Result<LoggerConfiguration> {
    ConfigurationBuilder::new(registry).build_from_file(path)
}

/// Parse one channel block; `Ok(None)` means the block was skipped
fn parse_channel(
    source_name: &str,
    entry: &Value,
    registry: &RegistryReadGuard<'_>,
) -> Result<Option<ChannelConfig>> {
    let block = entry.as_object().ok_or_else(|| {
        LoggerError::config_parse(source_name, "channel entry is not a JSON object", &entry.to_string())
    })?;

    let Some(channel_id) = find_key(block, DISCRIMINATOR_KEY).and_then(Value::as_str) else {
        return Ok(None);
    };
    let Some(descriptor) = registry.get(channel_id) else {
        return Ok(None);
    };

    let defaults = descriptor
        .default_settings()
        .to_value()
        .map_err(|e| LoggerError::config_parse(source_name, e.to_string(), channel_id))?;
    let merged = overlay(defaults, block);

    let settings = descriptor.kind().deserialize_settings(merged).map_err(|e| {
        LoggerError::config_parse(
            source_name,
            format!("invalid settings for channel '{}': {}", channel_id, e),
            &entry.to_string(),
        )
    })?;

    let operational = descriptor.validate(&settings);
    Ok(Some(ChannelConfig::new(descriptor.channel_id(), settings, operational)))
}

/// Layer a JSON block over serialized defaults, replacing keys case-insensitively
fn overlay(defaults: Value, block: &Map<String, Value>) -> Value {
    let mut merged = match defaults {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    for (key, value) in block {
        if key.eq_ignore_ascii_case(DISCRIMINATOR_KEY) {
            continue;
        }
        merged.retain(|existing, _| !existing.eq_ignore_ascii_case(key));
        merged.insert(key.clone(), value.clone());
    }

    Value::Object(merged)
}

fn find_key<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

fn find_section<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split(':')
        .filter(|segment| !segment.is_empty())
        .try_fold(document, |node, segment| find_key(node.as_object()?, segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::channel_settings::{ChannelKind, FileSettings, SmsSettings};
    use crate::core::descriptor::SettingsType;
    use crate::core::log_level::LogLevel;
    use crate::core::parameters::ParameterOverride;

    #[test]
    fn test_unknown_channels_are_skipped() {
        let registry = ChannelRegistry::with_defaults();
        let config = build_from_text(
            r#"{
                "Global": {},
                "Channels": [
                    { "Channel": "Console", "MinimumLevel": "Debug" },
                    { "Channel": "TotallyUnknownType", "Whatever": 1 },
                    { "Channel": "Debug" }
                ]
            }"#,
            &registry,
        )
        .unwrap();

        let ids: Vec<String> = config.channels().into_iter().map(|c| c.channel_id).collect();
        assert_eq!(ids, vec!["Console", "Debug"]);
    }

    #[test]
    fn test_missing_discriminator_is_skipped() {
        let registry = ChannelRegistry::with_defaults();
        let config = build_from_text(
            r#"{ "Global": {}, "Channels": [ { "MinimumLevel": "Debug" }, { "channel": "debug" } ] }"#,
            &registry,
        )
        .unwrap();
        assert_eq!(config.channel_count(), 1);
        assert!(config.is_channel_defined("Debug"));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let registry = ChannelRegistry::with_defaults();
        let err = build_from_text(r#"{ "Global": {}, "Channels": [ "#, &registry).unwrap_err();
        assert!(matches!(err, LoggerError::ConfigurationParseError { .. }));
    }

    #[test]
    fn test_missing_channels_is_parse_error() {
        let registry = ChannelRegistry::with_defaults();
        let err = build_from_text(r#"{ "Global": { "MinimumLevel": "Debug" } }"#, &registry).unwrap_err();
        match err {
            LoggerError::ConfigurationParseError { source_name, message, excerpt } => {
                assert_eq!(source_name, "<text>");
                assert!(message.contains("Channels"));
                assert!(excerpt.contains("Global"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_global_is_parse_error() {
        let registry = ChannelRegistry::with_defaults();
        let err = build_from_text(r#"{ "Channels": [ { "Channel": "Console" } ] }"#, &registry).unwrap_err();
        match err {
            LoggerError::ConfigurationParseError { message, excerpt, .. } => {
                assert!(message.contains("Global"));
                assert!(excerpt.contains("Console"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = build_from_text(r#"{ "Global": null, "Channels": [] }"#, &registry).unwrap_err();
        assert!(matches!(err, LoggerError::ConfigurationParseError { .. }));

        let err = build_from_text(r#"{ "Global": [], "Channels": [] }"#, &registry).unwrap_err();
        assert!(matches!(err, LoggerError::ConfigurationParseError { .. }));
    }

    #[test]
    fn test_empty_global_uses_code_defaults() {
        let registry = ChannelRegistry::with_defaults();
        let config = ConfigurationBuilder::new(&registry)
            .global(ChannelParameterSet::new().with_override(ParameterOverride::MinimumLevel(LogLevel::Warning)))
            .build_from_text(r#"{ "global": {}, "channels": [ { "Channel": "Debug" } ] }"#)
            .unwrap();
        assert_eq!(config.effective_minimum_level(), LogLevel::Warning);
    }

    #[test]
    fn test_non_array_channels_is_parse_error() {
        let registry = ChannelRegistry::with_defaults();
        let err = build_from_text(r#"{ "Global": {}, "Channels": { "Channel": "Console" } }"#, &registry).unwrap_err();
        assert!(matches!(err, LoggerError::ConfigurationParseError { .. }));
    }

    #[test]
    fn test_bad_channel_settings_is_parse_error() {
        let registry = ChannelRegistry::with_defaults();
        let err = build_from_text(
            r#"{ "Global": {}, "Channels": [ { "Channel": "Console", "MinimumLevel": "Loudest" } ] }"#,
            &registry,
        )
        .unwrap_err();
        assert!(matches!(err, LoggerError::ConfigurationParseError { .. }));
    }

    #[test]
    fn test_global_inherits_into_channels() {
        let registry = ChannelRegistry::with_defaults();
        let config = build_from_text(
            r#"{
                "global": { "MinimumLevel": "Warning", "IncludeSourcePath": true },
                "channels": [
                    { "Channel": "Console" },
                    { "Channel": "File", "MinimumLevel": "Error" }
                ]
            }"#,
            &registry,
        )
        .unwrap();

        let console = config.resolved_parameters("Console").unwrap();
        assert_eq!(console.minimum_level, LogLevel::Warning);
        assert!(console.include_source_path);

        let file = config.resolved_parameters("File").unwrap();
        assert_eq!(file.minimum_level, LogLevel::Error);
        assert!(file.include_source_path);
    }

    #[test]
    fn test_json_global_overrides_code_global() {
        let registry = ChannelRegistry::with_defaults();
        let code_global = ChannelParameterSet::new()
            .with_override(ParameterOverride::MinimumLevel(LogLevel::Information))
            .with_override(ParameterOverride::RequireNewLine(true));

        let config = ConfigurationBuilder::new(&registry)
            .global(code_global)
            .build_from_text(r#"{ "Global": { "MinimumLevel": "Error" }, "Channels": [] }"#)
            .unwrap();

        let global = config.global();
        assert_eq!(global.minimum_level, Some(LogLevel::Error));
        assert_eq!(global.require_new_line, Some(true));
        assert_eq!(global.output_template, None);
    }

    #[test]
    fn test_code_channels_precede_json_channels() {
        let registry = ChannelRegistry::with_defaults();
        let config = ConfigurationBuilder::new(&registry)
            .channel("LastEvent", ChannelKind::LastEvent.default_settings())
            .build_from_text(r#"{ "Global": {}, "Channels": [ { "Channel": "Console" } ] }"#)
            .unwrap();

        let ids: Vec<String> = config.channels().into_iter().map(|c| c.channel_id).collect();
        assert_eq!(ids, vec!["LastEvent", "Console"]);
    }

    #[test]
    fn test_invalid_sms_channel_kept_but_not_operational() {
        let registry = ChannelRegistry::with_defaults();
        let config = build_from_text(
            r#"{ "Global": {}, "Channels": [ { "Channel": "Sms", "AccountId": "", "Recipients": [] } ] }"#,
            &registry,
        )
        .unwrap();

        let channels = config.channels();
        assert_eq!(channels.len(), 1);
        assert!(!channels[0].operational);
    }

    #[test]
    fn test_valid_sms_channel_is_operational() {
        let registry = ChannelRegistry::with_defaults();
        let config = build_from_text(
            r#"{ "Global": {}, "Channels": [ {
                "Channel": "sms",
                "AccountId": "AC123",
                "AccountToken": "secret",
                "FromNumber": "+15550001111",
                "Recipients": ["+15550002222"]
            } ] }"#,
            &registry,
        )
        .unwrap();

        let channels = config.channels();
        assert!(channels[0].operational);
        assert_eq!(channels[0].channel_id, "Sms");
        match &channels[0].settings {
            ChannelSettings::Sms(SmsSettings { recipients, .. }) => assert_eq!(recipients.len(), 1),
            other => panic!("unexpected settings: {other:?}"),
        }
    }

    #[test]
    fn test_factory_defaults_are_overlaid() {
        let registry = ChannelRegistry::with_defaults();
        registry
            .register(
                "File",
                SettingsType::with_factory(ChannelKind::File, || {
                    ChannelSettings::File(FileSettings {
                        folder: Some("logs".into()),
                        compress_rolled: true,
                        ..FileSettings::default()
                    })
                }),
                None,
            )
            .unwrap();

        let config = build_from_text(
            r#"{ "Global": {}, "Channels": [ { "Channel": "File", "fileName": "service.log" } ] }"#,
            &registry,
        )
        .unwrap();

        match &config.channels()[0].settings {
            ChannelSettings::File(file) => {
                assert_eq!(file.folder.as_deref(), Some("logs"));
                assert_eq!(file.file_name, "service.log");
                assert!(file.compress_rolled);
            }
            other => panic!("unexpected settings: {other:?}"),
        }
    }

    #[test]
    fn test_alias_id_maps_to_kind() {
        let registry = ChannelRegistry::with_defaults();
        registry.register_kind("RollingFile", ChannelKind::File).unwrap();

        let config = build_from_text(r#"{ "Global": {}, "Channels": [ { "Channel": "rollingfile" } ] }"#, &registry).unwrap();
        let channel = &config.channels()[0];
        assert_eq!(channel.channel_id, "RollingFile");
        assert_eq!(channel.kind(), ChannelKind::File);
    }

    #[test]
    fn test_registry_and_configuration_agree_on_non_ascii_ids() {
        let registry = ChannelRegistry::with_defaults();
        registry.register_kind("Überwachung", ChannelKind::Debug).unwrap();

        let config = build_from_text(r#"{ "Global": {}, "Channels": [ { "Channel": "ÜBERWACHUNG" } ] }"#, &registry)
            .unwrap();
        assert_eq!(config.channel_count(), 1);
        assert!(registry.contains("überwachung"));
        assert!(config.is_channel_defined("überwachung"));
    }

    #[test]
    fn test_section_navigation() {
        let registry = ChannelRegistry::with_defaults();
        let config = ConfigurationBuilder::new(&registry)
            .section("App:Logging")
            .build_from_text(r#"{ "app": { "logging": { "Global": {}, "Channels": [ { "Channel": "Debug" } ] } } }"#)
            .unwrap();
        assert!(config.is_channel_defined("debug"));

        let err = ConfigurationBuilder::new(&registry)
            .section("Missing")
            .build_from_text(r#"{ "Global": {}, "Channels": [] }"#)
            .unwrap_err();
        assert!(matches!(err, LoggerError::ConfigurationParseError { .. }));
    }

    #[test]
    fn test_missing_file_is_reported_before_parsing() {
        let registry = ChannelRegistry::with_defaults();
        let err = build_from_file("/nonexistent/path.json", &registry).unwrap_err();
        assert!(matches!(err, LoggerError::ConfigurationFileNotFound { .. }));
    }

    #[test]
    fn test_build_from_code_only() {
        let registry = ChannelRegistry::with_defaults();
        let config = ConfigurationBuilder::new(&registry)
            .channel("Sms", ChannelKind::Sms.default_settings())
            .build();

        let channels = config.channels();
        assert_eq!(channels.len(), 1);
        assert!(!channels[0].operational);
    }
}
