//! Channel descriptors: what a channel id means and how to build its settings

use super::channel_settings::{ChannelKind, ChannelSettings, Validator};
use std::fmt;
use std::sync::Arc;

/// Zero-argument construction path for a settings type
pub type SettingsFactory = Arc<dyn Fn() -> ChannelSettings + Send + Sync>;

/// The settings shape registered for a channel id
///
/// The factory produces the code-specified defaults that JSON settings are
/// layered over. A settings type without a factory cannot be registered.
#[derive(Clone)]
pub struct SettingsType {
    kind: ChannelKind,
    factory: Option<SettingsFactory>,
}

impl SettingsType {
    /// Settings type using the kind's built-in defaults
    pub fn of(kind: ChannelKind) -> Self {
        Self {
            kind,
            factory: Some(Arc::new(move || kind.default_settings())),
        }
    }

    /// Settings type whose defaults come from `factory`
    ///
    /// The factory's output must be of `kind`; the registry rejects it otherwise.
    pub fn with_factory<F>(kind: ChannelKind, factory: F) -> Self
    where
        F: Fn() -> ChannelSettings + Send + Sync + 'static,
    {
        Self {
            kind,
            factory: Some(Arc::new(factory)),
        }
    }

    /// Settings type with no construction path
    pub fn without_factory(kind: ChannelKind) -> Self {
        Self { kind, factory: None }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn has_factory(&self) -> bool {
        self.factory.is_some()
    }

    /// Construct default settings, if a construction path exists
    pub fn construct(&self) -> Option<ChannelSettings> {
        self.factory.as_ref().map(|factory| factory())
    }
}

impl fmt::Debug for SettingsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsType")
            .field("kind", &self.kind)
            .field("has_factory", &self.has_factory())
            .finish()
    }
}

/// A registered channel: id, settings type and validation rule
#[derive(Clone)]
pub struct ChannelDescriptor {
    channel_id: String,
    settings_type: SettingsType,
    validator: Validator,
}

impl ChannelDescriptor {
    pub(crate) fn new(channel_id: String, settings_type: SettingsType, validator: Validator) -> Self {
        Self {
            channel_id,
            settings_type,
            validator,
        }
    }

    /// Descriptor for a built-in kind under its canonical id
    pub fn builtin(kind: ChannelKind) -> Self {
        Self::new(kind.id().to_string(), SettingsType::of(kind), kind.default_validator())
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn kind(&self) -> ChannelKind {
        self.settings_type.kind()
    }

    pub fn settings_type(&self) -> &SettingsType {
        &self.settings_type
    }

    /// Settings produced by the zero-argument construction path
    pub fn default_settings(&self) -> ChannelSettings {
        self.settings_type
            .construct()
            .unwrap_or_else(|| self.kind().default_settings())
    }

    pub fn validate(&self, settings: &ChannelSettings) -> bool {
        (self.validator)(settings)
    }
}

impl fmt::Debug for ChannelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelDescriptor")
            .field("channel_id", &self.channel_id)
            .field("settings_type", &self.settings_type)
            .finish()
    }
}
