//! Catalog of known channel ids
//!
//! The registry is populated during start-up and read by every configuration
//! build. Lookups are case-insensitive and a later registration under an
//! existing id replaces the earlier descriptor.
//!
//! Builds hold a read guard for their whole duration (see
//! [`ChannelRegistry::read`]), so a `register` call made after start-up waits
//! for in-flight builds and never interleaves with one.

use super::channel_settings::{ChannelKind, Validator};
use super::descriptor::{ChannelDescriptor, SettingsType};
use super::error::{LoggerError, Result};
use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ChannelRegistry {
    descriptors: RwLock<HashMap<String, ChannelDescriptor>>,
}

impl ChannelRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in channel kind
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        {
            let mut descriptors = registry.descriptors.write();
            for kind in ChannelKind::ALL {
                descriptors.insert(normalize(kind.id()), ChannelDescriptor::builtin(kind));
            }
        }
        registry
    }

    /// Register or replace a channel id
    ///
    /// Without an explicit validator the kind's built-in rule is used.
    ///
    /// # Errors
    ///
    /// Returns `InvalidChannelDescriptor` when the id is empty, the settings
    /// type has no construction path, or the factory builds another kind.
    pub fn register(
        &self,
        channel_id: &str,
        settings_type: SettingsType,
        validator: Option<Validator>,
    ) -> Result<()> {
        let channel_id = channel_id.trim();
        if channel_id.is_empty() {
            return Err(LoggerError::invalid_descriptor(channel_id, "channel id is empty"));
        }

        let constructed = settings_type.construct().ok_or_else(|| {
            LoggerError::invalid_descriptor(channel_id, "settings type has no zero-argument construction path")
        })?;
        if constructed.kind() != settings_type.kind() {
            return Err(LoggerError::invalid_descriptor(
                channel_id,
                format!(
                    "factory builds {} settings but the type is registered as {}",
                    constructed.kind(),
                    settings_type.kind()
                ),
            ));
        }

        let validator = validator.unwrap_or_else(|| settings_type.kind().default_validator());
        let descriptor = ChannelDescriptor::new(channel_id.to_string(), settings_type, validator);
        self.descriptors.write().insert(normalize(channel_id), descriptor);
        Ok(())
    }

    /// Register a built-in kind under an additional id
    pub fn register_kind(&self, channel_id: &str, kind: ChannelKind) -> Result<()> {
        self.register(channel_id, SettingsType::of(kind), None)
    }

    pub fn get(&self, channel_id: &str) -> Option<ChannelDescriptor> {
        self.descriptors.read().get(&normalize(channel_id)).cloned()
    }

    pub fn contains(&self, channel_id: &str) -> bool {
        self.descriptors.read().contains_key(&normalize(channel_id))
    }

    /// Registered ids, sorted for stable output
    pub fn channel_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .descriptors
            .read()
            .values()
            .map(|d| d.channel_id().to_string())
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.descriptors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.read().is_empty()
    }

    /// Hold the registry for reading across a whole configuration build
    pub(crate) fn read(&self) -> RegistryReadGuard<'_> {
        RegistryReadGuard {
            guard: self.descriptors.read(),
        }
    }
}

/// Read access to the registry that blocks registration while alive
pub(crate) struct RegistryReadGuard<'a> {
    guard: RwLockReadGuard<'a, HashMap<String, ChannelDescriptor>>,
}

impl RegistryReadGuard<'_> {
    pub(crate) fn get(&self, channel_id: &str) -> Option<&ChannelDescriptor> {
        self.guard.get(&normalize(channel_id))
    }
}

/// Canonical form of a channel id; every case-insensitive id comparison goes through it
pub(crate) fn normalize(channel_id: &str) -> String {
    channel_id.trim().to_lowercase()
}
