//! Resolved logger configuration
//!
//! Holds the global defaults and the ordered list of configured channels.
//! Channels keep their own overrides; they are resolved against the global
//! defaults only when read, so changing the global defaults later is visible
//! on the next resolution.

use super::channel_settings::{ChannelKind, ChannelSettings};
use super::log_level::LogLevel;
use super::parameters::{ChannelParameterSet, ResolvedParameters};
use super::registry::normalize;
use parking_lot::RwLock;

/// One configured channel as it came from a configuration source
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelConfig {
    pub channel_id: String,
    pub settings: ChannelSettings,
    /// False when the channel's validator rejected its settings
    pub operational: bool,
}

impl ChannelConfig {
    pub fn new(channel_id: impl Into<String>, settings: ChannelSettings, operational: bool) -> Self {
        Self {
            channel_id: channel_id.into(),
            settings,
            operational,
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.settings.kind()
    }

    pub fn parameters(&self) -> &ChannelParameterSet {
        self.settings.parameters()
    }

    /// Resolve this channel's parameters against global overrides
    pub fn resolve(&self, global: &ChannelParameterSet) -> ResolvedParameters {
        ChannelParameterSet::resolve_chain(&[self.parameters(), global])
    }
}

/// What a channel factory needs to create one live channel
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChannel {
    pub channel_id: String,
    pub kind: ChannelKind,
    pub parameters: ResolvedParameters,
    pub settings: ChannelSettings,
    pub operational: bool,
}

#[derive(Debug, Default)]
pub struct LoggerConfiguration {
    global: RwLock<ChannelParameterSet>,
    channels: RwLock<Vec<ChannelConfig>>,
}

impl LoggerConfiguration {
    pub fn new(global: ChannelParameterSet) -> Self {
        Self {
            global: RwLock::new(global),
            channels: RwLock::new(Vec::new()),
        }
    }

    pub fn with_channels(global: ChannelParameterSet, channels: Vec<ChannelConfig>) -> Self {
        Self {
            global: RwLock::new(global),
            channels: RwLock::new(channels),
        }
    }

    /// Global overrides, unresolved
    pub fn global(&self) -> ChannelParameterSet {
        self.global.read().clone()
    }

    /// Global defaults resolved against the system defaults
    pub fn resolved_global(&self) -> ResolvedParameters {
        self.global.read().resolve(&ResolvedParameters::default())
    }

    pub fn set_global(&self, global: ChannelParameterSet) {
        *self.global.write() = global;
    }

    /// Update the global overrides in place
    pub fn update_global<F>(&self, update: F)
    where
        F: FnOnce(&ChannelParameterSet) -> ChannelParameterSet,
    {
        let mut global = self.global.write();
        *global = update(&global);
    }

    /// Append a channel after construction
    pub fn add_channel(&self, channel: ChannelConfig) {
        self.channels.write().push(channel);
    }

    /// Snapshot of the configured channels in source order
    pub fn channels(&self) -> Vec<ChannelConfig> {
        self.channels.read().clone()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.read().len()
    }

    /// Case-insensitive membership test
    pub fn is_channel_defined(&self, channel_id: &str) -> bool {
        let wanted = normalize(channel_id);
        self.channels.read().iter().any(|c| normalize(&c.channel_id) == wanted)
    }

    /// Every channel resolved against the current global defaults, in order
    pub fn resolved_channels(&self) -> Vec<ResolvedChannel> {
        let global = self.global();
        self.channels()
            .into_iter()
            .map(|channel| ResolvedChannel {
                parameters: channel.resolve(&global),
                kind: channel.kind(),
                channel_id: channel.channel_id,
                settings: channel.settings,
                operational: channel.operational,
            })
            .collect()
    }

    /// Resolved parameters of the first channel with the given id
    pub fn resolved_parameters(&self, channel_id: &str) -> Option<ResolvedParameters> {
        let global = self.global();
        let wanted = normalize(channel_id);
        self.channels
            .read()
            .iter()
            .find(|c| normalize(&c.channel_id) == wanted)
            .map(|c| c.resolve(&global))
    }

    /// Lowest minimum level over all channels; Verbose when there are none
    pub fn effective_minimum_level(&self) -> LogLevel {
        let global = self.global();
        self.channels
            .read()
            .iter()
            .map(|c| c.resolve(&global).minimum_level)
            .min()
            .unwrap_or(LogLevel::Verbose)
    }

    /// Enriched output template for a channel
    pub fn enriched_template(&self, channel_id: &str, include_type_context: bool) -> Option<String> {
        self.resolved_parameters(channel_id)
            .map(|p| p.enriched_template(include_type_context))
    }
}

impl Clone for LoggerConfiguration {
    fn clone(&self) -> Self {
        Self::with_channels(self.global(), self.channels())
    }
}
