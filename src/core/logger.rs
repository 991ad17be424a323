//! Live logger built from a channel configuration

use super::{
    channel::Channel,
    channel_settings::ChannelSettings,
    configuration::{LoggerConfiguration, ResolvedChannel},
    error::{LoggerError, Result},
    facade::LiveLogger,
    field_value::FieldValue,
    log_entry::{CallSite, LogEvent},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    parameters::ResolvedParameters,
    template,
};
use crate::channels::{
    ConsoleChannel, DebugChannel, FileChannel, LastEventChannel, LastEventSlot, NetEventChannel,
    NetEventHub, SmsChannel, SmsSender,
};
use parking_lot::RwLock;
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One live channel with its resolved parameters
struct Sink {
    channel_id: String,
    parameters: ResolvedParameters,
    /// Output template with and without the type-context fragment
    template_with_context: String,
    template_plain: String,
    /// Only receives events while SMS forwarding is active
    sms_only: bool,
    channel: Box<dyn Channel>,
}

impl Sink {
    fn new(channel_id: String, parameters: ResolvedParameters, sms_only: bool, channel: Box<dyn Channel>) -> Self {
        Self {
            template_with_context: parameters.enriched_template(true),
            template_plain: parameters.enriched_template(false),
            channel_id,
            parameters,
            sms_only,
            channel,
        }
    }

    fn accepts(&self, level: LogLevel, sms: bool) -> bool {
        level >= self.parameters.minimum_level && (sms || !self.sms_only)
    }

    fn render(&self, event: &LogEvent) -> String {
        let output_template = if event.has_type_context() {
            &self.template_with_context
        } else {
            &self.template_plain
        };
        template::render_output(output_template, event, &self.parameters)
    }
}

pub struct Logger {
    min_level: RwLock<LogLevel>,
    sinks: RwLock<Vec<Sink>>,
    logged_type: RwLock<Option<String>>,
    sms_forwarding: AtomicBool,
    metrics: Arc<LoggerMetrics>,
    last_event: LastEventSlot,
    net_events: NetEventHub,
}

impl Logger {
    /// Logger without channels, accepting every level
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_level: RwLock::new(LogLevel::Verbose),
            sinks: RwLock::new(Vec::new()),
            logged_type: RwLock::new(None),
            sms_forwarding: AtomicBool::new(false),
            metrics: Arc::new(LoggerMetrics::new()),
            last_event: LastEventSlot::new(),
            net_events: NetEventHub::new(),
        }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_channel_logger::prelude::*;
    ///
    /// let registry = ChannelRegistry::with_defaults();
    /// let configuration = ConfigurationBuilder::new(&registry)
    ///     .build_from_text(r#"{ "Global": {}, "Channels": [ { "Channel": "LastEvent" } ] }"#)
    ///     .unwrap();
    ///
    /// let logger = Logger::builder()
    ///     .configuration(&configuration)
    ///     .build()
    ///     .unwrap();
    ///
    /// logger.information("Service {0} started", ("billing",));
    /// assert!(logger.last_event().rendered().unwrap().contains("Service billing started"));
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Add a channel that receives every event at or above `parameters.minimum_level`
    pub fn add_channel(&mut self, channel_id: impl Into<String>, parameters: ResolvedParameters, channel: Box<dyn Channel>) {
        self.sinks
            .write()
            .push(Sink::new(channel_id.into(), parameters, false, channel));
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    /// Ids of the live channels in registration order
    pub fn channel_ids(&self) -> Vec<String> {
        self.sinks.read().iter().map(|s| s.channel_id.clone()).collect()
    }

    pub fn channel_count(&self) -> usize {
        self.sinks.read().len()
    }

    pub fn sms_forwarding(&self) -> bool {
        self.sms_forwarding.load(Ordering::SeqCst)
    }

    /// Slot updated by LastEvent channels
    pub fn last_event(&self) -> &LastEventSlot {
        &self.last_event
    }

    /// Hub fed by NetEvent channels
    pub fn net_events(&self) -> &NetEventHub {
        &self.net_events
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> Result<()> {
        let mut sinks = self.sinks.write();
        let mut first_error = None;
        for sink in sinks.iter_mut() {
            if let Err(e) = sink.channel.flush() {
                eprintln!("[LOGGER ERROR] Channel '{}' flush failed: {}", sink.channel_id, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Deliver one event to every accepting sink
    ///
    /// Each channel is isolated: an error or a panic in one channel is
    /// reported and the remaining channels still receive the event. The
    /// first failure is returned once every channel was tried.
    fn dispatch(sinks: &mut [Sink], event: &LogEvent, metrics: &LoggerMetrics) -> Result<()> {
        let mut first_error = None;
        let mut forwarded = false;

        for sink in sinks.iter_mut() {
            if !sink.accepts(event.level, event.send_to_sms) {
                continue;
            }

            let rendered = sink.render(event);
            let write_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                sink.channel.write(event, &rendered)
            }));

            match write_result {
                Ok(Ok(())) => {
                    forwarded |= sink.sms_only;
                }
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Channel '{}' failed: {}", sink.channel_id, e);
                    first_error.get_or_insert_with(|| LoggerError::channel_write(&sink.channel_id, e.to_string()));
                }
                Err(panic_info) => {
                    let panic_msg = panic_message(panic_info.as_ref());
                    eprintln!(
                        "[LOGGER CRITICAL] Channel '{}' panicked: {}. \
                         Other channels continue to function.",
                        sink.channel_id, panic_msg
                    );
                    first_error.get_or_insert_with(|| {
                        LoggerError::channel_write(&sink.channel_id, format!("panicked: {}", panic_msg))
                    });
                }
            }
        }

        if forwarded {
            metrics.record_sms_forwarded();
        }
        match first_error {
            Some(e) => {
                metrics.record_failed();
                Err(e)
            }
            None => {
                metrics.record_logged();
                Ok(())
            }
        }
    }
}

pub(crate) fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl LiveLogger for Logger {
    /// Write through every channel; consumes a pending SMS forward
    fn write(&self, level: LogLevel, template: &str, args: &[FieldValue], call_site: &CallSite) -> Result<()> {
        let sms = self.sms_forwarding.swap(false, Ordering::SeqCst);
        if level < *self.min_level.read() {
            self.metrics.record_filtered();
            return Ok(());
        }

        let event = LogEvent::new(level, template, args, call_site, self.logged_type(), sms);
        let mut sinks = self.sinks.write();
        Self::dispatch(&mut sinks, &event, &self.metrics)
    }

    fn logged_type(&self) -> Option<String> {
        self.logged_type.read().clone()
    }

    fn set_logged_type(&self, logged_type: Option<String>) {
        *self.logged_type.write() = logged_type;
    }

    fn set_sms_forwarding(&self, enabled: bool) {
        self.sms_forwarding.store(enabled, Ordering::SeqCst);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        let failed = self.metrics.failed_count();
        if failed > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} failed writes (failure rate: {:.2}%)",
                failed,
                self.metrics.failure_rate()
            );
        }
    }
}

/// Builder for constructing a Logger from a configuration
///
/// Channels come from the configuration in its order, followed by channels
/// added directly. Non-operational channels and SMS channels without a
/// sender are skipped with a warning.
///
/// # Example
/// ```
/// use rust_channel_logger::prelude::*;
///
/// let configuration = LoggerConfiguration::default();
/// configuration.add_channel(ChannelConfig::new(
///     "NetEvent",
///     ChannelKind::NetEvent.default_settings(),
///     true,
/// ));
///
/// let hub = NetEventHub::new();
/// let events = hub.subscribe();
///
/// let logger = Logger::builder()
///     .configuration(&configuration)
///     .net_event_hub(hub)
///     .build()
///     .unwrap();
///
/// logger.warning("Disk {0}% full", (91,));
/// assert_eq!(events.try_recv().unwrap().message, "Disk 91% full");
/// ```
pub struct LoggerBuilder {
    min_level: Option<LogLevel>,
    channels: Vec<ResolvedChannel>,
    extra: Vec<(String, ResolvedParameters, Box<dyn Channel>)>,
    sms_sender: Option<Arc<dyn SmsSender>>,
    last_event: LastEventSlot,
    net_events: NetEventHub,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            min_level: None,
            channels: Vec::new(),
            extra: Vec::new(),
            sms_sender: None,
            last_event: LastEventSlot::new(),
            net_events: NetEventHub::new(),
        }
    }

    /// Take the channels of a configuration, resolved against its current global defaults
    #[must_use = "builder methods return a new value"]
    pub fn configuration(mut self, configuration: &LoggerConfiguration) -> Self {
        self.channels.extend(configuration.resolved_channels());
        self
    }

    /// Override the logger-wide minimum level
    ///
    /// Defaults to the lowest minimum level of all channels.
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sms_sender(mut self, sender: Arc<dyn SmsSender>) -> Self {
        self.sms_sender = Some(sender);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn last_event(mut self, slot: LastEventSlot) -> Self {
        self.last_event = slot;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn net_event_hub(mut self, hub: NetEventHub) -> Self {
        self.net_events = hub;
        self
    }

    /// Add a channel that is not described by the configuration
    #[must_use = "builder methods return a new value"]
    pub fn channel(mut self, channel_id: impl Into<String>, parameters: ResolvedParameters, channel: Box<dyn Channel>) -> Self {
        self.extra.push((channel_id.into(), parameters, channel));
        self
    }

    /// Build the Logger
    ///
    /// # Errors
    ///
    /// Returns error if a file channel cannot create its folder
    pub fn build(self) -> Result<Logger> {
        let mut sinks = Vec::with_capacity(self.channels.len() + self.extra.len());

        for resolved in self.channels {
            if !resolved.operational {
                eprintln!(
                    "[LOGGER WARNING] Channel '{}' is not operational and was skipped",
                    resolved.channel_id
                );
                continue;
            }

            let channel: Box<dyn Channel> = match &resolved.settings {
                ChannelSettings::Console(settings) => Box::new(ConsoleChannel::from_settings(settings)),
                ChannelSettings::Debug(_) => Box::new(DebugChannel::new()),
                ChannelSettings::File(settings) => Box::new(FileChannel::from_settings(settings)?),
                ChannelSettings::Sms(settings) => match &self.sms_sender {
                    Some(sender) => Box::new(SmsChannel::new(settings.clone(), Arc::clone(sender))),
                    None => {
                        eprintln!(
                            "[LOGGER WARNING] Channel '{}' needs an SMS sender and was skipped",
                            resolved.channel_id
                        );
                        continue;
                    }
                },
                ChannelSettings::LastEvent(_) => Box::new(LastEventChannel::new(self.last_event.clone())),
                ChannelSettings::NetEvent(_) => Box::new(NetEventChannel::new(self.net_events.clone())),
            };

            let sms_only = matches!(resolved.settings, ChannelSettings::Sms(_));
            sinks.push(Sink::new(resolved.channel_id, resolved.parameters, sms_only, channel));
        }

        for (channel_id, parameters, channel) in self.extra {
            sinks.push(Sink::new(channel_id, parameters, false, channel));
        }

        let min_level = self.min_level.unwrap_or_else(|| {
            sinks
                .iter()
                .map(|s| s.parameters.minimum_level)
                .min()
                .unwrap_or(LogLevel::Verbose)
        });

        Ok(Logger {
            min_level: RwLock::new(min_level),
            sinks: RwLock::new(sinks),
            logged_type: RwLock::new(None),
            sms_forwarding: AtomicBool::new(false),
            metrics: Arc::new(LoggerMetrics::new()),
            last_event: self.last_event,
            net_events: self.net_events,
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
