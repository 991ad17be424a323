//! SMS channel
//!
//! Delivery goes through an [`SmsSender`] supplied by the application; this
//! crate carries the gateway credentials but never talks to a network.

use crate::core::{Channel, LogEvent, LoggerError, Result, SmsSettings};
use std::sync::Arc;

/// One text message ready for a gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsMessage {
    pub account_id: String,
    pub account_token: String,
    pub from: String,
    pub to: String,
    pub body: String,
}

/// Gateway client that delivers SMS messages
pub trait SmsSender: Send + Sync {
    fn send(&self, message: &SmsMessage) -> Result<()>;
}

/// Sends every event it receives to each configured recipient
///
/// The logger only routes events here while SMS forwarding is active.
pub struct SmsChannel {
    settings: SmsSettings,
    sender: Arc<dyn SmsSender>,
}

impl SmsChannel {
    pub fn new(settings: SmsSettings, sender: Arc<dyn SmsSender>) -> Self {
        Self { settings, sender }
    }
}

impl Channel for SmsChannel {
    fn write(&mut self, _event: &LogEvent, rendered: &str) -> Result<()> {
        let body = rendered.trim_end().to_string();
        let mut first_error = None;

        for recipient in self.settings.recipients.iter().filter(|r| !r.trim().is_empty()) {
            let message = SmsMessage {
                account_id: self.settings.account_id.clone(),
                account_token: self.settings.account_token.clone(),
                from: self.settings.from_number.clone(),
                to: recipient.trim().to_string(),
                body: body.clone(),
            };
            if let Err(e) = self.sender.send(&message) {
                eprintln!("[LOGGER ERROR] SMS to {} failed: {}", message.to, e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(LoggerError::channel_write("sms", e.to_string())),
            None => Ok(()),
        }
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "sms"
    }
}
