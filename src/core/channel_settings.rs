//! Channel kinds and their settings
//!
//! Every channel kind is one variant of a closed enum. Each settings struct
//! flattens the shared [`ChannelParameterSet`] next to its own fields, so a
//! JSON block such as
//!
//! ```json
//! { "Channel": "File", "MinimumLevel": "Warning", "FileName": "app.log" }
//! ```
//!
//! deserializes into a [`FileSettings`] whose parameters carry the level.

use super::parameters::ChannelParameterSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Decides whether a channel's settings are complete enough to be operational
pub type Validator = Arc<dyn Fn(&ChannelSettings) -> bool + Send + Sync>;

/// The closed set of channel kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Console,
    Debug,
    File,
    Sms,
    LastEvent,
    NetEvent,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 6] = [
        ChannelKind::Console,
        ChannelKind::Debug,
        ChannelKind::File,
        ChannelKind::Sms,
        ChannelKind::LastEvent,
        ChannelKind::NetEvent,
    ];

    /// Canonical channel id, also the JSON discriminator value
    pub fn id(&self) -> &'static str {
        match self {
            ChannelKind::Console => "Console",
            ChannelKind::Debug => "Debug",
            ChannelKind::File => "File",
            ChannelKind::Sms => "Sms",
            ChannelKind::LastEvent => "LastEvent",
            ChannelKind::NetEvent => "NetEvent",
        }
    }

    /// Settings with every kind-specific field at its default
    pub fn default_settings(&self) -> ChannelSettings {
        match self {
            ChannelKind::Console => ChannelSettings::Console(ConsoleSettings::default()),
            ChannelKind::Debug => ChannelSettings::Debug(DebugSettings::default()),
            ChannelKind::File => ChannelSettings::File(FileSettings::default()),
            ChannelKind::Sms => ChannelSettings::Sms(SmsSettings::default()),
            ChannelKind::LastEvent => ChannelSettings::LastEvent(LastEventSettings::default()),
            ChannelKind::NetEvent => ChannelSettings::NetEvent(NetEventSettings::default()),
        }
    }

    /// Deserialize a JSON settings block as this kind
    pub fn deserialize_settings(&self, value: serde_json::Value) -> serde_json::Result<ChannelSettings> {
        Ok(match self {
            ChannelKind::Console => ChannelSettings::Console(serde_json::from_value(value)?),
            ChannelKind::Debug => ChannelSettings::Debug(serde_json::from_value(value)?),
            ChannelKind::File => ChannelSettings::File(serde_json::from_value(value)?),
            ChannelKind::Sms => ChannelSettings::Sms(serde_json::from_value(value)?),
            ChannelKind::LastEvent => ChannelSettings::LastEvent(serde_json::from_value(value)?),
            ChannelKind::NetEvent => ChannelSettings::NetEvent(serde_json::from_value(value)?),
        })
    }

    /// Built-in validation rule for this kind
    pub fn default_validator(&self) -> Validator {
        match self {
            ChannelKind::Sms => Arc::new(|settings| match settings {
                ChannelSettings::Sms(sms) => sms.is_usable(),
                _ => false,
            }),
            ChannelKind::File => Arc::new(|settings| match settings {
                ChannelSettings::File(file) => !file.file_name.trim().is_empty(),
                _ => false,
            }),
            _ => Arc::new(|_| true),
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for ChannelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChannelKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown channel kind: '{}'", s))
    }
}

/// Concrete settings for one channel
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelSettings {
    Console(ConsoleSettings),
    Debug(DebugSettings),
    File(FileSettings),
    Sms(SmsSettings),
    LastEvent(LastEventSettings),
    NetEvent(NetEventSettings),
}

impl ChannelSettings {
    pub fn kind(&self) -> ChannelKind {
        match self {
            ChannelSettings::Console(_) => ChannelKind::Console,
            ChannelSettings::Debug(_) => ChannelKind::Debug,
            ChannelSettings::File(_) => ChannelKind::File,
            ChannelSettings::Sms(_) => ChannelKind::Sms,
            ChannelSettings::LastEvent(_) => ChannelKind::LastEvent,
            ChannelSettings::NetEvent(_) => ChannelKind::NetEvent,
        }
    }

    pub fn parameters(&self) -> &ChannelParameterSet {
        match self {
            ChannelSettings::Console(s) => &s.parameters,
            ChannelSettings::Debug(s) => &s.parameters,
            ChannelSettings::File(s) => &s.parameters,
            ChannelSettings::Sms(s) => &s.parameters,
            ChannelSettings::LastEvent(s) => &s.parameters,
            ChannelSettings::NetEvent(s) => &s.parameters,
        }
    }

    pub fn parameters_mut(&mut self) -> &mut ChannelParameterSet {
        match self {
            ChannelSettings::Console(s) => &mut s.parameters,
            ChannelSettings::Debug(s) => &mut s.parameters,
            ChannelSettings::File(s) => &mut s.parameters,
            ChannelSettings::Sms(s) => &mut s.parameters,
            ChannelSettings::LastEvent(s) => &mut s.parameters,
            ChannelSettings::NetEvent(s) => &mut s.parameters,
        }
    }

    /// Replace the shared parameters, keeping the kind-specific fields
    #[must_use]
    pub fn with_parameters(mut self, parameters: ChannelParameterSet) -> Self {
        *self.parameters_mut() = parameters;
        self
    }

    /// JSON form of the settings, without a discriminator
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            ChannelSettings::Console(s) => serde_json::to_value(s),
            ChannelSettings::Debug(s) => serde_json::to_value(s),
            ChannelSettings::File(s) => serde_json::to_value(s),
            ChannelSettings::Sms(s) => serde_json::to_value(s),
            ChannelSettings::LastEvent(s) => serde_json::to_value(s),
            ChannelSettings::NetEvent(s) => serde_json::to_value(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    #[serde(flatten)]
    pub parameters: ChannelParameterSet,

    #[serde(rename = "UseColors", alias = "useColors")]
    pub use_colors: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            parameters: ChannelParameterSet::default(),
            use_colors: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    #[serde(flatten)]
    pub parameters: ChannelParameterSet,
}

/// How often a file channel starts a new file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RollingInterval {
    Infinite,
    Year,
    Month,
    #[default]
    Day,
    Hour,
    Minute,
}

impl RollingInterval {
    pub fn to_str(&self) -> &'static str {
        match self {
            RollingInterval::Infinite => "Infinite",
            RollingInterval::Year => "Year",
            RollingInterval::Month => "Month",
            RollingInterval::Day => "Day",
            RollingInterval::Hour => "Hour",
            RollingInterval::Minute => "Minute",
        }
    }
}

impl FromStr for RollingInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INFINITE" | "NONE" | "NEVER" => Ok(RollingInterval::Infinite),
            "YEAR" => Ok(RollingInterval::Year),
            "MONTH" => Ok(RollingInterval::Month),
            "DAY" | "DAILY" => Ok(RollingInterval::Day),
            "HOUR" | "HOURLY" => Ok(RollingInterval::Hour),
            "MINUTE" => Ok(RollingInterval::Minute),
            _ => Err(format!("Invalid rolling interval: '{}'", s)),
        }
    }
}

impl Serialize for RollingInterval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_str())
    }
}

impl<'de> Deserialize<'de> for RollingInterval {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Default number of rolled files kept beside the active one
pub const DEFAULT_RETAINED_FILE_COUNT: usize = 31;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    #[serde(flatten)]
    pub parameters: ChannelParameterSet,

    #[serde(rename = "Folder", alias = "folder", skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,

    #[serde(rename = "FileName", alias = "fileName")]
    pub file_name: String,

    #[serde(rename = "RollingInterval", alias = "rollingInterval")]
    pub rolling_interval: RollingInterval,

    /// `None` keeps every rolled file
    #[serde(rename = "RetainedFileCountLimit", alias = "retainedFileCountLimit")]
    pub retained_file_count_limit: Option<usize>,

    #[serde(rename = "CompressRolled", alias = "compressRolled")]
    pub compress_rolled: bool,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            parameters: ChannelParameterSet::default(),
            folder: None,
            file_name: "log.txt".to_string(),
            rolling_interval: RollingInterval::default(),
            retained_file_count_limit: Some(DEFAULT_RETAINED_FILE_COUNT),
            compress_rolled: false,
        }
    }
}

/// Credentials and recipients for the SMS gateway channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmsSettings {
    #[serde(flatten)]
    pub parameters: ChannelParameterSet,

    #[serde(rename = "AccountId", alias = "accountId")]
    pub account_id: String,

    #[serde(rename = "AccountToken", alias = "accountToken")]
    pub account_token: String,

    #[serde(rename = "FromNumber", alias = "fromNumber")]
    pub from_number: String,

    #[serde(rename = "Recipients", alias = "recipients")]
    pub recipients: Vec<String>,
}

impl SmsSettings {
    /// Credentials present and at least one recipient
    pub fn is_usable(&self) -> bool {
        !self.account_id.trim().is_empty()
            && !self.account_token.trim().is_empty()
            && !self.from_number.trim().is_empty()
            && self.recipients.iter().any(|r| !r.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LastEventSettings {
    #[serde(flatten)]
    pub parameters: ChannelParameterSet,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetEventSettings {
    #[serde(flatten)]
    pub parameters: ChannelParameterSet,
}
