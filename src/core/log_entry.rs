//! Log event structures

use super::field_value::FieldValue;
use super::log_level::LogLevel;
use super::template;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Where a log call was made
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallSite {
    /// Calling member; the logging macros use the module path
    pub member: String,
    pub file: String,
    pub line: u32,
}

impl CallSite {
    pub fn new(member: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            member: member.into(),
            file: file.into(),
            line,
        }
    }

    /// Call site of the caller of a `#[track_caller]` function
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self {
            member: String::new(),
            file: location.file().to_string(),
            line: location.line(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.member.is_empty() && self.file.is_empty() && self.line == 0
    }
}

/// Capture the current call site
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::core::CallSite::new(module_path!(), file!(), line!())
    };
}

/// A single write as seen by the channels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub template: String,
    pub args: Vec<FieldValue>,
    /// Template with arguments substituted
    pub message: String,
    pub call_site: CallSite,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logged_type: Option<String>,
    /// Whether this write was forwarded to SMS channels
    pub send_to_sms: bool,
}

impl LogEvent {
    pub fn new(
        level: LogLevel,
        template: &str,
        args: &[FieldValue],
        call_site: &CallSite,
        logged_type: Option<String>,
        send_to_sms: bool,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            template: template.to_string(),
            args: args.to_vec(),
            message: template::render_message(template, args),
            call_site: call_site.clone(),
            logged_type,
            send_to_sms,
        }
    }

    /// Whether the type-context enrichment fragment has anything to show
    pub fn has_type_context(&self) -> bool {
        self.logged_type.is_some() || !self.call_site.member.is_empty()
    }
}
