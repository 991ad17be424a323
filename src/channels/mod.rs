//! Channel implementations

pub mod console;
pub mod debug;
pub mod file;
pub mod last_event;
pub mod net_event;
pub mod sms;

pub use console::ConsoleChannel;
pub use debug::DebugChannel;
pub use file::FileChannel;
pub use last_event::{LastEvent, LastEventChannel, LastEventSlot};
pub use net_event::{NetEvent, NetEventChannel, NetEventHub};
pub use sms::{SmsChannel, SmsMessage, SmsSender};

pub use crate::core::Channel;
