//! Logging macros
//!
//! The macros take any [`LiveLogger`](crate::LiveLogger), a message template
//! and positional arguments. The call site (module path, file and line) is
//! captured where the macro is written.
//!
//! # Examples
//!
//! ```
//! use rust_channel_logger::prelude::*;
//! use rust_channel_logger::information;
//!
//! let logger = CachedLogger::new();
//!
//! information!(logger, "Server started");
//! information!(logger, "Server listening on port {Port}", 8080);
//! information!(logger, "User {0} performed {1}", 42, "login");
//!
//! assert_eq!(logger.buffer().len(), 3);
//! ```

/// Log at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_channel_logger::prelude::*;
/// # let logger = Logger::new();
/// use rust_channel_logger::log;
/// log!(logger, LogLevel::Information, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {0}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)*) => {{
        use $crate::LiveLogger as _;
        ($logger).log(
            $level,
            $template,
            &[$($crate::FieldValue::from($arg)),*],
            &$crate::call_site!(),
        )
    }};
}

/// Log a verbose-level message.
#[macro_export]
macro_rules! verbose {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Verbose, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_channel_logger::prelude::*;
/// # let logger = Logger::new();
/// use rust_channel_logger::debug;
/// debug!(logger, "Counter value: {0}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an information-level message.
#[macro_export]
macro_rules! information {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Information, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_channel_logger::prelude::*;
/// # let logger = Logger::new();
/// use rust_channel_logger::error;
/// error!(logger, "Request {0} failed with {1}", "GET /", 503);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{CachedLogger, FieldValue, LogLevel};

    #[test]
    fn test_log_macro_captures_call_site() {
        let logger = CachedLogger::new();
        log!(logger, LogLevel::Information, "Formatted: {0}", 42);

        let entry = &logger.buffer().entries()[0];
        assert_eq!(entry.level, LogLevel::Information);
        assert_eq!(entry.args, vec![FieldValue::Int(42)]);
        assert!(entry.call_site.member.ends_with("macros::tests"));
        assert!(entry.call_site.file.ends_with("macros.rs"));
    }

    #[test]
    fn test_level_macros() {
        let logger = CachedLogger::new();
        verbose!(logger, "v");
        debug!(logger, "d {0}", 1);
        information!(logger, "i {0} {1}", "a", true);
        warning!(logger, "w {0} {1} {2}", 1, 2, 3);
        error!(logger, "e {0} {1} {2} {3}", 1, 2, 3, 4);
        fatal!(logger, "f");

        let levels: Vec<LogLevel> = logger.buffer().entries().iter().map(|e| e.level).collect();
        assert_eq!(levels, LogLevel::ALL.to_vec());
        assert_eq!(logger.buffer().entries()[4].args.len(), 4);
    }

    #[test]
    fn test_macros_accept_references() {
        let logger = CachedLogger::new();
        let by_ref = &logger;
        information!(by_ref, "through a reference");
        assert_eq!(logger.buffer().len(), 1);
    }
}
