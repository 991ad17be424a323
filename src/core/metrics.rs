//! Logger counters
//!
//! Tracks how many events reached every channel, how many failed on at
//! least one channel, how many were filtered by level, and how many were
//! forwarded to SMS channels.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a live logger
///
/// # Example
///
/// ```
/// use rust_channel_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_logged();
/// metrics.record_failed();
///
/// assert_eq!(metrics.total_logged(), 1);
/// assert_eq!(metrics.failed_count(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Events written to every selected channel
    total_logged: AtomicU64,

    /// Events that failed on at least one channel
    failed_count: AtomicU64,

    /// Events below the logger's minimum level
    filtered_count: AtomicU64,

    /// Events delivered to SMS channels
    sms_forwarded: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            failed_count: AtomicU64::new(0),
            filtered_count: AtomicU64::new(0),
            sms_forwarded: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed_count(&self) -> u64 {
        self.failed_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sms_forwarded(&self) -> u64 {
        self.sms_forwarded.load(Ordering::Relaxed)
    }

    /// Record a fully written event; returns the previous count
    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sms_forwarded(&self) -> u64 {
        self.sms_forwarded.fetch_add(1, Ordering::Relaxed)
    }

    /// Failure rate as a percentage (0.0 - 100.0) of events that reached channels
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed_count() as f64;
        let total = self.total_logged() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.total_logged.store(0, Ordering::Relaxed);
        self.failed_count.store(0, Ordering::Relaxed);
        self.filtered_count.store(0, Ordering::Relaxed);
        self.sms_forwarded.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            total_logged: AtomicU64::new(self.total_logged()),
            failed_count: AtomicU64::new(self.failed_count()),
            filtered_count: AtomicU64::new(self.filtered_count()),
            sms_forwarded: AtomicU64::new(self.sms_forwarded()),
        }
    }
}
