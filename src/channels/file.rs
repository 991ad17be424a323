//! Rolling file channel
//!
//! The active file name carries the current period, so `log.txt` rolled
//! daily is written as `log20261016.txt`. When the period changes the
//! previous file is optionally gzip-compressed and files beyond the retained
//! count are deleted, oldest first.

use crate::core::error::{LoggerError, Result};
use crate::core::{Channel, FileSettings, LogEvent, RollingInterval};
use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const DEFAULT_FOLDER: &str = ".";

pub struct FileChannel {
    folder: PathBuf,
    stem: String,
    extension: String,
    interval: RollingInterval,
    retained_file_count_limit: Option<usize>,
    compress_rolled: bool,
    period: Option<String>,
    current_path: Option<PathBuf>,
    writer: Option<BufWriter<File>>,
}

impl FileChannel {
    /// Create a channel writing under `settings.folder`
    ///
    /// # Errors
    ///
    /// Returns error if the folder cannot be created
    pub fn from_settings(settings: &FileSettings) -> Result<Self> {
        let folder = PathBuf::from(settings.folder.as_deref().unwrap_or(DEFAULT_FOLDER));
        fs::create_dir_all(&folder).map_err(|e| {
            LoggerError::io_operation(
                "create log directory",
                format!("Failed to create directory '{}'", folder.display()),
                e,
            )
        })?;

        let file_name = Path::new(settings.file_name.trim());
        let stem = file_name
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("log")
            .to_string();
        let extension = file_name
            .extension()
            .and_then(|s| s.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();

        Ok(Self {
            folder,
            stem,
            extension,
            interval: settings.rolling_interval,
            retained_file_count_limit: settings.retained_file_count_limit,
            compress_rolled: settings.compress_rolled,
            period: None,
            current_path: None,
            writer: None,
        })
    }

    /// Path of the file currently written, if any event arrived yet
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// File name used for the period containing `timestamp`
    pub fn file_name_for(&self, timestamp: &DateTime<Local>) -> String {
        format!("{}{}{}", self.stem, period_key(self.interval, timestamp), self.extension)
    }

    fn roll_to(&mut self, period: String, timestamp: &DateTime<Local>) -> Result<()> {
        let previous = self.current_path.take();
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    previous
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default(),
                    format!("Failed to flush before rolling: {}", e),
                )
            })?;
        }

        if self.compress_rolled {
            if let Some(previous) = previous.as_deref().filter(|p| p.exists()) {
                compress_file(previous)?;
            }
        }

        let path = self.folder.join(self.file_name_for(timestamp));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::file_rotation(
                    path.display().to_string(),
                    format!("Failed to open log file: {}", e),
                )
            })?;

        self.writer = Some(BufWriter::new(file));
        self.current_path = Some(path);
        self.period = Some(period);
        self.apply_retention();
        Ok(())
    }

    /// Delete rolled files beyond the retained count, the active file included
    fn apply_retention(&self) {
        let Some(limit) = self.retained_file_count_limit else {
            return;
        };
        if self.interval == RollingInterval::Infinite {
            return;
        }

        let entries = match fs::read_dir(&self.folder) {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!(
                    "[LOGGER WARNING] Cannot list '{}' for retention: {}",
                    self.folder.display(),
                    e
                );
                return;
            }
        };

        let key_len = period_key_len(self.interval);
        let mut rolled: Vec<(String, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                let key = self.rolled_key(&name, key_len)?;
                Some((key, entry.path()))
            })
            .collect();

        // Newest period first; the active file always sorts first
        rolled.sort_by(|a, b| b.0.cmp(&a.0));

        for (_, path) in rolled.into_iter().skip(limit.max(1)) {
            if Some(path.as_path()) == self.current_path.as_deref() {
                continue;
            }
            if let Err(e) = fs::remove_file(&path) {
                eprintln!(
                    "[LOGGER WARNING] Failed to remove old log file {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }

    /// Period key of a file produced by this channel, if `name` is one
    fn rolled_key(&self, name: &str, key_len: usize) -> Option<String> {
        let rest = name.strip_prefix(&self.stem)?;
        let rest = rest.strip_suffix(".gz").unwrap_or(rest);
        let key = rest.strip_suffix(&self.extension)?;
        (key.len() == key_len && key.bytes().all(|b| b.is_ascii_digit())).then(|| key.to_string())
    }
}

impl Channel for FileChannel {
    fn write(&mut self, event: &LogEvent, rendered: &str) -> Result<()> {
        let period = period_key(self.interval, &event.timestamp);
        if self.writer.is_none() || self.period.as_deref() != Some(period.as_str()) {
            self.roll_to(period, &event.timestamp)?;
        }

        if let Some(writer) = self.writer.as_mut() {
            writer.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                writer.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileChannel {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush log file: {}", e);
        }
    }
}

fn period_format(interval: RollingInterval) -> &'static str {
    match interval {
        RollingInterval::Infinite => "",
        RollingInterval::Year => "%Y",
        RollingInterval::Month => "%Y%m",
        RollingInterval::Day => "%Y%m%d",
        RollingInterval::Hour => "%Y%m%d%H",
        RollingInterval::Minute => "%Y%m%d%H%M",
    }
}

fn period_key(interval: RollingInterval, timestamp: &DateTime<Local>) -> String {
    timestamp.format(period_format(interval)).to_string()
}

fn period_key_len(interval: RollingInterval) -> usize {
    match interval {
        RollingInterval::Infinite => 0,
        RollingInterval::Year => 4,
        RollingInterval::Month => 6,
        RollingInterval::Day => 8,
        RollingInterval::Hour => 10,
        RollingInterval::Minute => 12,
    }
}

/// Gzip `path` into `path.gz`, removing the original only once that succeeded
fn compress_file(path: &Path) -> Result<()> {
    use std::io::{BufReader, Read};

    let gz_path = append_extension(path, "gz");
    let temp_gz_path = append_extension(path, "gz.tmp");

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = File::create(&temp_gz_path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to create temporary compressed file: {}", temp_gz_path.display()),
            e,
        )
    })?;
    let mut encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(64 * 1024, output),
        flate2::Compression::default(),
    );

    let mut buffer = vec![0u8; 64 * 1024];
    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|e| {
            let _ = fs::remove_file(&temp_gz_path);
            LoggerError::io_operation(
                "compress log file",
                format!("Failed to read from file: {}", path.display()),
                e,
            )
        })?;
        if bytes_read == 0 {
            break;
        }
        encoder.write_all(&buffer[..bytes_read]).map_err(|e| {
            let _ = fs::remove_file(&temp_gz_path);
            LoggerError::io_operation("compress log file", "Failed to compress data chunk", e)
        })?;
    }

    encoder
        .finish()
        .and_then(|mut writer| writer.flush())
        .map_err(|e| {
            let _ = fs::remove_file(&temp_gz_path);
            LoggerError::io_operation("compress log file", "Failed to finish compression", e)
        })?;

    fs::rename(&temp_gz_path, &gz_path).map_err(|e| {
        let _ = fs::remove_file(&temp_gz_path);
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to rename compressed file to: {}", gz_path.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[LOGGER WARNING] Compressed {} but failed to remove the original: {}",
            path.display(),
            e
        );
    }
    Ok(())
}

fn append_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}
