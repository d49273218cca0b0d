//! JSON-lines run log
//!
//! Appends one JSON record per event to `{dir}/{prefix}-YYYY-MM-DD.log`,
//! rolling over to a new file when the date changes. Every record is also
//! echoed through `tracing`. The log is constructed explicitly and handed to
//! whoever needs it; `close` flushes it at shutdown.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Serialize)]
struct LogRecord<'a> {
    timestamp: String,
    level: LogLevel,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Value>,
}

struct OpenFile {
    date: NaiveDate,
    writer: BufWriter<File>,
}

pub struct RunLog {
    dir: PathBuf,
    prefix: String,
    current: Mutex<Option<OpenFile>>,
}

impl std::fmt::Debug for RunLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunLog")
            .field("dir", &self.dir)
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl RunLog {
    /// Open a run log, creating `dir` if needed
    pub fn open(dir: impl AsRef<Path>, prefix: impl Into<String>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| Error::at_path(&dir, e))?;

        Ok(Self {
            dir,
            prefix: prefix.into(),
            current: Mutex::new(None),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that records written on `date` go to
    pub fn file_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}-{}.log", self.prefix, date.format("%Y-%m-%d")))
    }

    pub fn log(&self, level: LogLevel, message: &str, data: Option<&Value>) -> Result<()> {
        self.log_at(Utc::now(), level, message, data)
    }

    pub fn info(&self, message: &str, data: Option<&Value>) -> Result<()> {
        self.log(LogLevel::Info, message, data)
    }

    pub fn warn(&self, message: &str, data: Option<&Value>) -> Result<()> {
        self.log(LogLevel::Warn, message, data)
    }

    pub fn error(&self, message: &str, data: Option<&Value>) -> Result<()> {
        self.log(LogLevel::Error, message, data)
    }

    pub fn debug(&self, message: &str, data: Option<&Value>) -> Result<()> {
        self.log(LogLevel::Debug, message, data)
    }

    fn log_at(
        &self,
        now: DateTime<Utc>,
        level: LogLevel,
        message: &str,
        data: Option<&Value>,
    ) -> Result<()> {
        let record = LogRecord {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            level,
            message,
            data,
        };
        let line = serde_json::to_string(&record)?;

        match level {
            LogLevel::Debug => tracing::debug!(target: "run_log", "{}", line),
            LogLevel::Info => tracing::info!(target: "run_log", "{}", line),
            LogLevel::Warn => tracing::warn!(target: "run_log", "{}", line),
            LogLevel::Error => tracing::error!(target: "run_log", "{}", line),
        }

        let date = now.date_naive();
        let mut current = self.current.lock();

        if current.as_ref().map(|f| f.date) != Some(date) {
            if let Some(mut previous) = current.take() {
                previous.writer.flush()?;
            }
            let path = self.file_for(date);
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| Error::at_path(&path, e))?;
            *current = Some(OpenFile {
                date,
                writer: BufWriter::new(file),
            });
        }

        if let Some(open) = current.as_mut() {
            writeln!(open.writer, "{}", line)?;
        }
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        if let Some(open) = self.current.lock().as_mut() {
            open.writer.flush()?;
        }
        Ok(())
    }

    /// Flush and release the underlying file
    pub fn close(self) -> Result<()> {
        if let Some(mut open) = self.current.lock().take() {
            open.writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for RunLog {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
