//! Log source selection.
//!
//! The gateway writes to a live log and rotates it at midnight into a gzip
//! archive named for the day of rotation. A message seen on day `D` therefore
//! lives in the archive dated `D + 1`, or still in the live log when that day
//! has not come yet.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::config::SourcesConfig;
use crate::error::{Result, TraceError};

/// Format of dates on the command line and in archive names.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// How the bytes of a log file are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Plain text, still being appended to.
    Plain,
    /// Rotated, gzip-compressed archive.
    Gzip,
}

/// A resolved log file and how to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSource {
    path: PathBuf,
    kind: SourceKind,
}

impl LogSource {
    pub fn new(path: impl Into<PathBuf>, kind: SourceKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Pick the log holding the messages of `date` (today when `None`).
    pub fn resolve(date: Option<NaiveDate>, today: NaiveDate, sources: &SourcesConfig) -> Self {
        let date = date.unwrap_or(today);
        let rotated_on = date.checked_add_days(Days::new(1));

        let source = match rotated_on {
            Some(day) if day <= today => {
                let stamp = day.format(DATE_FORMAT).to_string();
                let path = sources
                    .archive_log
                    .replace(&sources.archive_placeholder, &stamp);
                Self::new(path, SourceKind::Gzip)
            }
            _ => Self::new(&sources.live_log, SourceKind::Plain),
        };

        debug!(
            %date,
            path = %source.path.display(),
            kind = ?source.kind,
            "Resolved log source"
        );
        source
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Name shown to the user.
    pub fn display_name(&self) -> String {
        self.path.display().to_string()
    }

    /// Open the log for sequential line reading.
    ///
    /// The returned reader owns the file handle; dropping it releases the file.
    pub fn open(&self, buffer_size: usize) -> Result<Box<dyn BufRead>> {
        let file = File::open(&self.path).map_err(|e| TraceError::io(&self.path, e))?;
        Ok(match self.kind {
            SourceKind::Plain => Box::new(BufReader::with_capacity(buffer_size, file)),
            SourceKind::Gzip => Box::new(BufReader::with_capacity(
                buffer_size,
                MultiGzDecoder::new(file),
            )),
        })
    }
}

/// Parse a `YYYYMMDD` date argument.
pub fn parse_log_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TraceError::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| TraceError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sources() -> SourcesConfig {
        SourcesConfig {
            live_log: PathBuf::from("/logs/maillog"),
            archive_log: "/logs/archive/maillog-DATE.gz".to_string(),
            archive_placeholder: "DATE".to_string(),
        }
    }

    #[test]
    fn test_today_uses_live_log() {
        let today = ymd(2024, 10, 18);
        let source = LogSource::resolve(None, today, &sources());
        assert_eq!(source.kind(), SourceKind::Plain);
        assert_eq!(source.path(), Path::new("/logs/maillog"));
    }

    #[test]
    fn test_yesterday_uses_archive_dated_today() {
        let today = ymd(2024, 10, 18);
        let source = LogSource::resolve(Some(ymd(2024, 10, 17)), today, &sources());
        assert_eq!(source.kind(), SourceKind::Gzip);
        assert_eq!(
            source.path(),
            Path::new("/logs/archive/maillog-20241018.gz")
        );
    }

    #[test]
    fn test_archive_crosses_month_boundary() {
        let today = ymd(2024, 3, 10);
        let source = LogSource::resolve(Some(ymd(2024, 2, 29)), today, &sources());
        assert_eq!(source.path(), Path::new("/logs/archive/maillog-20240301.gz"));
    }

    #[test]
    fn test_future_date_uses_live_log() {
        let today = ymd(2024, 10, 18);
        let source = LogSource::resolve(Some(ymd(2024, 12, 1)), today, &sources());
        assert_eq!(source.kind(), SourceKind::Plain);
    }

    #[test]
    fn test_custom_placeholder() {
        let mut cfg = sources();
        cfg.archive_log = "/logs/{day}/maillog.gz".to_string();
        cfg.archive_placeholder = "{day}".to_string();
        let source = LogSource::resolve(Some(ymd(2024, 1, 1)), ymd(2024, 6, 1), &cfg);
        assert_eq!(source.path(), Path::new("/logs/20240102/maillog.gz"));
    }

    #[test]
    fn test_parse_log_date() {
        assert_eq!(parse_log_date("20241017").unwrap(), ymd(2024, 10, 17));
        assert!(matches!(
            parse_log_date("2024-10-17"),
            Err(TraceError::InvalidDate(_))
        ));
        assert!(matches!(
            parse_log_date("20241332"),
            Err(TraceError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_open_missing_file_is_unavailable() {
        let source = LogSource::new("/nonexistent/qidtrace/maillog", SourceKind::Plain);
        let err = source.open(4096).err().expect("should fail");
        assert!(matches!(err, TraceError::LogSourceUnavailable { .. }));
    }
}
