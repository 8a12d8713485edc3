//! Rotating log file writer.
//!
//! Data is written to `<prefix>.<YYYYMMDDHH>`; a symlink at
//! `<prefix>` always points at the active file, so tail-followers
//! have one stable path. The writer rotates when the hour suffix
//! changes between writes and deletes rotated files older than the
//! retention window. Every line is flushed on write, so rotation
//! never drops or duplicates lines.
//!
//! Thread-safe: state lives behind a `Mutex` so multiple workers can
//! write concurrently.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// An hourly-rotating, age-pruning log file writer.
pub struct RotateWriter {
    prefix: PathBuf,
    max_age_days: u64,
    inner: Mutex<WriterState>,
}

struct WriterState {
    writer: BufWriter<File>,
    suffix: String,
}

impl RotateWriter {
    /// Open (or create) the active log file for the current hour and
    /// point the symlink alias at it. Retention of `0` days disables
    /// pruning.
    pub fn new(prefix: impl Into<PathBuf>, max_age_days: u64) -> io::Result<Self> {
        let prefix = prefix.into();
        if let Some(parent) = prefix.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let now = Utc::now();
        let suffix = hour_suffix(now);
        let writer = open_active(&prefix, &suffix)?;

        if let Err(e) = prune_aged(&prefix, max_age_days, now) {
            warn!(error = %e, "Failed to prune aged log files");
        }

        info!(path = %prefix.display(), "Log file writer opened");

        Ok(Self {
            prefix,
            max_age_days,
            inner: Mutex::new(WriterState { writer, suffix }),
        })
    }

    /// Append one line, rotating first if the hour has changed.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))?;

        let now = Utc::now();
        let suffix = hour_suffix(now);
        if suffix != state.suffix {
            state.writer.flush()?;
            state.writer = open_active(&self.prefix, &suffix)?;
            state.suffix = suffix;
            debug!(path = %self.prefix.display(), "Rotated log file");

            if let Err(e) = prune_aged(&self.prefix, self.max_age_days, now) {
                warn!(error = %e, "Failed to prune aged log files");
            }
        }

        state.writer.write_all(line.as_bytes())?;
        state.writer.write_all(b"\n")?;
        state.writer.flush()
    }

    /// Flush buffered data to disk.
    pub fn flush(&self) -> io::Result<()> {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))?;
        state.writer.flush()
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Hour-granularity file suffix: `2025011509`.
fn hour_suffix(t: DateTime<Utc>) -> String {
    t.format("%Y%m%d%H").to_string()
}

/// Active file path: `app.log` → `app.log.2025011509`.
fn active_file_path(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = prefix.as_os_str().to_owned();
    path.push(".");
    path.push(suffix);
    PathBuf::from(path)
}

fn open_active(prefix: &Path, suffix: &str) -> io::Result<BufWriter<File>> {
    let path = active_file_path(prefix, suffix);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    relink(prefix, &path);
    Ok(BufWriter::new(file))
}

/// Repoint the alias symlink at the active file. Non-unix platforms
/// get no alias; the suffixed files are still written.
#[cfg(unix)]
fn relink(link: &Path, active: &Path) {
    let target: PathBuf = active
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| active.to_path_buf());
    let _ = fs::remove_file(link);
    if let Err(e) = std::os::unix::fs::symlink(&target, link) {
        warn!(error = %e, link = %link.display(), "Failed to update log symlink");
    }
}

#[cfg(not(unix))]
fn relink(_link: &Path, _active: &Path) {}

/// Parse an hour suffix back into a UTC timestamp. Returns `None`
/// for anything that is not a `%Y%m%d%H` stamp.
fn parse_suffix(s: &str) -> Option<DateTime<Utc>> {
    if s.len() != 10 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let date = NaiveDate::parse_from_str(&s[..8], "%Y%m%d").ok()?;
    let hour: u32 = s[8..].parse().ok()?;
    let dt = date.and_hms_opt(hour, 0, 0)?;
    Some(Utc.from_utc_datetime(&dt))
}

/// Delete rotated files whose suffix stamp is older than the
/// retention window. `now` is injected so retention is testable with
/// a simulated clock. Files without a parseable suffix are left
/// alone, as is the alias symlink.
fn prune_aged(prefix: &Path, max_age_days: u64, now: DateTime<Utc>) -> io::Result<()> {
    if max_age_days == 0 {
        return Ok(());
    }
    let cutoff = now - Duration::days(max_age_days as i64);

    let parent = prefix
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let base_name = prefix
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();

    for entry in fs::read_dir(parent)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let suffix = match name
            .strip_prefix(base_name.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
        {
            Some(s) => s,
            None => continue,
        };
        let stamp = match parse_suffix(suffix) {
            Some(t) => t,
            None => continue,
        };
        if stamp < cutoff {
            debug!(path = %entry.path().display(), "Pruning aged log file");
            fs::remove_file(entry.path())?;
        }
    }

    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────────
