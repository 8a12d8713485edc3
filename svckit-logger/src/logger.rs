//! The dual-stream logger.
//!
//! Main-stream lines carry `level`/`xtime`/`xdata` plus caller
//! fields; TDR lines carry `xtime`/`xdata` plus the fixed record
//! schema and no level key. Write failures never reach the caller —
//! they are reported on the internal diagnostics channel.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::io::{self, Write};
use std::process;

use svckit_core::{LogConfig, SvcError};

use crate::rotate::RotateWriter;
use crate::tdr::TdrRecord;
use crate::value::Field;

/// TDR timestamps use a space-separated millisecond format rather
/// than ISO-8601, matching the downstream record parsers.
const TDR_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Emission level. The logger's threshold is fixed at `Info`, so
/// `Debug` lines are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
            Level::Panic => "panic",
        }
    }
}

enum Sink {
    Stdout,
    File(RotateWriter),
}

impl Sink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        match self {
            Sink::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(line.as_bytes())?;
                out.write_all(b"\n")?;
                out.flush()
            }
            Sink::File(w) => w.write_line(line),
        }
    }

    fn flush(&self) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().lock().flush(),
            Sink::File(w) => w.flush(),
        }
    }
}

/// A structured logger with two independent output streams: the main
/// application log and the TDR stream.
///
/// Construction is fail-fast: if a file destination cannot be
/// created, `new` returns an error and no degraded logger exists.
/// Services treat that error as fatal at startup — a silently
/// non-functioning logger is worse than not starting.
pub struct Logger {
    main: Sink,
    tdr: Sink,
}

impl Logger {
    pub fn new(config: &LogConfig) -> Result<Self, SvcError> {
        let (main, tdr) = if config.stdout {
            (Sink::Stdout, Sink::Stdout)
        } else {
            (
                Sink::File(RotateWriter::new(
                    config.file_location.as_str(),
                    config.max_age_days,
                )?),
                Sink::File(RotateWriter::new(
                    config.file_tdr_location.as_str(),
                    config.max_age_days,
                )?),
            )
        };
        Ok(Self { main, tdr })
    }

    // ── Leveled emission ──────────────────────────────────────────

    /// Below the fixed `Info` threshold; dropped.
    pub fn debug(&self, message: &str, fields: Vec<Field>) {
        self.emit(Level::Debug, message, fields);
    }

    pub fn info(&self, message: &str, fields: Vec<Field>) {
        self.emit(Level::Info, message, fields);
    }

    pub fn warn(&self, message: &str, fields: Vec<Field>) {
        self.emit(Level::Warn, message, fields);
    }

    pub fn error(&self, message: &str, fields: Vec<Field>) {
        self.emit(Level::Error, message, fields);
    }

    /// Emit, flush both streams, and terminate the process.
    pub fn fatal(&self, message: &str, fields: Vec<Field>) -> ! {
        self.emit(Level::Fatal, message, fields);
        let _ = self.main.flush();
        let _ = self.tdr.flush();
        process::exit(1);
    }

    /// Emit, flush both streams, and raise a propagating panic.
    pub fn panic(&self, message: &str, fields: Vec<Field>) -> ! {
        self.emit(Level::Panic, message, fields);
        let _ = self.main.flush();
        let _ = self.tdr.flush();
        panic!("{message}");
    }

    fn emit(&self, level: Level, message: &str, fields: Vec<Field>) {
        if level < Level::Info {
            return;
        }
        let mut record = Map::new();
        record.insert("level".into(), Value::String(level.as_str().into()));
        record.insert(
            "xtime".into(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        record.insert("xdata".into(), Value::String(message.into()));
        for field in fields {
            record.insert(field.key, field.value.into_json());
        }
        write_record(&self.main, record);
    }

    // ── TDR emission ──────────────────────────────────────────────

    /// Write one transaction detail record to the TDR stream.
    pub fn tdr(&self, record: TdrRecord) {
        let mut line = Map::new();
        line.insert(
            "xtime".into(),
            Value::String(Utc::now().format(TDR_TIME_FORMAT).to_string()),
        );
        line.insert("xdata".into(), Value::String("|".into()));
        for (key, value) in record.into_fields() {
            line.insert(key, value);
        }
        write_record(&self.tdr, line);
    }
}

fn write_record(sink: &Sink, record: Map<String, Value>) {
    let line = match serde_json::to_string(&Value::Object(record)) {
        Ok(line) => line,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode log record");
            return;
        }
    };
    if let Err(e) = sink.write_line(&line) {
        tracing::error!(error = %e, "Failed to write log line");
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
