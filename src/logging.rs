// 📝 Logging
// tracing subscriber setup: one line per event, written to a size-rotated
// log file and mirrored to stderr.
//
// Line format: <timestamp> | <level> | <module>:<line> | <message>

use anyhow::{Context, Result};
use chrono::Local;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::{DefaultFields, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const ARCHIVE_STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S_%6f";

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Active log file (appended to)
    pub path: PathBuf,

    /// Rotate once the next line would take the file past this size
    pub max_bytes: u64,

    /// Minimum level written to either sink
    pub level: LevelFilter,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            path: PathBuf::from("project.log"),
            max_bytes: 100_000, // 100 KB
            level: LevelFilter::INFO,
        }
    }
}

// ============================================================================
// LINE FORMAT
// ============================================================================

/// Event formatter producing `timestamp | LEVEL | module:line | message`
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

pub fn level_label(level: &Level) -> &'static str {
    if *level == Level::WARN {
        "WARNING"
    } else {
        level.as_str()
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let location = meta.module_path().unwrap_or_else(|| meta.target());

        write!(
            writer,
            "{} | {} | {}:{} | ",
            Local::now().format(TIMESTAMP_FORMAT),
            level_label(meta.level()),
            location,
            meta.line().unwrap_or(0)
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// fmt layer using `LineFormat`, writing wherever `make_writer` points
pub fn line_layer<S, W>(make_writer: W) -> tracing_subscriber::fmt::Layer<S, DefaultFields, LineFormat, W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .event_format(LineFormat)
        .with_writer(make_writer)
}

// ============================================================================
// ROTATING FILE
// ============================================================================

/// Append-only file that archives itself when it grows past `max_bytes`.
///
/// Archived files keep the stem and extension with a timestamp in between:
/// `project.log` -> `project.2025-01-31_09-15-02_123456.log`.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    file: File,
    written: u64,
}

impl RotatingFile {
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64) -> io::Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        let written = file.metadata()?.len();

        Ok(RotatingFile {
            path,
            max_bytes,
            file,
            written,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes in the active file
    pub fn len(&self) -> u64 {
        self.written
    }

    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    fn archive_path(&self) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = self
            .path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let stamp = Local::now().format(ARCHIVE_STAMP_FORMAT).to_string();

        let mut candidate = self.path.with_file_name(format!("{}.{}{}", stem, stamp, ext));
        let mut n = 1;
        while candidate.exists() {
            candidate = self
                .path
                .with_file_name(format!("{}.{}.{}{}", stem, stamp, n, ext));
            n += 1;
        }
        candidate
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let archived = self.archive_path();
        fs::rename(&self.path, &archived)?;
        self.file = open_append(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // A line larger than the limit still goes into a fresh file.
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

// ============================================================================
// INIT
// ============================================================================

/// Install the global subscriber. Fails if the log file can't be opened or
/// a global subscriber is already set.
pub fn init(config: &LogConfig) -> Result<()> {
    let file = RotatingFile::open(&config.path, config.max_bytes)
        .with_context(|| format!("Failed to open log file {}", config.path.display()))?;

    tracing_subscriber::registry()
        .with(line_layer(Mutex::new(file)))
        .with(line_layer(io::stderr))
        .with(config.level)
        .try_init()
        .context("Failed to install log subscriber")?;

    info!("Logger loaded.");
    Ok(())
}
