//! Structured JSONL logging for binding and harness events.
//!
//! Provides:
//! - [`LogEntry`]: canonical JSONL record with required + optional fields.
//! - [`LogEmitter`]: writes JSONL lines to a file, any writer, or memory.
//! - [`validate_log_line`]: schema check for one line, used by tests and tooling.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Log entry
// ---------------------------------------------------------------------------

/// Entry severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Result of the logged step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

/// One JSONL record. `timestamp`, `trace_id`, `level` and `event` are
/// always present; the rest are omitted when unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    // Required
    pub timestamp: String,
    pub trace_id: String,
    pub level: LogLevel,
    pub event: String,

    // Optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Library path for load events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,
    /// Exported symbol for resolve and call events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    /// Short error kind when `outcome` is `fail`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ns: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl LogEntry {
    #[must_use]
    pub fn new(trace_id: impl Into<String>, level: LogLevel, event: impl Into<String>) -> Self {
        Self {
            timestamp: now_utc(),
            trace_id: trace_id.into(),
            level,
            event: event.into(),
            component: None,
            library: None,
            symbol: None,
            outcome: None,
            error_kind: None,
            latency_ns: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_library(mut self, library: impl Into<String>) -> Self {
        self.library = Some(library.into());
        self
    }

    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    #[must_use]
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Mark as failed with `kind`, raising the level to `error`.
    #[must_use]
    pub fn with_failure(mut self, kind: impl Into<String>) -> Self {
        self.level = LogLevel::Error;
        self.outcome = Some(Outcome::Fail);
        self.error_kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn with_latency_ns(mut self, ns: u64) -> Self {
        self.latency_ns = Some(ns);
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// One line, without the trailing newline.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// Log emitter
// ---------------------------------------------------------------------------

/// Writes structured JSONL log entries.
pub struct LogEmitter {
    writer: Box<dyn Write + Send>,
    seq: u64,
    component: String,
    run_id: String,
}

impl LogEmitter {
    /// Create an emitter that appends to a file.
    pub fn to_file(path: &Path, component: &str, run_id: &str) -> std::io::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self::to_writer(
            Box::new(std::io::BufWriter::new(file)),
            component,
            run_id,
        ))
    }

    #[must_use]
    pub fn to_writer(writer: Box<dyn Write + Send>, component: &str, run_id: &str) -> Self {
        Self {
            writer,
            seq: 0,
            component: component.to_string(),
            run_id: run_id.to_string(),
        }
    }

    /// Create an emitter backed by memory, plus a reader for its lines.
    #[must_use]
    pub fn to_memory(component: &str, run_id: &str) -> (Self, MemoryLog) {
        let log = MemoryLog::default();
        let emitter = Self::to_writer(Box::new(log.clone()), component, run_id);
        (emitter, log)
    }

    fn next_trace_id(&mut self) -> String {
        self.seq += 1;
        format!("{}::{}::{:03}", self.component, self.run_id, self.seq)
    }

    /// Start an entry with this emitter's next trace id and component.
    pub fn entry(&mut self, level: LogLevel, event: &str) -> LogEntry {
        let trace_id = self.next_trace_id();
        let mut entry = LogEntry::new(trace_id, level, event);
        entry.component = Some(self.component.clone());
        entry
    }

    /// Emit a log entry with auto-generated trace_id and component.
    pub fn emit(&mut self, level: LogLevel, event: &str) -> std::io::Result<LogEntry> {
        let entry = self.entry(level, event);
        self.write_line(&entry)?;
        Ok(entry)
    }

    /// Write `entry`, filling in the trace id and component when unset.
    pub fn emit_entry(&mut self, mut entry: LogEntry) -> std::io::Result<()> {
        if entry.trace_id.is_empty() {
            entry.trace_id = self.next_trace_id();
        }
        if entry.component.is_none() {
            entry.component = Some(self.component.clone());
        }
        self.write_line(&entry)
    }

    fn write_line(&mut self, entry: &LogEntry) -> std::io::Result<()> {
        let line = serde_json::to_string(entry).map_err(std::io::Error::other)?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()
    }
}

/// Shared in-memory JSONL sink.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog(Arc<Mutex<Vec<u8>>>);

impl MemoryLog {
    /// Lines written so far.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for MemoryLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// One schema violation.
#[derive(Debug)]
pub struct LogValidationError {
    pub line_number: usize,
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for LogValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: field '{}': {}",
            self.line_number, self.field, self.message
        )
    }
}

/// Check one JSONL line and parse it into a [`LogEntry`].
pub fn validate_log_line(
    line: &str,
    line_number: usize,
) -> Result<LogEntry, Vec<LogValidationError>> {
    let error = |field: &str, message: String| LogValidationError {
        line_number,
        field: field.to_string(),
        message,
    };

    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return Err(vec![error("<json>", format!("invalid JSON: {e}"))]),
    };
    let Some(obj) = value.as_object() else {
        return Err(vec![error("<root>", "expected JSON object".to_string())]);
    };

    let mut errors = Vec::new();
    for field in ["timestamp", "trace_id", "level", "event"] {
        if !obj.contains_key(field) {
            errors.push(error(field, "required field missing".to_string()));
        }
    }

    if let Some(level) = obj.get("level").and_then(|v| v.as_str())
        && !["trace", "debug", "info", "warn", "error"].contains(&level)
    {
        errors.push(error("level", format!("invalid level: '{level}'")));
    }

    if let Some(outcome) = obj.get("outcome").and_then(|v| v.as_str())
        && !["pass", "fail"].contains(&outcome)
    {
        errors.push(error("outcome", format!("invalid outcome: '{outcome}'")));
    }

    // Failures must say what failed.
    if obj.get("outcome").and_then(|v| v.as_str()) == Some("fail")
        && !obj.get("error_kind").is_some_and(|v| v.is_string())
    {
        errors.push(error(
            "error_kind",
            "failed events must include error_kind".to_string(),
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    serde_json::from_value(value).map_err(|e| vec![error("<schema>", e.to_string())])
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// RFC 3339 UTC timestamp with millisecond precision.
fn now_utc() -> String {
    let duration = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = duration.as_secs();
    let (year, month, day) = civil_from_days((secs / 86_400) as i64);
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}.{:03}Z",
        (secs % 86_400) / 3600,
        (secs % 3600) / 60,
        secs % 60,
        duration.subsec_millis(),
    )
}

/// Days since 1970-01-01 to (year, month, day), proleptic Gregorian.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_entry_serializes_required_fields() {
        let entry = LogEntry::new("binding::run-1::001", LogLevel::Info, "library_load");
        let json = entry.to_jsonl().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["timestamp"].is_string());
        assert_eq!(parsed["trace_id"], "binding::run-1::001");
        assert_eq!(parsed["level"], "info");
        assert_eq!(parsed["event"], "library_load");
        assert!(parsed.get("symbol").is_none());
        assert!(parsed.get("outcome").is_none());
        assert!(parsed.get("details").is_none());
    }

    #[test]
    fn emitter_sequences_trace_ids() {
        let (mut emitter, log) = LogEmitter::to_memory("binding", "run-7");
        emitter.emit(LogLevel::Info, "first").unwrap();
        let entry = emitter
            .entry(LogLevel::Debug, "second")
            .with_symbol("smath_new")
            .with_outcome(Outcome::Pass);
        emitter.emit_entry(entry).unwrap();

        let lines = log.lines();
        assert_eq!(lines.len(), 2);
        let first = validate_log_line(&lines[0], 1).unwrap();
        let second = validate_log_line(&lines[1], 2).unwrap();
        assert_eq!(first.trace_id, "binding::run-7::001");
        assert_eq!(second.trace_id, "binding::run-7::002");
        assert_eq!(second.component.as_deref(), Some("binding"));
        assert_eq!(second.symbol.as_deref(), Some("smath_new"));
    }

    #[test]
    fn failure_marks_error_level() {
        let entry = LogEntry::new("t", LogLevel::Info, "symbol_resolve").with_failure("symbol_not_found");
        assert_eq!(entry.level, LogLevel::Error);
        assert_eq!(entry.outcome, Some(Outcome::Fail));
        let line = entry.to_jsonl().unwrap();
        assert!(validate_log_line(&line, 1).is_ok());
    }

    #[test]
    fn validation_catches_violations() {
        let errs = validate_log_line(r#"{"level":"loud","outcome":"fail"}"#, 3).unwrap_err();
        let fields: Vec<&str> = errs.iter().map(|e| e.field.as_str()).collect();
        for expected in ["timestamp", "trace_id", "event", "level", "error_kind"] {
            assert!(fields.contains(&expected), "missing {expected} in {fields:?}");
        }
        assert_eq!(errs[0].line_number, 3);

        let errs = validate_log_line("not json", 1).unwrap_err();
        assert_eq!(errs[0].field, "<json>");
        let errs = validate_log_line("[1]", 1).unwrap_err();
        assert_eq!(errs[0].field, "<root>");
    }

    #[test]
    fn civil_dates() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(civil_from_days(11_016), (2000, 2, 29));
        assert_eq!(civil_from_days(11_017), (2000, 3, 1));
        assert_eq!(civil_from_days(19_723), (2024, 1, 1));
        assert_eq!(civil_from_days(19_782), (2024, 2, 29));
    }

    #[test]
    fn timestamp_shape() {
        let ts = now_utc();
        assert_eq!(ts.len(), "2024-01-01T00:00:00.000Z".len());
        assert!(ts.ends_with('Z'));
        assert_eq!(&ts[10..11], "T");
    }
}
