//! Reader for the line-oriented capture format replayed by the binary.
//!
//! ```text
//! # comment
//! 0.016, 16.2          frame: elapsed seconds, duration milliseconds
//! event, 3.5, Boss     custom event: timestamp seconds, label
//! ```

use std::io::{self, BufRead};
use thiserror::Error;

/// One parsed capture line.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureRecord {
    Frame { elapsed_secs: f64, duration_ms: f64 },
    Event { timestamp_secs: f64, label: String },
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to read capture: {0}")]
    Io(#[from] io::Error),
    #[error("capture line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// Parses a single line. Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<CaptureRecord>, CaptureError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let malformed = |reason: String| CaptureError::Malformed {
        line: line_no,
        reason,
    };
    let number = |field: &str, what: &str| -> Result<f64, CaptureError> {
        field
            .trim()
            .parse::<f64>()
            .map_err(|e| malformed(format!("invalid {what} '{}': {e}", field.trim())))
    };

    if let Some(rest) = trimmed.strip_prefix("event,") {
        let (timestamp, label) = rest
            .split_once(',')
            .ok_or_else(|| malformed("event needs a timestamp and a label".to_string()))?;
        return Ok(Some(CaptureRecord::Event {
            timestamp_secs: number(timestamp, "timestamp")?,
            label: label.trim().to_string(),
        }));
    }

    let (elapsed, duration) = trimmed
        .split_once(',')
        .ok_or_else(|| malformed("expected '<elapsed>, <duration>'".to_string()))?;
    Ok(Some(CaptureRecord::Frame {
        elapsed_secs: number(elapsed, "elapsed time")?,
        duration_ms: number(duration, "frame duration")?,
    }))
}

/// Iterator over the records of a capture stream, skipping blank and comment lines.
pub struct CaptureReader<R> {
    reader: R,
    line_no: usize,
    buf: String,
}

impl<R: BufRead> CaptureReader<R> {
    pub fn new(reader: R) -> Self {
        CaptureReader {
            reader,
            line_no: 0,
            buf: String::with_capacity(64),
        }
    }

    /// Reads the next record. Returns `Ok(None)` at end of input.
    pub fn read_record(&mut self) -> Result<Option<CaptureRecord>, CaptureError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            if let Some(record) = parse_line(&self.buf, self.line_no)? {
                return Ok(Some(record));
            }
        }
    }
}

impl<R: BufRead> Iterator for CaptureReader<R> {
    type Item = Result<CaptureRecord, CaptureError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}
