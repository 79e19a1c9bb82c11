//! Error types shared by the session controller, report engine and sinks.

use crate::report::Report;
use std::io;
use thiserror::Error;

/// Failures surfaced by session ingestion and report generation.
///
/// Every variant is recoverable: the controller is left in a consistent
/// state and the caller decides what to do next.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Ingestion or end-of-session was requested with no live session.
    #[error("no active frame-time session")]
    NoActiveSession,

    /// `start_session` was called while a session is already logging.
    #[error("a frame-time session is already logging")]
    AlreadyLogging,

    /// The session ended without a single frame sample.
    #[error("session recorded no frames; nothing to report")]
    EmptySession,

    /// The persistence sink rejected the report bytes.
    #[error("failed to persist report: {0}")]
    Io(#[from] io::Error),

    /// The deferred dump worker went away without signalling completion.
    #[error("report worker exited without delivering a result")]
    WorkerLost,
}

/// Failure of a deferred dump.
///
/// When the report was computed but the sink failed, `report` holds it so
/// the caller can retry against another sink.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct DumpError {
    #[source]
    pub source: SessionError,
    pub report: Option<Report>,
}

impl DumpError {
    pub(crate) fn without_report(source: SessionError) -> Self {
        DumpError { source, report: None }
    }

    pub(crate) fn with_report(source: SessionError, report: Report) -> Self {
        DumpError {
            source,
            report: Some(report),
        }
    }

    /// Takes the computed report back, if the failure happened after computation.
    pub fn into_report(self) -> Option<Report> {
        self.report
    }
}
