// This module defines the SessionController, the single owner of the live
// frame-time session. It handles ingestion while logging and hands the frozen
// SampleStore to the report engine, either inline or on a dump worker thread.

pub mod clock;
pub mod store;

use crate::error::{DumpError, SessionError};
use crate::report::Report;
use crate::sink::ReportSink;
use chrono::{DateTime, Local};
use clock::FrameClock;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use store::SampleStore;
use tracing::{debug, info, warn};

/// Outcome of a deferred dump, delivered exactly once.
pub type DumpResult = Result<Report, DumpError>;

/// Lifecycle of the controller as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session is logging and no dump is in flight.
    Idle,
    /// A session is accepting frames and events.
    Logging,
    /// No session is logging but at least one deferred dump is still running.
    Dumping,
}

/// One logging interval from start to dump.
#[derive(Debug)]
struct Session {
    started_at: DateTime<Local>,
    store: SampleStore,
}

/// Owns at most one live session.
///
/// Ingestion goes through `&mut self`, so exactly one session is mutated at a
/// time. Ending a session moves its store out of the controller; a new
/// session can start immediately, even while a deferred dump of the previous
/// one is still running.
#[derive(Debug)]
pub struct SessionController {
    active: Option<Session>,
    frame_capacity: usize,
    // Deferred dumps started by this controller that have not finished yet.
    dumps_in_flight: Arc<AtomicUsize>,
}

impl SessionController {
    pub fn new() -> Self {
        Self::with_frame_capacity(4096)
    }

    /// Sessions started by this controller pre-allocate room for `frames` samples.
    pub fn with_frame_capacity(frames: usize) -> Self {
        SessionController {
            active: None,
            frame_capacity: frames,
            dumps_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn state(&self) -> SessionState {
        if self.active.is_some() {
            SessionState::Logging
        } else if self.dumps_in_flight.load(Ordering::SeqCst) > 0 {
            SessionState::Dumping
        } else {
            SessionState::Idle
        }
    }

    pub fn is_logging(&self) -> bool {
        self.active.is_some()
    }

    /// Wall-clock time the live session started, if any.
    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.active.as_ref().map(|s| s.started_at)
    }

    /// Number of frames recorded by the live session so far.
    pub fn frame_count(&self) -> Option<usize> {
        self.active.as_ref().map(|s| s.store.len())
    }

    pub fn start_session(&mut self) -> Result<(), SessionError> {
        if self.active.is_some() {
            warn!("start_session called while a session is already logging; ignoring");
            return Err(SessionError::AlreadyLogging);
        }
        let started_at = Local::now();
        info!(started_at = %started_at.format("%Y-%m-%d %H:%M:%S%.3f"), "Frame-time session started");
        self.active = Some(Session {
            started_at,
            store: SampleStore::with_capacity(self.frame_capacity),
        });
        Ok(())
    }

    /// Records one frame. Values are stored as given.
    #[inline]
    pub fn record_frame(&mut self, elapsed_secs: f64, duration_ms: f64) -> Result<(), SessionError> {
        let session = self.active.as_mut().ok_or(SessionError::NoActiveSession)?;
        session.store.record_frame(elapsed_secs, duration_ms);
        Ok(())
    }

    /// Records a labelled custom event.
    pub fn record_event(&mut self, timestamp_secs: f64, label: impl Into<String>) -> Result<(), SessionError> {
        let Some(session) = self.active.as_mut() else {
            debug!("Custom event dropped: no active session");
            return Err(SessionError::NoActiveSession);
        };
        let label = label.into();
        debug!(timestamp_secs, label = %label, "Custom event recorded");
        session.store.record_event(timestamp_secs, label);
        Ok(())
    }

    /// Ticks `clock` and records the resulting frame.
    pub fn tick(&mut self, clock: &mut FrameClock) -> Result<(), SessionError> {
        if self.active.is_none() {
            return Err(SessionError::NoActiveSession);
        }
        let (elapsed_secs, delta_ms) = clock.tick();
        self.record_frame(elapsed_secs, delta_ms)
    }

    // Freezes the live session: after this no further samples reach it.
    fn freeze(&mut self) -> Result<Session, SessionError> {
        let session = self.active.take().ok_or(SessionError::NoActiveSession)?;
        info!(
            frames = session.store.len(),
            events = session.store.events().len(),
            "Frame-time session frozen for dump"
        );
        Ok(session)
    }

    /// Ends the live session and computes its report on the calling thread.
    ///
    /// The session is consumed even when it turns out to be empty.
    pub fn end_session(
        &mut self,
        extra_info: Option<&str>,
        environment: Option<&str>,
    ) -> Result<Report, SessionError> {
        let session = self.freeze()?;
        Report::generate(session.store, extra_info, environment)
    }

    /// Ends the live session and dumps it on a worker thread.
    ///
    /// The report is computed and written to `sink` off the calling thread;
    /// the returned handle yields the result once both have finished.
    pub fn end_session_deferred<S>(
        &mut self,
        extra_info: Option<&str>,
        environment: Option<&str>,
        sink: S,
    ) -> Result<DumpHandle, SessionError>
    where
        S: ReportSink + 'static,
    {
        let (tx, rx) = bounded(1);
        let worker = self.end_session_with(extra_info, environment, sink, move |result| {
            // The handle may have been dropped; the result is then discarded.
            let _ = tx.send(result);
        })?;
        Ok(DumpHandle {
            receiver: rx,
            worker: Some(worker),
            delivered: false,
        })
    }

    /// Ends the live session and dumps it on a worker thread, invoking
    /// `on_complete` on that thread exactly once after the report has been
    /// computed and written.
    ///
    /// Text arguments are copied before the handoff so nothing borrowed from
    /// the caller crosses threads.
    pub fn end_session_with<S, F>(
        &mut self,
        extra_info: Option<&str>,
        environment: Option<&str>,
        sink: S,
        on_complete: F,
    ) -> Result<JoinHandle<()>, SessionError>
    where
        S: ReportSink + 'static,
        F: FnOnce(DumpResult) + Send + 'static,
    {
        let session = self.freeze()?;
        let extra_info = extra_info.map(str::to_owned);
        let environment = environment.map(str::to_owned);
        let in_flight = Arc::clone(&self.dumps_in_flight);
        in_flight.fetch_add(1, Ordering::SeqCst);

        let spawned = thread::Builder::new()
            .name("frametime-dump".to_string())
            .spawn({
                let in_flight = Arc::clone(&in_flight);
                move || {
                    let guard = InFlightGuard(in_flight);
                    let result = dump(
                        session,
                        extra_info.as_deref(),
                        environment.as_deref(),
                        sink,
                    );
                    drop(guard);
                    on_complete(result);
                }
            });

        spawned.map_err(|e| {
            in_flight.fetch_sub(1, Ordering::SeqCst);
            warn!(error = %e, "Failed to spawn dump worker");
            SessionError::Io(e)
        })
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

// Releases one in-flight dump when the worker finishes, including by panic.
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

// Worker body: compute, then persist. Runs to completion once started.
fn dump<S: ReportSink>(
    session: Session,
    extra_info: Option<&str>,
    environment: Option<&str>,
    mut sink: S,
) -> DumpResult {
    debug!(started_at = %session.started_at, "Dump worker running");
    let report =
        Report::generate(session.store, extra_info, environment).map_err(DumpError::without_report)?;

    let bytes = report.to_bytes();
    match sink.persist(&bytes) {
        Ok(()) => {
            info!(target_sink = %sink.describe(), bytes = bytes.len(), "Frame-time report written");
            Ok(report)
        }
        Err(e) => {
            warn!(target_sink = %sink.describe(), error = %e, "Failed to write frame-time report");
            Err(DumpError::with_report(SessionError::Io(e), report))
        }
    }
}

/// Single-shot handle on a deferred dump.
///
/// The result is handed out at most once; later calls report
/// [`SessionError::WorkerLost`].
#[derive(Debug)]
pub struct DumpHandle {
    receiver: Receiver<DumpResult>,
    worker: Option<JoinHandle<()>>,
    delivered: bool,
}

impl DumpHandle {
    /// Blocks until the worker has computed and written the report.
    pub fn wait(mut self) -> DumpResult {
        let result = self.receiver.recv().unwrap_or_else(|_| Err(lost()));
        self.join_worker();
        result
    }

    /// Waits at most `timeout`. Returns `None` if the dump is still running.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<DumpResult> {
        if self.delivered {
            return Some(Err(lost()));
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => Some(self.deliver(result)),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(self.deliver(Err(lost()))),
        }
    }

    /// Non-blocking poll. Returns `None` if the dump is still running.
    pub fn try_wait(&mut self) -> Option<DumpResult> {
        if self.delivered {
            return Some(Err(lost()));
        }
        match self.receiver.try_recv() {
            Ok(result) => Some(self.deliver(result)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(self.deliver(Err(lost()))),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.delivered || self.worker.as_ref().map_or(true, JoinHandle::is_finished)
    }

    fn deliver(&mut self, result: DumpResult) -> DumpResult {
        self.delivered = true;
        self.join_worker();
        result
    }

    fn join_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Dump worker panicked");
            }
        }
    }
}

fn lost() -> DumpError {
    DumpError::without_report(SessionError::WorkerLost)
}
