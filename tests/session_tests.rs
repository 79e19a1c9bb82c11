//! Tests for the session lifecycle and deferred dumping.

use frametime_log::report;
use frametime_log::sink::ReportSink;
use frametime_log::{
    FileSink, FrameClock, SessionController, SessionError, SessionState, WriterSink,
};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use test_helpers::*;

// --- Test Helpers ---

/// Sink that records what it was given into shared memory.
#[derive(Clone, Default)]
struct SharedSink {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl ReportSink for SharedSink {
    fn persist(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.bytes.lock().unwrap().extend_from_slice(bytes);
        Ok(())
    }

    fn describe(&self) -> String {
        "shared".into()
    }
}

/// Sink that always fails.
struct BrokenSink;

impl ReportSink for BrokenSink {
    fn persist(&mut self, _bytes: &[u8]) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }

    fn describe(&self) -> String {
        "broken".into()
    }
}

/// Sink that panics mid-write.
struct PanickingSink;

impl ReportSink for PanickingSink {
    fn persist(&mut self, _bytes: &[u8]) -> io::Result<()> {
        panic!("sink exploded");
    }

    fn describe(&self) -> String {
        "panicking".into()
    }
}

fn feed(controller: &mut SessionController, durations: &[f64]) {
    for (elapsed, duration) in accumulate(durations) {
        controller.record_frame(elapsed, duration).unwrap();
    }
}

// --- Lifecycle ---

#[test]
fn ingestion_without_session_is_rejected() {
    let mut controller = SessionController::new();
    assert_eq!(controller.state(), SessionState::Idle);
    assert!(matches!(
        controller.record_frame(0.1, 16.0),
        Err(SessionError::NoActiveSession)
    ));
    assert!(matches!(
        controller.record_event(0.1, "nope"),
        Err(SessionError::NoActiveSession)
    ));
    assert!(matches!(
        controller.end_session(None, None),
        Err(SessionError::NoActiveSession)
    ));
}

#[test]
fn second_start_is_rejected_and_keeps_samples() {
    let mut controller = SessionController::new();
    controller.start_session().unwrap();
    feed(&mut controller, &steady(5, 10.0));
    assert!(matches!(
        controller.start_session(),
        Err(SessionError::AlreadyLogging)
    ));
    assert_eq!(controller.frame_count(), Some(5));
}

#[test]
fn synchronous_end_returns_report_and_goes_idle() {
    let mut controller = SessionController::new();
    controller.start_session().unwrap();
    assert_eq!(controller.state(), SessionState::Logging);
    assert!(controller.started_at().is_some());
    feed(&mut controller, &steady(60, FRAME_60HZ_MS));
    controller.record_event(0.5, "halfway").unwrap();

    let report = controller.end_session(Some("sync"), Some("env")).unwrap();
    assert_eq!(report.summary.total_frames, 60);
    assert_eq!(report.events.len(), 1);
    assert_eq!(controller.state(), SessionState::Idle);

    // Frozen: nothing recorded after the end reaches any session.
    assert!(controller.record_frame(2.0, 16.0).is_err());
}

#[test]
fn empty_session_ends_with_error_and_is_discarded() {
    let mut controller = SessionController::new();
    controller.start_session().unwrap();
    controller.record_event(0.1, "no frames follow").unwrap();
    assert!(matches!(
        controller.end_session(None, None),
        Err(SessionError::EmptySession)
    ));
    assert_eq!(controller.state(), SessionState::Idle);
    controller.start_session().unwrap();
}

#[test]
fn tick_records_clock_frames() {
    let mut controller = SessionController::new();
    let mut clock = FrameClock::start();
    assert!(controller.tick(&mut clock).is_err());

    controller.start_session().unwrap();
    for _ in 0..3 {
        controller.tick(&mut clock).unwrap();
    }
    let report = controller.end_session(None, None).unwrap();
    assert_eq!(report.summary.total_frames, 3);
    let elapsed: Vec<f64> = report.samples.iter().map(|s| s.elapsed_secs).collect();
    assert!(elapsed.windows(2).all(|w| w[0] <= w[1]));
}

// --- Deferred dumps ---

#[test]
fn deferred_dump_writes_sink_then_delivers_report() {
    let sink = SharedSink::default();
    let mut controller = SessionController::new();
    controller.start_session().unwrap();
    feed(&mut controller, &ramp(50, 8.0, 0.25));

    let handle = controller
        .end_session_deferred(Some("deferred"), None, sink.clone())
        .unwrap();
    let report = handle.wait().expect("dump succeeds");

    let written = String::from_utf8(sink.bytes.lock().unwrap().clone()).unwrap();
    assert_eq!(written, report.render());
    assert_eq!(report::parse_total_frames(&written), Some(50));
    assert_eq!(controller.state(), SessionState::Idle);
}

#[test]
fn continuation_runs_exactly_once_after_write() {
    let sink = SharedSink::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = crossbeam_channel::bounded(1);

    let mut controller = SessionController::new();
    controller.start_session().unwrap();
    feed(&mut controller, &steady(10, 20.0));

    let worker = {
        let calls = Arc::clone(&calls);
        let bytes = Arc::clone(&sink.bytes);
        controller
            .end_session_with(None, None, sink.clone(), move |result| {
                calls.fetch_add(1, Ordering::SeqCst);
                // The write has already happened when the continuation runs.
                let written = bytes.lock().unwrap().len();
                tx.send((result.is_ok(), written)).unwrap();
            })
            .unwrap()
    };

    let (ok, written) = rx.recv_timeout(Duration::from_secs(10)).unwrap();
    worker.join().unwrap();
    assert!(ok);
    assert!(written > 0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn restart_during_deferred_dump_does_not_leak_into_report() {
    let sink = SharedSink::default();
    let mut controller = SessionController::new();
    controller.start_session().unwrap();
    feed(&mut controller, &steady(100, 10.0));

    let handle = controller.end_session_deferred(None, None, sink).unwrap();

    // New session starts immediately and records different frames.
    controller.start_session().unwrap();
    assert_eq!(controller.state(), SessionState::Logging);
    for i in 0..500 {
        controller.record_frame(10.0 + i as f64, 99.0).unwrap();
    }

    let first = handle.wait().unwrap();
    assert_eq!(first.summary.total_frames, 100);
    assert!(first.samples.iter().all(|s| s.duration_ms == 10.0));

    let second = controller.end_session(None, None).unwrap();
    assert_eq!(second.summary.total_frames, 500);
}

#[test]
fn deferred_empty_session_reports_error_without_writing() {
    let sink = SharedSink::default();
    let mut controller = SessionController::new();
    controller.start_session().unwrap();

    let err = controller
        .end_session_deferred(None, None, sink.clone())
        .unwrap()
        .wait()
        .unwrap_err();
    assert!(matches!(err.source, SessionError::EmptySession));
    assert!(err.report.is_none());
    assert!(sink.bytes.lock().unwrap().is_empty());
}

#[test]
fn failed_write_hands_back_a_retryable_report() {
    let mut controller = SessionController::new();
    controller.start_session().unwrap();
    feed(&mut controller, &jittered(40, 5.0, 30.0, 3));

    let err = controller
        .end_session_deferred(Some("retry me"), None, BrokenSink)
        .unwrap()
        .wait()
        .unwrap_err();
    assert!(matches!(err.source, SessionError::Io(_)));

    let report = err.into_report().expect("report survives sink failure");
    let mut retry = WriterSink::new(Vec::new(), "retry");
    retry.persist(&report.to_bytes()).unwrap();
    assert_eq!(retry.into_inner(), report.render().into_bytes());
}

#[test]
fn panicking_sink_still_returns_controller_to_idle() {
    let mut controller = SessionController::new();
    controller.start_session().unwrap();
    feed(&mut controller, &steady(10, FRAME_60HZ_MS));

    let err = controller
        .end_session_deferred(None, None, PanickingSink)
        .unwrap()
        .wait()
        .unwrap_err();
    assert!(matches!(err.source, SessionError::WorkerLost));
    assert_eq!(controller.state(), SessionState::Idle);

    controller.start_session().unwrap();
    assert_eq!(controller.state(), SessionState::Logging);
}

#[test]
fn try_wait_delivers_result_once() {
    let mut controller = SessionController::new();
    controller.start_session().unwrap();
    feed(&mut controller, &steady(5, 16.0));

    let mut handle = controller
        .end_session_deferred(None, None, SharedSink::default())
        .unwrap();
    let first = loop {
        if let Some(result) = handle.wait_timeout(Duration::from_millis(50)) {
            break result;
        }
    };
    assert!(first.is_ok());
    assert!(handle.is_finished());
    assert!(matches!(
        handle.try_wait(),
        Some(Err(e)) if matches!(e.source, SessionError::WorkerLost)
    ));
}

#[test]
fn deferred_dump_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs/session.txt");

    let mut controller = SessionController::new();
    controller.start_session().unwrap();
    feed(&mut controller, &steady(30, FRAME_30HZ_MS));
    let report = controller
        .end_session_deferred(None, Some("OS: test"), FileSink::new(&path))
        .unwrap()
        .wait()
        .unwrap();

    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert_eq!(on_disk, report.render());
}
