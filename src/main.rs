// Main application entry point.
// Parses the command line, replays the capture into one session, then ends
// the session inline or on the dump worker and persists the report.

use frametime_log::capture::{CaptureError, CaptureReader, CaptureRecord};
use frametime_log::config::{Config, EnvironmentSource};
use frametime_log::environment::{self, HostEnvironment};
use frametime_log::sink::ReportSink;
use frametime_log::{cli, telemetry, util};
use frametime_log::{Report, SessionController, SessionError};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::process::exit;
use std::time::Instant;
use tracing::{debug, error, info, warn};

const EXIT_CAPTURE: i32 = 2;
const EXIT_EMPTY: i32 = 3;
const EXIT_PERSIST: i32 = 4;

fn main() {
    let args = cli::parse_args();
    let cfg = Config::from(&args);
    telemetry::init_tracing(&cfg);

    let reader: Box<dyn BufRead> = match &cfg.input {
        Some(path) => match File::open(path) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to open capture file");
                exit(EXIT_CAPTURE);
            }
        },
        None => Box::new(io::stdin().lock()),
    };

    let mut controller = SessionController::new();
    if let Err(e) = controller.start_session() {
        // A fresh controller is always idle.
        warn!(error = %e, "Could not start session");
    }

    if let Err(e) = replay(&mut controller, reader) {
        error!(error = %e, "Capture replay failed");
        exit(EXIT_CAPTURE);
    }

    // Environment text is captured here, before the store leaves this thread.
    let environment = environment_text(&cfg);
    let started = Instant::now();

    let report = if cfg.deferred {
        end_deferred(&mut controller, &cfg, environment.as_deref())
    } else {
        end_inline(&mut controller, &cfg, environment.as_deref())
    };

    let report = match report {
        Ok(report) => report,
        Err(code) => exit(code),
    };

    info!(
        frames = report.summary.total_frames,
        session = %util::format_duration(util::secs_to_duration(report.summary.duration_secs)),
        mean_ms = report.summary.mean_ms,
        dump_time = %util::format_duration(started.elapsed()),
        "Report complete"
    );

    if cfg.stats_json {
        if let Err(e) = report.to_json_writer(io::stdout().lock()) {
            warn!(error = %e, "Failed to print JSON stats");
        }
    }
}

/// Feeds every capture record into the live session.
fn replay(controller: &mut SessionController, reader: impl BufRead) -> Result<(), CaptureError> {
    let mut frames = 0usize;
    for record in CaptureReader::new(reader) {
        let recorded = match record? {
            CaptureRecord::Frame {
                elapsed_secs,
                duration_ms,
            } => {
                frames += 1;
                controller.record_frame(elapsed_secs, duration_ms)
            }
            CaptureRecord::Event {
                timestamp_secs,
                label,
            } => controller.record_event(timestamp_secs, label),
        };
        if let Err(e) = recorded {
            warn!(error = %e, "Record dropped");
        }
    }
    debug!(frames, "Capture replay finished");
    Ok(())
}

fn environment_text(cfg: &Config) -> Option<String> {
    match &cfg.environment {
        EnvironmentSource::Detect => Some(HostEnvironment::detect().render()),
        EnvironmentSource::File(path) => match environment::from_file(path) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read environment file; leaving block empty");
                None
            }
        },
        EnvironmentSource::None => None,
    }
}

fn end_inline(
    controller: &mut SessionController,
    cfg: &Config,
    environment: Option<&str>,
) -> Result<Report, i32> {
    let report = controller
        .end_session(cfg.extra_info.as_deref(), environment)
        .map_err(|e| exit_code(&e))?;

    let mut sink = cfg.sink();
    match sink.persist(&report.to_bytes()) {
        Ok(()) => {
            info!(path = %sink.describe(), "Frame-time report written");
            Ok(report)
        }
        Err(e) => {
            error!(path = %sink.describe(), error = %e, "Failed to write frame-time report");
            Err(EXIT_PERSIST)
        }
    }
}

fn end_deferred(
    controller: &mut SessionController,
    cfg: &Config,
    environment: Option<&str>,
) -> Result<Report, i32> {
    let handle = controller
        .end_session_deferred(cfg.extra_info.as_deref(), environment, cfg.sink())
        .map_err(|e| exit_code(&e))?;
    debug!(state = ?controller.state(), "Dump handed to worker");

    handle.wait().map_err(|e| exit_code(&e.source))
}

fn exit_code(e: &SessionError) -> i32 {
    match e {
        SessionError::EmptySession => {
            error!("Capture contained no frames; no report written");
            EXIT_EMPTY
        }
        other => {
            error!(error = %other, "Session dump failed");
            EXIT_PERSIST
        }
    }
}
