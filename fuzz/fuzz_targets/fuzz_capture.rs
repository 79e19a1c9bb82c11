// fuzz/fuzz_targets/fuzz_capture.rs
#![no_main]

use frametime_log::capture::{CaptureReader, CaptureRecord};
use frametime_log::SessionController;
use libfuzzer_sys::fuzz_target;

// Cap the number of records per case to keep runs short.
const MAX_RECORDS_PER_FUZZ_CASE: usize = 10_000;

fuzz_target!(|data: &[u8]| {
    let mut controller = SessionController::with_frame_capacity(0);
    let _ = controller.start_session();

    for record in CaptureReader::new(data).take(MAX_RECORDS_PER_FUZZ_CASE) {
        match record {
            Ok(CaptureRecord::Frame { elapsed_secs, duration_ms }) => {
                let _ = controller.record_frame(elapsed_secs, duration_ms);
            }
            Ok(CaptureRecord::Event { timestamp_secs, label }) => {
                let _ = controller.record_event(timestamp_secs, label);
            }
            // Malformed lines and invalid UTF-8 are expected; stop at the first.
            Err(_) => break,
        }
    }

    // Whatever was parsed must either render or be an empty session.
    if let Ok(report) = controller.end_session(Some("fuzz"), None) {
        let _ = report.render();
    }
});
