// fuzz/fuzz_targets/fuzz_report.rs
#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use frametime_log::report::{self, Report};
use frametime_log::SampleStore;
use libfuzzer_sys::fuzz_target;

// Helper struct that CAN derive Arbitrary
#[derive(Arbitrary, Debug, Clone)]
struct ArbitrarySession {
    frames: Vec<(f64, f64)>,
    events: Vec<(f64, String)>,
    extra_info: Option<String>,
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(session) = ArbitrarySession::arbitrary(&mut u) else {
        return;
    };

    let mut store = SampleStore::with_capacity(session.frames.len());
    for &(elapsed, duration) in &session.frames {
        store.record_frame(elapsed, duration);
    }
    for (timestamp, label) in &session.events {
        store.record_event(*timestamp, label.clone());
    }

    match Report::generate(store, session.extra_info.as_deref(), None) {
        Ok(report) => {
            assert_eq!(report.summary.total_frames, session.frames.len());
            assert_eq!(report.buckets.len(), report::FPS_THRESHOLDS.len());
            let _ = report.render();
        }
        Err(_) => assert!(session.frames.is_empty()),
    }
});
