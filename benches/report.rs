use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use frametime_log::{Report, SampleStore, SessionController, WriterSink};
use std::io;

use test_helpers::{accumulate, jittered};

// Roughly ten minutes of capture at 144Hz.
const FRAMES: usize = 86_400;

fn store_from(frames: &[(f64, f64)]) -> SampleStore {
    let mut store = SampleStore::with_capacity(frames.len());
    for &(elapsed, duration) in frames {
        store.record_frame(elapsed, duration);
    }
    store
}

fn bench_ingestion(c: &mut Criterion) {
    let frames = accumulate(&jittered(FRAMES, 5.0, 40.0, 7));
    c.bench_function("record_frame x86400", |b| {
        b.iter_batched(
            || {
                let mut controller = SessionController::with_frame_capacity(FRAMES);
                controller.start_session().expect("fresh controller");
                controller
            },
            |mut controller| {
                for &(elapsed, duration) in &frames {
                    controller.record_frame(black_box(elapsed), black_box(duration)).unwrap();
                }
                controller
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_report(c: &mut Criterion) {
    let frames = accumulate(&jittered(FRAMES, 5.0, 40.0, 11));

    c.bench_function("generate report x86400", |b| {
        b.iter_batched(
            || store_from(&frames),
            |store| Report::generate(store, Some("bench"), Some("OS: bench")).unwrap(),
            BatchSize::LargeInput,
        )
    });

    let report = Report::generate(store_from(&frames), Some("bench"), None).unwrap();
    c.bench_function("render report x86400", |b| b.iter(|| black_box(report.render())));
}

fn bench_deferred_dump(c: &mut Criterion) {
    let frames = accumulate(&jittered(10_000, 5.0, 40.0, 13));
    c.bench_function("deferred dump x10000", |b| {
        b.iter(|| {
            let mut controller = SessionController::with_frame_capacity(frames.len());
            controller.start_session().unwrap();
            for &(elapsed, duration) in &frames {
                controller.record_frame(elapsed, duration).unwrap();
            }
            let handle = controller
                .end_session_deferred(None, None, WriterSink::new(io::sink(), "null"))
                .unwrap();
            black_box(handle.wait().unwrap())
        })
    });
}

criterion_group!(benches, bench_ingestion, bench_report, bench_deferred_dump);
criterion_main!(benches);
