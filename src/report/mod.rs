// Statistical summary and text rendering for a finished frame-time session.
// A Report is computed once from a frozen SampleStore and never mutated.

pub mod format;


use crate::error::SessionError;
use crate::session::store::{CustomEvent, FrameSample, SampleStore};
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use tracing::{debug, instrument};

/// Frame-rate cutoffs analysed by the threshold buckets, fastest first.
pub const FPS_THRESHOLDS: [f64; 6] = [120.0, 60.0, 30.0, 15.0, 5.0, 1.0];

const P10: f64 = 0.1;
const P90: f64 = 0.9;

/// Summary statistics over every frame of a session. Durations are in
/// milliseconds, rates in frames per second.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSummary {
    /// Elapsed time of the last inserted sample, in seconds.
    pub duration_secs: f64,
    pub total_frames: usize,
    pub mean_ms: f64,
    pub rms_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub p10_ms: f64,
    pub p90_ms: f64,
}

impl FrameSummary {
    /// Computes the summary. Fails with [`SessionError::EmptySession`] when
    /// there is nothing to average over.
    pub fn compute(samples: &[FrameSample]) -> Result<Self, SessionError> {
        let last = samples.last().ok_or(SessionError::EmptySession)?;
        let n = samples.len() as f64;

        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for d in samples.iter().map(|s| s.duration_ms) {
            sum += d;
            sum_sq += d * d;
            min = min.min(d);
            max = max.max(d);
        }

        let mut sorted: Vec<f64> = samples.iter().map(|s| s.duration_ms).collect();
        sorted.sort_by(f64::total_cmp);

        Ok(FrameSummary {
            duration_secs: last.elapsed_secs,
            total_frames: samples.len(),
            mean_ms: sum / n,
            rms_ms: (sum_sq / n).sqrt(),
            min_ms: min,
            max_ms: max,
            p10_ms: nearest_rank(&sorted, P10),
            p90_ms: nearest_rank(&sorted, P90),
        })
    }

    pub fn mean_fps(&self) -> f64 {
        fps(self.mean_ms)
    }

    pub fn rms_fps(&self) -> f64 {
        fps(self.rms_ms)
    }

    /// Rate of the shortest frame, i.e. the highest frame rate seen.
    pub fn fastest_fps(&self) -> f64 {
        fps(self.min_ms)
    }

    /// Rate of the longest frame, i.e. the lowest frame rate seen.
    pub fn slowest_fps(&self) -> f64 {
        fps(self.max_ms)
    }

    pub fn p10_fps(&self) -> f64 {
        fps(self.p10_ms)
    }

    pub fn p90_fps(&self) -> f64 {
        fps(self.p90_ms)
    }
}

/// Converts a frame duration in milliseconds to frames per second.
/// A zero duration yields `Infinity`, a negative one a negative rate.
#[inline]
pub fn fps(duration_ms: f64) -> f64 {
    1000.0 / duration_ms
}

/// Nearest-rank percentile of an ascending slice: the value at index
/// `round(n * p) - 1`, clamped into the slice.
pub fn nearest_rank(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let rank = (sorted.len() as f64 * p).round() as i64 - 1;
    let idx = rank.clamp(0, sorted.len() as i64 - 1) as usize;
    sorted[idx]
}

/// Aggregate of the frames slower than one frame-rate cutoff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdBucket {
    pub cutoff_fps: f64,
    pub frame_count: usize,
    /// Share of all frames, in percent.
    pub frame_percent: f64,
    /// Total time spent in those frames, in seconds.
    pub time_secs: f64,
    /// Share of the session duration, in percent.
    pub time_percent: f64,
}

impl ThresholdBucket {
    /// Counts frames with `1000 / duration < cutoff_fps`. Buckets overlap: a
    /// slow frame lands in every bucket whose cutoff it falls under.
    pub fn analyse(samples: &[FrameSample], cutoff_fps: f64, duration_secs: f64) -> Self {
        let (frame_count, sum_ms) = samples
            .iter()
            .map(|s| s.duration_ms)
            .filter(|&d| fps(d) < cutoff_fps)
            .fold((0usize, 0.0f64), |(count, sum), d| (count + 1, sum + d));

        let total = samples.len() as f64;
        ThresholdBucket {
            cutoff_fps,
            frame_count,
            frame_percent: 100.0 * frame_count as f64 / total,
            time_secs: sum_ms / 1000.0,
            // 100 * (sum_ms / 1000) / duration_secs
            time_percent: 0.1 * sum_ms / duration_secs,
        }
    }

    fn write_line(&self, out: &mut impl fmt::Write) -> fmt::Result {
        writeln!(
            out,
            "< {} FPS: {} frames ({}%), {}s ({}%)",
            format::number(self.cutoff_fps),
            self.frame_count,
            format::percent(self.frame_percent),
            format::timing(self.time_secs),
            format::percent(self.time_percent),
        )
    }
}

/// The finished, immutable result of one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub summary: FrameSummary,
    pub buckets: Vec<ThresholdBucket>,
    pub extra_info: String,
    pub environment: String,
    pub events: Vec<CustomEvent>,
    #[serde(skip)]
    pub samples: Vec<FrameSample>,
}

impl Report {
    /// Computes the report from a frozen store, consuming it.
    ///
    /// `extra_info` is written verbatim at the top of the report and
    /// `environment` verbatim after the threshold buckets.
    #[instrument(level = "debug", skip_all, fields(frames = store.len(), events = store.events().len()))]
    pub fn generate(
        store: SampleStore,
        extra_info: Option<&str>,
        environment: Option<&str>,
    ) -> Result<Self, SessionError> {
        let summary = FrameSummary::compute(store.samples())?;
        let buckets = FPS_THRESHOLDS
            .iter()
            .map(|&cutoff| ThresholdBucket::analyse(store.samples(), cutoff, summary.duration_secs))
            .collect();
        debug!(
            mean_ms = summary.mean_ms,
            p90_ms = summary.p90_ms,
            duration_secs = summary.duration_secs,
            "Frame summary computed"
        );

        let (samples, events) = store.into_parts();
        Ok(Report {
            summary,
            buckets,
            extra_info: extra_info.unwrap_or_default().to_string(),
            environment: environment.unwrap_or_default().to_string(),
            events,
            samples,
        })
    }

    /// Renders the full text artifact.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(512 + self.samples.len() * 16);
        // Writing into a String cannot fail.
        let _ = self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut impl fmt::Write) -> fmt::Result {
        let s = &self.summary;

        writeln!(out, "{}", self.extra_info)?;
        writeln!(out)?;
        writeln!(out)?;
        writeln!(out, "Log duration: {}s", format::timing(s.duration_secs))?;
        writeln!(out, "Total frames: {}", s.total_frames)?;
        writeln!(out)?;

        let rows = [
            ("Average frametime", s.mean_ms, s.mean_fps()),
            ("RMS frametime", s.rms_ms, s.rms_fps()),
            ("Minimum frametime", s.min_ms, s.fastest_fps()),
            ("Maximum frametime", s.max_ms, s.slowest_fps()),
            ("p10%", s.p10_ms, s.p10_fps()),
            ("p90%", s.p90_ms, s.p90_fps()),
        ];
        for (name, ms, rate) in rows {
            writeln!(out, "{name}: {}ms, {} FPS", format::timing(ms), format::timing(rate))?;
        }
        writeln!(out)?;

        for bucket in &self.buckets {
            bucket.write_line(out)?;
        }
        writeln!(out)?;
        writeln!(out)?;

        writeln!(out, "{}", self.environment)?;
        writeln!(out)?;
        writeln!(out)?;

        if !self.events.is_empty() {
            writeln!(out, "Custom events:")?;
            for event in &self.events {
                writeln!(out, "{}, {}", format::timing(event.timestamp_secs), event.label)?;
            }
            writeln!(out)?;
        }

        writeln!(out, "Frametimes:")?;
        for sample in &self.samples {
            writeln!(
                out,
                "{}, {}",
                format::timing(sample.elapsed_secs),
                format::timing(sample.duration_ms)
            )?;
        }
        Ok(())
    }

    /// The rendered report as bytes, ready for a sink.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.render().into_bytes()
    }

    pub fn write_to(&self, mut writer: impl Write) -> io::Result<()> {
        writer.write_all(self.render().as_bytes())
    }

    /// Writes the summary, buckets and events as pretty JSON. Raw samples are
    /// left out; the text artifact carries them.
    pub fn to_json_writer(&self, mut writer: impl Write) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render_into(f)
    }
}

/// Recovers the frame count from a rendered report's `Total frames:` line.
pub fn parse_total_frames(text: &str) -> Option<usize> {
    text.lines()
        .find_map(|line| line.strip_prefix("Total frames: "))
        .and_then(|n| n.trim().parse().ok())
}
