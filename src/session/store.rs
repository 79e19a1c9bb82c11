use serde::Serialize;

/// One frame observation: time since session start and how long the frame took.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameSample {
    pub elapsed_secs: f64,
    pub duration_ms: f64,
}

/// A user-supplied labelled timestamp marking a notable moment in the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomEvent {
    pub timestamp_secs: f64,
    pub label: String,
}

/// Append-only storage for the frames and events of one session.
///
/// Samples are kept in insertion order with no de-duplication, so two frames
/// sharing an elapsed timestamp are both retained. Values are not validated;
/// zero or negative durations are stored as given and dealt with by the
/// report engine.
#[derive(Debug, Clone, Default)]
pub struct SampleStore {
    samples: Vec<FrameSample>,
    events: Vec<CustomEvent>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocates room for `frames` samples. Events are rare and start small.
    pub fn with_capacity(frames: usize) -> Self {
        SampleStore {
            samples: Vec::with_capacity(frames),
            events: Vec::with_capacity(16),
        }
    }

    #[inline]
    pub fn record_frame(&mut self, elapsed_secs: f64, duration_ms: f64) {
        self.samples.push(FrameSample {
            elapsed_secs,
            duration_ms,
        });
    }

    #[inline]
    pub fn record_event(&mut self, timestamp_secs: f64, label: impl Into<String>) {
        self.events.push(CustomEvent {
            timestamp_secs,
            label: label.into(),
        });
    }

    /// Number of frame samples recorded.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true` when no frame has been recorded. Events alone do not count.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[FrameSample] {
        &self.samples
    }

    pub fn events(&self) -> &[CustomEvent] {
        &self.events
    }

    /// Elapsed time of the most recently inserted sample.
    pub fn last_elapsed(&self) -> Option<f64> {
        self.samples.last().map(|s| s.elapsed_secs)
    }

    /// Iterates over frame durations in insertion order.
    pub fn durations(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.duration_ms)
    }

    pub(crate) fn into_parts(self) -> (Vec<FrameSample>, Vec<CustomEvent>) {
        (self.samples, self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_samples_with_colliding_elapsed_time() {
        let mut store = SampleStore::new();
        store.record_frame(1.0, 16.0);
        store.record_frame(1.0, 17.0);
        store.record_frame(1.0, 18.0);
        assert_eq!(store.len(), 3);
        let durations: Vec<f64> = store.durations().collect();
        assert_eq!(durations, vec![16.0, 17.0, 18.0]);
    }

    #[test]
    fn events_do_not_make_store_non_empty() {
        let mut store = SampleStore::with_capacity(8);
        store.record_event(0.5, "load");
        assert!(store.is_empty());
        assert_eq!(store.events().len(), 1);
        assert_eq!(store.last_elapsed(), None);
    }

    #[test]
    fn last_elapsed_follows_insertion_not_maximum() {
        let mut store = SampleStore::new();
        store.record_frame(5.0, 10.0);
        store.record_frame(2.0, 10.0);
        assert_eq!(store.last_elapsed(), Some(2.0));
    }

    #[test]
    fn accepts_degenerate_durations() {
        let mut store = SampleStore::new();
        store.record_frame(0.0, 0.0);
        store.record_frame(0.1, -3.0);
        assert_eq!(store.len(), 2);
        assert_eq!(store.samples()[1].duration_ms, -3.0);
    }
}
