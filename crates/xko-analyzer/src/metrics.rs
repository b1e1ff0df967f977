//! Pipeline counters.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! embedding application installs a recorder.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const FRAMES_SAMPLED_TOTAL: &str = "xko_frames_sampled_total";
    pub const EVENTS_EMITTED_TOTAL: &str = "xko_events_emitted_total";
    pub const EVENTS_SUPPRESSED_TOTAL: &str = "xko_events_suppressed_total";
    pub const MISTAKES_TOTAL: &str = "xko_mistakes_total";
    pub const CLIPS_WRITTEN_TOTAL: &str = "xko_clips_written_total";
    pub const ANALYSIS_DURATION_SECONDS: &str = "xko_analysis_duration_seconds";
}

pub fn record_frames_sampled(count: u64) {
    counter!(names::FRAMES_SAMPLED_TOTAL).increment(count);
}

pub fn record_event(actor: &str) {
    let labels = [("actor", actor.to_string())];
    counter!(names::EVENTS_EMITTED_TOTAL, &labels).increment(1);
}

pub fn record_suppressed(actor: &str) {
    let labels = [("actor", actor.to_string())];
    counter!(names::EVENTS_SUPPRESSED_TOTAL, &labels).increment(1);
}

pub fn record_mistake(actor: &str, kind: &str) {
    let labels = [("actor", actor.to_string()), ("kind", kind.to_string())];
    counter!(names::MISTAKES_TOTAL, &labels).increment(1);
}

pub fn record_clips_written(count: u64) {
    counter!(names::CLIPS_WRITTEN_TOTAL).increment(count);
}

pub fn record_analysis_duration(duration_secs: f64) {
    histogram!(names::ANALYSIS_DURATION_SECONDS).record(duration_secs);
}
