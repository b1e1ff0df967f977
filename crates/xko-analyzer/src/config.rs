//! Analyzer configuration.

use std::path::PathBuf;
use std::str::FromStr;

use xko_media::ClipSettings;

use crate::classifier::ClassifierSettings;

/// Tunables for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Analyze every Nth frame
    pub frame_stride: usize,
    /// Minimum frame gap between two events for the same player
    pub cooldown_frames: u64,
    /// How much one half must out-move the other to attribute an event
    pub activity_ratio: f64,
    /// Summed frame difference above which a frame pair is a hit or block
    pub diff_threshold: f64,
    /// Per-pixel difference ignored as noise
    pub noise_floor: f64,
    /// On-block advantage below which an unconditioned move is unsafe
    pub unsafe_on_block: i32,
    /// Smallest punish window worth reporting
    pub min_punish_window: u32,
    /// Frames before a move in which own activity counts as setup
    pub conditioning_window_frames: u64,
    /// Frames the opponent has to respond to a safe move
    pub reaction_window_frames: u64,
    /// Maximum gap between hits of one combo
    pub combo_timeout_frames: u64,
    /// Seconds after a mistake used for enrichment context
    pub context_window_secs: f64,
    /// Probability that the synthetic recognizer attaches a move
    pub synthetic_hit_rate: f64,
    /// Seconds of video before a mistake in its clip
    pub clip_pre_roll_secs: f64,
    /// Seconds of video after a mistake in its clip
    pub clip_duration_secs: f64,
    /// Directory for clips and default report output
    pub output_dir: PathBuf,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            frame_stride: 2,
            cooldown_frames: 30, // ~0.5s at 60fps
            activity_ratio: 1.2,
            diff_threshold: 1000.0,
            noise_floor: 0.0,
            unsafe_on_block: -5,
            min_punish_window: 1,
            conditioning_window_frames: 90,
            reaction_window_frames: 30,
            combo_timeout_frames: 90,
            context_window_secs: 5.0,
            synthetic_hit_rate: 0.1,
            clip_pre_roll_secs: 1.0,
            clip_duration_secs: 5.0,
            output_dir: PathBuf::from("output"),
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl AnalyzerConfig {
    /// Create config from environment variables. Unset or invalid values keep
    /// their defaults.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            frame_stride: env_parse("XKO_FRAME_STRIDE")
                .filter(|s| *s > 0)
                .unwrap_or(d.frame_stride),
            cooldown_frames: env_parse("XKO_EVENT_COOLDOWN_FRAMES").unwrap_or(d.cooldown_frames),
            activity_ratio: env_parse("XKO_ACTIVITY_RATIO")
                .filter(|r: &f64| r.is_finite() && *r >= 1.0)
                .unwrap_or(d.activity_ratio),
            diff_threshold: env_parse("XKO_DIFF_THRESHOLD")
                .filter(|t: &f64| t.is_finite() && *t >= 0.0)
                .unwrap_or(d.diff_threshold),
            noise_floor: env_parse("XKO_NOISE_FLOOR")
                .filter(|n: &f64| n.is_finite() && *n >= 0.0)
                .unwrap_or(d.noise_floor),
            unsafe_on_block: env_parse("XKO_UNSAFE_ON_BLOCK").unwrap_or(d.unsafe_on_block),
            min_punish_window: env_parse("XKO_MIN_PUNISH_WINDOW").unwrap_or(d.min_punish_window),
            conditioning_window_frames: env_parse("XKO_CONDITIONING_WINDOW_FRAMES")
                .unwrap_or(d.conditioning_window_frames),
            reaction_window_frames: env_parse("XKO_REACTION_WINDOW_FRAMES")
                .unwrap_or(d.reaction_window_frames),
            combo_timeout_frames: env_parse("XKO_COMBO_TIMEOUT_FRAMES")
                .unwrap_or(d.combo_timeout_frames),
            context_window_secs: env_parse("XKO_CONTEXT_WINDOW_SECS")
                .filter(|s: &f64| s.is_finite() && *s >= 0.0)
                .unwrap_or(d.context_window_secs),
            synthetic_hit_rate: env_parse("XKO_SYNTHETIC_HIT_RATE")
                .filter(|p: &f64| (0.0..=1.0).contains(p))
                .unwrap_or(d.synthetic_hit_rate),
            clip_pre_roll_secs: env_parse("XKO_CLIP_PRE_ROLL_SECS")
                .filter(|s: &f64| s.is_finite() && *s >= 0.0)
                .unwrap_or(d.clip_pre_roll_secs),
            clip_duration_secs: env_parse("XKO_CLIP_DURATION_SECS")
                .filter(|s: &f64| s.is_finite() && *s > 0.0)
                .unwrap_or(d.clip_duration_secs),
            output_dir: std::env::var("XKO_OUTPUT_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(d.output_dir),
        }
    }

    pub fn classifier_settings(&self) -> ClassifierSettings {
        ClassifierSettings {
            unsafe_on_block: self.unsafe_on_block,
            min_punish_window: self.min_punish_window,
            conditioning_window_frames: self.conditioning_window_frames,
            reaction_window_frames: self.reaction_window_frames,
        }
    }

    pub fn clip_settings(&self) -> ClipSettings {
        ClipSettings {
            pre_roll_secs: self.clip_pre_roll_secs,
            clip_duration_secs: self.clip_duration_secs,
        }
    }

    pub fn clips_dir(&self) -> PathBuf {
        self.output_dir.join("clips")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.frame_stride, 2);
        assert_eq!(config.cooldown_frames, 30);
        assert_eq!(config.activity_ratio, 1.2);
        assert_eq!(config.unsafe_on_block, -5);
        assert_eq!(config.clips_dir(), PathBuf::from("output/clips"));
    }

    #[test]
    fn test_derived_settings() {
        let config = AnalyzerConfig {
            min_punish_window: 4,
            clip_duration_secs: 3.0,
            ..Default::default()
        };
        assert_eq!(config.classifier_settings().min_punish_window, 4);
        assert_eq!(config.clip_settings().clip_duration_secs, 3.0);
    }
}
