//! Video stream properties.

use serde::{Deserialize, Serialize};
use std::path::Path;

use xko_models::VideoMetadata;

use crate::error::MediaResult;
use crate::source::VideoSource;

/// Properties computed once when a video is opened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Frame rate (fps)
    pub fps: f64,
    /// Number of frames reported by the container
    pub frame_count: u64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Duration in seconds (`frame_count / fps`, 0 when fps is unknown)
    pub duration: f64,
}

impl VideoInfo {
    pub fn new(fps: f64, frame_count: u64, width: u32, height: u32) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 0.0 };
        let duration = if fps > 0.0 {
            frame_count as f64 / fps
        } else {
            0.0
        };
        Self {
            fps,
            frame_count,
            width,
            height,
            duration,
        }
    }

    /// Seconds at which frame `index` is shown.
    pub fn frame_to_timestamp(&self, index: u64) -> f64 {
        if self.fps > 0.0 {
            index as f64 / self.fps
        } else {
            0.0
        }
    }

    /// Frame shown at `timestamp`. Negative and NaN timestamps map to frame 0.
    pub fn timestamp_to_frame(&self, timestamp: f64) -> u64 {
        let frame = (timestamp * self.fps).floor();
        if frame.is_finite() && frame > 0.0 {
            frame as u64
        } else {
            0
        }
    }

    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    pub fn to_metadata(&self, path: impl AsRef<Path>) -> VideoMetadata {
        VideoMetadata {
            path: path.as_ref().display().to_string(),
            duration: self.duration,
            fps: self.fps,
            frame_count: self.frame_count,
            resolution: self.resolution(),
        }
    }
}

/// Open a video just long enough to read its properties.
pub fn probe_video(path: impl AsRef<Path>) -> MediaResult<VideoInfo> {
    let mut source = VideoSource::open(path)?;
    let info = *source.info();
    source.close();
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let info = VideoInfo::new(60.0, 600, 1280, 720);
        assert_eq!(info.duration, 10.0);
        assert_eq!(info.resolution(), "1280x720");

        let unknown = VideoInfo::new(0.0, 600, 1280, 720);
        assert_eq!(unknown.duration, 0.0);
        assert_eq!(VideoInfo::new(f64::NAN, 10, 1, 1).fps, 0.0);
    }

    #[test]
    fn test_frame_timestamp_conversion() {
        let info = VideoInfo::new(30.0, 300, 640, 360);
        assert_eq!(info.frame_to_timestamp(45), 1.5);
        assert_eq!(info.timestamp_to_frame(1.5), 45);
        assert_eq!(info.timestamp_to_frame(1.51), 45);
        assert_eq!(info.timestamp_to_frame(-2.0), 0);
        assert_eq!(info.timestamp_to_frame(f64::NAN), 0);
    }

    #[test]
    fn test_zero_fps_timestamps() {
        let info = VideoInfo::new(0.0, 10, 1, 1);
        assert_eq!(info.frame_to_timestamp(5), 0.0);
        assert_eq!(info.timestamp_to_frame(5.0), 0);
    }

    #[test]
    fn test_probe_missing_file() {
        let err = probe_video("/definitely/not/here.mp4").unwrap_err();
        assert!(matches!(err, crate::MediaError::FileNotFound(_)));
    }
}
