//! Video handling for the 2XKO gameplay analyzer.
//!
//! This crate provides:
//! - A video source adapter with strided, forward-only frame sampling
//! - A left/right frame-difference activity detector
//! - Annotated clip extraction with an encoder fallback chain
//!
//! Decoding and encoding go through OpenCV when the default `opencv`
//! feature is enabled. The `FrameDecoder` and `EncoderBackend` seams allow
//! in-memory sources and test encoders without it.

pub mod backend;
pub mod clip;
pub mod detector;
pub mod error;
pub mod fs_utils;
pub mod probe;
pub mod source;

pub use backend::default_encoder_backend;
#[cfg(feature = "opencv")]
pub use backend::{OpenCvDecoder, OpenCvEncoderBackend};
pub use clip::{
    build_overlay, ClipExtractor, ClipSettings, ClipSink, Codec, EncoderBackend, Overlay,
    OverlayLine, CODEC_PREFERENCE,
};
pub use detector::{attribute_actor, Activity, ActivitySignal, FrameEventDetector};
pub use error::{MediaError, MediaResult};
pub use probe::{probe_video, VideoInfo};
pub use source::{FrameDecoder, FrameSample, Frames, MemoryDecoder, VideoSource};

/// Decoded RGB frame.
pub use image::RgbImage;
