//! Annotated clip extraction.
//!
//! Clips are cut from an already opened [`VideoSource`] by seeking to the
//! clip start and decoding forward. Every frame gets a text overlay
//! describing the annotated moment. Encoders are tried in
//! [`CODEC_PREFERENCE`] order; falling back is logged and recorded, and a
//! clip no encoder accepts is skipped rather than failing the batch.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use image::RgbImage;
use xko_models::{format_clock, Clip, ClipAnnotation, Mistake};

use crate::error::MediaResult;
use crate::fs_utils::{ensure_dir, write_json_pretty};
use crate::source::VideoSource;

/// Manifest file written next to the clips.
pub const MANIFEST_FILE: &str = "clips_manifest.json";

/// Longest description drawn on a clip.
const OVERLAY_DESCRIPTION_CHARS: usize = 50;

/// Video codecs, identified by FourCC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    Avc1,
    H264,
    X264,
    /// MPEG-4 Part 2; available almost everywhere.
    Mp4v,
}

/// Encoder order: H.264 variants first, then the baseline.
pub const CODEC_PREFERENCE: [Codec; 4] = [Codec::Avc1, Codec::H264, Codec::X264, Codec::Mp4v];

impl Codec {
    pub fn fourcc(&self) -> &'static str {
        match self {
            Codec::Avc1 => "avc1",
            Codec::H264 => "H264",
            Codec::X264 => "X264",
            Codec::Mp4v => "mp4v",
        }
    }

    pub fn fourcc_chars(&self) -> [char; 4] {
        let mut chars = ['\0'; 4];
        for (slot, c) in chars.iter_mut().zip(self.fourcc().chars()) {
            *slot = c;
        }
        chars
    }
}

impl std::fmt::Display for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fourcc())
    }
}

/// One line of overlay text. Coordinates are the text baseline origin.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLine {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub scale: f64,
    /// RGB
    pub color: [u8; 3],
    pub thickness: i32,
}

/// Text burned into a single clip frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overlay {
    pub lines: Vec<OverlayLine>,
}

/// Lay out the overlay for a frame `relative_secs` into the clip.
pub fn build_overlay(
    annotation: &ClipAnnotation,
    relative_secs: f64,
    width: u32,
    height: u32,
) -> Overlay {
    let description: String = annotation
        .description()
        .chars()
        .take(OVERLAY_DESCRIPTION_CHARS)
        .collect();
    let width = i32::try_from(width).unwrap_or(i32::MAX);
    let height = i32::try_from(height).unwrap_or(i32::MAX);

    Overlay {
        lines: vec![
            OverlayLine {
                text: format!("Player: {}", annotation.actor().display_name()),
                x: 20,
                y: 50,
                scale: 1.0,
                color: [255, 255, 255],
                thickness: 2,
            },
            OverlayLine {
                text: format!("Type: {}", annotation.kind_label()),
                x: 20,
                y: 90,
                scale: 0.8,
                color: [255, 0, 0],
                thickness: 2,
            },
            OverlayLine {
                text: description,
                x: 20,
                y: 130,
                scale: 0.6,
                color: [0, 255, 255],
                thickness: 1,
            },
            OverlayLine {
                text: format_clock(annotation.timestamp() + relative_secs),
                x: (width - 200).max(0),
                y: (height - 30).max(0),
                scale: 0.8,
                color: [255, 255, 255],
                thickness: 2,
            },
        ],
    }
}

/// An open clip file.
pub trait ClipSink {
    fn write(&mut self, frame: &RgbImage, overlay: &Overlay) -> MediaResult<()>;

    /// Flush and close the file.
    fn finish(&mut self) -> MediaResult<()>;
}

/// Creates clip files for a given codec.
#[cfg_attr(test, mockall::automock)]
pub trait EncoderBackend {
    /// Open `path` for writing. `Ok(None)` means this codec is unavailable.
    fn open(
        &self,
        path: &Path,
        codec: Codec,
        fps: f64,
        width: u32,
        height: u32,
    ) -> MediaResult<Option<Box<dyn ClipSink>>>;
}

/// Clip window around an annotated moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipSettings {
    /// Seconds of video before the moment.
    pub pre_roll_secs: f64,
    /// Seconds of video after the moment.
    pub clip_duration_secs: f64,
}

impl Default for ClipSettings {
    fn default() -> Self {
        Self {
            pre_roll_secs: 1.0,
            clip_duration_secs: 5.0,
        }
    }
}

/// Writes clips into one output directory and keeps their manifest.
pub struct ClipExtractor {
    output_dir: PathBuf,
    backend: Box<dyn EncoderBackend>,
    settings: ClipSettings,
    manifest: Vec<Clip>,
    warnings: Vec<String>,
}

impl ClipExtractor {
    /// Create an extractor, creating `output_dir` if needed.
    pub fn new(
        output_dir: impl Into<PathBuf>,
        backend: Box<dyn EncoderBackend>,
    ) -> MediaResult<Self> {
        let output_dir = output_dir.into();
        ensure_dir(&output_dir)?;
        Ok(Self {
            output_dir,
            backend,
            settings: ClipSettings::default(),
            manifest: Vec::new(),
            warnings: Vec::new(),
        })
    }

    pub fn with_settings(mut self, settings: ClipSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Clips written so far.
    pub fn manifest(&self) -> &[Clip] {
        &self.manifest
    }

    /// Codec fallbacks and skipped clips, in the order they happened.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    fn record_warning(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }

    /// Write `<output_dir>/<id>.mp4` covering `[start_time, end_time]`.
    ///
    /// Returns `Ok(None)` when the clip was skipped: no encoder, empty
    /// window, no decodable frames, or a seek/decode/encode failure part way.
    /// A skipped clip leaves no file behind.
    pub fn extract(
        &mut self,
        source: &mut VideoSource,
        start_time: f64,
        end_time: f64,
        id: &str,
        annotation: &ClipAnnotation,
    ) -> MediaResult<Option<PathBuf>> {
        let start_time = start_time.max(0.0);
        let start_frame = source.timestamp_to_frame(start_time);
        let mut end_frame = source.timestamp_to_frame(end_time);
        if source.frame_count() > 0 {
            end_frame = end_frame.min(source.frame_count() - 1);
        }
        if end_time < start_time || end_frame < start_frame {
            self.record_warning(format!(
                "Skipping clip {id}: empty window {start_time:.2}s-{end_time:.2}s"
            ));
            return Ok(None);
        }

        let path = self.output_dir.join(format!("{id}.mp4"));
        let (width, height, fps) = (source.width(), source.height(), source.fps());
        let Some((codec, mut sink)) = self.open_sink(&path, fps, width, height)? else {
            self.record_warning(format!(
                "Skipping clip {id}: no encoder accepted {}",
                path.display()
            ));
            return Ok(None);
        };

        let written = match write_frames(source, sink.as_mut(), annotation, start_frame, end_frame) {
            Ok(written) => written,
            Err(e) => {
                if let Err(finish_err) = sink.finish() {
                    debug!("Could not finish aborted clip {}: {}", id, finish_err);
                }
                remove_partial(&path);
                self.record_warning(format!("Skipping clip {id}: {e}"));
                return Ok(None);
            }
        };
        if let Err(e) = sink.finish() {
            remove_partial(&path);
            self.record_warning(format!("Skipping clip {id}: {e}"));
            return Ok(None);
        }

        if written == 0 {
            remove_partial(&path);
            self.record_warning(format!("Skipping clip {id}: no frames decoded"));
            return Ok(None);
        }

        debug!(
            clip_id = %id,
            codec = %codec,
            frames = written,
            "Wrote clip {}",
            path.display()
        );
        self.manifest.push(Clip::new(
            id,
            path.display().to_string(),
            start_time,
            end_time,
            codec.fourcc(),
            annotation.clone(),
        ));
        Ok(Some(path))
    }

    /// Try each codec in preference order.
    fn open_sink(
        &mut self,
        path: &Path,
        fps: f64,
        width: u32,
        height: u32,
    ) -> MediaResult<Option<(Codec, Box<dyn ClipSink>)>> {
        if width == 0 || height == 0 {
            return Ok(None);
        }
        for (rank, codec) in CODEC_PREFERENCE.iter().copied().enumerate() {
            match self.backend.open(path, codec, fps, width, height) {
                Ok(Some(sink)) => {
                    if rank > 0 {
                        self.record_warning(format!(
                            "Codec {} unavailable, fell back to {} for {}",
                            CODEC_PREFERENCE[0],
                            codec,
                            path.display()
                        ));
                    }
                    return Ok(Some((codec, sink)));
                }
                Ok(None) => debug!("Codec {} unavailable for {}", codec, path.display()),
                Err(e) => debug!("Codec {} failed for {}: {}", codec, path.display(), e),
            }
        }
        Ok(None)
    }

    /// Cut one clip per mistake, ids `mistake_<actor>_<n>` where `n` is the
    /// mistake's position in `mistakes`.
    pub fn generate_from_mistakes(
        &mut self,
        source: &mut VideoSource,
        mistakes: &[Mistake],
    ) -> MediaResult<Vec<Clip>> {
        let before = self.manifest.len();

        for (index, mistake) in mistakes.iter().enumerate() {
            let id = format!("mistake_{}_{}", mistake.actor.as_str(), index);

            let start = (mistake.timestamp - self.settings.pre_roll_secs).max(0.0);
            let end = mistake.timestamp + self.settings.clip_duration_secs;
            let annotation = ClipAnnotation::Mistake(mistake.clone());
            self.extract(source, start, end, &id, &annotation)?;
        }

        let produced = self.manifest[before..].to_vec();
        info!(
            "Generated {} of {} mistake clips in {}",
            produced.len(),
            mistakes.len(),
            self.output_dir.display()
        );
        Ok(produced)
    }

    /// Write the manifest as an indented JSON array.
    pub fn save_manifest(&self) -> MediaResult<PathBuf> {
        let path = self.output_dir.join(MANIFEST_FILE);
        write_json_pretty(&path, &self.manifest)?;
        info!("Saved clip manifest to {}", path.display());
        Ok(path)
    }
}

/// Decode `[start_frame, end_frame]` into `sink`. Returns the frame count.
fn write_frames(
    source: &mut VideoSource,
    sink: &mut dyn ClipSink,
    annotation: &ClipAnnotation,
    start_frame: u64,
    end_frame: u64,
) -> MediaResult<u64> {
    let fps = source.fps();
    source.seek_to_frame(start_frame)?;
    let mut written: u64 = 0;
    for _ in start_frame..=end_frame {
        let Some(frame) = source.read_next()? else {
            break;
        };
        let relative = if fps > 0.0 { written as f64 / fps } else { 0.0 };
        let overlay = build_overlay(annotation, relative, frame.width(), frame.height());
        sink.write(&frame, &overlay)?;
        written += 1;
    }
    Ok(written)
}

fn remove_partial(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        debug!("No partial clip to remove at {}: {}", path.display(), e);
    }
}
