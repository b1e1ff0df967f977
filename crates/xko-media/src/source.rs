//! Video source adapter.
//!
//! A [`VideoSource`] owns one decoder handle. Sampling and clip re-seeking
//! both borrow it mutably, so only one flow reads from it at a time. The
//! handle is released by [`VideoSource::close`] or on drop, whichever
//! happens first.

use image::RgbImage;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{MediaError, MediaResult};
use crate::probe::VideoInfo;

/// One decoded frame handed to the detector.
#[derive(Debug, Clone)]
pub struct FrameSample {
    pub frame_index: u64,
    /// Seconds from the start of the video.
    pub timestamp: f64,
    pub pixels: RgbImage,
}

/// Sequential frame decoder behind a [`VideoSource`].
pub trait FrameDecoder {
    /// Decode the next frame, or `None` at end of stream.
    fn read_frame(&mut self) -> MediaResult<Option<RgbImage>>;

    /// Advance past the next frame without converting it.
    ///
    /// Returns `false` at end of stream.
    fn skip_frame(&mut self) -> MediaResult<bool> {
        Ok(self.read_frame()?.is_some())
    }

    /// Position the decoder so the next read returns frame `index`.
    fn seek_frame(&mut self, index: u64) -> MediaResult<()>;

    /// Release the underlying handle.
    fn release(&mut self);
}

/// Decoder over frames held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDecoder {
    frames: Vec<RgbImage>,
    cursor: usize,
}

impl MemoryDecoder {
    pub fn new(frames: Vec<RgbImage>) -> Self {
        Self { frames, cursor: 0 }
    }
}

impl FrameDecoder for MemoryDecoder {
    fn read_frame(&mut self) -> MediaResult<Option<RgbImage>> {
        let frame = self.frames.get(self.cursor).cloned();
        if frame.is_some() {
            self.cursor += 1;
        }
        Ok(frame)
    }

    fn skip_frame(&mut self) -> MediaResult<bool> {
        if self.cursor < self.frames.len() {
            self.cursor += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn seek_frame(&mut self, index: u64) -> MediaResult<()> {
        let index = usize::try_from(index).unwrap_or(usize::MAX);
        self.cursor = index.min(self.frames.len());
        Ok(())
    }

    fn release(&mut self) {
        self.frames.clear();
        self.cursor = 0;
    }
}

/// An opened video.
pub struct VideoSource {
    path: PathBuf,
    info: VideoInfo,
    decoder: Option<Box<dyn FrameDecoder>>,
    position: u64,
}

impl std::fmt::Debug for VideoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoSource")
            .field("path", &self.path)
            .field("info", &self.info)
            .field("closed", &self.is_closed())
            .field("position", &self.position)
            .finish()
    }
}

impl VideoSource {
    /// Open a video file with the default decoder.
    pub fn open(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }

        let (info, decoder) = open_decoder(path)?;
        debug!(
            path = %path.display(),
            fps = info.fps,
            frame_count = info.frame_count,
            resolution = %info.resolution(),
            "Opened video source"
        );
        Ok(Self::from_decoder(path, info, decoder))
    }

    /// Wrap an already opened decoder.
    pub fn from_decoder(
        path: impl Into<PathBuf>,
        info: VideoInfo,
        decoder: Box<dyn FrameDecoder>,
    ) -> Self {
        Self {
            path: path.into(),
            info,
            decoder: Some(decoder),
            position: 0,
        }
    }

    /// Build a source over in-memory frames. Size comes from the first frame.
    pub fn from_frames(label: impl Into<PathBuf>, frames: Vec<RgbImage>, fps: f64) -> Self {
        let (width, height) = frames.first().map(|f| f.dimensions()).unwrap_or((0, 0));
        let info = VideoInfo::new(fps, frames.len() as u64, width, height);
        Self::from_decoder(label, info, Box::new(MemoryDecoder::new(frames)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    pub fn duration(&self) -> f64 {
        self.info.duration
    }

    pub fn fps(&self) -> f64 {
        self.info.fps
    }

    pub fn frame_count(&self) -> u64 {
        self.info.frame_count
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn frame_to_timestamp(&self, index: u64) -> f64 {
        self.info.frame_to_timestamp(index)
    }

    pub fn timestamp_to_frame(&self, timestamp: f64) -> u64 {
        self.info.timestamp_to_frame(timestamp)
    }

    pub fn is_closed(&self) -> bool {
        self.decoder.is_none()
    }

    /// Index of the frame the next sequential read returns.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Rewind to frame 0 and sample every `stride`-th frame.
    ///
    /// A source still at frame 0 is not seeked, so unseekable streams can
    /// be sampled once. Frames are decoded strictly forward. The iterator ends at the first
    /// frame the decoder cannot produce and yields any decode error once.
    pub fn extract_frames(&mut self, stride: usize) -> MediaResult<Frames<'_>> {
        if stride == 0 {
            return Err(MediaError::InvalidStride(stride));
        }
        if self.is_closed() {
            return Err(MediaError::SourceClosed);
        }
        if self.position != 0 {
            self.seek_to_frame(0)?;
        }
        Ok(Frames {
            source: self,
            stride: stride as u64,
            done: false,
        })
    }

    /// Decode the frame shown at `timestamp`.
    pub fn get_frame_at(&mut self, timestamp: f64) -> MediaResult<RgbImage> {
        if self.is_closed() {
            return Err(MediaError::SourceClosed);
        }
        let frame_index = self.timestamp_to_frame(timestamp);
        let seek_error = || MediaError::Seek {
            timestamp,
            frame_index,
        };

        self.seek_to_frame(frame_index).map_err(|_| seek_error())?;
        match self.read_next() {
            Ok(Some(frame)) => Ok(frame),
            _ => Err(seek_error()),
        }
    }

    /// Release the decoder. Calling this more than once is a no-op.
    pub fn close(&mut self) {
        if let Some(mut decoder) = self.decoder.take() {
            decoder.release();
            debug!(path = %self.path.display(), "Released video source");
        }
    }

    fn decoder_mut(&mut self) -> MediaResult<&mut (dyn FrameDecoder + 'static)> {
        self.decoder.as_deref_mut().ok_or(MediaError::SourceClosed)
    }

    pub(crate) fn seek_to_frame(&mut self, index: u64) -> MediaResult<()> {
        self.decoder_mut()?.seek_frame(index)?;
        self.position = index;
        Ok(())
    }

    pub(crate) fn read_next(&mut self) -> MediaResult<Option<RgbImage>> {
        let frame = self.decoder_mut()?.read_frame()?;
        if frame.is_some() {
            self.position += 1;
        }
        Ok(frame)
    }

    fn skip_next(&mut self) -> MediaResult<bool> {
        let advanced = self.decoder_mut()?.skip_frame()?;
        if advanced {
            self.position += 1;
        }
        Ok(advanced)
    }
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(feature = "opencv")]
fn open_decoder(path: &Path) -> MediaResult<(VideoInfo, Box<dyn FrameDecoder>)> {
    let decoder = crate::backend::OpenCvDecoder::open(path)?;
    let info = decoder.info();
    Ok((info, Box::new(decoder)))
}

#[cfg(not(feature = "opencv"))]
fn open_decoder(path: &Path) -> MediaResult<(VideoInfo, Box<dyn FrameDecoder>)> {
    Err(MediaError::unreadable(
        path,
        "built without the opencv feature; no video decoder available",
    ))
}

/// Strided frame samples from a [`VideoSource`].
///
/// Finite and not restartable; call [`VideoSource::extract_frames`] again
/// to sample from the beginning.
pub struct Frames<'a> {
    source: &'a mut VideoSource,
    stride: u64,
    done: bool,
}

impl Iterator for Frames<'_> {
    type Item = MediaResult<FrameSample>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let index = self.source.position();
            if index % self.stride != 0 {
                match self.source.skip_next() {
                    Ok(true) => continue,
                    Ok(false) => self.done = true,
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                }
                continue;
            }

            match self.source.read_next() {
                Ok(Some(pixels)) => {
                    return Some(Ok(FrameSample {
                        frame_index: index,
                        timestamp: self.source.frame_to_timestamp(index),
                        pixels,
                    }));
                }
                Ok(None) => self.done = true,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

impl FusedIterator for Frames<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn frames(n: usize) -> Vec<RgbImage> {
        (0..n)
            .map(|i| RgbImage::from_pixel(4, 2, Rgb([i as u8, 0, 0])))
            .collect()
    }

    #[test]
    fn test_stride_sampling_count_and_order() {
        for (count, stride, expected) in [(10, 1, 10), (10, 3, 4), (9, 3, 3), (1, 5, 1)] {
            let mut source = VideoSource::from_frames("mem", frames(count), 60.0);
            let indices: Vec<u64> = source
                .extract_frames(stride)
                .unwrap()
                .map(|s| s.unwrap().frame_index)
                .collect();
            assert_eq!(indices.len(), expected, "count={count} stride={stride}");
            assert!(indices.windows(2).all(|w| w[0] < w[1]));
            assert!(indices.iter().all(|i| i % stride as u64 == 0));
        }
    }

    #[test]
    fn test_samples_carry_pixels_and_timestamps() {
        let mut source = VideoSource::from_frames("mem", frames(6), 2.0);
        let samples: Vec<FrameSample> = source
            .extract_frames(2)
            .unwrap()
            .collect::<MediaResult<_>>()
            .unwrap();
        assert_eq!(samples[1].frame_index, 2);
        assert_eq!(samples[1].timestamp, 1.0);
        assert_eq!(samples[1].pixels.get_pixel(0, 0), &Rgb([2, 0, 0]));
    }

    #[test]
    fn test_extract_rewinds() {
        let mut source = VideoSource::from_frames("mem", frames(4), 30.0);
        assert_eq!(source.extract_frames(1).unwrap().count(), 4);
        assert_eq!(source.extract_frames(1).unwrap().count(), 4);
    }

    #[test]
    fn test_empty_video() {
        let mut source = VideoSource::from_frames("mem", Vec::new(), 30.0);
        assert_eq!(source.duration(), 0.0);
        assert_eq!(source.extract_frames(2).unwrap().count(), 0);
    }

    #[test]
    fn test_zero_stride_rejected() {
        let mut source = VideoSource::from_frames("mem", frames(3), 30.0);
        assert!(matches!(
            source.extract_frames(0),
            Err(MediaError::InvalidStride(0))
        ));
    }

    #[test]
    fn test_get_frame_at() {
        let mut source = VideoSource::from_frames("mem", frames(10), 10.0);
        let frame = source.get_frame_at(0.55).unwrap();
        assert_eq!(frame.get_pixel(0, 0), &Rgb([5, 0, 0]));

        let err = source.get_frame_at(5.0).unwrap_err();
        assert!(matches!(
            err,
            MediaError::Seek {
                frame_index: 50,
                ..
            }
        ));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut source = VideoSource::from_frames("mem", frames(3), 30.0);
        source.close();
        source.close();
        assert!(source.is_closed());
        assert!(matches!(
            source.extract_frames(1),
            Err(MediaError::SourceClosed)
        ));
        assert!(matches!(
            source.get_frame_at(0.0),
            Err(MediaError::SourceClosed)
        ));
    }

    /// Forward-only decoder that rejects every seek.
    struct UnseekableDecoder(MemoryDecoder);

    impl FrameDecoder for UnseekableDecoder {
        fn read_frame(&mut self) -> MediaResult<Option<RgbImage>> {
            self.0.read_frame()
        }

        fn seek_frame(&mut self, index: u64) -> MediaResult<()> {
            Err(MediaError::decode(format!("seek to frame {index} rejected")))
        }

        fn release(&mut self) {}
    }

    #[test]
    fn test_fresh_unseekable_source_samples() {
        let info = VideoInfo::new(30.0, 5, 4, 2);
        let decoder = UnseekableDecoder(MemoryDecoder::new(frames(5)));
        let mut source = VideoSource::from_decoder("live", info, Box::new(decoder));

        let indices: Vec<u64> = source
            .extract_frames(2)
            .unwrap()
            .map(|s| s.unwrap().frame_index)
            .collect();
        assert_eq!(indices, vec![0, 2, 4]);

        // A second pass needs a rewind, which this stream cannot do.
        assert!(source.extract_frames(2).is_err());
    }

    #[test]
    fn test_open_missing_file() {
        let err = VideoSource::open("/no/such/video.mp4").unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
