//! Decoder and encoder backends.
//!
//! With the `opencv` feature, video is decoded with `VideoCapture` and clips
//! are written with `VideoWriter`, overlay text drawn by `imgproc::put_text`.
//! Without it, no encoder is available and every clip is skipped.

#[cfg(feature = "opencv")]
pub use opencv_backend::{OpenCvDecoder, OpenCvEncoderBackend};

use crate::clip::EncoderBackend;

/// The encoder used when none is injected.
pub fn default_encoder_backend() -> Box<dyn EncoderBackend> {
    #[cfg(feature = "opencv")]
    {
        Box::new(OpenCvEncoderBackend)
    }
    #[cfg(not(feature = "opencv"))]
    {
        Box::new(UnavailableEncoderBackend)
    }
}

/// Encoder backend that accepts no codec.
#[cfg(not(feature = "opencv"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableEncoderBackend;

#[cfg(not(feature = "opencv"))]
impl EncoderBackend for UnavailableEncoderBackend {
    fn open(
        &self,
        _path: &std::path::Path,
        _codec: crate::clip::Codec,
        _fps: f64,
        _width: u32,
        _height: u32,
    ) -> crate::error::MediaResult<Option<Box<dyn crate::clip::ClipSink>>> {
        Ok(None)
    }
}

#[cfg(feature = "opencv")]
mod opencv_backend {
    use image::RgbImage;
    use opencv::{
        core::{AlgorithmHint, Mat, Point, Scalar, Size, CV_8UC3},
        imgproc,
        prelude::*,
        videoio::{self, VideoCapture, VideoWriter},
    };
    use std::path::Path;
    use tracing::{debug, warn};

    use crate::clip::{ClipSink, Codec, EncoderBackend, Overlay};
    use crate::error::{MediaError, MediaResult};
    use crate::probe::VideoInfo;
    use crate::source::FrameDecoder;

    fn path_str(path: &Path) -> MediaResult<&str> {
        path.to_str()
            .ok_or_else(|| MediaError::unreadable(path, "path is not valid UTF-8"))
    }

    /// `VideoCapture` backed decoder producing RGB frames.
    pub struct OpenCvDecoder {
        capture: VideoCapture,
        info: VideoInfo,
    }

    impl OpenCvDecoder {
        pub fn open(path: &Path) -> MediaResult<Self> {
            let capture = VideoCapture::from_file(path_str(path)?, videoio::CAP_ANY)
                .map_err(|e| MediaError::unreadable(path, e.to_string()))?;
            let opened = capture
                .is_opened()
                .map_err(|e| MediaError::unreadable(path, e.to_string()))?;
            if !opened {
                return Err(MediaError::unreadable(
                    path,
                    "decoder could not open the container",
                ));
            }

            let prop = |id: i32| capture.get(id).unwrap_or(0.0).max(0.0);
            let info = VideoInfo::new(
                prop(videoio::CAP_PROP_FPS),
                prop(videoio::CAP_PROP_FRAME_COUNT) as u64,
                prop(videoio::CAP_PROP_FRAME_WIDTH) as u32,
                prop(videoio::CAP_PROP_FRAME_HEIGHT) as u32,
            );
            Ok(Self { capture, info })
        }

        pub fn info(&self) -> VideoInfo {
            self.info
        }
    }

    impl FrameDecoder for OpenCvDecoder {
        fn read_frame(&mut self) -> MediaResult<Option<RgbImage>> {
            let mut frame = Mat::default();
            let ok = self
                .capture
                .read(&mut frame)
                .map_err(|e| MediaError::decode(format!("read: {e}")))?;
            if !ok || frame.empty() {
                return Ok(None);
            }
            bgr_mat_to_rgb(&frame).map(Some)
        }

        fn skip_frame(&mut self) -> MediaResult<bool> {
            self.capture
                .grab()
                .map_err(|e| MediaError::decode(format!("grab: {e}")))
        }

        fn seek_frame(&mut self, index: u64) -> MediaResult<()> {
            let accepted = self
                .capture
                .set(videoio::CAP_PROP_POS_FRAMES, index as f64)
                .map_err(|e| MediaError::decode(format!("seek: {e}")))?;
            if !accepted {
                return Err(MediaError::decode(format!(
                    "seek to frame {index} rejected"
                )));
            }
            Ok(())
        }

        fn release(&mut self) {
            if let Err(e) = self.capture.release() {
                warn!("Failed to release video capture: {}", e);
            }
        }
    }

    fn bgr_mat_to_rgb(frame: &Mat) -> MediaResult<RgbImage> {
        let mut rgb = Mat::default();
        imgproc::cvt_color(
            frame,
            &mut rgb,
            imgproc::COLOR_BGR2RGB,
            0,
            AlgorithmHint::ALGO_HINT_DEFAULT,
        )
        .map_err(|e| MediaError::decode(format!("bgr2rgb: {e}")))?;

        let width = u32::try_from(rgb.cols()).unwrap_or(0);
        let height = u32::try_from(rgb.rows()).unwrap_or(0);
        let bytes = rgb
            .data_bytes()
            .map_err(|e| MediaError::decode(format!("frame bytes: {e}")))?
            .to_vec();
        RgbImage::from_raw(width, height, bytes)
            .ok_or_else(|| MediaError::decode("frame buffer does not match its size"))
    }

    fn rgb_to_bgr_mat(frame: &RgbImage) -> MediaResult<Mat> {
        let encode_err = |e: opencv::Error| MediaError::decode(format!("rgb2bgr: {e}"));
        let rows = i32::try_from(frame.height()).unwrap_or(i32::MAX);
        let cols = i32::try_from(frame.width()).unwrap_or(i32::MAX);
        let mut rgb = Mat::new_rows_cols_with_default(rows, cols, CV_8UC3, Scalar::all(0.0))
            .map_err(encode_err)?;
        let buffer = rgb.data_bytes_mut().map_err(encode_err)?;
        if buffer.len() != frame.as_raw().len() {
            return Err(MediaError::decode("frame buffer does not match its size"));
        }
        buffer.copy_from_slice(frame.as_raw());

        let mut bgr = Mat::default();
        imgproc::cvt_color(
            &rgb,
            &mut bgr,
            imgproc::COLOR_RGB2BGR,
            0,
            AlgorithmHint::ALGO_HINT_DEFAULT,
        )
        .map_err(encode_err)?;
        Ok(bgr)
    }

    /// `VideoWriter` backed encoder.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct OpenCvEncoderBackend;

    impl EncoderBackend for OpenCvEncoderBackend {
        fn open(
            &self,
            path: &Path,
            codec: Codec,
            fps: f64,
            width: u32,
            height: u32,
        ) -> MediaResult<Option<Box<dyn ClipSink>>> {
            let [a, b, c, d] = codec.fourcc_chars();
            let fourcc = VideoWriter::fourcc(a, b, c, d)
                .map_err(|e| MediaError::encoder_unavailable(path, e.to_string()))?;
            let size = Size::new(
                i32::try_from(width).unwrap_or(i32::MAX),
                i32::try_from(height).unwrap_or(i32::MAX),
            );

            let writer = match VideoWriter::new(path_str(path)?, fourcc, fps, size, true) {
                Ok(writer) => writer,
                Err(e) => {
                    debug!("VideoWriter rejected {}: {}", codec, e);
                    return Ok(None);
                }
            };
            if !writer.is_opened().unwrap_or(false) {
                return Ok(None);
            }
            Ok(Some(Box::new(OpenCvClipSink { writer })))
        }
    }

    struct OpenCvClipSink {
        writer: VideoWriter,
    }

    impl ClipSink for OpenCvClipSink {
        fn write(&mut self, frame: &RgbImage, overlay: &Overlay) -> MediaResult<()> {
            let mut bgr = rgb_to_bgr_mat(frame)?;
            for line in &overlay.lines {
                let [r, g, b] = line.color;
                imgproc::put_text(
                    &mut bgr,
                    &line.text,
                    Point::new(line.x, line.y),
                    imgproc::FONT_HERSHEY_SIMPLEX,
                    line.scale,
                    Scalar::new(f64::from(b), f64::from(g), f64::from(r), 0.0),
                    line.thickness,
                    imgproc::LINE_8,
                    false,
                )
                .map_err(|e| MediaError::decode(format!("overlay: {e}")))?;
            }
            self.writer
                .write(&bgr)
                .map_err(|e| MediaError::decode(format!("write frame: {e}")))
        }

        fn finish(&mut self) -> MediaResult<()> {
            self.writer
                .release()
                .map_err(|e| MediaError::decode(format!("finish clip: {e}")))
        }
    }
}
