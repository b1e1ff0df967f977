//! Frame-difference activity detector.
//!
//! Compares two consecutive frames and measures how much changed on the
//! left and right halves of the screen. A large total change is treated as
//! a hit or a block. The heuristic cannot tell simultaneous actions, camera
//! shake or background effects apart from real interactions.

use image::RgbImage;
use xko_models::Actor;

/// Classification of one frame pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    None,
    HitOrBlock,
}

/// Left/right change magnitudes for one frame pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivitySignal {
    pub left_magnitude: f64,
    pub right_magnitude: f64,
    pub classification: Activity,
}

impl ActivitySignal {
    pub fn total(&self) -> f64 {
        self.left_magnitude + self.right_magnitude
    }

    pub fn is_hit_or_block(&self) -> bool {
        self.classification == Activity::HitOrBlock
    }
}

/// Stateless detector; the caller keeps the previous frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameEventDetector {
    /// Summed change over the frame above which a pair is a hit or block.
    diff_threshold: f64,
    /// Per-pixel change at or below this is ignored.
    noise_floor: f64,
}

impl Default for FrameEventDetector {
    fn default() -> Self {
        Self::new(1000.0, 0.0)
    }
}

impl FrameEventDetector {
    pub fn new(diff_threshold: f64, noise_floor: f64) -> Self {
        Self {
            diff_threshold,
            noise_floor,
        }
    }

    pub fn diff_threshold(&self) -> f64 {
        self.diff_threshold
    }

    /// Measure change between `previous` and `frame`.
    ///
    /// Frames of different sizes are compared over their overlapping region.
    /// Columns left of `width / 2` count toward the left half.
    pub fn classify(&self, frame: &RgbImage, previous: &RgbImage) -> ActivitySignal {
        let width = frame.width().min(previous.width());
        let height = frame.height().min(previous.height());
        let split = width / 2;

        let mut left = 0.0;
        let mut right = 0.0;
        for y in 0..height {
            for x in 0..width {
                let a = frame.get_pixel(x, y).0;
                let b = previous.get_pixel(x, y).0;
                let brightness = luma_of_diff(a, b);
                if brightness <= self.noise_floor {
                    continue;
                }
                if x < split {
                    left += brightness;
                } else {
                    right += brightness;
                }
            }
        }

        let classification = if left + right > self.diff_threshold {
            Activity::HitOrBlock
        } else {
            Activity::None
        };

        ActivitySignal {
            left_magnitude: left,
            right_magnitude: right,
            classification,
        }
    }
}

/// BT.601 luma of the per-channel absolute difference.
fn luma_of_diff(a: [u8; 3], b: [u8; 3]) -> f64 {
    let dr = f64::from(a[0].abs_diff(b[0]));
    let dg = f64::from(a[1].abs_diff(b[1]));
    let db = f64::from(a[2].abs_diff(b[2]));
    0.299 * dr + 0.587 * dg + 0.114 * db
}

/// Decide which player caused the activity.
///
/// The left half is player 1 and the right half player 2; one side has to
/// exceed the other by `ratio`. Anything else is [`Actor::Unknown`].
pub fn attribute_actor(signal: &ActivitySignal, ratio: f64) -> Actor {
    if signal.left_magnitude > signal.right_magnitude * ratio {
        Actor::Player1
    } else if signal.right_magnitude > signal.left_magnitude * ratio {
        Actor::Player2
    } else {
        Actor::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid(w: u32, h: u32, v: u8) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb([v, v, v]))
    }

    /// Frame whose left (or right) half is white.
    fn half_lit(w: u32, h: u32, left: bool) -> RgbImage {
        RgbImage::from_fn(w, h, |x, _| {
            let lit = if left { x < w / 2 } else { x >= w / 2 };
            if lit {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        })
    }

    #[test]
    fn test_identical_frames_are_none() {
        let detector = FrameEventDetector::default();
        let frame = half_lit(64, 36, true);
        let signal = detector.classify(&frame, &frame);
        assert_eq!(signal.classification, Activity::None);
        assert_eq!(signal.total(), 0.0);
    }

    #[test]
    fn test_left_burst_is_player1() {
        let detector = FrameEventDetector::default();
        let signal = detector.classify(&half_lit(64, 36, true), &solid(64, 36, 0));
        assert!(signal.is_hit_or_block());
        assert_eq!(signal.right_magnitude, 0.0);
        assert_eq!(attribute_actor(&signal, 1.2), Actor::Player1);
    }

    #[test]
    fn test_right_burst_is_player2() {
        let detector = FrameEventDetector::default();
        let signal = detector.classify(&half_lit(64, 36, false), &solid(64, 36, 0));
        assert!(signal.is_hit_or_block());
        assert_eq!(attribute_actor(&signal, 1.2), Actor::Player2);
    }

    #[test]
    fn test_balanced_change_is_unknown() {
        let detector = FrameEventDetector::default();
        let signal = detector.classify(&solid(64, 36, 200), &solid(64, 36, 0));
        assert!(signal.is_hit_or_block());
        assert_eq!(attribute_actor(&signal, 1.2), Actor::Unknown);
    }

    #[test]
    fn test_small_change_below_threshold() {
        let detector = FrameEventDetector::default();
        // 4x4 frame, 16 pixels * 10 = 160 < 1000
        let signal = detector.classify(&solid(4, 4, 10), &solid(4, 4, 0));
        assert_eq!(signal.classification, Activity::None);
        assert!((signal.total() - 160.0).abs() < 1e-6);
    }

    #[test]
    fn test_noise_floor_ignores_small_diffs() {
        let detector = FrameEventDetector::new(1000.0, 25.0);
        let signal = detector.classify(&solid(64, 36, 20), &solid(64, 36, 0));
        assert_eq!(signal.total(), 0.0);
    }

    #[test]
    fn test_mismatched_sizes_use_overlap() {
        let detector = FrameEventDetector::new(0.0, 0.0);
        let signal = detector.classify(&solid(4, 4, 1), &solid(2, 2, 0));
        assert!((signal.total() - 4.0).abs() < 1e-6);
        assert!((signal.left_magnitude - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_odd_width_middle_column_goes_right() {
        let detector = FrameEventDetector::new(0.0, 0.0);
        let signal = detector.classify(&solid(3, 1, 1), &solid(3, 1, 0));
        assert!((signal.left_magnitude - 1.0).abs() < 1e-6);
        assert!((signal.right_magnitude - 2.0).abs() < 1e-6);
    }
}
