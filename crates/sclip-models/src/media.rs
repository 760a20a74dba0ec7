//! Probed media properties.

use serde::{Deserialize, Serialize};

/// Properties of a video input, as reported by the prober.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// Duration in seconds
    pub duration: f64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Frame rate (fps)
    pub frame_rate: f64,
}

/// Parse a frame rate string such as `"30000/1001"` or `"29.97"`.
///
/// Rational strings are split on `/` and divided explicitly. Returns `None`
/// for a zero denominator, non-numeric parts or a non-positive result.
pub fn parse_frame_rate(s: &str) -> Option<f64> {
    let s = s.trim();
    let fps = match s.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => s.parse().ok()?,
    };

    (fps.is_finite() && fps > 0.0).then_some(fps)
}
