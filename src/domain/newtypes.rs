// SPDX-License-Identifier: MPL-2.0
//! Playback newtypes.
//!
//! Type-safe wrappers for transport and audio values, ensuring they are
//! always within valid ranges.

use crate::config::defaults::{
    DEFAULT_BALANCE, DEFAULT_SPEED_RATIO, DEFAULT_VOLUME, MAX_BALANCE, MAX_VOLUME, MIN_BALANCE,
    MIN_VOLUME, TICKS_PER_SECOND,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// =============================================================================
// Ticks
// =============================================================================

/// Transport position or duration in 100-nanosecond units.
///
/// When the engine runs in a non-time position format (frames, bytes…) the
/// value is expressed in that unit instead; the conversions to [`Duration`]
/// are only meaningful for [`PositionFormat::MediaTime`](super::PositionFormat).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Ticks(i64);

impl Ticks {
    /// The beginning of the media.
    pub const ZERO: Ticks = Ticks(0);

    #[must_use]
    pub const fn new(ticks: i64) -> Self {
        Self(ticks)
    }

    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Converts a wall-clock duration, saturating at `i64::MAX` ticks.
    #[must_use]
    pub fn from_duration(duration: Duration) -> Self {
        let ticks = duration.as_nanos() / 100;
        Self(i64::try_from(ticks).unwrap_or(i64::MAX))
    }

    /// Converts to a wall-clock duration. Negative values map to zero.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        let ticks = u64::try_from(self.0).unwrap_or(0);
        Duration::from_nanos(ticks.saturating_mul(100))
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_secs_f64(secs: f64) -> Self {
        Self((secs * TICKS_PER_SECOND as f64).round() as i64)
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / TICKS_PER_SECOND as f64
    }

    /// Clamps into `[0, duration]`. A zero duration only clamps negatives.
    #[must_use]
    pub fn clamp_to(self, duration: Ticks) -> Self {
        if duration.0 <= 0 {
            return Self(self.0.max(0));
        }
        Self(self.0.clamp(0, duration.0))
    }
}

impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}

// =============================================================================
// Volume
// =============================================================================

/// Audio volume, guaranteed to be within `[0, 1]`.
///
/// Full volume is 1, and 0 is silence.
///
/// # Example
///
/// ```
/// use media_element::domain::Volume;
///
/// assert_eq!(Volume::new(0.5).value(), 0.5);
/// assert_eq!(Volume::new(2.0).value(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Volume(f64);

impl Volume {
    /// Silence.
    pub const SILENT: Volume = Volume(MIN_VOLUME);

    /// Creates a new volume level, clamping to valid range. NaN maps to silence.
    #[must_use]
    pub fn new(volume: f64) -> Self {
        if volume.is_nan() {
            return Self::SILENT;
        }
        Self(volume.clamp(MIN_VOLUME, MAX_VOLUME))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns true if any sound would be produced at this level.
    #[must_use]
    pub fn is_audible(self) -> bool {
        self.0 > MIN_VOLUME
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(DEFAULT_VOLUME)
    }
}

impl From<f64> for Volume {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Volume> for f64 {
    fn from(volume: Volume) -> Self {
        volume.0
    }
}

// =============================================================================
// Balance
// =============================================================================

/// Stereo balance within `[-1, 1]`.
///
/// -1 silences the right channel, 1 silences the left channel and 0 keeps
/// both channels at full volume.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Balance(f64);

impl Balance {
    /// Both channels at full volume.
    pub const CENTER: Balance = Balance(DEFAULT_BALANCE);

    /// Creates a new balance, clamping to valid range. NaN maps to center.
    #[must_use]
    pub fn new(balance: f64) -> Self {
        if balance.is_nan() {
            return Self::CENTER;
        }
        Self(balance.clamp(MIN_BALANCE, MAX_BALANCE))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Balance {
    fn default() -> Self {
        Self::CENTER
    }
}

impl From<f64> for Balance {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Balance> for f64 {
    fn from(balance: Balance) -> Self {
        balance.0
    }
}

// =============================================================================
// SpeedRatio
// =============================================================================

/// Playback rate multiplier. Always finite and strictly positive.
///
/// No upper bound is enforced here: the engine decides which rates it can
/// honor and reports a failure if it cannot.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SpeedRatio(f64);

impl SpeedRatio {
    /// Normal speed.
    pub const NORMAL: SpeedRatio = SpeedRatio(DEFAULT_SPEED_RATIO);

    /// # Errors
    ///
    /// Returns [`Error::InvalidSpeedRatio`] if `ratio` is not finite or not
    /// strictly positive.
    pub fn new(ratio: f64) -> Result<Self> {
        if ratio.is_finite() && ratio > 0.0 {
            Ok(Self(ratio))
        } else {
            Err(Error::InvalidSpeedRatio(ratio))
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for SpeedRatio {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl TryFrom<f64> for SpeedRatio {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SpeedRatio> for f64 {
    fn from(ratio: SpeedRatio) -> Self {
        ratio.0
    }
}

// =============================================================================
// Video output
// =============================================================================

/// Natural (unscaled) dimensions of the video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NaturalSize {
    pub width: u32,
    pub height: u32,
}

impl NaturalSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Opaque handle to a render surface allocated by the engine.
///
/// The core never dereferences it; it only forwards it to the presentation
/// layer or releases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(u64);

impl SurfaceHandle {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    #[test]
    fn ticks_round_trip_through_duration() {
        let ticks = Ticks::from_duration(Duration::from_millis(1500));
        assert_eq!(ticks.value(), 15_000_000);
        assert_eq!(ticks.as_duration(), Duration::from_millis(1500));
    }

    #[test]
    fn negative_ticks_map_to_zero_duration() {
        assert_eq!(Ticks::new(-5).as_duration(), Duration::ZERO);
    }

    #[test]
    fn ticks_seconds_conversion() {
        assert_abs_diff_eq!(Ticks::new(25_000_000).as_secs_f64(), 2.5);
        assert_eq!(Ticks::from_secs_f64(0.25).value(), 2_500_000);
    }

    #[test]
    fn clamp_to_keeps_position_inside_media() {
        let duration = Ticks::new(100);
        assert_eq!(Ticks::new(150).clamp_to(duration), duration);
        assert_eq!(Ticks::new(-3).clamp_to(duration), Ticks::ZERO);
        assert_eq!(Ticks::new(42).clamp_to(duration), Ticks::new(42));
        // Unknown duration: only negatives are clamped.
        assert_eq!(Ticks::new(150).clamp_to(Ticks::ZERO), Ticks::new(150));
    }

    #[test]
    fn volume_clamps_to_unit_range() {
        assert_abs_diff_eq!(Volume::new(-0.5).value(), 0.0);
        assert_abs_diff_eq!(Volume::new(1.5).value(), 1.0);
        assert_abs_diff_eq!(Volume::new(f64::NAN).value(), 0.0);
        assert_abs_diff_eq!(Volume::default().value(), 1.0);
    }

    #[test]
    fn volume_audibility() {
        assert!(!Volume::SILENT.is_audible());
        assert!(Volume::new(0.01).is_audible());
    }

    #[test]
    fn balance_clamps_to_range() {
        assert_abs_diff_eq!(Balance::new(-3.0).value(), -1.0);
        assert_abs_diff_eq!(Balance::new(3.0).value(), 1.0);
        assert_abs_diff_eq!(Balance::default().value(), 0.0);
    }

    #[test]
    fn speed_ratio_rejects_non_positive_values() {
        assert!(SpeedRatio::new(0.5).is_ok());
        assert!(matches!(
            SpeedRatio::new(0.0),
            Err(Error::InvalidSpeedRatio(_))
        ));
        assert!(SpeedRatio::new(-1.0).is_err());
        assert!(SpeedRatio::new(f64::INFINITY).is_err());
        assert_abs_diff_eq!(SpeedRatio::default().value(), 1.0);
    }

    #[test]
    fn natural_size_emptiness() {
        assert!(NaturalSize::default().is_empty());
        assert!(!NaturalSize::new(1920, 1080).is_empty());
    }
}
