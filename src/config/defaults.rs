// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Time**: Tick resolution
//! - **Audio**: Volume and balance bounds
//! - **Seeking**: Playback rate
//! - **Engine**: Engine thread naming and position polling

// ==========================================================================
// Time
// ==========================================================================

/// Number of 100-nanosecond ticks per second.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

// ==========================================================================
// Audio Defaults
// ==========================================================================

/// Default playback volume (full volume).
pub const DEFAULT_VOLUME: f64 = 1.0;

/// Minimum volume level (silence).
pub const MIN_VOLUME: f64 = 0.0;

/// Maximum volume level.
pub const MAX_VOLUME: f64 = 1.0;

/// Default stereo balance (centered).
pub const DEFAULT_BALANCE: f64 = 0.0;

/// Right channel silent.
pub const MIN_BALANCE: f64 = -1.0;

/// Left channel silent.
pub const MAX_BALANCE: f64 = 1.0;

// ==========================================================================
// Seeking Defaults
// ==========================================================================

/// Default playback rate.
pub const DEFAULT_SPEED_RATIO: f64 = 1.0;

// ==========================================================================
// Engine Defaults
// ==========================================================================

/// Default interval between two native position polls (milliseconds).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Shortest accepted polling interval (milliseconds).
pub const MIN_POLL_INTERVAL_MS: u64 = 10;

/// Default name of the dedicated engine thread.
pub const DEFAULT_ENGINE_THREAD_NAME: &str = "media-engine";
