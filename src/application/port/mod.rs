// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that engine adapters implement.
//! These traits use only domain types, so the control stays independent of
//! any concrete playback pipeline.
//!
//! # Available Ports
//!
//! - [`player`]: Media playback and seeking
//!
//! # Example
//!
//! ```ignore
//! use media_element::application::port::{MediaPlayer, MediaSource};
//!
//! fn start(player: &mut dyn MediaPlayer) -> bool {
//!     player.open(&MediaSource::Uri("sim://demo".into()));
//!     player.play()
//! }
//! ```

pub mod player;

// Re-export main types for convenience
pub use player::{
    EngineEventSink, EngineFailure, MediaPlayer, MediaSeeking, MediaSource, PlayerEvent,
};
