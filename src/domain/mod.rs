// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Playback values and state machines.
//!
//! This module contains pure value types shared by the presentation side and
//! the engine thread. Nothing here talks to an engine or spawns threads.
//!
//! # Modules
//!
//! - [`playback`]: Playback state and session lifecycle
//!   ([`PlaybackState`](playback::PlaybackState), [`Lifecycle`](playback::Lifecycle))
//! - [`newtypes`]: Clamped transport and audio values ([`Ticks`](newtypes::Ticks),
//!   [`Volume`](newtypes::Volume), [`Balance`](newtypes::Balance),
//!   [`SpeedRatio`](newtypes::SpeedRatio))
//! - [`position`]: Position formats ([`PositionFormat`](position::PositionFormat))

pub mod newtypes;
pub mod playback;
pub mod position;

pub use newtypes::{Balance, NaturalSize, SpeedRatio, SurfaceHandle, Ticks, Volume};
pub use playback::{Lifecycle, PlaybackState};
pub use position::PositionFormat;
