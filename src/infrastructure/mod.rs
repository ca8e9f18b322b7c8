// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`simulated`]: clock-driven player without a decoder (implements
//!   [`MediaPlayer`] and [`MediaSeeking`])
//!
//! Platform players live outside this crate and plug in through the same
//! traits, constructed by the factory handed to
//! [`MediaElement`](crate::element::MediaElement).
//!
//! [`MediaPlayer`]: crate::application::port::MediaPlayer
//! [`MediaSeeking`]: crate::application::port::MediaSeeking

pub mod simulated;

pub use simulated::{SimulatedMedia, SimulatedPlayer, SIMULATED_SCHEME};
