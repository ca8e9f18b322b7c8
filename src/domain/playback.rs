// SPDX-License-Identifier: MPL-2.0
//! Playback state and lifecycle state machine.
//!
//! [`PlaybackState`] is both a command (what the control is asked to do) and
//! an observed state (what the engine reports). [`Lifecycle`] is the composed
//! state machine of an open/closed media session:
//!
//! ```text
//!            Opened                  Pause / Stop / Play
//! Closed ──────────────▶ Open-Playing ◀──────────────▶ Open-Paused / Open-Stopped
//!   ▲  ▲                     │  │
//!   │  └──────── Closed ─────┘  │ Failed
//!   │                           ▼
//!   └──────── (re-open) ───── Failed
//! ```

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Requested or observed playback state of a media control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaybackState {
    /// Do nothing. Used as a "no action" behavior in configuration.
    #[default]
    Manual,
    /// Start or resume playback.
    Play,
    /// Pause at the current position.
    Pause,
    /// Stop and rewind to the beginning.
    Stop,
    /// Close the media and release the engine resources.
    Close,
}

impl PlaybackState {
    /// All states, in declaration order.
    pub const ALL: [PlaybackState; 5] = [
        PlaybackState::Manual,
        PlaybackState::Play,
        PlaybackState::Pause,
        PlaybackState::Stop,
        PlaybackState::Close,
    ];

    /// Returns true for the non-action sentinel.
    #[must_use]
    pub fn is_manual(self) -> bool {
        matches!(self, Self::Manual)
    }

    /// Returns the lower-case name used in configuration files and on the CLI.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Close => "close",
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaybackState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        PlaybackState::ALL
            .into_iter()
            .find(|state| state.as_str() == normalized)
            .ok_or_else(|| Error::InvalidState(s.to_string()))
    }
}

impl TryFrom<i32> for PlaybackState {
    type Error = Error;

    /// Converts the wire discriminant used by bindings (0 = Manual … 4 = Close).
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|index| PlaybackState::ALL.get(index).copied())
            .ok_or_else(|| Error::InvalidState(value.to_string()))
    }
}

/// Lifecycle of the media session owned by a control.
///
/// There is no explicit "opening" state: opening is simply `Closed` (or
/// `Failed`) with an open request whose confirmation is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// No media is open. Initial state.
    #[default]
    Closed,
    /// Media is open and the transport is running.
    OpenPlaying,
    /// Media is open and paused (including after a natural end of stream).
    OpenPaused,
    /// Media is open and stopped at the beginning.
    OpenStopped,
    /// The engine reported a failure. Behaves like `Closed` but is reported
    /// distinctly.
    Failed,
}

impl Lifecycle {
    /// Returns true for any `Open-*` state.
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(
            self,
            Self::OpenPlaying | Self::OpenPaused | Self::OpenStopped
        )
    }

    /// Returns true if a new open request is legal from this state.
    #[must_use]
    pub fn can_open(self) -> bool {
        matches!(self, Self::Closed | Self::Failed)
    }

    /// State after a transport command or engine confirmation.
    ///
    /// Transport states only move an open session; a closed or failed
    /// session stays where it is until media is opened again.
    #[must_use]
    pub fn on_transport(self, state: PlaybackState) -> Self {
        if !self.is_open() {
            return self;
        }
        match state {
            PlaybackState::Manual => self,
            PlaybackState::Play => Self::OpenPlaying,
            PlaybackState::Pause => Self::OpenPaused,
            PlaybackState::Stop => Self::OpenStopped,
            PlaybackState::Close => Self::Closed,
        }
    }
}
