// SPDX-License-Identifier: MPL-2.0
//! Messages posted from the engine thread to the presentation side.

use crate::application::port::EngineFailure;
use crate::domain::{NaturalSize, PlaybackState, PositionFormat, SurfaceHandle, Ticks};

/// Engine state captured on the engine thread when media opens.
///
/// Everything the presentation side needs is read in one go so that a single
/// hop carries a consistent snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenedSnapshot {
    pub has_video: bool,
    pub natural_size: NaturalSize,
    /// Present only for seeking controls.
    pub seeking: Option<SeekSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekSnapshot {
    pub duration: Ticks,
    pub format: PositionFormat,
}

/// Engine → presentation message.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Opened(OpenedSnapshot),
    Closed,
    Ended,
    Failed(EngineFailure),
    StateChanged(PlaybackState),
    /// The transport accepted the play request with this command number.
    PlayConfirmed(u64),
    /// The engine-side position changed (poll, seek, stop or rewind).
    PositionChanged {
        position: Ticks,
        duration: Ticks,
    },
    /// Result of a format negotiation, as granted by the engine.
    FormatNegotiated {
        format: PositionFormat,
        duration: Ticks,
    },
    NewFrame,
    NewSurface(SurfaceHandle),
    /// Round-trip marker used to wait for the engine queue to drain.
    Barrier(u64),
}
