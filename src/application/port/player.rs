// SPDX-License-Identifier: MPL-2.0
//! Media engine port definition.
//!
//! This module defines the [`MediaPlayer`] trait wrapping a native playback
//! pipeline, and the optional [`MediaSeeking`] capability. Adapters over a
//! real pipeline (or the in-process simulator) implement these traits.
//!
//! # Design Notes
//!
//! - The player is **thread-affine**: it is created by a factory running on
//!   the engine thread and never leaves it, so it is not required to be `Send`
//! - All methods are synchronous; the control never calls them from the
//!   presentation thread
//! - Asynchronous engine events are raised through the [`EngineEventSink`]
//!   handed to [`MediaPlayer::attach`]; they are queued and handled on the
//!   engine thread in the order they were emitted
//! - Seeking is a capability, not a subtype: a player exposes it through
//!   [`MediaPlayer::seeking`]

use crate::domain::{
    Balance, NaturalSize, PlaybackState, PositionFormat, SpeedRatio, SurfaceHandle, Ticks, Volume,
};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

// =============================================================================
// Sources and failures
// =============================================================================

/// Media to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// A local file.
    File(PathBuf),
    /// Any URI the adapter understands.
    Uri(String),
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSource::File(path) => write!(f, "{}", path.display()),
            MediaSource::Uri(uri) => f.write_str(uri),
        }
    }
}

/// Runtime failure reported by the native pipeline (codec, source, device…).
///
/// Carried verbatim to the presentation layer; it is the only channel for
/// diagnostic detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineFailure {
    /// Human-readable diagnostic from the pipeline.
    pub message: String,
    /// Native error code, when the pipeline provides one.
    pub code: Option<i32>,
}

impl EngineFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }
}

// =============================================================================
// Events
// =============================================================================

/// Asynchronous notifications raised by the native pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Media was opened successfully and playback started.
    Opened,
    /// Media was closed.
    Closed,
    /// Playback reached the end of the stream.
    Ended,
    /// The pipeline failed; the payload carries the native diagnostic.
    Failed(EngineFailure),
    /// The transport changed state on its own or confirmed a command.
    StateChanged(PlaybackState),
    /// A new video frame was rendered to the current surface.
    NewFrame,
    /// A new render surface was allocated.
    NewSurface(SurfaceHandle),
}

/// Handle through which an adapter raises [`PlayerEvent`]s.
///
/// Cloneable and usable from any thread (native callback threads included);
/// every event is delivered to the engine thread.
#[derive(Clone)]
pub struct EngineEventSink {
    emit: Arc<dyn Fn(PlayerEvent) -> bool + Send + Sync>,
}

impl EngineEventSink {
    pub fn new(emit: impl Fn(PlayerEvent) -> bool + Send + Sync + 'static) -> Self {
        Self {
            emit: Arc::new(emit),
        }
    }

    /// Queues an event for the engine thread.
    ///
    /// Returns `false` if the engine thread has already terminated.
    pub fn emit(&self, event: PlayerEvent) -> bool {
        (self.emit)(event)
    }
}

impl fmt::Debug for EngineEventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineEventSink").finish_non_exhaustive()
    }
}

// =============================================================================
// MediaPlayer Trait
// =============================================================================

/// Port for the native playback pipeline.
///
/// # Lifecycle
///
/// 1. The factory creates the player on the engine thread
/// 2. [`attach`](Self::attach) hands it the event sink
/// 3. [`open`](Self::open) starts loading; the player later raises
///    [`PlayerEvent::Opened`] or [`PlayerEvent::Failed`]
/// 4. Transport calls drive playback
/// 5. [`close`](Self::close) then [`dispose`](Self::dispose) release the
///    native resources of the current media; the player may be opened again
pub trait MediaPlayer {
    /// Receives the sink used to raise asynchronous events.
    fn attach(&mut self, events: EngineEventSink);

    /// Starts opening `source`. Completion is reported through events.
    fn open(&mut self, source: &MediaSource);

    /// Starts or resumes playback. Returns `true` if the transport accepted it.
    fn play(&mut self) -> bool;

    fn pause(&mut self);

    fn stop(&mut self);

    fn close(&mut self);

    /// Releases the native resources held for the current media.
    fn dispose(&mut self);

    fn volume(&self) -> Volume;

    fn set_volume(&mut self, volume: Volume);

    fn balance(&self) -> Balance;

    fn set_balance(&mut self, balance: Balance);

    /// Whether the open media has a video stream.
    fn has_video(&self) -> bool;

    /// Natural size of the video stream, zero without video.
    fn natural_size(&self) -> NaturalSize;

    /// The seeking capability, if this player has one.
    fn seeking(&mut self) -> Option<&mut dyn MediaSeeking> {
        None
    }
}

// =============================================================================
// MediaSeeking Trait
// =============================================================================

/// Seeking capability of a [`MediaPlayer`].
///
/// Positions and durations are expressed in the current
/// [`time_format`](Self::time_format).
pub trait MediaSeeking {
    /// Live transport position, read from the native pipeline.
    fn position(&self) -> Ticks;

    fn set_position(&mut self, position: Ticks);

    fn duration(&self) -> Ticks;

    fn rate(&self) -> f64;

    fn set_rate(&mut self, ratio: SpeedRatio);

    fn time_format(&self) -> PositionFormat;

    /// Requests a time format. Returns `false` if the pipeline keeps its
    /// current format.
    fn set_time_format(&mut self, format: PositionFormat) -> bool;
}
