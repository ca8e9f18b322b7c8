// SPDX-License-Identifier: MPL-2.0
//! Test utilities: float comparisons and a recording media player.
//!
//! This module re-exports the `approx` crate's assertion macros for float comparison,
//! which properly handle floating-point precision issues that `assert_eq!` cannot.
//!
//! [`RecordingPlayer`] logs every outbound call the control makes and lets a
//! test raise engine events from outside the engine thread through its
//! [`PlayerHandle`].

// Re-export approx macros for convenient use in tests
pub use approx::assert_abs_diff_eq;

use crate::application::port::{
    EngineEventSink, EngineFailure, MediaPlayer, MediaSeeking, MediaSource, PlayerEvent,
};
use crate::config::PlayerConfig;
use crate::domain::{
    Balance, NaturalSize, PositionFormat, SpeedRatio, SurfaceHandle, Ticks, Volume,
};
use crate::element::{MediaElement, MediaEvent};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Upper bound for waiting on the engine in tests.
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Surface handle the recording player allocates for video media.
pub const TEST_SURFACE: SurfaceHandle = SurfaceHandle::new(0xD3D9);

/// Outbound call made by the control on the player.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCall {
    Open(MediaSource),
    Play,
    Pause,
    Stop,
    Close,
    Dispose,
    SetVolume(f64),
    SetBalance(f64),
    SetPosition(Ticks),
    SetRate(f64),
    SetTimeFormat(PositionFormat),
}

/// What the player does when asked to open media.
#[derive(Debug, Clone)]
enum OpenOutcome {
    Opens,
    Fails(EngineFailure),
    Silent,
}

#[derive(Debug)]
struct Shared {
    calls: Vec<PlayerCall>,
    sink: Option<EngineEventSink>,
    open_outcome: OpenOutcome,
    play_result: bool,
    has_video: bool,
    natural_size: NaturalSize,
    native_position: Ticks,
    duration: Ticks,
    format: PositionFormat,
    supported_formats: Vec<PositionFormat>,
    rate: f64,
    volume: Volume,
    balance: Balance,
}

/// Scriptable [`MediaPlayer`] that records every command it receives.
///
/// Queries (`volume`, `position`, `duration`…) are not recorded.
pub struct RecordingPlayer {
    shared: Arc<Mutex<Shared>>,
    seekable: bool,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                calls: Vec::new(),
                sink: None,
                open_outcome: OpenOutcome::Opens,
                play_result: true,
                has_video: false,
                natural_size: NaturalSize::default(),
                native_position: Ticks::ZERO,
                duration: Ticks::ZERO,
                format: PositionFormat::MediaTime,
                supported_formats: vec![
                    PositionFormat::MediaTime,
                    PositionFormat::Frame,
                    PositionFormat::Sample,
                ],
                rate: 1.0,
                volume: Volume::default(),
                balance: Balance::default(),
            })),
            seekable: true,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap()
    }

    pub fn with_video(self, size: NaturalSize) -> Self {
        {
            let mut shared = self.lock();
            shared.has_video = true;
            shared.natural_size = size;
        }
        self
    }

    pub fn with_duration(self, duration: Ticks) -> Self {
        self.lock().duration = duration;
        self
    }

    pub fn with_supported_formats(self, formats: &[PositionFormat]) -> Self {
        self.lock().supported_formats = formats.to_vec();
        self
    }

    pub fn without_seeking(mut self) -> Self {
        self.seekable = false;
        self
    }

    pub fn refusing_play(self) -> Self {
        self.lock().play_result = false;
        self
    }

    pub fn failing_open(self, failure: EngineFailure) -> Self {
        self.lock().open_outcome = OpenOutcome::Fails(failure);
        self
    }

    /// Open requests are recorded but never answered.
    pub fn silent_open(self) -> Self {
        self.lock().open_outcome = OpenOutcome::Silent;
        self
    }

    pub fn handle(&self) -> PlayerHandle {
        PlayerHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Boxes the player into a factory result.
    pub fn boxed(self) -> Option<Box<dyn MediaPlayer>> {
        Some(Box::new(self))
    }

    fn record(&self, call: PlayerCall) {
        self.lock().calls.push(call);
    }

    fn emit(&self, event: PlayerEvent) {
        let sink = self.lock().sink.clone();
        if let Some(sink) = sink {
            sink.emit(event);
        }
    }
}

impl Default for RecordingPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaPlayer for RecordingPlayer {
    fn attach(&mut self, events: EngineEventSink) {
        self.lock().sink = Some(events);
    }

    fn open(&mut self, source: &MediaSource) {
        self.record(PlayerCall::Open(source.clone()));
        let (outcome, has_video) = {
            let shared = self.lock();
            (shared.open_outcome.clone(), shared.has_video)
        };
        match outcome {
            OpenOutcome::Opens => {
                if has_video {
                    self.emit(PlayerEvent::NewSurface(TEST_SURFACE));
                }
                self.emit(PlayerEvent::Opened);
            }
            OpenOutcome::Fails(failure) => self.emit(PlayerEvent::Failed(failure)),
            OpenOutcome::Silent => {}
        }
    }

    fn play(&mut self) -> bool {
        self.record(PlayerCall::Play);
        self.lock().play_result
    }

    fn pause(&mut self) {
        self.record(PlayerCall::Pause);
    }

    fn stop(&mut self) {
        self.record(PlayerCall::Stop);
    }

    fn close(&mut self) {
        self.record(PlayerCall::Close);
        self.emit(PlayerEvent::Closed);
    }

    fn dispose(&mut self) {
        self.record(PlayerCall::Dispose);
    }

    fn volume(&self) -> Volume {
        self.lock().volume
    }

    fn set_volume(&mut self, volume: Volume) {
        self.record(PlayerCall::SetVolume(volume.value()));
        self.lock().volume = volume;
    }

    fn balance(&self) -> Balance {
        self.lock().balance
    }

    fn set_balance(&mut self, balance: Balance) {
        self.record(PlayerCall::SetBalance(balance.value()));
        self.lock().balance = balance;
    }

    fn has_video(&self) -> bool {
        self.lock().has_video
    }

    fn natural_size(&self) -> NaturalSize {
        self.lock().natural_size
    }

    fn seeking(&mut self) -> Option<&mut dyn MediaSeeking> {
        if self.seekable {
            Some(self)
        } else {
            None
        }
    }
}

impl MediaSeeking for RecordingPlayer {
    fn position(&self) -> Ticks {
        self.lock().native_position
    }

    fn set_position(&mut self, position: Ticks) {
        self.record(PlayerCall::SetPosition(position));
        self.lock().native_position = position;
    }

    fn duration(&self) -> Ticks {
        self.lock().duration
    }

    fn rate(&self) -> f64 {
        self.lock().rate
    }

    fn set_rate(&mut self, ratio: SpeedRatio) {
        self.record(PlayerCall::SetRate(ratio.value()));
        self.lock().rate = ratio.value();
    }

    fn time_format(&self) -> PositionFormat {
        self.lock().format
    }

    fn set_time_format(&mut self, format: PositionFormat) -> bool {
        self.record(PlayerCall::SetTimeFormat(format));
        let mut shared = self.lock();
        if shared.supported_formats.contains(&format) {
            shared.format = format;
            true
        } else {
            false
        }
    }
}

/// Test-side view of a [`RecordingPlayer`] living on the engine thread.
#[derive(Clone)]
pub struct PlayerHandle {
    shared: Arc<Mutex<Shared>>,
}

impl PlayerHandle {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<PlayerCall> {
        self.lock().calls.clone()
    }

    pub fn clear(&self) {
        self.lock().calls.clear();
    }

    pub fn count(&self, matches: impl Fn(&PlayerCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|call| matches(call)).count()
    }

    /// Raises an engine event as a native callback would.
    pub fn emit(&self, event: PlayerEvent) -> bool {
        let sink = self.lock().sink.clone();
        sink.is_some_and(|sink| sink.emit(event))
    }

    /// Moves the native transport as playback would, without recording a call.
    pub fn set_native_position(&self, position: Ticks) {
        self.lock().native_position = position;
    }

    pub fn set_play_result(&self, accepted: bool) {
        self.lock().play_result = accepted;
    }
}

/// Configuration with polling effectively disabled, so tests only see the
/// notifications they cause.
pub fn quiet_config() -> PlayerConfig {
    let mut config = PlayerConfig::default();
    config.engine.poll_interval_ms = 3_600_000;
    config.engine.thread_name = "media-engine-test".into();
    config
}

/// Records every event the element raises.
pub fn record_events(element: &mut MediaElement) -> Rc<RefCell<Vec<MediaEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    element.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    log
}
