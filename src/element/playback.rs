// SPDX-License-Identifier: MPL-2.0
//! Presentation-side playback state.
//!
//! [`PlaybackCore`] owns the base properties of the control (transport
//! state, audio levels, video output) and turns commands into engine tasks.
//! Engine notifications are applied here through the `on_*` handlers.

use super::events::{EventListeners, MediaEvent};
use super::property::Property;
use crate::application::port::{EngineFailure, MediaSource};
use crate::config::PlayerConfig;
use crate::domain::{Balance, Lifecycle, NaturalSize, PlaybackState, SurfaceHandle, Volume};
use crate::engine::{EngineDispatcher, OpenedSnapshot};

/// Base state shared by every control.
#[derive(Debug)]
pub struct PlaybackCore {
    state: Property<PlaybackState>,
    is_playing: bool,
    is_media_open: bool,
    lifecycle: Lifecycle,
    volume: Property<Volume>,
    balance: Property<Balance>,
    is_muted: Property<bool>,
    loaded_behavior: PlaybackState,
    unloaded_behavior: PlaybackState,
    has_video: bool,
    natural_size: NaturalSize,
    surface: Option<SurfaceHandle>,
    frames_presented: u64,
    last_failure: Option<EngineFailure>,
    /// Sequence number of the latest transport command.
    command_seq: u64,
    /// Sequence number of the latest pause, stop or close.
    halted_at: u64,
}

impl PlaybackCore {
    #[must_use]
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            state: Property::new("current_state", PlaybackState::Manual),
            is_playing: false,
            is_media_open: false,
            lifecycle: Lifecycle::Closed,
            volume: Property::new("volume", config.audio.volume),
            balance: Property::new("balance", config.audio.balance),
            is_muted: Property::new("is_muted", config.audio.muted),
            loaded_behavior: config.behavior.loaded,
            unloaded_behavior: config.behavior.unloaded,
            has_video: false,
            natural_size: NaturalSize::default(),
            surface: None,
            frames_presented: 0,
            last_failure: None,
            command_seq: 0,
            halted_at: 0,
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    #[must_use]
    pub fn current_state(&self) -> PlaybackState {
        self.state.get()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    #[must_use]
    pub fn is_media_open(&self) -> bool {
        self.is_media_open
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Stored volume. Muting never changes it.
    #[must_use]
    pub fn volume(&self) -> Volume {
        self.volume.get()
    }

    /// Volume the engine actually plays at.
    #[must_use]
    pub fn effective_volume(&self) -> Volume {
        if self.is_muted.get() {
            Volume::SILENT
        } else {
            self.volume.get()
        }
    }

    #[must_use]
    pub fn balance(&self) -> Balance {
        self.balance.get()
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.is_muted.get()
    }

    #[must_use]
    pub fn loaded_behavior(&self) -> PlaybackState {
        self.loaded_behavior
    }

    #[must_use]
    pub fn unloaded_behavior(&self) -> PlaybackState {
        self.unloaded_behavior
    }

    #[must_use]
    pub fn has_video(&self) -> bool {
        self.has_video
    }

    #[must_use]
    pub fn natural_size(&self) -> NaturalSize {
        self.natural_size
    }

    #[must_use]
    pub fn surface(&self) -> Option<SurfaceHandle> {
        self.surface
    }

    #[must_use]
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    #[must_use]
    pub fn last_failure(&self) -> Option<&EngineFailure> {
        self.last_failure.as_ref()
    }

    // =========================================================================
    // Settable properties
    // =========================================================================

    pub fn set_loaded_behavior(&mut self, state: PlaybackState) {
        self.loaded_behavior = state;
    }

    pub fn set_unloaded_behavior(&mut self, state: PlaybackState) {
        self.unloaded_behavior = state;
    }

    /// An audible volume also clears the mute flag; the engine receives a
    /// single volume update either way.
    pub fn set_volume(&mut self, volume: Volume, engine: &EngineDispatcher) {
        let changed = self.volume.set(volume).is_some();
        let unmuted = volume.is_audible() && self.is_muted.get();
        if unmuted {
            self.is_muted.apply_confirmed(false);
        }
        if changed || unmuted {
            self.push_volume(engine);
        }
    }

    pub fn set_balance(&mut self, balance: Balance, engine: &EngineDispatcher) {
        if let Some(balance) = self.balance.set(balance) {
            engine.post(move |worker| worker.player().set_balance(balance));
        }
    }

    pub fn set_muted(&mut self, muted: bool, engine: &EngineDispatcher) {
        if self.is_muted.set(muted).is_some() {
            self.push_volume(engine);
        }
    }

    fn push_volume(&self, engine: &EngineDispatcher) {
        let volume = self.effective_volume();
        engine.post(move |worker| worker.player().set_volume(volume));
    }

    /// Writes the playback state property. A forwarded change runs the
    /// matching transport command.
    pub fn set_playback_state(
        &mut self,
        state: PlaybackState,
        engine: &EngineDispatcher,
        events: &mut EventListeners,
    ) {
        if let Some(state) = self.state.set(state) {
            self.request_state(state, engine, events);
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    pub fn open(&mut self, source: MediaSource, engine: &EngineDispatcher) {
        if !self.lifecycle.can_open() {
            tracing::debug!(lifecycle = ?self.lifecycle, "reopening while media is open");
        }
        self.last_failure = None;
        engine.post(move |worker| worker.open(&source));
    }

    /// Runs the transport command for `state`. `Manual` does nothing.
    pub fn request_state(
        &mut self,
        state: PlaybackState,
        engine: &EngineDispatcher,
        events: &mut EventListeners,
    ) {
        match state {
            PlaybackState::Manual => {}
            PlaybackState::Play => self.play(engine),
            PlaybackState::Pause => self.pause(engine),
            PlaybackState::Stop => self.stop(engine),
            PlaybackState::Close => self.close(engine, events),
        }
    }

    /// Playing is only reported once the engine confirms, and only if no
    /// pause, stop or close was issued after this request.
    pub fn play(&mut self, engine: &EngineDispatcher) {
        let command = self.next_command();
        engine.post(move |worker| worker.play(command));
    }

    pub fn pause(&mut self, engine: &EngineDispatcher) {
        self.halted_at = self.next_command();
        engine.post(|worker| worker.pause());
        self.is_playing = false;
        self.lifecycle = self.lifecycle.on_transport(PlaybackState::Pause);
    }

    pub fn stop(&mut self, engine: &EngineDispatcher) {
        self.halted_at = self.next_command();
        engine.post(|worker| worker.stop());
        self.is_playing = false;
        self.lifecycle = self.lifecycle.on_transport(PlaybackState::Stop);
    }

    /// Releases the surface right away; the engine closes and disposes the
    /// media later, unless it is already shutting down.
    pub fn close(&mut self, engine: &EngineDispatcher, events: &mut EventListeners) {
        self.halted_at = self.next_command();
        self.release_surface(events);
        engine.post(|worker| worker.close_and_dispose());
        self.is_playing = false;
    }

    pub fn toggle_play_pause(
        &mut self,
        engine: &EngineDispatcher,
        events: &mut EventListeners,
    ) {
        let next = if self.is_playing {
            PlaybackState::Pause
        } else {
            PlaybackState::Play
        };
        self.request_state(next, engine, events);
    }

    fn next_command(&mut self) -> u64 {
        self.command_seq += 1;
        self.command_seq
    }

    fn release_surface(&mut self, events: &mut EventListeners) {
        if self.surface.take().is_some() {
            events.emit(MediaEvent::SurfaceChanged(None));
        }
    }

    // =========================================================================
    // Engine notifications
    // =========================================================================

    pub(crate) fn on_opened(&mut self, snapshot: &OpenedSnapshot, events: &mut EventListeners) {
        self.natural_size = snapshot.natural_size;
        self.has_video = snapshot.has_video;
        if !snapshot.has_video {
            self.release_surface(events);
        }
        self.is_media_open = true;
        self.is_playing = true;
        self.lifecycle = Lifecycle::OpenPlaying;
        self.last_failure = None;
        tracing::info!(
            has_video = snapshot.has_video,
            width = snapshot.natural_size.width,
            height = snapshot.natural_size.height,
            "media opened"
        );
        events.emit(MediaEvent::Opened);
    }

    pub(crate) fn on_closed(&mut self, events: &mut EventListeners) {
        self.is_playing = false;
        self.is_media_open = false;
        self.lifecycle = Lifecycle::Closed;
        self.has_video = false;
        self.natural_size = NaturalSize::default();
        events.emit(MediaEvent::Closed);
    }

    pub(crate) fn on_ended(&mut self, events: &mut EventListeners) {
        self.is_playing = false;
        self.lifecycle = self.lifecycle.on_transport(PlaybackState::Pause);
        events.emit(MediaEvent::Ended);
    }

    pub(crate) fn on_failed(&mut self, failure: EngineFailure, events: &mut EventListeners) {
        tracing::warn!(error = %failure, "media failed");
        self.is_playing = false;
        self.is_media_open = false;
        self.lifecycle = Lifecycle::Failed;
        self.last_failure = Some(failure.clone());
        events.emit(MediaEvent::Failed(failure));
    }

    pub(crate) fn on_state_changed(&mut self, state: PlaybackState, events: &mut EventListeners) {
        self.state.apply_confirmed(state);
        self.lifecycle = self.lifecycle.on_transport(state);
        match state {
            PlaybackState::Play => self.is_playing = self.is_media_open,
            PlaybackState::Pause | PlaybackState::Stop => self.is_playing = false,
            PlaybackState::Close => {
                self.is_playing = false;
                self.is_media_open = false;
            }
            PlaybackState::Manual => {}
        }
        events.emit(MediaEvent::StateChanged(state));
    }

    pub(crate) fn on_play_confirmed(&mut self, command: u64) {
        if !self.is_media_open {
            tracing::debug!("play confirmed without open media, ignored");
            return;
        }
        if command < self.halted_at {
            tracing::debug!(
                command,
                halted_at = self.halted_at,
                "superseded play confirmation ignored"
            );
            return;
        }
        self.is_playing = true;
        self.lifecycle = self.lifecycle.on_transport(PlaybackState::Play);
    }

    pub(crate) fn on_new_surface(&mut self, surface: SurfaceHandle, events: &mut EventListeners) {
        self.surface = Some(surface);
        events.emit(MediaEvent::SurfaceChanged(Some(surface)));
    }

    pub(crate) fn on_new_frame(&mut self, events: &mut EventListeners) {
        self.frames_presented += 1;
        events.emit(MediaEvent::FrameReady);
    }
}
