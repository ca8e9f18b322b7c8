// SPDX-License-Identifier: MPL-2.0
//! The media control, as seen from the presentation side.
//!
//! [`MediaElement`] composes a [`PlaybackCore`] with an optional
//! [`SeekingCore`] and owns the engine thread through an
//! [`EngineDispatcher`]. Commands and property writes return immediately;
//! the engine answers with notifications that are applied when the
//! presentation side drains them ([`MediaElement::pump`],
//! [`MediaElement::process_next`], [`MediaElement::settle`]).
//!
//! # Example
//!
//! ```no_run
//! use media_element::application::port::{MediaPlayer, MediaSource};
//! use media_element::config::PlayerConfig;
//! use media_element::element::MediaElement;
//! use media_element::infrastructure::{SimulatedMedia, SimulatedPlayer};
//! use std::time::Duration;
//!
//! # async fn demo() -> media_element::error::Result<()> {
//! let mut element = MediaElement::with_seeking(PlayerConfig::default(), || {
//!     Some(Box::new(SimulatedPlayer::new(SimulatedMedia::default())) as Box<dyn MediaPlayer>)
//! })?;
//! element.subscribe(|event| println!("{event:?}"));
//! element.open(MediaSource::Uri("sim://demo".into()));
//! element.run_for(Duration::from_secs(1)).await;
//! # Ok(())
//! # }
//! ```

pub mod events;
pub mod playback;
pub mod property;
pub mod seeking;

pub use events::{EventListeners, MediaEvent};
pub use playback::PlaybackCore;
pub use property::{EchoGuard, Property};
pub use seeking::SeekingCore;

use crate::application::port::{EngineFailure, MediaPlayer, MediaSource};
use crate::config::PlayerConfig;
use crate::domain::{
    Balance, Lifecycle, NaturalSize, PlaybackState, PositionFormat, SpeedRatio, SurfaceHandle,
    Ticks, Volume,
};
use crate::engine::{
    EngineDispatcher, EngineOptions, LevelPush, Notification, OpenedSnapshot, PositionCache,
};
use crate::error::Result;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};

/// Routed commands understood by the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCommand {
    /// Run the transport command for a state.
    PlayerState(PlaybackState),
    TogglePlayPause,
}

/// A media playback control.
///
/// Not `Send`: it lives on the presentation thread, like the listeners it
/// calls.
pub struct MediaElement {
    playback: PlaybackCore,
    seeking: Option<SeekingCore>,
    engine: EngineDispatcher,
    notifications: mpsc::UnboundedReceiver<Notification>,
    listeners: EventListeners,
    next_barrier: u64,
}

impl MediaElement {
    /// Creates a control without seeking support.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineConstruction`](crate::error::Error::EngineConstruction)
    /// if the engine thread cannot start or `factory` returns `None`.
    pub fn new<F>(config: PlayerConfig, factory: F) -> Result<Self>
    where
        F: FnOnce() -> Option<Box<dyn MediaPlayer>> + Send + 'static,
    {
        Self::build(config, factory, false)
    }

    /// Creates a control with position, duration, rate and format support.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new), and also fails if the player has no
    /// seeking capability.
    pub fn with_seeking<F>(config: PlayerConfig, factory: F) -> Result<Self>
    where
        F: FnOnce() -> Option<Box<dyn MediaPlayer>> + Send + 'static,
    {
        Self::build(config, factory, true)
    }

    fn build<F>(config: PlayerConfig, factory: F, seekable: bool) -> Result<Self>
    where
        F: FnOnce() -> Option<Box<dyn MediaPlayer>> + Send + 'static,
    {
        let cache = PositionCache::shared();
        let (notify_tx, notifications) = mpsc::unbounded_channel();
        let options = EngineOptions {
            thread_name: config.engine.thread_name.clone(),
            poll_interval: config.engine.poll_interval(),
            require_seeking: seekable,
        };
        let engine = EngineDispatcher::spawn(factory, options, cache.clone(), notify_tx)?;

        let element = Self {
            playback: PlaybackCore::new(&config),
            seeking: seekable.then(|| SeekingCore::new(&config, cache)),
            engine,
            notifications,
            listeners: EventListeners::default(),
            next_barrier: 0,
        };
        element.push_initial_values();
        Ok(element)
    }

    /// The presentation side is authoritative for levels at start-up.
    fn push_initial_values(&self) {
        let levels = self.prepare_level_push();
        let format = self.seeking.as_ref().map(SeekingCore::preferred_format);
        self.engine.post(move |worker| {
            worker.apply_levels(levels);
            if let Some(format) = format {
                worker.negotiate_format(format);
            }
        });
    }

    /// Builds the level push, priming the cache with the start position it
    /// carries.
    fn prepare_level_push(&self) -> LevelPush {
        let position = self.seeking.as_ref().and_then(SeekingCore::start_position);
        if let (Some(seeking), Some(position)) = (&self.seeking, position) {
            seeking.prepare_start_position(position);
        }
        LevelPush {
            volume: self.playback.effective_volume(),
            balance: self.playback.balance(),
            speed_ratio: self.seeking.as_ref().map(SeekingCore::speed_ratio),
            position,
        }
    }

    // =========================================================================
    // Observable properties
    // =========================================================================

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    #[must_use]
    pub fn is_media_open(&self) -> bool {
        self.playback.is_media_open()
    }

    #[must_use]
    pub fn current_state(&self) -> PlaybackState {
        self.playback.current_state()
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.playback.lifecycle()
    }

    #[must_use]
    pub fn last_failure(&self) -> Option<&EngineFailure> {
        self.playback.last_failure()
    }

    #[must_use]
    pub fn volume(&self) -> Volume {
        self.playback.volume()
    }

    #[must_use]
    pub fn balance(&self) -> Balance {
        self.playback.balance()
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.playback.is_muted()
    }

    #[must_use]
    pub fn loaded_behavior(&self) -> PlaybackState {
        self.playback.loaded_behavior()
    }

    #[must_use]
    pub fn unloaded_behavior(&self) -> PlaybackState {
        self.playback.unloaded_behavior()
    }

    #[must_use]
    pub fn has_video(&self) -> bool {
        self.playback.has_video()
    }

    #[must_use]
    pub fn natural_size(&self) -> NaturalSize {
        self.playback.natural_size()
    }

    #[must_use]
    pub fn surface(&self) -> Option<SurfaceHandle> {
        self.playback.surface()
    }

    #[must_use]
    pub fn frames_presented(&self) -> u64 {
        self.playback.frames_presented()
    }

    #[must_use]
    pub fn is_seekable(&self) -> bool {
        self.seeking.is_some()
    }

    /// Seeking state, for controls created with [`with_seeking`](Self::with_seeking).
    #[must_use]
    pub fn seeking(&self) -> Option<&SeekingCore> {
        self.seeking.as_ref()
    }

    #[must_use]
    pub fn position(&self) -> Ticks {
        self.seeking.as_ref().map_or(Ticks::ZERO, SeekingCore::position)
    }

    #[must_use]
    pub fn duration(&self) -> Ticks {
        self.seeking.as_ref().map_or(Ticks::ZERO, SeekingCore::duration)
    }

    #[must_use]
    pub fn current_position_format(&self) -> PositionFormat {
        self.seeking
            .as_ref()
            .map_or(PositionFormat::None, SeekingCore::current_format)
    }

    #[must_use]
    pub fn preferred_position_format(&self) -> PositionFormat {
        self.seeking
            .as_ref()
            .map_or(PositionFormat::None, SeekingCore::preferred_format)
    }

    #[must_use]
    pub fn speed_ratio(&self) -> SpeedRatio {
        self.seeking
            .as_ref()
            .map_or(SpeedRatio::NORMAL, SeekingCore::speed_ratio)
    }

    // =========================================================================
    // Settable properties
    // =========================================================================

    pub fn set_loaded_behavior(&mut self, state: PlaybackState) {
        self.playback.set_loaded_behavior(state);
    }

    pub fn set_unloaded_behavior(&mut self, state: PlaybackState) {
        self.playback.set_unloaded_behavior(state);
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.playback.set_volume(Volume::new(volume), &self.engine);
    }

    pub fn set_balance(&mut self, balance: f64) {
        self.playback.set_balance(Balance::new(balance), &self.engine);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.playback.set_muted(muted, &self.engine);
    }

    pub fn set_playback_state(&mut self, state: PlaybackState) {
        self.playback
            .set_playback_state(state, &self.engine, &mut self.listeners);
    }

    /// Seeks. Ignored by controls without seeking support.
    pub fn set_position(&mut self, position: Ticks) {
        let media_open = self.playback.is_media_open();
        match self.seeking.as_mut() {
            Some(seeking) => seeking.set_position(position, media_open, &self.engine),
            None => tracing::debug!("control cannot seek, position ignored"),
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidSpeedRatio`](crate::error::Error::InvalidSpeedRatio)
    /// if `ratio` is not finite and strictly positive.
    pub fn set_speed_ratio(&mut self, ratio: f64) -> Result<()> {
        let ratio = SpeedRatio::new(ratio)?;
        match self.seeking.as_mut() {
            Some(seeking) => seeking.set_speed_ratio(ratio, &self.engine),
            None => tracing::debug!("control cannot seek, speed ratio ignored"),
        }
        Ok(())
    }

    pub fn set_preferred_position_format(&mut self, format: PositionFormat) {
        match self.seeking.as_mut() {
            Some(seeking) => seeking.set_preferred_format(format, &self.engine),
            None => tracing::debug!("control cannot seek, position format ignored"),
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    pub fn open(&mut self, source: MediaSource) {
        self.playback.open(source, &self.engine);
    }

    pub fn play(&mut self) {
        self.playback.play(&self.engine);
    }

    pub fn pause(&mut self) {
        self.playback.pause(&self.engine);
    }

    pub fn stop(&mut self) {
        self.playback.stop(&self.engine);
    }

    pub fn close(&mut self) {
        self.playback.close(&self.engine, &mut self.listeners);
    }

    pub fn toggle_play_pause(&mut self) {
        self.playback
            .toggle_play_pause(&self.engine, &mut self.listeners);
    }

    /// Runs the transport command for `state`; `Manual` does nothing.
    pub fn request_state(&mut self, state: PlaybackState) {
        self.playback
            .request_state(state, &self.engine, &mut self.listeners);
    }

    /// [`request_state`](Self::request_state) for a raw discriminant coming
    /// from a binding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`](crate::error::Error::InvalidState) if
    /// `raw` is not a playback state.
    pub fn request_state_raw(&mut self, raw: i32) -> Result<()> {
        let state = PlaybackState::try_from(raw)?;
        self.request_state(state);
        Ok(())
    }

    pub fn execute(&mut self, command: MediaCommand) {
        match command {
            MediaCommand::PlayerState(state) => self.request_state(state),
            MediaCommand::TogglePlayPause => self.toggle_play_pause(),
        }
    }

    #[must_use]
    pub fn can_execute(&self, _command: MediaCommand) -> bool {
        true
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&MediaEvent) + 'static) {
        self.listeners.subscribe(listener);
    }

    // =========================================================================
    // Host hooks
    // =========================================================================

    pub fn on_load(&mut self) {
        self.request_state(self.playback.loaded_behavior());
    }

    pub fn on_unload(&mut self) {
        self.request_state(self.playback.unloaded_behavior());
    }

    pub fn on_owning_window_closed(&mut self) {
        self.request_state(self.playback.unloaded_behavior());
    }

    // =========================================================================
    // Engine lifetime
    // =========================================================================

    #[must_use]
    pub fn is_engine_shutting_down(&self) -> bool {
        self.engine.is_shutting_down()
    }

    /// Stops posting to the engine. Queued work still runs.
    pub fn begin_shutdown(&self) {
        self.engine.begin_shutdown();
    }

    /// Shuts the engine down, waits for its thread, then applies the
    /// notifications it left behind.
    pub fn shutdown(&mut self) {
        self.engine.shutdown();
        self.pump();
    }

    #[cfg(test)]
    pub(crate) fn dispatcher(&self) -> &EngineDispatcher {
        &self.engine
    }

    // =========================================================================
    // Notification processing
    // =========================================================================

    /// Applies every notification already received, without waiting.
    ///
    /// Returns the number of notifications applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(notification) = self.notifications.try_recv() {
            if self.apply(notification) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the next notification and applies it.
    ///
    /// Returns `false` once the engine thread has exited.
    pub async fn process_next(&mut self) -> bool {
        match self.notifications.recv().await {
            Some(notification) => {
                self.apply(notification);
                true
            }
            None => false,
        }
    }

    /// Applies notifications as they arrive for `span`.
    pub async fn run_for(&mut self, span: Duration) {
        let deadline = Instant::now() + span;
        while let Ok(Some(notification)) =
            time::timeout_at(deadline, self.notifications.recv()).await
        {
            self.apply(notification);
        }
    }

    /// Round-trips markers through the engine queue until a round trip
    /// brings back nothing else.
    ///
    /// Returns `false` if `timeout` elapsed first or the engine is gone.
    pub async fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let marker = self.next_barrier;
            self.next_barrier += 1;
            if !self
                .engine
                .post(move |worker| worker.notify(Notification::Barrier(marker)))
            {
                self.pump();
                return false;
            }

            let mut applied = 0;
            loop {
                match time::timeout_at(deadline, self.notifications.recv()).await {
                    Ok(Some(Notification::Barrier(seen))) if seen == marker => break,
                    Ok(Some(notification)) => {
                        if self.apply(notification) {
                            applied += 1;
                        }
                    }
                    Ok(None) | Err(_) => return false,
                }
            }
            if applied == 0 {
                return true;
            }
        }
    }

    /// Returns `false` for markers, which carry no state.
    fn apply(&mut self, notification: Notification) -> bool {
        match notification {
            Notification::Opened(snapshot) => self.on_opened(snapshot),
            Notification::Closed => {
                if let Some(seeking) = self.seeking.as_mut() {
                    seeking.reset();
                }
                self.playback.on_closed(&mut self.listeners);
            }
            Notification::Ended => self.playback.on_ended(&mut self.listeners),
            Notification::Failed(failure) => {
                if let Some(seeking) = self.seeking.as_mut() {
                    seeking.reset();
                }
                self.playback.on_failed(failure, &mut self.listeners);
            }
            Notification::StateChanged(state) => {
                self.playback.on_state_changed(state, &mut self.listeners);
            }
            Notification::PlayConfirmed(command) => self.playback.on_play_confirmed(command),
            Notification::PositionChanged { position, duration } => {
                if let Some(seeking) = self.seeking.as_mut() {
                    seeking.on_position_changed(position, duration, &mut self.listeners);
                }
            }
            Notification::FormatNegotiated { format, duration } => {
                if let Some(seeking) = self.seeking.as_mut() {
                    seeking.on_format_negotiated(format, duration);
                }
            }
            Notification::NewFrame => self.playback.on_new_frame(&mut self.listeners),
            Notification::NewSurface(surface) => {
                self.playback.on_new_surface(surface, &mut self.listeners);
            }
            Notification::Barrier(_) => return false,
        }
        true
    }

    fn on_opened(&mut self, snapshot: OpenedSnapshot) {
        if let (Some(seeking), Some(seek)) = (self.seeking.as_mut(), snapshot.seeking) {
            seeking.on_opened(seek);
        }
        let levels = self.prepare_level_push();
        self.engine.post(move |worker| worker.apply_levels(levels));
        self.playback.on_opened(&snapshot, &mut self.listeners);
    }
}
