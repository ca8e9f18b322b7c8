// SPDX-License-Identifier: MPL-2.0
//! In-process adapter implementing the [`MediaPlayer`] and [`MediaSeeking`]
//! port traits.
//!
//! [`SimulatedPlayer`] has no decoder: a wall-clock driven transport stands
//! in for the native pipeline. It raises the same events a real pipeline
//! would (surface allocation, open, state changes, frames, end of stream,
//! failures), which makes it suitable for the headless binary and for
//! end-to-end tests.
//!
//! # Sources
//!
//! - `MediaSource::Uri("sim://…")` always opens
//! - `MediaSource::File(path)` opens if `path` exists
//! - anything else fails with an [`EngineFailure`]

use crate::application::port::{
    EngineEventSink, EngineFailure, MediaPlayer, MediaSeeking, MediaSource, PlayerEvent,
};
use crate::domain::{
    Balance, NaturalSize, PlaybackState, PositionFormat, SpeedRatio, SurfaceHandle, Ticks, Volume,
};
use std::cell::Cell;
use std::time::{Duration, Instant};

/// URI scheme accepted by the simulator.
pub const SIMULATED_SCHEME: &str = "sim://";

const ERROR_NOT_FOUND: i32 = -2;
const ERROR_UNSUPPORTED: i32 = -22;

/// Description of the media the simulator pretends to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedMedia {
    pub duration: Duration,
    pub has_video: bool,
    pub natural_size: NaturalSize,
}

impl Default for SimulatedMedia {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(5),
            has_video: true,
            natural_size: NaturalSize::new(1280, 720),
        }
    }
}

/// Wall-clock transport.
///
/// While running, the position advances from `anchor_position` at `rate`
/// times real time since `anchor`.
#[derive(Debug)]
struct TransportClock {
    anchor: Option<Instant>,
    anchor_position: Ticks,
    rate: f64,
}

impl TransportClock {
    fn new() -> Self {
        Self {
            anchor: None,
            anchor_position: Ticks::ZERO,
            rate: 1.0,
        }
    }

    fn is_running(&self) -> bool {
        self.anchor.is_some()
    }

    fn position(&self) -> Ticks {
        match self.anchor {
            Some(anchor) => {
                let elapsed = anchor.elapsed().as_secs_f64() * self.rate;
                Ticks::new(self.anchor_position.value() + Ticks::from_secs_f64(elapsed).value())
            }
            None => self.anchor_position,
        }
    }

    fn start(&mut self) {
        if self.anchor.is_none() {
            self.anchor = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        self.anchor_position = self.position();
        self.anchor = None;
    }

    fn seek(&mut self, position: Ticks) {
        self.anchor_position = position;
        if self.anchor.is_some() {
            self.anchor = Some(Instant::now());
        }
    }

    fn set_rate(&mut self, rate: f64) {
        // Rebase so the position stays continuous across the change.
        let position = self.position();
        self.seek(position);
        self.rate = rate;
    }

    fn reset(&mut self) {
        self.anchor = None;
        self.anchor_position = Ticks::ZERO;
    }
}

/// Clock-driven [`MediaPlayer`] with seeking support.
#[derive(Debug)]
pub struct SimulatedPlayer {
    media: SimulatedMedia,
    sink: Option<EngineEventSink>,
    clock: TransportClock,
    is_open: bool,
    end_reported: Cell<bool>,
    volume: Volume,
    balance: Balance,
    format: PositionFormat,
    surface: Option<SurfaceHandle>,
    next_surface: u64,
}

impl SimulatedPlayer {
    #[must_use]
    pub fn new(media: SimulatedMedia) -> Self {
        Self {
            media,
            sink: None,
            clock: TransportClock::new(),
            is_open: false,
            end_reported: Cell::new(false),
            volume: Volume::default(),
            balance: Balance::default(),
            format: PositionFormat::MediaTime,
            surface: None,
            next_surface: 1,
        }
    }

    fn emit(&self, event: PlayerEvent) {
        if let Some(sink) = &self.sink {
            if !sink.emit(event) {
                tracing::debug!("engine gone, simulated event dropped");
            }
        }
    }

    fn total(&self) -> Ticks {
        if self.is_open {
            Ticks::from_duration(self.media.duration)
        } else {
            Ticks::ZERO
        }
    }

    fn check_source(source: &MediaSource) -> Result<(), EngineFailure> {
        match source {
            MediaSource::Uri(uri) if uri.starts_with(SIMULATED_SCHEME) => Ok(()),
            MediaSource::Uri(uri) => Err(EngineFailure::new(format!(
                "unsupported source scheme: {uri}"
            ))
            .with_code(ERROR_UNSUPPORTED)),
            MediaSource::File(path) if path.exists() => Ok(()),
            MediaSource::File(path) => Err(EngineFailure::new(format!(
                "media not found: {}",
                path.display()
            ))
            .with_code(ERROR_NOT_FOUND)),
        }
    }
}

impl MediaPlayer for SimulatedPlayer {
    fn attach(&mut self, events: EngineEventSink) {
        self.sink = Some(events);
    }

    fn open(&mut self, source: &MediaSource) {
        self.clock.reset();
        self.end_reported.set(false);
        if let Err(failure) = Self::check_source(source) {
            self.is_open = false;
            self.emit(PlayerEvent::Failed(failure));
            return;
        }

        self.is_open = true;
        if self.media.has_video {
            let surface = SurfaceHandle::new(self.next_surface);
            self.next_surface += 1;
            self.surface = Some(surface);
            self.emit(PlayerEvent::NewSurface(surface));
        }
        self.clock.start();
        self.emit(PlayerEvent::Opened);
    }

    fn play(&mut self) -> bool {
        if !self.is_open {
            return false;
        }
        if self.clock.position() >= self.total() {
            return false;
        }
        self.clock.start();
        self.end_reported.set(false);
        self.emit(PlayerEvent::StateChanged(PlaybackState::Play));
        true
    }

    fn pause(&mut self) {
        self.clock.pause();
        if self.is_open {
            self.emit(PlayerEvent::StateChanged(PlaybackState::Pause));
        }
    }

    fn stop(&mut self) {
        self.clock.reset();
        if self.is_open {
            self.emit(PlayerEvent::StateChanged(PlaybackState::Stop));
        }
    }

    fn close(&mut self) {
        let was_open = std::mem::take(&mut self.is_open);
        self.clock.reset();
        if was_open {
            self.emit(PlayerEvent::Closed);
        }
    }

    fn dispose(&mut self) {
        self.surface = None;
    }

    fn volume(&self) -> Volume {
        self.volume
    }

    fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
    }

    fn balance(&self) -> Balance {
        self.balance
    }

    fn set_balance(&mut self, balance: Balance) {
        self.balance = balance;
    }

    fn has_video(&self) -> bool {
        self.is_open && self.media.has_video
    }

    fn natural_size(&self) -> NaturalSize {
        if self.has_video() {
            self.media.natural_size
        } else {
            NaturalSize::default()
        }
    }

    fn seeking(&mut self) -> Option<&mut dyn MediaSeeking> {
        Some(self)
    }
}

impl MediaSeeking for SimulatedPlayer {
    /// Reading the position also renders: each read while running presents
    /// a frame, and reaching the end raises end of stream once.
    fn position(&self) -> Ticks {
        let total = self.total();
        let position = self.clock.position().clamp_to(total);
        if self.is_open && self.clock.is_running() {
            if position >= total {
                if !self.end_reported.replace(true) {
                    self.emit(PlayerEvent::Ended);
                }
            } else if self.surface.is_some() {
                self.emit(PlayerEvent::NewFrame);
            }
        }
        position
    }

    fn set_position(&mut self, position: Ticks) {
        let target = position.clamp_to(self.total());
        self.clock.seek(target);
        if target < self.total() {
            self.end_reported.set(false);
        }
    }

    fn duration(&self) -> Ticks {
        self.total()
    }

    fn rate(&self) -> f64 {
        self.clock.rate
    }

    fn set_rate(&mut self, ratio: SpeedRatio) {
        self.clock.set_rate(ratio.value());
    }

    fn time_format(&self) -> PositionFormat {
        self.format
    }

    fn set_time_format(&mut self, format: PositionFormat) -> bool {
        format == self.format
    }
}
