// SPDX-License-Identifier: MPL-2.0
//! Presentation-side seeking state.
//!
//! Seeks run in two phases. The first phase, on the presentation side,
//! writes the target into the shared [`PositionCache`](crate::engine::PositionCache)
//! before anything is posted. The second phase, on the engine thread, moves
//! the native transport and publishes the new position. An end-of-stream
//! event racing with the seek therefore already sees the new target.

use super::events::{EventListeners, MediaEvent};
use super::property::Property;
use crate::config::PlayerConfig;
use crate::domain::{PositionFormat, SpeedRatio, Ticks};
use crate::engine::{EngineDispatcher, SeekSnapshot, SharedPositionCache};

#[derive(Debug)]
pub struct SeekingCore {
    position: Property<Ticks>,
    duration: Ticks,
    current_format: PositionFormat,
    preferred_format: Property<PositionFormat>,
    speed_ratio: Property<SpeedRatio>,
    position_change_was_external: bool,
    cache: SharedPositionCache,
}

impl SeekingCore {
    #[must_use]
    pub fn new(config: &PlayerConfig, cache: SharedPositionCache) -> Self {
        Self {
            position: Property::new("position", config.seeking.position.clamp_to(Ticks::ZERO)),
            duration: Ticks::ZERO,
            current_format: PositionFormat::None,
            preferred_format: Property::new(
                "preferred_position_format",
                config.seeking.preferred_position_format,
            ),
            speed_ratio: Property::new("speed_ratio", config.seeking.speed_ratio),
            position_change_was_external: false,
            cache,
        }
    }

    #[must_use]
    pub fn position(&self) -> Ticks {
        self.position.get()
    }

    #[must_use]
    pub fn duration(&self) -> Ticks {
        self.duration
    }

    #[must_use]
    pub fn current_format(&self) -> PositionFormat {
        self.current_format
    }

    #[must_use]
    pub fn preferred_format(&self) -> PositionFormat {
        self.preferred_format.get()
    }

    #[must_use]
    pub fn speed_ratio(&self) -> SpeedRatio {
        self.speed_ratio.get()
    }

    /// Start position to push when media opens: the current position if it
    /// is past the beginning.
    #[must_use]
    pub fn start_position(&self) -> Option<Ticks> {
        let position = self.position.get();
        (position > Ticks::ZERO).then_some(position)
    }

    /// Seeks to `position`, clamped into the media while it is open.
    pub fn set_position(&mut self, position: Ticks, media_open: bool, engine: &EngineDispatcher) {
        let target = if media_open {
            position.clamp_to(self.duration)
        } else {
            position.clamp_to(Ticks::ZERO)
        };
        let Some(target) = self.position.set(target) else {
            return;
        };
        if engine.is_shutting_down() {
            tracing::debug!("engine shutting down, seek skipped");
            return;
        }
        self.position_change_was_external = true;
        self.cache.set_position(target);
        engine.post(move |worker| worker.seek_to(target));
    }

    pub fn set_preferred_format(&mut self, format: PositionFormat, engine: &EngineDispatcher) {
        if let Some(format) = self.preferred_format.set(format) {
            engine.post(move |worker| worker.negotiate_format(format));
        }
    }

    pub fn set_speed_ratio(&mut self, ratio: SpeedRatio, engine: &EngineDispatcher) {
        if let Some(ratio) = self.speed_ratio.set(ratio) {
            engine.post(move |worker| worker.set_rate(ratio));
        }
    }

    /// Primes the cache for a level push that includes `position`.
    pub(crate) fn prepare_start_position(&self, position: Ticks) {
        self.cache.set_position(position);
    }

    // =========================================================================
    // Engine notifications
    // =========================================================================

    pub(crate) fn on_opened(&mut self, snapshot: SeekSnapshot) {
        self.current_format = snapshot.format;
        self.duration = snapshot.duration;
        let clamped = self.position.get().clamp_to(self.duration);
        if self.position.apply_confirmed(clamped) {
            self.cache.set_position(clamped);
        }
    }

    pub(crate) fn on_position_changed(
        &mut self,
        position: Ticks,
        duration: Ticks,
        events: &mut EventListeners,
    ) {
        self.duration = duration;
        self.position.apply_confirmed(position.clamp_to(duration));
        let was_external = std::mem::take(&mut self.position_change_was_external);
        events.emit(MediaEvent::PositionChanged {
            position: self.position.get(),
            was_external,
        });
    }

    pub(crate) fn on_format_negotiated(&mut self, format: PositionFormat, duration: Ticks) {
        if format != self.preferred_format.get() {
            tracing::debug!(granted = ?format, "preferred position format not granted");
        }
        self.current_format = format;
        self.duration = duration;
    }

    /// Back to an empty session: no duration, position at the start. Nothing
    /// is sent to the engine.
    pub(crate) fn reset(&mut self) {
        self.duration = Ticks::ZERO;
        self.position.apply_confirmed(Ticks::ZERO);
        self.position_change_was_external = false;
        self.cache.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PositionCache;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn core() -> (SeekingCore, SharedPositionCache) {
        let cache = PositionCache::shared();
        (SeekingCore::new(&PlayerConfig::default(), cache.clone()), cache)
    }

    fn recorded(listeners: &mut EventListeners) -> Rc<RefCell<Vec<MediaEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        listeners.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        log
    }

    #[test]
    fn opened_publishes_granted_format_and_duration() {
        let (mut core, _cache) = core();
        core.on_opened(SeekSnapshot {
            duration: Ticks::new(900),
            format: PositionFormat::Frame,
        });
        assert_eq!(core.duration(), Ticks::new(900));
        assert_eq!(core.current_format(), PositionFormat::Frame);
    }

    #[test]
    fn engine_position_is_applied_without_marking_external() {
        let (mut core, _cache) = core();
        let mut listeners = EventListeners::default();
        let log = recorded(&mut listeners);

        core.on_position_changed(Ticks::new(40), Ticks::new(100), &mut listeners);

        assert_eq!(core.position(), Ticks::new(40));
        assert_eq!(
            *log.borrow(),
            vec![MediaEvent::PositionChanged {
                position: Ticks::new(40),
                was_external: false,
            }]
        );
    }

    #[test]
    fn reset_clears_session_and_cache() {
        let (mut core, cache) = core();
        core.on_opened(SeekSnapshot {
            duration: Ticks::new(100),
            format: PositionFormat::MediaTime,
        });
        let mut listeners = EventListeners::default();
        core.on_position_changed(Ticks::new(70), Ticks::new(100), &mut listeners);
        cache.set_position(Ticks::new(70));

        core.reset();

        assert_eq!(core.position(), Ticks::ZERO);
        assert_eq!(core.duration(), Ticks::ZERO);
        assert_eq!(cache.position(), Ticks::ZERO);
        assert!(core.start_position().is_none());
    }

    #[test]
    fn start_position_only_when_positive() {
        let mut config = PlayerConfig::default();
        config.seeking.position = Ticks::new(25);
        let core = SeekingCore::new(&config, PositionCache::shared());
        assert_eq!(core.start_position(), Some(Ticks::new(25)));
    }
}
