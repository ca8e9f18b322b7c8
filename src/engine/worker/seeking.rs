// SPDX-License-Identifier: MPL-2.0
//! Seeking operations of the engine worker.
//!
//! Every operation is a no-op on a player without the seeking capability.

use super::EngineWorker;
use crate::domain::{PositionFormat, SpeedRatio, Ticks};
use crate::engine::notification::{Notification, SeekSnapshot};

impl EngineWorker {
    /// Reads duration and format for the opened snapshot and primes the
    /// cached duration.
    pub(super) fn seek_snapshot(&mut self) -> Option<SeekSnapshot> {
        if !self.seeking_enabled {
            return None;
        }
        let seeking = self.player.seeking()?;
        let snapshot = SeekSnapshot {
            duration: seeking.duration(),
            format: seeking.time_format(),
        };
        self.cache.set_duration(snapshot.duration);
        Some(snapshot)
    }

    /// Second phase of a seek: moves the native transport and publishes the
    /// new position.
    pub(crate) fn seek_to(&mut self, position: Ticks) {
        let Some(seeking) = self.player.seeking() else {
            return;
        };
        seeking.set_position(position);
        self.cache.set_position(position);
        self.publish_position();
    }

    pub(crate) fn set_rate(&mut self, ratio: SpeedRatio) {
        if let Some(seeking) = self.player.seeking() {
            seeking.set_rate(ratio);
        }
    }

    /// Requests `preferred` and publishes whatever format the engine granted,
    /// with the duration expressed in it.
    pub(crate) fn negotiate_format(&mut self, preferred: PositionFormat) {
        let Some(seeking) = self.player.seeking() else {
            return;
        };
        if !seeking.set_time_format(preferred) {
            tracing::debug!(?preferred, "engine kept its position format");
        }
        let format = seeking.time_format();
        let duration = seeking.duration();
        self.cache.set_duration(duration);
        self.notify(Notification::FormatNegotiated { format, duration });
    }

    /// Timer-driven poll of the native position.
    ///
    /// Publishes only when the native position moved away from the cache.
    pub(crate) fn poll_position(&mut self) {
        if !self.seeking_enabled || !self.media_open {
            return;
        }
        let Some(seeking) = self.player.seeking() else {
            return;
        };
        let polled = seeking.position();
        if polled != self.cache.position() {
            self.cache.set_position(polled);
            self.publish_position();
        }
    }

    pub(super) fn rewind_if_at_end(&mut self) {
        if self.cache.is_at_end() {
            tracing::debug!("transport at end of media, replaying from start");
            self.seek_to(Ticks::ZERO);
        }
    }

    /// End of stream leaves the transport paused on the last frame, unless a
    /// seek already moved the cached position away from the end.
    pub(super) fn pause_if_at_end(&mut self) {
        if self.cache.is_at_end() {
            self.player.pause();
        }
    }

    fn publish_position(&self) {
        self.notify(Notification::PositionChanged {
            position: self.cache.position(),
            duration: self.cache.duration(),
        });
    }
}
