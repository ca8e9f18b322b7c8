// SPDX-License-Identifier: MPL-2.0
//! Engine-thread side of the control.
//!
//! The [`EngineWorker`] owns the native player. Every method runs on the
//! engine thread, either from a task posted by the presentation side or from
//! an event raised by the player itself.

mod seeking;

use super::cache::SharedPositionCache;
use super::notification::{Notification, OpenedSnapshot};
use crate::application::port::{MediaPlayer, MediaSource, PlayerEvent};
use crate::domain::{Balance, SpeedRatio, Ticks, Volume};
use tokio::sync::mpsc;

/// Values pushed to the engine in one task, at construction and when media
/// opens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelPush {
    /// Effective volume (zero while muted).
    pub volume: Volume,
    pub balance: Balance,
    pub speed_ratio: Option<SpeedRatio>,
    /// Start position, only sent when positive.
    pub position: Option<Ticks>,
}

/// State owned by the engine thread.
pub struct EngineWorker {
    player: Box<dyn MediaPlayer>,
    cache: SharedPositionCache,
    notify: mpsc::UnboundedSender<Notification>,
    seeking_enabled: bool,
    media_open: bool,
    released: bool,
}

impl EngineWorker {
    pub(crate) fn new(
        player: Box<dyn MediaPlayer>,
        cache: SharedPositionCache,
        notify: mpsc::UnboundedSender<Notification>,
        seeking_enabled: bool,
    ) -> Self {
        Self {
            player,
            cache,
            notify,
            seeking_enabled,
            media_open: false,
            released: false,
        }
    }

    /// Direct access to the native player.
    pub fn player(&mut self) -> &mut dyn MediaPlayer {
        self.player.as_mut()
    }

    /// Returns true once the player reported an open media.
    #[must_use]
    pub fn is_media_open(&self) -> bool {
        self.media_open
    }

    pub(crate) fn notify(&self, notification: Notification) {
        if self.notify.send(notification).is_err() {
            tracing::debug!("presentation side is gone, dropping notification");
        }
    }

    // =========================================================================
    // Transport
    // =========================================================================

    pub(crate) fn open(&mut self, source: &MediaSource) {
        if self.media_open {
            self.player.close();
            self.media_open = false;
        }
        tracing::info!(%source, "opening media");
        self.released = false;
        self.player.open(source);
    }

    /// Starts playback, rewinding first when a seeking transport sits at the
    /// end of the media. The confirmation echoes `command`.
    pub(crate) fn play(&mut self, command: u64) {
        if self.seeking_enabled {
            self.rewind_if_at_end();
        }
        if self.player.play() {
            self.notify(Notification::PlayConfirmed(command));
        } else {
            tracing::debug!("transport refused to play");
        }
    }

    pub(crate) fn pause(&mut self) {
        self.player.pause();
    }

    /// Stops the transport. A seeking transport is also moved back to the
    /// beginning, whatever its previous position.
    pub(crate) fn stop(&mut self) {
        self.player.stop();
        if self.seeking_enabled {
            self.seek_to(Ticks::ZERO);
        }
    }

    pub(crate) fn close_and_dispose(&mut self) {
        self.player.close();
        self.player.dispose();
        self.media_open = false;
        self.released = true;
    }

    /// Releases the player when the engine thread exits, unless a close
    /// already did since the last open.
    pub(crate) fn teardown(&mut self) {
        if self.released {
            return;
        }
        tracing::debug!(media_open = self.media_open, "releasing player on teardown");
        self.close_and_dispose();
    }

    pub(crate) fn apply_levels(&mut self, levels: LevelPush) {
        self.player.set_volume(levels.volume);
        self.player.set_balance(levels.balance);
        if !self.seeking_enabled {
            return;
        }
        if let Some(ratio) = levels.speed_ratio {
            self.set_rate(ratio);
        }
        if let Some(position) = levels.position {
            self.seek_to(position);
        }
    }

    // =========================================================================
    // Player events
    // =========================================================================

    pub(crate) fn handle_event(&mut self, event: PlayerEvent) {
        tracing::trace!(?event, "engine event");
        match event {
            PlayerEvent::Opened => {
                self.media_open = true;
                let snapshot = OpenedSnapshot {
                    has_video: self.player.has_video(),
                    natural_size: self.player.natural_size(),
                    seeking: self.seek_snapshot(),
                };
                self.notify(Notification::Opened(snapshot));
            }
            PlayerEvent::Closed => {
                self.media_open = false;
                self.cache.reset();
                self.notify(Notification::Closed);
            }
            PlayerEvent::Ended => {
                if self.seeking_enabled {
                    self.pause_if_at_end();
                }
                self.notify(Notification::Ended);
            }
            PlayerEvent::Failed(failure) => {
                tracing::warn!(error = %failure, code = ?failure.code, "engine failure");
                self.media_open = false;
                self.cache.reset();
                self.notify(Notification::Failed(failure));
            }
            PlayerEvent::StateChanged(state) => self.notify(Notification::StateChanged(state)),
            PlayerEvent::NewFrame => self.notify(Notification::NewFrame),
            PlayerEvent::NewSurface(surface) => self.notify(Notification::NewSurface(surface)),
        }
    }
}
