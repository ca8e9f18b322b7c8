// SPDX-License-Identifier: MPL-2.0
//! Events raised by the control on the presentation side.

use crate::application::port::EngineFailure;
use crate::domain::{PlaybackState, SurfaceHandle, Ticks};
use std::fmt;

/// Notification delivered to the control's listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Media opened and playback started.
    Opened,
    Closed,
    /// End of stream. The position is left where it is.
    Ended,
    /// The engine failed. Raised exactly once per failure.
    Failed(EngineFailure),
    /// The engine reported a transport state, changed or not.
    StateChanged(PlaybackState),
    PositionChanged {
        position: Ticks,
        /// True if the change came from a presentation-side seek.
        was_external: bool,
    },
    /// The render surface was replaced or released.
    SurfaceChanged(Option<SurfaceHandle>),
    FrameReady,
}

type Listener = Box<dyn FnMut(&MediaEvent)>;

/// Listener registry. Listeners run on the presentation side, in
/// subscription order.
#[derive(Default)]
pub struct EventListeners {
    listeners: Vec<Listener>,
}

impl EventListeners {
    pub fn subscribe(&mut self, listener: impl FnMut(&MediaEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, event: MediaEvent) {
        tracing::trace!(?event, "media event");
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}
