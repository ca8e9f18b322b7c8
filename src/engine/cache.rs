// SPDX-License-Identifier: MPL-2.0
//! Position cache shared between the presentation side and the engine thread.
//!
//! The cache is the engine-side view of "where the transport is". The
//! presentation side writes it synchronously during the first phase of a
//! seek, so any engine work that runs afterwards (an end-of-stream check,
//! a replay-from-end check) already observes the new target.

use crate::domain::Ticks;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Shared handle to a [`PositionCache`].
pub type SharedPositionCache = Arc<PositionCache>;

/// Lock-free position and duration cell.
///
/// Both values use `SeqCst` ordering: a write performed before posting an
/// engine task is visible to that task.
#[derive(Debug, Default)]
pub struct PositionCache {
    position: AtomicI64,
    duration: AtomicI64,
}

impl PositionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared() -> SharedPositionCache {
        Arc::new(Self::new())
    }

    #[must_use]
    pub fn position(&self) -> Ticks {
        Ticks::new(self.position.load(Ordering::SeqCst))
    }

    pub fn set_position(&self, position: Ticks) {
        self.position.store(position.value(), Ordering::SeqCst);
    }

    #[must_use]
    pub fn duration(&self) -> Ticks {
        Ticks::new(self.duration.load(Ordering::SeqCst))
    }

    pub fn set_duration(&self, duration: Ticks) {
        self.duration.store(duration.value(), Ordering::SeqCst);
    }

    /// Returns true if media has a known duration and the cached position
    /// is at (or past) its end.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        let duration = self.duration();
        duration > Ticks::ZERO && self.position() >= duration
    }

    /// Back to the empty state: no position, no duration.
    pub fn reset(&self) {
        self.position.store(0, Ordering::SeqCst);
        self.duration.store(0, Ordering::SeqCst);
    }
}
