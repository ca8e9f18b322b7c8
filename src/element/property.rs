// SPDX-License-Identifier: MPL-2.0
//! Observable properties with echo suppression.
//!
//! When the engine confirms a value, the presentation side writes it into
//! the matching property. Without suppression that write would look like a
//! user change and be pushed straight back to the engine. [`EchoGuard`] marks
//! the next change of one property as engine-originated so exactly that one
//! change is not forwarded.

use std::fmt::Debug;

/// One-shot "next change comes from the engine" flag.
#[derive(Debug, Default)]
pub struct EchoGuard {
    armed: bool,
}

impl EchoGuard {
    /// Marks the next change as engine-originated.
    ///
    /// Arming twice without a change in between is a protocol violation.
    pub fn arm(&mut self) {
        if self.armed {
            tracing::warn!("echo guard re-armed before it was consumed");
        }
        debug_assert!(!self.armed, "echo guard re-armed before it was consumed");
        self.armed = true;
    }

    /// Clears the flag, returning whether it was set.
    pub fn consume(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

/// A presentation-side value mirrored to the engine.
#[derive(Debug)]
pub struct Property<T> {
    name: &'static str,
    value: T,
    guard: EchoGuard,
}

impl<T: Copy + PartialEq + Debug> Property<T> {
    pub fn new(name: &'static str, value: T) -> Self {
        Self {
            name,
            value,
            guard: EchoGuard::default(),
        }
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.value
    }

    /// Writes a value from the application or UI.
    ///
    /// Returns the value to forward to the engine, or `None` if the value is
    /// unchanged or the change was engine-originated.
    pub fn set(&mut self, value: T) -> Option<T> {
        if self.value == value {
            return None;
        }
        self.value = value;
        if self.guard.consume() {
            tracing::trace!(property = self.name, ?value, "engine echo suppressed");
            return None;
        }
        Some(value)
    }

    /// Writes an engine-confirmed value. Never forwards anything.
    ///
    /// Returns `true` if the value changed.
    pub fn apply_confirmed(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.guard.arm();
        let forwarded = self.set(value);
        debug_assert!(forwarded.is_none());
        true
    }

    #[must_use]
    pub fn is_suppressing(&self) -> bool {
        self.guard.is_armed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn user_change_is_forwarded_once() {
        let mut volume = Property::new("volume", 1);
        assert_eq!(volume.set(5), Some(5));
        assert_eq!(volume.set(5), None);
        assert_eq!(volume.get(), 5);
    }

    #[test]
    fn confirmed_change_is_not_forwarded() {
        let mut state = Property::new("state", 'a');
        assert!(state.apply_confirmed('b'));
        assert_eq!(state.get(), 'b');
        assert!(!state.is_suppressing());
    }

    #[test]
    fn confirming_current_value_leaves_guard_unarmed() {
        let mut state = Property::new("state", 3);
        assert!(!state.apply_confirmed(3));
        assert!(!state.is_suppressing());
        // The next user change must still be forwarded.
        assert_eq!(state.set(4), Some(4));
    }

    #[test]
    fn guard_is_one_shot() {
        let mut guard = EchoGuard::default();
        guard.arm();
        assert!(guard.consume());
        assert!(!guard.consume());
    }

    #[test]
    #[should_panic(expected = "re-armed")]
    #[cfg(debug_assertions)]
    fn rearming_is_flagged_in_debug_builds() {
        let mut guard = EchoGuard::default();
        guard.arm();
        guard.arm();
    }

    proptest! {
        #[test]
        fn forwarded_values_are_exactly_the_user_changes(
            writes in prop::collection::vec((any::<bool>(), 0u8..4), 0..64)
        ) {
            let mut property = Property::new("p", 0u8);
            let mut expected = Vec::new();
            let mut forwarded = Vec::new();
            let mut shadow = 0u8;

            for (from_engine, value) in writes {
                if from_engine {
                    property.apply_confirmed(value);
                } else {
                    if value != shadow {
                        expected.push(value);
                    }
                    forwarded.extend(property.set(value));
                }
                shadow = value;
                prop_assert!(!property.is_suppressing());
            }

            prop_assert_eq!(forwarded, expected);
        }
    }
}
