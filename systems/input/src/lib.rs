#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Input sampler that turns keyboard transitions into a queryable key state.
//!
//! Keyboard events arrive whenever the adapter observes them and are applied
//! immediately, independent of the tick cadence. The motion system later
//! borrows the resulting [`KeyState`] once per tick. The sampler owns its key
//! state outright; adapters hand it events and pass [`InputSampler::keys`]
//! into the tick, so no state is shared implicitly between the two.

use data_farm_core::{KeyEvent, KeyState};

/// Keyboard listener owning the live key state for a mounted game view.
#[derive(Debug, Default)]
pub struct InputSampler {
    keys: KeyState,
    attached: bool,
}

impl InputSampler {
    /// Creates a detached sampler with no keys held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts listening for keyboard events.
    pub fn attach(&mut self) {
        if !self.attached {
            log::debug!("input sampler attached");
        }
        self.attached = true;
    }

    /// Stops listening and forgets every held key.
    ///
    /// Events delivered after detaching are ignored, so a torn-down view
    /// never observes input meant for the next session.
    pub fn detach(&mut self) {
        if self.attached {
            log::debug!("input sampler detached");
        }
        self.attached = false;
        self.keys.clear();
    }

    /// Reports whether the sampler currently records events.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// Applies a single keyboard transition.
    pub fn handle(&mut self, event: &KeyEvent) {
        if !self.attached {
            return;
        }

        match event {
            KeyEvent::Pressed(key) => self.keys.press(key),
            KeyEvent::Released(key) => self.keys.release(key),
        }
    }

    /// Applies a batch of keyboard transitions in arrival order.
    pub fn handle_all(&mut self, events: &[KeyEvent]) {
        for event in events {
            self.handle(event);
        }
    }

    /// Read-only snapshot consumed by the motion system each tick.
    #[must_use]
    pub const fn keys(&self) -> &KeyState {
        &self.keys
    }
}
