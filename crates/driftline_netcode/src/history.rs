//! # History Buffers
//!
//! Fixed-capacity rings of per-tick data, indexed by `tick % capacity`.
//!
//! Two rings back the prediction loop: the inputs sampled each tick and
//! the body's pre-step pose each tick. Reconciliation replays from them.
//! Only the most recent [`HISTORY_CAPACITY`](crate::HISTORY_CAPACITY)
//! ticks are retrievable — an older tick's slot has been overwritten by a
//! newer tick that maps to the same index, and reading it would silently
//! return the newer tick's data. Callers gate reads on [`retrievable`].

use driftline_core::Pose;

use crate::protocol::InputSample;
use crate::HISTORY_CAPACITY;

/// Returns true while `tick`'s slot still holds `tick`'s data, given the
/// simulation has reached `current_tick`.
///
/// A tick is retrievable once it has executed (`tick < current_tick`) and
/// until it falls out of the ring window.
#[inline]
#[must_use]
pub fn retrievable(tick: u32, current_tick: u32) -> bool {
    tick < current_tick && current_tick - tick < HISTORY_CAPACITY as u32
}

/// A ring of per-tick values with fixed capacity.
#[derive(Clone)]
pub struct TickRing<T> {
    slots: Box<[T]>,
}

impl<T: Copy + Default> TickRing<T> {
    /// Creates a ring of default-valued slots.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![T::default(); HISTORY_CAPACITY].into_boxed_slice(),
        }
    }

    /// Stores `value` in `tick`'s slot, evicting whatever aliased it.
    #[inline]
    pub fn put(&mut self, tick: u32, value: T) {
        self.slots[Self::index(tick)] = value;
    }

    /// Reads `tick`'s slot. The caller is responsible for having checked
    /// [`retrievable`]; an aliased read returns a newer tick's data.
    #[inline]
    #[must_use]
    pub fn get(&self, tick: u32) -> T {
        self.slots[Self::index(tick)]
    }

    #[inline]
    fn index(tick: u32) -> usize {
        tick as usize % HISTORY_CAPACITY
    }
}

impl<T: Copy + Default> Default for TickRing<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The prediction history: sampled inputs and pre-step poses, one of each
/// per executed tick.
#[derive(Clone, Default)]
pub struct History {
    inputs: TickRing<InputSample>,
    states: TickRing<Pose>,
}

impl History {
    /// Creates empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one executed tick: the input sampled for it and the body's
    /// pose immediately before that tick's step.
    pub fn record(&mut self, tick: u32, input: InputSample, pre_step: Pose) {
        self.inputs.put(tick, input);
        self.states.put(tick, pre_step);
    }

    /// Overwrites the recorded pre-step pose for `tick`. Replay uses this
    /// to re-derive history from a corrected body.
    pub fn rewrite_state(&mut self, tick: u32, pre_step: Pose) {
        self.states.put(tick, pre_step);
    }

    /// The input recorded for `tick`.
    #[inline]
    #[must_use]
    pub fn input(&self, tick: u32) -> InputSample {
        self.inputs.get(tick)
    }

    /// The pre-step pose recorded for `tick`.
    #[inline]
    #[must_use]
    pub fn state(&self, tick: u32) -> Pose {
        self.states.get(tick)
    }
}
