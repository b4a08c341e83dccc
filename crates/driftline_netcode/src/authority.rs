//! # Authority
//!
//! The server side of the loop: the single source of truth for body state.
//!
//! The authority runs the exact same force application and stepping as the
//! client's predictor — shared code, not a parallel copy — so an honest
//! client's prediction matches truth bit-for-bit and reconciliation stays
//! quiet. It consumes input messages in tick order and answers each newly
//! acknowledged tick with the ground-truth state at that tick's start.
//!
//! Input the network ate is simulated as neutral: the authority cannot
//! wait for a tick that may never arrive, and the client's reconciliation
//! will pull it onto the authoritative line once the divergence shows up
//! in a snapshot.

use std::collections::VecDeque;

use driftline_core::MovableBody;

use crate::config::SimConfig;
use crate::movement::{apply_movement, SteeringFrame};
use crate::protocol::{InputMessage, InputSample, StateMessage};

/// Authoritative simulation for one client's body.
pub struct Authority<B: MovableBody> {
    config: SimConfig,
    body: B,
    /// First tick whose input has not been simulated yet.
    next_tick: u32,
    outbound: VecDeque<StateMessage>,
}

impl<B: MovableBody> Authority<B> {
    /// Creates an authority simulating `body` under `config`. The config's
    /// movement parameters must match the client's or every snapshot will
    /// disagree.
    #[must_use]
    pub fn new(config: SimConfig, body: B) -> Self {
        Self {
            config,
            body,
            next_tick: 0,
            outbound: VecDeque::new(),
        }
    }

    /// The simulated body.
    #[must_use]
    pub fn body(&self) -> &B {
        &self.body
    }

    /// Mutable body access, for spawn placement and the like.
    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    /// First tick whose input has not been simulated yet.
    #[must_use]
    pub fn next_tick(&self) -> u32 {
        self.next_tick
    }

    /// Consumes one input message, simulating every tick it covers that
    /// has not run yet.
    ///
    /// Redundant retransmissions overlap ticks already simulated; only the
    /// unseen suffix is applied, so each tick's input acts exactly once.
    /// A message opening past the next expected tick means the missing
    /// ticks' inputs were lost on the wire; they are simulated as neutral.
    pub fn handle_input(&mut self, msg: &InputMessage, frame: &SteeringFrame) {
        if msg.inputs.is_empty() {
            return;
        }

        if msg.last_tick() < self.next_tick {
            tracing::debug!(
                last_tick = msg.last_tick(),
                next_tick = self.next_tick,
                "input message already simulated, ignoring"
            );
            return;
        }

        if msg.start_tick > self.next_tick {
            tracing::warn!(
                expected = self.next_tick,
                got = msg.start_tick,
                "input gap, simulating lost ticks as neutral"
            );
            while self.next_tick < msg.start_tick {
                self.advance(InputSample::NEUTRAL, frame, false);
            }
        }

        let already_seen = (self.next_tick - msg.start_tick) as usize;
        for input in &msg.inputs[already_seen..] {
            self.advance(*input, frame, true);
        }
    }

    /// Simulates one tick. Acknowledged ticks answer with the body state
    /// at the tick's start, before its input applies — the same instant
    /// the client recorded into its state buffer.
    fn advance(&mut self, input: InputSample, frame: &SteeringFrame, acknowledge: bool) {
        let tick = self.next_tick;

        if acknowledge {
            self.outbound
                .push_back(StateMessage::from_state(tick, self.body.state()));
        }

        apply_movement(&mut self.body, input, frame, &self.config);
        self.body.step(self.config.tick_dt());

        self.next_tick = tick + 1;
    }

    /// State messages queued since the last drain, oldest first.
    pub fn drain_outbound(&mut self) -> impl Iterator<Item = StateMessage> + '_ {
        self.outbound.drain(..)
    }
}
