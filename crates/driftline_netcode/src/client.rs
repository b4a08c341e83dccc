//! # Predicted Client
//!
//! The client side of the loop: sample input on the fixed tick, simulate
//! it immediately, remember everything, ship inputs to the authority, and
//! fold authoritative corrections back in as they arrive.
//!
//! ## Driver Contract
//!
//! The client owns no frame loop, no window and no socket. An external
//! driver constructs it, calls [`PredictedClient::update`] once per frame
//! with the elapsed time, forwards queued input messages to its transport,
//! and feeds inbound events through the channel handle from
//! [`PredictedClient::event_sender`]. Dropping the client is shutdown.

use std::collections::VecDeque;

use crossbeam_channel::Sender;
use driftline_core::{MovableBody, Pose};

use crate::channel::{EventQueue, NetEvent};
use crate::clock::TickClock;
use crate::config::SimConfig;
use crate::history::History;
use crate::movement::{apply_movement, SteeringFrame};
use crate::protocol::{InputMessage, InputSample, StateMessage};
use crate::reconcile::{reconcile, ReconcileOutcome};
use crate::smoothing::ErrorOffset;
use crate::HISTORY_CAPACITY;

/// Produces one input sample per simulation tick from whatever device or
/// script state the driver owns.
pub trait InputSource {
    /// Samples the current input state.
    fn sample(&mut self) -> InputSample;
}

/// A locally predicted, authority-reconciled movement client.
pub struct PredictedClient<B: MovableBody> {
    config: SimConfig,
    clock: TickClock,
    body: B,
    history: History,
    offset: ErrorOffset,
    events: EventQueue,
    outbound: VecDeque<InputMessage>,
    latest_ack: u32,
    connected: bool,
}

impl<B: MovableBody> PredictedClient<B> {
    /// Creates a client simulating `body` under `config`.
    #[must_use]
    pub fn new(config: SimConfig, body: B) -> Self {
        Self {
            clock: TickClock::new(config.tick_rate),
            config,
            body,
            history: History::new(),
            offset: ErrorOffset::ZERO,
            events: EventQueue::new(),
            outbound: VecDeque::new(),
            latest_ack: 0,
            connected: false,
        }
    }

    /// Handle the transport pushes inbound events through.
    #[must_use]
    pub fn event_sender(&self) -> Sender<NetEvent> {
        self.events.sender()
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Mutable configuration access; toggle changes apply from the next
    /// tick. `tick_rate` must not change after construction — the
    /// scheduler is built from it.
    pub fn config_mut(&mut self) -> &mut SimConfig {
        &mut self.config
    }

    /// Number of the next tick to execute.
    #[must_use]
    pub fn current_tick(&self) -> u32 {
        self.clock.current_tick()
    }

    /// Most recent tick the authority has acknowledged.
    #[must_use]
    pub fn latest_ack_tick(&self) -> u32 {
        self.latest_ack
    }

    /// True while the transport reports an established connection.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
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

    /// The pose to render: the simulated pose composed with the decaying
    /// visual error offset. Never feed this back into the simulation.
    #[must_use]
    pub fn render_pose(&self) -> Pose {
        self.offset.apply_to(self.body.pose())
    }

    /// The current visual error offset.
    #[must_use]
    pub fn error_offset(&self) -> &ErrorOffset {
        &self.offset
    }

    /// Advances the simulation by one frame of wall-clock time.
    ///
    /// Drains all pending network events first, then runs every tick the
    /// elapsed time covers: sample, record, apply forces, step, transmit.
    pub fn update(&mut self, dt: f32, source: &mut dyn InputSource, frame: &SteeringFrame) {
        self.drain_events(frame);

        self.clock.advance(dt);
        while self.clock.tick_due() {
            self.clock.begin_tick();
            self.run_tick(source, frame);
            self.clock.end_tick();
        }
    }

    /// Applies one authoritative snapshot immediately.
    ///
    /// The snapshot always moves the acknowledgment watermark, even when
    /// correction is disabled or the snapshot is too old to compare.
    pub fn handle_state(&mut self, msg: &StateMessage, frame: &SteeringFrame) -> ReconcileOutcome {
        self.latest_ack = msg.tick;
        reconcile(
            &mut self.body,
            &mut self.history,
            &mut self.offset,
            msg,
            self.clock.current_tick(),
            &self.config,
            frame,
        )
    }

    fn drain_events(&mut self, frame: &SteeringFrame) {
        while let Some(event) = self.events.next_event() {
            match event {
                NetEvent::Connected => {
                    self.connected = true;
                    tracing::info!("connected to authority");
                }
                NetEvent::Disconnected => {
                    self.connected = false;
                    tracing::info!("disconnected from authority");
                }
                NetEvent::State(msg) => {
                    let _ = self.handle_state(&msg, frame);
                }
            }
        }
    }

    fn run_tick(&mut self, source: &mut dyn InputSource, frame: &SteeringFrame) {
        let tick = self.clock.current_tick();

        let input = source.sample();
        self.history.record(tick, input, self.body.pose());

        apply_movement(&mut self.body, input, frame, &self.config);
        self.body.step(self.config.tick_dt());

        self.transmit(tick);
        self.decay_offset();
    }

    /// Queues this tick's input message: just the tick itself, or the full
    /// unacknowledged window when redundant transmission is on.
    fn transmit(&mut self, tick: u32) {
        if !self.connected {
            // Dropped from the wire, retained in history for prediction.
            return;
        }

        let mut start = if self.config.redundant_input {
            self.latest_ack
        } else {
            tick
        };
        // An ack can never legitimately run ahead of the local tick, and
        // the window cannot outrun the ring.
        start = start
            .min(tick)
            .max(tick.saturating_sub(HISTORY_CAPACITY as u32 - 1));

        let inputs = (start..=tick).map(|t| self.history.input(t)).collect();
        self.outbound.push_back(InputMessage {
            start_tick: start,
            inputs,
        });
    }

    fn decay_offset(&mut self) {
        if self.config.error_correction && self.config.correction_smoothing {
            self.offset.decay();
        } else {
            // Corrections are either absent or instantaneous.
            self.offset.clear();
        }
    }

    /// Input messages queued since the last drain, oldest first.
    pub fn drain_outbound(&mut self) -> impl Iterator<Item = InputMessage> + '_ {
        self.outbound.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftline_core::BoxBody;
    use glam::Vec3;

    const FRAME: SteeringFrame = SteeringFrame::WORLD;

    /// Scripted input source cycling through a deterministic pattern.
    struct Script {
        tick: u32,
    }

    impl Script {
        fn new() -> Self {
            Self { tick: 0 }
        }
    }

    impl InputSource for Script {
        fn sample(&mut self) -> InputSample {
            let tick = self.tick;
            self.tick += 1;
            InputSample {
                forward: tick % 2 == 0,
                strafe_left: tick % 5 == 0,
                ..InputSample::NEUTRAL
            }
        }
    }

    fn connected_client() -> PredictedClient<BoxBody> {
        let client = PredictedClient::new(SimConfig::default(), BoxBody::new());
        client.event_sender().send(NetEvent::Connected).unwrap();
        client
    }

    /// Runs exactly `n` ticks through the frame API.
    fn run_ticks(client: &mut PredictedClient<BoxBody>, source: &mut Script, n: u32) {
        let dt = client.config().tick_dt();
        for _ in 0..n {
            client.update(dt, source, &FRAME);
        }
    }

    #[test]
    fn test_history_records_sampled_input_and_pre_step_pose() {
        let mut client = connected_client();
        let mut source = Script::new();

        // Tick 0 records the spawn pose before stepping changes it.
        let spawn = client.body().pose();
        run_ticks(&mut client, &mut source, 1);

        assert_eq!(client.current_tick(), 1);
        assert_eq!(
            client.history.input(0),
            InputSample {
                forward: true,
                strafe_left: true,
                ..InputSample::NEUTRAL
            }
        );
        assert_eq!(client.history.state(0), spawn);

        // Tick 1's recorded pose is where tick 0's step left the body.
        let after_first = client.body().pose();
        run_ticks(&mut client, &mut source, 1);
        assert_eq!(client.history.state(1), after_first);
    }

    #[test]
    fn test_redundant_window_covers_unacked_ticks() {
        let mut client = connected_client();
        let mut source = Script::new();

        run_ticks(&mut client, &mut source, 102);
        client.outbound.clear();

        // Authority acknowledges tick 100.
        let snapshot = StateMessage {
            tick: 100,
            position: client.history.state(100).position,
            rotation: client.history.state(100).rotation,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        };
        client.config_mut().set_error_correction(false);
        let _ = client.handle_state(&snapshot, &FRAME);
        assert_eq!(client.latest_ack_tick(), 100);

        // The message built at tick 102 spans [100, 102].
        run_ticks(&mut client, &mut source, 1);
        let msg = client.outbound.back().unwrap();
        assert_eq!(msg.start_tick, 100);
        assert_eq!(msg.inputs.len(), 3);
        assert_eq!(msg.last_tick(), 102);
    }

    #[test]
    fn test_non_redundant_window_is_one_tick() {
        let mut client = connected_client();
        client.config_mut().set_redundant_input(false);
        let mut source = Script::new();

        run_ticks(&mut client, &mut source, 103);

        let msg = client.outbound.back().unwrap();
        assert_eq!(msg.start_tick, 102);
        assert_eq!(msg.inputs.len(), 1);
    }

    #[test]
    fn test_disconnected_ticks_send_nothing_but_still_record() {
        let mut client = PredictedClient::new(SimConfig::default(), BoxBody::new());
        let mut source = Script::new();

        run_ticks(&mut client, &mut source, 5);

        assert_eq!(client.outbound.len(), 0);
        assert_eq!(client.current_tick(), 5);
        // Prediction ran and history filled despite no connection.
        assert!(client.history.input(0).forward);
        assert!(client.body().pose().position != Vec3::ZERO);
    }

    #[test]
    fn test_disconnect_event_stops_transmission() {
        let mut client = connected_client();
        let mut source = Script::new();

        run_ticks(&mut client, &mut source, 2);
        assert_eq!(client.outbound.len(), 2);

        client.event_sender().send(NetEvent::Disconnected).unwrap();
        run_ticks(&mut client, &mut source, 2);

        assert!(!client.is_connected());
        assert_eq!(client.outbound.len(), 2);
        assert_eq!(client.current_tick(), 4);
    }

    #[test]
    fn test_offset_decays_each_tick_without_snapshots() {
        let mut client = connected_client();
        let mut source = Script::new();

        client.offset = ErrorOffset {
            position: Vec3::new(1.0, 0.0, 0.0),
            rotation: glam::Quat::IDENTITY,
        };

        run_ticks(&mut client, &mut source, 1);
        assert!((client.error_offset().position.x - 0.9).abs() < 1e-6);

        run_ticks(&mut client, &mut source, 1);
        assert!((client.error_offset().position.x - 0.81).abs() < 1e-6);
    }

    #[test]
    fn test_offset_cleared_when_smoothing_disabled() {
        let mut client = connected_client();
        client.config_mut().set_correction_smoothing(false);
        let mut source = Script::new();

        client.offset = ErrorOffset {
            position: Vec3::new(1.0, 0.0, 0.0),
            rotation: glam::Quat::IDENTITY,
        };

        run_ticks(&mut client, &mut source, 1);
        assert!(client.error_offset().is_zero());
    }

    #[test]
    fn test_render_pose_composes_offset() {
        let mut client = connected_client();

        client.offset = ErrorOffset {
            position: Vec3::new(0.5, 0.0, 0.0),
            rotation: glam::Quat::IDENTITY,
        };

        let body_pose = client.body().pose();
        let render = client.render_pose();
        assert_eq!(render.position, body_pose.position + Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_state_events_reconcile_before_ticks_run() {
        let mut client = connected_client();
        let mut source = Script::new();

        run_ticks(&mut client, &mut source, 10);

        // A divergent snapshot queued as an event corrects on next update.
        let recorded = client.history.state(5);
        let snapshot = StateMessage {
            tick: 5,
            position: recorded.position + Vec3::new(0.001, 0.0, 0.0),
            rotation: recorded.rotation,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        };
        client
            .event_sender()
            .send(NetEvent::State(snapshot))
            .unwrap();

        run_ticks(&mut client, &mut source, 1);

        assert_eq!(client.latest_ack_tick(), 5);
        // History at tick 5 was rewritten from the snapshot during replay.
        assert_eq!(client.history.state(5).position, snapshot.position);
    }
}
