//! End-to-end client/authority runs over an in-memory link.
//!
//! The client and the authority step the same deterministic body, so with
//! every input delivered the prediction is exact and reconciliation stays
//! silent. The lossy-link cases then knock inputs off the wire and check
//! that redundant transmission hides the loss entirely while non-redundant
//! transmission diverges, corrects, and converges again.

use driftline_core::{BoxBody, MovableBody};
use driftline_netcode::{
    Authority, InputSample, InputSource, NetEvent, PredictedClient, ReconcileOutcome, SimConfig,
    StateMessage, SteeringFrame,
};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FRAME: SteeringFrame = SteeringFrame::WORLD;

/// Deterministic random movement.
struct RandomWalk {
    rng: StdRng,
}

impl RandomWalk {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl InputSource for RandomWalk {
    fn sample(&mut self) -> InputSample {
        InputSample {
            forward: self.rng.gen_bool(0.6),
            backward: self.rng.gen_bool(0.1),
            strafe_right: self.rng.gen_bool(0.3),
            strafe_left: self.rng.gen_bool(0.3),
            jump: self.rng.gen_bool(0.05),
        }
    }
}

/// Runs `frames` frames of one tick each, dropping each client->authority
/// message with probability `loss`. Authority->client snapshots are never
/// dropped. Returns every reconciliation outcome observed.
fn run_session(
    client: &mut PredictedClient<BoxBody>,
    authority: &mut Authority<BoxBody>,
    source: &mut RandomWalk,
    frames: u32,
    loss: f64,
    loss_rng: &mut StdRng,
) -> Vec<ReconcileOutcome> {
    let dt = client.config().tick_dt();
    let mut outcomes = Vec::new();

    for _ in 0..frames {
        client.update(dt, source, &FRAME);

        let sent: Vec<_> = client.drain_outbound().collect();
        for msg in sent {
            if loss_rng.gen_bool(loss) {
                continue;
            }
            authority.handle_input(&msg, &FRAME);
        }

        let states: Vec<StateMessage> = authority.drain_outbound().collect();
        for state in states {
            outcomes.push(client.handle_state(&state, &FRAME));
        }
    }

    outcomes
}

fn connected_pair() -> (PredictedClient<BoxBody>, Authority<BoxBody>) {
    let config = SimConfig::default();
    let client = PredictedClient::new(config, BoxBody::new());
    client.event_sender().send(NetEvent::Connected).unwrap();
    let authority = Authority::new(config, BoxBody::new());
    (client, authority)
}

#[test]
fn perfect_link_never_corrects() {
    let (mut client, mut authority) = connected_pair();
    let mut source = RandomWalk::new(7);
    let mut loss_rng = StdRng::seed_from_u64(1);

    let outcomes = run_session(
        &mut client,
        &mut authority,
        &mut source,
        600,
        0.0,
        &mut loss_rng,
    );

    assert!(!outcomes.is_empty());
    assert!(
        outcomes
            .iter()
            .all(|outcome| *outcome == ReconcileOutcome::InSync),
        "a deterministic body fed identical inputs must predict exactly"
    );
    assert!(client.error_offset().is_zero());
}

#[test]
fn redundant_input_hides_packet_loss() {
    let (mut client, mut authority) = connected_pair();
    let mut source = RandomWalk::new(11);
    let mut loss_rng = StdRng::seed_from_u64(2);

    let outcomes = run_session(
        &mut client,
        &mut authority,
        &mut source,
        600,
        0.3,
        &mut loss_rng,
    );

    // Every surviving message re-carries the unacknowledged window, so the
    // authority never sees a gap and truth never disagrees.
    assert!(!outcomes.is_empty());
    assert!(outcomes
        .iter()
        .all(|outcome| *outcome == ReconcileOutcome::InSync));
}

#[test]
fn lossy_link_without_redundancy_corrects_and_converges() {
    let (mut client, mut authority) = connected_pair();
    client.config_mut().set_redundant_input(false);
    let mut source = RandomWalk::new(13);
    let mut loss_rng = StdRng::seed_from_u64(3);

    let lossy_outcomes = run_session(
        &mut client,
        &mut authority,
        &mut source,
        600,
        0.25,
        &mut loss_rng,
    );

    // Lost single-tick inputs get simulated as neutral by the authority,
    // which the client's prediction cannot have known.
    assert!(
        lossy_outcomes
            .iter()
            .any(|outcome| matches!(outcome, ReconcileOutcome::Corrected { .. })),
        "dropping unrepeated inputs must force corrections"
    );

    // Once the wire is clean again the corrected client tracks truth.
    let settle_outcomes = run_session(
        &mut client,
        &mut authority,
        &mut source,
        200,
        0.0,
        &mut loss_rng,
    );
    let tail = &settle_outcomes[settle_outcomes.len() - 50..];
    assert!(tail
        .iter()
        .all(|outcome| *outcome == ReconcileOutcome::InSync));

    // And the visual offset has decayed away.
    assert!(client.error_offset().position.length() < 0.05);
}

#[test]
fn disabling_correction_still_acknowledges() {
    let (mut client, mut authority) = connected_pair();
    client.config_mut().set_error_correction(false);
    let mut source = RandomWalk::new(17);
    let mut loss_rng = StdRng::seed_from_u64(4);

    let outcomes = run_session(
        &mut client,
        &mut authority,
        &mut source,
        100,
        0.0,
        &mut loss_rng,
    );

    assert!(outcomes
        .iter()
        .all(|outcome| *outcome == ReconcileOutcome::Disabled));
    // Acknowledgments still advanced the redundant window.
    assert!(client.latest_ack_tick() > 0);
}

#[test]
fn snapshot_older_than_history_is_rejected() {
    let (mut client, _authority) = connected_pair();
    let mut source = RandomWalk::new(19);

    // Run far enough that tick 0 has been aliased out of the ring.
    let dt = client.config().tick_dt();
    client.update(dt * 1200.0, &mut source, &FRAME);
    assert!(client.current_tick() >= 1100);

    let before = client.body().pose();
    let outcome = client.handle_state(
        &StateMessage {
            tick: 0,
            position: Vec3::splat(1e6),
            rotation: glam::Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        },
        &FRAME,
    );

    assert!(matches!(outcome, ReconcileOutcome::Stale { .. }));
    assert_eq!(client.body().pose(), before);
    // Even a rejected snapshot is still an acknowledgment.
    assert_eq!(client.latest_ack_tick(), 0);
}
