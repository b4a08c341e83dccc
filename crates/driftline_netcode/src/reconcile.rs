//! # Reconciliation
//!
//! Rewind-replay correction against authoritative snapshots.
//!
//! ## How It Works
//!
//! ```text
//! snapshot(tick T) ──► compare against recorded pre-step state at T
//!                          │
//!              within tolerance? ── yes ──► done (prediction held)
//!                          │ no
//!                          ▼
//!              snap body to snapshot state
//!              replay recorded inputs [T, current)
//!              fold the visible jump into the error offset
//! ```
//!
//! Replay re-runs the exact force application and stepping the predictor
//! ran originally, so with a deterministic body the replayed history is
//! what prediction *would* have produced had it started from truth.

use driftline_core::MovableBody;

use crate::config::SimConfig;
use crate::history::{retrievable, History};
use crate::movement::{apply_movement, SteeringFrame};
use crate::protocol::StateMessage;
use crate::smoothing::ErrorOffset;

/// Squared position divergence at or below this is floating-point noise
/// from independent client/authority computation, not real divergence.
pub const POSITION_TOLERANCE_SQ: f32 = 1e-7;

/// Rotation divergence (one minus the quaternion dot product) at or below
/// this is noise.
pub const ROTATION_TOLERANCE: f32 = 1e-5;

/// Corrections that move the visible pose at least this far (squared) cut
/// instantly instead of smoothing — gliding across a large jump looks
/// worse than the cut.
pub const SNAP_THRESHOLD_SQ: f32 = 4.0;

/// What an authoritative snapshot did to the local simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Error correction is switched off; the snapshot only served as an
    /// acknowledgment.
    Disabled,
    /// The snapshot referenced a tick older than the history window holds;
    /// comparing would read aliased data, so it was rejected.
    Stale {
        /// How many ticks behind the current tick the snapshot was.
        age: u32,
    },
    /// Prediction matched within tolerance; nothing was touched.
    InSync,
    /// Prediction diverged: the body was reset and history replayed.
    Corrected {
        /// Number of ticks re-simulated.
        replayed: u32,
        /// True if the visible pose cut instantly instead of smoothing.
        snapped: bool,
    },
}

/// Reconciles the local simulation against one authoritative snapshot.
///
/// The caller records the snapshot's tick as acknowledged *before* calling
/// — acknowledgment happens regardless of correction being enabled or the
/// snapshot being usable.
pub fn reconcile(
    body: &mut dyn MovableBody,
    history: &mut History,
    offset: &mut ErrorOffset,
    msg: &StateMessage,
    current_tick: u32,
    config: &SimConfig,
    frame: &SteeringFrame,
) -> ReconcileOutcome {
    if !config.error_correction {
        return ReconcileOutcome::Disabled;
    }

    if !retrievable(msg.tick, current_tick) {
        let age = current_tick.saturating_sub(msg.tick);
        tracing::warn!(
            tick = msg.tick,
            current_tick,
            "snapshot outside history window, rejecting"
        );
        return ReconcileOutcome::Stale { age };
    }

    let recorded = history.state(msg.tick);
    let position_delta = msg.position - recorded.position;
    let rotation_delta = 1.0 - msg.rotation.dot(recorded.rotation);

    if position_delta.length_squared() <= POSITION_TOLERANCE_SQ
        && rotation_delta <= ROTATION_TOLERANCE
    {
        return ReconcileOutcome::InSync;
    }

    let replayed = current_tick - msg.tick;
    tracing::info!(
        tick = msg.tick,
        replayed,
        "correcting prediction error"
    );

    // Where the player currently sees the body, offset included.
    let visible = offset.apply_to(body.pose());

    body.set_state(msg.body_state());

    for tick in msg.tick..current_tick {
        history.rewrite_state(tick, body.pose());
        apply_movement(body, history.input(tick), frame, config);
        body.step(config.tick_dt());
    }

    let corrected = body.pose();
    let jump_sq = (visible.position - corrected.position).length_squared();
    let snapped = jump_sq >= SNAP_THRESHOLD_SQ;

    if snapped {
        offset.clear();
    } else {
        *offset = ErrorOffset {
            position: visible.position - corrected.position,
            rotation: corrected.rotation.inverse() * visible.rotation,
        };
    }

    ReconcileOutcome::Corrected { replayed, snapped }
}
