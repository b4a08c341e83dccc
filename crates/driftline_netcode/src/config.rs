//! Runtime configuration.
//!
//! A plain value object: the three behavior toggles may be flipped at any
//! time (the simulation reads them once per tick, so a change takes effect
//! on the next tick), and the movement parameters are shared verbatim
//! between client and authority so both simulate identically.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::DEFAULT_TICK_RATE;

/// Simulation configuration shared by the client and the authority.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Reconcile divergent snapshots by rewinding and replaying history.
    pub error_correction: bool,
    /// Fold corrections into a decaying visual offset instead of cutting
    /// instantly. Only meaningful while `error_correction` is on.
    pub correction_smoothing: bool,
    /// Resend every input since the last acknowledged tick with each
    /// message, trading bandwidth for loss resilience.
    pub redundant_input: bool,
    /// Impulse magnitude applied per active input direction.
    pub move_force: f32,
    /// Maximum height at which a jump impulse still applies (approximates
    /// a grounded check).
    pub jump_threshold: f32,
    /// Fixed simulation ticks per second.
    pub tick_rate: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            error_correction: true,
            correction_smoothing: true,
            redundant_input: true,
            move_force: 1.0,
            jump_threshold: 0.25,
            tick_rate: DEFAULT_TICK_RATE,
        }
    }
}

impl SimConfig {
    /// Parses a configuration from TOML source. Missing fields keep their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the source is not valid TOML or
    /// names unknown fields.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Duration of one simulation tick in seconds.
    #[inline]
    #[must_use]
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Toggles error correction.
    pub fn set_error_correction(&mut self, enabled: bool) {
        self.error_correction = enabled;
    }

    /// Toggles correction smoothing.
    pub fn set_correction_smoothing(&mut self, enabled: bool) {
        self.correction_smoothing = enabled;
    }

    /// Toggles redundant input transmission.
    pub fn set_redundant_input(&mut self, enabled: bool) {
        self.redundant_input = enabled;
    }
}
