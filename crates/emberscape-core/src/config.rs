//! Engine configuration.
//!
//! All combat tunables live in [`CombatConfig`] and are injected into the
//! engine at construction time. Nothing in the engine reads ambient global
//! configuration.

use serde::{Deserialize, Serialize};

/// Tunable parameters for combat resolution.
///
/// The defaults reproduce the canonical balance values. Hosts that want a
/// different feel (faster fights, no criticals) construct their own config
/// and hand it to [`crate::engine::CombatEngine::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatConfig {
    /// Probability that a normal attack is a critical hit.
    pub crit_chance: f64,
    /// Accuracy-roll multiplier applied on a critical hit.
    pub crit_accuracy: f64,
    /// Max-hit multiplier applied on a critical hit.
    pub crit_damage: f64,
    /// Special-attack energy restored to a player when its turn begins.
    pub special_regen: u8,
    /// Fraction of the primary damage dealt to each area target in
    /// multi-combat.
    pub splash_fraction: f64,
    /// Probability that a venomous/poisoned weapon applies its effect on a
    /// landed hit.
    pub proc_chance: f64,
    /// Probability that a frozen or stunned attacker loses its turn.
    pub block_cancel_chance: f64,
    /// Hard ceiling on ticks per session. [`crate::engine::CombatEngine::run_combat`]
    /// finishes the session with no winner once this is reached.
    pub max_ticks: u64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            crit_chance: 0.05,
            crit_accuracy: 1.2,
            crit_damage: 1.5,
            special_regen: 10,
            splash_fraction: 0.5,
            proc_chance: 0.25,
            block_cancel_chance: 0.25,
            max_ticks: 500,
        }
    }
}

impl CombatConfig {
    /// Returns a config with critical hits disabled.
    ///
    /// Useful for tests that need fully predictable max hits.
    #[must_use]
    pub fn without_crits() -> Self {
        Self {
            crit_chance: 0.0,
            ..Self::default()
        }
    }
}
