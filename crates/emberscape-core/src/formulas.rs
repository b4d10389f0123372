//! Formula library for combat resolution.
//!
//! Pure, deterministic functions shared by every tick resolution. No state,
//! no I/O, no randomness: the orchestrator draws random numbers and feeds
//! the results of these functions into them.
//!
//! # Guard offsets
//!
//! The `+64`, `+8` and `+2` constants in these formulas make every divisor
//! at least 2, so no input reachable from valid stats can divide by zero.
//!
//! # Example
//!
//! ```
//! use emberscape_core::formulas::{accuracy_roll, defence_roll, hit_chance};
//!
//! let attack = accuracy_roll(99, 100);
//! let defence = defence_roll(1, 0);
//! assert!(hit_chance(attack, defence) > 0.99);
//! ```

use crate::entity::CombatStats;

/// Computes an attacker's accuracy roll from level and equipment bonus.
///
/// # Formula
///
/// ```text
/// accuracy_roll = level * (equipment_bonus + 64)
/// ```
#[must_use]
pub fn accuracy_roll(level: u32, equipment_bonus: i32) -> i32 {
    level as i32 * (equipment_bonus + 64)
}

/// Computes a defender's defence roll from level and equipment bonus.
///
/// Same shape as [`accuracy_roll`], applied to the opponent's defence
/// inputs.
#[must_use]
pub fn defence_roll(level: u32, equipment_bonus: i32) -> i32 {
    level as i32 * (equipment_bonus + 64)
}

/// Computes the probability that an attack lands.
///
/// # Formula
///
/// ```text
/// if attack_roll > defence_roll:
///     1 - (defence_roll + 2) / (2 * (attack_roll + 1))
/// else:
///     attack_roll / (2 * (defence_roll + 1))
/// ```
///
/// The boundary case `attack_roll == defence_roll` deliberately falls into
/// the second branch, slightly favoring the defender at parity.
///
/// # Returns
///
/// A probability in `[0, 1]` for all valid roll inputs.
#[must_use]
pub fn hit_chance(attack_roll: i32, defence_roll: i32) -> f64 {
    if attack_roll > defence_roll {
        1.0 - f64::from(defence_roll + 2) / (2.0 * f64::from(attack_roll + 1))
    } else {
        f64::from(attack_roll) / (2.0 * f64::from(defence_roll + 1))
    }
}

/// Computes the maximum hit for a landed attack.
///
/// # Formula
///
/// ```text
/// effective = floor(strength_level * prayer_multiplier) + 8
/// max_hit   = floor(floor(effective * (strength_bonus + 64) / 640) * other_multiplier)
/// ```
///
/// `prayer_multiplier` covers prayer boosts (e.g. 1.23 for the strongest
/// strength prayer); `other_multiplier` covers everything else the
/// orchestrator stacks on top (criticals, special attacks, status buffs).
///
/// # Example
///
/// ```
/// use emberscape_core::formulas::max_hit;
///
/// assert_eq!(max_hit(99, 100, 1.23, 1.0), 33);
/// ```
#[must_use]
pub fn max_hit(
    strength_level: u32,
    strength_bonus: i32,
    prayer_multiplier: f64,
    other_multiplier: f64,
) -> u32 {
    let effective = (f64::from(strength_level) * prayer_multiplier).floor() + 8.0;
    let base = (effective * f64::from(strength_bonus + 64) / 640.0).floor();
    (base * other_multiplier).floor().max(0.0) as u32
}

/// Computes the aggregate combat level from a full stat block.
///
/// # Formula
///
/// ```text
/// base   = 0.25 * (defence + hitpoints + floor(prayer / 2))
/// melee  = 0.325 * (attack + strength)
/// ranged = 0.325 * floor(3 * ranged / 2)
/// magic  = 0.325 * floor(3 * magic / 2)
/// level  = floor(base + max(melee, ranged, magic))
/// ```
#[must_use]
pub fn combat_level(stats: &CombatStats) -> u32 {
    let base = 0.25 * f64::from(stats.defence + stats.hitpoints + stats.prayer / 2);
    let melee = 0.325 * f64::from(stats.attack + stats.strength);
    let ranged = 0.325 * f64::from(3 * stats.ranged / 2);
    let magic = 0.325 * f64::from(3 * stats.magic / 2);
    (base + melee.max(ranged).max(magic)).floor() as u32
}
