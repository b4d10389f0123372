//! Status effect catalog.
//!
//! Each [`StatusEffectDef`] describes one timed modifier: damage-over-time
//! rate and interval, duration, stacking behavior, post-expiry immunity
//! window, and any combat multipliers. Definitions are read-only; the
//! mutable per-entity state lives in
//! [`crate::entity::status::ActiveEffect`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Closed identifier for a status effect.
///
/// The `*Immunity` variants are non-damaging markers added when their
/// parent effect expires; while present they block re-application.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusEffectId {
    /// Fixed damage-over-time, indefinite until cured, does not stack.
    Poison,
    /// Stacking damage-over-time, indefinite until cured.
    Venom,
    /// Blocks attacking for a fixed duration; leaves a freeze-immunity
    /// window behind.
    Frozen,
    /// Blocks attacking for a short duration; leaves a stun-immunity
    /// window behind.
    Stunned,
    /// Multiplicative damage/defence buff for a fixed duration.
    Berserker,
    /// Marker preventing an immediate re-freeze.
    FreezeImmunity,
    /// Marker preventing an immediate re-stun.
    StunImmunity,
}

impl fmt::Display for StatusEffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Poison => "poison",
            Self::Venom => "venom",
            Self::Frozen => "frozen",
            Self::Stunned => "stunned",
            Self::Berserker => "berserker",
            Self::FreezeImmunity => "freeze immunity",
            Self::StunImmunity => "stun immunity",
        };
        write!(f, "{name}")
    }
}

/// Immutable definition of one status effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffectDef {
    /// The effect this definition describes.
    pub id: StatusEffectId,
    /// Damage per pulse. Zero for effects with no damage-over-time.
    pub dot_damage: u32,
    /// Ticks between pulses. Zero disables periodic damage entirely.
    pub dot_interval: u32,
    /// Total duration in ticks. `None` means indefinite until cured.
    pub duration: Option<u32>,
    /// How much each re-application raises the per-pulse damage. Zero for
    /// non-stacking effects, which refresh their duration instead.
    pub stack_increment: u32,
    /// Immunity marker (and its window, in ticks) left behind on expiry.
    pub immunity: Option<(StatusEffectId, u32)>,
    /// Multiplier on the afflicted entity's outgoing damage.
    pub damage_mult: f64,
    /// Multiplier on the afflicted entity's defence roll.
    pub defence_mult: f64,
    /// Whether the effect can cancel the afflicted entity's attacks.
    pub blocks_attack: bool,
}

impl StatusEffectDef {
    fn neutral(id: StatusEffectId) -> Self {
        Self {
            id,
            dot_damage: 0,
            dot_interval: 0,
            duration: None,
            stack_increment: 0,
            immunity: None,
            damage_mult: 1.0,
            defence_mult: 1.0,
            blocks_attack: false,
        }
    }
}

/// Read-only catalog of status effect definitions.
#[derive(Debug, Clone)]
pub struct EffectCatalog {
    defs: BTreeMap<StatusEffectId, StatusEffectDef>,
}

impl EffectCatalog {
    /// Builds the canonical effect definitions.
    #[must_use]
    pub fn builtin() -> Self {
        let mut defs = BTreeMap::new();

        defs.insert(
            StatusEffectId::Poison,
            StatusEffectDef {
                dot_damage: 6,
                dot_interval: 5,
                ..StatusEffectDef::neutral(StatusEffectId::Poison)
            },
        );
        defs.insert(
            StatusEffectId::Venom,
            StatusEffectDef {
                dot_damage: 6,
                dot_interval: 5,
                stack_increment: 2,
                ..StatusEffectDef::neutral(StatusEffectId::Venom)
            },
        );
        defs.insert(
            StatusEffectId::Frozen,
            StatusEffectDef {
                duration: Some(8),
                immunity: Some((StatusEffectId::FreezeImmunity, 4)),
                blocks_attack: true,
                ..StatusEffectDef::neutral(StatusEffectId::Frozen)
            },
        );
        defs.insert(
            StatusEffectId::Stunned,
            StatusEffectDef {
                duration: Some(3),
                immunity: Some((StatusEffectId::StunImmunity, 3)),
                blocks_attack: true,
                ..StatusEffectDef::neutral(StatusEffectId::Stunned)
            },
        );
        defs.insert(
            StatusEffectId::Berserker,
            StatusEffectDef {
                duration: Some(10),
                damage_mult: 1.2,
                defence_mult: 0.8,
                ..StatusEffectDef::neutral(StatusEffectId::Berserker)
            },
        );
        defs.insert(
            StatusEffectId::FreezeImmunity,
            StatusEffectDef {
                duration: Some(4),
                ..StatusEffectDef::neutral(StatusEffectId::FreezeImmunity)
            },
        );
        defs.insert(
            StatusEffectId::StunImmunity,
            StatusEffectDef {
                duration: Some(3),
                ..StatusEffectDef::neutral(StatusEffectId::StunImmunity)
            },
        );

        Self { defs }
    }

    /// Looks up the definition for an effect.
    #[must_use]
    pub fn get(&self, id: StatusEffectId) -> Option<&StatusEffectDef> {
        self.defs.get(&id)
    }
}
