//! Weapon and special-attack catalog.
//!
//! Maps each [`WeaponId`] to its class, attack speed, optional on-hit
//! status effect, and optional [`SpecialAttack`]. Special attacks are
//! energy-gated alternates with their own accuracy/damage multipliers; a
//! multiplier may be a single scalar or a fixed per-hit sequence for
//! decreasing multi-hit specials.
//!
//! [`SpecialCatalog::special_damage`] and
//! [`SpecialCatalog::special_accuracy`] are pure lookups plus a
//! multiplication. Weapons without a catalog special fall back to a 1.0
//! multiplier rather than failing; the caller is expected to have
//! validated equipment before starting combat.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::styles::WeaponClass;
use crate::catalog::effects::StatusEffectId;

/// Closed identifier for an equippable weapon.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeaponId {
    /// Baseline slash weapon with no special attack.
    BronzeSword,
    /// Fast stab weapon; double-hit special.
    DragonDagger,
    /// Four-hit special with a decreasing damage sequence.
    DragonClaws,
    /// Slow two-hander; high-accuracy single-hit special.
    ArmadylGodsword,
    /// Crush weapon; instant special.
    GraniteMaul,
    /// Slash weapon; accuracy special that saps the target's run energy.
    AbyssalWhip,
    /// Ranged weapon that envenoms targets; healing special.
    ToxicBlowpipe,
    /// Slash weapon whose special cannot miss.
    Voidwaker,
}

impl fmt::Display for WeaponId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BronzeSword => "bronze sword",
            Self::DragonDagger => "dragon dagger",
            Self::DragonClaws => "dragon claws",
            Self::ArmadylGodsword => "armadyl godsword",
            Self::GraniteMaul => "granite maul",
            Self::AbyssalWhip => "abyssal whip",
            Self::ToxicBlowpipe => "toxic blowpipe",
            Self::Voidwaker => "voidwaker",
        };
        write!(f, "{name}")
    }
}

bitflags! {
    /// Effect tags attached to a special attack.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SpecialFlags: u8 {
        /// Resolves without waiting for the normal attack interval.
        const INSTANT = 1 << 0;
        /// Drains the target's run energy on a landed hit.
        const DRAIN_RUN = 1 << 1;
        /// Heals the attacker for a share of the damage dealt.
        const HEAL = 1 << 2;
        /// Forces the hit chance to 1.0 for the whole resolution and
        /// floors every landed hit at 1 damage.
        const GUARANTEED_HITS = 1 << 3;
    }
}

/// Damage multiplier for a special attack.
#[derive(Debug, Clone, PartialEq)]
pub enum DamageMultiplier {
    /// Every hit uses the same multiplier.
    Uniform(f64),
    /// Hits use a fixed sequence indexed by hit number.
    PerHit(&'static [f64]),
}

impl DamageMultiplier {
    /// Returns the multiplier for the given hit index.
    ///
    /// Indexes past the end of a sequence repeat its last entry, so a
    /// malformed hit count cannot panic mid-resolution.
    #[must_use]
    pub fn for_hit(&self, hit_index: usize) -> f64 {
        match self {
            Self::Uniform(mult) => *mult,
            Self::PerHit(seq) => seq
                .get(hit_index)
                .or_else(|| seq.last())
                .copied()
                .unwrap_or(1.0),
        }
    }
}

/// An energy-gated special attack.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialAttack {
    /// Energy cost in `0..=100`.
    pub energy_cost: u8,
    /// Multiplier on the accuracy roll.
    pub accuracy_mult: f64,
    /// Multiplier(s) on the max hit.
    pub damage: DamageMultiplier,
    /// Number of hits resolved in one tick.
    pub hits: u8,
    /// Effect tags.
    pub flags: SpecialFlags,
}

/// Immutable definition of one weapon.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponDef {
    /// Display name for transcripts.
    pub name: &'static str,
    /// Weapon class; selects the attack lane and move set.
    pub class: WeaponClass,
    /// Attack interval in simulated-time units.
    pub attack_speed: f32,
    /// Special attack, if the weapon has one.
    pub special: Option<SpecialAttack>,
    /// Status effect applied on a landed hit (with a proc roll).
    pub apply_on_hit: Option<StatusEffectId>,
}

/// Read-only catalog of weapon definitions.
#[derive(Debug, Clone)]
pub struct SpecialCatalog {
    weapons: BTreeMap<WeaponId, WeaponDef>,
}

impl SpecialCatalog {
    /// Builds the canonical weapon definitions.
    #[must_use]
    pub fn builtin() -> Self {
        let mut weapons = BTreeMap::new();

        weapons.insert(
            WeaponId::BronzeSword,
            WeaponDef {
                name: "bronze sword",
                class: WeaponClass::Slash,
                attack_speed: 2.4,
                special: None,
                apply_on_hit: None,
            },
        );
        weapons.insert(
            WeaponId::DragonDagger,
            WeaponDef {
                name: "dragon dagger",
                class: WeaponClass::Stab,
                attack_speed: 2.0,
                special: Some(SpecialAttack {
                    energy_cost: 25,
                    accuracy_mult: 1.15,
                    damage: DamageMultiplier::Uniform(1.15),
                    hits: 2,
                    flags: SpecialFlags::INSTANT,
                }),
                apply_on_hit: None,
            },
        );
        weapons.insert(
            WeaponId::DragonClaws,
            WeaponDef {
                name: "dragon claws",
                class: WeaponClass::Slash,
                attack_speed: 2.4,
                special: Some(SpecialAttack {
                    energy_cost: 50,
                    accuracy_mult: 1.0,
                    damage: DamageMultiplier::PerHit(&[1.0, 0.5, 0.25, 0.25]),
                    hits: 4,
                    flags: SpecialFlags::empty(),
                }),
                apply_on_hit: None,
            },
        );
        weapons.insert(
            WeaponId::ArmadylGodsword,
            WeaponDef {
                name: "armadyl godsword",
                class: WeaponClass::Slash,
                attack_speed: 3.0,
                special: Some(SpecialAttack {
                    energy_cost: 50,
                    accuracy_mult: 2.0,
                    damage: DamageMultiplier::Uniform(1.375),
                    hits: 1,
                    flags: SpecialFlags::empty(),
                }),
                apply_on_hit: None,
            },
        );
        weapons.insert(
            WeaponId::GraniteMaul,
            WeaponDef {
                name: "granite maul",
                class: WeaponClass::Crush,
                attack_speed: 3.6,
                special: Some(SpecialAttack {
                    energy_cost: 50,
                    accuracy_mult: 1.0,
                    damage: DamageMultiplier::Uniform(1.0),
                    hits: 1,
                    flags: SpecialFlags::INSTANT,
                }),
                apply_on_hit: None,
            },
        );
        weapons.insert(
            WeaponId::AbyssalWhip,
            WeaponDef {
                name: "abyssal whip",
                class: WeaponClass::Slash,
                attack_speed: 2.4,
                special: Some(SpecialAttack {
                    energy_cost: 50,
                    accuracy_mult: 1.25,
                    damage: DamageMultiplier::Uniform(1.0),
                    hits: 1,
                    flags: SpecialFlags::DRAIN_RUN,
                }),
                apply_on_hit: None,
            },
        );
        weapons.insert(
            WeaponId::ToxicBlowpipe,
            WeaponDef {
                name: "toxic blowpipe",
                class: WeaponClass::Ranged,
                attack_speed: 1.8,
                special: Some(SpecialAttack {
                    energy_cost: 50,
                    accuracy_mult: 1.0,
                    damage: DamageMultiplier::Uniform(1.5),
                    hits: 1,
                    flags: SpecialFlags::HEAL,
                }),
                apply_on_hit: Some(StatusEffectId::Venom),
            },
        );
        weapons.insert(
            WeaponId::Voidwaker,
            WeaponDef {
                name: "voidwaker",
                class: WeaponClass::Slash,
                attack_speed: 2.4,
                special: Some(SpecialAttack {
                    energy_cost: 50,
                    accuracy_mult: 1.0,
                    damage: DamageMultiplier::Uniform(1.0),
                    hits: 1,
                    flags: SpecialFlags::GUARANTEED_HITS,
                }),
                apply_on_hit: None,
            },
        );

        Self { weapons }
    }

    /// Looks up the definition for a weapon.
    #[must_use]
    pub fn get(&self, id: WeaponId) -> Option<&WeaponDef> {
        self.weapons.get(&id)
    }

    /// Scales a base damage value by the weapon's special multiplier for
    /// the given hit index. Weapons without a special use 1.0.
    #[must_use]
    pub fn special_damage(&self, base_damage: u32, weapon: WeaponId, hit_index: usize) -> u32 {
        let mult = self
            .get(weapon)
            .and_then(|def| def.special.as_ref())
            .map_or(1.0, |special| special.damage.for_hit(hit_index));
        (f64::from(base_damage) * mult).floor() as u32
    }

    /// Scales a base accuracy roll by the weapon's special accuracy
    /// multiplier. Weapons without a special use 1.0.
    #[must_use]
    pub fn special_accuracy(&self, base_accuracy: i32, weapon: WeaponId) -> i32 {
        let mult = self
            .get(weapon)
            .and_then(|def| def.special.as_ref())
            .map_or(1.0, |special| special.accuracy_mult);
        (f64::from(base_accuracy) * mult).floor() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claws_multipliers_sum_to_two() {
        let catalog = SpecialCatalog::builtin();
        let def = catalog.get(WeaponId::DragonClaws).unwrap();
        let special = def.special.as_ref().unwrap();

        let DamageMultiplier::PerHit(seq) = &special.damage else {
            panic!("claws should use a per-hit sequence");
        };
        assert_eq!(seq.len(), usize::from(special.hits));
        let sum: f64 = seq.iter().sum();
        assert!((sum - 2.0).abs() < 1e-12);
    }

    #[test]
    fn special_damage_scales_per_hit() {
        let catalog = SpecialCatalog::builtin();
        assert_eq!(catalog.special_damage(40, WeaponId::DragonClaws, 0), 40);
        assert_eq!(catalog.special_damage(40, WeaponId::DragonClaws, 1), 20);
        assert_eq!(catalog.special_damage(40, WeaponId::DragonClaws, 2), 10);
        assert_eq!(catalog.special_damage(40, WeaponId::DragonClaws, 3), 10);
    }

    #[test]
    fn per_hit_sequence_repeats_last_entry_past_the_end() {
        let catalog = SpecialCatalog::builtin();
        assert_eq!(catalog.special_damage(40, WeaponId::DragonClaws, 9), 10);
    }

    #[test]
    fn weapon_without_special_falls_back_to_unity() {
        let catalog = SpecialCatalog::builtin();
        assert_eq!(catalog.special_damage(33, WeaponId::BronzeSword, 0), 33);
        assert_eq!(catalog.special_accuracy(5000, WeaponId::BronzeSword), 5000);
    }

    #[test]
    fn godsword_doubles_accuracy() {
        let catalog = SpecialCatalog::builtin();
        assert_eq!(catalog.special_accuracy(5000, WeaponId::ArmadylGodsword), 10000);
    }

    #[test]
    fn voidwaker_guarantees_hits() {
        let catalog = SpecialCatalog::builtin();
        let def = catalog.get(WeaponId::Voidwaker).unwrap();
        let special = def.special.as_ref().unwrap();
        assert!(special.flags.contains(SpecialFlags::GUARANTEED_HITS));
    }

    #[test]
    fn blowpipe_envenoms_and_heals() {
        let catalog = SpecialCatalog::builtin();
        let def = catalog.get(WeaponId::ToxicBlowpipe).unwrap();
        assert_eq!(def.apply_on_hit, Some(StatusEffectId::Venom));
        assert!(def.special.as_ref().unwrap().flags.contains(SpecialFlags::HEAL));
    }

    #[test]
    fn attack_speeds_are_positive_and_sane() {
        let catalog = SpecialCatalog::builtin();
        for id in [
            WeaponId::BronzeSword,
            WeaponId::DragonDagger,
            WeaponId::DragonClaws,
            WeaponId::ArmadylGodsword,
            WeaponId::GraniteMaul,
            WeaponId::AbyssalWhip,
            WeaponId::ToxicBlowpipe,
            WeaponId::Voidwaker,
        ] {
            let def = catalog.get(id).unwrap();
            assert!(def.attack_speed >= 1.8 && def.attack_speed <= 4.0, "{id}");
        }
    }
}
