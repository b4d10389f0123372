//! Status effect processing.
//!
//! Three operations cover the lifecycle of a status effect:
//! - [`apply_effect`]: attach (or stack/refresh) an effect on an entity
//! - [`process_status_effects`]: advance countdowns, deal damage-over-time
//!   pulses, expire effects and leave immunity markers behind
//! - [`cure_effect`]: remove an effect early (antidotes), with no immunity
//!   marker
//!
//! # Stacking
//!
//! Non-stacking effects refresh their remaining duration on
//! re-application. Stacking effects (venom) instead queue one pending
//! increment per re-application; the increment raises the per-pulse damage
//! on the *next* pulse, so re-applying twice before a pulse still only
//! raises the damage once per application, never per tick.

use tracing::debug;

use crate::catalog::effects::{EffectCatalog, StatusEffectId};
use crate::entity::{ActiveEffect, Entity};

/// Applies a status effect to an entity.
///
/// Returns `false` when the application was blocked: the entity holds the
/// effect's immunity marker, or the effect has no catalog definition.
pub fn apply_effect(entity: &mut Entity, id: StatusEffectId, catalog: &EffectCatalog) -> bool {
    let Some(def) = catalog.get(id) else {
        return false;
    };

    if let Some((marker, _)) = def.immunity {
        if entity.has_effect(marker) {
            debug!(entity = %entity.name, effect = %id, "application blocked by immunity");
            return false;
        }
    }

    if let Some(existing) = entity.effect_mut(id) {
        if def.stack_increment > 0 {
            existing.pending_increments += 1;
        } else if def.duration.is_some() {
            existing.remaining = def.duration;
        }
        return true;
    }

    debug!(entity = %entity.name, effect = %id, "effect applied");
    entity.effects.push(ActiveEffect::from_def(def));
    true
}

/// Removes a status effect early (e.g. drinking an antidote).
///
/// Curing leaves no immunity marker behind. Returns `true` if the effect
/// was present.
pub fn cure_effect(entity: &mut Entity, id: StatusEffectId) -> bool {
    let before = entity.effects.len();
    entity.effects.retain(|e| e.id != id);
    before != entity.effects.len()
}

/// Advances all active effects on an entity by `ticks_elapsed` ticks.
///
/// Damage-over-time effects pulse each time their interval elapses;
/// pending venom increments are folded into the per-pulse damage on the
/// first pulse after the re-application. Timed effects whose duration runs
/// out are removed, leaving their immunity marker (if the catalog defines
/// one) active for its window.
///
/// Returns the total damage-over-time dealt, already subtracted from the
/// entity's hit points (floored at zero).
pub fn process_status_effects(
    entity: &mut Entity,
    ticks_elapsed: u32,
    catalog: &EffectCatalog,
) -> u32 {
    if ticks_elapsed == 0 || entity.effects.is_empty() {
        return 0;
    }

    let mut effects = std::mem::take(&mut entity.effects);
    let mut total_dot = 0u32;
    let mut markers = Vec::new();

    effects.retain_mut(|effect| {
        let Some(def) = catalog.get(effect.id) else {
            return false;
        };

        if def.dot_interval > 0 {
            let mut budget = ticks_elapsed;
            loop {
                if budget < effect.until_pulse {
                    effect.until_pulse -= budget;
                    break;
                }
                budget -= effect.until_pulse;
                effect.until_pulse = def.dot_interval;

                if effect.pending_increments > 0 {
                    effect.dot_damage += def.stack_increment * effect.pending_increments;
                    effect.pending_increments = 0;
                }
                total_dot += effect.dot_damage;
            }
        }

        if let Some(remaining) = effect.remaining {
            if remaining <= ticks_elapsed {
                debug!(entity = %entity.name, effect = %effect.id, "effect expired");
                if let Some((marker, window)) = def.immunity {
                    markers.push((marker, window));
                }
                return false;
            }
            effect.remaining = Some(remaining - ticks_elapsed);
        }
        true
    });

    for (marker, window) in markers {
        if let Some(def) = catalog.get(marker) {
            let mut immunity = ActiveEffect::from_def(def);
            immunity.remaining = Some(window);
            effects.push(immunity);
        }
    }

    entity.effects = effects;
    entity.apply_damage(total_dot)
}

/// Returns the product of damage multipliers from the entity's active
/// effects (e.g. 1.2 while berserk).
#[must_use]
pub fn outgoing_damage_multiplier(entity: &Entity, catalog: &EffectCatalog) -> f64 {
    entity
        .effects
        .iter()
        .filter_map(|e| catalog.get(e.id))
        .map(|def| def.damage_mult)
        .product()
}

/// Returns the product of defence multipliers from the entity's active
/// effects (e.g. 0.8 while berserk).
#[must_use]
pub fn defence_multiplier(entity: &Entity, catalog: &EffectCatalog) -> f64 {
    entity
        .effects
        .iter()
        .filter_map(|e| catalog.get(e.id))
        .map(|def| def.defence_mult)
        .product()
}

/// Returns `true` if any active effect can block the entity's attacks.
#[must_use]
pub fn attack_blocked(entity: &Entity, catalog: &EffectCatalog) -> bool {
    entity
        .effects
        .iter()
        .filter_map(|e| catalog.get(e.id))
        .any(|def| def.blocks_attack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{CombatStats, EntityId, EquipmentBonus};

    fn entity_with_hp(hp: u32) -> Entity {
        let stats = CombatStats {
            hitpoints: hp,
            ..CombatStats::default()
        };
        Entity::npc(EntityId::new(1), "Dummy", stats, EquipmentBonus::default())
    }

    mod poison_tests {
        use super::*;

        #[test]
        fn pulses_on_interval_multiples_only() {
            let catalog = EffectCatalog::builtin();
            let mut entity = entity_with_hp(99);
            apply_effect(&mut entity, StatusEffectId::Poison, &catalog);

            // Interval is 5: four single-tick advances deal nothing.
            for _ in 0..4 {
                assert_eq!(process_status_effects(&mut entity, 1, &catalog), 0);
            }
            assert_eq!(process_status_effects(&mut entity, 1, &catalog), 6);
            assert_eq!(entity.current_hp, 93);
        }

        #[test]
        fn damage_is_constant_per_pulse() {
            let catalog = EffectCatalog::builtin();
            let mut entity = entity_with_hp(99);
            apply_effect(&mut entity, StatusEffectId::Poison, &catalog);

            let first = process_status_effects(&mut entity, 5, &catalog);
            let second = process_status_effects(&mut entity, 5, &catalog);
            assert_eq!(first, second);
        }

        #[test]
        fn persists_until_cured() {
            let catalog = EffectCatalog::builtin();
            let mut entity = entity_with_hp(99);
            apply_effect(&mut entity, StatusEffectId::Poison, &catalog);

            process_status_effects(&mut entity, 50, &catalog);
            assert!(entity.has_effect(StatusEffectId::Poison));

            assert!(cure_effect(&mut entity, StatusEffectId::Poison));
            assert!(!entity.has_effect(StatusEffectId::Poison));
        }

        #[test]
        fn reapplication_does_not_stack() {
            let catalog = EffectCatalog::builtin();
            let mut entity = entity_with_hp(99);
            apply_effect(&mut entity, StatusEffectId::Poison, &catalog);
            apply_effect(&mut entity, StatusEffectId::Poison, &catalog);

            assert_eq!(entity.effects.len(), 1);
            assert_eq!(process_status_effects(&mut entity, 5, &catalog), 6);
        }

        #[test]
        fn large_elapsed_interval_catches_up_pulses() {
            let catalog = EffectCatalog::builtin();
            let mut entity = entity_with_hp(99);
            apply_effect(&mut entity, StatusEffectId::Poison, &catalog);

            // Two full intervals in one call: two pulses.
            assert_eq!(process_status_effects(&mut entity, 10, &catalog), 12);
        }
    }

    mod venom_tests {
        use super::*;

        #[test]
        fn double_application_raises_damage_exactly_once() {
            // Scenario D: two applications before the first pulse raise
            // the per-pulse damage by the stack increment once per
            // re-application, applied on the next pulse only.
            let catalog = EffectCatalog::builtin();
            let mut entity = entity_with_hp(99);
            apply_effect(&mut entity, StatusEffectId::Venom, &catalog);
            apply_effect(&mut entity, StatusEffectId::Venom, &catalog);

            assert_eq!(process_status_effects(&mut entity, 5, &catalog), 8);
            // No further growth without another application.
            assert_eq!(process_status_effects(&mut entity, 5, &catalog), 8);
        }

        #[test]
        fn each_reapplication_adds_one_increment() {
            let catalog = EffectCatalog::builtin();
            let mut entity = entity_with_hp(99);
            apply_effect(&mut entity, StatusEffectId::Venom, &catalog);

            assert_eq!(process_status_effects(&mut entity, 5, &catalog), 6);

            apply_effect(&mut entity, StatusEffectId::Venom, &catalog);
            assert_eq!(process_status_effects(&mut entity, 5, &catalog), 8);

            apply_effect(&mut entity, StatusEffectId::Venom, &catalog);
            assert_eq!(process_status_effects(&mut entity, 5, &catalog), 10);
        }

        #[test]
        fn damage_strictly_increases_while_reapplied() {
            let catalog = EffectCatalog::builtin();
            let mut entity = entity_with_hp(200);
            apply_effect(&mut entity, StatusEffectId::Venom, &catalog);

            let mut last = 0;
            for _ in 0..4 {
                apply_effect(&mut entity, StatusEffectId::Venom, &catalog);
                let dealt = process_status_effects(&mut entity, 5, &catalog);
                assert!(dealt > last);
                last = dealt;
            }
        }
    }

    mod freeze_tests {
        use super::*;

        #[test]
        fn blocks_attacks_while_active() {
            let catalog = EffectCatalog::builtin();
            let mut entity = entity_with_hp(50);
            assert!(!attack_blocked(&entity, &catalog));

            apply_effect(&mut entity, StatusEffectId::Frozen, &catalog);
            assert!(attack_blocked(&entity, &catalog));
        }

        #[test]
        fn expiry_leaves_immunity_window() {
            let catalog = EffectCatalog::builtin();
            let mut entity = entity_with_hp(50);
            apply_effect(&mut entity, StatusEffectId::Frozen, &catalog);

            process_status_effects(&mut entity, 8, &catalog);
            assert!(!entity.has_effect(StatusEffectId::Frozen));
            assert!(entity.has_effect(StatusEffectId::FreezeImmunity));

            // Re-freezing is blocked during the window.
            assert!(!apply_effect(&mut entity, StatusEffectId::Frozen, &catalog));

            // The window itself expires.
            process_status_effects(&mut entity, 4, &catalog);
            assert!(!entity.has_effect(StatusEffectId::FreezeImmunity));
            assert!(apply_effect(&mut entity, StatusEffectId::Frozen, &catalog));
        }

        #[test]
        fn reapplication_refreshes_duration() {
            let catalog = EffectCatalog::builtin();
            let mut entity = entity_with_hp(50);
            apply_effect(&mut entity, StatusEffectId::Frozen, &catalog);
            process_status_effects(&mut entity, 6, &catalog);

            apply_effect(&mut entity, StatusEffectId::Frozen, &catalog);
            // Two more ticks would have expired the original application.
            process_status_effects(&mut entity, 4, &catalog);
            assert!(entity.has_effect(StatusEffectId::Frozen));
        }
    }

    mod berserker_tests {
        use super::*;

        #[test]
        fn multiplies_damage_and_defence() {
            let catalog = EffectCatalog::builtin();
            let mut entity = entity_with_hp(50);
            apply_effect(&mut entity, StatusEffectId::Berserker, &catalog);

            assert!((outgoing_damage_multiplier(&entity, &catalog) - 1.2).abs() < 1e-12);
            assert!((defence_multiplier(&entity, &catalog) - 0.8).abs() < 1e-12);
        }

        #[test]
        fn expires_without_marker() {
            let catalog = EffectCatalog::builtin();
            let mut entity = entity_with_hp(50);
            apply_effect(&mut entity, StatusEffectId::Berserker, &catalog);

            process_status_effects(&mut entity, 10, &catalog);
            assert!(entity.effects.is_empty());
        }
    }

    #[test]
    fn dot_cannot_take_hp_below_zero() {
        let catalog = EffectCatalog::builtin();
        let mut entity = entity_with_hp(4);
        apply_effect(&mut entity, StatusEffectId::Poison, &catalog);

        let dealt = process_status_effects(&mut entity, 5, &catalog);
        assert_eq!(dealt, 4);
        assert_eq!(entity.current_hp, 0);
    }

    #[test]
    fn zero_elapsed_is_a_no_op() {
        let catalog = EffectCatalog::builtin();
        let mut entity = entity_with_hp(50);
        apply_effect(&mut entity, StatusEffectId::Poison, &catalog);

        assert_eq!(process_status_effects(&mut entity, 0, &catalog), 0);
        assert!(entity.has_effect(StatusEffectId::Poison));
    }
}
