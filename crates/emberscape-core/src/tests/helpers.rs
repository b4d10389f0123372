//! Test helper functions for setting up engines and combatants.
//!
//! Factory functions keep the suites terse and make the common fixtures
//! (a maxed-out player, a punching bag, an engine without criticals)
//! consistent across tests.

use crate::catalog::Catalogs;
use crate::config::CombatConfig;
use crate::engine::CombatEngine;
use crate::entity::{CombatStats, Entity, EntityId, EquipmentBonus};
use crate::session::Session;

// =============================================================================
// Engine Factories
// =============================================================================

/// Builds an engine with criticals disabled so damage ranges are exact.
///
/// # Arguments
///
/// * `seed` - Master seed for every session's RNG stream
pub fn test_engine(seed: u64) -> CombatEngine {
    CombatEngine::new(CombatConfig::without_crits(), Catalogs::builtin(), seed)
}

/// Builds an engine with a low tick ceiling for termination tests.
pub fn capped_engine(seed: u64, max_ticks: u64) -> CombatEngine {
    let config = CombatConfig {
        max_ticks,
        ..CombatConfig::without_crits()
    };
    CombatEngine::new(config, Catalogs::builtin(), seed)
}

// =============================================================================
// Entity Factories
// =============================================================================

/// A maxed melee player with strong gear.
///
/// Hits hard and accurately; useful as the dominant side of a fixture
/// fight.
pub fn maxed_player(id: u64, name: &str) -> Entity {
    let stats = CombatStats {
        attack: 99,
        strength: 99,
        defence: 99,
        ranged: 99,
        magic: 99,
        hitpoints: 99,
        prayer: 99,
    };
    let bonus = EquipmentBonus {
        attack_stab: 80,
        attack_slash: 80,
        attack_crush: 80,
        attack_ranged: 80,
        melee_strength: 100,
        ranged_strength: 80,
        ..EquipmentBonus::default()
    };
    Entity::player(EntityId::new(id), name, stats, bonus)
}

/// A fresh level-3 player with no gear.
pub fn fresh_player(id: u64, name: &str) -> Entity {
    Entity::player(
        EntityId::new(id),
        name,
        CombatStats::default(),
        EquipmentBonus::default(),
    )
}

/// An NPC with level-1 offence that cannot deal damage, at the given hit
/// points. Its max hit is zero, so fights against it only end when it
/// dies.
pub fn punching_bag(id: u64, hp: u32) -> Entity {
    let stats = CombatStats {
        hitpoints: hp,
        ..CombatStats::default()
    };
    Entity::npc(EntityId::new(id), "Dummy", stats, EquipmentBonus::default())
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Runs ticks until the session finishes or `max_ticks` is reached.
///
/// Returns the winner, or `None` if the budget ran out first.
pub fn run_to_completion(
    engine: &CombatEngine,
    session: &mut Session,
    max_ticks: u32,
) -> Option<EntityId> {
    for _ in 0..max_ticks {
        let outcome = engine.process_combat_tick(session);
        if outcome.finished {
            return outcome.winner;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maxed_player_outclasses_fresh_player() {
        let maxed = maxed_player(1, "Astra");
        let fresh = fresh_player(2, "Newbie");
        assert!(maxed.combat_level > fresh.combat_level);
        assert_eq!(maxed.combat_level, 126);
        assert_eq!(fresh.combat_level, 3);
    }

    #[test]
    fn punching_bag_cannot_hit() {
        let bag = punching_bag(1, 50);
        assert_eq!(
            crate::formulas::max_hit(bag.stats.strength, bag.bonus.melee_strength, 1.0, 1.0),
            0
        );
        assert_eq!(bag.max_hp, 50);
    }

    #[test]
    fn run_to_completion_reports_the_winner() {
        let engine = test_engine(21);
        let mut session = engine
            .start_combat(maxed_player(1, "Astra"), punching_bag(2, 20), false)
            .unwrap();
        let winner = run_to_completion(&engine, &mut session, 200);
        assert_eq!(winner, Some(EntityId::new(1)));
    }
}
