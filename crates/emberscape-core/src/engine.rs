//! Combat orchestration.
//!
//! [`CombatEngine`] is the stateless front door: it validates participants,
//! mints sessions with independently-seeded RNG streams, and resolves one
//! combat tick at a time. All state for a fight lives in the
//! [`Session`]; the engine itself holds only configuration, catalogs and
//! the master seed, so one engine serves any number of concurrent fights.
//!
//! # Tick resolution order
//!
//! 1. Status-effect upkeep on the attacker (damage over time can end the
//!    fight before a swing).
//! 2. A frozen or stunned attacker may lose the turn outright.
//! 3. Special attack if requested and affordable, otherwise a normal
//!    attack (with a critical-hit chance).
//! 4. On-hit effect procs (venomous weapons).
//! 5. Multi-combat splash onto registered area targets.
//! 6. Death check on the defender.
//! 7. Role swap and special-energy regeneration for the next attacker.
//!
//! # Example
//!
//! ```
//! use emberscape_core::catalog::Catalogs;
//! use emberscape_core::config::CombatConfig;
//! use emberscape_core::engine::CombatEngine;
//! use emberscape_core::entity::{CombatStats, Entity, EntityId, EquipmentBonus};
//!
//! let engine = CombatEngine::new(CombatConfig::default(), Catalogs::builtin(), 42);
//! let a = Entity::player(EntityId::new(1), "Astra", CombatStats::default(), EquipmentBonus::default());
//! let b = Entity::npc(EntityId::new(2), "Goblin", CombatStats::default(), EquipmentBonus::default());
//!
//! let mut session = engine.start_combat(a, b, false).unwrap();
//! let outcome = engine.process_combat_tick(&mut session);
//! assert_eq!(session.tick(), 1);
//! # let _ = outcome;
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::catalog::specials::{SpecialFlags, WeaponDef};
use crate::catalog::styles::{StyleDef, WeaponClass};
use crate::catalog::Catalogs;
use crate::config::CombatConfig;
use crate::entity::{Entity, EntityId};
use crate::error::CombatError;
use crate::formulas;
use crate::session::{HitRecord, Session};
use crate::status;

/// Shortest attack interval the pacing helper will return, in seconds.
const MIN_ATTACK_INTERVAL: f32 = 0.6;

/// Result of processing one combat tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct TickOutcome {
    /// `true` once the session reached its terminal state.
    pub finished: bool,
    /// The winner, if the tick produced one.
    pub winner: Option<EntityId>,
}

/// The combat resolution engine.
///
/// Stateless between ticks: sessions carry all mutable fight state, so a
/// single engine value (behind an `Arc`, typically) serves every
/// concurrent fight in the host process.
#[derive(Debug)]
pub struct CombatEngine {
    config: CombatConfig,
    catalogs: Catalogs,
    master_seed: u64,
    next_session_id: AtomicU64,
}

impl CombatEngine {
    /// Creates an engine from explicit configuration and catalogs.
    ///
    /// `master_seed` fixes every stream of randomness the engine will ever
    /// draw: two engines built with the same seed, fed the same calls in
    /// the same order, produce identical fights.
    #[must_use]
    pub fn new(config: CombatConfig, catalogs: Catalogs, master_seed: u64) -> Self {
        Self {
            config,
            catalogs,
            master_seed,
            next_session_id: AtomicU64::new(1),
        }
    }

    /// Creates an engine with default configuration and built-in catalogs.
    #[must_use]
    pub fn with_seed(master_seed: u64) -> Self {
        Self::new(CombatConfig::default(), Catalogs::builtin(), master_seed)
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Returns the catalogs the engine resolves against.
    #[must_use]
    pub const fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    /// Starts a combat session, taking ownership of both participants.
    ///
    /// The initiator attacks first. The session's RNG stream is derived
    /// from the master seed and the session id, so concurrent sessions are
    /// independently reproducible regardless of interleaving.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::DeadCombatant`] if either side has zero hit
    /// points, or [`CombatError::SelfTarget`] if both sides are the same
    /// entity.
    pub fn start_combat(
        &self,
        attacker: Entity,
        defender: Entity,
        multi_combat: bool,
    ) -> Result<Session, CombatError> {
        if !attacker.is_alive() {
            return Err(CombatError::DeadCombatant(attacker.id));
        }
        if !defender.is_alive() {
            return Err(CombatError::DeadCombatant(defender.id));
        }
        if attacker.id == defender.id {
            return Err(CombatError::SelfTarget(attacker.id));
        }

        let session_id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        let rng = ChaCha8Rng::seed_from_u64(self.session_seed(session_id));

        info!(
            session = session_id,
            attacker = %attacker.name,
            defender = %defender.name,
            multi_combat,
            "combat started"
        );
        Ok(Session::new(session_id, attacker, defender, multi_combat, rng))
    }

    /// Advances all active status effects on an entity outside combat
    /// (e.g. poison ticking while a player walks around).
    ///
    /// Returns the damage-over-time dealt.
    pub fn process_status_effects(&self, entity: &mut Entity, ticks_elapsed: u32) -> u32 {
        status::process_status_effects(entity, ticks_elapsed, &self.catalogs.effects)
    }

    /// Returns the attack interval for an entity. The entity's own speed
    /// override (monster definitions carry one) wins over the equipped
    /// weapon's speed; unarmed entities swing at the baseline interval.
    #[must_use]
    pub fn attack_interval(&self, entity: &Entity) -> Duration {
        let def = entity.weapon.and_then(|w| self.catalogs.specials.get(w));
        let class = def.map_or(WeaponClass::Crush, |d| d.class);
        let speed = entity
            .attack_speed
            .unwrap_or_else(|| def.map_or(2.4, |d| d.attack_speed));
        let delta = entity
            .style
            .map_or(0.0, |style| self.catalogs.styles.resolve(class, style).speed_delta);
        Duration::from_secs_f32((speed + delta).max(MIN_ATTACK_INTERVAL))
    }

    /// Processes one combat tick on a session.
    ///
    /// # Panics
    ///
    /// Panics if the session is already finished; callers must stop
    /// ticking once [`TickOutcome::finished`] is returned.
    pub fn process_combat_tick(&self, session: &mut Session) -> TickOutcome {
        let tick = session.begin_tick();

        // Step 1: upkeep. Damage over time can kill the attacker before
        // it swings, handing the win to the defender.
        let attacker_died = {
            let sid = session.id();
            let (attacker, _, _) = session.tick_parts();
            let dot = status::process_status_effects(attacker, 1, &self.catalogs.effects);
            if dot > 0 {
                debug!(session = sid, tick, dot, "upkeep damage");
            }
            !attacker.is_alive()
        };
        if attacker_died {
            let winner = session.defender().id;
            info!(session = session.id(), tick, %winner, "attacker died to damage over time");
            session.finish(Some(winner));
            return TickOutcome {
                finished: true,
                winner: Some(winner),
            };
        }

        // Steps 2-4: resolve the attack itself.
        let mut records = {
            let (attacker, defender, rng) = session.tick_parts();
            self.resolve_attack(tick, attacker, defender, rng)
        };

        // Step 5: splash. Landed damage spills onto area targets at a
        // fixed fraction, with no accuracy roll.
        if session.multi_combat() {
            let total: u32 = records
                .iter()
                .filter(|r| r.landed)
                .map(|r| r.damage)
                .sum();
            let splash = (f64::from(total) * self.config.splash_fraction).floor() as u32;
            if splash > 0 {
                let attacker_id = session.attacker().id;
                for target in session.splash_targets_mut() {
                    if !target.is_alive() {
                        continue;
                    }
                    target.apply_damage(splash);
                    records.push(HitRecord {
                        tick,
                        attacker: attacker_id,
                        defender: target.id,
                        landed: true,
                        damage: splash,
                        special: false,
                        critical: false,
                        splash: true,
                    });
                }
            }
        }

        for record in records {
            session.push_record(record);
        }

        // Step 6: only a principal's death ends the session. Splash
        // targets dying is the host's problem to notice.
        if !session.defender().is_alive() {
            let winner = session.attacker().id;
            info!(session = session.id(), tick, %winner, "combat finished");
            session.finish(Some(winner));
            return TickOutcome {
                finished: true,
                winner: Some(winner),
            };
        }

        // Step 7: the other side takes the next swing.
        session.swap_roles();
        let regen = self.config.special_regen;
        let (next_attacker, _, _) = session.tick_parts();
        next_attacker.regen_special(regen);

        TickOutcome {
            finished: false,
            winner: None,
        }
    }

    /// Drives a session to completion on a fixed cadence.
    ///
    /// Processes one tick, sleeps `tick_interval`, repeats. A turn whose
    /// attacker has an affordable instant-flagged special queued skips
    /// the wait entirely. Finishes the session with no winner when the
    /// cancellation channel flips to `true` or the configured tick
    /// ceiling is hit. Returns the winner, if the fight produced one.
    pub async fn run_combat(
        &self,
        session: &mut Session,
        tick_interval: Duration,
        cancel: &mut watch::Receiver<bool>,
    ) -> Option<EntityId> {
        loop {
            if *cancel.borrow() {
                warn!(session = session.id(), "combat cancelled");
                session.finish(None);
                return None;
            }

            let outcome = self.process_combat_tick(session);
            if outcome.finished {
                return outcome.winner;
            }
            if session.tick() >= self.config.max_ticks {
                warn!(
                    session = session.id(),
                    ticks = session.tick(),
                    "tick ceiling reached, declaring a draw"
                );
                session.finish(None);
                return None;
            }

            // Roles have swapped: `attacker()` is the next tick's
            // attacker. An instant special resolves without waiting.
            let wait = if self.instant_special_queued(session.attacker()) {
                Duration::ZERO
            } else {
                tick_interval
            };
            tokio::select! {
                () = tokio::time::sleep(wait) => {}
                changed = cancel.changed() => {
                    match changed {
                        Ok(()) if *cancel.borrow() => {
                            warn!(session = session.id(), "combat cancelled");
                            session.finish(None);
                            return None;
                        }
                        Ok(()) => {}
                        // Sender gone: nobody can cancel us any more.
                        // Keep the cadence and fight to the end.
                        Err(_) => tokio::time::sleep(wait).await,
                    }
                }
            }
        }
    }

    // -------------------------------------------------------------------
    // Resolution internals
    // -------------------------------------------------------------------

    /// The next swing comes for free when the entity has an affordable
    /// instant-flagged special queued.
    fn instant_special_queued(&self, entity: &Entity) -> bool {
        entity.queued_special
            && entity
                .weapon
                .and_then(|w| self.catalogs.specials.get(w))
                .and_then(|def| def.special.as_ref())
                .is_some_and(|special| {
                    special.flags.contains(SpecialFlags::INSTANT)
                        && entity.special_energy >= special.energy_cost
                })
    }

    fn session_seed(&self, session_id: u64) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.master_seed.hash(&mut hasher);
        session_id.hash(&mut hasher);
        hasher.finish()
    }

    /// Resolves one attacker's swing, mutating both entities in place.
    fn resolve_attack(
        &self,
        tick: u64,
        attacker: &mut Entity,
        defender: &mut Entity,
        rng: &mut ChaCha8Rng,
    ) -> Vec<HitRecord> {
        // Step 2: a frozen or stunned attacker may lose the turn. Logged
        // as a miss so the transcript shows the dead turn.
        if status::attack_blocked(attacker, &self.catalogs.effects)
            && rng.gen_bool(self.config.block_cancel_chance)
        {
            debug!(attacker = %attacker.name, tick, "turn lost to a blocking effect");
            return vec![HitRecord {
                tick,
                attacker: attacker.id,
                defender: defender.id,
                landed: false,
                damage: 0,
                special: false,
                critical: false,
                splash: false,
            }];
        }

        let weapon_def = attacker.weapon.and_then(|w| self.catalogs.specials.get(w));
        let class = weapon_def.map_or(WeaponClass::Crush, |d| d.class);
        let kind = class.attack_kind();
        let style = attacker
            .style
            .map_or(StyleDef::NEUTRAL, |s| self.catalogs.styles.resolve(class, s));

        // Effective levels: base stats plus the style's invisible bonuses.
        let (base_accuracy_level, base_strength_level) = match kind {
            k if k.is_melee() => (attacker.stats.attack, attacker.stats.strength),
            crate::entity::AttackKind::Ranged => (attacker.stats.ranged, attacker.stats.ranged),
            _ => (attacker.stats.magic, attacker.stats.magic),
        };
        let accuracy_level = base_accuracy_level + style.invisible_attack;
        let strength_level = base_strength_level + style.invisible_strength;
        let accuracy_bonus = attacker.bonus.attack(kind);
        let strength_bonus = attacker.bonus.strength(kind);

        let defence_roll = self.effective_defence_roll(defender, kind);
        let damage_mult = status::outgoing_damage_multiplier(attacker, &self.catalogs.effects);

        // Step 3: a queued special is consumed this turn whether or not
        // it can be paid for; an unaffordable request silently falls back
        // to a normal attack.
        let special = if attacker.queued_special {
            attacker.queued_special = false;
            weapon_def
                .and_then(|d| d.special.as_ref())
                .filter(|s| attacker.special_energy >= s.energy_cost)
        } else {
            None
        };

        let mut records = Vec::new();
        if let Some(special) = special {
            attacker.special_energy -= special.energy_cost;
            // `special` implies `weapon_def` was present.
            let weapon = attacker.weapon.unwrap_or(crate::catalog::specials::WeaponId::BronzeSword);

            let base_accuracy = formulas::accuracy_roll(accuracy_level, accuracy_bonus);
            let accuracy = self.catalogs.specials.special_accuracy(base_accuracy, weapon);
            let chance = if special.flags.contains(SpecialFlags::GUARANTEED_HITS) {
                1.0
            } else {
                formulas::hit_chance(accuracy, defence_roll).clamp(0.0, 1.0)
            };
            let base_max = formulas::max_hit(strength_level, strength_bonus, 1.0, 1.0);

            for hit_index in 0..usize::from(special.hits) {
                let landed = rng.gen_bool(chance);
                let mut damage = 0;
                if landed {
                    let scaled_max = self.catalogs.specials.special_damage(base_max, weapon, hit_index);
                    damage = self.roll_damage(rng, scaled_max, damage_mult);
                    // A hit that cannot miss cannot land for zero either.
                    if special.flags.contains(SpecialFlags::GUARANTEED_HITS) {
                        damage = damage.max(1);
                    }
                    self.deliver_hit(attacker, defender, damage, weapon_def, rng);
                    if special.flags.contains(SpecialFlags::HEAL) {
                        attacker.heal(damage / 2);
                    }
                    if special.flags.contains(SpecialFlags::DRAIN_RUN) {
                        defender.run_energy =
                            defender.run_energy.saturating_sub(damage.min(100) as u8);
                    }
                }
                records.push(HitRecord {
                    tick,
                    attacker: attacker.id,
                    defender: defender.id,
                    landed,
                    damage,
                    special: true,
                    critical: false,
                    splash: false,
                });
                if !defender.is_alive() {
                    break;
                }
            }
        } else {
            let critical = rng.gen_bool(self.config.crit_chance);
            let base_accuracy = formulas::accuracy_roll(accuracy_level, accuracy_bonus);
            let accuracy = if critical {
                (f64::from(base_accuracy) * self.config.crit_accuracy).floor() as i32
            } else {
                base_accuracy
            };
            let chance = formulas::hit_chance(accuracy, defence_roll).clamp(0.0, 1.0);

            let landed = rng.gen_bool(chance);
            let mut damage = 0;
            if landed {
                let other_mult = if critical { self.config.crit_damage } else { 1.0 };
                let max_hit = formulas::max_hit(strength_level, strength_bonus, 1.0, other_mult);
                damage = self.roll_damage(rng, max_hit, damage_mult);
                self.deliver_hit(attacker, defender, damage, weapon_def, rng);
            }
            records.push(HitRecord {
                tick,
                attacker: attacker.id,
                defender: defender.id,
                landed,
                damage,
                special: false,
                critical,
                splash: false,
            });
        }
        records
    }

    /// Defence roll with the defender's style and status multipliers
    /// folded in.
    fn effective_defence_roll(&self, defender: &Entity, kind: crate::entity::AttackKind) -> i32 {
        let class = defender
            .weapon
            .and_then(|w| self.catalogs.specials.get(w))
            .map_or(WeaponClass::Crush, |d| d.class);
        let style = defender
            .style
            .map_or(StyleDef::NEUTRAL, |s| self.catalogs.styles.resolve(class, s));
        let level = defender.stats.defence + style.invisible_defence;
        let base = formulas::defence_roll(level, defender.bonus.defence(kind));
        let mult = status::defence_multiplier(defender, &self.catalogs.effects);
        (f64::from(base) * mult).floor() as i32
    }

    /// Draws a damage value in `[0, max_hit]` and applies the attacker's
    /// status damage multiplier.
    fn roll_damage(&self, rng: &mut ChaCha8Rng, max_hit: u32, damage_mult: f64) -> u32 {
        let rolled = rng.gen_range(0..=max_hit);
        (f64::from(rolled) * damage_mult).floor() as u32
    }

    /// Step 4: applies damage and rolls the weapon's on-hit effect proc.
    fn deliver_hit(
        &self,
        attacker: &mut Entity,
        defender: &mut Entity,
        damage: u32,
        weapon_def: Option<&WeaponDef>,
        rng: &mut ChaCha8Rng,
    ) {
        defender.apply_damage(damage);
        if let Some(effect) = weapon_def.and_then(|d| d.apply_on_hit) {
            if rng.gen_bool(self.config.proc_chance) {
                if status::apply_effect(defender, effect, &self.catalogs.effects) {
                    debug!(
                        attacker = %attacker.name,
                        defender = %defender.name,
                        effect = %effect,
                        "on-hit effect applied"
                    );
                }
            }
        }
    }
}
