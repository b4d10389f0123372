//! Combat session state.
//!
//! A [`Session`] is one active encounter. It owns both participants for
//! the duration of the fight (taking the `Entity` values by move is what
//! enforces the single-session-per-entity rule), plus the ordered hit log
//! and the termination state.
//!
//! # Lifecycle
//!
//! `Pending → Running → Finished`. A session becomes `Running` on its
//! first tick and `Finished` when one principal's hit points reach zero
//! (or the driver gives up via cancellation or the tick ceiling). Once
//! finished, a session is immutable; the caller takes the final entity
//! state back with [`Session::into_parts`] and persists it.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;

use crate::entity::{Entity, EntityId};

/// Lifecycle state of a combat session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Created, but no tick has been processed yet.
    Pending,
    /// At least one tick has been processed.
    Running,
    /// Terminal. No further ticks are accepted.
    Finished,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

/// One entry in a session's hit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitRecord {
    /// Tick on which the hit resolved.
    pub tick: u64,
    /// Who attacked.
    pub attacker: EntityId,
    /// Who was hit (or missed).
    pub defender: EntityId,
    /// Whether the attack landed.
    pub landed: bool,
    /// Damage dealt (zero on a miss).
    pub damage: u32,
    /// Resolved as part of a special attack.
    pub special: bool,
    /// Critical hit.
    pub critical: bool,
    /// Multi-combat splash damage, never subject to an accuracy roll.
    pub splash: bool,
}

/// An active encounter between two entities (plus optional area targets).
#[derive(Debug, Clone)]
pub struct Session {
    id: u64,
    state: SessionState,
    /// The two principals. Which one is attacking is tracked separately so
    /// a role swap is an index flip, not a move.
    participants: [Entity; 2],
    attacker_idx: usize,
    multi_combat: bool,
    splash_targets: Vec<Entity>,
    hit_log: Vec<HitRecord>,
    tick: u64,
    started_at: SystemTime,
    winner: Option<EntityId>,
    /// Per-session RNG, seeded from the engine's master seed and the
    /// session id. Sessions are independently reproducible.
    pub(crate) rng: ChaCha8Rng,
}

impl Session {
    pub(crate) fn new(
        id: u64,
        attacker: Entity,
        defender: Entity,
        multi_combat: bool,
        rng: ChaCha8Rng,
    ) -> Self {
        Self {
            id,
            state: SessionState::Pending,
            participants: [attacker, defender],
            attacker_idx: 0,
            multi_combat,
            splash_targets: Vec::new(),
            hit_log: Vec::new(),
            tick: 0,
            started_at: SystemTime::now(),
            winner: None,
            rng,
        }
    }

    /// Returns the session identifier.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Returns `true` once the session has reached its terminal state.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    /// Returns the winning entity's id, if the fight produced one.
    ///
    /// A session finished by cancellation or the tick ceiling has no
    /// winner.
    #[must_use]
    pub const fn winner(&self) -> Option<EntityId> {
        self.winner
    }

    /// Returns the number of ticks processed so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Returns when the session was created.
    #[must_use]
    pub const fn started_at(&self) -> SystemTime {
        self.started_at
    }

    /// Returns `true` if splash damage applies to area targets.
    #[must_use]
    pub const fn multi_combat(&self) -> bool {
        self.multi_combat
    }

    /// Returns the entity currently attacking.
    #[must_use]
    pub fn attacker(&self) -> &Entity {
        &self.participants[self.attacker_idx]
    }

    /// Returns the entity currently defending.
    #[must_use]
    pub fn defender(&self) -> &Entity {
        &self.participants[1 - self.attacker_idx]
    }

    /// Returns the additional area targets registered for multi-combat.
    #[must_use]
    pub fn splash_targets(&self) -> &[Entity] {
        &self.splash_targets
    }

    /// Registers an additional area target for multi-combat splash.
    ///
    /// # Panics
    ///
    /// Panics if the session is already finished: registering targets
    /// mid-teardown is a caller bug.
    pub fn add_splash_target(&mut self, target: Entity) {
        assert!(
            !self.is_finished(),
            "cannot add splash targets to a finished session"
        );
        self.splash_targets.push(target);
    }

    /// Returns the raw hit log.
    #[must_use]
    pub fn hit_log(&self) -> &[HitRecord] {
        &self.hit_log
    }

    /// Renders the hit log as a human-readable transcript, one line per
    /// entry. Does not mutate session state and may be called mid-combat
    /// for a live view.
    #[must_use]
    pub fn combat_log(&self) -> Vec<String> {
        self.hit_log
            .iter()
            .map(|record| {
                let attacker = self.name_of(record.attacker);
                let defender = self.name_of(record.defender);
                if record.splash {
                    format!(
                        "[t{}] {attacker} splashes {defender} for {}",
                        record.tick, record.damage
                    )
                } else if !record.landed {
                    format!("[t{}] {attacker} misses {defender}", record.tick)
                } else {
                    let mut line = format!(
                        "[t{}] {attacker} hits {defender} for {}",
                        record.tick, record.damage
                    );
                    if record.special {
                        line.push_str(" (special)");
                    }
                    if record.critical {
                        line.push_str(" (critical)");
                    }
                    line
                }
            })
            .collect()
    }

    /// Consumes the session, returning both principals, the splash
    /// targets, and the hit log for persistence.
    #[must_use]
    pub fn into_parts(self) -> (Entity, Entity, Vec<Entity>, Vec<HitRecord>) {
        let [a, b] = self.participants;
        (a, b, self.splash_targets, self.hit_log)
    }

    fn name_of(&self, id: EntityId) -> &str {
        self.participants
            .iter()
            .chain(self.splash_targets.iter())
            .find(|e| e.id == id)
            .map_or("unknown", |e| e.name.as_str())
    }

    // -------------------------------------------------------------------
    // Engine-internal mutation
    // -------------------------------------------------------------------

    /// Marks the session running and advances the tick counter.
    pub(crate) fn begin_tick(&mut self) -> u64 {
        assert!(
            !self.is_finished(),
            "tick processed on a finished session (caller bug)"
        );
        if self.state == SessionState::Pending {
            self.state = SessionState::Running;
        }
        self.tick += 1;
        self.tick
    }

    /// Mutable access to attacker and defender at once.
    pub(crate) fn combatants_mut(&mut self) -> (&mut Entity, &mut Entity) {
        let (left, right) = self.participants.split_at_mut(1);
        if self.attacker_idx == 0 {
            (&mut left[0], &mut right[0])
        } else {
            (&mut right[0], &mut left[0])
        }
    }

    /// Mutable access to both combatants and the session RNG at once.
    /// Field-level split borrow so the engine can roll while mutating.
    pub(crate) fn tick_parts(&mut self) -> (&mut Entity, &mut Entity, &mut ChaCha8Rng) {
        let (left, right) = self.participants.split_at_mut(1);
        let (attacker, defender) = if self.attacker_idx == 0 {
            (&mut left[0], &mut right[0])
        } else {
            (&mut right[0], &mut left[0])
        };
        (attacker, defender, &mut self.rng)
    }

    pub(crate) fn splash_targets_mut(&mut self) -> &mut [Entity] {
        &mut self.splash_targets
    }

    pub(crate) fn push_record(&mut self, record: HitRecord) {
        self.hit_log.push(record);
    }

    /// Alternates the attacker/defender roles.
    pub(crate) fn swap_roles(&mut self) {
        self.attacker_idx = 1 - self.attacker_idx;
    }

    /// Moves the session to its terminal state.
    pub(crate) fn finish(&mut self, winner: Option<EntityId>) {
        self.state = SessionState::Finished;
        self.winner = winner;
    }
}
