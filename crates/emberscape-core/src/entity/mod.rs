//! Combat participant model.
//!
//! This module provides the mutable record for anything that can fight:
//! - [`EntityId`]: unique identifier for participants
//! - [`CombatStats`]: the seven combat-relevant skill levels
//! - [`EquipmentBonus`]: additive gear bonuses fed into the formula library
//! - [`Entity`]: the complete participant (stats, gear, hit points, special
//!   energy, active style, status effects)
//!
//! Entities are created when a player registers or a monster spawns, are
//! mutated by every combat tick, and are handed back to the caller for
//! persistence when the session ends. The engine never stores them beyond
//! the lifetime of a session.
//!
//! # Example
//!
//! ```
//! use emberscape_core::entity::{CombatStats, Entity, EntityId, EquipmentBonus};
//!
//! let stats = CombatStats { attack: 60, strength: 60, ..CombatStats::default() };
//! let player = Entity::player(EntityId::new(1), "Astra", stats, EquipmentBonus::default());
//!
//! assert!(player.is_alive());
//! assert_eq!(player.current_hp, player.max_hp);
//! ```

pub mod status;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::effects::StatusEffectId;
use crate::catalog::specials::WeaponId;
use crate::catalog::styles::CombatStyle;
use crate::formulas;

pub use status::ActiveEffect;

/// Maximum special-attack energy an entity can hold.
pub const MAX_SPECIAL_ENERGY: u8 = 100;

/// Unique identifier for a combat participant.
///
/// Player identifiers are assigned by the host; monster spawns receive
/// fresh identifiers from the [`crate::registry::MonsterRegistry`].
///
/// # Ordering
///
/// Identifiers order by their numeric value, which keeps registry and log
/// iteration deterministic.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates an `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// The seven combat-relevant skill levels.
///
/// # Invariant
///
/// All levels are at least 1. `hitpoints` commonly starts at 10 for fresh
/// players and defines the maximum hit points of a new [`Entity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStats {
    /// Melee accuracy level.
    pub attack: u32,
    /// Melee damage level.
    pub strength: u32,
    /// Damage avoidance level.
    pub defence: u32,
    /// Ranged accuracy and damage level.
    pub ranged: u32,
    /// Magic accuracy and damage level.
    pub magic: u32,
    /// Maximum hit points level.
    pub hitpoints: u32,
    /// Prayer level (feeds the combat-level base term).
    pub prayer: u32,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            attack: 1,
            strength: 1,
            defence: 1,
            ranged: 1,
            magic: 1,
            hitpoints: 10,
            prayer: 1,
        }
    }
}

/// The kind of attack a weapon class delivers.
///
/// Selects which attack bonus lane the attacker uses and which defence
/// bonus lane the defender answers with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    /// Piercing melee.
    Stab,
    /// Cutting melee.
    Slash,
    /// Blunt melee.
    Crush,
    /// Spells and powered staves.
    Magic,
    /// Bows, crossbows and thrown weapons.
    Ranged,
}

impl AttackKind {
    /// Returns `true` for the three melee lanes.
    #[must_use]
    pub const fn is_melee(self) -> bool {
        matches!(self, Self::Stab | Self::Slash | Self::Crush)
    }
}

/// Additive equipment bonuses fed into the formula library.
///
/// All fields default to zero; every field is `#[serde(default)]` so
/// monster definitions only need to list the lanes they care about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentBonus {
    /// Stab attack bonus.
    pub attack_stab: i32,
    /// Slash attack bonus.
    pub attack_slash: i32,
    /// Crush attack bonus.
    pub attack_crush: i32,
    /// Magic attack bonus.
    pub attack_magic: i32,
    /// Ranged attack bonus.
    pub attack_ranged: i32,
    /// Stab defence bonus.
    pub defence_stab: i32,
    /// Slash defence bonus.
    pub defence_slash: i32,
    /// Crush defence bonus.
    pub defence_crush: i32,
    /// Magic defence bonus.
    pub defence_magic: i32,
    /// Ranged defence bonus.
    pub defence_ranged: i32,
    /// Melee strength bonus.
    pub melee_strength: i32,
    /// Ranged strength bonus.
    pub ranged_strength: i32,
    /// Magic damage bonus.
    pub magic_strength: i32,
    /// Prayer bonus.
    pub prayer: i32,
}

impl EquipmentBonus {
    /// Returns the attack bonus for the given attack kind.
    #[must_use]
    pub const fn attack(&self, kind: AttackKind) -> i32 {
        match kind {
            AttackKind::Stab => self.attack_stab,
            AttackKind::Slash => self.attack_slash,
            AttackKind::Crush => self.attack_crush,
            AttackKind::Magic => self.attack_magic,
            AttackKind::Ranged => self.attack_ranged,
        }
    }

    /// Returns the defence bonus against the given attack kind.
    #[must_use]
    pub const fn defence(&self, kind: AttackKind) -> i32 {
        match kind {
            AttackKind::Stab => self.defence_stab,
            AttackKind::Slash => self.defence_slash,
            AttackKind::Crush => self.defence_crush,
            AttackKind::Magic => self.defence_magic,
            AttackKind::Ranged => self.defence_ranged,
        }
    }

    /// Returns the strength bonus for the given attack kind.
    #[must_use]
    pub const fn strength(&self, kind: AttackKind) -> i32 {
        match kind {
            AttackKind::Magic => self.magic_strength,
            AttackKind::Ranged => self.ranged_strength,
            _ => self.melee_strength,
        }
    }
}

/// A complete combat participant.
///
/// Fields are public in the style of a component record: the orchestrator
/// and status processor mutate them directly, but hit-point changes should
/// go through [`Entity::apply_damage`] and [`Entity::heal`] so the
/// `0 <= current_hp <= max_hp` invariant holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Display name used in combat transcripts.
    pub name: String,
    /// Skill levels.
    pub stats: CombatStats,
    /// Gear bonuses.
    pub bonus: EquipmentBonus,
    /// Current hit points, always in `0..=max_hp`.
    pub current_hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Aggregate combat level, derived from `stats` at construction.
    pub combat_level: u32,
    /// `true` for player-controlled entities. Only players regenerate
    /// special-attack energy.
    pub player: bool,
    /// Special-attack energy in `0..=100`.
    pub special_energy: u8,
    /// Run energy in `0..=100`. Drained by some special attacks.
    pub run_energy: u8,
    /// Attack interval override in simulated-time units. Set for monster
    /// spawns whose definition carries its own speed; players derive their
    /// interval from the equipped weapon.
    pub attack_speed: Option<f32>,
    /// Equipped weapon, if any. Resolves the special-attack catalog entry
    /// and on-hit effect.
    pub weapon: Option<WeaponId>,
    /// Active combat style, if one has been selected.
    pub style: Option<CombatStyle>,
    /// Whether the next attack should attempt the weapon's special.
    pub queued_special: bool,
    /// Currently active status effects.
    pub effects: Vec<ActiveEffect>,
}

impl Entity {
    /// Creates a player-controlled entity at full hit points.
    #[must_use]
    pub fn player(
        id: EntityId,
        name: impl Into<String>,
        stats: CombatStats,
        bonus: EquipmentBonus,
    ) -> Self {
        Self::build(id, name.into(), stats, bonus, true)
    }

    /// Creates an NPC entity at full hit points.
    #[must_use]
    pub fn npc(
        id: EntityId,
        name: impl Into<String>,
        stats: CombatStats,
        bonus: EquipmentBonus,
    ) -> Self {
        Self::build(id, name.into(), stats, bonus, false)
    }

    fn build(
        id: EntityId,
        name: String,
        stats: CombatStats,
        bonus: EquipmentBonus,
        player: bool,
    ) -> Self {
        let combat_level = formulas::combat_level(&stats);
        Self {
            id,
            name,
            stats,
            bonus,
            current_hp: stats.hitpoints,
            max_hp: stats.hitpoints,
            combat_level,
            player,
            special_energy: MAX_SPECIAL_ENERGY,
            run_energy: 100,
            attack_speed: None,
            weapon: None,
            style: None,
            queued_special: false,
            effects: Vec::new(),
        }
    }

    /// Sets the equipped weapon (builder style).
    #[must_use]
    pub fn with_weapon(mut self, weapon: WeaponId) -> Self {
        self.weapon = Some(weapon);
        self
    }

    /// Sets the active combat style (builder style).
    #[must_use]
    pub fn with_style(mut self, style: CombatStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Returns `true` while the entity has hit points left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Subtracts damage, flooring at zero.
    ///
    /// Returns the hit points actually removed.
    pub fn apply_damage(&mut self, damage: u32) -> u32 {
        let dealt = damage.min(self.current_hp);
        self.current_hp -= dealt;
        dealt
    }

    /// Restores hit points, capped at `max_hp`.
    pub fn heal(&mut self, amount: u32) {
        self.current_hp = (self.current_hp + amount).min(self.max_hp);
    }

    /// Regenerates special-attack energy, capped at
    /// [`MAX_SPECIAL_ENERGY`]. No-op for NPCs.
    pub fn regen_special(&mut self, amount: u8) {
        if self.player {
            self.special_energy = self.special_energy.saturating_add(amount).min(MAX_SPECIAL_ENERGY);
        }
    }

    /// Requests a special attack for the next resolution.
    pub fn queue_special(&mut self) {
        self.queued_special = true;
    }

    /// Returns `true` if the given status effect is currently active.
    #[must_use]
    pub fn has_effect(&self, id: StatusEffectId) -> bool {
        self.effects.iter().any(|e| e.id == id)
    }

    /// Returns a mutable handle to the given active effect, if present.
    pub fn effect_mut(&mut self, id: StatusEffectId) -> Option<&mut ActiveEffect> {
        self.effects.iter_mut().find(|e| e.id == id)
    }
}
