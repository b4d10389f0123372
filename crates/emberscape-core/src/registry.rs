//! Monster definitions and spawn management.
//!
//! The [`MonsterRegistry`] owns the monster bestiary: immutable
//! [`MonsterDef`] records loaded from JSON (or the built-in set), plus the
//! book-keeping for live spawns. Spawning mints a fresh [`EntityId`] from a
//! monotonic counter and materialises an NPC [`Entity`] at full hit points;
//! the registry never holds the entity itself; ownership moves to the
//! caller and on into a combat session.
//!
//! # Loading
//!
//! Definition files are JSON arrays. Malformed records are skipped with a
//! warning rather than failing the whole load, so one bad bestiary entry
//! cannot take the service down; a file that is not a JSON array at all is
//! still an error.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

use crate::catalog::specials::WeaponId;
use crate::catalog::styles::CombatStyle;
use crate::entity::{AttackKind, CombatStats, Entity, EntityId, EquipmentBonus};
use crate::error::RegistryError;
use crate::formulas;

/// Spawned monsters receive identifiers at or above this value, keeping
/// them disjoint from host-assigned player identifiers.
const SPAWN_ID_BASE: u64 = 1 << 32;

/// Unique identifier for a monster definition.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a `MonsterId` from a raw `u32` value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw `u32` value of this identifier.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl std::fmt::Debug for MonsterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MonsterId({})", self.0)
    }
}

impl std::fmt::Display for MonsterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for MonsterId {
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

/// One entry in a monster's drop table.
///
/// Each entry rolls independently: a monster can drop several items from
/// one kill, or nothing at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropEntry {
    /// Item name.
    pub item: String,
    /// Probability of dropping, in `[0, 1]`.
    pub chance: f64,
}

/// Immutable definition of one monster type.
///
/// Only `id` and `name` are required in a JSON record; every other field
/// has a serde default so bestiary files stay terse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterDef {
    /// Definition identifier.
    pub id: MonsterId,
    /// Display name used in transcripts and lookups.
    pub name: String,
    /// Skill levels.
    #[serde(default)]
    pub stats: CombatStats,
    /// Gear-equivalent bonuses.
    #[serde(default)]
    pub bonus: EquipmentBonus,
    /// Equipped weapon, if the monster fights with one.
    #[serde(default)]
    pub weapon: Option<WeaponId>,
    /// Attack interval in simulated-time units.
    #[serde(default = "default_attack_speed")]
    pub attack_speed: f32,
    /// Combat style the monster fights with.
    #[serde(default)]
    pub attack_style: Option<CombatStyle>,
    /// Attack lane the monster is weakest against, for host-side hinting.
    #[serde(default)]
    pub weakness: Option<AttackKind>,
    /// Whether the monster attacks players on sight.
    #[serde(default)]
    pub aggressive: bool,
    /// Drop table rolled on death.
    #[serde(default)]
    pub drops: Vec<DropEntry>,
    /// Slayer level required to damage this monster.
    #[serde(default = "default_slayer_level")]
    pub slayer_level: u32,
    /// Slayer experience awarded on a kill.
    #[serde(default)]
    pub slayer_xp: f64,
    /// Ticks until the monster respawns after death.
    #[serde(default)]
    pub respawn_ticks: u32,
}

fn default_slayer_level() -> u32 {
    1
}

fn default_attack_speed() -> f32 {
    2.4
}

impl MonsterDef {
    /// Returns the aggregate combat level derived from the stat block.
    #[must_use]
    pub fn combat_level(&self) -> u32 {
        formulas::combat_level(&self.stats)
    }
}

/// The monster bestiary plus live-spawn book-keeping.
#[derive(Debug)]
pub struct MonsterRegistry {
    defs: BTreeMap<MonsterId, MonsterDef>,
    /// Live spawns, keyed by the entity id minted for them.
    spawns: BTreeMap<EntityId, MonsterId>,
    next_spawn: u64,
    /// Drop-table RNG, independent of any combat session's stream.
    rng: ChaCha8Rng,
}

impl MonsterRegistry {
    /// Creates an empty registry with the given drop-roll seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            defs: BTreeMap::new(),
            spawns: BTreeMap::new(),
            next_spawn: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a registry pre-loaded with the built-in bestiary.
    #[must_use]
    pub fn builtin(seed: u64) -> Self {
        let mut registry = Self::new(seed);
        for def in builtin_defs() {
            registry.insert(def);
        }
        registry
    }

    /// Inserts (or replaces) a definition directly.
    pub fn insert(&mut self, def: MonsterDef) {
        self.defs.insert(def.id, def);
    }

    /// Loads definitions from a JSON array, skipping malformed records.
    ///
    /// Returns the number of definitions loaded.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Io`] if the reader fails, or
    /// [`RegistryError::Parse`] if the input is not a JSON array.
    pub fn load_from_reader<R: Read>(&mut self, mut reader: R) -> Result<usize, RegistryError> {
        let mut raw = String::new();
        reader.read_to_string(&mut raw)?;
        let records: Vec<serde_json::Value> = serde_json::from_str(&raw)?;

        let mut loaded = 0;
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<MonsterDef>(record) {
                Ok(def) => {
                    debug!(monster = %def.name, id = %def.id, "loaded monster definition");
                    self.insert(def);
                    loaded += 1;
                }
                Err(error) => {
                    warn!(index, %error, "skipping malformed monster record");
                }
            }
        }
        Ok(loaded)
    }

    /// Loads definitions from a JSON file, skipping malformed records.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Io`] if the file cannot be opened, or
    /// [`RegistryError::Parse`] if it is not a JSON array.
    pub fn load_from_path<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, RegistryError> {
        let file = std::fs::File::open(path)?;
        self.load_from_reader(std::io::BufReader::new(file))
    }

    /// Looks up a definition by id.
    #[must_use]
    pub fn get(&self, id: MonsterId) -> Option<&MonsterDef> {
        self.defs.get(&id)
    }

    /// Looks up a definition by display name, case-insensitively.
    #[must_use]
    pub fn monster_by_name(&self, name: &str) -> Option<&MonsterDef> {
        self.defs
            .values()
            .find(|def| def.name.eq_ignore_ascii_case(name))
    }

    /// Returns all monsters whose combat level falls in `min..=max`,
    /// ordered by definition id.
    #[must_use]
    pub fn monsters_in_level_range(&self, min: u32, max: u32) -> Vec<&MonsterDef> {
        self.defs
            .values()
            .filter(|def| (min..=max).contains(&def.combat_level()))
            .collect()
    }

    /// Returns all monsters damageable at or below the given slayer level,
    /// ordered by definition id.
    #[must_use]
    pub fn monsters_by_slayer_level(&self, max: u32) -> Vec<&MonsterDef> {
        self.defs
            .values()
            .filter(|def| def.slayer_level <= max)
            .collect()
    }

    /// Returns the number of definitions loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Returns `true` if no definitions are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Returns the number of live spawns.
    #[must_use]
    pub fn active_spawns(&self) -> usize {
        self.spawns.len()
    }

    /// Spawns an instance of a monster, minting a fresh entity id.
    ///
    /// The returned entity is owned by the caller; the registry only keeps
    /// the id-to-definition mapping so the spawn can be despawned later.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownMonster`] if no definition exists.
    pub fn spawn(&mut self, id: MonsterId) -> Result<Entity, RegistryError> {
        let def = self
            .defs
            .get(&id)
            .ok_or(RegistryError::UnknownMonster(id))?;

        self.next_spawn += 1;
        let entity_id = EntityId::new(SPAWN_ID_BASE + self.next_spawn);

        let mut entity = Entity::npc(entity_id, def.name.clone(), def.stats, def.bonus);
        entity.weapon = def.weapon;
        entity.style = def.attack_style;
        entity.attack_speed = Some(def.attack_speed);

        self.spawns.insert(entity_id, id);
        debug!(monster = %def.name, spawn = %entity_id, "spawned");
        Ok(entity)
    }

    /// Removes a live spawn, returning which monster it was.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownSpawn`] if the id was never spawned
    /// or was already despawned.
    pub fn despawn(&mut self, entity_id: EntityId) -> Result<MonsterId, RegistryError> {
        self.spawns
            .remove(&entity_id)
            .ok_or(RegistryError::UnknownSpawn(entity_id))
    }

    /// Rolls a monster's drop table. Each entry rolls independently.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownMonster`] if no definition exists.
    pub fn roll_drops(&mut self, id: MonsterId) -> Result<Vec<String>, RegistryError> {
        let def = self
            .defs
            .get(&id)
            .ok_or(RegistryError::UnknownMonster(id))?;

        let mut dropped = Vec::new();
        for entry in &def.drops {
            let chance = entry.chance.clamp(0.0, 1.0);
            if self.rng.gen_bool(chance) {
                dropped.push(entry.item.clone());
            }
        }
        Ok(dropped)
    }
}

/// The built-in bestiary: a small spread of levels for smoke tests and
/// hosts that have no definition file yet.
fn builtin_defs() -> Vec<MonsterDef> {
    vec![
        MonsterDef {
            id: MonsterId::new(1),
            name: "Goblin".to_string(),
            stats: CombatStats {
                attack: 1,
                strength: 1,
                defence: 1,
                hitpoints: 5,
                ..CombatStats::default()
            },
            bonus: EquipmentBonus::default(),
            weapon: None,
            attack_speed: 2.4,
            attack_style: None,
            weakness: Some(AttackKind::Crush),
            aggressive: false,
            drops: vec![DropEntry {
                item: "bones".to_string(),
                chance: 1.0,
            }],
            slayer_level: 1,
            slayer_xp: 5.0,
            respawn_ticks: 25,
        },
        MonsterDef {
            id: MonsterId::new(2),
            name: "Hill Giant".to_string(),
            stats: CombatStats {
                attack: 18,
                strength: 22,
                defence: 26,
                hitpoints: 35,
                ..CombatStats::default()
            },
            bonus: EquipmentBonus {
                melee_strength: 10,
                ..EquipmentBonus::default()
            },
            weapon: None,
            attack_speed: 3.6,
            attack_style: None,
            weakness: Some(AttackKind::Stab),
            aggressive: true,
            drops: vec![
                DropEntry {
                    item: "big bones".to_string(),
                    chance: 1.0,
                },
                DropEntry {
                    item: "giant key".to_string(),
                    chance: 0.008,
                },
            ],
            slayer_level: 1,
            slayer_xp: 35.0,
            respawn_ticks: 40,
        },
        MonsterDef {
            id: MonsterId::new(3),
            name: "Cave Horror".to_string(),
            stats: CombatStats {
                attack: 65,
                strength: 60,
                defence: 45,
                hitpoints: 55,
                ..CombatStats::default()
            },
            bonus: EquipmentBonus {
                attack_slash: 20,
                melee_strength: 18,
                defence_slash: 25,
                defence_crush: 25,
                defence_stab: 25,
                ..EquipmentBonus::default()
            },
            weapon: None,
            attack_speed: 2.4,
            attack_style: Some(CombatStyle::Aggressive),
            weakness: Some(AttackKind::Crush),
            aggressive: true,
            drops: vec![
                DropEntry {
                    item: "black mask".to_string(),
                    chance: 0.002,
                },
                DropEntry {
                    item: "bones".to_string(),
                    chance: 1.0,
                },
            ],
            slayer_level: 58,
            slayer_xp: 55.0,
            respawn_ticks: 60,
        },
        MonsterDef {
            id: MonsterId::new(4),
            name: "Abyssal Demon".to_string(),
            stats: CombatStats {
                attack: 97,
                strength: 67,
                defence: 67,
                hitpoints: 85,
                ..CombatStats::default()
            },
            bonus: EquipmentBonus {
                attack_slash: 40,
                melee_strength: 30,
                defence_slash: 40,
                defence_crush: 40,
                defence_stab: 40,
                defence_magic: 20,
                defence_ranged: 40,
                ..EquipmentBonus::default()
            },
            weapon: Some(WeaponId::AbyssalWhip),
            attack_speed: 2.4,
            attack_style: Some(CombatStyle::Accurate),
            weakness: Some(AttackKind::Slash),
            aggressive: true,
            drops: vec![
                DropEntry {
                    item: "abyssal whip".to_string(),
                    chance: 0.002,
                },
                DropEntry {
                    item: "ashes".to_string(),
                    chance: 1.0,
                },
            ],
            slayer_level: 85,
            slayer_xp: 150.0,
            respawn_ticks: 50,
        },
    ]
}
