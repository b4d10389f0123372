//! # Emberscape Core
//!
//! Turn-based combat resolution engine for Emberscape.
//!
//! This crate provides the deterministic combat core: the formula library,
//! catalogs, status-effect processing, monster registry, and the tick
//! orchestrator that drives a fight from start to finish.
//!
//! ## Architecture
//!
//! - **Formulas**: pure accuracy, max-hit and combat-level functions
//! - **Catalogs**: immutable style, weapon and status-effect tables
//! - **Entities**: mutable participant records, owned by their session
//! - **Sessions**: per-fight state, hit log and RNG stream
//! - **Engine**: the stateless orchestrator resolving one tick at a time
//!
//! ## Usage
//!
//! ```rust
//! use emberscape_core::engine::CombatEngine;
//! use emberscape_core::entity::{CombatStats, Entity, EntityId, EquipmentBonus};
//!
//! let engine = CombatEngine::with_seed(42);
//! let hero = Entity::player(EntityId::new(1), "Astra", CombatStats::default(), EquipmentBonus::default());
//! let goblin = Entity::npc(EntityId::new(2), "Goblin", CombatStats::default(), EquipmentBonus::default());
//!
//! let mut session = engine.start_combat(hero, goblin, false)?;
//! while !engine.process_combat_tick(&mut session).finished {}
//! for line in session.combat_log() {
//!     println!("{line}");
//! }
//! # Ok::<(), emberscape_core::error::CombatError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod formulas;
pub mod registry;
pub mod session;
pub mod status;

#[cfg(test)]
mod tests;

pub use catalog::Catalogs;
pub use config::CombatConfig;
pub use engine::{CombatEngine, TickOutcome};
pub use entity::{CombatStats, Entity, EntityId, EquipmentBonus};
pub use error::{CombatError, RegistryError};
pub use registry::{MonsterId, MonsterRegistry};
pub use session::{HitRecord, Session, SessionState};
