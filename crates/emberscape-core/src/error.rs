//! Error types for the combat engine.
//!
//! The engine distinguishes two failure surfaces:
//! - [`CombatError`]: session setup problems reported to the caller
//! - [`RegistryError`]: monster-definition loading and lookup failures
//!
//! Structural invariant violations (ticking a finished session, negative
//! hit points) are programmer errors and fail fast with a panic instead of
//! returning one of these variants.

use thiserror::Error;

use crate::entity::EntityId;
use crate::registry::MonsterId;

/// Errors raised while setting up a combat session.
#[derive(Debug, Error)]
pub enum CombatError {
    /// A participant entered combat with zero hit points.
    #[error("entity {0} has zero hit points and cannot enter combat")]
    DeadCombatant(EntityId),

    /// Both sides of a session were the same entity.
    #[error("entity {0} cannot fight itself")]
    SelfTarget(EntityId),
}

/// Errors raised by the monster registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The definition source could not be read.
    #[error("failed to read monster definitions: {0}")]
    Io(#[from] std::io::Error),

    /// The definition source was not valid JSON.
    #[error("failed to parse monster definitions: {0}")]
    Parse(#[from] serde_json::Error),

    /// No definition exists for the requested monster.
    #[error("unknown monster id {0}")]
    UnknownMonster(MonsterId),

    /// No active spawn exists with the given identifier.
    #[error("unknown spawn id {0}")]
    UnknownSpawn(EntityId),
}
