//! Per-entity status effect state.
//!
//! An [`ActiveEffect`] is the mutable counterpart of a
//! [`crate::catalog::effects::StatusEffectDef`]: the definition is the
//! immutable catalog entry, this struct tracks the countdowns and stacking
//! state for one affliction on one entity.

use serde::{Deserialize, Serialize};

use crate::catalog::effects::{StatusEffectDef, StatusEffectId};

/// A status effect currently attached to an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    /// Which catalog effect this is.
    pub id: StatusEffectId,
    /// Ticks until the effect expires. `None` means the effect lasts until
    /// cured (poison, venom).
    pub remaining: Option<u32>,
    /// Ticks until the next damage-over-time pulse. Unused when the effect
    /// deals no periodic damage.
    pub until_pulse: u32,
    /// Damage dealt per pulse. Grows for stacking effects.
    pub dot_damage: u32,
    /// Re-applications received since the last pulse. Each one raises
    /// `dot_damage` by the catalog's stack increment on the next pulse.
    pub pending_increments: u32,
}

impl ActiveEffect {
    /// Creates the initial state for a freshly applied effect.
    #[must_use]
    pub fn from_def(def: &StatusEffectDef) -> Self {
        Self {
            id: def.id,
            remaining: def.duration,
            until_pulse: def.dot_interval,
            dot_damage: def.dot_damage,
            pending_increments: 0,
        }
    }
}
