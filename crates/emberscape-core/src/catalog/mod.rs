//! Static combat catalogs.
//!
//! Catalogs are immutable, keyed lookup tables built once at process start
//! and passed by explicit dependency injection into the
//! [`crate::engine::CombatEngine`]. Nothing in the engine reaches for
//! ambient globals, and every key is a closed enum so unknown identifiers
//! are rejected at the boundary instead of defaulting deep inside formula
//! evaluation.
//!
//! - [`styles`]: per-weapon-class move sets and their invisible bonuses
//! - [`specials`]: weapon definitions and special attacks
//! - [`effects`]: status effect definitions

pub mod effects;
pub mod specials;
pub mod styles;

use effects::EffectCatalog;
use specials::SpecialCatalog;
use styles::StyleCatalog;

/// The full set of catalogs consumed by every tick resolution.
///
/// # Example
///
/// ```
/// use emberscape_core::catalog::Catalogs;
/// use emberscape_core::catalog::specials::WeaponId;
///
/// let catalogs = Catalogs::builtin();
/// assert!(catalogs.specials.get(WeaponId::DragonClaws).is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Catalogs {
    /// Combat style move sets.
    pub styles: StyleCatalog,
    /// Weapon and special-attack definitions.
    pub specials: SpecialCatalog,
    /// Status effect definitions.
    pub effects: EffectCatalog,
}

impl Catalogs {
    /// Builds the canonical catalogs.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            styles: StyleCatalog::builtin(),
            specials: SpecialCatalog::builtin(),
            effects: EffectCatalog::builtin(),
        }
    }
}

impl Default for Catalogs {
    fn default() -> Self {
        Self::builtin()
    }
}
