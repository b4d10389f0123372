//! Combat style catalog.
//!
//! Every weapon class offers a small move set of combat styles. The chosen
//! style grants invisible stat bonuses that are folded into the formula
//! inputs before any roll is made, and may adjust the weapon's pacing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::entity::AttackKind;

/// The class of an equipped weapon.
///
/// Classes map one-to-one onto the attack lane they hit with, and select
/// which combat styles are available.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeaponClass {
    /// Daggers, spears, rapiers.
    Stab,
    /// Scimitars, swords, claws.
    Slash,
    /// Mauls, maces, hammers.
    Crush,
    /// Bows, crossbows, blowpipes.
    Ranged,
    /// Staves and wands.
    Magic,
}

impl WeaponClass {
    /// Returns the attack lane this class hits with.
    #[must_use]
    pub const fn attack_kind(self) -> AttackKind {
        match self {
            Self::Stab => AttackKind::Stab,
            Self::Slash => AttackKind::Slash,
            Self::Crush => AttackKind::Crush,
            Self::Ranged => AttackKind::Ranged,
            Self::Magic => AttackKind::Magic,
        }
    }
}

/// A selectable combat style.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CombatStyle {
    /// Bonus to accuracy.
    Accurate,
    /// Bonus to damage (melee only).
    Aggressive,
    /// Bonus to defence.
    Defensive,
    /// Small bonus to everything (melee only).
    Controlled,
    /// Faster attacks (ranged only).
    Rapid,
    /// Defence bonus at range (ranged only).
    Longrange,
}

impl fmt::Display for CombatStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Accurate => "accurate",
            Self::Aggressive => "aggressive",
            Self::Defensive => "defensive",
            Self::Controlled => "controlled",
            Self::Rapid => "rapid",
            Self::Longrange => "longrange",
        };
        write!(f, "{name}")
    }
}

/// Invisible bonuses granted by an active combat style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleDef {
    /// Added to the accuracy level before the accuracy roll.
    pub invisible_attack: u32,
    /// Added to the strength level before the max-hit computation.
    pub invisible_strength: u32,
    /// Added to the defence level before the defence roll.
    pub invisible_defence: u32,
    /// Adjustment to the weapon's attack interval, in simulated-time units.
    pub speed_delta: f32,
}

impl StyleDef {
    /// A style that grants nothing. Used when an entity has no style
    /// selected or picked one outside its weapon's move set.
    pub const NEUTRAL: Self = Self {
        invisible_attack: 0,
        invisible_strength: 0,
        invisible_defence: 0,
        speed_delta: 0.0,
    };
}

/// Read-only catalog of move sets per weapon class.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    defs: BTreeMap<(WeaponClass, CombatStyle), StyleDef>,
}

impl StyleCatalog {
    /// Builds the canonical move sets.
    #[must_use]
    pub fn builtin() -> Self {
        let mut defs = BTreeMap::new();

        let accurate = StyleDef {
            invisible_attack: 3,
            ..StyleDef::NEUTRAL
        };
        let aggressive = StyleDef {
            invisible_strength: 3,
            ..StyleDef::NEUTRAL
        };
        let defensive = StyleDef {
            invisible_defence: 3,
            ..StyleDef::NEUTRAL
        };
        let controlled = StyleDef {
            invisible_attack: 1,
            invisible_strength: 1,
            invisible_defence: 1,
            ..StyleDef::NEUTRAL
        };

        for class in [WeaponClass::Stab, WeaponClass::Slash, WeaponClass::Crush] {
            defs.insert((class, CombatStyle::Accurate), accurate);
            defs.insert((class, CombatStyle::Aggressive), aggressive);
            defs.insert((class, CombatStyle::Defensive), defensive);
            defs.insert((class, CombatStyle::Controlled), controlled);
        }

        defs.insert((WeaponClass::Ranged, CombatStyle::Accurate), accurate);
        defs.insert(
            (WeaponClass::Ranged, CombatStyle::Rapid),
            StyleDef {
                speed_delta: -0.6,
                ..StyleDef::NEUTRAL
            },
        );
        defs.insert(
            (WeaponClass::Ranged, CombatStyle::Longrange),
            StyleDef {
                invisible_defence: 3,
                ..StyleDef::NEUTRAL
            },
        );

        defs.insert((WeaponClass::Magic, CombatStyle::Accurate), accurate);
        defs.insert((WeaponClass::Magic, CombatStyle::Defensive), defensive);

        Self { defs }
    }

    /// Returns the style definition for a class/style pair.
    ///
    /// A style outside the class's move set resolves to
    /// [`StyleDef::NEUTRAL`]; callers are expected to have validated the
    /// selection at the command boundary.
    #[must_use]
    pub fn resolve(&self, class: WeaponClass, style: CombatStyle) -> StyleDef {
        self.defs.get(&(class, style)).copied().unwrap_or_else(|| {
            tracing::debug!(?class, %style, "style outside move set, using neutral bonuses");
            StyleDef::NEUTRAL
        })
    }

    /// Returns `true` if the style belongs to the class's move set.
    #[must_use]
    pub fn is_valid(&self, class: WeaponClass, style: CombatStyle) -> bool {
        self.defs.contains_key(&(class, style))
    }
}
