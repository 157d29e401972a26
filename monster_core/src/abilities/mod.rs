//! Ability rules - special-cased combat modifiers keyed by numeric id
//!
//! Each monster holds at most one active ability. The rules themselves are
//! data (`AbilityEffect`), and the damage pipeline in [`pipeline`] decides
//! at which point of an attack each effect kind fires.

pub mod pipeline;

use crate::types::AbilityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use pipeline::{DamageContext, DamageOutcome};

/// The active ability of a monster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "source", content = "id", rename_all = "snake_case")]
pub enum Ability {
    #[default]
    None,
    /// Born with it (the species ability)
    Innate(AbilityId),
    /// Rolled onto this individual; supersedes the species ability
    Inherited(AbilityId),
}

impl Ability {
    /// Resolve the single active ability from the species ability and an
    /// optional inherited one
    pub fn resolve(innate: Option<AbilityId>, inherited: Option<AbilityId>) -> Self {
        match (inherited, innate) {
            (Some(id), _) => Ability::Inherited(id),
            (None, Some(id)) => Ability::Innate(id),
            (None, None) => Ability::None,
        }
    }

    /// Id of the active ability, if any
    pub fn id(&self) -> Option<AbilityId> {
        match self {
            Ability::None => None,
            Ability::Innate(id) | Ability::Inherited(id) => Some(*id),
        }
    }

    /// Whether the active ability is `id`
    pub fn is(&self, id: AbilityId) -> bool {
        self.id() == Some(id)
    }
}

/// What an ability does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AbilityEffect {
    /// Attacker loses `percent`% of its max HP before the hit lands
    Thorns { percent: f64 },
    /// Damage multiplier if the attacker was hit within `window` seconds
    Vengeance { multiplier: f64, window: f64 },
    /// Damage multiplier while below `threshold` HP fraction
    Berserk { threshold: f64, multiplier: f64 },
    /// Added to a super-effective multiplier when attacking
    ElementalAffinity { bonus: f64 },
    /// Subtracted from a super-effective multiplier when defending
    ThickHide { reduction: f64 },
    /// Bonus per level against higher-level defenders
    Giantslayer { per_level: f64, cap: f64 },
    /// Minimum final damage
    Relentless { min_damage: u32 },
    /// Fraction of damage dealt healed back
    Leech { fraction: f64 },
    /// Stamina taken from the target into the attacker
    StaminaDrain { amount: f64 },
    /// Stamina gained when hit
    Adrenaline { amount: f64 },
    /// Survive a lethal hit at 1 HP by paying stamina
    LastStand { stamina_cost: f64 },
    /// Seconds added to the attacker's cooldown when targeted
    Numbing { seconds: f64 },
    /// Chance to make an incoming attack miss
    Evasive { chance: f64 },
    /// +X% HP and -X% stamina
    Vitality { hp_percent: f64 },
    /// Pay missing attack stamina with HP
    BloodPact,
    /// Experience multiplier
    Scholar { multiplier: f64 },
}

/// Static ability definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityDef {
    pub id: AbilityId,
    pub name: String,
    pub effect: AbilityEffect,
}

/// Ability registry keyed by numeric id
#[derive(Debug, Clone, Default)]
pub struct AbilityRegistry {
    defs: BTreeMap<AbilityId, AbilityDef>,
}

impl AbilityRegistry {
    pub fn new() -> Self {
        AbilityRegistry {
            defs: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, def: AbilityDef) {
        self.defs.insert(def.id, def);
    }

    pub fn get(&self, id: AbilityId) -> Option<&AbilityDef> {
        self.defs.get(&id)
    }

    pub fn contains(&self, id: AbilityId) -> bool {
        self.defs.contains_key(&id)
    }

    /// All registered ids in ascending order
    pub fn ids(&self) -> Vec<AbilityId> {
        self.defs.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Effect of a monster's active ability
    pub fn effect_of(&self, ability: Ability) -> Option<&AbilityEffect> {
        ability.id().and_then(|id| self.get(id)).map(|def| &def.effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inherited_supersedes_innate() {
        assert_eq!(Ability::resolve(Some(3), Some(8)), Ability::Inherited(8));
        assert_eq!(Ability::resolve(Some(3), None), Ability::Innate(3));
        assert_eq!(Ability::resolve(None, None), Ability::None);
    }

    #[test]
    fn test_ability_is() {
        let ability = Ability::Inherited(8);
        assert!(ability.is(8));
        assert!(!ability.is(3));
        assert!(!Ability::None.is(0));
    }

    #[test]
    fn test_effect_lookup() {
        let mut registry = AbilityRegistry::new();
        registry.register(AbilityDef {
            id: 8,
            name: "Leech".to_string(),
            effect: AbilityEffect::Leech { fraction: 0.2 },
        });

        assert_eq!(
            registry.effect_of(Ability::Innate(8)),
            Some(&AbilityEffect::Leech { fraction: 0.2 })
        );
        assert!(registry.effect_of(Ability::None).is_none());
        assert!(registry.effect_of(Ability::Innate(99)).is_none());
    }
}
