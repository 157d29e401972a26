//! Damage pipeline - ability hooks wrapped around a single hit
//!
//! Hooks fire in a fixed order:
//!
//! 1. Reflect (defender thorns) before anything is computed
//! 2. Vengeance and berserk checks on the attacker
//! 3. Elemental multiplier including affinity / thick hide
//! 4. Level-delta modifiers
//! 5. Damage floor, then ceiling to an integer
//! 6. Apply to HP
//! 7. Leech, stamina drain, adrenaline
//! 8. Zero-HP survival (last stand)

use super::AbilityEffect;
use crate::config::{CombatConstants, GameData};
use crate::entity::Monster;
use crate::types::{AbilityId, EffectivenessTier};
use serde::{Deserialize, Serialize};

/// Whether `id` is the monster's species ability or its active ability
pub fn has_ability(data: &GameData, monster: &Monster, id: AbilityId) -> bool {
    let innate = data.species.get(&monster.type_id).and_then(|s| s.innate_ability);
    innate == Some(id) || monster.ability.is(id)
}

/// Active ability effect of a monster, if it has one
pub fn effect_of<'a>(data: &'a GameData, monster: &Monster) -> Option<&'a AbilityEffect> {
    data.abilities.effect_of(monster.ability)
}

/// Pre-pipeline damage for one attack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageContext {
    /// Floored physical component
    pub physical: u32,
    /// Floored special component
    pub special: u32,
    /// Stamina shortfall penalty (1.0 when the attack was paid in full)
    pub shortfall_multiplier: f64,
}

impl DamageContext {
    pub fn base(&self) -> f64 {
        (self.physical + self.special) as f64 * self.shortfall_multiplier
    }
}

/// What happened while a hit went through the pipeline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DamageOutcome {
    /// Final damage applied to the defender
    pub amount: u32,
    /// Elemental multiplier after ability adjustments
    pub elemental_multiplier: f64,
    pub tier: Option<EffectivenessTier>,
    /// HP the attacker lost to thorns
    pub reflected: f64,
    pub healed: f64,
    pub stamina_drained: f64,
    /// Defender survived a lethal hit at 1 HP
    pub last_stand: bool,
    /// Attacker was brought to 0 HP by thorns; no damage was dealt
    pub attacker_fell: bool,
    /// Defender is at 0 HP after the hit
    pub defender_fell: bool,
}

/// Elemental multiplier with attacker affinity and defender thick hide
///
/// Both adjustments only touch super-effective matchups; thick hide never
/// pushes the multiplier below neutral.
pub fn elemental_multiplier(data: &GameData, attacker: &Monster, defender: &Monster) -> f64 {
    let combat = &data.constants.combat;
    let mut multiplier = data.elements.multiplier(attacker.element, defender.element, combat);
    if multiplier > 1.0 {
        if let Some(AbilityEffect::ElementalAffinity { bonus }) = effect_of(data, attacker) {
            multiplier += bonus;
        }
        if let Some(AbilityEffect::ThickHide { reduction }) = effect_of(data, defender) {
            multiplier = (multiplier - reduction).max(1.0);
        }
    }
    multiplier
}

/// Level-delta multiplier for an attack
///
/// A weaker attacker deals less, linearly per level and floored. A stronger
/// attacker deals more along a diminishing curve. `giantslayer` replaces the
/// weaker-attacker penalty with a capped bonus.
pub fn level_delta_multiplier(
    attacker_level: u32,
    defender_level: u32,
    giantslayer: Option<(f64, f64)>,
    combat: &CombatConstants,
) -> f64 {
    let delta = defender_level as f64 - attacker_level as f64;
    if delta > 0.0 {
        match giantslayer {
            Some((per_level, cap)) => 1.0 + (per_level * delta).min(cap),
            None => (1.0 - combat.weaker_penalty_per_level * delta).max(combat.weaker_penalty_floor),
        }
    } else if delta < 0.0 {
        let lead = -delta;
        1.0 + combat.stronger_bonus_max * lead / (lead + combat.stronger_bonus_half_point)
    } else {
        1.0
    }
}

/// Run one hit through every ability hook and apply it
///
/// Mutates both monsters; defeat handling is left to the caller.
pub fn apply_hit(
    data: &GameData,
    attacker: &mut Monster,
    defender: &mut Monster,
    ctx: &DamageContext,
) -> DamageOutcome {
    let combat = &data.constants.combat;
    let attacker_effect = effect_of(data, attacker).cloned();
    let defender_effect = effect_of(data, defender).cloned();
    let mut outcome = DamageOutcome::default();

    // Step 1: reflect
    if let Some(AbilityEffect::Thorns { percent }) = defender_effect {
        let reflected = (attacker.max_hp * percent / 100.0).min(attacker.current_hp);
        attacker.take_damage(reflected);
        outcome.reflected = reflected;
        if attacker.current_hp <= 0.0 {
            outcome.attacker_fell = true;
            return outcome;
        }
    }

    let mut damage = ctx.base();

    // Step 2: vengeance and berserk
    match attacker_effect {
        Some(AbilityEffect::Vengeance { multiplier, window }) if attacker.time_since_damage_taken <= window => {
            damage *= multiplier;
        }
        Some(AbilityEffect::Berserk { threshold, multiplier }) if attacker.hp_fraction() < threshold => {
            damage *= multiplier;
        }
        _ => {}
    }

    // Step 3: elemental
    let elemental = elemental_multiplier(data, attacker, defender);
    damage *= elemental;
    outcome.elemental_multiplier = elemental;
    outcome.tier = Some(EffectivenessTier::classify(
        elemental,
        combat.super_threshold,
        combat.weak_threshold,
    ));

    // Step 4: level delta
    let giantslayer = match attacker_effect {
        Some(AbilityEffect::Giantslayer { per_level, cap }) => Some((per_level, cap)),
        _ => None,
    };
    damage *= level_delta_multiplier(attacker.level, defender.level, giantslayer, combat);

    // Step 5: floor, then ceiling
    if let Some(AbilityEffect::Relentless { min_damage }) = attacker_effect {
        damage = damage.max(min_damage as f64);
    }
    let amount = damage.max(0.0).ceil() as u32;
    outcome.amount = amount;

    // Step 6: apply
    defender.take_damage(amount as f64);
    attacker.time_since_damage_dealt = 0.0;

    // Step 7: leech, drain, adrenaline
    match attacker_effect {
        Some(AbilityEffect::Leech { fraction }) => {
            let before = attacker.current_hp;
            attacker.heal(amount as f64 * fraction);
            outcome.healed = attacker.current_hp - before;
        }
        Some(AbilityEffect::StaminaDrain { amount: drain }) => {
            let drained = drain.min(defender.current_stamina);
            defender.gain_stamina(-drained);
            attacker.gain_stamina(drained);
            outcome.stamina_drained = drained;
        }
        _ => {}
    }
    if let Some(AbilityEffect::Adrenaline { amount: gain }) = defender_effect {
        defender.gain_stamina(gain);
    }

    // Step 8: zero-HP survival
    if defender.current_hp <= 0.0 {
        match defender_effect {
            Some(AbilityEffect::LastStand { stamina_cost }) if defender.current_stamina >= stamina_cost => {
                defender.current_hp = 1.0_f64.min(defender.max_hp);
                defender.gain_stamina(-stamina_cost);
                outcome.last_stand = true;
            }
            _ => outcome.defender_fell = true,
        }
    }

    outcome
}
