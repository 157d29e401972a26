//! Attack resolution - pick a target, pay for the attack, run the damage pipeline

use super::result::{AttackOutcome, HitReport};
use super::targeting::{hostile_candidates, pick_weighted};
use crate::abilities::pipeline::{apply_hit, effect_of};
use crate::abilities::{AbilityEffect, DamageContext};
use crate::config::{CombatConstants, GameData};
use crate::error::SimError;
use crate::events::{EventSink, SimEvent};
use crate::progression::handle_defeat;
use crate::types::{EffectivenessTier, EntityId, StatLine};
use crate::world::SimulationState;
use rand::Rng;
use tracing::debug;

/// Floored physical and special damage before any ability hook
///
/// `cd_ratio` is the attacker's cooldown over the reference cooldown, so
/// slow hitters hit proportionally harder.
pub fn base_components(
    attacker: &StatLine,
    defender: &StatLine,
    cd_ratio: f64,
    combat: &CombatConstants,
) -> (u32, u32) {
    let component = |base: f64, attack: i32, defense: i32| {
        let raw = base * cd_ratio * (1.0 + attack as f64 / 100.0) / (1.0 + defense as f64 / 100.0);
        raw.max(0.0).floor() as u32
    };
    (
        component(combat.physical_base, attacker.p_atk, defender.p_def),
        component(combat.special_base, attacker.s_atk, defender.s_def),
    )
}

/// Resolve one attack by `attacker_id`
///
/// Steps:
/// 1. Pick a hostile target in range, weighted by proximity, and reset the
///    attacker's cooldown. An evasive target may turn the attack into a miss.
/// 2. Numbing targets extend the attacker's cooldown.
/// 3. Pay stamina; a shortfall is covered by blood pact HP or halves damage.
/// 4. Compute the physical and special components.
/// 5. Run the damage pipeline and hand any defeat to progression.
pub fn resolve_attack(
    state: &mut SimulationState,
    data: &GameData,
    attacker_id: EntityId,
    rng: &mut impl Rng,
    sink: &mut impl EventSink,
) -> Result<AttackOutcome, SimError> {
    let combat = &data.constants.combat;
    let attacker_index = state.index_of(attacker_id).ok_or(SimError::UnknownEntity(attacker_id))?;
    {
        let attacker = &state.monsters[attacker_index];
        if !attacker.is_alive() || !attacker.is_combat_active() || attacker.current_cooldown > 0.0 {
            return Ok(AttackOutcome::NotReady);
        }
    }

    // Step 1: target selection
    let candidates = hostile_candidates(state, attacker_index, &data.constants);
    let Some(target) = pick_weighted(&candidates, combat.proximity_exponent, rng).copied() else {
        return Ok(AttackOutcome::NoTarget);
    };
    let (attacker, defender) = state.pair_mut(attacker_index, target.index);
    attacker.current_cooldown = attacker.attack_cooldown;

    let target_effect = effect_of(data, defender).cloned();
    if let Some(AbilityEffect::Evasive { chance }) = target_effect {
        if rng.gen::<f64>() < chance {
            debug!(attacker = %attacker.id, target = %defender.id, "attack evaded");
            sink.emit(SimEvent::Miss {
                attacker_id: attacker.id,
            });
            return Ok(AttackOutcome::Missed { target: target.id });
        }
    }

    // Step 2: cooldown penalty from the target
    if let Some(AbilityEffect::Numbing { seconds }) = target_effect {
        attacker.current_cooldown += seconds;
    }

    // Step 3: stamina
    let cd_ratio = attacker.attack_cooldown / combat.reference_cooldown;
    let cost = combat.stamina_cost * cd_ratio;
    let mut shortfall_multiplier = 1.0;
    let mut hp_spent = 0.0;
    let stamina_spent;
    if attacker.current_stamina >= cost {
        attacker.current_stamina -= cost;
        stamina_spent = cost;
    } else {
        let missing = cost - attacker.current_stamina;
        stamina_spent = attacker.current_stamina;
        attacker.current_stamina = 0.0;
        let blood_pact = matches!(effect_of(data, attacker), Some(AbilityEffect::BloodPact));
        if blood_pact {
            hp_spent = missing.min((attacker.current_hp - 1.0).max(0.0));
            attacker.current_hp -= hp_spent;
        }
        if hp_spent < missing {
            shortfall_multiplier = combat.stamina_shortfall_multiplier;
        }
    }

    // Step 4: base damage
    let (physical, special) = base_components(&attacker.stats, &defender.stats, cd_ratio, combat);
    let ctx = DamageContext {
        physical,
        special,
        shortfall_multiplier,
    };

    // Step 5: ability pipeline
    let outcome = apply_hit(data, attacker, defender, &ctx);
    if outcome.attacker_fell {
        debug!(attacker = %attacker_id, target = %target.id, "attacker fell to reflected damage");
        handle_defeat(state, data, attacker_id, Some(target.id), sink)?;
        return Ok(AttackOutcome::AttackerFell { target: target.id });
    }

    let tier = outcome.tier.unwrap_or(EffectivenessTier::Normal);
    debug!(
        attacker = %attacker_id,
        target = %target.id,
        amount = outcome.amount,
        ?tier,
        "attack landed"
    );
    sink.emit(SimEvent::DamageDealt {
        attacker_id,
        defender_id: target.id,
        amount: outcome.amount,
        effectiveness: tier,
    });

    if outcome.defender_fell {
        handle_defeat(state, data, target.id, Some(attacker_id), sink)?;
    }

    Ok(AttackOutcome::Hit(HitReport {
        target: target.id,
        amount: outcome.amount,
        tier,
        stamina_spent,
        hp_spent,
        exhausted: shortfall_multiplier < 1.0,
        reflected: outcome.reflected,
        healed: outcome.healed,
        stamina_drained: outcome.stamina_drained,
        last_stand: outcome.last_stand,
        defeated_target: outcome.defender_fell,
    }))
}
