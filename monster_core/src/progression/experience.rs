//! Experience and gold rewards, level-up loop

use crate::abilities::pipeline::effect_of;
use crate::abilities::AbilityEffect;
use crate::config::{GameData, ProgressionConstants};
use crate::entity::{experience_to_next, Monster};
use crate::error::SimError;
use crate::events::{EventSink, SimEvent};
use crate::types::{EntityId, Placement};
use crate::world::SimulationState;
use tracing::info;

/// Experience a single recipient earns for a defeat
///
/// `base = exp_per_level * effective_level + exp_base`, scaled by the level
/// difference (clamped to [0, 2]) and an optional scholar multiplier.
pub fn experience_reward(
    effective_level: u32,
    defeated_level: u32,
    recipient_level: u32,
    scholar: Option<f64>,
    constants: &ProgressionConstants,
) -> u64 {
    let base = constants.exp_per_level * effective_level as f64 + constants.exp_base;
    let diff = defeated_level as f64 - recipient_level as f64;
    let multiplier = (1.0 + constants.level_diff_step * diff).clamp(0.0, 2.0);
    let amount = base * multiplier * scholar.unwrap_or(1.0);
    amount.max(0.0).floor() as u64
}

/// Gold for a defeat: diminishing power curve of the effective level
pub fn gold_reward(effective_level: u32, constants: &ProgressionConstants) -> u64 {
    (constants.gold_coefficient * (effective_level as f64).powf(constants.gold_exponent)).round() as u64
}

/// Award experience for `defeated_id` to every standing party monster
///
/// Returns the total experience handed out.
pub fn award_experience(
    state: &mut SimulationState,
    data: &GameData,
    defeated_id: EntityId,
    sink: &mut impl EventSink,
) -> Result<u64, SimError> {
    let constants = &data.constants.progression;
    let defeated = state.require(defeated_id)?;
    let effective = defeated.effective_level(constants.modifier_level_weight);
    let defeated_level = defeated.level;

    let mut total = 0;
    for monster in state.monsters.iter_mut() {
        if monster.placement != Placement::Party || monster.defeated || monster.id == defeated_id {
            continue;
        }
        let scholar = match effect_of(data, monster) {
            Some(AbilityEffect::Scholar { multiplier }) => Some(*multiplier),
            _ => None,
        };
        let amount = experience_reward(effective, defeated_level, monster.level, scholar, constants);
        monster.experience.current += amount;
        total += amount;
        check_level_up(monster, data, sink)?;
    }
    Ok(total)
}

/// Apply every level-up the monster's experience pays for
///
/// Remainders carry over. At max level leftover experience is discarded.
/// Returns the number of levels gained.
pub fn check_level_up(monster: &mut Monster, data: &GameData, sink: &mut impl EventSink) -> Result<u32, SimError> {
    let max_level = data.constants.stats.max_level;
    let mut gained = 0;

    while monster.experience.current >= monster.experience.to_next_level && monster.level < max_level {
        monster.experience.current -= monster.experience.to_next_level;
        monster.level += 1;
        monster.experience.to_next_level = experience_to_next(monster.level);
        gained += 1;
        sink.emit(SimEvent::LevelUp {
            entity_id: monster.id,
            new_level: monster.level,
        });
    }
    if monster.level >= max_level {
        monster.experience.current = 0;
    }

    if gained > 0 {
        monster.recompute_stats(data)?;
        info!(entity = %monster.id, level = monster.level, gained, "level up");
    }
    Ok(gained)
}
