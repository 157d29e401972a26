//! Defeat handling - rewards, penalties and where the loser ends up

use super::experience::{award_experience, gold_reward};
use crate::config::GameData;
use crate::entity::experience_to_next;
use crate::error::SimError;
use crate::events::{EventSink, SimEvent};
use crate::types::{EntityId, Placement, Team};
use crate::world::{CaptureTarget, SimulationState};
use serde::{Deserialize, Serialize};
use tracing::info;

/// What `handle_defeat` did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DefeatOutcome {
    /// Already handled; nothing changed
    AlreadyDefeated,
    /// Wild monster beaten by the party; now a capture target
    Capturable { experience: u64, gold: u64, new_level: u32 },
    /// Player monster sent to storage until its revival timer runs out
    Reviving { timer: f64 },
    /// Boss monster removed from the world
    BossMonsterRemoved { experience: u64, gold: u64 },
    /// Removed without rewards
    Despawned,
}

/// Levels lost by a wild monster when beaten: at least one
pub fn level_penalty(level: u32, fraction: f64) -> u32 {
    ((level as f64 * fraction).floor() as u32).max(1)
}

/// Handle the defeat of `defeated_id`, optionally at the hands of `victor_id`
///
/// Safe to call more than once: a monster already marked defeated, or one
/// already removed from the world, is left untouched. Every aggro reference to the loser is cleared immediately.
pub fn handle_defeat(
    state: &mut SimulationState,
    data: &GameData,
    defeated_id: EntityId,
    victor_id: Option<EntityId>,
    sink: &mut impl EventSink,
) -> Result<DefeatOutcome, SimError> {
    let constants = &data.constants.progression;
    let victor_team = victor_id.and_then(|id| state.get(id)).map(|m| m.team);

    // Despawned wild monsters and beaten boss monsters are already gone
    if state.was_removed(defeated_id) {
        return Ok(DefeatOutcome::AlreadyDefeated);
    }
    let monster = state.require_mut(defeated_id)?;
    if monster.defeated {
        return Ok(DefeatOutcome::AlreadyDefeated);
    }
    monster.defeated = true;
    monster.current_hp = 0.0;
    monster.current_cooldown = 0.0;
    monster.clear_combat_state();
    let placement = monster.placement;
    let level = monster.level;
    let master_id = monster.master_id;
    let effective = monster.effective_level(constants.modifier_level_weight);

    state.invalidate_references(defeated_id);
    sink.emit(SimEvent::Defeated {
        entity_id: defeated_id,
    });
    info!(entity = %defeated_id, ?placement, level, "defeated");

    let by_player = victor_team == Some(Team::Player);
    match placement {
        Placement::Party | Placement::Storage => {
            let timer = constants.revival_base + constants.revival_per_level * level as f64;
            let monster = state.require_mut(defeated_id)?;
            monster.placement = Placement::Storage;
            monster.revival_timer = Some(timer);
            Ok(DefeatOutcome::Reviving { timer })
        }
        Placement::Wild if by_player => {
            let experience = award_experience(state, data, defeated_id, sink)?;
            let gold = award_gold(state, data, effective, level, sink);

            let penalty = level_penalty(level, constants.level_penalty_fraction);
            let monster = state.require_mut(defeated_id)?;
            monster.level = level.saturating_sub(penalty).max(1);
            monster.experience.current = 0;
            monster.experience.to_next_level = experience_to_next(monster.level);
            monster.recompute_stats(data)?;
            let new_level = monster.level;

            state.capture_targets.push(CaptureTarget {
                entity_id: defeated_id,
                remaining: data.constants.capture.window,
            });
            Ok(DefeatOutcome::Capturable {
                experience,
                gold,
                new_level,
            })
        }
        Placement::Wild => {
            state.retire_wild(defeated_id, data.constants.spawn.respawn_delay);
            Ok(DefeatOutcome::Despawned)
        }
        Placement::Boss => {
            let (experience, gold) = if by_player {
                let experience = award_experience(state, data, defeated_id, sink)?;
                (experience, award_gold(state, data, effective, level, sink))
            } else {
                (0, 0)
            };
            state.remove_monster(defeated_id);
            if let Some(master_id) = master_id {
                crate::boss::check_master_defeated(state, master_id, sink);
            }
            Ok(DefeatOutcome::BossMonsterRemoved { experience, gold })
        }
    }
}

/// Credit gold unless the party out-levels the loser by too much
fn award_gold(
    state: &mut SimulationState,
    data: &GameData,
    effective_level: u32,
    defeated_level: u32,
    sink: &mut impl EventSink,
) -> u64 {
    let constants = &data.constants.progression;
    let limit = (defeated_level + constants.gold_level_margin) as f64;
    if state.party_average_level().is_some_and(|avg| avg > limit) {
        return 0;
    }
    let gold = gold_reward(effective_level, constants);
    if gold > 0 {
        state.gold += gold;
        sink.emit(SimEvent::GoldAwarded { amount: gold });
    }
    gold
}
