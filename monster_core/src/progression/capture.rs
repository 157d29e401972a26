//! Capture - turn a beaten wild monster into a player monster for gold

use crate::config::{CaptureConstants, GameData};
use crate::error::SimError;
use crate::events::{EventSink, SimEvent};
use crate::types::{EntityId, Placement, Team};
use crate::world::SimulationState;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Result of a capture attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CaptureResult {
    /// Not a live capture target (expired, already caught, unknown)
    NotAvailable,
    /// Not enough gold; nothing changed
    InsufficientGold { required: u64, available: u64 },
    /// Caught; the monster joined the party or storage
    Caught { entity_id: EntityId, cost: u64, placement: Placement },
    /// Broke free; part of the cost was refunded
    Escaped { entity_id: EntityId, cost: u64, refund: u64 },
}

/// Catch chance in percent: `10000 / (100 + 2 * effective_level)`, capped at 100
pub fn catch_chance(effective_level: u32) -> f64 {
    (100.0 * 100.0 / (100.0 + 2.0 * effective_level as f64)).min(100.0)
}

/// Gold charged per attempt
pub fn capture_cost(effective_level: u32, constants: &CaptureConstants) -> u64 {
    constants.cost_base + constants.cost_per_level * effective_level as u64
}

/// Attempt to capture `target_id` with a roll in `[0, 100)`
///
/// The cost is charged whether or not the attempt succeeds; a failed
/// attempt refunds part of it and leaves the target capturable until its
/// window closes. A caught target stops being a capture target, so repeating
/// the call returns [`CaptureResult::NotAvailable`].
pub fn attempt_capture(
    state: &mut SimulationState,
    data: &GameData,
    target_id: EntityId,
    roll: f64,
    sink: &mut impl EventSink,
) -> Result<CaptureResult, SimError> {
    let constants = &data.constants.capture;
    if state.capture_target(target_id).is_none() {
        return Ok(CaptureResult::NotAvailable);
    }
    let Some(target) = state.get(target_id) else {
        return Ok(CaptureResult::NotAvailable);
    };

    let effective = target.effective_spawn_level(data.constants.progression.modifier_level_weight);
    let cost = capture_cost(effective, constants);
    if state.gold < cost {
        warn!(entity = %target_id, cost, gold = state.gold, "not enough gold to capture");
        sink.emit(SimEvent::InsufficientGold {
            required: cost,
            available: state.gold,
        });
        return Ok(CaptureResult::InsufficientGold {
            required: cost,
            available: state.gold,
        });
    }
    state.gold -= cost;

    let chance = catch_chance(effective);
    if roll >= chance {
        let refund = (cost as f64 * constants.refund_fraction).round() as u64;
        state.gold += refund;
        info!(entity = %target_id, cost, refund, chance, "capture failed");
        sink.emit(SimEvent::CaptureOutcome {
            success: false,
            entity_id: target_id,
            cost,
        });
        return Ok(CaptureResult::Escaped {
            entity_id: target_id,
            cost,
            refund,
        });
    }

    state.capture_targets.retain(|t| t.entity_id != target_id);
    let placement = if state.party_len() < data.constants.progression.max_party_size {
        Placement::Party
    } else {
        Placement::Storage
    };
    let player_position = state.player_position;
    let monster = state.require_mut(target_id)?;
    monster.team = Team::Player;
    monster.placement = placement;
    monster.defeated = false;
    monster.revival_timer = None;
    monster.master_id = None;
    monster.clear_combat_state();
    monster.restore();
    monster.position = player_position;
    monster.spawn_origin = player_position;
    let spawn_point = monster.spawn_point.take();

    if let Some(spawn_point) = spawn_point {
        state.respawn_timers.push(crate::world::RespawnTimer {
            spawn_point,
            remaining: data.constants.spawn.respawn_delay,
        });
    }

    info!(entity = %target_id, cost, ?placement, "captured");
    sink.emit(SimEvent::CaptureOutcome {
        success: true,
        entity_id: target_id,
        cost,
    });
    Ok(CaptureResult::Caught {
        entity_id: target_id,
        cost,
        placement,
    })
}

/// [`attempt_capture`] with a roll drawn from `rng`
pub fn attempt_capture_with_rng(
    state: &mut SimulationState,
    data: &GameData,
    target_id: EntityId,
    rng: &mut impl Rng,
    sink: &mut impl EventSink,
) -> Result<CaptureResult, SimError> {
    let roll = rng.gen_range(0.0..100.0);
    attempt_capture(state, data, target_id, roll, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SpawnParams;
    use crate::progression::handle_defeat;
    use crate::types::Position;
    use rand::SeedableRng;

    /// A party of one plus a freshly beaten level-10 wild monster
    fn beaten_wild(gold: u64) -> (GameData, SimulationState, EntityId) {
        let data = GameData::builtin().unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(21);
        let mut state = SimulationState::new();
        let hero = state
            .add_monster(&data, SpawnParams::new("emberpup", 10, Team::Player, Placement::Party), &mut rng)
            .unwrap();
        let wild = state
            .add_monster(
                &data,
                SpawnParams::new("frostbun", 10, Team::Wild, Placement::Wild).at(Position::new(40.0, 0.0)),
                &mut rng,
            )
            .unwrap();
        let mut events: Vec<SimEvent> = Vec::new();
        handle_defeat(&mut state, &data, wild, Some(hero), &mut events).unwrap();
        state.gold = gold;
        (data, state, wild)
    }

    #[test]
    fn test_catch_chance_curve() {
        assert!((catch_chance(0) - 100.0).abs() < f64::EPSILON);
        assert!((catch_chance(50) - 50.0).abs() < f64::EPSILON);
        let mut last = catch_chance(0);
        for level in 1..200 {
            let chance = catch_chance(level);
            assert!(chance < last);
            assert!(chance > 0.0);
            last = chance;
        }
    }

    #[test]
    fn test_cost() {
        let constants = CaptureConstants::default();
        assert_eq!(capture_cost(0, &constants), 10);
        assert_eq!(capture_cost(10, &constants), 30);
    }

    #[test]
    fn test_successful_capture_joins_party() {
        let (data, mut state, wild) = beaten_wild(100);
        let mut events: Vec<SimEvent> = Vec::new();

        // spawn level 10: chance 83.3%, cost 30
        let result = attempt_capture(&mut state, &data, wild, 0.0, &mut events).unwrap();
        assert_eq!(
            result,
            CaptureResult::Caught {
                entity_id: wild,
                cost: 30,
                placement: Placement::Party
            }
        );
        assert_eq!(state.gold, 70);
        let caught = state.get(wild).unwrap();
        assert_eq!(caught.team, Team::Player);
        assert!(!caught.defeated);
        assert!((caught.hp_fraction() - 1.0).abs() < f64::EPSILON);
        // the level penalty sticks
        assert_eq!(caught.level, 8);
        assert!(state.capture_targets.is_empty());
    }

    #[test]
    fn test_capture_is_idempotent() {
        let (data, mut state, wild) = beaten_wild(100);
        let mut events: Vec<SimEvent> = Vec::new();
        attempt_capture(&mut state, &data, wild, 0.0, &mut events).unwrap();
        let again = attempt_capture(&mut state, &data, wild, 0.0, &mut events).unwrap();
        assert_eq!(again, CaptureResult::NotAvailable);
        assert_eq!(state.gold, 70);
    }

    #[test]
    fn test_failed_capture_refunds_half() {
        let (data, mut state, wild) = beaten_wild(100);
        let mut events: Vec<SimEvent> = Vec::new();

        let result = attempt_capture(&mut state, &data, wild, 99.0, &mut events).unwrap();
        assert_eq!(
            result,
            CaptureResult::Escaped {
                entity_id: wild,
                cost: 30,
                refund: 15
            }
        );
        assert_eq!(state.gold, 85);
        assert!(state.capture_target(wild).is_some());
        assert_eq!(
            events,
            vec![SimEvent::CaptureOutcome {
                success: false,
                entity_id: wild,
                cost: 30
            }]
        );
    }

    #[test]
    fn test_insufficient_gold_changes_nothing() {
        let (data, mut state, wild) = beaten_wild(5);
        let mut events: Vec<SimEvent> = Vec::new();

        let result = attempt_capture(&mut state, &data, wild, 0.0, &mut events).unwrap();
        assert_eq!(
            result,
            CaptureResult::InsufficientGold {
                required: 30,
                available: 5
            }
        );
        assert_eq!(state.gold, 5);
        assert!(state.get(wild).unwrap().defeated);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_full_party_sends_to_storage() {
        let (data, mut state, wild) = beaten_wild(100);
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        for _ in 0..3 {
            state
                .add_monster(&data, SpawnParams::new("derpfish", 5, Team::Player, Placement::Party), &mut rng)
                .unwrap();
        }
        let mut events: Vec<SimEvent> = Vec::new();
        let result = attempt_capture(&mut state, &data, wild, 0.0, &mut events).unwrap();
        assert!(matches!(result, CaptureResult::Caught { placement: Placement::Storage, .. }));
    }

    #[test]
    fn test_unknown_target_not_available() {
        let (data, mut state, _) = beaten_wild(100);
        let mut events: Vec<SimEvent> = Vec::new();
        let result = attempt_capture(&mut state, &data, EntityId(999), 0.0, &mut events).unwrap();
        assert_eq!(result, CaptureResult::NotAvailable);
    }
}
