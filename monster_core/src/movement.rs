//! Movement - approach targets, leash wild monsters home, follow the player

use crate::aggro::aggro_range;
use crate::config::GameConstants;
use crate::events::{EventSink, SimEvent};
use crate::types::{EntityId, Placement, Position, Team};
use crate::world::SimulationState;
use tracing::{debug, info};

/// Move from `from` toward `to` by at most `max_step`, stopping `stop_at`
/// short of the destination
pub fn step_toward(from: Position, to: Position, max_step: f64, stop_at: f64) -> Position {
    let offset = to - from;
    let distance = offset.length();
    let travel = (distance - stop_at).min(max_step);
    if travel <= 0.0 || distance <= f64::EPSILON {
        return from;
    }
    from + offset / distance * travel
}

/// Run the movement phase for `dt` seconds
///
/// Returns the wild monster that caught the player, if one did.
pub fn run_movement(
    state: &mut SimulationState,
    constants: &GameConstants,
    dt: f64,
    sink: &mut impl EventSink,
) -> Option<EntityId> {
    let movement = &constants.movement;
    let step = movement.move_speed * dt;
    let player = state.player_position;
    let party_can_fight = state.party_has_fighters();
    let positions: Vec<(EntityId, Position)> = state.monsters.iter().map(|m| (m.id, m.position)).collect();
    let mut caught_by = None;

    for monster in state.monsters.iter_mut() {
        if !monster.is_alive() || !monster.is_combat_active() {
            continue;
        }

        if monster.placement == Placement::Wild {
            // Leash
            let wandered = monster.position.distance(monster.spawn_origin);
            if !monster.returning && wandered > constants.aggro.max_wander_distance {
                debug!(entity = %monster.id, wandered, "leashed, returning home");
                monster.aggro_target = None;
                monster.chasing_player = false;
                monster.returning = true;
            }

            // Chase the player when nothing can defend them
            let near_player = monster.position.distance(player) <= aggro_range(Team::Wild, &constants.aggro);
            if !party_can_fight && !monster.returning && near_player && !monster.chasing_player {
                monster.chasing_player = true;
                monster.aggro_target = None;
            } else if party_can_fight && monster.chasing_player {
                monster.chasing_player = false;
            }
        }

        if monster.returning {
            monster.position = step_toward(monster.position, monster.spawn_origin, step, 0.0);
            if monster.position.distance(monster.spawn_origin) <= movement.home_radius {
                monster.returning = false;
            }
        } else if monster.chasing_player {
            monster.position = step_toward(monster.position, player, step, 0.0);
            if caught_by.is_none() && monster.position.distance(player) <= movement.catch_distance {
                caught_by = Some(monster.id);
            }
        } else if let Some(target) = monster.aggro_target {
            if let Some((_, target_position)) = positions.iter().find(|(id, _)| *id == target) {
                let stop_at = constants.combat.attack_range * 0.9;
                monster.position = step_toward(monster.position, *target_position, step, stop_at);
            }
        } else if monster.placement == Placement::Party {
            monster.position = step_toward(monster.position, player, step, movement.follow_distance);
        }
    }

    if let Some(catcher) = caught_by {
        teleport_player(state, constants, catcher, sink);
    }
    caught_by
}

/// Send the player back to town and calm every wild monster
pub fn teleport_player(
    state: &mut SimulationState,
    constants: &GameConstants,
    caught_by: EntityId,
    sink: &mut impl EventSink,
) {
    let [x, y] = constants.movement.town_position;
    state.player_position = Position::new(x, y);
    for monster in state.monsters.iter_mut().filter(|m| m.placement == Placement::Wild) {
        monster.clear_combat_state();
    }
    info!(caught_by = %caught_by, "player caught, teleported to town");
    sink.emit(SimEvent::PlayerTeleported { caught_by });
}
