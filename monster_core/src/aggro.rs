//! Aggro & targeting coordinator
//!
//! One pass per tick over every combat-active monster:
//!
//! 1. Pairwise: distance computed once per unordered pair, collision
//!    separation, aggro potential checked in both directions, closest valid
//!    potential target tracked per monster.
//! 2. Assignment: keep a live target unless a strictly closer one exists,
//!    adopt the best when there is none, clear when nothing is valid.

use crate::config::{AggroConstants, GameConstants};
use crate::entity::Monster;
use crate::types::{EntityId, Position, Team};
use crate::world::SimulationState;
use tracing::debug;

/// Aggro range for a team
pub fn aggro_range(team: Team, constants: &AggroConstants) -> f64 {
    match team {
        Team::Player => constants.player_range,
        Team::Wild => constants.wild_range,
        Team::Boss => constants.boss_range,
    }
}

/// Push two positions apart so their separation equals `threshold`
///
/// Coincident points separate along +x. Returns the new positions.
pub fn separate(a: Position, b: Position, threshold: f64) -> (Position, Position) {
    let offset = b - a;
    let distance = offset.length();
    if distance >= threshold {
        return (a, b);
    }
    let direction = if distance > f64::EPSILON {
        offset / distance
    } else {
        Position::X
    };
    let push = direction * ((threshold - distance) / 2.0);
    (a - push, b + push)
}

/// Whether `attacker` may take `defender` as an aggro target at `distance`
pub fn can_aggro(attacker: &Monster, defender: &Monster, distance: f64, constants: &AggroConstants) -> bool {
    if attacker.returning || attacker.chasing_player {
        return false;
    }
    if !attacker.team.is_hostile_to(defender.team, constants.wild_vs_boss_hostile) {
        return false;
    }
    if distance > aggro_range(attacker.team, constants) {
        return false;
    }
    if attacker.team == Team::Wild && defender.position.distance(attacker.spawn_origin) > constants.max_wander_distance {
        return false;
    }
    true
}

/// Closest potential target found so far
#[derive(Debug, Clone, Copy)]
struct Potential {
    id: EntityId,
    distance: f64,
}

fn offer(slot: &mut Option<Potential>, id: EntityId, distance: f64) {
    match slot {
        Some(best) if best.distance <= distance => {}
        _ => *slot = Some(Potential { id, distance }),
    }
}

/// Run the aggro pass; returns how many monsters changed target
pub fn run_aggro_pass(state: &mut SimulationState, constants: &GameConstants) -> usize {
    let aggro = &constants.aggro;
    let active: Vec<usize> = state
        .monsters
        .iter()
        .enumerate()
        .filter(|(_, m)| m.is_alive() && m.is_combat_active())
        .map(|(index, _)| index)
        .collect();
    let mut best: Vec<Option<Potential>> = vec![None; state.monsters.len()];

    // Step 1: pairwise pass
    for (n, &i) in active.iter().enumerate() {
        for &j in &active[n + 1..] {
            let (a, b) = state.pair_mut(i, j);
            let distance = a.position.distance(b.position);

            if distance < aggro.collision_distance {
                let (pa, pb) = separate(a.position, b.position, aggro.collision_distance);
                a.position = pa;
                b.position = pb;
            }

            if can_aggro(a, b, distance, aggro) {
                offer(&mut best[i], b.id, distance);
            }
            if can_aggro(b, a, distance, aggro) {
                offer(&mut best[j], a.id, distance);
            }
        }
    }

    // Step 2: assignment
    let live: Vec<(EntityId, Position)> = active
        .iter()
        .map(|&i| (state.monsters[i].id, state.monsters[i].position))
        .collect();
    let mut changed = 0;
    for &i in &active {
        let monster = &mut state.monsters[i];
        let current = monster
            .aggro_target
            .and_then(|id| live.iter().find(|(live_id, _)| *live_id == id))
            .map(|(id, position)| (*id, monster.position.distance(*position)));

        let next = match (current, best[i]) {
            (Some((id, distance)), Some(candidate)) if candidate.distance < distance && candidate.id != id => {
                Some(candidate.id)
            }
            (Some((id, _)), _) => Some(id),
            (None, Some(candidate)) => Some(candidate.id),
            (None, None) if monster.returning || monster.chasing_player => monster.aggro_target,
            (None, None) => None,
        };

        if next != monster.aggro_target {
            debug!(entity = %monster.id, from = ?monster.aggro_target, to = ?next, "aggro target changed");
            monster.aggro_target = next;
            changed += 1;
        }
    }
    changed
}
