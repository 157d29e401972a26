//! Tick scheduler - advances every subsystem in a fixed order
//!
//! aggro -> movement -> combat -> regen -> cleanup, all on one clamped
//! delta. Mutations made by a phase are visible to every later phase of the
//! same tick.

use crate::aggro::run_aggro_pass;
use crate::combat::{resolve_attack, AttackOutcome};
use crate::config::{GameData, RegenConstants};
use crate::entity::Monster;
use crate::error::SimError;
use crate::events::{EventSink, SimEvent};
use crate::movement::run_movement;
use crate::spawn::spawn_wild;
use crate::types::{EntityId, Placement};
use crate::world::SimulationState;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Summary of one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Delta actually simulated after clamping
    pub dt: f64,
    pub aggro_changes: usize,
    pub attacks: usize,
    pub caught_by: Option<EntityId>,
    pub expired_captures: usize,
    pub revived: usize,
    pub respawned: usize,
}

/// Clamp a frame delta into `[0, max_delta]`
pub fn clamp_delta(dt: f64, max_delta: f64) -> f64 {
    if dt.is_finite() {
        dt.clamp(0.0, max_delta)
    } else {
        0.0
    }
}

/// Advance the simulation by one frame
pub fn tick(
    state: &mut SimulationState,
    data: &GameData,
    dt: f64,
    rng: &mut impl Rng,
    sink: &mut impl EventSink,
) -> Result<TickReport, SimError> {
    let dt = clamp_delta(dt, data.constants.tick.max_delta);
    let mut report = TickReport {
        dt,
        ..Default::default()
    };

    // Phase 1: aggro
    report.aggro_changes = run_aggro_pass(state, &data.constants);

    // Phase 2: movement
    report.caught_by = run_movement(state, &data.constants, dt, sink);

    // Phase 3: combat
    report.attacks = run_combat(state, data, dt, rng, sink)?;

    // Phase 4: regen
    for monster in state.monsters.iter_mut() {
        regenerate(monster, &data.constants.regen, dt);
    }

    // Phase 5: cleanup
    report.expired_captures = tick_capture_targets(state, data, dt);
    report.revived = tick_revivals(state, data, dt, sink);
    report.respawned = tick_respawns(state, data, dt, rng)?;

    Ok(report)
}

/// Count cooldowns down and let ready monsters with a target attack
fn run_combat(
    state: &mut SimulationState,
    data: &GameData,
    dt: f64,
    rng: &mut impl Rng,
    sink: &mut impl EventSink,
) -> Result<usize, SimError> {
    let mut ready = Vec::new();
    for monster in state.monsters.iter_mut() {
        if !monster.is_alive() || !monster.is_combat_active() {
            continue;
        }
        monster.current_cooldown = (monster.current_cooldown - dt).max(0.0);
        if monster.current_cooldown <= 0.0 && monster.aggro_target.is_some() {
            ready.push(monster.id);
        }
    }

    let mut attacks = 0;
    for id in ready {
        // Earlier attacks this tick may have removed or felled this monster
        let Some(monster) = state.get(id) else {
            continue;
        };
        if !monster.is_alive() {
            continue;
        }
        let outcome = resolve_attack(state, data, id, rng, sink)?;
        if outcome.consumed_cooldown() {
            attacks += 1;
        }
        if let AttackOutcome::NoTarget = outcome {
            debug!(entity = %id, "aggro target out of attack range");
        }
    }
    Ok(attacks)
}

/// Stamina and HP regeneration, plus the damage timers
///
/// Defeated and stored monsters do not regenerate.
pub fn regenerate(monster: &mut Monster, regen: &RegenConstants, dt: f64) {
    if monster.defeated || monster.placement == Placement::Storage {
        return;
    }
    monster.time_since_damage_taken += dt;
    monster.time_since_damage_dealt += dt;
    monster.gain_stamina(regen.stamina_rate * monster.max_stamina * dt);
    if monster.time_since_damage_taken >= regen.hp_delay {
        monster.heal(regen.hp_rate * monster.max_hp * dt);
    }
}

/// Count capture windows down; expired targets despawn
fn tick_capture_targets(state: &mut SimulationState, data: &GameData, dt: f64) -> usize {
    let mut expired = 0;
    for index in (0..state.capture_targets.len()).rev() {
        state.capture_targets[index].remaining -= dt;
        if state.capture_targets[index].remaining > 0.0 {
            continue;
        }
        let target = state.capture_targets.remove(index);
        state.retire_wild(target.entity_id, data.constants.spawn.respawn_delay);
        debug!(entity = %target.entity_id, "capture window expired");
        expired += 1;
    }
    expired
}

/// Count revival timers down; revived monsters rejoin the party if there is room
fn tick_revivals(state: &mut SimulationState, data: &GameData, dt: f64, sink: &mut impl EventSink) -> usize {
    let max_party = data.constants.progression.max_party_size;
    let mut party_len = state.party_len();
    let player_position = state.player_position;
    let mut revived = 0;

    for monster in state.monsters.iter_mut() {
        let Some(timer) = monster.revival_timer else {
            continue;
        };
        let remaining = timer - dt;
        if remaining > 0.0 {
            monster.revival_timer = Some(remaining);
            continue;
        }

        monster.revival_timer = None;
        monster.defeated = false;
        monster.restore();
        monster.clear_combat_state();
        monster.time_since_damage_taken = f64::INFINITY;
        if party_len < max_party {
            monster.placement = Placement::Party;
            monster.position = player_position;
            party_len += 1;
        }
        info!(entity = %monster.id, placement = ?monster.placement, "revived");
        sink.emit(SimEvent::Revived { entity_id: monster.id });
        revived += 1;
    }
    revived
}

/// Count respawn timers down and refill their spawn points
fn tick_respawns(
    state: &mut SimulationState,
    data: &GameData,
    dt: f64,
    rng: &mut impl Rng,
) -> Result<usize, SimError> {
    let mut respawned = 0;
    for index in (0..state.respawn_timers.len()).rev() {
        state.respawn_timers[index].remaining -= dt;
        if state.respawn_timers[index].remaining > 0.0 {
            continue;
        }
        let timer = state.respawn_timers.remove(index);
        // Points can disappear with an area change
        if timer.spawn_point < state.spawn_points.len() {
            spawn_wild(state, data, timer.spawn_point, rng)?;
            respawned += 1;
        }
    }
    Ok(respawned)
}
