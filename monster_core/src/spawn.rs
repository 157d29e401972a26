//! Wild spawning - roll species, level, rare modifiers and inherited abilities

use crate::config::GameData;
use crate::entity::SpawnParams;
use crate::error::SimError;
use crate::types::{AbilityId, EntityId, Placement, Position, Team};
use crate::world::{SimulationState, SpawnPoint};
use rand::Rng;
use tracing::debug;

/// Roll each rare modifier independently, up to the configured cap
pub fn roll_modifiers(data: &GameData, rng: &mut impl Rng) -> Vec<String> {
    let spawn = &data.constants.spawn;
    let chance = spawn.modifier_chance.clamp(0.0, 1.0);
    let mut rolled = Vec::new();
    for id in data.modifiers.keys() {
        if rolled.len() >= spawn.max_modifiers {
            break;
        }
        if rng.gen_bool(chance) {
            rolled.push(id.clone());
        }
    }
    rolled
}

/// Occasionally hand a wild monster without a species ability a random one
pub fn roll_inherited_ability(
    data: &GameData,
    innate: Option<AbilityId>,
    rng: &mut impl Rng,
) -> Option<AbilityId> {
    if innate.is_some() {
        return None;
    }
    let chance = data.constants.spawn.inherit_ability_chance.clamp(0.0, 1.0);
    let ids = data.abilities.ids();
    if ids.is_empty() || !rng.gen_bool(chance) {
        return None;
    }
    Some(ids[rng.gen_range(0..ids.len())])
}

/// Spawn a wild monster at spawn point `index`
pub fn spawn_wild(
    state: &mut SimulationState,
    data: &GameData,
    index: usize,
    rng: &mut impl Rng,
) -> Result<EntityId, SimError> {
    let point = state.spawn_points.get(index).ok_or(SimError::UnknownSpawnPoint(index))?;
    if point.species.is_empty() {
        return Err(SimError::EmptySpawnPoint(index));
    }
    let type_id = point.species[rng.gen_range(0..point.species.len())].clone();
    let (low, high) = if point.min_level <= point.max_level {
        (point.min_level, point.max_level)
    } else {
        (point.max_level, point.min_level)
    };
    let level = rng.gen_range(low..=high).max(1);
    let origin = point.origin;

    let mut params = SpawnParams::new(type_id, level, Team::Wild, Placement::Wild).at(origin);
    params.rare_modifiers = roll_modifiers(data, rng);
    let innate = data.species(&params.type_id)?.innate_ability;
    params.inherited_ability = roll_inherited_ability(data, innate, rng);

    let id = state.add_monster(data, params, rng)?;
    let monster = state.require_mut(id)?;
    monster.spawn_point = Some(index);
    debug!(
        entity = %id,
        species = %monster.type_id,
        level,
        modifiers = monster.rare_modifiers.len(),
        "wild monster spawned"
    );
    Ok(id)
}

/// Spawn one wild monster at every spawn point
pub fn populate(state: &mut SimulationState, data: &GameData, rng: &mut impl Rng) -> Result<Vec<EntityId>, SimError> {
    let mut spawned = Vec::with_capacity(state.spawn_points.len());
    for index in 0..state.spawn_points.len() {
        spawned.push(spawn_wild(state, data, index, rng)?);
    }
    Ok(spawned)
}

/// Scatter spawn points around `center` for an area of `area_level`
pub fn area_spawn_points(data: &GameData, center: Position, area_level: u32, count: usize) -> Vec<SpawnPoint> {
    let species: Vec<String> = data.species.keys().cloned().collect();
    let low = area_level.max(1);
    (0..count)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / count.max(1) as f64;
            SpawnPoint {
                origin: center + Position::new(angle.cos(), angle.sin()) * 250.0,
                species: species.clone(),
                min_level: low,
                max_level: low + 4,
            }
        })
        .collect()
}
