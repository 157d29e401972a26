//! Target selection - weighted random pick among hostile monsters in range

use crate::config::GameConstants;
use crate::types::EntityId;
use crate::world::SimulationState;
use rand::Rng;

/// A monster the attacker could hit right now
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Index into `SimulationState::monsters`
    pub index: usize,
    pub id: EntityId,
    pub distance: f64,
}

/// Selection weight for a candidate; closer is heavier
pub fn proximity_weight(distance: f64, exponent: f64) -> f64 {
    1.0 / distance.max(1.0).powf(exponent)
}

/// Every hostile, live, active monster within attack range of the attacker
pub fn hostile_candidates(
    state: &SimulationState,
    attacker_index: usize,
    constants: &GameConstants,
) -> Vec<Candidate> {
    let attacker = &state.monsters[attacker_index];
    let wild_vs_boss = constants.aggro.wild_vs_boss_hostile;

    state
        .monsters
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != attacker_index)
        .filter(|(_, other)| {
            other.is_alive()
                && other.is_combat_active()
                && attacker.team.is_hostile_to(other.team, wild_vs_boss)
        })
        .filter_map(|(index, other)| {
            let distance = attacker.position.distance(other.position);
            (distance <= constants.combat.attack_range).then_some(Candidate {
                index,
                id: other.id,
                distance,
            })
        })
        .collect()
}

/// Pick one candidate with probability proportional to its proximity weight
pub fn pick_weighted<'a>(candidates: &'a [Candidate], exponent: f64, rng: &mut impl Rng) -> Option<&'a Candidate> {
    let total: f64 = candidates.iter().map(|c| proximity_weight(c.distance, exponent)).sum();
    if candidates.is_empty() || total <= 0.0 {
        return None;
    }

    let mut roll = rng.gen_range(0.0..total);
    for candidate in candidates {
        let weight = proximity_weight(candidate.distance, exponent);
        if roll < weight {
            return Some(candidate);
        }
        roll -= weight;
    }
    candidates.last()
}
