//! SimulationState - every piece of mutable world state, passed explicitly
//!
//! Entities live in one vector; their [`Placement`] says which logical
//! collection (party, storage, wild, boss) they belong to. Cross references
//! between entities are ids, and removal invalidates them eagerly.

use crate::boss::BossMaster;
use crate::config::GameData;
use crate::entity::{Monster, SpawnParams};
use crate::error::SimError;
use crate::types::{EntityId, Placement, Position, Team};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A defeated wild monster that can still be captured
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptureTarget {
    pub entity_id: EntityId,
    /// Seconds left before the target despawns
    pub remaining: f64,
}

/// Where wild monsters appear
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub origin: Position,
    /// Species picked uniformly per spawn
    pub species: Vec<String>,
    pub min_level: u32,
    pub max_level: u32,
}

/// Pending wild respawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RespawnTimer {
    pub spawn_point: usize,
    pub remaining: f64,
}

/// Read-only view of the world used by the core's passes
pub trait WorldQuery {
    /// Active player roster
    fn party(&self) -> impl Iterator<Item = &Monster>;
    fn wild(&self) -> impl Iterator<Item = &Monster>;
    fn bosses(&self) -> impl Iterator<Item = &Monster>;
    /// Player-owned monsters that are not simulated
    fn stored(&self) -> impl Iterator<Item = &Monster>;
    fn position(&self, id: EntityId) -> Option<Position>;
    fn team(&self, id: EntityId) -> Option<Team>;
}

/// Logical position updates; rendering transforms are never touched
pub trait PositionMutation {
    fn translate(&mut self, id: EntityId, delta: Position) -> Result<(), SimError>;
    fn set_position(&mut self, id: EntityId, position: Position) -> Result<(), SimError>;
}

/// The whole mutable simulation
#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    pub monsters: Vec<Monster>,
    pub boss_masters: Vec<BossMaster>,
    pub capture_targets: Vec<CaptureTarget>,
    pub spawn_points: Vec<SpawnPoint>,
    pub respawn_timers: Vec<RespawnTimer>,
    /// The player avatar's logical position
    pub player_position: Position,
    pub gold: u64,
    pub area_level: u32,
    pub music_on: bool,
    next_id: u64,
}

impl SimulationState {
    pub fn new() -> Self {
        SimulationState {
            area_level: 1,
            music_on: true,
            ..Default::default()
        }
    }

    /// Hand out a fresh entity id
    pub fn allocate_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }

    /// Build a monster through the factory and add it to the world
    pub fn add_monster(
        &mut self,
        data: &GameData,
        params: SpawnParams,
        rng: &mut impl Rng,
    ) -> Result<EntityId, SimError> {
        let id = self.allocate_id();
        let monster = Monster::spawn(data, params, id, rng)?;
        self.monsters.push(monster);
        Ok(id)
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.monsters.iter().position(|m| m.id == id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Monster> {
        self.monsters.iter().find(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Monster> {
        self.monsters.iter_mut().find(|m| m.id == id)
    }

    /// Whether `id` was handed out to a monster that has since left the world
    pub fn was_removed(&self, id: EntityId) -> bool {
        (1..=self.next_id).contains(&id.0)
            && self.index_of(id).is_none()
            && !self.boss_masters.iter().any(|m| m.id == id)
    }

    pub fn require(&self, id: EntityId) -> Result<&Monster, SimError> {
        self.get(id).ok_or(SimError::UnknownEntity(id))
    }

    pub fn require_mut(&mut self, id: EntityId) -> Result<&mut Monster, SimError> {
        self.get_mut(id).ok_or(SimError::UnknownEntity(id))
    }

    /// Two distinct monsters mutably at once
    ///
    /// # Panics
    /// Panics if `a == b`.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> (&mut Monster, &mut Monster) {
        assert_ne!(a, b, "pair_mut needs two distinct indices");
        if a < b {
            let (left, right) = self.monsters.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.monsters.split_at_mut(a);
            (&mut right[0], &mut left[b])
        }
    }

    /// Clear every reference other entities hold to `id`
    pub fn invalidate_references(&mut self, id: EntityId) {
        for monster in &mut self.monsters {
            if monster.aggro_target == Some(id) {
                monster.aggro_target = None;
            }
        }
    }

    /// Remove an entity from the world, dropping its timers and references
    pub fn remove_monster(&mut self, id: EntityId) -> Option<Monster> {
        let index = self.index_of(id)?;
        let monster = self.monsters.remove(index);
        self.capture_targets.retain(|t| t.entity_id != id);
        self.invalidate_references(id);
        Some(monster)
    }

    /// Remove a wild monster and schedule its spawn point to refill
    pub fn retire_wild(&mut self, id: EntityId, respawn_delay: f64) -> Option<Monster> {
        let monster = self.remove_monster(id)?;
        if let Some(spawn_point) = monster.spawn_point {
            self.respawn_timers.push(RespawnTimer {
                spawn_point,
                remaining: respawn_delay,
            });
        }
        Some(monster)
    }

    pub fn capture_target(&self, id: EntityId) -> Option<&CaptureTarget> {
        self.capture_targets.iter().find(|t| t.entity_id == id)
    }

    /// Number of monsters in the active roster (defeated ones are moved out)
    pub fn party_len(&self) -> usize {
        self.monsters
            .iter()
            .filter(|m| m.placement == Placement::Party)
            .count()
    }

    /// Whether any party monster can still fight
    pub fn party_has_fighters(&self) -> bool {
        self.party().any(|m| m.is_alive())
    }

    /// Sum of party levels
    pub fn party_level_sum(&self) -> u32 {
        self.party().map(|m| m.level).sum()
    }

    /// Average party level, `None` with an empty party
    pub fn party_average_level(&self) -> Option<f64> {
        let count = self.party_len();
        if count == 0 {
            return None;
        }
        Some(self.party_level_sum() as f64 / count as f64)
    }

    /// Move a party monster to storage
    pub fn deactivate(&mut self, id: EntityId) -> Result<(), SimError> {
        let monster = self.require_mut(id)?;
        if monster.placement != Placement::Party {
            return Ok(());
        }
        monster.placement = Placement::Storage;
        monster.clear_combat_state();
        self.invalidate_references(id);
        Ok(())
    }

    /// Move a stored monster into the party if there is room
    ///
    /// Returns whether the monster is now in the party.
    pub fn activate(&mut self, id: EntityId, max_party_size: usize) -> Result<bool, SimError> {
        let party_len = self.party_len();
        let player_position = self.player_position;
        let monster = self.require_mut(id)?;
        if monster.placement == Placement::Party {
            return Ok(true);
        }
        if monster.placement != Placement::Storage || monster.defeated || party_len >= max_party_size {
            return Ok(false);
        }
        monster.placement = Placement::Party;
        monster.position = player_position;
        Ok(true)
    }

    /// Leave the current area: wild monsters, capture targets and respawns
    /// are discarded and every aggro reference is cleared
    pub fn change_area(&mut self, area_level: u32, spawn_points: Vec<SpawnPoint>) {
        self.monsters.retain(|m| m.placement != Placement::Wild);
        self.capture_targets.clear();
        self.respawn_timers.clear();
        for monster in &mut self.monsters {
            monster.clear_combat_state();
        }
        self.spawn_points = spawn_points;
        self.area_level = area_level.max(1);
    }

    fn with_placement(&self, placement: Placement) -> impl Iterator<Item = &Monster> {
        self.monsters.iter().filter(move |m| m.placement == placement)
    }
}

impl WorldQuery for SimulationState {
    fn party(&self) -> impl Iterator<Item = &Monster> {
        self.with_placement(Placement::Party)
    }

    fn wild(&self) -> impl Iterator<Item = &Monster> {
        self.with_placement(Placement::Wild)
    }

    fn bosses(&self) -> impl Iterator<Item = &Monster> {
        self.with_placement(Placement::Boss)
    }

    fn stored(&self) -> impl Iterator<Item = &Monster> {
        self.with_placement(Placement::Storage)
    }

    fn position(&self, id: EntityId) -> Option<Position> {
        self.get(id).map(|m| m.position)
    }

    fn team(&self, id: EntityId) -> Option<Team> {
        self.get(id).map(|m| m.team)
    }
}

impl PositionMutation for SimulationState {
    fn translate(&mut self, id: EntityId, delta: Position) -> Result<(), SimError> {
        self.require_mut(id)?.position += delta;
        Ok(())
    }

    fn set_position(&mut self, id: EntityId, position: Position) -> Result<(), SimError> {
        self.require_mut(id)?.position = position;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn setup() -> (GameData, SimulationState, rand::rngs::StdRng) {
        (
            GameData::builtin().unwrap(),
            SimulationState::new(),
            rand::rngs::StdRng::seed_from_u64(11),
        )
    }

    #[test]
    fn test_ids_are_unique() {
        let (data, mut state, mut rng) = setup();
        let a = state
            .add_monster(&data, SpawnParams::new("derpfish", 3, Team::Player, Placement::Party), &mut rng)
            .unwrap();
        let b = state
            .add_monster(&data, SpawnParams::new("derpfish", 3, Team::Wild, Placement::Wild), &mut rng)
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(state.party().count(), 1);
        assert_eq!(state.wild().count(), 1);
    }

    #[test]
    fn test_remove_invalidates_references() {
        let (data, mut state, mut rng) = setup();
        let hunter = state
            .add_monster(&data, SpawnParams::new("emberpup", 3, Team::Player, Placement::Party), &mut rng)
            .unwrap();
        let prey = state
            .add_monster(&data, SpawnParams::new("sproutling", 3, Team::Wild, Placement::Wild), &mut rng)
            .unwrap();
        state.get_mut(hunter).unwrap().aggro_target = Some(prey);
        state.capture_targets.push(CaptureTarget {
            entity_id: prey,
            remaining: 5.0,
        });

        let removed = state.remove_monster(prey).unwrap();
        assert_eq!(removed.id, prey);
        assert!(state.get(hunter).unwrap().aggro_target.is_none());
        assert!(state.capture_targets.is_empty());
    }

    #[test]
    fn test_pair_mut_either_order() {
        let (data, mut state, mut rng) = setup();
        for _ in 0..3 {
            state
                .add_monster(&data, SpawnParams::new("derpfish", 1, Team::Wild, Placement::Wild), &mut rng)
                .unwrap();
        }
        let (a, b) = state.pair_mut(2, 0);
        assert_eq!(a.id, EntityId(3));
        assert_eq!(b.id, EntityId(1));
    }

    #[test]
    fn test_activate_respects_party_size() {
        let (data, mut state, mut rng) = setup();
        let stored = state
            .add_monster(&data, SpawnParams::new("frostbun", 3, Team::Player, Placement::Storage), &mut rng)
            .unwrap();
        for _ in 0..2 {
            state
                .add_monster(&data, SpawnParams::new("derpfish", 3, Team::Player, Placement::Party), &mut rng)
                .unwrap();
        }

        assert!(!state.activate(stored, 2).unwrap());
        assert!(state.activate(stored, 3).unwrap());
        assert_eq!(state.party_len(), 3);
    }

    #[test]
    fn test_change_area_clears_wild() {
        let (data, mut state, mut rng) = setup();
        let mon = state
            .add_monster(&data, SpawnParams::new("derpfish", 3, Team::Player, Placement::Party), &mut rng)
            .unwrap();
        let wild = state
            .add_monster(&data, SpawnParams::new("zapmoth", 3, Team::Wild, Placement::Wild), &mut rng)
            .unwrap();
        state.get_mut(mon).unwrap().aggro_target = Some(wild);

        state.change_area(4, Vec::new());
        assert_eq!(state.wild().count(), 0);
        assert!(state.get(mon).unwrap().aggro_target.is_none());
        assert_eq!(state.area_level, 4);
    }

    #[test]
    fn test_position_mutation() {
        let (data, mut state, mut rng) = setup();
        let id = state
            .add_monster(&data, SpawnParams::new("derpfish", 3, Team::Wild, Placement::Wild), &mut rng)
            .unwrap();
        state.translate(id, Position::new(3.0, 4.0)).unwrap();
        assert_eq!(state.position(id), Some(Position::new(3.0, 4.0)));
        state.set_position(id, Position::new(-1.0, 0.0)).unwrap();
        assert_eq!(state.position(id), Some(Position::new(-1.0, 0.0)));
        assert!(state.translate(EntityId(999), Position::ZERO).is_err());
    }
}
