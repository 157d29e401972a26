//! Boss masters - dormant rosters that engage once the party is strong enough
//!
//! A master and its monsters start on [`Team::Player`] so aggro ignores them.
//! Starting the fight flips the master and every monster it owns to
//! [`Team::Boss`].

use crate::config::GameData;
use crate::entity::SpawnParams;
use crate::error::SimError;
use crate::events::{EventSink, SimEvent};
use crate::types::{Element, EntityId, Placement, Position, Team};
use crate::world::SimulationState;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Owner of a boss roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossMaster {
    pub id: EntityId,
    pub name: String,
    pub position: Position,
    pub element: Element,
    pub team: Team,
    pub monster_ids: Vec<EntityId>,
    /// Sum of roster levels at spawn; drives the level gate
    pub total_level: u32,
    pub defeated: bool,
}

/// One roster entry
#[derive(Debug, Clone)]
pub struct BossMember {
    pub type_id: String,
    pub level: u32,
    pub rare_modifiers: Vec<String>,
}

impl BossMember {
    pub fn new(type_id: impl Into<String>, level: u32) -> Self {
        BossMember {
            type_id: type_id.into(),
            level,
            rare_modifiers: Vec::new(),
        }
    }
}

/// Result of [`start_boss_fight`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum BossFightStart {
    Started,
    /// Party level sum below the gate; nothing changed
    Rejected { party_level: u32, required_level: u32 },
    AlreadyEngaged,
    AlreadyDefeated,
}

/// Spawn a master with its roster, dormant
pub fn spawn_boss_master(
    state: &mut SimulationState,
    data: &GameData,
    name: impl Into<String>,
    position: Position,
    element: Element,
    roster: &[BossMember],
    rng: &mut impl Rng,
) -> Result<EntityId, SimError> {
    let master_id = state.allocate_id();
    let mut monster_ids = Vec::with_capacity(roster.len());
    let mut total_level = 0;

    for (slot, member) in roster.iter().enumerate() {
        let offset = Position::new(30.0 * slot as f64, 40.0);
        let mut params = SpawnParams::new(member.type_id.clone(), member.level, Team::Player, Placement::Boss)
            .at(position + offset)
            .with_master(master_id);
        params.rare_modifiers = member.rare_modifiers.clone();
        let id = state.add_monster(data, params, rng)?;
        total_level += state.require(id)?.level;
        monster_ids.push(id);
    }

    state.boss_masters.push(BossMaster {
        id: master_id,
        name: name.into(),
        position,
        element,
        team: Team::Player,
        monster_ids,
        total_level,
        defeated: false,
    });
    Ok(master_id)
}

/// Level sum the party needs to start a fight against `total_level`
pub fn required_party_level(total_level: u32, margin: u32) -> u32 {
    total_level.saturating_sub(margin)
}

/// Engage a boss master if the party passes the level gate
pub fn start_boss_fight(
    state: &mut SimulationState,
    data: &GameData,
    master_id: EntityId,
    sink: &mut impl EventSink,
) -> Result<BossFightStart, SimError> {
    let party_level: u32 = state
        .monsters
        .iter()
        .filter(|m| m.placement == Placement::Party && !m.defeated)
        .map(|m| m.level)
        .sum();
    let master = state
        .boss_masters
        .iter_mut()
        .find(|m| m.id == master_id)
        .ok_or(SimError::UnknownEntity(master_id))?;

    if master.defeated {
        return Ok(BossFightStart::AlreadyDefeated);
    }
    if master.team == Team::Boss {
        return Ok(BossFightStart::AlreadyEngaged);
    }

    let required_level = required_party_level(master.total_level, data.constants.progression.boss_level_margin);
    if party_level < required_level {
        warn!(master = %master_id, party_level, required_level, "boss fight rejected");
        sink.emit(SimEvent::BossFightRejected {
            master_id,
            party_level,
            required_level,
        });
        return Ok(BossFightStart::Rejected {
            party_level,
            required_level,
        });
    }

    master.team = Team::Boss;
    for monster in state.monsters.iter_mut().filter(|m| m.master_id == Some(master_id)) {
        monster.team = Team::Boss;
    }
    info!(master = %master_id, party_level, "boss fight started");
    sink.emit(SimEvent::BossFightStarted { master_id });
    Ok(BossFightStart::Started)
}

/// Mark the master defeated once none of its monsters remain
pub fn check_master_defeated(state: &mut SimulationState, master_id: EntityId, sink: &mut impl EventSink) -> bool {
    let remaining = state
        .monsters
        .iter()
        .any(|m| m.master_id == Some(master_id) && !m.defeated);
    let Some(master) = state.boss_masters.iter_mut().find(|m| m.id == master_id) else {
        return false;
    };
    if remaining || master.defeated {
        return master.defeated;
    }

    master.defeated = true;
    master.monster_ids.clear();
    info!(master = %master_id, "boss master defeated");
    sink.emit(SimEvent::BossDefeated { master_id });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::handle_defeat;
    use crate::world::WorldQuery;
    use rand::SeedableRng;

    fn setup(party_levels: &[u32]) -> (GameData, SimulationState, EntityId) {
        let data = GameData::builtin().unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(13);
        let mut state = SimulationState::new();
        for &level in party_levels {
            state
                .add_monster(&data, SpawnParams::new("emberpup", level, Team::Player, Placement::Party), &mut rng)
                .unwrap();
        }
        let roster = [BossMember::new("tidewarden", 20), BossMember::new("magmaw", 20)];
        let master = spawn_boss_master(
            &mut state,
            &data,
            "Captain Brine",
            Position::new(300.0, 0.0),
            Element::Water,
            &roster,
            &mut rng,
        )
        .unwrap();
        (data, state, master)
    }

    #[test]
    fn test_spawned_roster_is_dormant() {
        let (_, state, master) = setup(&[10]);
        let boss = &state.boss_masters[0];
        assert_eq!(boss.id, master);
        assert_eq!(boss.total_level, 40);
        assert_eq!(boss.monster_ids.len(), 2);
        for id in &boss.monster_ids {
            let monster = state.get(*id).unwrap();
            assert_eq!(monster.team, Team::Player);
            assert!(!monster.is_combat_active());
        }
    }

    #[test]
    fn test_level_gate_rejects() {
        let (data, mut state, master) = setup(&[10, 10]);
        let mut events: Vec<SimEvent> = Vec::new();

        let result = start_boss_fight(&mut state, &data, master, &mut events).unwrap();
        assert_eq!(
            result,
            BossFightStart::Rejected {
                party_level: 20,
                required_level: 30
            }
        );
        assert_eq!(state.boss_masters[0].team, Team::Player);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_fight_flips_teams() {
        let (data, mut state, master) = setup(&[15, 15]);
        let mut events: Vec<SimEvent> = Vec::new();

        let result = start_boss_fight(&mut state, &data, master, &mut events).unwrap();
        assert_eq!(result, BossFightStart::Started);
        assert_eq!(state.boss_masters[0].team, Team::Boss);
        for id in state.boss_masters[0].monster_ids.clone() {
            let monster = state.get(id).unwrap();
            assert_eq!(monster.team, Team::Boss);
            assert!(monster.is_combat_active());
        }
        assert_eq!(
            start_boss_fight(&mut state, &data, master, &mut events).unwrap(),
            BossFightStart::AlreadyEngaged
        );
    }

    #[test]
    fn test_master_falls_with_last_monster() {
        let (data, mut state, master) = setup(&[30]);
        let mut events: Vec<SimEvent> = Vec::new();
        start_boss_fight(&mut state, &data, master, &mut events).unwrap();
        let hero = state.party().next().map(|m| m.id).unwrap();
        let ids = state.boss_masters[0].monster_ids.clone();

        handle_defeat(&mut state, &data, ids[0], Some(hero), &mut events).unwrap();
        assert!(!state.boss_masters[0].defeated);
        handle_defeat(&mut state, &data, ids[1], Some(hero), &mut events).unwrap();
        assert!(state.boss_masters[0].defeated);
        assert!(events.contains(&SimEvent::BossDefeated { master_id: master }));
        assert_eq!(state.bosses().count(), 0);
    }

    #[test]
    fn test_unknown_master() {
        let (data, mut state, _) = setup(&[10]);
        let mut events: Vec<SimEvent> = Vec::new();
        assert!(start_boss_fight(&mut state, &data, EntityId(999), &mut events).is_err());
    }
}
