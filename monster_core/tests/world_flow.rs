//! End-to-end flows through the public tick loop

use monster_core::progression::handle_defeat;
use monster_core::{
    tick, GameData, Placement, Position, SimEvent, SimulationState, SpawnParams, Team, WorldQuery,
};
use rand::SeedableRng;
use std::path::Path;

#[test]
fn test_config_dir_matches_builtin() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("config");
    let loaded = GameData::load_dir(&dir).unwrap();
    let builtin = GameData::builtin().unwrap();
    assert_eq!(loaded.species.len(), builtin.species.len());
    assert_eq!(loaded.modifiers.len(), builtin.modifiers.len());
    assert_eq!(loaded.abilities.len(), builtin.abilities.len());
    assert!((loaded.constants.combat.physical_base - builtin.constants.combat.physical_base).abs() < f64::EPSILON);
}

#[test]
fn test_party_wipe_teleports_then_revives() {
    let data = GameData::builtin().unwrap();
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let mut state = SimulationState::new();
    state.player_position = Position::new(500.0, 500.0);

    let hero = state
        .add_monster(
            &data,
            SpawnParams::new("derpfish", 1, Team::Player, Placement::Party).at(Position::new(500.0, 500.0)),
            &mut rng,
        )
        .unwrap();
    let wild = state
        .add_monster(
            &data,
            SpawnParams::new("zapmoth", 4, Team::Wild, Placement::Wild).at(Position::new(500.0, 560.0)),
            &mut rng,
        )
        .unwrap();
    let mut events: Vec<SimEvent> = Vec::new();

    // Step 1: the whole party is down
    handle_defeat(&mut state, &data, hero, Some(wild), &mut events).unwrap();
    assert!(!state.party_has_fighters());
    assert_eq!(state.stored().count(), 1);

    // Step 2: the wild monster runs the player down
    for _ in 0..200 {
        tick(&mut state, &data, 0.1, &mut rng, &mut events).unwrap();
        if events.iter().any(|e| matches!(e, SimEvent::PlayerTeleported { .. })) {
            break;
        }
    }
    assert!(events.contains(&SimEvent::PlayerTeleported { caught_by: wild }));
    let [x, y] = data.constants.movement.town_position;
    assert_eq!(state.player_position, Position::new(x, y));
    assert!(!state.get(wild).unwrap().chasing_player);

    // Step 3: the revival timer brings the hero back beside the player
    for _ in 0..5000 {
        tick(&mut state, &data, 0.1, &mut rng, &mut events).unwrap();
        if events.contains(&SimEvent::Revived { entity_id: hero }) {
            break;
        }
    }
    let revived = state.get(hero).unwrap();
    assert!(!revived.defeated);
    assert_eq!(revived.placement, Placement::Party);
    assert!((revived.hp_fraction() - 1.0).abs() < f64::EPSILON);
    assert!(state.party_has_fighters());
}

#[test]
fn test_defeat_twice_changes_nothing() {
    let data = GameData::builtin().unwrap();
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let mut state = SimulationState::new();
    let hero = state
        .add_monster(&data, SpawnParams::new("emberpup", 10, Team::Player, Placement::Party), &mut rng)
        .unwrap();
    let wild = state
        .add_monster(&data, SpawnParams::new("sproutling", 10, Team::Wild, Placement::Wild), &mut rng)
        .unwrap();
    let mut events: Vec<SimEvent> = Vec::new();

    handle_defeat(&mut state, &data, wild, Some(hero), &mut events).unwrap();
    let gold = state.gold;
    let experience = state.get(hero).unwrap().experience;
    let level = state.get(wild).unwrap().level;
    let emitted = events.len();

    handle_defeat(&mut state, &data, wild, Some(hero), &mut events).unwrap();
    assert_eq!(state.gold, gold);
    assert_eq!(state.get(hero).unwrap().experience, experience);
    assert_eq!(state.get(wild).unwrap().level, level);
    assert_eq!(events.len(), emitted);
}
