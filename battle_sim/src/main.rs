//! battle_sim - Headless driver for monster_core encounters
//!
//! ```text
//! battle_sim world [seconds] [seed]
//! battle_sim duel <species> <level> <species> <level> [seed]
//! ```
//!
//! Set `RUST_LOG=monster_core=debug` to trace every attack and aggro change.

mod simulation;

use monster_core::boss::{required_party_level, BossMember};
use monster_core::spawn::{area_spawn_points, populate};
use monster_core::{
    attempt_capture_with_rng, spawn_boss_master, start_boss_fight, tick, BossFightStart, CaptureResult,
    ConfigError, Element, GameData, Placement, Position, SaveFile, SimError, SimEvent, SimulationState,
    SpawnParams, Team,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use simulation::{Combatant, DuelSimulation};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error("Failed to encode report: {0}")]
    Report(#[from] serde_json::Error),
    #[error("Bad argument: {0}")]
    BadArgument(String),
}

/// Summary printed after a world run
#[derive(Debug, Default, Serialize)]
struct WorldReport {
    seconds: f64,
    attacks: usize,
    events: BTreeMap<String, usize>,
    captures: usize,
    gold: u64,
    party: Vec<String>,
    stored: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run(std::env::args().skip(1).collect()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Vec<String>) -> Result<(), RunError> {
    let data = GameData::builtin()?;
    match args.first().map(String::as_str) {
        None | Some("world") => {
            let seconds = parse_arg(&args, 1, 120.0)?;
            let seed = parse_arg(&args, 2, 42)?;
            run_world(&data, seconds, seed)
        }
        Some("duel") => {
            if args.len() < 5 {
                return Err(RunError::BadArgument(
                    "usage: duel <species> <level> <species> <level> [seed]".to_string(),
                ));
            }
            let hero = Combatant::new(args[1].clone(), parse_arg(&args, 2, 1)?);
            let foe = Combatant::new(args[3].clone(), parse_arg(&args, 4, 1)?);
            let mut rng = StdRng::seed_from_u64(parse_arg(&args, 5, 42)?);
            let result = DuelSimulation::run(&data, &hero, &foe, 300.0, &mut rng)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            println!(
                "dps {:.1}, hit rate {:.0}%, avg hit {:.1}",
                result.dps(),
                result.hit_rate(),
                result.avg_damage()
            );
            Ok(())
        }
        Some(other) => Err(RunError::BadArgument(format!("unknown command '{}'", other))),
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, default: T) -> Result<T, RunError> {
    match args.get(index) {
        Some(raw) => raw
            .parse()
            .map_err(|_| RunError::BadArgument(format!("cannot parse '{}'", raw))),
        None => Ok(default),
    }
}

fn run_world(data: &GameData, seconds: f64, seed: u64) -> Result<(), RunError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = SimulationState::new();
    state.gold = 100;

    // Step 1: starting party
    for (species, level) in [("emberpup", 6), ("derpfish", 5), ("sproutling", 5)] {
        state.add_monster(data, SpawnParams::new(species, level, Team::Player, Placement::Party), &mut rng)?;
    }

    // Step 2: area and a boss
    state.change_area(3, area_spawn_points(data, Position::ZERO, 3, 6));
    populate(&mut state, data, &mut rng)?;
    let roster = [BossMember::new("tidewarden", 8), BossMember::new("magmaw", 8)];
    let master = spawn_boss_master(
        &mut state,
        data,
        "Captain Brine",
        Position::new(0.0, 600.0),
        Element::Water,
        &roster,
        &mut rng,
    )?;

    // Step 3: tick loop
    let mut report = WorldReport::default();
    let mut events: Vec<SimEvent> = Vec::new();
    let dt = data.constants.tick.max_delta;
    let mut boss_started = false;
    let mut attempted = Vec::new();
    let required_level = required_party_level(
        state.boss_masters[0].total_level,
        data.constants.progression.boss_level_margin,
    );
    while report.seconds < seconds {
        let tick_report = tick(&mut state, data, dt, &mut rng, &mut events)?;
        report.seconds += tick_report.dt;
        report.attacks += tick_report.attacks;

        for event in events.drain(..) {
            let name = serde_json::to_value(&event)?
                .get("event")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
                .to_string();
            *report.events.entry(name).or_default() += 1;
        }

        // One throw per defeated wild monster
        let targets: Vec<_> = state
            .capture_targets
            .iter()
            .map(|t| t.entity_id)
            .filter(|id| !attempted.contains(id))
            .collect();
        for target in targets {
            attempted.push(target);
            if let CaptureResult::Caught { .. } =
                attempt_capture_with_rng(&mut state, data, target, &mut rng, &mut events)?
            {
                report.captures += 1;
            }
        }

        if !boss_started && state.party_level_sum() >= required_level {
            boss_started = start_boss_fight(&mut state, data, master, &mut events)? == BossFightStart::Started;
        }
    }

    report.gold = state.gold;
    report.party = state
        .monsters
        .iter()
        .filter(|m| m.placement == Placement::Party)
        .map(|m| format!("{} L{}", m.type_id, m.level))
        .collect();
    report.stored = state.monsters.iter().filter(|m| m.placement == Placement::Storage).count();
    info!(seconds = report.seconds, captures = report.captures, "world run finished");

    println!("{}", serde_json::to_string_pretty(&report)?);
    println!("{}", SaveFile::capture(&state).to_json()?);
    Ok(())
}
