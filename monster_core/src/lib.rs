//! monster_core - Simulation core for a real-time monster battler
//!
//! This library provides:
//! - StatCalculator: Final stats from species, level, element and rare modifiers
//! - Ability rules: Sixteen passives hooked into the damage pipeline
//! - Combat: Target selection, stamina, elemental and level scaling
//! - Aggro: Per-tick target assignment, collision separation and leashing
//! - Progression: Experience, gold, level penalties, capture and revival
//! - Scheduler: One `tick` that advances every subsystem in a fixed order
//! - Save: JSON save format rebuilt through the monster factory

pub mod abilities;
pub mod aggro;
pub mod boss;
pub mod combat;
pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod movement;
pub mod prelude;
pub mod progression;
pub mod save;
pub mod scheduler;
pub mod source;
pub mod spawn;
pub mod stats;
pub mod types;
pub mod world;

// Re-export core types for convenience
pub use abilities::{Ability, AbilityDef, AbilityEffect, AbilityRegistry};
pub use boss::{spawn_boss_master, start_boss_fight, BossFightStart, BossMaster, BossMember};
pub use combat::{resolve_attack, AttackOutcome, HitReport};
pub use config::{ConfigError, GameConstants, GameData};
pub use entity::{Experience, Monster, SpawnParams};
pub use error::SimError;
pub use events::{EventSink, NullSink, SimEvent};
pub use progression::{attempt_capture, attempt_capture_with_rng, handle_defeat, CaptureResult, DefeatOutcome};
pub use save::{MonsterRecord, SaveFile};
pub use scheduler::{tick, TickReport};
pub use source::StatSource;
pub use stats::{ComputedStats, StatCalculator, StatInput};
pub use types::{AbilityId, EffectivenessTier, Element, EntityId, Placement, Position, StatKind, StatLine, Team};
pub use world::{PositionMutation, SimulationState, SpawnPoint, WorldQuery};
