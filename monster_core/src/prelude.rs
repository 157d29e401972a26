//! Prelude module for convenient imports
//!
//! ```rust
//! use monster_core::prelude::*;
//! ```

// Core types
pub use crate::entity::{Monster, SpawnParams};
pub use crate::types::{EffectivenessTier, Element, EntityId, Placement, Position, StatKind, StatLine, Team};
pub use crate::world::{PositionMutation, SimulationState, SpawnPoint, WorldQuery};

// Simulation
pub use crate::combat::{resolve_attack, AttackOutcome};
pub use crate::events::{EventSink, NullSink, SimEvent};
pub use crate::scheduler::{tick, TickReport};

// Progression
pub use crate::boss::{spawn_boss_master, start_boss_fight, BossFightStart, BossMember};
pub use crate::progression::{attempt_capture, CaptureResult};
pub use crate::save::SaveFile;

// Config
pub use crate::config::GameData;
pub use crate::error::SimError;
