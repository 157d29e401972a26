//! Simulation events consumed by presentation, audio and FX layers

use crate::types::{EffectivenessTier, EntityId};
use serde::{Deserialize, Serialize};

/// Something observable happened inside the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    DamageDealt {
        attacker_id: EntityId,
        defender_id: EntityId,
        amount: u32,
        effectiveness: EffectivenessTier,
    },
    Miss {
        attacker_id: EntityId,
    },
    LevelUp {
        entity_id: EntityId,
        new_level: u32,
    },
    Defeated {
        entity_id: EntityId,
    },
    CaptureOutcome {
        success: bool,
        entity_id: EntityId,
        cost: u64,
    },
    GoldAwarded {
        amount: u64,
    },
    /// A capture was requested without enough gold; nothing changed
    InsufficientGold {
        required: u64,
        available: u64,
    },
    BossFightStarted {
        master_id: EntityId,
    },
    /// The party is too weak for the boss; nothing changed
    BossFightRejected {
        master_id: EntityId,
        party_level: u32,
        required_level: u32,
    },
    BossDefeated {
        master_id: EntityId,
    },
    Revived {
        entity_id: EntityId,
    },
    /// A wild monster caught the player while the party was down
    PlayerTeleported {
        caught_by: EntityId,
    },
}

/// Receiver of simulation events
pub trait EventSink {
    fn emit(&mut self, event: SimEvent);
}

impl EventSink for Vec<SimEvent> {
    fn emit(&mut self, event: SimEvent) {
        self.push(event);
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: SimEvent) {}
}
