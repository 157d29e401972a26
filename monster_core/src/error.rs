//! Runtime errors for invalid simulation input
//!
//! These indicate data-table or caller bugs (an id that does not exist).
//! Expected steady-state conditions such as "no target in range" or
//! "not enough gold" are modelled as values, never as errors.

use crate::types::{AbilityId, Element, EntityId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Unknown species: {0}")]
    UnknownSpecies(String),
    #[error("Unknown rare modifier: {0}")]
    UnknownModifier(String),
    #[error("Unknown ability id: {0}")]
    UnknownAbility(AbilityId),
    #[error("No element table for {0:?}")]
    UnknownElement(Element),
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),
    #[error("Invalid favored stat index: {0}")]
    InvalidFavoredStat(u8),
    #[error("Invalid level: {0}")]
    InvalidLevel(u32),
    #[error("Unknown spawn point: {0}")]
    UnknownSpawnPoint(usize),
    #[error("Spawn point {0} has no species")]
    EmptySpawnPoint(usize),
    #[error("Failed to encode or decode save data: {0}")]
    Save(#[from] serde_json::Error),
}
