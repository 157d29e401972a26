//! Combat resolution - one attack from target pick to defeat handling

mod resolution;
mod result;
mod targeting;

pub use resolution::{base_components, resolve_attack};
pub use result::{AttackOutcome, HitReport};
pub use targeting::{hostile_candidates, pick_weighted, proximity_weight, Candidate};
