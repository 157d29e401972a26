//! StatSource - Trait and implementations for stat providers

mod element;
mod rare_modifier;

pub use element::{ElementSource, TypeshiftSource};
pub use rare_modifier::RareModifierSource;

use crate::stats::StatAccumulator;

/// Trait for anything that contributes stat adjustments to a monster
pub trait StatSource: Send + Sync {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Apply this source's adjustments to the accumulator
    fn apply(&self, stats: &mut StatAccumulator);
}
