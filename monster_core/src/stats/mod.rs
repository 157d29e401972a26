//! Stat calculation - species base stats to final monster stats

mod accumulator;
mod calculator;

pub use accumulator::StatAccumulator;
pub use calculator::{size_multiplier, ComputedStats, StatCalculator, StatInput};
