//! StatAccumulator - Collects stat adjustments before they are applied

use crate::types::StatLine;

/// Accumulates adjustments from every [`StatSource`](crate::source::StatSource)
///
/// Percentages are summed per bucket and applied once, so three +10%
/// modifiers give +30%, never 1.1³.
#[derive(Debug, Clone, Default)]
pub struct StatAccumulator {
    /// Flat deltas added to base stats before scaling
    pub base_flat: StatLine,
    /// Element stage percentage points
    pub element_percent: StatLine,
    /// Rare modifier stage percentage points
    pub modifier_percent: StatLine,
}

impl StatAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply summed percentage points to `stats`, rounding each result
    pub fn apply_percent(stats: &StatLine, percent: &StatLine) -> StatLine {
        stats.map(|stat, value| scale(value, 1.0 + percent.get(stat) as f64 / 100.0))
    }

    /// Multiply every stat by `factor`, rounding each result
    pub fn apply_factor(stats: &StatLine, factor: f64) -> StatLine {
        stats.map(|_, value| scale(value, factor))
    }
}

fn scale(value: i32, factor: f64) -> i32 {
    ((value as f64 * factor).round() as i32).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_percent_once() {
        let stats = StatLine::new(100, 50, 50, 50, 50, 50);
        let percent = StatLine::new(30, 0, 0, -10, 0, 0);
        let out = StatAccumulator::apply_percent(&stats, &percent);

        assert_eq!(out.spd, 130);
        assert_eq!(out.p_atk, 45);
        assert_eq!(out.p_def, 50);
    }

    #[test]
    fn test_percent_never_goes_negative() {
        let stats = StatLine::new(10, 10, 10, 10, 10, 10);
        let percent = StatLine::new(-150, 0, 0, 0, 0, 0);
        let out = StatAccumulator::apply_percent(&stats, &percent);
        assert_eq!(out.spd, 0);
    }

    #[test]
    fn test_apply_factor_rounds() {
        let stats = StatLine::new(45, 60, 70, 35, 45, 55);
        let out = StatAccumulator::apply_factor(&stats, 1.0 / 1.05);
        // 45 / 1.05 = 42.86 -> 43
        assert_eq!(out.spd, 43);
        // 60 / 1.05 = 57.14 -> 57
        assert_eq!(out.p_def, 57);
    }
}
