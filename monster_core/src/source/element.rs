//! Element-driven stat sources

use crate::config::ElementDef;
use crate::source::StatSource;
use crate::stats::StatAccumulator;

/// Percentage adjustments of one element
///
/// A typeshifted monster carries two of these: its current element and its
/// species element. Both land in the same bucket and are applied once.
pub struct ElementSource<'a> {
    pub def: &'a ElementDef,
}

impl<'a> ElementSource<'a> {
    pub fn new(def: &'a ElementDef) -> Self {
        ElementSource { def }
    }
}

impl StatSource for ElementSource<'_> {
    fn id(&self) -> &str {
        "element"
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        stats.element_percent.add(&self.def.stat_percent);
    }
}

/// Flat base-stat deltas for a monster shifted into `def`'s element
pub struct TypeshiftSource<'a> {
    pub def: &'a ElementDef,
}

impl<'a> TypeshiftSource<'a> {
    pub fn new(def: &'a ElementDef) -> Self {
        TypeshiftSource { def }
    }
}

impl StatSource for TypeshiftSource<'_> {
    fn id(&self) -> &str {
        "typeshift"
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        stats.base_flat.add(&self.def.typeshift_flat);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Element, StatLine};

    fn fire() -> ElementDef {
        ElementDef {
            element: Element::Fire,
            strong_against: vec![Element::Grass],
            stat_percent: StatLine::new(0, 0, -5, 10, 5, 0),
            typeshift_flat: StatLine::new(4, -4, 0, 6, 0, 0),
        }
    }

    #[test]
    fn test_two_elements_sum_into_one_bucket() {
        let def = fire();
        let mut acc = StatAccumulator::new();
        ElementSource::new(&def).apply(&mut acc);
        ElementSource::new(&def).apply(&mut acc);

        assert_eq!(acc.element_percent.p_atk, 20);
        assert_eq!(acc.element_percent.s_def, -10);
        assert_eq!(acc.base_flat, StatLine::default());
    }

    #[test]
    fn test_typeshift_goes_to_base_flat() {
        let def = fire();
        let mut acc = StatAccumulator::new();
        TypeshiftSource::new(&def).apply(&mut acc);

        assert_eq!(acc.base_flat.p_atk, 6);
        assert_eq!(acc.base_flat.p_def, -4);
        assert_eq!(acc.element_percent, StatLine::default());
    }
}
