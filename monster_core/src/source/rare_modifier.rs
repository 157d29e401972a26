//! RareModifierSource - Percentage bonuses from a rare modifier

use crate::config::RareModifierDef;
use crate::source::StatSource;
use crate::stats::StatAccumulator;

/// One held rare modifier
pub struct RareModifierSource<'a> {
    pub def: &'a RareModifierDef,
}

impl<'a> RareModifierSource<'a> {
    pub fn new(def: &'a RareModifierDef) -> Self {
        RareModifierSource { def }
    }
}

impl StatSource for RareModifierSource<'_> {
    fn id(&self) -> &str {
        &self.def.id
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        stats.modifier_percent.add(&self.def.stat_percent);
    }
}
