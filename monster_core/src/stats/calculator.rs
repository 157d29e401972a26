//! StatCalculator - Pure stat pipeline for a single monster
//!
//! Stages run in a fixed order and each compounds on the previous result:
//!
//! 1. Typeshift flat deltas onto base stats, then spawn-level adjustment
//! 2. Favored stat bonus
//! 3. Level growth
//! 4. Element percentages (current + species element when typeshifted)
//! 5. Rare modifier percentages
//! 6. Size, HP, stamina and cooldown derivation

use super::StatAccumulator;
use crate::abilities::{Ability, AbilityEffect};
use crate::config::GameData;
use crate::error::SimError;
use crate::source::{ElementSource, RareModifierSource, StatSource, TypeshiftSource};
use crate::types::{Element, StatKind, StatLine};
use serde::{Deserialize, Serialize};

/// Everything the stat pipeline depends on
#[derive(Debug, Clone, Copy)]
pub struct StatInput<'a> {
    pub type_id: &'a str,
    pub level: u32,
    pub element: Element,
    pub rare_modifiers: &'a [String],
    pub spawn_level: u32,
    pub favored_stat: StatKind,
    pub ability: Ability,
}

/// Output of the stat pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedStats {
    pub stats: StatLine,
    pub max_hp: f64,
    pub max_stamina: f64,
    /// Seconds between attacks
    pub attack_cooldown: f64,
    pub size_multiplier: f64,
}

/// Size growth from rare modifier count; approaches 2x
pub fn size_multiplier(modifier_count: usize) -> f64 {
    2.0 - 1.0 / (1.0 + 0.1 * modifier_count as f64)
}

/// Computes final stats from the data tables
///
/// Holds no state of its own; identical inputs always give identical output.
pub struct StatCalculator<'a> {
    data: &'a GameData,
}

impl<'a> StatCalculator<'a> {
    pub fn new(data: &'a GameData) -> Self {
        StatCalculator { data }
    }

    pub fn compute(&self, input: &StatInput<'_>) -> Result<ComputedStats, SimError> {
        let constants = &self.data.constants.stats;
        let species = self.data.species(input.type_id)?;
        let level = input.level.clamp(1, constants.max_level);
        let spawn_level = input.spawn_level as f64;
        let typeshifted = input.element != species.element;

        // Gather adjustments from every source
        let current_element = self.data.element(input.element)?;
        let mut sources: Vec<Box<dyn StatSource + '_>> = Vec::new();
        sources.push(Box::new(ElementSource::new(current_element)));
        if typeshifted {
            sources.push(Box::new(TypeshiftSource::new(current_element)));
            sources.push(Box::new(ElementSource::new(self.data.element(species.element)?)));
        }
        for id in input.rare_modifiers {
            sources.push(Box::new(RareModifierSource::new(self.data.modifier(id)?)));
        }

        let mut acc = StatAccumulator::new();
        for source in &sources {
            source.apply(&mut acc);
        }

        // Step 1: typeshift deltas, then spawn-level adjustment
        let mut stats = species.base_stats;
        stats.add(&acc.base_flat);
        let adjustment = 1.0 / (1.0 + spawn_level / 100.0);
        let mut stats = StatAccumulator::apply_factor(&stats, adjustment);

        // Step 2: favored stat
        *stats.get_mut(input.favored_stat) += constants.favored_stat_bonus;

        // Step 3: level growth
        let level_f = level as f64;
        let gain = 1.0 + (level_f + spawn_level - (level_f - spawn_level).abs()) / constants.level_gain_divisor;
        let growth = 1.0 + constants.growth_rate_per_level * (level_f - 1.0) * gain;
        let stats = StatAccumulator::apply_factor(&stats, growth);

        // Step 4: element percentages
        let stats = StatAccumulator::apply_percent(&stats, &acc.element_percent);

        // Step 5: rare modifier percentages
        let stats = StatAccumulator::apply_percent(&stats, &acc.modifier_percent);

        // Step 6: derived attributes
        let hp_trade = match input.ability.id() {
            Some(id) => match &self.data.ability(id)?.effect {
                AbilityEffect::Vitality { hp_percent } => hp_percent / 100.0,
                _ => 0.0,
            },
            None => 0.0,
        };
        let endurance_factor = 1.0 + constants.resource_endurance_scaling * stats.endur as f64 / 100.0;
        let max_hp = (species.base_hp * (1.0 + hp_trade) * endurance_factor).round().max(1.0);
        let max_stamina = (species.base_stamina * (1.0 - hp_trade) * endurance_factor).round().max(1.0);

        let base_cooldown = species.attack_cooldown.unwrap_or(constants.base_cooldown);
        let attack_cooldown = base_cooldown / (1.0 + constants.speed_scaling * stats.spd as f64);

        Ok(ComputedStats {
            stats,
            max_hp,
            max_stamina,
            attack_cooldown,
            size_multiplier: size_multiplier(input.rare_modifiers.len()),
        })
    }
}
