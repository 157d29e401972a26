//! Element table loading and matchups

use super::ConfigError;
use crate::config::CombatConstants;
use crate::types::{Element, StatLine};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Per-element matchups and stat adjustments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementDef {
    pub element: Element,
    /// Elements this one deals super-effective damage to
    #[serde(default)]
    pub strong_against: Vec<Element>,
    /// Percentage points applied at the element stage of stat calculation
    #[serde(default)]
    pub stat_percent: StatLine,
    /// Flat base-stat deltas for a monster typeshifted into this element
    #[serde(default)]
    pub typeshift_flat: StatLine,
}

/// Lookup of element definitions
#[derive(Debug, Clone, Default)]
pub struct ElementTable {
    defs: HashMap<Element, ElementDef>,
}

impl ElementTable {
    pub fn new() -> Self {
        ElementTable {
            defs: HashMap::new(),
        }
    }

    pub fn register(&mut self, def: ElementDef) {
        self.defs.insert(def.element, def);
    }

    pub fn get(&self, element: Element) -> Option<&ElementDef> {
        self.defs.get(&element)
    }

    /// Raw elemental multiplier of `attacker` hitting `defender`
    ///
    /// Strong matchup first, then the reverse (weak) matchup, else neutral.
    pub fn multiplier(&self, attacker: Element, defender: Element, combat: &CombatConstants) -> f64 {
        let strong = |a: Element, d: Element| {
            self.get(a)
                .map(|def| def.strong_against.contains(&d))
                .unwrap_or(false)
        };

        if strong(attacker, defender) {
            combat.super_effective
        } else if strong(defender, attacker) {
            combat.not_very_effective
        } else {
            1.0
        }
    }
}

/// Container for element configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementsConfig {
    pub elements: Vec<ElementDef>,
}

/// Load the element table from a TOML file
pub fn load_elements(path: &Path) -> Result<ElementTable, ConfigError> {
    let config: ElementsConfig = super::load_toml(path)?;
    collect_elements(config)
}

/// Load the element table from a TOML string
pub fn parse_elements(content: &str) -> Result<ElementTable, ConfigError> {
    let config: ElementsConfig = super::parse_toml(content)?;
    collect_elements(config)
}

fn collect_elements(config: ElementsConfig) -> Result<ElementTable, ConfigError> {
    let mut table = ElementTable::new();
    for def in config.elements {
        if table.get(def.element).is_some() {
            return Err(ConfigError::ValidationError(format!(
                "element {:?} defined twice",
                def.element
            )));
        }
        table.register(def);
    }

    for &element in Element::all() {
        if table.get(element).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "missing element table for {:?}",
                element
            )));
        }
    }

    Ok(table)
}
