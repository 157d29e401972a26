//! Configuration loading from TOML files

mod abilities;
mod constants;
mod elements;
mod modifiers;
mod species;

pub use abilities::{load_abilities, parse_abilities};
pub use constants::{
    AggroConstants, CaptureConstants, CombatConstants, GameConstants, MovementConstants,
    ProgressionConstants, RegenConstants, SpawnConstants, StatConstants, TickConstants,
};
pub use elements::{load_elements, parse_elements, ElementDef, ElementTable};
pub use modifiers::{load_modifiers, parse_modifiers, RareModifierDef};
pub use species::{load_species, parse_species, SpeciesDef};

use crate::abilities::{AbilityDef, AbilityRegistry};
use crate::error::SimError;
use crate::types::{AbilityId, Element};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Every data table the simulation reads
#[derive(Debug, Clone)]
pub struct GameData {
    pub constants: GameConstants,
    pub species: BTreeMap<String, SpeciesDef>,
    pub elements: ElementTable,
    pub modifiers: BTreeMap<String, RareModifierDef>,
    pub abilities: AbilityRegistry,
}

impl GameData {
    /// Data tables bundled with the crate
    pub fn builtin() -> Result<Self, ConfigError> {
        let data = GameData {
            constants: parse_toml(include_str!("../../config/constants.toml"))?,
            species: parse_species(include_str!("../../config/species.toml"))?,
            elements: parse_elements(include_str!("../../config/elements.toml"))?,
            modifiers: parse_modifiers(include_str!("../../config/modifiers.toml"))?,
            abilities: parse_abilities(include_str!("../../config/abilities.toml"))?,
        };
        data.validate()?;
        Ok(data)
    }

    /// Load the same set of tables from a directory
    ///
    /// Expects `constants.toml`, `species.toml`, `elements.toml`,
    /// `modifiers.toml` and `abilities.toml`.
    pub fn load_dir(dir: &Path) -> Result<Self, ConfigError> {
        let data = GameData {
            constants: load_toml(&dir.join("constants.toml"))?,
            species: load_species(&dir.join("species.toml"))?,
            elements: load_elements(&dir.join("elements.toml"))?,
            modifiers: load_modifiers(&dir.join("modifiers.toml"))?,
            abilities: load_abilities(&dir.join("abilities.toml"))?,
        };
        data.validate()?;
        Ok(data)
    }

    /// Cross-table checks: every id a table references must exist
    pub fn validate(&self) -> Result<(), ConfigError> {
        for species in self.species.values() {
            if let Some(id) = species.innate_ability {
                if !self.abilities.contains(id) {
                    return Err(ConfigError::ValidationError(format!(
                        "species {} references unknown ability {}",
                        species.id, id
                    )));
                }
            }
            if self.elements.get(species.element).is_none() {
                return Err(ConfigError::ValidationError(format!(
                    "species {} uses element {:?} without a table",
                    species.id, species.element
                )));
            }
        }

        if self.modifiers.len() > self.constants.spawn.max_modifiers {
            return Err(ConfigError::ValidationError(format!(
                "{} rare modifiers exceed the cap of {}",
                self.modifiers.len(),
                self.constants.spawn.max_modifiers
            )));
        }

        if self.constants.stats.max_level == 0 {
            return Err(ConfigError::ValidationError("max_level must be at least 1".to_string()));
        }

        Ok(())
    }

    pub fn species(&self, type_id: &str) -> Result<&SpeciesDef, SimError> {
        self.species
            .get(type_id)
            .ok_or_else(|| SimError::UnknownSpecies(type_id.to_string()))
    }

    pub fn element(&self, element: Element) -> Result<&ElementDef, SimError> {
        self.elements
            .get(element)
            .ok_or(SimError::UnknownElement(element))
    }

    pub fn modifier(&self, id: &str) -> Result<&RareModifierDef, SimError> {
        self.modifiers
            .get(id)
            .ok_or_else(|| SimError::UnknownModifier(id.to_string()))
    }

    pub fn ability(&self, id: AbilityId) -> Result<&AbilityDef, SimError> {
        self.abilities.get(id).ok_or(SimError::UnknownAbility(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_data_loads() {
        let data = GameData::builtin().unwrap();
        assert_eq!(data.species.len(), 10);
        assert_eq!(data.modifiers.len(), 15);
        assert_eq!(data.abilities.len(), 16);
        assert!(data.species("derpfish").is_ok());
    }

    #[test]
    fn test_unknown_ids_fail_loudly() {
        let data = GameData::builtin().unwrap();
        assert!(matches!(data.species("missingno"), Err(SimError::UnknownSpecies(_))));
        assert!(matches!(data.modifier("shiny"), Err(SimError::UnknownModifier(_))));
        assert!(matches!(data.ability(404), Err(SimError::UnknownAbility(404))));
    }

    #[test]
    fn test_dangling_species_ability_rejected() {
        let mut data = GameData::builtin().unwrap();
        if let Some(species) = data.species.get_mut("derpfish") {
            species.innate_ability = Some(999);
        }
        assert!(matches!(data.validate(), Err(ConfigError::ValidationError(_))));
    }
}
