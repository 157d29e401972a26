//! Ability table loading

use super::ConfigError;
use crate::abilities::{AbilityDef, AbilityRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for ability configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilitiesConfig {
    pub abilities: Vec<AbilityDef>,
}

/// Load ability definitions from a TOML file
pub fn load_abilities(path: &Path) -> Result<AbilityRegistry, ConfigError> {
    let config: AbilitiesConfig = super::load_toml(path)?;
    collect_abilities(config)
}

/// Load ability definitions from a TOML string
pub fn parse_abilities(content: &str) -> Result<AbilityRegistry, ConfigError> {
    let config: AbilitiesConfig = super::parse_toml(content)?;
    collect_abilities(config)
}

fn collect_abilities(config: AbilitiesConfig) -> Result<AbilityRegistry, ConfigError> {
    let mut registry = AbilityRegistry::new();
    for def in config.abilities {
        if def.id == 0 {
            return Err(ConfigError::ValidationError(format!(
                "ability {} uses reserved id 0",
                def.name
            )));
        }
        if registry.contains(def.id) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate ability id {}",
                def.id
            )));
        }
        registry.register(def);
    }
    Ok(registry)
}
