//! Species table loading

use super::ConfigError;
use crate::types::{AbilityId, Element, StatLine};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Static definition of a monster species
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesDef {
    /// Unique type id (e.g., "derpfish")
    pub id: String,
    /// Display name
    pub name: String,
    /// Innate element
    pub element: Element,
    /// Unscaled base stats
    pub base_stats: StatLine,
    /// HP before endurance scaling
    pub base_hp: f64,
    /// Stamina before endurance scaling
    pub base_stamina: f64,
    /// Ability every member of the species is born with
    #[serde(default)]
    pub innate_ability: Option<AbilityId>,
    /// Replaces the global base cooldown for this species
    #[serde(default)]
    pub attack_cooldown: Option<f64>,
}

/// Container for species configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesConfig {
    pub species: Vec<SpeciesDef>,
}

/// Load species from a TOML file
pub fn load_species(path: &Path) -> Result<BTreeMap<String, SpeciesDef>, ConfigError> {
    let config: SpeciesConfig = super::load_toml(path)?;
    collect_species(config)
}

/// Load species from a TOML string
pub fn parse_species(content: &str) -> Result<BTreeMap<String, SpeciesDef>, ConfigError> {
    let config: SpeciesConfig = super::parse_toml(content)?;
    collect_species(config)
}

fn collect_species(config: SpeciesConfig) -> Result<BTreeMap<String, SpeciesDef>, ConfigError> {
    let mut map = BTreeMap::new();
    for species in config.species {
        if species.base_hp <= 0.0 || species.base_stamina <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "species {} needs positive base_hp and base_stamina",
                species.id
            )));
        }
        if let Some(previous) = map.insert(species.id.clone(), species) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate species id {}",
                previous.id
            )));
        }
    }
    Ok(map)
}
