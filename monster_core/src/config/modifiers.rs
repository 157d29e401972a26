//! Rare modifier table loading

use super::ConfigError;
use crate::types::StatLine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A named bundle of percentage stat bonuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RareModifierDef {
    pub id: String,
    pub name: String,
    /// Percentage points per stat
    #[serde(default)]
    pub stat_percent: StatLine,
}

/// Container for rare modifier configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifiersConfig {
    pub modifiers: Vec<RareModifierDef>,
}

/// Load rare modifiers from a TOML file
pub fn load_modifiers(path: &Path) -> Result<BTreeMap<String, RareModifierDef>, ConfigError> {
    let config: ModifiersConfig = super::load_toml(path)?;
    collect_modifiers(config)
}

/// Load rare modifiers from a TOML string
pub fn parse_modifiers(content: &str) -> Result<BTreeMap<String, RareModifierDef>, ConfigError> {
    let config: ModifiersConfig = super::parse_toml(content)?;
    collect_modifiers(config)
}

fn collect_modifiers(config: ModifiersConfig) -> Result<BTreeMap<String, RareModifierDef>, ConfigError> {
    let mut map = BTreeMap::new();
    for modifier in config.modifiers {
        if let Some(previous) = map.insert(modifier.id.clone(), modifier) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate rare modifier id {}",
                previous.id
            )));
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modifiers() {
        let toml = r#"
[[modifiers]]
id = "swift"
name = "Swift"
[modifiers.stat_percent]
spd = 10

[[modifiers]]
id = "colossal"
name = "Colossal"
[modifiers.stat_percent]
endur = 10
spd = -5
"#;

        let modifiers = parse_modifiers(toml).unwrap();
        assert_eq!(modifiers.len(), 2);
        assert_eq!(modifiers["swift"].stat_percent.spd, 10);
        assert_eq!(modifiers["colossal"].stat_percent.spd, -5);
    }

    #[test]
    fn test_bundled_modifiers_count() {
        let modifiers = parse_modifiers(include_str!("../../config/modifiers.toml")).unwrap();
        assert_eq!(modifiers.len(), 15);
    }
}
