//! Save format - the player's roster, gold and settings as JSON
//!
//! Only persistent fields are written. Derived stats, HP, stamina and
//! positions are rebuilt through the monster factory on load.

use crate::abilities::Ability;
use crate::config::GameData;
use crate::entity::{Experience, SpawnParams};
use crate::error::SimError;
use crate::types::{AbilityId, Element, Placement, Team};
use crate::world::SimulationState;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One owned monster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterRecord {
    pub type_id: String,
    pub level: u32,
    pub experience: Experience,
    pub favored_stat: u8,
    pub element: Element,
    pub spawn_level: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rare_modifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherited_ability: Option<AbilityId>,
    /// Kept in storage rather than the active party
    #[serde(default)]
    pub stored: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    pub monsters: Vec<MonsterRecord>,
    pub gold: u64,
    pub area_level: u32,
    pub music_on: bool,
}

impl SaveFile {
    /// Snapshot every player-owned monster
    pub fn capture(state: &SimulationState) -> Self {
        let monsters = state
            .monsters
            .iter()
            .filter(|m| m.team == Team::Player && matches!(m.placement, Placement::Party | Placement::Storage))
            .map(|m| MonsterRecord {
                type_id: m.type_id.clone(),
                level: m.level,
                experience: m.experience,
                favored_stat: m.favored_stat.index(),
                element: m.element,
                spawn_level: m.spawn_level,
                rare_modifiers: m.rare_modifiers.clone(),
                inherited_ability: match m.ability {
                    Ability::Inherited(id) => Some(id),
                    _ => None,
                },
                stored: m.placement == Placement::Storage,
            })
            .collect();

        SaveFile {
            monsters,
            gold: state.gold,
            area_level: state.area_level,
            music_on: state.music_on,
        }
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuild a simulation from this save
    ///
    /// Monsters are recreated through the factory, so derived stats always
    /// reflect the current data tables. Records beyond the party limit go to
    /// storage.
    pub fn restore(&self, data: &GameData, rng: &mut impl Rng) -> Result<SimulationState, SimError> {
        let max_level = data.constants.stats.max_level;
        let max_party = data.constants.progression.max_party_size;
        let mut state = SimulationState::new();
        state.gold = self.gold;
        state.area_level = self.area_level.max(1);
        state.music_on = self.music_on;

        for record in &self.monsters {
            // Step 1: reject what the factory would silently clamp
            if record.level == 0 || record.level > max_level {
                return Err(SimError::InvalidLevel(record.level));
            }

            // Step 2: rebuild through the factory
            let placement = if record.stored || state.party_len() >= max_party {
                Placement::Storage
            } else {
                Placement::Party
            };
            let mut params = SpawnParams::new(record.type_id.clone(), record.level, Team::Player, placement)
                .at(state.player_position)
                .with_element(record.element)
                .with_favored_stat(record.favored_stat)
                .with_spawn_level(record.spawn_level);
            params.rare_modifiers = record.rare_modifiers.clone();
            params.inherited_ability = record.inherited_ability;
            let id = state.add_monster(data, params, rng)?;

            // Step 3: progress toward the next level
            let monster = state.require_mut(id)?;
            monster.experience = record.experience;
        }

        info!(monsters = self.monsters.len(), gold = self.gold, "save restored");
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatKind;
    use crate::world::WorldQuery;
    use rand::SeedableRng;

    fn sample_state(data: &GameData) -> SimulationState {
        let mut rng = rand::rngs::StdRng::seed_from_u64(41);
        let mut state = SimulationState::new();
        state.gold = 275;
        state.area_level = 4;
        state.music_on = false;
        let id = state
            .add_monster(
                data,
                SpawnParams::new("emberpup", 12, Team::Player, Placement::Party)
                    .with_favored_stat(StatKind::PAtk.index())
                    .with_spawn_level(9)
                    .with_element(Element::Ice)
                    .with_modifiers(&["swift"]),
                &mut rng,
            )
            .unwrap();
        state.get_mut(id).unwrap().experience.current = 77;
        state
            .add_monster(data, SpawnParams::new("derpfish", 3, Team::Player, Placement::Storage), &mut rng)
            .unwrap();
        state
            .add_monster(data, SpawnParams::new("zapmoth", 3, Team::Wild, Placement::Wild), &mut rng)
            .unwrap();
        state
    }

    #[test]
    fn test_capture_skips_wild() {
        let data = GameData::builtin().unwrap();
        let save = SaveFile::capture(&sample_state(&data));
        assert_eq!(save.monsters.len(), 2);
        assert_eq!(save.gold, 275);
        assert_eq!(save.area_level, 4);
        assert!(!save.music_on);
        assert!(save.monsters[1].stored);
    }

    #[test]
    fn test_round_trip_recomputes_stats() {
        let data = GameData::builtin().unwrap();
        let original = sample_state(&data);
        let json = SaveFile::capture(&original).to_json().unwrap();

        let mut rng = rand::rngs::StdRng::seed_from_u64(99);
        let restored = SaveFile::from_json(&json).unwrap().restore(&data, &mut rng).unwrap();
        assert_eq!(restored.gold, 275);
        assert_eq!(restored.party().count(), 1);
        assert_eq!(restored.stored().count(), 1);

        let before = original.party().next().unwrap();
        let after = restored.party().next().unwrap();
        assert_eq!(after.type_id, "emberpup");
        assert_eq!(after.level, 12);
        assert_eq!(after.element, Element::Ice);
        assert_eq!(after.favored_stat, StatKind::PAtk);
        assert_eq!(after.spawn_level, 9);
        assert_eq!(after.experience.current, 77);
        assert_eq!(after.stats, before.stats);
        assert!((after.max_hp - before.max_hp).abs() < f64::EPSILON);
        assert!((after.hp_fraction() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_level_rejected() {
        let data = GameData::builtin().unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(41);
        let mut save = SaveFile::capture(&sample_state(&data));
        save.monsters[0].level = 0;
        assert!(matches!(save.restore(&data, &mut rng), Err(SimError::InvalidLevel(0))));
        save.monsters[0].level = data.constants.stats.max_level + 1;
        assert!(matches!(save.restore(&data, &mut rng), Err(SimError::InvalidLevel(_))));
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{
            "monsters": [{
                "type_id": "derpfish",
                "level": 5,
                "experience": { "current": 10, "to_next_level": 218 },
                "favored_stat": 2,
                "element": "water",
                "spawn_level": 5
            }],
            "gold": 40,
            "area_level": 2,
            "music_on": true
        }"#;
        let save = SaveFile::from_json(json).unwrap();
        assert!(save.monsters[0].rare_modifiers.is_empty());
        assert!(!save.monsters[0].stored);

        let data = GameData::builtin().unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(41);
        let state = save.restore(&data, &mut rng).unwrap();
        assert_eq!(state.party().count(), 1);
    }

    #[test]
    fn test_garbage_is_a_save_error() {
        assert!(matches!(SaveFile::from_json("{ not json"), Err(SimError::Save(_))));
    }
}
