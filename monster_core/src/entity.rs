//! Monster - the logical entity record owned by the simulation
//!
//! Presentation layers reference monsters by [`EntityId`] only and learn about
//! changes through the event sink.

use crate::abilities::Ability;
use crate::config::GameData;
use crate::error::SimError;
use crate::stats::{ComputedStats, StatCalculator, StatInput};
use crate::types::{AbilityId, Element, EntityId, Placement, Position, StatKind, StatLine, Team};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Experience toward the next level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub current: u64,
    pub to_next_level: u64,
}

/// Experience needed to advance from `level`
pub fn experience_to_next(level: u32) -> u64 {
    (50.0 + 15.0 * (level as f64).powf(1.5)).round() as u64
}

/// Parameters for the monster factory
#[derive(Debug, Clone)]
pub struct SpawnParams {
    pub type_id: String,
    pub level: u32,
    pub rare_modifiers: Vec<String>,
    pub team: Team,
    pub placement: Placement,
    /// Defaults to `level`
    pub spawn_level: Option<u32>,
    /// Defaults to the species element
    pub element: Option<Element>,
    /// 1..=6; rolled uniformly when absent
    pub favored_stat: Option<u8>,
    pub master_id: Option<EntityId>,
    pub inherited_ability: Option<AbilityId>,
    pub position: Position,
}

impl SpawnParams {
    /// Minimal parameters; everything optional left at its default
    pub fn new(type_id: impl Into<String>, level: u32, team: Team, placement: Placement) -> Self {
        SpawnParams {
            type_id: type_id.into(),
            level,
            rare_modifiers: Vec::new(),
            team,
            placement,
            spawn_level: None,
            element: None,
            favored_stat: None,
            master_id: None,
            inherited_ability: None,
            position: Position::ZERO,
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_modifiers(mut self, modifiers: &[&str]) -> Self {
        self.rare_modifiers = modifiers.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_favored_stat(mut self, index: u8) -> Self {
        self.favored_stat = Some(index);
        self
    }

    pub fn with_spawn_level(mut self, spawn_level: u32) -> Self {
        self.spawn_level = Some(spawn_level);
        self
    }

    pub fn with_ability(mut self, ability: AbilityId) -> Self {
        self.inherited_ability = Some(ability);
        self
    }

    pub fn with_master(mut self, master_id: EntityId) -> Self {
        self.master_id = Some(master_id);
        self
    }
}

/// A simulated monster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    // === Identity ===
    pub id: EntityId,
    pub type_id: String,
    pub level: u32,
    /// Active element; differs from the species element when typeshifted
    pub element: Element,
    pub team: Team,
    pub placement: Placement,
    pub master_id: Option<EntityId>,

    // === Stats ===
    pub stats: StatLine,
    pub favored_stat: StatKind,
    pub spawn_level: u32,
    /// Ordered, no duplicates
    pub rare_modifiers: Vec<String>,
    pub ability: Ability,
    pub size_multiplier: f64,

    // === Resources ===
    pub max_hp: f64,
    pub current_hp: f64,
    pub max_stamina: f64,
    pub current_stamina: f64,
    pub attack_cooldown: f64,
    pub current_cooldown: f64,
    pub experience: Experience,

    // === World ===
    pub position: Position,
    pub spawn_origin: Position,
    pub spawn_point: Option<usize>,

    // === Combat state ===
    pub defeated: bool,
    pub time_since_damage_taken: f64,
    pub time_since_damage_dealt: f64,
    /// Weak reference; cleared whenever the target leaves the world
    pub aggro_target: Option<EntityId>,
    /// Walking back to the spawn origin
    pub returning: bool,
    /// Chasing the player avatar directly
    pub chasing_player: bool,
    /// Seconds until a defeated player monster revives
    pub revival_timer: Option<f64>,
}

impl Monster {
    /// Monster factory: builds the entity and computes every derived stat once
    pub fn spawn(
        data: &GameData,
        params: SpawnParams,
        id: EntityId,
        rng: &mut impl Rng,
    ) -> Result<Self, SimError> {
        let species = data.species(&params.type_id)?;
        let level = params.level.clamp(1, data.constants.stats.max_level);
        let favored_stat = match params.favored_stat {
            Some(index) => StatKind::from_index(index).ok_or(SimError::InvalidFavoredStat(index))?,
            None => StatKind::all()[rng.gen_range(0..StatKind::all().len())],
        };
        if let Some(ability) = params.inherited_ability {
            data.ability(ability)?;
        }

        let mut rare_modifiers: Vec<String> = Vec::with_capacity(params.rare_modifiers.len());
        for modifier in params.rare_modifiers {
            data.modifier(&modifier)?;
            if !rare_modifiers.contains(&modifier) {
                rare_modifiers.push(modifier);
            }
        }

        let mut monster = Monster {
            id,
            type_id: params.type_id,
            level,
            element: params.element.unwrap_or(species.element),
            team: params.team,
            placement: params.placement,
            master_id: params.master_id,
            stats: StatLine::default(),
            favored_stat,
            spawn_level: params.spawn_level.unwrap_or(level),
            rare_modifiers,
            ability: Ability::resolve(species.innate_ability, params.inherited_ability),
            size_multiplier: 1.0,
            max_hp: 1.0,
            current_hp: 1.0,
            max_stamina: 1.0,
            current_stamina: 1.0,
            attack_cooldown: 1.0,
            current_cooldown: 0.0,
            experience: Experience {
                current: 0,
                to_next_level: experience_to_next(level),
            },
            position: params.position,
            spawn_origin: params.position,
            spawn_point: None,
            defeated: false,
            time_since_damage_taken: f64::INFINITY,
            time_since_damage_dealt: f64::INFINITY,
            aggro_target: None,
            returning: false,
            chasing_player: false,
            revival_timer: None,
        };

        let computed = monster.compute_stats(data)?;
        monster.apply_computed(&computed);
        monster.current_hp = monster.max_hp;
        monster.current_stamina = monster.max_stamina;
        Ok(monster)
    }

    /// Inputs for the stat calculator as this monster stands
    pub fn stat_input(&self) -> StatInput<'_> {
        StatInput {
            type_id: &self.type_id,
            level: self.level,
            element: self.element,
            rare_modifiers: &self.rare_modifiers,
            spawn_level: self.spawn_level,
            favored_stat: self.favored_stat,
            ability: self.ability,
        }
    }

    pub fn compute_stats(&self, data: &GameData) -> Result<ComputedStats, SimError> {
        StatCalculator::new(data).compute(&self.stat_input())
    }

    /// Re-run the stat pipeline, keeping HP and stamina at the same fraction
    pub fn recompute_stats(&mut self, data: &GameData) -> Result<(), SimError> {
        let hp_ratio = self.hp_fraction();
        let stamina_ratio = self.stamina_fraction();
        let computed = self.compute_stats(data)?;
        self.apply_computed(&computed);
        self.current_hp = (self.max_hp * hp_ratio).clamp(0.0, self.max_hp);
        self.current_stamina = (self.max_stamina * stamina_ratio).clamp(0.0, self.max_stamina);
        Ok(())
    }

    fn apply_computed(&mut self, computed: &ComputedStats) {
        self.stats = computed.stats;
        self.max_hp = computed.max_hp;
        self.max_stamina = computed.max_stamina;
        self.attack_cooldown = computed.attack_cooldown;
        self.size_multiplier = computed.size_multiplier;
        self.current_cooldown = self.current_cooldown.min(self.attack_cooldown);
    }

    /// Level plus weighted rare modifier count
    pub fn effective_level(&self, modifier_weight: u32) -> u32 {
        self.level + self.rare_modifiers.len() as u32 * modifier_weight
    }

    /// Spawn level plus weighted rare modifier count
    pub fn effective_spawn_level(&self, modifier_weight: u32) -> u32 {
        self.spawn_level + self.rare_modifiers.len() as u32 * modifier_weight
    }

    pub fn is_alive(&self) -> bool {
        !self.defeated && self.current_hp > 0.0
    }

    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp <= 0.0 {
            return 0.0;
        }
        (self.current_hp / self.max_hp).clamp(0.0, 1.0)
    }

    pub fn stamina_fraction(&self) -> f64 {
        if self.max_stamina <= 0.0 {
            return 0.0;
        }
        (self.current_stamina / self.max_stamina).clamp(0.0, 1.0)
    }

    /// Take damage, clamped at zero; marks the damage timer
    pub fn take_damage(&mut self, amount: f64) {
        self.current_hp = (self.current_hp - amount).max(0.0);
        self.time_since_damage_taken = 0.0;
    }

    pub fn heal(&mut self, amount: f64) {
        self.current_hp = (self.current_hp + amount).min(self.max_hp);
    }

    pub fn gain_stamina(&mut self, amount: f64) {
        self.current_stamina = (self.current_stamina + amount).clamp(0.0, self.max_stamina);
    }

    /// Full heal and stamina refill
    pub fn restore(&mut self) {
        self.current_hp = self.max_hp;
        self.current_stamina = self.max_stamina;
        self.current_cooldown = 0.0;
    }

    /// Drop every combat reference and movement intent
    pub fn clear_combat_state(&mut self) {
        self.aggro_target = None;
        self.returning = false;
        self.chasing_player = false;
    }

    /// Whether this monster takes part in aggro and combat this tick
    pub fn is_combat_active(&self) -> bool {
        if self.defeated {
            return false;
        }
        match self.placement {
            Placement::Party | Placement::Wild => true,
            Placement::Boss => self.team == Team::Boss,
            Placement::Storage => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::pipeline::has_ability;
    use rand::SeedableRng;

    fn make_test_rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_spawn_fills_resources() {
        let data = GameData::builtin().unwrap();
        let params = SpawnParams::new("derpfish", 5, Team::Wild, Placement::Wild).with_favored_stat(2);
        let monster = Monster::spawn(&data, params, EntityId(1), &mut make_test_rng()).unwrap();

        assert_eq!(monster.level, 5);
        assert_eq!(monster.spawn_level, 5);
        assert_eq!(monster.element, Element::Water);
        assert_eq!(monster.favored_stat, StatKind::PDef);
        assert!((monster.current_hp - monster.max_hp).abs() < f64::EPSILON);
        assert!((monster.current_stamina - monster.max_stamina).abs() < f64::EPSILON);
        assert_eq!(monster.experience.to_next_level, experience_to_next(5));
    }

    #[test]
    fn test_level_is_clamped() {
        let data = GameData::builtin().unwrap();
        let params = SpawnParams::new("derpfish", 500, Team::Wild, Placement::Wild);
        let monster = Monster::spawn(&data, params, EntityId(1), &mut make_test_rng()).unwrap();
        assert_eq!(monster.level, data.constants.stats.max_level);

        let params = SpawnParams::new("derpfish", 0, Team::Wild, Placement::Wild);
        let monster = Monster::spawn(&data, params, EntityId(2), &mut make_test_rng()).unwrap();
        assert_eq!(monster.level, 1);
    }

    #[test]
    fn test_duplicate_modifiers_dropped() {
        let data = GameData::builtin().unwrap();
        let params = SpawnParams::new("emberpup", 3, Team::Wild, Placement::Wild)
            .with_modifiers(&["swift", "hardy", "swift"]);
        let monster = Monster::spawn(&data, params, EntityId(1), &mut make_test_rng()).unwrap();
        assert_eq!(monster.rare_modifiers, vec!["swift".to_string(), "hardy".to_string()]);
    }

    #[test]
    fn test_unknown_inputs_fail() {
        let data = GameData::builtin().unwrap();
        let mut rng = make_test_rng();

        let params = SpawnParams::new("nobody", 3, Team::Wild, Placement::Wild);
        assert!(Monster::spawn(&data, params, EntityId(1), &mut rng).is_err());

        let params = SpawnParams::new("derpfish", 3, Team::Wild, Placement::Wild).with_ability(77);
        assert!(matches!(
            Monster::spawn(&data, params, EntityId(1), &mut rng),
            Err(SimError::UnknownAbility(77))
        ));

        let params = SpawnParams::new("derpfish", 3, Team::Wild, Placement::Wild).with_favored_stat(9);
        assert!(matches!(
            Monster::spawn(&data, params, EntityId(1), &mut rng),
            Err(SimError::InvalidFavoredStat(9))
        ));
    }

    #[test]
    fn test_inherited_ability_fills_empty_slot() {
        let data = GameData::builtin().unwrap();
        let params = SpawnParams::new("derpfish", 3, Team::Wild, Placement::Wild).with_ability(5);
        let monster = Monster::spawn(&data, params, EntityId(1), &mut make_test_rng()).unwrap();
        assert_eq!(monster.ability, Ability::Inherited(5));
        assert!(has_ability(&data, &monster, 5));

        let params = SpawnParams::new("sproutling", 3, Team::Wild, Placement::Wild);
        let monster = Monster::spawn(&data, params, EntityId(2), &mut make_test_rng()).unwrap();
        assert_eq!(monster.ability, Ability::Innate(8));
        assert!(has_ability(&data, &monster, 8));
        assert!(!has_ability(&data, &monster, 5));
    }

    #[test]
    fn test_species_ability_always_counts() {
        let data = GameData::builtin().unwrap();
        let params = SpawnParams::new("pebblord", 3, Team::Wild, Placement::Wild).with_ability(8);
        let monster = Monster::spawn(&data, params, EntityId(1), &mut make_test_rng()).unwrap();
        assert!(has_ability(&data, &monster, 1));
        assert!(has_ability(&data, &monster, 8));
        assert!(!has_ability(&data, &monster, 5));
    }

    #[test]
    fn test_recompute_preserves_ratios() {
        let data = GameData::builtin().unwrap();
        let params = SpawnParams::new("pebblord", 10, Team::Player, Placement::Party);
        let mut monster = Monster::spawn(&data, params, EntityId(1), &mut make_test_rng()).unwrap();
        monster.current_hp = monster.max_hp * 0.5;
        monster.current_stamina = monster.max_stamina * 0.25;

        monster.level = 30;
        monster.recompute_stats(&data).unwrap();

        assert!((monster.hp_fraction() - 0.5).abs() < 1e-9);
        assert!((monster.stamina_fraction() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_effective_level() {
        let data = GameData::builtin().unwrap();
        let params = SpawnParams::new("gloomcat", 12, Team::Wild, Placement::Wild)
            .with_modifiers(&["brutal", "feral"])
            .with_spawn_level(20);
        let monster = Monster::spawn(&data, params, EntityId(1), &mut make_test_rng()).unwrap();
        assert_eq!(monster.effective_level(5), 22);
        assert_eq!(monster.effective_spawn_level(5), 30);
    }
}
