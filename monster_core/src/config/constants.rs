//! Game constants configuration

use serde::{Deserialize, Serialize};

/// Tunable game constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConstants {
    pub stats: StatConstants,
    pub combat: CombatConstants,
    pub aggro: AggroConstants,
    pub movement: MovementConstants,
    pub progression: ProgressionConstants,
    pub capture: CaptureConstants,
    pub regen: RegenConstants,
    pub tick: TickConstants,
    pub spawn: SpawnConstants,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatConstants {
    pub max_level: u32,
    /// Fractional stat growth per level before the gain multiplier
    pub growth_rate_per_level: f64,
    /// Divisor in `1 + 2 * min(level, spawn_level) / divisor`
    pub level_gain_divisor: f64,
    /// Flat bonus added to the favored stat
    pub favored_stat_bonus: i32,
    /// HP/stamina multiplier per 100 endurance
    pub resource_endurance_scaling: f64,
    /// Attack cooldown in seconds for species without an override
    pub base_cooldown: f64,
    /// Cooldown divisor is `1 + speed_scaling * spd`
    pub speed_scaling: f64,
}

impl Default for StatConstants {
    fn default() -> Self {
        StatConstants {
            max_level: 100,
            growth_rate_per_level: 0.03,
            level_gain_divisor: 130.0,
            favored_stat_bonus: 10,
            resource_endurance_scaling: 0.4,
            base_cooldown: 2.0,
            speed_scaling: 0.005,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConstants {
    pub attack_range: f64,
    pub physical_base: f64,
    pub special_base: f64,
    /// Cooldown that maps to a cooldown ratio of 1.0
    pub reference_cooldown: f64,
    /// Stamina spent per attack at a cooldown ratio of 1.0
    pub stamina_cost: f64,
    /// Damage multiplier when an attack is made without enough stamina
    pub stamina_shortfall_multiplier: f64,
    /// Target weight is `1 / distance^proximity_exponent`
    pub proximity_exponent: f64,
    pub super_effective: f64,
    pub not_very_effective: f64,
    pub super_threshold: f64,
    pub weak_threshold: f64,
    pub weaker_penalty_per_level: f64,
    pub weaker_penalty_floor: f64,
    /// Asymptotic bonus for a higher-level attacker
    pub stronger_bonus_max: f64,
    /// Level delta at which half of `stronger_bonus_max` is reached
    pub stronger_bonus_half_point: f64,
}

impl Default for CombatConstants {
    fn default() -> Self {
        CombatConstants {
            attack_range: 60.0,
            physical_base: 20.0,
            special_base: 20.0,
            reference_cooldown: 2.0,
            stamina_cost: 10.0,
            stamina_shortfall_multiplier: 0.5,
            proximity_exponent: 1.5,
            super_effective: 1.5,
            not_very_effective: 0.67,
            super_threshold: 1.1,
            weak_threshold: 0.9,
            weaker_penalty_per_level: 0.03,
            weaker_penalty_floor: 0.25,
            stronger_bonus_max: 0.75,
            stronger_bonus_half_point: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggroConstants {
    /// Pairs closer than this are pushed apart
    pub collision_distance: f64,
    pub player_range: f64,
    pub wild_range: f64,
    pub boss_range: f64,
    /// Wild monsters never chase targets further than this from their origin
    pub max_wander_distance: f64,
    /// Whether wild and boss monsters fight each other
    pub wild_vs_boss_hostile: bool,
}

impl Default for AggroConstants {
    fn default() -> Self {
        AggroConstants {
            collision_distance: 24.0,
            player_range: 150.0,
            wild_range: 220.0,
            boss_range: 220.0,
            max_wander_distance: 320.0,
            wild_vs_boss_hostile: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConstants {
    /// Units per second
    pub move_speed: f64,
    /// Returning wild monsters stop within this radius of their origin
    pub home_radius: f64,
    /// Idle party monsters follow the player beyond this distance
    pub follow_distance: f64,
    /// A chasing wild monster this close catches the player
    pub catch_distance: f64,
    /// Where a caught player is sent
    pub town_position: [f64; 2],
}

impl Default for MovementConstants {
    fn default() -> Self {
        MovementConstants {
            move_speed: 80.0,
            home_radius: 10.0,
            follow_distance: 90.0,
            catch_distance: 20.0,
            town_position: [0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConstants {
    /// Effective levels added per rare modifier
    pub modifier_level_weight: u32,
    pub exp_per_level: f64,
    pub exp_base: f64,
    /// Experience multiplier change per level of difference
    pub level_diff_step: f64,
    /// Fraction of levels lost by a defeated wild monster
    pub level_penalty_fraction: f64,
    pub gold_coefficient: f64,
    pub gold_exponent: f64,
    /// No gold when the party average exceeds the defeated level by more than this
    pub gold_level_margin: u32,
    pub revival_base: f64,
    pub revival_per_level: f64,
    pub max_party_size: usize,
    /// Boss fights need party level sum of at least `boss_total - margin`
    pub boss_level_margin: u32,
}

impl Default for ProgressionConstants {
    fn default() -> Self {
        ProgressionConstants {
            modifier_level_weight: 5,
            exp_per_level: 4.0,
            exp_base: 20.0,
            level_diff_step: 0.05,
            level_penalty_fraction: 0.25,
            gold_coefficient: 3.0,
            gold_exponent: 0.8,
            gold_level_margin: 10,
            revival_base: 5.0,
            revival_per_level: 0.5,
            max_party_size: 4,
            boss_level_margin: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConstants {
    /// Seconds a defeated wild monster stays capturable
    pub window: f64,
    pub cost_base: u64,
    pub cost_per_level: u64,
    /// Fraction of the cost returned on a failed attempt
    pub refund_fraction: f64,
}

impl Default for CaptureConstants {
    fn default() -> Self {
        CaptureConstants {
            window: 15.0,
            cost_base: 10,
            cost_per_level: 2,
            refund_fraction: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegenConstants {
    /// Fraction of max stamina per second
    pub stamina_rate: f64,
    /// Fraction of max HP per second once out of combat
    pub hp_rate: f64,
    /// Seconds without taking damage before HP regenerates
    pub hp_delay: f64,
}

impl Default for RegenConstants {
    fn default() -> Self {
        RegenConstants {
            stamina_rate: 0.10,
            hp_rate: 0.02,
            hp_delay: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConstants {
    /// Upper bound on one tick's delta time
    pub max_delta: f64,
}

impl Default for TickConstants {
    fn default() -> Self {
        TickConstants { max_delta: 0.1 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConstants {
    /// Independent chance per rare modifier on a wild spawn
    pub modifier_chance: f64,
    pub max_modifiers: usize,
    pub inherit_ability_chance: f64,
    pub respawn_delay: f64,
}

impl Default for SpawnConstants {
    fn default() -> Self {
        SpawnConstants {
            modifier_chance: 0.02,
            max_modifiers: 15,
            inherit_ability_chance: 0.05,
            respawn_delay: 30.0,
        }
    }
}
