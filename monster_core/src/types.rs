//! Core types shared by every simulation subsystem

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical world position (2D, no depth)
pub type Position = glam::DVec2;

/// Runtime identity of a simulated entity
///
/// Ids are allocated by the simulation state and never reused within a run.
/// They are not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fixed numeric ability id
pub type AbilityId = u32;

/// Team alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    /// Player-aligned (party, storage, dormant bosses)
    Player = 0,
    /// Wild monsters roaming the area
    Wild = 1,
    /// Boss monsters once their fight has started
    Boss = 2,
}

impl Team {
    /// Whether `self` may target `other`
    ///
    /// Player fights Wild and Boss. Wild and Boss only fight each other when
    /// `wild_vs_boss` is set. Same-team pairs are never hostile.
    pub fn is_hostile_to(self, other: Team, wild_vs_boss: bool) -> bool {
        match (self, other) {
            (Team::Player, Team::Wild) | (Team::Wild, Team::Player) => true,
            (Team::Player, Team::Boss) | (Team::Boss, Team::Player) => true,
            (Team::Wild, Team::Boss) | (Team::Boss, Team::Wild) => wild_vs_boss,
            _ => false,
        }
    }
}

/// Which collection an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Active player roster
    Party,
    /// Player-owned but inactive; never simulated
    Storage,
    /// Wild monster in the current area
    Wild,
    /// Monster belonging to a boss master
    Boss,
}

/// Elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Fire,
    Water,
    Grass,
    Electric,
    Earth,
    Ice,
    Dark,
    Light,
}

impl Element {
    /// Get all elements
    pub fn all() -> &'static [Element] {
        &[
            Element::Fire,
            Element::Water,
            Element::Grass,
            Element::Electric,
            Element::Earth,
            Element::Ice,
            Element::Dark,
            Element::Light,
        ]
    }
}

/// The six monster stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Spd,
    PDef,
    SDef,
    PAtk,
    SAtk,
    Endur,
}

impl StatKind {
    /// Get all stats in favored-stat index order
    pub fn all() -> &'static [StatKind] {
        &[
            StatKind::Spd,
            StatKind::PDef,
            StatKind::SDef,
            StatKind::PAtk,
            StatKind::SAtk,
            StatKind::Endur,
        ]
    }

    /// Stat for a 1-based favored-stat index (1..=6)
    pub fn from_index(index: u8) -> Option<StatKind> {
        match index {
            1..=6 => Some(Self::all()[(index - 1) as usize]),
            _ => None,
        }
    }

    /// 1-based favored-stat index
    pub fn index(self) -> u8 {
        match self {
            StatKind::Spd => 1,
            StatKind::PDef => 2,
            StatKind::SDef => 3,
            StatKind::PAtk => 4,
            StatKind::SAtk => 5,
            StatKind::Endur => 6,
        }
    }
}

/// One integer value per stat
///
/// Used for base stats, final stats, flat deltas and percentage-point deltas.
/// Missing fields deserialize to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct StatLine {
    pub spd: i32,
    pub p_def: i32,
    pub s_def: i32,
    pub p_atk: i32,
    pub s_atk: i32,
    pub endur: i32,
}

impl StatLine {
    pub fn new(spd: i32, p_def: i32, s_def: i32, p_atk: i32, s_atk: i32, endur: i32) -> Self {
        StatLine {
            spd,
            p_def,
            s_def,
            p_atk,
            s_atk,
            endur,
        }
    }

    pub fn get(&self, stat: StatKind) -> i32 {
        match stat {
            StatKind::Spd => self.spd,
            StatKind::PDef => self.p_def,
            StatKind::SDef => self.s_def,
            StatKind::PAtk => self.p_atk,
            StatKind::SAtk => self.s_atk,
            StatKind::Endur => self.endur,
        }
    }

    pub fn get_mut(&mut self, stat: StatKind) -> &mut i32 {
        match stat {
            StatKind::Spd => &mut self.spd,
            StatKind::PDef => &mut self.p_def,
            StatKind::SDef => &mut self.s_def,
            StatKind::PAtk => &mut self.p_atk,
            StatKind::SAtk => &mut self.s_atk,
            StatKind::Endur => &mut self.endur,
        }
    }

    /// Add another line field by field
    pub fn add(&mut self, other: &StatLine) {
        for &stat in StatKind::all() {
            *self.get_mut(stat) += other.get(stat);
        }
    }

    /// Apply `f` to every stat
    pub fn map(&self, mut f: impl FnMut(StatKind, i32) -> i32) -> StatLine {
        let mut out = *self;
        for &stat in StatKind::all() {
            *out.get_mut(stat) = f(stat, self.get(stat));
        }
        out
    }

    /// Sum of all six stats
    pub fn total(&self) -> i32 {
        StatKind::all().iter().map(|&s| self.get(s)).sum()
    }
}

/// How effective a hit was, by elemental multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectivenessTier {
    Super,
    Normal,
    Weak,
}

impl EffectivenessTier {
    /// Classify a multiplier against the super/weak thresholds
    pub fn classify(multiplier: f64, super_threshold: f64, weak_threshold: f64) -> Self {
        if multiplier > super_threshold {
            EffectivenessTier::Super
        } else if multiplier < weak_threshold {
            EffectivenessTier::Weak
        } else {
            EffectivenessTier::Normal
        }
    }
}
