//! AttackOutcome - what a single attack attempt did

use crate::types::{EffectivenessTier, EntityId};
use serde::{Deserialize, Serialize};

/// Result of [`resolve_attack`](super::resolve_attack)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttackOutcome {
    /// Attacker is defeated, inactive or still on cooldown
    NotReady,
    /// Nothing hostile in range; cooldown untouched
    NoTarget,
    /// The target evaded; cooldown consumed
    Missed { target: EntityId },
    Hit(HitReport),
    /// Reflected damage took the attacker down before the hit landed
    AttackerFell { target: EntityId },
}

impl AttackOutcome {
    /// Whether the attack went off (cooldown consumed)
    pub fn consumed_cooldown(&self) -> bool {
        !matches!(self, AttackOutcome::NotReady | AttackOutcome::NoTarget)
    }

    pub fn hit(&self) -> Option<&HitReport> {
        match self {
            AttackOutcome::Hit(report) => Some(report),
            _ => None,
        }
    }
}

/// A landed hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitReport {
    pub target: EntityId,
    pub amount: u32,
    pub tier: EffectivenessTier,

    // === Costs ===
    pub stamina_spent: f64,
    /// HP paid in place of missing stamina
    pub hp_spent: f64,
    /// Damage was reduced for lack of stamina
    pub exhausted: bool,

    // === Ability effects ===
    pub reflected: f64,
    pub healed: f64,
    pub stamina_drained: f64,
    pub last_stand: bool,

    /// Target fell to this hit
    pub defeated_target: bool,
}

impl HitReport {
    /// Short text for logs and the headless driver
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} damage ({:?})", self.amount, self.tier)];
        if self.exhausted {
            parts.push("exhausted".to_string());
        }
        if self.reflected > 0.0 {
            parts.push(format!("{:.0} reflected", self.reflected));
        }
        if self.healed > 0.0 {
            parts.push(format!("{:.0} leeched", self.healed));
        }
        if self.last_stand {
            parts.push("LAST STAND".to_string());
        }
        if self.defeated_target {
            parts.push("FATAL".to_string());
        }
        parts.join(", ")
    }
}
