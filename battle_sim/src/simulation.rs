//! Duel simulation utilities

use monster_core::{
    tick, EffectivenessTier, EntityId, GameData, Placement, Position, SimError, SimEvent, SimulationState,
    SpawnParams, Team,
};
use rand::Rng;
use serde::Serialize;

/// One side of a duel
#[derive(Debug, Clone)]
pub struct Combatant {
    pub species: String,
    pub level: u32,
    pub modifiers: Vec<String>,
}

impl Combatant {
    pub fn new(species: impl Into<String>, level: u32) -> Self {
        Combatant {
            species: species.into(),
            level,
            modifiers: Vec::new(),
        }
    }

    fn params(&self, team: Team, placement: Placement, position: Position) -> SpawnParams {
        let mut params = SpawnParams::new(self.species.clone(), self.level, team, placement).at(position);
        params.rare_modifiers = self.modifiers.clone();
        params
    }
}

/// Run a party monster against a wild one through the full tick loop
#[derive(Debug, Clone, Default, Serialize)]
pub struct DuelSimulation {
    pub total_damage: u64,
    pub total_time: f64,
    pub hit_count: u32,
    pub miss_count: u32,
    pub super_effective_count: u32,
    /// Seconds until the wild monster fell
    pub kill_time: Option<f64>,
    /// Seconds until the party monster fell
    pub death_time: Option<f64>,
}

impl DuelSimulation {
    /// Simulate until one side falls or `duration` runs out
    pub fn run(
        data: &GameData,
        hero: &Combatant,
        foe: &Combatant,
        duration: f64,
        rng: &mut impl Rng,
    ) -> Result<Self, SimError> {
        let mut state = SimulationState::new();
        let hero_id = state.add_monster(data, hero.params(Team::Player, Placement::Party, Position::ZERO), rng)?;
        let foe_id = state.add_monster(
            data,
            foe.params(Team::Wild, Placement::Wild, Position::new(40.0, 0.0)),
            rng,
        )?;

        let mut result = DuelSimulation::default();
        let dt = data.constants.tick.max_delta;
        let mut events: Vec<SimEvent> = Vec::new();

        while result.total_time < duration && result.kill_time.is_none() && result.death_time.is_none() {
            tick(&mut state, data, dt, rng, &mut events)?;
            result.total_time += dt;

            for event in events.drain(..) {
                result.record(&event, hero_id, foe_id);
            }
        }

        Ok(result)
    }

    fn record(&mut self, event: &SimEvent, hero_id: EntityId, foe_id: EntityId) {
        match event {
            SimEvent::DamageDealt {
                attacker_id,
                amount,
                effectiveness,
                ..
            } if *attacker_id == hero_id => {
                self.hit_count += 1;
                self.total_damage += u64::from(*amount);
                if *effectiveness == EffectivenessTier::Super {
                    self.super_effective_count += 1;
                }
            }
            SimEvent::Miss { attacker_id } if *attacker_id == hero_id => self.miss_count += 1,
            SimEvent::Defeated { entity_id } if *entity_id == foe_id => {
                self.kill_time.get_or_insert(self.total_time);
            }
            SimEvent::Defeated { entity_id } if *entity_id == hero_id => {
                self.death_time.get_or_insert(self.total_time);
            }
            _ => {}
        }
    }

    /// Calculate DPS
    pub fn dps(&self) -> f64 {
        if self.total_time > 0.0 {
            self.total_damage as f64 / self.total_time
        } else {
            0.0
        }
    }

    /// Hits that landed as a percentage of attempts
    pub fn hit_rate(&self) -> f64 {
        let attempts = self.hit_count + self.miss_count;
        if attempts > 0 {
            self.hit_count as f64 / attempts as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Calculate average damage per hit
    pub fn avg_damage(&self) -> f64 {
        if self.hit_count > 0 {
            self.total_damage as f64 / self.hit_count as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_duel_simulation() {
        let data = GameData::builtin().unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);

        let result = DuelSimulation::run(
            &data,
            &Combatant::new("emberpup", 20),
            &Combatant::new("sproutling", 3),
            60.0,
            &mut rng,
        )
        .unwrap();

        assert!(result.hit_count > 0);
        assert!(result.total_damage > 0);
        assert!(result.dps() > 0.0);
        assert!(result.kill_time.is_some());
        assert!(result.death_time.is_none());
        // fire into grass
        assert_eq!(result.super_effective_count, result.hit_count);
    }

    #[test]
    fn test_empty_rates() {
        let result = DuelSimulation::default();
        assert!(result.dps().abs() < f64::EPSILON);
        assert!(result.hit_rate().abs() < f64::EPSILON);
        assert!(result.avg_damage().abs() < f64::EPSILON);
    }
}
