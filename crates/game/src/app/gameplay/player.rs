use arena_engine::{movement_delta, EntityId, Vec2};
use tracing::info;

use crate::app::tuning::PlayerTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Already defeated; damage is no longer processed.
    Ignored,
    Absorbed,
    Damaged,
    Defeated,
}

#[derive(Debug, Clone)]
pub struct Player {
    id: EntityId,
    position: Vec2,
    facing: Vec2,
    health: i32,
    max_health: i32,
    speed: f32,
    invulnerable: bool,
    can_move: bool,
}

impl Player {
    pub fn new(id: EntityId, tuning: &PlayerTuning) -> Self {
        Self {
            id,
            position: tuning.spawn,
            facing: Vec2::new(1.0, 0.0),
            health: tuning.max_health,
            max_health: tuning.max_health,
            speed: tuning.speed,
            invulnerable: tuning.invulnerable,
            can_move: true,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Unit aim direction; the last non-zero movement or explicit facing.
    pub fn facing(&self) -> Vec2 {
        self.facing
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn can_move(&self) -> bool {
        self.can_move
    }

    pub fn face(&mut self, direction: Vec2) {
        let unit = direction.normalized_or_zero();
        if unit != Vec2::ZERO {
            self.facing = unit;
        }
    }

    pub fn step(&mut self, direction: Vec2, fixed_dt_seconds: f32) {
        if !self.can_move {
            return;
        }
        let delta = movement_delta(direction, self.speed, fixed_dt_seconds);
        self.position.x += delta.x;
        self.position.y += delta.y;
        self.face(direction);
    }

    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome::Ignored;
        }
        if self.invulnerable {
            return DamageOutcome::Absorbed;
        }
        self.health = self.health.saturating_sub(amount.max(0));
        if self.is_alive() {
            return DamageOutcome::Damaged;
        }
        self.can_move = false;
        info!(player = self.id.0, "player_defeated");
        DamageOutcome::Defeated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(EntityId(0), &PlayerTuning::default())
    }

    #[test]
    fn diagonal_movement_is_normalized() {
        let mut player = player();
        player.step(Vec2::new(1.0, 1.0), 1.0);
        let distance = player.position().distance_sq(Vec2::ZERO).sqrt();
        assert!((distance - 6.0).abs() < 1e-4);
    }

    #[test]
    fn lethal_damage_defeats_once_and_freezes_movement() {
        let mut player = player();
        assert_eq!(player.take_damage(60), DamageOutcome::Damaged);
        assert_eq!(player.take_damage(60), DamageOutcome::Defeated);
        assert_eq!(player.take_damage(10), DamageOutcome::Ignored);

        player.step(Vec2::new(1.0, 0.0), 1.0);
        assert_eq!(player.position(), Vec2::ZERO);
    }

    #[test]
    fn invulnerable_player_absorbs_damage() {
        let mut player = Player::new(
            EntityId(0),
            &PlayerTuning {
                invulnerable: true,
                ..PlayerTuning::default()
            },
        );
        assert_eq!(player.take_damage(1000), DamageOutcome::Absorbed);
        assert_eq!(player.health(), 100);
    }

    #[test]
    fn facing_ignores_zero_direction() {
        let mut player = player();
        player.face(Vec2::new(0.0, -3.0));
        player.face(Vec2::ZERO);
        assert_eq!(player.facing(), Vec2::new(0.0, -1.0));
    }
}
