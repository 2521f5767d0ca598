mod abilities;
mod ally;
mod enemy;
mod hud;
mod overlap;
mod player;
mod session;

use arena_engine::{EntityId, EntityIdAllocator};

use crate::app::tuning::ArenaTuning;

pub use abilities::{ArenaAbility, Frost, Lightning, Projectile, Slime, Stink, Volley, FROST_TRACKER};
pub use ally::Ally;
pub use enemy::{Enemy, Horde};
pub use hud::{LoggedAllyBadge, LoggedCountdown};
pub use overlap::{ConeRegion, OverlapEvents, OverlapFeed};
pub use player::{DamageOutcome, Player};
pub use session::{ArenaSession, PursuitTarget, SessionSummary};

/// Everything abilities act on: the player and the enemy horde.
#[derive(Debug)]
pub struct ArenaWorld {
    pub player: Player,
    pub horde: Horde,
    ids: EntityIdAllocator,
}

impl ArenaWorld {
    pub fn new(tuning: &ArenaTuning, now: f64) -> Self {
        let mut ids = EntityIdAllocator::default();
        let player = Player::new(ids.allocate(), &tuning.player);
        let horde = Horde::new(
            &tuning.enemies.spawn_points,
            tuning.enemies.max_per_spawner,
            tuning.enemies.spawn_interval_seconds,
            &mut ids,
            now,
        );
        Self { player, horde, ids }
    }

    pub fn allocate_id(&mut self) -> EntityId {
        self.ids.allocate()
    }
}

#[cfg(test)]
mod tests;
