//! Pool-backed spawn schedulers: a periodic spawner and a threshold-gated
//! singleton summoner.

use tracing::{debug, info};

use crate::app::{Deadline, Transform, Vec2};

use super::pool::{Pool, PoolSlot, Poolable};

/// A pooled entity that can be dropped into the world at a spawn point.
pub trait Spawnable: Poolable {
    fn place(&mut self, at: Transform);
}

/// A spawnable entity that is handed a pursuit target on arrival.
pub trait Summonable: Spawnable {
    fn pursue(&mut self, target: Option<Vec2>);
}

/// Optional UI collaborator showing whether a summon is available.
pub trait SummonIndicator {
    fn set_available(&mut self, available: bool);
}

/// Spawns one entity from its pool every `interval_seconds`, starting one
/// interval after construction. A full pool skips that attempt.
#[derive(Debug)]
pub struct PeriodicSpawner<T> {
    pool: Pool<T>,
    interval_seconds: f32,
    next_attempt: Deadline,
    spawn_point: Transform,
    enabled: bool,
}

impl<T: Spawnable> PeriodicSpawner<T> {
    pub fn new(pool: Pool<T>, interval_seconds: f32, spawn_point: Transform, now: f64) -> Self {
        Self {
            pool,
            interval_seconds,
            next_attempt: Deadline::after(now, interval_seconds),
            spawn_point,
            enabled: true,
        }
    }

    pub fn pool(&self) -> &Pool<T> {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut Pool<T> {
        &mut self.pool
    }

    pub fn spawn_point(&self) -> Transform {
        self.spawn_point
    }

    pub fn next_attempt(&self) -> Deadline {
        self.next_attempt
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Runs at most one spawn attempt per call and returns the slot spawned.
    pub fn tick(&mut self, now: f64) -> Option<PoolSlot> {
        if !self.enabled || !self.next_attempt.is_reached(now) {
            return None;
        }
        self.next_attempt = Deadline::after(now, self.interval_seconds);

        let Some((slot, entity)) = self.pool.acquire_and_activate() else {
            debug!(capacity = self.pool.capacity(), "spawn_skipped_pool_full");
            return None;
        };
        entity.place(self.spawn_point);
        debug!(
            slot = slot.index(),
            x = self.spawn_point.position.x,
            y = self.spawn_point.position.y,
            "entity_spawned"
        );
        Some(slot)
    }
}

/// Singleton summon gated by an accumulated point budget.
///
/// Points keep accumulating while the singleton is out. Unsummoning resets
/// them to zero no matter how much surplus was banked.
pub struct ThresholdSummoner<T> {
    pool: Pool<T>,
    points: u32,
    cost: u32,
    duration_seconds: f32,
    expires: Option<Deadline>,
    spawn_point: Transform,
    indicator: Option<Box<dyn SummonIndicator>>,
    indicator_shown: bool,
}

impl<T: Summonable> ThresholdSummoner<T> {
    pub fn new(entity: T, cost: u32, duration_seconds: f32, spawn_point: Transform) -> Self {
        Self {
            pool: Pool::single(entity),
            points: 0,
            cost,
            duration_seconds,
            expires: None,
            spawn_point,
            indicator: None,
            indicator_shown: false,
        }
    }

    pub fn with_indicator(mut self, indicator: Box<dyn SummonIndicator>) -> Self {
        self.indicator = Some(indicator);
        self.indicator_shown = false;
        self.refresh_indicator();
        self
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn expires(&self) -> Option<Deadline> {
        self.expires
    }

    pub fn is_summoned(&self) -> bool {
        self.pool.active_count() > 0
    }

    pub fn singleton(&self) -> Option<&T> {
        self.pool.get(PoolSlot::from_index(0))
    }

    pub fn singleton_mut(&mut self) -> Option<&mut T> {
        self.pool.get_mut(PoolSlot::from_index(0))
    }

    pub fn add_points(&mut self, points: u32) {
        self.points = self.points.saturating_add(points);
        self.refresh_indicator();
    }

    pub fn can_summon(&self) -> bool {
        self.points >= self.cost && !self.is_summoned()
    }

    /// Activates the singleton at the spawn point and points it at `target`.
    /// Returns `None` when no summon is available.
    pub fn summon(&mut self, now: f64, target: Option<Vec2>) -> Option<&T> {
        if !self.can_summon() {
            debug!(points = self.points, cost = self.cost, "summon_refused");
            return None;
        }
        let (_, entity) = self.pool.acquire_and_activate()?;
        entity.place(self.spawn_point);
        entity.pursue(target);
        self.expires = Some(Deadline::after(now, self.duration_seconds));
        info!(
            points = self.points,
            duration_seconds = self.duration_seconds,
            "ally_summoned"
        );
        self.refresh_indicator();
        self.singleton()
    }

    /// Deactivates the singleton and zeroes the point budget.
    pub fn unsummon(&mut self) {
        let was_summoned = self.pool.release(PoolSlot::from_index(0));
        let forfeited = std::mem::take(&mut self.points);
        self.expires = None;
        if was_summoned {
            info!(forfeited, "ally_unsummoned");
        }
        self.refresh_indicator();
    }

    /// Unsummons once the summon duration runs out. Returns `true` on the
    /// tick that happens.
    pub fn tick(&mut self, now: f64) -> bool {
        match self.expires {
            Some(deadline) if deadline.is_reached(now) => {
                self.unsummon();
                true
            }
            _ => false,
        }
    }

    fn refresh_indicator(&mut self) {
        let available = self.can_summon();
        if available == self.indicator_shown {
            return;
        }
        if let Some(indicator) = self.indicator.as_mut() {
            indicator.set_available(available);
            self.indicator_shown = available;
        }
    }
}
