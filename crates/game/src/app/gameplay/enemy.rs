use arena_engine::{
    step_toward, DebuffRef, DebuffTargets, EntityId, EntityIdAllocator, PeriodicSpawner, Pool,
    Poolable, Spawnable, Transform, Vec2,
};

const ENEMY_ARRIVAL_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct Enemy {
    id: EntityId,
    active: bool,
    position: Vec2,
    rotation_radians: f32,
    frost: Option<DebuffRef>,
}

impl Enemy {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            active: false,
            position: Vec2::ZERO,
            rotation_radians: 0.0,
            frost: None,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn rotation_radians(&self) -> f32 {
        self.rotation_radians
    }

    pub fn is_debuffed(&self) -> bool {
        self.frost.is_some()
    }

    pub fn pursue(&mut self, target: Vec2, speed: f32, fixed_dt_seconds: f32) {
        let (next, _) = step_toward(
            self.position,
            target,
            speed,
            fixed_dt_seconds,
            ENEMY_ARRIVAL_THRESHOLD,
        );
        self.position = next;
    }
}

impl Poolable for Enemy {
    fn is_active(&self) -> bool {
        self.active
    }

    fn activate(&mut self) {
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Spawnable for Enemy {
    fn place(&mut self, at: Transform) {
        self.position = at.position;
        if let Some(rotation) = at.rotation_radians {
            self.rotation_radians = rotation;
        }
    }
}

/// All enemy spawners. Each spawner owns its own pool; ids are unique across
/// the whole horde.
#[derive(Debug)]
pub struct Horde {
    spawners: Vec<PeriodicSpawner<Enemy>>,
}

impl Horde {
    pub fn new(
        spawn_points: &[Transform],
        per_spawner: usize,
        interval_seconds: f32,
        ids: &mut EntityIdAllocator,
        now: f64,
    ) -> Self {
        let spawners = spawn_points
            .iter()
            .map(|point| {
                let pool = Pool::new(per_spawner, |_| Enemy::new(ids.allocate()));
                PeriodicSpawner::new(pool, interval_seconds, *point, now)
            })
            .collect();
        Self { spawners }
    }

    pub fn spawner_count(&self) -> usize {
        self.spawners.len()
    }

    pub fn set_spawning(&mut self, enabled: bool) {
        for spawner in &mut self.spawners {
            spawner.set_enabled(enabled);
        }
    }

    /// Runs every spawner once. Returns the ids spawned this tick.
    pub fn tick_spawners(&mut self, now: f64) -> Vec<EntityId> {
        let mut spawned = Vec::new();
        for spawner in &mut self.spawners {
            if let Some(slot) = spawner.tick(now) {
                if let Some(enemy) = spawner.pool().get(slot) {
                    spawned.push(enemy.id());
                }
            }
        }
        spawned
    }

    pub fn active(&self) -> impl Iterator<Item = &Enemy> {
        self.spawners
            .iter()
            .flat_map(|spawner| spawner.pool().iter_active().map(|(_, enemy)| enemy))
    }

    pub fn active_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.spawners
            .iter_mut()
            .flat_map(|spawner| spawner.pool_mut().iter_active_mut().map(|(_, enemy)| enemy))
    }

    pub fn active_count(&self) -> usize {
        self.spawners
            .iter()
            .map(|spawner| spawner.pool().active_count())
            .sum()
    }

    pub fn find(&self, id: EntityId) -> Option<&Enemy> {
        self.active().find(|enemy| enemy.id == id)
    }

    fn find_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.active_mut().find(|enemy| enemy.id == id)
    }

    /// Returns the enemy to its spawner's pool. The caller releases any
    /// debuff first.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        for spawner in &mut self.spawners {
            let slot = spawner
                .pool()
                .iter_active()
                .find(|(_, enemy)| enemy.id == id)
                .map(|(slot, _)| slot);
            if let Some(slot) = slot {
                return spawner.pool_mut().release(slot);
            }
        }
        false
    }
}

impl DebuffTargets for Horde {
    fn is_target(&self, id: EntityId) -> bool {
        self.find(id).is_some()
    }

    fn attached_debuff(&self, id: EntityId) -> Option<DebuffRef> {
        self.find(id).and_then(|enemy| enemy.frost)
    }

    fn set_attached_debuff(&mut self, id: EntityId, debuff: Option<DebuffRef>) {
        if let Some(enemy) = self.find_mut(id) {
            enemy.frost = debuff;
        }
    }
}
