use arena_engine::{step_toward, EntityId, Poolable, Spawnable, Summonable, Transform, Vec2};

const ALLY_ARRIVAL_THRESHOLD: f32 = 0.1;

/// Summoned decoy. Walks to its destination and stays there until unsummoned.
#[derive(Debug, Clone)]
pub struct Ally {
    id: EntityId,
    active: bool,
    position: Vec2,
    rotation_radians: f32,
    destination: Option<Vec2>,
    speed: f32,
}

impl Ally {
    pub fn new(id: EntityId, speed: f32) -> Self {
        Self {
            id,
            active: false,
            position: Vec2::ZERO,
            rotation_radians: 0.0,
            destination: None,
            speed,
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

    pub fn destination(&self) -> Option<Vec2> {
        self.destination
    }

    pub fn step(&mut self, fixed_dt_seconds: f32) {
        let Some(destination) = self.destination else {
            return;
        };
        let (next, arrived) = step_toward(
            self.position,
            destination,
            self.speed,
            fixed_dt_seconds,
            ALLY_ARRIVAL_THRESHOLD,
        );
        self.position = next;
        if arrived {
            self.destination = None;
        }
    }
}

impl Poolable for Ally {
    fn is_active(&self) -> bool {
        self.active
    }

    fn activate(&mut self) {
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.destination = None;
    }
}

impl Spawnable for Ally {
    fn place(&mut self, at: Transform) {
        self.position = at.position;
        if let Some(rotation) = at.rotation_radians {
            self.rotation_radians = rotation;
        }
    }
}

impl Summonable for Ally {
    fn pursue(&mut self, target: Option<Vec2>) {
        self.destination = target;
    }
}
