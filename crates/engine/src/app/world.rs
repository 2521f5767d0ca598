use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_sq(self, other: Vec2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Unit-length copy of `self`, or zero when `self` has no length.
    pub fn normalized_or_zero(self) -> Vec2 {
        let len_sq = self.x * self.x + self.y * self.y;
        if len_sq <= 0.0 || !len_sq.is_finite() {
            return Vec2::ZERO;
        }
        let inv_len = len_sq.sqrt().recip();
        Vec2 {
            x: self.x * inv_len,
            y: self.y * inv_len,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    #[serde(default)]
    pub rotation_radians: Option<f32>,
}

impl Transform {
    pub const fn at(position: Vec2) -> Self {
        Self {
            position,
            rotation_radians: None,
        }
    }

    pub const fn with_rotation(position: Vec2, rotation_radians: f32) -> Self {
        Self {
            position,
            rotation_radians: Some(rotation_radians),
        }
    }
}

pub fn movement_delta(direction: Vec2, speed: f32, fixed_dt_seconds: f32) -> Vec2 {
    let unit = direction.normalized_or_zero();
    Vec2 {
        x: unit.x * speed * fixed_dt_seconds,
        y: unit.y * speed * fixed_dt_seconds,
    }
}

pub fn step_toward(
    current: Vec2,
    target: Vec2,
    speed: f32,
    fixed_dt_seconds: f32,
    arrival_threshold: f32,
) -> (Vec2, bool) {
    let dx = target.x - current.x;
    let dy = target.y - current.y;
    let distance_sq = dx * dx + dy * dy;
    let threshold_sq = arrival_threshold * arrival_threshold;
    if distance_sq <= threshold_sq {
        return (target, true);
    }

    let distance = distance_sq.sqrt();
    let max_step = speed * fixed_dt_seconds;
    if max_step >= distance {
        return (target, true);
    }

    let inv_distance = distance.recip();
    (
        Vec2 {
            x: current.x + dx * inv_distance * max_step,
            y: current.y + dy * inv_distance * max_step,
        },
        false,
    )
}
