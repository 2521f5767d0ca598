use std::collections::BTreeSet;

use arena_engine::{EntityId, Vec2};

/// Cone in front of an origin: within `range` and within the half angle of
/// the facing direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeRegion {
    range: f32,
    cos_half_angle: f32,
}

impl ConeRegion {
    pub fn new(range: f32, half_angle_degrees: f32) -> Self {
        Self {
            range: range.max(0.0),
            cos_half_angle: half_angle_degrees.clamp(0.0, 180.0).to_radians().cos(),
        }
    }

    pub fn contains(&self, origin: Vec2, facing: Vec2, point: Vec2) -> bool {
        let distance_sq = origin.distance_sq(point);
        if distance_sq > self.range * self.range {
            return false;
        }
        if distance_sq <= f32::EPSILON {
            return true;
        }
        let facing = facing.normalized_or_zero();
        let distance = distance_sq.sqrt();
        let dot = ((point.x - origin.x) * facing.x + (point.y - origin.y) * facing.y) / distance;
        dot >= self.cos_half_angle
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OverlapEvents {
    pub exits: Vec<EntityId>,
    pub enters: Vec<EntityId>,
}

/// Turns per-tick membership of a region into enter/exit events.
#[derive(Debug, Default)]
pub struct OverlapFeed {
    inside: BTreeSet<EntityId>,
}

impl OverlapFeed {
    /// Diffs `current` against the previous tick. Exits are listed before
    /// enters and both are in id order.
    pub fn update(&mut self, current: BTreeSet<EntityId>) -> OverlapEvents {
        let exits = self.inside.difference(&current).copied().collect();
        let enters = current.difference(&self.inside).copied().collect();
        self.inside = current;
        OverlapEvents { exits, enters }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.inside.contains(&id)
    }

    pub fn forget(&mut self, id: EntityId) {
        self.inside.remove(&id);
    }

    pub fn clear(&mut self) {
        self.inside.clear();
    }
}
