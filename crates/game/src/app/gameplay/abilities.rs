//! The four player abilities and their closed dispatch enum.

use arena_engine::{
    Ability, ConeTracker, Deadline, FireOutcome, Pool, Poolable, TrackerId, TriggerKind, Vec2,
};
use tracing::debug;

use super::overlap::ConeRegion;
use super::ArenaWorld;
use crate::app::tuning::AbilityTuning;

pub const FROST_TRACKER: TrackerId = TrackerId(1);

#[derive(Debug, Clone)]
pub struct Projectile {
    active: bool,
    origin: Vec2,
    velocity: Vec2,
    launched_at: f64,
    expires: Deadline,
}

impl Projectile {
    fn idle() -> Self {
        Self {
            active: false,
            origin: Vec2::ZERO,
            velocity: Vec2::ZERO,
            launched_at: 0.0,
            expires: Deadline::at(0.0),
        }
    }

    pub fn position(&self, now: f64) -> Vec2 {
        let elapsed = (now - self.launched_at).max(0.0) as f32;
        Vec2::new(
            self.origin.x + self.velocity.x * elapsed,
            self.origin.y + self.velocity.y * elapsed,
        )
    }
}

impl Poolable for Projectile {
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

/// Pooled shots with a fixed speed and lifetime.
#[derive(Debug)]
pub struct Volley {
    shots: Pool<Projectile>,
    speed: f32,
    lifetime_seconds: f32,
}

impl Volley {
    fn new(capacity: usize, speed: f32, lifetime_seconds: f32) -> Self {
        Self {
            shots: Pool::new(capacity, |_| Projectile::idle()),
            speed,
            lifetime_seconds,
        }
    }

    fn launch(&mut self, now: f64, origin: Vec2, direction: Vec2) -> bool {
        let Some((_, shot)) = self.shots.acquire_and_activate() else {
            return false;
        };
        let unit = direction.normalized_or_zero();
        shot.origin = origin;
        shot.velocity = Vec2::new(unit.x * self.speed, unit.y * self.speed);
        shot.launched_at = now;
        shot.expires = Deadline::after(now, self.lifetime_seconds);
        true
    }

    fn expire(&mut self, now: f64) {
        let expired: Vec<_> = self
            .shots
            .iter_active()
            .filter(|(_, shot)| shot.expires.is_reached(now))
            .map(|(slot, _)| slot)
            .collect();
        for slot in expired {
            self.shots.release(slot);
        }
    }

    pub fn in_flight(&self) -> usize {
        self.shots.active_count()
    }

    pub fn shots(&self) -> &Pool<Projectile> {
        &self.shots
    }
}

/// Press-triggered bolt along the facing direction.
#[derive(Debug)]
pub struct Lightning {
    enabled: bool,
    cooldown_seconds: f32,
    bolts: Volley,
}

impl Lightning {
    pub fn bolts(&self) -> &Volley {
        &self.bolts
    }
}

/// Continuous cone that slows every enemy inside it.
#[derive(Debug)]
pub struct Frost {
    enabled: bool,
    tracker: ConeTracker,
    region: ConeRegion,
    slow_multiplier: f32,
}

impl Frost {
    pub fn tracker(&self) -> &ConeTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut ConeTracker {
        &mut self.tracker
    }

    pub fn region(&self) -> ConeRegion {
        self.region
    }

    pub fn slow_multiplier(&self) -> f32 {
        self.slow_multiplier
    }

    fn end_emission(&mut self, world: &mut ArenaWorld) -> FireOutcome {
        if !self.tracker.is_emitting() {
            return FireOutcome::Refused;
        }
        self.tracker.stop_emitting(&mut world.horde);
        FireOutcome::Toggled
    }
}

/// Release-triggered stationary cloud at the player's feet.
#[derive(Debug)]
pub struct Stink {
    enabled: bool,
    cooldown_seconds: f32,
    clouds: Volley,
}

impl Stink {
    pub fn clouds(&self) -> &Volley {
        &self.clouds
    }
}

/// Release-triggered shot with limited ammunition.
#[derive(Debug)]
pub struct Slime {
    enabled: bool,
    cooldown_seconds: f32,
    ammo: u32,
    blobs: Volley,
}

impl Slime {
    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn blobs(&self) -> &Volley {
        &self.blobs
    }
}

#[derive(Debug)]
pub enum ArenaAbility {
    Lightning(Lightning),
    Frost(Frost),
    Stink(Stink),
    Slime(Slime),
}

impl ArenaAbility {
    /// Slot order: lightning, frost, stink, slime.
    pub fn loadout(tuning: &AbilityTuning) -> Vec<ArenaAbility> {
        vec![
            ArenaAbility::Lightning(Lightning {
                enabled: false,
                cooldown_seconds: tuning.lightning_cooldown_seconds,
                bolts: Volley::new(
                    tuning.lightning_bolts,
                    tuning.lightning_bolt_speed,
                    tuning.lightning_bolt_lifetime_seconds,
                ),
            }),
            ArenaAbility::Frost(Frost {
                enabled: false,
                tracker: ConeTracker::new(FROST_TRACKER, tuning.max_freezable_enemies),
                region: ConeRegion::new(tuning.frost_range, tuning.frost_half_angle_degrees),
                slow_multiplier: tuning.frost_slow_multiplier,
            }),
            ArenaAbility::Stink(Stink {
                enabled: false,
                cooldown_seconds: tuning.stink_cooldown_seconds,
                clouds: Volley::new(tuning.stink_clouds, 0.0, tuning.stink_cloud_lifetime_seconds),
            }),
            ArenaAbility::Slime(Slime {
                enabled: false,
                cooldown_seconds: tuning.slime_cooldown_seconds,
                ammo: tuning.slime_ammo,
                blobs: Volley::new(
                    tuning.slime_ammo.max(1) as usize,
                    tuning.slime_speed,
                    tuning.slime_lifetime_seconds,
                ),
            }),
        ]
    }

    pub fn as_frost(&self) -> Option<&Frost> {
        match self {
            ArenaAbility::Frost(frost) => Some(frost),
            _ => None,
        }
    }

    pub fn as_frost_mut(&mut self) -> Option<&mut Frost> {
        match self {
            ArenaAbility::Frost(frost) => Some(frost),
            _ => None,
        }
    }

    pub fn as_slime(&self) -> Option<&Slime> {
        match self {
            ArenaAbility::Slime(slime) => Some(slime),
            _ => None,
        }
    }
}

impl Ability for ArenaAbility {
    type Context = ArenaWorld;

    fn name(&self) -> &'static str {
        match self {
            ArenaAbility::Lightning(_) => "lightning",
            ArenaAbility::Frost(_) => "frost",
            ArenaAbility::Stink(_) => "stink",
            ArenaAbility::Slime(_) => "slime",
        }
    }

    fn trigger(&self) -> TriggerKind {
        match self {
            ArenaAbility::Lightning(_) => TriggerKind::Press,
            ArenaAbility::Frost(_) => TriggerKind::Continuous,
            ArenaAbility::Stink(_) | ArenaAbility::Slime(_) => TriggerKind::Release,
        }
    }

    fn cooldown_seconds(&self) -> f32 {
        match self {
            ArenaAbility::Lightning(lightning) => lightning.cooldown_seconds,
            ArenaAbility::Frost(_) => 0.0,
            ArenaAbility::Stink(stink) => stink.cooldown_seconds,
            ArenaAbility::Slime(slime) => slime.cooldown_seconds,
        }
    }

    fn fire(&mut self, now: f64, world: &mut ArenaWorld) -> FireOutcome {
        if !self.is_enabled() {
            return FireOutcome::Refused;
        }
        let origin = world.player.position();
        let facing = world.player.facing();
        match self {
            ArenaAbility::Lightning(lightning) => {
                if lightning.bolts.launch(now, origin, facing) {
                    FireOutcome::Executed
                } else {
                    debug!("lightning_no_bolt_available");
                    FireOutcome::Refused
                }
            }
            ArenaAbility::Frost(frost) => {
                if frost.tracker.start_emitting() {
                    FireOutcome::Toggled
                } else {
                    FireOutcome::Refused
                }
            }
            ArenaAbility::Stink(stink) => {
                if stink.clouds.launch(now, origin, Vec2::ZERO) {
                    FireOutcome::Executed
                } else {
                    debug!("stink_no_cloud_available");
                    FireOutcome::Refused
                }
            }
            ArenaAbility::Slime(slime) => {
                if slime.ammo == 0 {
                    debug!("slime_out_of_ammo");
                    return FireOutcome::Refused;
                }
                if !slime.blobs.launch(now, origin, facing) {
                    return FireOutcome::Refused;
                }
                slime.ammo -= 1;
                FireOutcome::Executed
            }
        }
    }

    fn stop_firing(&mut self, _now: f64, world: &mut ArenaWorld) -> FireOutcome {
        match self {
            ArenaAbility::Frost(frost) => frost.end_emission(world),
            _ => FireOutcome::Refused,
        }
    }

    fn is_enabled(&self) -> bool {
        match self {
            ArenaAbility::Lightning(lightning) => lightning.enabled,
            ArenaAbility::Frost(frost) => frost.enabled,
            ArenaAbility::Stink(stink) => stink.enabled,
            ArenaAbility::Slime(slime) => slime.enabled,
        }
    }

    fn set_enabled(&mut self, enabled: bool, world: &mut ArenaWorld) {
        match self {
            ArenaAbility::Lightning(lightning) => lightning.enabled = enabled,
            ArenaAbility::Frost(frost) => {
                frost.enabled = enabled;
                if !enabled {
                    frost.end_emission(world);
                }
            }
            ArenaAbility::Stink(stink) => stink.enabled = enabled,
            ArenaAbility::Slime(slime) => slime.enabled = enabled,
        }
    }

    fn tick(&mut self, now: f64, _world: &mut ArenaWorld) {
        match self {
            ArenaAbility::Lightning(lightning) => lightning.bolts.expire(now),
            ArenaAbility::Frost(_) => {}
            ArenaAbility::Stink(stink) => stink.clouds.expire(now),
            ArenaAbility::Slime(slime) => slime.blobs.expire(now),
        }
    }
}
