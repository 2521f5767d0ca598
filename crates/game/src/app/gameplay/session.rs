use std::collections::BTreeSet;

use arena_engine::{
    Ability, AbilitySlotController, ConeTracker, CooldownDisplay, EnterOutcome, EntityId,
    FireOutcome, InputSnapshot, Poolable, SimClock, Simulation, SummonIndicator,
    ThresholdSummoner, Vec2,
};
use serde::Serialize;
use tracing::{debug, info};

use super::abilities::{ArenaAbility, Frost};
use super::ally::Ally;
use super::overlap::OverlapFeed;
use super::player::DamageOutcome;
use super::ArenaWorld;
use crate::app::tuning::ArenaTuning;

/// Who the enemies are chasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PursuitTarget {
    Player,
    Ally,
    Nobody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub ticks: u64,
    pub elapsed_seconds: f64,
    pub score: u32,
    pub ally_points: u32,
    pub ally_summoned: bool,
    pub active_ability: &'static str,
    pub cooldown_remaining_seconds: f32,
    pub can_act: bool,
    pub player_health: i32,
    pub player_position: Vec2,
    pub active_enemies: usize,
    pub frozen_enemies: usize,
    pub frost_emitting: bool,
    pub slime_ammo: u32,
    pub pursuit: PursuitTarget,
}

/// One arena run: owns the clock, the world and every scheduler, and turns
/// per-tick input into calls on them.
pub struct ArenaSession {
    clock: SimClock,
    world: ArenaWorld,
    controller: AbilitySlotController<ArenaAbility>,
    summoner: ThresholdSummoner<Ally>,
    cone_feed: OverlapFeed,
    pursuit: PursuitTarget,
    score: u32,
    enemy_speed: f32,
    score_per_defeat: u32,
}

impl ArenaSession {
    pub fn new(tuning: &ArenaTuning) -> Self {
        let clock = SimClock::new();
        let mut world = ArenaWorld::new(tuning, clock.now());
        let controller =
            AbilitySlotController::new(ArenaAbility::loadout(&tuning.abilities), &mut world);
        let ally = Ally::new(world.allocate_id(), tuning.ally.speed);
        let summoner = ThresholdSummoner::new(
            ally,
            tuning.ally.cost,
            tuning.ally.duration_seconds,
            tuning.ally.spawn_point,
        );
        info!(
            spawners = world.horde.spawner_count(),
            abilities = controller.abilities().len(),
            "arena_ready"
        );
        Self {
            clock,
            world,
            controller,
            summoner,
            cone_feed: OverlapFeed::default(),
            pursuit: PursuitTarget::Player,
            score: 0,
            enemy_speed: tuning.enemies.speed,
            score_per_defeat: tuning.enemies.score_per_defeat,
        }
    }

    pub fn with_cooldown_display(mut self, display: Box<dyn CooldownDisplay>) -> Self {
        self.controller = self.controller.with_cooldown_display(display);
        self
    }

    pub fn with_summon_indicator(mut self, indicator: Box<dyn SummonIndicator>) -> Self {
        self.summoner = self.summoner.with_indicator(indicator);
        self
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn world(&self) -> &ArenaWorld {
        &self.world
    }

    pub fn controller(&self) -> &AbilitySlotController<ArenaAbility> {
        &self.controller
    }

    pub fn summoner(&self) -> &ThresholdSummoner<Ally> {
        &self.summoner
    }

    pub fn pursuit(&self) -> PursuitTarget {
        self.pursuit
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn frost(&self) -> Option<&Frost> {
        self.controller
            .abilities()
            .iter()
            .find_map(ArenaAbility::as_frost)
    }

    pub fn pursuit_position(&self) -> Option<Vec2> {
        match self.pursuit {
            PursuitTarget::Player => Some(self.world.player.position()),
            PursuitTarget::Ally => self
                .summoner
                .singleton()
                .filter(|ally| ally.is_active())
                .map(Ally::position),
            PursuitTarget::Nobody => None,
        }
    }

    pub fn switch_ability(&mut self) -> Option<usize> {
        self.controller.switch_ability(&mut self.world)
    }

    pub fn fire_input(&mut self) -> FireOutcome {
        self.controller.fire_input(self.clock.now(), &mut self.world)
    }

    pub fn release_input(&mut self) -> FireOutcome {
        self.controller.release_input(self.clock.now(), &mut self.world)
    }

    pub fn face(&mut self, direction: Vec2) {
        self.world.player.face(direction);
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.summoner.add_points(points);
        debug!(points, score = self.score, "score_added");
    }

    /// Summons the ally toward the player and makes it the enemies' target.
    pub fn summon_ally(&mut self) -> bool {
        let rally_point = self.world.player.position();
        if self
            .summoner
            .summon(self.clock.now(), Some(rally_point))
            .is_none()
        {
            return false;
        }
        self.pursuit = PursuitTarget::Ally;
        true
    }

    pub fn damage_player(&mut self, amount: i32) -> DamageOutcome {
        let outcome = self.world.player.take_damage(amount);
        if outcome == DamageOutcome::Defeated {
            self.controller.defeated(&mut self.world);
            self.world.horde.set_spawning(false);
            self.pursuit = PursuitTarget::Nobody;
        }
        outcome
    }

    /// Releases the enemy's frost first, then returns it to its pool and
    /// awards score. Returns `false` for ids that are not active enemies.
    pub fn defeat_enemy(&mut self, id: EntityId) -> bool {
        if self.world.horde.find(id).is_none() {
            return false;
        }
        self.cone_exit(id);
        self.cone_feed.forget(id);
        self.world.horde.despawn(id);
        self.add_score(self.score_per_defeat);
        info!(enemy = id.0, score = self.score, "enemy_defeated");
        true
    }

    pub fn cone_enter(&mut self, id: EntityId) -> EnterOutcome {
        match frost_tracker(&mut self.controller) {
            Some(tracker) => tracker.on_enter(id, &mut self.world.horde),
            None => EnterOutcome::Ignored,
        }
    }

    pub fn cone_exit(&mut self, id: EntityId) -> bool {
        match frost_tracker(&mut self.controller) {
            Some(tracker) => tracker.on_exit(id, &mut self.world.horde),
            None => false,
        }
    }

    pub fn summary(&self) -> SessionSummary {
        let now = self.clock.now();
        SessionSummary {
            ticks: self.clock.ticks(),
            elapsed_seconds: now,
            score: self.score,
            ally_points: self.summoner.points(),
            ally_summoned: self.summoner.is_summoned(),
            active_ability: self
                .controller
                .active_ability()
                .map(Ability::name)
                .unwrap_or("none"),
            cooldown_remaining_seconds: self.controller.cooldown_remaining(now),
            can_act: self.controller.can_act(),
            player_health: self.world.player.health(),
            player_position: self.world.player.position(),
            active_enemies: self.world.horde.active_count(),
            frozen_enemies: self
                .world
                .horde
                .active()
                .filter(|enemy| enemy.is_debuffed())
                .count(),
            frost_emitting: self
                .frost()
                .is_some_and(|frost| frost.tracker().is_emitting()),
            slime_ammo: self
                .controller
                .abilities()
                .iter()
                .find_map(ArenaAbility::as_slime)
                .map_or(0, |slime| slime.ammo()),
            pursuit: self.pursuit,
        }
    }

    fn move_enemies(&mut self, fixed_dt_seconds: f32) {
        let Some(target) = self.pursuit_position() else {
            return;
        };
        let slow = self.frost().map_or(1.0, Frost::slow_multiplier);
        let speed = self.enemy_speed;
        for enemy in self.world.horde.active_mut() {
            let speed = if enemy.is_debuffed() { speed * slow } else { speed };
            enemy.pursue(target, speed, fixed_dt_seconds);
        }
    }

    /// Stands in for the physics broad-phase: diffs which enemies sit in the
    /// frost cone and feeds exits, then enters, to the tracker.
    fn feed_cone(&mut self) {
        let Some(frost) = self.frost() else {
            return;
        };
        if !frost.tracker().is_emitting() {
            self.cone_feed.clear();
            return;
        }
        let region = frost.region();
        let origin = self.world.player.position();
        let facing = self.world.player.facing();
        let inside: BTreeSet<EntityId> = self
            .world
            .horde
            .active()
            .filter(|enemy| region.contains(origin, facing, enemy.position()))
            .map(|enemy| enemy.id())
            .collect();

        let events = self.cone_feed.update(inside);
        for id in events.exits {
            self.cone_exit(id);
        }
        for id in events.enters {
            self.cone_enter(id);
        }
    }

    fn expire_ally(&mut self, now: f64) {
        if !self.summoner.tick(now) {
            return;
        }
        self.pursuit = if self.world.player.is_alive() {
            PursuitTarget::Player
        } else {
            PursuitTarget::Nobody
        };
        info!(pursuit = ?self.pursuit, "ally_expired");
    }
}

impl Simulation for ArenaSession {
    fn tick(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) {
        let now = self.clock.advance(fixed_dt_seconds);

        if input.switch_ability_pressed() {
            self.switch_ability();
        }
        if input.fire_held() || input.fire_pressed() {
            self.fire_input();
        }
        if input.fire_released() {
            self.release_input();
        }
        if input.summon_pressed() {
            self.summon_ally();
        }

        self.world
            .player
            .step(input.move_direction(), fixed_dt_seconds);
        for id in self.world.horde.tick_spawners(now) {
            debug!(enemy = id.0, "enemy_spawned");
        }
        self.expire_ally(now);
        self.move_enemies(fixed_dt_seconds);
        if let Some(ally) = self.summoner.singleton_mut() {
            if ally.is_active() {
                ally.step(fixed_dt_seconds);
            }
        }
        self.controller.tick(now, &mut self.world);
        self.feed_cone();
    }
}

fn frost_tracker(
    controller: &mut AbilitySlotController<ArenaAbility>,
) -> Option<&mut ConeTracker> {
    controller
        .abilities_mut()
        .iter_mut()
        .find_map(ArenaAbility::as_frost_mut)
        .map(Frost::tracker_mut)
}
