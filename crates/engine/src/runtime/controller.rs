//! Ability-slot controller: one selected ability at a time, one shared
//! cooldown, and a terminal defeat latch.

use tracing::{debug, info};

use super::ability::{Ability, FireOutcome, TriggerKind};

/// Optional UI collaborator showing the countdown after an ability executes.
pub trait CooldownDisplay {
    fn cooldown_started(&mut self, ability: &'static str, duration_seconds: f32);
}

pub struct AbilitySlotController<A: Ability> {
    abilities: Vec<A>,
    active_index: usize,
    last_fire_time: f64,
    cooldown_duration: f32,
    can_act: bool,
    cooldown_display: Option<Box<dyn CooldownDisplay>>,
}

impl<A: Ability> AbilitySlotController<A> {
    /// Takes ownership of the abilities in slot order and enables the first.
    pub fn new(mut abilities: Vec<A>, ctx: &mut A::Context) -> Self {
        for (index, ability) in abilities.iter_mut().enumerate() {
            ability.set_enabled(index == 0, ctx);
        }
        Self {
            abilities,
            active_index: 0,
            last_fire_time: 0.0,
            cooldown_duration: 0.0,
            can_act: true,
            cooldown_display: None,
        }
    }

    pub fn with_cooldown_display(mut self, display: Box<dyn CooldownDisplay>) -> Self {
        self.cooldown_display = Some(display);
        self
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_ability(&self) -> Option<&A> {
        self.abilities.get(self.active_index)
    }

    pub fn abilities(&self) -> &[A] {
        &self.abilities
    }

    pub fn abilities_mut(&mut self) -> &mut [A] {
        &mut self.abilities
    }

    pub fn can_act(&self) -> bool {
        self.can_act
    }

    pub fn is_ready(&self, now: f64) -> bool {
        self.can_act && now >= self.cooldown_deadline()
    }

    pub fn cooldown_remaining(&self, now: f64) -> f32 {
        (self.cooldown_deadline() - now).max(0.0) as f32
    }

    fn cooldown_deadline(&self) -> f64 {
        self.last_fire_time + f64::from(self.cooldown_duration)
    }

    /// Cycles to the next slot. Cooldown does not block switching; defeat
    /// does. The previous ability's effect ends through its disable hook.
    pub fn switch_ability(&mut self, ctx: &mut A::Context) -> Option<usize> {
        if !self.can_act || self.abilities.is_empty() {
            return None;
        }
        let next = (self.active_index + 1) % self.abilities.len();
        for ability in &mut self.abilities {
            ability.set_enabled(false, ctx);
        }
        self.abilities[next].set_enabled(true, ctx);
        self.active_index = next;
        info!(index = next, ability = self.abilities[next].name(), "ability_switched");
        Some(next)
    }

    /// Fire button down (or held). Press and continuous abilities act on it.
    pub fn fire_input(&mut self, now: f64, ctx: &mut A::Context) -> FireOutcome {
        if !self.is_ready(now) {
            return FireOutcome::Refused;
        }
        let Some(ability) = self.abilities.get_mut(self.active_index) else {
            return FireOutcome::Refused;
        };
        let outcome = match ability.trigger() {
            TriggerKind::Press | TriggerKind::Continuous => ability.fire(now, ctx),
            TriggerKind::Release => FireOutcome::Refused,
        };
        self.record(now, outcome);
        outcome
    }

    /// Fire button let go. Release abilities fire; continuous ones stop.
    pub fn release_input(&mut self, now: f64, ctx: &mut A::Context) -> FireOutcome {
        if !self.is_ready(now) {
            return FireOutcome::Refused;
        }
        let Some(ability) = self.abilities.get_mut(self.active_index) else {
            return FireOutcome::Refused;
        };
        let outcome = match ability.trigger() {
            TriggerKind::Release => ability.fire(now, ctx),
            TriggerKind::Press | TriggerKind::Continuous => ability.stop_firing(now, ctx),
        };
        self.record(now, outcome);
        outcome
    }

    fn record(&mut self, now: f64, outcome: FireOutcome) {
        if !outcome.starts_cooldown() {
            return;
        }
        let Some(ability) = self.abilities.get(self.active_index) else {
            return;
        };
        self.last_fire_time = now;
        self.cooldown_duration = ability.cooldown_seconds().max(0.0);
        debug!(
            ability = ability.name(),
            cooldown_seconds = self.cooldown_duration,
            "cooldown_started"
        );
        if let Some(display) = self.cooldown_display.as_mut() {
            display.cooldown_started(ability.name(), self.cooldown_duration);
        }
    }

    /// Terminal: no further switching or firing, every ability disabled.
    pub fn defeated(&mut self, ctx: &mut A::Context) {
        if !self.can_act {
            return;
        }
        self.can_act = false;
        for ability in &mut self.abilities {
            ability.set_enabled(false, ctx);
        }
        info!("controller_defeated");
    }

    pub fn tick(&mut self, now: f64, ctx: &mut A::Context) {
        for ability in &mut self.abilities {
            ability.tick(now, ctx);
        }
    }
}
