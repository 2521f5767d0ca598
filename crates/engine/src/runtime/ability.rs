/// What a dispatch to an ability actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// The action ran; the controller charges it against the cooldown.
    Executed,
    /// A continuous effect was switched on or off. No cooldown.
    Toggled,
    /// Nothing happened: gated by the controller, out of resources, or the
    /// ability does not react to this input.
    Refused,
}

impl FireOutcome {
    pub fn starts_cooldown(self) -> bool {
        matches!(self, FireOutcome::Executed)
    }
}

/// Which input edge an ability acts on. Fixed per ability kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// Acts on `fire`, typically one-shot.
    Press,
    /// Acts when the button is let go.
    Release,
    /// Starts on `fire` and ends on `stop_firing`.
    Continuous,
}

/// Shared contract between the slot controller and each concrete ability.
///
/// Abilities never check their own cooldown; the controller gates every call
/// and reads `cooldown_seconds` only after `fire` reports
/// [`FireOutcome::Executed`].
pub trait Ability {
    /// World state the ability reads or mutates when it acts.
    type Context;

    fn name(&self) -> &'static str;
    fn trigger(&self) -> TriggerKind;
    fn cooldown_seconds(&self) -> f32;

    fn fire(&mut self, now: f64, ctx: &mut Self::Context) -> FireOutcome;

    /// Ends a continuous action. One-shot abilities report `Refused`.
    fn stop_firing(&mut self, _now: f64, _ctx: &mut Self::Context) -> FireOutcome {
        FireOutcome::Refused
    }

    fn is_enabled(&self) -> bool;

    /// Disable hook. Turning an ability off must end any effect it keeps alive.
    fn set_enabled(&mut self, enabled: bool, ctx: &mut Self::Context);

    /// Per-tick upkeep for effects the ability owns (lifetimes, pools).
    fn tick(&mut self, _now: f64, _ctx: &mut Self::Context) {}
}
