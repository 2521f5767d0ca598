use arena_engine::{CooldownDisplay, SummonIndicator};
use tracing::info;

/// Headless stand-in for the countdown slider.
#[derive(Debug, Default)]
pub struct LoggedCountdown;

impl CooldownDisplay for LoggedCountdown {
    fn cooldown_started(&mut self, ability: &'static str, duration_seconds: f32) {
        info!(ability, duration_seconds, "countdown_shown");
    }
}

/// Headless stand-in for the ally-available badge.
#[derive(Debug, Default)]
pub struct LoggedAllyBadge;

impl SummonIndicator for LoggedAllyBadge {
    fn set_available(&mut self, available: bool) {
        info!(available, "ally_badge_toggled");
    }
}
