/// Simulation clock advanced once per fixed tick.
///
/// Time only moves forward: negative or non-finite deltas are ignored so every
/// deadline comparison made against [`SimClock::now`] sees a nondecreasing value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    now_seconds: f64,
    ticks: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now_seconds: f64) -> Self {
        Self {
            now_seconds: now_seconds.max(0.0),
            ticks: 0,
        }
    }

    pub fn now(&self) -> f64 {
        self.now_seconds
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn advance(&mut self, dt_seconds: f32) -> f64 {
        if dt_seconds.is_finite() && dt_seconds > 0.0 {
            self.now_seconds += f64::from(dt_seconds);
        }
        self.ticks = self.ticks.saturating_add(1);
        self.now_seconds
    }
}

/// A point in simulation time that tick code polls instead of sleeping on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deadline {
    at_seconds: f64,
}

impl Deadline {
    pub fn at(at_seconds: f64) -> Self {
        Self { at_seconds }
    }

    pub fn after(now: f64, duration_seconds: f32) -> Self {
        Self {
            at_seconds: now + f64::from(duration_seconds.max(0.0)),
        }
    }

    pub fn at_seconds(&self) -> f64 {
        self.at_seconds
    }

    pub fn is_reached(&self, now: f64) -> bool {
        now >= self.at_seconds
    }

    pub fn remaining_seconds(&self, now: f64) -> f32 {
        (self.at_seconds - now).max(0.0) as f32
    }
}
