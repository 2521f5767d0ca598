use std::time::Duration;

use tracing::{debug, warn};

use super::input::{InputCollector, InputSnapshot};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
        }
    }
}

/// Anything advanced by the fixed-step loop. One call is one logical tick.
pub trait Simulation {
    fn tick(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub ticks_run: u32,
    pub dropped_backlog: Duration,
}

/// Converts variable frame deltas into a bounded number of fixed ticks.
#[derive(Debug)]
pub struct FixedStepper {
    fixed_dt: Duration,
    max_frame_delta: Duration,
    max_ticks_per_frame: u32,
    accumulator: Duration,
}

impl FixedStepper {
    pub fn new(config: &LoopConfig) -> Self {
        let target_tps = config.target_tps.max(1);
        Self {
            fixed_dt: Duration::from_secs_f64(1.0 / target_tps as f64),
            max_frame_delta: normalize_non_zero_duration(
                config.max_frame_delta,
                Duration::from_millis(250),
            ),
            max_ticks_per_frame: config.max_ticks_per_frame.max(1),
            accumulator: Duration::ZERO,
        }
    }

    pub fn fixed_dt(&self) -> Duration {
        self.fixed_dt
    }

    pub fn fixed_dt_seconds(&self) -> f32 {
        self.fixed_dt.as_secs_f32()
    }

    pub fn advance_frame<S: Simulation>(
        &mut self,
        frame_dt: Duration,
        input: &mut InputCollector,
        simulation: &mut S,
    ) -> FrameReport {
        let clamped_frame_dt = clamp_frame_delta(frame_dt, self.max_frame_delta);
        self.accumulator = self.accumulator.saturating_add(clamped_frame_dt);

        let step_plan = plan_sim_steps(self.accumulator, self.fixed_dt, self.max_ticks_per_frame);
        let fixed_dt_seconds = self.fixed_dt_seconds();
        for _ in 0..step_plan.ticks_to_run {
            let snapshot = input.snapshot_for_tick();
            simulation.tick(fixed_dt_seconds, &snapshot);
        }
        self.accumulator = step_plan.remaining_accumulator;

        if step_plan.dropped_backlog > Duration::ZERO {
            warn!(
                dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                max_ticks_per_frame = self.max_ticks_per_frame,
                "sim_clamp_triggered"
            );
        } else {
            debug!(ticks = step_plan.ticks_to_run, "frame_stepped");
        }

        FrameReport {
            ticks_run: step_plan.ticks_to_run,
            dropped_backlog: step_plan.dropped_backlog,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::input::InputAction;

    #[derive(Default)]
    struct CountingSim {
        ticks: u32,
        fire_held_ticks: u32,
        dt_sum: f32,
    }

    impl Simulation for CountingSim {
        fn tick(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) {
            self.ticks += 1;
            self.dt_sum += fixed_dt_seconds;
            if input.fire_held() {
                self.fire_held_ticks += 1;
            }
        }
    }

    fn config(target_tps: u32, max_ticks_per_frame: u32) -> LoopConfig {
        LoopConfig {
            target_tps,
            max_ticks_per_frame,
            ..LoopConfig::default()
        }
    }

    #[test]
    fn clamp_frame_delta_caps_large_frame() {
        let max_frame_delta = Duration::from_millis(250);
        let raw_frame_dt = Duration::from_millis(600);

        assert_eq!(
            clamp_frame_delta(raw_frame_dt, max_frame_delta),
            max_frame_delta
        );
    }

    #[test]
    fn plan_sim_steps_runs_expected_ticks_without_drop() {
        let fixed_dt = Duration::from_millis(16);
        let result = plan_sim_steps(Duration::from_millis(48), fixed_dt, 5);

        assert_eq!(result.ticks_to_run, 3);
        assert_eq!(result.remaining_accumulator, Duration::ZERO);
        assert_eq!(result.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn plan_sim_steps_drops_backlog_when_tick_cap_hit() {
        let fixed_dt = Duration::from_millis(16);
        let result = plan_sim_steps(Duration::from_millis(120), fixed_dt, 3);

        assert_eq!(result.ticks_to_run, 3);
        assert_eq!(result.remaining_accumulator, Duration::ZERO);
        assert_eq!(result.dropped_backlog, Duration::from_millis(72));
    }

    #[test]
    fn stepper_carries_partial_ticks_across_frames() {
        let mut stepper = FixedStepper::new(&config(10, 5));
        let mut input = InputCollector::new();
        let mut sim = CountingSim::default();

        let first = stepper.advance_frame(Duration::from_millis(150), &mut input, &mut sim);
        let second = stepper.advance_frame(Duration::from_millis(50), &mut input, &mut sim);

        assert_eq!(first.ticks_run, 1);
        assert_eq!(second.ticks_run, 1);
        assert_eq!(sim.ticks, 2);
        assert!((sim.dt_sum - 0.2).abs() < 1e-5);
    }

    #[test]
    fn stepper_feeds_held_input_to_every_tick() {
        let mut stepper = FixedStepper::new(&config(10, 5));
        let mut input = InputCollector::new();
        let mut sim = CountingSim::default();
        input.handle_action(InputAction::Fire, true);

        stepper.advance_frame(Duration::from_millis(200), &mut input, &mut sim);

        assert_eq!(sim.ticks, 2);
        assert_eq!(sim.fire_held_ticks, 2);
    }

    #[test]
    fn zero_config_values_are_normalized() {
        let stepper = FixedStepper::new(&LoopConfig {
            target_tps: 0,
            max_frame_delta: Duration::ZERO,
            max_ticks_per_frame: 0,
        });
        assert_eq!(stepper.fixed_dt(), Duration::from_secs(1));
        assert_eq!(stepper.max_ticks_per_frame, 1);
        assert_eq!(stepper.max_frame_delta, Duration::from_millis(250));
    }
}
