mod clock;
mod input;
mod loop_runner;
mod world;

pub use clock::{Deadline, SimClock};
pub use input::{InputAction, InputCollector, InputSnapshot};
pub use loop_runner::{FixedStepper, FrameReport, LoopConfig, Simulation};
pub use world::{
    movement_delta, step_toward, EntityId, EntityIdAllocator, Transform, Vec2,
};
