pub mod app;
pub mod runtime;

pub use app::{
    movement_delta, step_toward, Deadline, EntityId, EntityIdAllocator, FixedStepper,
    FrameReport, InputAction, InputCollector, InputSnapshot, LoopConfig, SimClock, Simulation,
    Transform, Vec2,
};
pub use runtime::{
    Ability, AbilitySlotController, ConeTracker, CooldownDisplay, Debuff, DebuffRef,
    DebuffTargets, EmitterState, EnterOutcome, FireOutcome, PeriodicSpawner, Pool, PoolSlot,
    Poolable, Spawnable, SummonIndicator, Summonable, ThresholdSummoner, TrackerId, TriggerKind,
};
