mod ability;
mod controller;
mod debuff;
mod pool;
mod scheduler;
mod tracker;

pub use ability::{Ability, FireOutcome, TriggerKind};
pub use controller::{AbilitySlotController, CooldownDisplay};
pub use debuff::{Debuff, DebuffRef, DebuffTargets, TrackerId};
pub use pool::{Pool, PoolSlot, Poolable};
pub use scheduler::{PeriodicSpawner, Spawnable, SummonIndicator, Summonable, ThresholdSummoner};
pub use tracker::{ConeTracker, EmitterState, EnterOutcome};
