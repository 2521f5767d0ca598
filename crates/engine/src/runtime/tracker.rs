//! Area-effect tracker: turns overlap events for one region into debuff
//! attach and release calls.
//!
//! When two trackers' regions overlap, the first region to debuff a target
//! keeps it. Another tracker ignores enter events for that target until the
//! owning tracker releases it, and exit events only release debuffs owned by
//! the tracker receiving them.

use tracing::{debug, info, trace};

use crate::app::EntityId;

use super::debuff::{Debuff, DebuffTargets, TrackerId};
use super::pool::Pool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterState {
    Off,
    Emitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterOutcome {
    /// Region off, candidate not a target, or debuffed by another region.
    Ignored,
    Refreshed,
    Attached,
    /// Every debuff is in use; the candidate stays unaffected.
    PoolExhausted,
}

#[derive(Debug)]
pub struct ConeTracker {
    id: TrackerId,
    debuffs: Pool<Debuff>,
    state: EmitterState,
}

impl ConeTracker {
    pub fn new(id: TrackerId, capacity: usize) -> Self {
        Self {
            id,
            debuffs: Pool::new(capacity, |slot| Debuff::new(id, slot)),
            state: EmitterState::Off,
        }
    }

    pub fn id(&self) -> TrackerId {
        self.id
    }

    pub fn state(&self) -> EmitterState {
        self.state
    }

    pub fn is_emitting(&self) -> bool {
        self.state == EmitterState::Emitting
    }

    pub fn capacity(&self) -> usize {
        self.debuffs.capacity()
    }

    pub fn attached_count(&self) -> usize {
        self.debuffs.active_count()
    }

    pub fn debuffs(&self) -> &Pool<Debuff> {
        &self.debuffs
    }

    /// Returns `true` when the region went from off to live.
    pub fn start_emitting(&mut self) -> bool {
        if self.is_emitting() {
            return false;
        }
        self.state = EmitterState::Emitting;
        info!(tracker = self.id.0, "emission_started");
        true
    }

    /// Turns the region off and releases every attached debuff, including
    /// targets that never produced an exit event. Returns the number released.
    pub fn stop_emitting(&mut self, targets: &mut impl DebuffTargets) -> usize {
        if !self.is_emitting() {
            return 0;
        }
        self.state = EmitterState::Off;
        let released = self.debuffs.release_all(|_, debuff| {
            debuff.release_target(targets);
        });
        info!(tracker = self.id.0, released, "emission_stopped");
        released
    }

    pub fn on_enter(
        &mut self,
        candidate: EntityId,
        targets: &mut impl DebuffTargets,
    ) -> EnterOutcome {
        if !self.is_emitting() || !targets.is_target(candidate) {
            return EnterOutcome::Ignored;
        }

        match targets.attached_debuff(candidate) {
            Some(existing) if existing.owner == self.id => {
                if let Some(debuff) = self.debuffs.get_mut(existing.slot) {
                    debuff.attach_to_target(candidate, targets);
                }
                EnterOutcome::Refreshed
            }
            Some(existing) => {
                trace!(
                    tracker = self.id.0,
                    owner = existing.owner.0,
                    target = candidate.0,
                    "enter_ignored_owned_elsewhere"
                );
                EnterOutcome::Ignored
            }
            None => match self.debuffs.acquire() {
                Some(slot) => {
                    if let Some(debuff) = self.debuffs.get_mut(slot) {
                        debuff.attach_to_target(candidate, targets);
                    }
                    EnterOutcome::Attached
                }
                None => {
                    debug!(
                        tracker = self.id.0,
                        target = candidate.0,
                        capacity = self.debuffs.capacity(),
                        "debuff_pool_exhausted"
                    );
                    EnterOutcome::PoolExhausted
                }
            },
        }
    }

    /// Releases the candidate's debuff if this tracker owns it. Returns
    /// whether anything was released.
    pub fn on_exit(&mut self, candidate: EntityId, targets: &mut impl DebuffTargets) -> bool {
        if !targets.is_target(candidate) {
            return false;
        }
        match targets.attached_debuff(candidate) {
            Some(existing) if existing.owner == self.id => self
                .debuffs
                .get_mut(existing.slot)
                .is_some_and(|debuff| debuff.release_target(targets)),
            _ => false,
        }
    }
}
