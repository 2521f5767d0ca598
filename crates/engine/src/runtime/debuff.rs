use tracing::{debug, trace};

use crate::app::EntityId;

use super::pool::{PoolSlot, Poolable};

/// Identifies the tracker that owns a debuff pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackerId(pub u32);

/// Handle a target stores to find the debuff attached to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebuffRef {
    pub owner: TrackerId,
    pub slot: PoolSlot,
}

/// Target-side half of the debuff link.
///
/// Implemented by whatever owns the candidate entities. Only [`Debuff`] writes
/// the link through `set_attached_debuff`; every other caller reads it.
pub trait DebuffTargets {
    /// Capability filter: `false` for entities that cannot carry a debuff.
    fn is_target(&self, id: EntityId) -> bool;
    fn attached_debuff(&self, id: EntityId) -> Option<DebuffRef>;
    fn set_attached_debuff(&mut self, id: EntityId, debuff: Option<DebuffRef>);
}

/// Pooled status effect attached to at most one target at a time.
#[derive(Debug, Clone)]
pub struct Debuff {
    handle: DebuffRef,
    active: bool,
    target: Option<EntityId>,
    applications: u32,
}

impl Debuff {
    pub fn new(owner: TrackerId, slot: PoolSlot) -> Self {
        Self {
            handle: DebuffRef { owner, slot },
            active: false,
            target: None,
            applications: 0,
        }
    }

    pub fn handle(&self) -> DebuffRef {
        self.handle
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    /// Number of times the current attachment has been applied, refreshes
    /// included. Reset on every fresh attachment.
    pub fn applications(&self) -> u32 {
        self.applications
    }

    /// Attaches to `target` and activates.
    ///
    /// Attaching to the current target again refreshes the attachment.
    /// Attaching to a different target first drops the link to the old one.
    pub fn attach_to_target(&mut self, target: EntityId, targets: &mut impl DebuffTargets) {
        match self.target {
            Some(current) if current == target => {
                self.applications = self.applications.saturating_add(1);
                trace!(target = current.0, applications = self.applications, "debuff_refreshed");
            }
            previous => {
                if let Some(previous) = previous {
                    self.unlink(previous, targets);
                }
                self.target = Some(target);
                self.applications = 1;
                debug!(target = target.0, slot = self.handle.slot.index(), "debuff_attached");
            }
        }
        self.active = true;
        targets.set_attached_debuff(target, Some(self.handle));
    }

    /// Clears both halves of the link and deactivates. Returns `false` when
    /// the debuff was already released.
    pub fn release_target(&mut self, targets: &mut impl DebuffTargets) -> bool {
        if !self.active && self.target.is_none() {
            return false;
        }
        if let Some(target) = self.target.take() {
            self.unlink(target, targets);
            debug!(target = target.0, slot = self.handle.slot.index(), "debuff_released");
        }
        self.active = false;
        self.applications = 0;
        true
    }

    fn unlink(&self, target: EntityId, targets: &mut impl DebuffTargets) {
        if targets.attached_debuff(target) == Some(self.handle) {
            targets.set_attached_debuff(target, None);
        }
    }
}

impl Poolable for Debuff {
    fn is_active(&self) -> bool {
        self.active
    }

    fn activate(&mut self) {
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.target = None;
        self.applications = 0;
    }
}
