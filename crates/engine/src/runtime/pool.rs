//! Fixed-capacity pools of recyclable entities.
//!
//! Every entry is built once when the pool is constructed and lives until the
//! pool is dropped. Entries are recycled by toggling them between active and
//! inactive; the backing sequence is never resized or reordered, so bulk
//! passes always visit entries in the same index order.
//!
//! Acquisition is a first-fit linear scan. Early slots are reused
//! preferentially, which is fine for the tens of entries these pools hold; a
//! free list of vacant indices is the upgrade path for larger pools and would
//! not change observable behavior beyond which slot is handed out.

use tracing::debug;

/// Two-state lifecycle shared by everything a [`Pool`] can hold.
///
/// Transitions are always driven by the owner of the entity; nothing
/// activates itself.
pub trait Poolable {
    fn is_active(&self) -> bool;
    fn activate(&mut self);
    fn deactivate(&mut self);
}

/// Stable index of an entry inside its pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolSlot(usize);

impl PoolSlot {
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Pool<T> {
    entries: Vec<T>,
}

impl<T: Poolable> Pool<T> {
    /// Builds `capacity` entries up front. Entries come out of the factory
    /// inactive; any that do not are deactivated before the pool is returned.
    pub fn new(capacity: usize, factory: impl FnMut(PoolSlot) -> T) -> Self {
        Self::from_entries((0..capacity).map(PoolSlot).map(factory).collect())
    }

    /// Pool holding exactly one entry, for singleton entities.
    pub fn single(entry: T) -> Self {
        Self::from_entries(vec![entry])
    }

    fn from_entries(mut entries: Vec<T>) -> Self {
        for entry in &mut entries {
            if entry.is_active() {
                entry.deactivate();
            }
        }
        debug!(capacity = entries.len(), "pool_built");
        Self { entries }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn active_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_active()).count()
    }

    pub fn is_exhausted(&self) -> bool {
        self.entries.iter().all(Poolable::is_active)
    }

    /// First inactive slot by index, or `None` when every entry is in play.
    ///
    /// The slot stays inactive until the caller activates it, so two
    /// acquisitions without an activation in between return the same slot.
    pub fn acquire(&self) -> Option<PoolSlot> {
        self.entries
            .iter()
            .position(|entry| !entry.is_active())
            .map(PoolSlot)
    }

    pub fn acquire_and_activate(&mut self) -> Option<(PoolSlot, &mut T)> {
        let slot = self.acquire()?;
        let entry = &mut self.entries[slot.0];
        entry.activate();
        Some((slot, entry))
    }

    pub fn get(&self, slot: PoolSlot) -> Option<&T> {
        self.entries.get(slot.0)
    }

    pub fn get_mut(&mut self, slot: PoolSlot) -> Option<&mut T> {
        self.entries.get_mut(slot.0)
    }

    /// Deactivates the entry in `slot`. Returns `false` when it was not active.
    pub fn release(&mut self, slot: PoolSlot) -> bool {
        match self.entries.get_mut(slot.0) {
            Some(entry) if entry.is_active() => {
                entry.deactivate();
                true
            }
            _ => false,
        }
    }

    /// Runs `release` on every active entry in index order, then makes sure
    /// each of them ended up inactive. Returns how many entries were released.
    pub fn release_all(&mut self, mut release: impl FnMut(PoolSlot, &mut T)) -> usize {
        let mut released = 0usize;
        for (index, entry) in self.entries.iter_mut().enumerate() {
            if !entry.is_active() {
                continue;
            }
            release(PoolSlot(index), entry);
            if entry.is_active() {
                entry.deactivate();
            }
            released += 1;
        }
        released
    }

    pub fn iter(&self) -> impl Iterator<Item = (PoolSlot, &T)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (PoolSlot(index), entry))
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (PoolSlot, &T)> {
        self.iter().filter(|(_, entry)| entry.is_active())
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (PoolSlot, &mut T)> {
        self.entries
            .iter_mut()
            .enumerate()
            .filter(|(_, entry)| entry.is_active())
            .map(|(index, entry)| (PoolSlot(index), entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Crate {
        serial: usize,
        active: bool,
        releases: u32,
    }

    impl Poolable for Crate {
        fn is_active(&self) -> bool {
            self.active
        }

        fn activate(&mut self) {
            self.active = true;
        }

        fn deactivate(&mut self) {
            self.active = false;
        }
    }

    fn crate_pool(capacity: usize) -> Pool<Crate> {
        Pool::new(capacity, |slot| Crate {
            serial: slot.index(),
            active: false,
            releases: 0,
        })
    }

    #[test]
    fn construction_builds_every_entry_inactive() {
        let pool = Pool::new(4, |slot| Crate {
            serial: slot.index(),
            active: slot.index() % 2 == 0,
            releases: 0,
        });

        assert_eq!(pool.capacity(), 4);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn fourth_acquire_from_pool_of_three_is_unavailable() {
        let mut pool = crate_pool(3);
        let mut serials = Vec::new();
        for _ in 0..3 {
            let (_, entry) = pool.acquire_and_activate().expect("entry available");
            serials.push(entry.serial);
        }
        serials.sort_unstable();
        serials.dedup();

        assert_eq!(serials.len(), 3);
        assert!(pool.acquire().is_none());
        assert!(pool.acquire_and_activate().is_none());
        assert!(pool.is_exhausted());

        assert!(pool.release(PoolSlot(1)));
        assert!(pool.acquire_and_activate().is_some());
        assert_eq!(pool.active_count(), 3);
    }

    #[test]
    fn acquire_is_first_fit_by_index() {
        let mut pool = crate_pool(4);
        for _ in 0..4 {
            pool.acquire_and_activate().expect("entry");
        }
        pool.release(PoolSlot(3));
        pool.release(PoolSlot(1));

        assert_eq!(pool.acquire(), Some(PoolSlot(1)));
    }

    #[test]
    fn acquire_without_activation_keeps_returning_same_slot() {
        let pool = crate_pool(2);
        assert_eq!(pool.acquire(), Some(PoolSlot(0)));
        assert_eq!(pool.acquire(), Some(PoolSlot(0)));
    }

    #[test]
    fn release_of_inactive_entry_reports_false() {
        let mut pool = crate_pool(2);
        assert!(!pool.release(PoolSlot(0)));
        assert!(!pool.release(PoolSlot(9)));
    }

    #[test]
    fn release_all_visits_only_active_entries_in_order() {
        let mut pool = crate_pool(5);
        for _ in 0..4 {
            pool.acquire_and_activate().expect("entry");
        }
        pool.release(PoolSlot(2));

        let mut visited = Vec::new();
        let released = pool.release_all(|slot, entry| {
            visited.push(slot.index());
            entry.releases += 1;
            entry.deactivate();
        });

        assert_eq!(released, 3);
        assert_eq!(visited, vec![0, 1, 3]);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.get(PoolSlot(2)).expect("slot").releases, 0);
    }

    #[test]
    fn release_all_deactivates_entries_the_callback_left_active() {
        let mut pool = crate_pool(2);
        pool.acquire_and_activate().expect("entry");
        pool.release_all(|_, _| {});
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn active_count_never_exceeds_capacity() {
        let mut pool = crate_pool(6);
        let mut state = 0x2545_f491_u32;
        for _ in 0..500 {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            if state % 3 == 0 {
                pool.release(PoolSlot((state as usize / 3) % 6));
            } else {
                let _ = pool.acquire_and_activate();
            }
            assert!(pool.active_count() <= pool.capacity());
        }
    }

    #[test]
    fn single_pool_holds_one_inactive_entry() {
        let mut pool = Pool::single(Crate {
            serial: 42,
            active: true,
            releases: 0,
        });

        assert_eq!(pool.capacity(), 1);
        assert_eq!(pool.active_count(), 0);
        let (slot, entry) = pool.acquire_and_activate().expect("singleton");
        assert_eq!((slot.index(), entry.serial), (0, 42));
        assert!(pool.acquire().is_none());
    }

    #[test]
    fn slots_keep_their_entries_across_recycling() {
        let mut pool = crate_pool(3);
        let (slot, _) = pool.acquire_and_activate().expect("entry");
        pool.release(slot);
        pool.acquire_and_activate().expect("entry");

        let serials: Vec<usize> = pool.iter().map(|(_, entry)| entry.serial).collect();
        assert_eq!(serials, vec![0, 1, 2]);
    }
}
