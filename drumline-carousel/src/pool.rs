//! Card pooling: dense slot storage with an identity-keyed active map.
//!
//! Surfaces are expensive to construct, so the pool recycles them: a slot
//! constructed once lives until the carousel is torn down, alternating
//! between the active map (mounted, displaying an entry) and the free
//! stack (detached, awaiting reuse). Growth is unbounded; the working set
//! settles near the render-range size plus transient churn.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use drumline_model::MapRecord;

use crate::surface::CardSurface;

/// Index of a slot in the pool's dense storage. Stable for the lifetime of
/// the pool.
pub type SlotId = usize;

/// Identity key of a catalog entry: the address of its shared allocation.
///
/// Filtering hands out clones of the same `Arc`s, so an entry keeps its
/// key across query changes. Holding a raw pointer also keeps the pool off
/// other threads by construction, matching the single-threaded engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryKey(*const MapRecord);

impl EntryKey {
    /// The key of `record`'s allocation.
    pub fn of(record: &Arc<MapRecord>) -> Self {
        Self(Arc::as_ptr(record))
    }
}

struct PoolSlot<S> {
    surface: S,
    /// The entry this slot displays while mounted; cleared on release.
    current: Option<Arc<MapRecord>>,
}

/// Every card surface ever constructed, split between the active map
/// (keyed by entry identity) and the free stack.
pub struct CardPool<S> {
    slots: Vec<PoolSlot<S>>,
    free: Vec<SlotId>,
    active: HashMap<EntryKey, SlotId>,
}

/// The three disjoint outcomes of reconciling a visible range against the
/// mounted cards, computed once per recomputation. Applying releases
/// before acquisitions lets freed slots be recycled within the same pass
/// instead of allocating new surfaces.
#[derive(Debug)]
pub struct ReconcilePlan {
    /// Rows whose entry already has a mounted slot.
    pub retained: Vec<(usize, SlotId)>,
    /// Mounted entries whose row left the visible range.
    pub released: Vec<EntryKey>,
    /// Rows whose entry has no mounted slot yet.
    pub acquired: Vec<usize>,
}

impl<S: CardSurface> CardPool<S> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            active: HashMap::new(),
        }
    }

    /// Diff the desired `(row, entry)` window against the mounted cards.
    pub fn diff<'a>(
        &self,
        desired: impl Iterator<Item = (usize, &'a Arc<MapRecord>)>,
    ) -> ReconcilePlan {
        let mut retained = Vec::new();
        let mut acquired = Vec::new();
        let mut touched = HashSet::new();
        for (row, record) in desired {
            let key = EntryKey::of(record);
            match self.active.get(&key) {
                Some(&slot) => {
                    touched.insert(key);
                    retained.push((row, slot));
                }
                None => acquired.push(row),
            }
        }
        let released = self
            .active
            .keys()
            .filter(|key| !touched.contains(*key))
            .copied()
            .collect();
        ReconcilePlan {
            retained,
            released,
            acquired,
        }
    }

    /// Mount a slot for `record`: pop the free stack when possible,
    /// construct through `factory` otherwise.
    pub fn acquire(
        &mut self,
        record: Arc<MapRecord>,
        factory: &mut dyn FnMut(&Arc<MapRecord>) -> S,
    ) -> SlotId {
        let key = EntryKey::of(&record);
        debug_assert!(
            !self.active.contains_key(&key),
            "entry acquired while already mounted"
        );
        let id = match self.free.pop() {
            Some(id) => {
                let slot = &mut self.slots[id];
                slot.surface.set_content(&record);
                slot.current = Some(record);
                id
            }
            None => {
                log::trace!("constructing card surface #{}", self.slots.len());
                let surface = factory(&record);
                self.slots.push(PoolSlot {
                    surface,
                    current: Some(record),
                });
                self.slots.len() - 1
            }
        };
        self.active.insert(key, id);
        id
    }

    /// Unmount the slot displaying `key`: detach its surface and return it
    /// to the free stack. The stale content stays on the surface until the
    /// slot is reused.
    pub fn release(&mut self, key: EntryKey) -> Option<SlotId> {
        let id = self.active.remove(&key)?;
        let slot = &mut self.slots[id];
        slot.surface.kill();
        slot.current = None;
        self.free.push(id);
        Some(id)
    }

    /// Unmount everything. Idempotent; used at teardown.
    pub fn release_all(&mut self) {
        let keys: Vec<EntryKey> = self.active.keys().copied().collect();
        for key in keys {
            self.release(key);
        }
    }

    /// Slot currently displaying `key`, if mounted.
    pub fn lookup(&self, key: EntryKey) -> Option<SlotId> {
        self.active.get(&key).copied()
    }

    pub fn surface_mut(&mut self, id: SlotId) -> &mut S {
        &mut self.slots[id].surface
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Total surfaces ever constructed. Always `active_len + free_len`.
    pub fn constructed(&self) -> usize {
        self.slots.len()
    }
}

impl<S: CardSurface> Default for CardPool<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for CardPool<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardPool")
            .field("constructed", &self.slots.len())
            .field("active", &self.active.len())
            .field("free", &self.free.len())
            .finish()
    }
}
