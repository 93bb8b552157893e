//! Fixed-capacity recycling store for falling objects
//!
//! Records live in a slab indexed by [`ObjectId`]. Free records sit on a
//! stack; active records sit in a swap-remove list whose positions are
//! tracked per slot, so membership and removal are both O(1).

use super::state::{FallingObject, ObjectId};
use crate::consts::MAX_POOL_CAPACITY;

#[derive(Debug, Default)]
pub struct ObjectPool {
    slots: Vec<FallingObject>,
    free: Vec<ObjectId>,
    active: Vec<ObjectId>,
    /// Position of each slot inside `active`, `None` while free
    active_index: Vec<Option<usize>>,
    /// Growth past this is logged; not a hard cap
    capacity_hint: usize,
}

impl ObjectPool {
    /// Create an empty pool; up to `capacity` records are reserved, then created on demand
    pub fn with_capacity(capacity: usize) -> Self {
        let reserve = capacity.min(MAX_POOL_CAPACITY);
        Self {
            slots: Vec::with_capacity(reserve),
            free: Vec::with_capacity(reserve),
            active: Vec::with_capacity(reserve),
            active_index: Vec::with_capacity(reserve),
            capacity_hint: capacity,
        }
    }

    /// Take a record (reusing a free one when possible), reset it and mark it active
    pub fn acquire(&mut self) -> &mut FallingObject {
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                let id = ObjectId(self.slots.len() as u32);
                self.slots.push(FallingObject::new(id));
                self.active_index.push(None);
                if self.slots.len() > self.capacity_hint {
                    log::debug!("Object pool grew to {} records", self.slots.len());
                }
                id
            }
        };

        self.active_index[id.index()] = Some(self.active.len());
        self.active.push(id);

        let obj = &mut self.slots[id.index()];
        obj.reset();
        obj
    }

    /// Return an active record to the free list. Unknown or already-free ids are ignored.
    pub fn release(&mut self, id: ObjectId) {
        let Some(pos) = self.active_index.get(id.index()).copied().flatten() else {
            log::trace!("Ignoring release of inactive object {:?}", id);
            return;
        };

        self.active.swap_remove(pos);
        if let Some(&moved) = self.active.get(pos) {
            self.active_index[moved.index()] = Some(pos);
        }
        self.active_index[id.index()] = None;
        self.slots[id.index()].reset();
        self.free.push(id);
    }

    /// Return every active record to the free list
    pub fn release_all(&mut self) {
        for id in self.active.drain(..) {
            self.active_index[id.index()] = None;
            self.slots[id.index()].reset();
            self.free.push(id);
        }
    }

    /// Ids active right now. The returned list is a copy: releasing while
    /// iterating it cannot disturb the pool.
    pub fn active_snapshot(&self) -> Vec<ObjectId> {
        self.active.clone()
    }

    /// Like [`ObjectPool::active_snapshot`], refilling `out` instead of allocating
    pub fn snapshot_into(&self, out: &mut Vec<ObjectId>) {
        out.clear();
        out.extend_from_slice(&self.active);
    }

    /// Active records in activation order (swap-removes perturb it)
    pub fn active_objects(&self) -> impl Iterator<Item = &FallingObject> + '_ {
        self.active.iter().map(|id| &self.slots[id.index()])
    }

    /// Mutable access to every active record, in slot order
    pub fn active_mut(&mut self) -> impl Iterator<Item = &mut FallingObject> + '_ {
        self.slots
            .iter_mut()
            .zip(&self.active_index)
            .filter_map(|(obj, index)| index.map(|_| obj))
    }

    pub fn get(&self, id: ObjectId) -> Option<&FallingObject> {
        self.is_active(id).then(|| &self.slots[id.index()])
    }

    pub fn is_active(&self, id: ObjectId) -> bool {
        matches!(self.active_index.get(id.index()), Some(Some(_)))
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Records ever created (and not yet discarded by [`ObjectPool::destroy`])
    pub fn total_created(&self) -> usize {
        self.slots.len()
    }

    /// Release everything, then drop all storage
    pub fn destroy(&mut self) {
        self.release_all();
        self.slots.clear();
        self.free.clear();
        self.active_index.clear();
    }
}
