use crate::{Deactivator, EntityState, PoolEntity, PoolError, Prototype};
use core::{
    fmt,
    sync::atomic::{AtomicU32, Ordering},
};
use crossbeam_queue::SegQueue;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

static NEXT_POOL_ID: AtomicU32 = AtomicU32::new(0);

/// Process-unique identity of an [`ObjectPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(u32);

impl PoolId {
    fn next() -> Self {
        PoolId(NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool#{}", self.0)
    }
}

/// A reference to one life of a pooled entity.
///
/// Handles are only meaningful for the pool that returned them. Once the slot
/// is recycled again the old handle stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    pool: PoolId,
    slot: usize,
    generation: u32,
}

impl EntityHandle {
    /// Pool the entity belongs to.
    pub fn pool(&self) -> PoolId {
        self.pool
    }

    /// Position of the entity in its pool, in insertion order.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Number of times the slot had been handed out when this handle was
    /// issued.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// What a capped pool does when every slot is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Refuse the request with [`PoolError::Exhausted`].
    Reject,
    /// Deactivate the entity that was spawned earliest and hand it out again.
    ReuseOldest,
}

/// How a pool reacts when no inactive entity is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GrowthPolicy {
    /// Instantiate a new entity for every request that finds none available.
    /// The pool never shrinks.
    #[default]
    Unbounded,
    /// Grow up to `max` slots, then apply `overflow`.
    Capped {
        /// Maximum number of slots.
        max: usize,
        /// Behavior once `max` slots are active.
        overflow: OverflowPolicy,
    },
}

#[derive(Debug)]
struct Slot<T> {
    entity: T,
    state: EntityState,
    generation: u32,
    life: Arc<AtomicU32>,
    spawned_at: u64,
}

/// A struct representing a recycling pool of entities built from one
/// prototype.
///
/// Entities are never dropped while the pool lives; recycling flips them
/// between active and inactive. The first available slot in insertion order
/// is always handed out first, so identical call sequences produce identical
/// results.
#[derive(Debug)]
pub struct ObjectPool<P, T: PoolEntity> {
    id: PoolId,
    prototype: P,
    slots: Vec<Slot<T>>,
    mailbox: Arc<SegQueue<(usize, u32)>>,
    policy: GrowthPolicy,
    spawned: u64,
}

impl<P: Prototype<T>, T: PoolEntity> ObjectPool<P, T> {
    /// Creates an empty, unbounded pool.
    pub fn new(prototype: P) -> Self {
        Self::with_policy(prototype, GrowthPolicy::Unbounded)
    }

    /// Creates an empty pool with the given growth policy.
    pub fn with_policy(prototype: P, policy: GrowthPolicy) -> Self {
        ObjectPool {
            id: PoolId::next(),
            prototype,
            slots: Vec::new(),
            mailbox: Arc::new(SegQueue::new()),
            policy,
            spawned: 0,
        }
    }

    /// Creates an unbounded pool holding `pool_size` inactive entities.
    pub fn new_prefilled(pool_size: usize, prototype: P) -> Self {
        let mut pool = Self::new(prototype);
        pool.prefill(pool_size);
        pool
    }

    /// Materializes `count` additional inactive entities.
    ///
    /// Capped pools stop at their maximum.
    pub fn prefill(&mut self, count: usize) {
        let target = match self.policy {
            GrowthPolicy::Unbounded => self.slots.len() + count,
            GrowthPolicy::Capped { max, .. } => (self.slots.len() + count).min(max),
        };
        self.slots.reserve(target.saturating_sub(self.slots.len()));
        while self.slots.len() < target {
            self.grow();
        }
    }

    /// Hands out an entity placed with `params` and freshly reset.
    ///
    /// Queued self-deactivations are applied first. If no entity is
    /// available the growth policy decides: unbounded pools instantiate a
    /// new one and never fail.
    pub fn recycle(&mut self, params: T::SpawnParams) -> Result<EntityHandle, PoolError> {
        self.reclaim();
        let slot = match self.slots.iter().position(|s| s.state.is_available()) {
            Some(slot) => slot,
            None => self.overflow()?,
        };
        Ok(self.activate(slot, params))
    }

    fn overflow(&mut self) -> Result<usize, PoolError> {
        let (max, overflow) = match self.policy {
            GrowthPolicy::Unbounded => return Ok(self.grow()),
            GrowthPolicy::Capped { max, overflow } => (max, overflow),
        };
        if self.slots.len() < max {
            return Ok(self.grow());
        }
        let exhausted = PoolError::Exhausted {
            pool: self.id,
            capacity: max,
        };
        match overflow {
            OverflowPolicy::Reject => {
                warn!("{} rejected a recycle request: all {} slots active", self.id, max);
                Err(exhausted)
            }
            OverflowPolicy::ReuseOldest => {
                let oldest = self
                    .slots
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.state == EntityState::Active)
                    .min_by_key(|(_, s)| s.spawned_at)
                    .map(|(i, _)| i)
                    .ok_or(exhausted)?;
                debug!("{} reusing oldest active slot {}", self.id, oldest);
                self.deactivate_slot(oldest);
                Ok(oldest)
            }
        }
    }

    fn grow(&mut self) -> usize {
        let slot = self.slots.len();
        let life = Arc::new(AtomicU32::new(0));
        let mut entity = self
            .prototype
            .instantiate(Deactivator::new(slot, &life, &self.mailbox));
        entity.on_object_creation();
        self.slots.push(Slot {
            entity,
            state: EntityState::Created,
            generation: 0,
            life,
            spawned_at: 0,
        });
        debug!("{} grew to {} slots", self.id, self.slots.len());
        slot
    }
}

impl<P, T: PoolEntity> ObjectPool<P, T> {
    fn activate(&mut self, slot: usize, params: T::SpawnParams) -> EntityHandle {
        self.spawned += 1;
        let entry = &mut self.slots[slot];
        entry.generation = entry.generation.wrapping_add(1);
        entry.life.store(entry.generation, Ordering::Release);
        entry.spawned_at = self.spawned;
        entry.entity.place(params);
        entry.state = EntityState::Active;
        entry.entity.on_object_reset();
        trace!("{} handed out slot {} (life {})", self.id, slot, entry.generation);
        EntityHandle {
            pool: self.id,
            slot,
            generation: entry.generation,
        }
    }

    fn deactivate_slot(&mut self, slot: usize) -> bool {
        let entry = &mut self.slots[slot];
        if entry.state != EntityState::Active {
            return false;
        }
        entry.entity.on_object_deactivation();
        entry.state = EntityState::Inactive;
        true
    }

    fn slot(&self, handle: EntityHandle) -> Option<&Slot<T>> {
        if handle.pool != self.id {
            return None;
        }
        self.slots
            .get(handle.slot)
            .filter(|s| s.generation == handle.generation)
    }

    /// Ends the life `handle` refers to.
    ///
    /// Returns `false`, and does nothing, if that life already ended or the
    /// handle belongs to another pool.
    pub fn deactivate(&mut self, handle: EntityHandle) -> bool {
        match self.slot(handle) {
            Some(_) => self.deactivate_slot(handle.slot),
            None => false,
        }
    }

    /// Applies every deactivation requested through a [`Deactivator`] and
    /// returns how many entities went inactive.
    ///
    /// Requests posted during a life that has since ended are dropped.
    pub fn reclaim(&mut self) -> usize {
        let mut reclaimed = 0;
        while let Some((slot, generation)) = self.mailbox.pop() {
            let current = self.slots.get(slot).is_some_and(|s| s.generation == generation);
            if !current {
                trace!("{} dropped stale deactivation of slot {}", self.id, slot);
                continue;
            }
            if self.deactivate_slot(slot) {
                reclaimed += 1;
            }
        }
        reclaimed
    }

    /// Deactivates every active entity.
    pub fn deactivate_all(&mut self) -> usize {
        self.reclaim();
        (0..self.slots.len())
            .filter(|&slot| self.deactivate_slot(slot))
            .count()
    }

    /// Deactivates every active entity that does not survive a context
    /// teardown. Slots are kept for reuse.
    pub fn teardown_context(&mut self) -> usize {
        self.reclaim();
        let mut released = 0;
        for slot in 0..self.slots.len() {
            let entry = &self.slots[slot];
            if entry.state == EntityState::Active
                && !entry.entity.dont_destroy_on_load()
                && self.deactivate_slot(slot)
            {
                released += 1;
            }
        }
        debug!("{} released {} entities on context teardown", self.id, released);
        released
    }

    /// Borrows the entity of `handle`, as long as the slot was not recycled
    /// since. The entity may already be inactive.
    pub fn get(&self, handle: EntityHandle) -> Option<&T> {
        self.slot(handle).map(|s| &s.entity)
    }

    /// Mutably borrows the entity of `handle` while that life is active.
    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut T> {
        self.slot(handle)?;
        let entry = &mut self.slots[handle.slot];
        match entry.state {
            EntityState::Active => Some(&mut entry.entity),
            _ => None,
        }
    }

    /// State of the life `handle` refers to, `None` once it was recycled.
    pub fn state(&self, handle: EntityHandle) -> Option<EntityState> {
        self.slot(handle).map(|s| s.state)
    }

    /// Returns `true` while the life `handle` refers to is active.
    pub fn is_active(&self, handle: EntityHandle) -> bool {
        self.state(handle) == Some(EntityState::Active)
    }

    /// Iterates over active entities in insertion order.
    pub fn iter_active(&self) -> impl Iterator<Item = (EntityHandle, &T)> + '_ {
        let pool = self.id;
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.state == EntityState::Active)
            .map(move |(slot, s)| {
                let handle = EntityHandle {
                    pool,
                    slot,
                    generation: s.generation,
                };
                (handle, &s.entity)
            })
    }

    /// Mutably iterates over active entities in insertion order.
    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (EntityHandle, &mut T)> + '_ {
        let pool = self.id;
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, s)| s.state == EntityState::Active)
            .map(move |(slot, s)| {
                let handle = EntityHandle {
                    pool,
                    slot,
                    generation: s.generation,
                };
                (handle, &mut s.entity)
            })
    }

    /// Identity of this pool.
    pub fn id(&self) -> PoolId {
        self.id
    }

    /// Prototype entities are instantiated from.
    pub fn prototype(&self) -> &P {
        &self.prototype
    }

    /// Growth policy of this pool.
    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Gets the number of entities owned by the pool, active or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Checks if the pool owns no entity at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Gets the number of entities currently handed out.
    pub fn active_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.state == EntityState::Active)
            .count()
    }

    /// Gets the number of entities ready to be recycled without growing.
    ///
    /// Deactivations still waiting in the mailbox are not counted.
    pub fn available_count(&self) -> usize {
        self.len() - self.active_count()
    }
}

/// Runs the destruction hook of every entity owned by the pool.
impl<P, T: PoolEntity> Drop for ObjectPool<P, T> {
    fn drop(&mut self) {
        for entry in &mut self.slots {
            entry.entity.on_object_destruction();
        }
        trace!("{} destroyed {} entities", self.id, self.slots.len());
    }
}
