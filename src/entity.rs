use crossbeam_queue::SegQueue;
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

/// A trait defining the lifecycle every pooled entity goes through.
///
/// The owning [`ObjectPool`](crate::ObjectPool) drives the hooks:
///
/// 1. [`Self::on_object_creation`] once, right after the slot is materialized.
/// 2. [`Self::place`] followed by [`Self::on_object_reset`] on every recycle.
/// 3. [`Self::on_object_deactivation`] once per life, when the entity is
///    handed back.
/// 4. [`Self::on_object_destruction`] when the pool itself is dropped.
pub trait PoolEntity {
    /// Parameters applied to the entity before it is reset, usually a
    /// position and an orientation.
    type SpawnParams;

    /// Called once per physical slot.
    ///
    /// By default, this method do nothing.
    #[inline(always)]
    fn on_object_creation(&mut self) {}

    /// Applies spawn parameters to the entity.
    fn place(&mut self, params: Self::SpawnParams);

    /// Restores every piece of domain state to its canonical default.
    ///
    /// Runs after [`Self::place`], so it must leave placement alone. Nothing
    /// from a previous life may survive this call.
    fn on_object_reset(&mut self);

    /// Called when the entity's active life ends.
    ///
    /// The pool never calls this twice for the same life.
    #[inline(always)]
    fn on_object_deactivation(&mut self) {}

    /// Called when the owning pool is torn down.
    #[inline(always)]
    fn on_object_destruction(&mut self) {}

    /// Whether the entity survives a context teardown, see
    /// [`ObjectPool::teardown_context`](crate::ObjectPool::teardown_context).
    #[inline(always)]
    fn dont_destroy_on_load(&self) -> bool {
        false
    }
}

/// Lifecycle state of a pool slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityState {
    /// Materialized but never handed out.
    Created,
    /// Handed out and not yet deactivated.
    Active,
    /// Deactivated and available for recycling.
    Inactive,
}

impl EntityState {
    /// Returns `true` if a slot in this state can be handed out.
    #[inline]
    pub fn is_available(self) -> bool {
        !matches!(self, EntityState::Active)
    }
}

/// Posts deactivation requests to the pool that created an entity.
///
/// Requests are queued and applied by the pool on its next
/// [`reclaim`](crate::ObjectPool::reclaim), which also runs before every
/// recycle. Until then the entity still counts as active. Requesting
/// deactivation more than once is harmless.
///
/// The deactivator an entity is built with always targets the entity's
/// current life. A clone is pinned to the life current when it was made and
/// does nothing once that life ended.
#[derive(Debug)]
pub struct Deactivator {
    slot: usize,
    life: Arc<AtomicU32>,
    pinned: Option<u32>,
    mailbox: Arc<SegQueue<(usize, u32)>>,
}

impl Deactivator {
    pub(crate) fn new(
        slot: usize,
        life: &Arc<AtomicU32>,
        mailbox: &Arc<SegQueue<(usize, u32)>>,
    ) -> Self {
        Deactivator {
            slot,
            life: Arc::clone(life),
            pinned: None,
            mailbox: Arc::clone(mailbox),
        }
    }

    /// Creates a deactivator connected to nothing.
    ///
    /// Useful for building entities outside of a pool; requests are dropped.
    pub fn detached() -> Self {
        Deactivator {
            slot: usize::MAX,
            life: Arc::new(AtomicU32::new(0)),
            pinned: None,
            mailbox: Arc::new(SegQueue::new()),
        }
    }

    /// Asks the owning pool to end the life this deactivator targets.
    pub fn deactivate(&self) {
        self.mailbox.push((self.slot, self.target()));
    }

    /// Slot index of the entity inside its pool.
    pub fn slot(&self) -> usize {
        self.slot
    }

    fn target(&self) -> u32 {
        self.pinned.unwrap_or_else(|| self.life.load(Ordering::Acquire))
    }
}

impl Clone for Deactivator {
    fn clone(&self) -> Self {
        Deactivator {
            slot: self.slot,
            life: Arc::clone(&self.life),
            pinned: Some(self.target()),
            mailbox: Arc::clone(&self.mailbox),
        }
    }
}
