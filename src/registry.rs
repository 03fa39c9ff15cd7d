use crate::{EntityHandle, GrowthPolicy, ObjectPool, PoolEntity, Prototype};
use core::{borrow::Borrow, hash::Hash};
use log::{debug, warn};
use std::collections::{hash_map::Entry, HashMap};

/// A set of pools of the same entity category, one per prototype key.
///
/// Lookups of keys that were never registered return `None`; only
/// [`Self::get_or_create`] registers pools on demand.
#[derive(Debug)]
pub struct PoolRegistry<K, P, T: PoolEntity> {
    pools: HashMap<K, ObjectPool<P, T>>,
}

impl<K, P, T: PoolEntity> Default for PoolRegistry<K, P, T> {
    fn default() -> Self {
        PoolRegistry {
            pools: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, P: Prototype<T>, T: PoolEntity> PoolRegistry<K, P, T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds one unbounded pool per prototype, each holding `initial_count`
    /// inactive entities.
    ///
    /// When a key shows up twice the first prototype wins.
    pub fn populated<I>(initial_count: usize, prototypes: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
    {
        Self::populated_with_policy(initial_count, GrowthPolicy::Unbounded, prototypes)
    }

    /// Same as [`Self::populated`], with every pool using `policy`.
    pub fn populated_with_policy<I>(initial_count: usize, policy: GrowthPolicy, prototypes: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
    {
        let mut registry = Self::new();
        for (key, prototype) in prototypes {
            match registry.pools.entry(key) {
                Entry::Occupied(_) => warn!("duplicate prototype key ignored while populating pools"),
                Entry::Vacant(slot) => {
                    let mut pool = ObjectPool::with_policy(prototype, policy);
                    pool.prefill(initial_count);
                    slot.insert(pool);
                }
            }
        }
        registry
    }

    /// Returns the pool registered under `key`, creating an empty one from
    /// `prototype` first if there is none.
    pub fn get_or_create<F>(&mut self, key: K, prototype: F) -> &mut ObjectPool<P, T>
    where
        F: FnOnce() -> P,
    {
        self.pools
            .entry(key)
            .or_insert_with(|| ObjectPool::new(prototype()))
    }

    /// Registers `pool` under `key`, returning the pool it replaces.
    pub fn insert(&mut self, key: K, pool: ObjectPool<P, T>) -> Option<ObjectPool<P, T>> {
        self.pools.insert(key, pool)
    }

    /// Recycles an entity from the pool registered under `key`.
    ///
    /// Returns `None` when no such pool exists or the pool refused to grow.
    pub fn recycle<Q>(&mut self, key: &Q, params: T::SpawnParams) -> Option<EntityHandle>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let Some(pool) = self.pools.get_mut(key) else {
            debug!("recycle skipped: no pool registered for prototype");
            return None;
        };
        pool.recycle(params).ok()
    }
}

impl<K: Eq + Hash, P, T: PoolEntity> PoolRegistry<K, P, T> {
    /// Looks up the pool registered under `key`.
    pub fn try_get<Q>(&self, key: &Q) -> Option<&ObjectPool<P, T>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.pools.get(key)
    }

    /// Mutably looks up the pool registered under `key`.
    pub fn try_get_mut<Q>(&mut self, key: &Q) -> Option<&mut ObjectPool<P, T>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.pools.get_mut(key)
    }

    /// Returns `true` if a pool is registered under `key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.pools.contains_key(key)
    }

    /// Number of registered pools.
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Returns `true` if no pool is registered.
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Registered keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.pools.keys()
    }

    /// Registered pools, in no particular order.
    pub fn pools(&self) -> impl Iterator<Item = &ObjectPool<P, T>> + '_ {
        self.pools.values()
    }

    /// Mutable access to every registered pool, in no particular order.
    pub fn pools_mut(&mut self) -> impl Iterator<Item = &mut ObjectPool<P, T>> + '_ {
        self.pools.values_mut()
    }

    /// Resolves a handle issued by any of the registered pools.
    pub fn entity(&self, handle: EntityHandle) -> Option<&T> {
        self.pools
            .values()
            .find(|pool| pool.id() == handle.pool())?
            .get(handle)
    }

    /// Mutably resolves a handle issued by any of the registered pools.
    pub fn entity_mut(&mut self, handle: EntityHandle) -> Option<&mut T> {
        self.pools
            .values_mut()
            .find(|pool| pool.id() == handle.pool())?
            .get_mut(handle)
    }

    /// Ends the life `handle` refers to in whichever pool issued it.
    pub fn deactivate(&mut self, handle: EntityHandle) -> bool {
        self.pools
            .values_mut()
            .find(|pool| pool.id() == handle.pool())
            .is_some_and(|pool| pool.deactivate(handle))
    }

    /// Applies queued self-deactivations in every pool.
    pub fn reclaim_all(&mut self) -> usize {
        self.pools.values_mut().map(ObjectPool::reclaim).sum()
    }

    /// Runs [`ObjectPool::teardown_context`] on every pool.
    pub fn teardown_context(&mut self) -> usize {
        self.pools
            .values_mut()
            .map(ObjectPool::teardown_context)
            .sum()
    }
}
