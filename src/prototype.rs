use crate::Deactivator;

/// A trait defining the template a pool instantiates its entities from.
///
/// Every physical slot of an [`ObjectPool`](crate::ObjectPool) is created by
/// exactly one call to [`Prototype::instantiate`]. The deactivator handed in
/// is the entity's only link back to the pool, so entities that end their own
/// life (timers, impacts) should keep it.
pub trait Prototype<T> {
    /// Creates a new entity wired to the given deactivator.
    fn instantiate(&self, deactivator: Deactivator) -> T;
}

impl<T, F> Prototype<T> for F
where
    F: Fn(Deactivator) -> T,
{
    #[inline(always)]
    fn instantiate(&self, deactivator: Deactivator) -> T {
        self(deactivator)
    }
}
