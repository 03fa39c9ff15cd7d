use crate::PoolId;

/// Errors returned by pool operations.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// A capped pool with [`OverflowPolicy::Reject`](crate::OverflowPolicy::Reject)
    /// had every slot active.
    #[error("{pool} exhausted at capacity {capacity}")]
    Exhausted {
        /// Pool that refused the request.
        pool: PoolId,
        /// Configured maximum number of slots.
        capacity: usize,
    },
}
