//! Prefab pooling
//!
//! The recycling engine: placement requests, pooled handles, the pool itself,
//! the shared default parent and the tick scheduler it defers returns to.

pub mod anchor;
pub mod error;
pub mod handle;
pub mod placement;
pub mod recycling_pool;
pub mod scheduler;


pub use anchor::{GlobalParentRegistry, ANCHOR_NAME};
pub use error::PoolError;
pub use handle::PoolableHandle;
pub use placement::PlacementSpec;
pub use recycling_pool::{InstanceState, PoolStats, RecyclingPool, ReturnOutcome};
pub use scheduler::{Continuation, FrameScheduler, TickScheduler};
