//! # Prefab Pool
//!
//! Recycles copies of a prefab instead of destroying and recreating them.
//!
//! ## Features
//!
//! - **Lazy growth**: instances are created on demand, never up front
//! - **Never blocks**: placement past capacity creates an extra instance
//! - **Deferred returns**: deactivated instances are reparented one tick later
//! - **Shared anchor**: unparented placements land under one persistent node
//! - **Pluggable host**: any scene graph implementing [`scene::Scene`]
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use prefab_pool::prelude::*;
//!
//! fn main() -> Result<(), PoolError> {
//!     let mut scene = SimpleScene::new();
//!     let template = scene.create_node("Spark");
//!     let scheduler = Rc::new(FrameScheduler::new());
//!     let config = PoolConfig::new("Sparks").with_template(template).with_capacity(4);
//!     let pool = RecyclingPool::new(&mut scene, config, scheduler.clone())?;
//!
//!     let spark = pool.place_at(&mut scene, Vec3::new(1.0, 0.0, 0.0))?;
//!     spark.deactivate(&mut scene)?;
//!
//!     // Returned instances become reusable once the tick completes
//!     scheduler.end_tick(&mut scene);
//!     let again = pool.place_at(&mut scene, Vec3::zeros())?;
//!     assert_eq!(again.node(), spark.node());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod pooling;
pub mod scene;

/// Common imports for pool users
pub mod prelude {
    pub use crate::{
        config::{PoolConfig, EngineConfig, ConfigError},
        foundation::math::{Vec3, Quat, Transform},
        pooling::{
            RecyclingPool, PoolableHandle, PlacementSpec, PoolError, ReturnOutcome,
            InstanceState, PoolStats, GlobalParentRegistry, FrameScheduler, TickScheduler,
        },
        scene::{Scene, SimpleScene, NodeId},
    };
}
