//! Poolable handles
//!
//! A [`PoolableHandle`] wraps one pooled scene node together with a weak
//! reference to the pool that created it. The pool owns the node's lifetime;
//! the handle only knows how to place the node and how to report that it was
//! deactivated.

use super::error::PoolError;
use super::placement::PlacementSpec;
use super::recycling_pool::{self, PoolState, ReturnOutcome};
use crate::scene::{NodeId, Scene};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A recyclable instance handed out by a [`RecyclingPool`](super::RecyclingPool)
///
/// Handles are cheap to clone; clones refer to the same instance.
#[derive(Debug, Clone)]
pub struct PoolableHandle {
    node: NodeId,
    owner: Weak<RefCell<PoolState>>,
}

impl PoolableHandle {
    pub(crate) fn new(node: NodeId, owner: Weak<RefCell<PoolState>>) -> Self {
        Self { node, owner }
    }
    
    /// Scene node wrapped by this handle
    pub fn node(&self) -> NodeId {
        self.node
    }
    
    /// Whether the owning pool is still alive
    pub fn has_owner(&self) -> bool {
        self.owner.strong_count() > 0
    }
    
    pub(crate) fn is_owned_by(&self, state: &Rc<RefCell<PoolState>>) -> bool {
        std::ptr::eq(self.owner.as_ptr(), Rc::as_ptr(state))
    }
    
    /// Whether the instance is currently active in the scene
    pub fn is_active(&self, scene: &dyn Scene) -> bool {
        scene.is_active(self.node)
    }
    
    /// Apply a placement: parent first, then position and rotation together,
    /// then scale
    pub(crate) fn place(&self, scene: &mut dyn Scene, spec: &PlacementSpec, parent: NodeId) {
        scene.set_parent(self.node, Some(parent));
        scene.set_position_and_rotation(self.node, spec.position(), spec.rotation());
        scene.set_local_scale(self.node, spec.scale());
    }
    
    /// Deactivate the instance, returning it to its pool
    ///
    /// Only an actual active-to-inactive transition notifies the pool, so
    /// deactivating an already inactive instance returns `Ok(None)`.
    pub fn deactivate(&self, scene: &mut dyn Scene) -> Result<Option<ReturnOutcome>, PoolError> {
        if !scene.set_active(self.node, false) {
            return Ok(None);
        }
        self.on_deactivated(scene)
    }
    
    /// Deactivation hook
    ///
    /// Hosts that flip the active flag themselves call this exactly once per
    /// transition. Without a live owner this is a no-op.
    pub fn on_deactivated(&self, scene: &mut dyn Scene) -> Result<Option<ReturnOutcome>, PoolError> {
        let Some(owner) = self.owner.upgrade() else {
            log::trace!("Orphaned instance {:?} deactivated, no pool to return to", self.node);
            return Ok(None);
        };
        recycling_pool::release(&owner, scene, self.node, true).map(Some)
    }
}
