//! Scene graph trait
//!
//! The primitives a host scene graph has to offer for objects to be pooled:
//! instantiate from a template, destroy, toggle activity, reparent and
//! transform. Implementations are free to back these with anything; the pool
//! only ever talks to this trait.

use crate::foundation::math::{Quat, Transform, Vec3};
use std::sync::atomic::{AtomicU64, Ordering};

pub use crate::foundation::collections::NodeKey as NodeId;

/// Identity of a scene instance
///
/// Lets process-wide bookkeeping tell two scenes apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorldId(u64);

impl WorldId {
    /// Allocate a fresh, never reused identifier
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
    
    /// Raw identifier value
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Host scene graph operations used by pools
///
/// Operations on a node that no longer exists are no-ops, and queries on one
/// return `None`/`false`. Pools rely on this to detect instances destroyed
/// behind their back.
pub trait Scene {
    /// Identity of this scene
    fn world_id(&self) -> WorldId;
    
    /// Create an empty, active root node
    fn create_node(&mut self, name: &str) -> NodeId;
    
    /// Copy a template node (and its children) into a new root node
    ///
    /// Returns `None` when the template does not exist.
    fn instantiate(&mut self, template: NodeId) -> Option<NodeId>;
    
    /// Destroy a node and all of its children
    fn destroy(&mut self, node: NodeId);
    
    /// Whether the node still exists
    fn exists(&self, node: NodeId) -> bool;
    
    /// Whether the node's own active flag is set
    fn is_active(&self, node: NodeId) -> bool;
    
    /// Set the node's active flag
    ///
    /// Returns `true` only when the flag actually changed.
    fn set_active(&mut self, node: NodeId, active: bool) -> bool;
    
    /// Parent of the node, `None` for roots
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    
    /// Reparent the node; `None` makes it a root
    fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>);
    
    /// Current transform of the node
    fn transform(&self, node: NodeId) -> Option<Transform>;
    
    /// Set position and rotation in a single step
    fn set_position_and_rotation(&mut self, node: NodeId, position: Vec3, rotation: Quat);
    
    /// Set the node's scale
    fn set_local_scale(&mut self, node: NodeId, scale: Vec3);
    
    /// Node name
    fn name(&self, node: NodeId) -> Option<&str>;
    
    /// Rename the node
    fn set_name(&mut self, node: NodeId, name: &str);
    
    /// Keep a root node alive across scene transitions
    fn mark_persistent(&mut self, node: NodeId);
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_world_ids_are_unique() {
        let a = WorldId::next();
        let b = WorldId::next();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }
}
