//! Global parent registry
//!
//! Instances placed without an explicit parent are parented under a single
//! anchor node shared by every pool. The anchor is created on first use,
//! marked persistent so scene transitions keep it, and reused afterwards.

use crate::scene::{NodeId, Scene, WorldId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Name given to anchor nodes
pub const ANCHOR_NAME: &str = "PoolGlobalParent";

/// Lazily created default parent, one per scene
#[derive(Debug, Default)]
pub struct GlobalParentRegistry {
    anchors: RefCell<HashMap<WorldId, NodeId>>,
}

impl GlobalParentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }
    
    /// The registry shared by every pool on this thread
    ///
    /// Pools are single-threaded, so this is the process-wide instance for
    /// all practical purposes.
    pub fn shared() -> Rc<Self> {
        thread_local! {
            static SHARED: Rc<GlobalParentRegistry> = Rc::new(GlobalParentRegistry::new());
        }
        SHARED.with(Rc::clone)
    }
    
    /// Anchor node for `scene`, created on first call
    pub fn anchor(&self, scene: &mut dyn Scene) -> NodeId {
        let world = scene.world_id();
        if let Some(&node) = self.anchors.borrow().get(&world) {
            if scene.exists(node) {
                return node;
            }
            log::warn!("Global parent {:?} was destroyed externally, recreating it", node);
        }
        
        let node = scene.create_node(ANCHOR_NAME);
        scene.mark_persistent(node);
        self.anchors.borrow_mut().insert(world, node);
        log::info!("Created global parent {:?} for world {}", node, world.raw());
        node
    }
    
    /// Anchor node for `world`, if one was created
    pub fn get(&self, world: WorldId) -> Option<NodeId> {
        self.anchors.borrow().get(&world).copied()
    }
}
