//! In-memory scene graph
//!
//! Nodes live in a generational slot map, so a destroyed node's id never
//! resolves to a newer node. Transforms are stored as set; no hierarchy
//! composition is performed.

use crate::foundation::collections::SlotMap;
use crate::foundation::math::{Quat, Transform, Vec3};
use super::scene_graph::{NodeId, Scene, WorldId};
use bitflags::bitflags;

bitflags! {
    /// Per-node state flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NodeFlags: u8 {
        /// Node is active
        const ACTIVE = 0b0000_0001;
        /// Node survives [`SimpleScene::unload_scene`]
        const PERSISTENT = 0b0000_0010;
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    name: String,
    transform: Transform,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    flags: NodeFlags,
}

impl NodeData {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::identity(),
            parent: None,
            children: Vec::new(),
            flags: NodeFlags::ACTIVE,
        }
    }
}

/// Slot-map backed [`Scene`] implementation
#[derive(Debug)]
pub struct SimpleScene {
    id: WorldId,
    nodes: SlotMap<NodeId, NodeData>,
}

impl SimpleScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self {
            id: WorldId::next(),
            nodes: SlotMap::with_key(),
        }
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Children of a node, in insertion order
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node).map_or(&[][..], |data| data.children.as_slice())
    }

    /// Flags of a node
    pub fn flags(&self, node: NodeId) -> Option<NodeFlags> {
        self.nodes.get(node).map(|data| data.flags)
    }

    /// Transition to a new scene
    ///
    /// Destroys every root that is not persistent, together with its subtree.
    /// Returns the number of roots destroyed.
    pub fn unload_scene(&mut self) -> usize {
        let doomed: Vec<NodeId> = self.nodes
            .iter()
            .filter(|(_, data)| data.parent.is_none() && !data.flags.contains(NodeFlags::PERSISTENT))
            .map(|(id, _)| id)
            .collect();

        for &root in &doomed {
            self.destroy(root);
        }

        log::debug!("Unloaded scene: destroyed {} root nodes, {} nodes remain", doomed.len(), self.nodes.len());
        doomed.len()
    }

    fn detach(&mut self, node: NodeId) {
        let old_parent = self.nodes.get(node).and_then(|data| data.parent);
        if let Some(old) = old_parent {
            if let Some(parent_data) = self.nodes.get_mut(old) {
                parent_data.children.retain(|&child| child != node);
            }
        }
        if let Some(data) = self.nodes.get_mut(node) {
            data.parent = None;
        }
    }

    fn is_ancestor(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.nodes.get(id).and_then(|data| data.parent);
        }
        false
    }

    fn clone_subtree(&mut self, source: NodeId, parent: Option<NodeId>) -> Option<NodeId> {
        let mut data = self.nodes.get(source)?.clone();
        let source_children = std::mem::take(&mut data.children);
        data.parent = parent;
        data.flags.remove(NodeFlags::PERSISTENT);

        let copy = self.nodes.insert(data);
        for child in source_children {
            if let Some(child_copy) = self.clone_subtree(child, Some(copy)) {
                if let Some(copy_data) = self.nodes.get_mut(copy) {
                    copy_data.children.push(child_copy);
                }
            }
        }
        Some(copy)
    }
}

impl Default for SimpleScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for SimpleScene {
    fn world_id(&self) -> WorldId {
        self.id
    }

    fn create_node(&mut self, name: &str) -> NodeId {
        self.nodes.insert(NodeData::new(name))
    }

    fn instantiate(&mut self, template: NodeId) -> Option<NodeId> {
        let copy = self.clone_subtree(template, None)?;
        if let Some(data) = self.nodes.get_mut(copy) {
            data.name.push_str("(Clone)");
        }
        Some(copy)
    }

    fn destroy(&mut self, node: NodeId) {
        if !self.nodes.contains_key(node) {
            return;
        }
        self.detach(node);

        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(data) = self.nodes.remove(id) {
                stack.extend(data.children);
            }
        }
    }

    fn exists(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    fn is_active(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(|data| data.flags.contains(NodeFlags::ACTIVE))
    }

    fn set_active(&mut self, node: NodeId, active: bool) -> bool {
        match self.nodes.get_mut(node) {
            Some(data) if data.flags.contains(NodeFlags::ACTIVE) != active => {
                data.flags.set(NodeFlags::ACTIVE, active);
                true
            }
            _ => false,
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|data| data.parent)
    }

    fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) {
        if !self.nodes.contains_key(node) {
            return;
        }
        if let Some(new_parent) = parent {
            if !self.nodes.contains_key(new_parent) {
                log::warn!("Ignoring reparent of {:?}: parent {:?} does not exist", node, new_parent);
                return;
            }
            if self.is_ancestor(node, new_parent) {
                log::warn!("Ignoring reparent of {:?} under its own descendant {:?}", node, new_parent);
                return;
            }
        }

        self.detach(node);
        if let Some(new_parent) = parent {
            if let Some(parent_data) = self.nodes.get_mut(new_parent) {
                parent_data.children.push(node);
            }
            if let Some(data) = self.nodes.get_mut(node) {
                data.parent = Some(new_parent);
            }
        }
    }

    fn transform(&self, node: NodeId) -> Option<Transform> {
        self.nodes.get(node).map(|data| data.transform)
    }

    fn set_position_and_rotation(&mut self, node: NodeId, position: Vec3, rotation: Quat) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.transform.position = position;
            data.transform.rotation = rotation;
        }
    }

    fn set_local_scale(&mut self, node: NodeId, scale: Vec3) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.transform.scale = scale;
        }
    }

    fn name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node).map(|data| data.name.as_str())
    }

    fn set_name(&mut self, node: NodeId, name: &str) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.name = name.to_string();
        }
    }

    fn mark_persistent(&mut self, node: NodeId) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.flags.insert(NodeFlags::PERSISTENT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroy_removes_subtree() {
        let mut scene = SimpleScene::new();
        let root = scene.create_node("root");
        let child = scene.create_node("child");
        let grandchild = scene.create_node("grandchild");
        scene.set_parent(child, Some(root));
        scene.set_parent(grandchild, Some(child));

        scene.destroy(child);
        assert!(scene.exists(root));
        assert!(!scene.exists(child));
        assert!(!scene.exists(grandchild));
        assert!(scene.children(root).is_empty());
    }

    #[test]
    fn test_stale_id_does_not_alias_new_node() {
        let mut scene = SimpleScene::new();
        let first = scene.create_node("first");
        scene.destroy(first);
        let second = scene.create_node("second");

        assert!(!scene.exists(first));
        assert!(scene.exists(second));
        assert_ne!(first, second);
    }

    #[test]
    fn test_instantiate_copies_state() {
        let mut scene = SimpleScene::new();
        let template = scene.create_node("Bullet");
        let muzzle = scene.create_node("Muzzle");
        scene.set_parent(muzzle, Some(template));
        scene.set_local_scale(template, Vec3::new(2.0, 2.0, 2.0));

        let copy = scene.instantiate(template).expect("template exists");
        assert_eq!(scene.name(copy), Some("Bullet(Clone)"));
        assert!(scene.is_active(copy));
        assert_eq!(scene.parent(copy), None);
        assert_eq!(scene.transform(copy).map(|t| t.scale), Some(Vec3::new(2.0, 2.0, 2.0)));
        assert_eq!(scene.children(copy).len(), 1);
        assert_ne!(scene.children(copy)[0], muzzle);
    }

    #[test]
    fn test_instantiate_missing_template() {
        let mut scene = SimpleScene::new();
        let template = scene.create_node("gone");
        scene.destroy(template);
        assert!(scene.instantiate(template).is_none());
    }

    #[test]
    fn test_set_active_reports_transitions() {
        let mut scene = SimpleScene::new();
        let node = scene.create_node("node");
        assert!(!scene.set_active(node, true));
        assert!(scene.set_active(node, false));
        assert!(!scene.set_active(node, false));
        assert!(!scene.is_active(node));
    }

    #[test]
    fn test_reparent_rejects_cycles() {
        let mut scene = SimpleScene::new();
        let a = scene.create_node("a");
        let b = scene.create_node("b");
        scene.set_parent(b, Some(a));
        scene.set_parent(a, Some(b));
        assert_eq!(scene.parent(a), None);
        assert_eq!(scene.parent(b), Some(a));
    }

    #[test]
    fn test_unload_keeps_persistent_roots() {
        let mut scene = SimpleScene::new();
        let keep = scene.create_node("keep");
        let kept_child = scene.create_node("kept child");
        scene.set_parent(kept_child, Some(keep));
        scene.mark_persistent(keep);
        let doomed = scene.create_node("doomed");

        assert_eq!(scene.unload_scene(), 1);
        assert!(scene.exists(keep));
        assert!(scene.exists(kept_child));
        assert!(!scene.exists(doomed));
    }
}
