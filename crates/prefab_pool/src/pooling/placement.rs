//! Placement requests
//!
//! A [`PlacementSpec`] says where an acquired instance goes: position,
//! rotation, scale and, optionally, a parent. Without a parent the pool falls
//! back to the global anchor node.

use crate::foundation::math::{quat_from_euler, unit_scale, Quat, Vec3};
use crate::scene::NodeId;

/// Immutable description of where a pooled instance should be placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementSpec {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    parent: Option<NodeId>,
}

impl PlacementSpec {
    /// Create a fully specified placement
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3, parent: Option<NodeId>) -> Self {
        Self { position, rotation, scale, parent }
    }
    
    /// Placement at a position with identity rotation and unit scale
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Quat::identity(), unit_scale(), None)
    }
    
    /// Placement at a position with a rotation and unit scale
    pub fn with_rotation(position: Vec3, rotation: Quat) -> Self {
        Self::new(position, rotation, unit_scale(), None)
    }
    
    /// Placement at a position with euler angles in radians
    pub fn with_euler(position: Vec3, euler: Vec3) -> Self {
        Self::with_rotation(position, quat_from_euler(euler))
    }
    
    /// Copy of this placement with a different scale
    #[must_use]
    pub fn scaled(self, scale: Vec3) -> Self {
        Self { scale, ..self }
    }
    
    /// Copy of this placement under an explicit parent
    #[must_use]
    pub fn parented(self, parent: NodeId) -> Self {
        Self { parent: Some(parent), ..self }
    }
    
    /// Target position
    pub fn position(&self) -> Vec3 {
        self.position
    }
    
    /// Target rotation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }
    
    /// Target scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }
    
    /// Explicit parent, if any
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

impl Default for PlacementSpec {
    fn default() -> Self {
        Self::at(Vec3::zeros())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::foundation::math::utils::deg_to_rad;
    
    #[test]
    fn test_defaults() {
        let spec = PlacementSpec::at(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(spec.rotation(), Quat::identity());
        assert_eq!(spec.scale(), Vec3::new(1.0, 1.0, 1.0));
        assert!(spec.parent().is_none());
    }
    
    #[test]
    fn test_euler_overload_composes_rotation() {
        let spec = PlacementSpec::with_euler(Vec3::zeros(), Vec3::new(0.0, deg_to_rad(90.0), 0.0));
        let forward = spec.rotation() * Vec3::new(0.0, 0.0, 1.0);
        assert_relative_eq!(forward, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
    }
    
    #[test]
    fn test_builders_leave_original_untouched() {
        let base = PlacementSpec::at(Vec3::zeros());
        let scaled = base.scaled(Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(base.scale(), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(scaled.scale(), Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(scaled.position(), base.position());
    }
}
