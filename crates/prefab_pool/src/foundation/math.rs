//! Math utilities and types
//!
//! Provides the transform types used for placement.

pub use nalgebra::{
    Vector3,
    Quaternion,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,
    
    /// Rotation quaternion
    pub rotation: Quat,
    
    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }
}

/// Unit scale on every axis
pub fn unit_scale() -> Vec3 {
    Vec3::new(1.0, 1.0, 1.0)
}

/// Build a rotation from euler angles in radians about the x, y and z axes
///
/// The world is y-up, so `euler.y` turns a node about the vertical axis.
pub fn quat_from_euler(euler: Vec3) -> Quat {
    Quat::from_euler_angles(euler.x, euler.y, euler.z)
}

/// Math utility functions
pub mod utils {
    /// Pi / 180
    pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;
    
    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * DEG_TO_RAD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    
    #[test]
    fn test_default_transform_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::zeros());
        assert_eq!(t.scale, unit_scale());
        assert_eq!(t.rotation, Quat::identity());
    }
    
    #[test]
    fn test_euler_matches_axis_rotation() {
        let quarter = utils::deg_to_rad(90.0);
        let about_z = quat_from_euler(Vec3::new(0.0, 0.0, quarter));
        assert_relative_eq!(about_z * Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);

        // Turning about the up axis keeps the height
        let about_y = quat_from_euler(Vec3::new(0.0, quarter, 0.0));
        assert_relative_eq!(about_y * Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }
}
