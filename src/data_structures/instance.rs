//! Per-instance world transforms for placed assets.
//!
//! One asset is drawn many times across the city grid; each copy is an
//! `Instance`, and `InstanceRaw` is the packed form a renderer uploads into
//! an instance buffer.

use cgmath::{One, SquareMatrix};

/// Per-instance transformation: position, rotation (as quaternion), and scale.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Instance {
    /// Identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Scale, then rotate, then translate.
    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn to_raw(&self) -> InstanceRaw {
        let world_matrix = self.to_matrix();
        InstanceRaw {
            model: world_matrix.into(),
            normal: cgmath::Matrix3::from(self.rotation).into(),
            handedness: world_matrix.determinant().signum(),
        }
    }
}

impl From<cgmath::Vector3<f32>> for Instance {
    fn from(position: cgmath::Vector3<f32>) -> Self {
        Instance {
            position,
            ..Default::default()
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

/**
 * The raw instance as it is laid out in an instance buffer: the 4x4 world
 * matrix, the 3x3 normal matrix and the sign of the world matrix determinant.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 3]; 3],
    pub handedness: f32,
}
