//! Static geometry and rigid-body descriptors
//!
//! Everything the rendering and physics collaborators need to build a block,
//! expressed as plain data. Nothing here talks to a GPU or a physics engine.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Surface materials used by the course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Material {
    /// Start and finish floors (limegreen)
    FloorEnds,
    /// Obstacle block floors (greenyellow)
    FloorObstacle,
    /// Moving obstacles (orangered)
    Obstacle,
    /// Boundary walls (slategrey)
    Wall,
}

impl Material {
    /// Linear RGBA color for the material
    pub fn color(&self) -> [f32; 4] {
        match self {
            Material::FloorEnds => colors::LIMEGREEN,
            Material::FloorObstacle => colors::GREENYELLOW,
            Material::Obstacle => colors::ORANGERED,
            Material::Wall => colors::SLATEGREY,
        }
    }
}

/// CSS named colors, normalized to 0-1
pub mod colors {
    pub const LIMEGREEN: [f32; 4] = [50.0 / 255.0, 205.0 / 255.0, 50.0 / 255.0, 1.0];
    pub const GREENYELLOW: [f32; 4] = [173.0 / 255.0, 1.0, 47.0 / 255.0, 1.0];
    pub const ORANGERED: [f32; 4] = [1.0, 69.0 / 255.0, 0.0, 1.0];
    pub const SLATEGREY: [f32; 4] = [112.0 / 255.0, 128.0 / 255.0, 144.0 / 255.0, 1.0];
}

/// A unit box mesh placed in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshDesc {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl MeshDesc {
    pub fn boxed(position: Vec3, scale: Vec3, material: Material) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale,
            material,
            cast_shadow: false,
            receive_shadow: true,
        }
    }

    pub fn with_shadow(mut self) -> Self {
        self.cast_shadow = true;
        self
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Floating text drawn above the start and finish blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub position: Vec3,
    pub yaw: f32,
    pub scale: f32,
}

/// How a rigid body moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    /// Never moves
    Fixed,
    /// Pose written externally every tick, still collides
    KinematicPosition,
}

/// Collision shape attached to a rigid body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    /// Box with the given half-extents, offset from the body origin
    Cuboid { half_extents: Vec3, offset: Vec3 },
    /// Convex hull of the attached model (resolved by the physics host)
    Hull,
}

impl Collider {
    /// Cuboid matching a unit box mesh scaled by `scale`
    pub fn from_box(scale: Vec3, offset: Vec3) -> Self {
        Collider::Cuboid {
            half_extents: scale * 0.5,
            offset,
        }
    }
}

/// Everything the physics collaborator needs to create a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec3,
    pub rotation: Quat,
    pub colliders: Vec<Collider>,
    pub restitution: f32,
    pub friction: f32,
}

/// Per-instance data for a unit box, laid out for GPU upload
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl From<&MeshDesc> for InstanceRaw {
    fn from(mesh: &MeshDesc) -> Self {
        Self {
            model: mesh.model_matrix().to_cols_array_2d(),
            color: mesh.material.color(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_raw_layout() {
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 80);

        let mesh = MeshDesc::boxed(Vec3::new(1.0, 2.0, 3.0), Vec3::splat(2.0), Material::Wall);
        let raw = InstanceRaw::from(&mesh);
        // Translation lives in the last column
        assert_eq!(raw.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(raw.model[0][0], 2.0);
        assert_eq!(raw.color, colors::SLATEGREY);

        let bytes: &[u8] = bytemuck::cast_slice(std::slice::from_ref(&raw));
        assert_eq!(bytes.len(), 80);
    }

    #[test]
    fn test_box_collider_half_extents() {
        let c = Collider::from_box(Vec3::new(0.3, 0.3, 3.0), Vec3::ZERO);
        match c {
            Collider::Cuboid { half_extents, .. } => {
                assert_eq!(half_extents, Vec3::new(0.15, 0.15, 1.5))
            }
            Collider::Hull => panic!("expected cuboid"),
        }
    }
}
