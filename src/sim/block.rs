//! Block catalog
//!
//! Each block occupies one 4x4 cell along the -Z travel axis. A block is a
//! floor tile plus, for the obstacle variants, one kinematic body whose pose is
//! driven by [`super::motion`]. The start and finish blocks are static.

use std::f32::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;

use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{BodyDesc, BodyType, Collider, Label, Material, MeshDesc};
use super::motion::ObstacleMotion;
use crate::consts::*;
use crate::error::LevelError;

/// Moving obstacle variants, the only blocks that can fill interior slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    /// Bar spinning about the vertical axis
    Spinner,
    /// Bar bobbing up and down
    Limbo,
    /// Paddle swinging side to side
    Axe,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Spinner, ObstacleKind::Limbo, ObstacleKind::Axe];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Spinner => "spinner",
            ObstacleKind::Limbo => "limbo",
            ObstacleKind::Axe => "axe",
        }
    }
}

impl fmt::Display for ObstacleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObstacleKind {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spinner" => Ok(ObstacleKind::Spinner),
            "limbo" => Ok(ObstacleKind::Limbo),
            "axe" => Ok(ObstacleKind::Axe),
            "start" | "end" => Err(LevelError::NotAnInteriorVariant(s.to_string())),
            _ => Err(LevelError::UnknownVariant(s.to_string())),
        }
    }
}

/// Every block that can appear in a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Start,
    Obstacle(ObstacleKind),
    End,
}

/// Moving part of an obstacle block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub motion: ObstacleMotion,
    /// Kinematic body, created at its initial pose
    pub body: BodyDesc,
    /// Visual attached to the body (local to the body origin)
    pub mesh: MeshDesc,
}

/// A fully described block, ready to hand to the collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockInstance {
    pub kind: BlockKind,
    pub position: Vec3,
    pub meshes: Vec<MeshDesc>,
    pub labels: Vec<Label>,
    /// Static bodies (finish goal)
    pub fixed_bodies: Vec<BodyDesc>,
    pub obstacle: Option<ObstacleSpec>,
}

/// Build the block of `kind` at `position`. Obstacle variants draw their
/// random parameter from `rng` exactly once, here.
pub fn build_block<R: Rng + ?Sized>(kind: BlockKind, position: Vec3, rng: &mut R) -> BlockInstance {
    match kind {
        BlockKind::Start => block_start(position),
        BlockKind::End => block_end(position),
        BlockKind::Obstacle(ObstacleKind::Spinner) => block_spinner(position, rng),
        BlockKind::Obstacle(ObstacleKind::Limbo) => block_limbo(position, rng),
        BlockKind::Obstacle(ObstacleKind::Axe) => block_axe(position, rng),
    }
}

fn floor(position: Vec3, y: f32, material: Material) -> MeshDesc {
    MeshDesc::boxed(
        position + Vec3::new(0.0, y, 0.0),
        Vec3::new(FLOOR_SIZE, FLOOR_THICKNESS, FLOOR_SIZE),
        material,
    )
}

fn block_start(position: Vec3) -> BlockInstance {
    BlockInstance {
        kind: BlockKind::Start,
        position,
        meshes: vec![floor(position, 0.1, Material::FloorEnds)],
        labels: vec![Label {
            text: "Race Game 2024".to_string(),
            position: position + Vec3::new(0.75, 0.75, 0.0),
            yaw: -0.25,
            scale: 0.45,
        }],
        fixed_bodies: Vec::new(),
        obstacle: None,
    }
}

fn block_end(position: Vec3) -> BlockInstance {
    // Goal prop: convex hull of the model, resolved by the physics host
    let goal = BodyDesc {
        body_type: BodyType::Fixed,
        position: position + Vec3::new(0.0, 0.35, 0.0),
        rotation: Quat::IDENTITY,
        colliders: vec![Collider::Hull],
        restitution: RESTITUTION,
        friction: SLIPPERY,
    };

    BlockInstance {
        kind: BlockKind::End,
        position,
        meshes: vec![floor(position, 0.2, Material::FloorEnds)],
        labels: vec![Label {
            text: "FINISH".to_string(),
            position: position + Vec3::new(0.0, 2.25, 2.0),
            yaw: -0.25,
            scale: 1.0,
        }],
        fixed_bodies: vec![goal],
        obstacle: None,
    }
}

fn kinematic_bar(
    kind: ObstacleKind,
    position: Vec3,
    body_offset: Vec3,
    rotation: Quat,
    scale: Vec3,
    motion: ObstacleMotion,
) -> BlockInstance {
    let mesh = MeshDesc::boxed(Vec3::ZERO, scale, Material::Obstacle).with_shadow();
    let body = BodyDesc {
        body_type: BodyType::KinematicPosition,
        position: position + body_offset,
        rotation,
        colliders: vec![Collider::from_box(scale, Vec3::ZERO)],
        restitution: RESTITUTION,
        friction: SLIPPERY,
    };

    BlockInstance {
        kind: BlockKind::Obstacle(kind),
        position,
        meshes: vec![floor(position, 0.1, Material::FloorObstacle)],
        labels: Vec::new(),
        fixed_bodies: Vec::new(),
        obstacle: Some(ObstacleSpec { motion, body, mesh }),
    }
}

fn block_spinner<R: Rng + ?Sized>(position: Vec3, rng: &mut R) -> BlockInstance {
    let motion = ObstacleMotion::new(ObstacleKind::Spinner, position, rng);
    kinematic_bar(
        ObstacleKind::Spinner,
        position,
        Vec3::new(0.0, 0.3, 0.0),
        Quat::IDENTITY,
        Vec3::new(0.3, 0.3, 3.0),
        motion,
    )
}

fn block_limbo<R: Rng + ?Sized>(position: Vec3, rng: &mut R) -> BlockInstance {
    let motion = ObstacleMotion::new(ObstacleKind::Limbo, position, rng);
    // Starts high, the first pose write pulls it down into its band
    kinematic_bar(
        ObstacleKind::Limbo,
        position,
        Vec3::new(0.0, 5.0, 0.0),
        Quat::from_rotation_y(FRAC_PI_2),
        Vec3::new(0.3, 0.3, 3.0),
        motion,
    )
}

fn block_axe<R: Rng + ?Sized>(position: Vec3, rng: &mut R) -> BlockInstance {
    let motion = ObstacleMotion::new(ObstacleKind::Axe, position, rng);
    kinematic_bar(
        ObstacleKind::Axe,
        position,
        Vec3::ZERO,
        Quat::IDENTITY,
        Vec3::new(1.5, 1.5, 0.3),
        motion,
    )
}

/// Walls and floor collider enclosing a course `length` blocks long
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub length: usize,
    pub meshes: Vec<MeshDesc>,
    /// Side walls and end cap, frictionless
    pub walls: BodyDesc,
    /// Invisible floor plane under the whole course
    pub floor: BodyDesc,
}

pub fn build_bounds(length: usize) -> Bounds {
    let len = length as f32;
    let center_z = -(len * 2.0) + 2.0;
    let wall_y = WALL_HEIGHT / 2.0;

    let side = Vec3::new(WALL_THICKNESS, WALL_HEIGHT, FLOOR_SIZE * len);
    let cap = Vec3::new(FLOOR_SIZE, WALL_HEIGHT, WALL_THICKNESS);

    let right = MeshDesc::boxed(Vec3::new(WALL_OFFSET_X, wall_y, center_z), side, Material::Wall).with_shadow();
    let left = MeshDesc::boxed(Vec3::new(-WALL_OFFSET_X, wall_y, center_z), side, Material::Wall);
    let end_cap = MeshDesc::boxed(Vec3::new(0.0, wall_y, -(len * 4.0) + 2.0), cap, Material::Wall);

    let walls = BodyDesc {
        body_type: BodyType::Fixed,
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        colliders: [&right, &left, &end_cap]
            .iter()
            .map(|m| Collider::from_box(m.scale, m.position))
            .collect(),
        restitution: RESTITUTION,
        friction: SLIPPERY,
    };

    let floor_plane = BodyDesc {
        body_type: BodyType::Fixed,
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        colliders: vec![Collider::Cuboid {
            half_extents: Vec3::new(2.0, 0.1, 2.0 * len),
            offset: Vec3::new(0.0, 0.1, center_z),
        }],
        restitution: RESTITUTION,
        friction: FLOOR_FRICTION,
    };

    Bounds {
        length,
        meshes: vec![right, left, end_cap],
        walls,
        floor: floor_plane,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_parse_tags() {
        assert_eq!("spinner".parse::<ObstacleKind>(), Ok(ObstacleKind::Spinner));
        assert_eq!("Limbo".parse::<ObstacleKind>(), Ok(ObstacleKind::Limbo));
        assert_eq!("AXE".parse::<ObstacleKind>(), Ok(ObstacleKind::Axe));
        assert_eq!(
            "hammer".parse::<ObstacleKind>(),
            Err(LevelError::UnknownVariant("hammer".to_string()))
        );
        assert_eq!(
            "start".parse::<ObstacleKind>(),
            Err(LevelError::NotAnInteriorVariant("start".to_string()))
        );
        for kind in ObstacleKind::ALL {
            assert_eq!(kind.to_string().parse::<ObstacleKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_static_blocks_have_no_obstacle() {
        let mut rng = Pcg32::seed_from_u64(1);
        let start = build_block(BlockKind::Start, Vec3::ZERO, &mut rng);
        assert!(start.obstacle.is_none());
        assert!(start.fixed_bodies.is_empty());
        assert_eq!(start.meshes[0].position.y, 0.1);

        let end_pos = Vec3::new(0.0, 0.0, -16.0);
        let end = build_block(BlockKind::End, end_pos, &mut rng);
        assert!(end.obstacle.is_none());
        assert_eq!(end.fixed_bodies.len(), 1);
        assert_eq!(end.fixed_bodies[0].body_type, BodyType::Fixed);
        assert_eq!(end.fixed_bodies[0].colliders, vec![Collider::Hull]);
        assert_eq!(end.fixed_bodies[0].position, Vec3::new(0.0, 0.35, -16.0));
        assert_eq!(end.labels[0].text, "FINISH");
    }

    #[test]
    fn test_obstacle_blocks_are_kinematic() {
        let mut rng = Pcg32::seed_from_u64(2);
        let pos = Vec3::new(0.0, 0.0, -8.0);
        for kind in ObstacleKind::ALL {
            let block = build_block(BlockKind::Obstacle(kind), pos, &mut rng);
            let obstacle = block.obstacle.expect("obstacle block");
            assert_eq!(obstacle.body.body_type, BodyType::KinematicPosition);
            assert_eq!(obstacle.body.restitution, 0.2);
            assert_eq!(obstacle.body.friction, 0.0);
            assert_eq!(obstacle.motion.kind, kind);
            assert_eq!(obstacle.motion.base_position, pos);
            assert_eq!(block.meshes[0].material, Material::FloorObstacle);
        }
    }

    #[test]
    fn test_limbo_bar_is_turned() {
        let mut rng = Pcg32::seed_from_u64(2);
        let block = build_block(BlockKind::Obstacle(ObstacleKind::Limbo), Vec3::ZERO, &mut rng);
        let body = block.obstacle.expect("limbo").body;
        assert!(body.rotation.abs_diff_eq(Quat::from_rotation_y(FRAC_PI_2), 1e-6));
        assert_eq!(body.position, Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn test_bounds_geometry() {
        let bounds = build_bounds(5);
        assert_eq!(bounds.meshes.len(), 3);
        assert_eq!(bounds.meshes[0].position, Vec3::new(2.15, 0.75, -8.0));
        assert_eq!(bounds.meshes[1].position, Vec3::new(-2.15, 0.75, -8.0));
        assert_eq!(bounds.meshes[0].scale.z, 20.0);
        assert_eq!(bounds.meshes[2].position, Vec3::new(0.0, 0.75, -18.0));
        assert_eq!(bounds.walls.colliders.len(), 3);
        assert_eq!(bounds.walls.friction, 0.0);
        assert_eq!(
            bounds.floor.colliders,
            vec![Collider::Cuboid {
                half_extents: Vec3::new(2.0, 0.1, 10.0),
                offset: Vec3::new(0.0, 0.1, -8.0),
            }]
        );
        assert_eq!(bounds.floor.friction, 1.0);
        assert_eq!(bounds.floor.body_type, BodyType::Fixed);
    }
}
