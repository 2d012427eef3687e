//! Physics collaborator boundary
//!
//! The physics engine lives outside this crate. The course only creates
//! bodies, writes next-tick kinematic poses, and removes bodies on teardown.

use std::collections::BTreeMap;
use std::fmt;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::geometry::{BodyDesc, BodyType};
use super::motion::Pose;
use crate::error::PhysicsError;

/// Opaque handle to a rigid body owned by the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the course needs from a physics engine
pub trait PhysicsWorld {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyId;

    /// Queue the pose a kinematic body should reach on the next step
    fn set_next_kinematic_pose(&mut self, id: BodyId, pose: Pose) -> Result<(), PhysicsError>;

    fn remove_body(&mut self, id: BodyId);
}

/// A body tracked by [`RecordingWorld`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBody {
    pub desc: BodyDesc,
    pub translation: Vec3,
    pub rotation: Quat,
    /// Number of kinematic pose writes received
    pub writes: u32,
}

/// In-memory world that applies kinematic writes directly.
/// Used for headless runs and tests.
#[derive(Debug, Default)]
pub struct RecordingWorld {
    bodies: BTreeMap<BodyId, RecordedBody>,
    next_id: u32,
}

impl RecordingWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(&self, id: BodyId) -> Option<&RecordedBody> {
        self.bodies.get(&id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> impl Iterator<Item = (&BodyId, &RecordedBody)> {
        self.bodies.iter()
    }
}

impl PhysicsWorld for RecordingWorld {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.insert(
            id,
            RecordedBody {
                desc: desc.clone(),
                translation: desc.position,
                rotation: desc.rotation,
                writes: 0,
            },
        );
        id
    }

    fn set_next_kinematic_pose(&mut self, id: BodyId, pose: Pose) -> Result<(), PhysicsError> {
        let body = self.bodies.get_mut(&id).ok_or(PhysicsError::UnknownBody(id))?;
        if body.desc.body_type != BodyType::KinematicPosition {
            return Err(PhysicsError::NotKinematic(id));
        }
        match pose {
            Pose::Rotation(q) => body.rotation = q,
            Pose::Translation(v) => body.translation = v,
        }
        body.writes += 1;
        Ok(())
    }

    fn remove_body(&mut self, id: BodyId) {
        self.bodies.remove(&id);
    }
}

/// A request for the host physics engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PhysicsCommand {
    Create { id: BodyId, desc: BodyDesc },
    SetPose { id: BodyId, pose: Pose },
    Remove { id: BodyId },
}

/// World that queues commands for an engine running elsewhere (the JS host).
/// Body ids are assigned here; the host creates bodies in command order.
#[derive(Debug, Default)]
pub struct CommandWorld {
    kinematic: BTreeMap<BodyId, bool>,
    commands: Vec<PhysicsCommand>,
    next_id: u32,
}

impl CommandWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued command, oldest first
    pub fn drain(&mut self) -> Vec<PhysicsCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn pending(&self) -> usize {
        self.commands.len()
    }
}

impl PhysicsWorld for CommandWorld {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.kinematic
            .insert(id, desc.body_type == BodyType::KinematicPosition);
        self.commands.push(PhysicsCommand::Create {
            id,
            desc: desc.clone(),
        });
        id
    }

    fn set_next_kinematic_pose(&mut self, id: BodyId, pose: Pose) -> Result<(), PhysicsError> {
        match self.kinematic.get(&id) {
            None => Err(PhysicsError::UnknownBody(id)),
            Some(false) => Err(PhysicsError::NotKinematic(id)),
            Some(true) => {
                self.commands.push(PhysicsCommand::SetPose { id, pose });
                Ok(())
            }
        }
    }

    fn remove_body(&mut self, id: BodyId) {
        if self.kinematic.remove(&id).is_some() {
            self.commands.push(PhysicsCommand::Remove { id });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Collider;

    fn desc(body_type: BodyType) -> BodyDesc {
        BodyDesc {
            body_type,
            position: Vec3::new(0.0, 0.3, -4.0),
            rotation: Quat::IDENTITY,
            colliders: vec![Collider::Hull],
            restitution: 0.2,
            friction: 0.0,
        }
    }

    #[test]
    fn test_kinematic_writes() {
        let mut world = RecordingWorld::new();
        let id = world.create_body(&desc(BodyType::KinematicPosition));

        let q = Quat::from_rotation_y(1.0);
        world.set_next_kinematic_pose(id, Pose::Rotation(q)).unwrap();
        let body = world.body(id).unwrap();
        assert_eq!(body.rotation, q);
        assert_eq!(body.translation, Vec3::new(0.0, 0.3, -4.0));
        assert_eq!(body.writes, 1);
    }

    #[test]
    fn test_rejects_fixed_and_missing() {
        let mut world = RecordingWorld::new();
        let fixed = world.create_body(&desc(BodyType::Fixed));
        let pose = Pose::Translation(Vec3::ONE);
        assert_eq!(
            world.set_next_kinematic_pose(fixed, pose),
            Err(PhysicsError::NotKinematic(fixed))
        );

        world.remove_body(fixed);
        assert!(world.is_empty());
        assert_eq!(
            world.set_next_kinematic_pose(fixed, pose),
            Err(PhysicsError::UnknownBody(fixed))
        );
    }

    #[test]
    fn test_command_world_queue() {
        let mut world = CommandWorld::new();
        let fixed = world.create_body(&desc(BodyType::Fixed));
        let moving = world.create_body(&desc(BodyType::KinematicPosition));
        assert_ne!(fixed, moving);

        let pose = Pose::Translation(Vec3::new(0.0, 1.4, -4.0));
        assert_eq!(
            world.set_next_kinematic_pose(fixed, pose),
            Err(PhysicsError::NotKinematic(fixed))
        );
        world.set_next_kinematic_pose(moving, pose).unwrap();
        world.remove_body(moving);
        world.remove_body(moving);

        let commands = world.drain();
        assert_eq!(commands.len(), 4);
        assert!(matches!(commands[0], PhysicsCommand::Create { id, .. } if id == fixed));
        assert_eq!(commands[2], PhysicsCommand::SetPose { id: moving, pose });
        assert_eq!(commands[3], PhysicsCommand::Remove { id: moving });
        assert_eq!(world.pending(), 0);
        assert_eq!(
            world.set_next_kinematic_pose(moving, pose),
            Err(PhysicsError::UnknownBody(moving))
        );
    }

    #[test]
    fn test_command_json_shape() {
        let json = serde_json::to_string(&PhysicsCommand::Remove { id: BodyId(3) }).unwrap();
        assert_eq!(json, r#"{"op":"remove","id":3}"#);
    }
}
