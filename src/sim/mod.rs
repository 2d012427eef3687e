//! Simulation module
//!
//! Level generation, obstacle motion and the run lifecycle. Rendering and
//! rigid-body physics live outside; this module only describes what to build
//! and which kinematic poses to apply each tick.
//! - Obstacle poses are pure functions of elapsed time
//! - Seeded RNG by default
//! - Stable iteration order (travel order along the course)

pub mod block;
pub mod clock;
pub mod course;
pub mod geometry;
pub mod level;
pub mod motion;
pub mod physics;
pub mod run;

pub use block::{BlockInstance, BlockKind, Bounds, ObstacleKind, build_block, build_bounds};
pub use clock::{MonotonicGuard, SimClock};
pub use course::{Course, ObstacleState, TickReport};
pub use geometry::{BodyDesc, BodyType, Collider, InstanceRaw, Material, MeshDesc};
pub use level::{BlockSlot, Level, LevelCache, LevelLayout, LevelSpec, SeedMode, generate};
pub use motion::{ObstacleMotion, Pose, pose};
pub use physics::{BodyId, CommandWorld, PhysicsCommand, PhysicsWorld, RecordingWorld};
pub use run::{RunEvent, RunPhase, RunState};
