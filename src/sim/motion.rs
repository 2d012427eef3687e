//! Kinematic obstacle motion
//!
//! Obstacles are not simulated: every tick their pose is recomputed from the
//! shared elapsed time and one random parameter drawn when the obstacle is
//! created. No state is carried between ticks, so replaying the same elapsed
//! time always reproduces the same pose.

use std::f32::consts::TAU;

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::block::ObstacleKind;
use crate::consts::*;

/// Kinematic target for one body on one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Pose {
    /// Absolute orientation (position untouched)
    Rotation(Quat),
    /// Absolute world-space position (orientation untouched)
    Translation(Vec3),
}

/// Draw the per-instance parameter for a new obstacle.
///
/// Spinner: a direction of +1 or -1. The product of two draws is biased, so
/// +1 comes up only about a quarter of the time.
/// Limbo / Axe: an angular frequency in [0, 2π).
pub fn draw_random_param<R: Rng + ?Sized>(kind: ObstacleKind, rng: &mut R) -> f32 {
    match kind {
        ObstacleKind::Spinner => {
            let a: f32 = rng.random();
            let b: f32 = rng.random();
            if (a + 0.2) * b < 0.5 { -1.0 } else { 1.0 }
        }
        ObstacleKind::Limbo | ObstacleKind::Axe => rng.random::<f32>() * TAU,
    }
}

/// Yaw rotation for a spinner bar
#[inline]
pub fn spinner_rotation(elapsed: f32, speed: f32) -> Quat {
    Quat::from_euler(EulerRot::XYZ, 0.0, elapsed * speed, 0.0)
}

/// Vertical bob for a limbo bar
#[inline]
pub fn limbo_translation(base: Vec3, elapsed: f32, phase: f32) -> Vec3 {
    Vec3::new(base.x, base.y + (elapsed * phase).sin() + LIMBO_BIAS, base.z)
}

/// Side-to-side swing for an axe paddle
#[inline]
pub fn axe_translation(base: Vec3, elapsed: f32, phase: f32) -> Vec3 {
    Vec3::new(
        base.x + (elapsed * phase).sin() * AXE_AMPLITUDE,
        base.y + AXE_LIFT,
        base.z,
    )
}

/// Pose of an obstacle at `elapsed` seconds
pub fn pose(kind: ObstacleKind, base: Vec3, random_param: f32, elapsed: f32) -> Pose {
    match kind {
        ObstacleKind::Spinner => Pose::Rotation(spinner_rotation(elapsed, random_param)),
        ObstacleKind::Limbo => Pose::Translation(limbo_translation(base, elapsed, random_param)),
        ObstacleKind::Axe => Pose::Translation(axe_translation(base, elapsed, random_param)),
    }
}

/// Fixed per-instance motion record. `random_param` never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleMotion {
    pub kind: ObstacleKind,
    pub base_position: Vec3,
    random_param: f32,
}

impl ObstacleMotion {
    pub fn new<R: Rng + ?Sized>(kind: ObstacleKind, base_position: Vec3, rng: &mut R) -> Self {
        Self::with_param(kind, base_position, draw_random_param(kind, rng))
    }

    pub fn with_param(kind: ObstacleKind, base_position: Vec3, random_param: f32) -> Self {
        Self {
            kind,
            base_position,
            random_param,
        }
    }

    pub fn random_param(&self) -> f32 {
        self.random_param
    }

    #[inline]
    pub fn pose_at(&self, elapsed: f32) -> Pose {
        pose(self.kind, self.base_position, self.random_param, elapsed)
    }
}
