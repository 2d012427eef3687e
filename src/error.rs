//! Error types

use thiserror::Error;

use crate::sim::physics::BodyId;

/// Level configuration problems, raised when a layout is generated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("allowed block types must not be empty")]
    EmptyAllowedTypes,

    #[error("block count must be non-negative, got {0}")]
    NegativeCount(i64),

    #[error("block count {0} does not fit this platform")]
    CountTooLarge(i64),

    #[error("unknown block variant: {0:?}")]
    UnknownVariant(String),

    #[error("{0:?} cannot be placed inside a level (only spinner, limbo, axe)")]
    NotAnInteriorVariant(String),
}

/// Simulation clock problems
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ClockError {
    #[error("elapsed time is missing or not finite")]
    Missing,

    #[error("elapsed time went backwards: {previous} -> {current}")]
    NonMonotonic { previous: f32, current: f32 },
}

/// Failures reported by the physics collaborator for a single body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhysicsError {
    #[error("no rigid body with id {0}")]
    UnknownBody(BodyId),

    #[error("rigid body {0} is not kinematic")]
    NotKinematic(BodyId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid level: {0}")]
    Level(#[from] LevelError),

    #[error("seed must be a whole number between 0 and 2^53, got {0}")]
    InvalidSeed(f64),
}

pub type LevelResult<T> = std::result::Result<T, LevelError>;
