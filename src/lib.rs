//! Marble Dash - A procedurally generated obstacle-course race
//!
//! Core modules:
//! - `sim`: Level generation, obstacle motion and run lifecycle (no rendering)
//! - `hud`: Timer and control-key display state
//! - `config`: Tunable level parameters, persisted as JSON
//! - `best_times`: Fastest-finish leaderboard

pub mod best_times;
pub mod config;
pub mod error;
pub mod hud;
pub mod sim;

pub use best_times::BestTimes;
pub use config::{GameConfig, SeedMode};
pub use error::{ClockError, ConfigError, LevelError, PhysicsError};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the render loop)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Distance between consecutive blocks along the travel axis
    pub const BLOCK_SPACING: f32 = 4.0;
    /// Floor tile footprint (square, x and z)
    pub const FLOOR_SIZE: f32 = 4.0;
    pub const FLOOR_THICKNESS: f32 = 0.2;

    /// Default level parameters
    pub const DEFAULT_BLOCK_COUNT: i64 = 5;
    pub const DEFAULT_SEED: u64 = 0;

    /// Limbo bar rests this far above its base when sin() == 0
    pub const LIMBO_BIAS: f32 = 1.4;
    /// Axe paddle swing half-width
    pub const AXE_AMPLITUDE: f32 = 1.25;
    /// Axe paddle hangs this far above its base
    pub const AXE_LIFT: f32 = 1.0;

    /// Bounce shared by every rigid body in the course
    pub const RESTITUTION: f32 = 0.2;
    /// Obstacles and walls are frictionless so the ball slides off them
    pub const SLIPPERY: f32 = 0.0;
    /// The floor collider grips
    pub const FLOOR_FRICTION: f32 = 1.0;

    /// Boundary walls
    pub const WALL_OFFSET_X: f32 = 2.15;
    pub const WALL_THICKNESS: f32 = 0.3;
    pub const WALL_HEIGHT: f32 = 1.5;
}

/// Position of the block at `index` along the travel axis, where index 0 is the
/// Start block and every following block sits one spacing further down -Z.
#[inline]
pub fn block_position(index: usize) -> Vec3 {
    Vec3::new(0.0, 0.0, -(index as f32) * consts::BLOCK_SPACING)
}

/// Format seconds with two decimals, the way the timer shows them
#[inline]
pub fn format_seconds(secs: f64) -> String {
    format!("{:.2}", secs)
}
