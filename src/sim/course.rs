//! Course: the generated level plus its live obstacles
//!
//! Owns everything the simulation loop touches each tick. Obstacle records are
//! plain data (motion parameters + body handle) evaluated by the stateless
//! pose function, so nothing is captured in per-frame callbacks.

use serde::{Deserialize, Serialize};

use super::clock::MonotonicGuard;
use super::level::{Level, LevelCache, LevelSpec, SeedMode};
use super::motion::{ObstacleMotion, Pose};
use super::physics::{BodyId, PhysicsWorld};
use super::run::{RunEvent, RunState};
use crate::error::{ClockError, LevelResult};

/// Live state of one obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleState {
    /// Index into `Level::blocks`
    pub block: usize,
    pub motion: ObstacleMotion,
    /// Backing kinematic body, once the physics world has created it
    pub body: Option<BodyId>,
}

/// Outcome of one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Poses handed to the physics world
    pub written: usize,
    /// Obstacles without a usable body this tick
    pub skipped: usize,
}

#[derive(Debug)]
pub struct Course {
    cache: LevelCache,
    seed_mode: SeedMode,
    obstacles: Vec<ObstacleState>,
    /// Walls, floor plane and finish goal
    static_bodies: Vec<BodyId>,
    guard: MonotonicGuard,
    pub run: RunState,
}

fn obstacle_states(level: &Level) -> Vec<ObstacleState> {
    level
        .blocks
        .iter()
        .enumerate()
        .filter_map(|(block, instance)| {
            instance.obstacle.as_ref().map(|o| ObstacleState {
                block,
                motion: o.motion,
                body: None,
            })
        })
        .collect()
}

impl Course {
    /// Generate the level for `spec`. Bodies are not created until
    /// [`Course::spawn_bodies`].
    pub fn new(spec: &LevelSpec, seed_mode: SeedMode) -> LevelResult<Self> {
        let cache = LevelCache::new(spec, seed_mode)?;
        let obstacles = obstacle_states(cache.level());
        Ok(Self {
            cache,
            seed_mode,
            obstacles,
            static_bodies: Vec::new(),
            guard: MonotonicGuard::new(),
            run: RunState::new(),
        })
    }

    pub fn level(&self) -> &Level {
        self.cache.level()
    }

    pub fn spec(&self) -> &LevelSpec {
        self.cache.key()
    }

    pub fn obstacles(&self) -> &[ObstacleState] {
        &self.obstacles
    }

    /// Incremented whenever the level is regenerated
    pub fn generation(&self) -> u64 {
        self.cache.generation()
    }

    /// Create every body the level needs. Obstacles that already have a body
    /// are left alone, so calling this twice is harmless.
    pub fn spawn_bodies<W: PhysicsWorld>(&mut self, world: &mut W) {
        let level = self.cache.level();

        if self.static_bodies.is_empty() {
            self.static_bodies.push(world.create_body(&level.bounds.walls));
            self.static_bodies.push(world.create_body(&level.bounds.floor));
            for desc in level.blocks.iter().flat_map(|b| b.fixed_bodies.iter()) {
                self.static_bodies.push(world.create_body(desc));
            }
        }

        let mut created = 0;
        for obstacle in self.obstacles.iter_mut().filter(|o| o.body.is_none()) {
            if let Some(spec) = &level.blocks[obstacle.block].obstacle {
                obstacle.body = Some(world.create_body(&spec.body));
                created += 1;
            }
        }

        log::info!(
            "Spawned {} static and {} kinematic bodies",
            self.static_bodies.len(),
            created
        );
    }

    /// Remove every body. Obstacle records stay with the level, so a later
    /// [`Course::spawn_bodies`] brings the course back as it was.
    pub fn despawn<W: PhysicsWorld>(&mut self, world: &mut W) {
        for id in self.static_bodies.drain(..) {
            world.remove_body(id);
        }
        for id in self.obstacles.iter_mut().filter_map(|o| o.body.take()) {
            world.remove_body(id);
        }
    }

    /// Pose of every obstacle at `elapsed`, paired with its body if spawned
    pub fn poses(&self, elapsed: f32) -> impl Iterator<Item = (Option<BodyId>, Pose)> + '_ {
        self.obstacles
            .iter()
            .map(move |o| (o.body, o.motion.pose_at(elapsed)))
    }

    /// Write every obstacle's kinematic pose for `elapsed` seconds.
    ///
    /// Runs in every phase, including after the finish. An obstacle whose body
    /// is missing or rejected is skipped for this tick only; a bad clock
    /// reading fails the whole tick before anything is written.
    pub fn tick<W: PhysicsWorld>(&mut self, elapsed: f32, world: &mut W) -> Result<TickReport, ClockError> {
        let elapsed = self.guard.check(elapsed)?;
        let mut report = TickReport::default();

        for obstacle in &self.obstacles {
            let Some(id) = obstacle.body else {
                report.skipped += 1;
                continue;
            };
            match world.set_next_kinematic_pose(id, obstacle.motion.pose_at(elapsed)) {
                Ok(()) => report.written += 1,
                Err(e) => {
                    log::debug!("Skipping obstacle in block {}: {}", obstacle.block, e);
                    report.skipped += 1;
                }
            }
        }

        Ok(report)
    }

    /// Reset the run. If `spec` differs from the current one the level is
    /// regenerated and all bodies are replaced before the next tick;
    /// otherwise the existing level and bodies are kept.
    /// Returns true when the level was regenerated.
    pub fn restart<W: PhysicsWorld>(&mut self, spec: &LevelSpec, world: &mut W) -> LevelResult<bool> {
        if !self.cache.refresh(spec, self.seed_mode)? {
            self.run.apply(RunEvent::Restart);
            return Ok(false);
        }

        self.despawn(world);
        self.obstacles = obstacle_states(self.cache.level());
        self.spawn_bodies(world);
        self.run.apply(RunEvent::Restart);
        Ok(true)
    }
}
