//! Procedural level generation
//!
//! A level is a Start block, `count` obstacle blocks picked at random from the
//! allowed list, and an End block, laid out one spacing apart down -Z and
//! enclosed by walls `count + 2` blocks long.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::block::{BlockInstance, BlockKind, Bounds, ObstacleKind, build_block, build_bounds};
use super::geometry::InstanceRaw;
use crate::block_position;
use crate::consts::*;
use crate::error::{LevelError, LevelResult};

/// How `LevelSpec::seed` feeds the random draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedMode {
    /// The seed seeds the generator: same parameters, same level
    #[default]
    Deterministic,
    /// The seed only forces regeneration; draws come from OS entropy
    Reroll,
}

impl SeedMode {
    pub fn rng(&self, seed: u64) -> Pcg32 {
        match self {
            SeedMode::Deterministic => Pcg32::seed_from_u64(seed),
            SeedMode::Reroll => Pcg32::from_rng(&mut rand::rng()),
        }
    }
}

/// The externally tunable generator inputs. Any change regenerates the level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSpec {
    /// Number of obstacle blocks between start and finish
    pub count: i64,
    /// Variant tags obstacles are drawn from ("spinner", "limbo", "axe")
    pub allowed_types: Vec<String>,
    /// Regeneration key (and generator seed in deterministic mode)
    pub seed: u64,
}

impl Default for LevelSpec {
    fn default() -> Self {
        Self {
            count: DEFAULT_BLOCK_COUNT,
            allowed_types: ObstacleKind::ALL.iter().map(|k| k.as_str().to_string()).collect(),
            seed: DEFAULT_SEED,
        }
    }
}

impl LevelSpec {
    pub fn new(count: i64, allowed: &[ObstacleKind], seed: u64) -> Self {
        Self {
            count,
            allowed_types: allowed.iter().map(|k| k.as_str().to_string()).collect(),
            seed,
        }
    }

    /// Check the parameters and resolve their tags
    pub fn validate(&self) -> LevelResult<(usize, Vec<ObstacleKind>)> {
        if self.count < 0 {
            return Err(LevelError::NegativeCount(self.count));
        }
        if self.allowed_types.is_empty() {
            return Err(LevelError::EmptyAllowedTypes);
        }
        let allowed = self
            .allowed_types
            .iter()
            .map(|tag| tag.parse::<ObstacleKind>())
            .collect::<LevelResult<Vec<_>>>()?;
        let count = usize::try_from(self.count).map_err(|_| LevelError::CountTooLarge(self.count))?;
        Ok((count, allowed))
    }
}

/// One interior position in the level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockSlot {
    pub index: usize,
    pub position: Vec3,
    pub variant: ObstacleKind,
}

/// Placement data for a generated level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub count: usize,
    pub allowed_types: Vec<ObstacleKind>,
    pub seed: u64,
    pub slots: Vec<BlockSlot>,
    /// Wall enclosure length in blocks (start + interior + end)
    pub bounds_length: usize,
}

impl LevelLayout {
    pub fn start_position(&self) -> Vec3 {
        block_position(0)
    }

    pub fn end_position(&self) -> Vec3 {
        block_position(self.count + 1)
    }

    /// All blocks in travel order, start and end included
    pub fn blocks(&self) -> impl Iterator<Item = (BlockKind, Vec3)> + '_ {
        std::iter::once((BlockKind::Start, self.start_position()))
            .chain(self.slots.iter().map(|s| (BlockKind::Obstacle(s.variant), s.position)))
            .chain(std::iter::once((BlockKind::End, self.end_position())))
    }
}

/// Draw a layout. Each slot consumes one draw from `rng`, in index order.
pub fn generate<R: Rng + ?Sized>(
    count: usize,
    allowed_types: &[ObstacleKind],
    seed: u64,
    rng: &mut R,
) -> LevelResult<LevelLayout> {
    if allowed_types.is_empty() {
        return Err(LevelError::EmptyAllowedTypes);
    }

    let slots = (0..count)
        .map(|index| BlockSlot {
            index,
            position: block_position(index + 1),
            variant: allowed_types[rng.random_range(0..allowed_types.len())],
        })
        .collect();

    Ok(LevelLayout {
        count,
        allowed_types: allowed_types.to_vec(),
        seed,
        slots,
        bounds_length: count + 2,
    })
}

/// Validate `spec` and draw a layout from it
pub fn generate_from_spec<R: Rng + ?Sized>(spec: &LevelSpec, rng: &mut R) -> LevelResult<LevelLayout> {
    let (count, allowed) = spec.validate()?;
    generate(count, &allowed, spec.seed, rng)
}

/// A generated level with every block instantiated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub layout: LevelLayout,
    pub blocks: Vec<BlockInstance>,
    pub bounds: Bounds,
}

impl Level {
    /// Draw the layout, then each obstacle's parameter, from one generator
    pub fn generate(spec: &LevelSpec, mode: SeedMode) -> LevelResult<Self> {
        let mut rng = mode.rng(spec.seed);
        let layout = generate_from_spec(spec, &mut rng)?;
        let level = Self::instantiate(layout, &mut rng);

        log::info!(
            "Generated level: {} obstacles {:?}, seed {} ({:?})",
            level.layout.count,
            level.layout.slots.iter().map(|s| s.variant.as_str()).collect::<Vec<_>>(),
            spec.seed,
            mode
        );
        Ok(level)
    }

    pub fn instantiate<R: Rng + ?Sized>(layout: LevelLayout, rng: &mut R) -> Self {
        let blocks = layout
            .blocks()
            .map(|(kind, position)| build_block(kind, position, rng))
            .collect();
        let bounds = build_bounds(layout.bounds_length);
        Self {
            layout,
            blocks,
            bounds,
        }
    }

    /// Static meshes (floors and walls) as GPU instance data
    pub fn static_instances(&self) -> Vec<InstanceRaw> {
        self.blocks
            .iter()
            .flat_map(|b| b.meshes.iter())
            .chain(self.bounds.meshes.iter())
            .map(InstanceRaw::from)
            .collect()
    }
}

/// Memoized level, regenerated only when its `LevelSpec` changes
#[derive(Debug, Clone)]
pub struct LevelCache {
    key: LevelSpec,
    level: Level,
    /// Bumped on every regeneration
    generation: u64,
}

impl LevelCache {
    pub fn new(spec: &LevelSpec, mode: SeedMode) -> LevelResult<Self> {
        Ok(Self {
            key: spec.clone(),
            level: Level::generate(spec, mode)?,
            generation: 1,
        })
    }

    /// Regenerate if `spec` differs from the cached key. Returns true when a
    /// fresh level was generated. On error the cached level is kept.
    pub fn refresh(&mut self, spec: &LevelSpec, mode: SeedMode) -> LevelResult<bool> {
        if &self.key == spec {
            return Ok(false);
        }
        self.level = Level::generate(spec, mode)?;
        self.key = spec.clone();
        self.generation += 1;
        Ok(true)
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn key(&self) -> &LevelSpec {
        &self.key
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
