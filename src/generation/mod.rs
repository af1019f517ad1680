//! # Terrain Generation
//!
//! This module resolves what material occupies any voxel in the world. The
//! generator is deterministic: given a seed and a biome table, every voxel
//! position maps to exactly one block id, so chunks can be generated in any
//! order, discarded, and regenerated without drift.
//!
//! ## Generation Passes
//!
//! `voxel_at` runs a fixed pass pipeline per voxel:
//! 1. **Bounds**: outside the world volume is air; `y == 0` is bedrock.
//! 2. **Biome blend**: per-biome selection noise picks the dominant biome
//!    for the column and blends a terrain height from every biome whose
//!    weighted contribution is positive.
//! 3. **Basic terrain**: surface block at the terrain height, subsurface
//!    band below it, water up to sea level above it, stone underneath.
//! 4. **Lodes**: ore and cave rules rewrite stone. Rules run in declared
//!    order with no early exit, so the last matching rule wins.
//! 5. **Flora**: at surface voxels of flora biomes, two noise gates decide
//!    whether a structure batch is emitted for deferred application.
//!
//! Structure placement is the one side effect: footprints cross chunk
//! borders, so they are emitted as `VoxelMod` batches instead of being
//! written into the chunk being generated.

use std::collections::VecDeque;

use cgmath::Point3;

use crate::voxels::block::{BlockId, BlockIdSize};
use crate::voxels::chunk;
use crate::voxels::VoxelMod;

pub mod biome;
pub mod noise_field;
pub mod structures;

use biome::BiomeDefinition;
use noise_field::NoiseField;

/// The world height below which open terrain fills with water.
pub const SEA_LEVEL: i32 = 51;

/// Width of the subsurface band between the surface block and raw stone.
const SUBSURFACE_DEPTH: i32 = 4;

/// Deterministic voxel-material resolver for one world.
///
/// Owns the seeded noise field and the biome table. Shared immutably by
/// every component that needs generated terrain: chunk population, fallback
/// voxel queries, and spawn placement.
pub struct TerrainGenerator {
    noise: NoiseField,
    biomes: Vec<BiomeDefinition>,
}

impl TerrainGenerator {
    /// Creates a generator for the given seed and biome table.
    pub fn new(seed: i32, biomes: Vec<BiomeDefinition>) -> Self {
        Self {
            noise: NoiseField::new(seed),
            biomes,
        }
    }

    /// The biome table this generator draws from.
    pub fn biomes(&self) -> &[BiomeDefinition] {
        &self.biomes
    }

    /// Computes the blended terrain height and dominant biome for a column.
    ///
    /// Every biome contributes `terrain_height · terrain_noise · weight` to
    /// the blend; only positive contributions count toward the average. The
    /// dominant biome is the one with the highest selection weight, and its
    /// base height anchors the result.
    ///
    /// # Returns
    /// `(terrain_height, dominant_biome_index)` in world voxel units.
    pub fn terrain_height(&self, x: i32, z: i32) -> (i32, usize) {
        let mut sum_of_heights = 0.0f64;
        let mut count = 0u32;
        let mut strongest_weight = 0.0f64;
        let mut strongest_index = 0usize;

        for (index, biome) in self.biomes.iter().enumerate() {
            let weight = self
                .noise
                .sample_2d(x as f64, z as f64, biome.offset, biome.scale);
            if weight > strongest_weight {
                strongest_weight = weight;
                strongest_index = index;
            }

            let height = biome.terrain_height as f64
                * self
                    .noise
                    .sample_2d(x as f64, z as f64, 0.0, biome.terrain_scale)
                * weight;
            if height > 0.0 {
                sum_of_heights += height;
                count += 1;
            }
        }

        let dominant = &self.biomes[strongest_index];
        let blended = if count == 0 {
            0.0
        } else {
            sum_of_heights / count as f64
        };

        (
            blended.floor() as i32 + dominant.solid_ground_height,
            strongest_index,
        )
    }

    /// Resolves the block id at a global voxel position.
    ///
    /// Total over all of coordinate space: out-of-world positions are air.
    /// When the flora pass accepts a column, the structure's footprint is
    /// appended to `mods` for deferred application by the world store.
    pub fn voxel_at(&self, position: Point3<i32>, mods: &mut VecDeque<VoxelMod>) -> BlockIdSize {
        let y = position.y;

        if !chunk::is_voxel_in_world(position) {
            return BlockId::AIR as BlockIdSize;
        }
        if y == 0 {
            return BlockId::BEDROCK as BlockIdSize;
        }

        let (terrain_height, biome_index) = self.terrain_height(position.x, position.z);
        let biome = &self.biomes[biome_index];

        let mut voxel;
        if y == terrain_height {
            voxel = biome.surface_block;
        } else if y < terrain_height && y > terrain_height - SUBSURFACE_DEPTH {
            voxel = biome.subsurface_block;
        } else if y > terrain_height {
            if y < SEA_LEVEL {
                return BlockId::WATER as BlockIdSize;
            }
            return BlockId::AIR as BlockIdSize;
        } else {
            voxel = BlockId::STONE as BlockIdSize;
        }

        // Ore pass, stone only. No early exit: the last matching rule wins,
        // which lets cave rules carve through ore veins declared before them.
        if voxel == BlockId::STONE as BlockIdSize {
            for lode in &biome.lodes {
                if lode.contains_height(y)
                    && self
                        .noise
                        .sample_3d(position, lode.noise_offset, lode.scale, lode.threshold)
                {
                    voxel = lode.block_id;
                }
            }
        }

        if y == terrain_height {
            if let Some(flora) = &biome.flora {
                let in_zone = self.noise.sample_2d(
                    position.x as f64,
                    position.z as f64,
                    0.0,
                    flora.zone_scale,
                ) > flora.zone_threshold;
                let placed = in_zone
                    && self.noise.sample_2d(
                        position.x as f64,
                        position.z as f64,
                        0.0,
                        flora.placement_scale,
                    ) > flora.placement_threshold;

                if placed {
                    structures::build(
                        flora.kind,
                        &self.noise,
                        position,
                        flora.min_height,
                        flora.max_height,
                        mods,
                    );
                }
            }
        }

        voxel
    }
}
