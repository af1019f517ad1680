//! # Biome Definitions
//!
//! Static biome parameters driving terrain generation: selection noise,
//! terrain height contribution, surface materials, ore lode rules, and flora
//! placement. Definitions reference blocks by registry name and resolve them
//! to ids once, at table construction.

use crate::voxels::block::{block_id_by_name, BlockIdSize};

use super::structures::StructureKind;

/// One ore/cave carving rule, applied to stone voxels only.
///
/// Rules are evaluated in declared order with no early exit, so a later rule
/// overwrites an earlier one wherever both match. Biome tables rely on this
/// to let cave carving punch through ore veins.
#[derive(Clone, Debug)]
pub struct Lode {
    /// Display name, for logs and debugging.
    pub name: &'static str,
    /// The block id this rule writes where it matches.
    pub block_id: BlockIdSize,
    /// Exclusive lower bound of the affected height band.
    pub min_height: i32,
    /// Exclusive upper bound of the affected height band.
    pub max_height: i32,
    /// 3D noise frequency.
    pub scale: f64,
    /// Normalized noise value above which the rule matches.
    pub threshold: f64,
    /// Decorrelates this rule's noise from every other rule.
    pub noise_offset: f64,
}

impl Lode {
    /// Checks whether a world height falls inside this rule's band.
    pub fn contains_height(&self, y: i32) -> bool {
        y > self.min_height && y < self.max_height
    }
}

/// Flora placement parameters for a biome that grows structures.
#[derive(Clone, Debug)]
pub struct FloraSettings {
    /// Which structure builder to run at accepted columns.
    pub kind: StructureKind,
    /// Frequency of the coarse "can flora grow here at all" gate.
    pub zone_scale: f64,
    /// Zone gate threshold in [0,1]; higher means sparser flora regions.
    pub zone_threshold: f64,
    /// Frequency of the per-column placement gate.
    pub placement_scale: f64,
    /// Placement gate threshold in [0,1]; higher means fewer individuals.
    pub placement_threshold: f64,
    /// Minimum trunk height of placed structures.
    pub min_height: i32,
    /// Maximum trunk height of placed structures.
    pub max_height: i32,
}

/// Static parameters of one biome.
///
/// Immutable after construction; the generator holds the table for the
/// world's lifetime and selects a dominant biome per column by selection
/// noise.
#[derive(Clone, Debug)]
pub struct BiomeDefinition {
    /// Display name, for logs and debugging.
    pub name: &'static str,
    /// Selection noise offset; must differ between biomes so their weight
    /// fields decorrelate.
    pub offset: f64,
    /// Selection noise scale.
    pub scale: f64,
    /// Base terrain height, before any noise contribution.
    pub solid_ground_height: i32,
    /// Maximum height this biome's terrain noise adds on top of the base.
    pub terrain_height: i32,
    /// Terrain noise scale.
    pub terrain_scale: f64,
    /// Block id emitted at the terrain surface.
    pub surface_block: BlockIdSize,
    /// Block id emitted in the 3-voxel band below the surface.
    pub subsurface_block: BlockIdSize,
    /// Flora placement, or `None` for biomes that grow nothing.
    pub flora: Option<FloraSettings>,
    /// Ore/cave rules, evaluated in order with last-match-wins semantics.
    pub lodes: Vec<Lode>,
}

/// Resolves a block name through the registry, substituting air on a miss.
fn block_or_air(name: &'static str) -> BlockIdSize {
    match block_id_by_name(name) {
        Some(id) => id,
        None => {
            log::error!("Unknown block name {:?} in biome table, substituting air", name);
            0
        }
    }
}

/// The lode rules shared by every built-in biome.
///
/// The cave rule is declared last: it writes air, and later rules overwrite
/// earlier ones, so caves cut through dirt pockets and sand seams.
fn standard_lodes() -> Vec<Lode> {
    vec![
        Lode {
            name: "Dirt",
            block_id: block_or_air("dirt"),
            min_height: 1,
            max_height: crate::voxels::chunk::CHUNK_HEIGHT as i32,
            scale: 0.1,
            threshold: 0.45,
            noise_offset: 0.0,
        },
        Lode {
            name: "Sand",
            block_id: block_or_air("sand"),
            min_height: 30,
            max_height: 60,
            scale: 0.2,
            threshold: 0.6,
            noise_offset: 500.0,
        },
        Lode {
            name: "Caves",
            block_id: block_or_air("air"),
            min_height: 5,
            max_height: 60,
            scale: 0.08,
            threshold: 0.55,
            noise_offset: 43534.0,
        },
    ]
}

/// Builds the default biome table: grasslands, forest, and desert.
pub fn default_biomes() -> Vec<BiomeDefinition> {
    vec![
        BiomeDefinition {
            name: "Grasslands",
            offset: 1213.0,
            scale: 0.2,
            solid_ground_height: 42,
            terrain_height: 12,
            terrain_scale: 0.25,
            surface_block: block_or_air("grass"),
            subsurface_block: block_or_air("dirt"),
            flora: None,
            lodes: standard_lodes(),
        },
        BiomeDefinition {
            name: "Forest",
            offset: 517.0,
            scale: 0.18,
            solid_ground_height: 44,
            terrain_height: 22,
            terrain_scale: 0.3,
            surface_block: block_or_air("grass"),
            subsurface_block: block_or_air("dirt"),
            flora: Some(FloraSettings {
                kind: StructureKind::Tree,
                zone_scale: 1.3,
                zone_threshold: 0.6,
                placement_scale: 15.0,
                placement_threshold: 0.8,
                min_height: 5,
                max_height: 12,
            }),
            lodes: standard_lodes(),
        },
        BiomeDefinition {
            name: "Desert",
            offset: 6545.0,
            scale: 0.16,
            solid_ground_height: 40,
            terrain_height: 8,
            terrain_scale: 0.15,
            surface_block: block_or_air("sand"),
            subsurface_block: block_or_air("sand"),
            flora: Some(FloraSettings {
                kind: StructureKind::Cactus,
                zone_scale: 1.06,
                zone_threshold: 0.666,
                placement_scale: 23.0,
                placement_threshold: 0.8,
                min_height: 2,
                max_height: 5,
            }),
            lodes: standard_lodes(),
        },
    ]
}
