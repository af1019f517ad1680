//! # Structure Generation
//!
//! Builders for multi-voxel flora. A structure's footprint usually extends
//! past the chunk being generated, so builders never write voxels directly;
//! they emit a batch of `VoxelMod` records anchored at the surface voxel,
//! applied later by the world store once the affected chunks exist.

use std::collections::VecDeque;

use cgmath::Point3;

use crate::voxels::block::{BlockId, BlockIdSize};
use crate::voxels::VoxelMod;

use super::noise_field::NoiseField;

/// Horizontal reach of a tree canopy, in voxels from the trunk.
const CANOPY_RADIUS: i32 = 3;
/// Vertical extent of a tree canopy, in voxels from the trunk top.
const CANOPY_HEIGHT: i32 = 7;

/// The structure shapes a biome can place.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StructureKind {
    /// Wood trunk topped by a cube of leaves.
    Tree,
    /// Bare cactus column.
    Cactus,
}

/// Emits the structure's full footprint as `VoxelMod` records.
///
/// # Arguments
/// * `kind` - Which builder to run
/// * `noise` - The world's noise field; trunk height is noise-varied
/// * `anchor` - The surface voxel the structure grows from
/// * `min_trunk_height` / `max_trunk_height` - Height band for the trunk
/// * `mods` - Output batch the footprint is appended to
pub fn build(
    kind: StructureKind,
    noise: &NoiseField,
    anchor: Point3<i32>,
    min_trunk_height: i32,
    max_trunk_height: i32,
    mods: &mut VecDeque<VoxelMod>,
) {
    match kind {
        StructureKind::Tree => make_tree(noise, anchor, min_trunk_height, max_trunk_height, mods),
        StructureKind::Cactus => {
            make_cactus(noise, anchor, min_trunk_height, max_trunk_height, mods)
        }
    }
}

/// Picks a trunk height inside the band, varied by per-column noise.
fn trunk_height(
    noise: &NoiseField,
    anchor: Point3<i32>,
    min_trunk_height: i32,
    max_trunk_height: i32,
    offset: f64,
    scale: f64,
) -> i32 {
    let sampled =
        (max_trunk_height as f64 * noise.sample_2d(anchor.x as f64, anchor.z as f64, offset, scale))
            as i32;
    sampled.max(min_trunk_height)
}

fn make_tree(
    noise: &NoiseField,
    anchor: Point3<i32>,
    min_trunk_height: i32,
    max_trunk_height: i32,
    mods: &mut VecDeque<VoxelMod>,
) {
    let height = trunk_height(noise, anchor, min_trunk_height, max_trunk_height, 250.0, 3.0);

    for i in 1..height {
        mods.push_back(VoxelMod::new(
            Point3::new(anchor.x, anchor.y + i, anchor.z),
            BlockId::WOOD as BlockIdSize,
        ));
    }

    for x in -CANOPY_RADIUS..=CANOPY_RADIUS {
        for y in 0..CANOPY_HEIGHT {
            for z in -CANOPY_RADIUS..=CANOPY_RADIUS {
                mods.push_back(VoxelMod::new(
                    Point3::new(anchor.x + x, anchor.y + height + y, anchor.z + z),
                    BlockId::LEAVES as BlockIdSize,
                ));
            }
        }
    }
}

fn make_cactus(
    noise: &NoiseField,
    anchor: Point3<i32>,
    min_trunk_height: i32,
    max_trunk_height: i32,
    mods: &mut VecDeque<VoxelMod>,
) {
    let height = trunk_height(noise, anchor, min_trunk_height, max_trunk_height, 23456.0, 2.0);

    for i in 1..=height {
        mods.push_back(VoxelMod::new(
            Point3::new(anchor.x, anchor.y + i, anchor.z),
            BlockId::CACTUS as BlockIdSize,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(kind: StructureKind, anchor: Point3<i32>, min: i32, max: i32) -> Vec<VoxelMod> {
        let noise = NoiseField::new(1);
        let mut mods = VecDeque::new();
        build(kind, &noise, anchor, min, max, &mut mods);
        mods.into_iter().collect()
    }

    #[test]
    fn trees_are_a_trunk_under_a_canopy() {
        let anchor = Point3::new(100, 40, 100);
        let mods = collect(StructureKind::Tree, anchor, 5, 12);

        let trunk: Vec<_> = mods
            .iter()
            .filter(|m| m.id == BlockId::WOOD as BlockIdSize)
            .collect();
        let leaves: Vec<_> = mods
            .iter()
            .filter(|m| m.id == BlockId::LEAVES as BlockIdSize)
            .collect();

        assert_eq!(trunk.len() + leaves.len(), mods.len());
        assert_eq!(leaves.len(), (7 * 7 * 7) as usize);
        assert!(trunk.len() >= 4 && trunk.len() <= 11);

        for m in &trunk {
            assert_eq!(m.position.x, anchor.x);
            assert_eq!(m.position.z, anchor.z);
            assert!(m.position.y > anchor.y);
        }

        let canopy_base = anchor.y + trunk.len() as i32 + 1;
        for m in &leaves {
            assert!((m.position.x - anchor.x).abs() <= CANOPY_RADIUS);
            assert!((m.position.z - anchor.z).abs() <= CANOPY_RADIUS);
            assert!(m.position.y >= canopy_base);
            assert!(m.position.y < canopy_base + CANOPY_HEIGHT);
        }
    }

    #[test]
    fn cacti_are_bare_columns_inside_the_height_band() {
        let anchor = Point3::new(-7, 38, 19);
        let mods = collect(StructureKind::Cactus, anchor, 2, 5);

        assert!(mods.len() >= 2 && mods.len() <= 5);
        for (i, m) in mods.iter().enumerate() {
            assert_eq!(m.id, BlockId::CACTUS as BlockIdSize);
            assert_eq!(m.position.x, anchor.x);
            assert_eq!(m.position.z, anchor.z);
            assert_eq!(m.position.y, anchor.y + i as i32 + 1);
        }
    }

    #[test]
    fn builders_are_deterministic() {
        let anchor = Point3::new(64, 45, -32);
        let first = collect(StructureKind::Tree, anchor, 5, 12);
        let second = collect(StructureKind::Tree, anchor, 5, 12);
        assert_eq!(first, second);
    }

    #[test]
    fn trunk_height_respects_the_minimum() {
        let noise = NoiseField::new(9);
        for x in 0..32 {
            let anchor = Point3::new(x * 13, 40, x * -7);
            let height = trunk_height(&noise, anchor, 5, 12, 250.0, 3.0);
            assert!(height >= 5);
            assert!(height <= 12);
        }
    }
}
