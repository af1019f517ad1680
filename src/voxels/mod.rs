//! # Voxel Core
//!
//! This module contains the core voxel data model: the per-cell state record,
//! deferred modification records, face/direction tables, the block registry,
//! and the chunk grid that owns the cells.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Defines voxel material types, properties, and face templates
//! * **VoxelFace**: Face indexing, neighbor direction vectors, and the
//!   orientation remap tables used by the mesher
//! * **Chunk**: Fixed-size 3D grids of voxel state, addressed by chunk coordinate
//! * **World**: Coordinates chunks, lazy load-or-generate, edits, and scheduling
//!
//! ## Data Flow
//!
//! 1. The world receives requests for voxel access or modification
//! 2. The world delegates to the owning chunk (loading or generating if necessary)
//! 3. Changes trigger light repair and enqueue the chunk for mesh rebuild
//! 4. Completed meshes are handed off to the renderer through the scheduler
//!
//! ## Thread Safety
//!
//! Cells are plain `Copy` data; all cross-thread sharing happens one level up,
//! where the whole world store lives behind an [`MtResource`](crate::core::MtResource).

use cgmath::Point3;

pub mod block;
pub mod chunk;
pub mod voxel_face;
pub mod world;

/// The maximum light level a voxel can hold or receive.
pub const MAX_LIGHT_LEVEL: u8 = 15;

/// One light level expressed as a fraction for shader consumption.
///
/// Light levels are 0..=15 but are normalized over 16 steps, so even a fully
/// lit voxel stays fractionally below 1.0.
pub const UNIT_OF_LIGHT: f32 = 1.0 / 16.0;

/// The orientation value meaning "facing north", which is the identity
/// rotation. Voxels written by generation always get this value.
pub const DEFAULT_ORIENTATION: u8 = 1;

/// Per-cell voxel record.
///
/// This is deliberately tiny and `Copy`: every lookup through the world store
/// returns it by value, and neighbors are always resolved by recomputing
/// global coordinates rather than chasing stored references.
///
/// # Invariants
/// - `light` never exceeds [`MAX_LIGHT_LEVEL`]; the light engine is the only
///   writer and clamps at the source.
/// - `id` 0 always means air.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VoxelState {
    /// Material id, an index into the block registry.
    pub id: u8,
    /// Discrete rotation for directional blocks: 0 south, 1 north, 4 east,
    /// 5 west. Values outside that set behave as north.
    pub orientation: u8,
    /// Current light level, 0..=15.
    pub light: u8,
}

impl VoxelState {
    /// Creates a voxel of the given material with default orientation and no light.
    pub fn new(id: u8) -> Self {
        Self {
            id,
            orientation: DEFAULT_ORIENTATION,
            light: 0,
        }
    }

    /// The light level this voxel can pass on to a neighbor.
    ///
    /// Light attenuates by 1 per step plus the voxel's own opacity, and never
    /// goes below zero.
    pub fn cast_light(&self) -> u8 {
        let level = self.light as i16 - block::properties(self.id).opacity as i16 - 1;
        level.max(0) as u8
    }

    /// The light level as a normalized fraction for vertex colors.
    pub fn light_as_float(&self) -> f32 {
        self.light as f32 * UNIT_OF_LIGHT
    }
}

impl Default for VoxelState {
    fn default() -> Self {
        Self::new(0)
    }
}

/// A deferred voxel write, queued when generation places a structure whose
/// footprint extends beyond the voxel currently being resolved.
///
/// Mods are collected per populated chunk and consumed exactly once by the
/// world store's modification-application pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VoxelMod {
    /// Global voxel position of the write.
    pub position: Point3<i32>,
    /// Material id to write.
    pub id: u8,
}

impl VoxelMod {
    /// Creates a new deferred write record.
    pub fn new(position: Point3<i32>, id: u8) -> Self {
        Self { position, id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cast_light_attenuates_and_clamps() {
        let mut voxel = VoxelState::new(0); // air, opacity 0
        voxel.light = 15;
        assert_eq!(voxel.cast_light(), 14);

        voxel.light = 1;
        assert_eq!(voxel.cast_light(), 0, "cast light never goes negative");

        voxel.id = 2; // stone, fully opaque
        voxel.light = 15;
        assert_eq!(voxel.cast_light(), 0);
    }

    #[test]
    fn light_as_float_uses_sixteen_steps() {
        let mut voxel = VoxelState::new(0);
        voxel.light = MAX_LIGHT_LEVEL;
        assert!((voxel.light_as_float() - 15.0 / 16.0).abs() < f32::EPSILON);
    }

    #[test]
    fn new_voxels_face_north() {
        assert_eq!(VoxelState::new(3).orientation, DEFAULT_ORIENTATION);
    }
}
