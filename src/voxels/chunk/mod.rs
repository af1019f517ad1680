//! # Chunk Storage
//!
//! This module provides the `ChunkCoord` addressing type and the `ChunkData`
//! struct holding the voxel cells of one 16x128x16 column of the world.
//!
//! ## Memory Layout
//!
//! Chunk cells live in a single flat arena, row-major in x, then z, then y.
//! Neighbor voxels are never stored as links; callers resolve them by
//! recomputing (chunk coordinate, local index) through the world store, which
//! keeps chunk data free of cyclic references and trivially serializable.
//!
//! ## Coordinate Spaces
//!
//! Three coordinate spaces appear throughout the crate:
//! - **global voxel** coordinates: `Point3<i32>` over the whole world
//! - **chunk** coordinates: `ChunkCoord`, global voxel divided by chunk width
//! - **local** coordinates: `usize` triples inside one chunk's arena

use cgmath::Point3;
use serde::{Deserialize, Serialize};

use super::VoxelState;

/// The width and depth of a chunk in voxels.
pub const CHUNK_WIDTH: usize = 16;
/// The height of a chunk in voxels. Chunks span the full vertical world range.
pub const CHUNK_HEIGHT: usize = 128;
/// The number of voxels in a single horizontal slice of a chunk.
pub const CHUNK_PLANE_SIZE: usize = CHUNK_WIDTH * CHUNK_WIDTH;
/// The total number of voxels in a chunk.
pub const VOXELS_PER_CHUNK: usize = CHUNK_PLANE_SIZE * CHUNK_HEIGHT;

/// The width and depth of the world in chunks.
pub const WORLD_SIZE_IN_CHUNKS: i32 = 100;
/// The width and depth of the world in voxels.
pub const WORLD_SIZE_IN_VOXELS: i32 = WORLD_SIZE_IN_CHUNKS * CHUNK_WIDTH as i32;

/// Identifies a chunk's column position in the world, in chunk units.
///
/// Chunks span the full world height, so a coordinate is an (x,z) pair with
/// no vertical component. Equality and hashing are by component, making the
/// type usable directly as a map key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// Chunk column along the world X axis.
    pub x: i32,
    /// Chunk column along the world Z axis.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a chunk coordinate from its components.
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns the coordinate of the chunk containing the given global voxel
    /// position.
    ///
    /// Uses euclidean division so that negative positions map to the correct
    /// chunk rather than rounding toward zero.
    pub fn from_voxel(position: Point3<i32>) -> Self {
        Self {
            x: position.x.div_euclid(CHUNK_WIDTH as i32),
            z: position.z.div_euclid(CHUNK_WIDTH as i32),
        }
    }

    /// Returns the coordinate of the chunk containing the given continuous
    /// world-space position.
    pub fn from_global(position: Point3<f32>) -> Self {
        Self::from_voxel(Point3::new(
            position.x.floor() as i32,
            position.y.floor() as i32,
            position.z.floor() as i32,
        ))
    }

    /// Returns the global voxel position of this chunk's (0,0,0) corner.
    pub fn origin(&self) -> Point3<i32> {
        Point3::new(
            self.x * CHUNK_WIDTH as i32,
            0,
            self.z * CHUNK_WIDTH as i32,
        )
    }

    /// Checks whether this chunk lies inside the playable world area.
    ///
    /// The outermost ring of chunks is excluded so that every in-world chunk
    /// has generated neighbors on all four sides.
    pub fn is_in_world(&self) -> bool {
        self.x > 0
            && self.x < WORLD_SIZE_IN_CHUNKS - 1
            && self.z > 0
            && self.z < WORLD_SIZE_IN_CHUNKS - 1
    }
}

/// Checks whether a global voxel position lies inside the world volume.
///
/// Positions outside this volume are treated as air by every query path.
pub fn is_voxel_in_world(position: Point3<i32>) -> bool {
    position.x >= 0
        && position.x < WORLD_SIZE_IN_VOXELS
        && position.y >= 0
        && position.y < CHUNK_HEIGHT as i32
        && position.z >= 0
        && position.z < WORLD_SIZE_IN_VOXELS
}

/// Owns the voxel cells of one chunk.
///
/// `ChunkData` is pure storage: it has no knowledge of neighbors, lighting
/// rules, or meshes. Population, light propagation, and edits all run through
/// the world store, which holds these grids in a coordinate-keyed map.
pub struct ChunkData {
    /// The position of this chunk in chunk coordinates.
    pub coord: ChunkCoord,

    /// The flat cell arena, indexed x + z * width + y * width².
    cells: Box<[VoxelState]>,
}

impl ChunkData {
    /// Creates a new chunk with every cell set to air.
    ///
    /// # Arguments
    /// * `coord` - The chunk coordinates of the new chunk
    ///
    /// # Returns
    /// A `ChunkData` whose cells are all air with zero light.
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            cells: vec![VoxelState::default(); VOXELS_PER_CHUNK].into_boxed_slice(),
        }
    }

    fn index(x: usize, y: usize, z: usize) -> usize {
        x + z * CHUNK_WIDTH + y * CHUNK_PLANE_SIZE
    }

    /// Checks whether local coordinates fall inside the chunk arena.
    ///
    /// Takes signed coordinates so callers can probe one-past-the-edge
    /// neighbor positions without wrapping.
    pub fn is_voxel_in_chunk(x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && x < CHUNK_WIDTH as i32
            && y >= 0
            && y < CHUNK_HEIGHT as i32
            && z >= 0
            && z < CHUNK_WIDTH as i32
    }

    /// Returns a copy of the voxel at the given local coordinates.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the chunk.
    pub fn voxel(&self, x: usize, y: usize, z: usize) -> VoxelState {
        self.cells[Self::index(x, y, z)]
    }

    /// Overwrites the voxel at the given local coordinates.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the chunk.
    pub fn set_voxel(&mut self, x: usize, y: usize, z: usize, state: VoxelState) {
        self.cells[Self::index(x, y, z)] = state;
    }

    /// Sets the material id of the voxel at the given local coordinates,
    /// leaving orientation and light untouched.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the chunk.
    pub fn set_id(&mut self, x: usize, y: usize, z: usize, id: u8) {
        self.cells[Self::index(x, y, z)].id = id;
    }

    /// Sets the orientation of the voxel at the given local coordinates.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the chunk.
    pub fn set_orientation(&mut self, x: usize, y: usize, z: usize, orientation: u8) {
        self.cells[Self::index(x, y, z)].orientation = orientation;
    }

    /// Stores a raw light value into the voxel at the given local
    /// coordinates.
    ///
    /// This is plain storage with no propagation. Light floods and darkening
    /// are driven by the lighting pass, which owns the ordering of writes.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the chunk.
    pub fn set_light(&mut self, x: usize, y: usize, z: usize, light: u8) {
        self.cells[Self::index(x, y, z)].light = light;
    }

    /// Returns the whole cell arena, in layout order.
    ///
    /// Used by persistence to pack cell ids and orientations into a chunk
    /// record.
    pub fn voxels(&self) -> &[VoxelState] {
        &self.cells
    }

    /// Returns the whole cell arena mutably, in layout order.
    pub fn voxels_mut(&mut self) -> &mut [VoxelState] {
        &mut self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_coords_divide_toward_negative_infinity() {
        assert_eq!(
            ChunkCoord::from_voxel(Point3::new(0, 0, 0)),
            ChunkCoord::new(0, 0)
        );
        assert_eq!(
            ChunkCoord::from_voxel(Point3::new(15, 64, 15)),
            ChunkCoord::new(0, 0)
        );
        assert_eq!(
            ChunkCoord::from_voxel(Point3::new(16, 0, 31)),
            ChunkCoord::new(1, 1)
        );
        assert_eq!(
            ChunkCoord::from_voxel(Point3::new(-1, 0, -16)),
            ChunkCoord::new(-1, -1)
        );
    }

    #[test]
    fn global_positions_floor_before_dividing() {
        assert_eq!(
            ChunkCoord::from_global(Point3::new(-0.5, 10.0, 15.9)),
            ChunkCoord::new(-1, 0)
        );
        assert_eq!(
            ChunkCoord::from_global(Point3::new(31.99, 0.0, 32.0)),
            ChunkCoord::new(1, 2)
        );
    }

    #[test]
    fn origin_is_in_voxel_units() {
        let coord = ChunkCoord::new(3, -2);
        assert_eq!(coord.origin(), Point3::new(48, 0, -32));
    }

    #[test]
    fn world_border_chunks_are_not_in_world() {
        assert!(ChunkCoord::new(1, 1).is_in_world());
        assert!(ChunkCoord::new(50, 50).is_in_world());
        assert!(!ChunkCoord::new(0, 50).is_in_world());
        assert!(!ChunkCoord::new(WORLD_SIZE_IN_CHUNKS - 1, 50).is_in_world());
        assert!(!ChunkCoord::new(50, -3).is_in_world());
    }

    #[test]
    fn voxel_world_bounds_cover_the_full_height() {
        assert!(is_voxel_in_world(Point3::new(0, 0, 0)));
        assert!(is_voxel_in_world(Point3::new(
            WORLD_SIZE_IN_VOXELS - 1,
            CHUNK_HEIGHT as i32 - 1,
            WORLD_SIZE_IN_VOXELS - 1
        )));
        assert!(!is_voxel_in_world(Point3::new(-1, 0, 0)));
        assert!(!is_voxel_in_world(Point3::new(0, CHUNK_HEIGHT as i32, 0)));
        assert!(!is_voxel_in_world(Point3::new(0, 0, WORLD_SIZE_IN_VOXELS)));
    }

    #[test]
    fn cells_are_stored_row_major() {
        let mut chunk = ChunkData::new(ChunkCoord::new(0, 0));
        chunk.set_id(1, 0, 0, 3);
        chunk.set_id(0, 0, 1, 4);
        chunk.set_id(0, 1, 0, 5);

        assert_eq!(chunk.voxels()[1].id, 3);
        assert_eq!(chunk.voxels()[CHUNK_WIDTH].id, 4);
        assert_eq!(chunk.voxels()[CHUNK_PLANE_SIZE].id, 5);
        assert_eq!(chunk.voxel(1, 0, 0).id, 3);
        assert_eq!(chunk.voxel(0, 0, 1).id, 4);
        assert_eq!(chunk.voxel(0, 1, 0).id, 5);
    }

    #[test]
    fn new_chunks_are_unlit_air() {
        let chunk = ChunkData::new(ChunkCoord::new(2, 2));
        let cell = chunk.voxel(7, 60, 7);
        assert_eq!(cell.id, 0);
        assert_eq!(cell.light, 0);
    }

    #[test]
    fn field_writes_do_not_disturb_other_fields() {
        let mut chunk = ChunkData::new(ChunkCoord::new(0, 0));
        chunk.set_id(4, 4, 4, 9);
        chunk.set_orientation(4, 4, 4, 5);
        chunk.set_light(4, 4, 4, 12);

        let cell = chunk.voxel(4, 4, 4);
        assert_eq!(cell.id, 9);
        assert_eq!(cell.orientation, 5);
        assert_eq!(cell.light, 12);
    }
}
