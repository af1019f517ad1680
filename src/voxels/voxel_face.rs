//! # Voxel Face Module
//!
//! This module defines the six faces of a voxel and the direction/rotation
//! tables built on top of them. Face indices are load-bearing: the block
//! registry's per-face texture ids, the mesher's neighbor checks, and the
//! orientation remapping all use the same ordering.
//!
//! The order is: [BACK, FRONT, TOP, BOTTOM, LEFT, RIGHT], with "front"
//! facing positive Z (north).

use cgmath::Vector3;

/// Represents the six possible faces of a voxel.
///
/// Each variant is assigned the integer value used for per-face texture
/// lookup and neighbor indexing.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum VoxelFace {
    /// The back face (facing negative Z, south).
    BACK = 0,

    /// The front face (facing positive Z, north).
    FRONT = 1,

    /// The top face (facing positive Y).
    TOP = 2,

    /// The bottom face (facing negative Y).
    BOTTOM = 3,

    /// The left face (facing negative X, west).
    LEFT = 4,

    /// The right face (facing positive X, east).
    RIGHT = 5,
}

/// Direction vector for each face, indexed by `VoxelFace as usize`.
///
/// Adding a face's entry to a voxel's global position yields the position of
/// the neighbor across that face.
pub static FACE_CHECKS: [Vector3<i32>; 6] = [
    Vector3::new(0, 0, -1),
    Vector3::new(0, 0, 1),
    Vector3::new(0, 1, 0),
    Vector3::new(0, -1, 0),
    Vector3::new(-1, 0, 0),
    Vector3::new(1, 0, 0),
];

/// For each face index, the index of the opposite face.
///
/// `FACE_CHECKS[i] + FACE_CHECKS[REV_FACE_CHECK_INDEX[i]] == 0` for all `i`.
pub static REV_FACE_CHECK_INDEX: [usize; 6] = [1, 0, 3, 2, 5, 4];

/// Face-index remap table per orientation value.
///
/// Row `orientation`, column `face` gives the face whose *neighbor* must be
/// consulted when meshing `face` of a voxel with that orientation: rotating a
/// block visually also rotates which world direction each of its side faces
/// points at. Top and bottom are unaffected by yaw. Orientations other than
/// 0/4/5 (including the default 1, north) are the identity.
static FACE_ROTATION_MAP: [[usize; 6]; 6] = [
    [1, 0, 2, 3, 5, 4], // 0: south, 180 degrees
    [0, 1, 2, 3, 4, 5], // 1: north, identity
    [0, 1, 2, 3, 4, 5], // 2: unused vertical slot
    [0, 1, 2, 3, 4, 5], // 3: unused vertical slot
    [4, 5, 2, 3, 1, 0], // 4: east, 90 degrees
    [5, 4, 2, 3, 0, 1], // 5: west, 270 degrees
];

impl VoxelFace {
    /// Returns all six faces in index order.
    pub fn all() -> [VoxelFace; 6] {
        [
            VoxelFace::BACK,
            VoxelFace::FRONT,
            VoxelFace::TOP,
            VoxelFace::BOTTOM,
            VoxelFace::LEFT,
            VoxelFace::RIGHT,
        ]
    }

    /// The outward direction of this face.
    pub fn direction(self) -> Vector3<i32> {
        FACE_CHECKS[self as usize]
    }

    /// The face on the opposite side of the voxel.
    pub fn opposite(self) -> VoxelFace {
        VoxelFace::all()[REV_FACE_CHECK_INDEX[self as usize]]
    }
}

/// Remaps a face index for a voxel's orientation.
///
/// Out-of-range orientation values (corrupt data) behave as north.
pub fn translated_face_index(orientation: u8, face: usize) -> usize {
    let row = FACE_ROTATION_MAP
        .get(orientation as usize)
        .unwrap_or(&FACE_ROTATION_MAP[1]);
    row[face]
}

/// The yaw, in degrees, applied to a voxel's vertices for its orientation.
///
/// Matches the orientation encoding used in [`translated_face_index`]:
/// 0 south, 1 north, 4 east, 5 west. Unknown values rotate like north.
pub fn orientation_yaw(orientation: u8) -> f32 {
    match orientation {
        0 => 180.0,
        4 => 90.0,
        5 => 270.0,
        _ => 0.0,
    }
}
