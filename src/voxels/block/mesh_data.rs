//! # Block Mesh Data
//!
//! Face templates for the unit cube, plus the texture atlas UV math used by
//! the chunk mesher. Every block shares the same cube template; materials
//! differ only in which atlas cell each face samples (liquids keep the raw
//! template UVs instead).

use cgmath::{Point3, Vector2};

use crate::voxels::voxel_face::VoxelFace;

/// Width of the shared texture atlas, in block textures per row.
pub const ATLAS_SIZE_IN_BLOCKS: u32 = 16;

/// The UV-space width of one atlas cell.
pub const NORMALIZED_BLOCK_TEXTURE_SIZE: f32 = 1.0 / ATLAS_SIZE_IN_BLOCKS as f32;

/// Index template for one quad face: two triangles over four vertices.
pub static FACE_TRIANGLES: [u32; 6] = [0, 1, 2, 2, 1, 3];

/// A single template vertex of a block face.
#[derive(Copy, Clone, Debug)]
pub struct VertData {
    /// Position within the unit cube, corners at 0.0 and 1.0.
    pub position: Point3<f32>,
    /// Face-local UV coordinate in [0,1].
    pub uv: Vector2<f32>,
}

impl VertData {
    /// Returns the vertex position rotated about the cube's vertical centre
    /// axis by `yaw_degrees`.
    ///
    /// Only quarter turns occur in practice (block orientations); any other
    /// value returns the position unrotated.
    pub fn rotated_position(&self, yaw_degrees: f32) -> Point3<f32> {
        let dx = self.position.x - 0.5;
        let dz = self.position.z - 0.5;

        let (rx, rz) = match yaw_degrees as i32 {
            90 => (dz, -dx),
            180 => (-dx, -dz),
            270 => (-dz, dx),
            _ => (dx, dz),
        };

        Point3::new(rx + 0.5, self.position.y, rz + 0.5)
    }
}

/// Vertex template for one face of the unit cube.
pub struct FaceMeshData {
    /// Which face of the cube this template describes.
    pub direction: VoxelFace,
    /// The face's four corners, wound to match [`FACE_TRIANGLES`].
    pub vert_data: [VertData; 4],
}

impl FaceMeshData {
    /// Number of vertices this face contributes to a mesh.
    pub fn vertex_count(&self) -> usize {
        self.vert_data.len()
    }
}

macro_rules! vert {
    ($x:expr, $y:expr, $z:expr, $u:expr, $v:expr) => {
        VertData {
            position: Point3::new($x, $y, $z),
            uv: Vector2::new($u, $v),
        }
    };
}

/// The shared cube template, indexed by face index.
///
/// Winding is chosen so that [`FACE_TRIANGLES`] produces outward-facing
/// triangles for every face.
pub static CUBE_FACES: [FaceMeshData; 6] = [
    FaceMeshData {
        direction: VoxelFace::BACK,
        vert_data: [
            vert!(0.0, 0.0, 0.0, 0.0, 0.0),
            vert!(0.0, 1.0, 0.0, 0.0, 1.0),
            vert!(1.0, 0.0, 0.0, 1.0, 0.0),
            vert!(1.0, 1.0, 0.0, 1.0, 1.0),
        ],
    },
    FaceMeshData {
        direction: VoxelFace::FRONT,
        vert_data: [
            vert!(1.0, 0.0, 1.0, 0.0, 0.0),
            vert!(1.0, 1.0, 1.0, 0.0, 1.0),
            vert!(0.0, 0.0, 1.0, 1.0, 0.0),
            vert!(0.0, 1.0, 1.0, 1.0, 1.0),
        ],
    },
    FaceMeshData {
        direction: VoxelFace::TOP,
        vert_data: [
            vert!(0.0, 1.0, 0.0, 0.0, 0.0),
            vert!(0.0, 1.0, 1.0, 0.0, 1.0),
            vert!(1.0, 1.0, 0.0, 1.0, 0.0),
            vert!(1.0, 1.0, 1.0, 1.0, 1.0),
        ],
    },
    FaceMeshData {
        direction: VoxelFace::BOTTOM,
        vert_data: [
            vert!(1.0, 0.0, 0.0, 0.0, 0.0),
            vert!(1.0, 0.0, 1.0, 0.0, 1.0),
            vert!(0.0, 0.0, 0.0, 1.0, 0.0),
            vert!(0.0, 0.0, 1.0, 1.0, 1.0),
        ],
    },
    FaceMeshData {
        direction: VoxelFace::LEFT,
        vert_data: [
            vert!(0.0, 0.0, 1.0, 0.0, 0.0),
            vert!(0.0, 1.0, 1.0, 0.0, 1.0),
            vert!(0.0, 0.0, 0.0, 1.0, 0.0),
            vert!(0.0, 1.0, 0.0, 1.0, 1.0),
        ],
    },
    FaceMeshData {
        direction: VoxelFace::RIGHT,
        vert_data: [
            vert!(1.0, 0.0, 0.0, 0.0, 0.0),
            vert!(1.0, 1.0, 0.0, 0.0, 1.0),
            vert!(1.0, 0.0, 1.0, 1.0, 0.0),
            vert!(1.0, 1.0, 1.0, 1.0, 1.0),
        ],
    },
];

/// Remaps a face-local UV into the shared texture atlas.
///
/// Atlas cells are laid out row-major from the top-left, so the V axis is
/// flipped relative to cell row before the template offset is applied.
pub fn atlas_uv(texture_id: u32, template_uv: Vector2<f32>) -> [f32; 2] {
    let row = texture_id / ATLAS_SIZE_IN_BLOCKS;
    let column = texture_id - row * ATLAS_SIZE_IN_BLOCKS;

    let mut u = column as f32 * NORMALIZED_BLOCK_TEXTURE_SIZE;
    let mut v = row as f32 * NORMALIZED_BLOCK_TEXTURE_SIZE;

    v = 1.0 - v - NORMALIZED_BLOCK_TEXTURE_SIZE;

    u += NORMALIZED_BLOCK_TEXTURE_SIZE * template_uv.x;
    v += NORMALIZED_BLOCK_TEXTURE_SIZE * template_uv.y;

    [u, v]
}
