//! # Block Module
//!
//! This module provides the material registry for the voxel world: block ids,
//! per-block properties, per-face texture indices, and the face mesh
//! templates used by the chunk mesher.
//!
//! The registry is static and immutable after load. Everything that renders,
//! lights, or collides resolves a voxel's `id` through [`properties`].

use log::error;
use num_derive::FromPrimitive;

pub mod mesh_data;

/// The underlying integer type used to represent block ids in memory.
/// This is used for storage and serialization of voxel data.
pub type BlockIdSize = u8;

/// Enumerates all block materials in the world.
///
/// The discriminants are the on-disk and in-memory voxel ids, so the order
/// here is frozen: changing it breaks every saved chunk. The `FromPrimitive`
/// derive allows checked conversion from raw ids when deserializing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockId {
    /// Empty space. Non-solid, fully transparent.
    AIR = 0,

    /// Unbreakable world floor, generated at y = 0.
    BEDROCK = 1,

    /// Generic underground filler; the ore pass only rewrites this.
    STONE = 2,

    /// Grassland surface block with distinct top/side/bottom textures.
    GRASS = 3,

    /// Desert surface and subsurface block.
    SAND = 4,

    /// Subsurface band under grass; also placed by the dirt lode.
    DIRT = 5,

    /// Tree trunk.
    WOOD = 6,

    /// Crafted planks.
    PLANKS = 7,

    /// Crafted bricks.
    BRICKS = 8,

    /// Cobblestone.
    COBBLESTONE = 9,

    /// Transparent solid; lets all light through.
    GLASS = 10,

    /// Tree canopy. Partially transparent to light.
    LEAVES = 11,

    /// Desert flora, placed by the cactus structure.
    CACTUS = 12,

    /// Directional block; its front face follows the stored orientation.
    FURNACE = 13,

    /// Liquid. Meshed into its own index list with template UVs.
    WATER = 14,
}

impl BlockId {
    /// Converts a raw voxel id into a `BlockId`, if it names a known material.
    ///
    /// This is used when deserializing chunk records: unknown ids are mapped
    /// to air by the caller rather than trusted.
    pub fn from_id(id: BlockIdSize) -> Option<Self> {
        num::FromPrimitive::from_u8(id)
    }
}

/// Static, read-only definition of a block material.
///
/// Looked up by voxel id from [`BLOCKS`]; immutable after load.
pub struct BlockType {
    /// Display / config name, unique across the registry.
    pub name: &'static str,
    /// Whether the voxel participates in meshing and collision.
    pub is_solid: bool,
    /// Whether neighbors render their boundary faces against this block.
    /// True for air, liquids, and transparent solids.
    pub render_neighbor_faces: bool,
    /// Liquid classification, used by the mesher's vertical surface rule.
    pub is_water: bool,
    /// How much light this block absorbs, 0 (clear) ..= 15 (opaque).
    pub opacity: u8,
    /// Texture atlas index per face, in face-index order
    /// [back, front, top, bottom, left, right].
    pub face_textures: [u32; 6],
}

impl BlockType {
    /// Returns the texture atlas index for a face of this block.
    ///
    /// An out-of-range face index is a programming error; it is logged and
    /// texture 0 is returned so a mesh build never aborts midway.
    pub fn texture_id(&self, face_index: usize) -> u32 {
        match self.face_textures.get(face_index) {
            Some(texture) => *texture,
            None => {
                error!("Invalid face index {face_index} for block '{}'", self.name);
                0
            }
        }
    }
}

/// The block registry, indexed by voxel id.
///
/// Face texture entries reference the shared texture atlas; see
/// [`mesh_data`] for how they are remapped into UV space.
pub static BLOCKS: [BlockType; 15] = [
    BlockType {
        name: "air",
        is_solid: false,
        render_neighbor_faces: true,
        is_water: false,
        opacity: 0,
        face_textures: [0, 0, 0, 0, 0, 0],
    },
    BlockType {
        name: "bedrock",
        is_solid: true,
        render_neighbor_faces: false,
        is_water: false,
        opacity: 15,
        face_textures: [5, 5, 5, 5, 5, 5],
    },
    BlockType {
        name: "stone",
        is_solid: true,
        render_neighbor_faces: false,
        is_water: false,
        opacity: 15,
        face_textures: [0, 0, 0, 0, 0, 0],
    },
    BlockType {
        name: "grass",
        is_solid: true,
        render_neighbor_faces: false,
        is_water: false,
        opacity: 15,
        face_textures: [2, 2, 3, 1, 2, 2],
    },
    BlockType {
        name: "sand",
        is_solid: true,
        render_neighbor_faces: false,
        is_water: false,
        opacity: 15,
        face_textures: [4, 4, 4, 4, 4, 4],
    },
    BlockType {
        name: "dirt",
        is_solid: true,
        render_neighbor_faces: false,
        is_water: false,
        opacity: 15,
        face_textures: [1, 1, 1, 1, 1, 1],
    },
    BlockType {
        name: "wood",
        is_solid: true,
        render_neighbor_faces: false,
        is_water: false,
        opacity: 15,
        face_textures: [6, 6, 7, 7, 6, 6],
    },
    BlockType {
        name: "planks",
        is_solid: true,
        render_neighbor_faces: false,
        is_water: false,
        opacity: 15,
        face_textures: [8, 8, 8, 8, 8, 8],
    },
    BlockType {
        name: "bricks",
        is_solid: true,
        render_neighbor_faces: false,
        is_water: false,
        opacity: 15,
        face_textures: [9, 9, 9, 9, 9, 9],
    },
    BlockType {
        name: "cobblestone",
        is_solid: true,
        render_neighbor_faces: false,
        is_water: false,
        opacity: 15,
        face_textures: [10, 10, 10, 10, 10, 10],
    },
    BlockType {
        name: "glass",
        is_solid: true,
        render_neighbor_faces: true,
        is_water: false,
        opacity: 0,
        face_textures: [11, 11, 11, 11, 11, 11],
    },
    BlockType {
        name: "leaves",
        is_solid: true,
        render_neighbor_faces: true,
        is_water: false,
        opacity: 1,
        face_textures: [12, 12, 12, 12, 12, 12],
    },
    BlockType {
        name: "cactus",
        is_solid: true,
        render_neighbor_faces: false,
        is_water: false,
        opacity: 15,
        face_textures: [13, 13, 14, 14, 13, 13],
    },
    BlockType {
        name: "furnace",
        is_solid: true,
        render_neighbor_faces: false,
        is_water: false,
        opacity: 15,
        face_textures: [16, 15, 17, 17, 16, 16],
    },
    BlockType {
        name: "water",
        is_solid: true,
        render_neighbor_faces: true,
        is_water: true,
        opacity: 3,
        face_textures: [18, 18, 18, 18, 18, 18],
    },
];

/// Compile-time map from block name to voxel id, used when resolving biome
/// and lode configuration that refers to materials by name.
pub static BLOCK_NAME_TO_ID: phf::Map<&'static str, BlockIdSize> = phf::phf_map! {
    "air" => 0,
    "bedrock" => 1,
    "stone" => 2,
    "grass" => 3,
    "sand" => 4,
    "dirt" => 5,
    "wood" => 6,
    "planks" => 7,
    "bricks" => 8,
    "cobblestone" => 9,
    "glass" => 10,
    "leaves" => 11,
    "cactus" => 12,
    "furnace" => 13,
    "water" => 14,
};

/// Looks up the properties for a voxel id.
///
/// An id outside the registry is a programming error (or corrupt data that
/// slipped past deserialization); it is logged and air is returned so voxel
/// queries stay total.
pub fn properties(id: BlockIdSize) -> &'static BlockType {
    match BLOCKS.get(id as usize) {
        Some(block) => block,
        None => {
            error!("Unknown block id {id}, treating as air");
            &BLOCKS[0]
        }
    }
}

/// Resolves a block name to its voxel id.
pub fn block_id_by_name(name: &str) -> Option<BlockIdSize> {
    BLOCK_NAME_TO_ID.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_ids_are_stable() {
        assert_eq!(BlockId::AIR as BlockIdSize, 0);
        assert_eq!(BlockId::BEDROCK as BlockIdSize, 1);
        assert_eq!(BlockId::STONE as BlockIdSize, 2);
        assert_eq!(BlockId::WATER as BlockIdSize, 14);
        assert_eq!(BLOCKS.len(), 15);
    }

    #[test]
    fn air_is_the_only_non_solid() {
        assert!(!BLOCKS[0].is_solid);
        for block in BLOCKS.iter().skip(1) {
            assert!(block.is_solid, "{} should be solid", block.name);
        }
    }

    #[test]
    fn name_map_matches_registry() {
        for (name, id) in BLOCK_NAME_TO_ID.entries() {
            assert_eq!(BLOCKS[*id as usize].name, *name);
        }
        assert_eq!(BLOCK_NAME_TO_ID.len(), BLOCKS.len());
    }

    #[test]
    fn from_id_rejects_unknown_ids() {
        assert_eq!(BlockId::from_id(14), Some(BlockId::WATER));
        assert_eq!(BlockId::from_id(15), None);
        assert_eq!(BlockId::from_id(200), None);
    }

    #[test]
    fn invalid_face_index_falls_back_to_texture_zero() {
        let furnace = properties(BlockId::FURNACE as BlockIdSize);
        assert_eq!(furnace.texture_id(1), 15, "front face keeps its texture");
        assert_eq!(furnace.texture_id(6), 0, "invalid face index defaults");
    }

    #[test]
    fn unknown_id_behaves_as_air() {
        let ghost = properties(99);
        assert_eq!(ghost.name, "air");
        assert!(!ghost.is_solid);
    }

    #[test]
    fn water_is_liquid_classified() {
        let water = properties(BlockId::WATER as BlockIdSize);
        assert!(water.is_water);
        assert!(water.render_neighbor_faces);
    }
}
