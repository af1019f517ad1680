//! # Chunk Meshing
//!
//! Turns a chunk's voxel grid into renderer-ready buffers: one shared
//! vertex stream in structure-of-arrays form plus three index lists that
//! split the geometry into opaque, transparent, and water passes.
//!
//! ## Face culling
//!
//! A face is emitted only when the voxel on the other side renders its
//! neighbors' faces (air, glass, leaves, water). Neighbor lookups resolve
//! through the world, so meshing a chunk forces the voxel data of its four
//! edge-adjacent chunks into memory; their meshes are never touched.
//!
//! ## Orientation
//!
//! Oriented blocks keep their vertex templates and per-face textures fixed
//! and are rotated about the voxel centre at emission time. Culling and
//! light sampling use the translated face direction, so a furnace's front
//! face is culled by whatever block the front actually points at.

use cgmath::Point3;

use crate::voxels::block::mesh_data::{atlas_uv, CUBE_FACES, FACE_TRIANGLES};
use crate::voxels::block::properties;
use crate::voxels::chunk::{ChunkCoord, CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::voxels::voxel_face::{orientation_yaw, translated_face_index, VoxelFace, FACE_CHECKS};
use crate::voxels::world::WorldData;

/// Mesh buffers for one chunk, positioned chunk-local.
///
/// All vertex attributes share one index space; the three index lists
/// select which triangles each render pass draws. Light reaches the
/// renderer as the alpha channel of the vertex color.
#[derive(Debug)]
pub struct ChunkMesh {
    /// The chunk these buffers were built for.
    pub coord: ChunkCoord,
    /// Vertex positions, chunk-local.
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex face normals.
    pub normals: Vec<[f32; 3]>,
    /// Per-vertex color; alpha carries the face's light level.
    pub colors: Vec<[f32; 4]>,
    /// Atlas-mapped texture coordinates (face-local for water).
    pub uvs: Vec<[f32; 2]>,
    /// Raw face-local coordinates for every vertex.
    pub uv2s: Vec<[f32; 2]>,
    /// Triangles drawn in the opaque pass.
    pub opaque_indices: Vec<u32>,
    /// Triangles drawn in the transparent pass (glass, leaves).
    pub transparent_indices: Vec<u32>,
    /// Triangles drawn in the water pass.
    pub water_indices: Vec<u32>,
}

impl ChunkMesh {
    /// Creates an empty mesh for the given chunk.
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            positions: Vec::new(),
            normals: Vec::new(),
            colors: Vec::new(),
            uvs: Vec::new(),
            uv2s: Vec::new(),
            opaque_indices: Vec::new(),
            transparent_indices: Vec::new(),
            water_indices: Vec::new(),
        }
    }

    /// Number of vertices in the shared stream.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Total indices across all three passes.
    pub fn index_count(&self) -> usize {
        self.opaque_indices.len() + self.transparent_indices.len() + self.water_indices.len()
    }

    /// True when the chunk produced no geometry at all.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Builds the mesh for a loaded chunk.
///
/// Forces the chunk and its four edge-adjacent chunks' voxel data into
/// memory first, so the following walk is pure reads. `None` is never
/// returned for in-range coordinates; it guards the impossible case of the
/// chunk vanishing between the load and the walk.
pub fn build_chunk_mesh(world: &mut WorldData, coord: ChunkCoord) -> Option<ChunkMesh> {
    world.ensure_chunk(coord);
    for face in [
        VoxelFace::BACK,
        VoxelFace::FRONT,
        VoxelFace::LEFT,
        VoxelFace::RIGHT,
    ] {
        let direction = face.direction();
        world.ensure_chunk(ChunkCoord::new(coord.x + direction.x, coord.z + direction.z));
    }

    let chunk = world.chunk(coord)?;
    let origin = coord.origin();
    let mut mesh = ChunkMesh::new(coord);

    for y in 0..CHUNK_HEIGHT {
        for x in 0..CHUNK_WIDTH {
            for z in 0..CHUNK_WIDTH {
                let voxel = chunk.voxel(x, y, z);
                let block = properties(voxel.id);
                if !block.is_solid {
                    continue;
                }

                // Submerged water renders nothing; the column above it in
                // the same chunk decides. The top row counts as open.
                if block.is_water
                    && y + 1 < CHUNK_HEIGHT
                    && properties(chunk.voxel(x, y + 1, z).id).is_water
                {
                    continue;
                }

                let yaw = orientation_yaw(voxel.orientation);
                let global = Point3::new(origin.x + x as i32, y as i32, origin.z + z as i32);

                for p in 0..6 {
                    let translated = translated_face_index(voxel.orientation, p);
                    let Some(neighbor) = world.loaded_voxel(global + FACE_CHECKS[translated])
                    else {
                        continue;
                    };
                    if !properties(neighbor.id).render_neighbor_faces {
                        continue;
                    }

                    let light = neighbor.light_as_float();
                    let normal = FACE_CHECKS[p];
                    let base = mesh.positions.len() as u32;

                    for vert in CUBE_FACES[p].vert_data.iter() {
                        let rotated = vert.rotated_position(yaw);
                        mesh.positions.push([
                            x as f32 + rotated.x,
                            y as f32 + rotated.y,
                            z as f32 + rotated.z,
                        ]);
                        mesh.normals
                            .push([normal.x as f32, normal.y as f32, normal.z as f32]);
                        mesh.colors.push([0.0, 0.0, 0.0, light]);
                        if block.is_water {
                            mesh.uvs.push([vert.uv.x, vert.uv.y]);
                        } else {
                            mesh.uvs.push(atlas_uv(block.texture_id(p), vert.uv));
                        }
                        mesh.uv2s.push([vert.uv.x, vert.uv.y]);
                    }

                    let indices = if !block.render_neighbor_faces {
                        &mut mesh.opaque_indices
                    } else if block.is_water {
                        &mut mesh.water_indices
                    } else {
                        &mut mesh.transparent_indices
                    };
                    for offset in FACE_TRIANGLES.iter() {
                        indices.push(base + offset);
                    }
                }
            }
        }
    }

    Some(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::biome::BiomeDefinition;

    fn flat_biome() -> Vec<BiomeDefinition> {
        vec![BiomeDefinition {
            name: "Flat",
            offset: 0.0,
            scale: 0.2,
            solid_ground_height: 40,
            terrain_height: 10,
            terrain_scale: 0.1,
            surface_block: 3,
            subsurface_block: 5,
            flora: None,
            lodes: vec![],
        }]
    }

    /// A world whose probed chunk generates as pure air.
    fn air_world() -> (WorldData, ChunkCoord) {
        let mut world = WorldData::with_biomes("t", 42, flat_biome());
        let coord = ChunkCoord::new(-5, -5);
        world.ensure_chunk(coord);
        (world, coord)
    }

    #[test]
    fn isolated_voxel_meshes_all_six_faces() {
        let (mut world, coord) = air_world();
        world.modify_voxel(coord, Point3::new(8, 60, 8), 2, 1);

        let mesh = build_chunk_mesh(&mut world, coord).unwrap();

        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.opaque_indices.len(), 36);
        assert!(mesh.transparent_indices.is_empty());
        assert!(mesh.water_indices.is_empty());

        for direction in FACE_CHECKS.iter() {
            let normal = [direction.x as f32, direction.y as f32, direction.z as f32];
            let count = mesh.normals.iter().filter(|n| **n == normal).count();
            assert_eq!(count, 4);
        }
    }

    #[test]
    fn enclosed_voxels_emit_no_faces() {
        let (mut world, coord) = air_world();
        for x in 7..10 {
            for y in 59..62 {
                for z in 7..10 {
                    world.modify_voxel(coord, Point3::new(x, y, z), 2, 1);
                }
            }
        }

        let mesh = build_chunk_mesh(&mut world, coord).unwrap();

        // A 3x3x3 block exposes 9 faces per side; the centre voxel adds none.
        assert_eq!(mesh.vertex_count(), 54 * 4);
        assert_eq!(mesh.opaque_indices.len(), 54 * 6);
    }

    #[test]
    fn submerged_water_is_suppressed() {
        let (mut world, coord) = air_world();
        world.modify_voxel(coord, Point3::new(8, 60, 8), 14, 1);
        world.modify_voxel(coord, Point3::new(8, 61, 8), 14, 1);

        let mesh = build_chunk_mesh(&mut world, coord).unwrap();

        // Only the surface voxel renders, into the water pass, with raw
        // face-local texture coordinates.
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.water_indices.len(), 36);
        assert!(mesh.opaque_indices.is_empty());
        assert!(mesh.transparent_indices.is_empty());
        assert_eq!(mesh.uvs, mesh.uv2s);
    }

    #[test]
    fn orientation_remaps_culling_and_rotates_vertices() {
        let (mut world, coord) = air_world();
        world.modify_voxel(coord, Point3::new(9, 60, 8), 2, 1);
        world.modify_voxel(coord, Point3::new(8, 60, 8), 13, 1);
        let north = build_chunk_mesh(&mut world, coord).unwrap();

        world
            .chunk_mut(coord)
            .unwrap()
            .set_orientation(8, 60, 8, 4);
        let east = build_chunk_mesh(&mut world, coord).unwrap();

        // Both blocks hide exactly one face against each other either way,
        // but facing east a different furnace template lands against the
        // stone and the remaining quads are rotated a quarter turn.
        assert_eq!(north.vertex_count(), 40);
        assert_eq!(east.vertex_count(), 40);
        assert_ne!(north.positions, east.positions);
    }

    #[test]
    fn face_alpha_carries_neighbor_light() {
        let (mut world, coord) = air_world();
        world.modify_voxel(coord, Point3::new(8, 60, 8), 2, 1);

        let mesh = build_chunk_mesh(&mut world, coord).unwrap();

        // Faces are emitted in face-index order: back, front, top, bottom,
        // left, right. Side and top neighbors still hold full sky light;
        // the voxel below was shadowed and refilled sideways to 14.
        assert_eq!(mesh.colors[0][3], 15.0 / 16.0);
        assert_eq!(mesh.colors[8][3], 15.0 / 16.0);
        assert_eq!(mesh.colors[12][3], 14.0 / 16.0);
    }

    #[test]
    fn meshing_forces_edge_neighbors_into_memory() {
        let mut world = WorldData::with_biomes("t", 42, flat_biome());
        let coord = ChunkCoord::new(5, 5);

        let mesh = build_chunk_mesh(&mut world, coord).unwrap();

        assert!(!mesh.is_empty());
        assert_eq!(world.loaded_chunk_count(), 5);
        for (dx, dz) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            assert!(world.is_chunk_loaded(ChunkCoord::new(coord.x + dx, coord.z + dz)));
        }
        assert!(!world.is_chunk_loaded(ChunkCoord::new(coord.x + 1, coord.z + 1)));
    }
}
