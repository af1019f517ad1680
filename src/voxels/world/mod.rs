//! # World Store
//!
//! This module provides `WorldData`, the per-world state: the lazily filled
//! chunk map, pending structure modifications, the dirty set awaiting
//! persistence, and every voxel-level query and edit path.
//!
//! ## Ownership
//!
//! `WorldData` is the single owner of all chunk data. Components never hold
//! references into chunks across calls; they resolve voxels by global
//! position through the store each time. Shared across threads as
//! `MtResource<WorldData>`, whose write lock makes each load-or-generate
//! call one atomic section.
//!
//! ## Chunk population
//!
//! A missing chunk requested with `create` goes through one path: try the
//! save directory, otherwise run the generator over every cell, bank the
//! structure mods it emits, seed natural light, and mark the fresh chunk for
//! persistence.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;

use cgmath::Point3;

use crate::core::LockedQueue;
use crate::generation::biome::{default_biomes, BiomeDefinition};
use crate::generation::TerrainGenerator;
use crate::lighting;
use crate::persistence;
use crate::voxels::block::{properties, BlockIdSize};
use crate::voxels::chunk::{
    is_voxel_in_world, ChunkCoord, ChunkData, CHUNK_HEIGHT, CHUNK_WIDTH, WORLD_SIZE_IN_VOXELS,
};
use crate::voxels::voxel_face::FACE_CHECKS;
use crate::voxels::{VoxelMod, VoxelState, MAX_LIGHT_LEVEL};

pub mod scheduler;

/// Counters fed by chunk lifecycle events, for logs and the demo's summary.
#[derive(Copy, Clone, Debug, Default)]
pub struct WorldStats {
    /// Chunks populated by the generator.
    pub chunks_generated: u32,
    /// Chunks restored from the save directory.
    pub chunks_loaded: u32,
    /// Chunk records written out by save passes.
    pub chunks_saved: u32,
}

/// Per-world state: chunk map, edits in flight, and persistence bookkeeping.
pub struct WorldData {
    /// World name; doubles as the save directory name.
    pub name: String,
    /// Generation seed.
    pub seed: i32,
    /// Directory that holds this world's save tree.
    pub save_root: PathBuf,
    /// Lifecycle counters.
    pub stats: WorldStats,

    generator: TerrainGenerator,
    chunks: HashMap<ChunkCoord, ChunkData>,
    modified: HashSet<ChunkCoord>,
    active: HashSet<ChunkCoord>,
    pending_mods: VecDeque<VecDeque<VoxelMod>>,
    update_queue: LockedQueue<ChunkCoord>,
}

impl WorldData {
    /// Creates a world with the default biome table.
    pub fn new(name: impl Into<String>, seed: i32) -> Self {
        Self::with_biomes(name, seed, default_biomes())
    }

    /// Creates a world generating from a caller-supplied biome table.
    pub fn with_biomes(name: impl Into<String>, seed: i32, biomes: Vec<BiomeDefinition>) -> Self {
        Self {
            name: name.into(),
            seed,
            save_root: PathBuf::from("saves"),
            stats: WorldStats::default(),
            generator: TerrainGenerator::new(seed, biomes),
            chunks: HashMap::new(),
            modified: HashSet::new(),
            active: HashSet::new(),
            pending_mods: VecDeque::new(),
            update_queue: LockedQueue::new(),
        }
    }

    /// The world's terrain generator.
    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// Returns a handle to the mesh-rebuild queue this world feeds.
    ///
    /// The scheduler clones this handle; edits and light changes to active
    /// chunks enqueue their coordinates here.
    pub fn update_queue(&self) -> LockedQueue<ChunkCoord> {
        self.update_queue.clone()
    }

    /// Looks up a loaded chunk.
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&ChunkData> {
        self.chunks.get(&coord)
    }

    /// Looks up a loaded chunk mutably.
    pub fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut ChunkData> {
        self.chunks.get_mut(&coord)
    }

    /// Whether the chunk's data is in memory.
    pub fn is_chunk_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Number of chunks currently in memory.
    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Marks a chunk as inside the observer's view window.
    ///
    /// Edits and light changes only enqueue mesh rebuilds for active chunks;
    /// inactive chunks catch up when they re-enter the window.
    pub fn activate_chunk(&mut self, coord: ChunkCoord) {
        self.active.insert(coord);
    }

    /// Removes a chunk from the active window. Its data stays loaded.
    pub fn deactivate_chunk(&mut self, coord: ChunkCoord) {
        self.active.remove(&coord);
    }

    /// Whether the chunk is inside the observer's view window.
    pub fn is_chunk_active(&self, coord: ChunkCoord) -> bool {
        self.active.contains(&coord)
    }

    /// Returns the chunk at `coord`, optionally creating it.
    ///
    /// Present chunks are returned as-is. Absent chunks are returned only
    /// when `create` is set, after a load-or-generate pass. Callers reach
    /// this method through the world's single lock, so the existence check,
    /// the persistence lookup, and the insertion form one atomic section and
    /// no coordinate is ever populated twice.
    pub fn request_chunk(&mut self, coord: ChunkCoord, create: bool) -> Option<&ChunkData> {
        if !self.chunks.contains_key(&coord) {
            if !create {
                return None;
            }
            self.ensure_chunk(coord);
        }
        self.chunks.get(&coord)
    }

    /// Loads or generates the chunk at `coord` if it is not in memory.
    pub fn ensure_chunk(&mut self, coord: ChunkCoord) {
        if self.chunks.contains_key(&coord) {
            return;
        }

        if let Some(chunk) = persistence::load_chunk(&self.save_root, &self.name, coord) {
            self.chunks.insert(coord, chunk);
            self.stats.chunks_loaded += 1;
            // Light is runtime-only state; recompute it for restored chunks.
            lighting::recalculate_natural_light(self, coord);
            return;
        }

        self.populate_chunk(coord);
    }

    /// Runs the generator over every cell of a fresh chunk.
    fn populate_chunk(&mut self, coord: ChunkCoord) {
        let origin = coord.origin();
        let mut chunk = ChunkData::new(coord);
        let mut mods = VecDeque::new();

        for x in 0..CHUNK_WIDTH {
            for y in 0..CHUNK_HEIGHT {
                for z in 0..CHUNK_WIDTH {
                    let position = Point3::new(
                        origin.x + x as i32,
                        y as i32,
                        origin.z + z as i32,
                    );
                    chunk.set_id(x, y, z, self.generator.voxel_at(position, &mut mods));
                }
            }
        }

        self.chunks.insert(coord, chunk);
        self.stats.chunks_generated += 1;

        if !mods.is_empty() {
            self.queue_modifications(mods);
        }

        lighting::recalculate_natural_light(self, coord);
        self.modified.insert(coord);
    }

    /// Banks a batch of deferred voxel writes for the next application pass.
    ///
    /// Generation feeds structure overflow through here; external systems
    /// may inject their own batches the same way.
    pub fn queue_modifications(&mut self, batch: VecDeque<VoxelMod>) {
        if !batch.is_empty() {
            self.pending_mods.push_back(batch);
        }
    }

    /// Splits a global position into its chunk coordinate and local indices.
    ///
    /// `None` when the height lies outside the world; horizontal bounds are
    /// not checked here, since chunk data can exist at any coordinate.
    fn split_global(global: Point3<i32>) -> Option<(ChunkCoord, usize, usize, usize)> {
        if global.y < 0 || global.y >= CHUNK_HEIGHT as i32 {
            return None;
        }
        let coord = ChunkCoord::from_voxel(global);
        let origin = coord.origin();
        Some((
            coord,
            (global.x - origin.x) as usize,
            global.y as usize,
            (global.z - origin.z) as usize,
        ))
    }

    /// Reads a voxel from loaded chunks only.
    ///
    /// `None` when the owning chunk is absent or the height is out of range.
    /// This is the lookup light propagation uses: light never forces chunk
    /// creation, it stops at the loaded frontier.
    pub fn loaded_voxel(&self, global: Point3<i32>) -> Option<VoxelState> {
        let (coord, x, y, z) = Self::split_global(global)?;
        self.chunks.get(&coord).map(|chunk| chunk.voxel(x, y, z))
    }

    /// Stores a light value, recording the touched chunk for mesh rebuild.
    ///
    /// Plain storage on behalf of the lighting pass; no propagation happens
    /// here. Writes into absent chunks are dropped.
    pub fn write_light(&mut self, global: Point3<i32>, value: u8) {
        let Some((coord, x, y, z)) = Self::split_global(global) else {
            return;
        };
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return;
        };
        chunk.set_light(x, y, z, value.min(MAX_LIGHT_LEVEL));
        if self.active.contains(&coord) {
            self.update_queue.enqueue(coord);
        }
    }

    /// Writes a voxel id at a global position, creating the chunk if needed.
    ///
    /// This is the modification-application path: structure mods land here.
    /// Writes outside the world volume are dropped, so a structure footprint
    /// overhanging the border never materializes an out-of-world chunk.
    /// The write is direct, with no light recast; the owning chunk is marked
    /// dirty and queued for rebuild when active.
    pub fn set_voxel(&mut self, global: Point3<i32>, id: BlockIdSize) {
        if !is_voxel_in_world(global) {
            return;
        }
        let Some((coord, x, y, z)) = Self::split_global(global) else {
            return;
        };

        self.ensure_chunk(coord);
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return;
        };
        chunk.set_id(x, y, z, id);

        self.modified.insert(coord);
        if self.active.contains(&coord) {
            self.update_queue.enqueue(coord);
        }
    }

    /// Changes a voxel in a loaded chunk, keeping light consistent.
    ///
    /// No-op when the id is unchanged. When the change alters opacity and
    /// the column above is fully sunlit (or the voxel is the top row),
    /// natural light is recast downward from the row above. The chunk is
    /// marked dirty and queued for rebuild when active.
    pub fn modify_voxel(
        &mut self,
        coord: ChunkCoord,
        local: Point3<i32>,
        id: BlockIdSize,
        orientation: u8,
    ) {
        if !ChunkData::is_voxel_in_chunk(local.x, local.y, local.z) {
            log::error!(
                "Voxel modification outside chunk bounds: ({}, {}, {})",
                local.x,
                local.y,
                local.z
            );
            return;
        }
        let (x, y, z) = (local.x as usize, local.y as usize, local.z as usize);

        let recast;
        {
            let Some(chunk) = self.chunks.get_mut(&coord) else {
                log::error!(
                    "Voxel modification in absent chunk ({}, {})",
                    coord.x,
                    coord.z
                );
                return;
            };

            let old = chunk.voxel(x, y, z);
            if old.id == id {
                return;
            }

            let old_opacity = properties(old.id).opacity;
            let new_opacity = properties(id).opacity;
            chunk.set_id(x, y, z, id);
            chunk.set_orientation(x, y, z, orientation);

            recast = old_opacity != new_opacity
                && (y == CHUNK_HEIGHT - 1 || chunk.voxel(x, y + 1, z).light == MAX_LIGHT_LEVEL);
        }

        if recast {
            lighting::cast_natural_light(self, coord, x, z, y as i32 + 1);
        }

        self.modified.insert(coord);
        if self.active.contains(&coord) {
            self.update_queue.enqueue(coord);
        }
    }

    /// External edit entry point: block breaking and placing.
    ///
    /// Translates the global position into chunk and local coordinates,
    /// applies the modification with the placing actor's orientation, and
    /// re-enqueues any face-adjacent chunk whose boundary voxel borders the
    /// edit, at the front of the queue so visible seams heal first.
    pub fn edit_voxel(&mut self, global: Point3<i32>, id: BlockIdSize, orientation: u8) {
        let coord = ChunkCoord::from_voxel(global);
        let origin = coord.origin();
        let local = Point3::new(global.x - origin.x, global.y, global.z - origin.z);

        self.modify_voxel(coord, local, id, orientation);

        for direction in FACE_CHECKS.iter() {
            let neighbor = local + direction;
            if !ChunkData::is_voxel_in_chunk(neighbor.x, neighbor.y, neighbor.z) {
                let neighbor_coord = ChunkCoord::from_voxel(global + direction);
                if self.active.contains(&neighbor_coord) {
                    self.update_queue.enqueue_front(neighbor_coord);
                }
            }
        }
    }

    /// Applies every pending structure-mod batch.
    ///
    /// Batches emitted by chunks that get created during the drain are
    /// processed in the same call. Returns whether any batch was applied.
    pub fn apply_modifications(&mut self) -> bool {
        let mut applied = false;
        while let Some(mut batch) = self.pending_mods.pop_front() {
            applied = true;
            while let Some(m) = batch.pop_front() {
                self.set_voxel(m.position, m.id);
            }
        }
        applied
    }

    /// Number of structure-mod batches waiting for application.
    pub fn pending_mod_batches(&self) -> usize {
        self.pending_mods.len()
    }

    /// Total voxel id at a global position, falling back to the generator.
    ///
    /// Absent chunks are not created; the generator resolves the position
    /// directly, discarding any structure mods it would emit so that probing
    /// never double-plants flora.
    pub fn voxel_id(&self, global: Point3<i32>) -> BlockIdSize {
        if let Some(state) = self.loaded_voxel(global) {
            return state.id;
        }
        let mut discarded = VecDeque::new();
        self.generator.voxel_at(global, &mut discarded)
    }

    /// Total voxel lookup; synthesizes an unlit state for absent chunks.
    pub fn voxel_state(&self, global: Point3<i32>) -> VoxelState {
        if let Some(state) = self.loaded_voxel(global) {
            return state;
        }
        let mut discarded = VecDeque::new();
        VoxelState::new(self.generator.voxel_at(global, &mut discarded))
    }

    /// Collision query: whether the voxel at a global position is solid.
    pub fn is_voxel_solid(&self, global: Point3<i32>) -> bool {
        properties(self.voxel_id(global)).is_solid
    }

    /// Ground probe for an actor standing at `position` with the given
    /// half-width: true when any of the four footprint corners rests on a
    /// solid voxel.
    pub fn is_ground_at(&self, position: Point3<f32>, half_width: f32) -> bool {
        let corners = [
            (-half_width, -half_width),
            (half_width, -half_width),
            (half_width, half_width),
            (-half_width, half_width),
        ];
        corners.iter().any(|(dx, dz)| {
            self.is_voxel_solid(Point3::new(
                (position.x + dx).floor() as i32,
                position.y.floor() as i32,
                (position.z + dz).floor() as i32,
            ))
        })
    }

    /// The default spawn point: the world-centre column, one voxel above the
    /// terrain surface.
    pub fn spawn_position(&self) -> Point3<f32> {
        let centre = WORLD_SIZE_IN_VOXELS / 2;
        let (height, _) = self.generator.terrain_height(centre, centre);
        Point3::new(
            centre as f32 + 0.5,
            height as f32 + 1.0,
            centre as f32 + 0.5,
        )
    }

    /// Marks a chunk as needing persistence.
    pub fn mark_modified(&mut self, coord: ChunkCoord) {
        self.modified.insert(coord);
    }

    /// Number of chunks awaiting persistence.
    pub fn modified_count(&self) -> usize {
        self.modified.len()
    }

    /// Drains the dirty set for a save pass.
    pub fn take_modified(&mut self) -> Vec<ChunkCoord> {
        self.modified.drain().collect()
    }
}
