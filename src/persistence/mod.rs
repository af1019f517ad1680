//! # World Persistence
//!
//! Key-value persistence for worlds: one JSON metadata file per world plus
//! one binary record per chunk, keyed by chunk coordinate.
//!
//! ## Layout
//!
//! ```text
//! <root>/<world name>/world.json        name and seed
//! <root>/<world name>/chunks/<x>-<z>.chunk
//! ```
//!
//! Chunk records store each cell's id and orientation, packed two bytes per
//! voxel. Light is runtime-only state and is recomputed when a chunk comes
//! back into memory, so it never reaches disk.
//!
//! ## Failure policy
//!
//! Loads are forgiving: a missing chunk file means "generate instead", and
//! a record that fails to decode is logged and treated as missing rather
//! than taking the world down. Saves are best-effort per chunk; a chunk
//! that fails to write stays in the dirty set for the next pass.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::voxels::chunk::{ChunkCoord, ChunkData, VOXELS_PER_CHUNK};
use crate::voxels::world::WorldData;

/// File name of the per-world metadata record.
pub const WORLD_FILE: &str = "world.json";
/// Directory holding a world's chunk records.
pub const CHUNK_DIR: &str = "chunks";
/// Extension of chunk record files.
pub const CHUNK_EXT: &str = "chunk";

const CHUNK_RECORD_VERSION: u8 = 1;

/// Errors raised by save and load operations.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Filesystem access failed.
    #[error("save io: {0}")]
    Io(#[from] io::Error),
    /// World metadata could not be read or written as JSON.
    #[error("world metadata: {0}")]
    Json(#[from] serde_json::Error),
    /// A chunk record could not be encoded or decoded.
    #[error("chunk record: {0}")]
    Encoding(#[from] bincode::Error),
    /// A chunk record decoded but failed a structural check.
    #[error("malformed chunk record: {0}")]
    Malformed(String),
}

/// Per-world metadata, enough to regenerate everything not saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldInfo {
    /// World name; matches the save directory.
    pub name: String,
    /// Generation seed.
    pub seed: i32,
}

/// A voxel's persisted fields.
#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
struct PackedVoxel {
    id: u8,
    orientation: u8,
}

/// On-disk form of one chunk.
#[derive(Serialize, Deserialize)]
struct ChunkRecord {
    version: u8,
    coord: ChunkCoord,
    cells: Vec<u8>,
}

fn chunk_file_name(coord: ChunkCoord) -> String {
    format!("{}-{}.{}", coord.x, coord.z, CHUNK_EXT)
}

fn chunk_path(root: &Path, name: &str, coord: ChunkCoord) -> PathBuf {
    root.join(name).join(CHUNK_DIR).join(chunk_file_name(coord))
}

/// Opens the named world, creating and persisting it when absent.
///
/// An existing `world.json` wins over the `seed` argument; a fresh world
/// takes the given seed or draws a random one. Fresh worlds are saved
/// immediately so the seed survives a crash before the first save pass.
pub fn load_world(root: &Path, name: &str, seed: Option<i32>) -> WorldData {
    match read_world_info(root, name) {
        Ok(info) => {
            log::info!("World '{name}' opened (seed {})", info.seed);
            let mut world = WorldData::new(name, info.seed);
            world.save_root = root.to_path_buf();
            world
        }
        Err(SaveError::Io(error)) if error.kind() == io::ErrorKind::NotFound => {
            create_world(root, name, seed)
        }
        Err(error) => {
            log::error!("Failed to read world '{name}': {error}; starting it fresh");
            create_world(root, name, seed)
        }
    }
}

fn create_world(root: &Path, name: &str, seed: Option<i32>) -> WorldData {
    let seed = seed.unwrap_or_else(|| fastrand::i32(..));
    log::info!("Creating world '{name}' with seed {seed}");

    let mut world = WorldData::new(name, seed);
    world.save_root = root.to_path_buf();
    if let Err(error) = save_world(&mut world) {
        log::error!("Failed to persist fresh world '{name}': {error}");
    }
    world
}

fn read_world_info(root: &Path, name: &str) -> Result<WorldInfo, SaveError> {
    let raw = fs::read_to_string(root.join(name).join(WORLD_FILE))?;
    Ok(serde_json::from_str(&raw)?)
}

/// Writes the world metadata and every dirty chunk.
///
/// Chunks are saved one by one; a failing chunk is logged, put back in the
/// dirty set, and does not stop the pass. Returns the number of chunk
/// records written.
pub fn save_world(world: &mut WorldData) -> Result<usize, SaveError> {
    let root = world.save_root.clone();
    let world_dir = root.join(&world.name);
    fs::create_dir_all(world_dir.join(CHUNK_DIR))?;

    let info = WorldInfo {
        name: world.name.clone(),
        seed: world.seed,
    };
    fs::write(
        world_dir.join(WORLD_FILE),
        serde_json::to_string_pretty(&info)?,
    )?;

    let coords = world.take_modified();
    let mut saved = 0;
    for coord in coords {
        let Some(chunk) = world.chunk(coord) else {
            continue;
        };
        match save_chunk(&root, &info.name, chunk) {
            Ok(()) => saved += 1,
            Err(error) => {
                log::error!("Failed to save chunk ({}, {}): {error}", coord.x, coord.z);
                world.mark_modified(coord);
            }
        }
    }

    world.stats.chunks_saved += saved as u32;
    log::info!("World '{}' saved, {saved} chunks written", world.name);
    Ok(saved)
}

/// Writes one chunk record.
pub fn save_chunk(root: &Path, name: &str, chunk: &ChunkData) -> Result<(), SaveError> {
    let dir = root.join(name).join(CHUNK_DIR);
    fs::create_dir_all(&dir)?;

    let packed: Vec<PackedVoxel> = chunk
        .voxels()
        .iter()
        .map(|v| PackedVoxel {
            id: v.id,
            orientation: v.orientation,
        })
        .collect();
    let record = ChunkRecord {
        version: CHUNK_RECORD_VERSION,
        coord: chunk.coord,
        cells: bytemuck::cast_slice(&packed).to_vec(),
    };

    fs::write(
        dir.join(chunk_file_name(chunk.coord)),
        bincode::serialize(&record)?,
    )?;
    Ok(())
}

/// Reads the chunk record for `coord`, if a usable one exists.
///
/// Missing files resolve to `None` silently, which callers treat as "not
/// saved yet, generate". Decode failures are logged and also resolve to
/// `None` so one bad file cannot wedge chunk loading.
pub fn load_chunk(root: &Path, name: &str, coord: ChunkCoord) -> Option<ChunkData> {
    let path = chunk_path(root, name, coord);
    if !path.exists() {
        return None;
    }

    match read_chunk(&path, coord) {
        Ok(chunk) => Some(chunk),
        Err(error) => {
            log::error!("Failed to load chunk ({}, {}): {error}", coord.x, coord.z);
            None
        }
    }
}

fn read_chunk(path: &Path, coord: ChunkCoord) -> Result<ChunkData, SaveError> {
    let bytes = fs::read(path)?;
    let record: ChunkRecord = bincode::deserialize(&bytes)?;

    if record.version != CHUNK_RECORD_VERSION {
        return Err(SaveError::Malformed(format!(
            "unsupported record version {}",
            record.version
        )));
    }
    if record.coord != coord {
        return Err(SaveError::Malformed(format!(
            "record belongs to chunk ({}, {})",
            record.coord.x, record.coord.z
        )));
    }

    let packed: &[PackedVoxel] = bytemuck::try_cast_slice(&record.cells)
        .map_err(|error| SaveError::Malformed(error.to_string()))?;
    if packed.len() != VOXELS_PER_CHUNK {
        return Err(SaveError::Malformed(format!(
            "expected {VOXELS_PER_CHUNK} cells, found {}",
            packed.len()
        )));
    }

    let mut chunk = ChunkData::new(coord);
    for (cell, packed) in chunk.voxels_mut().iter_mut().zip(packed) {
        cell.id = packed.id;
        cell.orientation = packed.orientation;
    }
    Ok(chunk)
}
