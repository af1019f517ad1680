#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A chunk-based voxel world engine: procedural terrain generation, face
//! culling meshing, sky-light propagation, and key-value persistence, all
//! scheduled around a moving observer.
//!
//! ## Key Modules
//!
//! * `core` - Shared concurrency primitives (locked queues, guarded resources)
//! * `generation` - Noise fields, biomes, lodes, and structure placement
//! * `lighting` - Natural light seeding and the flood rules around edits
//! * `meshing` - Voxel grids to render buffers with per-pass index lists
//! * `persistence` - World metadata and chunk records on disk
//! * `settings` - The user-facing configuration file
//! * `voxels` - Voxel, block, chunk, and world state plus the scheduler
//!
//! ## Architecture
//!
//! The world store owns all chunk data behind one lock; every other piece
//! (the generator, the lighting pass, the mesher, the scheduler's worker
//! thread) operates through it, so chunk creation is atomic and queries
//! see one consistent grid. Meshes leave the system as plain buffer
//! structs; no rendering backend is assumed.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     voxel_world::run();
//! }
//! ```

use std::path::Path;

use cgmath::Point3;
use log::{error, info};

use crate::core::MtResource;
use crate::settings::{GameSettings, SETTINGS_FILE};
use crate::voxels::block::block_id_by_name;
use crate::voxels::world::scheduler::ChunkScheduler;

pub mod core;
pub mod generation;
pub mod lighting;
pub mod meshing;
pub mod persistence;
pub mod settings;
pub mod voxels;

/// Name of the world the demo session opens.
pub const DEFAULT_WORLD_NAME: &str = "world";

/// Runs a headless world session: open or create the default world, build
/// the spawn region, stream chunks while the observer wanders, place and
/// break a block, and save.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let settings = GameSettings::load_or_create(Path::new(SETTINGS_FILE));
    info!(
        "Settings: view distance {}, threading {}",
        settings.view_distance, settings.enable_threading
    );

    let world = MtResource::new(persistence::load_world(
        Path::new("saves"),
        DEFAULT_WORLD_NAME,
        None,
    ));
    let spawn = world.get().spawn_position();
    info!(
        "Spawn at ({:.1}, {:.1}, {:.1})",
        spawn.x, spawn.y, spawn.z
    );

    let mut scheduler = ChunkScheduler::new(world.clone(), &settings);
    scheduler.generate_spawn_region();

    // Wander east far enough to cross a few chunk borders and stream new
    // terrain in.
    let mut observer = spawn;
    let mut meshes = 0usize;
    let mut vertices = 0usize;
    let mut indices = 0usize;
    for _ in 0..128 {
        observer.x += 0.5;
        scheduler.tick(observer);
        while let Some(mesh) = scheduler.next_finished_mesh() {
            meshes += 1;
            vertices += mesh.vertex_count();
            indices += mesh.index_count();
        }
    }
    info!("Streamed {meshes} meshes ({vertices} vertices, {indices} indices) while wandering");

    // A small edit burst at head height: place a block, then break it.
    if let Some(cobblestone) = block_id_by_name("cobblestone") {
        let target = Point3::new(
            spawn.x.floor() as i32,
            spawn.y.floor() as i32 + 2,
            spawn.z.floor() as i32,
        );
        let mut world = world.get_mut();
        world.edit_voxel(target, cobblestone, 1);
        world.edit_voxel(target, 0, 1);
    }

    scheduler.shutdown();
    info!(
        "Worker stopped with {} meshes never handed off",
        scheduler.finished_mesh_count()
    );

    match persistence::save_world(&mut world.get_mut()) {
        Ok(saved) => info!("Session saved, {saved} chunks written"),
        Err(err) => error!("Session save failed: {err}"),
    }

    let stats = world.get().stats;
    info!(
        "Session stats: {} generated, {} loaded, {} saved",
        stats.chunks_generated, stats.chunks_loaded, stats.chunks_saved
    );
}
