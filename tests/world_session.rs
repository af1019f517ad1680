//! End-to-end world sessions: spawn-region generation, streaming, edits,
//! persistence across reopen, and cross-thread chunk requests.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Barrier};
use std::thread;

use cgmath::Point3;

use voxel_world::core::MtResource;
use voxel_world::generation::biome::BiomeDefinition;
use voxel_world::persistence;
use voxel_world::settings::GameSettings;
use voxel_world::voxels::chunk::ChunkCoord;
use voxel_world::voxels::world::scheduler::ChunkScheduler;
use voxel_world::voxels::world::WorldData;

fn temp_root(label: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!(
        "voxel-session-{label}-{}-{}",
        std::process::id(),
        fastrand::u64(..)
    ));
    fs::create_dir_all(&root).unwrap();
    root
}

fn flat_biome() -> Vec<BiomeDefinition> {
    vec![BiomeDefinition {
        name: "Flat",
        offset: 0.0,
        scale: 0.2,
        solid_ground_height: 60,
        terrain_height: 8,
        terrain_scale: 0.1,
        surface_block: 3,
        subsurface_block: 5,
        flora: None,
        lodes: vec![],
    }]
}

fn session_settings(enable_threading: bool) -> GameSettings {
    GameSettings {
        version: "test".into(),
        view_distance: 1,
        enable_threading,
    }
}

#[test]
fn full_session_round_trip() {
    let root = temp_root("roundtrip");

    let world = MtResource::new(persistence::load_world(&root, "integration", Some(4242)));
    let mut scheduler = ChunkScheduler::new(world.clone(), &session_settings(false));
    scheduler.generate_spawn_region();

    let spawn = world.get().spawn_position();
    let spawn_chunk = ChunkCoord::from_global(spawn);
    assert!(world.get().is_chunk_loaded(spawn_chunk));

    let mut meshed = HashSet::new();
    while let Some(mesh) = scheduler.next_finished_mesh() {
        assert!(!mesh.is_empty());
        meshed.insert(mesh.coord);
    }
    assert!(meshed.contains(&spawn_chunk));

    // Stack two blocks at head height, then break the lower one, leaving
    // the upper one floating.
    let base = Point3::new(
        spawn.x.floor() as i32,
        spawn.y.floor() as i32 + 2,
        spawn.z.floor() as i32,
    );
    let upper = Point3::new(base.x, base.y + 1, base.z);
    {
        let mut world = world.get_mut();
        world.edit_voxel(base, 9, 1);
        world.edit_voxel(upper, 9, 1);
        world.edit_voxel(base, 0, 1);
    }
    assert_eq!(world.get().voxel_id(base), 0);
    assert_eq!(world.get().voxel_id(upper), 9);

    persistence::save_world(&mut world.get_mut()).unwrap();
    scheduler.shutdown();

    // Reopen from disk: the stored seed wins and the edits are back.
    let mut reopened = persistence::load_world(&root, "integration", None);
    assert_eq!(reopened.seed, 4242);

    reopened.ensure_chunk(spawn_chunk);
    assert_eq!(reopened.stats.chunks_loaded, 1);
    assert_eq!(reopened.stats.chunks_generated, 0);
    assert_eq!(reopened.loaded_voxel(base).unwrap().id, 0);
    assert_eq!(reopened.loaded_voxel(upper).unwrap().id, 9);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn concurrent_requests_generate_each_chunk_once() {
    let world = MtResource::new(WorldData::with_biomes("concurrent", 7, flat_biome()));
    let coord = ChunkCoord::new(33, 33);

    let workers = 8;
    let barrier = Arc::new(Barrier::new(workers));
    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let world = world.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut guard = world.get_mut();
                assert!(guard.request_chunk(coord, true).is_some());
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let world = world.get();
    assert_eq!(world.stats.chunks_generated, 1);
    assert_eq!(world.loaded_chunk_count(), 1);
}

#[test]
fn threaded_session_applies_edits_consistently() {
    let world = MtResource::new(WorldData::with_biomes("threaded", 42, flat_biome()));
    let mut scheduler = ChunkScheduler::new(world.clone(), &session_settings(true));
    scheduler.generate_spawn_region();

    let spawn = world.get().spawn_position();
    let mut observer = spawn;
    let mut edited = Vec::new();

    // Edit while the worker thread generates and meshes underneath us.
    for step in 0..48 {
        observer.x += 0.5;
        scheduler.tick(observer);

        let position = Point3::new(spawn.x.floor() as i32 + (step % 8), 100, spawn.z.floor() as i32);
        world.get_mut().edit_voxel(position, 7, 1);
        edited.push(position);

        while scheduler.next_finished_mesh().is_some() {}
    }

    scheduler.shutdown();

    let world = world.get();
    for position in edited {
        assert_eq!(world.loaded_voxel(position).unwrap().id, 7);
    }
}
