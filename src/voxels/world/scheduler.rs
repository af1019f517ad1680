//! # Chunk Scheduler
//!
//! Drives chunk work around a moving observer: staging never-seen chunks
//! for creation, keeping the world's active window in sync, and servicing
//! the mesh-rebuild queue either inline or on a worker thread.
//!
//! ## Queues
//!
//! Three hand-offs connect the pieces. `chunks_to_create` stages chunks
//! the view window wants but the world has never loaded; one is populated
//! per tick to spread the cost. The shared rebuild queue (owned by the
//! world, cloned here) collects chunks whose mesh is stale. Finished
//! meshes land in `finished_meshes` for the renderer to drain, one per
//! call.
//!
//! ## Locking
//!
//! The world lock is always taken before any queue lock, and queue locks
//! are never held across a world operation. The worker and the foreground
//! tick follow the same discipline, so the two never deadlock.

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use cgmath::Point3;
use lru::LruCache;

use crate::core::{LockedQueue, MtResource};
use crate::meshing::{self, ChunkMesh};
use crate::settings::GameSettings;
use crate::voxels::chunk::ChunkCoord;
use crate::voxels::world::WorldData;

/// Upper bound on remembered mesh hand-offs. A chunk evicted from this
/// cache gets a fresh rebuild when it re-enters the view window.
const RETAINED_MESH_BOUND: usize = 10000;

/// Schedules chunk creation, rebuilds, and mesh hand-off for one world.
pub struct ChunkScheduler {
    world: MtResource<WorldData>,
    update_queue: LockedQueue<ChunkCoord>,
    finished_meshes: LockedQueue<ChunkMesh>,
    chunks_to_create: VecDeque<ChunkCoord>,
    active_chunks: Vec<ChunkCoord>,
    last_observer_chunk: Option<ChunkCoord>,
    least_recently_meshed: LruCache<ChunkCoord, ()>,
    view_distance: i32,
    enable_threading: bool,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl ChunkScheduler {
    /// Creates a scheduler for `world`, spawning the worker thread when
    /// threading is enabled in `settings`.
    pub fn new(world: MtResource<WorldData>, settings: &GameSettings) -> Self {
        let update_queue = world.get().update_queue();
        let mut scheduler = Self {
            world,
            update_queue,
            finished_meshes: LockedQueue::new(),
            chunks_to_create: VecDeque::new(),
            active_chunks: Vec::new(),
            last_observer_chunk: None,
            least_recently_meshed: LruCache::new(NonZeroUsize::new(RETAINED_MESH_BOUND).unwrap()),
            view_distance: settings.view_distance.max(1),
            enable_threading: settings.enable_threading,
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
        };
        if scheduler.enable_threading {
            scheduler.spawn_worker();
        }
        scheduler
    }

    fn spawn_worker(&mut self) {
        let world = self.world.clone();
        let update_queue = self.update_queue.clone();
        let finished_meshes = self.finished_meshes.clone();
        let stop = Arc::clone(&self.stop);

        self.worker = Some(thread::spawn(move || {
            log::info!("Chunk update worker started");
            while !stop.load(Ordering::Relaxed) {
                let applied = world.get_mut().apply_modifications();
                let meshed = process_one_update(&world, &update_queue, &finished_meshes);
                if !applied && !meshed {
                    thread::sleep(Duration::from_millis(2));
                }
            }
            log::info!("Chunk update worker stopped");
        }));
    }

    /// One foreground step for an observer at `observer`.
    ///
    /// Refreshes the view window when the observer crossed a chunk border,
    /// populates at most one staged chunk, and, when no worker thread is
    /// running, applies pending modifications and services one rebuild.
    pub fn tick(&mut self, observer: Point3<f32>) {
        let observer_chunk = ChunkCoord::from_global(observer);
        if self.last_observer_chunk != Some(observer_chunk) {
            self.check_view_distance(observer_chunk);
        }

        if let Some(coord) = self.chunks_to_create.pop_front() {
            self.world.get_mut().ensure_chunk(coord);
            self.update_queue.enqueue(coord);
        }

        if !self.enable_threading {
            self.world.get_mut().apply_modifications();
            process_one_update(&self.world, &self.update_queue, &self.finished_meshes);
        }
    }

    /// Recomputes the active window around the observer's chunk.
    ///
    /// In-world chunks inside the window are activated; missing ones are
    /// staged for creation. A loaded chunk re-entering the window whose
    /// mesh hand-off has aged out of the retention cache is queued for a
    /// fresh rebuild. Chunks that left the window are deactivated, keeping
    /// their data in memory.
    fn check_view_distance(&mut self, observer_chunk: ChunkCoord) {
        self.last_observer_chunk = Some(observer_chunk);
        let mut previously_active = std::mem::take(&mut self.active_chunks);

        let mut world = self.world.get_mut();
        for x in (observer_chunk.x - self.view_distance)..(observer_chunk.x + self.view_distance) {
            for z in
                (observer_chunk.z - self.view_distance)..(observer_chunk.z + self.view_distance)
            {
                let coord = ChunkCoord::new(x, z);
                if coord.is_in_world() {
                    if !world.is_chunk_loaded(coord) {
                        if !self.chunks_to_create.contains(&coord) {
                            self.chunks_to_create.push_back(coord);
                        }
                    } else if !previously_active.contains(&coord)
                        && !self.least_recently_meshed.contains(&coord)
                    {
                        self.update_queue.enqueue(coord);
                    }
                    world.activate_chunk(coord);
                    self.active_chunks.push(coord);
                }
                previously_active.retain(|&c| c != coord);
            }
        }

        for leaver in previously_active {
            world.deactivate_chunk(leaver);
        }
    }

    /// Hands one finished mesh to the caller, oldest first.
    pub fn next_finished_mesh(&mut self) -> Option<ChunkMesh> {
        let mesh = self.finished_meshes.pop_front()?;
        if self.least_recently_meshed.len() == self.least_recently_meshed.cap().get() {
            self.least_recently_meshed.pop_lru();
        }
        self.least_recently_meshed.put(mesh.coord, ());
        Some(mesh)
    }

    /// Synchronously builds the whole region around the world spawn.
    ///
    /// Stages the spawn window, populates every staged chunk, applies the
    /// structure mods that generation banked, and drains the rebuild queue
    /// until every mesh is built. Blocks until the region is ready.
    pub fn generate_spawn_region(&mut self) {
        let spawn = self.world.get().spawn_position();
        self.check_view_distance(ChunkCoord::from_global(spawn));

        while let Some(coord) = self.chunks_to_create.pop_front() {
            self.world.get_mut().ensure_chunk(coord);
            self.update_queue.enqueue(coord);
        }

        self.world.get_mut().apply_modifications();
        while process_one_update(&self.world, &self.update_queue, &self.finished_meshes) {}

        let world = self.world.get();
        log::info!(
            "Spawn region ready: {} chunks in memory, {} meshes waiting",
            world.loaded_chunk_count(),
            self.finished_meshes.len()
        );
    }

    /// Stops and joins the worker thread. Idempotent.
    pub fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Chunk update worker panicked");
            }
        }
    }

    /// The chunk the observer was last seen in.
    pub fn observer_chunk(&self) -> Option<ChunkCoord> {
        self.last_observer_chunk
    }

    /// Number of chunks currently inside the view window.
    pub fn active_chunk_count(&self) -> usize {
        self.active_chunks.len()
    }

    /// Chunks staged for first-time creation.
    pub fn pending_creations(&self) -> usize {
        self.chunks_to_create.len()
    }

    /// Chunks queued for a mesh rebuild.
    pub fn pending_updates(&self) -> usize {
        self.update_queue.len()
    }

    /// Finished meshes not yet handed off.
    pub fn finished_mesh_count(&self) -> usize {
        self.finished_meshes.len()
    }
}

impl Drop for ChunkScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Services one entry of the rebuild queue.
///
/// Takes the world lock first, pops the first queued chunk whose data is
/// present, and leaves the rest queued. Returns whether a mesh was built.
fn process_one_update(
    world: &MtResource<WorldData>,
    update_queue: &LockedQueue<ChunkCoord>,
    finished_meshes: &LockedQueue<ChunkMesh>,
) -> bool {
    let mut world_guard = world.get_mut();
    let Some(coord) = update_queue.pop_front_where(|coord| world_guard.is_chunk_loaded(*coord))
    else {
        return false;
    };
    let Some(mesh) = meshing::build_chunk_mesh(&mut world_guard, coord) else {
        return false;
    };
    finished_meshes.push_back(mesh);
    true
}
