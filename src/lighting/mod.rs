//! # Light Propagation
//!
//! Natural (sky) light for chunk columns plus the flood rules that keep the
//! 0..=15 light field consistent across edits.
//!
//! ## Model
//!
//! Each voxel stores one light level. A lit voxel casts
//! `light - opacity - 1` (floored at zero) onto its six face neighbors, so
//! light loses at least one level per step and more through translucent
//! blocks. Sky light enters every column from the top at the maximum level
//! and stops at the first voxel with any opacity.
//!
//! ## Boundaries
//!
//! All lookups here go through [`WorldData::loaded_voxel`], which never
//! creates chunks. Light simply stops at the loaded frontier; when the
//! missing neighbor later loads, its own natural-light pass seeds the seam.
//!
//! ## Worklists
//!
//! Floods run on explicit worklists rather than recursion: a LIFO stack for
//! darkening (strictly shrinking, each voxel zeroed at most once) and a FIFO
//! queue for raising (bounded by the maximum light level). Removals complete
//! before additions so the re-lit region sees its final sources.

use std::collections::VecDeque;

use cgmath::{Point3, Vector3};

use crate::voxels::block::properties;
use crate::voxels::chunk::{ChunkCoord, CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::voxels::voxel_face::FACE_CHECKS;
use crate::voxels::world::WorldData;
use crate::voxels::MAX_LIGHT_LEVEL;

/// Seeds natural light for every column of a chunk, then floods once.
///
/// This is the population-time pass: the grid arrives with light all zero,
/// so no darkening can occur and the column scan can store values directly.
/// Every voxel bright enough to cast is then propagated in a single sweep,
/// which also pushes light across seams into loaded neighbor chunks.
pub fn recalculate_natural_light(world: &mut WorldData, coord: ChunkCoord) {
    let origin = coord.origin();
    let mut seeds = VecDeque::new();

    {
        let Some(chunk) = world.chunk_mut(coord) else {
            log::error!(
                "Natural light pass requested for absent chunk ({}, {})",
                coord.x,
                coord.z
            );
            return;
        };

        for x in 0..CHUNK_WIDTH {
            for z in 0..CHUNK_WIDTH {
                let mut obstructed = false;
                for y in (0..CHUNK_HEIGHT).rev() {
                    let cell = chunk.voxel(x, y, z);
                    let target = if obstructed {
                        0
                    } else if properties(cell.id).opacity > 0 {
                        obstructed = true;
                        0
                    } else {
                        MAX_LIGHT_LEVEL
                    };

                    if cell.light != target {
                        chunk.set_light(x, y, z, target);
                    }
                    if target > 1 {
                        seeds.push_back(Point3::new(
                            origin.x + x as i32,
                            y as i32,
                            origin.z + z as i32,
                        ));
                    }
                }
            }
        }
    }

    propagate_from(world, seeds);
}

/// Re-seeds natural light for one column, from `start_y` downward.
///
/// Used after an edit changes a voxel's opacity under open sky. Unlike the
/// whole-chunk pass this walks an already lit region, so every change goes
/// through [`set_voxel_light`] and the darkening and raising floods fire as
/// the walk descends.
pub fn cast_natural_light(
    world: &mut WorldData,
    coord: ChunkCoord,
    x: usize,
    z: usize,
    start_y: i32,
) {
    let mut start_y = start_y;
    if start_y > CHUNK_HEIGHT as i32 - 1 {
        log::warn!("Attempted to cast natural light from above the world");
        start_y = CHUNK_HEIGHT as i32 - 1;
    }

    let origin = coord.origin();
    let mut obstructed = false;
    for y in (0..=start_y).rev() {
        let global = Point3::new(origin.x + x as i32, y, origin.z + z as i32);
        let Some(voxel) = world.loaded_voxel(global) else {
            return;
        };

        if obstructed {
            set_voxel_light(world, global, 0);
        } else if properties(voxel.id).opacity > 0 {
            set_voxel_light(world, global, 0);
            obstructed = true;
        } else {
            set_voxel_light(world, global, MAX_LIGHT_LEVEL);
        }
    }
}

/// Sets one voxel's light level and restores consistency around it.
///
/// No-op when the value is unchanged or the owning chunk is absent. A
/// decrease zeroes every neighbor that could only have been lit by this
/// voxel (light at most the old cast value), transitively, and queues the
/// brighter survivors on the flood frontier to push light back into the
/// darkened region. An increase past 1 floods outward directly.
pub fn set_voxel_light(world: &mut WorldData, position: Point3<i32>, value: u8) {
    let value = value.min(MAX_LIGHT_LEVEL);
    let Some(current) = world.loaded_voxel(position) else {
        return;
    };
    if current.light == value {
        return;
    }

    let old_light = current.light;
    let old_cast = current.cast_light();
    world.write_light(position, value);

    let mut frontier = VecDeque::new();

    if value < old_light {
        let mut darken = vec![(position, old_cast)];
        while let Some((from, cast)) = darken.pop() {
            for direction in FACE_CHECKS.iter() {
                let neighbor_pos = from + direction;
                let Some(neighbor) = world.loaded_voxel(neighbor_pos) else {
                    continue;
                };
                if neighbor.light <= cast {
                    if neighbor.light > 0 {
                        let neighbor_cast = neighbor.cast_light();
                        world.write_light(neighbor_pos, 0);
                        darken.push((neighbor_pos, neighbor_cast));
                    }
                } else {
                    frontier.push_back(neighbor_pos);
                }
            }
        }
    } else if value > 1 {
        frontier.push_back(position);
    }

    propagate_from(world, frontier);
}

/// Raises neighbors from every queued voxel until the field is stable.
///
/// Voxels are re-read when popped, so stale queue entries settle on current
/// values. Only strictly darker neighbors are raised, which bounds the
/// flood by the maximum light level.
fn propagate_from(world: &mut WorldData, mut queue: VecDeque<Point3<i32>>) {
    while let Some(position) = queue.pop_front() {
        let Some(voxel) = world.loaded_voxel(position) else {
            continue;
        };
        if voxel.light < 2 {
            continue;
        }

        let cast = voxel.cast_light();
        for direction in FACE_CHECKS.iter() {
            let neighbor_pos = position + direction;
            let Some(neighbor) = world.loaded_voxel(neighbor_pos) else {
                continue;
            };
            if neighbor.light < cast {
                world.write_light(neighbor_pos, cast);
                queue.push_back(neighbor_pos);
            }
        }
    }
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

    fn air_world() -> (WorldData, ChunkCoord) {
        // Chunks outside the world volume generate as pure air.
        let mut world = WorldData::with_biomes("t", 42, flat_biome());
        let coord = ChunkCoord::new(-5, -5);
        world.ensure_chunk(coord);
        (world, coord)
    }

    #[test]
    fn open_columns_carry_full_sunlight() {
        let (world, coord) = air_world();
        let chunk = world.chunk(coord).unwrap();
        for y in [0, 31, 64, 127] {
            assert_eq!(chunk.voxel(8, y, 8).light, MAX_LIGHT_LEVEL);
        }
    }

    #[test]
    fn sunlight_attenuates_through_water() {
        let mut world = WorldData::with_biomes("t", 7, flat_biome());
        let coord = ChunkCoord::new(5, 5);
        world.ensure_chunk(coord);
        let origin = coord.origin();

        // Terrain tops out below sea level here, so deep columns sit under
        // a water span reaching up to height 50. Find one comfortably
        // submerged so every probed row is water.
        let mut column = None;
        'search: for x in 4..12 {
            for z in 4..12 {
                let (height, _) = world
                    .generator()
                    .terrain_height(origin.x + x, origin.z + z);
                if height <= 46 {
                    column = Some((origin.x + x, origin.z + z));
                    break 'search;
                }
            }
        }
        let (cx, cz) = column.expect("no submerged column in probe area");
        let probe =
            |world: &WorldData, y: i32| world.loaded_voxel(Point3::new(cx, y, cz)).unwrap();

        // Air casts 14 onto the surface row; each water step then costs
        // its opacity of 3 plus the regular 1.
        assert_eq!(probe(&world, 51).light, MAX_LIGHT_LEVEL);
        assert_eq!(probe(&world, 50).light, 14);
        assert_eq!(probe(&world, 49).light, 10);
        assert_eq!(probe(&world, 48).light, 6);
    }

    #[test]
    fn ground_shadows_its_column() {
        let mut world = WorldData::with_biomes("t", 7, flat_biome());
        let coord = ChunkCoord::new(5, 5);
        world.ensure_chunk(coord);
        let origin = coord.origin();

        for x in 4..12usize {
            for z in 4..12usize {
                let (height, _) = world
                    .generator()
                    .terrain_height(origin.x + x as i32, origin.z + z as i32);
                let chunk = world.chunk(coord).unwrap();
                // Everything below the opaque surface never sees full sky.
                for y in 0..height as usize {
                    assert!(chunk.voxel(x, y, z).light < MAX_LIGHT_LEVEL);
                }
            }
        }
    }

    #[test]
    fn zeroing_open_air_is_filled_back_by_neighbors() {
        let (mut world, coord) = air_world();
        let origin = coord.origin();
        let position = Point3::new(origin.x + 8, 64, origin.z + 8);

        set_voxel_light(&mut world, position, 0);

        // Six max-lit neighbors immediately push their cast back in.
        assert_eq!(
            world.loaded_voxel(position).unwrap().light,
            MAX_LIGHT_LEVEL - 1
        );
    }

    #[test]
    fn unchanged_values_do_not_queue_rebuilds() {
        let (mut world, coord) = air_world();
        world.activate_chunk(coord);
        let queue = world.update_queue();
        queue.clear();

        let origin = coord.origin();
        set_voxel_light(
            &mut world,
            Point3::new(origin.x + 8, 64, origin.z + 8),
            MAX_LIGHT_LEVEL,
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn absent_chunks_ignore_light_writes() {
        let mut world = WorldData::with_biomes("t", 42, flat_biome());
        set_voxel_light(&mut world, Point3::new(8, 64, 8), 9);
        assert_eq!(world.loaded_chunk_count(), 0);
    }

    #[test]
    fn light_changes_queue_active_chunks_for_rebuild() {
        let (mut world, coord) = air_world();
        world.activate_chunk(coord);
        let queue = world.update_queue();
        queue.clear();

        let origin = coord.origin();
        set_voxel_light(&mut world, Point3::new(origin.x + 8, 64, origin.z + 8), 0);

        assert!(queue.contains(&coord));
    }
}
