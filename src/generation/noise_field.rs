//! # Noise Field
//!
//! Seeded coherent-noise sampling for terrain generation. Wraps
//! `noise::Perlin` behind the two sampling shapes the generator needs: a
//! normalized 2D sample for heightmaps and gates, and a thresholded 3D
//! predicate for ore veins and caves.

use cgmath::Point3;
use noise::{NoiseFn, Perlin};

use crate::voxels::chunk::CHUNK_WIDTH;

/// Offset added to every sample coordinate.
///
/// Keeps integer voxel positions off the noise lattice, where Perlin noise
/// is identically zero.
const SAMPLE_EPSILON: f64 = 0.1;

/// A seeded Perlin noise source.
///
/// Pure: every sample is a function of the seed and the inputs alone, so two
/// fields with the same seed agree everywhere. All world generation
/// determinism flows from this type.
pub struct NoiseField {
    perlin: Perlin,
}

impl NoiseField {
    /// Creates a noise field for the given world seed.
    pub fn new(seed: i32) -> Self {
        Self {
            perlin: Perlin::new(seed as u32),
        }
    }

    /// Samples 2D noise at a world column, normalized to [0,1].
    ///
    /// Coordinates are scaled down by the chunk width before `scale` is
    /// applied, so biome-sized features span many chunks at scale values
    /// near 1.
    ///
    /// # Arguments
    /// * `x`, `z` - Global voxel column position
    /// * `offset` - Shifts the sample domain, decorrelating independent uses
    /// * `scale` - Feature frequency; larger values give smaller features
    pub fn sample_2d(&self, x: f64, z: f64, offset: f64, scale: f64) -> f64 {
        let sx = (x + SAMPLE_EPSILON) / CHUNK_WIDTH as f64 * scale + offset;
        let sz = (z + SAMPLE_EPSILON) / CHUNK_WIDTH as f64 * scale + offset;

        normalize(self.perlin.get([sx, sz]))
    }

    /// Thresholded 3D noise predicate at a world voxel position.
    ///
    /// Returns true iff the normalized sample exceeds `threshold`. Used for
    /// lode carving, where each rule supplies its own offset, scale, and
    /// threshold.
    pub fn sample_3d(&self, position: Point3<i32>, offset: f64, scale: f64, threshold: f64) -> bool {
        let sx = (position.x as f64 + offset + SAMPLE_EPSILON) * scale;
        let sy = (position.y as f64 + offset + SAMPLE_EPSILON) * scale;
        let sz = (position.z as f64 + offset + SAMPLE_EPSILON) * scale;

        normalize(self.perlin.get([sx, sy, sz])) > threshold
    }
}

/// Maps a raw Perlin sample from [-1,1] into [0,1].
fn normalize(sample: f64) -> f64 {
    ((sample + 1.0) * 0.5).clamp(0.0, 1.0)
}
