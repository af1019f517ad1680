//! # Voxel World Application Entry Point
//!
//! Runs a headless world session: the library's `run()` opens or creates
//! the default world, builds the spawn region, streams chunks while the
//! observer wanders, and saves on the way out.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release
//! ```

fn main() {
    voxel_world::run();
}
