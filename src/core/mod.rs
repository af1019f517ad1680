//! # Core Module
//!
//! This module provides the concurrency primitives shared by the world store
//! and the chunk scheduler. Both wrap standard library synchronization types,
//! but make the protected region part of the type so callers cannot bypass
//! the locking discipline.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking
//! - `LockedQueue`: Mutex-protected FIFO with deduplicating inserts
//!
//! ## Usage
//! ```
//! use voxel_world::core::{LockedQueue, MtResource};
//!
//! // Thread-safe resource
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//!
//! // Shared work queue
//! let queue = LockedQueue::new();
//! queue.enqueue(1u32);
//! assert_eq!(queue.pop_front(), Some(1));
//! ```

pub mod locked_queue;
pub mod mt_resource;

// Re-export types for easier access
pub use locked_queue::LockedQueue;
pub use mt_resource::MtResource;
