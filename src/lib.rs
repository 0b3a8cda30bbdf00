#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Forge
//!
//! A sparse voxel volume built for GPU ray marching, with Rust and WGPU.
//!
//! Voxels are stored in a three-level occupancy hierarchy (volume, chunk, sub-chunk)
//! where every node carries a 64-bit mask of its occupied children. On demand the
//! hierarchy is linearized into flat buffers that a shader can traverse with a few
//! bit tests per level.
//!
//! ## Key Modules
//!
//! * `voxels` - The hierarchy, the linearization pass, scenes and procedural fills
//! * `rendering` - The renderer seam and a wgpu uploader for the flat buffers
//! * `demo` - A headless driver that builds a configurable scene
//!
//! ## Usage
//!
//! ```text
//! let mut volume = Volume::new(Vector3::new(2, 2, 2))?;
//! volume.set(Point3::new(5, 5, 5), VoxelCell::color(Vector3::new(1.0, 0.0, 0.0)));
//!
//! let mut scene = Scene::new();
//! scene.add_object(volume);
//! scene.draw(&mut renderer)?;
//! ```
//!
//! ## Performance Considerations
//!
//! * Empty regions cost nothing in the hierarchy; nodes are freed as soon as they
//!   empty out
//! * Rebuilds only happen after an edit and only visit occupied nodes
//! * Uploaders receive a generation number and can skip unchanged volumes

use log::info;

pub mod demo;
pub mod error;
pub mod rendering;
pub mod voxels;

pub use error::{UploadError, VolumeError};
pub use rendering::gpu_uploader::GpuVolumeUploader;
pub use rendering::VolumeRenderer;
pub use voxels::cell::VoxelCell;
pub use voxels::chunk::Chunk;
pub use voxels::scene::Scene;
pub use voxels::sub_chunk::SubChunk;
pub use voxels::volume::{Volume, VolumeBuffers};

/// Installs the global logger, writing to stdout and filtered by `RUST_LOG`.
///
/// Call once at program start.
pub fn init_logger() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
}
