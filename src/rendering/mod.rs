//! # Rendering Module
//!
//! The boundary between the voxel core and whatever draws it.
//!
//! The core never touches a GPU. After a rebuild it hands a [`VolumeBuffers`] view to
//! a [`VolumeRenderer`], which is free to upload, cache or ignore it. A wgpu-based
//! uploader is provided in [`gpu_uploader`]; tests and tools can implement the trait
//! on anything that records what it was given.
//!
//! ## Shader Contract
//!
//! * Occupancy masks are `u64` values uploaded little-endian, so a WGSL shader reads
//!   each one as `vec2<u32>(low, high)`.
//! * Bit `x | (y << 2) | (z << 4)` of a mask refers to child `(x, y, z)`.
//! * Grids are indexed `x + y * width + z * width * height`.
//! * Each voxel is four `u32` words: three `f32` bit patterns, then the material
//!   index (or `COLOR_CELL_TAG` for color cells).

use crate::voxels::volume::VolumeBuffers;

pub mod buffer_state;
pub mod gpu_uploader;

/// A consumer of linearized volumes.
pub trait VolumeRenderer {
    /// Error reported by this renderer. The core only propagates it.
    type Error;

    /// Receives the flat buffers of the volume at `object_index`.
    ///
    /// Called on every draw; `buffers.generation` only changes when the volume was
    /// actually rebuilt, so implementations can skip redundant uploads.
    fn draw_volume(
        &mut self,
        object_index: usize,
        buffers: VolumeBuffers<'_>,
    ) -> Result<(), Self::Error>;
}
