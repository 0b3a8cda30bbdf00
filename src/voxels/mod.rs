//! # Voxels Module
//!
//! This module contains the sparse occupancy hierarchy used to store a voxel volume
//! and to answer "is there anything here?" at several granularities.
//!
//! ## Architecture
//!
//! The hierarchy has three levels below the volume itself:
//!
//! * **Volume**: Sparse map from chunk coordinates to chunks, plus the flat buffers
//!   produced by the linearization pass
//! * **Chunk**: A 16x16x16 voxel region split into a 4x4x4 grid of sub-chunks
//! * **SubChunk**: A 4x4x4 voxel region holding the actual cells
//! * **VoxelCell**: The immutable per-voxel payload
//!
//! Every node below the volume carries a 64-bit occupancy mask. All levels share a
//! single bit-index convention for their 4x4x4 grid of children:
//!
//! ```text
//! bit = x | (y << 2) | (z << 4)        x, y, z in [0, 3]
//! ```
//!
//! This convention is part of the contract with any shader that marches the
//! uploaded masks and must not change.
//!
//! ## Coordinate Spaces
//!
//! A voxel coordinate `v` decomposes as `chunk = v / 16`, `local = v % 16`; the
//! local coordinate decomposes as `sub_chunk = local / 4`, `cell = local % 4`.
//!
//! ## Memory Management
//!
//! Chunks and sub-chunks are allocated lazily on the first write into their region
//! and dropped as soon as their occupancy mask returns to zero. Ownership is a strict
//! tree: every node has exactly one parent.

use cgmath::Point3;

pub mod cell;
pub mod chunk;
pub mod generation;
pub mod scene;
pub mod sub_chunk;
pub mod volume;

/// Edge length of a sub-chunk in voxels.
pub const SUB_CHUNK_DIMENSION: u32 = 4;
/// Edge length of a chunk measured in sub-chunks.
pub const SUB_CHUNKS_PER_AXIS: u32 = 4;
/// Edge length of a chunk in voxels.
pub const CHUNK_DIMENSION: u32 = SUB_CHUNK_DIMENSION * SUB_CHUNKS_PER_AXIS;
/// Number of child slots in any 4x4x4 node (one bit each in an occupancy mask).
pub const SLOTS_PER_NODE: usize = 64;
/// Number of `u32` words each voxel occupies in the dense payload buffer.
pub const WORDS_PER_VOXEL: usize = 4;
/// Number of entries in a volume's material palette.
pub const MATERIAL_COUNT: usize = 256;

/// Computes the occupancy bit index of a child at `(x, y, z)` in a 4x4x4 grid.
///
/// Callers are expected to pass coordinates in `[0, 3]`.
#[inline]
pub const fn bit_index(x: u32, y: u32, z: u32) -> u32 {
    x | (y << 2) | (z << 4)
}

/// Inverse of [`bit_index`].
#[inline]
pub fn bit_position(index: u32) -> Point3<u32> {
    Point3::new(index & 0x3, (index >> 2) & 0x3, (index >> 4) & 0x3)
}

#[inline]
fn in_node_bounds(x: u32, y: u32, z: u32) -> bool {
    x < 4 && y < 4 && z < 4
}
