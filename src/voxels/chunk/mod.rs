//! # Chunk Module
//!
//! This module provides the `Chunk` struct, a 16x16x16 voxel region subdivided into a
//! 4x4x4 grid of lazily allocated sub-chunks.
//!
//! ## Memory Optimization
//!
//! A chunk only allocates the sub-chunks that contain at least one voxel:
//! - `bitmask`: one bit per sub-chunk slot, set when that sub-chunk is occupied
//! - `sub_chunks`: boxed sub-chunks, present only where the matching bit is set
//!
//! Emptiness cascades upward. When clearing a voxel leaves its sub-chunk with a zero
//! mask, the sub-chunk is dropped and the chunk's bit for it is cleared in the same
//! call, so a live sub-chunk is never empty.
//!
//! ### Performance Characteristics
//! - **Occupancy Check**: O(1) - a single bit test per level
//! - **Voxel Lookup**: O(1) - two array indexings
//! - **Iteration**: O(occupied) - driven by the masks, see [`chunk_iteration`]

use cgmath::Point3;
use log::trace;

use super::cell::VoxelCell;
use super::sub_chunk::SubChunk;
use super::{bit_index, in_node_bounds, CHUNK_DIMENSION, SLOTS_PER_NODE};
use chunk_iteration::OccupancyIterator;

pub mod chunk_iteration;

/// Represents a 16x16x16 region of voxels.
///
/// Voxel-local coordinates are in `[0, 15]`; the sub-chunk holding a voxel is
/// `local >> 2` and the cell inside it is `local & 3`.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    /// Bit `x | (y << 2) | (z << 4)` is set when sub-chunk `(x, y, z)` is occupied.
    bitmask: u64,
    /// Sub-chunk storage in bit-index order.
    sub_chunks: [Option<Box<SubChunk>>; SLOTS_PER_NODE],
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunk {
    /// Creates a new, completely empty chunk.
    pub fn new() -> Self {
        Chunk {
            bitmask: 0,
            sub_chunks: std::array::from_fn(|_| None),
        }
    }

    /// Stores `cell` at the voxel-local coordinates `(x, y, z)`.
    ///
    /// The owning sub-chunk is allocated if it does not exist yet.
    ///
    /// # Arguments
    /// * `x` - X coordinate within the chunk (0..16)
    /// * `y` - Y coordinate within the chunk (0..16)
    /// * `z` - Z coordinate within the chunk (0..16)
    /// * `cell` - The payload to store
    ///
    /// Out-of-range coordinates are a no-op.
    pub fn set(&mut self, x: u32, y: u32, z: u32, cell: VoxelCell) {
        if !in_chunk_bounds(x, y, z) {
            trace!("Ignoring chunk write at ({}, {}, {})", x, y, z);
            return;
        }

        let index = bit_index(x >> 2, y >> 2, z >> 2);
        self.sub_chunks[index as usize]
            .get_or_insert_with(Box::default)
            .set(x & 0x3, y & 0x3, z & 0x3, cell);
        self.bitmask |= 1u64 << index;

        debug_assert!(self.slot_is_consistent(index as usize));
    }

    /// Removes the voxel at the voxel-local coordinates `(x, y, z)`.
    ///
    /// If this empties the owning sub-chunk, the sub-chunk is dropped and its bit
    /// cleared. Clearing an empty voxel or an out-of-range coordinate is a no-op.
    pub fn clear(&mut self, x: u32, y: u32, z: u32) {
        if !in_chunk_bounds(x, y, z) {
            trace!("Ignoring chunk clear at ({}, {}, {})", x, y, z);
            return;
        }

        let index = bit_index(x >> 2, y >> 2, z >> 2);
        let slot = &mut self.sub_chunks[index as usize];
        let Some(sub_chunk) = slot else {
            return;
        };

        sub_chunk.clear(x & 0x3, y & 0x3, z & 0x3);

        if sub_chunk.is_empty() {
            *slot = None;
            self.bitmask &= !(1u64 << index);
        }

        debug_assert!(self.slot_is_consistent(index as usize));
    }

    /// Drops every sub-chunk.
    pub fn clear_all(&mut self) {
        self.sub_chunks = std::array::from_fn(|_| None);
        self.bitmask = 0;
    }

    /// Returns the voxel at the voxel-local coordinates `(x, y, z)`, if any.
    pub fn get(&self, x: u32, y: u32, z: u32) -> Option<&VoxelCell> {
        if !in_chunk_bounds(x, y, z) {
            return None;
        }

        self.get_sub_chunk(x >> 2, y >> 2, z >> 2)?
            .get(x & 0x3, y & 0x3, z & 0x3)
    }

    /// Returns the sub-chunk at the sub-chunk coordinates `(x, y, z)` in `[0, 3]`.
    ///
    /// Out-of-range coordinates return `None`.
    pub fn get_sub_chunk(&self, x: u32, y: u32, z: u32) -> Option<&SubChunk> {
        if !in_node_bounds(x, y, z) {
            return None;
        }

        self.sub_chunks[bit_index(x, y, z) as usize].as_deref()
    }

    /// The sub-chunk occupancy mask, bit `x | (y << 2) | (z << 4)` per sub-chunk.
    #[inline]
    pub fn occupancy_mask(&self) -> u64 {
        self.bitmask
    }

    /// `true` when no sub-chunk is allocated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bitmask == 0
    }

    /// Total number of occupied voxels in the chunk.
    pub fn voxel_count(&self) -> usize {
        self.sub_chunks().map(|(_, sub_chunk)| sub_chunk.len()).sum()
    }

    /// Iterates the allocated sub-chunks as `(sub_chunk_position, sub_chunk)` pairs.
    pub fn sub_chunks(&self) -> impl Iterator<Item = (Point3<u32>, &SubChunk)> + '_ {
        OccupancyIterator::new(self.bitmask).filter_map(move |(index, position)| {
            self.sub_chunks[index]
                .as_deref()
                .map(|sub_chunk| (position, sub_chunk))
        })
    }

    /// Checks the structural invariants: a bit is set exactly when its sub-chunk is
    /// allocated, and no allocated sub-chunk is empty or internally inconsistent.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        (0..SLOTS_PER_NODE).all(|index| self.slot_is_consistent(index))
    }

    fn slot_is_consistent(&self, index: usize) -> bool {
        let bit_set = self.bitmask & (1u64 << index) != 0;
        match &self.sub_chunks[index] {
            Some(sub_chunk) => bit_set && !sub_chunk.is_empty() && sub_chunk.is_consistent(),
            None => !bit_set,
        }
    }
}

#[inline]
fn in_chunk_bounds(x: u32, y: u32, z: u32) -> bool {
    x < CHUNK_DIMENSION && y < CHUNK_DIMENSION && z < CHUNK_DIMENSION
}
