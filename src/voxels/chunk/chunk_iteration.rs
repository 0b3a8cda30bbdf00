//! # Chunk Iteration Module
//!
//! This module provides an iterator over the set bits of a 64-bit occupancy mask.
//!
//! ## Mask-Driven Iteration
//!
//! Both chunks and sub-chunks keep a mask with one bit per child slot. Walking the
//! mask with `trailing_zeros` visits only the occupied slots, so iterating a nearly
//! empty node costs one step per occupant instead of 64 slot checks.

use cgmath::Point3;

use crate::voxels::bit_position;

/// An iterator over the occupied slots of a 4x4x4 node.
///
/// Yields `(bit_index, local_position)` pairs in ascending bit order, which is
/// x-fastest, then y, then z.
#[derive(Clone, Debug)]
pub struct OccupancyIterator {
    /// Bits that have not been visited yet
    remaining: u64,
}

impl OccupancyIterator {
    /// Creates an iterator over the set bits of `mask`.
    pub fn new(mask: u64) -> Self {
        OccupancyIterator { remaining: mask }
    }
}

impl Iterator for OccupancyIterator {
    type Item = (usize, Point3<u32>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let index = self.remaining.trailing_zeros();
        // Clear the lowest set bit
        self.remaining &= self.remaining - 1;

        Some((index as usize, bit_position(index)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.remaining.count_ones() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for OccupancyIterator {}
