//! # Sub-Chunk Module
//!
//! This module provides `SubChunk`, the finest level of the occupancy hierarchy:
//! a 4x4x4 grid of optional cells plus a 64-bit mask with one bit per slot.
//!
//! ## Bounds Policy
//!
//! Coordinates outside `[0, 3]` are ignored by every mutating call and read back as
//! absent. This keeps bulk writers (file loaders, procedural fills) from having to
//! pre-clip their input.

use cgmath::Point3;
use log::trace;

use super::cell::VoxelCell;
use super::chunk::chunk_iteration::OccupancyIterator;
use super::{bit_index, in_node_bounds, SLOTS_PER_NODE};

/// A 4x4x4 block of voxel cells.
///
/// Slots are stored in bit-index order, so slot `i` corresponds to bit `i` of
/// `bitmask`. Invariant: a bit is set exactly when its slot holds a cell.
#[derive(Clone, Debug, PartialEq)]
pub struct SubChunk {
    bitmask: u64,
    cells: [Option<VoxelCell>; SLOTS_PER_NODE],
}

impl Default for SubChunk {
    fn default() -> Self {
        Self::new()
    }
}

impl SubChunk {
    /// Creates an empty sub-chunk.
    pub fn new() -> Self {
        SubChunk {
            bitmask: 0,
            cells: [None; SLOTS_PER_NODE],
        }
    }

    /// Stores `cell` at `(x, y, z)`, replacing any previous occupant.
    ///
    /// Out-of-range coordinates are a no-op.
    pub fn set(&mut self, x: u32, y: u32, z: u32, cell: VoxelCell) {
        if !in_node_bounds(x, y, z) {
            trace!("Ignoring sub-chunk write at ({}, {}, {})", x, y, z);
            return;
        }

        let index = bit_index(x, y, z);
        self.cells[index as usize] = Some(cell);
        self.bitmask |= 1u64 << index;
    }

    /// Removes the occupant at `(x, y, z)`.
    ///
    /// Clearing an empty slot leaves the sub-chunk unchanged. Out-of-range
    /// coordinates are a no-op.
    pub fn clear(&mut self, x: u32, y: u32, z: u32) {
        if !in_node_bounds(x, y, z) {
            trace!("Ignoring sub-chunk clear at ({}, {}, {})", x, y, z);
            return;
        }

        let index = bit_index(x, y, z);
        self.cells[index as usize] = None;
        self.bitmask &= !(1u64 << index);
    }

    /// Returns the occupant at `(x, y, z)`, or `None` if the slot is empty or the
    /// coordinates are out of range.
    pub fn get(&self, x: u32, y: u32, z: u32) -> Option<&VoxelCell> {
        if !in_node_bounds(x, y, z) {
            return None;
        }

        self.cells[bit_index(x, y, z) as usize].as_ref()
    }

    /// Removes every occupant.
    pub fn clear_all(&mut self) {
        self.cells = [None; SLOTS_PER_NODE];
        self.bitmask = 0;
    }

    /// The occupancy mask, bit `x | (y << 2) | (z << 4)` per slot.
    #[inline]
    pub fn occupancy_mask(&self) -> u64 {
        self.bitmask
    }

    /// Number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.bitmask.count_ones() as usize
    }

    /// `true` when no slot is occupied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bitmask == 0
    }

    /// Iterates the occupied slots as `(local_position, cell)` pairs.
    pub fn cells(&self) -> impl Iterator<Item = (Point3<u32>, &VoxelCell)> + '_ {
        OccupancyIterator::new(self.bitmask).filter_map(move |(index, position)| {
            self.cells[index].as_ref().map(|cell| (position, cell))
        })
    }

    /// Checks that the mask agrees with the slot contents.
    pub(crate) fn is_consistent(&self) -> bool {
        self.cells
            .iter()
            .enumerate()
            .all(|(index, slot)| slot.is_some() == (self.bitmask & (1u64 << index) != 0))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use cgmath::Vector3;

    fn cell(id: u8) -> VoxelCell {
        VoxelCell::material(Vector3::new(0.0, 1.0, 0.0), id)
    }

    #[test]
    fn set_then_get_every_slot() {
        for z in 0..4 {
            for y in 0..4 {
                for x in 0..4 {
                    let mut sub_chunk = SubChunk::new();
                    let id = bit_index(x, y, z) as u8;
                    sub_chunk.set(x, y, z, cell(id));

                    assert_eq!(sub_chunk.get(x, y, z), Some(&cell(id)));
                    assert_eq!(sub_chunk.occupancy_mask(), 1u64 << id);
                }
            }
        }
    }

    #[test]
    fn set_overwrites_previous_occupant() {
        let mut sub_chunk = SubChunk::new();
        sub_chunk.set(1, 2, 3, cell(1));
        sub_chunk.set(1, 2, 3, cell(2));

        assert_eq!(sub_chunk.get(1, 2, 3), Some(&cell(2)));
        assert_eq!(sub_chunk.len(), 1);
    }

    #[test]
    fn clear_restores_absent_and_is_idempotent() {
        let mut sub_chunk = SubChunk::new();
        sub_chunk.set(3, 0, 1, cell(7));
        sub_chunk.set(0, 0, 0, cell(8));

        sub_chunk.clear(3, 0, 1);
        let once = sub_chunk.clone();
        sub_chunk.clear(3, 0, 1);

        assert_eq!(sub_chunk, once);
        assert_eq!(sub_chunk.get(3, 0, 1), None);
        assert_eq!(sub_chunk.occupancy_mask(), 1);
    }

    #[test]
    fn clearing_empty_slot_keeps_mask() {
        let mut sub_chunk = SubChunk::new();
        sub_chunk.set(2, 2, 2, cell(0));
        let mask = sub_chunk.occupancy_mask();

        sub_chunk.clear(1, 1, 1);
        assert_eq!(sub_chunk.occupancy_mask(), mask);
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut sub_chunk = SubChunk::new();
        sub_chunk.set(4, 0, 0, cell(1));
        sub_chunk.set(0, 9, 0, cell(1));
        sub_chunk.clear(0, 0, 4);

        assert!(sub_chunk.is_empty());
        assert_eq!(sub_chunk.get(4, 0, 0), None);
    }

    #[test]
    fn clear_all_resets_everything() {
        let mut sub_chunk = SubChunk::new();
        sub_chunk.set(0, 0, 0, cell(1));
        sub_chunk.set(3, 3, 3, cell(2));
        sub_chunk.clear_all();

        assert_eq!(sub_chunk, SubChunk::new());
    }

    #[test]
    fn cells_visits_only_occupants() {
        let mut sub_chunk = SubChunk::new();
        sub_chunk.set(1, 0, 0, cell(1));
        sub_chunk.set(0, 0, 2, cell(2));

        let visited: Vec<_> = sub_chunk.cells().map(|(p, c)| (p, *c)).collect();
        assert_eq!(
            visited,
            vec![(Point3::new(1, 0, 0), cell(1)), (Point3::new(0, 0, 2), cell(2))]
        );
        assert!(sub_chunk.is_consistent());
    }
}
