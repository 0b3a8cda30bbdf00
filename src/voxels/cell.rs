//! # Voxel Cell Module
//!
//! This module defines `VoxelCell`, the leaf payload stored for every occupied voxel,
//! and its packed four-word encoding used by the dense payload buffer.

use cgmath::Vector3;

use super::WORDS_PER_VOXEL;

/// Value of word 3 in the packed encoding of a [`VoxelCell::Color`].
///
/// Material indices are `u8` palette offsets, so a material cell packs word 3 in
/// `[0, 255]` and can never produce this value.
pub const COLOR_CELL_TAG: u32 = u32::MAX;

/// Immutable attributes of a single voxel.
///
/// Cells are small `Copy` values; writing a cell into a volume always replaces the
/// previous occupant wholesale.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum VoxelCell {
    /// A surface normal plus an index into the owning volume's material palette.
    Material {
        /// Surface normal used by the shader.
        normal: Vector3<f32>,
        /// Index into the material palette.
        material_id: u8,
    },
    /// A plain RGB color.
    Color {
        /// Linear RGB color.
        color: Vector3<f32>,
    },
}

impl VoxelCell {
    /// Creates a material cell.
    pub fn material(normal: Vector3<f32>, material_id: u8) -> Self {
        VoxelCell::Material {
            normal,
            material_id,
        }
    }

    /// Creates a plain color cell.
    pub fn color(color: Vector3<f32>) -> Self {
        VoxelCell::Color { color }
    }

    /// Packs the cell into the four `u32` words written to the payload buffer.
    ///
    /// Words 0..2 hold the IEEE-754 bit patterns of the normal (or color) components.
    /// Word 3 holds the material index, or [`COLOR_CELL_TAG`] for color cells.
    pub fn to_words(&self) -> [u32; WORDS_PER_VOXEL] {
        match *self {
            VoxelCell::Material {
                normal,
                material_id,
            } => [
                normal.x.to_bits(),
                normal.y.to_bits(),
                normal.z.to_bits(),
                u32::from(material_id),
            ],
            VoxelCell::Color { color } => [
                color.x.to_bits(),
                color.y.to_bits(),
                color.z.to_bits(),
                COLOR_CELL_TAG,
            ],
        }
    }
}
