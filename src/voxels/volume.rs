//! # Volume Module
//!
//! This module provides the `Volume` struct, the top-level sparse container of the
//! occupancy hierarchy, and the linearization pass that turns it into flat buffers a
//! GPU ray marcher can consume.
//!
//! ## Architecture
//!
//! A volume has a fixed size measured in chunks. Only chunks that contain at least
//! one voxel are kept in the chunk map; empty regions cost nothing until the flat
//! buffers are built.
//!
//! ## Flat Buffers
//!
//! [`Volume::rebuild`] produces four buffers, all indexed x-fastest, then y, then z:
//!
//! | Buffer              | Element          | Grid size                   |
//! |---------------------|------------------|-----------------------------|
//! | chunk occupancy     | `u64` mask       | `dim`                       |
//! | sub-chunk occupancy | `u64` mask       | `dim * 4`                   |
//! | voxel payload       | 4 x `u32` words  | `dim * 16`                  |
//! | material palette    | 4 x `f32` RGBA   | 256 entries                 |
//!
//! Masks use the bit convention documented in [`crate::voxels`]. Buffers are
//! zero everywhere except at occupied positions.
//!
//! ## Dirty Tracking
//!
//! Every mutation clears the `ready` flag. `rebuild` returns immediately while the
//! flag is set, so calling it once per frame only pays for frames that follow an
//! edit. The rebuild itself walks occupied chunks, sub-chunks and voxels only; the
//! zero fill of the buffers is the only part proportional to the volume size.

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU64, Ordering};

use cgmath::{Matrix4, Point3, SquareMatrix, Vector3, Vector4};
use log::{debug, trace};
use web_time::Instant;

use super::cell::VoxelCell;
use super::chunk::Chunk;
use super::{
    CHUNK_DIMENSION, MATERIAL_COUNT, SLOTS_PER_NODE, SUB_CHUNKS_PER_AXIS, SUB_CHUNK_DIMENSION,
    WORDS_PER_VOXEL,
};
use crate::error::VolumeError;
use crate::rendering::VolumeRenderer;

/// Number of voxels in a chunk.
const VOXELS_PER_CHUNK: usize = (CHUNK_DIMENSION * CHUNK_DIMENSION * CHUNK_DIMENSION) as usize;

/// Color every palette entry starts with (opaque white).
pub const DEFAULT_MATERIAL: Vector4<f32> = Vector4 {
    x: 1.0,
    y: 1.0,
    z: 1.0,
    w: 1.0,
};

/// Source of [`Volume::id`] values.
static NEXT_VOLUME_ID: AtomicU64 = AtomicU64::new(0);

/// Precomputed sizes of the flat buffers for a given volume size.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct BufferLayout {
    sub_chunk_dimensions: Vector3<u32>,
    voxel_dimensions: Vector3<u32>,
    chunk_count: usize,
    sub_chunk_count: usize,
    voxel_word_count: usize,
}

impl BufferLayout {
    fn new(dimensions: Vector3<u32>) -> Result<Self, VolumeError> {
        let too_large = || VolumeError::TooLarge {
            x: dimensions.x,
            y: dimensions.y,
            z: dimensions.z,
        };

        let scale = |factor: u32| -> Option<Vector3<u32>> {
            Some(Vector3::new(
                dimensions.x.checked_mul(factor)?,
                dimensions.y.checked_mul(factor)?,
                dimensions.z.checked_mul(factor)?,
            ))
        };

        let sub_chunk_dimensions = scale(SUB_CHUNKS_PER_AXIS).ok_or_else(too_large)?;
        let voxel_dimensions = scale(CHUNK_DIMENSION).ok_or_else(too_large)?;

        let chunk_count = (dimensions.x as usize)
            .checked_mul(dimensions.y as usize)
            .and_then(|n| n.checked_mul(dimensions.z as usize))
            .ok_or_else(too_large)?;
        let sub_chunk_count = chunk_count
            .checked_mul(SLOTS_PER_NODE)
            .ok_or_else(too_large)?;
        let voxel_word_count = chunk_count
            .checked_mul(VOXELS_PER_CHUNK * WORDS_PER_VOXEL)
            // Uploads address the payload in bytes
            .filter(|words| words.checked_mul(std::mem::size_of::<u32>()).is_some())
            .ok_or_else(too_large)?;

        Ok(BufferLayout {
            sub_chunk_dimensions,
            voxel_dimensions,
            chunk_count,
            sub_chunk_count,
            voxel_word_count,
        })
    }
}

/// A sparse voxel volume of fixed size, measured in chunks.
///
/// Voxels are addressed with absolute voxel coordinates in `[0, 16 * dim)` per axis.
/// Writes outside that range are ignored, since the flat buffers could not
/// represent them.
///
/// The volume is single-threaded: all edits and rebuilds run on the thread that owns
/// it, typically the frame loop.
pub struct Volume {
    /// Process-wide unique identity.
    id: u64,
    /// Size of the volume in chunks.
    dimensions: Vector3<u32>,
    layout: BufferLayout,
    /// Non-empty chunks keyed by chunk coordinate.
    chunks: HashMap<Point3<u32>, Box<Chunk>>,
    materials: [Vector4<f32>; MATERIAL_COUNT],
    model_matrix: Matrix4<f32>,
    /// `false` when the flat buffers are stale.
    ready: bool,
    rebuild_count: u64,
    chunk_occupancy: Vec<u64>,
    sub_chunk_occupancy: Vec<u64>,
    voxel_payload: Vec<u32>,
    material_palette: Vec<[f32; 4]>,
}

impl Volume {
    /// Creates an empty volume of `dimensions` chunks.
    ///
    /// # Errors
    /// Returns [`VolumeError::TooLarge`] when the flat buffers for this size cannot
    /// be addressed.
    pub fn new(dimensions: Vector3<u32>) -> Result<Self, VolumeError> {
        let layout = BufferLayout::new(dimensions)?;

        Ok(Volume {
            id: NEXT_VOLUME_ID.fetch_add(1, Ordering::Relaxed),
            dimensions,
            layout,
            chunks: HashMap::new(),
            materials: [DEFAULT_MATERIAL; MATERIAL_COUNT],
            model_matrix: Matrix4::identity(),
            ready: false,
            rebuild_count: 0,
            chunk_occupancy: Vec::new(),
            sub_chunk_occupancy: Vec::new(),
            voxel_payload: Vec::new(),
            material_palette: Vec::new(),
        })
    }

    /// Replaces the model matrix, builder style.
    pub fn with_model_matrix(mut self, model_matrix: Matrix4<f32>) -> Self {
        self.model_matrix = model_matrix;
        self
    }

    /// Stores `cell` at the absolute voxel `position`, allocating the chunk if needed.
    pub fn set(&mut self, position: Point3<u32>, cell: VoxelCell) {
        let Some((chunk_position, local)) = self.locate(position) else {
            trace!("Ignoring volume write outside bounds at {:?}", position);
            return;
        };

        self.chunks
            .entry(chunk_position)
            .or_default()
            .set(local.x, local.y, local.z, cell);
        self.ready = false;
    }

    /// Removes the voxel at the absolute voxel `position`.
    ///
    /// A chunk left empty by the removal is dropped from the chunk map.
    pub fn clear_at(&mut self, position: Point3<u32>) {
        let Some((chunk_position, local)) = self.locate(position) else {
            trace!("Ignoring volume clear outside bounds at {:?}", position);
            return;
        };
        let Some(chunk) = self.chunks.get_mut(&chunk_position) else {
            return;
        };

        chunk.clear(local.x, local.y, local.z);
        if chunk.is_empty() {
            self.chunks.remove(&chunk_position);
        }
        self.ready = false;
    }

    /// Removes every voxel.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.ready = false;
    }

    /// Returns the voxel at the absolute voxel `position`, if any.
    pub fn get(&self, position: Point3<u32>) -> Option<&VoxelCell> {
        let (chunk_position, local) = self.locate(position)?;
        self.chunks.get(&chunk_position)?.get(local.x, local.y, local.z)
    }

    /// `true` when a voxel is stored at `position`.
    pub fn contains(&self, position: Point3<u32>) -> bool {
        self.get(position).is_some()
    }

    /// Returns the chunk at the chunk coordinate `chunk_position`, if it is occupied.
    pub fn chunk(&self, chunk_position: Point3<u32>) -> Option<&Chunk> {
        self.chunks.get(&chunk_position).map(|chunk| &**chunk)
    }

    /// Iterates the occupied chunks in no particular order.
    pub fn chunks(&self) -> impl Iterator<Item = (Point3<u32>, &Chunk)> + '_ {
        self.chunks
            .iter()
            .map(|(position, chunk)| (*position, &**chunk))
    }

    /// Number of occupied chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of occupied voxels.
    pub fn voxel_count(&self) -> usize {
        self.chunks.values().map(|chunk| chunk.voxel_count()).sum()
    }

    /// Sets palette entry `index` to an RGBA color.
    pub fn set_material(&mut self, index: u8, material: Vector4<f32>) {
        self.materials[index as usize] = material;
        self.ready = false;
    }

    /// Returns palette entry `index`.
    pub fn material(&self, index: u8) -> Vector4<f32> {
        self.materials[index as usize]
    }

    /// Replaces the matrix placing this volume in its scene.
    ///
    /// The matrix is handed to the renderer untouched and does not invalidate the
    /// flat buffers.
    pub fn set_model_matrix(&mut self, model_matrix: Matrix4<f32>) {
        self.model_matrix = model_matrix;
    }

    /// The matrix placing this volume in its scene.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.model_matrix
    }

    /// Identity of this volume, unique within the process.
    ///
    /// Together with [`Volume::rebuild_count`] it names one exact set of flat buffers,
    /// so renderers shared between scenes never mistake one volume for another.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Size of the volume in chunks.
    pub fn size(&self) -> Vector3<u32> {
        self.dimensions
    }

    /// Size of the volume in sub-chunks (`size() * 4`).
    pub fn sub_chunk_dimensions(&self) -> Vector3<u32> {
        self.layout.sub_chunk_dimensions
    }

    /// Size of the volume in voxels (`size() * 16`).
    pub fn voxel_dimensions(&self) -> Vector3<u32> {
        self.layout.voxel_dimensions
    }

    /// `true` when the flat buffers reflect every edit made so far.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Number of linearization passes actually performed.
    ///
    /// Uploaders use this as a generation number to skip redundant transfers.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    /// Linearizes the hierarchy into the flat buffers, if any edit happened since
    /// the last rebuild.
    pub fn rebuild(&mut self) {
        if self.ready {
            return;
        }

        let started = Instant::now();

        let chunk_dimensions = self.dimensions;
        let sub_chunk_dimensions = self.layout.sub_chunk_dimensions;
        let voxel_dimensions = self.layout.voxel_dimensions;

        reset(&mut self.chunk_occupancy, self.layout.chunk_count);
        reset(&mut self.sub_chunk_occupancy, self.layout.sub_chunk_count);
        reset(&mut self.voxel_payload, self.layout.voxel_word_count);

        let mut sub_chunk_total = 0;
        let mut voxel_total = 0;

        for (chunk_position, chunk) in &self.chunks {
            self.chunk_occupancy[linear_index(*chunk_position, chunk_dimensions)] =
                chunk.occupancy_mask();

            for (local_sub_chunk, sub_chunk) in chunk.sub_chunks() {
                let sub_chunk_position =
                    offset(*chunk_position, SUB_CHUNKS_PER_AXIS, local_sub_chunk);
                self.sub_chunk_occupancy[linear_index(sub_chunk_position, sub_chunk_dimensions)] =
                    sub_chunk.occupancy_mask();
                sub_chunk_total += 1;

                for (local_voxel, cell) in sub_chunk.cells() {
                    let voxel_position =
                        offset(sub_chunk_position, SUB_CHUNK_DIMENSION, local_voxel);
                    let start = linear_index(voxel_position, voxel_dimensions) * WORDS_PER_VOXEL;
                    self.voxel_payload[start..start + WORDS_PER_VOXEL]
                        .copy_from_slice(&cell.to_words());
                    voxel_total += 1;
                }
            }
        }

        self.material_palette.clear();
        self.material_palette.extend(self.materials.iter().map(|m| [m.x, m.y, m.z, m.w]));

        self.ready = true;
        self.rebuild_count += 1;

        debug!(
            "Rebuilt volume {:?}: {} chunks, {} sub-chunks, {} voxels in {:?}",
            chunk_dimensions,
            self.chunks.len(),
            sub_chunk_total,
            voxel_total,
            started.elapsed()
        );
    }

    /// Rebuilds if needed and returns a view of every flat buffer.
    pub fn buffers(&mut self) -> VolumeBuffers<'_> {
        self.rebuild();
        self.buffers_view()
    }

    /// Rebuilds if needed and hands the flat buffers to `renderer`.
    ///
    /// # Arguments
    /// * `object_index` - Index of this volume in its scene, used by renderers to
    ///   key per-object GPU resources
    /// * `renderer` - The collaborator that uploads and draws the buffers
    pub fn draw<R>(&mut self, object_index: usize, renderer: &mut R) -> Result<(), R::Error>
    where
        R: VolumeRenderer + ?Sized,
    {
        self.rebuild();
        renderer.draw_volume(object_index, self.buffers_view())
    }

    /// Chunk occupancy masks from the last rebuild.
    pub fn chunk_occupancy(&self) -> &[u64] {
        &self.chunk_occupancy
    }

    /// Sub-chunk occupancy masks from the last rebuild.
    pub fn sub_chunk_occupancy(&self) -> &[u64] {
        &self.sub_chunk_occupancy
    }

    /// Dense voxel payload words from the last rebuild.
    pub fn voxel_payload(&self) -> &[u32] {
        &self.voxel_payload
    }

    /// Flattened material palette from the last rebuild.
    pub fn material_palette(&self) -> &[[f32; 4]] {
        &self.material_palette
    }

    fn buffers_view(&self) -> VolumeBuffers<'_> {
        VolumeBuffers {
            volume_id: self.id,
            generation: self.rebuild_count,
            chunk_dimensions: self.dimensions,
            sub_chunk_dimensions: self.layout.sub_chunk_dimensions,
            voxel_dimensions: self.layout.voxel_dimensions,
            chunk_occupancy: &self.chunk_occupancy,
            sub_chunk_occupancy: &self.sub_chunk_occupancy,
            voxel_payload: &self.voxel_payload,
            material_palette: &self.material_palette,
            model_matrix: self.model_matrix,
        }
    }

    /// Splits an absolute voxel position into a chunk coordinate and a chunk-local
    /// coordinate, or `None` when the chunk lies outside the volume.
    fn locate(&self, position: Point3<u32>) -> Option<(Point3<u32>, Point3<u32>)> {
        let chunk_position = Point3::new(
            position.x / CHUNK_DIMENSION,
            position.y / CHUNK_DIMENSION,
            position.z / CHUNK_DIMENSION,
        );

        if chunk_position.x >= self.dimensions.x
            || chunk_position.y >= self.dimensions.y
            || chunk_position.z >= self.dimensions.z
        {
            return None;
        }

        let local = Point3::new(
            position.x % CHUNK_DIMENSION,
            position.y % CHUNK_DIMENSION,
            position.z % CHUNK_DIMENSION,
        );

        Some((chunk_position, local))
    }
}

impl Debug for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Volume")
            .field("id", &self.id)
            .field("dimensions", &self.dimensions)
            .field("chunks", &self.chunks.len())
            .field("ready", &self.ready)
            .field("rebuild_count", &self.rebuild_count)
            .finish()
    }
}

/// A borrowed view of a volume's flat buffers plus everything needed to
/// interpret them.
#[derive(Copy, Clone)]
pub struct VolumeBuffers<'a> {
    /// [`Volume::id`] of the volume the buffers belong to
    pub volume_id: u64,
    /// Rebuild count of the volume when the view was taken
    pub generation: u64,
    /// Size of the chunk occupancy grid
    pub chunk_dimensions: Vector3<u32>,
    /// Size of the sub-chunk occupancy grid (`chunk_dimensions * 4`)
    pub sub_chunk_dimensions: Vector3<u32>,
    /// Size of the voxel payload grid (`chunk_dimensions * 16`)
    pub voxel_dimensions: Vector3<u32>,
    /// One mask per chunk
    pub chunk_occupancy: &'a [u64],
    /// One mask per sub-chunk
    pub sub_chunk_occupancy: &'a [u64],
    /// Four words per voxel
    pub voxel_payload: &'a [u32],
    /// One RGBA entry per material
    pub material_palette: &'a [[f32; 4]],
    /// Placement of the volume in its scene
    pub model_matrix: Matrix4<f32>,
}

impl Debug for VolumeBuffers<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VolumeBuffers")
            .field("volume_id", &self.volume_id)
            .field("generation", &self.generation)
            .field("chunk_dimensions", &self.chunk_dimensions)
            .field("chunk_occupancy", &self.chunk_occupancy.len())
            .field("sub_chunk_occupancy", &self.sub_chunk_occupancy.len())
            .field("voxel_payload", &self.voxel_payload.len())
            .finish()
    }
}

fn reset<T: Copy + Default>(buffer: &mut Vec<T>, len: usize) {
    buffer.clear();
    buffer.resize(len, T::default());
}

/// Row-major index, x fastest.
#[inline]
fn linear_index(position: Point3<u32>, dimensions: Vector3<u32>) -> usize {
    let width = dimensions.x as usize;
    let height = dimensions.y as usize;
    position.x as usize + position.y as usize * width + position.z as usize * width * height
}

#[inline]
fn offset(parent: Point3<u32>, scale: u32, local: Point3<u32>) -> Point3<u32> {
    Point3::new(
        parent.x * scale + local.x,
        parent.y * scale + local.y,
        parent.z * scale + local.z,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::voxels::bit_index;

    fn cell(id: u8) -> VoxelCell {
        VoxelCell::material(Vector3::new(0.0, 0.0, 1.0), id)
    }

    fn unit_volume() -> Volume {
        Volume::new(Vector3::new(1, 1, 1)).unwrap()
    }

    #[test]
    fn set_routes_to_chunk_and_marks_dirty() {
        let mut volume = Volume::new(Vector3::new(2, 1, 1)).unwrap();
        volume.rebuild();
        assert!(volume.is_ready());

        volume.set(Point3::new(17, 3, 4), cell(9));

        assert!(!volume.is_ready());
        assert_eq!(volume.chunk_count(), 1);
        let chunk = volume.chunk(Point3::new(1, 0, 0)).unwrap();
        assert_eq!(chunk.get(1, 3, 4), Some(&cell(9)));
        assert_eq!(volume.get(Point3::new(17, 3, 4)), Some(&cell(9)));
    }

    #[test]
    fn writes_outside_the_volume_are_ignored() {
        let mut volume = unit_volume();
        volume.set(Point3::new(16, 0, 0), cell(1));
        volume.set(Point3::new(0, 0, 300), cell(1));

        assert_eq!(volume.chunk_count(), 0);
        assert!(!volume.contains(Point3::new(16, 0, 0)));
    }

    #[test]
    fn clearing_last_voxel_removes_chunk() {
        let mut volume = unit_volume();
        volume.set(Point3::new(5, 5, 5), cell(1));
        volume.clear_at(Point3::new(5, 5, 5));

        assert_eq!(volume.chunk_count(), 0);
        assert!(volume.chunk(Point3::new(0, 0, 0)).is_none());
    }

    #[test]
    fn clear_at_keeps_chunk_with_other_voxels() {
        let mut volume = unit_volume();
        volume.set(Point3::new(5, 5, 5), cell(1));
        volume.set(Point3::new(0, 0, 0), cell(2));
        volume.clear_at(Point3::new(5, 5, 5));

        let chunk = volume.chunk(Point3::new(0, 0, 0)).unwrap();
        assert_eq!(chunk.occupancy_mask(), 1);
        assert_eq!(volume.voxel_count(), 1);
    }

    #[test]
    fn clear_empties_the_map() {
        let mut volume = Volume::new(Vector3::new(2, 2, 2)).unwrap();
        volume.set(Point3::new(0, 0, 0), cell(1));
        volume.set(Point3::new(31, 31, 31), cell(2));
        volume.rebuild();
        volume.clear();

        assert!(!volume.is_ready());
        assert_eq!(volume.chunk_count(), 0);
        volume.rebuild();
        assert!(volume.chunk_occupancy().iter().all(|&mask| mask == 0));
    }

    #[test]
    fn rebuild_encodes_single_voxel() {
        let mut volume = unit_volume();
        let voxel = cell(77);
        volume.set(Point3::new(5, 5, 5), voxel);
        volume.rebuild();

        assert_eq!(volume.chunk_occupancy(), &[1u64 << 21]);

        let sub_chunk_occupancy = volume.sub_chunk_occupancy();
        assert_eq!(sub_chunk_occupancy.len(), 64);
        // Sub-chunk (1, 1, 1) holds cell (1, 1, 1)
        let sub_chunk_index = 1 + 4 + 16;
        assert_eq!(sub_chunk_occupancy[sub_chunk_index], 1u64 << bit_index(1, 1, 1));
        assert_eq!(
            sub_chunk_occupancy.iter().filter(|&&mask| mask != 0).count(),
            1
        );

        let payload = volume.voxel_payload();
        assert_eq!(payload.len(), 16 * 16 * 16 * 4);
        let start = (5 + 5 * 16 + 5 * 256) * 4;
        assert_eq!(&payload[start..start + 4], &voxel.to_words());
        assert_eq!(payload.iter().filter(|&&word| word != 0).count(), 2);
    }

    #[test]
    fn rebuild_uses_row_major_indexing() {
        let mut volume = Volume::new(Vector3::new(2, 3, 2)).unwrap();
        volume.set(Point3::new(16, 32, 16), cell(1));
        volume.rebuild();

        // Chunk (1, 2, 1) in a 2x3x2 grid
        let chunk_index = 1 + 2 * 2 + 2 * 3;
        assert_eq!(volume.chunk_occupancy()[chunk_index], 1);

        // Sub-chunk (4, 8, 4) in an 8x12x8 grid
        let sub_chunk_index = 4 + 8 * 8 + 4 * 8 * 12;
        assert_eq!(volume.sub_chunk_occupancy()[sub_chunk_index], 1);

        // Voxel (16, 32, 16) in a 32x48x32 grid
        let start = (16 + 32 * 32 + 16 * 32 * 48) * 4;
        assert_eq!(volume.voxel_payload()[start + 3], 1);
    }

    #[test]
    fn rebuild_without_edits_is_skipped() {
        let mut volume = unit_volume();
        volume.set(Point3::new(1, 2, 3), cell(4));
        volume.rebuild();
        let first = (
            volume.chunk_occupancy().to_vec(),
            volume.sub_chunk_occupancy().to_vec(),
            volume.voxel_payload().to_vec(),
        );

        volume.rebuild();

        assert_eq!(volume.rebuild_count(), 1);
        assert_eq!(first.0, volume.chunk_occupancy());
        assert_eq!(first.1, volume.sub_chunk_occupancy());
        assert_eq!(first.2, volume.voxel_payload());
    }

    #[test]
    fn materials_are_flattened_and_invalidate() {
        let mut volume = unit_volume();
        volume.rebuild();
        volume.set_material(3, Vector4::new(0.5, 0.25, 0.0, 1.0));

        assert!(!volume.is_ready());
        let buffers = volume.buffers();
        assert_eq!(buffers.material_palette.len(), MATERIAL_COUNT);
        assert_eq!(buffers.material_palette[3], [0.5, 0.25, 0.0, 1.0]);
        assert_eq!(buffers.material_palette[0], [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(buffers.generation, 2);
    }

    #[test]
    fn buffers_report_derived_dimensions() {
        let mut volume = Volume::new(Vector3::new(1, 2, 3)).unwrap();
        let buffers = volume.buffers();

        assert_eq!(buffers.chunk_dimensions, Vector3::new(1, 2, 3));
        assert_eq!(buffers.sub_chunk_dimensions, Vector3::new(4, 8, 12));
        assert_eq!(buffers.voxel_dimensions, Vector3::new(16, 32, 48));
        assert_eq!(buffers.chunk_occupancy.len(), 6);
    }

    #[test]
    fn volumes_have_distinct_ids() {
        let mut a = unit_volume();
        let mut b = unit_volume();
        assert_ne!(a.id(), b.id());

        let a_buffers = a.buffers();
        let b_buffers = b.buffers();
        assert_eq!(a_buffers.generation, b_buffers.generation);
        assert_ne!(a_buffers.volume_id, b_buffers.volume_id);
    }

    #[test]
    fn oversized_volume_is_rejected() {
        let result = Volume::new(Vector3::new(u32::MAX, 1, 1));
        assert_eq!(
            result.err(),
            Some(VolumeError::TooLarge {
                x: u32::MAX,
                y: 1,
                z: 1
            })
        );
    }

    #[test]
    fn zero_sized_volume_ignores_writes() {
        let mut volume = Volume::new(Vector3::new(0, 0, 0)).unwrap();
        volume.set(Point3::new(0, 0, 0), cell(1));
        let buffers = volume.buffers();

        assert!(buffers.chunk_occupancy.is_empty());
        assert!(buffers.voxel_payload.is_empty());
    }
}
