//! # GPU Uploader
//!
//! A [`VolumeRenderer`] that mirrors every drawn volume into wgpu buffers.
//!
//! Storage buffers are rewritten only when the contents behind an object index
//! change, i.e. when a different volume or a newer generation of the same volume is
//! drawn there. The small uniform buffer carrying the model matrix is rewritten on
//! every draw since moving an object does not trigger a rebuild.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use log::{debug, trace};
use wgpu::{Device, Queue};

use super::buffer_state::{BufferKey, BufferState, VolumeBufferKind};
use super::VolumeRenderer;
use crate::error::UploadError;
use crate::voxels::volume::VolumeBuffers;

/// Per-volume uniform block, laid out for WGSL uniform address space rules.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct VolumeUniforms {
    /// Column-major model matrix
    pub model_matrix: [[f32; 4]; 4],
    /// Chunk grid size, `w` unused
    pub chunk_dimensions: [u32; 4],
}

impl VolumeUniforms {
    /// Builds the uniform block for a set of flat buffers.
    pub fn from_buffers(buffers: &VolumeBuffers<'_>) -> Self {
        let d = buffers.chunk_dimensions;
        VolumeUniforms {
            model_matrix: buffers.model_matrix.into(),
            chunk_dimensions: [d.x, d.y, d.z, 0],
        }
    }
}

/// Remembers which volume contents each object index holds on the GPU.
///
/// Contents are identified by `(volume_id, generation)`. The generation alone is not
/// enough since every volume starts counting at 1.
#[derive(Debug, Default)]
pub struct UploadTracker {
    resident: HashMap<usize, (u64, u64)>,
}

impl UploadTracker {
    /// `true` when the buffers at `object_index` do not hold these contents yet.
    pub fn needs_upload(&self, object_index: usize, buffers: &VolumeBuffers<'_>) -> bool {
        self.resident.get(&object_index) != Some(&(buffers.volume_id, buffers.generation))
    }

    /// Records that `buffers` now back `object_index`.
    pub fn mark_uploaded(&mut self, object_index: usize, buffers: &VolumeBuffers<'_>) {
        self.resident.insert(object_index, (buffers.volume_id, buffers.generation));
    }

    /// Forgets whatever backs `object_index`.
    pub fn forget(&mut self, object_index: usize) {
        self.resident.remove(&object_index);
    }
}

/// Uploads linearized volumes into GPU buffers owned by a [`BufferState`].
pub struct GpuVolumeUploader {
    buffer_state: BufferState,
    tracker: UploadTracker,
}

impl GpuVolumeUploader {
    /// Creates an uploader that allocates on `device` and writes through `queue`.
    pub fn new(device: Device, queue: Queue) -> Self {
        GpuVolumeUploader {
            buffer_state: BufferState::new(device, queue),
            tracker: UploadTracker::default(),
        }
    }

    /// The buffer registry, for binding the uploaded buffers.
    pub fn buffer_state(&self) -> &BufferState {
        &self.buffer_state
    }

    /// Releases the buffers of a scene object that was removed.
    pub fn forget_object(&mut self, object_index: usize) {
        self.buffer_state.remove_object(object_index);
        self.tracker.forget(object_index);
    }

    fn upload_storage(
        &mut self,
        object_index: usize,
        buffers: &VolumeBuffers<'_>,
    ) -> Result<(), UploadError> {
        let contents: [(VolumeBufferKind, &[u8]); 4] = [
            (
                VolumeBufferKind::ChunkOccupancy,
                bytemuck::cast_slice(buffers.chunk_occupancy),
            ),
            (
                VolumeBufferKind::SubChunkOccupancy,
                bytemuck::cast_slice(buffers.sub_chunk_occupancy),
            ),
            (
                VolumeBufferKind::VoxelPayload,
                bytemuck::cast_slice(buffers.voxel_payload),
            ),
            (
                VolumeBufferKind::MaterialPalette,
                bytemuck::cast_slice(buffers.material_palette),
            ),
        ];

        for (kind, bytes) in contents {
            self.write_whole(BufferKey::new(object_index, kind), bytes)?;
        }

        debug!(
            "Uploaded volume {} generation {} as object {} ({} payload bytes)",
            buffers.volume_id,
            buffers.generation,
            object_index,
            std::mem::size_of_val(buffers.voxel_payload)
        );

        Ok(())
    }

    fn write_whole(&mut self, key: BufferKey, bytes: &[u8]) -> Result<(), UploadError> {
        self.buffer_state.ensure_buffer(key, bytes.len() as u64);
        if bytes.is_empty() {
            return Ok(());
        }
        self.buffer_state.write_buffer(key, 0, bytes)
    }
}

impl VolumeRenderer for GpuVolumeUploader {
    type Error = UploadError;

    fn draw_volume(
        &mut self,
        object_index: usize,
        buffers: VolumeBuffers<'_>,
    ) -> Result<(), UploadError> {
        if self.tracker.needs_upload(object_index, &buffers) {
            self.upload_storage(object_index, &buffers)?;
            self.tracker.mark_uploaded(object_index, &buffers);
        } else {
            trace!("Object {} generation {} already resident", object_index, buffers.generation);
        }

        let uniforms = VolumeUniforms::from_buffers(&buffers);
        self.write_whole(
            BufferKey::new(object_index, VolumeBufferKind::Uniforms),
            bytemuck::bytes_of(&uniforms),
        )
    }
}
