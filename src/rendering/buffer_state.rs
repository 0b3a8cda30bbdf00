//! # Buffer State Module
//!
//! This module provides a registry of the GPU buffers backing uploaded volumes.
//! It handles buffer creation, resizing, writing, and analytics so the uploader can
//! stay a thin translation layer.
//!
//! ## Key Features
//!
//! * One buffer per (scene object, buffer kind) pair
//! * Buffers are recreated only when the required size changes
//! * Bounds-checked writes that report errors instead of panicking
//! * Buffer usage analytics and memory tracking
//!
//! ## Performance Considerations
//!
//! * Volume sizes are fixed at construction, so after the first upload buffers are
//!   reused and only rewritten
//! * Analytics make it easy to spot volumes whose dense payload dominates GPU memory

use std::collections::HashMap;

use log::info;
use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::error::UploadError;

/// Smallest buffer ever allocated. Empty volumes still need something to bind.
pub const MIN_BUFFER_SIZE: u64 = 16;

/// The flat buffers uploaded for every volume.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VolumeBufferKind {
    /// One `u64` mask per chunk
    ChunkOccupancy,
    /// One `u64` mask per sub-chunk
    SubChunkOccupancy,
    /// Four `u32` words per voxel
    VoxelPayload,
    /// 256 RGBA `f32` entries
    MaterialPalette,
    /// Model matrix and grid sizes
    Uniforms,
}

impl VolumeBufferKind {
    /// Every kind, in upload order.
    pub const ALL: [VolumeBufferKind; 5] = [
        VolumeBufferKind::ChunkOccupancy,
        VolumeBufferKind::SubChunkOccupancy,
        VolumeBufferKind::VoxelPayload,
        VolumeBufferKind::MaterialPalette,
        VolumeBufferKind::Uniforms,
    ];

    /// Debug label passed to wgpu.
    pub fn label(&self) -> &'static str {
        match self {
            VolumeBufferKind::ChunkOccupancy => "Chunk Occupancy Buffer",
            VolumeBufferKind::SubChunkOccupancy => "Sub-Chunk Occupancy Buffer",
            VolumeBufferKind::VoxelPayload => "Voxel Payload Buffer",
            VolumeBufferKind::MaterialPalette => "Material Palette Buffer",
            VolumeBufferKind::Uniforms => "Volume Uniform Buffer",
        }
    }

    /// Usage flags the buffer is created with.
    pub fn usage(&self) -> BufferUsages {
        match self {
            VolumeBufferKind::Uniforms => BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            _ => BufferUsages::STORAGE | BufferUsages::COPY_DST,
        }
    }
}

/// Identifies one GPU buffer in the registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BufferKey {
    /// Index of the volume in its scene
    pub object_index: usize,
    /// Which of the volume's buffers
    pub kind: VolumeBufferKind,
}

impl BufferKey {
    /// Creates a key for `kind` of the volume at `object_index`.
    pub fn new(object_index: usize, kind: VolumeBufferKind) -> Self {
        BufferKey { object_index, kind }
    }
}

/// Analytics data for a GPU buffer
///
/// Tracks memory allocation, usage, and write operations for a buffer
/// to help identify optimization opportunities.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BufferAnalytics {
    /// Total memory allocated for the buffer in bytes
    pub allocated_memory: u64,
    /// Actual memory used in the buffer in bytes (based on writes)
    pub used_memory: u64,
    /// Number of times the buffer has been written to
    pub times_written: u64,
}

/// Registry of the GPU buffers backing uploaded volumes.
pub struct BufferState {
    /// The GPU device buffers are created on
    device: Device,
    /// The queue writes are submitted to
    queue: Queue,
    buffers: HashMap<BufferKey, Buffer>,
    buffer_analytics: HashMap<BufferKey, BufferAnalytics>,
}

impl BufferState {
    /// Creates an empty registry.
    ///
    /// # Arguments
    ///
    /// * `device` - The GPU device
    /// * `queue` - The GPU command queue
    pub fn new(device: Device, queue: Queue) -> Self {
        Self {
            device,
            queue,
            buffers: HashMap::new(),
            buffer_analytics: HashMap::new(),
        }
    }

    /// The GPU device, for building bind groups and pipelines around the buffers.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// The GPU command queue.
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Makes sure a buffer of at least `size` bytes exists for `key`.
    ///
    /// An existing buffer of a different size is replaced, discarding its contents.
    ///
    /// # Returns
    ///
    /// `true` if a new buffer was created
    pub fn ensure_buffer(&mut self, key: BufferKey, size: u64) -> bool {
        let size = size.max(MIN_BUFFER_SIZE);

        if let Some(analytics) = self.buffer_analytics.get(&key) {
            if analytics.allocated_memory == size {
                return false;
            }
        }

        info!(
            "Allocating {} for object {} ({} bytes)",
            key.kind.label(),
            key.object_index,
            size
        );

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(key.kind.label()),
            size,
            usage: key.kind.usage(),
            mapped_at_creation: false,
        });

        if let Some(previous) = self.buffers.insert(key, buffer) {
            previous.destroy();
        }
        self.buffer_analytics.insert(
            key,
            BufferAnalytics {
                allocated_memory: size,
                ..Default::default()
            },
        );

        true
    }

    /// Writes raw byte data to a buffer
    ///
    /// # Arguments
    ///
    /// * `key` - The buffer to write to
    /// * `offset` - Byte offset in the buffer to start writing
    /// * `data` - Raw byte data to write
    ///
    /// # Errors
    ///
    /// Fails if the buffer does not exist or if the write would exceed buffer bounds
    pub fn write_buffer(
        &mut self,
        key: BufferKey,
        offset: wgpu::BufferAddress,
        data: &[u8],
    ) -> Result<(), UploadError> {
        let (Some(buffer), Some(buffer_analytics)) =
            (self.buffers.get(&key), self.buffer_analytics.get_mut(&key))
        else {
            return Err(UploadError::UnknownBuffer(key));
        };

        let buffer_size = buffer_analytics.allocated_memory;
        let data_size = data.len() as u64;

        if offset + data_size > buffer_size {
            return Err(UploadError::OutOfBounds {
                key,
                offset,
                len: data_size,
                size: buffer_size,
            });
        }

        self.queue.write_buffer(buffer, offset, data);
        buffer_analytics.used_memory = buffer_analytics.used_memory.max(offset + data_size);
        buffer_analytics.times_written += 1;

        Ok(())
    }

    /// Gets a buffer by key
    pub fn get_buffer(&self, key: BufferKey) -> Option<&Buffer> {
        self.buffers.get(&key)
    }

    /// Gets a binding resource for the entire buffer
    pub fn get_entire_binding(&self, key: BufferKey) -> Option<wgpu::BindingResource<'_>> {
        self.buffers.get(&key).map(|buffer| buffer.as_entire_binding())
    }

    /// Gets the analytics recorded for a buffer
    pub fn get_analytics(&self, key: BufferKey) -> Option<BufferAnalytics> {
        self.buffer_analytics.get(&key).copied()
    }

    /// Destroys every buffer belonging to the object at `object_index`.
    pub fn remove_object(&mut self, object_index: usize) {
        for kind in VolumeBufferKind::ALL {
            let key = BufferKey::new(object_index, kind);
            if let Some(buffer) = self.buffers.remove(&key) {
                buffer.destroy();
            }
            self.buffer_analytics.remove(&key);
        }
    }

    /// Gets the total allocated memory across all buffers
    ///
    /// # Returns
    ///
    /// Total allocated memory in bytes
    pub fn get_total_allocated_memory(&self) -> u64 {
        self.buffer_analytics
            .values()
            .fold(0, |acc, buffer_analytics| acc + buffer_analytics.allocated_memory)
    }

    /// Gets the total used memory across all buffers
    ///
    /// # Returns
    ///
    /// Total used memory in bytes
    pub fn get_total_used_memory(&self) -> u64 {
        self.buffer_analytics
            .values()
            .fold(0, |acc, buffer_analytics| acc + buffer_analytics.used_memory)
    }
}
