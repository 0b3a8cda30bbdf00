//! # Error Types
//!
//! Edits to a volume never fail: out-of-range coordinates are ignored. The only
//! recoverable errors are sizing a volume whose flat buffers cannot be addressed,
//! and failures inside the GPU upload collaborator.

use thiserror::Error;

use crate::rendering::buffer_state::BufferKey;

/// Errors raised when constructing a [`Volume`](crate::Volume).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VolumeError {
    /// The flat buffers for the requested size would not fit in addressable memory.
    #[error("a volume of {x}x{y}x{z} chunks is too large to linearize")]
    TooLarge {
        /// Requested size along x, in chunks
        x: u32,
        /// Requested size along y, in chunks
        y: u32,
        /// Requested size along z, in chunks
        z: u32,
    },
}

/// Errors raised by the GPU upload collaborator.
#[derive(Debug, Error)]
pub enum UploadError {
    /// No buffer has been created for the key.
    #[error("no GPU buffer registered for {0:?}")]
    UnknownBuffer(BufferKey),
    /// A write would run past the end of the buffer.
    #[error("write of {len} bytes at offset {offset} exceeds {key:?} ({size} bytes)")]
    OutOfBounds {
        /// Buffer being written
        key: BufferKey,
        /// Byte offset of the write
        offset: u64,
        /// Length of the write in bytes
        len: u64,
        /// Allocated size of the buffer in bytes
        size: u64,
    },
}
