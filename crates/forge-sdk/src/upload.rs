//! Byte-range planning for resumable uploads.
//!
//! A resumable upload sends an object as a sequence of PUTs, each carrying a
//! `Content-Range: bytes {start}-{end}/{total}` header and the same
//! `Session-Id`. Chunk `i` covers `[i * chunk_size, min(total, (i + 1) * chunk_size))`.

use crate::error::{ForgeError, ForgeResult};

/// An inclusive byte range of one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    /// 0-based position in the upload.
    pub index: u64,
    /// First byte offset.
    pub start: u64,
    /// Last byte offset (inclusive).
    pub end: u64,
}

#[allow(clippy::len_without_is_empty)]
impl ChunkRange {
    /// Number of bytes in this chunk.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// The first `len` bytes of this range.
    ///
    /// `None` if `len` is zero or longer than the range.
    #[must_use]
    pub const fn truncated(self, len: u64) -> Option<Self> {
        if len == 0 || len > self.len() {
            return None;
        }
        Some(Self { index: self.index, start: self.start, end: self.start + len - 1 })
    }

    /// `Content-Range` header value for an object of `total_size` bytes.
    #[must_use]
    pub fn content_range(&self, total_size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, total_size)
    }
}

/// Split of `total_size` bytes into `chunk_size` pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    total_size: u64,
    chunk_size: u64,
}

impl ChunkPlan {
    /// Plan an upload.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::InvalidArgument`] if `chunk_size` is zero.
    pub fn new(total_size: u64, chunk_size: u64) -> ForgeResult<Self> {
        if chunk_size == 0 {
            return Err(ForgeError::invalid_argument("chunk_size", "must be greater than zero"));
        }
        Ok(Self { total_size, chunk_size })
    }

    #[must_use]
    pub const fn total_size(&self) -> u64 {
        self.total_size
    }

    #[must_use]
    pub const fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// `ceil(total_size / chunk_size)`.
    #[must_use]
    pub const fn chunk_count(&self) -> u64 {
        self.total_size.div_ceil(self.chunk_size)
    }

    /// Expected range of chunk `index`, if it exists.
    #[must_use]
    pub fn range(&self, index: u64) -> Option<ChunkRange> {
        if index >= self.chunk_count() {
            return None;
        }
        let start = index * self.chunk_size;
        let end = self.total_size.min(start.saturating_add(self.chunk_size)) - 1;
        Some(ChunkRange { index, start, end })
    }

    /// All chunk ranges in ascending order.
    pub fn ranges(&self) -> impl Iterator<Item = ChunkRange> + '_ {
        (0..self.chunk_count()).filter_map(|index| self.range(index))
    }
}

/// Random identifier correlating every chunk of one upload.
#[must_use]
pub fn new_session_id() -> String {
    format!("-{}", uuid::Uuid::new_v4().simple())
}
