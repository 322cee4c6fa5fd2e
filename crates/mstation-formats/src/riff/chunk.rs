//! Data chunks inside a subfile

use tracing::trace;

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};

use super::FourCc;
use super::header::{CHUNK_HEADER_SIZE, ChunkHeader};
use super::section::SectionReader;

/// What a chunk holds, judged from its tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// `igod`: metadata sections only
    Metadata,
    /// `aXXX`: metadata sections followed by a codec payload
    Asset(u16),
    /// Any other tag
    Other,
}

/// A tagged, length-prefixed block borrowed from the file buffer
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    /// Chunk tag
    pub tag: FourCc,
    /// Absolute offset of the chunk header
    pub header_offset: usize,
    /// Absolute offset of the first payload byte
    pub payload_offset: usize,
    payload: &'a [u8],
}

impl<'a> Chunk<'a> {
    /// Read the chunk header at `offset` and borrow its payload
    ///
    /// `end` is the end of the enclosing subfile; neither the header nor the
    /// payload may extend past it.
    pub(crate) fn read_at(data: &'a [u8], offset: usize, end: usize) -> Result<Self> {
        let end = end.min(data.len());
        let available = end.saturating_sub(offset);
        if available < CHUNK_HEADER_SIZE {
            let tag_end = end.min(offset.saturating_add(4)).max(offset.min(end));
            return Err(Error::TruncatedChunk {
                tag: FourCc::from_partial(&data[offset.min(end)..tag_end]),
                offset,
                declared: CHUNK_HEADER_SIZE,
                available,
            });
        }

        let mut cursor = ByteCursor::at(&data[..end], offset)?;
        let header: ChunkHeader = cursor.read_struct()?;
        let declared = header.length as usize;
        let payload_offset = cursor.position();
        trace!(tag = %header.tag, offset, length = declared, "chunk header");

        if declared == 0 {
            return Err(Error::ZeroLengthChunk {
                tag: header.tag,
                offset,
            });
        }
        if declared > cursor.remaining() {
            return Err(Error::TruncatedChunk {
                tag: header.tag,
                offset,
                declared,
                available: cursor.remaining(),
            });
        }

        Ok(Self {
            tag: header.tag,
            header_offset: offset,
            payload_offset,
            payload: cursor.read_bytes(declared)?,
        })
    }

    /// Declared payload length
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty (never true for a parsed chunk)
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Absolute offset one past the last payload byte
    pub fn end_offset(&self) -> usize {
        self.payload_offset + self.payload.len()
    }

    /// Payload bytes
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Classify the chunk by its tag
    pub fn kind(&self) -> ChunkKind {
        if self.tag == FourCc::IGOD {
            ChunkKind::Metadata
        } else if let Some(id) = self.tag.asset_id() {
            ChunkKind::Asset(id)
        } else {
            ChunkKind::Other
        }
    }

    /// Whether this is an `igod` metadata chunk
    pub fn is_metadata(&self) -> bool {
        self.kind() == ChunkKind::Metadata
    }

    /// Asset id for `aXXX` chunks
    pub fn asset_id(&self) -> Option<u16> {
        self.tag.asset_id()
    }

    /// Reader over the payload's metadata sections
    pub fn sections(&self) -> SectionReader<'a> {
        SectionReader::new(self.payload)
    }
}
