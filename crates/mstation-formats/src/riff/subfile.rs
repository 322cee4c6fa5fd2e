//! RIFF-style subfiles
//!
//! Each subfile is nearly a RIFF document:
//!
//! ```text
//! RIFF <len>
//!   IMTSrate <len=4> <rate:u32>
//!   LIST <len>
//!     data<tag> <len> <payload>     first data chunk, tag glued to "data"
//!     <tag> <len> <payload>
//!     ...
//! ```
//!
//! `IMTSrate` and `data<tag>` are eight-character tags with no length between
//! the halves, so the subfile header is read field by field rather than as
//! nested chunks.

use tracing::{debug, warn};

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};

use super::FourCc;
use super::chunk::Chunk;
use super::header::{CHUNK_HEADER_SIZE, ChunkHeader};

/// One subfile borrowed from the data file buffer
#[derive(Debug, Clone, Copy)]
pub struct SubFile<'a> {
    data: &'a [u8],
    /// Absolute offset of the `RIFF` header
    pub offset: usize,
    /// Value stored in the `IMTSrate` chunk (usually zero)
    pub rate: u32,
    first_chunk: usize,
    end: usize,
}

fn expect_tag(cursor: &mut ByteCursor<'_>, expected: FourCc) -> Result<()> {
    let offset = cursor.position();
    let found = cursor.read_fourcc()?;
    if found != expected {
        return Err(Error::InvalidSignature {
            offset,
            expected,
            found,
        });
    }
    Ok(())
}

fn expect_header(cursor: &mut ByteCursor<'_>, expected: FourCc) -> Result<ChunkHeader> {
    cursor.align_even()?;
    let offset = cursor.position();
    let header: ChunkHeader = cursor.read_struct()?;
    if header.tag != expected {
        return Err(Error::InvalidSignature {
            offset,
            expected,
            found: header.tag,
        });
    }
    Ok(header)
}

impl<'a> SubFile<'a> {
    /// Parse a subfile at the start of `data`
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        Self::parse_at(data, 0)
    }

    /// Parse the subfile whose `RIFF` header starts at `offset`
    pub fn parse_at(data: &'a [u8], offset: usize) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let riff = expect_header(&mut cursor, FourCc::RIFF)?;
        let declared = riff.length as usize;
        let available = cursor.remaining();
        if declared > available {
            return Err(Error::TruncatedChunk {
                tag: FourCc::RIFF,
                offset,
                declared,
                available,
            });
        }
        let end = cursor.position() + declared;

        // Everything below stays inside the RIFF chunk.
        let mut cursor = ByteCursor::at(&data[..end], cursor.position())?;
        expect_tag(&mut cursor, FourCc::IMTS)?;
        expect_header(&mut cursor, FourCc::RATE)?;
        let rate = cursor.read_u32()?;
        expect_header(&mut cursor, FourCc::LIST)?;
        expect_tag(&mut cursor, FourCc::DATA)?;

        debug!(offset, length = declared, rate, "subfile");
        Ok(Self {
            data: &data[..end],
            offset,
            rate,
            first_chunk: cursor.position(),
            end,
        })
    }

    /// Absolute offset one past the last byte of the subfile
    pub fn end_offset(&self) -> usize {
        self.end
    }

    /// Declared length of the `RIFF` chunk
    pub fn len(&self) -> usize {
        self.end - self.offset - CHUNK_HEADER_SIZE
    }

    /// Whether the subfile has no bytes after its `RIFF` header
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the data chunks in file order
    ///
    /// The iterator stops after the first error.
    pub fn chunks(&self) -> Chunks<'a> {
        Chunks {
            data: self.data,
            pos: self.first_chunk,
            end: self.end,
            failed: false,
        }
    }
}

/// Iterator over the data chunks of a [`SubFile`]
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
    failed: bool,
}

impl Chunks<'_> {
    /// A trailing odd byte cannot hold a chunk and counts as padding.
    fn at_end(&self) -> bool {
        if self.pos % 2 == 1 {
            self.pos + 1 >= self.end
        } else {
            self.pos >= self.end
        }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Result<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.at_end() {
            return None;
        }
        if self.pos % 2 == 1 {
            let pad = self.data[self.pos];
            if pad != 0 {
                warn!(offset = self.pos, pad, "non-zero padding byte before chunk");
            }
            self.pos += 1;
        }
        match Chunk::read_at(self.data, self.pos, self.end) {
            Ok(chunk) => {
                self.pos = chunk.end_offset();
                Some(Ok(chunk))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for Chunks<'_> {}
