//! Fixed-layout headers of the container format

use binrw::BinRead;

use super::FourCc;

/// Size of a chunk header on disk (tag + length)
pub const CHUNK_HEADER_SIZE: usize = 8;

/// Size of the optional data file header
pub const DATA_FILE_HEADER_SIZE: usize = 16;

/// Signature at the start of a data file that carries a header
pub const DATA_FILE_SIGNATURE: FourCc = FourCc(*b"II\0\0");

/// Chunk header: tag followed by the payload length
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct ChunkHeader {
    /// Chunk tag
    pub tag: FourCc,
    /// Payload length in bytes, not counting this header
    pub length: u32,
}

/// Header in front of the subfiles of context (`.CXT`) files
///
/// System files have no such header and start directly with a subfile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct DataFileHeader {
    /// Always `II\0\0`
    pub signature: FourCc,
    /// Meaning unknown
    pub unknown: u32,
    /// Number of subfiles that follow
    pub subfile_count: u32,
    /// Size of the whole file including this header
    pub file_size: u32,
}

impl DataFileHeader {
    /// Whether the file ends right after this header
    ///
    /// Some older titles ship files holding nothing but the header.
    pub fn is_header_only(&self) -> bool {
        self.file_size as usize == DATA_FILE_HEADER_SIZE
    }
}
