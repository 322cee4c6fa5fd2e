//! Error types shared by the container parser and the media codecs

use thiserror::Error;

use crate::riff::FourCc;

/// Errors produced while walking containers or decoding media streams
#[derive(Debug, Error)]
pub enum Error {
    /// A read would cross the end of the underlying buffer
    #[error("read of {requested} bytes at offset {offset:#x} exceeds buffer of {len} bytes")]
    OutOfBounds {
        /// Offset the read started at
        offset: usize,
        /// Number of bytes requested
        requested: usize,
        /// Total buffer length
        len: usize,
    },

    /// Opcode sequence is inconsistent with the declared dimensions
    #[error("malformed stream at offset {offset:#x}: {reason}")]
    MalformedStream {
        /// Offset into the compressed stream where decoding stopped
        offset: usize,
        /// What went wrong
        reason: String,
    },

    /// Frame rectangle, canvas or keyframe sizes disagree
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A chunk declares more bytes than its enclosing subfile holds
    #[error("chunk {tag} at offset {offset:#x} declares {declared} bytes but only {available} remain")]
    TruncatedChunk {
        /// Tag of the offending chunk
        tag: FourCc,
        /// Offset of the chunk header
        offset: usize,
        /// Length declared in the chunk header
        declared: usize,
        /// Bytes left before the end of the subfile
        available: usize,
    },

    /// A fixed signature did not match
    #[error("invalid signature at offset {offset:#x}: expected {expected}, got {found}")]
    InvalidSignature {
        /// Offset of the signature
        offset: usize,
        /// Expected tag
        expected: FourCc,
        /// Tag actually present
        found: FourCc,
    },

    /// Zero-length chunks only show up in damaged reads
    #[error("zero-length chunk {tag} at offset {offset:#x}")]
    ZeroLengthChunk {
        /// Tag of the chunk
        tag: FourCc,
        /// Offset of the chunk header
        offset: usize,
    },

    /// Datum type code is not one of the known codes
    #[error("unknown datum type 0x{code:04x} at offset {offset:#x}")]
    UnknownDatumType {
        /// Raw type code
        code: u16,
        /// Offset of the datum
        offset: usize,
    },

    /// Datum is valid but not of the family the caller asked for
    #[error("expected {expected} datum at offset {offset:#x}, found type 0x{found:04x}")]
    UnexpectedDatumType {
        /// Family the caller asked for
        expected: &'static str,
        /// Raw type code found instead
        found: u16,
        /// Offset of the datum
        offset: usize,
    },

    /// String datum holds non-ASCII bytes
    #[error("string datum at offset {offset:#x} is not ASCII")]
    InvalidString {
        /// Offset of the string bytes
        offset: usize,
    },

    /// Bitmap compression type the decoder does not handle
    #[error("unsupported bitmap compression type: {0}")]
    UnsupportedCompression(i64),

    /// Sound encoding code the decoder does not handle
    #[error("unsupported sound encoding: 0x{0:04x}")]
    UnsupportedSoundEncoding(u16),

    /// Fixed header could not be decoded
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),

    /// Decoder configuration could not be parsed
    #[error("invalid decoder configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a [`Error::MalformedStream`] at `offset`
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        Self::MalformedStream {
            offset,
            reason: reason.into(),
        }
    }
}

/// Result type for all decode operations
pub type Result<T> = std::result::Result<T, Error>;
