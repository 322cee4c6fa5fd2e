//! Sound assets made of several audio chunks

use tracing::debug;

use crate::config::DecoderConfig;
use crate::error::{Error, Result};

use super::adpcm::AdpcmDecoder;

/// Sample rate of every known sound encoding
pub const SAMPLE_RATE: u32 = 22_050;

/// How a sound's chunks are encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum SoundEncoding {
    /// 16-bit little-endian linear PCM, stored as is
    Pcm = 0x0010,
    /// 4-bit ADPCM, decoded to 16-bit PCM
    ImaAdpcm = 0x0004,
}

impl SoundEncoding {
    /// Look up an encoding code from a sound header
    pub fn from_code(code: u16) -> Result<Self> {
        match code {
            0x0010 => Ok(Self::Pcm),
            0x0004 => Ok(Self::ImaAdpcm),
            _ => Err(Error::UnsupportedSoundEncoding(code)),
        }
    }

    /// Format of the decoded output
    pub fn format(self) -> SoundFormat {
        SoundFormat::default()
    }
}

/// Shape of decoded PCM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundFormat {
    /// Samples per second
    pub sample_rate: u32,
    /// Interleaved channels
    pub channels: u16,
    /// Bits per sample
    pub bits_per_sample: u16,
}

impl Default for SoundFormat {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            channels: 1,
            bits_per_sample: 16,
        }
    }
}

/// Decode the chunks of one sound into 16-bit little-endian PCM bytes
///
/// ADPCM chunks are decoded independently, each with fresh decoder state;
/// carrying state across chunks makes the volume jump at chunk boundaries.
pub fn decode_sound_chunks<'a, I>(
    encoding: SoundEncoding,
    chunks: I,
    config: &DecoderConfig,
) -> Vec<u8>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut pcm = Vec::new();
    let mut chunk_count = 0usize;
    for chunk in chunks {
        chunk_count += 1;
        match encoding {
            SoundEncoding::Pcm => pcm.extend_from_slice(chunk),
            SoundEncoding::ImaAdpcm => {
                let mut decoder = AdpcmDecoder::new(config.adpcm_variant);
                pcm.reserve(chunk.len() * 4);
                for &byte in chunk {
                    for sample in decoder.decode_byte(byte) {
                        pcm.extend_from_slice(&sample.to_le_bytes());
                    }
                }
            }
        }
    }
    debug!(?encoding, chunks = chunk_count, bytes = pcm.len(), "decoded sound");
    pcm
}
