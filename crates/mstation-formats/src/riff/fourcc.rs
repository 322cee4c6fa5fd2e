//! Four-character chunk tags

use std::fmt;

use binrw::BinRead;

/// A four-byte chunk tag such as `RIFF`, `igod` or `a01f`
#[derive(Clone, Copy, PartialEq, Eq, Hash, BinRead)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    /// Outer subfile tag
    pub const RIFF: Self = Self(*b"RIFF");
    /// First half of the `IMTSrate` eight-character tag
    pub const IMTS: Self = Self(*b"IMTS");
    /// Second half of the `IMTSrate` eight-character tag
    pub const RATE: Self = Self(*b"rate");
    /// List chunk wrapping the data chunks
    pub const LIST: Self = Self(*b"LIST");
    /// Prefix in front of the first data chunk's tag
    pub const DATA: Self = Self(*b"data");
    /// Metadata chunk
    pub const IGOD: Self = Self(*b"igod");

    /// Build a tag from up to four bytes, filling missing bytes with `?`
    pub fn from_partial(bytes: &[u8]) -> Self {
        let mut tag = [b'?'; 4];
        for (slot, byte) in tag.iter_mut().zip(bytes) {
            *slot = *byte;
        }
        Self(tag)
    }

    /// Raw tag bytes
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Numeric id of an asset chunk tag (`a123` is 0x123)
    ///
    /// Returns `None` unless the tag is `a` followed by three hex digits.
    pub fn asset_id(&self) -> Option<u16> {
        let [prefix, digits @ ..] = self.0;
        if prefix != b'a' {
            return None;
        }
        digits.iter().try_fold(0u16, |id, &digit| {
            let value = (digit as char).to_digit(16)?;
            Some((id << 4) | value as u16)
        })
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCc(\"{self}\")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id() {
        assert_eq!(FourCc(*b"a000").asset_id(), Some(0));
        assert_eq!(FourCc(*b"a123").asset_id(), Some(0x123));
        assert_eq!(FourCc(*b"a1fF").asset_id(), Some(0x1ff));
        assert_eq!(FourCc::IGOD.asset_id(), None);
        assert_eq!(FourCc(*b"a12g").asset_id(), None);
        assert_eq!(FourCc(*b"b123").asset_id(), None);
    }

    #[test]
    fn test_display_escapes_binary() {
        assert_eq!(FourCc::RIFF.to_string(), "RIFF");
        assert_eq!(FourCc(*b"II\0\0").to_string(), "II\\x00\\x00");
        assert_eq!(format!("{:?}", FourCc::IGOD), "FourCc(\"igod\")");
    }

    #[test]
    fn test_from_partial() {
        assert_eq!(FourCc::from_partial(b"ab"), FourCc(*b"ab??"));
        assert_eq!(FourCc::from_partial(b"abcdef"), FourCc(*b"abcd"));
    }
}
