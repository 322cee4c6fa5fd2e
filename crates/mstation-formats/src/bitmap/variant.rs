//! Bitmap decoder variants

use serde::{Deserialize, Serialize};

/// How the RLE decoder treats transparency markers (`00 02`)
///
/// Each variant is a superset of the one before it. All of them decode the
/// same pixel stream; they differ only in what happens around transparency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitmapVariant {
    /// Markers are ignored; only pixels are produced
    Opaque,
    /// Markers are recorded as transparency regions
    RegionList,
    /// Regions are recorded and, with a keyframe, filled in from it
    ///
    /// Without a keyframe the markers have nothing to composite against and
    /// are ignored with a warning.
    #[default]
    KeyframeComposite,
    /// Like `KeyframeComposite`, plus a per-pixel transparency mask
    Mask,
}

impl BitmapVariant {
    /// Whether a supplied keyframe is composited into the output
    pub const fn composites(self) -> bool {
        matches!(self, Self::KeyframeComposite | Self::Mask)
    }

    /// Whether a transparency mask is produced
    pub const fn produces_mask(self) -> bool {
        matches!(self, Self::Mask)
    }

    /// Whether transparency regions are recorded for this decode
    pub const fn tracks_regions(self, has_keyframe: bool) -> bool {
        match self {
            Self::Opaque => false,
            Self::RegionList | Self::Mask => true,
            Self::KeyframeComposite => has_keyframe,
        }
    }
}
