//! Keyframe compositing and transparency masks

use crate::error::{Error, Result};

use super::frame::TransparencyRegion;

/// Fill transparent parts of `pixels` from `keyframe`
///
/// Every recorded region is copied over from the keyframe. A frame with no
/// regions at all treats palette index 0 as transparent everywhere, so each
/// zero pixel takes the keyframe's value instead.
pub fn composite(
    pixels: &mut [u8],
    regions: &[TransparencyRegion],
    keyframe: &[u8],
    full_width: usize,
) -> Result<()> {
    if keyframe.len() != pixels.len() {
        return Err(Error::DimensionMismatch(format!(
            "keyframe holds {} bytes but the canvas has {}",
            keyframe.len(),
            pixels.len()
        )));
    }

    if regions.is_empty() {
        for (pixel, &key) in pixels.iter_mut().zip(keyframe) {
            if *pixel == 0 {
                *pixel = key;
            }
        }
        return Ok(());
    }

    for region in regions {
        let span = region
            .span(full_width)
            .filter(|span| span.end <= pixels.len())
            .ok_or_else(|| {
                Error::DimensionMismatch(format!(
                    "transparency region {region:?} lies outside a canvas of {} bytes",
                    pixels.len()
                ))
            })?;
        pixels[span.clone()].copy_from_slice(&keyframe[span]);
    }
    Ok(())
}

/// Per-pixel transparency mask, 1 for transparent and 0 for opaque
///
/// Index 0 is transparent inside recorded regions, or anywhere if no region
/// was recorded.
pub fn transparency_mask(pixels: &[u8], regions: &[TransparencyRegion], full_width: usize) -> Vec<u8> {
    if regions.is_empty() {
        return pixels.iter().map(|&p| u8::from(p == 0)).collect();
    }

    let mut mask = vec![0; pixels.len()];
    for span in regions.iter().filter_map(|r| r.span(full_width)) {
        let (Some(out), Some(src)) = (mask.get_mut(span.clone()), pixels.get(span)) else {
            continue;
        };
        for (m, &p) in out.iter_mut().zip(src) {
            *m = u8::from(p == 0);
        }
    }
    mask
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn region(row: usize, start_column: usize, run_length: usize) -> TransparencyRegion {
        TransparencyRegion {
            row,
            start_column,
            run_length,
        }
    }

    #[test]
    fn test_regions_copied_from_keyframe() {
        let mut pixels = vec![1, 0, 0, 2, 3, 0];
        let keyframe = vec![9; 6];
        composite(&mut pixels, &[region(1, 1, 2)], &keyframe, 3).unwrap();
        // Zero pixels outside the region stay as decoded.
        assert_eq!(pixels, vec![1, 0, 0, 2, 9, 9]);
    }

    #[test]
    fn test_zero_fallback_without_regions() {
        let mut pixels = vec![1, 0, 0, 2];
        let keyframe = vec![5, 6, 7, 8];
        composite(&mut pixels, &[], &keyframe, 2).unwrap();
        assert_eq!(pixels, vec![1, 6, 7, 2]);
    }

    #[test]
    fn test_region_outside_canvas() {
        let mut pixels = vec![0; 4];
        let keyframe = vec![0; 4];
        assert!(matches!(
            composite(&mut pixels, &[region(1, 1, 2)], &keyframe, 2),
            Err(Error::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_keyframe_length_checked() {
        let mut pixels = vec![0; 4];
        assert!(composite(&mut pixels, &[], &[0; 5], 2).is_err());
    }

    #[test]
    fn test_mask() {
        let pixels = vec![0, 0, 3, 0];
        assert_eq!(transparency_mask(&pixels, &[], 4), vec![1, 1, 0, 1]);
        assert_eq!(
            transparency_mask(&pixels, &[region(0, 1, 2)], 4),
            vec![0, 1, 0, 0]
        );
    }
}
