#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! End-to-end tests: synthetic context files walked and decoded

mod common;

use common::{bitmap_chunk, context_file, movie_frame_chunk, string_datum, subfile, u16_datum};
use mstation_formats::audio::{AdpcmVariant, SoundEncoding, decode_adpcm_to_pcm_bytes, decode_sound_chunks};
use mstation_formats::bitmap::{Bitmap, BitmapVariant, FooterLayout, MovieFrame, MovieFrameFooter};
use mstation_formats::riff::{ChunkKind, DataFile, FourCc};
use mstation_formats::{DecoderConfig, Error};
use pretty_assertions::assert_eq;

fn sample_file() -> Vec<u8> {
    let mut header = u16_datum(0x0002);
    header.extend(string_datum("img_title"));

    let bitmap = bitmap_chunk(4, 2, 1, &[0x00, 0x00, 0x04, 0x11, 0x00, 0x00, 0x04, 0x22, 0x00, 0x01]);
    let raw = bitmap_chunk(2, 2, 0, &[0x00, 0x00, 1, 2, 3, 4]);

    context_file(&[
        subfile(&[(b"igod", header), (b"a001", bitmap), (b"a002", raw)]),
        subfile(&[(b"a003", vec![0x77, 0x00]), (b"a003", vec![0x77, 0x00, 0x8F])]),
    ])
}

#[test]
fn walk_and_decode_context_file() {
    let data = sample_file();
    let file = DataFile::parse(&data, true).unwrap();
    assert_eq!(file.header().unwrap().subfile_count, 2);
    assert!(!file.is_header_only());

    let config = DecoderConfig::default();
    let subfiles: Vec<_> = file.subfiles().collect::<Result<_, _>>().unwrap();
    assert_eq!(subfiles.len(), 2);

    let chunks: Vec<_> = subfiles[0].chunks().collect::<Result<_, _>>().unwrap();
    assert_eq!(chunks.len(), 3);

    let metadata = &chunks[0];
    assert_eq!(metadata.kind(), ChunkKind::Metadata);
    let mut sections = metadata.sections();
    assert_eq!(sections.read_section_type().unwrap(), 0x0002);
    assert_eq!(sections.read_string().unwrap(), "img_title");
    assert!(sections.is_at_end());

    assert_eq!(chunks[1].kind(), ChunkKind::Asset(1));
    let bitmap = Bitmap::read(&mut chunks[1].sections()).unwrap();
    let decoded = bitmap.decode(&config).unwrap();
    assert_eq!((decoded.width, decoded.height), (4, 2));
    assert_eq!(decoded.pixels, vec![0x11, 0x11, 0x11, 0x11, 0x22, 0x22, 0x22, 0x22]);

    let raw = Bitmap::read(&mut chunks[2].sections()).unwrap();
    assert_eq!(raw.decode(&config).unwrap().pixels, vec![1, 2, 3, 4]);

    let sound: Vec<&[u8]> = subfiles[1]
        .chunks()
        .map(|chunk| chunk.map(|c| c.payload()))
        .collect::<Result<_, _>>()
        .unwrap();
    assert!(
        subfiles[1]
            .chunks()
            .all(|c| c.unwrap().tag == FourCc(*b"a003"))
    );
    let pcm = decode_sound_chunks(SoundEncoding::ImaAdpcm, sound, &config);
    assert_eq!(pcm.len(), 5 * 4);

    let mut expected = decode_adpcm_to_pcm_bytes(&[0x77, 0x00], AdpcmVariant::Ima);
    expected.extend(decode_adpcm_to_pcm_bytes(&[0x77, 0x00, 0x8F], AdpcmVariant::Ima));
    assert_eq!(pcm, expected);
}

#[test]
fn headerless_system_file() {
    let data = subfile(&[(b"igod", u16_datum(7))]);
    let file = DataFile::parse(&data, false).unwrap();
    assert!(file.header().is_none());
    let subfile = file.subfiles().next().unwrap().unwrap();
    let chunk = subfile.chunks().next().unwrap().unwrap();
    assert_eq!(chunk.sections().read_u16().unwrap(), 7);
}

#[test]
fn truncated_file_reports_chunk() {
    let data = sample_file();
    // Cut into the first subfile's RIFF chunk.
    let cut = &data[..60];
    let file = DataFile::parse(cut, true).unwrap();
    let err = file.subfiles().next().unwrap().expect_err("subfile is cut short");
    assert!(matches!(err, Error::TruncatedChunk { tag, .. } if tag == FourCc::RIFF));
}

#[test]
fn movie_frames_against_keyframe() {
    let config = DecoderConfig::default();

    // A full-canvas keyframe: 4x2 of color 0x40.
    let keyframe_chunk = movie_frame_chunk(4, 2, 1, &[0x00, 0x00, 0x04, 0x40, 0x00, 0x00, 0x04, 0x40, 0x00, 0x01]);
    // A 2x1 frame at (1, 1) whose first pixel is a transparency run.
    let delta_chunk = movie_frame_chunk(2, 1, 2, &[0x00, 0x00, 0x00, 0x02, 0x01, 0x00, 0x01, 0x09, 0x00, 0x01]);
    let mut footer_bytes = Vec::new();
    for value in [1u16, 2, 0, 100, 1, 1, 0, 0, 2] {
        footer_bytes.extend(u16_datum(value));
    }

    let data = context_file(&[subfile(&[
        (b"a010", keyframe_chunk),
        (b"a010", delta_chunk),
        (b"igod", footer_bytes),
    ])]);
    let file = DataFile::parse(&data, true).unwrap();
    let subfile = file.subfiles().next().unwrap().unwrap();
    let chunks: Vec<_> = subfile.chunks().collect::<Result<_, _>>().unwrap();

    let key = MovieFrame::read(&mut chunks[0].sections()).unwrap();
    let key_canvas = key.decode(None, 4, 2, None, &config).unwrap();
    assert_eq!(key_canvas.pixels, vec![0x40; 8]);

    let frame = MovieFrame::read(&mut chunks[1].sections()).unwrap();
    let footer = MovieFrameFooter::read(&mut chunks[2].sections(), FooterLayout::Compact).unwrap();
    assert_eq!(footer.index, frame.header.index);
    assert_eq!((footer.left, footer.top), (1, 1));

    let decoded = frame
        .decode(Some(&footer), 4, 2, Some(&key_canvas.pixels), &config)
        .unwrap();
    assert_eq!(decoded.regions.len(), 1);
    assert_eq!(decoded.pixels, vec![0, 0, 0, 0, 0, 0x40, 0x09, 0]);

    // The region-list variant leaves compositing to the caller.
    let listed = frame
        .decode(
            Some(&footer),
            4,
            2,
            None,
            &config.with_bitmap_variant(BitmapVariant::RegionList),
        )
        .unwrap();
    assert_eq!(listed.pixels, vec![0, 0, 0, 0, 0, 0, 0x09, 0]);
    assert_eq!(listed.regions, decoded.regions);
}
