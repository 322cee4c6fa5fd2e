//! Builders for synthetic data files
//!
//! Nothing here is meant to be a complete encoder; it writes just enough of
//! the container and datum formats to drive the parsers end to end.

#![allow(dead_code)]

pub fn u16_datum(value: u16) -> Vec<u8> {
    let mut out = 0x0003u16.to_le_bytes().to_vec();
    out.extend_from_slice(&value.to_le_bytes());
    out
}

pub fn i16_datum(value: i16) -> Vec<u8> {
    let mut out = 0x0010u16.to_le_bytes().to_vec();
    out.extend_from_slice(&value.to_le_bytes());
    out
}

pub fn point_datum(x: i16, y: i16) -> Vec<u8> {
    let mut out = 0x000fu16.to_le_bytes().to_vec();
    out.extend(i16_datum(x));
    out.extend(i16_datum(y));
    out
}

pub fn string_datum(text: &str) -> Vec<u8> {
    let mut out = 0x0012u16.to_le_bytes().to_vec();
    out.extend(u16_datum(text.len() as u16));
    out.extend_from_slice(text.as_bytes());
    out
}

/// Bitmap header datums followed by `payload`
pub fn bitmap_chunk(width: i16, height: i16, compression: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = u16_datum(0x24);
    out.extend(point_datum(width, height));
    out.extend(u16_datum(compression));
    out.extend(u16_datum(width as u16));
    out.extend_from_slice(payload);
    out
}

/// Movie frame header datums followed by `payload`
pub fn movie_frame_chunk(width: i16, height: i16, index: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = u16_datum(0x24);
    out.extend(point_datum(width, height));
    out.extend(u16_datum(1));
    out.extend(u16_datum(width as u16));
    out.extend(u16_datum(index));
    out.extend(u16_datum(0));
    out.extend_from_slice(payload);
    out
}

/// One RIFF subfile holding `chunks`
pub fn subfile(chunks: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
    let mut list = b"data".to_vec();
    for (tag, payload) in chunks {
        if list.len() % 2 == 1 {
            list.push(0);
        }
        list.extend_from_slice(*tag);
        list.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        list.extend_from_slice(payload);
    }

    let mut body = b"IMTSrate".to_vec();
    body.extend_from_slice(&4u32.to_le_bytes());
    body.extend_from_slice(&0u32.to_le_bytes());
    body.extend_from_slice(b"LIST");
    body.extend_from_slice(&(list.len() as u32).to_le_bytes());
    body.extend(list);

    let mut out = b"RIFF".to_vec();
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend(body);
    out
}

/// A context file: header plus the given subfiles, each on an even offset
pub fn context_file(subfiles: &[Vec<u8>]) -> Vec<u8> {
    let mut body = Vec::new();
    for sub in subfiles {
        if body.len() % 2 == 1 {
            body.push(0);
        }
        body.extend_from_slice(sub);
    }

    let mut out = b"II\0\0".to_vec();
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(subfiles.len() as u32).to_le_bytes());
    out.extend_from_slice(&((body.len() + 16) as u32).to_le_bytes());
    out.extend(body);
    out
}
