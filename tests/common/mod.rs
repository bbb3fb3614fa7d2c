#![allow(dead_code)]

use std::io::{Cursor, Write};

use flate2::write::ZlibEncoder;

/// Deterministic, poorly compressible pixel data.
pub fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        })
        .collect()
}

/// Adam7 pass origins and steps as (x0, y0, dx, dy).
const ADAM7_PASSES: [(u32, u32, u32, u32); 7] = [
    (0, 0, 8, 8),
    (4, 0, 8, 8),
    (0, 4, 4, 8),
    (2, 0, 4, 4),
    (0, 2, 2, 4),
    (1, 0, 2, 2),
    (0, 1, 1, 2),
];

/// Builds an Adam7-interlaced PNG chunk by chunk; the png encoder only writes progressive images.
pub fn encode_png_interlaced(width: u32, height: u32, color: png::ColorType, pixels: &[u8]) -> Vec<u8> {
    let (color_code, channels) = match color {
        png::ColorType::Grayscale => (0u8, 1usize),
        png::ColorType::Rgb => (2, 3),
        png::ColorType::GrayscaleAlpha => (4, 2),
        png::ColorType::Rgba => (6, 4),
        other => panic!("no test support for {:?}", other),
    };

    let mut scanlines = Vec::new();
    for (x0, y0, dx, dy) in ADAM7_PASSES {
        if x0 >= width || y0 >= height {
            continue;
        }
        for y in (y0..height).step_by(dy as usize) {
            scanlines.push(0);
            for x in (x0..width).step_by(dx as usize) {
                let start = (y * width + x) as usize * channels;
                scanlines.extend_from_slice(&pixels[start..start + channels]);
            }
        }
    }
    let mut zlib = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    zlib.write_all(&scanlines).unwrap();
    let idat = zlib.finish().unwrap();

    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.extend_from_slice(&[8, color_code, 0, 0, 1]);

    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    push_chunk(&mut bytes, b"IHDR", &ihdr);
    push_chunk(&mut bytes, b"IDAT", &idat);
    push_chunk(&mut bytes, b"IEND", &[]);
    bytes
}

fn push_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    let start = out.len();
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    let crc = crc32fast::hash(&out[start..]);
    out.extend_from_slice(&crc.to_be_bytes());
}

pub fn encode_png(width: u32, height: u32, color: png::ColorType, pixels: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(pixels).unwrap();
        writer.finish().unwrap();
    }
    bytes
}

/// Decodes a PNG into (width, height, color, rows).
pub fn decode_png(bytes: &[u8]) -> (u32, u32, png::ColorType, Vec<Vec<u8>>) {
    let decoder = png::Decoder::new(Cursor::new(bytes));
    let mut reader = decoder.read_info().unwrap();
    let (width, height, color) = {
        let info = reader.info();
        (info.width, info.height, info.color_type)
    };
    let mut rows = Vec::new();
    while let Some(row) = reader.next_row().unwrap() {
        rows.push(row.data().to_vec());
    }
    (width, height, color, rows)
}

pub fn rows_of(pixels: &[u8], row_len: usize) -> Vec<Vec<u8>> {
    pixels.chunks(row_len).map(|r| r.to_vec()).collect()
}

/// Rewrites the IHDR height of an encoded PNG and fixes up the chunk CRC.
pub fn patch_png_height(bytes: &mut [u8], height: u32) {
    bytes[20..24].copy_from_slice(&height.to_be_bytes());
    let crc = crc32fast::hash(&bytes[12..29]);
    bytes[29..33].copy_from_slice(&crc.to_be_bytes());
}

pub fn encode_jpeg(width: u32, height: u32, color: image::ColorType, pixels: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, 95)
        .encode(pixels, width, height, color)
        .unwrap();
    bytes
}
