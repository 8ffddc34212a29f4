//! Raw and run-length encoded pixel streams.
//!
//! A run-length packet starts with a control byte. When the top bit is set the packet repeats the
//! single pixel that follows `(control & 0x7F) + 1` times, otherwise `(control & 0x7F) + 1` literal
//! pixels follow. The encoder never lets a packet cross the end of a scanline.

use std::io::Read;

use byteorder::ReadBytesExt;
use tracing::{instrument, warn};

use crate::bytes::{pixel, read_section, read_vec, short_read};
use crate::error::{Result, Section};

const RUN_FLAG: u8 = 0x80;
const COUNT_MASK: u8 = 0x7F;
const MAX_PACKET: usize = 128;
/// Pixel bytes reserved up front, the buffer grows past this only as packets decode
const INITIAL_CAPACITY: usize = 1 << 20;

/// Read an uncompressed pixel block
#[instrument(skip(reader), err)]
pub fn decode_raw<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    read_section(reader, len, Section::ImageData)
}

/// Expand run-length packets into a `width * height * bytes_per_pixel` buffer
///
/// Packets that continue past the end of a scanline are accepted, a packet that runs past the end
/// of the image is clipped. A stream that ends before the image is filled is a
/// [`Error::SizeMismatch`](crate::error::Error::SizeMismatch).
#[instrument(skip(reader), err)]
pub fn decode_rle<R: Read>(
    reader: &mut R,
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
) -> Result<Vec<u8>> {
    let total = width * height * bytes_per_pixel;
    let mut output = Vec::with_capacity(total.min(INITIAL_CAPACITY));
    if bytes_per_pixel == 0 {
        return Ok(output);
    }

    let truncated = |err, actual| short_read(err, Section::ImageData, total, actual);
    let mut pixel_buffer = vec![0u8; bytes_per_pixel];
    while output.len() < total {
        let control = reader.read_u8().map_err(|err| truncated(err, output.len()))?;
        let count = (control & COUNT_MASK) as usize + 1;
        let remaining = (total - output.len()) / bytes_per_pixel;
        if count > remaining {
            warn!(count, remaining, "run-length packet overruns the image");
        }

        if control & RUN_FLAG != 0 {
            reader
                .read_exact(&mut pixel_buffer)
                .map_err(|err| truncated(err, output.len()))?;
            for _ in 0..count.min(remaining) {
                output.extend_from_slice(&pixel_buffer);
            }
        } else {
            let literal = read_vec(reader, count * bytes_per_pixel)
                .map_err(|err| truncated(err, output.len()))?;
            output.extend_from_slice(&literal[..count.min(remaining) * bytes_per_pixel]);
        }
    }

    Ok(output)
}

/// Compress a pixel buffer scanline by scanline
///
/// Returns the packets together with the offset of every scanline inside them.
#[instrument(skip(pixels), fields(size = pixels.len()))]
pub fn encode_rle(
    pixels: &[u8],
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
) -> (Vec<u8>, Vec<usize>) {
    let stride = width * bytes_per_pixel;
    let mut output = Vec::with_capacity(pixels.len() + pixels.len() / MAX_PACKET + height);
    let mut line_offsets = Vec::with_capacity(height);

    for y in 0..height {
        line_offsets.push(output.len());
        if bytes_per_pixel == 0 {
            continue;
        }

        let line = &pixels[y * stride..(y + 1) * stride];
        encode_scanline(line, width, bytes_per_pixel, &mut output);
    }

    (output, line_offsets)
}

fn encode_scanline(line: &[u8], width: usize, bpp: usize, output: &mut Vec<u8>) {
    let same = |a: usize, b: usize| pixel(line, a, bpp) == pixel(line, b, bpp);

    let mut x = 0;
    while x < width {
        if x + 1 < width && same(x, x + 1) {
            let mut run = 2;
            while x + run < width && run < MAX_PACKET && same(x, x + run) {
                run += 1;
            }
            output.push(RUN_FLAG | (run - 1) as u8);
            output.extend_from_slice(pixel(line, x, bpp));
            x += run;
        } else {
            let start = x;
            x += 1;
            while x < width && x - start < MAX_PACKET && !(x + 1 < width && same(x, x + 1)) {
                x += 1;
            }
            output.push((x - start - 1) as u8);
            output.extend_from_slice(&line[start * bpp..x * bpp]);
        }
    }
}
