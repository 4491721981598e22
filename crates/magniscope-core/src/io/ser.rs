use std::fs::File;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use ndarray::{Array3, Array4};

use crate::consts::{DEFAULT_FPS, MICROS_PER_SECOND};
use crate::error::{MagniscopeError, Result};
use crate::video::{ColorMode, SourceInfo, VideoClip};

pub const SER_HEADER_SIZE: usize = 178;
pub const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";

/// SER file header (178 bytes).
#[derive(Clone, Debug)]
pub struct SerHeader {
    pub color_id: i32,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
    pub observer: String,
    pub instrument: String,
    pub telescope: String,
    pub date_time: u64,
    pub date_time_utc: u64,
}

impl SerHeader {
    /// Bytes per pixel plane (1 for 8-bit, 2 for 9-16 bit).
    pub fn bytes_per_pixel_plane(&self) -> usize {
        if self.pixel_depth <= 8 { 1 } else { 2 }
    }

    /// Number of planes per pixel (1 for mono, 3 for RGB/BGR).
    pub fn planes_per_pixel(&self) -> usize {
        match self.color_id {
            100 | 101 => 3,
            _ => 1,
        }
    }

    /// Total bytes per frame.
    pub fn frame_byte_size(&self) -> usize {
        let pixels = (self.width as usize)
            .checked_mul(self.height as usize)
            .expect("Image dimensions too large");
        let bytes_per_pixel = self.bytes_per_pixel_plane() * self.planes_per_pixel();
        pixels
            .checked_mul(bytes_per_pixel)
            .expect("Frame size calculation overflow")
    }

    /// Channel layout of the pixel data. Bayer-mosaiced SER files are not
    /// meaningful input for a magnification sweep and are rejected.
    pub fn color_mode(&self) -> Result<ColorMode> {
        match self.color_id {
            0 => Ok(ColorMode::Mono),
            100 => Ok(ColorMode::RGB),
            101 => Ok(ColorMode::BGR),
            id @ 8..=11 => Err(MagniscopeError::UnsupportedColorMode(format!(
                "Bayer color id {id}"
            ))),
            id => Err(MagniscopeError::UnsupportedColorMode(format!(
                "color id {id}"
            ))),
        }
    }
}

/// Memory-mapped SER video reader.
pub struct SerReader {
    mmap: Mmap,
    pub header: SerHeader,
}

impl SerReader {
    /// Open a SER file and parse its header.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(MagniscopeError::InvalidSer(
                "File too small for SER header".into(),
            ));
        }

        if &mmap[0..14] != SER_MAGIC {
            return Err(MagniscopeError::InvalidSer(
                "Missing LUCAM-RECORDER magic".into(),
            ));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;

        let expected_data_size =
            SER_HEADER_SIZE + header.frame_byte_size() * header.frame_count as usize;
        if mmap.len() < expected_data_size {
            return Err(MagniscopeError::InvalidSer(format!(
                "File truncated: expected at least {} bytes, got {}",
                expected_data_size,
                mmap.len()
            )));
        }

        Ok(Self { mmap, header })
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    /// Get the raw bytes for a single frame (zero-copy from mmap).
    pub fn frame_raw(&self, index: usize) -> Result<&[u8]> {
        let count = self.frame_count();
        if index >= count {
            return Err(MagniscopeError::FrameIndexOutOfRange {
                index,
                total: count,
            });
        }
        let offset = SER_HEADER_SIZE + index * self.header.frame_byte_size();
        let end = offset + self.header.frame_byte_size();
        Ok(&self.mmap[offset..end])
    }

    /// Decode a single frame to f32 in [0.0, 1.0], shape (height, width, channels).
    /// BGR containers come out in RGB channel order.
    pub fn read_frame(&self, index: usize) -> Result<Array3<f32>> {
        let raw = self.frame_raw(index)?;
        let mode = self.header.color_mode()?;
        decode_frame(raw, &self.header, mode)
    }

    /// Read per-frame timestamp (microseconds) from the optional trailer.
    pub fn read_timestamp(&self, index: usize) -> Option<u64> {
        let trailer_offset =
            SER_HEADER_SIZE + self.header.frame_byte_size() * self.header.frame_count as usize;
        let ts_offset = trailer_offset + index * 8;
        if ts_offset + 8 <= self.mmap.len() {
            let bytes = &self.mmap[ts_offset..ts_offset + 8];
            Some(u64::from_le_bytes(bytes.try_into().ok()?))
        } else {
            None
        }
    }

    /// Frame rate derived from the timestamp trailer spacing, or
    /// `DEFAULT_FPS` when the trailer is absent or degenerate.
    pub fn fps(&self) -> f64 {
        let n = self.frame_count();
        if n < 2 {
            return DEFAULT_FPS;
        }
        let (first, last) = match (self.read_timestamp(0), self.read_timestamp(n - 1)) {
            (Some(a), Some(b)) if b > a => (a, b),
            _ => return DEFAULT_FPS,
        };
        (n - 1) as f64 * MICROS_PER_SECOND / (last - first) as f64
    }

    /// Build SourceInfo from the header.
    pub fn source_info(&self, path: &Path) -> Result<SourceInfo> {
        Ok(SourceInfo {
            filename: path.to_path_buf(),
            total_frames: self.frame_count(),
            width: self.header.width,
            height: self.header.height,
            bit_depth: self.header.pixel_depth as u8,
            color_mode: self.header.color_mode()?,
            fps: self.fps(),
        })
    }
}

/// Decode an entire SER file into a frame stack plus its frame rate.
pub fn load_video(path: &Path) -> Result<VideoClip> {
    let reader = SerReader::open(path)?;
    let n = reader.frame_count();
    if n == 0 {
        return Err(MagniscopeError::EmptyVideo);
    }

    let h = reader.header.height as usize;
    let w = reader.header.width as usize;
    let channels = reader.header.planes_per_pixel();

    let mut data = Array4::<f32>::zeros((n, h, w, channels));
    for i in 0..n {
        let frame = reader.read_frame(i)?;
        data.index_axis_mut(ndarray::Axis(0), i).assign(&frame);
    }

    Ok(VideoClip::new(data, reader.fps()))
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = std::io::Cursor::new(&buf[14..]); // skip magic

    let _lu_id = cursor.read_i32::<LittleEndian>()?;
    let color_id = cursor.read_i32::<LittleEndian>()?;
    let le_flag = cursor.read_i32::<LittleEndian>()?;
    let width = cursor.read_i32::<LittleEndian>()? as u32;
    let height = cursor.read_i32::<LittleEndian>()? as u32;
    let pixel_depth = cursor.read_i32::<LittleEndian>()? as u32;
    let frame_count = cursor.read_i32::<LittleEndian>()? as u32;

    let observer = read_fixed_string(&buf[42..82]);
    let instrument = read_fixed_string(&buf[82..122]);
    let telescope = read_fixed_string(&buf[122..162]);

    let mut cursor = std::io::Cursor::new(&buf[162..]);
    let date_time = cursor.read_u64::<LittleEndian>()?;
    let date_time_utc = cursor.read_u64::<LittleEndian>()?;

    if width == 0 || height == 0 {
        return Err(MagniscopeError::InvalidDimensions { width, height });
    }

    // SER spec: LittleEndian field = 0 means big-endian pixel data,
    // but many writers use 0 for little-endian. Follow Siril's convention.
    let little_endian = le_flag != 1;

    Ok(SerHeader {
        color_id,
        little_endian,
        width,
        height,
        pixel_depth,
        frame_count,
        observer,
        instrument,
        telescope,
        date_time,
        date_time_utc,
    })
}

fn read_fixed_string(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf)
        .trim_end_matches('\0')
        .trim()
        .to_string()
}

/// Decode one raw frame into (height, width, channels) f32 data.
/// For BGR sources the planes are reordered so channel 0 is red.
fn decode_frame(raw: &[u8], header: &SerHeader, mode: ColorMode) -> Result<Array3<f32>> {
    let h = header.height as usize;
    let w = header.width as usize;
    let bpp = header.bytes_per_pixel_plane();
    let planes = header.planes_per_pixel();
    let max_val = ((1u32 << header.pixel_depth) - 1) as f32;

    let mut data = Array3::<f32>::zeros((h, w, planes));

    for row in 0..h {
        for col in 0..w {
            let pixel_offset = (row * w + col) * planes * bpp;
            for plane in 0..planes {
                let idx = pixel_offset + plane * bpp;
                let val = if bpp == 1 {
                    raw[idx] as f32
                } else {
                    let pair = [raw[idx], raw[idx + 1]];
                    if header.little_endian {
                        u16::from_le_bytes(pair) as f32
                    } else {
                        u16::from_be_bytes(pair) as f32
                    }
                };
                let channel = match mode {
                    ColorMode::BGR => planes - 1 - plane,
                    _ => plane,
                };
                data[[row, col, channel]] = val / max_val;
            }
        }
    }

    Ok(data)
}
