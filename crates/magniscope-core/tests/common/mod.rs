#![allow(dead_code)]

use std::cell::Cell;
use std::path::{Path, PathBuf};

use ndarray::Array4;

use magniscope_core::error::{MagniscopeError, Result};
use magniscope_core::io::save_video;
use magniscope_core::magnify::{EvmParams, Magnifier};
use magniscope_core::video::VideoClip;

/// Deterministic test clip. Values are multiples of 1/255 so the 8-bit SER
/// round trip is exact.
pub fn make_clip(frames: usize, height: usize, width: usize, channels: usize) -> VideoClip {
    let data = Array4::from_shape_fn((frames, height, width, channels), |(f, r, c, ch)| {
        ((f * 31 + r * 7 + c * 13 + ch * 5) % 256) as f32 / 255.0
    });
    VideoClip::new(data, 25.0)
}

/// Save a clip under `dir` and return its path.
pub fn save_clip(dir: &Path, name: &str, clip: &VideoClip) -> PathBuf {
    let path = dir.join(name);
    save_video(clip, &path).expect("save test clip");
    path
}

/// Build a raw SER byte buffer (8-bit pixels).
///
/// `color_id`: 0=MONO, 100=RGB, 101=BGR, 8..=11=Bayer.
pub fn build_ser(
    width: u32,
    height: u32,
    color_id: i32,
    frames: &[Vec<u8>],
    timestamps: Option<&[u64]>,
) -> Vec<u8> {
    let mut buf = Vec::new();

    // Magic (14 bytes)
    buf.extend_from_slice(b"LUCAM-RECORDER");
    // LuID (4 bytes)
    buf.extend_from_slice(&0i32.to_le_bytes());
    // ColorID
    buf.extend_from_slice(&color_id.to_le_bytes());
    // LittleEndian = 0 (little-endian per Siril convention)
    buf.extend_from_slice(&0i32.to_le_bytes());
    // Width
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    // Height
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    // PixelDepth
    buf.extend_from_slice(&8i32.to_le_bytes());
    // FrameCount
    buf.extend_from_slice(&(frames.len() as i32).to_le_bytes());
    // Observer / Instrument / Telescope (40 bytes each)
    buf.extend_from_slice(&[0u8; 40]);
    buf.extend_from_slice(&[0u8; 40]);
    buf.extend_from_slice(&[0u8; 40]);
    // DateTime / DateTimeUTC (8 bytes each)
    buf.extend_from_slice(&0u64.to_le_bytes());
    buf.extend_from_slice(&0u64.to_le_bytes());

    for frame in frames {
        buf.extend_from_slice(frame);
    }

    if let Some(ts) = timestamps {
        for &t in ts {
            buf.extend_from_slice(&t.to_le_bytes());
        }
    }

    buf
}

/// Write raw SER bytes to `dir/name` and return the path.
pub fn write_ser(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).expect("write SER data");
    path
}

/// Magnifier stub that returns the input unchanged.
pub struct IdentityMagnifier;

impl Magnifier for IdentityMagnifier {
    fn magnify(&self, clip: &VideoClip, _params: &EvmParams) -> Result<VideoClip> {
        Ok(clip.clone())
    }
}

/// Magnifier stub that floods every pixel with `upper_hertz / 10`, making
/// outputs distinguishable per sweep point.
pub struct FloodMagnifier;

impl Magnifier for FloodMagnifier {
    fn magnify(&self, clip: &VideoClip, params: &EvmParams) -> Result<VideoClip> {
        let mut out = clip.clone();
        out.data.fill((params.upper_hertz / 10.0) as f32);
        Ok(out)
    }
}

/// Magnifier stub that fails on the nth call (1-based).
pub struct FailingMagnifier {
    fail_at: usize,
    calls: Cell<usize>,
}

impl FailingMagnifier {
    pub fn new(fail_at: usize) -> Self {
        Self {
            fail_at,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Magnifier for FailingMagnifier {
    fn magnify(&self, clip: &VideoClip, _params: &EvmParams) -> Result<VideoClip> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        if call == self.fail_at {
            Err(MagniscopeError::Magnification("synthetic failure".into()))
        } else {
            Ok(clip.clone())
        }
    }
}
