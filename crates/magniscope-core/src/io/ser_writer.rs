use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::consts::MICROS_PER_SECOND;
use crate::error::{MagniscopeError, Result};
use crate::io::ser::{SerHeader, SER_HEADER_SIZE, SER_MAGIC};
use crate::video::VideoClip;

/// Writes a valid SER file at the raw byte level.
pub struct SerWriter {
    writer: BufWriter<File>,
    header: SerHeader,
    frames_written: u32,
}

impl SerWriter {
    /// Create a new SER file and write the header.
    pub fn create(path: &Path, header: &SerHeader) -> Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_header(&mut writer, header)?;
        Ok(Self {
            writer,
            header: header.clone(),
            frames_written: 0,
        })
    }

    /// Write a single raw frame (bytes must match the header's frame_byte_size).
    pub fn write_raw_frame(&mut self, data: &[u8]) -> Result<()> {
        debug_assert_eq!(data.len(), self.header.frame_byte_size());
        self.writer.write_all(data)?;
        self.frames_written += 1;
        Ok(())
    }

    /// Write the optional timestamp trailer (one u64 per frame, little-endian).
    pub fn write_timestamps(&mut self, timestamps: &[u64]) -> Result<()> {
        for &ts in timestamps {
            self.writer.write_all(&ts.to_le_bytes())?;
        }
        Ok(())
    }

    /// Flush and finalize the file.
    pub fn finalize(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Encode a clip as an 8-bit SER file (RGB for 3-channel clips, mono for
/// 1-channel). The frame rate is carried in the timestamp trailer: frame i
/// is stamped at `i * 1e6 / fps` microseconds, so `load_video` round-trips
/// the fps.
pub fn save_video(clip: &VideoClip, path: &Path) -> Result<()> {
    let color_id = match clip.channels() {
        1 => 0,
        3 => 100,
        c => {
            return Err(MagniscopeError::UnsupportedColorMode(format!(
                "{c} channels"
            )))
        }
    };
    if clip.frame_count() == 0 {
        return Err(MagniscopeError::EmptyVideo);
    }

    let header = SerHeader {
        color_id,
        little_endian: true,
        width: clip.width() as u32,
        height: clip.height() as u32,
        pixel_depth: 8,
        frame_count: clip.frame_count() as u32,
        observer: String::new(),
        instrument: String::new(),
        telescope: String::new(),
        date_time: 0,
        date_time_utc: 0,
    };

    let mut writer = SerWriter::create(path, &header)?;

    let mut buf = vec![0u8; header.frame_byte_size()];
    for i in 0..clip.frame_count() {
        let frame = clip.frame(i)?;
        for (dst, &val) in buf.iter_mut().zip(frame.iter()) {
            *dst = (val.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
        writer.write_raw_frame(&buf)?;
    }

    let micros_per_frame = MICROS_PER_SECOND / clip.fps;
    let timestamps: Vec<u64> = (0..clip.frame_count())
        .map(|i| (i as f64 * micros_per_frame).round() as u64)
        .collect();
    writer.write_timestamps(&timestamps)?;

    writer.finalize()
}

fn write_header(w: &mut impl Write, header: &SerHeader) -> Result<()> {
    // Magic (14 bytes)
    w.write_all(SER_MAGIC)?;
    // LuID (4 bytes)
    w.write_all(&0i32.to_le_bytes())?;
    // ColorID (4 bytes)
    w.write_all(&header.color_id.to_le_bytes())?;
    // LittleEndian flag: 0 = little-endian (Siril convention)
    let le_flag: i32 = if header.little_endian { 0 } else { 1 };
    w.write_all(&le_flag.to_le_bytes())?;
    // Width (4 bytes)
    w.write_all(&(header.width as i32).to_le_bytes())?;
    // Height (4 bytes)
    w.write_all(&(header.height as i32).to_le_bytes())?;
    // PixelDepth (4 bytes)
    w.write_all(&(header.pixel_depth as i32).to_le_bytes())?;
    // FrameCount (4 bytes)
    w.write_all(&(header.frame_count as i32).to_le_bytes())?;
    // Observer (40 bytes)
    write_fixed_string(w, &header.observer, 40)?;
    // Instrument (40 bytes)
    write_fixed_string(w, &header.instrument, 40)?;
    // Telescope (40 bytes)
    write_fixed_string(w, &header.telescope, 40)?;
    // DateTime (8 bytes)
    w.write_all(&header.date_time.to_le_bytes())?;
    // DateTimeUTC (8 bytes)
    w.write_all(&header.date_time_utc.to_le_bytes())?;

    debug_assert_eq!(
        14 + 4 + 4 + 4 + 4 + 4 + 4 + 4 + 40 + 40 + 40 + 8 + 8,
        SER_HEADER_SIZE
    );
    Ok(())
}

fn write_fixed_string(w: &mut impl Write, s: &str, len: usize) -> Result<()> {
    let bytes = s.as_bytes();
    let to_write = bytes.len().min(len);
    w.write_all(&bytes[..to_write])?;
    // Pad with zeros
    for _ in to_write..len {
        w.write_all(&[0u8])?;
    }
    Ok(())
}
