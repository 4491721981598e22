use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use ndarray::{Array3, ArrayView3};
use tracing::debug;

use crate::consts::{FRAME_FILE_EXT, FRAME_FILE_PREFIX};
use crate::error::{MagniscopeError, Result};
use crate::io::ser::load_video;

/// Cache directory for a video: its path minus the extension.
pub fn cache_dir_for(video_path: &Path) -> PathBuf {
    video_path.with_extension("")
}

/// Path of the cached array file for one frame index.
pub fn frame_file(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("{FRAME_FILE_PREFIX}{index}.{FRAME_FILE_EXT}"))
}

/// Write one frame as a little-endian array file: three u32 dimensions
/// (height, width, channels) followed by row-major f32 pixel data.
pub fn write_frame_array(path: &Path, frame: ArrayView3<'_, f32>) -> Result<()> {
    let (h, w, c) = frame.dim();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writer.write_u32::<LittleEndian>(h as u32)?;
    writer.write_u32::<LittleEndian>(w as u32)?;
    writer.write_u32::<LittleEndian>(c as u32)?;
    for &val in frame.iter() {
        writer.write_f32::<LittleEndian>(val)?;
    }
    Ok(())
}

/// Read a frame array file written by `write_frame_array`.
pub fn read_frame_array(path: &Path) -> Result<Array3<f32>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let h = reader.read_u32::<LittleEndian>()? as usize;
    let w = reader.read_u32::<LittleEndian>()? as usize;
    let c = reader.read_u32::<LittleEndian>()? as usize;
    if h == 0 || w == 0 || c == 0 {
        return Err(MagniscopeError::InvalidFrameArray(format!(
            "{}: zero dimension {h}x{w}x{c}",
            path.display()
        )));
    }

    let mut values = vec![0f32; h * w * c];
    reader.read_f32_into::<LittleEndian>(&mut values)?;

    Array3::from_shape_vec((h, w, c), values).map_err(|e| {
        MagniscopeError::InvalidFrameArray(format!("{}: {e}", path.display()))
    })
}

/// Decode each video and persist every frame as an individual array file in
/// a per-video directory. Directory creation is idempotent. Returns the
/// cache directories in input order.
///
/// `progress` is called with `(videos_done, total_videos)`.
pub fn cache_frames(
    video_paths: &[PathBuf],
    mut progress: impl FnMut(usize, usize),
) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::with_capacity(video_paths.len());

    for path in video_paths {
        let clip = load_video(path)?;
        let dir = cache_dir_for(path);
        std::fs::create_dir_all(&dir)?;

        for i in 0..clip.frame_count() {
            write_frame_array(&frame_file(&dir, i), clip.frame(i)?)?;
        }
        debug!(dir = %dir.display(), frames = clip.frame_count(), "Cached frames");
        dirs.push(dir);
        progress(dirs.len(), video_paths.len());
    }

    Ok(dirs)
}

/// Number of consecutive cached frames `F_0..F_{n-1}` present in a directory.
pub fn cached_frame_count(dir: &Path) -> Result<usize> {
    if !dir.is_dir() {
        return Err(MagniscopeError::MissingCacheDirectory(dir.to_path_buf()));
    }
    let mut n = 0;
    while frame_file(dir, n).is_file() {
        n += 1;
    }
    Ok(n)
}

/// Recursively delete each cache directory. A missing directory is a
/// bookkeeping bug in the caller and fails loudly.
pub fn cleanup(dirs: &[PathBuf]) -> Result<()> {
    for dir in dirs {
        if !dir.exists() {
            return Err(MagniscopeError::MissingCacheDirectory(dir.clone()));
        }
        std::fs::remove_dir_all(dir)?;
        debug!(dir = %dir.display(), "Removed frame cache");
    }
    Ok(())
}
