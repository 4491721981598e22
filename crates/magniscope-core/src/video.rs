use std::path::PathBuf;

use ndarray::{Array4, ArrayView3};

use crate::error::{MagniscopeError, Result};

/// A decoded video: a 4-D stack of frames plus its frame rate.
/// Pixel values are f32 in [0.0, 1.0]; axes are (frame, row, col, channel).
/// Color clips are stored in RGB channel order regardless of the container.
#[derive(Clone, Debug)]
pub struct VideoClip {
    pub data: Array4<f32>,
    pub fps: f64,
}

impl VideoClip {
    pub fn new(data: Array4<f32>, fps: f64) -> Self {
        Self { data, fps }
    }

    pub fn frame_count(&self) -> usize {
        self.data.shape()[0]
    }

    pub fn height(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn width(&self) -> usize {
        self.data.shape()[2]
    }

    pub fn channels(&self) -> usize {
        self.data.shape()[3]
    }

    /// View of a single frame, shape (height, width, channels).
    pub fn frame(&self, index: usize) -> Result<ArrayView3<'_, f32>> {
        let total = self.frame_count();
        if index >= total {
            return Err(MagniscopeError::FrameIndexOutOfRange { index, total });
        }
        Ok(self.data.index_axis(ndarray::Axis(0), index))
    }
}

/// Channel layout of the source container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ColorMode {
    Mono,
    RGB,
    BGR,
}

/// Metadata about a source video file.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub filename: PathBuf,
    pub total_frames: usize,
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_mode: ColorMode,
    pub fps: f64,
}
