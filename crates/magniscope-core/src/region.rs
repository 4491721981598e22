use ndarray::s;
use serde::{Deserialize, Serialize};

use crate::error::{MagniscopeError, Result};
use crate::video::VideoClip;

/// A rectangular region of interest in pixel coordinates.
/// Rows span `first_row..last_row`, columns `first_col..last_col`
/// (half-open, like slice ranges).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub first_row: usize,
    pub last_row: usize,
    pub first_col: usize,
    pub last_col: usize,
}

impl Area {
    pub fn height(&self) -> usize {
        self.last_row - self.first_row
    }

    pub fn width(&self) -> usize {
        self.last_col - self.first_col
    }

    /// Validate the area against a frame extent.
    pub fn validated(&self, frame_height: usize, frame_width: usize) -> Result<Area> {
        if self.first_row >= self.last_row || self.first_col >= self.last_col {
            return Err(MagniscopeError::InvalidArea(format!(
                "empty region: rows {}..{}, cols {}..{}",
                self.first_row, self.last_row, self.first_col, self.last_col
            )));
        }
        if self.last_row > frame_height || self.last_col > frame_width {
            return Err(MagniscopeError::InvalidArea(format!(
                "region rows {}..{}, cols {}..{} exceeds frame extent {}x{}",
                self.first_row,
                self.last_row,
                self.first_col,
                self.last_col,
                frame_height,
                frame_width
            )));
        }
        Ok(*self)
    }
}

/// Extract the sub-stack `clip[:, first_row..last_row, first_col..last_col, :]`.
pub fn crop(clip: &VideoClip, area: &Area) -> Result<VideoClip> {
    let area = area.validated(clip.height(), clip.width())?;
    let data = clip
        .data
        .slice(s![
            ..,
            area.first_row..area.last_row,
            area.first_col..area.last_col,
            ..
        ])
        .to_owned();
    Ok(VideoClip::new(data, clip.fps))
}

/// Composite `cropped` back onto `base` inside `area`, returning the result.
/// The cropped stack must match the area extent exactly and share the base's
/// frame and channel counts.
pub fn overlay(cropped: &VideoClip, base: &VideoClip, area: &Area) -> Result<VideoClip> {
    let area = area.validated(base.height(), base.width())?;

    if cropped.height() != area.height() || cropped.width() != area.width() {
        return Err(MagniscopeError::ShapeMismatch(format!(
            "cropped stack is {}x{} but area is {}x{}",
            cropped.height(),
            cropped.width(),
            area.height(),
            area.width()
        )));
    }
    if cropped.frame_count() != base.frame_count() {
        return Err(MagniscopeError::ShapeMismatch(format!(
            "cropped stack has {} frames, base has {}",
            cropped.frame_count(),
            base.frame_count()
        )));
    }
    if cropped.channels() != base.channels() {
        return Err(MagniscopeError::ShapeMismatch(format!(
            "cropped stack has {} channels, base has {}",
            cropped.channels(),
            base.channels()
        )));
    }

    let mut composite = base.clone();
    composite
        .data
        .slice_mut(s![
            ..,
            area.first_row..area.last_row,
            area.first_col..area.last_col,
            ..
        ])
        .assign(&cropped.data);
    Ok(composite)
}
