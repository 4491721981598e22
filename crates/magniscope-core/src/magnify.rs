use std::path::PathBuf;
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{
    DEFAULT_AMPLIFICATION, DEFAULT_LOWER_HERTZ, DEFAULT_PYRAMID_LEVELS, DEFAULT_UPPER_HERTZ,
};
use crate::error::{MagniscopeError, Result};
use crate::io::{load_video, save_video};
use crate::video::VideoClip;

/// One point of the sweep: the parameters for a single magnification call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvmParams {
    pub lower_hertz: f64,
    pub upper_hertz: f64,
    pub amplification_factor: f64,
    pub pyramid_levels: u32,
}

impl Default for EvmParams {
    fn default() -> Self {
        Self {
            lower_hertz: DEFAULT_LOWER_HERTZ,
            upper_hertz: DEFAULT_UPPER_HERTZ,
            amplification_factor: DEFAULT_AMPLIFICATION,
            pyramid_levels: DEFAULT_PYRAMID_LEVELS,
        }
    }
}

impl std::fmt::Display for EvmParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "freq_min={} freq_max={} amplification={} pyramid_levels={}",
            self.lower_hertz, self.upper_hertz, self.amplification_factor, self.pyramid_levels
        )
    }
}

/// The external magnification collaborator. Its numeric behavior is a black
/// box; implementors must return a clip of the same shape as the input.
pub trait Magnifier {
    fn magnify(&self, clip: &VideoClip, params: &EvmParams) -> Result<VideoClip>;
}

/// Runs a user-supplied magnification executable, exchanging clips through
/// scratch SER files:
///
/// ```text
/// <program> --fps <fps> --freq-min <lo> --freq-max <hi> \
///           --amplification <a> --pyramid-levels <p> <input.ser> <output.ser>
/// ```
pub struct CommandMagnifier {
    program: PathBuf,
}

impl CommandMagnifier {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Magnifier for CommandMagnifier {
    fn magnify(&self, clip: &VideoClip, params: &EvmParams) -> Result<VideoClip> {
        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join("input.ser");
        let output = scratch.path().join("magnified.ser");
        save_video(clip, &input)?;

        debug!(program = %self.program.display(), %params, "Invoking magnifier");
        let result = Command::new(&self.program)
            .arg("--fps")
            .arg(clip.fps.to_string())
            .arg("--freq-min")
            .arg(params.lower_hertz.to_string())
            .arg("--freq-max")
            .arg(params.upper_hertz.to_string())
            .arg("--amplification")
            .arg(params.amplification_factor.to_string())
            .arg("--pyramid-levels")
            .arg(params.pyramid_levels.to_string())
            .arg(&input)
            .arg(&output)
            .output()
            .map_err(|e| {
                MagniscopeError::Magnification(format!(
                    "failed to run {}: {e}",
                    self.program.display()
                ))
            })?;

        if !result.status.success() {
            return Err(MagniscopeError::Magnification(format!(
                "{} exited with {}: {}",
                self.program.display(),
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }

        let magnified = load_video(&output).map_err(|e| {
            MagniscopeError::Magnification(format!("unreadable magnifier output: {e}"))
        })?;

        if magnified.data.shape() != clip.data.shape() {
            return Err(MagniscopeError::Magnification(format!(
                "magnifier changed the clip shape: {:?} -> {:?}",
                clip.data.shape(),
                magnified.data.shape()
            )));
        }
        Ok(magnified)
    }
}
