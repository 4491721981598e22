use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::region::Area;
use crate::sweep::SweepSpec;

/// Full configuration of one harness run, loadable from TOML.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Source video (SER).
    pub input: PathBuf,
    /// Directory receiving the per-point videos, frame caches and the GIF.
    pub output_dir: PathBuf,
    /// Basename of the final GIF, without extension.
    #[serde(default = "default_gif_name")]
    pub gif_name: String,
    /// Candidate parameter values.
    pub sweep: SweepSpec,
    /// Optional region of interest for crop-and-overlay compositing.
    #[serde(default)]
    pub area: Option<Area>,
    /// External magnification executable.
    pub magnifier_command: PathBuf,
    /// Keep the per-video frame caches after rendering.
    #[serde(default)]
    pub keep_cache: bool,
}

impl HarnessConfig {
    pub fn gif_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.gif", self.gif_name))
    }
}

fn default_gif_name() -> String {
    "sweep_grid".to_string()
}
