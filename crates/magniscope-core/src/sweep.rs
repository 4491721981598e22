use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{MagniscopeError, Result};
use crate::io::save_video;
use crate::magnify::{EvmParams, Magnifier};
use crate::region::{crop, overlay, Area};
use crate::video::VideoClip;

/// Candidate value lists for each magnification parameter. Single-element
/// lists hold a parameter fixed; multi-element lists sweep it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SweepSpec {
    pub lower_hertz: Vec<f64>,
    pub upper_hertz: Vec<f64>,
    pub amplification_factor: Vec<f64>,
    pub pyramid_levels: Vec<u32>,
}

impl SweepSpec {
    /// Check the sweep preconditions: every list non-empty, and at most two
    /// parameters varying (the grid visualization has two axes).
    pub fn validated(&self) -> Result<()> {
        for (name, len) in [
            ("lower_hertz", self.lower_hertz.len()),
            ("upper_hertz", self.upper_hertz.len()),
            ("amplification_factor", self.amplification_factor.len()),
            ("pyramid_levels", self.pyramid_levels.len()),
        ] {
            if len == 0 {
                return Err(MagniscopeError::InvalidSweep(format!(
                    "{name} has no candidate values"
                )));
            }
        }

        let varying = self.varying_count();
        if varying > 2 {
            return Err(MagniscopeError::InvalidSweep(format!(
                "{varying} parameters vary, but the grid has only two axes"
            )));
        }
        Ok(())
    }

    /// Number of parameters with more than one candidate value.
    pub fn varying_count(&self) -> usize {
        [
            self.lower_hertz.len(),
            self.upper_hertz.len(),
            self.amplification_factor.len(),
            self.pyramid_levels.len(),
        ]
        .iter()
        .filter(|&&len| len > 1)
        .count()
    }

    /// Total number of sweep points.
    pub fn point_count(&self) -> usize {
        self.lower_hertz.len()
            * self.upper_hertz.len()
            * self.amplification_factor.len()
            * self.pyramid_levels.len()
    }

    /// Iterate the Cartesian product in the fixed nesting order:
    /// lower_hertz outermost, then upper_hertz, then amplification_factor,
    /// then pyramid_levels innermost.
    pub fn combinations(&self) -> impl Iterator<Item = EvmParams> + '_ {
        let uppers = &self.upper_hertz;
        let amps = &self.amplification_factor;
        let levels = &self.pyramid_levels;
        self.lower_hertz.iter().flat_map(move |&lower_hertz| {
            uppers.iter().flat_map(move |&upper_hertz| {
                amps.iter().flat_map(move |&amplification_factor| {
                    levels.iter().map(move |&pyramid_levels| EvmParams {
                        lower_hertz,
                        upper_hertz,
                        amplification_factor,
                        pyramid_levels,
                    })
                })
            })
        })
    }
}

/// Output filename for one sweep point. The legacy scheme encodes only the
/// two frequencies and the amplification; `_pyr=` is appended only when
/// `include_levels` is set (i.e. the spec sweeps more than one pyramid
/// level), since otherwise level-only variations would overwrite each other.
pub fn output_name(params: &EvmParams, include_levels: bool, truncated: bool) -> String {
    let prefix = if truncated { "truncated_" } else { "" };
    let levels = if include_levels {
        format!("_pyr={}", params.pyramid_levels)
    } else {
        String::new()
    };
    format!(
        "{prefix}EVM_freqmin={}_freqmax={}_ampli={}{levels}.ser",
        params.lower_hertz, params.upper_hertz, params.amplification_factor
    )
}

/// Run the magnification sweep over every parameter combination, writing one
/// video per point into `out_dir`. With an `area`, each output is the
/// magnified crop composited back onto the original footage.
///
/// `progress` is called with `(points_done, total_points)`.
///
/// Fail-fast: the first failing point aborts the sweep, and the error names
/// the active parameter values.
pub fn run_sweep(
    magnifier: &dyn Magnifier,
    clip: &VideoClip,
    spec: &SweepSpec,
    area: Option<&Area>,
    out_dir: &Path,
    mut progress: impl FnMut(usize, usize),
) -> Result<Vec<PathBuf>> {
    spec.validated()?;
    if let Some(a) = area {
        a.validated(clip.height(), clip.width())?;
    }
    std::fs::create_dir_all(out_dir)?;

    let include_levels = spec.pyramid_levels.len() > 1;
    let total = spec.point_count();
    let mut outputs = Vec::with_capacity(total);

    for params in spec.combinations() {
        let path = out_dir.join(output_name(&params, include_levels, area.is_some()));
        info!(%params, output = %path.display(), "Magnifying");

        run_point(magnifier, clip, &params, area, &path).map_err(|e| {
            MagniscopeError::SweepPoint {
                params: params.to_string(),
                source: Box::new(e),
            }
        })?;
        outputs.push(path);
        progress(outputs.len(), total);
    }

    Ok(outputs)
}

fn run_point(
    magnifier: &dyn Magnifier,
    clip: &VideoClip,
    params: &EvmParams,
    area: Option<&Area>,
    path: &Path,
) -> Result<()> {
    let magnified = magnifier.magnify(clip, params)?;

    // Keep at most one full-resolution stack alive besides the source.
    let final_clip = match area {
        Some(a) => {
            let cropped = crop(&magnified, a)?;
            drop(magnified);
            overlay(&cropped, clip, a)?
        }
        None => magnified,
    };

    save_video(&final_clip, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_legacy_scheme() {
        let params = EvmParams {
            lower_hertz: 0.4,
            upper_hertz: 3.0,
            amplification_factor: 50.0,
            pyramid_levels: 4,
        };
        assert_eq!(
            output_name(&params, false, false),
            "EVM_freqmin=0.4_freqmax=3_ampli=50.ser"
        );
    }

    #[test]
    fn output_name_with_levels_and_truncation() {
        let params = EvmParams {
            lower_hertz: 0.0,
            upper_hertz: 1.0,
            amplification_factor: 100.0,
            pyramid_levels: 6,
        };
        assert_eq!(
            output_name(&params, true, true),
            "truncated_EVM_freqmin=0_freqmax=1_ampli=100_pyr=6.ser"
        );
    }
}
