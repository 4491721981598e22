use std::path::PathBuf;

use tracing::info;

use crate::error::Result;
use crate::grid::{render_grid, GridCells, GridParam};
use crate::io::frame_cache::{cache_frames, cleanup};
use crate::io::load_video;
use crate::magnify::Magnifier;
use crate::sweep::{run_sweep, SweepSpec};

use super::config::HarnessConfig;
use super::types::{HarnessStage, NoOpReporter, ProgressReporter};

/// Derive the two grid axes from a sweep spec.
///
/// The varying parameters (at most two, in the fixed nesting order) become
/// the x and y axes. With a single varying parameter the next parameter in
/// canonical order supplies a singleton axis; with none, the grid is 1x1.
pub fn grid_axes(spec: &SweepSpec) -> Result<(GridParam, GridParam)> {
    spec.validated()?;

    let candidates = [
        ("lower_hertz", spec.lower_hertz.clone()),
        ("upper_hertz", spec.upper_hertz.clone()),
        ("amplification_factor", spec.amplification_factor.clone()),
        (
            "pyramid_levels",
            spec.pyramid_levels.iter().map(|&v| v as f64).collect(),
        ),
    ];

    let mut varying: Vec<GridParam> = candidates
        .iter()
        .filter(|(_, values)| values.len() > 1)
        .map(|(name, values)| GridParam::new(*name, values.clone()))
        .collect();

    // Pops yield the later parameter first, so (y, x) in nesting order.
    match (varying.pop(), varying.pop()) {
        (Some(y), Some(x)) => Ok((x, y)),
        (Some(x), None) => {
            // Pair the lone varying axis with the first fixed parameter.
            let (name, values) = if x.name == candidates[0].0 {
                &candidates[1]
            } else {
                &candidates[0]
            };
            Ok((x, GridParam::new(*name, values.clone())))
        }
        _ => {
            let (xn, xv) = &candidates[0];
            let (yn, yv) = &candidates[1];
            Ok((
                GridParam::new(*xn, xv.clone()),
                GridParam::new(*yn, yv.clone()),
            ))
        }
    }
}

/// Run the whole harness: load the source, sweep the parameter grid, cache
/// frames, render the grid GIF and (unless configured otherwise) delete the
/// caches. Returns the GIF path.
pub fn run_harness_reported(
    config: &HarnessConfig,
    magnifier: &dyn Magnifier,
    reporter: &dyn ProgressReporter,
) -> Result<PathBuf> {
    reporter.begin_stage(HarnessStage::Loading, None);
    let clip = load_video(&config.input)?;
    info!(
        frames = clip.frame_count(),
        fps = clip.fps,
        width = clip.width(),
        height = clip.height(),
        "Loaded source video"
    );
    reporter.finish_stage();

    let (x_axis, y_axis) = grid_axes(&config.sweep)?;

    reporter.begin_stage(HarnessStage::Sweeping, Some(config.sweep.point_count()));
    let outputs = run_sweep(
        magnifier,
        &clip,
        &config.sweep,
        config.area.as_ref(),
        &config.output_dir,
        |done, _| reporter.advance(done),
    )?;
    reporter.finish_stage();

    reporter.begin_stage(HarnessStage::Caching, Some(outputs.len()));
    let dirs = cache_frames(&outputs, |done, _| reporter.advance(done))?;
    reporter.finish_stage();

    reporter.begin_stage(HarnessStage::Rendering, None);
    let cells = GridCells::from_sweep_order(dirs.clone(), x_axis.values.len(), y_axis.values.len())?;
    let gif = render_grid(&x_axis, &y_axis, &cells, clip.fps, &config.gif_path())?;
    reporter.finish_stage();

    if !config.keep_cache {
        reporter.begin_stage(HarnessStage::Cleanup, Some(dirs.len()));
        cleanup(&dirs)?;
        reporter.finish_stage();
    }

    info!(gif = %gif.display(), "Harness run complete");
    Ok(gif)
}

/// Run the full harness without progress reporting.
pub fn run_harness(config: &HarnessConfig, magnifier: &dyn Magnifier) -> Result<PathBuf> {
    run_harness_reported(config, magnifier, &NoOpReporter)
}
