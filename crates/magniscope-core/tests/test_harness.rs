mod common;

use std::cell::RefCell;
use std::path::PathBuf;

use magniscope_core::pipeline::config::HarnessConfig;
use magniscope_core::pipeline::{grid_axes, run_harness, run_harness_reported, HarnessStage, ProgressReporter};
use magniscope_core::sweep::SweepSpec;

use common::{make_clip, save_clip, FloodMagnifier};

fn spec(lower: &[f64], upper: &[f64], ampli: &[f64], levels: &[u32]) -> SweepSpec {
    SweepSpec {
        lower_hertz: lower.to_vec(),
        upper_hertz: upper.to_vec(),
        amplification_factor: ampli.to_vec(),
        pyramid_levels: levels.to_vec(),
    }
}

fn harness_config(input: PathBuf, output_dir: PathBuf, sweep: SweepSpec) -> HarnessConfig {
    HarnessConfig {
        input,
        output_dir,
        gif_name: "sweep_grid".to_string(),
        sweep,
        area: None,
        magnifier_command: PathBuf::from("unused"),
        keep_cache: false,
    }
}

#[test]
fn test_grid_axes_two_varying() {
    let (x, y) = grid_axes(&spec(&[0.0], &[1.0, 2.0], &[10.0, 50.0], &[4])).unwrap();
    assert_eq!(x.name, "upper_hertz");
    assert_eq!(x.values, vec![1.0, 2.0]);
    assert_eq!(y.name, "amplification_factor");
    assert_eq!(y.values, vec![10.0, 50.0]);
}

#[test]
fn test_grid_axes_one_varying_gets_singleton_partner() {
    let (x, y) = grid_axes(&spec(&[0.0], &[1.0], &[10.0, 20.0, 30.0], &[4])).unwrap();
    assert_eq!(x.name, "amplification_factor");
    assert_eq!(x.values.len(), 3);
    assert_eq!(y.name, "lower_hertz");
    assert_eq!(y.values, vec![0.0]);
}

#[test]
fn test_grid_axes_none_varying() {
    let (x, y) = grid_axes(&spec(&[0.5], &[2.0], &[25.0], &[4])).unwrap();
    assert_eq!(x.name, "lower_hertz");
    assert_eq!(x.values, vec![0.5]);
    assert_eq!(y.name, "upper_hertz");
    assert_eq!(y.values, vec![2.0]);
}

#[test]
fn test_grid_axes_pyramid_levels_as_floats() {
    let (x, _) = grid_axes(&spec(&[0.0], &[1.0], &[10.0], &[2, 4, 6])).unwrap();
    assert_eq!(x.name, "pyramid_levels");
    assert_eq!(x.values, vec![2.0, 4.0, 6.0]);
}

#[test]
fn test_run_harness_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    let clip = make_clip(3, 4, 4, 3);
    let input = save_clip(tmp.path(), "clip.ser", &clip);
    let out_dir = tmp.path().join("out");
    let config = harness_config(input, out_dir.clone(), spec(&[0.0], &[1.0, 2.0], &[10.0], &[4]));

    let gif = run_harness(&config, &FloodMagnifier).unwrap();

    assert_eq!(gif, out_dir.join("sweep_grid.gif"));
    assert!(gif.is_file());

    // Two per-point videos, caches removed after rendering.
    assert!(out_dir.join("EVM_freqmin=0_freqmax=1_ampli=10.ser").is_file());
    assert!(out_dir.join("EVM_freqmin=0_freqmax=2_ampli=10.ser").is_file());
    assert!(!out_dir.join("EVM_freqmin=0_freqmax=1_ampli=10").exists());
    assert!(!out_dir.join("EVM_freqmin=0_freqmax=2_ampli=10").exists());
}

#[test]
fn test_run_harness_keeps_caches_when_asked() {
    let tmp = tempfile::tempdir().unwrap();
    let clip = make_clip(2, 4, 4, 3);
    let input = save_clip(tmp.path(), "clip.ser", &clip);
    let out_dir = tmp.path().join("out");
    let mut config =
        harness_config(input, out_dir.clone(), spec(&[0.0], &[1.0, 2.0], &[10.0], &[4]));
    config.keep_cache = true;

    run_harness(&config, &FloodMagnifier).unwrap();

    let cache = out_dir.join("EVM_freqmin=0_freqmax=1_ampli=10");
    assert!(cache.is_dir());
    assert!(cache.join("F_0.arr").is_file());
    assert!(cache.join("F_1.arr").is_file());
}

#[derive(Default)]
struct RecordingReporter {
    stages: RefCell<Vec<(HarnessStage, Option<usize>)>>,
}

impl ProgressReporter for RecordingReporter {
    fn begin_stage(&self, stage: HarnessStage, total_items: Option<usize>) {
        self.stages.borrow_mut().push((stage, total_items));
    }
}

#[test]
fn test_run_harness_reports_stages_in_order() {
    let tmp = tempfile::tempdir().unwrap();
    let clip = make_clip(2, 4, 4, 3);
    let input = save_clip(tmp.path(), "clip.ser", &clip);
    let config = harness_config(
        input,
        tmp.path().join("out"),
        spec(&[0.0], &[1.0, 2.0], &[10.0], &[4]),
    );

    let reporter = RecordingReporter::default();
    run_harness_reported(&config, &FloodMagnifier, &reporter).unwrap();

    assert_eq!(
        *reporter.stages.borrow(),
        vec![
            (HarnessStage::Loading, None),
            (HarnessStage::Sweeping, Some(2)),
            (HarnessStage::Caching, Some(2)),
            (HarnessStage::Rendering, None),
            (HarnessStage::Cleanup, Some(2)),
        ]
    );
}
