use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use magniscope_core::magnify::CommandMagnifier;
use magniscope_core::pipeline::config::HarnessConfig;
use magniscope_core::pipeline::{run_harness_reported, HarnessStage, ProgressReporter};
use magniscope_core::region::Area;

use super::overlay::parse_area;
use super::sweep::build_spec_from_lists;
use crate::summary::print_harness_summary;

#[derive(Args)]
pub struct RenderArgs {
    /// Input SER file (not needed with --config)
    pub file: Option<PathBuf>,

    /// Harness config file (TOML); overrides all other flags
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// External magnification executable
    #[arg(long)]
    pub evm_cmd: Option<PathBuf>,

    /// Comma-separated lower cutoff frequencies (Hz)
    #[arg(long)]
    pub lower_hertz: Option<String>,

    /// Comma-separated upper cutoff frequencies (Hz)
    #[arg(long)]
    pub upper_hertz: Option<String>,

    /// Comma-separated amplification factors
    #[arg(long)]
    pub amplification: Option<String>,

    /// Comma-separated pyramid level counts
    #[arg(long)]
    pub pyramid_levels: Option<String>,

    /// Region of interest: first_row,last_row,first_col,last_col
    #[arg(long, value_parser = parse_area)]
    pub area: Option<Area>,

    /// Output directory
    #[arg(short, long, default_value = "data")]
    pub out_dir: PathBuf,

    /// Basename of the final GIF (without extension)
    #[arg(long, default_value = "sweep_grid")]
    pub gif_name: String,

    /// Keep the per-video frame caches after rendering
    #[arg(long)]
    pub keep_cache: bool,
}

pub fn run(args: &RenderArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid harness config")?
    } else {
        build_config_from_args(args)?
    };

    print_harness_summary(&config);

    let magnifier = CommandMagnifier::new(&config.magnifier_command);
    let reporter = BarReporter::new()?;

    let gif = run_harness_reported(&config, &magnifier, &reporter)?;
    reporter.bar.finish_with_message("Done");

    println!("\nGrid animation saved to {}", gif.display());
    Ok(())
}

fn build_config_from_args(args: &RenderArgs) -> Result<HarnessConfig> {
    let Some(ref input) = args.file else {
        bail!("an input file is required unless --config is given");
    };
    let Some(ref evm_cmd) = args.evm_cmd else {
        bail!("--evm-cmd is required unless --config is given");
    };

    Ok(HarnessConfig {
        input: input.clone(),
        output_dir: args.out_dir.clone(),
        gif_name: args.gif_name.clone(),
        sweep: build_spec_from_lists(
            &args.lower_hertz,
            &args.upper_hertz,
            &args.amplification,
            &args.pyramid_levels,
        )?,
        area: args.area,
        magnifier_command: evm_cmd.clone(),
        keep_cache: args.keep_cache,
    })
}

/// Drives a single indicatif bar through the harness stages.
struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    fn new() -> Result<Self> {
        let bar = ProgressBar::new(1);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg:28} [{bar:40}] {pos}/{len}")?
                .progress_chars("=> "),
        );
        Ok(Self { bar })
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: HarnessStage, total_items: Option<usize>) {
        self.bar.set_message(stage.to_string());
        self.bar.set_length(total_items.unwrap_or(1) as u64);
        self.bar.set_position(0);
    }

    fn advance(&self, items_done: usize) {
        self.bar.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        self.bar.set_position(self.bar.length().unwrap_or(1));
    }
}
