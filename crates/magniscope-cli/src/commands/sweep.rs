use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use magniscope_core::consts::{
    DEFAULT_AMPLIFICATION, DEFAULT_LOWER_HERTZ, DEFAULT_PYRAMID_LEVELS, DEFAULT_UPPER_HERTZ,
};
use magniscope_core::io::load_video;
use magniscope_core::magnify::CommandMagnifier;
use magniscope_core::region::Area;
use magniscope_core::sweep::{run_sweep, SweepSpec};

use super::overlay::parse_area;

#[derive(Args)]
pub struct SweepArgs {
    /// Input SER file
    pub file: PathBuf,

    /// External magnification executable
    #[arg(long)]
    pub evm_cmd: PathBuf,

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
}

pub fn run(args: &SweepArgs) -> Result<()> {
    let spec = build_spec(args)?;
    let clip = load_video(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let magnifier = CommandMagnifier::new(&args.evm_cmd);

    let pb = ProgressBar::new(spec.point_count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:28} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Running magnification sweep");

    let outputs = run_sweep(
        &magnifier,
        &clip,
        &spec,
        args.area.as_ref(),
        &args.out_dir,
        |done, _| pb.set_position(done as u64),
    )?;
    pb.finish_with_message("Done");

    println!("\nProduced {} video(s):", outputs.len());
    for path in &outputs {
        println!("  {}", path.display());
    }
    Ok(())
}

pub(crate) fn build_spec_from_lists(
    lower: &Option<String>,
    upper: &Option<String>,
    amplification: &Option<String>,
    pyramid_levels: &Option<String>,
) -> Result<SweepSpec> {
    Ok(SweepSpec {
        lower_hertz: parse_list(lower, DEFAULT_LOWER_HERTZ).context("--lower-hertz")?,
        upper_hertz: parse_list(upper, DEFAULT_UPPER_HERTZ).context("--upper-hertz")?,
        amplification_factor: parse_list(amplification, DEFAULT_AMPLIFICATION)
            .context("--amplification")?,
        pyramid_levels: parse_list(pyramid_levels, DEFAULT_PYRAMID_LEVELS)
            .context("--pyramid-levels")?,
    })
}

fn build_spec(args: &SweepArgs) -> Result<SweepSpec> {
    build_spec_from_lists(
        &args.lower_hertz,
        &args.upper_hertz,
        &args.amplification,
        &args.pyramid_levels,
    )
}

fn parse_list<T>(arg: &Option<String>, default: T) -> Result<Vec<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match arg {
        None => Ok(vec![default]),
        Some(s) => s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse()
                    .with_context(|| format!("invalid value {:?}", p.trim()))
            })
            .collect(),
    }
}
