use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use magniscope_core::io::{load_video, save_video};
use magniscope_core::region::{crop, overlay, Area};

#[derive(Args)]
pub struct OverlayArgs {
    /// Original (base) video
    pub original: PathBuf,

    /// Magnified video to take the region of interest from
    pub magnified: PathBuf,

    /// Region of interest: first_row,last_row,first_col,last_col
    #[arg(long, value_parser = parse_area)]
    pub area: Area,

    /// Output file path
    #[arg(short, long, default_value = "overlaid.ser")]
    pub output: PathBuf,
}

pub fn run(args: &OverlayArgs) -> Result<()> {
    let base = load_video(&args.original)
        .with_context(|| format!("Failed to load {}", args.original.display()))?;
    let magnified = load_video(&args.magnified)
        .with_context(|| format!("Failed to load {}", args.magnified.display()))?;

    let cropped = crop(&magnified, &args.area)?;
    let composite = overlay(&cropped, &base, &args.area)?;
    save_video(&composite, &args.output)?;

    println!("Composite saved to {}", args.output.display());
    Ok(())
}

pub(crate) fn parse_area(s: &str) -> std::result::Result<Area, String> {
    let parts: Vec<usize> = s
        .split(',')
        .map(|p| p.trim().parse().map_err(|e| format!("{p:?}: {e}")))
        .collect::<std::result::Result<_, _>>()?;
    match parts[..] {
        [first_row, last_row, first_col, last_col] => Ok(Area {
            first_row,
            last_row,
            first_col,
            last_col,
        }),
        _ => Err("expected first_row,last_row,first_col,last_col".to_string()),
    }
}
