//! Arranges cached frame stacks into a labeled grid and renders the
//! animation as a looping GIF.

pub mod font;

use std::fs::File;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, Rgba, RgbaImage};
use ndarray::Array3;
use tracing::info;

use crate::consts::{GRID_LEFT_GUTTER_PX, GRID_TILE_GAP_PX, GRID_TOP_GUTTER_PX};
use crate::error::{MagniscopeError, Result};
use crate::io::frame_cache::{cached_frame_count, frame_file, read_frame_array};

use font::{draw_text, text_width, GLYPH_HEIGHT};

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const LABEL_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// One labeled grid axis: a parameter name and its swept values.
#[derive(Clone, Debug)]
pub struct GridParam {
    pub name: String,
    pub values: Vec<f64>,
}

impl GridParam {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Explicit mapping from grid position to cache directory.
///
/// The sweep driver visits combinations with the x parameter in the outer
/// loop (it comes earlier in the fixed nesting order), so output index
/// `xi * ny + yi` belongs at column `xi`, row `yi`. Keeping that rule here,
/// behind an accessor, is what ties the animator to the sweep's ordering
/// contract.
#[derive(Clone, Debug)]
pub struct GridCells {
    dirs: Vec<PathBuf>,
    nx: usize,
    ny: usize,
}

impl GridCells {
    /// Wrap sweep outputs (in sweep order) as an nx-by-ny grid.
    pub fn from_sweep_order(dirs: Vec<PathBuf>, nx: usize, ny: usize) -> Result<Self> {
        if nx == 0 || ny == 0 {
            return Err(MagniscopeError::InvalidSweep(
                "grid axes must have at least one value each".into(),
            ));
        }
        if dirs.len() != nx * ny {
            return Err(MagniscopeError::InvalidSweep(format!(
                "{} cache directories for a {nx}x{ny} grid",
                dirs.len()
            )));
        }
        Ok(Self { dirs, nx, ny })
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Cache directory of the cell at column `xi`, row `yi`.
    pub fn dir(&self, xi: usize, yi: usize) -> &Path {
        &self.dirs[xi * self.ny + yi]
    }

    fn all_dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

/// Render the parameter grid as a looping GIF: columns are x values, rows
/// are y values, the top gutter carries the x labels and the left gutter
/// the y labels. One GIF frame per cached frame index, at `1000 / fps` ms
/// per frame. Returns the written path.
pub fn render_grid(
    x: &GridParam,
    y: &GridParam,
    cells: &GridCells,
    fps: f64,
    output: &Path,
) -> Result<PathBuf> {
    if x.values.len() != cells.nx() || y.values.len() != cells.ny() {
        return Err(MagniscopeError::InvalidSweep(format!(
            "axis sizes {}x{} do not match the {}x{} grid",
            x.values.len(),
            y.values.len(),
            cells.nx(),
            cells.ny()
        )));
    }

    // Animate as many frames as every cell can supply.
    let mut frame_total = usize::MAX;
    for dir in cells.all_dirs() {
        frame_total = frame_total.min(cached_frame_count(dir)?);
    }
    if frame_total == 0 || frame_total == usize::MAX {
        return Err(MagniscopeError::EmptyVideo);
    }

    let reference = read_frame_array(&frame_file(cells.dir(0, 0), 0))?;
    let (tile_h, tile_w, channels) = reference.dim();
    if channels != 1 && channels != 3 {
        return Err(MagniscopeError::UnsupportedColorMode(format!(
            "{channels} channels in cached frames"
        )));
    }

    let layout = Layout::new(cells.nx() as u32, cells.ny() as u32, tile_w as u32, tile_h as u32);

    info!(
        grid = format!("{}x{}", cells.nx(), cells.ny()),
        frames = frame_total,
        output = %output.display(),
        "Rendering grid animation"
    );

    let file = File::create(output)?;
    let mut encoder = GifEncoder::new(file);
    encoder.set_repeat(Repeat::Infinite)?;
    let delay = Delay::from_numer_denom_ms(1000, fps.max(1.0).round() as u32);

    for frame_index in 0..frame_total {
        let mut canvas = RgbaImage::from_pixel(layout.canvas_w, layout.canvas_h, BACKGROUND);
        draw_labels(&mut canvas, x, y, &layout);

        for xi in 0..cells.nx() {
            for yi in 0..cells.ny() {
                let tile = read_frame_array(&frame_file(cells.dir(xi, yi), frame_index))?;
                if tile.dim() != reference.dim() {
                    return Err(MagniscopeError::ShapeMismatch(format!(
                        "cell ({xi},{yi}) frame {frame_index} is {:?}, expected {:?}",
                        tile.dim(),
                        reference.dim()
                    )));
                }
                blit_tile(&mut canvas, &tile, layout.tile_origin(xi as u32, yi as u32));
            }
        }

        let frame = Frame::from_parts(canvas, 0, 0, delay);
        encoder.encode_frame(frame)?;
    }

    Ok(output.to_path_buf())
}

/// Pixel geometry of the composed canvas.
struct Layout {
    tile_w: u32,
    tile_h: u32,
    canvas_w: u32,
    canvas_h: u32,
}

impl Layout {
    fn new(nx: u32, ny: u32, tile_w: u32, tile_h: u32) -> Self {
        let canvas_w = GRID_LEFT_GUTTER_PX + nx * tile_w + (nx - 1) * GRID_TILE_GAP_PX;
        let canvas_h = GRID_TOP_GUTTER_PX + ny * tile_h + (ny - 1) * GRID_TILE_GAP_PX;
        Self {
            tile_w,
            tile_h,
            canvas_w,
            canvas_h,
        }
    }

    fn tile_origin(&self, xi: u32, yi: u32) -> (u32, u32) {
        (
            GRID_LEFT_GUTTER_PX + xi * (self.tile_w + GRID_TILE_GAP_PX),
            GRID_TOP_GUTTER_PX + yi * (self.tile_h + GRID_TILE_GAP_PX),
        )
    }
}

fn draw_labels(canvas: &mut RgbaImage, x: &GridParam, y: &GridParam, layout: &Layout) {
    // x name centered over the tile region, value labels over each column.
    let tiles_w = layout.canvas_w - GRID_LEFT_GUTTER_PX;
    let name_x =
        GRID_LEFT_GUTTER_PX + tiles_w.saturating_sub(text_width(&x.name, 1)) / 2;
    draw_text(canvas, name_x, 4, 1, LABEL_COLOR, &x.name);

    for (xi, value) in x.values.iter().enumerate() {
        let label = format!("{value}");
        let (ox, _) = layout.tile_origin(xi as u32, 0);
        let lx = ox + layout.tile_w.saturating_sub(text_width(&label, 1)) / 2;
        draw_text(canvas, lx, 4 + GLYPH_HEIGHT + 5, 1, LABEL_COLOR, &label);
    }

    // y name in the gutter corner, value labels beside each row.
    draw_text(canvas, 2, 4, 1, LABEL_COLOR, &y.name);
    for (yi, value) in y.values.iter().enumerate() {
        let label = format!("{value}");
        let (_, oy) = layout.tile_origin(0, yi as u32);
        let ly = oy + (layout.tile_h / 2).saturating_sub(GLYPH_HEIGHT / 2);
        draw_text(canvas, 4, ly, 1, LABEL_COLOR, &label);
    }
}

fn blit_tile(canvas: &mut RgbaImage, tile: &Array3<f32>, origin: (u32, u32)) {
    let (h, w, channels) = tile.dim();
    for row in 0..h {
        for col in 0..w {
            let pixel = if channels == 1 {
                let v = to_u8(tile[[row, col, 0]]);
                Rgba([v, v, v, 255])
            } else {
                Rgba([
                    to_u8(tile[[row, col, 0]]),
                    to_u8(tile[[row, col, 1]]),
                    to_u8(tile[[row, col, 2]]),
                    255,
                ])
            };
            canvas.put_pixel(origin.0 + col as u32, origin.1 + row as u32, pixel);
        }
    }
}

fn to_u8(val: f32) -> u8 {
    (val.clamp(0.0, 1.0) * 255.0).round() as u8
}
