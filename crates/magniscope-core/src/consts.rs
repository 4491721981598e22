/// Frame rate assumed when a SER file carries no usable timestamp trailer.
pub const DEFAULT_FPS: f64 = 30.0;

/// SER trailer timestamps are in microseconds.
pub const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Cached frame files are named `F_<index>.arr`.
pub const FRAME_FILE_PREFIX: &str = "F_";

/// Extension of cached frame array files.
pub const FRAME_FILE_EXT: &str = "arr";

/// Default EVM lower cutoff frequency (Hz).
pub const DEFAULT_LOWER_HERTZ: f64 = 0.0;

/// Default EVM upper cutoff frequency (Hz).
pub const DEFAULT_UPPER_HERTZ: f64 = 1.0;

/// Default EVM amplification factor.
pub const DEFAULT_AMPLIFICATION: f64 = 100.0;

/// Default number of pyramid levels passed to the magnifier.
pub const DEFAULT_PYRAMID_LEVELS: u32 = 4;

/// Width of the left gutter (y-axis labels) in grid GIFs, in pixels.
pub const GRID_LEFT_GUTTER_PX: u32 = 72;

/// Height of the top gutter (x-axis labels) in grid GIFs, in pixels.
pub const GRID_TOP_GUTTER_PX: u32 = 28;

/// Gap between neighbouring grid tiles, in pixels.
pub const GRID_TILE_GAP_PX: u32 = 2;
