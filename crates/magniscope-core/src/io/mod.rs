pub mod frame_cache;
pub mod ser;
pub mod ser_writer;

pub use ser::{load_video, SerReader};
pub use ser_writer::save_video;
