pub mod info;
pub mod overlay;
pub mod render;
pub mod sweep;
