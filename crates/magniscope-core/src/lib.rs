pub mod consts;
pub mod error;
pub mod grid;
pub mod io;
pub mod magnify;
pub mod pipeline;
pub mod region;
pub mod sweep;
pub mod video;
