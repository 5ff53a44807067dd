//! Bundled capture host: a display-list view and the rasterizer that paints it.

mod rasterizer;
mod tree;

pub use rasterizer::{DisplayListRasterizer, DEFAULT_MAX_DIMENSION, DEFAULT_MAX_PIXELS};
pub use tree::{Border, ViewNode, ViewTree};
