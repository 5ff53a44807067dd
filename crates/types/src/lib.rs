pub mod color;
pub mod geometry;
pub mod ids;
pub mod transform;

pub use color::Color;
pub use geometry::{Rect, Size};
pub use ids::{LinkId, LinkUrl};
pub use transform::{AxisTransform, ContainFit};
