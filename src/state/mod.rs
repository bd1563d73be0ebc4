pub mod geometry;
pub mod gesture;

pub use geometry::{ClipperGeometry, CropWindow, Point, Rect, Size, design_to_px};
pub use gesture::Gesture;
