pub mod matrix;
pub mod graph;
pub mod color;

use lyon::geom::euclid;

pub mod prelude {
    pub use super::matrix::ProjectPixelToViewport;
    pub use super::color::Rgba8;
    pub use super::graph::GraphType;

    pub struct ScreenSpace;
    pub type ScreenPoint = super::euclid::Point2D<f32, ScreenSpace>;
    pub type ScreenSize = super::euclid::Size2D<f32, ScreenSpace>;

    pub struct ViewportSpace;
    pub type ViewportPoint = super::euclid::Point2D<f32, ViewportSpace>;
    pub type ProjMatrix = super::euclid::Transform3D<f32, ScreenSpace, ViewportSpace>;
}
