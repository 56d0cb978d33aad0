//! Services supplied by the host renderer
//!
//! The annotation core never talks to a graphics API. Camera projection,
//! the displayed surface, text metrics and the picking readback are
//! consumed through these traits. Reference implementations live in
//! [`crate::projection`] and [`crate::raster`].

use annokit_core::{Rgba, Structure};
use glam::DVec3;

use crate::geometry::Quad;
use crate::model::TextAnnotation;
use crate::viewport::Viewport;

/// Maps model coordinates to window coordinates
pub trait CameraProjection {
    /// Window X/Y in pixels (origin bottom-left) and depth in [0, 1], or
    /// `None` when the point cannot be projected.
    fn project_model_to_window(&self, xyz: DVec3) -> Option<DVec3>;
}

/// The surface mesh currently displayed
pub trait SurfaceMesh {
    fn structure(&self) -> Structure;

    fn vertex_count(&self) -> usize;

    fn vertex_position(&self, index: usize) -> Option<DVec3>;

    fn vertex_normal(&self, index: usize) -> Option<DVec3>;

    fn bounding_box_center(&self) -> DVec3;

    /// Flat meshes have no meaningful centroid direction
    fn is_flat(&self) -> bool;
}

/// Measures text laid out at an anchor
pub trait TextMeasurer {
    /// Unrotated bounds of the aligned text at `anchor`, in viewport pixels
    fn measure_text_quad(&self, text: &TextAnnotation, anchor: DVec3, viewport: &Viewport) -> Quad;
}

/// Color and depth readback of a completed picking pass.
///
/// Coordinates are viewport pixels with the origin at the bottom left.
pub trait PickReadback {
    fn size(&self) -> (u32, u32);

    fn color_at(&self, x: u32, y: u32) -> Rgba;

    fn depth_at(&self, x: u32, y: u32) -> f64;
}
