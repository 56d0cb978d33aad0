//! In-memory implementations of the host services
//!
//! Used by the demo binary and the tests. A real host supplies its own
//! camera, surface and font metrics.

use annokit_core::Structure;
use glam::{DMat4, DVec3};

use crate::geometry::Quad;
use crate::model::{HorizontalAlignment, TextAnnotation, VerticalAlignment};
use crate::services::{CameraProjection, SurfaceMesh, TextMeasurer};
use crate::viewport::Viewport;

/// Camera defined by a view-projection matrix and the window viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixProjection {
    view_projection: DMat4,
    viewport: Viewport,
}

impl MatrixProjection {
    pub fn new(view_projection: DMat4, viewport: Viewport) -> Self {
        Self {
            view_projection,
            viewport,
        }
    }

    /// Orthographic camera looking down -Z at the given model-space box
    pub fn orthographic(
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
        viewport: Viewport,
    ) -> Self {
        Self::new(
            DMat4::orthographic_rh_gl(left, right, bottom, top, near, far),
            viewport,
        )
    }

    /// Perspective camera at `eye` looking at `target`
    pub fn look_at_perspective(
        eye: DVec3,
        target: DVec3,
        up: DVec3,
        fov_y_degrees: f64,
        near: f64,
        far: f64,
        viewport: Viewport,
    ) -> Self {
        let aspect = if viewport.height > 0.0 {
            viewport.width / viewport.height
        } else {
            1.0
        };
        let projection = DMat4::perspective_rh_gl(fov_y_degrees.to_radians(), aspect, near, far);
        let view = DMat4::look_at_rh(eye, target, up);
        Self::new(projection * view, viewport)
    }

    pub fn view_projection(&self) -> DMat4 {
        self.view_projection
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

impl CameraProjection for MatrixProjection {
    fn project_model_to_window(&self, xyz: DVec3) -> Option<DVec3> {
        let clip = self.view_projection * xyz.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if !ndc.is_finite() {
            return None;
        }

        Some(DVec3::new(
            self.viewport.x + (ndc.x + 1.0) * 0.5 * self.viewport.width,
            self.viewport.y + (ndc.y + 1.0) * 0.5 * self.viewport.height,
            ndc.z * 0.5 + 0.5,
        ))
    }
}

/// Surface mesh held in memory
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSurface {
    structure: Structure,
    positions: Vec<DVec3>,
    normals: Vec<DVec3>,
    center: DVec3,
    flat: bool,
}

impl MeshSurface {
    /// Mesh with one normal per vertex. Missing normals read as `None`.
    pub fn new(structure: Structure, positions: Vec<DVec3>, normals: Vec<DVec3>) -> Self {
        let center = bounding_box_center(&positions);
        Self {
            structure,
            positions,
            normals,
            center,
            flat: false,
        }
    }

    /// Mark the mesh as flattened, as for flat or spherical maps
    pub fn with_flat(mut self, flat: bool) -> Self {
        self.flat = flat;
        self
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }
}

fn bounding_box_center(positions: &[DVec3]) -> DVec3 {
    let mut iter = positions.iter();
    let Some(&first) = iter.next() else {
        return DVec3::ZERO;
    };
    let (min, max) = iter.fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
    (min + max) / 2.0
}

impl SurfaceMesh for MeshSurface {
    fn structure(&self) -> Structure {
        self.structure
    }

    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn vertex_position(&self, index: usize) -> Option<DVec3> {
        self.positions.get(index).copied()
    }

    fn vertex_normal(&self, index: usize) -> Option<DVec3> {
        self.normals.get(index).copied()
    }

    fn bounding_box_center(&self) -> DVec3 {
        self.center
    }

    fn is_flat(&self) -> bool {
        self.flat
    }
}

/// Measures text as a monospaced font: every character advances by a fixed
/// fraction of the font height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvanceTextMeasurer {
    /// Character advance as a fraction of the font height
    pub advance_ratio: f64,
    /// Line spacing as a fraction of the font height
    pub line_spacing: f64,
}

impl Default for FixedAdvanceTextMeasurer {
    fn default() -> Self {
        Self {
            advance_ratio: 0.6,
            line_spacing: 1.2,
        }
    }
}

impl FixedAdvanceTextMeasurer {
    pub fn new(advance_ratio: f64) -> Self {
        Self {
            advance_ratio,
            ..Self::default()
        }
    }

    /// Width and height in pixels of `text` at `font_height` pixels
    pub fn text_size(&self, text: &str, font_height: f64) -> (f64, f64) {
        let longest = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
        let lines = text.lines().count().max(1);
        let width = longest as f64 * self.advance_ratio * font_height;
        let height = font_height + (lines - 1) as f64 * self.line_spacing * font_height;
        (width, height)
    }
}

impl TextMeasurer for FixedAdvanceTextMeasurer {
    fn measure_text_quad(&self, text: &TextAnnotation, anchor: DVec3, viewport: &Viewport) -> Quad {
        let font_height = viewport.height * (text.font_percent_viewport_size / 100.0);
        let (width, height) = self.text_size(&text.text, font_height);

        let left = match text.horizontal_alignment {
            HorizontalAlignment::Left => anchor.x,
            HorizontalAlignment::Center => anchor.x - width / 2.0,
            HorizontalAlignment::Right => anchor.x - width,
        };
        let bottom = match text.vertical_alignment {
            VerticalAlignment::Top => anchor.y - height,
            VerticalAlignment::Middle => anchor.y - height / 2.0,
            VerticalAlignment::Bottom => anchor.y,
        };
        let z = anchor.z;

        Quad::new(
            DVec3::new(left, bottom, z),
            DVec3::new(left + width, bottom, z),
            DVec3::new(left + width, bottom + height, z),
            DVec3::new(left, bottom + height, z),
        )
    }
}
