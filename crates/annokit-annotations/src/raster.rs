//! Software picking target
//!
//! Rasterizes a picking [`DrawList`] into a color buffer and a depth buffer
//! so the picking readback can run without a GPU. Coverage comes from
//! aliased tiny-skia masks; each primitive is written at one flat depth
//! (the mean depth of its vertices) with a `<=` depth test, so later draws
//! win ties.

use annokit_core::Rgba;
use glam::DVec3;
use image::RgbaImage;
use tiny_skia::{FillRule, Mask, Path, PathBuilder, Rect, Stroke, Transform};
use tracing::{debug, trace};

use crate::display_list::{DrawList, Primitive};
use crate::geometry::Quad;
use crate::model::HandleGlyph;
use crate::services::PickReadback;
use crate::viewport::Viewport;

pub struct SoftPickTarget {
    width: u32,
    height: u32,
    clear_depth: f64,
    /// Row-major, row 0 at the bottom
    colors: Vec<Rgba>,
    depths: Vec<f64>,
}

impl SoftPickTarget {
    pub fn new(width: u32, height: u32, clear_depth: f64) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            clear_depth,
            colors: vec![Rgba::TRANSPARENT; len],
            depths: vec![clear_depth; len],
        }
    }

    /// Target covering the viewport, rounded to whole pixels
    pub fn for_viewport(viewport: &Viewport, clear_depth: f64) -> Self {
        let width = viewport.width.max(0.0).round() as u32;
        let height = viewport.height.max(0.0).round() as u32;
        Self::new(width, height, clear_depth)
    }

    pub fn clear(&mut self) {
        self.colors.fill(Rgba::TRANSPARENT);
        self.depths.fill(self.clear_depth);
    }

    /// Rasterize every primitive of the list in order
    pub fn render(&mut self, list: &DrawList) {
        for primitive in list.iter() {
            self.render_primitive(primitive);
        }
        debug!(
            "Rasterized {} primitives into {}x{} pick target",
            list.len(),
            self.width,
            self.height
        );
    }

    fn render_primitive(&mut self, primitive: &Primitive) {
        match primitive {
            Primitive::FilledQuad { quad, color } => {
                if let Some(path) = self.quad_path(quad) {
                    self.fill(&path, quad.mean_depth(), *color);
                }
            }
            Primitive::QuadOutline {
                quad,
                color,
                width_px,
            } => {
                if let Some(path) = self.quad_path(quad) {
                    self.stroke(&path, *width_px, quad.mean_depth(), *color);
                }
            }
            Primitive::Lines {
                segments,
                color,
                width_px,
            } => {
                for (from, to) in segments {
                    if let Some(path) = self.polyline_path(&[*from, *to], false) {
                        self.stroke(&path, *width_px, (from.z + to.z) / 2.0, *color);
                    }
                }
            }
            Primitive::FilledPolygon { vertices, color } => {
                if let Some(path) = self.polyline_path(vertices, true) {
                    self.fill(&path, mean_depth(vertices), *color);
                }
            }
            Primitive::ShadedTriangles { vertices, colors } => {
                for (triangle, tri_colors) in vertices.chunks_exact(3).zip(colors.chunks_exact(3)) {
                    if let Some(path) = self.polyline_path(triangle, true) {
                        self.fill(&path, mean_depth(triangle), tri_colors[0]);
                    }
                }
            }
            Primitive::FilledEllipse { quad, color } => {
                if let Some(path) = self.ellipse_path(quad) {
                    self.fill(&path, quad.mean_depth(), *color);
                }
            }
            Primitive::EllipseOutline {
                quad,
                color,
                width_px,
            } => {
                if let Some(path) = self.ellipse_path(quad) {
                    self.stroke(&path, *width_px, quad.mean_depth(), *color);
                }
            }
            Primitive::Handle {
                glyph,
                square,
                color,
            } => {
                let depth = square.mean_depth();
                match glyph {
                    HandleGlyph::FilledSquare => {
                        if let Some(path) = self.quad_path(square) {
                            self.fill(&path, depth, *color);
                        }
                    }
                    HandleGlyph::FilledCircle => {
                        if let Some(path) = self.ellipse_path(square) {
                            self.fill(&path, depth, *color);
                        }
                    }
                    HandleGlyph::Ring => {
                        if let Some(path) = self.ellipse_path(square) {
                            self.stroke(&path, 1.0, depth, *color);
                        }
                    }
                }
            }
            Primitive::TexturedQuad { .. } | Primitive::Text { .. } => {
                trace!("Pick target skips textured and text primitives");
            }
        }
    }

    /// Point in mask space, where Y runs down from the top row
    fn to_mask(&self, p: DVec3) -> (f32, f32) {
        (p.x as f32, (f64::from(self.height) - p.y) as f32)
    }

    fn polyline_path(&self, points: &[DVec3], close: bool) -> Option<Path> {
        let (first, rest) = points.split_first()?;
        let mut pb = PathBuilder::new();
        let (x, y) = self.to_mask(*first);
        pb.move_to(x, y);
        for p in rest {
            let (x, y) = self.to_mask(*p);
            pb.line_to(x, y);
        }
        if close {
            pb.close();
        }
        pb.finish()
    }

    fn quad_path(&self, quad: &Quad) -> Option<Path> {
        self.polyline_path(&quad.corners(), true)
    }

    /// Ellipse inscribed in the quad: a unit circle mapped onto its axes
    fn ellipse_path(&self, quad: &Quad) -> Option<Path> {
        let (cx, cy) = self.to_mask(quad.center());
        let (blx, bly) = self.to_mask(quad.bottom_left);
        let (brx, bry) = self.to_mask(quad.bottom_right);
        let (tlx, tly) = self.to_mask(quad.top_left);
        let transform = Transform::from_row(
            (brx - blx) / 2.0,
            (bry - bly) / 2.0,
            (tlx - blx) / 2.0,
            (tly - bly) / 2.0,
            cx,
            cy,
        );
        let circle = PathBuilder::from_oval(Rect::from_xywh(-1.0, -1.0, 2.0, 2.0)?)?;
        circle.transform(transform)
    }

    fn stroke(&mut self, path: &Path, width_px: f64, depth: f64, color: Rgba) {
        let stroke = Stroke {
            width: width_px.max(1.0) as f32,
            ..Stroke::default()
        };
        if let Some(outline) = path.stroke(&stroke, 1.0) {
            self.fill(&outline, depth, color);
        }
    }

    fn fill(&mut self, path: &Path, depth: f64, color: Rgba) {
        let Some(mut mask) = Mask::new(self.width, self.height) else {
            return;
        };
        mask.fill_path(path, FillRule::Winding, false, Transform::identity());

        let width = self.width as usize;
        let height = self.height as usize;
        for (i, &coverage) in mask.data().iter().enumerate() {
            if coverage == 0 {
                continue;
            }
            let (x, row) = (i % width, i / width);
            let index = (height - 1 - row) * width + x;
            if depth <= self.depths[index] {
                self.depths[index] = depth;
                self.colors[index] = color;
            }
        }
    }

    /// Color buffer as an image, top row first
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.color_at(x, self.height - 1 - y).to_array())
        })
    }
}

fn mean_depth(points: &[DVec3]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.z).sum::<f64>() / points.len() as f64
}

impl PickReadback for SoftPickTarget {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn color_at(&self, x: u32, y: u32) -> Rgba {
        self.colors
            .get(y as usize * self.width as usize + x as usize)
            .copied()
            .unwrap_or(Rgba::TRANSPARENT)
    }

    fn depth_at(&self, x: u32, y: u32) -> f64 {
        self.depths
            .get(y as usize * self.width as usize + x as usize)
            .copied()
            .unwrap_or(self.clear_depth)
    }
}
