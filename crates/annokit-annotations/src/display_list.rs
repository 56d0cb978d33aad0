//! Backend-neutral display list produced by the drawing pass
//!
//! Points are viewport pixels with the origin at the bottom left; Z is the
//! depth used for depth testing, nearer is smaller.

use annokit_core::Rgba;
use glam::DVec3;
use uuid::Uuid;

use crate::geometry::{Arrowhead, Quad};
use crate::model::{HandleGlyph, HorizontalAlignment};

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    FilledQuad {
        quad: Quad,
        color: Rgba,
    },
    QuadOutline {
        quad: Quad,
        color: Rgba,
        width_px: f64,
    },
    Lines {
        segments: Vec<(DVec3, DVec3)>,
        color: Rgba,
        width_px: f64,
    },
    FilledPolygon {
        vertices: Vec<DVec3>,
        color: Rgba,
    },
    /// Triangles with one color per vertex, three vertices each
    ShadedTriangles {
        vertices: Vec<DVec3>,
        colors: Vec<Rgba>,
    },
    /// Ellipse inscribed in the quad
    FilledEllipse {
        quad: Quad,
        color: Rgba,
    },
    EllipseOutline {
        quad: Quad,
        color: Rgba,
        width_px: f64,
    },
    /// Pixels of the image annotation with this id mapped onto the quad
    TexturedQuad {
        quad: Quad,
        annotation_id: Uuid,
    },
    /// Text laid out from `anchor` by the host's text renderer
    Text {
        text: String,
        anchor: DVec3,
        height_px: f64,
        /// Clockwise degrees
        rotation: f64,
        color: Rgba,
        alignment: HorizontalAlignment,
    },
    Handle {
        glyph: HandleGlyph,
        square: Quad,
        color: Rgba,
    },
}

impl Primitive {
    pub fn arrowhead(arrow: &Arrowhead, color: Rgba) -> Self {
        Self::FilledPolygon {
            vertices: arrow.to_vec(),
            color,
        }
    }

    pub fn line(from: DVec3, to: DVec3, color: Rgba, width_px: f64) -> Self {
        Self::Lines {
            segments: vec![(from, to)],
            color,
            width_px,
        }
    }

    /// Uniform color of the primitive, if it has one
    pub fn color(&self) -> Option<Rgba> {
        match self {
            Self::FilledQuad { color, .. }
            | Self::QuadOutline { color, .. }
            | Self::Lines { color, .. }
            | Self::FilledPolygon { color, .. }
            | Self::FilledEllipse { color, .. }
            | Self::EllipseOutline { color, .. }
            | Self::Text { color, .. }
            | Self::Handle { color, .. } => Some(*color),
            Self::ShadedTriangles { .. } | Self::TexturedQuad { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    primitives: Vec<Primitive>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn extend(&mut self, other: DrawList) {
        self.primitives.extend(other.primitives);
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn iter(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}
