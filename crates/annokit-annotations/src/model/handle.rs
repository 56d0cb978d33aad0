use serde::{Deserialize, Serialize};
use std::fmt;

/// Named grab point used to move, resize or rotate an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingHandle {
    /// The body of the annotation, i.e. a move
    None,
    BoxBottom,
    BoxBottomLeft,
    BoxBottomRight,
    BoxLeft,
    BoxRight,
    BoxTop,
    BoxTopLeft,
    BoxTopRight,
    Rotation,
    LineStart,
    LineEnd,
}

/// How a handle is rendered when drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleGlyph {
    FilledCircle,
    FilledSquare,
    Ring,
}

impl SizingHandle {
    /// The eight perimeter handles of a two-dimensional shape
    pub const BOX_PERIMETER: [SizingHandle; 8] = [
        Self::BoxBottomLeft,
        Self::BoxBottomRight,
        Self::BoxTopRight,
        Self::BoxTopLeft,
        Self::BoxTop,
        Self::BoxBottom,
        Self::BoxRight,
        Self::BoxLeft,
    ];

    pub fn is_box_perimeter(&self) -> bool {
        Self::BOX_PERIMETER.contains(self)
    }

    pub fn is_line_endpoint(&self) -> bool {
        matches!(self, Self::LineStart | Self::LineEnd)
    }

    /// Which side of the box the handle drags: -1 left/bottom, +1 right/top, 0 neither
    pub fn box_sides(&self) -> (i8, i8) {
        match self {
            Self::BoxBottom => (0, -1),
            Self::BoxBottomLeft => (-1, -1),
            Self::BoxBottomRight => (1, -1),
            Self::BoxLeft => (-1, 0),
            Self::BoxRight => (1, 0),
            Self::BoxTop => (0, 1),
            Self::BoxTopLeft => (-1, 1),
            Self::BoxTopRight => (1, 1),
            _ => (0, 0),
        }
    }

    /// Corners and line endpoints are circles, edges are squares, rotation is a ring
    pub fn glyph(&self) -> Option<HandleGlyph> {
        match self {
            Self::BoxBottomLeft
            | Self::BoxBottomRight
            | Self::BoxTopLeft
            | Self::BoxTopRight
            | Self::LineStart
            | Self::LineEnd => Some(HandleGlyph::FilledCircle),
            Self::BoxBottom | Self::BoxLeft | Self::BoxRight | Self::BoxTop => {
                Some(HandleGlyph::FilledSquare)
            }
            Self::Rotation => Some(HandleGlyph::Ring),
            Self::None => None,
        }
    }
}

impl fmt::Display for SizingHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "NONE",
            Self::BoxBottom => "BOX_BOTTOM",
            Self::BoxBottomLeft => "BOX_BOTTOM_LEFT",
            Self::BoxBottomRight => "BOX_BOTTOM_RIGHT",
            Self::BoxLeft => "BOX_LEFT",
            Self::BoxRight => "BOX_RIGHT",
            Self::BoxTop => "BOX_TOP",
            Self::BoxTopLeft => "BOX_TOP_LEFT",
            Self::BoxTopRight => "BOX_TOP_RIGHT",
            Self::Rotation => "ROTATION",
            Self::LineStart => "LINE_START",
            Self::LineEnd => "LINE_END",
        };
        write!(f, "{}", name)
    }
}
