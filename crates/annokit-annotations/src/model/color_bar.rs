use annokit_core::Rgba;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{
    AnnotationCoordinate, AnnotationShape, Dimensionality, HorizontalAlignment, TwoDimGeometry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBarPositionMode {
    /// Stacked along the left of the tab or window by the drawing pass
    #[default]
    Automatic,
    Manual,
}

/// A run of the palette between two scalars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBarSection {
    pub start_scalar: f64,
    pub end_scalar: f64,
    pub start_color: Rgba,
    pub end_color: Rgba,
}

impl ColorBarSection {
    pub fn new(start_scalar: f64, end_scalar: f64, start_color: Rgba, end_color: Rgba) -> Self {
        Self {
            start_scalar,
            end_scalar,
            start_color,
            end_color,
        }
    }
}

/// A numeric label positioned at a normalized scalar in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBarLabel {
    pub scalar: f64,
    pub text: String,
    pub alignment: HorizontalAlignment,
}

impl ColorBarLabel {
    pub fn new(scalar: f64, text: impl Into<String>, alignment: HorizontalAlignment) -> Self {
        Self {
            scalar,
            text: text.into(),
            alignment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBarAnnotation {
    pub geometry: TwoDimGeometry,
    pub position_mode: ColorBarPositionMode,
    pub sections: Vec<ColorBarSection>,
    pub labels: Vec<ColorBarLabel>,
    pub show_tick_marks: bool,
    pub text_color: Rgba,
    /// Label font height as a percentage of the viewport height
    pub font_percent_viewport_size: f64,
}

impl ColorBarAnnotation {
    pub fn new(geometry: TwoDimGeometry) -> Self {
        Self {
            geometry,
            position_mode: ColorBarPositionMode::default(),
            sections: Vec::new(),
            labels: Vec::new(),
            show_tick_marks: true,
            text_color: Rgba::WHITE,
            font_percent_viewport_size: 3.0,
        }
    }

    pub fn with_sections(mut self, sections: Vec<ColorBarSection>) -> Self {
        self.sections = sections;
        self
    }

    pub fn with_labels(mut self, labels: Vec<ColorBarLabel>) -> Self {
        self.labels = labels;
        self
    }

    /// Smallest start and largest end scalar over all sections
    pub fn scalar_range(&self) -> (f64, f64) {
        if self.sections.is_empty() {
            return (0.0, 0.0);
        }
        let min = self
            .sections
            .iter()
            .map(|s| s.start_scalar.min(s.end_scalar))
            .fold(f64::INFINITY, f64::min);
        let max = self
            .sections
            .iter()
            .map(|s| s.start_scalar.max(s.end_scalar))
            .fold(f64::NEG_INFINITY, f64::max);
        (min, max)
    }
}

impl AnnotationShape for ColorBarAnnotation {
    fn dimensionality(&self) -> Dimensionality {
        Dimensionality::Two
    }

    fn anchor_coordinates(&self) -> SmallVec<[&AnnotationCoordinate; 2]> {
        self.geometry.anchor_coordinates()
    }

    fn anchor_coordinates_mut(&mut self) -> SmallVec<[&mut AnnotationCoordinate; 2]> {
        self.geometry.anchor_coordinates_mut()
    }

    fn rotation(&self) -> f64 {
        self.geometry.rotation_angle
    }
}
