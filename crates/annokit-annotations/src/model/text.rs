use annokit_core::Rgba;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{AnnotationCoordinate, AnnotationShape, Dimensionality, TwoDimGeometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlignment {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Connector drawn from surface-anchored text back to its vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectToBrainordinate {
    #[default]
    None,
    Line,
    Arrow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnnotation {
    pub geometry: TwoDimGeometry,
    pub text: String,
    /// Font height as a percentage of the viewport height
    pub font_percent_viewport_size: f64,
    pub text_color: Rgba,
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    pub connect_to_brainordinate: ConnectToBrainordinate,
}

impl TextAnnotation {
    pub fn new(geometry: TwoDimGeometry, text: impl Into<String>) -> Self {
        Self {
            geometry,
            text: text.into(),
            font_percent_viewport_size: 5.0,
            text_color: Rgba::WHITE,
            horizontal_alignment: HorizontalAlignment::default(),
            vertical_alignment: VerticalAlignment::default(),
            connect_to_brainordinate: ConnectToBrainordinate::default(),
        }
    }

    pub fn with_alignment(
        mut self,
        horizontal: HorizontalAlignment,
        vertical: VerticalAlignment,
    ) -> Self {
        self.horizontal_alignment = horizontal;
        self.vertical_alignment = vertical;
        self
    }

    pub fn with_connector(mut self, connect: ConnectToBrainordinate) -> Self {
        self.connect_to_brainordinate = connect;
        self
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}

impl AnnotationShape for TextAnnotation {
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
