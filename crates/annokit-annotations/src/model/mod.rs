//! Annotation model
//!
//! An [`Annotation`] carries the attributes shared by every kind (space,
//! tab/window ownership, colors, line width, editing selection) and an
//! [`AnnotationKind`] holding the per-kind geometry. Resolution and
//! spatial modification only use the [`AnnotationShape`] capability set;
//! the drawing pass matches on the kind.

use annokit_core::constants::{MAX_TABS, MAX_WINDOWS};
use annokit_core::{AnnotationError, CoordinateSpace, Rgba};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use uuid::Uuid;

mod color_bar;
mod coordinate;
mod display;
mod handle;
mod image;
mod line;
mod text;
mod two_dim;

pub use color_bar::{ColorBarAnnotation, ColorBarLabel, ColorBarPositionMode, ColorBarSection};
pub use coordinate::{AnnotationCoordinate, CoordinatePosition, SurfaceAnchor, SurfaceOffsetMode};
pub use display::{DisplayGroup, DisplayGroupSelection};
pub use handle::{HandleGlyph, SizingHandle};
pub use image::ImageAnnotation;
pub use line::LineAnnotation;
pub use text::{ConnectToBrainordinate, HorizontalAlignment, TextAnnotation, VerticalAlignment};
pub use two_dim::{normalize_degrees, TwoDimGeometry};

pub(crate) use coordinate::in_percentage_range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimensionality {
    One,
    Two,
}

impl fmt::Display for Dimensionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "one-dimensional"),
            Self::Two => write!(f, "two-dimensional"),
        }
    }
}

/// Capability set used by resolution and spatial modification
pub trait AnnotationShape {
    fn dimensionality(&self) -> Dimensionality;
    fn anchor_coordinates(&self) -> SmallVec<[&AnnotationCoordinate; 2]>;
    fn anchor_coordinates_mut(&mut self) -> SmallVec<[&mut AnnotationCoordinate; 2]>;
    fn rotation(&self) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationType {
    Line,
    Box,
    Oval,
    Text,
    Image,
    ColorBar,
}

impl fmt::Display for AnnotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line => write!(f, "Line"),
            Self::Box => write!(f, "Box"),
            Self::Oval => write!(f, "Oval"),
            Self::Text => write!(f, "Text"),
            Self::Image => write!(f, "Image"),
            Self::ColorBar => write!(f, "Color Bar"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationKind {
    Line(LineAnnotation),
    Box(TwoDimGeometry),
    Oval(TwoDimGeometry),
    Text(TextAnnotation),
    Image(ImageAnnotation),
    ColorBar(ColorBarAnnotation),
}

impl AnnotationKind {
    pub fn annotation_type(&self) -> AnnotationType {
        match self {
            Self::Line(_) => AnnotationType::Line,
            Self::Box(_) => AnnotationType::Box,
            Self::Oval(_) => AnnotationType::Oval,
            Self::Text(_) => AnnotationType::Text,
            Self::Image(_) => AnnotationType::Image,
            Self::ColorBar(_) => AnnotationType::ColorBar,
        }
    }

    /// Placement of two-dimensional kinds
    pub fn two_dim(&self) -> Option<&TwoDimGeometry> {
        match self {
            Self::Line(_) => None,
            Self::Box(g) | Self::Oval(g) => Some(g),
            Self::Text(t) => Some(&t.geometry),
            Self::Image(i) => Some(&i.geometry),
            Self::ColorBar(c) => Some(&c.geometry),
        }
    }

    pub fn two_dim_mut(&mut self) -> Option<&mut TwoDimGeometry> {
        match self {
            Self::Line(_) => None,
            Self::Box(g) | Self::Oval(g) => Some(g),
            Self::Text(t) => Some(&mut t.geometry),
            Self::Image(i) => Some(&mut i.geometry),
            Self::ColorBar(c) => Some(&mut c.geometry),
        }
    }
}

impl AnnotationShape for AnnotationKind {
    fn dimensionality(&self) -> Dimensionality {
        match self {
            Self::Line(s) => s.dimensionality(),
            Self::Box(s) | Self::Oval(s) => s.dimensionality(),
            Self::Text(s) => s.dimensionality(),
            Self::Image(s) => s.dimensionality(),
            Self::ColorBar(s) => s.dimensionality(),
        }
    }

    fn anchor_coordinates(&self) -> SmallVec<[&AnnotationCoordinate; 2]> {
        match self {
            Self::Line(s) => s.anchor_coordinates(),
            Self::Box(s) | Self::Oval(s) => s.anchor_coordinates(),
            Self::Text(s) => s.anchor_coordinates(),
            Self::Image(s) => s.anchor_coordinates(),
            Self::ColorBar(s) => s.anchor_coordinates(),
        }
    }

    fn anchor_coordinates_mut(&mut self) -> SmallVec<[&mut AnnotationCoordinate; 2]> {
        match self {
            Self::Line(s) => s.anchor_coordinates_mut(),
            Self::Box(s) | Self::Oval(s) => s.anchor_coordinates_mut(),
            Self::Text(s) => s.anchor_coordinates_mut(),
            Self::Image(s) => s.anchor_coordinates_mut(),
            Self::ColorBar(s) => s.anchor_coordinates_mut(),
        }
    }

    fn rotation(&self) -> f64 {
        match self {
            Self::Line(s) => s.rotation(),
            Self::Box(s) | Self::Oval(s) => s.rotation(),
            Self::Text(s) => s.rotation(),
            Self::Image(s) => s.rotation(),
            Self::ColorBar(s) => s.rotation(),
        }
    }
}

/// A freeform annotation anchored in one coordinate space
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    id: Uuid,
    space: CoordinateSpace,
    tab_index: Option<usize>,
    window_index: Option<usize>,
    line_color: Rgba,
    background_color: Rgba,
    line_width_percentage: f64,
    obsolete_line_width_pixels: f64,
    selected_for_editing: [bool; MAX_WINDOWS],
    display: DisplayGroupSelection,
    modified: bool,
    kind: AnnotationKind,
}

impl Annotation {
    /// Create an annotation, checking every coordinate is in `space`.
    ///
    /// Tab and window coordinates must also lie in [0,100].
    pub fn new(space: CoordinateSpace, kind: AnnotationKind) -> Result<Self, AnnotationError> {
        for coordinate in kind.anchor_coordinates() {
            if coordinate.space() != space {
                return Err(AnnotationError::SpaceMismatch {
                    expected: space,
                    actual: coordinate.space(),
                });
            }
            if !coordinate.is_within_percentage_range() {
                let xyz = coordinate.xyz().unwrap_or_default();
                let value = if in_percentage_range(xyz.x) { xyz.y } else { xyz.x };
                return Err(AnnotationError::PercentageOutOfRange { value });
            }
        }
        if let Some(geometry) = kind.two_dim() {
            if geometry.width < 0.0 || geometry.height < 0.0 {
                return Err(AnnotationError::InvalidAttribute {
                    name: "size".to_string(),
                    reason: format!(
                        "width {} and height {} must not be negative",
                        geometry.width, geometry.height
                    ),
                });
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            space,
            tab_index: None,
            window_index: None,
            line_color: Rgba::WHITE,
            background_color: Rgba::TRANSPARENT,
            line_width_percentage: 0.5,
            obsolete_line_width_pixels: 0.0,
            selected_for_editing: [false; MAX_WINDOWS],
            display: DisplayGroupSelection::default(),
            modified: false,
            kind,
        })
    }

    pub fn with_tab_index(mut self, tab_index: usize) -> Result<Self, AnnotationError> {
        if tab_index >= MAX_TABS {
            return Err(AnnotationError::IndexOutOfRange {
                kind: "tab".to_string(),
                index: tab_index,
                max: MAX_TABS,
            });
        }
        self.tab_index = Some(tab_index);
        Ok(self)
    }

    pub fn with_window_index(mut self, window_index: usize) -> Result<Self, AnnotationError> {
        if window_index >= MAX_WINDOWS {
            return Err(AnnotationError::IndexOutOfRange {
                kind: "window".to_string(),
                index: window_index,
                max: MAX_WINDOWS,
            });
        }
        self.window_index = Some(window_index);
        Ok(self)
    }

    pub fn with_line_color(mut self, color: Rgba) -> Self {
        self.line_color = color;
        self
    }

    pub fn with_background_color(mut self, color: Rgba) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_line_width_percentage(mut self, percentage: f64) -> Self {
        self.line_width_percentage = percentage;
        self
    }

    /// Width in pixels from files that predate percentage widths
    pub fn with_obsolete_line_width_pixels(mut self, pixels: f64) -> Self {
        self.obsolete_line_width_pixels = pixels;
        self.line_width_percentage = 0.0;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn space(&self) -> CoordinateSpace {
        self.space
    }

    pub fn kind(&self) -> &AnnotationKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut AnnotationKind {
        &mut self.kind
    }

    pub fn annotation_type(&self) -> AnnotationType {
        self.kind.annotation_type()
    }

    pub fn tab_index(&self) -> Option<usize> {
        self.tab_index
    }

    pub fn window_index(&self) -> Option<usize> {
        self.window_index
    }

    pub fn line_color(&self) -> Rgba {
        self.line_color
    }

    pub fn background_color(&self) -> Rgba {
        self.background_color
    }

    pub fn line_width_percentage(&self) -> f64 {
        self.line_width_percentage
    }

    /// Percentage width, converting an obsolete pixel width when the
    /// percentage is unset.
    pub fn effective_line_width_percentage(&self, viewport_height: f64) -> f64 {
        if self.line_width_percentage > 0.0 {
            self.line_width_percentage
        } else if viewport_height > 0.0 {
            (self.obsolete_line_width_pixels / viewport_height) * 100.0
        } else {
            0.0
        }
    }

    pub fn is_selected_for_editing(&self, window_index: usize) -> bool {
        self.selected_for_editing
            .get(window_index)
            .copied()
            .unwrap_or(false)
    }

    pub fn set_selected_for_editing(&mut self, window_index: usize, selected: bool) {
        if let Some(flag) = self.selected_for_editing.get_mut(window_index) {
            *flag = selected;
        }
    }

    /// Displayed in `group` as shown by tab `tab_index`
    pub fn is_displayed_in(&self, group: DisplayGroup, tab_index: usize) -> bool {
        self.display.is_selected(group, tab_index)
    }

    pub fn set_displayed_in(&mut self, group: DisplayGroup, tab_index: usize, displayed: bool) {
        self.display.set_selected(group, tab_index, displayed);
    }

    /// Show or hide in every display group and tab
    pub fn set_displayed(&mut self, displayed: bool) {
        self.display.set_all(displayed);
    }

    pub fn is_modified(&self) -> bool {
        self.modified || self.kind.anchor_coordinates().iter().any(|c| c.is_modified())
    }

    pub fn set_modified(&mut self) {
        self.modified = true;
    }

    pub fn clear_modified(&mut self) {
        self.modified = false;
        for coordinate in self.kind.anchor_coordinates_mut() {
            coordinate.clear_modified();
        }
    }

    /// Handles a user may drag for this annotation
    pub fn valid_handles(&self) -> SmallVec<[SizingHandle; 11]> {
        let mut handles = SmallVec::new();
        if self.space == CoordinateSpace::Viewport {
            return handles;
        }
        match self.dimensionality() {
            Dimensionality::One => {
                handles.push(SizingHandle::LineStart);
                handles.push(SizingHandle::LineEnd);
                if self.space.is_percentage() {
                    handles.push(SizingHandle::Rotation);
                    handles.push(SizingHandle::None);
                }
            }
            Dimensionality::Two => {
                handles.push(SizingHandle::None);
                handles.extend_from_slice(&SizingHandle::BOX_PERIMETER);
                handles.push(SizingHandle::Rotation);
            }
        }
        handles
    }

    pub fn is_handle_valid(&self, handle: SizingHandle) -> bool {
        self.valid_handles().contains(&handle)
    }
}

impl AnnotationShape for Annotation {
    fn dimensionality(&self) -> Dimensionality {
        self.kind.dimensionality()
    }

    fn anchor_coordinates(&self) -> SmallVec<[&AnnotationCoordinate; 2]> {
        self.kind.anchor_coordinates()
    }

    fn anchor_coordinates_mut(&mut self) -> SmallVec<[&mut AnnotationCoordinate; 2]> {
        self.kind.anchor_coordinates_mut()
    }

    fn rotation(&self) -> f64 {
        self.kind.rotation()
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} in {} space",
            self.annotation_type(),
            self.id,
            self.space
        )
    }
}

/// A named collection of annotations that owns their lifecycle
#[derive(Debug, Clone, Default)]
pub struct AnnotationFile {
    id: Uuid,
    name: String,
    annotations: Vec<Annotation>,
}

impl AnnotationFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            annotations: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add(&mut self, annotation: Annotation) -> Uuid {
        let id = annotation.id();
        self.annotations.push(annotation);
        id
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Annotation> {
        let index = self.annotations.iter().position(|a| a.id() == id)?;
        Some(self.annotations.remove(index))
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn get(&self, id: Uuid) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id() == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Annotation> {
        self.annotations.iter_mut().find(|a| a.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab_box() -> Annotation {
        Annotation::new(
            CoordinateSpace::Tab,
            AnnotationKind::Box(TwoDimGeometry::new(
                AnnotationCoordinate::tab(50.0, 50.0, 0.0),
                10.0,
                10.0,
            )),
        )
        .unwrap()
    }

    #[test]
    fn test_space_mismatch_rejected() {
        let result = Annotation::new(
            CoordinateSpace::Tab,
            AnnotationKind::Line(LineAnnotation::new(
                AnnotationCoordinate::tab(0.0, 0.0, 0.0),
                AnnotationCoordinate::stereotaxic(1.0, 2.0, 3.0),
            )),
        );
        assert!(matches!(
            result,
            Err(AnnotationError::SpaceMismatch {
                expected: CoordinateSpace::Tab,
                actual: CoordinateSpace::Stereotaxic
            })
        ));
    }

    #[test]
    fn test_out_of_range_percentage_rejected() {
        let result = Annotation::new(
            CoordinateSpace::Window,
            AnnotationKind::Oval(TwoDimGeometry::new(
                AnnotationCoordinate::window(50.0, 120.0, 0.0),
                5.0,
                5.0,
            )),
        );
        assert!(matches!(
            result,
            Err(AnnotationError::PercentageOutOfRange { value }) if value == 120.0
        ));
    }

    #[test]
    fn test_valid_handles_by_dimension_and_space() {
        let two_dim = tab_box();
        assert_eq!(two_dim.valid_handles().len(), 10);
        assert!(two_dim.is_handle_valid(SizingHandle::BoxTopLeft));
        assert!(!two_dim.is_handle_valid(SizingHandle::LineStart));

        let line = Annotation::new(
            CoordinateSpace::Stereotaxic,
            AnnotationKind::Line(LineAnnotation::new(
                AnnotationCoordinate::stereotaxic(0.0, 0.0, 0.0),
                AnnotationCoordinate::stereotaxic(10.0, 0.0, 0.0),
            )),
        )
        .unwrap();
        assert!(line.is_handle_valid(SizingHandle::LineEnd));
        assert!(!line.is_handle_valid(SizingHandle::None));
        assert!(!line.is_handle_valid(SizingHandle::Rotation));
        assert!(!line.is_handle_valid(SizingHandle::BoxTop));

        let pixels = Annotation::new(
            CoordinateSpace::Viewport,
            AnnotationKind::Box(TwoDimGeometry::new(
                AnnotationCoordinate::viewport(10.0, 10.0, 0.0),
                5.0,
                5.0,
            )),
        )
        .unwrap();
        assert!(pixels.valid_handles().is_empty());
    }

    #[test]
    fn test_editing_selection_is_per_window() {
        let mut ann = tab_box();
        ann.set_selected_for_editing(2, true);
        assert!(ann.is_selected_for_editing(2));
        assert!(!ann.is_selected_for_editing(0));
        assert!(!ann.is_selected_for_editing(MAX_WINDOWS + 3));
    }

    #[test]
    fn test_obsolete_line_width_conversion() {
        let ann = tab_box().with_obsolete_line_width_pixels(4.0);
        assert!((ann.effective_line_width_percentage(400.0) - 1.0).abs() < 1e-9);
        let ann = tab_box().with_line_width_percentage(2.0);
        assert_eq!(ann.effective_line_width_percentage(400.0), 2.0);
    }

    #[test]
    fn test_tab_index_limit() {
        assert!(tab_box().with_tab_index(MAX_TABS).is_err());
        assert_eq!(tab_box().with_tab_index(3).unwrap().tab_index(), Some(3));
    }

    #[test]
    fn test_file_add_remove() {
        let mut file = AnnotationFile::new("scene");
        let id = file.add(tab_box());
        assert!(file.get(id).is_some());
        assert!(file.remove(id).is_some());
        assert!(file.annotations().is_empty());
    }
}
