use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use super::{AnnotationCoordinate, AnnotationShape, Dimensionality};

/// Placement shared by every two-dimensional annotation.
///
/// Width is a percentage of the viewport width and height a percentage of
/// the viewport height. The rotation angle is in degrees, clockwise
/// positive, about the coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoDimGeometry {
    pub coordinate: AnnotationCoordinate,
    pub width: f64,
    pub height: f64,
    pub rotation_angle: f64,
}

impl TwoDimGeometry {
    pub fn new(coordinate: AnnotationCoordinate, width: f64, height: f64) -> Self {
        Self {
            coordinate,
            width,
            height,
            rotation_angle: 0.0,
        }
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation_angle = normalize_degrees(degrees);
        self
    }

    pub fn set_rotation_angle(&mut self, degrees: f64) {
        self.rotation_angle = normalize_degrees(degrees);
    }
}

/// Wrap an angle into [0, 360)
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

impl AnnotationShape for TwoDimGeometry {
    fn dimensionality(&self) -> Dimensionality {
        Dimensionality::Two
    }

    fn anchor_coordinates(&self) -> SmallVec<[&AnnotationCoordinate; 2]> {
        smallvec![&self.coordinate]
    }

    fn anchor_coordinates_mut(&mut self) -> SmallVec<[&mut AnnotationCoordinate; 2]> {
        smallvec![&mut self.coordinate]
    }

    fn rotation(&self) -> f64 {
        self.rotation_angle
    }
}
