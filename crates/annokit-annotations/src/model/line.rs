use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use super::{AnnotationCoordinate, AnnotationShape, Dimensionality};

/// A one-dimensional annotation between two coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineAnnotation {
    pub start: AnnotationCoordinate,
    pub end: AnnotationCoordinate,
    pub display_start_arrow: bool,
    pub display_end_arrow: bool,
}

impl LineAnnotation {
    pub fn new(start: AnnotationCoordinate, end: AnnotationCoordinate) -> Self {
        Self {
            start,
            end,
            display_start_arrow: false,
            display_end_arrow: false,
        }
    }

    pub fn with_arrows(mut self, start: bool, end: bool) -> Self {
        self.display_start_arrow = start;
        self.display_end_arrow = end;
        self
    }
}

impl AnnotationShape for LineAnnotation {
    fn dimensionality(&self) -> Dimensionality {
        Dimensionality::One
    }

    fn anchor_coordinates(&self) -> SmallVec<[&AnnotationCoordinate; 2]> {
        smallvec![&self.start, &self.end]
    }

    fn anchor_coordinates_mut(&mut self) -> SmallVec<[&mut AnnotationCoordinate; 2]> {
        smallvec![&mut self.start, &mut self.end]
    }

    fn rotation(&self) -> f64 {
        0.0
    }
}
