use image::RgbaImage;
use smallvec::SmallVec;

use super::{AnnotationCoordinate, AnnotationShape, Dimensionality, TwoDimGeometry};

/// A bitmap placed in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnnotation {
    pub geometry: TwoDimGeometry,
    pub pixels: RgbaImage,
}

impl ImageAnnotation {
    pub fn new(geometry: TwoDimGeometry, pixels: RgbaImage) -> Self {
        Self { geometry, pixels }
    }

    /// An image with no pixels cannot be textured
    pub fn is_valid(&self) -> bool {
        self.pixels.width() > 0 && self.pixels.height() > 0
    }

    /// Height over width of the bitmap, 1.0 when empty
    pub fn aspect_ratio(&self) -> f64 {
        if self.pixels.width() == 0 {
            1.0
        } else {
            self.pixels.height() as f64 / self.pixels.width() as f64
        }
    }
}

impl AnnotationShape for ImageAnnotation {
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
