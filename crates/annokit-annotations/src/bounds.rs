//! Shape bounds of two-dimensional annotations in drawing space

use glam::DVec3;

use crate::geometry::{rotate_quad, Quad};
use crate::model::{AnnotationKind, TwoDimGeometry};
use crate::services::TextMeasurer;
use crate::viewport::Viewport;

/// Corners of a two-dimensional shape anchored at `anchor`.
///
/// Text with a non-empty string is measured by `text_measurer` when one is
/// available. Every other shape, empty text included, is its width and
/// height percentages of the viewport centered on the anchor. The quad is
/// then rotated clockwise by the shape's angle about the anchor.
///
/// Returns `None` for one-dimensional annotations.
pub fn shape_bounds(
    kind: &AnnotationKind,
    anchor: DVec3,
    viewport: &Viewport,
    text_measurer: Option<&dyn TextMeasurer>,
) -> Option<Quad> {
    let geometry = kind.two_dim()?;

    let quad = match (kind, text_measurer) {
        (AnnotationKind::Text(text), Some(measurer)) if text.has_text() => {
            measurer.measure_text_quad(text, anchor, viewport)
        }
        _ => percentage_quad(geometry, anchor, viewport),
    };

    Some(rotated(quad, geometry.rotation_angle, anchor))
}

fn percentage_quad(geometry: &TwoDimGeometry, anchor: DVec3, viewport: &Viewport) -> Quad {
    let width = viewport.width * (geometry.width / 100.0);
    let height = viewport.height * (geometry.height / 100.0);
    Quad::centered(anchor, width, height)
}

fn rotated(quad: Quad, angle: f64, anchor: DVec3) -> Quad {
    if angle != 0.0 {
        rotate_quad(&quad, -angle, anchor)
    } else {
        quad
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnnotationCoordinate, LineAnnotation, TextAnnotation};

    fn boxed(rotation: f64) -> AnnotationKind {
        AnnotationKind::Box(
            TwoDimGeometry::new(AnnotationCoordinate::tab(50.0, 50.0, 0.0), 10.0, 20.0)
                .with_rotation(rotation),
        )
    }

    struct WideText;

    impl TextMeasurer for WideText {
        fn measure_text_quad(&self, _text: &TextAnnotation, anchor: DVec3, _vp: &Viewport) -> Quad {
            Quad::centered(anchor, 40.0, 4.0)
        }
    }

    #[test]
    fn test_box_size_from_viewport_percentages() {
        let quad = shape_bounds(
            &boxed(0.0),
            DVec3::new(100.0, 50.0, 0.0),
            &Viewport::sized(200.0, 100.0),
            None,
        )
        .unwrap();
        assert_eq!(quad.bottom_left, DVec3::new(90.0, 40.0, 0.0));
        assert_eq!(quad.top_right, DVec3::new(110.0, 60.0, 0.0));
    }

    #[test]
    fn test_clockwise_rotation() {
        let quad = shape_bounds(&boxed(90.0), DVec3::ZERO, &Viewport::sized(200.0, 100.0), None)
            .unwrap();
        // A quarter turn clockwise takes the top-left corner to the top-right
        assert!((quad.top_left - DVec3::new(10.0, 10.0, 0.0)).length() < 1e-9);
        assert!(quad.signed_area_2d() > 0.0);
    }

    #[test]
    fn test_text_uses_measurer_unless_empty() {
        let geometry = TwoDimGeometry::new(AnnotationCoordinate::tab(0.0, 0.0, 0.0), 10.0, 10.0);
        let viewport = Viewport::sized(100.0, 100.0);

        let text = AnnotationKind::Text(TextAnnotation::new(geometry.clone(), "label"));
        let quad = shape_bounds(&text, DVec3::ZERO, &viewport, Some(&WideText)).unwrap();
        assert_eq!(quad.width(), 40.0);

        let empty = AnnotationKind::Text(TextAnnotation::new(geometry, ""));
        let quad = shape_bounds(&empty, DVec3::ZERO, &viewport, Some(&WideText)).unwrap();
        assert_eq!(quad.width(), 10.0);
        assert_eq!(quad.center(), DVec3::ZERO);
    }

    #[test]
    fn test_lines_have_no_bounds() {
        let line = AnnotationKind::Line(LineAnnotation::new(
            AnnotationCoordinate::tab(0.0, 0.0, 0.0),
            AnnotationCoordinate::tab(1.0, 1.0, 0.0),
        ));
        assert!(shape_bounds(&line, DVec3::ZERO, &Viewport::sized(1.0, 1.0), None).is_none());
    }
}
