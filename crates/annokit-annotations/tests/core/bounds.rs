use annokit_annotations::model::{
    AnnotationCoordinate, AnnotationKind, TextAnnotation, TwoDimGeometry,
};
use annokit_annotations::{shape_bounds, FixedAdvanceTextMeasurer, Viewport};
use glam::DVec3;
use proptest::prelude::*;

proptest! {
    #[test]
    fn corners_keep_winding_for_any_rotation(
        rotation in 0.0f64..360.0,
        width in 1.0f64..80.0,
        height in 1.0f64..80.0,
        x in 0.0f64..500.0,
        y in 0.0f64..300.0,
    ) {
        let kind = AnnotationKind::Oval(
            TwoDimGeometry::new(AnnotationCoordinate::tab(0.0, 0.0, 0.0), width, height)
                .with_rotation(rotation),
        );
        let viewport = Viewport::sized(500.0, 300.0);
        let anchor = DVec3::new(x, y, 0.0);
        let quad = shape_bounds(&kind, anchor, &viewport, None).unwrap();

        // Counter-clockwise bottom-left, bottom-right, top-right, top-left
        prop_assert!(quad.signed_area_2d() > 0.0);
        prop_assert!((quad.center() - anchor).length() < 1e-6);
        prop_assert!((quad.width() - 5.0 * width).abs() < 1e-6);
        prop_assert!((quad.height() - 3.0 * height).abs() < 1e-6);
        let right = quad.bottom_right - quad.bottom_left;
        let up = quad.top_left - quad.bottom_left;
        prop_assert!(right.dot(up).abs() < 1e-6);
    }
}

#[test]
fn test_measured_text_follows_alignment() {
    let geometry = TwoDimGeometry::new(AnnotationCoordinate::tab(0.0, 0.0, 0.0), 1.0, 1.0);
    let mut text = TextAnnotation::new(geometry, "hello");
    text.font_percent_viewport_size = 10.0;
    let kind = AnnotationKind::Text(text);
    let measurer = FixedAdvanceTextMeasurer::new(1.0);
    let viewport = Viewport::sized(100.0, 100.0);

    let quad =
        shape_bounds(&kind, DVec3::new(50.0, 50.0, 0.0), &viewport, Some(&measurer)).unwrap();
    assert_eq!(quad.width(), 50.0);
    assert_eq!(quad.height(), 10.0);
    assert_eq!(quad.center(), DVec3::new(50.0, 50.0, 0.0));
}
