use annokit_annotations::{clip_line_against_quad, expand_box, rotate_quad, Quad};
use glam::DVec3;
use proptest::prelude::*;

fn close(a: DVec3, b: DVec3, scale: f64) -> bool {
    (a - b).length() <= 1e-9 * scale.max(1.0)
}

proptest! {
    #[test]
    fn expand_then_shrink_restores_corners(
        width in 1.0f64..200.0,
        height in 1.0f64..200.0,
        rotation in 0.0f64..360.0,
        dx in -0.4f64..20.0,
        dy in -0.4f64..20.0,
    ) {
        let center = DVec3::new(100.0, 80.0, 0.25);
        let quad = rotate_quad(&Quad::centered(center, width, height), rotation, center);
        let restored = expand_box(&expand_box(&quad, dx, dy), -dx, -dy);
        for (a, b) in quad.corners().iter().zip(restored.corners().iter()) {
            prop_assert!(close(*a, *b, 200.0), "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn expansion_grows_each_side(
        width in 1.0f64..200.0,
        height in 1.0f64..200.0,
        dx in 0.0f64..20.0,
        dy in 0.0f64..20.0,
    ) {
        let quad = Quad::centered(DVec3::ZERO, width, height);
        let expanded = expand_box(&quad, dx, dy);
        prop_assert!((expanded.width() - (width + 2.0 * dx)).abs() < 1e-9);
        prop_assert!((expanded.height() - (height + 2.0 * dy)).abs() < 1e-9);
    }
}

#[test]
fn test_line_clipped_at_near_edge() {
    let quad = Quad::new(
        DVec3::new(8.0, 0.0, 0.0),
        DVec3::new(12.0, 0.0, 0.0),
        DVec3::new(12.0, 2.0, 0.0),
        DVec3::new(8.0, 2.0, 0.0),
    );
    let end = clip_line_against_quad(&quad, DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0));
    assert_eq!(end, DVec3::new(8.0, 0.0, 0.0));

    // Missing the quad leaves the end alone
    let end = clip_line_against_quad(&quad, DVec3::new(0.0, 5.0, 0.0), DVec3::new(10.0, 5.0, 0.0));
    assert_eq!(end, DVec3::new(10.0, 5.0, 0.0));
}
