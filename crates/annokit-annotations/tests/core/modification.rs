use annokit_annotations::model::{
    Annotation, AnnotationCoordinate, AnnotationKind, LineAnnotation, SizingHandle,
    SurfaceAnchor, TwoDimGeometry,
};
use annokit_annotations::modification::{
    apply, try_apply, SpatialModificationRequest, SurfaceTarget,
};
use annokit_core::{CoordinateSpace, ModificationError, Structure};
use glam::DVec3;
use proptest::prelude::*;

const HANDLES: [SizingHandle; 9] = [
    SizingHandle::None,
    SizingHandle::BoxBottom,
    SizingHandle::BoxBottomLeft,
    SizingHandle::BoxBottomRight,
    SizingHandle::BoxLeft,
    SizingHandle::BoxRight,
    SizingHandle::BoxTop,
    SizingHandle::BoxTopLeft,
    SizingHandle::BoxTopRight,
];

fn tab_box(x: f64, y: f64, rotation: f64) -> Annotation {
    Annotation::new(
        CoordinateSpace::Tab,
        AnnotationKind::Box(
            TwoDimGeometry::new(AnnotationCoordinate::tab(x, y, 0.0), 10.0, 10.0)
                .with_rotation(rotation),
        ),
    )
    .unwrap()
    .with_tab_index(0)
    .unwrap()
}

fn anchor_xyz(annotation: &Annotation) -> DVec3 {
    annotation
        .kind()
        .two_dim()
        .and_then(|g| g.coordinate.xyz())
        .unwrap()
}

fn drag(handle: SizingHandle, dx: f64, dy: f64) -> SpatialModificationRequest {
    SpatialModificationRequest::new(handle, 200.0, 100.0).with_mouse(100.0, 50.0, dx, dy)
}

proptest! {
    #[test]
    fn tab_anchor_stays_in_range(
        x in 5.0f64..95.0,
        y in 5.0f64..95.0,
        rotation in 0.0f64..360.0,
        drags in prop::collection::vec((0usize..9, -150.0f64..150.0, -150.0f64..150.0), 1..20),
    ) {
        let mut annotation = tab_box(x, y, rotation);
        for (h, dx, dy) in drags {
            let before = annotation.clone();
            let changed = apply(&mut annotation, &drag(HANDLES[h], dx, dy));

            let xyz = anchor_xyz(&annotation);
            prop_assert!((0.0..=100.0).contains(&xyz.x));
            prop_assert!((0.0..=100.0).contains(&xyz.y));
            if !changed {
                prop_assert_eq!(&annotation, &before);
            }
            let geometry = annotation.kind().two_dim().unwrap();
            prop_assert!(geometry.width > 0.0 && geometry.height > 0.0);
        }
    }

    #[test]
    fn tab_line_endpoints_stay_in_range(
        drags in prop::collection::vec((0usize..3, -120.0f64..120.0, -120.0f64..120.0), 1..20),
    ) {
        let handles = [SizingHandle::None, SizingHandle::LineStart, SizingHandle::LineEnd];
        let mut annotation = Annotation::new(
            CoordinateSpace::Tab,
            AnnotationKind::Line(LineAnnotation::new(
                AnnotationCoordinate::tab(20.0, 20.0, 0.0),
                AnnotationCoordinate::tab(80.0, 60.0, 0.0),
            )),
        )
        .unwrap()
        .with_tab_index(0)
        .unwrap();

        for (h, dx, dy) in drags {
            let before = annotation.clone();
            if !apply(&mut annotation, &drag(handles[h], dx, dy)) {
                prop_assert_eq!(&annotation, &before);
            }
            let AnnotationKind::Line(line) = annotation.kind() else {
                unreachable!()
            };
            for end in [&line.start, &line.end] {
                prop_assert!(end.is_within_percentage_range());
            }
        }
    }
}

#[test]
fn test_tab_box_move_then_rejected_move() {
    let mut annotation = tab_box(50.0, 50.0, 0.0);

    // +5% of a 200 x 100 viewport in each direction
    assert!(apply(&mut annotation, &drag(SizingHandle::None, 10.0, 5.0)));
    assert_eq!(anchor_xyz(&annotation), DVec3::new(55.0, 55.0, 0.0));
    assert!(annotation.is_modified());

    // +50% X would leave the tab
    let result = try_apply(&mut annotation, &drag(SizingHandle::None, 100.0, 0.0));
    assert!(matches!(
        result,
        Err(ModificationError::ConstraintViolation { .. })
    ));
    assert_eq!(anchor_xyz(&annotation), DVec3::new(55.0, 55.0, 0.0));
}

#[test]
fn test_surface_re_anchor_requires_matching_mesh() {
    let anchor = SurfaceAnchor::new(Structure::CortexLeft, 100, 4);
    let mut annotation = Annotation::new(
        CoordinateSpace::Surface,
        AnnotationKind::Box(TwoDimGeometry::new(
            AnnotationCoordinate::surface(anchor),
            10.0,
            10.0,
        )),
    )
    .unwrap();

    let request = SpatialModificationRequest::new(SizingHandle::None, 100.0, 100.0)
        .with_surface_target(SurfaceTarget::new(Structure::CortexRight, 100, 7));
    let before = annotation.clone();
    assert!(matches!(
        try_apply(&mut annotation, &request),
        Err(ModificationError::SurfaceMismatch { .. })
    ));
    assert_eq!(annotation, before);

    let request = SpatialModificationRequest::new(SizingHandle::None, 100.0, 100.0)
        .with_surface_target(SurfaceTarget::new(Structure::CortexLeft, 100, 7));
    assert!(apply(&mut annotation, &request));
    let moved = annotation
        .kind()
        .two_dim()
        .and_then(|g| g.coordinate.surface_anchor())
        .unwrap();
    assert_eq!(moved.vertex_index, 7);
}

#[test]
fn test_surface_line_endpoint_follows_start_mesh() {
    let start = SurfaceAnchor::new(Structure::CortexLeft, 100, 4);
    let end = SurfaceAnchor::new(Structure::CortexRight, 50, 2);
    let mut annotation = Annotation::new(
        CoordinateSpace::Surface,
        AnnotationKind::Line(LineAnnotation::new(
            AnnotationCoordinate::surface(start),
            AnnotationCoordinate::surface(end),
        )),
    )
    .unwrap();

    // The end's own mesh is not the reference
    let request = SpatialModificationRequest::new(SizingHandle::LineEnd, 100.0, 100.0)
        .with_surface_target(SurfaceTarget::new(Structure::CortexRight, 50, 9));
    let before = annotation.clone();
    assert!(matches!(
        try_apply(&mut annotation, &request),
        Err(ModificationError::SurfaceMismatch { .. })
    ));
    assert_eq!(annotation, before);

    let request = SpatialModificationRequest::new(SizingHandle::LineEnd, 100.0, 100.0)
        .with_surface_target(SurfaceTarget::new(Structure::CortexLeft, 100, 9));
    assert!(apply(&mut annotation, &request));
    let AnnotationKind::Line(line) = annotation.kind() else {
        panic!("expected a line");
    };
    let moved = line.end.surface_anchor().unwrap();
    assert_eq!(
        (moved.structure, moved.vertex_count, moved.vertex_index),
        (Structure::CortexLeft, 100, 9)
    );
    assert_eq!(line.start.surface_anchor(), Some(&start));
}

#[test]
fn test_viewport_space_is_not_editable() {
    let mut annotation = Annotation::new(
        CoordinateSpace::Viewport,
        AnnotationKind::Box(TwoDimGeometry::new(
            AnnotationCoordinate::viewport(10.0, 10.0, 0.0),
            10.0,
            10.0,
        )),
    )
    .unwrap();
    let before = annotation.clone();
    assert!(!apply(&mut annotation, &drag(SizingHandle::None, 1.0, 1.0)));
    assert_eq!(annotation, before);
}
