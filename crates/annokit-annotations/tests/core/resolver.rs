use annokit_annotations::model::{
    Annotation, AnnotationCoordinate, AnnotationKind, LineAnnotation, SurfaceAnchor,
    SurfaceOffsetMode,
};
use annokit_annotations::{
    clip_line_against_quad, resolve, resolve_annotation, MatrixProjection, MeshSurface, Quad,
    ResolveContext, Viewport,
};
use annokit_core::{CoordinateSpace, ResolveError, Structure};
use glam::DVec3;
use proptest::prelude::*;

fn mesh(structure: Structure, count: usize) -> MeshSurface {
    let positions = (0..count).map(|i| DVec3::new(i as f64, 0.0, 0.0)).collect();
    let normals = vec![DVec3::Z; count];
    MeshSurface::new(structure, positions, normals)
}

fn structure(index: usize) -> Structure {
    [
        Structure::CortexLeft,
        Structure::CortexRight,
        Structure::Cerebellum,
        Structure::HippocampusLeft,
    ][index]
}

/// Orthographic camera where model X/Y are window pixels
fn pixel_camera(viewport: Viewport) -> MatrixProjection {
    MatrixProjection::orthographic(0.0, viewport.width, 0.0, viewport.height, -1.0, 1.0, viewport)
}

proptest! {
    #[test]
    fn surface_resolution_requires_matching_mesh(
        anchored in 0usize..4,
        displayed in 0usize..4,
        anchored_count in 1usize..40,
        displayed_count in 1usize..40,
    ) {
        let viewport = Viewport::sized(100.0, 100.0);
        let camera = pixel_camera(viewport);
        let surface = mesh(structure(displayed), displayed_count);
        let ctx = ResolveContext::new(viewport).with_camera(&camera).with_surface(&surface);

        let coordinate = AnnotationCoordinate::surface(SurfaceAnchor::new(
            structure(anchored),
            anchored_count,
            0,
        ));
        let result = resolve(&coordinate, &ctx);

        if anchored == displayed && anchored_count == displayed_count {
            prop_assert!(result.is_ok());
        } else {
            let is_invalid = matches!(result, Err(ResolveError::InvalidSpaceContext { .. }));
            prop_assert!(is_invalid);
        }
    }
}

#[test]
fn test_surface_offset_along_normal() {
    let viewport = Viewport::sized(100.0, 100.0);
    let camera = pixel_camera(viewport);
    let surface = mesh(Structure::CortexLeft, 20);
    let ctx = ResolveContext::new(viewport).with_camera(&camera).with_surface(&surface);

    let coordinate = AnnotationCoordinate::surface(
        SurfaceAnchor::new(Structure::CortexLeft, 20, 10)
            .with_offset(0.5, SurfaceOffsetMode::Normal),
    );
    let point = resolve(&coordinate, &ctx).unwrap();
    assert!((point.x - 10.0).abs() < 1e-9);
    // Offset toward the viewer moves the point nearer
    let vertex = resolve(
        &AnnotationCoordinate::surface(SurfaceAnchor::new(Structure::CortexLeft, 20, 10)),
        &ctx,
    )
    .unwrap();
    assert!(point.z < vertex.z);
}

#[test]
fn test_stereotaxic_line_clipped_without_touching_storage() {
    let viewport = Viewport::sized(100.0, 100.0);
    let camera = pixel_camera(viewport);
    let ctx = ResolveContext::new(viewport).with_camera(&camera);

    let annotation = Annotation::new(
        CoordinateSpace::Stereotaxic,
        AnnotationKind::Line(LineAnnotation::new(
            AnnotationCoordinate::stereotaxic(0.0, 0.0, 0.0),
            AnnotationCoordinate::stereotaxic(10.0, 0.0, 0.0),
        )),
    )
    .unwrap();

    let points = resolve_annotation(&annotation, &ctx).unwrap();
    let quad = Quad::new(
        DVec3::new(8.0, 0.0, 0.5),
        DVec3::new(12.0, 0.0, 0.5),
        DVec3::new(12.0, 2.0, 0.5),
        DVec3::new(8.0, 2.0, 0.5),
    );
    let end = clip_line_against_quad(&quad, points[0], points[1]);
    assert!((end - DVec3::new(8.0, 0.0, 0.5)).length() < 1e-9);

    let AnnotationKind::Line(line) = annotation.kind() else {
        unreachable!()
    };
    assert_eq!(line.end.xyz(), Some(DVec3::new(10.0, 0.0, 0.0)));
}

#[test]
fn test_model_space_without_camera_is_skipped() {
    let ctx = ResolveContext::new(Viewport::sized(100.0, 100.0));
    let result = resolve(&AnnotationCoordinate::stereotaxic(1.0, 2.0, 3.0), &ctx);
    assert!(matches!(result, Err(ResolveError::InvalidSpaceContext { .. })));
}
