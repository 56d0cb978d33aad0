use annokit_annotations::model::{
    Annotation, AnnotationCoordinate, AnnotationKind, ConnectToBrainordinate, ImageAnnotation,
    LineAnnotation, SurfaceAnchor, SurfaceOffsetMode, TextAnnotation, TwoDimGeometry,
};
use annokit_annotations::{
    AnnotationDrawingPass, FixedAdvanceTextMeasurer, MatrixProjection, MeshSurface, PassInputs,
    PassMode, Primitive, Viewport,
};
use annokit_core::{CoordinateSpace, Structure};
use annokit_settings::DrawingSettings;
use glam::DVec3;
use image::RgbaImage;

const VIEWPORT: Viewport = Viewport {
    x: 0.0,
    y: 0.0,
    width: 100.0,
    height: 100.0,
};

fn window_box(window: Option<usize>) -> Annotation {
    let annotation = Annotation::new(
        CoordinateSpace::Window,
        AnnotationKind::Box(TwoDimGeometry::new(
            AnnotationCoordinate::window(50.0, 50.0, 0.0),
            10.0,
            10.0,
        )),
    )
    .unwrap();
    match window {
        Some(index) => annotation.with_window_index(index).unwrap(),
        None => annotation,
    }
}

#[test]
fn test_window_annotations_filtered_by_window() {
    let settings = DrawingSettings::default();
    let annotations = [window_box(Some(0)), window_box(Some(2)), window_box(None)];

    let pass = AnnotationDrawingPass::new(
        PassInputs::new(CoordinateSpace::Window, VIEWPORT).with_window_index(2),
        &settings,
    );
    let output = pass.run(&[], &annotations, PassMode::Draw);
    assert_eq!(output.drawn, vec![annotations[1].id()]);
}

#[test]
fn test_hidden_and_text_toggles() {
    let settings = DrawingSettings::default();
    let text = Annotation::new(
        CoordinateSpace::Tab,
        AnnotationKind::Text(TextAnnotation::new(
            TwoDimGeometry::new(AnnotationCoordinate::tab(20.0, 20.0, 0.0), 10.0, 5.0),
            "note",
        )),
    )
    .unwrap()
    .with_tab_index(0)
    .unwrap();
    let mut hidden = text.clone();
    hidden.set_displayed(false);

    let pass = AnnotationDrawingPass::new(
        PassInputs::new(CoordinateSpace::Tab, VIEWPORT).with_display_toggles(true, false, true),
        &settings,
    );
    assert!(pass.run(&[], &[text.clone()], PassMode::Draw).drawn.is_empty());

    let pass =
        AnnotationDrawingPass::new(PassInputs::new(CoordinateSpace::Tab, VIEWPORT), &settings);
    let output = pass.run(&[], &[text.clone(), hidden], PassMode::Draw);
    assert_eq!(output.drawn, vec![text.id()]);
    assert!(output
        .draw_list
        .iter()
        .any(|p| matches!(p, Primitive::Text { text, .. } if text == "note")));
}

#[test]
fn test_line_with_arrows() {
    let settings = DrawingSettings::default();
    let line = Annotation::new(
        CoordinateSpace::Tab,
        AnnotationKind::Line(
            LineAnnotation::new(
                AnnotationCoordinate::tab(10.0, 10.0, 0.0),
                AnnotationCoordinate::tab(90.0, 10.0, 0.0),
            )
            .with_arrows(true, true),
        ),
    )
    .unwrap()
    .with_tab_index(0)
    .unwrap()
    .with_line_width_percentage(2.0);

    let pass =
        AnnotationDrawingPass::new(PassInputs::new(CoordinateSpace::Tab, VIEWPORT), &settings);
    let list = pass.run(&[], &[line], PassMode::Draw).draw_list;

    let widths: Vec<_> = list
        .iter()
        .filter_map(|p| match p {
            Primitive::Lines { width_px, .. } => Some(*width_px),
            _ => None,
        })
        .collect();
    assert_eq!(widths, vec![2.0]);
    let arrows = list
        .iter()
        .filter(|p| matches!(p, Primitive::FilledPolygon { vertices, .. } if vertices.len() == 3))
        .count();
    assert_eq!(arrows, 2);
}

#[test]
fn test_surface_text_connector_stops_at_text() {
    let settings = DrawingSettings::default();
    let camera = MatrixProjection::orthographic(0.0, 100.0, 0.0, 100.0, -1.0, 1.0, VIEWPORT);
    let surface = MeshSurface::new(
        Structure::CortexLeft,
        vec![DVec3::new(20.0, 50.0, 0.0), DVec3::new(80.0, 50.0, 0.0)],
        vec![DVec3::X, DVec3::X],
    );
    let measurer = FixedAdvanceTextMeasurer::default();

    let anchor = SurfaceAnchor::new(Structure::CortexLeft, 2, 0)
        .with_offset(30.0, SurfaceOffsetMode::Normal);
    let text = Annotation::new(
        CoordinateSpace::Surface,
        AnnotationKind::Text(
            TextAnnotation::new(
                TwoDimGeometry::new(AnnotationCoordinate::surface(anchor), 10.0, 5.0),
                "label",
            )
            .with_connector(ConnectToBrainordinate::Arrow),
        ),
    )
    .unwrap();

    let inputs = PassInputs::new(CoordinateSpace::Surface, VIEWPORT)
        .with_camera(&camera)
        .with_surface(&surface)
        .with_text_measurer(&measurer);
    let list = AnnotationDrawingPass::new(inputs, &settings)
        .run(&[], &[text], PassMode::Draw)
        .draw_list;

    // 5 characters at 0.6 of a 5 px font, centered on x = 50
    let connector = list
        .iter()
        .find_map(|p| match p {
            Primitive::Lines { segments, .. } => segments.first().copied(),
            _ => None,
        })
        .unwrap();
    assert!((connector.0.x - 20.0).abs() < 1e-6);
    assert!((connector.1.x - 42.5).abs() < 1e-6);
    assert!((connector.1.y - 50.0).abs() < 1e-6);

    let arrow = list
        .iter()
        .find_map(|p| match p {
            Primitive::FilledPolygon { vertices, .. } => Some(vertices.clone()),
            _ => None,
        })
        .unwrap();
    assert!((arrow[1] - connector.0).length() < 1e-9);
}

#[test]
fn test_image_without_pixels_draws_outline_only() {
    let settings = DrawingSettings::default();
    let image = Annotation::new(
        CoordinateSpace::Tab,
        AnnotationKind::Image(ImageAnnotation::new(
            TwoDimGeometry::new(AnnotationCoordinate::tab(50.0, 50.0, 0.0), 20.0, 20.0),
            RgbaImage::new(0, 0),
        )),
    )
    .unwrap()
    .with_tab_index(0)
    .unwrap();

    let pass =
        AnnotationDrawingPass::new(PassInputs::new(CoordinateSpace::Tab, VIEWPORT), &settings);
    let list = pass.run(&[], &[image], PassMode::Draw).draw_list;
    assert_eq!(list.len(), 1);
    assert!(matches!(list.primitives()[0], Primitive::QuadOutline { .. }));
}
