use annokit_annotations::model::{
    Annotation, AnnotationCoordinate, AnnotationFile, AnnotationKind, LineAnnotation,
    SizingHandle, TwoDimGeometry,
};
use annokit_annotations::{
    AnnotationDrawingPass, AnnotationIdentification, MatrixProjection, PassInputs, PassMode,
    PickingSession, SoftPickTarget, Viewport,
};
use annokit_core::{CoordinateSpace, Rgba};
use annokit_settings::Config;

const VIEWPORT: Viewport = Viewport {
    x: 0.0,
    y: 0.0,
    width: 100.0,
    height: 100.0,
};

fn tab_box(x: f64, y: f64, z: f64, size: f64) -> Annotation {
    Annotation::new(
        CoordinateSpace::Tab,
        AnnotationKind::Box(TwoDimGeometry::new(
            AnnotationCoordinate::tab(x, y, z),
            size,
            size,
        )),
    )
    .unwrap()
    .with_tab_index(0)
    .unwrap()
    .with_background_color(Rgba::new(40, 40, 200, 255))
}

/// Run a picking pass and rasterize it
fn pick_pass(
    inputs: PassInputs<'_>,
    config: &Config,
    files: &[AnnotationFile],
) -> (PickingSession, SoftPickTarget) {
    let mut session = PickingSession::new();
    let pass = AnnotationDrawingPass::new(inputs, &config.drawing);
    let output = pass.run(files, &[], PassMode::Pick(&mut session));

    let mut target = SoftPickTarget::for_viewport(&VIEWPORT, config.picking.clear_depth);
    target.render(&output.draw_list);
    (session, target)
}

#[test]
fn test_nearer_box_is_picked_regardless_of_draw_order() {
    let config = Config::default();
    let mut file = AnnotationFile::new("overlap");
    let near = file.add(tab_box(50.0, 50.0, 50.0, 20.0));
    let far = file.add(tab_box(55.0, 55.0, 0.0, 20.0));

    let inputs = PassInputs::new(CoordinateSpace::Tab, VIEWPORT);
    let (session, target) = pick_pass(inputs, &config, &[file]);
    assert_eq!(session.len(), 2);

    let (record, depth) = session.pick(&target, 52, 52).unwrap();
    assert_eq!(record.annotation_id, near);
    assert_eq!(record.handle, SizingHandle::None);
    assert_eq!(depth, -0.5);

    // Only the far box covers this pixel
    let (record, _) = session.pick(&target, 63, 63).unwrap();
    assert_eq!(record.annotation_id, far);
}

#[test]
fn test_background_click_selects_nothing() {
    let config = Config::default();
    let mut file = AnnotationFile::new("single");
    file.add(tab_box(50.0, 50.0, 0.0, 10.0));

    let inputs = PassInputs::new(CoordinateSpace::Tab, VIEWPORT);
    let (session, target) = pick_pass(inputs, &config, &[file]);
    assert!(session.pick(&target, 5, 5).is_none());
    assert!(session.pick(&target, 500, 5).is_none());
    assert!(session.pick(&target, -1, 50).is_none());
}

#[test]
fn test_handles_are_picked_with_their_handle() {
    let config = Config::default();
    let mut edited = tab_box(50.0, 50.0, 0.0, 20.0);
    edited.set_selected_for_editing(0, true);
    let mut file = AnnotationFile::new("editing");
    let id = file.add(edited);

    let inputs = PassInputs::new(CoordinateSpace::Tab, VIEWPORT);
    let (session, target) = pick_pass(inputs, &config, &[file]);

    for handle in [
        SizingHandle::BoxTopRight,
        SizingHandle::BoxLeft,
        SizingHandle::Rotation,
    ] {
        let center = session
            .records()
            .iter()
            .find(|r| r.handle == handle)
            .map(|r| r.point)
            .unwrap();
        let (record, _) = session
            .pick(&target, center.x.floor() as i64, center.y.floor() as i64)
            .unwrap();
        assert_eq!(record.annotation_id, id);
        assert_eq!(record.handle, handle, "picking {}", handle);
    }

    let (body, _) = session.pick(&target, 50, 50).unwrap();
    assert_eq!(body.handle, SizingHandle::None);
}

#[test]
fn test_identification_prefers_tab_over_model_space() {
    let config = Config::default();
    let camera = MatrixProjection::orthographic(0.0, 100.0, 0.0, 100.0, -1.0, 1.0, VIEWPORT);

    let mut file = AnnotationFile::new("mixed");
    let tab = file.add(tab_box(50.0, 50.0, 0.0, 20.0));
    file.add(
        Annotation::new(
            CoordinateSpace::Stereotaxic,
            AnnotationKind::Box(TwoDimGeometry::new(
                AnnotationCoordinate::stereotaxic(50.0, 50.0, 0.0),
                20.0,
                20.0,
            )),
        )
        .unwrap()
        .with_background_color(Rgba::WHITE),
    );
    let files = [file];

    let mut identification = AnnotationIdentification::new();
    for space in [CoordinateSpace::Stereotaxic, CoordinateSpace::Tab] {
        let inputs = PassInputs::new(space, VIEWPORT).with_camera(&camera);
        let (session, target) = pick_pass(inputs, &config, &files);
        if let Some((record, depth)) = session.pick(&target, 50, 50) {
            identification.offer(record, depth);
        }
    }

    assert_eq!(identification.selection().map(|r| r.annotation_id), Some(tab));
    assert_eq!(identification.depth(), Some(0.0));
}

#[test]
fn test_fully_transparent_shapes_are_not_selectable() {
    let config = Config::default();
    let mut invisible_box = tab_box(50.0, 50.0, 0.0, 20.0)
        .with_background_color(Rgba::TRANSPARENT)
        .with_line_color(Rgba::TRANSPARENT);
    invisible_box.set_selected_for_editing(0, true);
    let mut invisible_line = Annotation::new(
        CoordinateSpace::Tab,
        AnnotationKind::Line(LineAnnotation::new(
            AnnotationCoordinate::tab(10.0, 10.0, 0.0),
            AnnotationCoordinate::tab(90.0, 10.0, 0.0),
        )),
    )
    .unwrap()
    .with_tab_index(0)
    .unwrap()
    .with_line_color(Rgba::TRANSPARENT);
    invisible_line.set_selected_for_editing(0, true);

    let mut file = AnnotationFile::new("hidden");
    file.add(invisible_box);
    file.add(invisible_line);

    let inputs = PassInputs::new(CoordinateSpace::Tab, VIEWPORT);
    let (session, target) = pick_pass(inputs, &config, &[file]);
    assert_eq!(session.len(), 0);
    assert!(session.pick(&target, 50, 50).is_none());
    assert!(session.pick(&target, 50, 10).is_none());
}

#[test]
fn test_outline_only_box_stays_selectable() {
    let config = Config::default();
    let mut file = AnnotationFile::new("outline");
    let id = file.add(tab_box(50.0, 50.0, 0.0, 20.0).with_background_color(Rgba::TRANSPARENT));

    let inputs = PassInputs::new(CoordinateSpace::Tab, VIEWPORT);
    let (session, _) = pick_pass(inputs, &config, &[file]);
    assert_eq!(session.len(), 1);
    assert_eq!(session.record(0).map(|r| r.annotation_id), Some(id));
}
