use std::path::PathBuf;

use annokit::model::{
    ColorBarAnnotation, ColorBarLabel, ColorBarSection, ConnectToBrainordinate,
    HorizontalAlignment, LineAnnotation, SurfaceAnchor, SurfaceOffsetMode, TextAnnotation,
    TwoDimGeometry,
};
use annokit::modification::apply;
use annokit::{
    init_logging, Annotation, AnnotationCoordinate, AnnotationDrawingPass, AnnotationFile,
    AnnotationIdentification, AnnotationKind, Config, CoordinateSpace, MatrixProjection,
    MeshSurface, PassInputs, PassMode, PickingSession, Rgba, SizingHandle, SoftPickTarget,
    SpatialModificationRequest, Structure, Viewport, BUILD_DATE, VERSION,
};
use glam::DVec3;
use tracing::info;

const DRAWING_SPACES: [CoordinateSpace; 4] = [
    CoordinateSpace::Stereotaxic,
    CoordinateSpace::Surface,
    CoordinateSpace::Tab,
    CoordinateSpace::Window,
];

/// Headless walkthrough: draw a small scene, pick under a mouse position,
/// then drag whatever was picked.
///
/// Usage: `annokit [config.toml] [pick.png]`
fn main() -> anyhow::Result<()> {
    init_logging()?;
    info!("AnnoKit {} (built {})", VERSION, BUILD_DATE);

    let mut args = std::env::args().skip(1);
    let config_path = match args.next() {
        Some(path) => PathBuf::from(path),
        None => Config::default_path()?,
    };
    let pick_image = args.next().map(PathBuf::from);
    let config = Config::load_or_default(&config_path)?;

    let viewport = Viewport::sized(400.0, 300.0);
    let camera =
        MatrixProjection::orthographic(-100.0, 100.0, -75.0, 75.0, -100.0, 100.0, viewport);
    let surface = sample_surface();
    let (mut file, transient) = sample_scene()?;

    for space in DRAWING_SPACES {
        let inputs = PassInputs::new(space, viewport)
            .with_camera(&camera)
            .with_surface(&surface);
        let output = AnnotationDrawingPass::new(inputs, &config.drawing).run(
            std::slice::from_ref(&file),
            &transient,
            PassMode::Draw,
        );
        info!(
            "{} pass drew {} annotations as {} primitives",
            space,
            output.drawn.len(),
            output.draw_list.len()
        );
    }

    let (mouse_x, mouse_y) = (200_i64, 150_i64);
    let mut identification = AnnotationIdentification::new();
    for space in DRAWING_SPACES {
        let inputs = PassInputs::new(space, viewport)
            .with_camera(&camera)
            .with_surface(&surface);
        let mut session = PickingSession::new();
        let output = AnnotationDrawingPass::new(inputs, &config.drawing).run(
            std::slice::from_ref(&file),
            &transient,
            PassMode::Pick(&mut session),
        );

        let mut target = SoftPickTarget::for_viewport(&viewport, config.picking.clear_depth);
        target.render(&output.draw_list);
        if let Some((record, depth)) = session.pick(&target, mouse_x, mouse_y) {
            identification.offer(record, depth);
        }

        if space == CoordinateSpace::Tab {
            if let Some(path) = &pick_image {
                target.to_image().save(path)?;
                info!("Wrote tab picking buffer to {}", path.display());
            }
        }
    }

    let Some(selected) = identification.selection().copied() else {
        info!("Nothing under the mouse at ({}, {})", mouse_x, mouse_y);
        return Ok(());
    };
    info!(
        "Picked annotation {} handle {} at depth {:.3}",
        selected.annotation_id,
        selected.handle,
        identification.depth().unwrap_or_default()
    );

    if let Some(annotation) = file.get_mut(selected.annotation_id) {
        annotation.set_selected_for_editing(0, true);
        let request =
            SpatialModificationRequest::new(SizingHandle::None, viewport.width, viewport.height)
                .with_mouse(mouse_x as f64 + 20.0, mouse_y as f64 + 10.0, 20.0, 10.0);
        let moved = apply(annotation, &request);
        info!("Drag of {} {}", annotation, if moved { "applied" } else { "rejected" });

        let push_out =
            SpatialModificationRequest::new(SizingHandle::None, viewport.width, viewport.height)
                .with_mouse(mouse_x as f64 + 400.0, mouse_y as f64, 380.0, 0.0);
        if !apply(annotation, &push_out) {
            info!("Drag past the tab edge rejected, {} unchanged", annotation);
        }
    }

    Ok(())
}

/// A flat square patch of cortex facing +Z
fn sample_surface() -> MeshSurface {
    let mut positions = Vec::new();
    for row in 0..10 {
        for column in 0..10 {
            positions.push(DVec3::new(
                -45.0 + 10.0 * f64::from(column),
                -45.0 + 10.0 * f64::from(row),
                0.0,
            ));
        }
    }
    let normals = vec![DVec3::Z; positions.len()];
    MeshSurface::new(Structure::CortexLeft, positions, normals)
}

fn sample_scene() -> anyhow::Result<(AnnotationFile, Vec<Annotation>)> {
    let mut file = AnnotationFile::new("demo");

    file.add(
        Annotation::new(
            CoordinateSpace::Tab,
            AnnotationKind::Box(TwoDimGeometry::new(
                AnnotationCoordinate::tab(50.0, 50.0, 0.0),
                20.0,
                15.0,
            )),
        )?
        .with_tab_index(0)?
        .with_background_color(Rgba::new(30, 60, 160, 200)),
    );

    file.add(
        Annotation::new(
            CoordinateSpace::Tab,
            AnnotationKind::Line(
                LineAnnotation::new(
                    AnnotationCoordinate::tab(10.0, 90.0, 0.0),
                    AnnotationCoordinate::tab(40.0, 70.0, 0.0),
                )
                .with_arrows(false, true),
            ),
        )?
        .with_tab_index(0)?,
    );

    file.add(
        Annotation::new(
            CoordinateSpace::Stereotaxic,
            AnnotationKind::Oval(
                TwoDimGeometry::new(AnnotationCoordinate::stereotaxic(-40.0, 30.0, 5.0), 15.0, 10.0)
                    .with_rotation(30.0),
            ),
        )?
        .with_background_color(Rgba::new(200, 80, 40, 255)),
    );

    let anchor = SurfaceAnchor::new(Structure::CortexLeft, 100, 55)
        .with_offset(20.0, SurfaceOffsetMode::Normal);
    file.add(Annotation::new(
        CoordinateSpace::Surface,
        AnnotationKind::Text(
            TextAnnotation::new(
                TwoDimGeometry::new(AnnotationCoordinate::surface(anchor), 10.0, 5.0),
                "V1",
            )
            .with_connector(ConnectToBrainordinate::Arrow),
        ),
    )?);

    let color_bar = ColorBarAnnotation::new(TwoDimGeometry::new(
        AnnotationCoordinate::tab(0.0, 0.0, 0.0),
        25.0,
        8.0,
    ))
    .with_sections(vec![
        ColorBarSection::new(-2.0, 0.0, Rgba::new(0, 0, 255, 255), Rgba::WHITE),
        ColorBarSection::new(0.0, 2.0, Rgba::WHITE, Rgba::new(255, 0, 0, 255)),
    ])
    .with_labels(vec![
        ColorBarLabel::new(0.0, "-2", HorizontalAlignment::Left),
        ColorBarLabel::new(0.5, "0", HorizontalAlignment::Center),
        ColorBarLabel::new(1.0, "2", HorizontalAlignment::Right),
    ]);
    let transient = vec![Annotation::new(CoordinateSpace::Tab, AnnotationKind::ColorBar(color_bar))?
        .with_tab_index(0)?];

    Ok((file, transient))
}
