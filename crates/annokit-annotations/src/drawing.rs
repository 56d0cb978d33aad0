//! Annotation drawing pass
//!
//! One pass draws the annotations of a single coordinate space for one tab
//! or window. It filters annotations, resolves their coordinates, computes
//! shape bounds and emits primitives into a [`DrawList`]. In picking mode
//! every selectable item is drawn in its own identification color and
//! recorded in the caller's [`PickingSession`].

use annokit_core::constants::{MAX_TABS, MAX_WINDOWS};
use annokit_core::{CoordinateSpace, ResolveError, Rgba};
use annokit_settings::DrawingSettings;
use glam::DVec3;
use smallvec::{smallvec, SmallVec};
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::bounds::shape_bounds;
use crate::display_list::{DrawList, Primitive};
use crate::geometry::{
    build_arrowheads_scaled, clip_line_against_quad, expand_box, sizing_handle_layout_1d,
    sizing_handle_layout_2d, HandleLayout, HandleStyle, Quad,
};
use crate::model::{
    Annotation, AnnotationFile, AnnotationKind, AnnotationType, ColorBarAnnotation,
    ColorBarPositionMode, ConnectToBrainordinate, DisplayGroup, ImageAnnotation, LineAnnotation,
    SizingHandle, TextAnnotation,
};
use crate::picking::{PickingSession, SelectionRecord};
use crate::resolver::{
    resolve_annotation, resolve_with_surface_offset, ResolveContext, SliceContext,
};
use crate::services::{CameraProjection, SurfaceMesh, TextMeasurer};
use crate::viewport::Viewport;

/// Gap in pixels between the top of a color bar and its labels
const COLOR_BAR_TEXT_OFFSET: f64 = 2.0;
/// Tick mark height as a fraction of the color bar height
const COLOR_BAR_TICK_FRACTION: f64 = 0.10;
const COLOR_BAR_TICK_THICKNESS: f64 = 2.0;

/// What one pass draws and the services it draws with
#[derive(Clone, Copy)]
pub struct PassInputs<'a> {
    pub drawing_space: CoordinateSpace,
    pub viewport: Viewport,
    pub tab_index: usize,
    pub window_index: usize,
    /// Draw annotations that belong to files
    pub display_annotations: bool,
    pub display_text_annotations: bool,
    /// Draw window-space annotations that belong to files
    pub draw_window_annotations: bool,
    pub camera: Option<&'a dyn CameraProjection>,
    pub surface: Option<&'a dyn SurfaceMesh>,
    pub slice: Option<SliceContext>,
    pub text_measurer: Option<&'a dyn TextMeasurer>,
    /// Display group of each tab, indexed by tab. Tabs past the end use
    /// their own selection.
    pub tab_display_groups: &'a [DisplayGroup],
    /// Annotation the user is dragging out in this window
    pub being_drawn: Option<&'a Annotation>,
}

impl<'a> PassInputs<'a> {
    pub fn new(drawing_space: CoordinateSpace, viewport: Viewport) -> Self {
        Self {
            drawing_space,
            viewport,
            tab_index: 0,
            window_index: 0,
            display_annotations: true,
            display_text_annotations: true,
            draw_window_annotations: true,
            camera: None,
            surface: None,
            slice: None,
            text_measurer: None,
            tab_display_groups: &[],
            being_drawn: None,
        }
    }

    pub fn with_tab_index(mut self, tab_index: usize) -> Self {
        self.tab_index = tab_index;
        self
    }

    pub fn with_window_index(mut self, window_index: usize) -> Self {
        self.window_index = window_index;
        self
    }

    pub fn with_display_toggles(mut self, annotations: bool, text: bool, window: bool) -> Self {
        self.display_annotations = annotations;
        self.display_text_annotations = text;
        self.draw_window_annotations = window;
        self
    }

    pub fn with_camera(mut self, camera: &'a dyn CameraProjection) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn with_surface(mut self, surface: &'a dyn SurfaceMesh) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn with_slice(mut self, slice: SliceContext) -> Self {
        self.slice = Some(slice);
        self
    }

    pub fn with_text_measurer(mut self, measurer: &'a dyn TextMeasurer) -> Self {
        self.text_measurer = Some(measurer);
        self
    }

    pub fn with_tab_display_groups(mut self, groups: &'a [DisplayGroup]) -> Self {
        self.tab_display_groups = groups;
        self
    }

    pub fn with_being_drawn(mut self, annotation: &'a Annotation) -> Self {
        self.being_drawn = Some(annotation);
        self
    }

    /// Group deciding visibility in this pass. Window passes have no tab, so
    /// they use group A.
    pub fn display_group(&self) -> DisplayGroup {
        if self.drawing_space == CoordinateSpace::Window {
            return DisplayGroup::A;
        }
        self.tab_display_groups
            .get(self.tab_index)
            .copied()
            .unwrap_or_default()
    }
}

pub enum PassMode<'s> {
    Draw,
    Pick(&'s mut PickingSession),
}

#[derive(Debug, Default)]
pub struct PassOutput {
    pub draw_list: DrawList,
    /// Annotations that resolved and were drawn, in draw order
    pub drawn: Vec<Uuid>,
}

/// Primitives collected so far and, when picking, the session issuing colors
struct Frame<'s> {
    list: DrawList,
    session: Option<&'s mut PickingSession>,
}

impl Frame<'_> {
    fn picking(&self) -> bool {
        self.session.is_some()
    }

    fn pick_color(&mut self, record: SelectionRecord) -> Option<Rgba> {
        self.session.as_mut().and_then(|s| s.next_color(record))
    }

    fn push(&mut self, primitive: Primitive) {
        self.list.push(primitive);
    }
}

/// Automatic placement of color bars down the left of a tab or window
struct ColorBarStack {
    x: f64,
    min_y: f64,
    next_y: Option<f64>,
}

impl ColorBarStack {
    fn new(settings: &DrawingSettings) -> Self {
        Self {
            x: settings.color_bar_auto_x,
            min_y: settings.color_bar_auto_min_y,
            next_y: None,
        }
    }

    /// Percentage position overriding the stored anchor, if the bar is
    /// automatically placed
    fn place(&mut self, annotation: &Annotation) -> Option<DVec3> {
        let AnnotationKind::ColorBar(bar) = annotation.kind() else {
            return None;
        };
        if bar.position_mode != ColorBarPositionMode::Automatic
            || !annotation.space().is_percentage()
        {
            return None;
        }

        let half_height = bar.geometry.height / 2.0;
        let y = match self.next_y {
            None => self.min_y.max(half_height),
            Some(y) => y + half_height,
        };
        self.next_y = Some(y + half_height);

        let z = bar.geometry.coordinate.xyz().map(|p| p.z).unwrap_or(0.0);
        Some(DVec3::new(self.x, y, z))
    }
}

pub struct AnnotationDrawingPass<'a> {
    inputs: PassInputs<'a>,
    settings: &'a DrawingSettings,
}

impl<'a> AnnotationDrawingPass<'a> {
    pub fn new(inputs: PassInputs<'a>, settings: &'a DrawingSettings) -> Self {
        Self { inputs, settings }
    }

    pub fn inputs(&self) -> &PassInputs<'a> {
        &self.inputs
    }

    /// Draw file annotations, then color bars and annotations outside any file
    pub fn run(
        &self,
        files: &[AnnotationFile],
        transient: &[Annotation],
        mode: PassMode<'_>,
    ) -> PassOutput {
        let ctx = self.resolve_context();
        let mut frame = Frame {
            list: DrawList::new(),
            session: match mode {
                PassMode::Draw => None,
                PassMode::Pick(session) => Some(session),
            },
        };
        let mut drawn = Vec::new();

        for file in files {
            for annotation in file.annotations() {
                if self.should_draw(annotation, true)
                    && self.draw_annotation(Some(file.id()), annotation, None, &ctx, &mut frame)
                {
                    drawn.push(annotation.id());
                }
            }
        }

        let mut stack = ColorBarStack::new(self.settings);
        for annotation in transient {
            if !self.should_draw(annotation, false) {
                continue;
            }
            let placement = stack.place(annotation);
            if self.draw_annotation(None, annotation, placement, &ctx, &mut frame) {
                drawn.push(annotation.id());
            }
        }

        if !frame.picking() && self.inputs.drawing_space == CoordinateSpace::Window {
            if let Some(annotation) = self.inputs.being_drawn {
                if self.draw_being_drawn(annotation, &ctx, &mut frame) {
                    drawn.push(annotation.id());
                }
            }
        }

        debug!(
            "Drew {} {} annotations ({} primitives)",
            drawn.len(),
            self.inputs.drawing_space,
            frame.list.len()
        );
        PassOutput {
            draw_list: frame.list,
            drawn,
        }
    }

    fn resolve_context(&self) -> ResolveContext<'a> {
        ResolveContext {
            viewport: self.inputs.viewport,
            camera: self.inputs.camera,
            surface: self.inputs.surface,
            slice: self.inputs.slice,
            default_half_slice_thickness: self.settings.default_half_slice_thickness,
        }
    }

    /// Text still being dragged out is shown as its box
    fn draw_being_drawn(
        &self,
        annotation: &Annotation,
        ctx: &ResolveContext<'_>,
        frame: &mut Frame<'_>,
    ) -> bool {
        let AnnotationKind::Text(text) = annotation.kind() else {
            return self.draw_annotation(None, annotation, None, ctx, frame);
        };

        let line_width = annotation.effective_line_width_percentage(self.inputs.viewport.height);
        let geometry = text.geometry.clone();
        let outline = Annotation::new(annotation.space(), AnnotationKind::Box(geometry)).map(|b| {
            b.with_line_color(annotation.line_color())
                .with_background_color(annotation.background_color())
                .with_line_width_percentage(line_width)
        });
        match outline {
            Ok(outline) => self.draw_annotation(None, &outline, None, ctx, frame),
            Err(e) => {
                warn!("Cannot draw text being drawn {}: {}", annotation.id(), e);
                false
            }
        }
    }

    fn should_draw(&self, annotation: &Annotation, in_file: bool) -> bool {
        let inputs = &self.inputs;
        if annotation.space() != inputs.drawing_space
            || !annotation.is_displayed_in(inputs.display_group(), inputs.tab_index)
        {
            return false;
        }

        match annotation.space() {
            CoordinateSpace::Window => {
                match annotation.window_index() {
                    Some(index) if index < MAX_WINDOWS => {
                        if index != inputs.window_index {
                            return false;
                        }
                    }
                    other => {
                        warn!(
                            "Window annotation {} has invalid window index {:?}",
                            annotation.id(),
                            other
                        );
                        return false;
                    }
                }
                if in_file && !inputs.draw_window_annotations {
                    return false;
                }
            }
            CoordinateSpace::Tab => match annotation.tab_index() {
                Some(index) if index < MAX_TABS => {
                    if index != inputs.tab_index {
                        return false;
                    }
                }
                other => {
                    warn!("Tab annotation {} has invalid tab index {:?}", annotation.id(), other);
                    return false;
                }
            },
            _ => {}
        }

        let annotation_type = annotation.annotation_type();
        if in_file && !inputs.display_annotations && annotation_type != AnnotationType::ColorBar {
            return false;
        }
        if annotation_type == AnnotationType::Text && !inputs.display_text_annotations {
            return false;
        }
        true
    }

    fn anchor_points(
        &self,
        annotation: &Annotation,
        placement: Option<DVec3>,
        ctx: &ResolveContext<'_>,
    ) -> Result<SmallVec<[DVec3; 2]>, ResolveError> {
        match placement {
            Some(pct) => Ok(smallvec![ctx.viewport.percentage_to_pixels(pct)]),
            None => resolve_annotation(annotation, ctx),
        }
    }

    fn line_width_px(&self, annotation: &Annotation) -> f64 {
        let height = self.inputs.viewport.height;
        let pct = annotation.effective_line_width_percentage(height);
        ((pct / 100.0) * height).max(self.settings.line_width_minimum)
    }

    fn handle_style(&self) -> HandleStyle {
        HandleStyle::from(self.settings)
    }

    fn selection_color(&self) -> Rgba {
        let scale = self.settings.selection_color_scale;
        self.settings
            .foreground_color
            .scale_saturation_value(scale, scale)
    }

    fn draw_annotation(
        &self,
        file_id: Option<Uuid>,
        annotation: &Annotation,
        placement: Option<DVec3>,
        ctx: &ResolveContext<'_>,
        frame: &mut Frame<'_>,
    ) -> bool {
        let points = match self.anchor_points(annotation, placement, ctx) {
            Ok(points) => points,
            Err(e) => {
                debug!("Skipping {}: {}", annotation, e);
                return false;
            }
        };
        let line_width = self.line_width_px(annotation);
        let selected = annotation.is_selected_for_editing(self.inputs.window_index);

        match annotation.kind() {
            AnnotationKind::Line(line) => {
                let (Some(&first), Some(&second)) = (points.first(), points.get(1)) else {
                    return false;
                };
                if !self.draw_line(file_id, annotation, line, first, second, line_width, frame) {
                    return false;
                }
                if selected {
                    let layout =
                        sizing_handle_layout_1d(first, second, line_width, &self.handle_style());
                    self.draw_handles(file_id, annotation, &layout, frame);
                }
            }
            kind => {
                let Some(&anchor) = points.first() else {
                    return false;
                };
                let Some(quad) =
                    shape_bounds(kind, anchor, &self.inputs.viewport, self.inputs.text_measurer)
                else {
                    return false;
                };

                let mut alignment = None;
                match kind {
                    AnnotationKind::Box(_) => {
                        if !self.draw_box(file_id, annotation, &quad, line_width, false, frame) {
                            return false;
                        }
                    }
                    AnnotationKind::Oval(_) => {
                        if !self.draw_box(file_id, annotation, &quad, line_width, true, frame) {
                            return false;
                        }
                    }
                    AnnotationKind::Text(text) => {
                        alignment = Some(text.horizontal_alignment);
                        self.draw_text(
                            file_id, annotation, text, anchor, &quad, line_width, ctx, frame,
                        )
                    }
                    AnnotationKind::Image(image) => {
                        self.draw_image(file_id, annotation, image, &quad, line_width, frame)
                    }
                    AnnotationKind::ColorBar(bar) => {
                        self.draw_color_bar(file_id, annotation, bar, &quad, frame)
                    }
                    AnnotationKind::Line(_) => return false,
                }

                if selected {
                    let layout = sizing_handle_layout_2d(
                        &quad,
                        annotation.kind().two_dim().map(|g| g.rotation_angle).unwrap_or(0.0),
                        &self.handle_style(),
                        alignment,
                    );
                    self.draw_handles(file_id, annotation, &layout, frame);
                }
            }
        }

        trace!("Drew {}", annotation);
        true
    }

    /// Returns false for a line with an invisible color, which is neither
    /// drawn nor selectable.
    #[allow(clippy::too_many_arguments)]
    fn draw_line(
        &self,
        file_id: Option<Uuid>,
        annotation: &Annotation,
        line: &LineAnnotation,
        first: DVec3,
        second: DVec3,
        line_width: f64,
        frame: &mut Frame<'_>,
    ) -> bool {
        let line_color = annotation.line_color();
        if !line_color.is_visible() {
            return false;
        }

        let color = if frame.picking() {
            let midpoint = (first + second) / 2.0;
            let record = selection_record(file_id, annotation, SizingHandle::None, midpoint);
            match frame.pick_color(record) {
                Some(color) => color,
                None => return true,
            }
        } else {
            line_color
        };

        frame.push(Primitive::line(first, second, color, line_width));
        let arrows = build_arrowheads_scaled(
            first,
            second,
            line_width,
            self.settings.arrow_size_multiple,
            line.display_start_arrow,
            line.display_end_arrow,
        );
        for arrow in &arrows {
            frame.push(Primitive::arrowhead(arrow, color));
        }
        true
    }

    /// Returns false when both colors are invisible; such a shape is neither
    /// drawn nor selectable.
    fn draw_box(
        &self,
        file_id: Option<Uuid>,
        annotation: &Annotation,
        quad: &Quad,
        line_width: f64,
        oval: bool,
        frame: &mut Frame<'_>,
    ) -> bool {
        let filled = |quad: Quad, color| {
            if oval {
                Primitive::FilledEllipse { quad, color }
            } else {
                Primitive::FilledQuad { quad, color }
            }
        };
        let outline = |quad: Quad, color| {
            if oval {
                Primitive::EllipseOutline {
                    quad,
                    color,
                    width_px: line_width,
                }
            } else {
                Primitive::QuadOutline {
                    quad,
                    color,
                    width_px: line_width,
                }
            }
        };

        let background = annotation.background_color();
        let foreground = annotation.line_color();
        if !background.is_visible() && !foreground.is_visible() {
            return false;
        }

        if frame.picking() {
            let record = selection_record(file_id, annotation, SizingHandle::None, quad.center());
            if let Some(color) = frame.pick_color(record) {
                if background.is_visible() {
                    frame.push(filled(*quad, color));
                } else {
                    frame.push(outline(*quad, color));
                }
            }
            return true;
        }

        if background.is_visible() {
            frame.push(filled(*quad, background));
        }
        if foreground.is_visible() {
            frame.push(outline(*quad, foreground));
        }
        true
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &self,
        file_id: Option<Uuid>,
        annotation: &Annotation,
        text: &TextAnnotation,
        anchor: DVec3,
        quad: &Quad,
        line_width: f64,
        ctx: &ResolveContext<'_>,
        frame: &mut Frame<'_>,
    ) {
        if frame.picking() {
            let record = selection_record(file_id, annotation, SizingHandle::None, quad.center());
            if let Some(color) = frame.pick_color(record) {
                frame.push(Primitive::FilledQuad { quad: *quad, color });
            }
            return;
        }

        let foreground = annotation.line_color();
        if text.connect_to_brainordinate != ConnectToBrainordinate::None {
            self.draw_text_connector(annotation, text, quad, line_width, ctx, frame);
        }

        let background = annotation.background_color();
        if background.is_visible() {
            frame.push(Primitive::FilledQuad {
                quad: *quad,
                color: background,
            });
        }

        if text.has_text() {
            frame.push(Primitive::Text {
                text: text.text.clone(),
                anchor,
                height_px: text.font_percent_viewport_size / 100.0 * self.inputs.viewport.height,
                rotation: text.geometry.rotation_angle,
                color: text.text_color,
                alignment: text.horizontal_alignment,
            });
            if foreground.is_visible() {
                frame.push(Primitive::QuadOutline {
                    quad: *quad,
                    color: foreground,
                    width_px: line_width,
                });
            }
        } else {
            let color = if foreground.is_visible() {
                foreground
            } else {
                self.settings.foreground_color
            };
            frame.push(Primitive::QuadOutline {
                quad: *quad,
                color,
                width_px: line_width,
            });
        }
    }

    /// Line or arrow from a surface vertex to text offset from it, ending at
    /// the text's boundary
    fn draw_text_connector(
        &self,
        annotation: &Annotation,
        text: &TextAnnotation,
        quad: &Quad,
        line_width: f64,
        ctx: &ResolveContext<'_>,
        frame: &mut Frame<'_>,
    ) {
        let coordinate = &text.geometry.coordinate;
        let offset = match coordinate.surface_anchor() {
            Some(anchor) if annotation.space() == CoordinateSpace::Surface => anchor.offset_length,
            _ => return,
        };
        if offset <= 0.0 {
            return;
        }

        let (text_point, vertex_point) = match resolve_with_surface_offset(coordinate, ctx) {
            Ok(points) => points,
            Err(e) => {
                debug!("No connector for {}: {}", annotation, e);
                return;
            }
        };
        let end = clip_line_against_quad(quad, vertex_point, text_point);

        let color = if annotation.line_color().is_visible() {
            annotation.line_color()
        } else {
            text.text_color
        };
        frame.push(Primitive::line(vertex_point, end, color, line_width));

        if text.connect_to_brainordinate == ConnectToBrainordinate::Arrow {
            let arrows = build_arrowheads_scaled(
                vertex_point,
                end,
                line_width,
                self.settings.arrow_size_multiple,
                true,
                false,
            );
            for arrow in &arrows {
                frame.push(Primitive::arrowhead(arrow, color));
            }
        }
    }

    fn draw_image(
        &self,
        file_id: Option<Uuid>,
        annotation: &Annotation,
        image: &ImageAnnotation,
        quad: &Quad,
        line_width: f64,
        frame: &mut Frame<'_>,
    ) {
        if frame.picking() {
            let record = selection_record(file_id, annotation, SizingHandle::None, quad.center());
            if let Some(color) = frame.pick_color(record) {
                frame.push(Primitive::FilledQuad { quad: *quad, color });
            }
            return;
        }

        if image.is_valid() {
            frame.push(Primitive::TexturedQuad {
                quad: *quad,
                annotation_id: annotation.id(),
            });
        } else {
            warn!("Image annotation {} has no pixels", annotation.id());
        }

        let foreground = annotation.line_color();
        if foreground.is_visible() {
            frame.push(Primitive::QuadOutline {
                quad: *quad,
                color: foreground,
                width_px: line_width,
            });
        }
    }

    /// Color bar from bottom to top: palette sections, tick marks reaching
    /// down into the sections, then numeric labels.
    fn draw_color_bar(
        &self,
        file_id: Option<Uuid>,
        annotation: &Annotation,
        bar: &ColorBarAnnotation,
        quad: &Quad,
        frame: &mut Frame<'_>,
    ) {
        if frame.picking() {
            let record = selection_record(file_id, annotation, SizingHandle::None, quad.center());
            if let Some(color) = frame.pick_color(record) {
                frame.push(Primitive::FilledQuad { quad: *quad, color });
            }
            return;
        }

        let background = annotation.background_color();
        if background.is_visible() {
            frame.push(Primitive::FilledQuad {
                quad: expand_box(quad, 2.0, 0.0),
                color: background,
            });
        }

        let viewport_height = self.inputs.viewport.height;
        let total_px = viewport_height * (bar.geometry.height / 100.0);
        let ticks_px = viewport_height * (bar.geometry.height * COLOR_BAR_TICK_FRACTION / 100.0);
        let text_px = viewport_height * (bar.font_percent_viewport_size / 100.0);
        let sections_px = total_px - (text_px + COLOR_BAR_TEXT_OFFSET + ticks_px);

        self.draw_color_bar_sections(bar, quad, sections_px, frame);
        self.draw_color_bar_labels(bar, quad, text_px, frame);
        self.draw_color_bar_ticks(bar, quad, 2.0 * ticks_px, sections_px - ticks_px, frame);
    }

    fn draw_color_bar_sections(
        &self,
        bar: &ColorBarAnnotation,
        quad: &Quad,
        sections_px: f64,
        frame: &mut Frame<'_>,
    ) {
        let up = quad.height_unit() * sections_px;
        let bottom_left = quad.bottom_left;
        let top_left = quad.bottom_left + up;
        let across = quad.bottom_right - quad.bottom_left;

        let (min, max) = bar.scalar_range();
        let range = max - min;
        let normalize = |scalar: f64| {
            if range > 0.0 {
                (scalar - min) / range
            } else {
                scalar
            }
        };

        let mut vertices = Vec::new();
        let mut colors = Vec::new();
        let mut lines = Vec::new();
        for section in &bar.sections {
            let start = normalize(section.start_scalar);
            let end = normalize(section.end_scalar);
            let bl = bottom_left + across * start;
            let tl = top_left + across * start;

            if section.start_scalar == section.end_scalar {
                lines.push(Primitive::line(bl, tl, section.start_color, 1.0));
            } else {
                let br = bottom_left + across * end;
                let tr = top_left + across * end;
                vertices.extend_from_slice(&[bl, br, tl, tl, br, tr]);
                colors.extend_from_slice(&[
                    section.start_color,
                    section.end_color,
                    section.start_color,
                    section.start_color,
                    section.end_color,
                    section.end_color,
                ]);
            }
        }

        if !vertices.is_empty() {
            frame.push(Primitive::ShadedTriangles { vertices, colors });
        }
        for line in lines {
            frame.push(line);
        }
    }

    fn draw_color_bar_labels(
        &self,
        bar: &ColorBarAnnotation,
        quad: &Quad,
        text_px: f64,
        frame: &mut Frame<'_>,
    ) {
        let top = quad.bottom_left + quad.height_unit() * (quad.height() - COLOR_BAR_TEXT_OFFSET);
        let across = quad.top_right - quad.top_left;
        let z = quad.mean_depth();

        for label in &bar.labels {
            let mut anchor = top + across * label.scalar;
            anchor.z = z;
            frame.push(Primitive::Text {
                text: label.text.clone(),
                anchor,
                height_px: text_px,
                rotation: bar.geometry.rotation_angle,
                color: bar.text_color,
                alignment: label.alignment,
            });
        }
    }

    fn draw_color_bar_ticks(
        &self,
        bar: &ColorBarAnnotation,
        quad: &Quad,
        height_px: f64,
        offset_px: f64,
        frame: &mut Frame<'_>,
    ) {
        if !bar.show_tick_marks || height_px < 1.0 || bar.labels.is_empty() {
            return;
        }

        let shrunk = expand_box(quad, -COLOR_BAR_TICK_THICKNESS / 2.0, 0.0);
        let up = shrunk.height_unit();
        let base = shrunk.bottom_left + up * offset_px;
        let top = base + up * height_px;
        let across = shrunk.top_right - shrunk.top_left;

        let segments = bar
            .labels
            .iter()
            .map(|label| (top + across * label.scalar, base + across * label.scalar))
            .collect();
        frame.push(Primitive::Lines {
            segments,
            color: bar.text_color,
            width_px: COLOR_BAR_TICK_THICKNESS,
        });
    }

    /// Sizing handles of an annotation being edited. In picking mode each
    /// handle is its own candidate.
    fn draw_handles(
        &self,
        file_id: Option<Uuid>,
        annotation: &Annotation,
        layout: &HandleLayout,
        frame: &mut Frame<'_>,
    ) {
        let handles = layout
            .handles
            .iter()
            .filter(|placed| annotation.is_handle_valid(placed.handle));

        if frame.picking() {
            for placed in handles {
                let record = selection_record(file_id, annotation, placed.handle, placed.center);
                if let Some(color) = frame.pick_color(record) {
                    frame.push(Primitive::FilledQuad {
                        quad: placed.square(),
                        color,
                    });
                }
            }
            return;
        }

        let color = self.selection_color();
        let style = self.handle_style();
        if let Some(selection_box) = layout.selection_box {
            frame.push(Primitive::QuadOutline {
                quad: selection_box,
                color,
                width_px: style.line_width,
            });
        }
        if let Some((from, to)) = layout.rotation_connector {
            if annotation.is_handle_valid(SizingHandle::Rotation) {
                frame.push(Primitive::line(from, to, color, style.line_width));
            }
        }
        for placed in handles {
            if let Some(glyph) = placed.handle.glyph() {
                frame.push(Primitive::Handle {
                    glyph,
                    square: placed.square(),
                    color,
                });
            }
        }
    }
}

fn selection_record(
    file_id: Option<Uuid>,
    annotation: &Annotation,
    handle: SizingHandle,
    point: DVec3,
) -> SelectionRecord {
    SelectionRecord {
        file_id,
        annotation_id: annotation.id(),
        handle,
        point,
    }
}
