//! Interactive spatial modification
//!
//! Applies one tick of a mouse drag on a sizing handle to an annotation's
//! stored coordinates. Edits are atomic: if any tab or window percentage
//! would leave [0,100] nothing is changed.

use annokit_core::{CoordinateSpace, ModificationError, SpaceClass, Structure};
use glam::{DVec2, DVec3};
use tracing::debug;

use crate::model::{
    in_percentage_range, normalize_degrees, Annotation, AnnotationCoordinate, AnnotationKind,
    AnnotationShape, Dimensionality, LineAnnotation, SizingHandle, SurfaceAnchor, TwoDimGeometry,
};

/// Surface vertex under the mouse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceTarget {
    pub structure: Structure,
    pub vertex_count: usize,
    pub vertex_index: usize,
}

impl SurfaceTarget {
    pub fn new(structure: Structure, vertex_count: usize, vertex_index: usize) -> Self {
        Self {
            structure,
            vertex_count,
            vertex_index,
        }
    }
}

/// One tick of an interactive drag, in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialModificationRequest {
    pub handle: SizingHandle,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub mouse_x: f64,
    pub mouse_y: f64,
    pub mouse_dx: f64,
    pub mouse_dy: f64,
    pub stereotaxic_target: Option<DVec3>,
    pub surface_target: Option<SurfaceTarget>,
    /// Window position of a model or surface anchor, for rotation
    pub anchor_window_xy: Option<DVec2>,
}

impl SpatialModificationRequest {
    pub fn new(handle: SizingHandle, viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            handle,
            viewport_width,
            viewport_height,
            mouse_x: 0.0,
            mouse_y: 0.0,
            mouse_dx: 0.0,
            mouse_dy: 0.0,
            stereotaxic_target: None,
            surface_target: None,
            anchor_window_xy: None,
        }
    }

    /// Current mouse position and its motion since the previous tick
    pub fn with_mouse(mut self, x: f64, y: f64, dx: f64, dy: f64) -> Self {
        self.mouse_x = x;
        self.mouse_y = y;
        self.mouse_dx = dx;
        self.mouse_dy = dy;
        self
    }

    pub fn with_stereotaxic_target(mut self, xyz: DVec3) -> Self {
        self.stereotaxic_target = Some(xyz);
        self
    }

    pub fn with_surface_target(mut self, target: SurfaceTarget) -> Self {
        self.surface_target = Some(target);
        self
    }

    pub fn with_anchor_window_xy(mut self, xy: DVec2) -> Self {
        self.anchor_window_xy = Some(xy);
        self
    }

    fn mouse(&self) -> DVec2 {
        DVec2::new(self.mouse_x, self.mouse_y)
    }

    fn delta(&self) -> DVec2 {
        DVec2::new(self.mouse_dx, self.mouse_dy)
    }

    fn viewport(&self) -> DVec2 {
        DVec2::new(self.viewport_width, self.viewport_height)
    }

    /// Mouse delta as tab or window percentages
    fn delta_percentage(&self) -> DVec2 {
        DVec2::new(
            pixels_to_percentage(self.mouse_dx, self.viewport_width),
            pixels_to_percentage(self.mouse_dy, self.viewport_height),
        )
    }
}

fn pixels_to_percentage(pixels: f64, dimension: f64) -> f64 {
    if dimension > 0.0 {
        100.0 * (pixels / dimension)
    } else {
        0.0
    }
}

/// Apply a drag, returning true when the annotation changed
pub fn apply(annotation: &mut Annotation, request: &SpatialModificationRequest) -> bool {
    match try_apply(annotation, request) {
        Ok(()) => true,
        Err(e) => {
            debug!("Rejected {} drag on {}: {}", request.handle, annotation, e);
            false
        }
    }
}

/// Apply a drag, reporting why it was rejected
pub fn try_apply(
    annotation: &mut Annotation,
    request: &SpatialModificationRequest,
) -> Result<(), ModificationError> {
    let space = annotation.space();
    let handle = request.handle;

    if !annotation.is_handle_valid(handle) {
        return Err(ModificationError::InvalidHandle {
            handle: handle.to_string(),
            dimensionality: annotation.dimensionality().to_string(),
            space,
        });
    }

    match (annotation.dimensionality(), annotation.kind_mut()) {
        (Dimensionality::One, AnnotationKind::Line(line)) => modify_line(space, line, request)?,
        (Dimensionality::Two, kind) => {
            let geometry = kind.two_dim_mut().ok_or_else(|| unsupported(handle, space))?;
            modify_two_dim(space, geometry, request)?
        }
        _ => return Err(unsupported(handle, space)),
    }

    annotation.set_modified();
    Ok(())
}

fn unsupported(handle: SizingHandle, space: CoordinateSpace) -> ModificationError {
    ModificationError::Unsupported {
        handle: handle.to_string(),
        space,
    }
}

fn missing_target(handle: SizingHandle, space: CoordinateSpace) -> ModificationError {
    ModificationError::MissingTarget {
        handle: handle.to_string(),
        space,
    }
}

fn modify_line(
    space: CoordinateSpace,
    line: &mut LineAnnotation,
    request: &SpatialModificationRequest,
) -> Result<(), ModificationError> {
    let handle = request.handle;
    match (space.class(), handle) {
        (SpaceClass::Model, SizingHandle::LineStart | SizingHandle::LineEnd) => {
            let target = request
                .stereotaxic_target
                .ok_or_else(|| missing_target(handle, space))?;
            let coordinate = endpoint_mut(line, handle);
            coordinate.set_xyz(target);
            Ok(())
        }
        (SpaceClass::Surface, SizingHandle::LineStart | SizingHandle::LineEnd) => {
            // Both endpoints must stay on the mesh the start is anchored to
            let reference = line
                .start
                .surface_anchor()
                .copied()
                .ok_or_else(|| unsupported(handle, space))?;
            re_anchor(endpoint_mut(line, handle), &reference, request, space)
        }
        (
            SpaceClass::Percentage,
            SizingHandle::None | SizingHandle::LineStart | SizingHandle::LineEnd,
        ) => translate_line(line, request),
        (SpaceClass::Percentage, SizingHandle::Rotation) => rotate_line(line, request, space),
        _ => Err(unsupported(handle, space)),
    }
}

fn endpoint_mut(line: &mut LineAnnotation, handle: SizingHandle) -> &mut AnnotationCoordinate {
    if handle == SizingHandle::LineStart {
        &mut line.start
    } else {
        &mut line.end
    }
}

fn percentage_xyz(
    coordinate: &AnnotationCoordinate,
    space: CoordinateSpace,
) -> Result<DVec3, ModificationError> {
    coordinate
        .xyz()
        .ok_or_else(|| unsupported(SizingHandle::None, space))
}

fn check_range(axis: &str, value: DVec3) -> Result<(), ModificationError> {
    for (component, v) in [("x", value.x), ("y", value.y)] {
        if !in_percentage_range(v) {
            return Err(ModificationError::ConstraintViolation {
                axis: format!("{}.{}", axis, component),
                value: v,
            });
        }
    }
    Ok(())
}

fn translate_line(
    line: &mut LineAnnotation,
    request: &SpatialModificationRequest,
) -> Result<(), ModificationError> {
    let start = percentage_xyz(&line.start, line.start.space())?;
    let end = percentage_xyz(&line.end, line.end.space())?;
    let delta = request.delta_percentage().extend(0.0);

    let move_start = matches!(request.handle, SizingHandle::None | SizingHandle::LineStart);
    let move_end = matches!(request.handle, SizingHandle::None | SizingHandle::LineEnd);
    let new_start = if move_start { start + delta } else { start };
    let new_end = if move_end { end + delta } else { end };

    check_range("start", new_start)?;
    check_range("end", new_end)?;

    line.start.set_xyz(new_start);
    line.end.set_xyz(new_end);
    Ok(())
}

/// Rotate both endpoints about the midpoint by the angle the mouse swept
/// around it during this tick.
fn rotate_line(
    line: &mut LineAnnotation,
    request: &SpatialModificationRequest,
    space: CoordinateSpace,
) -> Result<(), ModificationError> {
    let viewport = request.viewport();
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Err(unsupported(request.handle, space));
    }

    let start = percentage_xyz(&line.start, space)?;
    let end = percentage_xyz(&line.end, space)?;
    let to_pixels = |p: DVec3| p.truncate() / 100.0 * viewport;
    let p1 = to_pixels(start);
    let p2 = to_pixels(end);
    let mid = (p1 + p2) / 2.0;

    let current = request.mouse() - mid;
    let previous = request.mouse() - request.delta() - mid;
    if current == DVec2::ZERO || previous == DVec2::ZERO {
        return Ok(());
    }
    let angle = current.y.atan2(current.x) - previous.y.atan2(previous.x);
    let rotation = DVec2::from_angle(angle);

    let to_percentage = |p: DVec2, z: f64| {
        let pct = p / viewport * 100.0;
        DVec3::new(pct.x, pct.y, z)
    };
    let new_start = to_percentage(mid + rotation.rotate(p1 - mid), start.z);
    let new_end = to_percentage(mid + rotation.rotate(p2 - mid), end.z);

    check_range("start", new_start)?;
    check_range("end", new_end)?;

    line.start.set_xyz(new_start);
    line.end.set_xyz(new_end);
    Ok(())
}

/// Move `coordinate` to the target vertex if the target mesh matches the
/// one `reference` is anchored to
fn re_anchor(
    coordinate: &mut AnnotationCoordinate,
    reference: &SurfaceAnchor,
    request: &SpatialModificationRequest,
    space: CoordinateSpace,
) -> Result<(), ModificationError> {
    let target = request
        .surface_target
        .ok_or_else(|| missing_target(request.handle, space))?;
    if coordinate.surface_anchor().is_none() {
        return Err(unsupported(request.handle, space));
    }

    if !reference.matches_mesh(target.structure, target.vertex_count) {
        return Err(ModificationError::SurfaceMismatch {
            expected_structure: reference.structure.to_string(),
            expected_vertex_count: reference.vertex_count,
            structure: target.structure.to_string(),
            vertex_count: target.vertex_count,
        });
    }

    coordinate.set_surface_vertex(target.structure, target.vertex_count, target.vertex_index);
    Ok(())
}

fn modify_two_dim(
    space: CoordinateSpace,
    geometry: &mut TwoDimGeometry,
    request: &SpatialModificationRequest,
) -> Result<(), ModificationError> {
    let handle = request.handle;
    match handle {
        SizingHandle::None => move_two_dim(space, geometry, request),
        SizingHandle::Rotation => rotate_two_dim(space, geometry, request),
        h if h.is_box_perimeter() => resize_two_dim(space, geometry, request),
        _ => Err(unsupported(handle, space)),
    }
}

fn move_two_dim(
    space: CoordinateSpace,
    geometry: &mut TwoDimGeometry,
    request: &SpatialModificationRequest,
) -> Result<(), ModificationError> {
    match space.class() {
        SpaceClass::Model => {
            let target = request
                .stereotaxic_target
                .ok_or_else(|| missing_target(request.handle, space))?;
            geometry.coordinate.set_xyz(target);
            Ok(())
        }
        SpaceClass::Surface => {
            let reference = geometry
                .coordinate
                .surface_anchor()
                .copied()
                .ok_or_else(|| unsupported(request.handle, space))?;
            re_anchor(&mut geometry.coordinate, &reference, request, space)
        }
        SpaceClass::Percentage => {
            let xyz = percentage_xyz(&geometry.coordinate, space)?;
            let moved = xyz + request.delta_percentage().extend(0.0);
            check_range("anchor", moved)?;
            geometry.coordinate.set_xyz(moved);
            Ok(())
        }
        SpaceClass::Pixel => Err(unsupported(request.handle, space)),
    }
}

/// Resize from a perimeter handle.
///
/// The mouse delta is taken into the shape's frame, whose width axis is
/// rotated clockwise by the shape's angle. In tab and window space the
/// opposite edge stays put, so the anchor moves by half the growth. Model
/// and surface anchors cannot move, so those shapes grow on both sides.
fn resize_two_dim(
    space: CoordinateSpace,
    geometry: &mut TwoDimGeometry,
    request: &SpatialModificationRequest,
) -> Result<(), ModificationError> {
    let viewport = request.viewport();
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Err(unsupported(request.handle, space));
    }

    let theta = geometry.rotation_angle.to_radians();
    let (sin, cos) = theta.sin_cos();
    let width_axis = DVec2::new(cos, -sin);
    let height_axis = DVec2::new(sin, cos);

    let delta = request.delta();
    let along_width = delta.dot(width_axis);
    let along_height = delta.dot(height_axis);

    let (sx, sy) = request.handle.box_sides();
    let sx = f64::from(sx);
    let sy = f64::from(sy);

    let width_px = geometry.width / 100.0 * viewport.x;
    let height_px = geometry.height / 100.0 * viewport.y;

    match space.class() {
        SpaceClass::Percentage => {
            let new_width_px = width_px + sx * along_width;
            let new_height_px = height_px + sy * along_height;

            let mut shift = DVec2::ZERO;
            if sx != 0.0 {
                shift += width_axis * (along_width / 2.0);
            }
            if sy != 0.0 {
                shift += height_axis * (along_height / 2.0);
            }

            let xyz = percentage_xyz(&geometry.coordinate, space)?;
            let shift_pct = shift / viewport * 100.0;
            let anchor = xyz + shift_pct.extend(0.0);

            let width = new_width_px / viewport.x * 100.0;
            let height = new_height_px / viewport.y * 100.0;
            check_size(width, height)?;
            check_range("anchor", anchor)?;

            geometry.coordinate.set_xyz(anchor);
            geometry.width = width;
            geometry.height = height;
            Ok(())
        }
        SpaceClass::Model | SpaceClass::Surface => {
            let width = (width_px + 2.0 * sx * along_width) / viewport.x * 100.0;
            let height = (height_px + 2.0 * sy * along_height) / viewport.y * 100.0;
            check_size(width, height)?;

            geometry.width = width;
            geometry.height = height;
            Ok(())
        }
        SpaceClass::Pixel => Err(unsupported(request.handle, space)),
    }
}

fn check_size(width: f64, height: f64) -> Result<(), ModificationError> {
    if width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(ModificationError::DegenerateSize { width, height })
    }
}

/// Point the shape's top at the mouse, measured clockwise from +Y
fn rotate_two_dim(
    space: CoordinateSpace,
    geometry: &mut TwoDimGeometry,
    request: &SpatialModificationRequest,
) -> Result<(), ModificationError> {
    let anchor = match space.class() {
        SpaceClass::Percentage => {
            let xyz = percentage_xyz(&geometry.coordinate, space)?;
            xyz.truncate() / 100.0 * request.viewport()
        }
        SpaceClass::Model | SpaceClass::Surface => request
            .anchor_window_xy
            .ok_or_else(|| missing_target(request.handle, space))?,
        SpaceClass::Pixel => return Err(unsupported(request.handle, space)),
    };

    let to_mouse = request.mouse() - anchor;
    if to_mouse == DVec2::ZERO {
        return Ok(());
    }
    geometry.set_rotation_angle(normalize_degrees(to_mouse.x.atan2(to_mouse.y).to_degrees()));
    Ok(())
}
