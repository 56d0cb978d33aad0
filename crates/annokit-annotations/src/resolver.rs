//! Coordinate space resolution
//!
//! Maps a stored [`AnnotationCoordinate`] to a drawing-space point: viewport
//! pixels with the origin at the bottom left and a depth in Z. Model and
//! surface points go through the camera; tab and window percentages are
//! scaled by the viewport; viewport pixels pass through.
//!
//! Resolution never mutates an annotation. A failed resolution only means
//! the annotation is skipped for the current frame.

use annokit_core::constants::DEFAULT_HALF_SLICE_THICKNESS;
use annokit_core::ResolveError;
use glam::DVec3;
use smallvec::SmallVec;
use tracing::{error, trace};

use crate::model::{
    Annotation, AnnotationCoordinate, AnnotationShape, CoordinatePosition, SurfaceAnchor,
    SurfaceOffsetMode,
};
use crate::services::{CameraProjection, SurfaceMesh};
use crate::viewport::Viewport;

/// Plane `normal . p + d = 0` of a volume slice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlicePlane {
    pub normal: DVec3,
    pub d: f64,
}

impl SlicePlane {
    pub fn new(normal: DVec3, d: f64) -> Self {
        Self { normal, d }
    }

    /// Plane through `point` with the given normal
    pub fn through(point: DVec3, normal: DVec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            d: -normal.dot(point),
        }
    }

    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) + self.d
    }
}

/// The slice being drawn when a volume is cut
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceContext {
    pub plane: SlicePlane,
    /// Slice thickness in model units, zero when undefined
    pub thickness: f64,
}

impl SliceContext {
    pub fn new(plane: SlicePlane, thickness: f64) -> Self {
        Self { plane, thickness }
    }

    pub fn half_thickness(&self, default_half: f64) -> f64 {
        if self.thickness > 0.0 {
            self.thickness / 2.0
        } else {
            default_half
        }
    }

    pub fn contains(&self, point: DVec3, default_half: f64) -> bool {
        self.plane.signed_distance(point).abs() < self.half_thickness(default_half)
    }
}

/// Per-frame state needed to resolve coordinates
#[derive(Clone, Copy)]
pub struct ResolveContext<'a> {
    pub viewport: Viewport,
    pub camera: Option<&'a dyn CameraProjection>,
    pub surface: Option<&'a dyn SurfaceMesh>,
    pub slice: Option<SliceContext>,
    pub default_half_slice_thickness: f64,
}

impl<'a> ResolveContext<'a> {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            camera: None,
            surface: None,
            slice: None,
            default_half_slice_thickness: DEFAULT_HALF_SLICE_THICKNESS,
        }
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

    pub fn with_default_half_slice_thickness(mut self, half: f64) -> Self {
        self.default_half_slice_thickness = half;
        self
    }
}

/// Resolve one coordinate into drawing space
pub fn resolve(
    coordinate: &AnnotationCoordinate,
    ctx: &ResolveContext<'_>,
) -> Result<DVec3, ResolveError> {
    let point = match coordinate.position() {
        CoordinatePosition::Stereotaxic(xyz) => {
            check_slice(*xyz, ctx)?;
            project(*xyz, ctx)?
        }
        CoordinatePosition::Chart(xyz) => project(*xyz, ctx)?,
        CoordinatePosition::Surface(anchor) => {
            let (offset_point, _) = surface_points(anchor, ctx)?;
            project(offset_point, ctx)?
        }
        CoordinatePosition::Tab(pct) | CoordinatePosition::Window(pct) => {
            ctx.viewport.percentage_to_pixels(*pct)
        }
        CoordinatePosition::Viewport(xyz) => *xyz,
    };
    trace!(space = %coordinate.space(), ?point, "Resolved coordinate");
    Ok(point)
}

/// Resolve a surface coordinate to both its offset position and its vertex.
///
/// Returns `(offset, vertex)` in drawing space. Other spaces resolve to the
/// same point twice.
pub fn resolve_with_surface_offset(
    coordinate: &AnnotationCoordinate,
    ctx: &ResolveContext<'_>,
) -> Result<(DVec3, DVec3), ResolveError> {
    match coordinate.position() {
        CoordinatePosition::Surface(anchor) => {
            let (offset_point, vertex) = surface_points(anchor, ctx)?;
            Ok((project(offset_point, ctx)?, project(vertex, ctx)?))
        }
        _ => {
            let point = resolve(coordinate, ctx)?;
            Ok((point, point))
        }
    }
}

/// Resolve every anchor of an annotation, failing if any one fails
pub fn resolve_annotation(
    annotation: &Annotation,
    ctx: &ResolveContext<'_>,
) -> Result<SmallVec<[DVec3; 2]>, ResolveError> {
    annotation
        .anchor_coordinates()
        .into_iter()
        .map(|coordinate| {
            if coordinate.space() != annotation.space() {
                return Err(ResolveError::invalid_context(format!(
                    "coordinate in {} space on a {} annotation",
                    coordinate.space(),
                    annotation.space()
                )));
            }
            resolve(coordinate, ctx)
        })
        .collect()
}

fn check_slice(xyz: DVec3, ctx: &ResolveContext<'_>) -> Result<(), ResolveError> {
    match ctx.slice {
        Some(slice) if !slice.contains(xyz, ctx.default_half_slice_thickness) => {
            Err(ResolveError::invalid_context(format!(
                "point {:.2} from slice plane exceeds half thickness {:.2}",
                slice.plane.signed_distance(xyz),
                slice.half_thickness(ctx.default_half_slice_thickness)
            )))
        }
        _ => Ok(()),
    }
}

/// Model-space offset point and vertex of a surface anchor
fn surface_points(
    anchor: &SurfaceAnchor,
    ctx: &ResolveContext<'_>,
) -> Result<(DVec3, DVec3), ResolveError> {
    let surface = ctx
        .surface
        .ok_or_else(|| ResolveError::invalid_context("no surface displayed"))?;

    if !anchor.matches_mesh(surface.structure(), surface.vertex_count()) {
        return Err(ResolveError::invalid_context(format!(
            "anchored to {} with {} vertices, displayed surface is {} with {}",
            anchor.structure,
            anchor.vertex_count,
            surface.structure(),
            surface.vertex_count()
        )));
    }

    let vertex = surface.vertex_position(anchor.vertex_index).ok_or_else(|| {
        ResolveError::invalid_context(format!(
            "vertex {} out of range for {} vertices",
            anchor.vertex_index,
            surface.vertex_count()
        ))
    })?;

    if anchor.offset_length <= 0.0 {
        return Ok((vertex, vertex));
    }

    let mode = if surface.is_flat() {
        SurfaceOffsetMode::Normal
    } else {
        anchor.offset_mode
    };
    let unit = match mode {
        SurfaceOffsetMode::Centroid => (vertex - surface.bounding_box_center()).normalize_or_zero(),
        SurfaceOffsetMode::Normal => surface
            .vertex_normal(anchor.vertex_index)
            .map(DVec3::normalize_or_zero)
            .unwrap_or(DVec3::ZERO),
    };

    Ok((vertex + unit * anchor.offset_length, vertex))
}

fn project(xyz: DVec3, ctx: &ResolveContext<'_>) -> Result<DVec3, ResolveError> {
    let camera = ctx
        .camera
        .ok_or_else(|| ResolveError::invalid_context("no camera for model space"))?;

    match camera.project_model_to_window(xyz) {
        Some(window) => Ok(DVec3::new(
            window.x - ctx.viewport.x,
            window.y - ctx.viewport.y,
            window.z,
        )),
        None => {
            error!(
                "Failed to project model point ({:.3}, {:.3}, {:.3}) to window",
                xyz.x, xyz.y, xyz.z
            );
            Err(ResolveError::ProjectionFailure {
                x: xyz.x,
                y: xyz.y,
                z: xyz.z,
            })
        }
    }
}
