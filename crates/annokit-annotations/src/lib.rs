//! # AnnoKit Annotations
//!
//! Annotation model, coordinate-space resolution, shape bounds, interactive
//! spatial modification and color-coded picking. The drawing pass turns
//! annotations into a backend-neutral display list; the software pick
//! target rasterizes picking lists so selection works without a GPU.

pub mod bounds;
pub mod display_list;
pub mod drawing;
pub mod geometry;
pub mod model;
pub mod modification;
pub mod picking;
pub mod projection;
pub mod raster;
pub mod resolver;
pub mod services;
pub mod viewport;

pub use bounds::shape_bounds;
pub use display_list::{DrawList, Primitive};
pub use drawing::{AnnotationDrawingPass, PassInputs, PassMode, PassOutput};
pub use geometry::{
    build_arrowheads, clip_line_against_quad, expand_box, line_intersection_2d, quad_center,
    rotate_quad, sizing_handle_layout_1d, sizing_handle_layout_2d, HandleLayout, HandleStyle,
    PlacedHandle, Quad,
};
pub use model::{
    Annotation, AnnotationCoordinate, AnnotationFile, AnnotationKind, AnnotationShape,
    AnnotationType, ColorBarAnnotation, ColorBarLabel, ColorBarPositionMode, ColorBarSection,
    ConnectToBrainordinate, CoordinatePosition, Dimensionality, DisplayGroup,
    DisplayGroupSelection, HandleGlyph, HorizontalAlignment, ImageAnnotation, LineAnnotation,
    SizingHandle, SurfaceAnchor, SurfaceOffsetMode, TextAnnotation, TwoDimGeometry,
    VerticalAlignment,
};
pub use modification::{SpatialModificationRequest, SurfaceTarget};
pub use picking::{
    decode_color, encode_ordinal, AnnotationIdentification, PickHit, PickingSession,
    SelectionRecord,
};
pub use projection::{FixedAdvanceTextMeasurer, MatrixProjection, MeshSurface};
pub use raster::SoftPickTarget;
pub use resolver::{resolve, resolve_annotation, ResolveContext, SliceContext, SlicePlane};
pub use services::{CameraProjection, PickReadback, SurfaceMesh, TextMeasurer};
pub use viewport::Viewport;
