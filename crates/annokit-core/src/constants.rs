//! Shared limits and drawing constants

/// Number of browser windows an annotation may belong to
pub const MAX_WINDOWS: usize = 10;

/// Number of browser tabs an annotation may belong to
pub const MAX_TABS: usize = 50;

/// Lower and upper bound of tab and window percentage coordinates
pub const PERCENTAGE_MIN: f64 = 0.0;
pub const PERCENTAGE_MAX: f64 = 100.0;

/// Half slice thickness used when the slice thickness is zero or undefined
pub const DEFAULT_HALF_SLICE_THICKNESS: f64 = 1.0;

/// Offset from a surface vertex applied to newly anchored coordinates
pub const DEFAULT_SURFACE_OFFSET_LENGTH: f64 = 0.0;

/// Width and height in pixels of a sizing handle
pub const SIZING_HANDLE_SIZE: f64 = 5.0;

/// Line width in pixels of the selection box and rotation connector
pub const SIZING_HANDLE_LINE_WIDTH: f64 = 2.0;

/// The rotation handle sits this many handle sizes beyond the top edge
pub const ROTATION_HANDLE_OFFSET_MULTIPLE: f64 = 3.0;

/// Arrowheads extend this many line widths from the line
pub const ARROW_SIZE_MULTIPLE: f64 = 3.0;

/// Tolerance used when intersecting lines with quad edges
pub const LINE_INTERSECTION_TOLERANCE: f64 = 0.01;
