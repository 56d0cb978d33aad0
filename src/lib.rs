//! # AnnoKit
//!
//! Annotation placement, editing and selection for 3-D scientific
//! visualization:
//! - Annotations anchored in stereotaxic, chart, surface, tab, window or
//!   viewport coordinates resolved to one drawing space
//! - Interactive move, resize and rotate through sizing handles, with tab
//!   and window percentages kept inside [0,100]
//! - Color-coded picking of annotations and their handles
//!
//! ## Architecture
//!
//! AnnoKit is organized as a workspace with multiple crates:
//!
//! 1. **annokit-core** - Errors, coordinate spaces, colors, constants
//! 2. **annokit-settings** - Drawing and picking configuration files
//! 3. **annokit-annotations** - Model, resolver, bounds, modification,
//!    drawing pass, picking and the software pick target
//! 4. **annokit** - Re-exports, logging setup and a headless demo binary

pub use annokit_annotations::{
    bounds, display_list, drawing, geometry, model, modification, picking, projection, raster,
    resolver, services, viewport,
};

pub use annokit_core::{
    AnnotationError, CoordinateSpace, Error, ModificationError, ResolveError, Result, Rgba,
    SpaceClass, Structure,
};

pub use annokit_annotations::{
    Annotation, AnnotationCoordinate, AnnotationDrawingPass, AnnotationFile,
    AnnotationIdentification, AnnotationKind, DrawList, FixedAdvanceTextMeasurer,
    MatrixProjection, MeshSurface, PassInputs, PassMode, PassOutput, PickingSession, Primitive,
    Quad, SelectionRecord, SizingHandle, SoftPickTarget, SpatialModificationRequest, Viewport,
};

pub use annokit_settings::{Config, DrawingSettings, PickingSettings, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
