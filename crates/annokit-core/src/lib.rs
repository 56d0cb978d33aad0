//! # AnnoKit Core
//!
//! Core types, errors, and constants shared by the AnnoKit crates.
//! Provides the coordinate space enumeration used by resolution, bounds,
//! modification and drawing, the brain structure identifiers used by
//! surface-anchored coordinates, and colors.

pub mod color;
pub mod constants;
pub mod error;
pub mod space;

pub use color::Rgba;
pub use error::{
    AnnotationError, Error, ModificationError, ResolveError, Result,
};
pub use space::{CoordinateSpace, SpaceClass, Structure};
