//! Error handling for AnnoKit
//!
//! Provides error types for each layer of annotation processing:
//! - Resolve errors (coordinate space context, camera projection)
//! - Modification errors (rejected interactive edits)
//! - Annotation errors (construction and validation)
//!
//! None of these are fatal. A resolve error skips the annotation for one
//! frame and a modification error leaves the annotation untouched.

use crate::space::CoordinateSpace;
use thiserror::Error;

/// Failure to map a stored coordinate into drawing space
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// Missing or mismatched surface, slice plane or space context
    #[error("Invalid space context: {reason}")]
    InvalidSpaceContext {
        /// Why the coordinate cannot be resolved in this frame.
        reason: String,
    },

    /// The camera could not project a resolvable model-space point
    #[error("Projection failed for model point ({x:.3}, {y:.3}, {z:.3})")]
    ProjectionFailure {
        /// Model X.
        x: f64,
        /// Model Y.
        y: f64,
        /// Model Z.
        z: f64,
    },
}

impl ResolveError {
    pub fn invalid_context(reason: impl Into<String>) -> Self {
        Self::InvalidSpaceContext {
            reason: reason.into(),
        }
    }
}

/// Reason an interactive edit was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModificationError {
    /// The handle is not valid for the annotation's dimensionality and space
    #[error(
        "Sizing handle {handle} is not valid for a {dimensionality} annotation \
         in {space} space"
    )]
    InvalidHandle {
        /// The rejected handle.
        handle: String,
        /// "one-dimensional" or "two-dimensional".
        dimensionality: String,
        /// The annotation's coordinate space.
        space: CoordinateSpace,
    },

    /// No model or surface target under the cursor
    #[error("No {space} target under the mouse for {handle}")]
    MissingTarget {
        /// The handle being dragged.
        handle: String,
        /// The space of the missing target.
        space: CoordinateSpace,
    },

    /// Surface target is on a different mesh than the anchor it must match
    #[error(
        "Surface mismatch: expected {expected_structure} with {expected_vertex_count} vertices, \
         got {structure} with {vertex_count}"
    )]
    SurfaceMismatch {
        /// The coordinate's structure.
        expected_structure: String,
        /// The coordinate's vertex count.
        expected_vertex_count: usize,
        /// The target's structure.
        structure: String,
        /// The target's vertex count.
        vertex_count: usize,
    },

    /// A percentage coordinate would leave [0,100]
    #[error("Constraint violation: {axis} would be {value:.3}, outside [0, 100]")]
    ConstraintViolation {
        /// The axis that left the range, e.g. "start.x".
        axis: String,
        /// The rejected value.
        value: f64,
    },

    /// A resize would collapse the shape
    #[error("Degenerate size {width:.3} x {height:.3}")]
    DegenerateSize {
        /// Rejected width percentage.
        width: f64,
        /// Rejected height percentage.
        height: f64,
    },

    /// The handle and space combination has no effect
    #[error("Unsupported modification of {handle} in {space} space")]
    Unsupported {
        /// The handle being dragged.
        handle: String,
        /// The annotation's coordinate space.
        space: CoordinateSpace,
    },
}

impl ModificationError {
    /// Check if this is a percentage range violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }
}

/// Invalid annotation construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnotationError {
    /// A coordinate's space differs from the annotation's space
    #[error("Coordinate in {actual} space cannot be used by a {expected} annotation")]
    SpaceMismatch {
        /// The annotation's space.
        expected: CoordinateSpace,
        /// The coordinate's space.
        actual: CoordinateSpace,
    },

    /// A percentage coordinate outside [0,100]
    #[error("Percentage coordinate {value:.3} outside [0, 100]")]
    PercentageOutOfRange {
        /// The offending value.
        value: f64,
    },

    /// Tab or window index beyond the supported count
    #[error("{kind} index {index} out of range (max {max})")]
    IndexOutOfRange {
        /// "tab" or "window".
        kind: String,
        /// The offending index.
        index: usize,
        /// The exclusive limit.
        max: usize,
    },

    /// Negative size or other invalid attribute
    #[error("Invalid annotation attribute '{name}': {reason}")]
    InvalidAttribute {
        /// The attribute name.
        name: String,
        /// The reason the value is invalid.
        reason: String,
    },
}

/// Main error type for AnnoKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Resolve error
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Modification error
    #[error(transparent)]
    Modification(#[from] ModificationError),

    /// Annotation error
    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a resolve error
    pub fn is_resolve_error(&self) -> bool {
        matches!(self, Error::Resolve(_))
    }

    /// Check if this is a modification error
    pub fn is_modification_error(&self) -> bool {
        matches!(self, Error::Modification(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
