//! Coordinate spaces and structures
//!
//! Every annotation stores its coordinates in one native space. The same
//! enumeration is matched by resolution, bounds, spatial modification and
//! the drawing pass so a new space cannot silently fall through.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Native space of an annotation's stored coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSpace {
    /// Chart model coordinates (passed through like stereotaxic)
    Chart,
    /// Stereotaxic (model) XYZ
    Stereotaxic,
    /// Anchored to a vertex of a surface mesh
    Surface,
    /// Percentage [0,100] of the tab's viewport
    Tab,
    /// Raw viewport pixels
    Viewport,
    /// Percentage [0,100] of the window's viewport
    Window,
}

/// How spatial modification treats a coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceClass {
    /// Pixel coordinates, never editable
    Pixel,
    /// Model coordinates set from a stereotaxic target
    Model,
    /// Surface vertex anchor
    Surface,
    /// Tab or window percentages
    Percentage,
}

impl CoordinateSpace {
    /// All spaces in display order
    pub const ALL: [CoordinateSpace; 6] = [
        Self::Chart,
        Self::Stereotaxic,
        Self::Surface,
        Self::Tab,
        Self::Viewport,
        Self::Window,
    ];

    /// Classify this space for spatial modification
    pub fn class(&self) -> SpaceClass {
        match self {
            Self::Viewport => SpaceClass::Pixel,
            Self::Chart | Self::Stereotaxic => SpaceClass::Model,
            Self::Surface => SpaceClass::Surface,
            Self::Tab | Self::Window => SpaceClass::Percentage,
        }
    }

    /// True for tab and window space, whose values lie in [0,100]
    pub fn is_percentage(&self) -> bool {
        self.class() == SpaceClass::Percentage
    }

    /// True when resolved points must go through the camera projection
    pub fn is_model(&self) -> bool {
        matches!(self.class(), SpaceClass::Model | SpaceClass::Surface)
    }
}

impl fmt::Display for CoordinateSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chart => write!(f, "Chart"),
            Self::Stereotaxic => write!(f, "Stereotaxic"),
            Self::Surface => write!(f, "Surface"),
            Self::Tab => write!(f, "Tab"),
            Self::Viewport => write!(f, "Viewport"),
            Self::Window => write!(f, "Window"),
        }
    }
}

impl FromStr for CoordinateSpace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chart" => Ok(Self::Chart),
            "stereotaxic" | "model" => Ok(Self::Stereotaxic),
            "surface" => Ok(Self::Surface),
            "tab" => Ok(Self::Tab),
            "viewport" | "pixels" => Ok(Self::Viewport),
            "window" => Ok(Self::Window),
            _ => Err(format!("Unknown coordinate space: {}", s)),
        }
    }
}

/// Anatomical structure a surface mesh belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Structure {
    CortexLeft,
    CortexRight,
    Cerebellum,
    HippocampusLeft,
    HippocampusRight,
    Invalid,
}

impl Default for Structure {
    fn default() -> Self {
        Self::Invalid
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CortexLeft => write!(f, "CORTEX_LEFT"),
            Self::CortexRight => write!(f, "CORTEX_RIGHT"),
            Self::Cerebellum => write!(f, "CEREBELLUM"),
            Self::HippocampusLeft => write!(f, "HIPPOCAMPUS_LEFT"),
            Self::HippocampusRight => write!(f, "HIPPOCAMPUS_RIGHT"),
            Self::Invalid => write!(f, "INVALID"),
        }
    }
}

impl FromStr for Structure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "CORTEX_LEFT" => Ok(Self::CortexLeft),
            "CORTEX_RIGHT" => Ok(Self::CortexRight),
            "CEREBELLUM" => Ok(Self::Cerebellum),
            "HIPPOCAMPUS_LEFT" => Ok(Self::HippocampusLeft),
            "HIPPOCAMPUS_RIGHT" => Ok(Self::HippocampusRight),
            "INVALID" => Ok(Self::Invalid),
            _ => Err(format!("Unknown structure: {}", s)),
        }
    }
}
