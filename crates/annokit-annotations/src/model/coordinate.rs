use annokit_core::constants::{DEFAULT_SURFACE_OFFSET_LENGTH, PERCENTAGE_MAX, PERCENTAGE_MIN};
use annokit_core::{CoordinateSpace, Structure};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Direction used to push a surface-anchored point off the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceOffsetMode {
    /// From the mesh bounding-box center through the vertex
    #[default]
    Centroid,
    /// Along the vertex normal
    Normal,
}

/// A vertex on a specific surface mesh
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceAnchor {
    pub structure: Structure,
    pub vertex_count: usize,
    pub vertex_index: usize,
    pub offset_length: f64,
    pub offset_mode: SurfaceOffsetMode,
}

impl SurfaceAnchor {
    pub fn new(structure: Structure, vertex_count: usize, vertex_index: usize) -> Self {
        Self {
            structure,
            vertex_count,
            vertex_index,
            offset_length: DEFAULT_SURFACE_OFFSET_LENGTH,
            offset_mode: SurfaceOffsetMode::default(),
        }
    }

    pub fn with_offset(mut self, length: f64, mode: SurfaceOffsetMode) -> Self {
        self.offset_length = length;
        self.offset_mode = mode;
        self
    }

    /// True when this anchor refers to a mesh with the given identity
    pub fn matches_mesh(&self, structure: Structure, vertex_count: usize) -> bool {
        self.structure == structure && self.vertex_count == vertex_count
    }
}

/// Stored position of a coordinate, one variant per native space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CoordinatePosition {
    Chart(DVec3),
    Stereotaxic(DVec3),
    Surface(SurfaceAnchor),
    Tab(DVec3),
    Viewport(DVec3),
    Window(DVec3),
}

impl CoordinatePosition {
    pub fn space(&self) -> CoordinateSpace {
        match self {
            Self::Chart(_) => CoordinateSpace::Chart,
            Self::Stereotaxic(_) => CoordinateSpace::Stereotaxic,
            Self::Surface(_) => CoordinateSpace::Surface,
            Self::Tab(_) => CoordinateSpace::Tab,
            Self::Viewport(_) => CoordinateSpace::Viewport,
            Self::Window(_) => CoordinateSpace::Window,
        }
    }
}

/// One anchor point of an annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationCoordinate {
    position: CoordinatePosition,
    default_surface_offset_length: f64,
    #[serde(skip)]
    modified: bool,
}

impl AnnotationCoordinate {
    pub fn new(position: CoordinatePosition) -> Self {
        Self {
            position,
            default_surface_offset_length: DEFAULT_SURFACE_OFFSET_LENGTH,
            modified: false,
        }
    }

    pub fn chart(x: f64, y: f64, z: f64) -> Self {
        Self::new(CoordinatePosition::Chart(DVec3::new(x, y, z)))
    }

    pub fn stereotaxic(x: f64, y: f64, z: f64) -> Self {
        Self::new(CoordinatePosition::Stereotaxic(DVec3::new(x, y, z)))
    }

    pub fn surface(anchor: SurfaceAnchor) -> Self {
        Self::new(CoordinatePosition::Surface(anchor))
    }

    pub fn tab(x: f64, y: f64, z: f64) -> Self {
        Self::new(CoordinatePosition::Tab(DVec3::new(x, y, z)))
    }

    pub fn viewport(x: f64, y: f64, z: f64) -> Self {
        Self::new(CoordinatePosition::Viewport(DVec3::new(x, y, z)))
    }

    pub fn window(x: f64, y: f64, z: f64) -> Self {
        Self::new(CoordinatePosition::Window(DVec3::new(x, y, z)))
    }

    pub fn position(&self) -> &CoordinatePosition {
        &self.position
    }

    pub fn space(&self) -> CoordinateSpace {
        self.position.space()
    }

    /// XYZ of every space except surface
    pub fn xyz(&self) -> Option<DVec3> {
        match self.position {
            CoordinatePosition::Chart(p)
            | CoordinatePosition::Stereotaxic(p)
            | CoordinatePosition::Tab(p)
            | CoordinatePosition::Viewport(p)
            | CoordinatePosition::Window(p) => Some(p),
            CoordinatePosition::Surface(_) => None,
        }
    }

    /// Replace the XYZ, keeping the space. Returns false for surface coordinates.
    pub fn set_xyz(&mut self, xyz: DVec3) -> bool {
        let slot = match &mut self.position {
            CoordinatePosition::Chart(p)
            | CoordinatePosition::Stereotaxic(p)
            | CoordinatePosition::Tab(p)
            | CoordinatePosition::Viewport(p)
            | CoordinatePosition::Window(p) => p,
            CoordinatePosition::Surface(_) => return false,
        };
        if *slot != xyz {
            *slot = xyz;
            self.modified = true;
        }
        true
    }

    pub fn surface_anchor(&self) -> Option<&SurfaceAnchor> {
        match &self.position {
            CoordinatePosition::Surface(anchor) => Some(anchor),
            _ => None,
        }
    }

    /// Move a surface coordinate to another vertex.
    ///
    /// The offset length becomes this coordinate's default surface offset
    /// length; the offset mode is kept.
    pub fn set_surface_vertex(
        &mut self,
        structure: Structure,
        vertex_count: usize,
        vertex_index: usize,
    ) -> bool {
        let default_offset = self.default_surface_offset_length;
        match &mut self.position {
            CoordinatePosition::Surface(anchor) => {
                let updated = SurfaceAnchor {
                    structure,
                    vertex_count,
                    vertex_index,
                    offset_length: default_offset,
                    offset_mode: anchor.offset_mode,
                };
                if *anchor != updated {
                    *anchor = updated;
                    self.modified = true;
                }
                true
            }
            _ => false,
        }
    }

    pub fn default_surface_offset_length(&self) -> f64 {
        self.default_surface_offset_length
    }

    pub fn set_default_surface_offset_length(&mut self, length: f64) {
        self.default_surface_offset_length = length.max(0.0);
    }

    /// True when a tab or window coordinate has X and Y inside [0,100].
    /// Always true for other spaces.
    pub fn is_within_percentage_range(&self) -> bool {
        match self.position {
            CoordinatePosition::Tab(p) | CoordinatePosition::Window(p) => {
                in_percentage_range(p.x) && in_percentage_range(p.y)
            }
            _ => true,
        }
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn clear_modified(&mut self) {
        self.modified = false;
    }
}

pub(crate) fn in_percentage_range(value: f64) -> bool {
    (PERCENTAGE_MIN..=PERCENTAGE_MAX).contains(&value)
}
