//! Drawing-space geometry helpers
//!
//! Pure functions over window-pixel points: box expansion, clipping a line
//! at a quad's edges, arrowheads and sizing-handle layout. X grows right and
//! Y grows up; Z is carried along as depth.

use annokit_core::constants::{ARROW_SIZE_MULTIPLE, LINE_INTERSECTION_TOLERANCE};
use annokit_settings::DrawingSettings;
use glam::{DVec2, DVec3};
use smallvec::SmallVec;

use crate::model::{HorizontalAlignment, SizingHandle};

/// Four corners in winding order bottom-left, bottom-right, top-right, top-left
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quad {
    pub bottom_left: DVec3,
    pub bottom_right: DVec3,
    pub top_right: DVec3,
    pub top_left: DVec3,
}

impl Quad {
    pub fn new(bottom_left: DVec3, bottom_right: DVec3, top_right: DVec3, top_left: DVec3) -> Self {
        Self {
            bottom_left,
            bottom_right,
            top_right,
            top_left,
        }
    }

    /// Axis-aligned quad centered on `center`
    pub fn centered(center: DVec3, width: f64, height: f64) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self::new(
            center + DVec3::new(-hw, -hh, 0.0),
            center + DVec3::new(hw, -hh, 0.0),
            center + DVec3::new(hw, hh, 0.0),
            center + DVec3::new(-hw, hh, 0.0),
        )
    }

    pub fn corners(&self) -> [DVec3; 4] {
        [
            self.bottom_left,
            self.bottom_right,
            self.top_right,
            self.top_left,
        ]
    }

    pub fn center(&self) -> DVec3 {
        quad_center(self)
    }

    /// Unit vector from the left edge toward the right edge
    pub fn width_unit(&self) -> DVec3 {
        (self.top_right - self.top_left).normalize_or_zero()
    }

    /// Unit vector from the bottom edge toward the top edge
    pub fn height_unit(&self) -> DVec3 {
        (self.top_left - self.bottom_left).normalize_or_zero()
    }

    pub fn width(&self) -> f64 {
        self.top_right.distance(self.top_left)
    }

    pub fn height(&self) -> f64 {
        self.top_left.distance(self.bottom_left)
    }

    pub fn mean_depth(&self) -> f64 {
        self.center().z
    }

    /// Shoelace area in XY, positive for counter-clockwise corners
    pub fn signed_area_2d(&self) -> f64 {
        let c = self.corners();
        let mut twice = 0.0;
        for i in 0..4 {
            let a = c[i];
            let b = c[(i + 1) % 4];
            twice += a.x * b.y - b.x * a.y;
        }
        twice / 2.0
    }

    /// The four edges, each from one corner to the next
    pub fn edges(&self) -> [(DVec3, DVec3); 4] {
        let c = self.corners();
        [(c[0], c[1]), (c[1], c[2]), (c[2], c[3]), (c[3], c[0])]
    }
}

pub fn quad_center(quad: &Quad) -> DVec3 {
    (quad.bottom_left + quad.bottom_right + quad.top_right + quad.top_left) / 4.0
}

/// Move each corner outward by `dx` along the quad's width direction and `dy`
/// along its height direction. Negative values shrink.
pub fn expand_box(quad: &Quad, dx: f64, dy: f64) -> Quad {
    let wu = quad.width_unit();
    let hu = quad.height_unit();
    Quad::new(
        quad.bottom_left - wu * dx - hu * dy,
        quad.bottom_right + wu * dx - hu * dy,
        quad.top_right + wu * dx + hu * dy,
        quad.top_left - wu * dx + hu * dy,
    )
}

/// Rotate each corner about `point` by `degrees` around Z, counter-clockwise
/// positive. Z is unchanged.
pub fn rotate_quad(quad: &Quad, degrees: f64, point: DVec3) -> Quad {
    let rotation = DVec2::from_angle(degrees.to_radians());
    let pivot = point.truncate();
    let rotate = |p: DVec3| {
        let xy = pivot + rotation.rotate(p.truncate() - pivot);
        DVec3::new(xy.x, xy.y, p.z)
    };
    Quad::new(
        rotate(quad.bottom_left),
        rotate(quad.bottom_right),
        rotate(quad.top_right),
        rotate(quad.top_left),
    )
}

/// Intersection in XY of segment `p1`-`p2` with segment `q1`-`q2`.
///
/// Each segment is extended by `tolerance` pixels at both ends. Parallel
/// segments never intersect. The returned Z is the mean of `q1` and `q2`.
pub fn line_intersection_2d(
    p1: DVec3,
    p2: DVec3,
    q1: DVec3,
    q2: DVec3,
    tolerance: f64,
) -> Option<DVec3> {
    let r = (p2 - p1).truncate();
    let s = (q2 - q1).truncate();
    let denom = r.perp_dot(s);
    if denom.abs() < f64::EPSILON {
        return None;
    }

    let qp = (q1 - p1).truncate();
    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;

    let eps_t = if r.length() > 0.0 { tolerance / r.length() } else { 0.0 };
    let eps_u = if s.length() > 0.0 { tolerance / s.length() } else { 0.0 };
    if t < -eps_t || t > 1.0 + eps_t || u < -eps_u || u > 1.0 + eps_u {
        return None;
    }

    let xy = p1.truncate() + r * t;
    Some(DVec3::new(xy.x, xy.y, (q1.z + q2.z) / 2.0))
}

/// Clip `p1`-`p2` where it first crosses the quad's boundary.
///
/// Returns the intersection nearest `p1`, or `p2` when the segment does not
/// cross any edge.
pub fn clip_line_against_quad(quad: &Quad, p1: DVec3, p2: DVec3) -> DVec3 {
    quad.edges()
        .iter()
        .filter_map(|&(q1, q2)| line_intersection_2d(p1, p2, q1, q2, LINE_INTERSECTION_TOLERANCE))
        .min_by(|a, b| {
            let da = a.truncate().distance_squared(p1.truncate());
            let db = b.truncate().distance_squared(p1.truncate());
            da.total_cmp(&db)
        })
        .unwrap_or(p2)
}

/// Three-vertex arrowhead: left tip, point, right tip
pub type Arrowhead = [DVec3; 3];

/// Arrowheads for a line drawn from `head` (the start) to `tail` (the end)
pub fn build_arrowheads(
    head: DVec3,
    tail: DVec3,
    thickness: f64,
    want_start: bool,
    want_end: bool,
) -> SmallVec<[Arrowhead; 2]> {
    build_arrowheads_scaled(head, tail, thickness, ARROW_SIZE_MULTIPLE, want_start, want_end)
}

/// [`build_arrowheads`] with an explicit size multiple of the line thickness
pub fn build_arrowheads_scaled(
    head: DVec3,
    tail: DVec3,
    thickness: f64,
    size_multiple: f64,
    want_start: bool,
    want_end: bool,
) -> SmallVec<[Arrowhead; 2]> {
    let mut arrows = SmallVec::new();
    let length = head.distance(tail);
    if length <= 0.0 {
        return arrows;
    }

    let unit = (head - tail) / length;
    let perp = DVec3::new(unit.y, -unit.x, 0.0);
    let away = size_multiple * thickness;
    let along = (size_multiple * thickness).min(length / 3.0);

    if want_start {
        arrows.push([
            head - perp * away - unit * along,
            head,
            head + perp * away - unit * along,
        ]);
    }
    if want_end {
        arrows.push([
            tail - perp * away + unit * along,
            tail,
            tail + perp * away + unit * along,
        ]);
    }
    arrows
}

/// Sizes used to lay out sizing handles, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleStyle {
    pub size: f64,
    pub line_width: f64,
    pub rotation_offset_multiple: f64,
}

impl Default for HandleStyle {
    fn default() -> Self {
        Self::from(&DrawingSettings::default())
    }
}

impl From<&DrawingSettings> for HandleStyle {
    fn from(settings: &DrawingSettings) -> Self {
        Self {
            size: settings.sizing_handle_size,
            line_width: settings.sizing_handle_line_width,
            rotation_offset_multiple: settings.rotation_handle_offset_multiple,
        }
    }
}

/// A sizing handle placed in drawing space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedHandle {
    pub handle: SizingHandle,
    pub center: DVec3,
    pub half_size: f64,
    /// Counter-clockwise rotation of the glyph in degrees
    pub rotation: f64,
}

impl PlacedHandle {
    /// The handle's square footprint
    pub fn square(&self) -> Quad {
        let quad = Quad::centered(self.center, self.half_size * 2.0, self.half_size * 2.0);
        if self.rotation != 0.0 {
            rotate_quad(&quad, self.rotation, self.center)
        } else {
            quad
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HandleLayout {
    /// Outline drawn around a two-dimensional shape
    pub selection_box: Option<Quad>,
    pub handles: SmallVec<[PlacedHandle; 10]>,
    /// Line from near the rotation handle back to the shape
    pub rotation_connector: Option<(DVec3, DVec3)>,
}

/// Handles around a two-dimensional shape's quad.
///
/// `rotation` is the shape's clockwise angle in degrees. Left and right
/// aligned text put the rotation handle above the matching top corner.
pub fn sizing_handle_layout_2d(
    quad: &Quad,
    rotation: f64,
    style: &HandleStyle,
    text_alignment: Option<HorizontalAlignment>,
) -> HandleLayout {
    let expanded = expand_box(quad, 2.0 + style.line_width / 2.0, 2.0 + style.line_width / 2.0);
    let bl = expanded.bottom_left;
    let br = expanded.bottom_right;
    let tr = expanded.top_right;
    let tl = expanded.top_left;

    let bottom = (bl + br) / 2.0;
    let right = (br + tr) / 2.0;
    let top = (tr + tl) / 2.0;
    let left = (tl + bl) / 2.0;

    let glyph_rotation = -rotation;
    let place = |handle, center| PlacedHandle {
        handle,
        center,
        half_size: style.size,
        rotation: glyph_rotation,
    };

    let mut handles: SmallVec<[PlacedHandle; 10]> = SmallVec::new();
    handles.push(place(SizingHandle::BoxBottomLeft, bl));
    handles.push(place(SizingHandle::BoxBottomRight, br));
    handles.push(place(SizingHandle::BoxTopRight, tr));
    handles.push(place(SizingHandle::BoxTopLeft, tl));
    handles.push(place(SizingHandle::BoxBottom, bottom));
    handles.push(place(SizingHandle::BoxRight, right));
    handles.push(place(SizingHandle::BoxTop, top));
    handles.push(place(SizingHandle::BoxLeft, left));

    let base = match text_alignment {
        Some(HorizontalAlignment::Left) => tl,
        Some(HorizontalAlignment::Right) => tr,
        _ => top,
    };
    let offset = style.rotation_offset_multiple * style.size;
    let up = expanded.height_unit();
    handles.push(place(SizingHandle::Rotation, base + up * offset));

    HandleLayout {
        selection_box: Some(expanded),
        handles,
        rotation_connector: Some((base + up * (offset * 0.75), base)),
    }
}

/// Handles at a line's endpoints and midpoint
pub fn sizing_handle_layout_1d(
    first: DVec3,
    second: DVec3,
    line_width: f64,
    style: &HandleStyle,
) -> HandleLayout {
    let size = 3.0 + line_width;
    let dir = (second - first).normalize_or_zero();

    let dx = second.x - first.x;
    let dy = second.y - first.y;
    let rotation = if dx != 0.0 && dy != 0.0 {
        dx.atan2(dy).to_degrees()
    } else {
        0.0
    };

    let mut handles: SmallVec<[PlacedHandle; 10]> = SmallVec::new();
    handles.push(PlacedHandle {
        handle: SizingHandle::LineStart,
        center: first - dir * size,
        half_size: size + 2.0,
        rotation,
    });
    handles.push(PlacedHandle {
        handle: SizingHandle::LineEnd,
        center: second + dir * size,
        half_size: size,
        rotation,
    });
    handles.push(PlacedHandle {
        handle: SizingHandle::Rotation,
        center: (first + second) / 2.0,
        half_size: style.size,
        rotation,
    });

    HandleLayout {
        selection_box: None,
        handles,
        rotation_connector: None,
    }
}
