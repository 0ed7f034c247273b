//! Fixed-topology Bezier encoding for chart shapes.
//!
//! Every shape encodes to `M p0` followed by exactly [`SEGMENT_COUNT`] cubic segments and `Z`.
//! Because rectangles, circles and pie wedges share that topology, any two encodings can be
//! interpolated point by point without resampling:
//!
//! - rectangle: one segment per edge (corner to corner, control points on the corners), then a
//!   degenerate closing segment at the top-left corner
//! - circle: four quarter arcs whose endpoints sit on the diagonals, so arc `i` lines up with
//!   rectangle edge `i`, then a degenerate closing segment
//! - wedge: two arcs splitting the sweep, the radius back to the center, a degenerate center
//!   segment and the radius out to the arc start

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use kurbo::{BezPath, PathEl, Point, Vec2};

use crate::{
    foundation::error::{MorphError, MorphResult},
    transition::lerp::{Lerp, lerp_f64},
};

/// Number of cubic segments in every encoded outline.
pub const SEGMENT_COUNT: usize = 5;

/// Quarter-arc control point factor.
pub const ARC_MAGIC: f64 = 0.5519;

/// Looser quarter-arc factor used for the hand-drawn look.
pub const ARC_MAGIC_CARTOON: f64 = 0.4;

/// Smallest wedge sweep in radians; smaller sweeps are widened to this.
pub const MIN_WEDGE_ANGLE: f64 = 0.001;

/// Smallest rectangle side; zero-height bars are widened to this.
pub const MIN_EXTENT: f64 = 0.001;

/// Control-point offset applied to rectangle edges when cartoonized.
pub const CARTOON_WOBBLE: f64 = 2.0;

/// Layout-resolved geometry of one shape, in the owning element's local coordinates.
///
/// Wedge angles follow the pie convention: radians, `0` at twelve o'clock, increasing
/// clockwise.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeSpec {
    /// Axis-aligned rectangle with its top-left corner at `(x, y)`.
    Rect {
        /// Left edge.
        #[serde(default)]
        x: f64,
        /// Top edge.
        #[serde(default)]
        y: f64,
        /// Non-negative width.
        width: f64,
        /// Non-negative height.
        height: f64,
    },
    /// Circle centered at `(cx, cy)`.
    Circle {
        /// Center x.
        #[serde(default)]
        cx: f64,
        /// Center y.
        #[serde(default)]
        cy: f64,
        /// Radius.
        r: f64,
    },
    /// Pie wedge centered at `(cx, cy)` sweeping from `start_angle` to `end_angle`.
    Wedge {
        /// Center x.
        #[serde(default)]
        cx: f64,
        /// Center y.
        #[serde(default)]
        cy: f64,
        /// Radius.
        r: f64,
        /// Start of the sweep.
        #[serde(alias = "startAngle")]
        start_angle: f64,
        /// End of the sweep.
        #[serde(alias = "endAngle")]
        end_angle: f64,
    },
}

impl ShapeSpec {
    /// Check the codec preconditions: finite values, non-negative sizes.
    pub fn validate(&self) -> MorphResult<()> {
        let (kind, values, sizes) = match *self {
            Self::Rect {
                x,
                y,
                width,
                height,
            } => (
                "rect",
                vec![("x", x), ("y", y), ("width", width), ("height", height)],
                vec![("width", width), ("height", height)],
            ),
            Self::Circle { cx, cy, r } => (
                "circle",
                vec![("cx", cx), ("cy", cy), ("r", r)],
                vec![("r", r)],
            ),
            Self::Wedge {
                cx,
                cy,
                r,
                start_angle,
                end_angle,
            } => (
                "wedge",
                vec![
                    ("cx", cx),
                    ("cy", cy),
                    ("r", r),
                    ("start_angle", start_angle),
                    ("end_angle", end_angle),
                ],
                vec![("r", r)],
            ),
        };
        if let Some((name, v)) = values.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(MorphError::geometry(format!(
                "{kind}.{name} must be finite (got {v})"
            )));
        }
        if let Some((name, v)) = sizes.into_iter().find(|(_, v)| *v < 0.0) {
            return Err(MorphError::geometry(format!(
                "{kind}.{name} must be >= 0 (got {v})"
            )));
        }
        Ok(())
    }

    /// The zero-size version of this shape, used as enter-start and exit-end geometry.
    ///
    /// Rectangles keep their baseline (bottom edge), circles their center, wedges their start
    /// angle.
    pub fn collapsed(&self) -> Self {
        match *self {
            Self::Rect {
                x,
                y,
                width,
                height,
            } => Self::Rect {
                x,
                y: y + height,
                width,
                height: 0.0,
            },
            Self::Circle { cx, cy, .. } => Self::Circle { cx, cy, r: 0.0 },
            Self::Wedge {
                cx,
                cy,
                r,
                start_angle,
                ..
            } => Self::Wedge {
                cx,
                cy,
                r,
                start_angle,
                end_angle: start_angle,
            },
        }
    }
}

/// Encode a shape as an SVG path string with [`SEGMENT_COUNT`] cubic segments.
pub fn encode(spec: &ShapeSpec, cartoonize: bool) -> String {
    encode_path(spec, cartoonize).to_svg()
}

/// Encode a shape as a [`BezPath`] with [`SEGMENT_COUNT`] cubic segments.
pub fn encode_path(spec: &ShapeSpec, cartoonize: bool) -> BezPath {
    match *spec {
        ShapeSpec::Rect {
            x,
            y,
            width,
            height,
        } => rect_path(x, y, width, height, cartoonize),
        ShapeSpec::Circle { cx, cy, r } => circle_path(Point::new(cx, cy), r, cartoonize),
        ShapeSpec::Wedge {
            cx,
            cy,
            r,
            start_angle,
            end_angle,
        } => wedge_path(Point::new(cx, cy), r, start_angle, end_angle),
    }
}

/// Parse path data produced by [`encode`] (or any SVG path) back into a [`BezPath`].
pub fn decode(d: &str) -> MorphResult<BezPath> {
    BezPath::from_svg(d).map_err(|e| MorphError::geometry(format!("invalid path data: {e}")))
}

/// Number of cubic segments in `path`.
pub fn segment_count(path: &BezPath) -> usize {
    path.elements()
        .iter()
        .filter(|el| matches!(el, PathEl::CurveTo(..)))
        .count()
}

fn rect_path(x: f64, y: f64, width: f64, height: f64, cartoonize: bool) -> BezPath {
    let w = width.max(MIN_EXTENT);
    let h = height.max(MIN_EXTENT);
    let corners = [
        Point::new(x, y),
        Point::new(x + w, y),
        Point::new(x + w, y + h),
        Point::new(x, y + h),
    ];

    let mut path = BezPath::new();
    path.move_to(corners[0]);
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        if cartoonize {
            let n = outward_normal(a, b) * CARTOON_WOBBLE;
            path.curve_to(a + n, b - n, b);
        } else {
            path.curve_to(a, b, b);
        }
    }
    path.curve_to(corners[0], corners[0], corners[0]);
    path.close_path();
    path
}

// Screen coordinates (y down): corners run clockwise, so the outward side is the left normal.
fn outward_normal(a: Point, b: Point) -> Vec2 {
    let d = b - a;
    let len = d.hypot();
    if len == 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(d.y / len, -d.x / len)
}

fn circle_path(center: Point, r: f64, cartoonize: bool) -> BezPath {
    let k = if cartoonize {
        ARC_MAGIC_CARTOON
    } else {
        ARC_MAGIC
    };
    // Rotated by 45 degrees: arc endpoints sit on the rectangle's corner directions.
    let start = -3.0 * FRAC_PI_4;
    let at = |theta: f64| center + Vec2::new(theta.cos(), theta.sin()) * r;
    let tangent = |theta: f64| Vec2::new(-theta.sin(), theta.cos()) * (k * r);

    let mut path = BezPath::new();
    path.move_to(at(start));
    for i in 0..4 {
        let a0 = start + FRAC_PI_2 * i as f64;
        let a1 = a0 + FRAC_PI_2;
        path.curve_to(at(a0) + tangent(a0), at(a1) - tangent(a1), at(a1));
    }
    let p0 = at(start);
    path.curve_to(p0, p0, p0);
    path.close_path();
    path
}

fn wedge_path(center: Point, r: f64, start_angle: f64, end_angle: f64) -> BezPath {
    let mut sweep = end_angle - start_angle;
    if sweep.abs() < MIN_WEDGE_ANGLE {
        sweep = MIN_WEDGE_ANGLE.copysign(if sweep == 0.0 { 1.0 } else { sweep });
    }
    let half = sweep / 2.0;
    let k = 4.0 / 3.0 * (half / 4.0).tan();
    let at = |a: f64| center + Vec2::new(a.sin(), -a.cos()) * r;
    let tangent = |a: f64| Vec2::new(a.cos(), a.sin()) * (k * r);

    let a0 = start_angle;
    let am = start_angle + half;
    let a1 = start_angle + sweep;

    let mut path = BezPath::new();
    path.move_to(at(a0));
    path.curve_to(at(a0) + tangent(a0), at(am) - tangent(am), at(am));
    path.curve_to(at(am) + tangent(am), at(a1) - tangent(a1), at(a1));
    path.curve_to(at(a1), center, center);
    path.curve_to(center, center, center);
    path.curve_to(center, at(a0), at(a0));
    path.close_path();
    path
}

/// An encoded outline carried inside a snapshot.
///
/// Serializes as SVG path data so it can be bound directly to `d` or a clip path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapePath(BezPath);

impl ShapePath {
    /// Encode `spec` with the fixed topology.
    pub fn encode(spec: &ShapeSpec, cartoonize: bool) -> Self {
        Self(encode_path(spec, cartoonize))
    }

    /// Wrap an existing outline as is.
    pub fn from_bez(path: BezPath) -> Self {
        Self(path)
    }

    /// Borrow the underlying outline.
    pub fn as_bez(&self) -> &BezPath {
        &self.0
    }

    /// SVG path data.
    pub fn to_svg(&self) -> String {
        self.0.to_svg()
    }

    /// Number of drawing segments, see [`segment_count`].
    pub fn segment_count(&self) -> usize {
        segment_count(&self.0)
    }

    /// True when both outlines have the same element sequence.
    pub fn same_topology(&self, other: &Self) -> bool {
        let a = self.0.elements();
        let b = other.0.elements();
        a.len() == b.len()
            && a.iter()
                .zip(b)
                .all(|(x, y)| std::mem::discriminant(x) == std::mem::discriminant(y))
    }

    /// True when every point is finite.
    pub fn is_finite(&self) -> bool {
        self.0.elements().iter().all(|el| match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => p.is_finite(),
            PathEl::QuadTo(p1, p2) => p1.is_finite() && p2.is_finite(),
            PathEl::CurveTo(p1, p2, p3) => p1.is_finite() && p2.is_finite() && p3.is_finite(),
            PathEl::ClosePath => true,
        })
    }

    /// Translate every point by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        let mut path = self.0.clone();
        path.apply_affine(kurbo::Affine::translate(delta));
        Self(path)
    }
}

/// Pointwise interpolation; mismatched topologies fall back to a half-way swap.
impl Lerp for ShapePath {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        if !a.same_topology(b) {
            return crate::transition::lerp::swap(a, b, t).clone();
        }
        let lp = |p: Point, q: Point| Point::new(lerp_f64(p.x, q.x, t), lerp_f64(p.y, q.y, t));
        let els = a
            .0
            .elements()
            .iter()
            .zip(b.0.elements())
            .map(|(x, y)| match (*x, *y) {
                (PathEl::MoveTo(p), PathEl::MoveTo(q)) => PathEl::MoveTo(lp(p, q)),
                (PathEl::LineTo(p), PathEl::LineTo(q)) => PathEl::LineTo(lp(p, q)),
                (PathEl::QuadTo(p1, p2), PathEl::QuadTo(q1, q2)) => {
                    PathEl::QuadTo(lp(p1, q1), lp(p2, q2))
                }
                (PathEl::CurveTo(p1, p2, p3), PathEl::CurveTo(q1, q2, q3)) => {
                    PathEl::CurveTo(lp(p1, q1), lp(p2, q2), lp(p3, q3))
                }
                _ => PathEl::ClosePath,
            })
            .collect::<Vec<_>>();
        Self(BezPath::from_vec(els))
    }
}

impl serde::Serialize for ShapePath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_svg())
    }
}

impl<'de> serde::Deserialize<'de> for ShapePath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let d = String::deserialize(deserializer)?;
        decode(&d).map(Self).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shape/codec.rs"]
mod tests;
