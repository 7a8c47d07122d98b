//! Planar geometry primitives
//!
//! Orientation, circumcircle construction and containment, an axis-aligned
//! bounds rectangle, and Liang–Barsky segment clipping. Everything here is
//! pure math over `glam::DVec2`.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance shared by the degeneracy and containment tests
pub const EPSILON: f64 = 1e-9;

/// Twice the signed area of triangle `abc`: `(b - a) × (c - a)`
///
/// Positive for counter-clockwise order, negative for clockwise, zero when
/// the three points are collinear.
#[inline]
pub fn orient(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b - a).perp_dot(c - a)
}

/// Circle through the three vertices of a triangle
///
/// The radius is kept squared so the in-circle predicate needs no square root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circumcircle {
    /// Circumcenter
    pub center: DVec2,
    /// Squared circumradius
    pub radius_squared: f64,
}

impl Circumcircle {
    /// Whether `p` lies inside or on the circle (within [`EPSILON`])
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        p.distance_squared(self.center) <= self.radius_squared + EPSILON
    }

    /// Circumradius
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius_squared.sqrt()
    }
}

/// Compute the circumcircle of triangle `abc`
///
/// Returns `None` when the points are collinear (or nearly so), since the
/// circumcenter is undefined.
pub fn circumcircle(a: DVec2, b: DVec2, c: DVec2) -> Option<Circumcircle> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < EPSILON {
        return None;
    }

    let a2 = a.length_squared();
    let b2 = b.length_squared();
    let c2 = c.length_squared();

    let center = DVec2::new(
        (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
        (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
    );

    Some(Circumcircle {
        center,
        radius_squared: center.distance_squared(a),
    })
}

/// Axis-aligned rectangle
///
/// The canvas is `Bounds::new(width, height)`, i.e. `[0, W] × [0, H]`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner
    pub min: DVec2,
    /// Maximum corner
    pub max: DVec2,
}

impl Bounds {
    /// Canvas-style bounds anchored at the origin
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            min: DVec2::ZERO,
            max: DVec2::new(width, height),
        }
    }

    /// Bounds from two arbitrary corners
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest bounds enclosing every point
    ///
    /// An empty slice yields degenerate bounds at the origin.
    pub fn enclosing(points: &[DVec2]) -> Self {
        let Some(&first) = points.first() else {
            return Self::new(0.0, 0.0);
        };

        points.iter().fold(Self::from_corners(first, first), |acc, &p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        })
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn max_dimension(&self) -> f64 {
        self.width().max(self.height())
    }

    #[inline]
    pub fn min_dimension(&self) -> f64 {
        self.width().min(self.height())
    }

    /// Whether `p` lies inside or on the boundary
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Clamp `p` component-wise into the rectangle
    #[inline]
    pub fn clamp(&self, p: DVec2) -> DVec2 {
        p.clamp(self.min, self.max)
    }
}

/// Clip segment `p0 → p1` to `bounds` (Liang–Barsky)
///
/// Returns the visible part, or `None` when the segment misses the rectangle.
pub fn clip_segment(p0: DVec2, p1: DVec2, bounds: &Bounds) -> Option<(DVec2, DVec2)> {
    let delta = p1 - p0;
    let p = [-delta.x, delta.x, -delta.y, delta.y];
    let q = [
        p0.x - bounds.min.x,
        bounds.max.x - p0.x,
        p0.y - bounds.min.y,
        bounds.max.y - p0.y,
    ];

    let mut u0: f64 = 0.0;
    let mut u1: f64 = 1.0;

    for (&pi, &qi) in p.iter().zip(q.iter()) {
        if pi.abs() < EPSILON {
            // Parallel to this edge: reject if outside it
            if qi < 0.0 {
                return None;
            }
            continue;
        }

        let t = qi / pi;
        if pi < 0.0 {
            if t > u1 {
                return None;
            }
            u0 = u0.max(t);
        } else {
            if t < u0 {
                return None;
            }
            u1 = u1.min(t);
        }
    }

    Some((p0 + delta * u0, p0 + delta * u1))
}
