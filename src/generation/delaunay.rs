//! Incremental Delaunay triangulation (Bowyer–Watson)
//!
//! The triangulation is seeded with an oversized super-triangle enclosing
//! every input site. Sites are inserted one at a time in input order: each
//! insertion removes the triangles whose circumcircle contains the new site
//! and fans new triangles from the boundary of the resulting cavity. Once
//! every site is in, triangles touching the super-triangle are discarded.
//!
//! The bad-triangle search is a linear scan, so construction is O(N²) in the
//! worst case. That is fine for the few hundred sites the automaton caps
//! itself at; a point-location structure would be needed for much larger
//! populations.

use glam::DVec2;
use std::collections::HashMap;

use crate::generation::adjacency::EdgeKey;
use crate::geometry::{circumcircle, orient, Bounds, Circumcircle};

/// Super-triangle margin, in multiples of the enclosed region's largest dimension
const SUPER_TRIANGLE_MARGIN: f64 = 10.0;

/// A counter-clockwise triangle over point indices with its cached circumcircle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    /// Circumcircle, computed once at construction
    pub circumcircle: Circumcircle,
}

impl Triangle {
    /// Build a triangle over `points[a]`, `points[b]`, `points[c]`
    ///
    /// Vertices are reordered to counter-clockwise. Returns `None` when the
    /// three points are collinear.
    pub fn new(points: &[DVec2], a: usize, b: usize, c: usize) -> Option<Self> {
        let (a, b) = if orient(points[a], points[b], points[c]) < 0.0 {
            (b, a)
        } else {
            (a, b)
        };

        let circumcircle = circumcircle(points[a], points[b], points[c])?;
        Some(Self { a, b, c, circumcircle })
    }

    /// Vertex indices in stored (counter-clockwise) order
    #[inline]
    pub fn vertices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }

    /// The three undirected edges
    #[inline]
    pub fn edges(&self) -> [EdgeKey; 3] {
        [
            EdgeKey::new(self.a, self.b),
            EdgeKey::new(self.b, self.c),
            EdgeKey::new(self.c, self.a),
        ]
    }

    #[inline]
    pub fn contains_vertex(&self, index: usize) -> bool {
        self.a == index || self.b == index || self.c == index
    }

    /// The vertex not on `edge`, if `edge` belongs to this triangle
    pub fn opposite(&self, edge: EdgeKey) -> Option<usize> {
        let (u, v) = edge.endpoints();
        if !self.contains_vertex(u) || !self.contains_vertex(v) {
            return None;
        }
        self.vertices().into_iter().find(|&w| w != u && w != v)
    }
}

/// Result of triangulating a site list
#[derive(Debug, Clone, Default)]
pub struct Triangulation {
    /// Input sites followed by the three super-triangle vertices
    pub points: Vec<DVec2>,
    /// Delaunay triangles over real sites only
    pub triangles: Vec<Triangle>,
    /// Number of real sites (indices below this are real)
    pub site_count: usize,
    /// Indices of the super-triangle vertices within `points`
    pub super_vertices: [usize; 3],
    /// Candidate triangles skipped because their vertices were collinear
    pub degenerate_skipped: usize,
}

impl Triangulation {
    /// The real sites, without the super-triangle vertices
    #[inline]
    pub fn real_points(&self) -> &[DVec2] {
        &self.points[..self.site_count]
    }

    #[inline]
    pub fn is_super_vertex(&self, index: usize) -> bool {
        self.super_vertices.contains(&index)
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Triangulate `points`, enclosing them in a super-triangle sized to their bounding box
pub fn build_triangulation(points: &[DVec2]) -> Triangulation {
    build_triangulation_within(points, &Bounds::enclosing(points))
}

/// Triangulate `points`, enclosing `region` (typically the canvas) in the super-triangle
///
/// Every input point must lie inside `region`.
pub fn build_triangulation_within(points: &[DVec2], region: &Bounds) -> Triangulation {
    let site_count = points.len();
    let mut pts = Vec::with_capacity(site_count + 3);
    pts.extend_from_slice(points);

    let super_vertices = push_super_triangle(&mut pts, region);
    let [s0, s1, s2] = super_vertices;

    let mut triangles = Vec::with_capacity(2 * site_count + 1);
    match Triangle::new(&pts, s0, s1, s2) {
        Some(t) => triangles.push(t),
        None => log::warn!("degenerate super-triangle for region {:?}", region),
    }

    let mut degenerate_skipped = 0;
    let mut edge_count: HashMap<EdgeKey, u32> = HashMap::new();
    let mut boundary: Vec<EdgeKey> = Vec::new();

    for (pi, &p) in points.iter().enumerate() {
        edge_count.clear();
        boundary.clear();

        // Partition into bad (circumcircle contains p) and kept triangles
        let mut kept = Vec::with_capacity(triangles.len() + 2);
        for t in triangles.drain(..) {
            if t.circumcircle.contains(p) {
                for edge in t.edges() {
                    *edge_count.entry(edge).or_insert(0) += 1;
                }
            } else {
                kept.push(t);
            }
        }
        triangles = kept;

        // Cavity boundary: edges seen exactly once among the bad triangles
        boundary.extend(
            edge_count
                .iter()
                .filter(|&(_, &n)| n == 1)
                .map(|(&edge, _)| edge),
        );
        boundary.sort_unstable();

        for &edge in &boundary {
            let (u, v) = edge.endpoints();
            match Triangle::new(&pts, u, v, pi) {
                Some(t) => triangles.push(t),
                None => {
                    degenerate_skipped += 1;
                    log::warn!(
                        "skipping degenerate triangle ({}, {}, {}) during Delaunay construction",
                        u,
                        v,
                        pi
                    );
                }
            }
        }
    }

    triangles.retain(|t| !super_vertices.iter().any(|&s| t.contains_vertex(s)));

    Triangulation {
        points: pts,
        triangles,
        site_count,
        super_vertices,
        degenerate_skipped,
    }
}

/// Append the super-triangle vertices and return their indices
fn push_super_triangle(points: &mut Vec<DVec2>, region: &Bounds) -> [usize; 3] {
    let margin = region.max_dimension().max(1.0) * SUPER_TRIANGLE_MARGIN;
    let c = region.center();

    let base = points.len();
    points.push(DVec2::new(c.x, c.y - margin));
    points.push(DVec2::new(c.x - margin, c.y + margin));
    points.push(DVec2::new(c.x + margin, c.y + margin));

    [base, base + 1, base + 2]
}
