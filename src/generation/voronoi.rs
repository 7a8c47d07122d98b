//! Voronoi edges for rendering
//!
//! Each Delaunay edge is dual to one Voronoi edge. An interior edge (two
//! incident triangles) maps to the segment between the two circumcenters. A
//! hull edge maps to an unbounded ray leaving its triangle's circumcenter
//! along the edge normal, pointing away from the triangle. Both are clipped
//! to the canvas.

use glam::DVec2;

use crate::generation::adjacency::{Adjacency, EdgeKey};
use crate::generation::delaunay::Triangulation;
use crate::geometry::{clip_segment, Bounds};

/// Ray length as a multiple of the canvas' largest dimension
const RAY_LENGTH_FACTOR: f64 = 4.0;

/// Whether a Voronoi edge is bounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Between two circumcenters
    Finite,
    /// Unbounded ray dual to a hull edge
    Ray,
}

/// One clipped Voronoi edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoronoiEdge {
    /// The pair of sites this edge separates
    pub sites: EdgeKey,
    pub start: DVec2,
    pub end: DVec2,
    pub kind: EdgeKind,
}

impl VoronoiEdge {
    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

/// Clipped Voronoi edges for every Delaunay edge in `adjacency`
///
/// Edges entirely outside `bounds` are omitted.
pub fn voronoi_edges(
    triangulation: &Triangulation,
    adjacency: &Adjacency,
    bounds: &Bounds,
) -> Vec<VoronoiEdge> {
    let tris = &triangulation.triangles;
    let mut edges = Vec::with_capacity(adjacency.edge_triangles.len());

    for (edge, [t0, t1]) in adjacency.interior_edges() {
        let a = tris[t0].circumcircle.center;
        let b = tris[t1].circumcircle.center;

        if let Some((start, end)) = clip_segment(a, b, bounds) {
            edges.push(VoronoiEdge {
                sites: edge,
                start,
                end,
                kind: EdgeKind::Finite,
            });
        }
    }

    let ray_length = bounds.max_dimension() * RAY_LENGTH_FACTOR;

    for (edge, ti) in adjacency.hull_edges() {
        let triangle = &tris[ti];
        let Some(w) = triangle.opposite(edge) else {
            continue;
        };

        let (u, v) = edge.endpoints();
        let pts = &triangulation.points;
        let direction = outward_normal(pts[u], pts[v], pts[w]);
        let origin = triangle.circumcircle.center;

        if let Some((start, end)) = clip_segment(origin, origin + direction * ray_length, bounds) {
            edges.push(VoronoiEdge {
                sites: edge,
                start,
                end,
                kind: EdgeKind::Ray,
            });
        }
    }

    edges
}

/// Unit normal of edge `ab` on the side away from `opposite`
fn outward_normal(a: DVec2, b: DVec2, opposite: DVec2) -> DVec2 {
    let normal = (b - a).perp();
    let to_opposite = opposite - (a + b) * 0.5;

    let normal = if normal.dot(to_opposite) > 0.0 {
        -normal
    } else {
        normal
    };
    normal.try_normalize().unwrap_or(normal)
}
