//! Edge incidence and Voronoi-neighbour graph
//!
//! Derived from a triangle list: every undirected edge maps to the triangles
//! that share it, and sites joined by an interior edge (two incident
//! triangles) are Voronoi neighbours. Hull edges, which have a single
//! incident triangle, do not produce a neighbour relation.

use glam::DVec2;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{AutomatonError, Result};
use crate::generation::delaunay::Triangle;

/// Undirected edge between two point indices, stored as `(lo, hi)`
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    lo: u32,
    hi: u32,
}

impl EdgeKey {
    /// Canonicalize `(u, v)` so that `lo <= hi`
    #[inline]
    pub fn new(u: usize, v: usize) -> Self {
        debug_assert!(u <= u32::MAX as usize && v <= u32::MAX as usize);
        let (lo, hi) = if u <= v { (u, v) } else { (v, u) };
        Self {
            lo: lo as u32,
            hi: hi as u32,
        }
    }

    /// Endpoints as `(lo, hi)`
    #[inline]
    pub fn endpoints(&self) -> (usize, usize) {
        (self.lo as usize, self.hi as usize)
    }

    /// Both indices packed into one `u64`, `lo` in the high half
    #[inline]
    pub fn packed(&self) -> u64 {
        ((self.lo as u64) << 32) | self.hi as u64
    }
}

/// Edge incidence plus the Voronoi-neighbour graph of the real sites
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    /// Triangle indices incident to each edge (1 on the hull, 2 inside)
    pub edge_triangles: BTreeMap<EdgeKey, Vec<usize>>,
    /// Neighbour set of each real site
    pub neighbor_sets: Vec<BTreeSet<usize>>,
    /// `neighbor_sets[i].len()`, cached for the automaton
    pub neighbor_counts: Vec<usize>,
}

impl Adjacency {
    /// Number of sites covered by the neighbour graph
    #[inline]
    pub fn site_count(&self) -> usize {
        self.neighbor_sets.len()
    }

    /// Neighbour count of site `i`, or 0 if `i` is not covered
    #[inline]
    pub fn neighbor_count(&self, i: usize) -> usize {
        self.neighbor_counts.get(i).copied().unwrap_or(0)
    }

    /// Neighbours of site `i` in ascending index order
    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.neighbor_sets.get(i).into_iter().flatten().copied()
    }

    #[inline]
    pub fn are_neighbors(&self, u: usize, v: usize) -> bool {
        self.neighbor_sets.get(u).is_some_and(|s| s.contains(&v))
    }

    /// Neighbour of site `i` furthest from it
    ///
    /// Ties keep the lowest index. `None` when `i` has no neighbours.
    pub fn furthest_neighbor(&self, i: usize, sites: &[DVec2]) -> Option<usize> {
        let origin = *sites.get(i)?;
        let mut best: Option<(usize, f64)> = None;

        for j in self.neighbors(i) {
            let Some(&site) = sites.get(j) else { continue };
            let d2 = site.distance_squared(origin);
            if best.map_or(true, |(_, best_d2)| d2 > best_d2) {
                best = Some((j, d2));
            }
        }

        best.map(|(j, _)| j)
    }

    /// Edges with exactly two incident triangles
    pub fn interior_edges(&self) -> impl Iterator<Item = (EdgeKey, [usize; 2])> + '_ {
        self.edge_triangles
            .iter()
            .filter_map(|(&edge, tris)| match tris.as_slice() {
                &[t0, t1] => Some((edge, [t0, t1])),
                _ => None,
            })
    }

    /// Edges with a single incident triangle (the convex hull)
    pub fn hull_edges(&self) -> impl Iterator<Item = (EdgeKey, usize)> + '_ {
        self.edge_triangles
            .iter()
            .filter_map(|(&edge, tris)| match tris.as_slice() {
                &[t] => Some((edge, t)),
                _ => None,
            })
    }

    /// Check edge incidence and neighbour symmetry
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if any edge has zero or more than two
    /// incident triangles, or if the neighbour graph is not symmetric.
    pub fn validate(&self) -> Result<()> {
        for (edge, tris) in &self.edge_triangles {
            if tris.is_empty() || tris.len() > 2 {
                return Err(AutomatonError::InvariantViolation(format!(
                    "edge {:?} has {} incident triangles",
                    edge.endpoints(),
                    tris.len()
                )));
            }
        }

        for (u, set) in self.neighbor_sets.iter().enumerate() {
            if set.len() != self.neighbor_count(u) {
                return Err(AutomatonError::InvariantViolation(format!(
                    "site {} caches {} neighbours but has {}",
                    u,
                    self.neighbor_count(u),
                    set.len()
                )));
            }
            if let Some(&v) = set.iter().find(|&&v| !self.are_neighbors(v, u)) {
                return Err(AutomatonError::InvariantViolation(format!(
                    "neighbour graph asymmetric: {} -> {} without {} -> {}",
                    u, v, v, u
                )));
            }
        }

        Ok(())
    }
}

/// Build edge incidence and the neighbour graph for `site_count` real sites
pub fn extract_adjacency(triangles: &[Triangle], site_count: usize) -> Adjacency {
    let mut edge_triangles: BTreeMap<EdgeKey, Vec<usize>> = BTreeMap::new();

    for (ti, t) in triangles.iter().enumerate() {
        for edge in t.edges() {
            edge_triangles.entry(edge).or_default().push(ti);
        }
    }

    let mut neighbor_sets = vec![BTreeSet::new(); site_count];

    for (edge, tris) in &edge_triangles {
        if tris.len() > 2 {
            log::error!(
                "edge {:?} shared by {} triangles; triangulation is corrupt",
                edge.endpoints(),
                tris.len()
            );
            continue;
        }
        if tris.len() != 2 {
            continue;
        }

        let (u, v) = edge.endpoints();
        if u < site_count && v < site_count {
            neighbor_sets[u].insert(v);
            neighbor_sets[v].insert(u);
        }
    }

    let neighbor_counts = neighbor_sets.iter().map(BTreeSet::len).collect();

    Adjacency {
        edge_triangles,
        neighbor_sets,
        neighbor_counts,
    }
}
