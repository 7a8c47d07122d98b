//! Triangulation and Voronoi topology of a site list
//!
//! Sites are triangulated with Bowyer–Watson, the triangle list is turned
//! into edge incidence and a Voronoi-neighbour graph, and the same incidence
//! yields the Voronoi edges handed to the renderer.

pub mod adjacency;
pub mod delaunay;
pub mod voronoi;

pub use adjacency::{extract_adjacency, Adjacency, EdgeKey};
pub use delaunay::{build_triangulation, build_triangulation_within, Triangle, Triangulation};
pub use voronoi::{voronoi_edges, EdgeKind, VoronoiEdge};

use glam::DVec2;
use rand::Rng;

use crate::geometry::Bounds;

/// Uniformly random sites inside `bounds`
pub fn generate_sites<R: Rng>(count: usize, bounds: &Bounds, rng: &mut R) -> Vec<DVec2> {
    (0..count)
        .map(|_| {
            DVec2::new(
                bounds.min.x + rng.gen::<f64>() * bounds.width(),
                bounds.min.y + rng.gen::<f64>() * bounds.height(),
            )
        })
        .collect()
}

/// Triangulate `sites` inside `bounds` and derive their adjacency
pub fn build_topology(sites: &[DVec2], bounds: &Bounds) -> (Triangulation, Adjacency) {
    let triangulation = build_triangulation_within(sites, bounds);
    let adjacency = extract_adjacency(&triangulation.triangles, triangulation.site_count);
    (triangulation, adjacency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generate_sites_in_bounds() {
        let bounds = Bounds::new(640.0, 480.0);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let sites = generate_sites(200, &bounds, &mut rng);

        assert_eq!(sites.len(), 200);
        assert!(sites.iter().all(|s| bounds.contains(*s)));
    }

    #[test]
    fn test_generate_sites_determinism() {
        let bounds = Bounds::new(100.0, 100.0);
        let a = generate_sites(50, &bounds, &mut ChaCha8Rng::seed_from_u64(12345));
        let b = generate_sites(50, &bounds, &mut ChaCha8Rng::seed_from_u64(12345));
        assert_eq!(a, b);
    }

    #[test]
    fn test_build_topology() {
        let bounds = Bounds::new(500.0, 500.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let sites = generate_sites(100, &bounds, &mut rng);

        let (tri, adj) = build_topology(&sites, &bounds);

        assert_eq!(tri.site_count, 100);
        assert_eq!(adj.site_count(), 100);
        assert!(tri.triangle_count() > 100);
        assert!(adj.validate().is_ok());

        // Interior sites of a random cloud average close to six neighbours
        let total: usize = adj.neighbor_counts.iter().sum();
        let mean = total as f64 / 100.0;
        assert!(mean > 3.0 && mean < 6.5, "mean neighbour count {}", mean);
    }
}
