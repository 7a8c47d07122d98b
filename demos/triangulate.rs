//! Example: Triangulate a point set and inspect its Voronoi topology
//!
//! Shows the geometry layer on its own, without the automaton.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use voronoi_automaton::*;

fn main() {
    env_logger::init();

    println!("Delaunay / Voronoi Topology Example");
    println!("===================================\n");

    let bounds = Bounds::new(500.0, 500.0);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let sites = generate_sites(30, &bounds, &mut rng);

    let (triangulation, adjacency) = build_topology(&sites, &bounds);

    println!("Sites: {}", triangulation.site_count);
    println!("Triangles: {}", triangulation.triangle_count());
    println!("Degenerate triangles skipped: {}", triangulation.degenerate_skipped);
    println!("Interior edges: {}", adjacency.interior_edges().count());
    println!("Hull edges: {}", adjacency.hull_edges().count());
    println!();

    println!("Sample triangles:");
    for t in triangulation.triangles.iter().take(5) {
        println!(
            "  ({}, {}, {}) circumcentre ({:.1}, {:.1}) radius {:.1}",
            t.a,
            t.b,
            t.c,
            t.circumcircle.center.x,
            t.circumcircle.center.y,
            t.circumcircle.radius()
        );
    }
    println!();

    println!("Sample sites:");
    for i in 0..5 {
        let neighbors: Vec<usize> = adjacency.neighbors(i).collect();
        println!(
            "  Site {} at ({:.1}, {:.1}): {} neighbours {:?}, furthest {:?}",
            i,
            sites[i].x,
            sites[i].y,
            adjacency.neighbor_count(i),
            neighbors,
            adjacency.furthest_neighbor(i, &sites)
        );
    }
    println!();

    let edges = voronoi_edges(&triangulation, &adjacency, &bounds);
    let finite = edges.iter().filter(|e| e.kind == EdgeKind::Finite).count();
    let total: f64 = edges.iter().map(VoronoiEdge::length).sum();
    println!(
        "Voronoi edges: {} ({} finite, {} rays), total length {:.1}",
        edges.len(),
        finite,
        edges.len() - finite,
        total
    );

    match adjacency.validate() {
        Ok(()) => println!("Adjacency is consistent"),
        Err(err) => println!("Adjacency check failed: {}", err),
    }
}
