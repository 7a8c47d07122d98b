//! Voronoi-neighbour cellular automaton
//!
//! A standalone engine for a cellular automaton whose cells are the Voronoi
//! regions of a moving 2D point set. Each generation the sites are
//! triangulated (Bowyer–Watson), Voronoi neighbours are read off the
//! interior Delaunay edges, and every site lives, dies or spawns according
//! to its neighbour count. A spatial-hash repulsion pass keeps the sites
//! apart between generations. Drawing is left to the host, which receives
//! triangles, circumcircles and clipped Voronoi edges.
//!
//! # Quick Start
//!
//! ```rust
//! use voronoi_automaton::*;
//!
//! let config = SimulationConfigBuilder::new()
//!     .seed(42)
//!     .canvas(800.0, 600.0)
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let mut sim = Simulation::new(config).unwrap();
//!
//! // Drive it from the host's frame callback (timestamps in milliseconds)
//! for frame in 0..60 {
//!     if let Some(stats) = sim.tick(frame as f64 * 16.6) {
//!         println!("{} sites, +{} -{}", stats.population, stats.births, stats.deaths);
//!     }
//! }
//!
//! for edge in sim.voronoi_edges() {
//!     // draw edge.start -> edge.end
//! #   let _ = edge;
//! }
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): KD-tree lookup of the site (Voronoi cell) under a position
//! - `serde`: Enables serialization support for configuration
//! - `optimize`: Compiles out log statements below `warn` in release builds

// Modules
pub mod error;
pub mod geometry;
pub mod config;
pub mod generation;
pub mod automaton;
pub mod repulsion;
pub mod simulation;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{AutomatonError, Result};
pub use geometry::{Bounds, Circumcircle};
pub use config::{SimulationConfig, SimulationConfigBuilder};
pub use generation::{
    build_topology, build_triangulation, build_triangulation_within, extract_adjacency,
    generate_sites, voronoi_edges, Adjacency, EdgeKey, EdgeKind, Triangle, Triangulation, VoronoiEdge,
};
pub use automaton::{Fate, Generation, Rules, Thresholds};
pub use repulsion::{Repulsion, SpatialHash};
pub use simulation::{FrameClock, Simulation, StepStats};

#[cfg(feature = "spatial-index")]
pub use spatial::SiteIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
