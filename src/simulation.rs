//! Simulation driver
//!
//! Owns the whole automaton state and advances it one generation at a time:
//! automaton step, repulsion relaxation, then a fresh triangulation. The host
//! calls [`Simulation::tick`] once per animation frame; steps run at a fixed
//! logical rate regardless of the frame rate.

use glam::DVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};

use crate::automaton;
use crate::config::{validate_canvas, SimulationConfig};
use crate::error::{AutomatonError, Result};
use crate::generation::{
    build_topology, generate_sites, voronoi_edges, Adjacency, Triangulation, VoronoiEdge,
};
use crate::geometry::Bounds;
use crate::repulsion::sync_velocities;

#[cfg(feature = "spatial-index")]
use crate::spatial::SiteIndex;

/// Fixed-step accumulator fed by frame timestamps
///
/// At most one step is due per frame; a long stall is capped at two step
/// intervals of backlog so the simulation never tries to catch up in bursts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    step_ms: f64,
    last_timestamp: f64,
    accumulator: f64,
    fps: f64,
}

impl FrameClock {
    pub fn new(step_ms: f64) -> Self {
        Self {
            step_ms,
            last_timestamp: 0.0,
            accumulator: 0.0,
            fps: 0.0,
        }
    }

    /// Record a frame at `timestamp_ms`; returns whether a step is due
    pub fn tick(&mut self, timestamp_ms: f64) -> bool {
        let dt = timestamp_ms - self.last_timestamp;
        self.fps = if dt > 0.0 { 1000.0 / dt } else { 0.0 };
        self.last_timestamp = timestamp_ms;
        self.accumulator += dt;

        if self.accumulator < self.step_ms {
            return false;
        }

        self.accumulator = self.accumulator.min(self.step_ms * 2.0) - self.step_ms;
        true
    }

    /// Render rate measured from the last two frames
    #[inline]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    #[inline]
    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }
}

/// Counters and phase timings for one step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepStats {
    /// Generation number reached by this step
    pub generation: u64,
    /// Children spawned
    pub births: usize,
    /// Sites that died
    pub deaths: usize,
    /// Site count after the step
    pub population: usize,
    /// Whether the population collapsed and was reseeded
    pub reseeded: bool,
    /// Collinear triangles skipped by the triangulation
    pub degenerate_triangles: usize,
    pub ca_step: Duration,
    pub relaxation: Duration,
    pub triangulation: Duration,
}

/// A running Voronoi-neighbour automaton
///
/// # Example
///
/// ```
/// use voronoi_automaton::*;
///
/// let config = SimulationConfigBuilder::new()
///     .seed(42)
///     .canvas(400.0, 300.0)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let mut sim = Simulation::new(config).unwrap();
/// for _ in 0..5 {
///     sim.step();
/// }
/// assert!(sim.population() <= config.max_sites);
/// ```
#[derive(Clone)]
pub struct Simulation {
    config: SimulationConfig,
    bounds: Bounds,
    interaction_radius: f64,
    rng: ChaCha8Rng,

    sites: Vec<DVec2>,
    velocities: Vec<DVec2>,

    triangulation: Triangulation,
    adjacency: Adjacency,
    /// Set when the sites changed without a matching triangulation
    topology_stale: bool,

    clock: FrameClock,
    stats: StepStats,
    generation: u64,

    #[cfg(feature = "spatial-index")]
    site_index: Option<SiteIndex>,
}

impl Simulation {
    /// Create a simulation with a freshly seeded population
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the canvas size is not positive
    pub fn new(config: SimulationConfig) -> Result<Self> {
        validate_canvas(config.width, config.height)?;
        let bounds = config.bounds();

        let mut sim = Self {
            config,
            bounds,
            interaction_radius: config.interaction_radius(&bounds),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            sites: Vec::new(),
            velocities: Vec::new(),
            triangulation: Triangulation::default(),
            adjacency: Adjacency::default(),
            topology_stale: true,
            clock: FrameClock::new(config.step_interval_ms()),
            stats: StepStats::default(),
            generation: 0,
            #[cfg(feature = "spatial-index")]
            site_index: None,
        };
        sim.reseed();

        Ok(sim)
    }

    /// Replace the population with fresh random sites
    ///
    /// The triangulation is discarded and rebuilt at the start of the next
    /// step.
    pub fn reseed(&mut self) {
        self.sites = generate_sites(self.config.initial_sites, &self.bounds, &mut self.rng);
        self.velocities.clear();
        self.triangulation = Triangulation::default();
        self.adjacency = Adjacency::default();
        self.topology_stale = true;

        #[cfg(feature = "spatial-index")]
        {
            self.site_index = SiteIndex::new(&self.sites);
        }

        log::info!(
            "reseeded with {} sites (generation {})",
            self.sites.len(),
            self.generation
        );
    }

    /// Change the canvas size
    ///
    /// Recomputes the interaction radius and clamps every site into the new
    /// bounds; the topology is rebuilt on the next step.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either dimension is not positive
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        validate_canvas(width, height)?;

        self.bounds = Bounds::new(width, height);
        self.interaction_radius = self.config.interaction_radius(&self.bounds);
        for site in &mut self.sites {
            *site = self.bounds.clamp(*site);
        }
        self.topology_stale = true;

        log::info!(
            "resized to {} x {}, interaction radius {}",
            width,
            height,
            self.interaction_radius
        );
        Ok(())
    }

    /// Feed one animation frame; runs a step when one is due
    pub fn tick(&mut self, timestamp_ms: f64) -> Option<StepStats> {
        self.clock.tick(timestamp_ms).then(|| self.step())
    }

    /// Advance exactly one generation
    pub fn step(&mut self) -> StepStats {
        if self.topology_stale {
            self.rebuild_topology();
        }

        let t0 = Instant::now();
        let next = automaton::step(
            &self.sites,
            &self.adjacency,
            &self.config.rules(),
            &self.bounds,
            &mut self.rng,
        );
        self.sites = next.sites;

        let t1 = Instant::now();
        sync_velocities(&mut self.velocities, self.sites.len());
        let repulsion = self.config.repulsion(&self.bounds);
        repulsion.apply(&mut self.sites, &mut self.velocities, &self.bounds, &mut self.rng);

        let t2 = Instant::now();
        self.rebuild_topology();
        let t3 = Instant::now();

        self.generation += 1;
        let degenerate_triangles = self.triangulation.degenerate_skipped;

        let reseeded = self.sites.len() < self.config.min_population;
        if reseeded {
            log::info!(
                "population collapsed to {} (< {})",
                self.sites.len(),
                self.config.min_population
            );
            self.reseed();
        }

        self.stats = StepStats {
            generation: self.generation,
            births: next.births,
            deaths: next.deaths,
            population: self.sites.len(),
            reseeded,
            degenerate_triangles,
            ca_step: t1 - t0,
            relaxation: t2 - t1,
            triangulation: t3 - t2,
        };

        log::debug!(
            "generation {}: {} sites, +{} -{}, ca {:?}, force {:?}, triangulation {:?}",
            self.stats.generation,
            self.stats.population,
            self.stats.births,
            self.stats.deaths,
            self.stats.ca_step,
            self.stats.relaxation,
            self.stats.triangulation
        );

        self.stats
    }

    /// Retriangulate the current sites and refresh the neighbour graph
    fn rebuild_topology(&mut self) {
        let (triangulation, adjacency) = build_topology(&self.sites, &self.bounds);

        #[cfg(debug_assertions)]
        if let Err(err) = adjacency.validate() {
            log::error!("generation {}: {}", self.generation, err);
        }

        self.triangulation = triangulation;
        self.adjacency = adjacency;
        self.topology_stale = false;

        #[cfg(feature = "spatial-index")]
        {
            self.site_index = SiteIndex::new(&self.sites);
        }
    }

    /// Configuration this simulation was created with
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Current canvas bounds
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Current repulsion interaction radius
    #[inline]
    pub fn interaction_radius(&self) -> f64 {
        self.interaction_radius
    }

    #[inline]
    pub fn sites(&self) -> &[DVec2] {
        &self.sites
    }

    #[inline]
    pub fn velocities(&self) -> &[DVec2] {
        &self.velocities
    }

    #[inline]
    pub fn population(&self) -> usize {
        self.sites.len()
    }

    /// Generations stepped so far (reseeding does not reset it)
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Triangulation of the current sites
    ///
    /// Empty right after a reseed until the next step.
    #[inline]
    pub fn triangulation(&self) -> &Triangulation {
        &self.triangulation
    }

    #[inline]
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    #[inline]
    pub fn neighbor_counts(&self) -> &[usize] {
        &self.adjacency.neighbor_counts
    }

    /// Neighbour indices of a site
    ///
    /// # Errors
    ///
    /// Returns `SiteNotFound` if `site` is not in the current generation
    pub fn neighbors_of(&self, site: usize) -> Result<Vec<usize>> {
        if site >= self.sites.len() {
            return Err(AutomatonError::SiteNotFound(site));
        }
        Ok(self.adjacency.neighbors(site).collect())
    }

    /// Stats of the last step
    #[inline]
    pub fn stats(&self) -> &StepStats {
        &self.stats
    }

    /// Render rate measured by the frame clock
    #[inline]
    pub fn fps(&self) -> f64 {
        self.clock.fps()
    }

    /// Clipped Voronoi edges of the current triangulation
    pub fn voronoi_edges(&self) -> Vec<VoronoiEdge> {
        voronoi_edges(&self.triangulation, &self.adjacency, &self.bounds)
    }

    /// Index of the site whose Voronoi cell contains `position`
    ///
    /// Returns `None` when there are no sites.
    #[cfg(feature = "spatial-index")]
    pub fn find_site_at(&self, position: DVec2) -> Option<usize> {
        self.site_index.as_ref().map(|index| index.find_nearest(position))
    }
}
