//! Simulation configuration and builder
//!
//! This module provides the validated configuration consumed by
//! [`Simulation`](crate::Simulation).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::automaton::{Rules, Thresholds};
use crate::error::{AutomatonError, Result};
use crate::geometry::Bounds;
use crate::repulsion::Repulsion;

/// Configuration for a deterministic automaton run
///
/// The same configuration (seed included) replays the same sequence of
/// generations, provided the host drives it with the same `step`/`resize`/
/// `reseed` calls.
///
/// # Example
///
/// ```rust
/// use voronoi_automaton::*;
///
/// let config = SimulationConfigBuilder::new()
///     .seed(42)
///     .canvas(1024.0, 768.0)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: SimulationConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Seed for site placement, spawn jitter and coincident-site nudges
    pub seed: u64,

    /// Canvas width in world units
    pub width: f64,

    /// Canvas height in world units
    pub height: f64,

    /// Sites placed by every (re)seed
    pub initial_sites: usize,

    /// Birth/survival/death thresholds
    pub thresholds: Thresholds,

    /// Hard cap on the population of any generation
    pub max_sites: usize,

    /// A generation smaller than this triggers a fresh reseed
    pub min_population: usize,

    /// Interaction radius as a fraction of the canvas' smaller dimension
    ///
    /// The radius is `floor(min(width, height) * interaction_fraction)`.
    pub interaction_fraction: f64,

    /// Repulsion force scale (0..=1)
    pub force_strength: f64,

    /// Per-step velocity damping (0..1, higher is smoother)
    pub damping: f64,

    /// Logical simulation rate, independent of the render rate
    pub steps_per_second: f64,
}

impl SimulationConfig {
    /// Canvas bounds `[0, width] × [0, height]`
    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    /// Automaton rules (thresholds and population cap)
    #[inline]
    pub fn rules(&self) -> Rules {
        Rules {
            thresholds: self.thresholds,
            max_sites: self.max_sites,
        }
    }

    /// Interaction radius for a canvas of the given bounds
    #[inline]
    pub fn interaction_radius(&self, bounds: &Bounds) -> f64 {
        (bounds.min_dimension() * self.interaction_fraction).floor()
    }

    /// Repulsion parameters for a canvas of the given bounds
    #[inline]
    pub fn repulsion(&self, bounds: &Bounds) -> Repulsion {
        Repulsion {
            radius: self.interaction_radius(bounds),
            strength: self.force_strength,
            damping: self.damping,
        }
    }

    /// Duration of one simulation step in milliseconds
    #[inline]
    pub fn step_interval_ms(&self) -> f64 {
        1000.0 / self.steps_per_second
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfigBuilder::new().build().unwrap()
    }
}

/// Builder for creating SimulationConfig with validation
///
/// # Example
///
/// ```rust
/// use voronoi_automaton::*;
///
/// let config = SimulationConfigBuilder::new()
///     .seed(7)
///     .thresholds(2, 5, 8)
///     .unwrap()
///     .max_sites(400)
///     .unwrap()
///     .damping(0.8)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.thresholds.spawn, 5);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationConfigBuilder {
    seed: Option<u64>,
    width: f64,
    height: f64,
    initial_sites: usize,
    thresholds: Thresholds,
    max_sites: usize,
    min_population: usize,
    interaction_fraction: f64,
    force_strength: f64,
    damping: f64,
    steps_per_second: f64,
}

impl SimulationConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - canvas: 800 × 600
    /// - initial_sites: 50
    /// - thresholds: 3 / 6 / 7
    /// - max_sites: 1000
    /// - min_population: 10
    /// - interaction_fraction: 0.1
    /// - force_strength: 0.25
    /// - damping: 0.9
    /// - steps_per_second: 10
    pub fn new() -> Self {
        Self {
            seed: None,
            width: 800.0,
            height: 600.0,
            initial_sites: 50,
            thresholds: Thresholds::default(),
            max_sites: 1000,
            min_population: 10,
            interaction_fraction: 0.1,
            force_strength: 0.25,
            damping: 0.9,
            steps_per_second: 10.0,
        }
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the canvas size
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless both dimensions are positive and finite
    pub fn canvas(mut self, width: f64, height: f64) -> Result<Self> {
        validate_canvas(width, height)?;
        self.width = width;
        self.height = height;
        Ok(self)
    }

    /// Set the number of sites placed on every (re)seed
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `count` is zero
    pub fn initial_sites(mut self, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(AutomatonError::InvalidConfig(
                "initial site count must be >= 1".to_string(),
            ));
        }
        self.initial_sites = count;
        Ok(self)
    }

    /// Set the automaton thresholds `A < B < C`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless `survive < spawn < overcrowd`
    pub fn thresholds(mut self, survive: usize, spawn: usize, overcrowd: usize) -> Result<Self> {
        self.thresholds = Thresholds::new(survive, spawn, overcrowd)?;
        Ok(self)
    }

    /// Set the population cap
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `max` is zero
    pub fn max_sites(mut self, max: usize) -> Result<Self> {
        if max == 0 {
            return Err(AutomatonError::InvalidConfig(
                "max sites must be >= 1".to_string(),
            ));
        }
        self.max_sites = max;
        Ok(self)
    }

    /// Set the population floor below which the simulation reseeds
    pub fn min_population(mut self, min: usize) -> Self {
        self.min_population = min;
        self
    }

    /// Set the interaction radius as a fraction of the canvas' smaller side
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless `0 < fraction <= 1`
    pub fn interaction_fraction(mut self, fraction: f64) -> Result<Self> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(AutomatonError::InvalidConfig(format!(
                "interaction fraction must be in (0, 1] (got {})",
                fraction
            )));
        }
        self.interaction_fraction = fraction;
        Ok(self)
    }

    /// Set the repulsion force scale
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless `0 <= strength <= 1`
    pub fn force_strength(mut self, strength: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&strength) {
            return Err(AutomatonError::InvalidConfig(format!(
                "force strength must be in [0, 1] (got {})",
                strength
            )));
        }
        self.force_strength = strength;
        Ok(self)
    }

    /// Set the velocity damping factor
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless `0 <= damping < 1`
    pub fn damping(mut self, damping: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&damping) {
            return Err(AutomatonError::InvalidConfig(format!(
                "damping must be in [0, 1) (got {})",
                damping
            )));
        }
        self.damping = damping;
        Ok(self)
    }

    /// Set the logical simulation rate
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless the rate is positive and finite
    pub fn steps_per_second(mut self, rate: f64) -> Result<Self> {
        if !(rate > 0.0 && rate.is_finite()) {
            return Err(AutomatonError::InvalidConfig(format!(
                "steps per second must be positive (got {})",
                rate
            )));
        }
        self.steps_per_second = rate;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless
    /// `min_population <= initial_sites <= max_sites`. A floor above the seed
    /// size or the cap would reseed on every generation.
    pub fn build(self) -> Result<SimulationConfig> {
        if self.min_population > self.max_sites {
            return Err(AutomatonError::InvalidConfig(format!(
                "min population {} exceeds max sites {}",
                self.min_population, self.max_sites
            )));
        }
        if self.initial_sites > self.max_sites {
            return Err(AutomatonError::InvalidConfig(format!(
                "initial sites {} exceed max sites {}",
                self.initial_sites, self.max_sites
            )));
        }
        if self.initial_sites < self.min_population {
            return Err(AutomatonError::InvalidConfig(format!(
                "initial sites {} below min population {}",
                self.initial_sites, self.min_population
            )));
        }

        let seed = self.seed.unwrap_or_else(rand::random);

        Ok(SimulationConfig {
            seed,
            width: self.width,
            height: self.height,
            initial_sites: self.initial_sites,
            thresholds: self.thresholds,
            max_sites: self.max_sites,
            min_population: self.min_population,
            interaction_fraction: self.interaction_fraction,
            force_strength: self.force_strength,
            damping: self.damping,
            steps_per_second: self.steps_per_second,
        })
    }
}

impl Default for SimulationConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Canvas dimensions must be positive and finite
pub(crate) fn validate_canvas(width: f64, height: f64) -> Result<()> {
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return Err(AutomatonError::InvalidConfig(format!(
            "canvas must have positive size (got {} x {})",
            width, height
        )));
    }
    Ok(())
}
