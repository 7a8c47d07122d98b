//! Neighbour-count cellular automaton
//!
//! Each site's fate depends only on how many Voronoi neighbours it has and
//! three thresholds `A < B < C`:
//!
//! | neighbours | fate |
//! |---|---|
//! | `n < A` | dies |
//! | `A <= n < B` | survives |
//! | `B <= n < C` | survives and spawns a child |
//! | `n >= C` | dies (overcrowded) |
//!
//! A child is placed halfway to the parent's furthest neighbour, jittered by
//! up to one unit per axis. The next generation is survivors followed by
//! children, truncated to the population cap.

use glam::DVec2;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{AutomatonError, Result};
use crate::generation::adjacency::Adjacency;
use crate::geometry::Bounds;

/// Birth/survival/death thresholds `A < B < C`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// `A`: fewer neighbours than this and the site dies
    pub survive: usize,
    /// `B`: at least this many and the site spawns
    pub spawn: usize,
    /// `C`: at least this many and the site dies of overcrowding
    pub overcrowd: usize,
}

impl Thresholds {
    /// Create thresholds
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless `survive < spawn < overcrowd`
    pub fn new(survive: usize, spawn: usize, overcrowd: usize) -> Result<Self> {
        if !(survive < spawn && spawn < overcrowd) {
            return Err(AutomatonError::InvalidConfig(format!(
                "thresholds must satisfy A < B < C (got {}, {}, {})",
                survive, spawn, overcrowd
            )));
        }
        Ok(Self {
            survive,
            spawn,
            overcrowd,
        })
    }

    /// Classify a site by its neighbour count
    #[inline]
    pub fn fate(&self, neighbor_count: usize) -> Fate {
        if neighbor_count < self.survive {
            Fate::Dies
        } else if neighbor_count < self.spawn {
            Fate::Survives
        } else if neighbor_count < self.overcrowd {
            Fate::Spawns
        } else {
            Fate::Overcrowded
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            survive: 3,
            spawn: 6,
            overcrowd: 7,
        }
    }
}

/// What happens to a site in the next generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fate {
    /// Too few neighbours
    Dies,
    /// Carried over unchanged
    Survives,
    /// Carried over and spawns one child
    Spawns,
    /// Too many neighbours
    Overcrowded,
}

impl Fate {
    #[inline]
    pub fn survives(self) -> bool {
        matches!(self, Fate::Survives | Fate::Spawns)
    }
}

/// Thresholds plus the population cap
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rules {
    pub thresholds: Thresholds,
    /// Hard cap on the site count of any generation
    pub max_sites: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            max_sites: 1000,
        }
    }
}

/// Outcome of one automaton step
#[derive(Debug, Clone, Default)]
pub struct Generation {
    /// Survivors followed by children, at most `max_sites` long
    pub sites: Vec<DVec2>,
    /// Children spawned (before truncation)
    pub births: usize,
    /// Sites removed by either death rule
    pub deaths: usize,
}

/// Advance the automaton by one generation
///
/// `adjacency` must describe `sites`; sites it does not cover read as having
/// no neighbours and die.
pub fn step<R: Rng>(
    sites: &[DVec2],
    adjacency: &Adjacency,
    rules: &Rules,
    bounds: &Bounds,
    rng: &mut R,
) -> Generation {
    let mut survivors = Vec::with_capacity(sites.len());
    let mut spawns = Vec::new();

    for (i, &site) in sites.iter().enumerate() {
        let fate = rules.thresholds.fate(adjacency.neighbor_count(i));
        if !fate.survives() {
            continue;
        }

        survivors.push(site);

        if fate == Fate::Spawns {
            if let Some(child) = spawn_child(i, sites, adjacency, bounds, rng) {
                spawns.push(child);
            }
        }
    }

    let births = spawns.len();
    let deaths = sites.len() - survivors.len();

    let mut next = survivors;
    next.extend(spawns);
    next.truncate(rules.max_sites);

    Generation {
        sites: next,
        births,
        deaths,
    }
}

/// Child of site `i`: midpoint with its furthest neighbour, jittered and clamped
fn spawn_child<R: Rng>(
    i: usize,
    sites: &[DVec2],
    adjacency: &Adjacency,
    bounds: &Bounds,
    rng: &mut R,
) -> Option<DVec2> {
    let Some(j) = adjacency.furthest_neighbor(i, sites) else {
        log::warn!("site {} qualifies to spawn but has no neighbours", i);
        return None;
    };

    let midpoint = (sites[i] + sites[j]) * 0.5;
    let jitter = DVec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0));

    Some(bounds.clamp(midpoint + jitter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::BTreeSet;

    /// Adjacency where every site in `counts` gets that many neighbours from a pool of far sites
    fn star_adjacency(counts: &[usize], pool: usize) -> Adjacency {
        let total = counts.len() + pool;
        let mut neighbor_sets = vec![BTreeSet::new(); total];
        for (i, &n) in counts.iter().enumerate() {
            for k in 0..n {
                let j = counts.len() + k;
                neighbor_sets[i].insert(j);
                neighbor_sets[j].insert(i);
            }
        }
        let neighbor_counts = neighbor_sets.iter().map(BTreeSet::len).collect();
        Adjacency {
            neighbor_sets,
            neighbor_counts,
            ..Default::default()
        }
    }

    #[test]
    fn test_thresholds_validation() {
        assert!(Thresholds::new(3, 6, 7).is_ok());
        assert!(Thresholds::new(3, 3, 7).is_err());
        assert!(Thresholds::new(5, 4, 7).is_err());
        assert!(Thresholds::new(3, 7, 7).is_err());
    }

    #[test]
    fn test_fate_bands() {
        let t = Thresholds::default();
        assert_eq!(t.fate(0), Fate::Dies);
        assert_eq!(t.fate(2), Fate::Dies);
        assert_eq!(t.fate(3), Fate::Survives);
        assert_eq!(t.fate(5), Fate::Survives);
        assert_eq!(t.fate(6), Fate::Spawns);
        assert_eq!(t.fate(7), Fate::Overcrowded);
        assert_eq!(t.fate(12), Fate::Overcrowded);
    }

    #[test]
    fn test_step_birth_and_death() {
        // Sites 0..3 have 2, 6 and 7 neighbours; the pool sits far away on a line
        let counts = [2, 6, 7];
        let pool = 7;
        let adjacency = star_adjacency(&counts, pool);

        let mut sites = vec![
            DVec2::new(100.0, 100.0),
            DVec2::new(200.0, 100.0),
            DVec2::new(300.0, 100.0),
        ];
        sites.extend((0..pool).map(|k| DVec2::new(50.0 * k as f64, 400.0)));

        let bounds = Bounds::new(1000.0, 1000.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let generation = step(&sites, &adjacency, &Rules::default(), &bounds, &mut rng);

        // Pool site k has 3 links for k < 2, 2 links for k < 6, else 1.
        // Survivors: site 1 (spawns) and pool sites k = 0, 1.
        assert_eq!(generation.births, 1);
        assert_eq!(generation.sites.len(), 3 + 1);
        assert_eq!(generation.sites[0], sites[1]);
        assert_eq!(generation.deaths, sites.len() - 3);

        // Child lies near the midpoint of site 1 and its furthest pool neighbour (k = 0)
        let child = generation.sites[3];
        let expected = (sites[1] + sites[counts.len()]) * 0.5;
        assert!((child.x - expected.x).abs() <= 1.0);
        assert!((child.y - expected.y).abs() <= 1.0);
    }

    #[test]
    fn test_step_respects_cap() {
        let counts = vec![6; 20];
        let adjacency = star_adjacency(&counts, 6);
        let sites: Vec<DVec2> = (0..26).map(|i| DVec2::new(i as f64 * 10.0, 50.0)).collect();

        let rules = Rules {
            max_sites: 25,
            ..Default::default()
        };
        let bounds = Bounds::new(500.0, 500.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let generation = step(&sites, &adjacency, &rules, &bounds, &mut rng);

        assert_eq!(generation.births, 20);
        assert_eq!(generation.sites.len(), 25);
        // Prefix truncation keeps every survivor before any child
        assert_eq!(&generation.sites[..20], &sites[..20]);
    }

    #[test]
    fn test_spawn_without_neighbors_is_skipped() {
        // Counts claim 6 neighbours but the sets are empty (stale snapshot)
        let adjacency = Adjacency {
            neighbor_sets: vec![BTreeSet::new()],
            neighbor_counts: vec![6],
            ..Default::default()
        };
        let sites = vec![DVec2::new(10.0, 10.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let generation = step(
            &sites,
            &adjacency,
            &Rules::default(),
            &Bounds::new(100.0, 100.0),
            &mut rng,
        );

        assert_eq!(generation.sites, sites);
        assert_eq!(generation.births, 0);
        assert_eq!(generation.deaths, 0);
    }

    #[test]
    fn test_child_clamped_to_bounds() {
        let sites = vec![DVec2::new(0.0, 0.0), DVec2::new(0.0, 0.0)];
        let mut neighbor_sets = vec![BTreeSet::new(); 2];
        neighbor_sets[0].insert(1);
        neighbor_sets[1].insert(0);
        let adjacency = Adjacency {
            neighbor_sets,
            neighbor_counts: vec![6, 6],
            ..Default::default()
        };

        let bounds = Bounds::new(10.0, 10.0);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..20 {
            let generation = step(&sites, &adjacency, &Rules::default(), &bounds, &mut rng);
            for child in &generation.sites[2..] {
                assert!(bounds.contains(*child));
            }
        }
    }
}
