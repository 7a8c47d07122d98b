//! Short-range repulsion over a uniform spatial hash
//!
//! Children spawn right next to their parents, which would leave the next
//! triangulation full of sliver triangles. Between automaton steps every
//! pair of sites closer than the interaction radius pushes apart, then
//! velocities are damped and integrated.
//!
//! Sites are bucketed into a grid whose cell size equals the interaction
//! radius, so each site only inspects the 3×3 block of buckets around it.

use glam::{DVec2, IVec2};
use rand::Rng;
use std::collections::HashMap;

use crate::geometry::{Bounds, EPSILON};

/// Half-width of the random displacement substituted for coincident sites
const COINCIDENT_NUDGE: f64 = 5e-4;

/// Uniform grid of site indices keyed by `floor(position / cell_size)`
#[derive(Debug, Clone)]
pub struct SpatialHash {
    cell_size: f64,
    buckets: HashMap<IVec2, Vec<usize>>,
}

impl SpatialHash {
    /// Bucket every position; `cell_size` must be positive
    pub fn new(positions: &[DVec2], cell_size: f64) -> Self {
        debug_assert!(cell_size > 0.0);
        let mut hash = Self {
            cell_size,
            buckets: HashMap::with_capacity(positions.len()),
        };

        for (i, &p) in positions.iter().enumerate() {
            hash.buckets.entry(hash.cell_of(p)).or_default().push(i);
        }

        hash
    }

    /// Bucket coordinates containing `p`
    #[inline]
    pub fn cell_of(&self, p: DVec2) -> IVec2 {
        (p / self.cell_size).floor().as_ivec2()
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of non-empty buckets
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Indices in the 3×3 block of buckets around `p`'s bucket
    pub fn neighborhood(&self, p: DVec2) -> impl Iterator<Item = usize> + '_ {
        let center = self.cell_of(p);
        (-1..=1)
            .flat_map(move |oy| (-1..=1).map(move |ox| center + IVec2::new(ox, oy)))
            .filter_map(|cell| self.buckets.get(&cell))
            .flatten()
            .copied()
    }
}

/// Repulsion parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repulsion {
    /// Interaction radius `R`; pairs at distance `>= R` do not interact
    pub radius: f64,
    /// Force scale applied to `(R - d) / R`
    pub strength: f64,
    /// Velocity multiplier applied after forces, below 1
    pub damping: f64,
}

impl Repulsion {
    /// Push overlapping sites apart, then damp and integrate
    ///
    /// Positions are clamped to `bounds`. A non-positive radius skips the
    /// pair forces but still damps and integrates the existing velocities.
    ///
    /// # Panics
    ///
    /// Panics if `velocities` and `sites` differ in length.
    pub fn apply<R: Rng>(
        &self,
        sites: &mut [DVec2],
        velocities: &mut [DVec2],
        bounds: &Bounds,
        rng: &mut R,
    ) {
        assert_eq!(
            sites.len(),
            velocities.len(),
            "one velocity per site required"
        );

        if self.radius > 0.0 {
            self.accumulate_forces(sites, velocities, rng);
        }

        for (site, velocity) in sites.iter_mut().zip(velocities.iter_mut()) {
            *velocity *= self.damping;
            *site = bounds.clamp(*site + *velocity);
        }
    }

    /// Add the pairwise repulsion of every pair closer than the radius
    fn accumulate_forces<R: Rng>(&self, sites: &[DVec2], velocities: &mut [DVec2], rng: &mut R) {
        let r = self.radius;
        let r2 = r * r;
        let hash = SpatialHash::new(sites, r);

        for (i, &si) in sites.iter().enumerate() {
            for j in hash.neighborhood(si) {
                if j <= i {
                    continue;
                }

                let mut delta = si - sites[j];
                let mut d2 = delta.length_squared();

                if d2 < EPSILON {
                    delta = DVec2::new(
                        rng.gen_range(-COINCIDENT_NUDGE..COINCIDENT_NUDGE),
                        rng.gen_range(-COINCIDENT_NUDGE..COINCIDENT_NUDGE),
                    );
                    d2 = delta.length_squared();
                    if d2 == 0.0 {
                        continue;
                    }
                }

                if d2 >= r2 {
                    continue;
                }

                let d = d2.sqrt();
                let force = delta / d * (self.strength * (r - d) / r);

                velocities[i] += force;
                velocities[j] -= force;
            }
        }
    }
}

/// Resize `velocities` to `n`, padding with zero and truncating extras
pub fn sync_velocities(velocities: &mut Vec<DVec2>, n: usize) {
    velocities.resize(n, DVec2::ZERO);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn repulsion() -> Repulsion {
        Repulsion {
            radius: 20.0,
            strength: 0.25,
            damping: 0.9,
        }
    }

    #[test]
    fn test_spatial_hash_buckets() {
        let positions = vec![
            DVec2::new(1.0, 1.0),
            DVec2::new(9.0, 9.0),
            DVec2::new(11.0, 1.0),
            DVec2::new(35.0, 35.0),
        ];
        let hash = SpatialHash::new(&positions, 10.0);

        assert_eq!(hash.cell_of(positions[0]), IVec2::new(0, 0));
        assert_eq!(hash.cell_of(positions[2]), IVec2::new(1, 0));
        assert_eq!(hash.cell_of(DVec2::new(-0.5, 0.0)), IVec2::new(-1, 0));
        assert_eq!(hash.bucket_count(), 3);

        let mut near: Vec<usize> = hash.neighborhood(positions[0]).collect();
        near.sort_unstable();
        assert_eq!(near, vec![0, 1, 2]);
    }

    #[test]
    fn test_close_pair_separates() {
        let mut sites = vec![DVec2::new(100.0, 100.0), DVec2::new(105.0, 100.0)];
        let mut velocities = vec![DVec2::ZERO; 2];
        let bounds = Bounds::new(200.0, 200.0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let before = sites[0].distance(sites[1]);
        repulsion().apply(&mut sites, &mut velocities, &bounds, &mut rng);
        let after = sites[0].distance(sites[1]);

        assert!(after > before);
        // Equal and opposite, pointing apart
        assert!(velocities[0].x < 0.0 && velocities[1].x > 0.0);
        assert!((velocities[0] + velocities[1]).length() < 1e-12);
        // 0.25 * (20 - 5) / 20 * 0.9
        assert!((velocities[1].x - 0.16875).abs() < 1e-12);
    }

    #[test]
    fn test_distant_pair_untouched() {
        let mut sites = vec![DVec2::new(10.0, 10.0), DVec2::new(50.0, 10.0)];
        let original = sites.clone();
        let mut velocities = vec![DVec2::ZERO; 2];
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        repulsion().apply(&mut sites, &mut velocities, &Bounds::new(100.0, 100.0), &mut rng);

        assert_eq!(sites, original);
        assert_eq!(velocities, vec![DVec2::ZERO; 2]);
    }

    #[test]
    fn test_coincident_sites_get_nudged() {
        let mut sites = vec![DVec2::new(50.0, 50.0); 2];
        let mut velocities = vec![DVec2::ZERO; 2];
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        repulsion().apply(&mut sites, &mut velocities, &Bounds::new(100.0, 100.0), &mut rng);

        assert!(sites[0].is_finite() && sites[1].is_finite());
        assert!(sites[0].distance(sites[1]) > 0.0);
    }

    #[test]
    fn test_positions_clamped() {
        let mut sites = vec![DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0)];
        let mut velocities = vec![DVec2::new(-10.0, -10.0), DVec2::ZERO];
        let bounds = Bounds::new(100.0, 100.0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        repulsion().apply(&mut sites, &mut velocities, &bounds, &mut rng);
        for s in &sites {
            assert!(bounds.contains(*s));
        }
    }

    #[test]
    fn test_zero_radius_still_integrates() {
        let mut sites = vec![DVec2::new(5.0, 5.0), DVec2::new(5.0, 5.0)];
        let mut velocities = vec![DVec2::new(1.0, 0.0), DVec2::ZERO];
        let rep = Repulsion {
            radius: 0.0,
            ..repulsion()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        rep.apply(&mut sites, &mut velocities, &Bounds::new(10.0, 10.0), &mut rng);

        // No pair forces, but the carried velocity is damped and applied
        assert_eq!(velocities, vec![DVec2::new(0.9, 0.0), DVec2::ZERO]);
        assert!((sites[0] - DVec2::new(5.9, 5.0)).length() < 1e-12);
        assert_eq!(sites[1], DVec2::new(5.0, 5.0));
    }

    #[test]
    #[should_panic(expected = "one velocity per site")]
    fn test_mismatched_velocities_panic() {
        let mut sites = vec![DVec2::new(1.0, 1.0), DVec2::new(2.0, 1.0)];
        let mut velocities = vec![DVec2::ZERO];
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        repulsion().apply(&mut sites, &mut velocities, &Bounds::new(10.0, 10.0), &mut rng);
    }

    #[test]
    fn test_sync_velocities() {
        let mut velocities = vec![DVec2::ONE; 3];
        sync_velocities(&mut velocities, 5);
        assert_eq!(velocities.len(), 5);
        assert_eq!(velocities[4], DVec2::ZERO);

        sync_velocities(&mut velocities, 2);
        assert_eq!(velocities, vec![DVec2::ONE; 2]);
    }
}
