//! Nearest-site lookups
//!
//! The Voronoi cell containing a position is, by definition, the cell of the
//! nearest site, so a KD-tree over the sites answers "which cell is under the
//! pointer" without walking the diagram.
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use glam::DVec2;
#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

/// Wrapper around KD-tree for nearest-site queries
///
/// # Performance
///
/// - Construction: O(n log n), rebuilt once per generation
/// - Query: O(log n)
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SiteIndex {
    tree: ImmutableKdTree<f64, usize, 2, 32>,
    len: usize,
}

#[cfg(feature = "spatial-index")]
impl SiteIndex {
    /// Build the index from site positions
    ///
    /// Returns `None` for an empty site list.
    ///
    /// # Example
    ///
    /// ```
    /// use voronoi_automaton::*;
    /// use glam::DVec2;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let sites = vec![DVec2::new(10.0, 10.0), DVec2::new(90.0, 90.0)];
    /// let index = SiteIndex::new(&sites).unwrap();
    /// assert_eq!(index.find_nearest(DVec2::new(20.0, 5.0)), 0);
    /// # }
    /// ```
    pub fn new(sites: &[DVec2]) -> Option<Self> {
        if sites.is_empty() {
            return None;
        }

        let points: Vec<[f64; 2]> = sites.iter().map(|s| [s.x, s.y]).collect();

        Some(Self {
            tree: ImmutableKdTree::new_from_slice(&points),
            len: sites.len(),
        })
    }

    /// Index of the site nearest to `position`
    pub fn find_nearest(&self, position: DVec2) -> usize {
        let query = [position.x, position.y];
        let result = self.tree.nearest_one::<SquaredEuclidean>(&query);
        result.item as usize
    }

    /// Number of indexed sites
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
