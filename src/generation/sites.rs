//! Site storage and ordering
//!
//! Sites keep the id they were inserted with. Sorting reorders them in place
//! by (y, x), which is the order the sweep consumes them in.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::clip::Bounds;
use super::geometry::{compare, Site};
use crate::error::{Result, VoronoiError};

/// Relative tolerance (fraction of the box diagonal) under which two sites are duplicates
pub const DUPLICATE_TOLERANCE: f64 = 1.0e-10;

/// Input sites of one diagram
#[derive(Debug, Clone, Default)]
pub struct SiteStore {
    sites: Vec<Site>,
    /// Position of each id in `sites`
    slots: Vec<usize>,
    sorted: bool,
}

impl SiteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sites: Vec::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            sorted: false,
        }
    }

    /// Build a store from explicit points, ids following slice order
    pub fn from_points(points: &[DVec2]) -> Self {
        let mut store = Self::with_capacity(points.len());
        for &p in points {
            store.add(p);
        }
        store
    }

    /// Add one site and return its id
    pub fn add(&mut self, point: DVec2) -> usize {
        let id = self.sites.len();
        self.slots.push(self.sites.len());
        self.sites.push(Site::new(id, point));
        self.sorted = false;
        id
    }

    /// Add `count` sites drawn uniformly from `bounds` with the given generator
    pub fn add_random<R: Rng>(&mut self, count: usize, bounds: &Bounds, rng: &mut R) {
        self.sites.reserve(count);
        self.slots.reserve(count);
        for _ in 0..count {
            let x = rng.gen_range(bounds.min.x..bounds.max.x);
            let y = rng.gen_range(bounds.min.y..bounds.max.y);
            self.add(DVec2::new(x, y));
        }
    }

    /// Add `count` random sites from a ChaCha generator seeded with `seed`
    ///
    /// The same seed always yields the same sites.
    pub fn add_random_seeded(&mut self, count: usize, bounds: &Bounds, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.add_random(count, bounds, &mut rng);
    }

    /// Stable sort by (y, x)
    pub fn sort(&mut self) {
        if self.sorted {
            return;
        }
        self.sites.sort_by(|a, b| compare(a.point, b.point));
        for (slot, site) in self.sites.iter().enumerate() {
            self.slots[site.id] = slot;
        }
        self.sorted = true;
    }

    #[inline]
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Sites in storage order (sweep order once sorted)
    #[inline]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Look up a site position by id
    pub fn get(&self, id: usize) -> Option<DVec2> {
        self.slots.get(id).map(|&slot| self.sites[slot].point)
    }

    /// Site positions indexed by id
    pub fn points(&self) -> Vec<DVec2> {
        self.slots.iter().map(|&slot| self.sites[slot].point).collect()
    }

    pub fn clear(&mut self) {
        self.sites.clear();
        self.slots.clear();
        self.sorted = false;
    }

    /// Check the preconditions of a sweep over `bounds`
    ///
    /// # Errors
    ///
    /// - `EmptySiteSet` if there are no sites
    /// - `InvalidSite` for NaN or infinite coordinates
    /// - `SiteOutOfBounds` for sites outside the closed rectangle
    /// - `DuplicateSite` for two sites closer than [`DUPLICATE_TOLERANCE`]
    pub fn validate(&self, bounds: &Bounds) -> Result<()> {
        if self.sites.is_empty() {
            return Err(VoronoiError::EmptySiteSet);
        }

        for site in &self.sites {
            let p = site.point;
            if !p.is_finite() {
                return Err(VoronoiError::InvalidSite {
                    id: site.id,
                    x: p.x,
                    y: p.y,
                });
            }
            if !bounds.contains(p) {
                return Err(VoronoiError::SiteOutOfBounds {
                    id: site.id,
                    x: p.x,
                    y: p.y,
                });
            }
        }

        let mut order: Vec<usize> = (0..self.sites.len()).collect();
        if !self.sorted {
            order.sort_by(|&a, &b| compare(self.sites[a].point, self.sites[b].point));
        }

        // Only sites within the tolerance band in y can collide
        let tolerance = DUPLICATE_TOLERANCE * bounds.diagonal();
        for (i, &slot) in order.iter().enumerate() {
            let site = &self.sites[slot];
            for other in order[i + 1..].iter().map(|&s| &self.sites[s]) {
                if other.point.y - site.point.y > tolerance {
                    break;
                }
                if site.point.distance(other.point) <= tolerance {
                    return Err(VoronoiError::DuplicateSite {
                        first: site.id.min(other.id),
                        second: site.id.max(other.id),
                    });
                }
            }
        }

        Ok(())
    }
}

impl FromIterator<DVec2> for SiteStore {
    fn from_iter<I: IntoIterator<Item = DVec2>>(iter: I) -> Self {
        let mut store = SiteStore::new();
        for p in iter {
            store.add(p);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    fn bounds() -> Bounds {
        Bounds::from_size(100.0, 100.0).unwrap()
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut store = SiteStore::new();
        assert_eq!(store.add(DVec2::new(1.0, 2.0)), 0);
        assert_eq!(store.add(DVec2::new(3.0, 4.0)), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1), Some(DVec2::new(3.0, 4.0)));
        assert_eq!(store.get(2), None);
    }

    #[test]
    fn test_sort_orders_by_y_then_x_keeping_ids() {
        let mut store = SiteStore::from_points(&[
            DVec2::new(50.0, 80.0),
            DVec2::new(90.0, 10.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(30.0, 40.0),
        ]);
        store.sort();

        let ids: Vec<usize> = store.sites().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1, 3, 0]);
        assert!(store.is_sorted());

        // Lookups by id are unaffected by the reordering
        assert_eq!(store.get(0), Some(DVec2::new(50.0, 80.0)));
        assert_eq!(store.points()[1], DVec2::new(90.0, 10.0));

        store.add(DVec2::new(1.0, 1.0));
        assert!(!store.is_sorted());
    }

    #[test]
    fn test_random_sites_are_deterministic() {
        let mut a = SiteStore::new();
        let mut b = SiteStore::new();
        a.add_random_seeded(50, &bounds(), 42);
        b.add_random_seeded(50, &bounds(), 42);

        assert_eq!(a.points(), b.points());
        assert!(a.points().iter().all(|p| bounds().contains(*p)));

        let mut c = SiteStore::new();
        c.add_random_seeded(50, &bounds(), 43);
        assert_ne!(a.points(), c.points());
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert_eq!(SiteStore::new().validate(&bounds()), Err(VoronoiError::EmptySiteSet));

        let store = SiteStore::from_points(&[DVec2::new(10.0, 10.0), DVec2::new(120.0, 5.0)]);
        assert!(matches!(
            store.validate(&bounds()),
            Err(VoronoiError::SiteOutOfBounds { id: 1, .. })
        ));

        let store = SiteStore::from_points(&[DVec2::new(f64::NAN, 10.0)]);
        assert!(matches!(
            store.validate(&bounds()),
            Err(VoronoiError::InvalidSite { id: 0, .. })
        ));

        let store = SiteStore::from_points(&[
            DVec2::new(10.0, 10.0),
            DVec2::new(40.0, 10.0),
            DVec2::new(10.0, 10.0),
        ]);
        assert_eq!(
            store.validate(&bounds()),
            Err(VoronoiError::DuplicateSite { first: 0, second: 2 })
        );
    }

    #[test]
    fn test_sort_and_validate_with_nan_sites() {
        let mut store = SiteStore::new();
        store.add_random_seeded(24, &bounds(), 5);
        for i in (0..24).step_by(3) {
            store.add(DVec2::new(i as f64, f64::NAN));
        }
        store.add(DVec2::new(f64::NAN, 30.0));

        assert!(matches!(
            store.validate(&bounds()),
            Err(VoronoiError::InvalidSite { .. })
        ));

        store.sort();
        assert!(store.is_sorted());
        assert_eq!(store.len(), 33);
        assert!(store.get(32).is_some_and(|p| p.x.is_nan()));
        let finite: Vec<DVec2> = store
            .sites()
            .iter()
            .map(|s| s.point)
            .filter(|p| p.is_finite())
            .collect();
        assert!(finite.windows(2).all(|w| compare(w[0], w[1]) != Ordering::Greater));
    }

    #[test]
    fn test_validate_accepts_boundary_sites() {
        let store = SiteStore::from_points(&[DVec2::new(0.0, 0.0), DVec2::new(100.0, 50.0)]);
        assert!(store.validate(&bounds()).is_ok());
    }
}
