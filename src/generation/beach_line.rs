//! Beach line: the ordered half-edges crossing the sweep line
//!
//! Half-edges live in an arena and link to their neighbours by index. Two
//! sentinel terminators bound the sequence and are never removed. A coarse
//! hash on x caches recently located half-edges so that a new site can be
//! placed with a short linear walk instead of a scan from the left end.

use glam::DVec2;

use super::clip::Bounds;
use super::geometry::{right_of, Edge, Side, Site};

/// Index of a bisector in the sweep's edge arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(pub usize);

impl EdgeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a half-edge in the beach-line arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArcId(usize);

impl ArcId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a half-edge refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcEdge {
    /// One of the two terminators; bounds the unbounded ends of the beach line
    Sentinel,
    /// A half of a live bisector
    Live(EdgeId),
    /// Spliced out of the beach line; stale hash entries pointing here are evicted
    Deleted,
}

#[derive(Debug, Clone)]
struct HalfEdge {
    left: ArcId,
    right: ArcId,
    edge: ArcEdge,
    side: Side,
}

#[derive(Debug)]
pub struct BeachLine {
    arcs: Vec<HalfEdge>,
    hash: Vec<Option<ArcId>>,
    left_end: ArcId,
    right_end: ArcId,
    xmin: f64,
    width: f64,
    bottom: Site,
}

impl BeachLine {
    /// Empty beach line for `site_count` sites
    ///
    /// `bottom` is the first site of the sweep; it owns the region on the
    /// far side of both terminators.
    pub fn new(site_count: usize, bounds: &Bounds, bottom: Site) -> Self {
        let hash_size = ((2.0 * ((site_count + 4) as f64).sqrt()) as usize).max(2);
        let left_end = ArcId(0);
        let right_end = ArcId(1);

        let mut arcs = Vec::with_capacity(5 * site_count + 2);
        for _ in 0..2 {
            arcs.push(HalfEdge {
                left: left_end,
                right: right_end,
                edge: ArcEdge::Sentinel,
                side: Side::Left,
            });
        }

        let mut hash = vec![None; hash_size];
        hash[0] = Some(left_end);
        hash[hash_size - 1] = Some(right_end);

        Self {
            arcs,
            hash,
            left_end,
            right_end,
            xmin: bounds.min.x,
            width: bounds.width(),
            bottom,
        }
    }

    #[cfg(test)]
    #[inline]
    pub fn left_end(&self) -> ArcId {
        self.left_end
    }

    #[cfg(test)]
    #[inline]
    pub fn right_end(&self) -> ArcId {
        self.right_end
    }

    #[inline]
    pub fn hash_size(&self) -> usize {
        self.hash.len()
    }

    /// Allocate an unlinked half-edge for one side of `edge`
    pub fn create(&mut self, edge: EdgeId, side: Side) -> ArcId {
        let id = ArcId(self.arcs.len());
        self.arcs.push(HalfEdge {
            left: id,
            right: id,
            edge: ArcEdge::Live(edge),
            side,
        });
        id
    }

    /// Splice `arc` in directly to the right of `base`
    pub fn insert_after(&mut self, base: ArcId, arc: ArcId) {
        let right = self.arcs[base.0].right;
        self.arcs[arc.0].left = base;
        self.arcs[arc.0].right = right;
        self.arcs[right.0].left = arc;
        self.arcs[base.0].right = arc;
    }

    /// Splice `arc` out and tombstone it
    pub fn remove(&mut self, arc: ArcId) {
        let (left, right) = (self.arcs[arc.0].left, self.arcs[arc.0].right);
        self.arcs[left.0].right = right;
        self.arcs[right.0].left = left;
        self.arcs[arc.0].edge = ArcEdge::Deleted;
    }

    #[inline]
    pub fn left(&self, arc: ArcId) -> ArcId {
        self.arcs[arc.0].left
    }

    #[inline]
    pub fn right(&self, arc: ArcId) -> ArcId {
        self.arcs[arc.0].right
    }

    #[inline]
    pub fn side(&self, arc: ArcId) -> Side {
        self.arcs[arc.0].side
    }

    #[cfg(test)]
    #[inline]
    pub fn state(&self, arc: ArcId) -> ArcEdge {
        self.arcs[arc.0].edge
    }

    /// The bisector of a live half-edge
    #[inline]
    pub fn edge(&self, arc: ArcId) -> Option<EdgeId> {
        match self.arcs[arc.0].edge {
            ArcEdge::Live(edge) => Some(edge),
            ArcEdge::Sentinel | ArcEdge::Deleted => None,
        }
    }

    /// Site owning the region immediately left of `arc`
    pub fn left_region(&self, arc: ArcId, edges: &[Edge]) -> Site {
        match self.edge(arc) {
            Some(edge) => edges[edge.index()].site(self.side(arc)),
            None => self.bottom,
        }
    }

    /// Site owning the region immediately right of `arc`
    pub fn right_region(&self, arc: ArcId, edges: &[Edge]) -> Site {
        match self.edge(arc) {
            Some(edge) => edges[edge.index()].site(self.side(arc).opposite()),
            None => self.bottom,
        }
    }

    /// Bisectors of every live half-edge, left to right
    pub fn live_edges(&self) -> Vec<EdgeId> {
        let mut edges = Vec::new();
        let mut arc = self.right(self.left_end);
        while arc != self.right_end {
            edges.extend(self.edge(arc));
            arc = self.right(arc);
        }
        edges
    }

    fn is_right_of(&self, arc: ArcId, p: DVec2, edges: &[Edge]) -> bool {
        match self.edge(arc) {
            Some(edge) => right_of(&edges[edge.index()], self.side(arc), p),
            None => false,
        }
    }

    /// Cached half-edge for a hash bucket, evicting tombstoned entries
    fn hashed(&mut self, bucket: isize) -> Option<ArcId> {
        if bucket < 0 || bucket as usize >= self.hash.len() {
            return None;
        }
        let slot = &mut self.hash[bucket as usize];
        let arc = (*slot)?;
        if self.arcs[arc.0].edge == ArcEdge::Deleted {
            *slot = None;
            return None;
        }
        Some(arc)
    }

    /// Half-edge immediately left of `p` on the current beach line
    pub fn find_arc_left_of(&mut self, p: DVec2, edges: &[Edge]) -> ArcId {
        let size = self.hash.len();
        let scaled = (p.x - self.xmin) / self.width * size as f64;
        let bucket = (scaled.max(0.0) as usize).min(size - 1);

        // Terminators sit in the first and last bucket, so this always ends
        let mut arc = match self.hashed(bucket as isize) {
            Some(arc) => arc,
            None => {
                let mut offset = 1;
                loop {
                    if let Some(arc) = self.hashed(bucket as isize - offset) {
                        break arc;
                    }
                    if let Some(arc) = self.hashed(bucket as isize + offset) {
                        break arc;
                    }
                    offset += 1;
                }
            }
        };

        if arc == self.left_end || (arc != self.right_end && self.is_right_of(arc, p, edges)) {
            loop {
                arc = self.right(arc);
                if arc == self.right_end || !self.is_right_of(arc, p, edges) {
                    break;
                }
            }
            arc = self.left(arc);
        } else {
            loop {
                arc = self.left(arc);
                if arc == self.left_end || self.is_right_of(arc, p, edges) {
                    break;
                }
            }
        }

        if bucket > 0 && bucket < size - 1 {
            self.hash[bucket] = Some(arc);
        }
        arc
    }
}
