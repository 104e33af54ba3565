//! Approximate priority queue of pending circle events
//!
//! Events are hashed into buckets by their sweep key `ystar`, and kept in
//! (ystar, x) order inside each bucket. Each bucket is stored in descending
//! order so the bucket minimum pops off the end.

use glam::DVec2;
use std::cmp::Ordering;

use super::beach_line::ArcId;
use super::clip::Bounds;

/// A scheduled circle event for one half-edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleEvent {
    /// Half-edge whose right neighbour's arc disappears at this event
    pub arc: ArcId,
    /// Candidate Voronoi vertex
    pub vertex: DVec2,
    /// Sweep-line position at which the event fires
    pub ystar: f64,
}

impl CircleEvent {
    /// (x, ystar) as used for comparison against site events
    #[inline]
    pub fn key(&self) -> DVec2 {
        DVec2::new(self.vertex.x, self.ystar)
    }
}

fn key_cmp(a: &CircleEvent, b: &CircleEvent) -> Ordering {
    a.ystar
        .partial_cmp(&b.ystar)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.vertex.x.partial_cmp(&b.vertex.x).unwrap_or(Ordering::Equal))
}

#[derive(Debug)]
pub struct EventQueue {
    buckets: Vec<Vec<CircleEvent>>,
    /// Bucket holding the pending event of each half-edge
    pending: Vec<Option<usize>>,
    /// Lowest bucket that may be non-empty
    min_bucket: usize,
    count: usize,
    ymin: f64,
    height: f64,
}

impl EventQueue {
    pub fn new(site_count: usize, bounds: &Bounds) -> Self {
        let bucket_count = ((4.0 * ((site_count + 4) as f64).sqrt()) as usize).max(1);
        Self {
            buckets: vec![Vec::new(); bucket_count],
            pending: Vec::with_capacity(5 * site_count),
            min_bucket: 0,
            count: 0,
            ymin: bounds.min.y,
            height: bounds.height(),
        }
    }

    #[cfg(test)]
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[cfg(test)]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[cfg(test)]
    pub fn has_pending(&self, arc: ArcId) -> bool {
        matches!(self.pending.get(arc.index()), Some(Some(_)))
    }

    fn bucket(&mut self, ystar: f64) -> usize {
        let size = self.buckets.len();
        let scaled = (ystar - self.ymin) / self.height * size as f64;
        let bucket = (scaled.max(0.0) as usize).min(size - 1);
        if bucket < self.min_bucket {
            self.min_bucket = bucket;
        }
        bucket
    }

    /// Schedule a circle event for `arc` at `vertex`, firing at `vertex.y + offset`
    ///
    /// Any event already pending for `arc` is cancelled first.
    pub fn insert(&mut self, arc: ArcId, vertex: DVec2, offset: f64) {
        self.delete_if_present(arc);

        let event = CircleEvent {
            arc,
            vertex,
            ystar: vertex.y + offset,
        };
        let bucket = self.bucket(event.ystar);
        let chain = &mut self.buckets[bucket];
        // New events go ahead of equal keys
        let position = chain.partition_point(|e| key_cmp(e, &event) != Ordering::Less);
        chain.insert(position, event);

        if arc.index() >= self.pending.len() {
            self.pending.resize(arc.index() + 1, None);
        }
        self.pending[arc.index()] = Some(bucket);
        self.count += 1;
    }

    /// Cancel the pending event of `arc`; returns whether one existed
    pub fn delete_if_present(&mut self, arc: ArcId) -> bool {
        let Some(bucket) = self.pending.get_mut(arc.index()).and_then(Option::take) else {
            return false;
        };
        let chain = &mut self.buckets[bucket];
        if let Some(position) = chain.iter().position(|e| e.arc == arc) {
            chain.remove(position);
            self.count -= 1;
        }
        true
    }

    /// Position (x, ystar) of the next event without removing it
    pub fn peek_min(&mut self) -> Option<DVec2> {
        if self.count == 0 {
            return None;
        }
        while self.buckets[self.min_bucket].is_empty() {
            self.min_bucket += 1;
        }
        self.buckets[self.min_bucket].last().map(CircleEvent::key)
    }

    /// Remove and return the next event
    pub fn pop_min(&mut self) -> Option<CircleEvent> {
        self.peek_min()?;
        let event = self.buckets[self.min_bucket].pop()?;
        self.pending[event.arc.index()] = None;
        self.count -= 1;
        Some(event)
    }
}
