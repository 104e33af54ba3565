//! Fortune sweep over sorted sites
//!
//! One [`Sweep`] is built per diagram computation and consumed by
//! [`Sweep::run`]. It owns every transient structure (edge arena, beach line,
//! event queue) and hands back only the raw output: vertices, one line per
//! bisector, and the clipped edge segments.

use glam::DVec2;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use tracing::{debug, trace};

use super::beach_line::{ArcId, BeachLine, EdgeId};
use super::clip::{clip_edge, Bounds};
use super::event_queue::EventQueue;
use super::geometry::{compare, intersect, Edge, Side, Site, Vertex};
use crate::diagram::VoronoiEdge;
use crate::error::{Result, VoronoiError};

/// Raw result of a sweep, before cells are assembled
#[derive(Debug, Clone, Default)]
pub struct SweepOutput {
    /// Every vertex created, indexed by vertex id
    pub vertices: Vec<DVec2>,
    /// Site ids of each bisector, indexed by edge number
    pub lines: Vec<[usize; 2]>,
    /// Bisector pieces that survived clipping
    pub edges: Vec<VoronoiEdge>,
    /// Number of circle events processed
    pub circle_events: usize,
}

/// What the sweep does next
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Site(Site),
    Circle,
    Finished,
}

pub struct Sweep<'a> {
    sites: &'a [Site],
    next_site: usize,
    bounds: Bounds,
    edges: Vec<Edge>,
    beach: BeachLine,
    queue: EventQueue,
    output: SweepOutput,
    /// Vertices lying on the box boundary, shared by edges meeting there
    boundary_vertices: Vec<usize>,
}

impl<'a> Sweep<'a> {
    /// Prepare a sweep over `sites`, which must already be sorted by (y, x)
    ///
    /// # Errors
    ///
    /// Returns `EmptySiteSet` if `sites` is empty.
    pub fn new(sites: &'a [Site], bounds: Bounds) -> Result<Self> {
        let bottom = *sites.first().ok_or(VoronoiError::EmptySiteSet)?;
        let n = sites.len();

        Ok(Self {
            sites,
            next_site: 1,
            bounds,
            edges: Vec::with_capacity(5 * n),
            beach: BeachLine::new(n, &bounds, bottom),
            queue: EventQueue::new(n, &bounds),
            output: SweepOutput {
                vertices: Vec::with_capacity(2 * n),
                lines: Vec::with_capacity(3 * n),
                edges: Vec::with_capacity(3 * n),
                circle_events: 0,
            },
            boundary_vertices: Vec::new(),
        })
    }

    /// Process every event, checking `cancel` before each one
    pub fn run(mut self, cancel: Option<&AtomicBool>) -> Result<SweepOutput> {
        debug!(
            sites = self.sites.len(),
            event_buckets = self.queue.bucket_count(),
            beach_buckets = self.beach.hash_size(),
            "starting sweep"
        );

        loop {
            if cancel.is_some_and(|flag| flag.load(AtomicOrdering::Relaxed)) {
                debug!(processed_sites = self.next_site, "sweep cancelled");
                return Err(VoronoiError::Cancelled);
            }
            match self.next_step() {
                Step::Site(site) => self.handle_site(site),
                Step::Circle => self.handle_circle(),
                Step::Finished => break,
            }
        }

        for edge in self.beach.live_edges() {
            self.clip(edge);
        }

        debug!(
            vertices = self.output.vertices.len(),
            bisectors = self.output.lines.len(),
            edges = self.output.edges.len(),
            circle_events = self.output.circle_events,
            "sweep finished"
        );
        Ok(self.output)
    }

    fn next_step(&mut self) -> Step {
        let site = self.sites.get(self.next_site).copied();
        match (site, self.queue.peek_min()) {
            (Some(site), None) => Step::Site(site),
            (Some(site), Some(event)) if compare(site.point, event) == Ordering::Less => {
                Step::Site(site)
            }
            (_, Some(_)) => Step::Circle,
            (None, None) => Step::Finished,
        }
    }

    fn handle_site(&mut self, site: Site) {
        self.next_site += 1;

        let lbnd = self.beach.find_arc_left_of(site.point, &self.edges);
        let rbnd = self.beach.right(lbnd);
        let bot = self.beach.right_region(lbnd, &self.edges);
        let edge = self.bisect(bot, site);

        let bisector = self.beach.create(edge, Side::Left);
        self.beach.insert_after(lbnd, bisector);
        if let Some(p) = self.circle_candidate(lbnd, bisector) {
            self.queue.insert(lbnd, p, p.distance(site.point));
        }

        let lbnd = bisector;
        let bisector = self.beach.create(edge, Side::Right);
        self.beach.insert_after(lbnd, bisector);
        if let Some(p) = self.circle_candidate(bisector, rbnd) {
            self.queue.insert(bisector, p, p.distance(site.point));
        }
    }

    fn handle_circle(&mut self) {
        let Some(event) = self.queue.pop_min() else {
            return;
        };
        self.output.circle_events += 1;

        let lbnd = event.arc;
        let llbnd = self.beach.left(lbnd);
        let rbnd = self.beach.right(lbnd);
        let rrbnd = self.beach.right(rbnd);
        let (Some(left_edge), Some(right_edge)) = (self.beach.edge(lbnd), self.beach.edge(rbnd))
        else {
            trace!(arc = lbnd.index(), "circle event next to a terminator ignored");
            return;
        };

        let mut bot = self.beach.left_region(lbnd, &self.edges);
        let mut top = self.beach.right_region(rbnd, &self.edges);

        let vertex = self.materialize_vertex(event.vertex, [left_edge, right_edge]);
        self.make_endpoint(left_edge, self.beach.side(lbnd), vertex);
        self.make_endpoint(right_edge, self.beach.side(rbnd), vertex);

        self.beach.remove(lbnd);
        self.queue.delete_if_present(rbnd);
        self.beach.remove(rbnd);

        // The lower site goes first so the new bisector keeps the sweep's orientation
        let mut side = Side::Left;
        if bot.point.y > top.point.y {
            std::mem::swap(&mut bot, &mut top);
            side = Side::Right;
        }
        let edge = self.bisect(bot, top);
        let bisector = self.beach.create(edge, side);
        self.beach.insert_after(llbnd, bisector);
        self.make_endpoint(edge, side.opposite(), vertex);

        if let Some(p) = self.circle_candidate(llbnd, bisector) {
            self.queue.insert(llbnd, p, p.distance(bot.point));
        }
        if let Some(p) = self.circle_candidate(bisector, rrbnd) {
            self.queue.insert(bisector, p, p.distance(bot.point));
        }
    }

    /// Create the bisector of `s1` and `s2` and record its line entry
    fn bisect(&mut self, s1: Site, s2: Site) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge::bisect(s1, s2, id.index()));
        self.output.lines.push([s1.id, s2.id]);
        id
    }

    fn boundary(&self, arc: ArcId) -> Option<(&Edge, Side)> {
        self.beach
            .edge(arc)
            .map(|edge| (&self.edges[edge.index()], self.beach.side(arc)))
    }

    fn circle_candidate(&self, left: ArcId, right: ArcId) -> Option<DVec2> {
        match intersect(self.boundary(left), self.boundary(right)) {
            Ok(p) => Some(p),
            Err(reason) => {
                trace!(?reason, "dropped circle-event candidate");
                None
            }
        }
    }

    /// Turn a circle-event point into an output vertex
    ///
    /// Co-circular sites fire several events at one point; an endpoint of
    /// either terminating bisector already sitting there is reused.
    fn materialize_vertex(&mut self, point: DVec2, edges: [EdgeId; 2]) -> Vertex {
        let tolerance = self.bounds.tolerance();
        for edge in edges {
            for end in self.edges[edge.index()].endpoints.iter().flatten() {
                if end.point.distance(point) <= tolerance {
                    trace!(vertex = end.id, "merged coincident circle event");
                    return *end;
                }
            }
        }

        let vertex = Vertex {
            id: self.output.vertices.len(),
            point,
        };
        self.output.vertices.push(point);
        vertex
    }

    fn make_endpoint(&mut self, edge: EdgeId, side: Side, vertex: Vertex) {
        let e = &mut self.edges[edge.index()];
        e.endpoints[side.index()] = Some(vertex);
        if e.is_complete() {
            self.clip(edge);
        }
    }

    /// Clip a finished bisector to the box and emit its segment, once
    fn clip(&mut self, edge: EdgeId) {
        let e = &mut self.edges[edge.index()];
        if e.clipped {
            return;
        }
        e.clipped = true;

        let Some(clipped) = clip_edge(&self.edges[edge.index()], &self.bounds) else {
            trace!(line = edge.index(), "bisector lies outside the box");
            return;
        };

        let first = self.resolve_end(clipped.points[0], clipped.sources[0]);
        let second = self.resolve_end(clipped.points[1], clipped.sources[1]);
        if first.id == second.id {
            trace!(line = edge.index(), "dropped zero-length edge");
            return;
        }

        self.output.edges.push(VoronoiEdge {
            vertex_ids: [first.id, second.id],
            line_id: edge.index(),
            endpoints: [first.point, second.point],
        });
    }

    /// Vertex for one end of a clipped segment
    fn resolve_end(&mut self, point: DVec2, source: Option<Vertex>) -> Vertex {
        let on_boundary = self.bounds.side_of(point).is_some();

        if let Some(vertex) = source {
            if on_boundary && !self.boundary_vertices.contains(&vertex.id) {
                self.boundary_vertices.push(vertex.id);
            }
            return vertex;
        }

        let tolerance = self.bounds.tolerance();
        let vertices = &self.output.vertices;
        if let Some(&id) = self
            .boundary_vertices
            .iter()
            .find(|&&id| vertices[id].distance(point) <= tolerance)
        {
            return Vertex {
                id,
                point: vertices[id],
            };
        }

        let id = self.output.vertices.len();
        self.output.vertices.push(point);
        if on_boundary {
            self.boundary_vertices.push(id);
        }
        Vertex { id, point }
    }
}
