//! Geometric primitives for the sweep
//!
//! Sites, bisector edges and the two predicates the beach line is built on:
//! `right_of` (which side of a bisector a point falls on) and `intersect`
//! (where two neighbouring bisectors meet).
//!
//! A bisector is stored as `a·x + b·y = c` with either `a` or `b` normalised
//! to exactly `1.0`, whichever keeps the other coefficient bounded.

use glam::DVec2;
use std::cmp::Ordering;

/// Determinant magnitude below which two bisectors are treated as parallel
pub const PARALLEL_TOLERANCE: f64 = 1.0e-10;

/// An input point together with its identifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    /// Position of the site
    pub point: DVec2,
    /// Insertion id of the site in its [`SiteStore`](super::SiteStore)
    pub id: usize,
}

impl Site {
    pub fn new(id: usize, point: DVec2) -> Self {
        Self { point, id }
    }
}

/// Which side of a bisector a half-edge bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A resolved Voronoi vertex terminating a bisector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Index in the output vertex list
    pub id: usize,
    pub point: DVec2,
}

/// Perpendicular bisector between two sites
#[derive(Debug, Clone)]
pub struct Edge {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    /// The two sites this edge separates; `region[1]` is the "far" site
    pub region: [Site; 2],
    /// Terminating vertices, `None` while the edge extends to infinity
    pub endpoints: [Option<Vertex>; 2],
    /// Sequential edge number, also the index of its entry in the line list
    pub number: usize,
    /// Set once the edge has been clipped to the bounding box
    pub clipped: bool,
}

impl Edge {
    /// Build the bisector of `s1` and `s2`
    ///
    /// The larger of |Δx| and |Δy| is used as the normalising divisor so the
    /// remaining coefficient stays within [-1, 1].
    pub fn bisect(s1: Site, s2: Site, number: usize) -> Self {
        let dx = s2.point.x - s1.point.x;
        let dy = s2.point.y - s1.point.y;
        let c = s1.point.x * dx + s1.point.y * dy + (dx * dx + dy * dy) * 0.5;

        let (a, b, c) = if dx.abs() > dy.abs() {
            (1.0, dy / dx, c / dx)
        } else {
            (dx / dy, 1.0, c / dy)
        };

        Self {
            a,
            b,
            c,
            region: [s1, s2],
            endpoints: [None, None],
            number,
            clipped: false,
        }
    }

    /// True when the equation is normalised on the x coefficient
    #[inline]
    pub fn is_x_normalized(&self) -> bool {
        self.a == 1.0
    }

    #[inline]
    pub fn site(&self, side: Side) -> Site {
        self.region[side.index()]
    }

    #[inline]
    pub fn endpoint(&self, side: Side) -> Option<Vertex> {
        self.endpoints[side.index()]
    }

    /// Both endpoints are known
    pub fn is_complete(&self) -> bool {
        self.endpoints[0].is_some() && self.endpoints[1].is_some()
    }
}

/// Sweep order: y first, ties broken by x
///
/// A total order, so sorting never panics even on NaN coordinates.
pub fn compare(p1: DVec2, p2: DVec2) -> Ordering {
    p1.y.total_cmp(&p2.y).then_with(|| p1.x.total_cmp(&p2.x))
}

/// Does `p` lie to the right of the half-edge bounding `side` of `edge`?
///
/// Uses the above/below case split of Fortune's formulation: a cheap linear
/// test settles most queries, and only the remaining ones fall through to
/// the quadratic comparison against the parabola.
pub fn right_of(edge: &Edge, side: Side, p: DVec2) -> bool {
    let top = edge.region[1].point;
    let right_of_site = p.x > top.x;
    if right_of_site && side == Side::Left {
        return true;
    }
    if !right_of_site && side == Side::Right {
        return false;
    }

    let above = if edge.is_x_normalized() {
        let dyp = p.y - top.y;
        let dxp = p.x - top.x;
        let mut fast = false;
        let mut above;

        if (!right_of_site && edge.b < 0.0) || (right_of_site && edge.b >= 0.0) {
            above = dyp >= edge.b * dxp;
            fast = above;
        } else {
            above = p.x + p.y * edge.b > edge.c;
            if edge.b < 0.0 {
                above = !above;
            }
            if !above {
                fast = true;
            }
        }

        if !fast {
            let dxs = top.x - edge.region[0].point.x;
            above = edge.b * (dxp * dxp - dyp * dyp)
                < dxs * dyp * (1.0 + 2.0 * dxp / dxs + edge.b * edge.b);
            if edge.b < 0.0 {
                above = !above;
            }
        }
        above
    } else {
        let yl = edge.c - edge.a * p.x;
        let t1 = p.y - yl;
        let t2 = p.x - top.x;
        let t3 = yl - top.y;
        t1 * t1 > t2 * t2 + t3 * t3
    };

    match side {
        Side::Left => above,
        Side::Right => !above,
    }
}

/// Why two bisectors produced no circle-event candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// One of the half-edges is a beach-line terminator
    MissingEdge,
    /// Both bisectors share their far site
    SameFarSite,
    /// The bisectors are (nearly) parallel
    Parallel,
    /// The intersection lies behind the sweep direction
    WrongSide,
}

/// Intersection of the bisectors bounding two adjacent half-edges
pub fn intersect(
    first: Option<(&Edge, Side)>,
    second: Option<(&Edge, Side)>,
) -> Result<DVec2, Degeneracy> {
    let (Some((e1, side1)), Some((e2, side2))) = (first, second) else {
        return Err(Degeneracy::MissingEdge);
    };
    if e1.region[1].id == e2.region[1].id {
        return Err(Degeneracy::SameFarSite);
    }

    let d = e1.a * e2.b - e1.b * e2.a;
    if d.abs() < PARALLEL_TOLERANCE {
        return Err(Degeneracy::Parallel);
    }

    let x = (e1.c * e2.b - e2.c * e1.b) / d;
    let y = (e2.c * e1.a - e1.c * e2.a) / d;

    let (edge, side) = if compare(e1.region[1].point, e2.region[1].point) == Ordering::Less {
        (e1, side1)
    } else {
        (e2, side2)
    };

    let right_of_site = x >= edge.region[1].point.x;
    if (right_of_site && side == Side::Left) || (!right_of_site && side == Side::Right) {
        return Err(Degeneracy::WrongSide);
    }

    Ok(DVec2::new(x, y))
}
