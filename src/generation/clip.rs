//! Bounding rectangle and bisector clipping

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::geometry::{Edge, Vertex};
use crate::error::{Result, VoronoiError};

/// Relative tolerance (fraction of the box diagonal) for "lies on the boundary"
pub const BOUNDARY_TOLERANCE: f64 = 1.0e-9;

/// Axis-aligned rectangle the diagram is clipped to
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Lower-left corner (the origin offset)
    pub min: DVec2,
    /// Upper-right corner
    pub max: DVec2,
}

/// Side of the bounding rectangle a boundary vertex lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundarySide {
    Bottom = 1,
    Top = 2,
    Left = 3,
    Right = 4,
}

impl BoundarySide {
    /// Numeric side code (1 to 4)
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl Bounds {
    /// Create a rectangle from its origin and its size
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the size is not strictly positive or any
    /// coordinate is not finite.
    pub fn new(origin: DVec2, size: DVec2) -> Result<Self> {
        if !origin.is_finite() {
            return Err(VoronoiError::InvalidConfig(format!(
                "origin must be finite (got {}, {})",
                origin.x, origin.y
            )));
        }
        if !size.is_finite() || size.x <= 0.0 || size.y <= 0.0 {
            return Err(VoronoiError::InvalidConfig(format!(
                "bounding box size must be positive (got {} x {})",
                size.x, size.y
            )));
        }
        Ok(Self {
            min: origin,
            max: origin + size,
        })
    }

    /// Rectangle `[0, width] x [0, height]`
    pub fn from_size(width: f64, height: f64) -> Result<Self> {
        Self::new(DVec2::ZERO, DVec2::new(width, height))
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    #[inline]
    pub fn diagonal(&self) -> f64 {
        (self.max - self.min).length()
    }

    #[inline]
    pub fn perimeter(&self) -> f64 {
        2.0 * (self.width() + self.height())
    }

    /// Absolute tolerance used for boundary and coincidence tests
    #[inline]
    pub fn tolerance(&self) -> f64 {
        BOUNDARY_TOLERANCE * self.diagonal()
    }

    /// Closed containment test
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Corners in counter-clockwise order starting at `min`
    pub fn corners(&self) -> [DVec2; 4] {
        [
            self.min,
            DVec2::new(self.max.x, self.min.y),
            self.max,
            DVec2::new(self.min.x, self.max.y),
        ]
    }

    /// Which side `p` lies on, if any
    ///
    /// Corners report the first matching side in the order bottom, right,
    /// top, left.
    pub fn side_of(&self, p: DVec2) -> Option<BoundarySide> {
        let eps = self.tolerance();
        if (p.y - self.min.y).abs() <= eps {
            Some(BoundarySide::Bottom)
        } else if (p.x - self.max.x).abs() <= eps {
            Some(BoundarySide::Right)
        } else if (p.y - self.max.y).abs() <= eps {
            Some(BoundarySide::Top)
        } else if (p.x - self.min.x).abs() <= eps {
            Some(BoundarySide::Left)
        } else {
            None
        }
    }

    /// Counter-clockwise arc length from `min` to the boundary point `p`
    pub fn perimeter_position(&self, p: DVec2) -> Option<f64> {
        let (w, h) = (self.width(), self.height());
        let side = self.side_of(p)?;
        Some(match side {
            BoundarySide::Bottom => p.x - self.min.x,
            BoundarySide::Right => w + (p.y - self.min.y),
            BoundarySide::Top => w + h + (self.max.x - p.x),
            BoundarySide::Left => 2.0 * w + h + (self.max.y - p.y),
        })
    }

    /// Perimeter positions of [`corners`](Self::corners)
    pub fn corner_positions(&self) -> [f64; 4] {
        let (w, h) = (self.width(), self.height());
        [0.0, w, w + h, 2.0 * w + h]
    }
}

/// Result of clipping one bisector against the rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClippedEdge {
    /// The two finite ends of the visible segment
    pub points: [DVec2; 2],
    /// Sweep vertex each end coincides with, if it was not cut by the box
    pub sources: [Option<Vertex>; 2],
}

/// Clip a bisector whose endpoints are final
///
/// Missing endpoints extend to infinity. Returns `None` when no part of the
/// edge lies inside the rectangle.
pub fn clip_edge(edge: &Edge, bounds: &Bounds) -> Option<ClippedEdge> {
    let (s1, s2) = if edge.is_x_normalized() && edge.b >= 0.0 {
        (edge.endpoints[1], edge.endpoints[0])
    } else {
        (edge.endpoints[0], edge.endpoints[1])
    };
    let (min, max) = (bounds.min, bounds.max);

    let (mut x1, mut y1, mut x2, mut y2);
    if edge.is_x_normalized() {
        y1 = match s1 {
            Some(v) if v.point.y > min.y => v.point.y,
            _ => min.y,
        };
        if y1 > max.y {
            return None;
        }
        x1 = edge.c - edge.b * y1;

        y2 = match s2 {
            Some(v) if v.point.y < max.y => v.point.y,
            _ => max.y,
        };
        if y2 < min.y {
            return None;
        }
        x2 = edge.c - edge.b * y2;

        if (x1 > max.x && x2 > max.x) || (x1 < min.x && x2 < min.x) {
            return None;
        }
        if x1 > max.x {
            x1 = max.x;
            y1 = (edge.c - x1) / edge.b;
        }
        if x1 < min.x {
            x1 = min.x;
            y1 = (edge.c - x1) / edge.b;
        }
        if x2 > max.x {
            x2 = max.x;
            y2 = (edge.c - x2) / edge.b;
        }
        if x2 < min.x {
            x2 = min.x;
            y2 = (edge.c - x2) / edge.b;
        }
    } else {
        x1 = match s1 {
            Some(v) if v.point.x > min.x => v.point.x,
            _ => min.x,
        };
        if x1 > max.x {
            return None;
        }
        y1 = edge.c - edge.a * x1;

        x2 = match s2 {
            Some(v) if v.point.x < max.x => v.point.x,
            _ => max.x,
        };
        if x2 < min.x {
            return None;
        }
        y2 = edge.c - edge.a * x2;

        if (y1 > max.y && y2 > max.y) || (y1 < min.y && y2 < min.y) {
            return None;
        }
        if y1 > max.y {
            y1 = max.y;
            x1 = (edge.c - y1) / edge.a;
        }
        if y1 < min.y {
            y1 = min.y;
            x1 = (edge.c - y1) / edge.a;
        }
        if y2 > max.y {
            y2 = max.y;
            x2 = (edge.c - y2) / edge.a;
        }
        if y2 < min.y {
            y2 = min.y;
            x2 = (edge.c - y2) / edge.a;
        }
    }

    let points = [DVec2::new(x1, y1), DVec2::new(x2, y2)];
    let eps = bounds.tolerance();
    let source = |end: Option<Vertex>, p: DVec2| end.filter(|v| v.point.distance(p) <= eps);

    Some(ClippedEdge {
        points,
        sources: [source(s1, points[0]), source(s2, points[1])],
    })
}
