//! Voronoi Cell Structure
//!
//! Represents the region of the plane closer to one site than to any other,
//! clipped to the bounding rectangle.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single Voronoi cell
///
/// Each cell carries:
/// - The id of its site (insertion order of the site)
/// - The site position
/// - Its boundary polygon, both as vertex ids into the diagram's vertex list
///   and as resolved coordinates
/// - Neighbor connectivity for graph traversal
///
/// # Design Notes
///
/// A cell is convex because it is the intersection of half-planes and the
/// rectangle. The polygon is stored counter-clockwise without repeating the
/// first vertex, and may include rectangle corners.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiCell {
    /// Identifier of the cell, equal to the id of its site
    pub id: usize,

    /// Site that generated this cell
    pub site: DVec2,

    /// Boundary polygon as indices into [`VoronoiDiagram::vertices`](crate::VoronoiDiagram::vertices)
    ///
    /// Counter-clockwise, first vertex not repeated.
    pub vertex_ids: Vec<usize>,

    /// Boundary polygon coordinates, parallel to `vertex_ids`
    pub vertices: Vec<DVec2>,

    /// IDs of cells sharing an edge of positive length with this one
    ///
    /// Sorted ascending.
    pub neighbors: Vec<usize>,
}

impl VoronoiCell {
    /// Create a new Voronoi cell
    ///
    /// This is typically called during diagram construction, not by user code.
    pub fn new(
        id: usize,
        site: DVec2,
        vertex_ids: Vec<usize>,
        vertices: Vec<DVec2>,
        neighbors: Vec<usize>,
    ) -> Self {
        Self {
            id,
            site,
            vertex_ids,
            vertices,
            neighbors,
        }
    }

    /// Get the number of neighboring cells
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Check if this cell is a neighbor of another cell
    #[inline]
    pub fn is_neighbor_of(&self, other_cell_id: usize) -> bool {
        self.neighbors.binary_search(&other_cell_id).is_ok()
    }

    /// Get the vertex count (polygon complexity)
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Signed area of the boundary polygon (shoelace formula)
    ///
    /// Positive for the counter-clockwise polygons produced by generation.
    pub fn area(&self) -> f64 {
        if self.vertices.len() < 3 {
            return 0.0;
        }

        let n = self.vertices.len();
        let twice: f64 = (0..n)
            .map(|i| self.vertices[i].perp_dot(self.vertices[(i + 1) % n]))
            .sum();
        twice * 0.5
    }

    /// Area centroid of the boundary polygon
    ///
    /// Falls back to the vertex mean for degenerate polygons, and to the
    /// site when there are no vertices.
    pub fn centroid(&self) -> DVec2 {
        if self.vertices.is_empty() {
            return self.site;
        }
        let area = self.area();
        if area.abs() < f64::EPSILON {
            return self.vertices.iter().sum::<DVec2>() / self.vertices.len() as f64;
        }

        let n = self.vertices.len();
        let mut sum = DVec2::ZERO;
        for i in 0..n {
            let (p, q) = (self.vertices[i], self.vertices[(i + 1) % n]);
            sum += (p + q) * p.perp_dot(q);
        }
        sum / (6.0 * area)
    }

    /// Check whether `point` lies inside or on the boundary of this cell
    pub fn contains(&self, point: DVec2) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }

        // Convex and counter-clockwise: inside means left of every edge
        let n = self.vertices.len();
        (0..n).all(|i| {
            let (p, q) = (self.vertices[i], self.vertices[(i + 1) % n]);
            let scale = (q - p).length() * (point - p).length();
            (q - p).perp_dot(point - p) >= -1e-12 * scale.max(1.0)
        })
    }

    /// Euclidean distance between the sites of two cells
    #[inline]
    pub fn distance_to(&self, other: &VoronoiCell) -> f64 {
        self.site.distance(other.site)
    }
}
