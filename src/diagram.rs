//! VoronoiDiagram main structure

use glam::DVec2;
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::VoronoiCell;
use crate::config::DiagramConfig;
use crate::error::{Result, VoronoiError};
use crate::generation::{
    generate_diagram, lloyd_relaxation_with_options, Bounds, LloydOptions, SiteStore,
};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// One clipped Voronoi edge
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoronoiEdge {
    /// Indices into [`VoronoiDiagram::vertices`]
    pub vertex_ids: [usize; 2],
    /// Index of the bisector in [`VoronoiDiagram::lines`]
    pub line_id: usize,
    /// Coordinates of the two vertices
    pub endpoints: [DVec2; 2],
}

/// A complete Voronoi diagram clipped to a rectangle
///
/// The diagram owns only its final output. It is rebuilt from scratch by
/// [`update`](Self::update); no sweep state survives generation.
///
/// # Examples
///
/// ```
/// use rust_voronoi_plane::*;
///
/// let config = DiagramConfigBuilder::new()
///     .seed(42)
///     .site_count(50)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let diagram = VoronoiDiagram::generate(config).unwrap();
/// println!("Generated {} cells", diagram.cell_count());
///
/// if let Some(cell) = diagram.get_cell(0) {
///     println!("Cell 0 has {} neighbors", cell.neighbor_count());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct VoronoiDiagram {
    bounds: Bounds,

    /// Site positions indexed by site id
    sites: Vec<DVec2>,

    /// Sweep vertices, boundary vertices, then the four corners
    vertices: Vec<DVec2>,

    /// Site-id pair of every bisector, clipped away or not
    lines: Vec<[usize; 2]>,

    edges: Vec<VoronoiEdge>,

    /// All cells (indexed by site id)
    cells: Vec<VoronoiCell>,

    corner_ids: [usize; 4],

    /// Spatial index for fast position-to-cell lookups (optional, requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl VoronoiDiagram {
    pub(crate) fn new(
        bounds: Bounds,
        sites: Vec<DVec2>,
        vertices: Vec<DVec2>,
        lines: Vec<[usize; 2]>,
        edges: Vec<VoronoiEdge>,
        cells: Vec<VoronoiCell>,
        corner_ids: [usize; 4],
    ) -> Self {
        #[cfg(feature = "spatial-index")]
        let spatial_index = SpatialIndex::new(&sites);

        Self {
            bounds,
            sites,
            vertices,
            lines,
            edges,
            cells,
            corner_ids,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        }
    }

    /// Generate a diagram of random sites from a configuration
    ///
    /// Sites are drawn uniformly from the configured box with a ChaCha
    /// generator seeded from `config.seed`, then relaxed if
    /// `config.lloyd_iterations > 0`.
    ///
    /// # Arguments
    ///
    /// * `config` - Diagram configuration (seed, site count, box, relaxation)
    ///
    /// # Returns
    ///
    /// `Result<VoronoiDiagram>` - Generated diagram or error
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_plane::*;
    ///
    /// let config = DiagramConfigBuilder::new()
    ///     .seed(12345)
    ///     .lloyd_iterations(3)
    ///     .unwrap()
    ///     .build()
    ///     .unwrap();
    ///
    /// let diagram = VoronoiDiagram::generate(config).unwrap();
    /// assert_eq!(diagram.cell_count(), config.site_count);
    /// ```
    pub fn generate(config: DiagramConfig) -> Result<Self> {
        let bounds = config.bounds()?;

        let mut store = SiteStore::with_capacity(config.site_count);
        store.add_random_seeded(config.site_count, &bounds, config.seed);

        if config.lloyd_iterations > 0 {
            let options = LloydOptions {
                max_iterations: config.lloyd_iterations,
                convergence_threshold: config.lloyd_convergence,
            };
            let relaxed = lloyd_relaxation_with_options(store.points(), &bounds, options)?;
            store = SiteStore::from_points(&relaxed);
        }

        generate_diagram(&mut store, &bounds)
    }

    /// Build the diagram of explicit sites; site ids follow slice order
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_plane::*;
    ///
    /// let bounds = Bounds::from_size(100.0, 100.0).unwrap();
    /// let diagram = VoronoiDiagram::from_sites(&[DVec2::new(50.0, 50.0)], bounds).unwrap();
    /// assert_eq!(diagram.cell(0).unwrap().vertex_count(), 4);
    /// ```
    pub fn from_sites(sites: &[DVec2], bounds: Bounds) -> Result<Self> {
        let mut store = SiteStore::from_points(sites);
        Self::from_store(&mut store, bounds)
    }

    /// Build the diagram of the sites in `store`, sorting it in place
    pub fn from_store(store: &mut SiteStore, bounds: Bounds) -> Result<Self> {
        generate_diagram(store, &bounds)
    }

    /// Regenerate every output from the current contents of `store`
    ///
    /// On error the diagram is left unchanged.
    pub fn update(&mut self, store: &mut SiteStore) -> Result<()> {
        *self = generate_diagram(store, &self.bounds)?;
        Ok(())
    }

    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Site positions indexed by site id
    #[inline]
    pub fn sites(&self) -> &[DVec2] {
        &self.sites
    }

    #[inline]
    pub fn site(&self, id: usize) -> Option<DVec2> {
        self.sites.get(id).copied()
    }

    /// All vertices, including the four rectangle corners
    #[inline]
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    #[inline]
    pub fn vertex(&self, id: usize) -> Option<DVec2> {
        self.vertices.get(id).copied()
    }

    /// Vertex ids of the rectangle corners, counter-clockwise from `bounds.min`
    #[inline]
    pub fn corner_ids(&self) -> [usize; 4] {
        self.corner_ids
    }

    /// Site-id pair of every bisector, indexed by line id
    #[inline]
    pub fn lines(&self) -> &[[usize; 2]] {
        &self.lines
    }

    #[inline]
    pub fn edges(&self) -> &[VoronoiEdge] {
        &self.edges
    }

    /// Get the number of cells
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Get a cell by ID
    ///
    /// Returns `None` if the cell ID is out of bounds.
    #[inline]
    pub fn get_cell(&self, id: usize) -> Option<&VoronoiCell> {
        self.cells.get(id)
    }

    /// Get a cell by ID
    ///
    /// # Errors
    ///
    /// Returns `CellNotFound` if the cell ID is out of bounds.
    pub fn cell(&self, id: usize) -> Result<&VoronoiCell> {
        self.cells.get(id).ok_or(VoronoiError::CellNotFound(id))
    }

    /// Get all cells as a slice, indexed by site id
    #[inline]
    pub fn cells(&self) -> &[VoronoiCell] {
        &self.cells
    }

    /// Get neighbor IDs for a cell
    ///
    /// Returns empty slice if cell ID is invalid.
    pub fn get_neighbors(&self, cell_id: usize) -> &[usize] {
        self.cells
            .get(cell_id)
            .map(|c| c.neighbors.as_slice())
            .unwrap_or(&[])
    }

    /// Find the cell containing a position (requires spatial-index feature)
    ///
    /// The containing cell is the one whose site is nearest, so this is a
    /// KD-tree nearest-neighbor lookup. Points outside the rectangle map to
    /// the cell of their nearest site.
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_voronoi_plane::*;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let bounds = Bounds::from_size(100.0, 100.0).unwrap();
    /// let sites = [DVec2::new(25.0, 50.0), DVec2::new(75.0, 50.0)];
    /// let diagram = VoronoiDiagram::from_sites(&sites, bounds).unwrap();
    /// assert_eq!(diagram.find_cell_at(DVec2::new(90.0, 10.0)), 1);
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_cell_at(&self, position: DVec2) -> usize {
        self.spatial_index.find_nearest(position)
    }

    /// Find cells within a given hop count from a center cell (BFS)
    ///
    /// # Arguments
    ///
    /// * `center_id` - Starting cell ID
    /// * `hops` - Maximum number of cell hops (0 = just the center cell)
    ///
    /// # Returns
    ///
    /// Sorted cell IDs within radius, including the center cell.
    /// Returns empty vec if center_id is invalid.
    pub fn find_cells_within_radius(&self, center_id: usize, hops: usize) -> Vec<usize> {
        if center_id >= self.cells.len() {
            return vec![];
        }

        let mut visited = HashSet::new();
        let mut current = vec![center_id];
        visited.insert(center_id);

        for _ in 0..hops {
            let mut next = Vec::new();
            for &cell_id in &current {
                for &neighbor in self.get_neighbors(cell_id) {
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            current = next;
        }

        let mut found: Vec<usize> = visited.into_iter().collect();
        found.sort_unstable();
        found
    }
}
