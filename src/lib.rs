//! Planar Voronoi diagrams clipped to a rectangle
//!
//! Computes the partition of an axis-aligned rectangle into convex cells, one
//! per input site, with Fortune's sweep-line algorithm. Output is a vertex
//! list, the clipped edges with the bisector each came from, and one
//! counter-clockwise polygon plus neighbor list per site.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rust_voronoi_plane::*;
//!
//! // Random sites, relaxed towards a centroidal tessellation
//! let config = DiagramConfigBuilder::new()
//!     .seed(42)
//!     .site_count(1_000).unwrap()
//!     .size(1920.0, 1080.0).unwrap()
//!     .lloyd_iterations(5).unwrap()
//!     .build().unwrap();
//!
//! let diagram = VoronoiDiagram::generate(config).unwrap();
//! println!("Generated {} edges", diagram.edges().len());
//!
//! // Explicit sites
//! let bounds = Bounds::from_size(100.0, 100.0).unwrap();
//! let sites = [DVec2::new(10.0, 10.0), DVec2::new(90.0, 90.0)];
//! let diagram = VoronoiDiagram::from_sites(&sites, bounds).unwrap();
//! for cell in diagram.cells() {
//!     println!("cell {} area {}", cell.id, cell.area());
//! }
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-cell lookups using KD-tree
//! - `serde`: Enables serialization support for configuration, bounds, cells and edges

// Modules
pub mod error;
pub mod config;
pub mod cell;
pub mod generation;
pub mod diagram;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{VoronoiError, Result};
pub use config::{DiagramConfig, DiagramConfigBuilder};
pub use cell::VoronoiCell;
pub use diagram::{VoronoiDiagram, VoronoiEdge};
pub use generation::{
    generate_diagram, generate_diagram_with_cancel, lloyd_relaxation,
    lloyd_relaxation_with_options, BoundarySide, Bounds, LloydOptions, SiteStore,
};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
