//! Error types for voronoi diagram generation

use thiserror::Error;

/// Errors that can occur during diagram generation or queries
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoronoiError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// No sites were supplied
    #[error("at least one site is required")]
    EmptySiteSet,
    /// A site coordinate is NaN or infinite
    #[error("site {id} has a non-finite coordinate ({x}, {y})")]
    InvalidSite { id: usize, x: f64, y: f64 },
    /// A site lies outside the bounding rectangle
    #[error("site {id} at ({x}, {y}) lies outside the bounding box")]
    SiteOutOfBounds { id: usize, x: f64, y: f64 },
    /// Two sites coincide within the duplicate tolerance
    #[error("sites {first} and {second} coincide")]
    DuplicateSite { first: usize, second: usize },
    /// A cell boundary could not be closed into a polygon
    #[error("boundary of cell {site} could not be closed")]
    UnclosedCell { site: usize },
    /// The caller requested cancellation between sweep events
    #[error("generation cancelled")]
    Cancelled,
    /// Requested cell ID does not exist
    #[error("cell not found: {0}")]
    CellNotFound(usize),
}

/// Result type alias for voronoi operations
pub type Result<T> = std::result::Result<T, VoronoiError>;
