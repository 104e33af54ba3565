//! Core Voronoi generation algorithm
//!
//! Sites are sorted, validated and swept with Fortune's algorithm; the raw
//! clipped edges are then assembled into one polygon per site.

mod beach_line;
pub mod clip;
mod construct;
mod event_queue;
pub mod geometry;
mod lloyd;
pub mod sites;
mod sweep;

pub use clip::{BoundarySide, Bounds};
pub use lloyd::{lloyd_relaxation, lloyd_relaxation_with_options, LloydOptions};
pub use sites::SiteStore;

use std::sync::atomic::AtomicBool;
use tracing::debug;

use crate::diagram::VoronoiDiagram;
use crate::error::Result;
use sweep::Sweep;

/// Generate the Voronoi diagram of the sites in `store`, clipped to `bounds`
///
/// The store is sorted in place; site ids are unaffected.
///
/// # Errors
///
/// Returns the validation errors of [`SiteStore::validate`], or
/// `UnclosedCell` if a cell polygon cannot be assembled.
///
/// # Example
///
/// ```
/// use rust_voronoi_plane::*;
///
/// let bounds = Bounds::from_size(100.0, 100.0).unwrap();
/// let mut store = SiteStore::from_points(&[DVec2::new(25.0, 50.0), DVec2::new(75.0, 50.0)]);
///
/// let diagram = generate_diagram(&mut store, &bounds).unwrap();
/// assert_eq!(diagram.cell_count(), 2);
/// assert_eq!(diagram.edges().len(), 1);
/// ```
pub fn generate_diagram(store: &mut SiteStore, bounds: &Bounds) -> Result<VoronoiDiagram> {
    run(store, bounds, None)
}

/// Like [`generate_diagram`], checking `cancel` before every sweep event
///
/// # Errors
///
/// Returns `Cancelled` once the flag is observed set, in addition to the
/// errors of [`generate_diagram`].
pub fn generate_diagram_with_cancel(
    store: &mut SiteStore,
    bounds: &Bounds,
    cancel: &AtomicBool,
) -> Result<VoronoiDiagram> {
    run(store, bounds, Some(cancel))
}

fn run(
    store: &mut SiteStore,
    bounds: &Bounds,
    cancel: Option<&AtomicBool>,
) -> Result<VoronoiDiagram> {
    store.validate(bounds)?;
    store.sort();

    let mut output = Sweep::new(store.sites(), *bounds)?.run(cancel)?;
    let sites = store.points();
    let assembly = construct::assemble_cells(&sites, &mut output, bounds)?;

    debug!(
        sites = sites.len(),
        vertices = output.vertices.len(),
        edges = output.edges.len(),
        "generated diagram"
    );

    Ok(VoronoiDiagram::new(
        *bounds,
        sites,
        output.vertices,
        output.lines,
        output.edges,
        assembly.cells,
        assembly.corner_ids,
    ))
}
