//! Lloyd's Relaxation for uniform site distribution
//!
//! Lloyd's Relaxation iteratively improves the uniformity of the sites by
//! moving each one to the centroid of its clipped Voronoi cell.

use glam::DVec2;
use std::time::Instant;
use tracing::debug;

use super::clip::Bounds;
use super::generate_diagram;
use super::sites::SiteStore;
use crate::cell::VoronoiCell;
use crate::error::Result;

/// Options for Lloyd's relaxation algorithm
#[derive(Debug, Clone, Copy)]
pub struct LloydOptions {
    /// Maximum number of iterations to run
    pub max_iterations: usize,
    /// Convergence threshold - stop when max displacement < this value
    /// times the box diagonal. Set to 0.0 to disable early termination
    pub convergence_threshold: f64,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            convergence_threshold: 0.001,
        }
    }
}

/// Apply Lloyd's Relaxation to improve site distribution uniformity
///
/// # Algorithm
///
/// For each iteration:
/// 1. Build the Voronoi diagram of the current sites
/// 2. Move every site to the area centroid of its cell
///
/// # Arguments
///
/// * `sites` - Initial site positions, all inside `bounds`
/// * `bounds` - Rectangle the cells are clipped to
/// * `iterations` - Number of relaxation iterations (typically 3-5)
///
/// # Returns
///
/// Relaxed sites, in the same order as the input
///
/// # Errors
///
/// Propagates any error from diagram generation (e.g. duplicate sites).
pub fn lloyd_relaxation(
    sites: Vec<DVec2>,
    bounds: &Bounds,
    iterations: usize,
) -> Result<Vec<DVec2>> {
    let options = LloydOptions {
        max_iterations: iterations,
        ..Default::default()
    };
    lloyd_relaxation_with_options(sites, bounds, options)
}

/// Apply Lloyd's Relaxation with custom options
///
/// This variant allows fine-tuned control over convergence detection and
/// maximum iterations. Use `lloyd_relaxation` for the simple interface.
///
/// # Arguments
///
/// * `sites` - Initial site positions, all inside `bounds`
/// * `bounds` - Rectangle the cells are clipped to
/// * `options` - Relaxation options (max iterations, convergence threshold)
///
/// # Errors
///
/// Propagates any error from diagram generation.
pub fn lloyd_relaxation_with_options(
    mut sites: Vec<DVec2>,
    bounds: &Bounds,
    options: LloydOptions,
) -> Result<Vec<DVec2>> {
    let convergence_threshold = options.convergence_threshold * bounds.diagonal();
    let total_start = Instant::now();

    debug!(
        sites = sites.len(),
        max_iterations = options.max_iterations,
        threshold = convergence_threshold,
        "lloyd relaxation starting"
    );

    let mut iterations_run = 0;
    let mut converged = false;

    for iteration in 0..options.max_iterations {
        let iter_start = Instant::now();

        let mut store = SiteStore::from_points(&sites);
        let diagram = generate_diagram(&mut store, bounds)?;
        let (new_sites, max_displacement) = move_to_centroids(&sites, diagram.cells(), bounds);

        sites = new_sites;
        iterations_run = iteration + 1;

        debug!(
            iteration = iteration + 1,
            elapsed = ?iter_start.elapsed(),
            max_displacement,
            "lloyd iteration"
        );

        if convergence_threshold > 0.0 && max_displacement < convergence_threshold {
            converged = true;
            break;
        }
    }

    debug!(
        iterations = iterations_run,
        converged,
        elapsed = ?total_start.elapsed(),
        "lloyd relaxation finished"
    );

    Ok(sites)
}

/// New site positions and the largest distance any site moved
fn move_to_centroids(
    sites: &[DVec2],
    cells: &[VoronoiCell],
    bounds: &Bounds,
) -> (Vec<DVec2>, f64) {
    let mut max_displacement: f64 = 0.0;

    let moved = sites
        .iter()
        .zip(cells)
        .map(|(&old, cell)| {
            let new = cell.centroid().clamp(bounds.min, bounds.max);
            max_displacement = max_displacement.max(old.distance(new));
            new
        })
        .collect();

    (moved, max_displacement)
}
