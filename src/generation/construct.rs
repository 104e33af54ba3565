//! Cell assembly from sweep output
//!
//! Every clipped edge is a boundary fragment of the two cells on either side
//! of its bisector. Fragments are stitched into chains by shared vertex ids,
//! each chain is oriented counter-clockwise around its site, and chains that
//! end on the rectangle are joined by walking the boundary and inserting the
//! corners passed on the way.

use glam::DVec2;
use std::collections::{BTreeSet, VecDeque};
use tracing::debug;

use super::clip::Bounds;
use super::sweep::SweepOutput;
use crate::cell::VoronoiCell;
use crate::error::{Result, VoronoiError};

/// Cells indexed by site id, plus the ids of the appended corner vertices
pub struct Assembly {
    pub cells: Vec<VoronoiCell>,
    pub corner_ids: [usize; 4],
}

/// An ordered run of vertex ids along one cell boundary
#[derive(Debug, Clone, PartialEq)]
struct Chain {
    ids: VecDeque<usize>,
    closed: bool,
}

/// Build one cell per site from the sweep output
///
/// `sites` is indexed by site id. The four rectangle corners are appended to
/// `output.vertices`.
///
/// # Errors
///
/// Returns `UnclosedCell` when a chain ends away from the rectangle.
pub fn assemble_cells(
    sites: &[DVec2],
    output: &mut SweepOutput,
    bounds: &Bounds,
) -> Result<Assembly> {
    let first_corner = output.vertices.len();
    output.vertices.extend(bounds.corners());
    let corner_ids = [first_corner, first_corner + 1, first_corner + 2, first_corner + 3];

    let mut fragments: Vec<VecDeque<[usize; 2]>> = vec![VecDeque::new(); sites.len()];
    let mut neighbors: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); sites.len()];
    for edge in &output.edges {
        let [a, b] = output.lines[edge.line_id];
        fragments[a].push_back(edge.vertex_ids);
        fragments[b].push_back(edge.vertex_ids);
        neighbors[a].insert(b);
        neighbors[b].insert(a);
    }

    let mut cells = Vec::with_capacity(sites.len());
    for (id, (queue, adjacent)) in fragments.into_iter().zip(neighbors).enumerate() {
        let site = sites[id];
        let vertex_ids = if queue.is_empty() {
            corner_ids.to_vec()
        } else {
            let chains = stitch(queue)
                .into_iter()
                .map(|chain| orient(chain, site, &output.vertices))
                .collect();
            close(chains, &output.vertices, bounds, corner_ids)
                .ok_or(VoronoiError::UnclosedCell { site: id })?
        };

        let vertices = vertex_ids.iter().map(|&v| output.vertices[v]).collect();
        cells.push(VoronoiCell::new(
            id,
            site,
            vertex_ids,
            vertices,
            adjacent.into_iter().collect(),
        ));
    }

    debug!(
        cells = cells.len(),
        vertices = output.vertices.len(),
        "assembled cells"
    );
    Ok(Assembly { cells, corner_ids })
}

/// Link fragments sharing a vertex id into chains
///
/// A fragment that fits neither end of the growing chain is pushed back; a
/// full pass over the queue without progress starts a new chain.
fn stitch(mut queue: VecDeque<[usize; 2]>) -> Vec<Chain> {
    let mut chains = Vec::new();

    while let Some([a, b]) = queue.pop_front() {
        let mut ids = VecDeque::from([a, b]);
        let mut closed = false;
        let mut stalled = 0;

        while stalled < queue.len() {
            let Some(fragment) = queue.pop_front() else {
                break;
            };
            let (front, back) = (ids[0], ids[ids.len() - 1]);
            match fragment {
                [u, v] if u == back => ids.push_back(v),
                [u, v] if v == back => ids.push_back(u),
                [u, v] if u == front => ids.push_front(v),
                [u, v] if v == front => ids.push_front(u),
                _ => {
                    queue.push_back(fragment);
                    stalled += 1;
                    continue;
                }
            }
            stalled = 0;

            if ids.len() > 2 && ids[0] == ids[ids.len() - 1] {
                ids.pop_back();
                closed = true;
                break;
            }
        }

        chains.push(Chain { ids, closed });
    }

    chains
}

/// Reverse `chain` if it runs clockwise around `site`
fn orient(mut chain: Chain, site: DVec2, vertices: &[DVec2]) -> Chain {
    let n = chain.ids.len();
    let pairs = if chain.closed { n } else { n - 1 };
    let turn: f64 = (0..pairs)
        .map(|i| {
            let p = vertices[chain.ids[i]] - site;
            let q = vertices[chain.ids[(i + 1) % n]] - site;
            p.perp_dot(q)
        })
        .sum();

    if turn < 0.0 {
        chain.ids.make_contiguous().reverse();
    }
    chain
}

/// Join oriented chains into one counter-clockwise polygon
///
/// Returns `None` if an open chain has an end off the rectangle boundary.
fn close(
    chains: Vec<Chain>,
    vertices: &[DVec2],
    bounds: &Bounds,
    corner_ids: [usize; 4],
) -> Option<Vec<usize>> {
    if let [chain] = chains.as_slice() {
        if chain.closed {
            return Some(chain.ids.iter().copied().collect());
        }
    }
    if chains.iter().any(|c| c.closed) {
        return None;
    }

    let mut open = Vec::with_capacity(chains.len());
    for chain in chains {
        let start = bounds.perimeter_position(vertices[*chain.ids.front()?])?;
        let end = bounds.perimeter_position(vertices[*chain.ids.back()?])?;
        open.push((start, end, chain));
    }
    open.sort_by(|a, b| a.0.total_cmp(&b.0));

    let perimeter = bounds.perimeter();
    let eps = 4.0 * bounds.tolerance();
    let corner_positions = bounds.corner_positions();

    let mut polygon = Vec::new();
    for (i, (_, end, chain)) in open.iter().enumerate() {
        polygon.extend(chain.ids.iter().copied());

        let next_start = open[(i + 1) % open.len()].0;
        let span = (next_start - end).rem_euclid(perimeter);
        let mut passed: Vec<(f64, usize)> = corner_positions
            .iter()
            .zip(corner_ids)
            .map(|(&position, id)| ((position - end).rem_euclid(perimeter), id))
            .filter(|&(offset, _)| offset > eps && offset < span - eps)
            .collect();
        passed.sort_by(|a, b| a.0.total_cmp(&b.0));
        polygon.extend(passed.into_iter().map(|(_, id)| id));
    }

    Some(polygon)
}
