//! Whole-diagram properties: partition, equidistance, Euler, determinism and
//! the small hand-checked layouts.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_voronoi_plane::*;
use std::collections::BTreeSet;
use std::sync::atomic::AtomicBool;

fn square() -> Bounds {
    Bounds::from_size(100.0, 100.0).unwrap()
}

fn random_diagram(count: usize, seed: u64, bounds: Bounds) -> VoronoiDiagram {
    let mut store = SiteStore::new();
    store.add_random_seeded(count, &bounds, seed);
    generate_diagram(&mut store, &bounds).unwrap()
}

fn close(a: DVec2, b: DVec2) -> bool {
    a.distance(b) < 1e-9
}

/// Sorted copy of a point list, for order-independent comparison
fn sorted(points: &[DVec2]) -> Vec<DVec2> {
    let mut points = points.to_vec();
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points
}

fn assert_partition(diagram: &VoronoiDiagram) {
    let bounds = diagram.bounds();
    let total: f64 = diagram.cells().iter().map(|c| c.area()).sum();
    assert!(
        (total - bounds.area()).abs() < 1e-9 * bounds.area(),
        "cell areas sum to {} instead of {}",
        total,
        bounds.area()
    );

    for cell in diagram.cells() {
        assert!(cell.area() > 0.0, "cell {} is not counter-clockwise", cell.id);
        assert!(cell.contains(cell.site), "cell {} misses its own site", cell.id);
        assert_eq!(cell.vertex_ids.len(), cell.vertices.len());
        for (&id, &p) in cell.vertex_ids.iter().zip(&cell.vertices) {
            assert_eq!(diagram.vertex(id), Some(p));
            assert!(bounds.contains(p) || bounds.side_of(p).is_some());
        }
    }
}

fn euler_characteristic(diagram: &VoronoiDiagram) -> i64 {
    let mut vertices = BTreeSet::new();
    let mut edges = BTreeSet::new();
    for cell in diagram.cells() {
        let n = cell.vertex_ids.len();
        for i in 0..n {
            let (a, b) = (cell.vertex_ids[i], cell.vertex_ids[(i + 1) % n]);
            vertices.insert(a);
            edges.insert((a.min(b), a.max(b)));
        }
    }
    let faces = diagram.cell_count() + 1;
    vertices.len() as i64 - edges.len() as i64 + faces as i64
}

#[test]
fn test_partition_property() {
    for seed in [1, 2, 3, 4, 5] {
        let diagram = random_diagram(300, seed, square());
        assert_eq!(diagram.cell_count(), 300);
        assert_partition(&diagram);
    }
}

#[test]
fn test_points_fall_in_nearest_site_cell() {
    let diagram = random_diagram(120, 17, square());
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    for _ in 0..500 {
        let p = DVec2::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0));
        let nearest = (0..diagram.cell_count())
            .min_by(|&a, &b| {
                let da = diagram.sites()[a].distance_squared(p);
                let db = diagram.sites()[b].distance_squared(p);
                da.total_cmp(&db)
            })
            .unwrap();
        assert!(diagram.cells()[nearest].contains(p));
    }
}

#[test]
fn test_equidistance_property() {
    let diagram = random_diagram(250, 11, square());
    let tolerance = 1e-6 * diagram.bounds().diagonal();

    for edge in diagram.edges() {
        let [a, b] = diagram.lines()[edge.line_id];
        let (sa, sb) = (diagram.sites()[a], diagram.sites()[b]);
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let p = edge.endpoints[0].lerp(edge.endpoints[1], t);
            assert!((p.distance(sa) - p.distance(sb)).abs() < tolerance);
        }
        assert!(diagram.cells()[a].is_neighbor_of(b));
        assert!(diagram.cells()[b].is_neighbor_of(a));
    }
}

#[test]
fn test_euler_property() {
    for (count, seed) in [(1, 0), (2, 8), (10, 9), (200, 10), (1000, 12)] {
        let diagram = random_diagram(count, seed, square());
        assert_eq!(euler_characteristic(&diagram), 2, "{} sites, seed {}", count, seed);
    }
}

#[test]
fn test_offset_and_wide_box() {
    let bounds = Bounds::new(DVec2::new(-250.0, 40.0), DVec2::new(500.0, 60.0)).unwrap();
    let diagram = random_diagram(150, 21, bounds);

    assert_partition(&diagram);
    assert_eq!(euler_characteristic(&diagram), 2);
}

#[test]
fn test_determinism() {
    let first = random_diagram(200, 77, square());
    let second = random_diagram(200, 77, square());

    assert_eq!(first.vertices(), second.vertices());
    assert_eq!(first.edges(), second.edges());
    assert_eq!(first.lines(), second.lines());
    assert_eq!(first.cells(), second.cells());
}

#[test]
fn test_input_order_does_not_matter() {
    let mut store = SiteStore::new();
    store.add_random_seeded(150, &square(), 5);
    let points = store.points();
    let diagram = generate_diagram(&mut store, &square()).unwrap();

    let mut shuffled = points.clone();
    shuffled.shuffle(&mut ChaCha8Rng::seed_from_u64(6));
    let other = VoronoiDiagram::from_sites(&shuffled, square()).unwrap();

    assert_eq!(sorted(diagram.vertices()), sorted(other.vertices()));
    assert_eq!(diagram.edges().len(), other.edges().len());

    for (id, &site) in shuffled.iter().enumerate() {
        let original = points.iter().position(|&p| p == site).unwrap();
        assert_eq!(
            sorted(&other.cells()[id].vertices),
            sorted(&diagram.cells()[original].vertices)
        );
    }
}

#[test]
fn test_scenario_two_sites() {
    let diagram =
        VoronoiDiagram::from_sites(&[DVec2::new(10.0, 10.0), DVec2::new(90.0, 90.0)], square())
            .unwrap();

    assert_eq!(diagram.lines(), &[[0, 1]]);
    assert_eq!(diagram.edges().len(), 1);
    // Two boundary vertices from clipping, then the four corners
    assert_eq!(diagram.vertices().len(), 6);

    let edge = diagram.edges()[0];
    let ends = sorted(&edge.endpoints);
    assert!(close(ends[0], DVec2::new(0.0, 100.0)));
    assert!(close(ends[1], DVec2::new(100.0, 0.0)));

    let lower = &diagram.cells()[0];
    assert_eq!(lower.vertex_count(), 3);
    let expected = [DVec2::new(0.0, 0.0), DVec2::new(0.0, 100.0), DVec2::new(100.0, 0.0)];
    for (got, want) in sorted(&lower.vertices).iter().zip(expected) {
        assert!(close(*got, want));
    }

    let areas: Vec<f64> = diagram.cells().iter().map(|c| c.area()).collect();
    assert!((areas[0] - 5000.0).abs() < 1e-6);
    assert!((areas[1] - 5000.0).abs() < 1e-6);
    assert_eq!(diagram.get_neighbors(0), &[1]);
}

#[test]
fn test_scenario_cocircular_square() {
    let sites = [
        DVec2::new(25.0, 25.0),
        DVec2::new(75.0, 25.0),
        DVec2::new(75.0, 75.0),
        DVec2::new(25.0, 75.0),
    ];
    let diagram = VoronoiDiagram::from_sites(&sites, square()).unwrap();
    let bounds = diagram.bounds();

    let interior: Vec<DVec2> = diagram
        .vertices()
        .iter()
        .copied()
        .filter(|&p| bounds.side_of(p).is_none())
        .collect();
    assert_eq!(interior.len(), 1);
    assert!(close(interior[0], DVec2::new(50.0, 50.0)));

    assert_eq!(diagram.edges().len(), 4);
    let mut outer: Vec<DVec2> = Vec::new();
    for edge in diagram.edges() {
        let [a, b] = edge.endpoints;
        if close(a, DVec2::new(50.0, 50.0)) {
            outer.push(b);
        } else {
            assert!(close(b, DVec2::new(50.0, 50.0)));
            outer.push(a);
        }
    }
    let midpoints = [
        DVec2::new(0.0, 50.0),
        DVec2::new(50.0, 0.0),
        DVec2::new(50.0, 100.0),
        DVec2::new(100.0, 50.0),
    ];
    for (got, want) in sorted(&outer).iter().zip(midpoints) {
        assert!(close(*got, want));
    }

    for cell in diagram.cells() {
        assert!((cell.area() - 2500.0).abs() < 1e-6);
        assert_eq!(cell.vertex_count(), 4);
        assert_eq!(cell.neighbor_count(), 2);
    }
    assert_eq!(euler_characteristic(&diagram), 2);
}

#[test]
fn test_scenario_single_site() {
    let diagram = VoronoiDiagram::from_sites(&[DVec2::new(37.0, 81.0)], square()).unwrap();

    assert!(diagram.edges().is_empty());
    assert!(diagram.lines().is_empty());
    assert_eq!(diagram.vertices(), &square().corners());

    let cell = &diagram.cells()[0];
    assert_eq!(cell.vertex_ids, diagram.corner_ids().to_vec());
    assert!(cell.neighbors.is_empty());
    assert!((cell.area() - 10000.0).abs() < 1e-9);
}

#[test]
fn test_collinear_row_makes_strips() {
    let sites: Vec<DVec2> = (0..5).map(|i| DVec2::new(10.0 + 20.0 * i as f64, 50.0)).collect();
    let diagram = VoronoiDiagram::from_sites(&sites, square()).unwrap();

    assert_eq!(diagram.edges().len(), 4);
    for cell in diagram.cells() {
        assert!((cell.area() - 2000.0).abs() < 1e-6);
        assert_eq!(cell.vertex_count(), 4);
    }
    assert_eq!(diagram.get_neighbors(2), &[1, 3]);
    assert_eq!(euler_characteristic(&diagram), 2);
}

#[test]
fn test_collinear_column_makes_strips() {
    let sites: Vec<DVec2> = (0..4).map(|i| DVec2::new(30.0, 12.5 + 25.0 * i as f64)).collect();
    let diagram = VoronoiDiagram::from_sites(&sites, square()).unwrap();

    assert_eq!(diagram.edges().len(), 3);
    for cell in diagram.cells() {
        assert!((cell.area() - 2500.0).abs() < 1e-6);
    }
    assert_eq!(diagram.get_neighbors(0), &[1]);
    assert_eq!(diagram.get_neighbors(1), &[0, 2]);
}

#[test]
fn test_sites_on_the_boundary() {
    let sites = [
        DVec2::new(0.0, 30.0),
        DVec2::new(60.0, 0.0),
        DVec2::new(100.0, 70.0),
        DVec2::new(40.0, 100.0),
        DVec2::new(50.0, 50.0),
    ];
    let diagram = VoronoiDiagram::from_sites(&sites, square()).unwrap();

    assert_partition(&diagram);
    assert_eq!(euler_characteristic(&diagram), 2);
}

#[test]
fn test_invalid_input_is_rejected() {
    assert_eq!(
        VoronoiDiagram::from_sites(&[], square()).unwrap_err(),
        VoronoiError::EmptySiteSet
    );
    assert!(matches!(
        VoronoiDiagram::from_sites(&[DVec2::new(50.0, 100.5)], square()),
        Err(VoronoiError::SiteOutOfBounds { id: 0, .. })
    ));
    assert!(matches!(
        VoronoiDiagram::from_sites(&[DVec2::new(50.0, f64::INFINITY)], square()),
        Err(VoronoiError::InvalidSite { id: 0, .. })
    ));
    assert_eq!(
        VoronoiDiagram::from_sites(
            &[DVec2::new(20.0, 20.0), DVec2::new(60.0, 60.0), DVec2::new(60.0, 60.0)],
            square()
        )
        .unwrap_err(),
        VoronoiError::DuplicateSite { first: 1, second: 2 }
    );
}

#[test]
fn test_nan_sites_among_many_are_rejected() {
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    for count in [21, 64, 500] {
        let mut store = SiteStore::new();
        for _ in 0..count {
            let x = rng.gen_range(0.0..100.0);
            let y = if rng.gen_bool(0.3) { f64::NAN } else { rng.gen_range(0.0..100.0) };
            store.add(DVec2::new(x, y));
        }
        store.add(DVec2::new(50.0, f64::NAN));

        assert!(matches!(
            generate_diagram(&mut store, &square()),
            Err(VoronoiError::InvalidSite { .. })
        ));
    }
}

#[test]
fn test_cancellation() {
    let mut store = SiteStore::new();
    store.add_random_seeded(100, &square(), 3);

    let raised = AtomicBool::new(true);
    assert_eq!(
        generate_diagram_with_cancel(&mut store, &square(), &raised).unwrap_err(),
        VoronoiError::Cancelled
    );

    let lowered = AtomicBool::new(false);
    let diagram = generate_diagram_with_cancel(&mut store, &square(), &lowered).unwrap();
    assert_eq!(diagram.cell_count(), 100);
}

#[test]
fn test_ids_survive_sorting() {
    let points = [DVec2::new(80.0, 90.0), DVec2::new(20.0, 10.0), DVec2::new(50.0, 40.0)];
    let diagram = VoronoiDiagram::from_sites(&points, square()).unwrap();

    for (id, &p) in points.iter().enumerate() {
        assert_eq!(diagram.site(id), Some(p));
        assert_eq!(diagram.cells()[id].site, p);
        assert!(diagram.cells()[id].contains(p));
    }
}

#[cfg(feature = "serde")]
#[test]
fn test_cells_serialize() {
    let diagram = random_diagram(20, 4, square());

    let json = serde_json::to_string(diagram.cells()).unwrap();
    let restored: Vec<VoronoiCell> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.len(), diagram.cell_count());
    for (got, want) in restored.iter().zip(diagram.cells()) {
        assert_eq!(got.id, want.id);
        assert_eq!(got.vertex_ids, want.vertex_ids);
        assert_eq!(got.neighbors, want.neighbors);
        assert!(close(got.site, want.site));
        for (a, b) in got.vertices.iter().zip(&want.vertices) {
            assert!(close(*a, *b));
        }
    }

    let json = serde_json::to_string(diagram.bounds()).unwrap();
    let restored: Bounds = serde_json::from_str(&json).unwrap();
    assert_eq!(&restored, diagram.bounds());
}
