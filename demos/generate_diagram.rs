//! Example: Generate a Voronoi diagram
//!
//! Demonstrates the basic usage of the generation pipeline.

use rust_voronoi_plane::*;

fn main() {
    println!("Voronoi Diagram Generation Example");
    println!("==================================\n");

    let config = DiagramConfigBuilder::new()
        .seed(42)
        .site_count(500)
        .unwrap()
        .size(400.0, 300.0)
        .unwrap()
        .lloyd_iterations(5)
        .unwrap()
        .build()
        .unwrap();

    println!("Configuration:");
    println!("  Seed: {}", config.seed);
    println!("  Sites: {}", config.site_count);
    println!(
        "  Box: {} x {} at ({}, {})",
        config.width, config.height, config.origin[0], config.origin[1]
    );
    println!("  Lloyd Iterations: {}", config.lloyd_iterations);
    println!();

    println!("Generating diagram...");
    let diagram = VoronoiDiagram::generate(config).expect("Failed to generate diagram");
    println!(
        "Generated {} cells, {} vertices, {} edges ({} bisectors)\n",
        diagram.cell_count(),
        diagram.vertices().len(),
        diagram.edges().len(),
        diagram.lines().len()
    );

    let cells = diagram.cells();
    let total_neighbors: usize = cells.iter().map(|c| c.neighbor_count()).sum();
    let avg_neighbors = total_neighbors as f64 / cells.len() as f64;

    let total_vertices: usize = cells.iter().map(|c| c.vertex_count()).sum();
    let avg_vertices = total_vertices as f64 / cells.len() as f64;

    let total_area: f64 = cells.iter().map(|c| c.area()).sum();

    println!("Statistics:");
    println!("  Average neighbors per cell: {:.2}", avg_neighbors);
    println!("  Average vertices per cell: {:.2}", avg_vertices);
    println!("  Total cell area: {:.3} (box area {:.3})", total_area, diagram.bounds().area());
    println!();

    println!("Sample cells:");
    for cell in cells.iter().take(5) {
        let centroid = cell.centroid();
        println!(
            "  Cell {}: site=({:.2}, {:.2}), centroid=({:.2}, {:.2}), area={:.2}, neighbors={:?}",
            cell.id,
            cell.site.x,
            cell.site.y,
            centroid.x,
            centroid.y,
            cell.area(),
            cell.neighbors
        );
    }

    #[cfg(feature = "spatial-index")]
    {
        let probe = DVec2::new(200.0, 150.0);
        println!("\nPoint ({}, {}) lies in cell {}", probe.x, probe.y, diagram.find_cell_at(probe));
    }

    println!("\nGeneration complete!");
}
