//! Example: Run the automaton headless
//!
//! Drives a simulation with synthetic 60 Hz frame timestamps and prints the
//! per-step counters. Run with `RUST_LOG=debug` to see the per-generation log.

use voronoi_automaton::*;

fn main() {
    env_logger::init();

    println!("Voronoi Automaton Simulation");
    println!("============================\n");

    let config = SimulationConfigBuilder::new()
        .seed(42)
        .canvas(800.0, 600.0)
        .unwrap()
        .initial_sites(50)
        .unwrap()
        .build()
        .unwrap();

    println!("Configuration:");
    println!("  Seed: {}", config.seed);
    println!("  Canvas: {} x {}", config.width, config.height);
    println!(
        "  Thresholds: survive {} / spawn {} / overcrowd {}",
        config.thresholds.survive, config.thresholds.spawn, config.thresholds.overcrowd
    );
    println!("  Max sites: {}", config.max_sites);
    println!("  Steps per second: {}", config.steps_per_second);
    println!();

    let mut sim = Simulation::new(config).expect("Failed to create simulation");
    println!("Interaction radius: {}\n", sim.interaction_radius());

    // Ten seconds of frames
    let frame_ms = 1000.0 / 60.0;
    for frame in 1..=600 {
        let Some(stats) = sim.tick(frame as f64 * frame_ms) else {
            continue;
        };

        println!(
            "gen {:>3}: {:>4} sites  +{:<3} -{:<3}{}  (ca {:?}, force {:?}, tri {:?})",
            stats.generation,
            stats.population,
            stats.births,
            stats.deaths,
            if stats.reseeded { " reseeded" } else { "" },
            stats.ca_step,
            stats.relaxation,
            stats.triangulation,
        );
    }

    let counts = sim.neighbor_counts();
    if !counts.is_empty() {
        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
        println!("\nMean neighbour count: {:.2}", mean);
    }
    println!("Voronoi edges: {}", sim.voronoi_edges().len());

    #[cfg(feature = "spatial-index")]
    if let Some(site) = sim.find_site_at(sim.bounds().center()) {
        println!(
            "Cell under canvas centre: site {} with {} neighbours",
            site,
            sim.adjacency().neighbor_count(site)
        );
    }

    println!("\nSimulation complete!");
}
