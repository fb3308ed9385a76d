//! Headless streaming simulation: flies a viewer across the terrain and
//! reports what the scheduler did.
//!
//! Usage: cargo run --release --bin stream_sim -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>    World config JSON (default: built-in defaults)
//!   --seed <SEED>      World seed, overrides the config (default: 12345)
//!   --ticks <N>        Number of updates to run (default: 600)
//!   --speed <M>        Viewer distance travelled per tick (default: 4.0)
//!   --heading <DEG>    Direction of travel, 0 = +X (default: 30)
//!   --save <PATH>      Write the effective config as JSON and continue

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use glam::Vec3;

use terrastream::core::logging;
use terrastream::{HeadlessColliderBridge, StreamingScheduler, WorldConfig};

fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let config_path = parse_str_arg(&args, "--config").map(PathBuf::from);
    let seed = parse_u32_arg(&args, "--seed");
    let ticks = parse_usize_arg(&args, "--ticks").unwrap_or(600);
    let speed = parse_f32_arg(&args, "--speed").unwrap_or(4.0);
    let heading = parse_f32_arg(&args, "--heading").unwrap_or(30.0);
    let save_path = parse_str_arg(&args, "--save").map(PathBuf::from);

    let mut config = match &config_path {
        Some(path) => match WorldConfig::load_sync(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => WorldConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }

    if let Some(path) = &save_path {
        if let Err(e) = config.save_sync(path) {
            eprintln!("Failed to save {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    }

    println!("=== Terrastream Streaming Simulation ===");
    println!("Seed:     {}", config.seed);
    println!("Chunk:    {} samples x {}m", config.terrain.chunk_size, config.terrain.sample_spacing);
    println!("View:     {} chunks (unload at {})", config.streaming.view_distance, config.streaming.unload_distance);
    println!("Budget:   {} chunks/tick", config.streaming.max_chunks_per_tick);
    println!("Flight:   {} ticks at {}m/tick, heading {} deg", ticks, speed, heading);
    println!();

    let mut scheduler = match StreamingScheduler::new(&config, HeadlessColliderBridge::new()) {
        Ok(scheduler) => scheduler,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let direction = Vec3::new(heading.to_radians().cos(), 0.0, heading.to_radians().sin());
    let mut viewer = Vec3::ZERO;

    let start = Instant::now();
    let mut generated = 0usize;
    let mut evicted = 0usize;
    let mut cancelled = 0usize;
    let mut failed = 0usize;
    let mut peak_resident = 0usize;
    let mut peak_pending = 0usize;

    for tick in 0..ticks {
        viewer.y = scheduler.height_at(viewer.x, viewer.z) + 2.0;
        let report = scheduler.update(viewer);

        generated += report.generated.len();
        evicted += report.evicted.len();
        cancelled += report.cancelled.len();
        failed += report.failed.len();
        peak_resident = peak_resident.max(scheduler.store().len());
        peak_pending = peak_pending.max(scheduler.pending_len());

        if (tick + 1) % 100 == 0 {
            eprintln!(
                "  [{}/{}] viewer {} at ({:.0}, {:.1}, {:.0}): {} resident, {} pending",
                tick + 1,
                ticks,
                report.viewer_chunk,
                viewer.x,
                viewer.y,
                viewer.z,
                scheduler.store().len(),
                scheduler.pending_len()
            );
        }

        viewer += direction * speed;
    }

    let elapsed = start.elapsed().as_secs_f64();
    let colliders = scheduler.bridge().len();

    println!();
    println!("=== Summary ===");
    println!("Generated:  {} chunks ({:.0} chunks/sec)", generated, generated as f64 / elapsed.max(1e-9));
    println!("Evicted:    {}", evicted);
    println!("Cancelled:  {}", cancelled);
    println!("Failed:     {}", failed);
    println!("Resident:   {} (peak {})", scheduler.store().len(), peak_resident);
    println!("Pending:    {} (peak {})", scheduler.pending_len(), peak_pending);
    println!("Colliders:  {}", colliders);
    println!("Time:       {:.2}s", elapsed);

    let mut biomes: Vec<&str> = scheduler.store().iter().map(|chunk| chunk.biome().name.as_str()).collect();
    biomes.sort_unstable();
    biomes.dedup();
    println!("Biomes:     {}", biomes.join(", "));

    ExitCode::SUCCESS
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
