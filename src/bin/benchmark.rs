//! Photonmask Benchmark and Report Tool

use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use photonmask::{
    Device, GratingParameters, MembraneParameters, RingGratingGenerator, DEFAULT_ARC_VERTICES,
};

#[derive(Parser, Debug)]
#[command(name = "benchmark", about = "Benchmark and inspect device geometry generation")]
struct Args {
    /// Grating parameter file (JSON); prints its ring report instead of benchmarking
    #[arg(long)]
    params: Option<PathBuf>,

    /// Print the generated arcs as JSON
    #[arg(long, requires = "params")]
    json: bool,

    /// Points per curved polygon edge
    #[arg(long, default_value_t = DEFAULT_ARC_VERTICES)]
    vertices: usize,
}

fn banner(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{}", title);
    println!("{}", "=".repeat(60));
}

fn benchmark_generation() -> photonmask::Result<()> {
    banner("BENCHMARK: Grating Arc Generation");

    let ring_counts = [4, 16, 64, 256, 1024];

    for &n in &ring_counts {
        let params = GratingParameters {
            ring_count: n,
            contact_count: 8,
            contact_width: 0.05,
            ..Default::default()
        };
        let gen = RingGratingGenerator::new(params)?;

        let n_iters = if n <= 64 { 1000 } else { 100 };

        let start = Instant::now();
        for _ in 0..n_iters {
            let _ = gen.generate()?;
        }
        let elapsed = start.elapsed().as_secs_f64() / n_iters as f64;

        println!("  {:>5} rings: {:.1} μs ({} arcs)", n, elapsed * 1e6, gen.arc_count());
    }
    Ok(())
}

fn benchmark_polygons(vertices: usize) -> photonmask::Result<()> {
    banner("BENCHMARK: Polygon Conversion");

    let ring_counts = [4, 16, 64, 256];

    for &n in &ring_counts {
        let params = GratingParameters {
            ring_count: n,
            ..Default::default()
        };
        let gen = RingGratingGenerator::new(params)?;

        let n_iters = if n <= 16 { 100 } else { 10 };

        let start = Instant::now();
        let mut n_points = 0;
        for _ in 0..n_iters {
            n_points = gen.polygons(vertices)?.iter().map(|p| p.len()).sum::<usize>();
        }
        let elapsed = start.elapsed().as_secs_f64() / n_iters as f64;

        println!(
            "  {:>5} rings: {:.3} ms ({} vertices)",
            n,
            elapsed * 1e3,
            n_points
        );
    }

    let membrane = MembraneParameters::default();
    let start = Instant::now();
    let polys = membrane.polygons(vertices)?;
    println!(
        "  {}: {:.1} μs ({} polygons)",
        membrane.name(),
        start.elapsed().as_secs_f64() * 1e6,
        polys.len()
    );
    Ok(())
}

fn report(path: &Path, json: bool) -> photonmask::Result<()> {
    let params = GratingParameters::load(path)?;
    let gen = RingGratingGenerator::new(params)?;
    info!(
        path = %path.display(),
        rings = gen.params().ring_count + 1,
        "loaded grating parameters"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&gen.generate()?)?);
        return Ok(());
    }

    banner(&format!("{}: {}", gen.name(), gen.description()));
    for ring in gen.rings()? {
        println!(
            "  Ring {:>2}: r = {:.4} um, w = {:.4} um, beta = {:.3} deg, alpha = {:.1} deg",
            ring.index,
            ring.center_radius,
            gen.params().air_gap_width,
            ring.beta,
            ring.alpha
        );
    }
    println!("  {} arcs", gen.arc_count());
    Ok(())
}

fn main() -> photonmask::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    if let Some(path) = &args.params {
        return report(path, args.json);
    }

    println!("\n{}", "#".repeat(60));
    println!("#  Photonmask Geometry Benchmark Suite");
    println!("{}", "#".repeat(60));

    benchmark_generation()?;
    benchmark_polygons(args.vertices)?;

    banner("BENCHMARK COMPLETE");
    Ok(())
}
