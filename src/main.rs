//! Fill a toroidal quadtree with random points and time some wrapped range queries.
//!
//! Usage: `toroidal-quadtree [config.toml] [points]`

use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::time::Instant;
use toroidal_quadtree::{Config, Point};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_POINTS: u64 = 100_000;
const QUERIES: usize = 10_000;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let config = Config::load(args.next().unwrap_or_else(|| "quadtree.toml".to_string()))?;
    let points = match args.next() {
        Some(n) => n.parse::<u64>()?,
        None => DEFAULT_POINTS,
    };
    info!(
        "Node limit {}, plane {}x{}, {} points",
        config.node_limit, config.width, config.height, points
    );

    let mut tree = config.build()?;
    let (width, height) = (tree.width(), tree.height());
    let mut rng = SmallRng::seed_from_u64(0xdeadbeef);
    let mut random_point = move || Point::new(rng.gen_range(0.0, width), rng.gen_range(0.0, height));

    let start = Instant::now();
    for id in 0..points {
        tree.put(id, random_point());
    }
    info!("Inserted {} points in {:?}", tree.len(), start.elapsed());

    let start = Instant::now();
    for id in 0..points {
        tree.put(id, random_point());
    }
    info!("Moved {} points in {:?}", tree.len(), start.elapsed());

    let radius = width.min(height) / 100.0;
    let mut res = Vec::new();
    let mut hits = 0;
    let start = Instant::now();
    for _ in 0..QUERIES {
        res.clear();
        tree.find_in_range(&random_point(), radius, &mut res);
        hits += res.len();
    }
    info!(
        "Ran {} queries of radius {} in {:?}, {} hits",
        QUERIES,
        radius,
        start.elapsed(),
        hits
    );

    if points <= 64 {
        debug!("Tree:\n{}", tree);
    }

    Ok(())
}
