use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use levelgen::{
    DesignLabel, GenRng, Graph, GraphPool, Level, LevelSize, NoiseAreaGenerator, Pos,
    RoomGenerator, TemplateLibrary,
};
use serde::Serialize;
use tools::{ascii, settings};
use tracing::{Level as LogLevel, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Rooms placed along a connectivity graph.
    Graph,
    /// One organic cave carved from coherent noise.
    Noise,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_enum, default_value_t = Mode::Graph)]
    mode: Mode,
    /// Seed for reproducible output; a random seed is chosen and logged otherwise.
    #[arg(short, long)]
    seed: Option<u64>,
    /// TOML file with generator settings.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Template JSON file; the built-in templates are used otherwise.
    #[arg(short, long)]
    templates: Option<PathBuf>,
    /// Single graph JSON file to generate from.
    #[arg(short, long, conflicts_with = "graphs")]
    graph: Option<PathBuf>,
    /// Directory of graph JSON files to draw from.
    #[arg(long)]
    graphs: Option<PathBuf>,
    /// Pick the pooled graph with this many nodes (requires --graphs).
    #[arg(long, requires = "graphs")]
    nodes: Option<usize>,
    /// Cycle-closing edge count for --nodes.
    #[arg(long, default_value_t = 0)]
    cycles: usize,
    #[arg(long, value_parser = settings::parse_design)]
    design: Option<DesignLabel>,
    #[arg(long, value_parser = settings::parse_size)]
    size: Option<LevelSize>,
    /// Noise mode only; requires --height as well.
    #[arg(long, requires = "height")]
    width: Option<usize>,
    #[arg(long, requires = "width")]
    height: Option<usize>,
    /// Print a JSON summary instead of the ASCII map.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct LevelSummary {
    seed: u64,
    width: usize,
    height: usize,
    design: DesignLabel,
    start: Pos,
    end: Pos,
    fingerprint: String,
    rows: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(LogLevel::WARN.into()))
        .init();

    let args = Args::parse();
    let config = settings::load_config(args.config.as_deref())?;
    let mut rng = match args.seed {
        Some(seed) => GenRng::seeded(seed),
        None => GenRng::from_entropy(),
    };
    let seed = rng.seed();

    let level = match args.mode {
        Mode::Noise => generate_noise(&args, NoiseAreaGenerator::new(config), &mut rng)?,
        Mode::Graph => {
            let library = match &args.templates {
                Some(path) => TemplateLibrary::load(path)
                    .with_context(|| format!("failed to load templates: {}", path.display()))?,
                None => TemplateLibrary::builtin().context("built-in templates are invalid")?,
            };
            let mut generator = RoomGenerator::new(&library, config);
            if let Some(dir) = &args.graphs {
                let pool = GraphPool::load_dir(dir)
                    .with_context(|| format!("failed to load graphs from {}", dir.display()))?;
                info!(graphs = pool.len(), "loaded graph pool");
                generator = generator.with_graph_pool(pool);
            }
            generate_rooms(&args, &generator, &mut rng)?
        }
    };

    if args.json {
        let summary = LevelSummary {
            seed,
            width: level.width(),
            height: level.height(),
            design: level.design(),
            start: level.start_tile().pos(),
            end: level.end_tile().pos(),
            fingerprint: format!("{:016x}", level.fingerprint()),
            rows: ascii::rows(&level),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", ascii::render(&level));
        println!("Seed: {seed}");
        println!("Size: {} x {}", level.width(), level.height());
        println!("Design: {}", level.design());
        println!("Fingerprint: {:016x}", level.fingerprint());
    }
    Ok(())
}

fn generate_noise(args: &Args, generator: NoiseAreaGenerator, rng: &mut GenRng) -> Result<Level> {
    let level = match (args.width, args.height, args.size) {
        (Some(width), Some(height), _) => generator.generate_sized(width, height, rng),
        (_, _, Some(size)) => generator.generate_for_size(size, rng),
        _ => generator.generate(rng),
    };
    level.context("noise generation failed")
}

fn generate_rooms(args: &Args, generator: &RoomGenerator, rng: &mut GenRng) -> Result<Level> {
    if args.width.is_some() {
        bail!("--width/--height only apply to noise mode");
    }
    let design = args.design.unwrap_or_else(|| DesignLabel::random(rng));

    let level = if let Some(path) = &args.graph {
        let graph = Graph::load(path)
            .with_context(|| format!("failed to load graph: {}", path.display()))?;
        generator.generate_from_graph(&graph, design, rng)
    } else if let Some(nodes) = args.nodes {
        generator.generate_with_counts(nodes, args.cycles, design, rng)
    } else {
        let size = args.size.unwrap_or_else(|| LevelSize::random(rng));
        generator.generate(design, size, rng)
    };
    level.context("room generation failed")
}
