use anyhow::{Context, Result, bail, ensure};
use clap::Parser;
use levelgen::roomgraph::RoomElement;
use levelgen::{
    DesignLabel, GenRng, GenerationError, Graph, LevelElement, NoiseAreaGenerator, RoomGenerator,
    TemplateLibrary,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tools::settings;
use tracing::{Level as LogLevel, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of consecutive seeds to check.
    #[arg(short, long, default_value_t = 200)]
    runs: u64,
    #[arg(long, default_value_t = 12)]
    max_nodes: usize,
    /// Also generate a noise level every this many runs (0 disables).
    #[arg(long, default_value_t = 10)]
    noise_every: u64,
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Default)]
struct Tally {
    levels: u64,
    exhausted: u64,
    noise_levels: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(LogLevel::WARN.into()))
        .init();

    let args = Args::parse();
    ensure!(args.max_nodes >= 2, "--max-nodes must be at least 2");
    let config = settings::load_config(args.config.as_deref())?;
    let library = TemplateLibrary::builtin().context("built-in templates are invalid")?;
    let generator = RoomGenerator::new(&library, config.clone());
    let noise = NoiseAreaGenerator::new(config);

    println!(
        "Starting fuzz harness on seeds {}..{} with up to {} rooms...",
        args.seed,
        args.seed + args.runs,
        args.max_nodes
    );
    let mut tally = Tally::default();
    for seed in args.seed..args.seed + args.runs {
        check_rooms(&generator, seed, args.max_nodes, &mut tally)?;
        if args.noise_every > 0 && seed % args.noise_every == 0 {
            check_noise(&noise, seed)?;
            tally.noise_levels += 1;
        }
    }

    println!(
        "Fuzzing completed successfully: {} room levels, {} exhausted graphs, {} noise levels.",
        tally.levels, tally.exhausted, tally.noise_levels
    );
    Ok(())
}

fn check_rooms(
    generator: &RoomGenerator,
    seed: u64,
    max_nodes: usize,
    tally: &mut Tally,
) -> Result<()> {
    let mut rng = GenRng::seeded(seed);
    let node_count = rng.between(2, max_nodes);
    let extra_edges = rng.below(3);
    let graph = Graph::random(node_count, extra_edges, &mut rng)?;

    // Placement is checked on its own stream; the level below draws from `rng`.
    let mut placement_rng = GenRng::seeded(seed);
    if let Ok(rooms) = generator.place_rooms(&graph, DesignLabel::Default, &mut placement_rng) {
        ensure!(
            rooms.len() == node_count,
            "seed {seed}: {} rooms for {node_count} nodes",
            rooms.len()
        );
        let mut floors = BTreeMap::new();
        let mut used_doors: BTreeMap<_, u32> = BTreeMap::new();
        for (index, room) in rooms.iter().enumerate() {
            for (global, element) in room.global_cells() {
                match element {
                    RoomElement::Floor => {
                        let previous = floors.insert(global, index);
                        ensure!(previous.is_none(), "seed {seed}: floors overlap at {global:?}");
                    }
                    RoomElement::PlacedDoor => *used_doors.entry(global).or_default() += 1,
                    RoomElement::Door => bail!("seed {seed}: room {index} kept an unresolved door"),
                    RoomElement::Skip | RoomElement::Wall => {}
                }
            }
        }
        for (global, count) in &used_doors {
            ensure!(*count >= 2, "seed {seed}: used door at {global:?} has no partner");
        }
    }

    let design = DesignLabel::random(&mut rng);
    let level_seed = rng.next_u64();
    let generated = generator.generate_from_graph(&graph, design, &mut GenRng::seeded(level_seed));
    let level = match generated {
        Ok(level) => level,
        Err(GenerationError::AttemptsExhausted { last, .. }) => {
            warn!(seed, %last, "graph could not be realised");
            tally.exhausted += 1;
            return Ok(());
        }
        Err(error) => return Err(error.into()),
    };

    let start = level.start_tile().pos();
    let end = level.end_tile().pos();
    let path = level.find_path(start, end);
    ensure!(
        path.is_some_and(|path| path.len() >= 2),
        "seed {seed}: start {start:?} cannot reach end {end:?}"
    );
    ensure!(
        level.end_tile().element() == LevelElement::Exit,
        "seed {seed}: end tile is not an exit"
    );

    let replay = generator.generate_from_graph(&graph, design, &mut GenRng::seeded(level_seed))?;
    ensure!(
        replay.fingerprint() == level.fingerprint(),
        "seed {seed}: generation is not deterministic"
    );

    tally.levels += 1;
    Ok(())
}

fn check_noise(generator: &NoiseAreaGenerator, seed: u64) -> Result<()> {
    let level = generator.generate_seeded(40, 40, seed)?;
    let start = level.start_tile().pos();
    let end = level.end_tile().pos();
    ensure!(start != end, "noise seed {seed}: start and end coincide");
    ensure!(level.find_path(start, end).is_some(), "noise seed {seed}: region is not connected");

    let again = generator.generate_seeded(40, 40, seed)?;
    ensure!(again.fingerprint() == level.fingerprint(), "noise seed {seed}: not deterministic");
    Ok(())
}
