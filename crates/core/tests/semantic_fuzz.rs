use std::cell::Cell;
use std::collections::BTreeMap;

use levelgen::roomgraph::RoomElement;
use levelgen::{
    DesignLabel, GenRng, GeneratorConfig, Graph, LevelElement, RoomGenerator, TemplateLibrary,
};
use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};

/// Checks one placement. `Ok(false)` means the graph could not be placed.
fn check_placement(
    generator: &RoomGenerator,
    seed: u64,
    node_count: usize,
) -> Result<bool, String> {
    let mut rng = GenRng::seeded(seed);
    let graph = Graph::random(node_count, 1, &mut rng).map_err(|error| error.to_string())?;
    let Ok(rooms) = generator.place_rooms(&graph, DesignLabel::Default, &mut rng) else {
        return Ok(false);
    };
    if rooms.len() != graph.node_count() {
        return Err(format!("placed {} rooms for {} nodes", rooms.len(), graph.node_count()));
    }

    let mut floors = BTreeMap::new();
    let mut placed_doors: BTreeMap<_, Vec<usize>> = BTreeMap::new();
    for (index, room) in rooms.iter().enumerate() {
        for (global, element) in room.global_cells() {
            match element {
                RoomElement::Floor => {
                    if let Some(other) = floors.insert(global, index) {
                        return Err(format!("rooms {other} and {index} share floor at {global:?}"));
                    }
                }
                RoomElement::PlacedDoor => placed_doors.entry(global).or_default().push(index),
                RoomElement::Door => return Err(format!("room {index} kept an unresolved door")),
                RoomElement::Skip | RoomElement::Wall => {}
            }
        }
    }
    for (global, owners) in &placed_doors {
        if owners.len() < 2 {
            return Err(format!("used door at {global:?} has no partner"));
        }
        if let Some(index) = floors.get(global) {
            return Err(format!("used door at {global:?} sits on floor of room {index}"));
        }
    }
    Ok(true)
}

/// Checks one generated level. `Ok(false)` means every attempt failed.
fn check_level(generator: &RoomGenerator, seed: u64, node_count: usize) -> Result<bool, String> {
    let mut rng = GenRng::seeded(seed);
    let graph = Graph::random(node_count, 1, &mut rng).map_err(|error| error.to_string())?;
    let Ok(level) = generator.generate_from_graph(&graph, DesignLabel::Default, &mut rng) else {
        return Ok(false);
    };

    let start = level.start_tile().pos();
    let end = level.end_tile().pos();
    let Some(path) = level.find_path(start, end) else {
        return Err(format!("seed {seed}: no path from {start:?} to {end:?}"));
    };
    if path.len() < 2 {
        return Err(format!("seed {seed}: degenerate path {path:?}"));
    }
    if level.end_tile().element() != LevelElement::Exit {
        return Err(format!("seed {seed}: end tile is {:?}", level.end_tile().element()));
    }
    Ok(true)
}

#[test]
fn semantic_fuzz_room_placements_hold_invariants() {
    let library = TemplateLibrary::builtin().expect("builtin templates should parse");
    let generator = RoomGenerator::new(&library, GeneratorConfig::default());
    let mut runner = TestRunner::new(ProptestConfig { cases: 64, ..ProptestConfig::default() });
    let cases = Cell::new(0_u32);
    let placed = Cell::new(0_u32);

    runner
        .run(&(any::<u64>(), 2_usize..14), |(seed, node_count)| {
            cases.set(cases.get() + 1);
            if check_placement(&generator, seed, node_count).map_err(TestCaseError::fail)? {
                placed.set(placed.get() + 1);
            }
            Ok(())
        })
        .expect("placements should satisfy non-overlap and door symmetry");

    assert!(
        placed.get() * 10 >= cases.get() * 9,
        "only {} of {} random graphs were placed",
        placed.get(),
        cases.get()
    );
}

#[test]
fn semantic_fuzz_generated_levels_are_completable() {
    let library = TemplateLibrary::builtin().expect("builtin templates should parse");
    let generator = RoomGenerator::new(&library, GeneratorConfig::default());
    let mut runner = TestRunner::new(ProptestConfig { cases: 48, ..ProptestConfig::default() });
    let cases = Cell::new(0_u32);
    let generated = Cell::new(0_u32);

    runner
        .run(&(any::<u64>(), 2_usize..12), |(seed, node_count)| {
            cases.set(cases.get() + 1);
            if check_level(&generator, seed, node_count).map_err(TestCaseError::fail)? {
                generated.set(generated.get() + 1);
            }
            Ok(())
        })
        .expect("every returned level should connect start and exit");

    assert!(
        generated.get() * 10 >= cases.get() * 9,
        "only {} of {} random graphs produced a level",
        generated.get(),
        cases.get()
    );
}
