use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rand::rngs::StdRng;
use rand::SeedableRng;

use tactician_engine::evaluation::{evaluate, Weights};
use tactician_engine::moveorder::order_all_moves;
use tactician_engine::tactics::try_shortcut;
use tactician_engine::*;

const MIDDLEGAME: &str = "r1bqk2r/2p2pp1/p1pp3p/2b5/2B1P1n1/2N2Q2/PPP2PPP/R1B1R1K1 w kq - 2 11";

pub fn criterion_ordering(c: &mut Criterion) {
    // Setup
    let mut game = Game::parse_fen(MIDDLEGAME).unwrap();
    let legal_moves = game.legal_moves();
    let weights = Weights::default();

    // Benchmarks

    c.bench_function("middlegame_order_all_moves", |b| {
        b.iter(|| order_all_moves(&mut game, black_box(&legal_moves)))
    });

    c.bench_function("middlegame_evaluate", |b| {
        b.iter(|| evaluate(&mut game, black_box(&weights)))
    });

    c.bench_function("middlegame_try_shortcut", |b| {
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| try_shortcut(&mut game, black_box(&legal_moves), 12, &mut rng))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().without_plots().sample_size(30);
    targets = criterion_ordering,
}
criterion_main!(benches);
