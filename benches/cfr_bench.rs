//! Benchmarks for CFR solver.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use treeplex_cfr::cfr::{compute_best_response, CfrConfig, CfrSolver};
use treeplex_cfr::{Game, RealizationPlan, Role, SumType, TreeplexBuilder, UtilityMatrix};

/// Kuhn poker: cards 0..3, check/bet then fold/call for each side.
fn kuhn() -> Game {
    let mut first = TreeplexBuilder::new(0);
    let mut second = TreeplexBuilder::new(0);
    for card in 0..3 {
        first.information_set(0, 1 + 2 * card, 2 + 2 * card);
        second.information_set(0, 1 + 2 * card, 2 + 2 * card);
        second.information_set(0, 7 + 2 * card, 8 + 2 * card);
    }
    for card in 0..3 {
        first.information_set(1 + 2 * card, 7 + 2 * card, 8 + 2 * card);
    }

    let mut utility = UtilityMatrix::new(SumType::ZeroSum);
    for c in 0..3usize {
        for d in (0..3usize).filter(|&d| d != c) {
            let win = if c > d { 1.0 } else { -1.0 };
            utility.insert(1 + 2 * c, 7 + 2 * d, win, -win, 1.0 / 6.0);
            utility.insert(7 + 2 * c, 8 + 2 * d, -1.0, 1.0, 1.0 / 6.0);
            utility.insert(8 + 2 * c, 8 + 2 * d, 2.0 * win, -2.0 * win, 1.0 / 6.0);
            utility.insert(2 + 2 * c, 1 + 2 * d, 1.0, -1.0, 1.0 / 6.0);
            utility.insert(2 + 2 * c, 2 + 2 * d, 2.0 * win, -2.0 * win, 1.0 / 6.0);
        }
    }

    Game::new(0, 1, first.build().unwrap(), second.build().unwrap(), utility).unwrap()
}

fn kuhn_iteration_benchmark(c: &mut Criterion) {
    let game = kuhn();
    let mut solver = CfrSolver::new(&game, CfrConfig::default()).unwrap();

    c.bench_function("kuhn_single_iteration", |b| {
        b.iter(|| {
            let step = solver.advance().unwrap();
            black_box(step.gap)
        })
    });
}

fn kuhn_1000_iterations_benchmark(c: &mut Criterion) {
    let game = kuhn();

    c.bench_function("kuhn_1000_iterations", |b| {
        b.iter(|| {
            let config = CfrConfig::default()
                .with_iterations(black_box(1000))
                .with_early_stop(false);
            let mut solver = CfrSolver::new(&game, config).unwrap();
            solver.solve().unwrap()
        })
    });
}

fn kuhn_best_response_benchmark(c: &mut Criterion) {
    let game = kuhn();
    let uniform = RealizationPlan::uniform(game.opponent_treeplex());

    c.bench_function("kuhn_best_response", |b| {
        b.iter(|| compute_best_response(Role::Player, &game, black_box(&uniform)))
    });
}

criterion_group!(
    benches,
    kuhn_iteration_benchmark,
    kuhn_1000_iterations_benchmark,
    kuhn_best_response_benchmark
);
criterion_main!(benches);
