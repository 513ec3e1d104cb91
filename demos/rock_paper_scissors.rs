//! Solve a lopsided rock-paper-scissors where rock crushing scissors pays double.
//!
//! Run with `RUST_LOG=debug` to see per-iteration gaps.

use indicatif::{ProgressBar, ProgressStyle};
use treeplex_cfr::cfr::{compute_best_response, CfrConfig, CfrSolver};
use treeplex_cfr::{Game, Role, SumType, TreeplexBuilder, UtilityMatrix};

const ACTIONS: [&str; 3] = ["rock", "paper", "scissors"];

fn main() {
    env_logger::init();

    // sequences 0..3 are the actions, 3 is the empty sequence
    let treeplex = |player| {
        let mut builder = TreeplexBuilder::new(3).with_player(player);
        builder.information_set(3, 0, 2);
        builder.build().expect("valid treeplex")
    };

    let payoff = [[0.0, -1.0, 2.0], [1.0, 0.0, -1.0], [-2.0, 1.0, 0.0]];
    let mut utility = UtilityMatrix::new(SumType::ZeroSum);
    for (p, row) in payoff.iter().enumerate() {
        for (o, &u) in row.iter().enumerate() {
            utility.insert(p, o, u, -u, 1.0);
        }
    }
    let game = Game::new(0, 1, treeplex(0), treeplex(1), utility).expect("valid game");

    let config = CfrConfig::default().with_iterations(20_000).with_early_stop(false);
    let mut solver = CfrSolver::new(&game, config.clone()).expect("valid config");

    let progress = ProgressBar::new(config.iterations);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .expect("valid template")
            .progress_chars("#>-"),
    );

    let solution = solver
        .solve_with_callback(100, |stats| {
            progress.set_position(stats.iterations);
            if let Some(gap) = stats.gap {
                progress.set_message(format!("gap {:.2e}", gap));
            }
        })
        .expect("solve");
    progress.finish();

    println!(
        "{} iterations in {:.2}s, gap {:?}",
        solution.iterations, solution.stats.elapsed_seconds, solution.gap
    );
    for (role, plan) in [(Role::Player, &solution.player_plan), (Role::Opponent, &solution.opponent_plan)] {
        let mix: Vec<String> = ACTIONS
            .iter()
            .enumerate()
            .map(|(a, name)| format!("{}={:.3}", name, plan[a]))
            .collect();
        println!("  {:<8} {}", role, mix.join(", "));
    }

    let value = game
        .utility()
        .expected_utility(Role::Player, &solution.player_plan, &solution.opponent_plan);
    let exploit = compute_best_response(Role::Opponent, &game, &solution.player_plan);
    println!("Game value: {:.4}", value);
    println!("Opponent best response earns: {:.4}", exploit.value);
}
