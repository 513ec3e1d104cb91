//! Epsilon-Nash gap of a pair of average plans.

use crate::cfr::best_response::compute_best_response;
use crate::cfr::config::Weighting;
use crate::error::SolverError;
use crate::sequence::{Game, RealizationPlan, Role};

/// Gap below which a pair of plans counts as an epsilon-Nash equilibrium.
pub const SMALL_EPSILON: f64 = 0.01;

/// Slack allowed below zero before a gap is treated as negative.
///
/// Exact equilibria evaluate to a gap of zero up to rounding.
pub const GAP_TOLERANCE: f64 = 1e-9;

/// Epsilon-Nash gap of `player_plan` and `opponent_plan` after `iteration`
/// iterations averaged with `weighting`.
///
/// Each side best-responds to the other's plan; the two best-response values
/// are scaled by `1 / weighting.normalizer(iteration)` and summed.
pub fn epsilon_gap(
    game: &Game,
    player_plan: &RealizationPlan,
    opponent_plan: &RealizationPlan,
    iteration: u64,
    weighting: Weighting,
) -> Result<f64, SolverError> {
    let utility = game.utility();

    let player_br = compute_best_response(Role::Player, game, opponent_plan);
    let opponent_br = compute_best_response(Role::Opponent, game, player_plan);

    let player_value = utility.expected_utility(Role::Player, &player_br.plan, opponent_plan);
    let opponent_value = utility.expected_utility(Role::Opponent, &opponent_br.plan, player_plan);

    let den = weighting.normalizer(iteration);
    let gap = player_value / den + opponent_value / den;

    if !(gap >= -GAP_TOLERANCE) {
        return Err(SolverError::NegativeGap { gap, iteration });
    }

    Ok(gap)
}

/// Whether the plans form an epsilon-Nash equilibrium, using the linear
/// normalizer.
pub fn is_epsilon_nash(
    game: &Game,
    player_plan: &RealizationPlan,
    opponent_plan: &RealizationPlan,
    iteration: u64,
) -> Result<bool, SolverError> {
    is_epsilon_nash_with(game, player_plan, opponent_plan, iteration, Weighting::Linear)
}

/// [`is_epsilon_nash`] with an explicit averaging scheme.
pub fn is_epsilon_nash_with(
    game: &Game,
    player_plan: &RealizationPlan,
    opponent_plan: &RealizationPlan,
    iteration: u64,
    weighting: Weighting,
) -> Result<bool, SolverError> {
    let gap = epsilon_gap(game, player_plan, opponent_plan, iteration, weighting)?;
    Ok(gap.abs() < SMALL_EPSILON)
}
