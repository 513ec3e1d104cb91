//! Counterfactual Regret Minimization driver for sequence-form games.
//!
//! Each iteration updates the player first and the opponent second, the
//! opponent reacting to the player's freshly updated plan (Gauss–Seidel
//! ordering). Realization plans are averaged across iterations according to
//! the configured [`Weighting`], and the epsilon-Nash gap of the averages is
//! measured after every iteration.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::cfr::config::{CfrConfig, CfrStats, Weighting};
use crate::cfr::epsilon::{epsilon_gap, SMALL_EPSILON};
use crate::cfr::regret::TreeplexRegretMinimizer;
use crate::error::SolverError;
use crate::sequence::{Game, RealizationPlan, Role, Treeplex};

/// Lifecycle of a [`CfrSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Only the initial uniform iterate exists.
    Init,
    /// At least one update has run.
    Iterate,
    /// A batch solve has completed; the solver accepts no more work.
    Done,
}

/// Outcome of a single [`CfrSolver::advance`].
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Iteration just completed.
    pub iteration: u64,
    /// The player's average plan.
    pub player_plan: RealizationPlan,
    /// The opponent's average plan.
    pub opponent_plan: RealizationPlan,
    /// Epsilon-Nash gap of the average plans.
    pub gap: f64,
    /// Whether the gap is below [`SMALL_EPSILON`].
    pub converged: bool,
}

/// Result of a batch solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The player's average plan.
    pub player_plan: RealizationPlan,
    /// The opponent's average plan.
    pub opponent_plan: RealizationPlan,
    /// Iterations run, counting the initial uniform iterate.
    pub iterations: u64,
    /// Whether the final gap is below [`SMALL_EPSILON`].
    pub converged: bool,
    /// Final epsilon-Nash gap; `None` when only the initial iterate ran.
    pub gap: Option<f64>,
    /// Statistics of the run.
    pub stats: CfrStats,
}

impl Solution {
    /// Save to JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())
    }
}

/// Running weighted sum of one side's realization plans.
#[derive(Debug, Clone)]
struct PlanAverage {
    sum: Vec<f64>,
    average: RealizationPlan,
}

impl PlanAverage {
    /// Start from the initial plan with weight 1.
    fn new(initial: &RealizationPlan) -> Self {
        Self {
            sum: initial.as_slice().to_vec(),
            average: initial.clone(),
        }
    }

    fn accumulate(&mut self, plan: &RealizationPlan, weight: f64, normalizer: f64) {
        for (sum, (_, probability)) in self.sum.iter_mut().zip(plan.iter()) {
            *sum += probability * weight;
        }
        self.average = RealizationPlan::from_values(self.sum.iter().map(|&s| s / normalizer).collect());
    }
}

/// One player's half of the solver state.
#[derive(Debug, Clone)]
struct Side<'a> {
    role: Role,
    minimizer: TreeplexRegretMinimizer<'a>,
    current: RealizationPlan,
    average: PlanAverage,
}

impl<'a> Side<'a> {
    fn new(role: Role, treeplex: &'a Treeplex) -> Result<Self, SolverError> {
        let minimizer = TreeplexRegretMinimizer::new(treeplex);
        let current = minimizer.suggest_strategy()?.realization_plan(treeplex);
        current.validate(treeplex).map_err(SolverError::plan(role))?;
        let average = PlanAverage::new(&current);

        Ok(Self {
            role,
            minimizer,
            current,
            average,
        })
    }

    /// Feed one loss vector and refresh the current plan.
    fn update(&mut self, game: &Game, other_plan: &RealizationPlan) -> Result<(), SolverError> {
        let treeplex = self.minimizer.treeplex();
        let loss = game
            .utility()
            .loss_vector(self.role, other_plan, treeplex.sequence_count());

        self.minimizer.observe_loss(&loss)?;
        let plan = self.minimizer.suggest_strategy()?.realization_plan(treeplex);
        plan.validate(treeplex).map_err(SolverError::plan(self.role))?;
        self.current = plan;

        Ok(())
    }

    fn validate_average(&self) -> Result<(), SolverError> {
        self.average
            .average
            .validate(self.minimizer.treeplex())
            .map_err(SolverError::plan(self.role))
    }
}

/// The CFR solver.
///
/// Borrows the game for its whole lifetime and owns everything it mutates:
/// both regret minimizers, the running averages and the run's statistics.
///
/// # Example
/// ```ignore
/// use treeplex_cfr::cfr::{CfrConfig, CfrSolver};
///
/// let mut solver = CfrSolver::new(&game, CfrConfig::default())?;
/// let solution = solver.solve()?;
/// println!("gap {:?} after {} iterations", solution.gap, solution.iterations);
/// ```
#[derive(Debug, Clone)]
pub struct CfrSolver<'a> {
    /// The game being solved.
    game: &'a Game,

    /// Configuration for the solver.
    config: CfrConfig,

    /// Where in its lifecycle the solver is.
    phase: Phase,

    /// Current iteration count; the initial iterate is iteration 1.
    iteration: u64,

    player: Side<'a>,
    opponent: Side<'a>,

    /// Statistics tracking.
    stats: CfrStats,
}

impl<'a> CfrSolver<'a> {
    /// Create a solver at iteration 1 with uniform strategies for both sides.
    pub fn new(game: &'a Game, config: CfrConfig) -> Result<Self, SolverError> {
        config.validate()?;

        let player = Side::new(Role::Player, game.player_treeplex())?;
        let opponent = Side::new(Role::Opponent, game.opponent_treeplex())?;

        let mut stats = CfrStats::new();
        stats.iterations = 1;

        Ok(Self {
            game,
            config,
            phase: Phase::Init,
            iteration: 1,
            player,
            opponent,
            stats,
        })
    }

    /// Run one iteration and return the gap of the new average plans.
    fn run_iteration(&mut self) -> Result<f64, SolverError> {
        let t = self.iteration + 1;
        let weighting = self.config.weighting;

        self.player.update(self.game, &self.opponent.current)?;
        self.opponent.update(self.game, &self.player.current)?;

        let weight = weighting.weight(t);
        let normalizer = weighting.normalizer(t);
        self.player.average.accumulate(&self.player.current, weight, normalizer);
        self.opponent.average.accumulate(&self.opponent.current, weight, normalizer);

        let gap = epsilon_gap(
            self.game,
            &self.player.average.average,
            &self.opponent.average.average,
            t,
            weighting,
        )?;

        self.iteration = t;
        self.phase = Phase::Iterate;
        self.stats.iterations = t;
        self.stats.record_gap(t, gap);

        let (player_regret, opponent_regret) = self.mean_regrets();
        debug!(
            "iteration {}: gap {:.6e}, mean regrets {:.6} / {:.6}",
            t, gap, player_regret, opponent_regret
        );

        Ok(gap)
    }

    /// Run a single iteration and return the resulting average plans.
    ///
    /// Not bounded by the configured iteration budget.
    pub fn advance(&mut self) -> Result<Step, SolverError> {
        if self.phase == Phase::Done {
            return Err(SolverError::Finished);
        }

        let start_time = Instant::now();
        let gap = self.run_iteration()?;
        self.player.validate_average()?;
        self.opponent.validate_average()?;

        self.stats.elapsed_seconds += start_time.elapsed().as_secs_f64();
        self.stats.update_rate();

        Ok(Step {
            iteration: self.iteration,
            player_plan: self.player.average.average.clone(),
            opponent_plan: self.opponent.average.average.clone(),
            gap,
            converged: gap.abs() < SMALL_EPSILON,
        })
    }

    /// Run until the iteration budget is spent or, with early stopping on,
    /// the gap drops below [`SMALL_EPSILON`].
    pub fn solve(&mut self) -> Result<Solution, SolverError> {
        self.run(0, |_| {})
    }

    /// Solve with a callback for progress tracking.
    ///
    /// # Arguments
    /// * `callback_interval` - How often to call the callback
    /// * `callback` - Function called every `callback_interval` iterations
    pub fn solve_with_callback<F>(&mut self, callback_interval: u64, callback: F) -> Result<Solution, SolverError>
    where
        F: FnMut(&CfrStats),
    {
        self.run(callback_interval, callback)
    }

    fn run<F>(&mut self, callback_interval: u64, mut callback: F) -> Result<Solution, SolverError>
    where
        F: FnMut(&CfrStats),
    {
        if self.phase == Phase::Done {
            return Err(SolverError::Finished);
        }

        info!(
            "solving game {} vs {}: up to {} iterations, {:?} averaging",
            self.game.player_id(),
            self.game.opponent_id(),
            self.config.iterations,
            self.config.weighting
        );

        let start_time = Instant::now();
        let elapsed_before = self.stats.elapsed_seconds;

        while self.iteration < self.config.iterations {
            let gap = self.run_iteration()?;

            if callback_interval > 0 && self.iteration % callback_interval == 0 {
                self.stats.elapsed_seconds = elapsed_before + start_time.elapsed().as_secs_f64();
                self.stats.update_rate();
                callback(&self.stats);
            }

            if self.config.stop_on_epsilon && gap.abs() < SMALL_EPSILON {
                info!("gap {:.6e} below {} at iteration {}, stopping", gap, SMALL_EPSILON, self.iteration);
                break;
            }
        }

        self.player.validate_average()?;
        self.opponent.validate_average()?;

        // Final stats update
        self.stats.elapsed_seconds = elapsed_before + start_time.elapsed().as_secs_f64();
        self.stats.update_rate();
        self.phase = Phase::Done;

        let gap = self.stats.gap;
        let converged = gap.map_or(false, |g| g.abs() < SMALL_EPSILON);

        info!(
            "solved in {} iterations ({:.2}s, {:.0} it/s), gap {:?}",
            self.iteration, self.stats.elapsed_seconds, self.stats.iterations_per_second, gap
        );

        Ok(Solution {
            player_plan: self.player.average.average.clone(),
            opponent_plan: self.opponent.average.average.clone(),
            iterations: self.iteration,
            converged,
            gap,
            stats: self.stats.clone(),
        })
    }

    /// Get the current iteration count.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Get the lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Get the current statistics.
    pub fn stats(&self) -> &CfrStats {
        &self.stats
    }

    /// Get a reference to the game.
    pub fn game(&self) -> &'a Game {
        self.game
    }

    /// Get the configuration.
    pub fn config(&self) -> &CfrConfig {
        &self.config
    }

    /// Averaging scheme in use.
    pub fn weighting(&self) -> Weighting {
        self.config.weighting
    }

    /// Average plans of the player and the opponent.
    pub fn average_plans(&self) -> (&RealizationPlan, &RealizationPlan) {
        (&self.player.average.average, &self.opponent.average.average)
    }

    /// Plans of the most recent iterate.
    pub fn current_plans(&self) -> (&RealizationPlan, &RealizationPlan) {
        (&self.player.current, &self.opponent.current)
    }

    /// Mean regret of the player and the opponent.
    pub fn mean_regrets(&self) -> (f64, f64) {
        (
            self.player.minimizer.mean_regrets(self.iteration),
            self.opponent.minimizer.mean_regrets(self.iteration),
        )
    }
}
