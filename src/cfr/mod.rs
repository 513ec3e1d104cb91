//! CFR (Counterfactual Regret Minimization) Solver Module.
//!
//! This module computes approximate Nash equilibria of two-player games given
//! in sequence form, together with the analysis tools used to measure them.
//!
//! # Overview
//!
//! CFR is an iterative algorithm that converges to Nash equilibrium by:
//! 1. Computing counterfactual regret for each action at each decision point
//! 2. Updating strategies to minimize regret over time
//! 3. Averaging strategies across iterations to converge to equilibrium
//!
//! Here every decision point runs regret matching with regrets floored at
//! zero ([`RegretMinimizer`]). A [`TreeplexRegretMinimizer`] combines them
//! over one player's treeplex, and [`CfrSolver`] alternates the two players.
//!
//! # Usage
//!
//! 1. Build both treeplexes and the utility matrix, then a [`Game`](crate::sequence::Game)
//! 2. Create a [`CfrSolver`] with the game and a [`CfrConfig`]
//! 3. Call [`CfrSolver::solve`] (or [`CfrSolver::advance`] step by step)
//! 4. Read the average realization plans off the [`Solution`]
//!
//! # Example
//!
//! ```ignore
//! use treeplex_cfr::cfr::{CfrConfig, CfrSolver, Weighting};
//!
//! let config = CfrConfig::default().with_weighting(Weighting::Linear);
//! let mut solver = CfrSolver::new(&game, config)?;
//!
//! let solution = solver.solve()?;
//! println!("{} iterations, gap {:?}", solution.iterations, solution.gap);
//! ```
//!
//! # Theory
//!
//! **Regret**: The difference between the value of an action and the value of the current strategy.
//! ```text
//! Regret(a) = Value(a) - Value(current_strategy)
//! ```
//!
//! **Regret Matching**: Set strategy proportional to positive regrets.
//! ```text
//! Strategy(a) = max(0, Regret(a)) / sum(max(0, Regret(a')))
//! ```
//!
//! **Epsilon-Nash gap**: the sum of both players' best-response values
//! against the average plans, scaled by the averaging normalizer.
//!
//! # References
//!
//! - Zinkevich, M., et al. "Regret Minimization in Games with Incomplete Information" (2007)
//! - Tammelin, O. "Solving Large Imperfect Information Games Using CFR+" (2014)
//! - Farina, G., Kroer, C., Sandholm, T. "Online Convex Optimization for Sequential Decision Processes and Extensive-Form Games" (2019)

pub mod best_response;
pub mod config;
pub mod epsilon;
pub mod regret;
pub mod solver;

// Re-export main types for convenient access
pub use best_response::{compute_best_response, BestResponse};
pub use config::{CfrConfig, CfrStats, GapSample, Weighting};
pub use epsilon::{epsilon_gap, is_epsilon_nash, is_epsilon_nash_with, GAP_TOLERANCE, SMALL_EPSILON};
pub use regret::{RegretMinimizer, TreeplexRegretMinimizer};
pub use solver::{CfrSolver, Phase, Solution, Step};
