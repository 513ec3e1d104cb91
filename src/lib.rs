//! # Treeplex CFR
//!
//! A Counterfactual Regret Minimization (CFR) solver for two-player
//! extensive-form games given in sequence form.
//!
//! ## Features
//!
//! - **Validated Treeplexes**: Infoset arenas checked once at construction
//! - **Sequence-Form Regret Minimization**: Regret matching per infoset, composed per player
//! - **Best Response**: Backward induction over a treeplex
//! - **Epsilon-Nash Gap**: Measured after every iteration, with optional early stop
//!
//! ## Quick Start
//!
//! ```
//! use treeplex_cfr::{CfrConfig, CfrSolver, Game, SumType, TreeplexBuilder, UtilityMatrix};
//!
//! // 1. One treeplex per player: a single decision between sequences 0 and 1
//! let treeplex = || {
//!     let mut builder = TreeplexBuilder::new(2);
//!     builder.information_set(2, 0, 1);
//!     builder.build().unwrap()
//! };
//!
//! // 2. Utilities over pairs of terminal sequences
//! let mut utility = UtilityMatrix::new(SumType::ZeroSum);
//! utility.insert(0, 0, 1.0, -1.0, 0.25);
//! utility.insert(0, 1, -1.0, 1.0, 0.25);
//! utility.insert(1, 0, -1.0, 1.0, 0.25);
//! utility.insert(1, 1, 1.0, -1.0, 0.25);
//! let game = Game::new(0, 1, treeplex(), treeplex(), utility).unwrap();
//!
//! // 3. Solve
//! let mut solver = CfrSolver::new(&game, CfrConfig::default()).unwrap();
//! let solution = solver.solve().unwrap();
//! assert!(solution.converged);
//! ```
//!
//! ## Modules
//!
//! - [`sequence`]: Treeplexes, strategies, utilities and the game record
//! - [`cfr`]: Regret minimizers, the CFR driver and the analysis tools
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           CfrSolver                             │
//! │  - Gauss–Seidel updates   - Weighted plan averaging             │
//! │  - Epsilon-Nash gap       - Early stop                          │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!               ┌───────────────┴───────────────┐
//!               ▼                               ▼
//!    ┌─────────────────────┐         ┌─────────────────────┐
//!    │ TreeplexRegret-     │         │  compute_best_      │
//!    │ Minimizer (×2)      │         │  response           │
//!    └─────────────────────┘         └─────────────────────┘
//!               │                               │
//!               └───────────────┬───────────────┘
//!                               ▼
//!           ┌───────────────────────────────────────┐
//!           │  Game: Treeplex ×2 + UtilityMatrix    │
//!           └───────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

/// CFR (Counterfactual Regret Minimization) solver module.
///
/// Regret minimizers, the solver driver, best response and the epsilon-Nash gap.
pub mod cfr;

/// Error types for every stage: construction, validation and solving.
pub mod error;

/// Sequence-form game model.
///
/// Treeplexes, realization plans, behavioral strategies and utilities.
pub mod sequence;

#[cfg(test)]
mod fixtures;

// Re-export commonly used types at crate root for convenience
pub use cfr::{CfrConfig, CfrSolver, CfrStats, Solution, Weighting};
pub use error::{ConfigError, GameError, PlanError, SolverError, TreeplexError};
pub use sequence::{Game, RealizationPlan, Role, SumType, Treeplex, TreeplexBuilder, UtilityMatrix};
